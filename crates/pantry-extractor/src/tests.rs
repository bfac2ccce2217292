//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{
        Extractor, ExtractorConfig, ExtractionIssue, LabelEngine, LabelConfig, Section,
    };
    use pantry_domain::{
        Collector, Label, NutrientKey, RawProductText, ReferenceLabelIndex, Store,
    };

    fn index() -> ReferenceLabelIndex {
        ReferenceLabelIndex::builder()
            .exemplars(Label::Vegan, ["Soyrizo", "Cauliflower Gnocchi"])
            .exemplars(Label::Kosher, ["Everything Bagels"])
            .build()
    }

    fn extractor() -> Extractor {
        Extractor::new(ExtractorConfig::default(), &index()).unwrap()
    }

    #[test]
    fn test_full_extraction_flow() {
        let raw = RawProductText::new("Soyrizo", Store::RetailerA)
            .with_collector(Collector::ArticleIndex)
            .with_ingredients("Textured soy protein, vinegar, spices")
            .with_nutrition("Serving size 2.5 oz | 5 servings | Calories 160 | Total Fat 9g | Sodium 610mg | Protein 11 g");

        let result = extractor().process(raw);
        let record = result.record;
        assert_eq!(record.identity(), Some("Soyrizo"));
        assert_eq!(record.collector, Collector::ArticleIndex);

        let details = record.details().expect("detailed record");
        assert_eq!(details.nutrients.get(NutrientKey::Calories), 160.0);
        assert_eq!(details.nutrients.get(NutrientKey::TotalFat), 9.0);
        assert_eq!(details.nutrients.get(NutrientKey::Sodium), 610.0);
        assert_eq!(details.nutrients.get(NutrientKey::Protein), 11.0);
        assert_eq!(details.serving_size.as_deref(), Some("2.5 oz"));
        assert_eq!(details.servings_per_container, Some(5.0));

        let labels = details.labels.as_ref().unwrap();
        assert!(labels.contains(Label::Vegan));
        assert!(labels.contains(Label::DairyFree));
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_free_text_page_is_split() {
        let page = "Cold Brew Coffee Bags\nINGREDIENTS: COFFEE.\nNUTRITION FACTS: Calories 0 | Sodium 5mg\nThe % Daily Value (DV) tells you how much a nutrient contributes.";
        let raw = RawProductText::new("Cold Brew Coffee Bags", Store::RetailerA).with_page_text(page);

        let result = extractor().process(raw);
        let details = result.record.details().unwrap();
        assert_eq!(details.ingredients.as_deref(), Some("COFFEE."));
        assert_eq!(details.nutrients.get(NutrientKey::Sodium), 5.0);
        assert!(details.labels.as_ref().unwrap().contains(Label::DairyFree));
    }

    #[test]
    fn test_regional_disclaimer_keeps_name_only() {
        let page = "INGREDIENTS: Varies by region. NUTRITION FACTS: Calories 90";
        let raw = RawProductText::new("Seasonal Bouquet", Store::RetailerA).with_page_text(page);

        let result = extractor().process(raw);
        assert!(result.record.is_partial());
        assert_eq!(result.issues, vec![ExtractionIssue::RegionalVarianceDisclaimer]);
    }

    #[test]
    fn test_missing_marker_keeps_name_only() {
        let raw = RawProductText::new("Gift Card", Store::RetailerA).with_page_text("Give the gift of groceries.");

        let result = extractor().process(raw);
        assert!(result.record.is_partial());
        assert_eq!(result.issues, vec![ExtractionIssue::MissingSection(Section::Ingredients)]);
    }

    #[test]
    fn test_missing_nutrition_defaults_to_zero() {
        let raw = RawProductText::new("Almond Butter", Store::RetailerC).with_ingredients("dry roasted almonds");

        let result = extractor().process(raw);
        let details = result.record.details().unwrap();
        assert!(details.nutrients.is_all_zero());
        assert_eq!(details.nutrients.iter().count(), 10);
        assert!(result.issues.contains(&ExtractionIssue::MissingSection(Section::Nutrition)));
    }

    #[test]
    fn test_unparseable_token_reported() {
        let raw = RawProductText::new("Cheddar", Store::RetailerB)
            .with_ingredients("milk, salt, enzymes")
            .with_nutrition("Calories 110, Sodium --, Protein 7g");

        let result = extractor().process(raw);
        let details = result.record.details().unwrap();
        assert_eq!(details.nutrients.get(NutrientKey::Sodium), 0.0);
        assert_eq!(details.nutrients.get(NutrientKey::Protein), 7.0);
        assert!(result
            .issues
            .contains(&ExtractionIssue::UnparseableNumericToken(NutrientKey::Sodium)));
        assert!(result.issues.contains(&ExtractionIssue::NoLabelEvidence));
        assert!(details.labels.is_none());
    }

    #[test]
    fn test_bare_name_without_evidence_is_partial() {
        let raw = RawProductText::new("Mystery Snack", Store::RetailerB);
        let result = extractor().process(raw);
        assert!(result.record.is_partial());
    }

    #[test]
    fn test_bare_name_with_keyword_is_detailed() {
        let raw = RawProductText::new("Organic Bananas", Store::RetailerB);
        let result = extractor().process(raw);
        let details = result.record.details().unwrap();
        assert!(details.labels.as_ref().unwrap().contains(Label::Organic));
        assert!(details.nutrients.is_all_zero());
    }

    #[test]
    fn test_declared_labels_are_unioned() {
        let raw = RawProductText::new("Sourdough Loaf", Store::RetailerB)
            .with_ingredients("flour, water, salt")
            .with_declared_labels(["Kosher", "not-a-label"]);

        let labels = extractor().process(raw).record.details().unwrap().labels.clone().unwrap();
        assert!(labels.contains(Label::Kosher));
        assert!(labels.contains(Label::DairyFree));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_empty_declared_list_confirms_no_labels() {
        let raw = RawProductText::new("Butter", Store::RetailerB)
            .with_ingredients("cream, salt")
            .with_declared_labels(Vec::<String>::new());

        let result = extractor().process(raw);
        let labels = result.record.details().unwrap().labels.clone();
        assert_eq!(labels.map(|l| l.is_empty()), Some(true));
        assert!(!result.issues.contains(&ExtractionIssue::NoLabelEvidence));
    }

    #[test]
    fn test_batch_preserves_order_sequential_and_parallel() {
        let pages: Vec<RawProductText> = (0..50)
            .map(|i| {
                RawProductText::new(format!("Product {}", i), Store::RetailerC)
                    .with_nutrition(format!("Calories {}", i))
            })
            .collect();

        for config in [ExtractorConfig::default(), ExtractorConfig::lenient()] {
            let extractor = Extractor::new(config, &index()).unwrap();
            let batch = extractor.process_all(pages.clone());

            assert_eq!(batch.metadata.total_pages, 50);
            assert_eq!(batch.metadata.detailed, 50);
            assert_eq!(batch.metadata.partial, 0);

            for (i, result) in batch.results.iter().enumerate() {
                assert_eq!(result.record.identity(), Some(format!("Product {}", i).as_str()));
                let calories = result.record.details().unwrap().nutrients.get(NutrientKey::Calories);
                assert_eq!(calories, i as f64);
            }
        }
    }

    #[test]
    fn test_injected_similarity_flows_through() {
        fn always(_: &str, _: &str) -> f64 {
            1.0
        }
        let engine = LabelEngine::new(&LabelConfig::default(), &index()).unwrap().with_similarity(always);
        let extractor = extractor().with_label_engine(engine);

        let raw = RawProductText::new("Plain Bagels", Store::RetailerA);
        let labels = extractor.process(raw).record.details().unwrap().labels.clone().unwrap();
        assert!(labels.contains(Label::Vegan));
        assert!(labels.contains(Label::Kosher));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ExtractorConfig::default();
        config.labels.fuzzy_threshold = -0.1;
        assert!(Extractor::new(config, &index()).is_err());
    }
}
