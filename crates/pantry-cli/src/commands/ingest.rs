//! Ingest command implementation.
//!
//! Runs the whole pipeline: scraped pages go through the extractor, tabular
//! exports through column projection, curated label lists become label-listing
//! records, and everything is merged before it reaches the database.

use crate::cli::IngestArgs;
use crate::commands::open_store;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pantry_domain::traits::ProductStore;
use pantry_domain::{Collector, Label, RawProductText, ReferenceLabelIndex, SourceRecord, Store};
use pantry_extractor::{records_from_reference, ExtractionMetadata, Extractor};
use pantry_reconciler::{project_rows, MergeOutcome, Reconciler, SourceBatch};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// What one ingest run produced.
#[derive(Debug)]
pub struct IngestRun {
    /// Page extraction statistics, when pages were given
    pub extraction: Option<ExtractionMetadata>,
    /// Canonical records and merge statistics
    pub outcome: MergeOutcome,
    /// Number of records written; `None` on a dry run
    pub persisted: Option<usize>,
}

/// Execute the ingest command.
pub fn execute_ingest(args: IngestArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let run = run_ingest(&args, config)?;

    println!("{}", formatter.format_ingest(run.extraction.as_ref(), &run.outcome.report)?);

    if formatter.format() != OutputFormat::Quiet {
        match run.persisted {
            Some(count) => println!("{}", formatter.success(&format!("Stored {} product(s)", count))),
            None => println!("{}", formatter.info("Dry run: nothing written")),
        }
        if run.outcome.report.dropped_unnamed > 0 {
            println!(
                "{}",
                formatter.warning(&format!(
                    "{} record(s) had no name and were dropped",
                    run.outcome.report.dropped_unnamed
                ))
            );
        }
    }

    Ok(())
}

/// Run the pipeline without printing anything.
pub fn run_ingest(args: &IngestArgs, config: &Config) -> Result<IngestRun> {
    if args.pages.is_none() && args.export.is_empty() && args.reference_store.is_none() {
        return Err(CliError::InvalidInput(
            "Nothing to ingest. Use --pages, --export or --reference-store".to_string(),
        ));
    }

    let index = match &args.reference {
        Some(path) => load_reference(path)?,
        None => ReferenceLabelIndex::empty(),
    };

    let mut batches = Vec::new();
    let mut extraction = None;

    if let Some(path) = &args.pages {
        let pages = load_pages(path)?;
        let extractor = Extractor::new(config.extractor.clone(), &index)?;
        let batch = extractor.process_all(pages);
        extraction = Some(batch.metadata.clone());
        batches.extend(group_batches(batch.into_records()));
    }

    if let Some(store) = args.reference_store {
        batches.push(SourceBatch::new(
            store,
            Collector::LabelListing,
            records_from_reference(&index, store),
        ));
    }

    for (store, path) in &args.export {
        let rows: Vec<Value> = serde_json::from_str(&fs::read_to_string(path)?)?;
        let table = config.reconciler.rename_table(*store)?;
        info!(store = %store, rows = rows.len(), "Projecting export");
        batches.push(SourceBatch::new(
            *store,
            Collector::Catalog,
            project_rows(&rows, *store, Collector::Catalog, &table),
        ));
    }

    let reconciler = Reconciler::new(&config.reconciler)?;
    let outcome = reconciler.merge_all(batches);

    let persisted = if args.dry_run {
        None
    } else {
        let mut store = open_store(config)?;
        Some(store.persist(&outcome.records)?.len())
    };

    Ok(IngestRun {
        extraction,
        outcome,
        persisted,
    })
}

/// Group records into per-(store, collector) batches in first-seen order.
pub fn group_batches(records: Vec<SourceRecord>) -> Vec<SourceBatch> {
    let mut batches: Vec<SourceBatch> = Vec::new();
    for record in records {
        match batches
            .iter_mut()
            .find(|b| b.store == record.store && b.collector == record.collector)
        {
            Some(batch) => batch.records.push(record),
            None => batches.push(SourceBatch::new(record.store, record.collector, vec![record])),
        }
    }
    batches
}

fn load_pages(path: &Path) -> Result<Vec<RawProductText>> {
    let defs: Vec<PageDefinition> = serde_json::from_str(&fs::read_to_string(path)?)?;
    defs.into_iter().map(PageDefinition::into_raw).collect()
}

fn load_reference(path: &Path) -> Result<ReferenceLabelIndex> {
    let lists: BTreeMap<String, Vec<String>> = serde_json::from_str(&fs::read_to_string(path)?)?;
    let mut builder = ReferenceLabelIndex::builder();
    for (tag, names) in lists {
        let label = Label::parse(&tag)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown label '{}' in reference file", tag)))?;
        builder = builder.exemplars(label, names);
    }
    Ok(builder.build())
}

/// One scraped page as JSON input.
#[derive(Debug, Deserialize)]
struct PageDefinition {
    #[serde(default)]
    name: Option<String>,
    store: String,
    #[serde(default)]
    collector: Option<String>,
    #[serde(default)]
    ingredients: Option<String>,
    #[serde(default)]
    nutrition: Option<String>,
    #[serde(default)]
    page_text: Option<String>,
    #[serde(default)]
    labels: Option<Vec<String>>,
}

impl PageDefinition {
    fn into_raw(self) -> Result<RawProductText> {
        let store: Store = self.store.parse().map_err(CliError::InvalidInput)?;
        let collector: Collector = match self.collector {
            Some(tag) => tag.parse().map_err(CliError::InvalidInput)?,
            None => Collector::ArticleIndex,
        };

        Ok(RawProductText {
            name: self.name.unwrap_or_default(),
            ingredient_block: self.ingredients,
            nutrition_block: self.nutrition,
            page_text: self.page_text,
            declared_labels: self.labels,
            source_id: store,
            collector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_domain::NutrientKey;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, file: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, contents).unwrap();
        path
    }

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.settings.database = Some(dir.path().join("db").join("pantry.db"));
        config
    }

    fn args() -> IngestArgs {
        IngestArgs {
            pages: None,
            export: Vec::new(),
            reference: None,
            reference_store: None,
            dry_run: false,
        }
    }

    const PAGES: &str = r#"[
        {
            "name": "Organic Kale Chips",
            "store": "retailer_a",
            "ingredients": "kale, sunflower oil, sea salt",
            "nutrition": "Calories 140, Sodium 180mg, Protein 3g"
        },
        {
            "name": "Peanut Butter Cups",
            "store": "retailer_b",
            "collector": "catalog",
            "page_text": "INGREDIENTS: milk chocolate, peanuts NUTRITION FACTS: Calories 210, Total Fat 13g"
        },
        { "store": "retailer_b" }
    ]"#;

    #[test]
    fn test_pages_to_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let mut ingest = args();
        ingest.pages = Some(write(&dir, "pages.json", PAGES));

        let run = run_ingest(&ingest, &config).unwrap();
        let meta = run.extraction.unwrap();
        assert_eq!(meta.total_pages, 3);
        assert_eq!(run.outcome.report.dropped_unnamed, 1);
        assert_eq!(run.persisted, Some(2));

        let store = open_store(&config).unwrap();
        let products = store.all_products().unwrap();
        assert_eq!(products.len(), 2);
        let (_, kale) = &products[0];
        assert_eq!(kale.name, "Organic Kale Chips");
        assert_eq!(kale.nutrient_table.get(NutrientKey::Sodium), 180.0);
        let (_, cups) = &products[1];
        assert_eq!(cups.nutrient_table.get(NutrientKey::TotalFat), 13.0);
        // milk in the ingredients and no label keyword in the name
        assert_eq!(cups.labels, None);
        assert!(kale.labels.as_ref().unwrap().contains(Label::DairyFree));
    }

    #[test]
    fn test_export_and_reference_merge() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let mut ingest = args();
        ingest.pages = Some(write(&dir, "pages.json", PAGES));
        ingest.reference = Some(write(
            &dir,
            "reference.json",
            r#"{ "vegan": ["Organic Kale Chips", "Lentil Soup"] }"#,
        ));
        ingest.reference_store = Some(Store::RetailerA);
        ingest.export = vec![(
            Store::RetailerC,
            write(
                &dir,
                "export.json",
                r#"[
                    { "name": "Sea Salt Potato Chips", "ingred": "potatoes, oil", "sodium": "170 mg" },
                    { "name": "Sea Salt Potato Chips", "sodium": 999 }
                ]"#,
            ),
        )];
        ingest.dry_run = true;

        let run = run_ingest(&ingest, &config).unwrap();
        assert_eq!(run.persisted, None);

        let names: Vec<&str> = run.outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Organic Kale Chips", "Lentil Soup", "Peanut Butter Cups", "Sea Salt Potato Chips"]
        );
        // Article pages outrank the label listing for the same product
        let kale = &run.outcome.records[0];
        assert_eq!(kale.nutrient_table.get(NutrientKey::Calories), 140.0);
        let chips = &run.outcome.records[3];
        assert_eq!(chips.nutrient_table.get(NutrientKey::Sodium), 170.0);
        assert_eq!(run.outcome.report.collapsed_duplicates, 2);
        assert!(!config.database_path().unwrap().exists());
    }

    #[test]
    fn test_nothing_to_ingest() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_ingest(&args(), &test_config(&dir));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_store_in_pages() {
        let dir = tempfile::tempdir().unwrap();
        let mut ingest = args();
        ingest.pages = Some(write(&dir, "pages.json", r#"[{ "name": "Tea", "store": "corner_shop" }]"#));
        let result = run_ingest(&ingest, &test_config(&dir));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_reference_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "reference.json", r#"{ "paleo": ["Jerky"] }"#);
        assert!(load_reference(&path).is_err());
    }

    #[test]
    fn test_group_batches_first_seen_order() {
        let records = vec![
            SourceRecord::name_only("a", Store::RetailerB, Collector::Catalog),
            SourceRecord::name_only("b", Store::RetailerA, Collector::ArticleIndex),
            SourceRecord::name_only("c", Store::RetailerB, Collector::Catalog),
            SourceRecord::name_only("d", Store::RetailerB, Collector::EditorialPost),
        ];
        let batches = group_batches(records);
        let keys: Vec<(Store, Collector, usize)> = batches
            .iter()
            .map(|b| (b.store, b.collector, b.records.len()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Store::RetailerB, Collector::Catalog, 2),
                (Store::RetailerA, Collector::ArticleIndex, 1),
                (Store::RetailerB, Collector::EditorialPost, 1),
            ]
        );
    }
}
