//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pantry_domain::traits::{Cell, SearchResult};
use pantry_extractor::ExtractionMetadata;
use pantry_reconciler::MergeReport;
use serde_json::{json, Map, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format search results.
    pub fn format_search(&self, result: &SearchResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_search_json(result),
            OutputFormat::Table => Ok(self.format_search_table(result)),
            OutputFormat::Quiet => Ok(self.format_search_quiet(result)),
        }
    }

    /// Format search results as a JSON array of row objects.
    fn format_search_json(&self, result: &SearchResult) -> Result<String> {
        let rows: Vec<Value> = result
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = result
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(cell_to_json))
                    .collect();
                Value::Object(object)
            })
            .collect();

        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Format search results as a table.
    fn format_search_table(&self, result: &SearchResult) -> String {
        if result.is_empty() {
            return self.colorize("No products found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(result.columns.iter().map(|c| header(c)));
        for row in &result.rows {
            builder.push_record(row.iter().map(|cell| cell.to_string()));
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format search results in quiet mode (names only).
    fn format_search_quiet(&self, result: &SearchResult) -> String {
        let Some(idx) = result.column_index("name") else {
            return String::new();
        };
        let names: Vec<String> = result.rows.iter().map(|row| row[idx].to_string()).collect();
        names.join("\n")
    }

    /// Format the outcome of an ingest run.
    pub fn format_ingest(
        &self,
        extraction: Option<&ExtractionMetadata>,
        report: &MergeReport,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let per_store: Map<String, Value> = report
                    .per_store
                    .iter()
                    .map(|(store, count)| (store.as_str().to_string(), json!(count)))
                    .collect();
                let mut output = json!({
                    "merge": {
                        "input_records": report.input_records,
                        "emitted": report.emitted,
                        "collapsed_duplicates": report.collapsed_duplicates,
                        "dropped_unnamed": report.dropped_unnamed,
                        "drop_rate": report.drop_rate(),
                        "per_store": per_store,
                    }
                });
                if let Some(meta) = extraction {
                    output["extraction"] = json!({
                        "total_pages": meta.total_pages,
                        "detailed": meta.detailed,
                        "partial": meta.partial,
                        "issues": meta.issues,
                        "processing_time_ms": meta.processing_time_ms,
                    });
                }
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Count"]);
                if let Some(meta) = extraction {
                    builder.push_record(["Pages extracted".to_string(), meta.total_pages.to_string()]);
                    builder.push_record(["  detailed".to_string(), meta.detailed.to_string()]);
                    builder.push_record(["  name only".to_string(), meta.partial.to_string()]);
                    builder.push_record(["  issues".to_string(), meta.issues.to_string()]);
                }
                builder.push_record(["Input records".to_string(), report.input_records.to_string()]);
                builder.push_record(["Collapsed duplicates".to_string(), report.collapsed_duplicates.to_string()]);
                builder.push_record([
                    "Dropped (no name)".to_string(),
                    format!("{} ({:.1}%)", report.dropped_unnamed, report.drop_rate() * 100.0),
                ]);
                builder.push_record(["Emitted".to_string(), report.emitted.to_string()]);
                for (store, count) in &report.per_store {
                    builder.push_record([format!("  {}", store.display_name()), count.to_string()]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(report.emitted.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Integer(v) => json!(v),
        Cell::Real(v) => json!(v),
        Cell::Text(v) => json!(v),
    }
}

/// Column header for display: `total_fat` → `Total Fat`.
fn header(column: &str) -> String {
    column
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_domain::Store;

    fn sample_result() -> SearchResult {
        SearchResult {
            columns: vec!["name".into(), "store".into(), "address".into(), "sodium".into()],
            rows: vec![
                vec![
                    Cell::Text("Kale Chips".into()),
                    Cell::Text("retailer_a".into()),
                    Cell::Text("1 Clark St".into()),
                    Cell::Real(180.0),
                ],
                vec![
                    Cell::Text("Oat Milk".into()),
                    Cell::Text("retailer_b".into()),
                    Cell::Null,
                    Cell::Real(95.5),
                ],
            ],
        }
    }

    #[test]
    fn test_search_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_search(&sample_result()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["name"], "Kale Chips");
        assert_eq!(parsed[0]["sodium"], 180.0);
        assert!(parsed[1]["address"].is_null());
    }

    #[test]
    fn test_search_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_search(&sample_result()).unwrap();
        assert!(output.contains("Name"));
        assert!(output.contains("Sodium"));
        assert!(output.contains("Oat Milk"));
    }

    #[test]
    fn test_search_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_search(&sample_result()).unwrap();
        assert_eq!(output, "Kale Chips\nOat Milk");
    }

    #[test]
    fn test_empty_search() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_search(&SearchResult::empty()).unwrap();
        assert!(output.contains("No products found"));

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_search(&SearchResult::empty()).unwrap(), "");
    }

    #[test]
    fn test_ingest_report() {
        let mut report = MergeReport::new();
        report.input_records = 4;
        report.record_emitted(Store::RetailerA);
        report.record_emitted(Store::RetailerC);
        report.record_duplicate();
        report.record_drop();

        let json_output = Formatter::new(OutputFormat::Json, false)
            .format_ingest(None, &report)
            .unwrap();
        let parsed: Value = serde_json::from_str(&json_output).unwrap();
        assert_eq!(parsed["merge"]["emitted"], 2);
        assert_eq!(parsed["merge"]["per_store"]["retailer_c"], 1);
        assert_eq!(parsed["merge"]["drop_rate"], 0.25);
        assert!(parsed.get("extraction").is_none());

        let table = Formatter::new(OutputFormat::Table, false)
            .format_ingest(Some(&ExtractionMetadata::default()), &report)
            .unwrap();
        assert!(table.contains("Pages extracted"));
        assert!(table.contains("25.0%"));

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_ingest(None, &report)
            .unwrap();
        assert_eq!(quiet, "2");
    }

    #[test]
    fn test_header() {
        assert_eq!(header("total_carbohydrate"), "Total Carbohydrate");
        assert_eq!(header("name"), "Name");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
