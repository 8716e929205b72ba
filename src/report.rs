//! Completeness report over the required shipping fields (analyze / verify).

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::catalog::product::{truncate_name, Product};
use crate::fields::{missing_fields, RequiredField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteRecord {
    pub id: String,
    pub name: String,
    pub missing: Vec<RequiredField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCount {
    pub field: RequiredField,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    pub generated_at: String,
    pub total: usize,
    pub complete: Vec<CompleteRecord>,
    pub incomplete: Vec<IncompleteRecord>,
    /// Most frequently missing first; ties keep the fixed field order.
    pub missing_counts: Vec<FieldCount>,
}

impl CompletenessReport {
    /// Names are kept whole; truncate at display time.
    pub fn build(products: &[Product]) -> Self {
        let mut complete = Vec::new();
        let mut incomplete = Vec::new();
        let mut counts: HashMap<RequiredField, usize> = HashMap::new();

        for product in products {
            let missing = missing_fields(product);
            if missing.is_empty() {
                complete.push(CompleteRecord {
                    id: product.id.to_string(),
                    name: product.name().to_string(),
                });
                continue;
            }
            for field in &missing {
                *counts.entry(*field).or_default() += 1;
            }
            incomplete.push(IncompleteRecord {
                id: product.id.to_string(),
                name: product.name().to_string(),
                missing,
            });
        }

        let mut missing_counts: Vec<FieldCount> = RequiredField::ALL
            .into_iter()
            .filter_map(|field| counts.get(&field).map(|&count| FieldCount { field, count }))
            .collect();
        // Stable sort: equal counts stay in field order.
        missing_counts.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            total: products.len(),
            complete,
            incomplete,
            missing_counts,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }

    pub fn complete_percent(&self) -> f64 {
        percent(self.complete.len(), self.total)
    }

    pub fn incomplete_percent(&self) -> f64 {
        percent(self.incomplete.len(), self.total)
    }

    /// Long-form listing: every complete record, the first `max_incomplete` incomplete ones,
    /// then counts and the most common gaps.
    pub fn render_analysis(&self, name_width: usize, max_incomplete: usize) -> String {
        let mut out = String::new();
        out.push_str("Products missing required shipping/warranty fields\n");
        out.push_str(&"=".repeat(70));
        out.push('\n');

        out.push_str(&format!("Complete products ({}):\n", self.complete.len()));
        for record in &self.complete {
            out.push_str(&format!(
                "  - ID {}: {}\n",
                record.id,
                truncate_name(&record.name, name_width)
            ));
        }

        out.push_str(&format!("\nIncomplete products ({}):\n", self.incomplete.len()));
        for record in self.incomplete.iter().take(max_incomplete) {
            out.push_str(&format!(
                "  - ID {}: {}\n    missing: {}\n",
                record.id,
                truncate_name(&record.name, name_width),
                crate::fields::join_fields(&record.missing)
            ));
        }
        if self.incomplete.len() > max_incomplete {
            out.push_str(&format!(
                "  ... and {} more\n",
                self.incomplete.len() - max_incomplete
            ));
        }

        out.push_str("\nSummary:\n");
        out.push_str(&format!("- complete: {}/{}\n", self.complete.len(), self.total));
        out.push_str(&format!(
            "- incomplete: {}/{}\n",
            self.incomplete.len(),
            self.total
        ));

        if !self.missing_counts.is_empty() {
            out.push_str("\nMost common missing fields:\n");
            for entry in &self.missing_counts {
                out.push_str(&format!("  - {}: {} products\n", entry.field, entry.count));
            }
        }
        out
    }

    /// Short-form check: ids of complete records, all incomplete ones, and percentages.
    pub fn render_verification(&self, name_width: usize) -> String {
        let mut out = String::new();
        out.push_str(&format!("Complete products: {}\n", self.complete.len()));
        for record in &self.complete {
            out.push_str(&format!("  ok ID {}\n", record.id));
        }
        out.push_str(&format!("\nIncomplete products: {}\n", self.incomplete.len()));
        for record in &self.incomplete {
            out.push_str(&format!(
                "  x  ID {}: {}\n     missing: {}\n",
                record.id,
                truncate_name(&record.name, name_width),
                crate::fields::join_fields(&record.missing)
            ));
        }
        out.push_str(&format!(
            "\nComplete: {}/{} ({:.1}%)\nIncomplete: {}/{} ({:.1}%)\n",
            self.complete.len(),
            self.total,
            self.complete_percent(),
            self.incomplete.len(),
            self.total,
            self.incomplete_percent()
        ));
        out
    }

    /// One row per incomplete record: `id,name,missing` (missing joined with `;`).
    pub fn write_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["id", "name", "missing"])?;
        for record in &self.incomplete {
            let missing = record
                .missing
                .iter()
                .map(RequiredField::key)
                .collect::<Vec<_>>()
                .join(";");
            writer.write_record([record.id.as_str(), record.name.as_str(), missing.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(json: &str) -> Vec<Product> {
        serde_json::from_str(json).expect("fixture should parse")
    }

    const FIXTURE: &str = r#"[
        {"id": "1", "name": "Sierra Circular", "freeShipping": false, "officialStore": true,
         "warrantyMonths": 12, "shippingTimeDays": 2, "shippingNotes": "Retiro en tienda."},
        {"id": "2", "name": "Rotomartillo SDS-Plus con maletín y juego de brocas", "warrantyMonths": null},
        {"id": 3, "name": "Lijadora", "freeShipping": true, "officialStore": true,
         "warrantyMonths": 24, "shippingTimeDays": 1}
    ]"#;

    #[test]
    fn splits_complete_and_incomplete() {
        let report = CompletenessReport::build(&catalog(FIXTURE));
        assert_eq!(report.total, 3);
        assert_eq!(report.complete.len(), 1);
        assert_eq!(report.incomplete.len(), 2);
        assert!(!report.is_complete());
        assert_eq!(report.incomplete[1].missing, vec![RequiredField::ShippingNotes]);
    }

    #[test]
    fn missing_counts_sorted_by_frequency_then_field_order() {
        let report = CompletenessReport::build(&catalog(FIXTURE));
        let order: Vec<(RequiredField, usize)> = report
            .missing_counts
            .iter()
            .map(|c| (c.field, c.count))
            .collect();
        assert_eq!(
            order,
            vec![
                (RequiredField::ShippingNotes, 2),
                (RequiredField::FreeShipping, 1),
                (RequiredField::OfficialStore, 1),
                (RequiredField::WarrantyMonths, 1),
                (RequiredField::ShippingTimeDays, 1),
            ]
        );
    }

    #[test]
    fn empty_catalog_is_complete_with_zero_percent() {
        let report = CompletenessReport::build(&[]);
        assert!(report.is_complete());
        assert_eq!(report.complete_percent(), 0.0);
    }

    #[test]
    fn analysis_truncates_names_and_caps_listing() {
        let report = CompletenessReport::build(&catalog(FIXTURE));
        let text = report.render_analysis(20, 1);
        assert!(text.contains("Rotomartillo SDS-Plu..."));
        assert!(text.contains("... and 1 more"));
        assert!(text.contains("- complete: 1/3"));
    }

    #[test]
    fn verification_shows_percentages() {
        let report = CompletenessReport::build(&catalog(FIXTURE));
        let text = report.render_verification(40);
        assert!(text.contains("Complete: 1/3 (33.3%)"));
        assert!(text.contains("Incomplete: 2/3 (66.7%)"));
    }

    #[test]
    fn csv_export_lists_incomplete_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        CompletenessReport::build(&catalog(FIXTURE))
            .write_csv(&path)
            .unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "3");
        assert_eq!(&rows[1][2], "shippingNotes");
        assert_eq!(
            &rows[0][2],
            "freeShipping;officialStore;warrantyMonths;shippingTimeDays;shippingNotes"
        );
    }
}
