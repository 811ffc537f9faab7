//! Printable work-order documents
//!
//! Documents are written as `report_<YYYYmmdd_HHMMSS>.pdf` into the reports
//! directory. Two documents generated within the same second get a numeric
//! suffix instead of overwriting each other.

pub mod layout;
mod pdf;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tandem_domain::model::Order;
use tandem_types::Result;
use tracing::info;

/// Lines printed at the top of every document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyHeader {
    pub name: String,
    pub address: String,
    pub contacts: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub company: CompanyHeader,
    /// TrueType font to embed; the built-in Helvetica only covers Latin text
    pub font_path: Option<PathBuf>,
}

/// Renders orders into PDF files under one directory
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    options: ReportOptions,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>, options: ReportOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            options,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the document for `order` and return its path
    pub fn generate(&self, order: &Order, now: NaiveDateTime) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = document_path(&self.output_dir, now);

        let layout = layout::layout_order(order, &self.options.company);
        pdf::write_pdf(&layout, self.options.font_path.as_deref(), &path)?;

        info!(path = %path.display(), contract = %order.contract_number, "Generated work order document");
        Ok(path)
    }
}

/// First free `report_<timestamp>[_n].pdf` path in `dir`
pub fn document_path(dir: &Path, now: NaiveDateTime) -> PathBuf {
    let stamp = now.format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("report_{stamp}.pdf"));
    if !path.exists() {
        return path;
    }
    (2..)
        .map(|n| dir.join(format!("report_{stamp}_{n}.pdf")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tandem_domain::model::LineField;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 7)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_document_path_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let first = document_path(dir.path(), now());
        assert_eq!(first.file_name().unwrap(), "report_20250407_140509.pdf");

        fs::write(&first, b"").unwrap();
        let second = document_path(dir.path(), now());
        assert_eq!(second.file_name().unwrap(), "report_20250407_140509_2.pdf");
    }

    #[test]
    fn test_generate_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path().join("reports"), ReportOptions::default());

        let mut order = Order::default();
        order.contract_number = "20250407".to_string();
        order.customer = "Test LLC".to_string();
        order.work_table.set_field(0, LineField::Name, "Diagnostics");
        order.work_table.set_field(0, LineField::Quantity, "1");
        order.work_table.set_field(0, LineField::UnitPrice, "500");

        let path = generator.generate(&order, now()).unwrap();
        assert!(path.starts_with(dir.path().join("reports")));
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let again = generator.generate(&order, now()).unwrap();
        assert_ne!(path, again);
    }

    #[test]
    fn test_missing_font_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let options = ReportOptions {
            font_path: Some(dir.path().join("missing.ttf")),
            ..ReportOptions::default()
        };
        let generator = ReportGenerator::new(dir.path(), options);
        assert!(generator.generate(&Order::default(), now()).is_err());
    }
}
