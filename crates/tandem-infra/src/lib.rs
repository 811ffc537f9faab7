//! Infrastructure layer: work-order documents, spreadsheet export, catalog CSV

pub mod catalog_csv;
pub mod export;
pub mod report;
