//! CSV loader for catalog entries
//!
//! Expected columns: `name,unit,price`, with or without a header row.
//! Files are read as UTF-8 (a BOM is skipped) and fall back to
//! Windows-1251, which is what spreadsheet tools on Russian-locale systems
//! write by default.

use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1251;
use tandem_domain::model::NewCatalogEntry;
use tandem_domain::service::numeric::{is_numeric_input, parse_amount};
use tandem_types::{Error, Result};
use tracing::{debug, warn};

/// Load catalog entries from a CSV file
pub fn load_catalog_entries<P: AsRef<Path>>(path: P) -> Result<Vec<NewCatalogEntry>> {
    let bytes = fs::read(path.as_ref())?;
    let content = decode(&bytes);
    parse_catalog_entries(&content)
}

fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1251.decode(bytes);
            if had_errors {
                warn!("Some characters could not be decoded from Windows-1251");
            }
            debug!("Catalog CSV decoded as Windows-1251");
            decoded.into_owned()
        }
    }
}

/// Parse `name,unit,price` records. A first row whose price column is not a
/// number is treated as a header. Rows without a name are skipped.
pub fn parse_catalog_entries(content: &str) -> Result<Vec<NewCatalogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv(e.to_string()))?;
        let row_num = row_idx + 1;

        let name = record.get(0).unwrap_or("");
        let unit = record.get(1).unwrap_or("");
        let price = record.get(2).unwrap_or("");

        if row_idx == 0 && !price.is_empty() && !is_numeric_input(price) {
            debug!(row = row_num, "Skipping header row");
            continue;
        }
        if name.is_empty() {
            warn!(row = row_num, "Skipping catalog row without a name");
            continue;
        }
        if !is_numeric_input(price) {
            return Err(Error::Csv(format!(
                "Invalid price in row {row_num}: {price}"
            )));
        }

        entries.push(NewCatalogEntry {
            name: name.to_string(),
            unit: unit.to_string(),
            default_price: parse_amount(price),
        });
    }

    Ok(entries)
}
