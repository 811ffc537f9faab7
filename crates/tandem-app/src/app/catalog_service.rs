//! Catalog Service - lookups while filling line items, catalog maintenance

use std::path::Path;

use tandem_domain::model::{CatalogEntry, LineItemTable, NewCatalogEntry};
use tandem_domain::repository::CatalogRepository;
use tandem_domain::service::{resolve, suggest, SuggestionFallback};
use tandem_infra::catalog_csv::load_catalog_entries;
use tandem_store::{SqliteCatalogRepository, Store};
use tandem_types::{CatalogKind, Error, Result};
use tracing::info;

use crate::config::Config;
use crate::repository::open_store;

pub struct CatalogService {
    repo: SqliteCatalogRepository,
    fallback: SuggestionFallback,
    limit: usize,
}

impl CatalogService {
    pub fn new(store: &Store, fallback: SuggestionFallback, limit: usize) -> Self {
        Self {
            repo: store.catalogs(),
            fallback,
            limit,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let store = open_store(config)?;
        Ok(Self::new(
            &store,
            config.suggestion_fallback(),
            config.suggestion_limit,
        ))
    }

    pub fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>> {
        self.repo.find_all(kind)
    }

    /// Names to offer for `query`
    pub fn suggest(&self, kind: CatalogKind, query: &str) -> Result<Vec<String>> {
        let entries = self.repo.find_all(kind)?;
        Ok(suggest(&entries, query, self.fallback, self.limit))
    }

    /// Entry with exactly this name
    pub fn resolve(&self, kind: CatalogKind, name: &str) -> Result<CatalogEntry> {
        let entries = self.repo.find_all(kind)?;
        resolve(&entries, name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("No {kind} catalog entry named '{}'", name.trim())))
    }

    /// Copy name, unit and default price of the named entry into a row
    pub fn fill_row(&self, table: &mut LineItemTable, position: usize, name: &str) -> Result<CatalogEntry> {
        let entry = self.resolve(CatalogKind::from(table.kind()), name)?;
        if !table.apply_catalog_entry(position, &entry) {
            return Err(Error::NotFound(format!("Row {}", position + 1)));
        }
        Ok(entry)
    }

    pub fn add(&self, kind: CatalogKind, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        self.repo.add_entry(kind, entry)
    }

    pub fn remove(&self, kind: CatalogKind, id: i64) -> Result<()> {
        if !self.repo.remove_entry(kind, id)? {
            return Err(Error::NotFound(format!("{kind} catalog entry {id}")));
        }
        Ok(())
    }

    /// Add every entry of a `name,unit,price` CSV file
    pub fn import_csv(&self, kind: CatalogKind, path: &Path) -> Result<Vec<CatalogEntry>> {
        let entries = load_catalog_entries(path)?;
        let added = entries
            .iter()
            .map(|entry| self.repo.add_entry(kind, entry))
            .collect::<Result<Vec<_>>>()?;
        info!(catalog = %kind, count = added.len(), path = %path.display(), "Imported catalog entries");
        Ok(added)
    }
}
