//! Repository trait definitions for data persistence

use tandem_types::{CatalogKind, Error};

use crate::model::{
    CatalogEntry, NewCatalogEntry, NewPrintHistoryEntry, Order, PrintHistoryEntry,
    PrintHistoryRecord,
};

/// Repository for work orders and their line items
pub trait OrderRepository {
    /// Insert or update the order and replace all of its line items.
    ///
    /// Fails with a validation error when a mandatory field is empty or the
    /// contract number belongs to another order. Returns the order id.
    fn save(&self, order: &Order) -> Result<i64, Error>;

    /// Load an order with both tables
    fn find_by_id(&self, id: i64) -> Result<Option<Order>, Error>;

    /// Load all orders, oldest first
    fn find_all(&self) -> Result<Vec<Order>, Error>;

    /// Delete the order, its line items and the history rows pointing at it
    fn delete(&self, id: i64) -> Result<bool, Error>;
}

/// Repository for the work and material catalogs
pub trait CatalogRepository {
    /// All entries of one catalog, by id
    fn find_all(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, Error>;

    /// Add an entry with a freshly allocated id from the catalog's band
    fn add_entry(&self, kind: CatalogKind, entry: &NewCatalogEntry) -> Result<CatalogEntry, Error>;

    /// Remove an entry by id; line items that copied it are unaffected
    fn remove_entry(&self, kind: CatalogKind, id: i64) -> Result<bool, Error>;
}

/// Repository for the print history log
pub trait PrintHistoryRepository {
    fn append(&self, entry: &NewPrintHistoryEntry) -> Result<PrintHistoryEntry, Error>;

    fn find_by_id(&self, id: i64) -> Result<Option<PrintHistoryEntry>, Error>;

    /// All entries, newest first, joined with the orders they reference
    fn find_all(&self) -> Result<Vec<PrintHistoryRecord>, Error>;

    fn delete(&self, id: i64) -> Result<bool, Error>;
}
