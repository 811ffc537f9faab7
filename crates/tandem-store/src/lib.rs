//! SQLite persistence gateway
//!
//! The store is a single database file. Every operation opens its own
//! connection and closes it before returning; writes that touch several
//! tables run inside one transaction.

mod catalog_repo;
mod legacy;
mod order_repo;
mod print_history_repo;
pub mod schema;
mod seed;

pub use catalog_repo::SqliteCatalogRepository;
pub use order_repo::SqliteOrderRepository;
pub use print_history_repo::SqlitePrintHistoryRepository;

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tandem_types::Result;
use tracing::debug;

/// Handle to the store file; cheap to clone
#[derive(Debug, Clone)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    /// Open (creating if needed) the store and bring its schema up to date.
    ///
    /// A brand-new store is seeded with the catalogs and one sample order.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let store = Self { db_path };
        let mut conn = store.connect()?;
        schema::migrate(&mut conn)?;
        Ok(store)
    }

    /// Fresh connection to the store file
    pub fn connect(&self) -> Result<Connection> {
        debug!(path = %self.db_path.display(), "Opening store connection");
        Ok(Connection::open(&self.db_path)?)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Highest schema version recorded in the store
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.connect()?;
        schema::current_version(&conn)
    }

    pub fn orders(&self) -> SqliteOrderRepository {
        SqliteOrderRepository::new(self.clone())
    }

    pub fn catalogs(&self) -> SqliteCatalogRepository {
        SqliteCatalogRepository::new(self.clone())
    }

    pub fn print_history(&self) -> SqlitePrintHistoryRepository {
        SqlitePrintHistoryRepository::new(self.clone())
    }
}
