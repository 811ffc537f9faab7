//! History Service - print log listing and cleanup

use std::fs;
use std::io::ErrorKind;

use tandem_domain::model::PrintHistoryRecord;
use tandem_domain::repository::PrintHistoryRepository;
use tandem_store::{SqlitePrintHistoryRepository, Store};
use tandem_types::{Error, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::repository::open_store;

pub struct HistoryService {
    repo: SqlitePrintHistoryRepository,
}

impl HistoryService {
    pub fn new(store: &Store) -> Self {
        Self {
            repo: store.print_history(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&open_store(config)?))
    }

    /// Newest first, with the current state of each referenced order
    pub fn list(&self) -> Result<Vec<PrintHistoryRecord>> {
        self.repo.find_all()
    }

    /// Remove the document file (if still present), then the entry.
    ///
    /// When the file cannot be removed the entry is kept and the error is
    /// returned.
    pub fn delete_entry(&self, id: i64) -> Result<()> {
        let entry = self
            .repo
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("Print history entry {id}")))?;

        let path = &entry.document_path;
        match fs::remove_file(path) {
            Ok(()) => info!(path = %path.display(), "Removed document"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Document already gone");
            }
            Err(source) => {
                return Err(Error::FileDelete {
                    path: path.clone(),
                    source,
                })
            }
        }

        self.repo.delete(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use tandem_domain::model::NewPrintHistoryEntry;
    use tandem_domain::repository::OrderRepository;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Store, HistoryService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("database.db")).unwrap();
        let service = HistoryService::new(&store);
        (dir, store, service)
    }

    fn append(store: &Store, path: std::path::PathBuf) -> i64 {
        let order = store.orders().find_all().unwrap().remove(0);
        let entry = NewPrintHistoryEntry::snapshot(
            order.id.unwrap(),
            &order,
            path,
            Local::now().naive_local(),
        );
        store.print_history().append(&entry).unwrap().id
    }

    #[test]
    fn test_delete_removes_file_and_entry() {
        let (dir, store, service) = setup();
        let path = dir.path().join("report_1.pdf");
        fs::write(&path, b"%PDF").unwrap();
        let id = append(&store, path.clone());

        service.delete_entry(id).unwrap();
        assert!(!path.exists());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_with_missing_file_still_removes_entry() {
        let (dir, store, service) = setup();
        let id = append(&store, dir.path().join("gone.pdf"));

        service.delete_entry(id).unwrap();
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_failed_file_removal_keeps_entry() {
        let (dir, store, service) = setup();
        // A directory cannot be removed with remove_file
        let path = dir.path().join("not_a_file");
        fs::create_dir(&path).unwrap();
        let id = append(&store, path.clone());

        let err = service.delete_entry(id).unwrap_err();
        assert!(matches!(err, Error::FileDelete { .. }));
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_unknown_entry() {
        let (_dir, _store, service) = setup();
        assert!(matches!(service.delete_entry(99), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_undated_entry_is_listed_and_deleted() {
        let (dir, store, service) = setup();
        let path = dir.path().join("old.pdf");
        fs::write(&path, b"%PDF").unwrap();
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO print_history (order_id, print_date, customer, pdf_path)
             VALUES (NULL, NULL, 'Old LLC', ?1)",
            [path.to_string_lossy()],
        )
        .unwrap();
        let id = conn.last_insert_rowid();

        let records = service.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entry.printed_at, None);
        assert!(!records[0].order_found);

        service.delete_entry(id).unwrap();
        assert!(!path.exists());
        assert!(service.list().unwrap().is_empty());
    }
}
