//! SQLite implementation of [`PrintHistoryRepository`]

use std::path::PathBuf;

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use tandem_domain::model::{NewPrintHistoryEntry, PrintHistoryEntry, PrintHistoryRecord};
use tandem_domain::repository::PrintHistoryRepository;
use tandem_types::Result;
use tracing::{debug, warn};

use crate::Store;

/// Stored format of `print_date`
pub const PRINT_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

const ENTRY_COLUMNS: &str = "ph.id AS id, ph.order_id AS order_id, ph.print_date AS print_date,
    ph.customer AS customer, ph.brand AS brand, ph.number AS number,
    ph.contract_number AS contract_number, ph.pdf_path AS pdf_path";

/// Append-only print log
#[derive(Debug, Clone)]
pub struct SqlitePrintHistoryRepository {
    store: Store,
}

impl SqlitePrintHistoryRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl PrintHistoryRepository for SqlitePrintHistoryRepository {
    fn append(&self, entry: &NewPrintHistoryEntry) -> Result<PrintHistoryEntry> {
        let print_date = entry.printed_at.format(PRINT_DATE_FORMAT).to_string();
        let conn = self.store.connect()?;
        conn.execute(
            "INSERT INTO print_history (order_id, print_date, customer, brand, number, contract_number, pdf_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.order_id,
                print_date,
                entry.customer,
                entry.brand,
                entry.plate_number,
                entry.contract_number,
                entry.document_path.to_string_lossy(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(history_id = id, order_id = entry.order_id, "Appended print history entry");

        Ok(PrintHistoryEntry {
            id,
            order_id: Some(entry.order_id),
            printed_at: Some(entry.printed_at),
            print_date,
            customer: entry.customer.clone(),
            brand: entry.brand.clone(),
            plate_number: entry.plate_number.clone(),
            contract_number: entry.contract_number.clone(),
            document_path: entry.document_path.clone(),
        })
    }

    fn find_by_id(&self, id: i64) -> Result<Option<PrintHistoryEntry>> {
        let conn = self.store.connect()?;
        let entry = conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM print_history ph WHERE ph.id = ?1"),
                [id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn find_all(&self) -> Result<Vec<PrintHistoryRecord>> {
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS}, o.id AS current_id, o.contract_number AS current_contract, o.type AS current_type
             FROM print_history ph
             LEFT JOIN orders o ON o.id = ph.order_id
             ORDER BY ph.id DESC"
        ))?;
        let records = stmt
            .query_map([], |row| {
                Ok(PrintHistoryRecord {
                    entry: entry_from_row(row)?,
                    order_found: row.get::<_, Option<i64>>("current_id")?.is_some(),
                    current_contract_number: row.get("current_contract")?,
                    current_vehicle_type: row.get("current_type")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.store.connect()?;
        let deleted = conn.execute("DELETE FROM print_history WHERE id = ?1", [id])?;
        debug!(history_id = id, deleted = deleted > 0, "Deleted print history entry");
        Ok(deleted > 0)
    }
}

fn parse_print_date(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, PRINT_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<PrintHistoryEntry> {
    let id: i64 = row.get("id")?;
    let print_date: String = row.get::<_, Option<String>>("print_date")?.unwrap_or_default();
    let printed_at = parse_print_date(print_date.trim());
    if printed_at.is_none() {
        warn!(history_id = id, print_date = %print_date, "Unreadable print date");
    }
    let text = |column: &str| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
    };

    Ok(PrintHistoryEntry {
        id,
        order_id: row.get("order_id")?,
        printed_at,
        print_date,
        customer: text("customer")?,
        brand: text("brand")?,
        plate_number: text("number")?,
        contract_number: text("contract_number")?,
        document_path: PathBuf::from(text("pdf_path")?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tandem_domain::repository::OrderRepository;

    fn printed_at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_append_and_list_newest_first() {
        let (_dir, store) = temp_store();
        let order_id = store.orders().find_all().unwrap()[0].id.unwrap();
        let order = store.orders().find_by_id(order_id).unwrap().unwrap();
        let repo = store.print_history();

        let first = repo
            .append(&NewPrintHistoryEntry::snapshot(
                order_id,
                &order,
                PathBuf::from("/tmp/report_1.pdf"),
                printed_at(10),
            ))
            .unwrap();
        let second = repo
            .append(&NewPrintHistoryEntry::snapshot(
                order_id,
                &order,
                PathBuf::from("/tmp/report_2.pdf"),
                printed_at(11),
            ))
            .unwrap();

        let records = repo.find_all().unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.entry.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(records[1].entry, first);
        assert!(records[0].order_found);
        assert_eq!(records[0].current_contract_number.as_deref(), Some("20250407"));
        assert_eq!(records[0].current_vehicle_type.as_deref(), Some("Passenger"));
        assert_eq!(repo.find_by_id(first.id).unwrap(), Some(first));
    }

    #[test]
    fn test_orphaned_entry_has_no_current_order() {
        let (_dir, store) = temp_store();
        store
            .connect()
            .unwrap()
            .execute(
                "INSERT INTO print_history (order_id, print_date, customer, pdf_path)
                 VALUES (424242, '02.04.2025 12:30:00', 'Gone LLC', 'gone.pdf')",
                [],
            )
            .unwrap();

        let records = store.print_history().find_all().unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].order_found);
        assert_eq!(records[0].current_contract_number, None);
        assert_eq!(records[0].entry.customer, "Gone LLC");
        assert_eq!(records[0].entry.printed_at, Some(printed_at(12)));
        assert_eq!(records[0].entry.print_date, "02.04.2025 12:30:00");
    }

    #[test]
    fn test_delete_entry() {
        let (_dir, store) = temp_store();
        let order = store.orders().find_all().unwrap().remove(0);
        let repo = store.print_history();
        let entry = repo
            .append(&NewPrintHistoryEntry::snapshot(
                order.id.unwrap(),
                &order,
                PathBuf::from("a.pdf"),
                printed_at(9),
            ))
            .unwrap();

        assert!(repo.delete(entry.id).unwrap());
        assert!(!repo.delete(entry.id).unwrap());
        assert_eq!(repo.find_by_id(entry.id).unwrap(), None);
    }

    #[test]
    fn test_missing_print_date_does_not_break_listing() {
        let (_dir, store) = temp_store();
        let order = store.orders().find_all().unwrap().remove(0);
        let repo = store.print_history();
        let good = repo
            .append(&NewPrintHistoryEntry::snapshot(
                order.id.unwrap(),
                &order,
                PathBuf::from("good.pdf"),
                printed_at(8),
            ))
            .unwrap();
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO print_history (order_id, print_date, customer, pdf_path)
             VALUES (?1, NULL, 'Old LLC', 'old.pdf')",
            [order.id.unwrap()],
        )
        .unwrap();
        let undated = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO print_history (order_id, print_date, customer, pdf_path)
             VALUES (?1, 'yesterday', 'Older LLC', 'older.pdf')",
            [order.id.unwrap()],
        )
        .unwrap();
        let garbled = conn.last_insert_rowid();

        let records = repo.find_all().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].entry.id, garbled);
        assert_eq!(records[0].entry.printed_at, None);
        assert_eq!(records[0].entry.print_date, "yesterday");
        assert_eq!(records[1].entry.id, undated);
        assert_eq!(records[1].entry.printed_at, None);
        assert_eq!(records[1].entry.print_date, "");
        assert_eq!(records[2].entry, good);

        let entry = repo.find_by_id(undated).unwrap().unwrap();
        assert_eq!(entry.customer, "Old LLC");
        assert!(repo.delete(undated).unwrap());
        assert_eq!(repo.find_all().unwrap().len(), 2);
    }
}
