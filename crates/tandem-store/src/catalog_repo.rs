//! SQLite implementation of [`CatalogRepository`]

use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use tandem_domain::model::{CatalogEntry, IdBand, NewCatalogEntry};
use tandem_domain::repository::CatalogRepository;
use tandem_domain::service::numeric::{format_money, parse_amount};
use tandem_types::{CatalogKind, Result};
use tracing::{debug, warn};

use crate::Store;

/// Work and material catalogs
#[derive(Debug, Clone)]
pub struct SqliteCatalogRepository {
    store: Store,
}

impl SqliteCatalogRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl CatalogRepository for SqliteCatalogRepository {
    fn find_all(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>> {
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, name, unit, price FROM {} ORDER BY id",
            table_name(kind)
        ))?;
        let entries = stmt
            .query_map([], |row| entry_from_row(kind, row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn add_entry(&self, kind: CatalogKind, entry: &NewCatalogEntry) -> Result<CatalogEntry> {
        let mut conn = self.store.connect()?;
        let tx = conn.transaction()?;
        let added = insert_entry(&tx, kind, entry)?;
        tx.commit()?;

        debug!(catalog = %kind, id = added.id, name = %added.name, "Added catalog entry");
        Ok(added)
    }

    fn remove_entry(&self, kind: CatalogKind, id: i64) -> Result<bool> {
        let conn = self.store.connect()?;
        let removed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", table_name(kind)),
            [id],
        )?;
        debug!(catalog = %kind, id, removed = removed > 0, "Removed catalog entry");
        Ok(removed > 0)
    }
}

fn table_name(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Works => "work_catalog",
        CatalogKind::Materials => "material_catalog",
    }
}

pub(crate) fn count(conn: &Connection, kind: CatalogKind) -> Result<i64> {
    let count = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", table_name(kind)),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Insert with the next id of the catalog's band. The caller owns the
/// transaction, so allocation and insert cannot interleave with another
/// writer.
pub(crate) fn insert_entry(
    conn: &Connection,
    kind: CatalogKind,
    entry: &NewCatalogEntry,
) -> Result<CatalogEntry> {
    let table = table_name(kind);
    let band = IdBand::for_catalog(kind);
    let id = band.next_after(high_water(conn, table, band)?)?;

    conn.execute(
        &format!("INSERT INTO {table} (id, name, unit, price) VALUES (?1, ?2, ?3, ?4)"),
        params![id, entry.name, entry.unit, format_money(entry.default_price)],
    )?;

    Ok(CatalogEntry {
        id,
        kind,
        name: entry.name.clone(),
        unit: entry.unit.clone(),
        default_price: entry.default_price,
    })
}

/// Highest id ever used in the band: the larger of the current maximum and
/// the table's AUTOINCREMENT sequence, so removed ids are not handed out
/// again.
fn high_water(conn: &Connection, table: &str, band: IdBand) -> Result<Option<i64>> {
    let max: Option<i64> = conn.query_row(
        &format!("SELECT MAX(id) FROM {table} WHERE id BETWEEN ?1 AND ?2"),
        [band.floor, band.ceiling],
        |row| row.get(0),
    )?;
    let seq: Option<i64> = conn
        .query_row(
            "SELECT seq FROM sqlite_sequence WHERE name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?
        .filter(|seq| band.contains(*seq));
    Ok(max.max(seq))
}

fn entry_from_row(kind: CatalogKind, row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    let id: i64 = row.get("id")?;
    let price: Option<String> = row.get("price")?;
    let default_price = match price.as_deref() {
        Some(text) => parse_amount(text),
        None => Decimal::ZERO,
    };
    if !IdBand::for_catalog(kind).contains(id) {
        warn!(catalog = %kind, id, "Catalog entry id outside its band");
    }
    Ok(CatalogEntry {
        id,
        kind,
        name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
        unit: row.get::<_, Option<String>>("unit")?.unwrap_or_default(),
        default_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn entry(name: &str, price: Decimal) -> NewCatalogEntry {
        NewCatalogEntry {
            name: name.to_string(),
            unit: "pcs".to_string(),
            default_price: price,
        }
    }

    #[test]
    fn test_add_entry_allocates_within_band() {
        let (_dir, store) = temp_store();
        let repo = store.catalogs();
        let existing = repo.find_all(CatalogKind::Materials).unwrap();
        let last = existing.last().map(|e| e.id).unwrap();

        let added = repo
            .add_entry(CatalogKind::Materials, &entry("Compressor oil", dec!(850.5)))
            .unwrap();
        assert_eq!(added.id, last + 1);
        assert!(IdBand::MATERIALS.contains(added.id));

        let found = repo.find_all(CatalogKind::Materials).unwrap();
        assert_eq!(found.last(), Some(&added));
    }

    #[test]
    fn test_empty_catalog_starts_at_floor() {
        let (_dir, store) = temp_store();
        store
            .connect()
            .unwrap()
            .execute_batch("DROP TABLE work_catalog; CREATE TABLE work_catalog (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, unit TEXT, price TEXT);")
            .unwrap();

        let repo = store.catalogs();
        let first = repo.add_entry(CatalogKind::Works, &entry("Diagnostics", dec!(500))).unwrap();
        let second = repo.add_entry(CatalogKind::Works, &entry("Refill", dec!(700))).unwrap();
        assert_eq!((first.id, second.id), (30_000, 30_001));
    }

    #[test]
    fn test_removed_id_is_not_reused() {
        let (_dir, store) = temp_store();
        let repo = store.catalogs();
        let added = repo.add_entry(CatalogKind::Works, &entry("Refill", dec!(700))).unwrap();

        assert!(repo.remove_entry(CatalogKind::Works, added.id).unwrap());
        assert!(!repo.remove_entry(CatalogKind::Works, added.id).unwrap());

        let next = repo.add_entry(CatalogKind::Works, &entry("Refill", dec!(700))).unwrap();
        assert_eq!(next.id, added.id + 1);
    }

    #[test]
    fn test_exhausted_band_is_an_error() {
        let (_dir, store) = temp_store();
        store
            .connect()
            .unwrap()
            .execute("INSERT INTO material_catalog (id, name) VALUES (29999, 'Last')", [])
            .unwrap();

        let err = store
            .catalogs()
            .add_entry(CatalogKind::Materials, &entry("Overflow", dec!(1)))
            .unwrap_err();
        assert!(matches!(err, tandem_types::Error::IdBandExhausted { band: "material catalog" }));
    }
}
