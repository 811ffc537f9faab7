//! Table definitions and the versioned, per-table schema migration
//!
//! On open, the stored schema version is compared with [`SCHEMA_VERSION`].
//! When behind, every table whose actual column list differs from the
//! expected one is rebuilt: a shadow table with the expected shape is
//! created, the common columns are copied, the old table is dropped and the
//! shadow renamed into place. Each table is rebuilt in its own transaction,
//! so a failure rolls back that table only; tables already migrated stay
//! migrated.

use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use tandem_types::{Error, Result};
use tracing::{debug, info};

use crate::{legacy, seed};

/// Version written by this code
pub const SCHEMA_VERSION: i64 = 3;

/// Expected shape of one table. The first column is always the
/// auto-increment primary key.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [(&'static str, &'static str)],
}

impl TableSpec {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(name, _)| *name).collect()
    }

    /// `CREATE TABLE` statement for this shape under `table_name`
    pub fn create_sql(&self, table_name: &str) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|(name, decl)| format!("{name} {decl}"))
            .collect();
        format!("CREATE TABLE {table_name} ({})", columns.join(", "))
    }
}

const ID: (&str, &str) = ("id", "INTEGER PRIMARY KEY AUTOINCREMENT");

pub const ORDERS: TableSpec = TableSpec {
    name: "orders",
    columns: &[
        ID,
        ("contract_number", "TEXT"),
        ("date", "TEXT"),
        ("acceptance_date", "TEXT"),
        ("work_order_date", "TEXT"),
        ("completion_date", "TEXT"),
        ("type", "TEXT"),
        ("customer", "TEXT"),
        ("number", "TEXT"),
        ("brand", "TEXT"),
        ("refrigerator_brand", "TEXT"),
        ("year", "TEXT"),
        ("mileage", "TEXT"),
        ("phone", "TEXT"),
        ("address", "TEXT"),
        ("preliminary_inspection", "TEXT"),
        ("work_total", "TEXT"),
        ("work_total_with_coeff", "TEXT"),
        ("parts_total", "TEXT"),
        ("equipment_delivered", "TEXT"),
        ("recommendations", "TEXT"),
        ("executor_position", "TEXT"),
        ("executor_name", "TEXT"),
        ("customer_position", "TEXT"),
        ("customer_name", "TEXT"),
        ("coefficient", "TEXT"),
        ("order_total", "TEXT"),
    ],
};

pub const LINE_ITEMS: TableSpec = TableSpec {
    name: "line_items",
    columns: &[
        ID,
        ("order_id", "INTEGER"),
        ("kind", "TEXT"),
        ("position", "INTEGER"),
        ("name", "TEXT"),
        ("unit", "TEXT"),
        ("quantity", "TEXT"),
        ("price_per_unit", "TEXT"),
        ("equipment_param1", "TEXT"),
        ("equipment_param2", "TEXT"),
    ],
};

pub const WORK_CATALOG: TableSpec = TableSpec {
    name: "work_catalog",
    columns: &[ID, ("name", "TEXT"), ("unit", "TEXT"), ("price", "TEXT")],
};

pub const MATERIAL_CATALOG: TableSpec = TableSpec {
    name: "material_catalog",
    columns: &[ID, ("name", "TEXT"), ("unit", "TEXT"), ("price", "TEXT")],
};

pub const PRINT_HISTORY: TableSpec = TableSpec {
    name: "print_history",
    columns: &[
        ID,
        ("order_id", "INTEGER"),
        ("print_date", "TEXT"),
        ("customer", "TEXT"),
        ("brand", "TEXT"),
        ("number", "TEXT"),
        ("contract_number", "TEXT"),
        ("pdf_path", "TEXT"),
    ],
};

/// Tables checked by the migration, in migration order
pub const TABLES: [TableSpec; 5] = [ORDERS, PRINT_HISTORY, LINE_ITEMS, WORK_CATALOG, MATERIAL_CATALOG];

const CREATE_SCHEMA_VERSION: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL
)";

/// Bring the store up to [`SCHEMA_VERSION`]
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(CREATE_SCHEMA_VERSION)?;

    let current = current_version(conn)?;
    if current >= SCHEMA_VERSION {
        debug!(version = current, "Store schema is up to date");
        return Ok(());
    }
    info!(from = current, to = SCHEMA_VERSION, "Migrating store schema");

    let fresh = !table_exists(conn, ORDERS.name)? && !table_exists(conn, legacy::VEHICLES)?;
    let imported_legacy = legacy::import(conn)?;

    for spec in TABLES {
        migrate_table(conn, &spec)?;
    }

    if imported_legacy {
        legacy::backfill(conn)?;
    }
    if fresh {
        seed::seed(conn)?;
    }

    conn.execute(
        "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
        params![SCHEMA_VERSION, Local::now().format("%d.%m.%Y %H:%M:%S").to_string()],
    )?;
    info!(version = SCHEMA_VERSION, "Store schema migrated");
    Ok(())
}

/// Highest recorded schema version, 0 when none
pub fn current_version(conn: &Connection) -> Result<i64> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }
    let version: Option<i64> = conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version.unwrap_or(0))
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |_| Ok(true),
        )
        .optional()?;
    Ok(found.unwrap_or(false))
}

/// Column names in declaration order; empty when the table is missing
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

fn migrate_table(conn: &mut Connection, spec: &TableSpec) -> Result<()> {
    let actual = table_columns(conn, spec.name)?;
    if actual.is_empty() {
        debug!(table = spec.name, "Creating table");
        conn.execute_batch(&spec.create_sql(spec.name))
            .map_err(|source| migration_error(spec, source))?;
        return Ok(());
    }

    let expected = spec.column_names();
    if actual == expected {
        return Ok(());
    }

    info!(table = spec.name, ?actual, "Rebuilding table with the current columns");
    let tx = conn
        .transaction()
        .map_err(|source| migration_error(spec, source))?;
    rebuild_table(&tx, spec, &actual).map_err(|source| migration_error(spec, source))?;
    tx.commit().map_err(|source| migration_error(spec, source))?;
    Ok(())
}

fn rebuild_table(conn: &Connection, spec: &TableSpec, actual: &[String]) -> rusqlite::Result<()> {
    let shadow = format!("{}_shadow", spec.name);
    let common: Vec<&str> = spec
        .column_names()
        .into_iter()
        .filter(|name| actual.iter().any(|col| col == name))
        .collect();

    conn.execute_batch(&format!("DROP TABLE IF EXISTS {shadow}"))?;
    conn.execute_batch(&spec.create_sql(&shadow))?;
    if !common.is_empty() {
        let columns = common.join(", ");
        conn.execute_batch(&format!(
            "INSERT INTO {shadow} ({columns}) SELECT {columns} FROM {}",
            spec.name
        ))?;
    }
    conn.execute_batch(&format!("DROP TABLE {}", spec.name))?;
    conn.execute_batch(&format!("ALTER TABLE {shadow} RENAME TO {}", spec.name))?;
    Ok(())
}

fn migration_error(spec: &TableSpec, source: rusqlite::Error) -> Error {
    Error::Migration {
        table: spec.name.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fresh_store_has_current_shape() {
        let (_dir, store) = temp_store();
        let conn = store.connect().unwrap();
        for spec in TABLES {
            assert_eq!(table_columns(&conn, spec.name).unwrap(), spec.column_names());
        }
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let (_dir, store) = temp_store();
        let mut conn = store.connect().unwrap();
        migrate(&mut conn).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_rebuild_keeps_common_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE work_catalog (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, price TEXT, obsolete TEXT);
                 INSERT INTO work_catalog (id, name, price, obsolete) VALUES (30000, 'Diagnostics', '500', 'x');
                 CREATE TABLE schema_version (id INTEGER PRIMARY KEY AUTOINCREMENT, version INTEGER NOT NULL, applied_at TEXT NOT NULL);
                 INSERT INTO schema_version (version, applied_at) VALUES (2, 'then');",
            )
            .unwrap();
        }

        let store = crate::Store::open(&path).unwrap();
        let conn = store.connect().unwrap();
        assert_eq!(
            table_columns(&conn, "work_catalog").unwrap(),
            WORK_CATALOG.column_names()
        );
        let (name, unit, price): (String, Option<String>, String) = conn
            .query_row(
                "SELECT name, unit, price FROM work_catalog WHERE id = 30000",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(name, "Diagnostics");
        assert_eq!(unit, None);
        assert_eq!(price, "500");
        assert!(!table_exists(&conn, "work_catalog_shadow").unwrap());
    }

    #[test]
    fn test_failed_table_rebuild_keeps_earlier_tables_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE orders (id INTEGER PRIMARY KEY AUTOINCREMENT, contract_number TEXT, customer TEXT);
                 INSERT INTO orders (id, contract_number, customer) VALUES (1, 'C-1', 'Test LLC');
                 CREATE TABLE line_items (id TEXT, order_id INTEGER, name TEXT);
                 INSERT INTO line_items (id, order_id, name) VALUES ('not-a-number', 1, 'Oil change');
                 CREATE TABLE schema_version (id INTEGER PRIMARY KEY AUTOINCREMENT, version INTEGER NOT NULL, applied_at TEXT NOT NULL);
                 INSERT INTO schema_version (version, applied_at) VALUES (2, 'then');",
            )
            .unwrap();
        }

        let err = crate::Store::open(&path).unwrap_err();
        assert!(matches!(err, Error::Migration { ref table, .. } if table == "line_items"));

        let conn = Connection::open(&path).unwrap();
        assert_eq!(table_columns(&conn, "orders").unwrap(), ORDERS.column_names());
        assert_eq!(
            table_columns(&conn, "print_history").unwrap(),
            PRINT_HISTORY.column_names()
        );
        let customer: String = conn
            .query_row("SELECT customer FROM orders WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(customer, "Test LLC");

        assert_eq!(table_columns(&conn, "line_items").unwrap(), vec!["id", "order_id", "name"]);
        assert!(!table_exists(&conn, "line_items_shadow").unwrap());
        assert_eq!(current_version(&conn).unwrap(), 2);
    }

    #[test]
    fn test_create_sql() {
        assert_eq!(
            WORK_CATALOG.create_sql("tmp"),
            "CREATE TABLE tmp (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, unit TEXT, price TEXT)"
        );
    }
}
