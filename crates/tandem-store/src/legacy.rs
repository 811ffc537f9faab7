//! Conversion of stores written by the first (pre-Rust) release.
//!
//! That release kept orders in `vehicles`, catalogs in `works` and
//! `materials`, and both kinds of line items in `materials_and_works`, where
//! a row was a material when its `material` column was non-empty and a work
//! otherwise. Print history pointed at orders through `vehicle_id`.

use rusqlite::Connection;
use tandem_types::{Error, Result};
use tracing::info;

use crate::schema::{self, TableSpec, LINE_ITEMS, MATERIAL_CATALOG, ORDERS, PRINT_HISTORY, WORK_CATALOG};

pub const VEHICLES: &str = "vehicles";
const MATERIALS_AND_WORKS: &str = "materials_and_works";
const WORKS: &str = "works";
const MATERIALS: &str = "materials";

/// Rename or convert legacy tables into the current names. Returns whether
/// anything was imported. Column shapes are fixed afterwards by the regular
/// per-table migration.
pub fn import(conn: &mut Connection) -> Result<bool> {
    let mut imported = false;

    for (legacy, current) in [(VEHICLES, ORDERS), (WORKS, WORK_CATALOG), (MATERIALS, MATERIAL_CATALOG)] {
        if schema::table_exists(conn, legacy)? && !schema::table_exists(conn, current.name)? {
            info!(from = legacy, to = current.name, "Importing legacy table");
            conn.execute_batch(&format!("ALTER TABLE {legacy} RENAME TO {}", current.name))
                .map_err(|source| legacy_error(&current, source))?;
            imported = true;
        }
    }

    if schema::table_exists(conn, MATERIALS_AND_WORKS)? && !schema::table_exists(conn, LINE_ITEMS.name)? {
        info!(from = MATERIALS_AND_WORKS, to = LINE_ITEMS.name, "Splitting legacy line items");
        let tx = conn.transaction()?;
        split_line_items(&tx).map_err(|source| legacy_error(&LINE_ITEMS, source))?;
        tx.commit()?;
        imported = true;
    }

    let history_columns = schema::table_columns(conn, PRINT_HISTORY.name)?;
    if history_columns.iter().any(|c| c == "vehicle_id") && !history_columns.iter().any(|c| c == "order_id") {
        info!(table = PRINT_HISTORY.name, "Renaming legacy vehicle_id column");
        conn.execute_batch("ALTER TABLE print_history RENAME COLUMN vehicle_id TO order_id")
            .map_err(|source| legacy_error(&PRINT_HISTORY, source))?;
        imported = true;
    }

    Ok(imported)
}

/// Fill columns that did not exist in the legacy schema
pub fn backfill(conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE print_history
         SET contract_number = (SELECT o.contract_number FROM orders o WHERE o.id = print_history.order_id)
         WHERE contract_number IS NULL",
        [],
    )
    .map_err(|source| legacy_error(&PRINT_HISTORY, source))?;
    Ok(())
}

fn split_line_items(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&LINE_ITEMS.create_sql(LINE_ITEMS.name))?;
    conn.execute_batch(
        "INSERT INTO line_items
            (order_id, kind, position, name, unit, quantity, price_per_unit, equipment_param1, equipment_param2)
         SELECT
            vehicle_id,
            CASE WHEN COALESCE(material, '') <> '' THEN 'material' ELSE 'work' END,
            id,
            CASE WHEN COALESCE(material, '') <> '' THEN material ELSE work END,
            unit,
            quantity,
            price_per_unit,
            CASE WHEN COALESCE(material, '') <> '' THEN NULL ELSE equipment_param1 END,
            CASE WHEN COALESCE(material, '') <> '' THEN NULL ELSE equipment_param2 END
         FROM materials_and_works
         ORDER BY id",
    )?;
    conn.execute_batch("DROP TABLE materials_and_works")?;
    Ok(())
}

fn legacy_error(spec: &TableSpec, source: rusqlite::Error) -> Error {
    Error::Migration {
        table: spec.name.to_string(),
        source,
    }
}
