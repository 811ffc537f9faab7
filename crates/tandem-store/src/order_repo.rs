//! SQLite implementation of [`OrderRepository`]

use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use tandem_domain::model::{IdBand, LineItem, LineItemTable, Order, DEFAULT_COEFFICIENT};
use tandem_domain::repository::OrderRepository;
use tandem_domain::service::numeric::format_money;
use tandem_types::{Error, LineKind, Result, ValidationError};
use tracing::{debug, warn};

use crate::Store;

const ORDER_COLUMNS: &str = "id, contract_number, date, acceptance_date, work_order_date, completion_date,
    type, customer, number, brand, refrigerator_brand, year, mileage, phone, address,
    preliminary_inspection, equipment_delivered, recommendations, executor_position, executor_name,
    customer_position, customer_name, coefficient";

/// Orders and their line items
#[derive(Debug, Clone)]
pub struct SqliteOrderRepository {
    store: Store,
}

impl SqliteOrderRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl OrderRepository for SqliteOrderRepository {
    fn save(&self, order: &Order) -> Result<i64> {
        order.validate()?;

        let mut conn = self.store.connect()?;
        let tx = conn.transaction()?;
        let id = write_order(&tx, order)?;
        tx.commit()?;

        debug!(order_id = id, contract = %order.contract_number, "Saved order");
        Ok(id)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        let conn = self.store.connect()?;
        let order = conn
            .query_row(
                &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"),
                [id],
                order_from_row,
            )
            .optional()?;

        match order {
            Some(mut order) => {
                load_line_items(&conn, id, &mut order)?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    fn find_all(&self) -> Result<Vec<Order>> {
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"))?;
        let mut orders = stmt
            .query_map([], order_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for order in &mut orders {
            if let Some(id) = order.id {
                load_line_items(&conn, id, order)?;
            }
        }
        Ok(orders)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let mut conn = self.store.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM line_items WHERE order_id = ?1", [id])?;
        let history = tx.execute("DELETE FROM print_history WHERE order_id = ?1", [id])?;
        let deleted = tx.execute("DELETE FROM orders WHERE id = ?1", [id])?;
        tx.commit()?;

        debug!(order_id = id, deleted = deleted > 0, history_rows = history, "Deleted order");
        Ok(deleted > 0)
    }
}

/// Duplicate check, upsert and full line-item replacement. The caller owns
/// the transaction.
pub(crate) fn write_order(conn: &Connection, order: &Order) -> Result<i64> {
    let contract = order.contract_number.trim();
    let duplicate: Option<i64> = conn
        .query_row(
            "SELECT id FROM orders WHERE TRIM(contract_number) = ?1 AND (?2 IS NULL OR id <> ?2) LIMIT 1",
            params![contract, order.id],
            |row| row.get(0),
        )
        .optional()?;
    if duplicate.is_some() {
        return Err(ValidationError::DuplicateContractNumber(contract.to_string()).into());
    }

    let totals = order.recorded_totals();
    let work_total = format_money(totals.work_total);
    let work_total_with_coeff = format_money(totals.work_total_with_coeff);
    let materials_total = format_money(totals.materials_total);
    let order_total = format_money(totals.order_total);
    let fields: [&dyn ToSql; 26] = [
        &order.contract_number,
        &order.date,
        &order.acceptance_date,
        &order.work_order_date,
        &order.completion_date,
        &order.vehicle_type,
        &order.customer,
        &order.plate_number,
        &order.brand,
        &order.refrigerator_brand,
        &order.year,
        &order.mileage,
        &order.phone,
        &order.address,
        &order.preliminary_inspection,
        &work_total,
        &work_total_with_coeff,
        &materials_total,
        &order.equipment_delivered,
        &order.recommendations,
        &order.executor_position,
        &order.executor_name,
        &order.customer_position,
        &order.customer_name,
        &order.coefficient,
        &order_total,
    ];
    let mut values = fields.to_vec();

    let id = match &order.id {
        None => {
            conn.execute(
                "INSERT INTO orders (contract_number, date, acceptance_date, work_order_date, completion_date,
                    type, customer, number, brand, refrigerator_brand, year, mileage, phone, address,
                    preliminary_inspection, work_total, work_total_with_coeff, parts_total,
                    equipment_delivered, recommendations, executor_position, executor_name,
                    customer_position, customer_name, coefficient, order_total)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                    ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26)",
                values.as_slice(),
            )?;
            conn.last_insert_rowid()
        }
        Some(id) => {
            values.push(id);
            let updated = conn.execute(
                "UPDATE orders SET contract_number = ?1, date = ?2, acceptance_date = ?3,
                    work_order_date = ?4, completion_date = ?5, type = ?6, customer = ?7, number = ?8,
                    brand = ?9, refrigerator_brand = ?10, year = ?11, mileage = ?12, phone = ?13,
                    address = ?14, preliminary_inspection = ?15, work_total = ?16,
                    work_total_with_coeff = ?17, parts_total = ?18, equipment_delivered = ?19,
                    recommendations = ?20, executor_position = ?21, executor_name = ?22,
                    customer_position = ?23, customer_name = ?24, coefficient = ?25, order_total = ?26
                 WHERE id = ?27",
                values.as_slice(),
            )?;
            if updated == 0 {
                return Err(Error::NotFound(format!("Order {id}")));
            }
            *id
        }
    };

    conn.execute("DELETE FROM line_items WHERE order_id = ?1", [id])?;
    for table in [&order.work_table, &order.materials_table] {
        insert_line_items(conn, id, table)?;
    }
    Ok(id)
}

fn insert_line_items(conn: &Connection, order_id: i64, table: &LineItemTable) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO line_items (id, order_id, kind, position, name, unit, quantity, price_per_unit,
            equipment_param1, equipment_param2)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;
    for (position, item) in table.filled_rows().enumerate() {
        let id = next_line_item_id(conn)?;
        stmt.execute(params![
            id,
            order_id,
            table.kind().as_str(),
            position as i64 + 1,
            item.name(),
            item.unit(),
            item.quantity(),
            item.unit_price(),
            item.equipment_param1(),
            item.equipment_param2(),
        ])?;
    }
    Ok(())
}

/// `MAX(id) + 1` within the line-item band, else the lowest free id in it
fn next_line_item_id(conn: &Connection) -> Result<i64> {
    let band = IdBand::LINE_ITEMS;
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(id) FROM line_items WHERE id BETWEEN ?1 AND ?2",
        [band.floor, band.ceiling],
        |row| row.get(0),
    )?;
    match band.next_after(max) {
        Err(Error::IdBandExhausted { .. }) => lowest_free_line_item_id(conn, band),
        other => other,
    }
}

fn lowest_free_line_item_id(conn: &Connection, band: IdBand) -> Result<i64> {
    let floor_taken: bool = conn
        .query_row("SELECT 1 FROM line_items WHERE id = ?1", [band.floor], |_| Ok(true))
        .optional()?
        .unwrap_or(false);
    if !floor_taken {
        return Ok(band.floor);
    }

    let gap: Option<i64> = conn.query_row(
        "SELECT MIN(a.id) + 1 FROM line_items a
         WHERE a.id BETWEEN ?1 AND ?2 - 1
           AND NOT EXISTS (SELECT 1 FROM line_items b WHERE b.id = a.id + 1)",
        [band.floor, band.ceiling],
        |row| row.get(0),
    )?;
    gap.ok_or(Error::IdBandExhausted { band: band.name })
}

fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    let coefficient = row
        .get::<_, Option<String>>("coefficient")?
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COEFFICIENT.to_string());

    let mut order = Order::new(&coefficient);
    order.id = Some(row.get("id")?);
    order.contract_number = text(row, "contract_number")?;
    order.date = text(row, "date")?;
    order.acceptance_date = text(row, "acceptance_date")?;
    order.work_order_date = text(row, "work_order_date")?;
    order.completion_date = text(row, "completion_date")?;
    order.vehicle_type = text(row, "type")?;
    order.customer = text(row, "customer")?;
    order.plate_number = text(row, "number")?;
    order.brand = text(row, "brand")?;
    order.refrigerator_brand = text(row, "refrigerator_brand")?;
    order.year = text(row, "year")?;
    order.mileage = text(row, "mileage")?;
    order.phone = text(row, "phone")?;
    order.address = text(row, "address")?;
    order.preliminary_inspection = text(row, "preliminary_inspection")?;
    order.equipment_delivered = text(row, "equipment_delivered")?;
    order.recommendations = text(row, "recommendations")?;
    order.executor_position = text(row, "executor_position")?;
    order.executor_name = text(row, "executor_name")?;
    order.customer_position = text(row, "customer_position")?;
    order.customer_name = text(row, "customer_name")?;
    Ok(order)
}

fn load_line_items(conn: &Connection, order_id: i64, order: &mut Order) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, name, unit, quantity, price_per_unit, equipment_param1, equipment_param2
         FROM line_items WHERE order_id = ?1 ORDER BY position, id",
    )?;
    let rows = stmt
        .query_map([order_id], |row| {
            Ok((
                row.get::<_, i64>("id")?,
                text(row, "kind")?,
                LineItem::from_parts(
                    LineKind::Work,
                    text(row, "name")?,
                    text(row, "unit")?,
                    text(row, "quantity")?,
                    text(row, "price_per_unit")?,
                    row.get("equipment_param1")?,
                    row.get("equipment_param2")?,
                ),
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut work = Vec::new();
    let mut materials = Vec::new();
    for (id, kind, item) in rows {
        match LineKind::parse(&kind) {
            Some(LineKind::Work) => work.push(item),
            Some(LineKind::Material) => materials.push(item),
            None => warn!(line_item = id, kind = %kind, "Skipping line item of unknown kind"),
        }
    }

    order.work_table = LineItemTable::from_rows(LineKind::Work, work);
    order.materials_table = LineItemTable::from_rows(LineKind::Material, materials);
    Ok(())
}
