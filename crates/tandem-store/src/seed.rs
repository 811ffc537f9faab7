//! Initial content of a brand-new store

use rusqlite::Connection;
use rust_decimal::Decimal;
use tandem_domain::model::{LineField, NewCatalogEntry, Order};
use tandem_types::{CatalogKind, LineKind, Result};
use tracing::info;

use crate::{catalog_repo, order_repo};

const WORKS: &[(&str, &str, i64)] = &[
    ("Nitrogen leak test of A/C system (1 circuit)", "pcs", 500),
    ("Nitrogen leak test of A/C system (2 circuits)", "pcs", 1000),
    ("Micro-leak search", "pcs", 250),
    ("System vacuuming", "pcs", 500),
    ("Pulley bearing replacement (compressor removed)", "pcs", 500),
    ("Tensioner roller bearing replacement", "pcs", 500),
    ("Compressor shaft seal replacement", "pcs", 2000),
    ("Solenoid valve replacement (compressor removed)", "pcs", 1500),
    ("Solenoid valve replacement in place", "pcs", 2000),
    ("Complete compressor overhaul", "pcs", 5600),
    ("System oil charge", "pcs", 500),
    ("Gasket replacement (2 pcs)", "pcs", 300),
    ("Wiring, terminal and relay replacement", "pcs", 300),
    ("Fuse replacement", "pcs", 300),
    ("Pressure sensor replacement", "pcs", 1100),
    ("Condenser fan replacement", "pcs", 1100),
    ("4 (5) pin relay Denso, Toyota (12V)", "pcs", 400),
    ("Troubleshooting", "pcs", 1000),
    ("Diagnostics", "pcs", 500),
];

const MATERIALS: &[(&str, &str, i64)] = &[
    ("Magnetic clutch coil TM", "pcs", 0),
    ("Magnetic clutch coil Denso", "pcs", 0),
    ("Pulley with pressure plate SD", "pcs", 0),
    ("Pulley with pressure plate Denso", "pcs", 0),
    ("A/C receiver drier (condenser mounted)", "pcs", 0),
    ("Flushing filter cartridge", "pcs", 0),
];

/// Seed every empty table: both catalogs and one sample order
pub fn seed(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;

    for (kind, entries) in [(CatalogKind::Works, WORKS), (CatalogKind::Materials, MATERIALS)] {
        if catalog_repo::count(&tx, kind)? > 0 {
            continue;
        }
        for (name, unit, price) in entries {
            let entry = NewCatalogEntry {
                name: name.to_string(),
                unit: unit.to_string(),
                default_price: Decimal::from(*price),
            };
            catalog_repo::insert_entry(&tx, kind, &entry)?;
        }
        info!(catalog = %kind, entries = entries.len(), "Seeded catalog");
    }

    let orders: i64 = tx.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
    if orders == 0 {
        let id = order_repo::write_order(&tx, &sample_order())?;
        info!(order_id = id, "Seeded sample order");
    }

    tx.commit()?;
    Ok(())
}

fn sample_order() -> Order {
    let mut order = Order::default();
    order.contract_number = "20250407".to_string();
    order.date = "01.04.2025".to_string();
    order.acceptance_date = "02.04.2025".to_string();
    order.work_order_date = "03.04.2025".to_string();
    order.completion_date = "04.04.2025".to_string();
    order.vehicle_type = "Passenger".to_string();
    order.customer = "Test LLC".to_string();
    order.plate_number = "A123BC".to_string();
    order.brand = "Toyota".to_string();
    order.refrigerator_brand = "Thermo King".to_string();
    order.year = "2020".to_string();
    order.mileage = "150000".to_string();
    order.phone = "+71234567890".to_string();
    order.address = "1 Test Street, Novokuznetsk".to_string();
    order.preliminary_inspection = "Engine fault".to_string();
    order.equipment_delivered = "Ivanov I.I.".to_string();
    order.recommendations = "Check the cooling system".to_string();
    order.executor_position = "Foreman".to_string();
    order.executor_name = "Petrov P.P.".to_string();
    order.customer_position = "Client".to_string();
    order.customer_name = "Sidorov S.S.".to_string();

    let lines: [(LineKind, &str, &str, &str, &str); 4] = [
        (LineKind::Work, "Oil change", "svc", "1", "1500"),
        (LineKind::Work, "Engine diagnostics", "svc", "1", "2000"),
        (LineKind::Material, "Engine oil", "l", "5", "1000"),
        (LineKind::Material, "Oil filter", "pcs", "1", "500"),
    ];
    for (kind, name, unit, quantity, price) in lines {
        let table = order.table_mut(kind);
        let pos = match table.rows().iter().position(|row| row.is_blank()) {
            Some(pos) => pos,
            None => table.add_row(),
        };
        table.set_field(pos, LineField::Name, name);
        table.set_field(pos, LineField::Unit, unit);
        table.set_field(pos, LineField::Quantity, quantity);
        table.set_field(pos, LineField::UnitPrice, price);
    }
    order
}

#[cfg(test)]
mod tests {
    use crate::test_support::temp_store;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tandem_domain::model::IdBand;
    use tandem_domain::repository::{CatalogRepository, OrderRepository};
    use tandem_types::CatalogKind;

    #[test]
    fn test_fresh_store_is_seeded() {
        let (_dir, store) = temp_store();

        let works = store.catalogs().find_all(CatalogKind::Works).unwrap();
        assert_eq!(works.len(), 19);
        assert_eq!(works[0].id, IdBand::WORKS.floor);
        assert_eq!(works[18].name, "Diagnostics");
        assert_eq!(works[18].default_price, dec!(500));

        let materials = store.catalogs().find_all(CatalogKind::Materials).unwrap();
        assert_eq!(materials.len(), 6);
        assert!(materials.iter().all(|m| IdBand::MATERIALS.contains(m.id)));

        let orders = store.orders().find_all().unwrap();
        assert_eq!(orders.len(), 1);
        let totals = orders[0].totals();
        assert_eq!(totals.work_total, dec!(3500));
        assert_eq!(totals.work_total_with_coeff, dec!(4200));
        assert_eq!(totals.materials_total, dec!(5500));
        assert_eq!(totals.order_total, dec!(9700));
    }
}
