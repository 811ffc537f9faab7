//! Excel export of orders and their line items

use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tandem_domain::model::Order;
use tandem_types::{Error, LineKind, Result};

/// Export orders to an `.xlsx` file with an orders sheet and a line items sheet
pub fn export_orders(orders: &[Order], output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let orders_sheet = workbook.add_worksheet();
    write_orders_sheet(orders_sheet, orders)?;

    let lines_sheet = workbook.add_worksheet();
    write_line_items_sheet(lines_sheet, orders)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }
    Ok(())
}

fn write_text(sheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<()> {
    sheet
        .write_string(row, col, value)
        .map_err(|e| Error::Excel(e.to_string()))?;
    Ok(())
}

fn write_money(sheet: &mut Worksheet, row: u32, col: u16, value: Decimal) -> Result<()> {
    sheet
        .write_number(row, col, value.to_f64().unwrap_or_default())
        .map_err(|e| Error::Excel(e.to_string()))?;
    Ok(())
}

fn write_orders_sheet(sheet: &mut Worksheet, orders: &[Order]) -> Result<()> {
    sheet
        .set_name("Orders")
        .map_err(|e| Error::Excel(e.to_string()))?;

    write_headers(
        sheet,
        &[
            "ID",
            "Contract No.",
            "Date",
            "Vehicle type",
            "Customer",
            "Plate number",
            "Brand",
            "Coefficient",
            "Work total",
            "Work total with coefficient",
            "Materials total",
            "Order total",
        ],
    )?;

    for (row_idx, order) in orders.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        let totals = order.recorded_totals();

        if let Some(id) = order.id {
            sheet
                .write_number(row, 0, id as f64)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        write_text(sheet, row, 1, &order.contract_number)?;
        write_text(sheet, row, 2, &order.date)?;
        write_text(sheet, row, 3, &order.vehicle_type)?;
        write_text(sheet, row, 4, &order.customer)?;
        write_text(sheet, row, 5, &order.plate_number)?;
        write_text(sheet, row, 6, &order.brand)?;
        write_text(sheet, row, 7, &order.coefficient)?;
        write_money(sheet, row, 8, totals.work_total)?;
        write_money(sheet, row, 9, totals.work_total_with_coeff)?;
        write_money(sheet, row, 10, totals.materials_total)?;
        write_money(sheet, row, 11, totals.order_total)?;
    }

    Ok(())
}

fn write_line_items_sheet(sheet: &mut Worksheet, orders: &[Order]) -> Result<()> {
    sheet
        .set_name("Line items")
        .map_err(|e| Error::Excel(e.to_string()))?;

    write_headers(
        sheet,
        &[
            "Contract No.",
            "Kind",
            "No.",
            "Name",
            "Unit",
            "Quantity",
            "Unit price",
            "Amount",
            "Equipment param 1",
            "Equipment param 2",
        ],
    )?;

    let mut row = 1u32;
    for order in orders {
        for kind in [LineKind::Work, LineKind::Material] {
            for (idx, item) in order.table(kind).filled_rows().enumerate() {
                write_text(sheet, row, 0, &order.contract_number)?;
                write_text(sheet, row, 1, kind.as_str())?;
                sheet
                    .write_number(row, 2, (idx + 1) as f64)
                    .map_err(|e| Error::Excel(e.to_string()))?;
                write_text(sheet, row, 3, item.name())?;
                write_text(sheet, row, 4, item.unit())?;
                write_money(sheet, row, 5, item.quantity_value())?;
                write_money(sheet, row, 6, item.unit_price_value())?;
                write_money(sheet, row, 7, item.line_total())?;
                write_text(sheet, row, 8, item.equipment_param1().unwrap_or_default())?;
                write_text(sheet, row, 9, item.equipment_param2().unwrap_or_default())?;
                row += 1;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_domain::model::LineField;

    #[test]
    fn test_export_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.xlsx");

        let mut order = Order::default();
        order.id = Some(1);
        order.contract_number = "C-1".to_string();
        order.work_table.set_field(0, LineField::Name, "Diagnostics");
        order.work_table.set_field(0, LineField::Quantity, "1");
        order.work_table.set_field(0, LineField::UnitPrice, "500");

        export_orders(&[order], &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert!(bytes.starts_with(b"PK"));
    }
}
