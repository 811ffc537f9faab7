//! Output formatting module

use serde::Serialize;
use tandem_domain::model::{CatalogEntry, LineItemTable, Order, PrintHistoryRecord};
use tandem_domain::service::numeric::format_money;
use tandem_domain::service::OrderTotals;
use tandem_types::{OutputFormat, Result};

/// Order with its derived totals, as emitted in JSON
#[derive(Serialize)]
struct OrderView<'a> {
    #[serde(flatten)]
    order: &'a Order,
    totals: OrderTotals,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

/// Truncate for fixed-width columns
fn cell(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

pub fn output_order(output_format: OutputFormat, order: &Order) -> Result<()> {
    let totals = order.totals();
    if output_format == OutputFormat::Json {
        return print_json(&OrderView { order, totals });
    }

    println!("\nWork Order {}", order.contract_number);
    println!("==========={}", "=".repeat(order.contract_number.chars().count() + 1));
    if let Some(id) = order.id {
        println!("ID:              {}", id);
    }
    println!("Date:            {}", order.date);
    println!("Customer:        {}", order.customer);
    println!("Address:         {}", order.address);
    println!("Phone:           {}", order.phone);
    println!("Vehicle type:    {}", order.vehicle_type);
    println!("Plate number:    {}", order.plate_number);
    println!("Brand:           {}", order.brand);
    println!("Refrigerator:    {}", order.refrigerator_brand);
    println!("Year / mileage:  {} / {}", order.year, order.mileage);
    println!(
        "Dates:           accepted {}, ordered {}, completed {}",
        order.acceptance_date, order.work_order_date, order.completion_date
    );
    if !order.preliminary_inspection.is_empty() {
        println!("Inspection:      {}", order.preliminary_inspection);
    }
    if !order.recommendations.is_empty() {
        println!("Recommendations: {}", order.recommendations);
    }

    println!("\n--- Works ---");
    print_table(&order.work_table);
    println!("\n--- Materials ---");
    print_table(&order.materials_table);

    println!();
    print_totals(&order.coefficient, &totals);
    Ok(())
}

fn print_table(table: &LineItemTable) {
    println!(
        "{:>3} {:<36} {:<6} {:>8} {:>10} {:>12}  {}",
        "No", "Name", "Unit", "Qty", "Price", "Amount", "Equipment"
    );
    println!("{}", "-".repeat(90));
    for (number, row) in table.numbered() {
        let params: Vec<&str> = [row.equipment_param1(), row.equipment_param2()]
            .into_iter()
            .flatten()
            .collect();
        println!(
            "{:>3} {:<36} {:<6} {:>8} {:>10} {:>12}  {}",
            number,
            cell(row.name(), 36),
            cell(row.unit(), 6),
            row.quantity(),
            row.unit_price(),
            format_money(row.line_total()),
            params.join(" / ")
        );
    }
}

fn print_totals(coefficient: &str, totals: &OrderTotals) {
    println!("Work total:            {:>12}", format_money(totals.work_total));
    println!(
        "With coefficient {:<5} {:>12}",
        coefficient,
        format_money(totals.work_total_with_coeff)
    );
    println!("Materials total:       {:>12}", format_money(totals.materials_total));
    println!("Order total:           {:>12}", format_money(totals.order_total));
}

pub fn output_totals(output_format: OutputFormat, order: &Order) -> Result<()> {
    let totals = order.totals();
    if output_format == OutputFormat::Json {
        return print_json(&totals);
    }
    print_totals(&order.coefficient, &totals);
    Ok(())
}

pub fn output_orders(output_format: OutputFormat, orders: &[Order]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let views: Vec<OrderView<'_>> = orders
            .iter()
            .map(|order| OrderView {
                order,
                totals: order.totals(),
            })
            .collect();
        return print_json(&views);
    }

    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    println!(
        "{:>6} {:<14} {:<10} {:<24} {:<10} {:<12} {:<12} {:>12}",
        "ID", "Contract", "Date", "Customer", "Plate", "Brand", "Type", "Total"
    );
    println!("{}", "-".repeat(106));
    for order in orders {
        println!(
            "{:>6} {:<14} {:<10} {:<24} {:<10} {:<12} {:<12} {:>12}",
            order.id.map(|id| id.to_string()).unwrap_or_default(),
            cell(&order.contract_number, 14),
            cell(&order.date, 10),
            cell(&order.customer, 24),
            cell(&order.plate_number, 10),
            cell(&order.brand, 12),
            cell(&order.vehicle_type, 12),
            format_money(order.totals().order_total)
        );
    }
    println!("\n{} order(s)", orders.len());
    Ok(())
}

pub fn output_catalog(output_format: OutputFormat, entries: &[CatalogEntry]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(entries);
    }

    if entries.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }

    println!("{:>6} {:<60} {:<6} {:>10}", "ID", "Name", "Unit", "Price");
    println!("{}", "-".repeat(85));
    for entry in entries {
        println!(
            "{:>6} {:<60} {:<6} {:>10}",
            entry.id,
            cell(&entry.name, 60),
            cell(&entry.unit, 6),
            format_money(entry.default_price)
        );
    }
    Ok(())
}

pub fn output_names(output_format: OutputFormat, names: &[String]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(names);
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

pub fn output_history(
    output_format: OutputFormat,
    records: &[PrintHistoryRecord],
    limit: usize,
) -> Result<()> {
    let shown = &records[..records.len().min(limit)];
    if output_format == OutputFormat::Json {
        return print_json(shown);
    }

    println!("Print History");
    println!("=============");
    println!("Total entries: {}", records.len());
    println!();

    if shown.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    println!(
        "{:>5} {:<19} {:<14} {:<20} {:<10} {:<12} {}",
        "ID", "Printed", "Contract", "Customer", "Plate", "Type", "Document"
    );
    println!("{}", "-".repeat(100));
    for record in shown {
        let entry = &record.entry;
        let contract = record
            .current_contract_number
            .as_deref()
            .unwrap_or(&entry.contract_number);
        let vehicle_type = if record.order_found {
            record.current_vehicle_type.as_deref().unwrap_or("")
        } else {
            "(deleted)"
        };
        let document = entry
            .document_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.document_path.display().to_string());
        println!(
            "{:>5} {:<19} {:<14} {:<20} {:<10} {:<12} {}",
            entry.id,
            cell(&entry.print_date, 19),
            cell(contract, 14),
            cell(&entry.customer, 20),
            cell(&entry.plate_number, 10),
            cell(vehicle_type, 12),
            document
        );
    }
    Ok(())
}
