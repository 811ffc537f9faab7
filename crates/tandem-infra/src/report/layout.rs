//! Page-independent layout of a work-order document
//!
//! The layout is a flat list of text lines with horizontal offsets in
//! millimetres. [`paginate`] assigns each line a page and a baseline so the
//! renderer only has to place text.

use tandem_domain::model::{LineItem, LineItemTable, Order};
use tandem_domain::service::numeric::format_money;

use super::CompanyHeader;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_TOP_MM: f32 = 15.0;
pub const MARGIN_BOTTOM_MM: f32 = 15.0;
pub const LEFT_MM: f32 = 20.0;

const BODY: f32 = 10.0;
const SMALL: f32 = 9.0;
const TITLE: f32 = 12.0;

/// A piece of text starting at `x_mm` from the left page edge
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x_mm: f32,
    pub text: String,
}

/// One baseline worth of text
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub runs: Vec<TextRun>,
    pub size_pt: f32,
    pub bold: bool,
    /// Extra space above the line
    pub gap_mm: f32,
}

impl LayoutLine {
    fn new(size_pt: f32) -> Self {
        Self {
            runs: Vec::new(),
            size_pt,
            bold: false,
            gap_mm: 0.0,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn gap(mut self, gap_mm: f32) -> Self {
        self.gap_mm = gap_mm;
        self
    }

    fn at(mut self, x_mm: f32, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.runs.push(TextRun { x_mm, text });
        }
        self
    }

    /// Vertical space taken by the line, including its gap
    pub fn height_mm(&self) -> f32 {
        self.gap_mm + self.size_pt * 0.5
    }

    /// All runs joined, for searching and tests
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|run| run.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    pub lines: Vec<LayoutLine>,
}

/// A line placed on a page, `y_mm` measured from the bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLine {
    pub index: usize,
    pub y_mm: f32,
}

/// Column offsets of the works table
const WORK_COLUMNS: [f32; 7] = [LEFT_MM, 28.0, 98.0, 113.0, 128.0, 148.0, 168.0];
/// Column offsets of the materials table
const MATERIAL_COLUMNS: [f32; 6] = [LEFT_MM, 28.0, 128.0, 143.0, 158.0, 178.0];

/// Lay out the complete document for `order`
pub fn layout_order(order: &Order, company: &CompanyHeader) -> DocumentLayout {
    let totals = order.recorded_totals();
    let mut lines = Vec::new();

    if !company.name.is_empty() {
        lines.push(LayoutLine::new(11.0).bold().at(LEFT_MM, &company.name));
    }
    for detail in [&company.address, &company.contacts] {
        if !detail.is_empty() {
            lines.push(LayoutLine::new(SMALL).at(LEFT_MM, detail));
        }
    }

    let dates_x = 130.0;
    let dates_value_x = 172.0;
    for (idx, (label, value)) in [
        ("Acceptance date", &order.acceptance_date),
        ("Work order date", &order.work_order_date),
        ("Completion date", &order.completion_date),
    ]
    .into_iter()
    .enumerate()
    {
        let line = LayoutLine::new(SMALL)
            .at(dates_x, label)
            .at(dates_value_x, value.as_str());
        lines.push(if idx == 0 { line.gap(4.0) } else { line });
    }

    lines.push(
        LayoutLine::new(TITLE)
            .bold()
            .gap(6.0)
            .at(70.0, "Work order contract"),
    );
    lines.push(LayoutLine::new(SMALL).at(75.0, "Price list acknowledged."));
    lines.push(
        LayoutLine::new(BODY)
            .gap(4.0)
            .at(LEFT_MM, format!("Work order contract No. {}", order.contract_number))
            .at(140.0, format!("Date: {}", order.date)),
    );

    let right_x = 120.0;
    let blank = "_____________________";
    let delivered = if order.equipment_delivered.is_empty() {
        blank
    } else {
        order.equipment_delivered.as_str()
    };
    let details: [(String, String); 6] = [
        (
            format!("Customer: {}", order.customer),
            format!("Refrigeration unit: {}", order.refrigerator_brand),
        ),
        (
            format!("Address: {}", order.address),
            format!("Vehicle: {}", order.vehicle_type),
        ),
        (
            format!("Equipment: {}", order.vehicle_type),
            format!("Plate: {}", order.plate_number),
        ),
        (
            format!("Equipment delivered by: {delivered}"),
            format!("Year: {}", order.year),
        ),
        (
            format!("Plate number: {}", order.plate_number),
            format!("Mileage: {}", order.mileage),
        ),
        (
            format!("Brand: {}", order.brand),
            format!("Phone: {}", order.phone),
        ),
    ];
    for (idx, (left, right)) in details.into_iter().enumerate() {
        let line = LayoutLine::new(BODY)
            .at(LEFT_MM, fit(&left, 52))
            .at(right_x, fit(&right, 40));
        lines.push(if idx == 0 { line.gap(3.0) } else { line });
    }

    lines.push(
        LayoutLine::new(BODY)
            .bold()
            .gap(4.0)
            .at(LEFT_MM, "Preliminary inspection (faults found):"),
    );
    lines.push(LayoutLine::new(SMALL).at(LEFT_MM, order.preliminary_inspection.as_str()));

    lines.push(
        LayoutLine::new(SMALL)
            .bold()
            .gap(5.0)
            .at(WORK_COLUMNS[0], "No.")
            .at(WORK_COLUMNS[1], "Work performed")
            .at(WORK_COLUMNS[2], "Unit")
            .at(WORK_COLUMNS[3], "Qty")
            .at(WORK_COLUMNS[4], "Unit price")
            .at(WORK_COLUMNS[5], "Amount")
            .at(WORK_COLUMNS[6], "Equipment"),
    );
    for (number, row) in filled_numbered(&order.work_table) {
        let params: Vec<&str> = [row.equipment_param1(), row.equipment_param2()]
            .into_iter()
            .flatten()
            .collect();
        lines.push(
            LayoutLine::new(SMALL)
                .at(WORK_COLUMNS[0], number.to_string())
                .at(WORK_COLUMNS[1], fit(row.name(), 38))
                .at(WORK_COLUMNS[2], fit(row.unit(), 7))
                .at(WORK_COLUMNS[3], fit(row.quantity(), 7))
                .at(WORK_COLUMNS[4], fit(row.unit_price(), 10))
                .at(WORK_COLUMNS[5], format_money(row.line_total()))
                .at(WORK_COLUMNS[6], fit(&params.join(" / "), 16)),
        );
    }
    lines.push(
        LayoutLine::new(SMALL)
            .gap(1.0)
            .at(WORK_COLUMNS[4], "Total:")
            .at(WORK_COLUMNS[5], format_money(totals.work_total)),
    );
    lines.push(
        LayoutLine::new(SMALL)
            .at(WORK_COLUMNS[3], format!("Coefficient {}:", order.coefficient.trim()))
            .at(WORK_COLUMNS[5], format_money(totals.work_total_with_coeff)),
    );

    lines.push(
        LayoutLine::new(BODY)
            .bold()
            .gap(5.0)
            .at(LEFT_MM, "Spare parts and consumables"),
    );
    lines.push(
        LayoutLine::new(SMALL)
            .bold()
            .gap(1.0)
            .at(MATERIAL_COLUMNS[0], "No.")
            .at(MATERIAL_COLUMNS[1], "Name")
            .at(MATERIAL_COLUMNS[2], "Unit")
            .at(MATERIAL_COLUMNS[3], "Qty")
            .at(MATERIAL_COLUMNS[4], "Unit price")
            .at(MATERIAL_COLUMNS[5], "Amount"),
    );
    for (number, row) in filled_numbered(&order.materials_table) {
        lines.push(
            LayoutLine::new(SMALL)
                .at(MATERIAL_COLUMNS[0], number.to_string())
                .at(MATERIAL_COLUMNS[1], fit(row.name(), 55))
                .at(MATERIAL_COLUMNS[2], fit(row.unit(), 7))
                .at(MATERIAL_COLUMNS[3], fit(row.quantity(), 7))
                .at(MATERIAL_COLUMNS[4], fit(row.unit_price(), 10))
                .at(MATERIAL_COLUMNS[5], format_money(row.line_total())),
        );
    }
    lines.push(
        LayoutLine::new(SMALL)
            .gap(1.0)
            .at(MATERIAL_COLUMNS[4], "Total:")
            .at(MATERIAL_COLUMNS[5], format_money(totals.materials_total)),
    );

    lines.push(
        LayoutLine::new(BODY)
            .bold()
            .gap(6.0)
            .at(LEFT_MM, format!("Order total: {}", format_money(totals.order_total))),
    );
    lines.push(
        LayoutLine::new(BODY)
            .gap(3.0)
            .at(LEFT_MM, "Recommendations:")
            .at(52.0, fit(&order.recommendations, 70)),
    );

    let signature = "Signature: ______________";
    lines.push(
        LayoutLine::new(SMALL)
            .gap(6.0)
            .at(LEFT_MM, "Contractor representative:")
            .at(64.0, fit(&order.executor_position, 22))
            .at(108.0, fit(&order.executor_name, 22))
            .at(152.0, signature),
    );
    lines.push(
        LayoutLine::new(SMALL)
            .gap(2.0)
            .at(LEFT_MM, "Equipment accepted in working / faulty condition (underline as appropriate)."),
    );
    lines.push(
        LayoutLine::new(SMALL)
            .gap(2.0)
            .at(LEFT_MM, "Customer representative:")
            .at(64.0, fit(&order.customer_position, 22))
            .at(108.0, fit(&order.customer_name, 22))
            .at(152.0, signature),
    );

    DocumentLayout {
        title: format!("Work order {}", order.contract_number),
        lines,
    }
}

/// Assign lines to pages top-down; a line that does not fit starts a new page
pub fn paginate(lines: &[LayoutLine]) -> Vec<Vec<PlacedLine>> {
    let top = PAGE_HEIGHT_MM - MARGIN_TOP_MM;
    let mut pages = vec![Vec::new()];
    let mut y = top;

    for (index, line) in lines.iter().enumerate() {
        let mut next = y - line.height_mm();
        if next < MARGIN_BOTTOM_MM && pages.last().is_some_and(|page| !page.is_empty()) {
            pages.push(Vec::new());
            next = top - line.size_pt * 0.5;
        }
        if let Some(page) = pages.last_mut() {
            page.push(PlacedLine { index, y_mm: next });
        }
        y = next;
    }
    pages
}

fn filled_numbered(table: &LineItemTable) -> impl Iterator<Item = (usize, &LineItem)> {
    table.filled_rows().enumerate().map(|(idx, row)| (idx + 1, row))
}

/// Cut `text` to `max_chars`, marking the cut with `...`
fn fit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
