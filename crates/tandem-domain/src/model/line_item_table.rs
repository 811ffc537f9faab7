//! Ordered, never-empty collection of rows for one kind of line item

use rust_decimal::Decimal;
use serde::Serialize;
use tandem_types::LineKind;

use super::catalog::CatalogEntry;
use super::line_item::{LineField, LineItem};

/// Works or materials of one order.
///
/// Positions are 0-based; the displayed "№" is `position + 1` and is never
/// stored, so removing a row renumbers everything after it for free.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemTable {
    kind: LineKind,
    rows: Vec<LineItem>,
}

impl LineItemTable {
    /// Table with a single empty row
    pub fn new(kind: LineKind) -> Self {
        Self {
            kind,
            rows: vec![LineItem::new(kind)],
        }
    }

    /// Build a table from loaded rows, forcing their kind to the table's
    pub fn from_rows(kind: LineKind, rows: Vec<LineItem>) -> Self {
        let mut rows: Vec<LineItem> = rows
            .into_iter()
            .map(|mut row| {
                row.set_kind(kind);
                row
            })
            .collect();
        if rows.is_empty() {
            rows.push(LineItem::new(kind));
        }
        Self { kind, rows }
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false: a table keeps at least one row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn get(&self, position: usize) -> Option<&LineItem> {
        self.rows.get(position)
    }

    /// Rows paired with their 1-based display number
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &LineItem)> {
        self.rows.iter().enumerate().map(|(i, row)| (i + 1, row))
    }

    /// Rows that carry a name, i.e. the ones worth persisting or printing
    pub fn filled_rows(&self) -> impl Iterator<Item = &LineItem> {
        self.rows.iter().filter(|row| !row.is_blank())
    }

    /// Append an empty row and return its position
    pub fn add_row(&mut self) -> usize {
        self.rows.push(LineItem::new(self.kind));
        self.rows.len() - 1
    }

    /// Remove the row at `position`. No-op when the position is out of range
    /// or the row is the last one left.
    pub fn remove_row(&mut self, position: usize) -> bool {
        if position >= self.rows.len() || self.rows.len() == 1 {
            return false;
        }
        self.rows.remove(position);
        true
    }

    /// Edit one field; numeric edits refresh the line total
    pub fn set_field(&mut self, position: usize, field: LineField, raw: &str) -> bool {
        self.rows
            .get_mut(position)
            .map(|row| row.set_field(field, raw))
            .unwrap_or(false)
    }

    pub fn recompute_line_total(&mut self, position: usize) -> Option<Decimal> {
        self.rows
            .get_mut(position)
            .map(LineItem::recompute_line_total)
    }

    /// Pre-fill name, unit and price of a row from a catalog entry
    pub fn apply_catalog_entry(&mut self, position: usize, entry: &CatalogEntry) -> bool {
        let Some(row) = self.rows.get_mut(position) else {
            return false;
        };
        let price = entry.default_price.normalize().to_string();
        row.set_field(LineField::Name, &entry.name);
        row.set_field(LineField::Unit, &entry.unit);
        row.set_field(LineField::UnitPrice, &price)
    }

    /// Sum of all line totals. A sum that would overflow skips the row.
    pub fn subtotal(&self) -> Decimal {
        sum_line_totals(self.rows.iter())
    }

    /// Subtotal of the rows that carry a name
    pub fn filled_subtotal(&self) -> Decimal {
        sum_line_totals(self.filled_rows())
    }
}

fn sum_line_totals<'a>(rows: impl Iterator<Item = &'a LineItem>) -> Decimal {
    rows.fold(Decimal::ZERO, |acc, row| {
        acc.checked_add(row.line_total()).unwrap_or(acc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tandem_types::CatalogKind;

    fn table_with(values: &[(&str, &str)]) -> LineItemTable {
        let mut table = LineItemTable::new(LineKind::Work);
        for (i, (qty, price)) in values.iter().enumerate() {
            if i > 0 {
                table.add_row();
            }
            table.set_field(i, LineField::Name, &format!("row {i}"));
            table.set_field(i, LineField::Quantity, qty);
            table.set_field(i, LineField::UnitPrice, price);
        }
        table
    }

    #[test]
    fn test_new_table_has_one_row() {
        let table = LineItemTable::new(LineKind::Material);
        assert_eq!(table.len(), 1);
        assert!(table.get(0).is_some_and(LineItem::is_blank));
    }

    #[test]
    fn test_add_row_returns_position() {
        let mut table = LineItemTable::new(LineKind::Work);
        assert_eq!(table.add_row(), 1);
        assert_eq!(table.add_row(), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_remove_last_row_is_noop() {
        let mut table = LineItemTable::new(LineKind::Work);
        assert!(!table.remove_row(0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_invalid_position_is_noop() {
        let mut table = table_with(&[("1", "1"), ("2", "2")]);
        assert!(!table.remove_row(5));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut table = table_with(&[("1", "10"), ("2", "10"), ("3", "10")]);
        assert!(table.remove_row(1));

        let numbers: Vec<usize> = table.numbered().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 2]);
        let names: Vec<&str> = table.rows().iter().map(LineItem::name).collect();
        assert_eq!(names, vec!["row 0", "row 2"]);
        assert_eq!(table.subtotal(), dec!(40));
    }

    #[test]
    fn test_subtotal_tracks_edits() {
        let mut table = table_with(&[("5", "1000"), ("1", "500")]);
        assert_eq!(table.subtotal(), dec!(5500));

        table.set_field(1, LineField::Quantity, "3");
        assert_eq!(table.subtotal(), dec!(6500));

        table.set_field(0, LineField::UnitPrice, "");
        assert_eq!(table.subtotal(), dec!(1500));

        let subtotal: Decimal = table.rows().iter().map(LineItem::line_total).sum();
        assert_eq!(table.subtotal(), subtotal);
    }

    #[test]
    fn test_set_field_out_of_range() {
        let mut table = LineItemTable::new(LineKind::Work);
        assert!(!table.set_field(3, LineField::Name, "x"));
        assert_eq!(table.recompute_line_total(3), None);
    }

    #[test]
    fn test_apply_catalog_entry() {
        let mut table = LineItemTable::new(LineKind::Work);
        table.set_field(0, LineField::Quantity, "2");
        let entry = CatalogEntry {
            id: 30000,
            kind: CatalogKind::Works,
            name: "Leak search".to_string(),
            unit: "pcs".to_string(),
            default_price: dec!(250.00),
        };
        assert!(table.apply_catalog_entry(0, &entry));

        let row = &table.rows()[0];
        assert_eq!(row.name(), "Leak search");
        assert_eq!(row.unit(), "pcs");
        assert_eq!(row.unit_price(), "250");
        assert_eq!(row.line_total(), dec!(500));
    }

    #[test]
    fn test_from_rows_never_empty() {
        let table = LineItemTable::from_rows(LineKind::Material, Vec::new());
        assert_eq!(table.len(), 1);
        assert_eq!(table.filled_rows().count(), 0);
    }
}
