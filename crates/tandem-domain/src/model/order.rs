//! The vehicle work-order record

use serde::Serialize;
use tandem_types::{LineKind, ValidationError};

use super::line_item_table::LineItemTable;
use crate::service::totals::{calculate_recorded_totals, calculate_totals, OrderTotals};
use crate::service::validation;

/// Multiplier pre-filled into a blank form
pub const DEFAULT_COEFFICIENT: &str = "1.2";

/// One vehicle service work-order.
///
/// Dates are free `dd.mm.yyyy` strings as typed by the operator. `id` is
/// `None` until the first save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: Option<i64>,
    pub contract_number: String,
    pub date: String,
    pub acceptance_date: String,
    pub work_order_date: String,
    pub completion_date: String,
    pub vehicle_type: String,
    pub customer: String,
    pub address: String,
    pub plate_number: String,
    pub brand: String,
    pub refrigerator_brand: String,
    pub year: String,
    pub mileage: String,
    pub phone: String,
    pub preliminary_inspection: String,
    pub equipment_delivered: String,
    pub recommendations: String,
    pub executor_position: String,
    pub executor_name: String,
    pub customer_position: String,
    pub customer_name: String,
    /// Coefficient text; unparsable text behaves as 1.0
    pub coefficient: String,
    pub work_table: LineItemTable,
    pub materials_table: LineItemTable,
}

impl Default for Order {
    fn default() -> Self {
        Self::new(DEFAULT_COEFFICIENT)
    }
}

impl Order {
    /// Blank, unsaved order
    pub fn new(coefficient: &str) -> Self {
        Self {
            id: None,
            contract_number: String::new(),
            date: String::new(),
            acceptance_date: String::new(),
            work_order_date: String::new(),
            completion_date: String::new(),
            vehicle_type: String::new(),
            customer: String::new(),
            address: String::new(),
            plate_number: String::new(),
            brand: String::new(),
            refrigerator_brand: String::new(),
            year: String::new(),
            mileage: String::new(),
            phone: String::new(),
            preliminary_inspection: String::new(),
            equipment_delivered: String::new(),
            recommendations: String::new(),
            executor_position: String::new(),
            executor_name: String::new(),
            customer_position: String::new(),
            customer_name: String::new(),
            coefficient: coefficient.to_string(),
            work_table: LineItemTable::new(LineKind::Work),
            materials_table: LineItemTable::new(LineKind::Material),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn table(&self, kind: LineKind) -> &LineItemTable {
        match kind {
            LineKind::Work => &self.work_table,
            LineKind::Material => &self.materials_table,
        }
    }

    pub fn table_mut(&mut self, kind: LineKind) -> &mut LineItemTable {
        match kind {
            LineKind::Work => &mut self.work_table,
            LineKind::Material => &mut self.materials_table,
        }
    }

    /// Derived totals for the current field values
    pub fn totals(&self) -> OrderTotals {
        calculate_totals(&self.work_table, &self.materials_table, &self.coefficient)
    }

    /// Totals as stored and printed: rows without a name are left out, the
    /// same way they are left out of the saved line items
    pub fn recorded_totals(&self) -> OrderTotals {
        calculate_recorded_totals(&self.work_table, &self.materials_table, &self.coefficient)
    }

    /// First missing mandatory field, if any
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineField;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_order() {
        let order = Order::default();
        assert!(order.is_new());
        assert_eq!(order.coefficient, "1.2");
        assert_eq!(order.work_table.len(), 1);
        assert_eq!(order.materials_table.len(), 1);
        assert_eq!(order.totals().order_total, dec!(0));
    }

    #[test]
    fn test_table_by_kind() {
        let mut order = Order::default();
        order
            .table_mut(LineKind::Material)
            .set_field(0, LineField::Name, "Filter");
        assert_eq!(order.materials_table.rows()[0].name(), "Filter");
        assert_eq!(order.table(LineKind::Work).kind(), LineKind::Work);
    }

    #[test]
    fn test_recorded_totals_ignore_unnamed_priced_row() {
        let mut order = Order::default();
        let work = order.table_mut(LineKind::Work);
        work.set_field(0, LineField::Name, "Diagnostics");
        work.set_field(0, LineField::Quantity, "1");
        work.set_field(0, LineField::UnitPrice, "500");
        let pos = work.add_row();
        work.set_field(pos, LineField::Quantity, "2");
        work.set_field(pos, LineField::UnitPrice, "1000");

        assert_eq!(order.totals().work_total, dec!(2500));
        assert_eq!(order.recorded_totals().work_total, dec!(500));
        assert_eq!(order.recorded_totals().order_total, dec!(600));
    }
}
