//! JSON form of an order as typed outside the interactive form
//!
//! Drafts go through the same field rules as interactive editing: numeric
//! text that the form would refuse is an error here.

use serde::{Deserialize, Serialize};
use tandem_domain::model::{LineField, LineItemTable, Order};
use tandem_domain::service::numeric::{
    format_date_input, is_numeric_input, is_phone_input, parse_date,
};
use tandem_types::{LineKind, Result, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDraft {
    pub name: String,
    pub unit: String,
    pub quantity: String,
    pub unit_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_param1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_param2: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
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
    /// Falls back to the configured default when absent
    pub coefficient: Option<String>,
    pub works: Vec<LineDraft>,
    pub materials: Vec<LineDraft>,
}

fn invalid(field: impl Into<String>, value: &str) -> ValidationError {
    ValidationError::InvalidInput {
        field: field.into(),
        value: value.to_string(),
    }
}

impl OrderDraft {
    /// Build an order, applying every field through the form rules
    pub fn into_order(mut self, default_coefficient: &str) -> Result<Order> {
        let coefficient = self
            .coefficient
            .unwrap_or_else(|| default_coefficient.to_string());
        if !is_numeric_input(coefficient.trim()) {
            return Err(invalid("coefficient", &coefficient).into());
        }
        if !is_phone_input(&self.phone) {
            return Err(invalid("phone", &self.phone).into());
        }
        for (label, value) in [
            ("date", &mut self.date),
            ("acceptance date", &mut self.acceptance_date),
            ("work order date", &mut self.work_order_date),
            ("completion date", &mut self.completion_date),
        ] {
            *value = normalize_date(label, value.trim())?;
        }

        let mut order = Order::new(coefficient.trim());
        order.id = self.id;
        order.contract_number = self.contract_number;
        order.date = self.date;
        order.acceptance_date = self.acceptance_date;
        order.work_order_date = self.work_order_date;
        order.completion_date = self.completion_date;
        order.vehicle_type = self.vehicle_type;
        order.customer = self.customer;
        order.address = self.address;
        order.plate_number = self.plate_number;
        order.brand = self.brand;
        order.refrigerator_brand = self.refrigerator_brand;
        order.year = self.year;
        order.mileage = self.mileage;
        order.phone = self.phone;
        order.preliminary_inspection = self.preliminary_inspection;
        order.equipment_delivered = self.equipment_delivered;
        order.recommendations = self.recommendations;
        order.executor_position = self.executor_position;
        order.executor_name = self.executor_name;
        order.customer_position = self.customer_position;
        order.customer_name = self.customer_name;

        fill_table(&mut order.work_table, &self.works)?;
        fill_table(&mut order.materials_table, &self.materials)?;
        Ok(order)
    }

    /// Draft of an existing order, e.g. for editing and re-saving
    pub fn from_order(order: &Order) -> Self {
        let lines = |kind: LineKind| -> Vec<LineDraft> {
            order
                .table(kind)
                .filled_rows()
                .map(|row| LineDraft {
                    name: row.name().to_string(),
                    unit: row.unit().to_string(),
                    quantity: row.quantity().to_string(),
                    unit_price: row.unit_price().to_string(),
                    equipment_param1: row.equipment_param1().map(str::to_string),
                    equipment_param2: row.equipment_param2().map(str::to_string),
                })
                .collect()
        };

        Self {
            id: order.id,
            contract_number: order.contract_number.clone(),
            date: order.date.clone(),
            acceptance_date: order.acceptance_date.clone(),
            work_order_date: order.work_order_date.clone(),
            completion_date: order.completion_date.clone(),
            vehicle_type: order.vehicle_type.clone(),
            customer: order.customer.clone(),
            address: order.address.clone(),
            plate_number: order.plate_number.clone(),
            brand: order.brand.clone(),
            refrigerator_brand: order.refrigerator_brand.clone(),
            year: order.year.clone(),
            mileage: order.mileage.clone(),
            phone: order.phone.clone(),
            preliminary_inspection: order.preliminary_inspection.clone(),
            equipment_delivered: order.equipment_delivered.clone(),
            recommendations: order.recommendations.clone(),
            executor_position: order.executor_position.clone(),
            executor_name: order.executor_name.clone(),
            customer_position: order.customer_position.clone(),
            customer_name: order.customer_name.clone(),
            coefficient: Some(order.coefficient.clone()),
            works: lines(LineKind::Work),
            materials: lines(LineKind::Material),
        }
    }
}

/// Digits-only dates get their dots, as the form inserts them while typing
fn normalize_date(label: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    match format_date_input(value) {
        Some(formatted) if parse_date(&formatted).is_some() => Ok(formatted),
        _ => Err(invalid(label, value).into()),
    }
}

fn fill_table(table: &mut LineItemTable, lines: &[LineDraft]) -> Result<()> {
    let section = match table.kind() {
        LineKind::Work => "works",
        LineKind::Material => "materials",
    };

    for (idx, line) in lines.iter().enumerate() {
        let pos = if idx < table.len() { idx } else { table.add_row() };
        let mut fields = vec![
            (LineField::Name, "name", line.name.as_str()),
            (LineField::Unit, "unit", line.unit.as_str()),
            (LineField::Quantity, "quantity", line.quantity.as_str()),
            (LineField::UnitPrice, "unit price", line.unit_price.as_str()),
        ];
        if let Some(value) = line.equipment_param1.as_deref() {
            fields.push((LineField::EquipmentParam1, "equipment parameter 1", value));
        }
        if let Some(value) = line.equipment_param2.as_deref() {
            fields.push((LineField::EquipmentParam2, "equipment parameter 2", value));
        }

        for (field, label, value) in fields {
            if !table.set_field(pos, field, value.trim()) {
                return Err(invalid(format!("{section} row {} {label}", idx + 1), value).into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tandem_types::Error;

    fn draft_json() -> &'static str {
        r#"{
            "contract_number": "C-9",
            "date": "01.04.2025",
            "customer": "Test LLC",
            "plate_number": "A123BC",
            "brand": "Toyota",
            "phone": "+79001234567",
            "works": [
                {"name": "Diagnostics", "unit": "pcs", "quantity": "1", "unit_price": "500", "equipment_param1": "R404A"},
                {"name": "Refill", "quantity": "2", "unit_price": "750,5"}
            ],
            "materials": [
                {"name": "Dryer", "unit": "pcs", "quantity": "1", "unit_price": "1200"}
            ]
        }"#
    }

    #[test]
    fn test_draft_builds_order() {
        let draft: OrderDraft = serde_json::from_str(draft_json()).unwrap();
        let order = draft.into_order("1.2").unwrap();

        assert_eq!(order.coefficient, "1.2");
        assert_eq!(order.work_table.len(), 2);
        assert_eq!(order.work_table.rows()[1].unit_price(), "750.5");
        assert_eq!(order.work_table.rows()[0].equipment_param1(), Some("R404A"));
        let totals = order.totals();
        assert_eq!(totals.work_total, dec!(2001));
        assert_eq!(totals.order_total, dec!(3601.20));
    }

    #[test]
    fn test_draft_round_trips_through_order() {
        let draft: OrderDraft = serde_json::from_str(draft_json()).unwrap();
        let order = draft.clone().into_order("1.2").unwrap();
        let back = OrderDraft::from_order(&order);

        assert_eq!(back.works.len(), 2);
        assert_eq!(back.works[1].unit_price, "750.5");
        assert_eq!(back.coefficient.as_deref(), Some("1.2"));
        assert_eq!(back.into_order("1.0").unwrap(), order);
    }

    #[test]
    fn test_bad_quantity_is_rejected() {
        let mut draft: OrderDraft = serde_json::from_str(draft_json()).unwrap();
        draft.materials[0].quantity = "1.2.3".to_string();
        let err = draft.into_order("1.2").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput { ref field, .. }) if field == "materials row 1 quantity"
        ));
    }

    #[test]
    fn test_equipment_params_on_materials_are_rejected() {
        let mut draft: OrderDraft = serde_json::from_str(draft_json()).unwrap();
        draft.materials[0].equipment_param1 = Some("x".to_string());
        assert!(draft.into_order("1.2").is_err());
    }

    #[test]
    fn test_bad_phone_and_date_are_rejected() {
        let mut draft: OrderDraft = serde_json::from_str(draft_json()).unwrap();
        draft.phone = "8 900 123".to_string();
        assert!(draft.clone().into_order("1.2").is_err());

        draft.phone.clear();
        draft.completion_date = "31.02.2025".to_string();
        assert!(draft.into_order("1.2").is_err());
    }

    #[test]
    fn test_digit_only_dates_are_formatted() {
        let mut draft: OrderDraft = serde_json::from_str(draft_json()).unwrap();
        draft.date = "01042025".to_string();
        draft.acceptance_date = " 02.04.2025 ".to_string();
        let order = draft.into_order("1.2").unwrap();

        assert_eq!(order.date, "01.04.2025");
        assert_eq!(order.acceptance_date, "02.04.2025");
        assert_eq!(order.completion_date, "");
    }

    #[test]
    fn test_partial_date_is_rejected() {
        let mut draft: OrderDraft = serde_json::from_str(draft_json()).unwrap();
        draft.work_order_date = "0104".to_string();
        let err = draft.into_order("1.2").unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput { ref field, .. }) if field == "work order date"
        ));
    }
}
