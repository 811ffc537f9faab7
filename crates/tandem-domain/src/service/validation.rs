//! Mandatory-field check run before an order is saved

use tandem_types::ValidationError;

use crate::model::Order;

/// Returns the label of the first mandatory field left empty.
///
/// Checked in form order: contract number, date, customer, plate number,
/// brand. Whitespace-only values count as empty.
pub fn validate(order: &Order) -> Result<(), ValidationError> {
    let required: [(&'static str, &str); 5] = [
        ("Contract number", &order.contract_number),
        ("Date", &order.date),
        ("Customer", &order.customer),
        ("Plate number", &order.plate_number),
        ("Brand", &order.brand),
    ];

    match required.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((label, _)) => Err(ValidationError::MissingField(*label)),
        None => Ok(()),
    }
}
