//! Order total calculation
//!
//! ```text
//! work_total             = work subtotal
//! work_total_with_coeff  = round(work_total * coefficient, 2)
//! materials_total        = materials subtotal
//! order_total            = round(work_total_with_coeff + materials_total, 2)
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use super::numeric::{parse_coefficient, round_money};
use crate::model::LineItemTable;

/// The four derived values shown under the tables and stored with the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub work_total: Decimal,
    pub work_total_with_coeff: Decimal,
    pub materials_total: Decimal,
    pub order_total: Decimal,
}

/// Pure function of the two tables and the coefficient text.
///
/// Coefficient text that does not parse counts as 1.0.
pub fn calculate_totals(
    work: &LineItemTable,
    materials: &LineItemTable,
    coefficient: &str,
) -> OrderTotals {
    totals_from_subtotals(work.subtotal(), materials.subtotal(), coefficient)
}

/// Totals over the rows that are kept when the order is saved; rows without
/// a name do not count. Used for the stored and printed figures.
pub fn calculate_recorded_totals(
    work: &LineItemTable,
    materials: &LineItemTable,
    coefficient: &str,
) -> OrderTotals {
    totals_from_subtotals(
        work.filled_subtotal(),
        materials.filled_subtotal(),
        coefficient,
    )
}

fn totals_from_subtotals(
    work_total: Decimal,
    materials_total: Decimal,
    coefficient: &str,
) -> OrderTotals {
    let coeff = parse_coefficient(coefficient);
    let work_total_with_coeff = work_total
        .checked_mul(coeff)
        .map(round_money)
        .unwrap_or(work_total);
    let order_total = work_total_with_coeff
        .checked_add(materials_total)
        .map(round_money)
        .unwrap_or(work_total_with_coeff);

    OrderTotals {
        work_total,
        work_total_with_coeff,
        materials_total,
        order_total,
    }
}
