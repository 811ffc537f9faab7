//! A single work or material row of an order

use rust_decimal::Decimal;
use serde::Serialize;
use tandem_types::LineKind;

use crate::service::numeric;

/// Editable columns of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    Name,
    Unit,
    Quantity,
    UnitPrice,
    EquipmentParam1,
    EquipmentParam2,
}

impl LineField {
    pub fn is_numeric(&self) -> bool {
        matches!(self, LineField::Quantity | LineField::UnitPrice)
    }
}

/// One work or material entry.
///
/// Quantity and unit price keep the operator's text (with `,` normalised to
/// `.`); `line_total` is derived from them after every edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    kind: LineKind,
    name: String,
    unit: String,
    quantity: String,
    unit_price: String,
    line_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    equipment_param1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    equipment_param2: Option<String>,
}

impl LineItem {
    /// Empty row, as created when a row is appended to a table
    pub fn new(kind: LineKind) -> Self {
        Self {
            kind,
            name: String::new(),
            unit: String::new(),
            quantity: String::new(),
            unit_price: String::new(),
            line_total: Decimal::ZERO,
            equipment_param1: None,
            equipment_param2: None,
        }
    }

    /// Rebuild a row from stored values. Equipment parameters are dropped for
    /// material rows.
    pub fn from_parts(
        kind: LineKind,
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
        equipment_param1: Option<String>,
        equipment_param2: Option<String>,
    ) -> Self {
        let is_work = kind == LineKind::Work;
        let mut item = Self {
            kind,
            name: name.into(),
            unit: unit.into(),
            quantity: numeric::normalize_separator(&quantity.into()),
            unit_price: numeric::normalize_separator(&unit_price.into()),
            line_total: Decimal::ZERO,
            equipment_param1: equipment_param1.filter(|_| is_work),
            equipment_param2: equipment_param2.filter(|_| is_work),
        };
        item.recompute_line_total();
        item
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn unit_price(&self) -> &str {
        &self.unit_price
    }

    pub fn line_total(&self) -> Decimal {
        self.line_total
    }

    pub fn equipment_param1(&self) -> Option<&str> {
        self.equipment_param1.as_deref()
    }

    pub fn equipment_param2(&self) -> Option<&str> {
        self.equipment_param2.as_deref()
    }

    /// Parsed quantity, zero when unparsable
    pub fn quantity_value(&self) -> Decimal {
        numeric::parse_amount(&self.quantity)
    }

    /// Parsed unit price, zero when unparsable
    pub fn unit_price_value(&self) -> Decimal {
        numeric::parse_amount(&self.unit_price)
    }

    /// A row without a name is not persisted
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Store `raw` into `field`. Returns `false` (and leaves the row as it
    /// was) when numeric text is rejected or an equipment parameter is set
    /// on a material row.
    pub fn set_field(&mut self, field: LineField, raw: &str) -> bool {
        if field.is_numeric() && !numeric::is_numeric_input(raw) {
            return false;
        }
        match field {
            LineField::Name => self.name = raw.to_string(),
            LineField::Unit => self.unit = raw.to_string(),
            LineField::Quantity => self.quantity = numeric::normalize_separator(raw),
            LineField::UnitPrice => self.unit_price = numeric::normalize_separator(raw),
            LineField::EquipmentParam1 | LineField::EquipmentParam2 => {
                if self.kind != LineKind::Work {
                    return false;
                }
                let value = Some(raw.to_string()).filter(|v| !v.is_empty());
                if field == LineField::EquipmentParam1 {
                    self.equipment_param1 = value;
                } else {
                    self.equipment_param2 = value;
                }
            }
        }
        if field.is_numeric() {
            self.recompute_line_total();
        }
        true
    }

    /// `line_total = round(quantity * unit_price, 2)`
    pub fn recompute_line_total(&mut self) -> Decimal {
        self.line_total = numeric::line_total(&self.quantity, &self.unit_price);
        self.line_total
    }

    pub(crate) fn set_kind(&mut self, kind: LineKind) {
        self.kind = kind;
        if kind != LineKind::Work {
            self.equipment_param1 = None;
            self.equipment_param2 = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_numeric_edit_recomputes_total() {
        let mut item = LineItem::new(LineKind::Work);
        assert!(item.set_field(LineField::Quantity, "5"));
        assert!(item.set_field(LineField::UnitPrice, "1000,5"));
        assert_eq!(item.unit_price(), "1000.5");
        assert_eq!(item.line_total(), dec!(5002.5));
    }

    #[test]
    fn test_rejected_text_is_not_committed() {
        let mut item = LineItem::new(LineKind::Material);
        assert!(item.set_field(LineField::Quantity, "2"));
        assert!(!item.set_field(LineField::Quantity, "2.5.1"));
        assert!(!item.set_field(LineField::Quantity, "2x"));
        assert_eq!(item.quantity(), "2");
    }

    #[test]
    fn test_equipment_params_only_on_work_rows() {
        let mut work = LineItem::new(LineKind::Work);
        assert!(work.set_field(LineField::EquipmentParam1, "R404A"));
        assert_eq!(work.equipment_param1(), Some("R404A"));
        assert!(work.set_field(LineField::EquipmentParam1, ""));
        assert_eq!(work.equipment_param1(), None);

        let mut material = LineItem::new(LineKind::Material);
        assert!(!material.set_field(LineField::EquipmentParam2, "x"));
        assert_eq!(material.equipment_param2(), None);
    }

    #[test]
    fn test_from_parts_derives_total() {
        let item = LineItem::from_parts(
            LineKind::Material,
            "Oil filter",
            "pcs",
            "2",
            "250,25",
            Some("ignored".to_string()),
            None,
        );
        assert_eq!(item.line_total(), dec!(500.5));
        assert_eq!(item.equipment_param1(), None);
    }
}
