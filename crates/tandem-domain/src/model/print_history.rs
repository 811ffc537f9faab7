//! Append-only log of generated work-order documents

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::order::Order;

/// A printed document, with the order details as they were at print time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintHistoryEntry {
    pub id: i64,
    /// Weak reference; the order may have been deleted since
    pub order_id: Option<i64>,
    /// `None` when the stored date is missing or unreadable
    pub printed_at: Option<NaiveDateTime>,
    /// Print date as stored
    pub print_date: String,
    pub customer: String,
    pub brand: String,
    pub plate_number: String,
    pub contract_number: String,
    pub document_path: PathBuf,
}

/// Entry to append; the id is assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrintHistoryEntry {
    pub order_id: i64,
    pub printed_at: NaiveDateTime,
    pub customer: String,
    pub brand: String,
    pub plate_number: String,
    pub contract_number: String,
    pub document_path: PathBuf,
}

impl NewPrintHistoryEntry {
    /// Snapshot the descriptive fields of a saved order
    pub fn snapshot(
        order_id: i64,
        order: &Order,
        document_path: PathBuf,
        printed_at: NaiveDateTime,
    ) -> Self {
        Self {
            order_id,
            printed_at,
            customer: order.customer.clone(),
            brand: order.brand.clone(),
            plate_number: order.plate_number.clone(),
            contract_number: order.contract_number.clone(),
            document_path,
        }
    }
}

/// History entry joined with the order it still points to, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintHistoryRecord {
    #[serde(flatten)]
    pub entry: PrintHistoryEntry,
    /// False once the referenced order has been deleted
    pub order_found: bool,
    pub current_contract_number: Option<String>,
    pub current_vehicle_type: Option<String>,
}

