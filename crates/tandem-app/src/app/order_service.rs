//! Order Service - saving, loading and printing work orders
//!
//! Printing is a four step workflow:
//! 1. Load the saved order (it must exist in the store)
//! 2. Render the document into the reports directory
//! 3. Append a print history entry with a snapshot of the order
//! 4. Return the document path

use std::path::PathBuf;

use chrono::Local;
use tandem_domain::model::{LineItemTable, NewPrintHistoryEntry, Order};
use tandem_domain::repository::{OrderRepository, PrintHistoryRepository};
use tandem_infra::report::ReportGenerator;
use tandem_store::Store;
use tandem_types::{Error, LineKind, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::repository::{open_report_generator, open_store};

pub struct OrderService {
    store: Store,
    reports: ReportGenerator,
    default_coefficient: String,
}

impl OrderService {
    pub fn new(store: Store, reports: ReportGenerator, default_coefficient: impl Into<String>) -> Self {
        Self {
            store,
            reports,
            default_coefficient: default_coefficient.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            open_store(config)?,
            open_report_generator(config)?,
            config.default_coefficient.clone(),
        ))
    }

    /// Blank form with the configured coefficient
    pub fn new_order(&self) -> Order {
        Order::new(&self.default_coefficient)
    }

    /// Validate and persist; returns the order id
    pub fn save(&self, order: &Order) -> Result<i64> {
        self.store.orders().save(order)
    }

    pub fn load(&self, id: i64) -> Result<Order> {
        self.store
            .orders()
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("Order {id}")))
    }

    pub fn list(&self) -> Result<Vec<Order>> {
        self.store.orders().find_all()
    }

    /// Delete the order with its line items and print history. Documents on
    /// disk are kept.
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.store.orders().delete(id)? {
            return Err(Error::NotFound(format!("Order {id}")));
        }
        info!(order_id = id, "Order deleted");
        Ok(())
    }

    /// Generate the document for a saved order and record it in the history
    pub fn print(&self, id: i64) -> Result<PathBuf> {
        let order = self.load(id)?;
        let printed_at = Local::now().naive_local();
        let path = self.reports.generate(&order, printed_at)?;

        let entry = NewPrintHistoryEntry::snapshot(id, &order, path.clone(), printed_at);
        let recorded = self.store.print_history().append(&entry)?;
        debug!(history_id = recorded.id, order_id = id, "Recorded print");
        Ok(path)
    }

    /// Save, then print what was saved
    pub fn save_and_print(&self, order: &Order) -> Result<(i64, PathBuf)> {
        let id = self.save(order)?;
        let path = self.print(id)?;
        Ok((id, path))
    }

    /// Load a saved order, let `edit` change one of its tables, then save
    /// the whole order again. Returns the order as saved.
    pub fn edit_lines<F>(&self, id: i64, kind: LineKind, edit: F) -> Result<Order>
    where
        F: FnOnce(&mut LineItemTable) -> Result<()>,
    {
        let mut order = self.load(id)?;
        edit(order.table_mut(kind))?;
        self.save(&order)?;
        Ok(order)
    }

    /// Change the coefficient of a saved order
    pub fn set_coefficient(&self, id: i64, coefficient: &str) -> Result<Order> {
        let mut order = self.load(id)?;
        order.coefficient = coefficient.trim().to_string();
        self.save(&order)?;
        Ok(order)
    }
}
