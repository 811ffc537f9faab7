//! Query Service - order search and export

use std::path::Path;

use tandem_domain::model::Order;
use tandem_domain::repository::OrderRepository;
use tandem_domain::service::filter_orders;
use tandem_infra::export::export_orders;
use tandem_store::{SqliteOrderRepository, Store};
use tandem_types::Result;
use tracing::info;

use crate::config::Config;
use crate::repository::open_store;

pub struct QueryService {
    orders: SqliteOrderRepository,
}

impl QueryService {
    pub fn new(store: &Store) -> Self {
        Self {
            orders: store.orders(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&open_store(config)?))
    }

    /// Orders matching `query`, optionally of one vehicle type
    pub fn search(&self, query: &str, vehicle_type: Option<&str>) -> Result<Vec<Order>> {
        let orders = self.orders.find_all()?;
        Ok(filter_orders(&orders, query, vehicle_type)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Distinct vehicle types in use, for the type filter
    pub fn vehicle_types(&self) -> Result<Vec<String>> {
        let mut types: Vec<String> = self
            .orders
            .find_all()?
            .into_iter()
            .map(|order| order.vehicle_type.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        types.sort();
        types.dedup();
        Ok(types)
    }

    /// Write matching orders to an `.xlsx` workbook; returns how many
    pub fn export(&self, query: &str, vehicle_type: Option<&str>, path: &Path) -> Result<usize> {
        let orders = self.search(query, vehicle_type)?;
        export_orders(&orders, path)?;
        info!(count = orders.len(), path = %path.display(), "Exported orders");
        Ok(orders.len())
    }
}
