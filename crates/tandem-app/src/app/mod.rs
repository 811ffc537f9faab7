//! Use cases behind the command line

pub mod catalog_service;
pub mod draft;
pub mod history_service;
pub mod order_service;
pub mod query_service;

pub use catalog_service::CatalogService;
pub use draft::{LineDraft, OrderDraft};
pub use history_service::HistoryService;
pub use order_service::OrderService;
pub use query_service::QueryService;
