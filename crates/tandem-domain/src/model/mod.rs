//! Domain model types

pub mod catalog;
pub mod line_item;
pub mod line_item_table;
pub mod order;
pub mod print_history;

pub use catalog::{CatalogEntry, IdBand, NewCatalogEntry};
pub use line_item::{LineField, LineItem};
pub use line_item_table::LineItemTable;
pub use order::{Order, DEFAULT_COEFFICIENT};
pub use print_history::{NewPrintHistoryEntry, PrintHistoryEntry, PrintHistoryRecord};
