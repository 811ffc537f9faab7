//! Domain services: pure business rules over the models

pub mod numeric;
pub mod search;
pub mod suggestion;
pub mod totals;
pub mod validation;

pub use search::{filter_orders, matches_search};
pub use suggestion::{resolve, suggest, SuggestionFallback, SUGGESTION_LIMIT};
pub use totals::{calculate_recorded_totals, calculate_totals, OrderTotals};
pub use validation::validate;
