//! Core types and error definitions shared by every tandem crate

mod error;
mod types;

pub use error::*;
pub use types::*;
