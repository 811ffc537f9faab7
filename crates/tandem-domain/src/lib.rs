//! Domain layer: work-order models, pure business rules, repository traits

pub mod model;
pub mod repository;
pub mod service;
