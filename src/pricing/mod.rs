//! Indicative pricing: matrix lookup, reference tables, business rules.

pub mod context;
pub mod engine;
pub mod matrix;
pub mod rules;
pub mod tables;
