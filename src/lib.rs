//! # tradefin-engine
//!
//! Trade finance limit utilization and indicative pricing engine.
//!
//! Given facility-level credit limit records and a pricing
//! configuration (matrix, reference tables, business rules), this
//! engine computes limit rollups with availability and risk bands,
//! and evaluates indicative prices against requested prices.
//!
//! Both engines are pure functions over their inputs: no shared
//! state, no I/O, deterministic for a given input.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: entities, countries, facilities, limit records
//! - **aggregation** — Facility rollups, scope utilization, headroom checks
//! - **pricing** — Matrix lookup, rate tables, business rules, verdicts
//! - **simulation** — Random portfolio generation for testing

pub mod aggregation;
pub mod core;
pub mod pricing;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::aggregation::aggregator::{AggregationResult, LimitAggregator, LimitGroup};
    pub use crate::aggregation::headroom::{CheckStatus, HeadroomCheck};
    pub use crate::aggregation::scope::{ScopeKind, ScopeUtilization};
    pub use crate::aggregation::utilization::{band, utilization_percent, RiskBand};
    pub use crate::core::country::Country;
    pub use crate::core::entity::EntityName;
    pub use crate::core::facility::FacilityType;
    pub use crate::core::limit::{LimitPortfolio, LimitRecord};
    pub use crate::core::subtotal::Subtotal;
    pub use crate::pricing::context::{PricingContext, Tenor};
    pub use crate::pricing::engine::{PricingEngine, PricingVerdict, Verdict};
    pub use crate::pricing::matrix::{PricingMatrix, PricingMatrixEntry, ScopeField};
    pub use crate::pricing::rules::BusinessRule;
    pub use crate::pricing::tables::{AdjustmentTable, CountryRate, CountryRateTable, RateTables};
}
