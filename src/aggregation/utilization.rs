use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Utilization as a percentage of the approved limit.
///
/// This is the single percentage function shared by every aggregation
/// level (record, group, grand total, scope). When `approved` is zero
/// or negative the result is exactly zero — percentage paths never
/// produce NaN or infinity.
pub fn utilization_percent(utilized: Decimal, approved: Decimal) -> Decimal {
    if approved <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    utilized * Decimal::from(100) / approved
}

/// Risk band for a utilization percentage.
///
/// Used by the presentation layer for coloring, but the boundaries are
/// part of the engine contract and tested directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Low => write!(f, "LOW"),
            RiskBand::Medium => write!(f, "MEDIUM"),
            RiskBand::High => write!(f, "HIGH"),
        }
    }
}

/// Band a utilization percentage: `<50` is Low, `50..<85` Medium, `>=85` High.
pub fn band(percentage: Decimal) -> RiskBand {
    if percentage < Decimal::from(50) {
        RiskBand::Low
    } else if percentage < Decimal::from(85) {
        RiskBand::Medium
    } else {
        RiskBand::High
    }
}
