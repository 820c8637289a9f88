use crate::aggregation::scope::ScopeUtilization;
use crate::aggregation::utilization::{band, utilization_percent, RiskBand};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a headroom check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Passed,
    Warning,
    Failed,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Passed => write!(f, "PASSED"),
            CheckStatus::Warning => write!(f, "WARNING"),
            CheckStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Whether a proposed transaction fits inside a scope's remaining limit.
///
/// Computes the utilization figures as they would stand after booking
/// the transaction amount against the scope. The same check runs at
/// program, country, and entity level, which is why it takes a
/// [`ScopeUtilization`] rather than raw records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadroomCheck {
    scope: ScopeUtilization,
    transaction_amount: Decimal,
}

impl HeadroomCheck {
    pub fn new(scope: ScopeUtilization, transaction_amount: Decimal) -> Self {
        Self {
            scope,
            transaction_amount,
        }
    }

    pub fn scope(&self) -> &ScopeUtilization {
        &self.scope
    }

    pub fn transaction_amount(&self) -> Decimal {
        self.transaction_amount
    }

    /// Utilized amount after the transaction books.
    pub fn post_transaction_utilized(&self) -> Decimal {
        self.scope.utilized() + self.transaction_amount
    }

    /// Available amount after the transaction books. May be negative.
    pub fn post_transaction_available(&self) -> Decimal {
        self.scope.available_limit() - self.transaction_amount
    }

    /// Post-transaction utilization percentage.
    pub fn post_transaction_percent(&self) -> Decimal {
        utilization_percent(self.post_transaction_utilized(), self.scope.approved_limit())
    }

    /// Check verdict.
    ///
    /// `Failed` when the transaction would exceed the scope's limit,
    /// `Warning` when the post-transaction utilization lands in the
    /// high band, `Passed` otherwise.
    pub fn status(&self) -> CheckStatus {
        if self.post_transaction_available() < Decimal::ZERO {
            CheckStatus::Failed
        } else if band(self.post_transaction_percent()) == RiskBand::High {
            CheckStatus::Warning
        } else {
            CheckStatus::Passed
        }
    }
}

impl fmt::Display for HeadroomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.scope.utilization_percent();
        let current_f64 = current.to_string().parse::<f64>().unwrap_or(0.0);
        let post = self.post_transaction_percent();
        let post_f64 = post.to_string().parse::<f64>().unwrap_or(0.0);
        writeln!(f, "{} Limit Check [{}]", self.scope.kind(), self.status())?;
        writeln!(f, "  Scope:               {}", self.scope.label())?;
        writeln!(f, "  Approved:            {}", self.scope.approved_limit())?;
        writeln!(f, "  Transaction Amount:  {}", self.transaction_amount)?;
        writeln!(f, "  Current Utilization: {:.2}%", current_f64)?;
        writeln!(f, "  Post Utilization:    {:.2}%", post_f64)?;
        writeln!(f, "  Post Available:      {}", self.post_transaction_available())
    }
}
