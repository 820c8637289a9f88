use crate::aggregation::utilization::{band, utilization_percent, RiskBand};
use crate::core::country::Country;
use crate::core::entity::EntityName;
use crate::core::limit::LimitPortfolio;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Level at which limit utilization is rolled up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Program,
    Country,
    Entity,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Program => write!(f, "Program"),
            ScopeKind::Country => write!(f, "Country"),
            ScopeKind::Entity => write!(f, "Entity"),
        }
    }
}

/// Utilization figures for one aggregation scope.
///
/// The same three figures back the program, country, and entity
/// utilization cards: total approved, total utilized, and the
/// availability that follows from them. The percentage is computed
/// identically at every scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeUtilization {
    kind: ScopeKind,
    /// Human-readable scope label ("Program", a country, an entity name).
    label: String,
    approved_limit: Decimal,
    utilized: Decimal,
}

impl ScopeUtilization {
    /// Roll up the whole portfolio (the program scope).
    pub fn program(portfolio: &LimitPortfolio) -> Self {
        let mut approved = Decimal::ZERO;
        let mut utilized = Decimal::ZERO;
        for record in portfolio.records() {
            approved += record.approved_limit();
            utilized += record.utilized();
        }
        Self {
            kind: ScopeKind::Program,
            label: "Program".to_string(),
            approved_limit: approved,
            utilized,
        }
    }

    /// Roll up the records booked against entities in one country.
    ///
    /// Records without a recorded country never contribute to any
    /// country scope.
    pub fn country(portfolio: &LimitPortfolio, country: &Country) -> Self {
        let mut approved = Decimal::ZERO;
        let mut utilized = Decimal::ZERO;
        for record in portfolio.records() {
            if record.country() == Some(country) {
                approved += record.approved_limit();
                utilized += record.utilized();
            }
        }
        Self {
            kind: ScopeKind::Country,
            label: country.to_string(),
            approved_limit: approved,
            utilized,
        }
    }

    /// Roll up one entity's records across all facility types.
    pub fn entity(portfolio: &LimitPortfolio, entity: &EntityName) -> Self {
        let mut approved = Decimal::ZERO;
        let mut utilized = Decimal::ZERO;
        for record in portfolio.records() {
            if record.entity() == entity {
                approved += record.approved_limit();
                utilized += record.utilized();
            }
        }
        Self {
            kind: ScopeKind::Entity,
            label: entity.to_string(),
            approved_limit: approved,
            utilized,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn approved_limit(&self) -> Decimal {
        self.approved_limit
    }

    pub fn utilized(&self) -> Decimal {
        self.utilized
    }

    /// Amount still available at this scope.
    pub fn available_limit(&self) -> Decimal {
        self.approved_limit - self.utilized
    }

    /// Utilization percentage (0 when the scope has no approved limit).
    pub fn utilization_percent(&self) -> Decimal {
        utilization_percent(self.utilized, self.approved_limit)
    }

    /// Risk band for this scope's utilization.
    pub fn risk_band(&self) -> RiskBand {
        band(self.utilization_percent())
    }
}

impl fmt::Display for ScopeUtilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = self.utilization_percent();
        let pct_f64 = pct.to_string().parse::<f64>().unwrap_or(0.0);
        writeln!(f, "{} Limit Utilization — {}", self.kind, self.label)?;
        writeln!(f, "  Approved:    {}", self.approved_limit)?;
        writeln!(f, "  Utilized:    {}", self.utilized)?;
        writeln!(f, "  Available:   {}", self.available_limit())?;
        writeln!(f, "  Utilization: {:.1}% [{}]", pct_f64, self.risk_band())
    }
}
