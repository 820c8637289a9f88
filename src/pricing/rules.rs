use crate::pricing::context::PricingContext;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Comparison operator for numeric rule criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

impl ComparisonOp {
    pub fn compare<T: PartialOrd>(&self, lhs: T, rhs: T) -> bool {
        match self {
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
        };
        write!(f, "{}", symbol)
    }
}

/// What a rule tests on the transaction.
///
/// Deal value and tenor compare numerically with the rule's operator;
/// obligor rating is equality-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum RuleCriteria {
    DealValue {
        operator: ComparisonOp,
        threshold: Decimal,
    },
    ObligorRating {
        value: String,
    },
    Tenor {
        operator: ComparisonOp,
        threshold: u32,
    },
}

impl RuleCriteria {
    /// Evaluate this criteria against a transaction context.
    ///
    /// A rating criteria never matches a context without a rating.
    pub fn evaluate(&self, ctx: &PricingContext) -> bool {
        match self {
            RuleCriteria::DealValue {
                operator,
                threshold,
            } => operator.compare(ctx.amount, *threshold),
            RuleCriteria::ObligorRating { value } => {
                ctx.obligor_rating.as_deref() == Some(value.as_str())
            }
            RuleCriteria::Tenor {
                operator,
                threshold,
            } => operator.compare(ctx.tenor.as_days(), *threshold),
        }
    }
}

/// Direction of a rule's price adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Discount,
    Premium,
}

/// The price adjustment a rule applies when its criteria matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAction {
    pub kind: AdjustmentKind,
    /// Magnitude of the adjustment, as a percentage. Always stored
    /// positive; the sign comes from the kind.
    pub value_percent: Decimal,
}

impl RuleAction {
    /// Signed adjustment: discounts lower the price, premiums raise it.
    pub fn signed_percent(&self) -> Decimal {
        match self.kind {
            AdjustmentKind::Discount => -self.value_percent,
            AdjustmentKind::Premium => self.value_percent,
        }
    }
}

/// A conditional surcharge/discount rule from the configuration store.
///
/// Rules are independent: several may match the same transaction and
/// all matching active rules apply cumulatively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRule {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub criteria: RuleCriteria,
    pub action: RuleAction,
    pub is_active: bool,
}

impl BusinessRule {
    pub fn new(name: impl Into<String>, criteria: RuleCriteria, action: RuleAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            criteria,
            action,
            is_active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether this rule applies to the given context.
    pub fn applies_to(&self, ctx: &PricingContext) -> bool {
        self.is_active && self.criteria.evaluate(ctx)
    }

    /// Produce the audit record if this rule fires for the context.
    pub fn fire(&self, ctx: &PricingContext) -> Option<FiredRule> {
        if self.applies_to(ctx) {
            Some(FiredRule {
                name: self.name.clone(),
                adjustment: self.action.signed_percent(),
            })
        } else {
            None
        }
    }
}

/// Audit record of one rule that fired during an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredRule {
    pub name: String,
    /// Signed percentage applied to the indicative rate.
    pub adjustment: Decimal,
}
