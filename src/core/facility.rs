use serde::{Deserialize, Serialize};
use std::fmt;

/// Facility type under which a credit limit is tracked.
///
/// A facility is a named credit line category: "Issuing Bank",
/// "Confirming Bank", "Obligor", etc. The aggregator partitions
/// limit records by this classification.
///
/// # Examples
///
/// ```
/// use tradefin_engine::core::facility::FacilityType;
///
/// let issuing = FacilityType::new("Issuing Bank");
/// assert_eq!(issuing.as_str(), "Issuing Bank");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityType(String);

impl FacilityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FacilityType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
