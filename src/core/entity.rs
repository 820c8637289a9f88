use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a client entity in the trade finance program.
///
/// An entity can represent an issuing bank, a corporate obligor,
/// a participating financial institution, or any counterparty
/// that carries credit limits.
///
/// # Examples
///
/// ```
/// use tradefin_engine::core::entity::EntityName;
///
/// let citi = EntityName::new("Citibank NA");
/// let dbs = EntityName::new("DBS Bank");
/// assert_ne!(citi, dbs);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    /// Create a new entity name.
    ///
    /// Entity names match whatever the onboarding system recorded;
    /// no normalization is applied here.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the string representation of this entity name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
