use serde::{Deserialize, Serialize};
use std::fmt;

/// Country identifier used for country-level limits and pricing lookups.
///
/// Values match the configuration store ("USA", "Germany", "Singapore");
/// both engines treat the country as an opaque key.
///
/// # Examples
///
/// ```
/// use tradefin_engine::core::country::Country;
///
/// let usa = Country::new("USA");
/// let germany = Country::new("Germany");
/// assert_ne!(usa, germany);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(String);

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Country {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
