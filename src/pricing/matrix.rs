use crate::pricing::context::PricingContext;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// One scoping field of a pricing matrix entry.
///
/// The configuration store writes the wildcard as the string `"ALL"`;
/// in memory it is a distinct variant so that an entity legitimately
/// named "ALL" can never be confused with a wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeField {
    Wildcard,
    Literal(String),
}

impl ScopeField {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, ScopeField::Wildcard)
    }

    /// Whether this field accepts the given value.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            ScopeField::Wildcard => true,
            ScopeField::Literal(v) => v == value,
        }
    }
}

impl fmt::Display for ScopeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeField::Wildcard => write!(f, "ALL"),
            ScopeField::Literal(v) => write!(f, "{}", v),
        }
    }
}

// The "ALL" sentinel exists only on the wire.
impl Serialize for ScopeField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScopeField::Wildcard => serializer.serialize_str("ALL"),
            ScopeField::Literal(v) => serializer.serialize_str(v),
        }
    }
}

impl<'de> Deserialize<'de> for ScopeField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = ScopeField;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a scope value or \"ALL\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ScopeField, E> {
                if v == "ALL" {
                    Ok(ScopeField::Wildcard)
                } else {
                    Ok(ScopeField::Literal(v.to_string()))
                }
            }
        }
        deserializer.deserialize_str(V)
    }
}

/// One row of the pricing matrix.
///
/// Scopes a pair of rates (full cover / partial cover) to a
/// country/location/bank/beneficiary/product/tenor combination, any of
/// which may be wildcarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingMatrixEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub country: ScopeField,
    pub location: ScopeField,
    pub bank: ScopeField,
    pub beneficiary: ScopeField,
    pub product: ScopeField,
    pub tenor: ScopeField,
    /// Rate when risk participation covers 100% of the exposure.
    pub price_100: Decimal,
    /// Rate at partial cover.
    pub price_n: Decimal,
    pub risk_coverage_percent: Decimal,
    pub is_active: bool,
}

impl PricingMatrixEntry {
    /// Whether every scoping field accepts the context.
    ///
    /// Location and bank are not part of the transaction context in
    /// this engine; they match only when wildcarded.
    pub fn matches(&self, ctx: &PricingContext) -> bool {
        self.country.matches(ctx.country.as_str())
            && self.location.is_wildcard()
            && self.bank.is_wildcard()
            && self.beneficiary.matches(&ctx.beneficiary)
            && self.product.matches(&ctx.product)
            && self.tenor.matches(&ctx.tenor.to_string())
    }

    /// Number of wildcarded fields; fewer means more specific.
    pub fn wildcard_count(&self) -> usize {
        [
            &self.country,
            &self.location,
            &self.bank,
            &self.beneficiary,
            &self.product,
            &self.tenor,
        ]
        .iter()
        .filter(|f| f.is_wildcard())
        .count()
    }

    /// Rate for the given risk cover: the 100% tier at full cover,
    /// the partial tier otherwise.
    pub fn rate_for_cover(&self, cover_percent: Decimal) -> Decimal {
        if cover_percent >= Decimal::from(100) {
            self.price_100
        } else {
            self.price_n
        }
    }
}

/// The pricing matrix: an ordered set of entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingMatrix {
    entries: Vec<PricingMatrixEntry>,
}

impl PricingMatrix {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, entry: PricingMatrixEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[PricingMatrixEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Select the most specific active entry matching the context.
    ///
    /// Fewest wildcards wins; ties resolve to the earliest entry so
    /// the lookup stays deterministic for a given matrix order.
    pub fn best_match(&self, ctx: &PricingContext) -> Option<&PricingMatrixEntry> {
        let mut best: Option<&PricingMatrixEntry> = None;
        for entry in self.entries.iter().filter(|e| e.is_active && e.matches(ctx)) {
            match best {
                // Strictly fewer wildcards replaces; equal keeps the earlier entry.
                Some(b) if entry.wildcard_count() >= b.wildcard_count() => {}
                _ => best = Some(entry),
            }
        }
        best
    }
}

impl FromIterator<PricingMatrixEntry> for PricingMatrix {
    fn from_iter<T: IntoIterator<Item = PricingMatrixEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
