use crate::core::country::Country;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors arising from pricing evaluation.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("requested price must be a finite number, got {value}")]
    NonFiniteRequestedPrice { value: f64 },
}

/// Tenor of a financial instrument, in days.
///
/// The configuration store writes tenors as display strings
/// ("90 days") while transaction records carry a bare day count;
/// both forms deserialize to the same value.
///
/// # Examples
///
/// ```
/// use tradefin_engine::pricing::context::Tenor;
///
/// let tenor = Tenor::days(90);
/// assert_eq!(format!("{}", tenor), "90 days");
/// assert_eq!("90 days".parse::<Tenor>().unwrap(), tenor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tenor(u32);

impl Tenor {
    pub fn days(days: u32) -> Self {
        Self(days)
    }

    pub fn as_days(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.0)
    }
}

impl FromStr for Tenor {
    type Err = std::num::ParseIntError;

    /// Accepts `"90"`, `"90 days"`, `"90 Days"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .split_whitespace()
            .next()
            .unwrap_or(s.trim());
        digits.parse::<u32>().map(Tenor)
    }
}

impl Serialize for Tenor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Tenor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Tenor;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a day count or a \"<n> days\" string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Tenor, E> {
                u32::try_from(v)
                    .map(Tenor)
                    .map_err(|_| de::Error::custom(format!("tenor out of range: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Tenor, E> {
                u32::try_from(v)
                    .map(Tenor)
                    .map_err(|_| de::Error::custom(format!("tenor out of range: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Tenor, E> {
                v.parse()
                    .map_err(|_| de::Error::custom(format!("invalid tenor: {v}")))
            }
        }
        deserializer.deserialize_any(V)
    }
}

fn full_cover() -> Decimal {
    Decimal::from(100)
}

/// One transaction's pricing inputs. Ephemeral — built per evaluation,
/// never persisted, and the engine holds no state between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingContext {
    /// Deal value in the program currency.
    pub amount: Decimal,
    pub country: Country,
    pub product: String,
    pub tenor: Tenor,
    pub beneficiary: String,
    /// Obligor rating when known; rating rules cannot fire without it.
    #[serde(default)]
    pub obligor_rating: Option<String>,
    /// Risk participation cover, as a percentage. Full cover prices at
    /// the matrix's 100% tier.
    #[serde(default = "full_cover")]
    pub risk_cover_percent: Decimal,
    /// The client's requested price. Form input, so it arrives as a
    /// float and is validated by the engine.
    pub requested_price: f64,
}

impl PricingContext {
    pub fn new(
        amount: Decimal,
        country: Country,
        product: impl Into<String>,
        tenor: Tenor,
        beneficiary: impl Into<String>,
        requested_price: f64,
    ) -> Self {
        Self {
            amount,
            country,
            product: product.into(),
            tenor,
            beneficiary: beneficiary.into(),
            obligor_rating: None,
            risk_cover_percent: full_cover(),
            requested_price,
        }
    }

    pub fn with_obligor_rating(mut self, rating: impl Into<String>) -> Self {
        self.obligor_rating = Some(rating.into());
        self
    }

    pub fn with_risk_cover(mut self, percent: Decimal) -> Self {
        self.risk_cover_percent = percent;
        self
    }
}
