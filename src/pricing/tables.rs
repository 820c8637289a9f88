use crate::core::country::Country;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base rate and acceptable deviation for one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRate {
    /// Indicative base rate, as a percentage.
    pub base_rate: Decimal,
    /// Half-width of the acceptable range around the indicative rate.
    pub range: Decimal,
}

/// Country base-rate table with a default for unlisted countries.
///
/// Lookups are total: a country absent from the table resolves to the
/// default entry, so the engine always produces an indicative price.
///
/// # Examples
///
/// ```
/// use tradefin_engine::pricing::tables::{CountryRate, CountryRateTable};
/// use tradefin_engine::core::country::Country;
/// use rust_decimal_macros::dec;
///
/// let mut table = CountryRateTable::new(CountryRate {
///     base_rate: dec!(4.0),
///     range: dec!(0.5),
/// });
/// table.set(Country::new("USA"), CountryRate { base_rate: dec!(3.5), range: dec!(0.25) });
///
/// assert_eq!(table.rate_for(&Country::new("USA")).base_rate, dec!(3.5));
/// assert_eq!(table.rate_for(&Country::new("Atlantis")).base_rate, dec!(4.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryRateTable {
    default: CountryRate,
    rates: HashMap<Country, CountryRate>,
}

impl CountryRateTable {
    pub fn new(default: CountryRate) -> Self {
        Self {
            default,
            rates: HashMap::new(),
        }
    }

    pub fn set(&mut self, country: Country, rate: CountryRate) {
        self.rates.insert(country, rate);
    }

    pub fn rate_for(&self, country: &Country) -> CountryRate {
        self.rates.get(country).copied().unwrap_or(self.default)
    }

    pub fn default_rate(&self) -> CountryRate {
        self.default
    }
}

/// Signed percentage offsets keyed by product or tenor label, with a
/// default for unlisted keys. Offsets are additive, never multiplicative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentTable {
    default: Decimal,
    adjustments: HashMap<String, Decimal>,
}

impl AdjustmentTable {
    pub fn new(default: Decimal) -> Self {
        Self {
            default,
            adjustments: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, adjustment: Decimal) {
        self.adjustments.insert(key.into(), adjustment);
    }

    pub fn adjustment_for(&self, key: &str) -> Decimal {
        self.adjustments.get(key).copied().unwrap_or(self.default)
    }
}

/// The fallback rate composition tables, supplied by the caller.
///
/// Used when no pricing matrix entry matches:
/// `base = country.base_rate + product adjustment + tenor adjustment`.
/// The country range applies to every evaluation, matrix hit or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTables {
    pub country: CountryRateTable,
    pub product: AdjustmentTable,
    pub tenor: AdjustmentTable,
}

impl RateTables {
    pub fn new(country: CountryRateTable, product: AdjustmentTable, tenor: AdjustmentTable) -> Self {
        Self {
            country,
            product,
            tenor,
        }
    }
}
