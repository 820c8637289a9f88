use crate::core::country::Country;
use crate::core::entity::EntityName;
use crate::core::facility::FacilityType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors arising from limit record construction.
#[derive(Debug, Error)]
pub enum LimitError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// One credit facility line for an entity.
///
/// Carries the four base amounts the credit system tracks. Availability
/// figures are derived on demand and never stored:
///
/// - `available_limit = approved_limit - pfi_rpa_allocation - outstanding_exposure`
/// - `net_available_limit = available_limit - earmark_limit`
///
/// Derived values may be negative (over-utilization); callers surface
/// them as-is rather than clamping.
///
/// # Examples
///
/// ```
/// use tradefin_engine::core::limit::LimitRecord;
/// use tradefin_engine::core::entity::EntityName;
/// use tradefin_engine::core::facility::FacilityType;
/// use rust_decimal_macros::dec;
///
/// let record = LimitRecord::new(
///     EntityName::new("Citibank NA"),
///     FacilityType::new("Issuing Bank"),
///     dec!(10_000_000),
///     dec!(2_000_000),
///     dec!(1_500_000),
///     dec!(500_000),
/// ).unwrap();
///
/// assert_eq!(record.available_limit(), dec!(6_500_000));
/// assert_eq!(record.net_available_limit(), dec!(6_000_000));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitRecord {
    /// Unique identifier for this limit line.
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    /// The entity holding the facility.
    entity: EntityName,
    /// The facility type the limit is booked under.
    facility: FacilityType,
    /// The entity's country, when known. Drives country-scope rollups.
    #[serde(default)]
    country: Option<Country>,
    /// Total limit approved by credit risk.
    #[serde(default)]
    approved_limit: Decimal,
    /// Amount currently allocated to participating institutions.
    #[serde(default)]
    pfi_rpa_allocation: Decimal,
    /// Exposure currently outstanding under the facility.
    #[serde(default)]
    outstanding_exposure: Decimal,
    /// Amount reserved for transactions pending approval.
    #[serde(default)]
    earmark_limit: Decimal,
    /// When this record was captured.
    #[serde(default = "Utc::now")]
    recorded_at: DateTime<Utc>,
    /// Optional reference or memo.
    #[serde(default)]
    reference: Option<String>,
}

impl LimitRecord {
    /// Create a new limit record.
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::NegativeAmount`] if any of the four base
    /// amounts is negative. Records arriving through deserialization
    /// are not re-validated; the aggregation arithmetic is total and
    /// propagates whatever figures are present.
    pub fn new(
        entity: EntityName,
        facility: FacilityType,
        approved_limit: Decimal,
        pfi_rpa_allocation: Decimal,
        outstanding_exposure: Decimal,
        earmark_limit: Decimal,
    ) -> Result<Self, LimitError> {
        for (field, value) in [
            ("approved_limit", approved_limit),
            ("pfi_rpa_allocation", pfi_rpa_allocation),
            ("outstanding_exposure", outstanding_exposure),
            ("earmark_limit", earmark_limit),
        ] {
            if value < Decimal::ZERO {
                return Err(LimitError::NegativeAmount { field, value });
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            entity,
            facility,
            country: None,
            approved_limit,
            pfi_rpa_allocation,
            outstanding_exposure,
            earmark_limit,
            recorded_at: Utc::now(),
            reference: None,
        })
    }

    /// Replace the generated ID (useful for testing / determinism).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Set the entity's country.
    pub fn with_country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }

    /// Set a reference string.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    pub fn facility(&self) -> &FacilityType {
        &self.facility
    }

    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }

    pub fn approved_limit(&self) -> Decimal {
        self.approved_limit
    }

    pub fn pfi_rpa_allocation(&self) -> Decimal {
        self.pfi_rpa_allocation
    }

    pub fn outstanding_exposure(&self) -> Decimal {
        self.outstanding_exposure
    }

    pub fn earmark_limit(&self) -> Decimal {
        self.earmark_limit
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    // --- Derived figures (never stored) ---

    /// Amount still available before earmarks are considered.
    pub fn available_limit(&self) -> Decimal {
        self.approved_limit - self.pfi_rpa_allocation - self.outstanding_exposure
    }

    /// Amount available after earmarks are reserved.
    pub fn net_available_limit(&self) -> Decimal {
        self.available_limit() - self.earmark_limit
    }

    /// Amount consumed by allocations and outstanding exposure.
    pub fn utilized(&self) -> Decimal {
        self.pfi_rpa_allocation + self.outstanding_exposure
    }

    /// Utilization as a percentage of the approved limit (0 when no limit).
    pub fn utilization_percent(&self) -> Decimal {
        crate::aggregation::utilization::utilization_percent(self.utilized(), self.approved_limit)
    }
}

/// A collection of limit records that can be submitted to the aggregator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitPortfolio {
    records: Vec<LimitRecord>,
}

impl LimitPortfolio {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn add(&mut self, record: LimitRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[LimitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total approved limit across all records.
    pub fn gross_approved(&self) -> Decimal {
        self.records.iter().map(|r| r.approved_limit()).sum()
    }

    /// All unique entities referenced in this portfolio.
    pub fn entities(&self) -> Vec<EntityName> {
        let mut entities: Vec<EntityName> =
            self.records.iter().map(|r| r.entity().clone()).collect();
        entities.sort();
        entities.dedup();
        entities
    }

    /// All unique countries referenced in this portfolio.
    pub fn countries(&self) -> Vec<Country> {
        let mut countries: Vec<Country> = self
            .records
            .iter()
            .filter_map(|r| r.country().cloned())
            .collect();
        countries.sort();
        countries.dedup();
        countries
    }

    /// All unique facility types referenced in this portfolio.
    pub fn facilities(&self) -> Vec<FacilityType> {
        let mut facilities: Vec<FacilityType> =
            self.records.iter().map(|r| r.facility().clone()).collect();
        facilities.sort();
        facilities.dedup();
        facilities
    }
}

impl FromIterator<LimitRecord> for LimitPortfolio {
    fn from_iter<T: IntoIterator<Item = LimitRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
