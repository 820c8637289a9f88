use crate::core::limit::LimitRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summed base amounts for a set of limit records.
///
/// A subtotal accumulates the four stored amounts; availability and
/// utilization are re-derived from the summed bases, not by summing
/// per-record derived values. The distinction matters when earmarks
/// interact with shared allocations across records.
///
/// # Examples
///
/// ```
/// use tradefin_engine::core::subtotal::Subtotal;
/// use tradefin_engine::core::limit::LimitRecord;
/// use tradefin_engine::core::entity::EntityName;
/// use tradefin_engine::core::facility::FacilityType;
/// use rust_decimal_macros::dec;
///
/// let mut subtotal = Subtotal::default();
/// subtotal.add_record(&LimitRecord::new(
///     EntityName::new("Citibank NA"),
///     FacilityType::new("Issuing Bank"),
///     dec!(1000), dec!(200), dec!(100), dec!(50),
/// ).unwrap());
///
/// assert_eq!(subtotal.available_limit(), dec!(700));
/// assert_eq!(subtotal.net_available_limit(), dec!(650));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtotal {
    pub approved_limit: Decimal,
    pub pfi_rpa_allocation: Decimal,
    pub outstanding_exposure: Decimal,
    pub earmark_limit: Decimal,
}

impl Subtotal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one record's base amounts.
    pub fn add_record(&mut self, record: &LimitRecord) {
        self.approved_limit += record.approved_limit();
        self.pfi_rpa_allocation += record.pfi_rpa_allocation();
        self.outstanding_exposure += record.outstanding_exposure();
        self.earmark_limit += record.earmark_limit();
    }

    /// Merge another subtotal into this one.
    pub fn merge(&mut self, other: &Subtotal) {
        self.approved_limit += other.approved_limit;
        self.pfi_rpa_allocation += other.pfi_rpa_allocation;
        self.outstanding_exposure += other.outstanding_exposure;
        self.earmark_limit += other.earmark_limit;
    }

    /// Available limit, derived from the summed bases.
    pub fn available_limit(&self) -> Decimal {
        self.approved_limit - self.pfi_rpa_allocation - self.outstanding_exposure
    }

    /// Available limit after earmarks.
    pub fn net_available_limit(&self) -> Decimal {
        self.available_limit() - self.earmark_limit
    }

    /// Amount consumed by allocations and outstanding exposure.
    pub fn utilized(&self) -> Decimal {
        self.pfi_rpa_allocation + self.outstanding_exposure
    }

    /// Utilization as a percentage of the summed approved limit.
    pub fn utilization_percent(&self) -> Decimal {
        crate::aggregation::utilization::utilization_percent(self.utilized(), self.approved_limit)
    }
}

impl FromIterator<Subtotal> for Subtotal {
    fn from_iter<T: IntoIterator<Item = Subtotal>>(iter: T) -> Self {
        let mut total = Subtotal::default();
        for subtotal in iter {
            total.merge(&subtotal);
        }
        total
    }
}
