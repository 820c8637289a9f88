use crate::aggregation::utilization::{band, RiskBand};
use crate::core::facility::FacilityType;
use crate::core::limit::{LimitPortfolio, LimitRecord};
use crate::core::subtotal::Subtotal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One classification bucket: the records booked under a facility type
/// plus their memoized subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitGroup {
    facility: FacilityType,
    records: Vec<LimitRecord>,
    subtotal: Subtotal,
}

impl LimitGroup {
    pub fn facility(&self) -> &FacilityType {
        &self.facility
    }

    pub fn records(&self) -> &[LimitRecord] {
        &self.records
    }

    pub fn subtotal(&self) -> &Subtotal {
        &self.subtotal
    }

    /// Risk band of this group's utilization.
    pub fn risk_band(&self) -> RiskBand {
        band(self.subtotal.utilization_percent())
    }
}

/// Result of rolling up a limit portfolio by facility type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Groups in first-seen classification order.
    groups: Vec<LimitGroup>,
    /// All records summed, independent of classification.
    grand_total: Subtotal,
}

impl AggregationResult {
    pub fn groups(&self) -> &[LimitGroup] {
        &self.groups
    }

    pub fn grand_total(&self) -> &Subtotal {
        &self.grand_total
    }

    /// Look up a group by facility type.
    pub fn group(&self, facility: &FacilityType) -> Option<&LimitGroup> {
        self.groups.iter().find(|g| g.facility() == facility)
    }

    /// Number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    /// Verify the result is valid: groups partition the input exactly,
    /// so their subtotals sum to the grand total.
    pub fn is_consistent(&self) -> bool {
        let summed: Subtotal = self.groups.iter().map(|g| g.subtotal.clone()).collect();
        summed == self.grand_total
    }
}

impl std::fmt::Display for AggregationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Limit Aggregation ===")?;
        writeln!(f, "Approved:       {}", self.grand_total.approved_limit)?;
        writeln!(f, "Utilized:       {}", self.grand_total.utilized())?;
        writeln!(f, "Available:      {}", self.grand_total.available_limit())?;
        writeln!(f, "Net Available:  {}", self.grand_total.net_available_limit())?;
        let pct = self.grand_total.utilization_percent();
        let pct_f64 = pct.to_string().parse::<f64>().unwrap_or(0.0);
        writeln!(f, "Utilization:    {:.1}% [{}]", pct_f64, band(pct))?;

        for group in &self.groups {
            writeln!(f, "\n--- {} ---", group.facility())?;
            writeln!(f, "  Records:       {}", group.records.len())?;
            writeln!(f, "  Approved:      {}", group.subtotal.approved_limit)?;
            writeln!(f, "  Available:     {}", group.subtotal.available_limit())?;
            writeln!(f, "  Net Available: {}", group.subtotal.net_available_limit())?;
            let gp = group.subtotal.utilization_percent();
            let gp_f64 = gp.to_string().parse::<f64>().unwrap_or(0.0);
            writeln!(f, "  Utilization:   {:.1}% [{}]", gp_f64, band(gp))?;
        }
        Ok(())
    }
}

/// The core limit aggregation engine.
///
/// Rolls a flat list of facility-level limit records up into
/// classification buckets with subtotals and a grand total.
pub struct LimitAggregator;

impl LimitAggregator {
    /// Aggregate a portfolio by facility type.
    ///
    /// # Algorithm
    ///
    /// 1. Partition records by facility type, preserving first-seen
    ///    order of classifications (downstream rendering expects
    ///    insertion order, never alphabetical).
    /// 2. Each group sums the four base amounts; availability is
    ///    derived from the summed bases.
    /// 3. The grand total merges all group subtotals.
    ///
    /// Accepts any records, including an empty portfolio and records
    /// with negative figures; the arithmetic is total.
    pub fn aggregate(portfolio: &LimitPortfolio) -> AggregationResult {
        let mut groups: Vec<LimitGroup> = Vec::new();
        let mut index: HashMap<FacilityType, usize> = HashMap::new();

        for record in portfolio.records() {
            let slot = *index.entry(record.facility().clone()).or_insert_with(|| {
                groups.push(LimitGroup {
                    facility: record.facility().clone(),
                    records: Vec::new(),
                    subtotal: Subtotal::default(),
                });
                groups.len() - 1
            });
            groups[slot].records.push(record.clone());
            groups[slot].subtotal.add_record(record);
        }

        let grand_total: Subtotal = groups.iter().map(|g| g.subtotal.clone()).collect();

        log::debug!(
            "aggregated {} records into {} facility groups, approved total {}",
            portfolio.len(),
            groups.len(),
            grand_total.approved_limit
        );

        AggregationResult {
            groups,
            grand_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::EntityName;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(
        entity: &str,
        facility: &str,
        approved: Decimal,
        pfi: Decimal,
        outstanding: Decimal,
        earmark: Decimal,
    ) -> LimitRecord {
        LimitRecord::new(
            EntityName::new(entity),
            FacilityType::new(facility),
            approved,
            pfi,
            outstanding,
            earmark,
        )
        .unwrap()
    }

    #[test]
    fn test_groups_preserve_first_seen_order() {
        let mut portfolio = LimitPortfolio::new();
        portfolio.add(record("A", "Obligor", dec!(100), dec!(0), dec!(0), dec!(0)));
        portfolio.add(record("B", "Issuing Bank", dec!(200), dec!(0), dec!(0), dec!(0)));
        portfolio.add(record("C", "Obligor", dec!(300), dec!(0), dec!(0), dec!(0)));
        portfolio.add(record("D", "Confirming Bank", dec!(400), dec!(0), dec!(0), dec!(0)));

        let result = LimitAggregator::aggregate(&portfolio);
        let order: Vec<&str> = result.groups().iter().map(|g| g.facility().as_str()).collect();
        assert_eq!(order, vec!["Obligor", "Issuing Bank", "Confirming Bank"]);
    }

    #[test]
    fn test_group_subtotals_and_grand_total() {
        let mut portfolio = LimitPortfolio::new();
        portfolio.add(record("A", "Obligor", dec!(1000), dec!(200), dec!(100), dec!(50)));
        portfolio.add(record("B", "Obligor", dec!(500), dec!(100), dec!(0), dec!(0)));
        portfolio.add(record("C", "Issuing Bank", dec!(2000), dec!(0), dec!(600), dec!(100)));

        let result = LimitAggregator::aggregate(&portfolio);
        assert!(result.is_consistent());

        let obligor = result.group(&FacilityType::new("Obligor")).unwrap();
        assert_eq!(obligor.subtotal().approved_limit, dec!(1500));
        assert_eq!(obligor.subtotal().available_limit(), dec!(1100));
        assert_eq!(obligor.subtotal().net_available_limit(), dec!(1050));

        assert_eq!(result.grand_total().approved_limit, dec!(3500));
        assert_eq!(result.grand_total().utilized(), dec!(1000));
        assert_eq!(result.grand_total().net_available_limit(), dec!(2350));
    }

    #[test]
    fn test_empty_portfolio() {
        let result = LimitAggregator::aggregate(&LimitPortfolio::new());
        assert!(result.groups().is_empty());
        assert_eq!(result.grand_total().approved_limit, Decimal::ZERO);
        assert_eq!(result.grand_total().utilization_percent(), Decimal::ZERO);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_no_record_dropped_or_duplicated() {
        let mut portfolio = LimitPortfolio::new();
        for i in 0..7 {
            let facility = if i % 2 == 0 { "Obligor" } else { "Issuing Bank" };
            portfolio.add(record("A", facility, dec!(100), dec!(10), dec!(5), dec!(1)));
        }
        let result = LimitAggregator::aggregate(&portfolio);
        assert_eq!(result.record_count(), 7);
    }

    #[test]
    fn test_negative_figures_propagate() {
        // Records arriving over the wire may carry negative figures;
        // the rollup surfaces them instead of rejecting.
        let json = r#"{"entity": "A", "facility": "Obligor", "approved_limit": "-100"}"#;
        let bad: LimitRecord = serde_json::from_str(json).unwrap();
        let mut portfolio = LimitPortfolio::new();
        portfolio.add(bad);
        let result = LimitAggregator::aggregate(&portfolio);
        assert_eq!(result.grand_total().approved_limit, dec!(-100));
        assert_eq!(result.grand_total().utilization_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_group_risk_band() {
        let mut portfolio = LimitPortfolio::new();
        portfolio.add(record("A", "Obligor", dec!(100), dec!(90), dec!(0), dec!(0)));
        let result = LimitAggregator::aggregate(&portfolio);
        assert_eq!(result.groups()[0].risk_band(), RiskBand::High);
    }
}
