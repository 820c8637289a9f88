//! Portfolio generation utilities.
//!
//! Generates random limit portfolios to exercise the aggregator
//! under various shapes and sizes.

use crate::core::country::Country;
use crate::core::entity::EntityName;
use crate::core::facility::FacilityType;
use crate::core::limit::{LimitPortfolio, LimitRecord};
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};

/// Configuration for generating a random limit portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Number of entities holding limits.
    pub entity_count: usize,
    /// Facility types to book limits under.
    pub facilities: Vec<FacilityType>,
    /// Countries to spread entities across.
    pub countries: Vec<Country>,
    /// Average number of limit records per entity.
    pub avg_records_per_entity: usize,
    /// Minimum approved limit per record.
    pub min_approved: Decimal,
    /// Maximum approved limit per record.
    pub max_approved: Decimal,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            entity_count: 10,
            facilities: vec![
                FacilityType::new("Issuing Bank"),
                FacilityType::new("Confirming Bank"),
                FacilityType::new("Obligor"),
            ],
            countries: vec![Country::new("USA")],
            avg_records_per_entity: 3,
            min_approved: Decimal::from(100_000),
            max_approved: Decimal::from(50_000_000),
        }
    }
}

/// Generate a random limit portfolio for testing.
///
/// Utilization figures are drawn so that each record stays internally
/// plausible: allocations and exposure together never exceed the
/// approved limit, earmarks never exceed what remains.
pub fn generate_random_portfolio(config: &PortfolioConfig) -> LimitPortfolio {
    let mut rng = rand::thread_rng();
    let mut portfolio = LimitPortfolio::new();

    let entities: Vec<EntityName> = (0..config.entity_count)
        .map(|i| EntityName::new(format!("ENTITY-{:03}", i)))
        .collect();

    let total_records = config.entity_count * config.avg_records_per_entity;

    for _ in 0..total_records {
        let entity_idx = rng.gen_range(0..entities.len());
        let facility_idx = rng.gen_range(0..config.facilities.len());
        let country_idx = rng.gen_range(0..config.countries.len());

        let min_f64: f64 = config.min_approved.to_string().parse().unwrap_or(100_000.0);
        let max_f64: f64 = config
            .max_approved
            .to_string()
            .parse()
            .unwrap_or(50_000_000.0);
        let approved_f64 = rng.gen_range(min_f64..max_f64);
        let approved = Decimal::from_f64_retain(approved_f64)
            .unwrap_or(Decimal::from(100_000))
            .round_dp(2);

        let pfi_f64 = rng.gen_range(0.0..approved_f64 * 0.5);
        let outstanding_f64 = rng.gen_range(0.0..approved_f64 * 0.5 - pfi_f64 * 0.5);
        let pfi = Decimal::from_f64_retain(pfi_f64)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2);
        let outstanding = Decimal::from_f64_retain(outstanding_f64)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2);

        let headroom = approved - pfi - outstanding;
        let earmark = if headroom > Decimal::ZERO {
            let headroom_f64: f64 = headroom.to_string().parse().unwrap_or(0.0);
            // Truncate so the earmark never rounds past the headroom.
            Decimal::from_f64_retain(rng.gen_range(0.0..headroom_f64))
                .unwrap_or(Decimal::ZERO)
                .round_dp_with_strategy(2, RoundingStrategy::ToZero)
        } else {
            Decimal::ZERO
        };

        if let Ok(record) = LimitRecord::new(
            entities[entity_idx].clone(),
            config.facilities[facility_idx].clone(),
            approved,
            pfi,
            outstanding,
            earmark,
        ) {
            portfolio.add(record.with_country(config.countries[country_idx].clone()));
        }
    }

    portfolio
}
