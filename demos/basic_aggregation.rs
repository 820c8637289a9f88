//! Basic limit aggregation example.
//!
//! Demonstrates how a flat list of facility limits rolls up into
//! classification groups, scope totals, and headroom checks.

use rust_decimal_macros::dec;
use tradefin_engine::aggregation::aggregator::LimitAggregator;
use tradefin_engine::aggregation::headroom::HeadroomCheck;
use tradefin_engine::aggregation::scope::ScopeUtilization;
use tradefin_engine::core::country::Country;
use tradefin_engine::core::entity::EntityName;
use tradefin_engine::core::facility::FacilityType;
use tradefin_engine::core::limit::{LimitPortfolio, LimitRecord};

fn main() {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║  tradefin-engine: Basic Aggregation Example   ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // --- Scenario 1: facility rollup ---
    println!("━━━ Scenario 1: Facility Rollup ━━━\n");

    let mut portfolio = LimitPortfolio::new();
    let usa = Country::new("USA");
    let singapore = Country::new("Singapore");

    portfolio.add(
        LimitRecord::new(
            EntityName::new("Citibank NA"),
            FacilityType::new("Issuing Bank"),
            dec!(50_000_000),
            dec!(10_000_000),
            dec!(15_000_000),
            dec!(5_000_000),
        )
        .expect("valid record")
        .with_country(usa.clone()),
    );
    portfolio.add(
        LimitRecord::new(
            EntityName::new("JP Morgan"),
            FacilityType::new("Issuing Bank"),
            dec!(40_000_000),
            dec!(5_000_000),
            dec!(20_000_000),
            dec!(2_000_000),
        )
        .expect("valid record")
        .with_country(usa.clone()),
    );
    portfolio.add(
        LimitRecord::new(
            EntityName::new("DBS Bank"),
            FacilityType::new("Obligor"),
            dec!(30_000_000),
            dec!(0),
            dec!(6_000_000),
            dec!(1_000_000),
        )
        .expect("valid record")
        .with_country(singapore.clone()),
    );

    let result = LimitAggregator::aggregate(&portfolio);
    println!("{}", result);

    // --- Scenario 2: scope utilization ---
    println!("━━━ Scenario 2: Scope Utilization ━━━\n");

    println!("{}", ScopeUtilization::program(&portfolio));
    println!("{}", ScopeUtilization::country(&portfolio, &usa));
    println!(
        "{}",
        ScopeUtilization::entity(&portfolio, &EntityName::new("Citibank NA"))
    );

    // --- Scenario 3: headroom check for a proposed deal ---
    println!("━━━ Scenario 3: Headroom Check ━━━\n");

    let amount = dec!(45_000_000);
    println!(
        "{}",
        HeadroomCheck::new(ScopeUtilization::program(&portfolio), amount)
    );
    println!(
        "{}",
        HeadroomCheck::new(
            ScopeUtilization::entity(&portfolio, &EntityName::new("Citibank NA")),
            amount
        )
    );
}
