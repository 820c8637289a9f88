//! Pricing evaluation walkthrough.
//!
//! Demonstrates matrix lookup, reference-table fallback, and
//! business-rule adjustments for a set of transactions.

use rust_decimal_macros::dec;
use tradefin_engine::core::country::Country;
use tradefin_engine::pricing::context::{PricingContext, Tenor};
use tradefin_engine::pricing::engine::PricingEngine;
use tradefin_engine::pricing::matrix::{PricingMatrix, PricingMatrixEntry, ScopeField};
use tradefin_engine::pricing::rules::{
    AdjustmentKind, BusinessRule, ComparisonOp, RuleAction, RuleCriteria,
};
use tradefin_engine::pricing::tables::{
    AdjustmentTable, CountryRate, CountryRateTable, RateTables,
};
use uuid::Uuid;

fn main() {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║  tradefin-engine: Pricing Walkthrough         ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Configuration: one specific matrix row, reference tables, rules.
    let mut matrix = PricingMatrix::new();
    matrix.add(PricingMatrixEntry {
        id: Uuid::new_v4(),
        country: ScopeField::literal("Germany"),
        location: ScopeField::Wildcard,
        bank: ScopeField::Wildcard,
        beneficiary: ScopeField::literal("BMW"),
        product: ScopeField::literal("Bank Guarantee"),
        tenor: ScopeField::literal("90 days"),
        price_100: dec!(2.50),
        price_n: dec!(1.60),
        risk_coverage_percent: dec!(65),
        is_active: true,
    });

    let mut country = CountryRateTable::new(CountryRate {
        base_rate: dec!(4.0),
        range: dec!(0.5),
    });
    country.set(
        Country::new("USA"),
        CountryRate {
            base_rate: dec!(3.5),
            range: dec!(0.25),
        },
    );
    country.set(
        Country::new("Germany"),
        CountryRate {
            base_rate: dec!(3.0),
            range: dec!(0.3),
        },
    );

    let mut product = AdjustmentTable::new(dec!(0.1));
    product.set("Letter of Credit", dec!(0));
    product.set("Bank Guarantee", dec!(-0.25));

    let mut tenor = AdjustmentTable::new(dec!(0.05));
    tenor.set("90 days", dec!(0));
    tenor.set("180 days", dec!(0.2));

    let tables = RateTables::new(country, product, tenor);

    let rules = vec![
        BusinessRule::new(
            "Large Transaction Discount",
            RuleCriteria::DealValue {
                operator: ComparisonOp::Gt,
                threshold: dec!(1_000_000),
            },
            RuleAction {
                kind: AdjustmentKind::Discount,
                value_percent: dec!(0.2),
            },
        )
        .with_description("Deals over $1,000,000 price 0.2% below the reference"),
        BusinessRule::new(
            "Premium for A-Rated Obligors",
            RuleCriteria::ObligorRating {
                value: "A".to_string(),
            },
            RuleAction {
                kind: AdjustmentKind::Premium,
                value_percent: dec!(0.15),
            },
        ),
    ];

    // --- Scenario 1: table fallback, no rules fire ---
    println!("━━━ Scenario 1: US Letter of Credit, table fallback ━━━\n");
    let ctx = PricingContext::new(
        dec!(500_000),
        Country::new("USA"),
        "Letter of Credit",
        Tenor::days(90),
        "Acme Exports",
        3.50,
    );
    let verdict = PricingEngine::evaluate(&ctx, &matrix, &tables, &rules).expect("finite price");
    println!("{}", verdict);

    // --- Scenario 2: a large A-rated deal, two rules fire ---
    println!("━━━ Scenario 2: Large A-rated deal ━━━\n");
    let ctx = PricingContext::new(
        dec!(2_000_000),
        Country::new("USA"),
        "Letter of Credit",
        Tenor::days(90),
        "Acme Exports",
        3.80,
    )
    .with_obligor_rating("A");
    let verdict = PricingEngine::evaluate(&ctx, &matrix, &tables, &rules).expect("finite price");
    println!("{}", verdict);

    // --- Scenario 3: the matrix row wins for the scoped deal ---
    println!("━━━ Scenario 3: German Bank Guarantee, matrix hit ━━━\n");
    let ctx = PricingContext::new(
        dec!(750_000),
        Country::new("Germany"),
        "Bank Guarantee",
        Tenor::days(90),
        "BMW",
        2.45,
    );
    let verdict = PricingEngine::evaluate(&ctx, &matrix, &tables, &rules).expect("finite price");
    println!("{}", verdict);
}
