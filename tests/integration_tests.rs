use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tradefin_engine::aggregation::aggregator::LimitAggregator;
use tradefin_engine::aggregation::headroom::{CheckStatus, HeadroomCheck};
use tradefin_engine::aggregation::scope::ScopeUtilization;
use tradefin_engine::aggregation::utilization::RiskBand;
use tradefin_engine::core::country::Country;
use tradefin_engine::core::entity::EntityName;
use tradefin_engine::core::facility::FacilityType;
use tradefin_engine::core::limit::{LimitPortfolio, LimitRecord};
use tradefin_engine::pricing::context::{PricingContext, Tenor};
use tradefin_engine::pricing::engine::{PricingEngine, RateSource, Verdict};
use tradefin_engine::pricing::matrix::{PricingMatrix, PricingMatrixEntry, ScopeField};
use tradefin_engine::pricing::rules::{
    AdjustmentKind, BusinessRule, ComparisonOp, RuleAction, RuleCriteria,
};
use tradefin_engine::pricing::tables::{
    AdjustmentTable, CountryRate, CountryRateTable, RateTables,
};
use uuid::Uuid;

fn record(
    entity: &str,
    facility: &str,
    country: &str,
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
    .with_country(Country::new(country))
}

/// A small but realistic program: two US banks and one Singapore bank
/// across three facility types.
fn sample_portfolio() -> LimitPortfolio {
    let mut portfolio = LimitPortfolio::new();
    portfolio.add(record(
        "Citibank NA",
        "Issuing Bank",
        "USA",
        dec!(50_000_000),
        dec!(10_000_000),
        dec!(15_000_000),
        dec!(5_000_000),
    ));
    portfolio.add(record(
        "Citibank NA",
        "Confirming Bank",
        "USA",
        dec!(20_000_000),
        dec!(2_000_000),
        dec!(3_000_000),
        dec!(0),
    ));
    portfolio.add(record(
        "JP Morgan",
        "Issuing Bank",
        "USA",
        dec!(40_000_000),
        dec!(5_000_000),
        dec!(20_000_000),
        dec!(2_000_000),
    ));
    portfolio.add(record(
        "DBS Bank",
        "Obligor",
        "Singapore",
        dec!(30_000_000),
        dec!(0),
        dec!(6_000_000),
        dec!(1_000_000),
    ));
    portfolio
}

/// Full pipeline test: portfolio → facility rollup → scope totals → headroom.
#[test]
fn full_pipeline_limit_scenario() {
    let portfolio = sample_portfolio();
    assert_eq!(portfolio.len(), 4);
    assert_eq!(portfolio.gross_approved(), dec!(140_000_000));

    // Facility rollup
    let result = LimitAggregator::aggregate(&portfolio);
    assert!(result.is_consistent());
    assert_eq!(result.groups().len(), 3);
    assert_eq!(result.record_count(), 4);

    // First-seen classification order, never alphabetical
    let order: Vec<&str> = result
        .groups()
        .iter()
        .map(|g| g.facility().as_str())
        .collect();
    assert_eq!(order, vec!["Issuing Bank", "Confirming Bank", "Obligor"]);

    let issuing = result
        .group(&FacilityType::new("Issuing Bank"))
        .unwrap()
        .subtotal();
    assert_eq!(issuing.approved_limit, dec!(90_000_000));
    assert_eq!(issuing.available_limit(), dec!(40_000_000));
    assert_eq!(issuing.net_available_limit(), dec!(33_000_000));

    let grand = result.grand_total();
    assert_eq!(grand.approved_limit, dec!(140_000_000));
    assert_eq!(grand.utilized(), dec!(61_000_000));
    assert_eq!(grand.available_limit(), dec!(79_000_000));
    assert_eq!(grand.net_available_limit(), dec!(71_000_000));

    // Scope rollups
    let program = ScopeUtilization::program(&portfolio);
    assert_eq!(program.approved_limit(), dec!(140_000_000));
    assert_eq!(program.utilized(), dec!(61_000_000));
    assert_eq!(program.risk_band(), RiskBand::Low);

    let usa = ScopeUtilization::country(&portfolio, &Country::new("USA"));
    assert_eq!(usa.approved_limit(), dec!(110_000_000));
    assert_eq!(usa.utilized(), dec!(55_000_000));
    assert_eq!(usa.risk_band(), RiskBand::Medium);

    let citi = ScopeUtilization::entity(&portfolio, &EntityName::new("Citibank NA"));
    assert_eq!(citi.approved_limit(), dec!(70_000_000));
    assert_eq!(citi.utilized(), dec!(30_000_000));

    // Headroom check: a deal that fits the program but breaches Citi
    let amount = dec!(45_000_000);
    let program_check = HeadroomCheck::new(program, amount);
    assert_eq!(program_check.status(), CheckStatus::Passed);

    let citi_check = HeadroomCheck::new(citi, amount);
    assert_eq!(citi_check.post_transaction_available(), dec!(-5_000_000));
    assert_eq!(citi_check.status(), CheckStatus::Failed);
}

fn reference_tables() -> RateTables {
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
    product.set("Letter of Credit", Decimal::ZERO);
    product.set("Bank Guarantee", dec!(-0.25));

    let mut tenor = AdjustmentTable::new(dec!(0.05));
    tenor.set("90 days", Decimal::ZERO);
    tenor.set("180 days", dec!(0.2));

    RateTables::new(country, product, tenor)
}

fn standard_rules() -> Vec<BusinessRule> {
    vec![
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
        ),
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
        BusinessRule::new(
            "Extended Tenor Surcharge",
            RuleCriteria::Tenor {
                operator: ComparisonOp::Gt,
                threshold: 180,
            },
            RuleAction {
                kind: AdjustmentKind::Premium,
                value_percent: dec!(0.5),
            },
        )
        .deactivated(),
    ]
}

/// Full pricing pipeline: matrix miss → table composition → rules → verdict.
#[test]
fn full_pipeline_pricing_scenario() {
    let ctx = PricingContext::new(
        dec!(2_000_000),
        Country::new("USA"),
        "Letter of Credit",
        Tenor::days(90),
        "Acme Exports",
        3.40,
    )
    .with_obligor_rating("A");

    let verdict = PricingEngine::evaluate(
        &ctx,
        &PricingMatrix::new(),
        &reference_tables(),
        &standard_rules(),
    )
    .unwrap();

    // 3.5 - 0.2 (large deal) + 0.15 (A-rated); tenor surcharge is inactive
    assert_eq!(verdict.indicative_rate, dec!(3.45));
    assert_eq!(verdict.fired_rules.len(), 2);
    assert_eq!(verdict.rate_source, RateSource::ReferenceTables);
    assert_eq!(verdict.range.min, dec!(3.20));
    assert_eq!(verdict.range.max, dec!(3.70));
    assert_eq!(verdict.verdict, Verdict::Success);
    assert_eq!(verdict.difference, Decimal::ZERO);
}

/// A specific matrix entry overrides the table composition.
#[test]
fn matrix_entry_overrides_tables() {
    let entry = PricingMatrixEntry {
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
    };
    let entry_id = entry.id;
    let matrix: PricingMatrix = [entry].into_iter().collect();

    let ctx = PricingContext::new(
        dec!(750_000),
        Country::new("Germany"),
        "Bank Guarantee",
        Tenor::days(90),
        "BMW",
        2.50,
    );

    let verdict =
        PricingEngine::evaluate(&ctx, &matrix, &reference_tables(), &standard_rules()).unwrap();
    assert_eq!(verdict.indicative_rate, dec!(2.50));
    assert_eq!(verdict.rate_source, RateSource::Matrix(entry_id));
    assert_eq!(verdict.verdict, Verdict::Success);

    // The same transaction priced high gets flagged, with the
    // difference measured from the indicative rate.
    let mut high = ctx.clone();
    high.requested_price = 3.10;
    let verdict =
        PricingEngine::evaluate(&high, &matrix, &reference_tables(), &standard_rules()).unwrap();
    assert_eq!(verdict.verdict, Verdict::Warning);
    assert_eq!(verdict.difference, dec!(0.60));
}

/// Test JSON round-trip for limit records.
#[test]
fn limit_record_json_round_trip() {
    let original = record(
        "Citibank NA",
        "Issuing Bank",
        "USA",
        dec!(50_000_000),
        dec!(10_000_000),
        dec!(15_000_000),
        dec!(5_000_000),
    );

    let json = serde_json::to_string(&original).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["entity"], "Citibank NA");
    assert_eq!(value["facility"], "Issuing Bank");
    assert_eq!(value["country"], "USA");

    let back: LimitRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back.approved_limit(), original.approved_limit());
    assert_eq!(back.available_limit(), original.available_limit());
    assert_eq!(back.id(), original.id());
}

/// Test JSON serialization of pricing verdicts.
#[test]
fn pricing_verdict_json_round_trip() {
    let ctx = PricingContext::new(
        dec!(2_000_000),
        Country::new("USA"),
        "Letter of Credit",
        Tenor::days(90),
        "Acme Exports",
        3.30,
    );

    let verdict = PricingEngine::evaluate(
        &ctx,
        &PricingMatrix::new(),
        &reference_tables(),
        &standard_rules(),
    )
    .unwrap();

    let json = serde_json::to_string(&verdict).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["verdict"], "success");
    assert_eq!(value["rate_source"]["source"], "reference_tables");
    assert_eq!(value["fired_rules"][0]["name"], "Large Transaction Discount");

    let back: tradefin_engine::pricing::engine::PricingVerdict =
        serde_json::from_str(&json).unwrap();
    assert_eq!(back, verdict);
}

/// A pricing configuration can be loaded wholesale from JSON, the way
/// the configuration store delivers it.
#[test]
fn pricing_configuration_from_json() {
    let config = r#"{
        "matrix": {
            "entries": [
                {
                    "country": "USA", "location": "ALL", "bank": "ALL",
                    "beneficiary": "ALL", "product": "Letter of Credit",
                    "tenor": "90 days", "price_100": "2.75", "price_n": "1.85",
                    "risk_coverage_percent": "65", "is_active": true
                }
            ]
        },
        "tables": {
            "country": {
                "default": { "base_rate": "4.0", "range": "0.5" },
                "rates": { "USA": { "base_rate": "3.5", "range": "0.25" } }
            },
            "product": { "default": "0.1", "adjustments": { "Letter of Credit": "0" } },
            "tenor": { "default": "0.05", "adjustments": { "90 days": "0" } }
        },
        "rules": [
            {
                "name": "Large Transaction Discount",
                "criteria": { "field": "deal_value", "operator": ">", "threshold": "1000000" },
                "action": { "kind": "discount", "value_percent": "0.2" },
                "is_active": true
            }
        ]
    }"#;

    #[derive(serde::Deserialize)]
    struct Config {
        matrix: PricingMatrix,
        tables: RateTables,
        rules: Vec<BusinessRule>,
    }

    let config: Config = serde_json::from_str(config).unwrap();
    assert_eq!(config.matrix.len(), 1);
    assert_eq!(config.rules.len(), 1);

    let ctx = PricingContext::new(
        dec!(500_000),
        Country::new("USA"),
        "Letter of Credit",
        Tenor::days(90),
        "Acme Exports",
        2.75,
    );
    let verdict =
        PricingEngine::evaluate(&ctx, &config.matrix, &config.tables, &config.rules).unwrap();
    assert!(matches!(verdict.rate_source, RateSource::Matrix(_)));
    assert_eq!(verdict.indicative_rate, dec!(2.75));
}

/// An empty portfolio aggregates to an all-zero, consistent result.
#[test]
fn empty_portfolio_aggregates_cleanly() {
    let result = LimitAggregator::aggregate(&LimitPortfolio::new());
    assert!(result.groups().is_empty());
    assert!(result.is_consistent());
    assert_eq!(result.grand_total().utilization_percent(), Decimal::ZERO);
}
