//! tradefin-engine CLI
//!
//! Run limit aggregation and pricing evaluation from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Roll up a limit portfolio
//! tradefin-engine aggregate --input limits.json
//!
//! # Include a headroom check for a proposed transaction
//! tradefin-engine aggregate --input limits.json --check-amount 2500000
//!
//! # Evaluate a pricing request
//! tradefin-engine price --input request.json --config pricing.json
//!
//! # Generate a random portfolio for testing
//! tradefin-engine generate --entities 10 --records 30
//! ```

use rust_decimal::Decimal;
use std::fs;
use std::process;
use tradefin_engine::aggregation::aggregator::LimitAggregator;
use tradefin_engine::aggregation::headroom::HeadroomCheck;
use tradefin_engine::aggregation::scope::ScopeUtilization;
use tradefin_engine::core::country::Country;
use tradefin_engine::core::entity::EntityName;
use tradefin_engine::core::facility::FacilityType;
use tradefin_engine::core::limit::{LimitPortfolio, LimitRecord};
use tradefin_engine::pricing::context::PricingContext;
use tradefin_engine::pricing::engine::PricingEngine;
use tradefin_engine::pricing::matrix::PricingMatrix;
use tradefin_engine::pricing::rules::BusinessRule;
use tradefin_engine::pricing::tables::RateTables;
use tradefin_engine::simulation::generator::{generate_random_portfolio, PortfolioConfig};

fn print_usage() {
    eprintln!(
        r#"tradefin-engine — trade finance limit utilization and indicative pricing

USAGE:
    tradefin-engine <COMMAND> [OPTIONS]

COMMANDS:
    aggregate   Roll up a limit portfolio by facility type
    price       Evaluate an indicative price for a transaction
    generate    Generate a random limit portfolio (for testing)
    help        Show this message

OPTIONS (aggregate):
    --input <FILE>        Path to JSON limits file
    --format <FORMAT>     Output format: text (default) or json
    --check-amount <N>    Also run a headroom check for this amount

OPTIONS (price):
    --input <FILE>        Path to JSON pricing request
    --config <FILE>       Path to JSON pricing configuration
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (generate):
    --entities <N>        Number of entities (default: 10)
    --records <N>         Number of limit records (default: 30)
    --countries <LIST>    Comma-separated country names (default: USA)
    --output <FILE>       Write to file instead of stdout

EXAMPLES:
    tradefin-engine aggregate --input limits.json
    tradefin-engine aggregate --input limits.json --check-amount 2500000
    tradefin-engine price --input request.json --config pricing.json --format json
    tradefin-engine generate --entities 20 --countries USA,Germany,Singapore"#
    );
}

/// JSON schema for input limit records.
#[derive(serde::Deserialize)]
struct LimitInput {
    entity: String,
    facility: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    approved_limit: Option<String>,
    #[serde(default)]
    pfi_rpa_allocation: Option<String>,
    #[serde(default)]
    outstanding_exposure: Option<String>,
    #[serde(default)]
    earmark_limit: Option<String>,
}

#[derive(serde::Deserialize)]
struct LimitsFile {
    limits: Vec<LimitInput>,
}

/// JSON schema for the pricing configuration file.
#[derive(serde::Deserialize)]
struct PricingConfigFile {
    matrix: PricingMatrix,
    tables: RateTables,
    #[serde(default)]
    rules: Vec<BusinessRule>,
}

/// JSON output schema for aggregation results.
#[derive(serde::Serialize)]
struct AggregateOutput {
    approved: String,
    utilized: String,
    available: String,
    net_available: String,
    utilization_percent: f64,
    band: String,
    consistent: bool,
    groups: Vec<GroupOutput>,
}

#[derive(serde::Serialize)]
struct GroupOutput {
    facility: String,
    records: usize,
    approved: String,
    available: String,
    net_available: String,
    utilization_percent: f64,
    band: String,
}

#[derive(serde::Serialize)]
struct CheckOutput {
    scope: String,
    status: String,
    post_available: String,
    post_utilization_percent: f64,
}

fn parse_amount(value: Option<String>, field: &str) -> Decimal {
    match value {
        // Absent fields sum as zero, matching the data source.
        None => Decimal::ZERO,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            eprintln!("Invalid {} '{}': {}", field, raw, e);
            process::exit(1);
        }),
    }
}

fn load_portfolio(path: &str) -> LimitPortfolio {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: LimitsFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "limits": [
    {{ "entity": "Citibank NA", "facility": "Issuing Bank", "country": "USA",
      "approved_limit": "10000000", "pfi_rpa_allocation": "2000000",
      "outstanding_exposure": "1500000", "earmark_limit": "500000" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut portfolio = LimitPortfolio::new();
    for input in file.limits {
        let record = LimitRecord::new(
            EntityName::new(&input.entity),
            FacilityType::new(&input.facility),
            parse_amount(input.approved_limit, "approved_limit"),
            parse_amount(input.pfi_rpa_allocation, "pfi_rpa_allocation"),
            parse_amount(input.outstanding_exposure, "outstanding_exposure"),
            parse_amount(input.earmark_limit, "earmark_limit"),
        )
        .unwrap_or_else(|e| {
            eprintln!("Invalid limit record for '{}': {}", input.entity, e);
            process::exit(1);
        });
        let record = match input.country {
            Some(country) => record.with_country(Country::new(country)),
            None => record,
        };
        portfolio.add(record);
    }
    portfolio
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(0.0)
}

fn cmd_aggregate(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut check_amount: Option<Decimal> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--check-amount" => {
                i += 1;
                check_amount = Some(
                    args.get(i)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(|| {
                            eprintln!("--check-amount requires a number");
                            process::exit(1);
                        }),
                );
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let portfolio = load_portfolio(&path);
    let result = LimitAggregator::aggregate(&portfolio);

    if format == "json" {
        let groups = result
            .groups()
            .iter()
            .map(|g| GroupOutput {
                facility: g.facility().to_string(),
                records: g.records().len(),
                approved: g.subtotal().approved_limit.to_string(),
                available: g.subtotal().available_limit().to_string(),
                net_available: g.subtotal().net_available_limit().to_string(),
                utilization_percent: decimal_to_f64(g.subtotal().utilization_percent()),
                band: g.risk_band().to_string(),
            })
            .collect();

        let grand = result.grand_total();
        let output = AggregateOutput {
            approved: grand.approved_limit.to_string(),
            utilized: grand.utilized().to_string(),
            available: grand.available_limit().to_string(),
            net_available: grand.net_available_limit().to_string(),
            utilization_percent: decimal_to_f64(grand.utilization_percent()),
            band: tradefin_engine::aggregation::utilization::band(grand.utilization_percent())
                .to_string(),
            consistent: result.is_consistent(),
            groups,
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());

        if let Some(amount) = check_amount {
            let mut checks = Vec::new();
            let program = HeadroomCheck::new(ScopeUtilization::program(&portfolio), amount);
            checks.push(CheckOutput {
                scope: "Program".to_string(),
                status: program.status().to_string(),
                post_available: program.post_transaction_available().to_string(),
                post_utilization_percent: decimal_to_f64(program.post_transaction_percent()),
            });
            for country in portfolio.countries() {
                let check =
                    HeadroomCheck::new(ScopeUtilization::country(&portfolio, &country), amount);
                checks.push(CheckOutput {
                    scope: country.to_string(),
                    status: check.status().to_string(),
                    post_available: check.post_transaction_available().to_string(),
                    post_utilization_percent: decimal_to_f64(check.post_transaction_percent()),
                });
            }
            println!("{}", serde_json::to_string_pretty(&checks).unwrap());
        }
    } else {
        println!("{}", result);

        println!("{}", ScopeUtilization::program(&portfolio));
        for country in portfolio.countries() {
            println!("{}", ScopeUtilization::country(&portfolio, &country));
        }
        for entity in portfolio.entities() {
            println!("{}", ScopeUtilization::entity(&portfolio, &entity));
        }

        if let Some(amount) = check_amount {
            println!(
                "{}",
                HeadroomCheck::new(ScopeUtilization::program(&portfolio), amount)
            );
            for country in portfolio.countries() {
                println!(
                    "{}",
                    HeadroomCheck::new(ScopeUtilization::country(&portfolio, &country), amount)
                );
            }
        }
    }
}

fn cmd_price(args: &[String]) {
    let mut input_path = None;
    let mut config_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--config" => {
                i += 1;
                config_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--config requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    let config_path = config_path.unwrap_or_else(|| {
        eprintln!("Error: --config <FILE> is required");
        process::exit(1);
    });

    let request = fs::read_to_string(&input_path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", input_path, e);
        process::exit(1);
    });
    let ctx: PricingContext = serde_json::from_str(&request).unwrap_or_else(|e| {
        eprintln!("Error parsing pricing request: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "amount": "2000000", "country": "USA", "product": "Letter of Credit",
  "tenor": "90 days", "beneficiary": "Acme Exports",
  "obligor_rating": "A", "requested_price": 3.5
}}"#
        );
        process::exit(1);
    });

    let config = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", config_path, e);
        process::exit(1);
    });
    let config: PricingConfigFile = serde_json::from_str(&config).unwrap_or_else(|e| {
        eprintln!("Error parsing pricing configuration: {}", e);
        process::exit(1);
    });

    let verdict = PricingEngine::evaluate(&ctx, &config.matrix, &config.tables, &config.rules)
        .unwrap_or_else(|e| {
            eprintln!("Pricing evaluation failed: {}", e);
            process::exit(1);
        });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&verdict).unwrap());
    } else {
        println!("{}", verdict);
    }
}

fn cmd_generate(args: &[String]) {
    let mut entities = 10usize;
    let mut records = 30usize;
    let mut countries_str = "USA".to_string();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--entities" => {
                i += 1;
                entities = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--entities requires a number");
                        process::exit(1);
                    });
            }
            "--records" => {
                i += 1;
                records = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--records requires a number");
                        process::exit(1);
                    });
            }
            "--countries" => {
                i += 1;
                countries_str = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--countries requires a comma-separated list");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let countries: Vec<Country> = countries_str
        .split(',')
        .map(|s| Country::new(s.trim()))
        .collect();

    let config = PortfolioConfig {
        entity_count: entities,
        countries,
        avg_records_per_entity: records / entities.max(1),
        ..Default::default()
    };

    let portfolio = generate_random_portfolio(&config);

    #[derive(serde::Serialize)]
    struct OutputLimit {
        entity: String,
        facility: String,
        country: Option<String>,
        approved_limit: String,
        pfi_rpa_allocation: String,
        outstanding_exposure: String,
        earmark_limit: String,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        limits: Vec<OutputLimit>,
    }

    let output = OutputFile {
        limits: portfolio
            .records()
            .iter()
            .map(|r| OutputLimit {
                entity: r.entity().to_string(),
                facility: r.facility().to_string(),
                country: r.country().map(|c| c.to_string()),
                approved_limit: r.approved_limit().to_string(),
                pfi_rpa_allocation: r.pfi_rpa_allocation().to_string(),
                outstanding_exposure: r.outstanding_exposure().to_string(),
                earmark_limit: r.earmark_limit().to_string(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} limit records across {} entities → {}",
            portfolio.len(),
            entities,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "aggregate" => cmd_aggregate(rest),
        "price" => cmd_price(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
