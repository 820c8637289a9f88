use crate::pricing::context::{PricingContext, PricingError};
use crate::pricing::matrix::PricingMatrix;
use crate::pricing::rules::{BusinessRule, FiredRule};
use crate::pricing::tables::RateTables;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of comparing the requested price to the acceptable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Requested price is inside the range (inclusive both ends).
    Success,
    /// Requested price is above the range.
    Warning,
    /// Requested price is below the range.
    Info,
}

/// Acceptable price range around the indicative rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Where the base rate came from, for audit display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "entry_id", rename_all = "snake_case")]
pub enum RateSource {
    /// A pricing matrix entry supplied the base rate.
    Matrix(Uuid),
    /// No matrix entry matched; the rate was composed from the
    /// country/product/tenor reference tables.
    ReferenceTables,
}

/// Result of one pricing evaluation.
///
/// All monetary figures are rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingVerdict {
    pub verdict: Verdict,
    pub indicative_rate: Decimal,
    pub requested_price: Decimal,
    /// Requested minus indicative when outside the range, zero inside.
    pub difference: Decimal,
    pub range: PriceRange,
    /// Every rule that fired, with its signed adjustment.
    pub fired_rules: Vec<FiredRule>,
    pub rate_source: RateSource,
}

impl std::fmt::Display for PricingVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.verdict {
            Verdict::Success => "WITHIN RANGE",
            Verdict::Warning => "ABOVE RANGE",
            Verdict::Info => "BELOW RANGE",
        };
        writeln!(f, "=== Pricing Verdict ===")?;
        writeln!(f, "Indicative Rate: {}%", self.indicative_rate)?;
        writeln!(f, "Requested Price: {}%", self.requested_price)?;
        writeln!(f, "Range:           {}% – {}%", self.range.min, self.range.max)?;
        writeln!(f, "Verdict:         {}", label)?;
        writeln!(f, "Difference:      {}%", self.difference)?;
        match self.rate_source {
            RateSource::Matrix(id) => writeln!(f, "Rate Source:     matrix entry {}", id)?,
            RateSource::ReferenceTables => writeln!(f, "Rate Source:     reference tables")?,
        }
        if self.fired_rules.is_empty() {
            writeln!(f, "Rules Applied:   none")?;
        } else {
            writeln!(f, "Rules Applied:")?;
            for rule in &self.fired_rules {
                writeln!(f, "  {:<32} {}%", rule.name, rule.adjustment)?;
            }
        }
        Ok(())
    }
}

/// The pricing rule engine.
///
/// A single synchronous pass over the supplied configuration: matrix
/// lookup (or reference-table composition), cumulative rule
/// application, then a range verdict against the requested price.
pub struct PricingEngine;

impl PricingEngine {
    /// Evaluate one transaction against the pricing configuration.
    ///
    /// Lookups never fail — an unmatched matrix falls back to the
    /// reference tables and unlisted table keys resolve to defaults —
    /// so an indicative price is always produced.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::NonFiniteRequestedPrice`] when the
    /// requested price is NaN or infinite. This is the engine's only
    /// error path.
    pub fn evaluate(
        ctx: &PricingContext,
        matrix: &PricingMatrix,
        tables: &RateTables,
        rules: &[BusinessRule],
    ) -> Result<PricingVerdict, PricingError> {
        let requested = Decimal::from_f64_retain(ctx.requested_price)
            .ok_or(PricingError::NonFiniteRequestedPrice {
                value: ctx.requested_price,
            })?
            .round_dp(2);

        // 1. Base rate: most specific active matrix entry, else composed
        //    from the reference tables.
        let (base_rate, rate_source) = match matrix.best_match(ctx) {
            Some(entry) => {
                log::debug!(
                    "matrix entry {} matched ({} wildcards)",
                    entry.id,
                    entry.wildcard_count()
                );
                (
                    entry.rate_for_cover(ctx.risk_cover_percent),
                    RateSource::Matrix(entry.id),
                )
            }
            None => {
                let country = tables.country.rate_for(&ctx.country);
                let composed = country.base_rate
                    + tables.product.adjustment_for(&ctx.product)
                    + tables.tenor.adjustment_for(&ctx.tenor.to_string());
                (composed, RateSource::ReferenceTables)
            }
        };

        // 2. All matching active rules apply cumulatively.
        let mut fired_rules = Vec::new();
        let mut rule_adjustment = Decimal::ZERO;
        for rule in rules {
            if let Some(fired) = rule.fire(ctx) {
                log::debug!("rule '{}' fired: {}%", fired.name, fired.adjustment);
                rule_adjustment += fired.adjustment;
                fired_rules.push(fired);
            }
        }

        let indicative_rate = (base_rate + rule_adjustment).round_dp(2);

        // 3. Range and verdict. The country range applies on both the
        //    matrix and the table path.
        let half_range = tables.country.rate_for(&ctx.country).range;
        let range = PriceRange {
            min: (indicative_rate - half_range).round_dp(2),
            max: (indicative_rate + half_range).round_dp(2),
        };

        let (verdict, difference) = if range.contains(requested) {
            (Verdict::Success, Decimal::ZERO)
        } else if requested > range.max {
            (Verdict::Warning, requested - indicative_rate)
        } else {
            (Verdict::Info, requested - indicative_rate)
        };

        Ok(PricingVerdict {
            verdict,
            indicative_rate,
            requested_price: requested,
            difference: difference.round_dp(2),
            range,
            fired_rules,
            rate_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::country::Country;
    use crate::pricing::context::Tenor;
    use crate::pricing::matrix::{PricingMatrixEntry, ScopeField};
    use crate::pricing::rules::{AdjustmentKind, ComparisonOp, RuleAction, RuleCriteria};
    use crate::pricing::tables::{AdjustmentTable, CountryRate, CountryRateTable};
    use rust_decimal_macros::dec;

    fn tables() -> RateTables {
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
            Country::new("Kenya"),
            CountryRate {
                base_rate: dec!(4.25),
                range: Decimal::ZERO,
            },
        );

        let mut product = AdjustmentTable::new(dec!(0.1));
        product.set("Letter of Credit", Decimal::ZERO);
        product.set("Micro Loan", dec!(0.75));

        let mut tenor = AdjustmentTable::new(dec!(0.05));
        tenor.set("90 days", Decimal::ZERO);
        tenor.set("180 days", dec!(0.2));

        RateTables::new(country, product, tenor)
    }

    fn usa_ctx(amount: Decimal, requested: f64) -> PricingContext {
        PricingContext::new(
            amount,
            Country::new("USA"),
            "Letter of Credit",
            Tenor::days(90),
            "Acme Exports",
            requested,
        )
    }

    fn large_deal_discount() -> BusinessRule {
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
    }

    #[test]
    fn test_table_composition_baseline() {
        let verdict = PricingEngine::evaluate(
            &usa_ctx(dec!(500_000), 3.50),
            &PricingMatrix::new(),
            &tables(),
            &[],
        )
        .unwrap();

        assert_eq!(verdict.indicative_rate, dec!(3.50));
        assert_eq!(verdict.range.min, dec!(3.25));
        assert_eq!(verdict.range.max, dec!(3.75));
        assert_eq!(verdict.verdict, Verdict::Success);
        assert_eq!(verdict.difference, Decimal::ZERO);
        assert_eq!(verdict.rate_source, RateSource::ReferenceTables);
        assert!(verdict.fired_rules.is_empty());
    }

    #[test]
    fn test_large_deal_discount_lowers_rate() {
        let verdict = PricingEngine::evaluate(
            &usa_ctx(dec!(2_000_000), 3.30),
            &PricingMatrix::new(),
            &tables(),
            &[large_deal_discount()],
        )
        .unwrap();

        assert_eq!(verdict.indicative_rate, dec!(3.30));
        assert_eq!(verdict.fired_rules.len(), 1);
        assert_eq!(verdict.fired_rules[0].adjustment, dec!(-0.2));
    }

    #[test]
    fn test_rules_apply_cumulatively() {
        let surcharge = BusinessRule::new(
            "Extended Tenor Surcharge",
            RuleCriteria::Tenor {
                operator: ComparisonOp::Ge,
                threshold: 90,
            },
            RuleAction {
                kind: AdjustmentKind::Premium,
                value_percent: dec!(0.5),
            },
        );

        let verdict = PricingEngine::evaluate(
            &usa_ctx(dec!(2_000_000), 3.80),
            &PricingMatrix::new(),
            &tables(),
            &[large_deal_discount(), surcharge],
        )
        .unwrap();

        // 3.5 - 0.2 + 0.5
        assert_eq!(verdict.indicative_rate, dec!(3.80));
        assert_eq!(verdict.fired_rules.len(), 2);
    }

    #[test]
    fn test_requested_at_upper_bound_is_success() {
        let verdict = PricingEngine::evaluate(
            &usa_ctx(dec!(500_000), 3.75),
            &PricingMatrix::new(),
            &tables(),
            &[],
        )
        .unwrap();
        assert_eq!(verdict.verdict, Verdict::Success);
        assert_eq!(verdict.difference, Decimal::ZERO);
    }

    #[test]
    fn test_requested_just_above_bound_is_warning() {
        // Kenya's range is zero, so the upper bound is the indicative
        // rate itself: 0.01 above it yields a 0.01 difference.
        let ctx = PricingContext::new(
            dec!(500_000),
            Country::new("Kenya"),
            "Micro Loan",
            Tenor::days(30),
            "Nairobi Traders",
            5.06,
        );
        let verdict =
            PricingEngine::evaluate(&ctx, &PricingMatrix::new(), &tables(), &[]).unwrap();

        // 4.25 + 0.75 + default tenor 0.05
        assert_eq!(verdict.indicative_rate, dec!(5.05));
        assert_eq!(verdict.verdict, Verdict::Warning);
        assert_eq!(verdict.difference, dec!(0.01));
    }

    #[test]
    fn test_requested_below_range_is_info() {
        let verdict = PricingEngine::evaluate(
            &usa_ctx(dec!(500_000), 3.00),
            &PricingMatrix::new(),
            &tables(),
            &[],
        )
        .unwrap();
        assert_eq!(verdict.verdict, Verdict::Info);
        assert_eq!(verdict.difference, dec!(-0.50));
    }

    #[test]
    fn test_matrix_entry_supplies_rate() {
        let entry = PricingMatrixEntry {
            id: Uuid::new_v4(),
            country: ScopeField::literal("USA"),
            location: ScopeField::Wildcard,
            bank: ScopeField::Wildcard,
            beneficiary: ScopeField::Wildcard,
            product: ScopeField::literal("Letter of Credit"),
            tenor: ScopeField::literal("90 days"),
            price_100: dec!(2.75),
            price_n: dec!(1.85),
            risk_coverage_percent: dec!(65),
            is_active: true,
        };
        let entry_id = entry.id;
        let matrix: PricingMatrix = [entry].into_iter().collect();

        let verdict =
            PricingEngine::evaluate(&usa_ctx(dec!(500_000), 2.75), &matrix, &tables(), &[])
                .unwrap();
        assert_eq!(verdict.indicative_rate, dec!(2.75));
        assert_eq!(verdict.rate_source, RateSource::Matrix(entry_id));
        assert_eq!(verdict.verdict, Verdict::Success);

        // Partial cover prices at the N tier.
        let partial = usa_ctx(dec!(500_000), 1.85).with_risk_cover(dec!(65));
        let verdict = PricingEngine::evaluate(&partial, &matrix, &tables(), &[]).unwrap();
        assert_eq!(verdict.indicative_rate, dec!(1.85));
    }

    #[test]
    fn test_unknown_country_and_product_use_defaults() {
        let ctx = PricingContext::new(
            dec!(100_000),
            Country::new("Atlantis"),
            "Unheard Of Product",
            Tenor::days(7),
            "Nobody",
            4.15,
        );
        let verdict =
            PricingEngine::evaluate(&ctx, &PricingMatrix::new(), &tables(), &[]).unwrap();
        // 4.0 default + 0.1 default product + 0.05 default tenor
        assert_eq!(verdict.indicative_rate, dec!(4.15));
        assert_eq!(verdict.verdict, Verdict::Success);
    }

    #[test]
    fn test_non_finite_requested_price_rejected() {
        let result = PricingEngine::evaluate(
            &usa_ctx(dec!(500_000), f64::NAN),
            &PricingMatrix::new(),
            &tables(),
            &[],
        );
        assert!(matches!(
            result,
            Err(PricingError::NonFiniteRequestedPrice { .. })
        ));

        let result = PricingEngine::evaluate(
            &usa_ctx(dec!(500_000), f64::INFINITY),
            &PricingMatrix::new(),
            &tables(),
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let ctx = usa_ctx(dec!(2_000_000), 3.45);
        let rules = [large_deal_discount()];
        let first =
            PricingEngine::evaluate(&ctx, &PricingMatrix::new(), &tables(), &rules).unwrap();
        let second =
            PricingEngine::evaluate(&ctx, &PricingMatrix::new(), &tables(), &rules).unwrap();
        assert_eq!(first, second);
    }
}
