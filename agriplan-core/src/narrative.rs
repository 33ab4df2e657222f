//! Narrative composition
//!
//! Each field of an interpretation is produced by one pure function keyed by
//! the shared `ConditioningBand`. None of them re-derive the band from κ.
//!
//! Global invariants enforced:
//! - No I/O, randomness, or clocks
//! - Condition numbers are rendered with `{:.2e}`
//! - Percentages are rendered with fixed 1 or 2 fractional digits
//! - Identical input yields byte-for-byte identical text

use crate::conditioning::ConditioningBand;

/// Resource names assumed when the caller supplies none
pub const DEFAULT_RESOURCES: &[&str] = &["land", "labor", "water", "fertilizer"];

/// Guard added to the well-conditioned reference κ before dividing
const RATIO_EPSILON: f64 = 1e-10;

/// Reference ratio above which the analysed system counts as far more sensitive
const SENSITIVITY_RATIO_LIMIT: f64 = 100.0;

/// Nominal resource reduction (percent) used for the area projection
const NOMINAL_REDUCTION_PCT: f64 = 5.0;

/// Error amplification range applied to the projection of a moderate system
const MODERATE_AMPLIFICATION: (f64, f64) = (1.5, 2.0);

/// Bounds (percent) of the safe linear-planning perturbation
const SAFE_BOUND_MIN_PCT: f64 = 2.0;
const SAFE_BOUND_MAX_PCT: f64 = 10.0;

/// Percentage change in profit between the base and a perturbed scenario
///
/// Formula: `|(pert - base) / base| * 100`, with `base = 0 → 0`.
pub fn elasticity(profit_base: f64, profit_pert: f64) -> f64 {
    if profit_base == 0.0 {
        return 0.0;
    }
    ((profit_pert - profit_base) / profit_base).abs() * 100.0
}

/// Pessimistic impact and optimistic gain, both in percent of the base profit
///
/// A zero base profit yields the `(0.0, 0.0)` sentinel instead of dividing.
pub fn profit_swings(profit_base: f64, profit_pessimistic: f64, profit_optimistic: f64) -> (f64, f64) {
    if profit_base == 0.0 {
        return (0.0, 0.0);
    }
    let pessimistic_impact = (profit_base - profit_pessimistic) / profit_base * 100.0;
    let optimistic_gain = (profit_optimistic - profit_base) / profit_base * 100.0;
    (pessimistic_impact, optimistic_gain)
}

/// Largest resource perturbation (percent) considered safe for linear planning
///
/// Formula: `min(10, max(2, 100 / κ))`; κ = 0 saturates at 10.
pub fn safe_perturbation_bound(kappa: f64) -> f64 {
    (100.0 / kappa).clamp(SAFE_BOUND_MIN_PCT, SAFE_BOUND_MAX_PCT)
}

/// One-paragraph summary: band label, base profit, scenario swings
pub fn summary(
    band: ConditioningBand,
    kappa: f64,
    rel_dx: f64,
    profit_base: f64,
    profit_pessimistic: f64,
    profit_optimistic: f64,
) -> String {
    let (pessimistic_impact, optimistic_gain) =
        profit_swings(profit_base, profit_pessimistic, profit_optimistic);
    let perturbation = rel_dx * 100.0;

    format!(
        "The system is {} (κ = {:.2e}). Base scenario: $ {:.2} | \
         Pessimistic scenario (-{:.2}%): {} | \
         Optimistic scenario (+{:.2}%): {}.",
        band.label(),
        kappa,
        profit_base,
        perturbation,
        signed_pct(-pessimistic_impact),
        perturbation,
        signed_pct(optimistic_gain),
    )
}

/// Technical explanation of conditioning, elasticity and the reference comparison
pub fn data_science_insight(
    band: ConditioningBand,
    kappa: f64,
    rel_dx: f64,
    rel_db: f64,
    kappa_well: f64,
    kappa_ill: f64,
) -> String {
    let mut insight = format!("**Condition number (κ = {:.2e})**: ", kappa);

    insight.push_str(match band {
        ConditioningBand::Stable => {
            "The system is numerically stable. Small perturbations in **b** \
             produce small changes in **x**. "
        }
        ConditioningBand::Moderate => {
            "The system shows moderate instability. Error propagation is contained, \
             but critical decisions need attention. "
        }
        ConditioningBand::Fragile => {
            "The system is numerically fragile. Small errors in resources can \
             amplify the solution significantly. "
        }
    });

    insight.push_str(&format!(
        "\n\n**Elasticity: ||Δx||/||x|| = {:.2e}**: A 1% change in resources causes \
         approximately {:.2}% change in planted areas. ",
        rel_dx,
        rel_dx * 100.0
    ));

    if rel_db > 0.0 {
        insight.push_str(&format!(
            "Observed resource perturbation ||Δb||/||b|| = {:.2e}; theoretical bound \
             κ·||Δb||/||b|| = {:.2e}. ",
            rel_db,
            kappa * rel_db
        ));
    }

    let ratio = kappa_ill / (kappa_well + RATIO_EPSILON);
    let verdict = if ratio > SENSITIVITY_RATIO_LIMIT {
        "significantly more sensitive"
    } else {
        "reasonably stable"
    };
    insight.push_str(&format!(
        "\n\n**Well vs ill-conditioned comparison**: well-conditioned system (κ={:.2e}) \
         vs ill-conditioned system (κ={:.2e}). Ratio: {:.1}x. \
         Your system is {} compared to the worst case.",
        kappa_well, kappa_ill, ratio, verdict
    ));

    insight
}

/// Domain narrative for the crop plan
pub fn agricultural_context(crops: &[String], resources: &[String], rel_dx: f64) -> String {
    let resource_phrase = if resources.is_empty() {
        DEFAULT_RESOURCES.join(", ")
    } else {
        resources.join(", ")
    };

    format!(
        "**Agricultural interpretation**: \n\n\
         The optimized plan allocates area across {} according to the marginal return \
         of each crop under the available resources ({}). \n\n\
         The observed sensitivity ({:.2e}) reflects how the crop mix reacts to fluctuations \
         in input supply, which is common in agriculture where climate, water availability \
         and fertilizer costs vary seasonally. \n\n\
         Crops with the greatest weight in the sensitivity matrix are the most critical \
         for the stability of the plan.",
        crops.join(", "),
        resource_phrase,
        rel_dx
    )
}

/// Band-keyed trend, area projection, safe bound and profit elasticity
pub fn predictive_diagnosis(
    band: ConditioningBand,
    kappa: f64,
    rel_dx: f64,
    profit_base: f64,
    profit_pessimistic: f64,
) -> String {
    let mut diagnosis = String::from("**Predictive diagnosis**:\n\n");
    let projection = rel_dx * NOMINAL_REDUCTION_PCT;

    match band {
        ConditioningBand::Stable => {
            diagnosis.push_str(
                "✓ **Trend**: Predictable and robust system. Linear behavior is expected \
                 for perturbations up to ~10-15%.\n",
            );
            diagnosis.push_str(&format!(
                "✓ **Projection**: A {:.0}% resource reduction should reduce areas by ~{:.2}%.\n",
                NOMINAL_REDUCTION_PCT, projection
            ));
        }
        ConditioningBand::Moderate => {
            let (low, high) = MODERATE_AMPLIFICATION;
            diagnosis.push_str(
                "⚠ **Trend**: Moderate instability. Linear behavior holds up to \
                 ~5-8% perturbation.\n",
            );
            diagnosis.push_str(&format!(
                "⚠ **Projection**: A {:.0}% resource reduction may reduce areas by \
                 {:.2}% to {:.2}% (error amplification).\n",
                NOMINAL_REDUCTION_PCT,
                projection * low,
                projection * high
            ));
        }
        ConditioningBand::Fragile => {
            diagnosis.push_str(
                "🔴 **Trend**: Fragile system. Linear behavior may break down quickly \
                 for perturbations above 2-3%.\n",
            );
            diagnosis.push_str(
                "🔴 **Projection**: Small input changes can cause disproportionate and \
                 unpredictable changes in the plan.\n",
            );
        }
    }

    diagnosis.push_str(&format!(
        "\n**Approximate risk interval**: perturbations up to {:.1}% are safe for linear planning.",
        safe_perturbation_bound(kappa)
    ));

    diagnosis.push_str(&format!(
        "\n\n**Profit elasticity (pessimistic vs base)**: {:.2}% profit variation between \
         the base and pessimistic scenarios.",
        elasticity(profit_base, profit_pessimistic)
    ));

    diagnosis
}

/// Ordered recommendations, more numerous and cautious as the band worsens
pub fn recommendations(band: ConditioningBand, rel_dx: f64) -> Vec<String> {
    let fixed: &[&str] = match band {
        ConditioningBand::Stable => &[
            "✓ The plan is robust: consider implementing it with confidence.",
            "✓ Monitor resources within a ±10% margin without frequent replanning.",
        ],
        ConditioningBand::Moderate => &[
            "⚠ Implement with control: revise the plan if resources deviate by more than 5%.",
            "⚠ Prioritize the stability of critical inputs (especially water and fertilizer).",
            "⚠ Consider Tikhonov regularization to reduce numerical sensitivity.",
        ],
        ConditioningBand::Fragile => &[
            "🔴 Use with caution: the system is sensitive and requires frequent adjustment.",
            "🔴 Diversify crops to reduce dependence on critical resources.",
            "🔴 Keep strategic input reserves (5-10% above plan).",
            "🔴 Review the input data: matrix A may be ill-conditioned; validate per-crop consumption.",
        ],
    };

    let mut out: Vec<String> = fixed.iter().map(|s| s.to_string()).collect();
    out.push(format!(
        "📊 Current sensitivity: a 1% change in resources → {:.2}% change in areas.",
        rel_dx * 100.0
    ));
    out
}

/// Signed percentage with one decimal, never rendering negative zero
fn signed_pct(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:+.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crops() -> Vec<String> {
        vec!["corn".to_string(), "soy".to_string(), "wheat".to_string()]
    }

    #[test]
    fn test_elasticity() {
        assert_eq!(elasticity(100.0, 150.0), 50.0);
        assert_eq!(elasticity(100.0, 50.0), 50.0);
        assert_eq!(elasticity(0.0, 12345.0), 0.0);
    }

    #[test]
    fn test_profit_swings_zero_base_sentinel() {
        assert_eq!(profit_swings(0.0, -10.0, 10.0), (0.0, 0.0));
    }

    #[test]
    fn test_safe_bound_is_clamped() {
        assert_eq!(safe_perturbation_bound(0.0), 10.0);
        assert_eq!(safe_perturbation_bound(5.0), 10.0);
        assert_eq!(safe_perturbation_bound(25.0), 4.0);
        assert_eq!(safe_perturbation_bound(1e6), 2.0);
    }

    #[test]
    fn test_summary_stable() {
        let s = summary(ConditioningBand::Stable, 50.0, 0.02, 10000.0, 9500.0, 10500.0);
        assert_eq!(
            s,
            "The system is well-conditioned and stable (κ = 5.00e1). Base scenario: $ 10000.00 | \
             Pessimistic scenario (-2.00%): -5.0% | Optimistic scenario (+2.00%): +5.0%."
        );
    }

    #[test]
    fn test_summary_zero_base_uses_sentinel() {
        let s = summary(ConditioningBand::Moderate, 500.0, 0.1, 0.0, -20.0, 30.0);
        assert!(s.contains("moderately conditioned with moderate sensitivity"));
        assert!(s.contains("(-10.00%): +0.0%"));
        assert!(s.contains("(+10.00%): +0.0%"));
        assert!(!s.contains("NaN"));
        assert!(!s.contains("inf"));
    }

    #[test]
    fn test_summary_label_per_band() {
        let fragile = summary(ConditioningBand::Fragile, 5e4, 0.1, 100.0, 90.0, 110.0);
        assert!(fragile.contains("ill-conditioned with high sensitivity to perturbations"));
    }

    #[test]
    fn test_insight_ratio_significant() {
        let s = data_science_insight(ConditioningBand::Moderate, 5000.0, 0.3, 0.0, 10.0, 2000.0);
        assert!(s.starts_with("**Condition number (κ = 5.00e3)**: "));
        assert!(s.contains("moderate instability"));
        assert!(s.contains("Ratio: 200.0x"));
        assert!(s.contains("significantly more sensitive"));
        assert!(s.contains("approximately 30.00% change"));
    }

    #[test]
    fn test_insight_ratio_reasonable() {
        let s = data_science_insight(ConditioningBand::Stable, 50.0, 0.02, 0.0, 100.0, 5000.0);
        assert!(s.contains("Ratio: 50.0x"));
        assert!(s.contains("reasonably stable"));
    }

    #[test]
    fn test_insight_reports_bound_only_with_rel_db() {
        let without = data_science_insight(ConditioningBand::Stable, 50.0, 0.02, 0.0, 0.0, 0.0);
        assert!(!without.contains("theoretical bound"));

        let with = data_science_insight(ConditioningBand::Stable, 50.0, 0.02, 0.05, 0.0, 0.0);
        assert!(with.contains("||Δb||/||b|| = 5.00e-2"));
        assert!(with.contains("κ·||Δb||/||b|| = 2.50e0"));
    }

    #[test]
    fn test_context_names_crops_and_resources() {
        let s = agricultural_context(&crops(), &[], 0.02);
        assert!(s.contains("across corn, soy, wheat"));
        assert!(s.contains("(land, labor, water, fertilizer)"));
        assert!(s.contains("(2.00e-2)"));

        let custom = agricultural_context(&crops(), &["land".to_string(), "water".to_string()], 0.02);
        assert!(custom.contains("(land, water)"));
    }

    #[test]
    fn test_diagnosis_stable_projection() {
        let s = predictive_diagnosis(ConditioningBand::Stable, 50.0, 0.02, 10000.0, 9500.0);
        assert!(s.contains("reduce areas by ~0.10%"));
        assert!(s.contains("up to 2.0% are safe"));
        assert!(s.contains("5.00% profit variation"));
    }

    #[test]
    fn test_diagnosis_moderate_amplified_range() {
        let s = predictive_diagnosis(ConditioningBand::Moderate, 5000.0, 0.3, 10000.0, 4000.0);
        assert!(s.contains("by 2.25% to 3.00%"));
        assert!(s.contains("60.00% profit variation"));
    }

    #[test]
    fn test_diagnosis_fragile_is_qualitative() {
        let s = predictive_diagnosis(ConditioningBand::Fragile, 50000.0, 1.5, 10000.0, -500.0);
        assert!(s.contains("disproportionate and unpredictable"));
        assert!(!s.contains("reduce areas by"));
        assert!(s.contains("105.00% profit variation"));
    }

    #[test]
    fn test_recommendation_counts_grow_with_band() {
        assert_eq!(recommendations(ConditioningBand::Stable, 0.02).len(), 3);
        assert_eq!(recommendations(ConditioningBand::Moderate, 0.02).len(), 4);
        assert_eq!(recommendations(ConditioningBand::Fragile, 0.02).len(), 5);
    }

    #[test]
    fn test_recommendations_end_with_sensitivity() {
        let recs = recommendations(ConditioningBand::Fragile, 1.5);
        assert_eq!(
            recs.last().unwrap(),
            "📊 Current sensitivity: a 1% change in resources → 150.00% change in areas."
        );
    }

    #[test]
    fn test_signed_pct_has_no_negative_zero() {
        assert_eq!(signed_pct(-0.0), "+0.0%");
        assert_eq!(signed_pct(-5.0), "-5.0%");
        assert_eq!(signed_pct(5.0), "+5.0%");
    }
}
