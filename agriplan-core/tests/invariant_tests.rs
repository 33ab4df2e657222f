//! Invariant Tests
//!
//! These tests validate properties that must hold for every input, not just
//! the fixtures: determinism, band consistency and batch ordering.

use agriplan_core::metrics::{AnalysisMetrics, AnalysisRequest, Diagnostics};
use agriplan_core::{
    classify, interpret, interpret_batch, interpret_request, render_json, sort_flags_by_severity,
    ConditioningBand, ConditioningThresholds,
};
use proptest::prelude::*;

fn crops() -> Vec<String> {
    vec!["corn".to_string(), "soy".to_string()]
}

fn metrics(kappa: f64, rel_dx: f64, base: f64, pess: f64, opt: f64) -> AnalysisMetrics {
    AnalysisMetrics {
        kappa,
        rel_dx,
        rel_db: Some(0.05),
        profit_base: base,
        profit_pert_pessimistic: pess,
        profit_pert_optimistic: opt,
        diagnostics: Some(Diagnostics {
            kappa_well: Some(10.0),
            kappa_ill: Some(2000.0),
        }),
    }
}

#[test]
fn test_interpret_is_idempotent() {
    let m = metrics(5000.0, 0.3, 10000.0, 4000.0, 12000.0);
    let first = interpret(&m, &crops(), &[]).unwrap();
    let second = interpret(&m, &crops(), &[]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_json_output_is_byte_identical() {
    let m = metrics(50000.0, 1.5, 10000.0, -500.0, 12000.0);
    let first = render_json(&interpret(&m, &crops(), &[]).unwrap());
    let second = render_json(&interpret(&m, &crops(), &[]).unwrap());
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_unknown_solver_fields_ignored() {
    let json = r#"{
        "kappa": 50.0, "rel_dx": 0.02,
        "profit_base": 10000.0, "profit_pert_pessimistic": 9500.0, "profit_pert_optimistic": 10500.0,
        "x_base": [1.0, 2.0], "bound": 0.1, "heatmap": "data:image/png;base64,AAAA",
        "diagnostics": {"kappa_well": 1.0, "rel_dx_well": 0.01},
        "crops": ["corn"]
    }"#;
    let request: AnalysisRequest = serde_json::from_str(json).unwrap();
    let analysis = interpret_request(&request, &ConditioningThresholds::default()).unwrap();
    assert_eq!(analysis.band, ConditioningBand::Stable);
}

#[test]
fn test_batch_matches_sequential_interpretation() {
    let requests: Vec<AnalysisRequest> = [10.0, 150.0, 9999.0, 10000.0, 1e7]
        .iter()
        .map(|&kappa| AnalysisRequest {
            metrics: metrics(kappa, 0.2, 10000.0, 7000.0, 11000.0),
            crops: crops(),
            resources: vec![],
        })
        .collect();

    let th = ConditioningThresholds::default();
    let batch = interpret_batch(&requests, &th);
    let sequential: Vec<_> = requests.iter().map(|r| interpret_request(r, &th)).collect();
    assert_eq!(batch, sequential);
}

#[test]
fn test_severity_sort_does_not_change_interpretation_order() {
    let analysis = interpret(&metrics(50000.0, 1.5, 10000.0, -500.0, 12000.0), &crops(), &[])
        .unwrap();
    let before = analysis.risk_flags.clone();
    let _sorted = sort_flags_by_severity(analysis.risk_flags.clone());
    assert_eq!(analysis.risk_flags, before);
}

proptest! {
    #[test]
    fn prop_band_is_shared_by_every_field(
        kappa in 0.0f64..1e8,
        rel_dx in 0.0f64..5.0,
        base in -1e5f64..1e5,
        pess in -1e5f64..1e5,
        opt in -1e5f64..1e5,
    ) {
        let analysis = interpret(&metrics(kappa, rel_dx, base, pess, opt), &crops(), &[]).unwrap();
        let band = classify(kappa).unwrap();

        prop_assert_eq!(analysis.band, band);
        prop_assert!(analysis.summary.contains(band.label()));

        let expected_recs = match band {
            ConditioningBand::Stable => 3,
            ConditioningBand::Moderate => 4,
            ConditioningBand::Fragile => 5,
        };
        prop_assert_eq!(analysis.recommendations.len(), expected_recs);
    }

    #[test]
    fn prop_output_never_contains_nan(
        kappa in 0.0f64..1e8,
        rel_dx in 0.0f64..5.0,
        base in prop_oneof![Just(0.0f64), -1e5f64..1e5],
        pess in -1e5f64..1e5,
        opt in -1e5f64..1e5,
    ) {
        let analysis = interpret(&metrics(kappa, rel_dx, base, pess, opt), &crops(), &[]).unwrap();
        let json = render_json(&analysis);
        prop_assert!(!json.contains("NaN"));
    }
}
