//! Metric extraction from solver output
//!
//! Global invariants enforced:
//! - Every optional input field is defaulted exactly once, here
//! - Downstream code only ever sees finite, fully-populated metrics
//! - Deterministic validation order (first invalid field wins)

use crate::error::InterpretError;
use serde::{Deserialize, Serialize};

/// Raw analysis record as produced by the numeric solver
///
/// Fields the interpreter does not consume (`x_base`, `bound`, rendered
/// charts, ...) are ignored during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisMetrics {
    pub kappa: f64,
    pub rel_dx: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_db: Option<f64>,
    pub profit_base: f64,
    pub profit_pert_pessimistic: f64,
    pub profit_pert_optimistic: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

/// Reference condition numbers for a well- and an ill-conditioned system
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Diagnostics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kappa_well: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kappa_ill: Option<f64>,
}

/// One interpretation request: the solver record plus its narrative context
///
/// `crops` and `resources` may be left out of an input file; callers fill
/// them from configuration before interpreting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub metrics: AnalysisMetrics,
    #[serde(default)]
    pub crops: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Fully-populated metrics with documented defaults applied
///
/// - `rel_db` absent → 0
/// - `diagnostics` (or either sub-field) absent → 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedMetrics {
    pub kappa: f64,
    pub rel_dx: f64,
    pub rel_db: f64,
    pub profit_base: f64,
    pub profit_pessimistic: f64,
    pub profit_optimistic: f64,
    pub kappa_well: f64,
    pub kappa_ill: f64,
}

/// Normalize and validate a raw analysis record
///
/// Condition numbers and relative changes must be finite and non-negative;
/// profits must be finite but may take any sign.
pub fn normalize(raw: &AnalysisMetrics) -> Result<NormalizedMetrics, InterpretError> {
    let diagnostics = raw.diagnostics.clone().unwrap_or_default();

    let metrics = NormalizedMetrics {
        kappa: raw.kappa,
        rel_dx: raw.rel_dx,
        rel_db: raw.rel_db.unwrap_or(0.0),
        profit_base: raw.profit_base,
        profit_pessimistic: raw.profit_pert_pessimistic,
        profit_optimistic: raw.profit_pert_optimistic,
        kappa_well: diagnostics.kappa_well.unwrap_or(0.0),
        kappa_ill: diagnostics.kappa_ill.unwrap_or(0.0),
    };

    non_negative("kappa", metrics.kappa)?;
    non_negative("rel_dx", metrics.rel_dx)?;
    non_negative("rel_db", metrics.rel_db)?;
    finite("profit_base", metrics.profit_base)?;
    finite("profit_pert_pessimistic", metrics.profit_pessimistic)?;
    finite("profit_pert_optimistic", metrics.profit_optimistic)?;
    non_negative("diagnostics.kappa_well", metrics.kappa_well)?;
    non_negative("diagnostics.kappa_ill", metrics.kappa_ill)?;

    Ok(metrics)
}

fn finite(field: &'static str, value: f64) -> Result<(), InterpretError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InterpretError::non_finite(field, value))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InterpretError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(InterpretError::negative(field, value));
    }
    Ok(())
}
