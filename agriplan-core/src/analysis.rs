//! Interpretation orchestration - ties together normalization, classification,
//! narrative composition and risk flags

use crate::conditioning::{self, ConditioningBand, ConditioningThresholds};
use crate::error::InterpretError;
use crate::flags::{self, RiskFlag};
use crate::metrics::{self, AnalysisMetrics, AnalysisRequest};
use crate::narrative;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Complete interpretation of one analysis result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InterpretedAnalysis {
    pub band: ConditioningBand,
    pub summary: String,
    pub data_science_insight: String,
    pub agricultural_context: String,
    pub predictive_diagnosis: String,
    pub recommendations: Vec<String>,
    pub risk_flags: Vec<RiskFlag>,
}

impl InterpretedAnalysis {
    /// Check if any critical flag fired
    pub fn has_critical_flags(&self) -> bool {
        self.risk_flags
            .iter()
            .any(|f| f.level == flags::RiskLevel::Critical)
    }
}

/// Interpret an analysis result with default band thresholds
pub fn interpret(
    metrics: &AnalysisMetrics,
    crops: &[String],
    resources: &[String],
) -> Result<InterpretedAnalysis, InterpretError> {
    interpret_with_thresholds(metrics, crops, resources, &ConditioningThresholds::default())
}

/// Interpret an analysis result with custom band thresholds
///
/// The band is classified once and shared by every field, so all prose about
/// how risky the system is agrees for a given input.
pub fn interpret_with_thresholds(
    metrics: &AnalysisMetrics,
    crops: &[String],
    resources: &[String],
    thresholds: &ConditioningThresholds,
) -> Result<InterpretedAnalysis, InterpretError> {
    let m = metrics::normalize(metrics)?;
    if crops.is_empty() {
        return Err(InterpretError::EmptyCrops);
    }

    let band = conditioning::classify_with_thresholds(m.kappa, thresholds)?;

    let risk_flags = flags::evaluate(m.kappa, m.rel_dx, m.profit_base, m.profit_pessimistic);

    tracing::debug!(
        kappa = m.kappa,
        band = band.as_str(),
        flags = risk_flags.len(),
        "interpreted analysis"
    );

    Ok(InterpretedAnalysis {
        band,
        summary: narrative::summary(
            band,
            m.kappa,
            m.rel_dx,
            m.profit_base,
            m.profit_pessimistic,
            m.profit_optimistic,
        ),
        data_science_insight: narrative::data_science_insight(
            band,
            m.kappa,
            m.rel_dx,
            m.rel_db,
            m.kappa_well,
            m.kappa_ill,
        ),
        agricultural_context: narrative::agricultural_context(crops, resources, m.rel_dx),
        predictive_diagnosis: narrative::predictive_diagnosis(
            band,
            m.kappa,
            m.rel_dx,
            m.profit_base,
            m.profit_pessimistic,
        ),
        recommendations: narrative::recommendations(band, m.rel_dx),
        risk_flags,
    })
}

/// Interpret a self-contained request
pub fn interpret_request(
    request: &AnalysisRequest,
    thresholds: &ConditioningThresholds,
) -> Result<InterpretedAnalysis, InterpretError> {
    interpret_with_thresholds(
        &request.metrics,
        &request.crops,
        &request.resources,
        thresholds,
    )
}

/// Interpret many requests in parallel
///
/// Results are returned in input order; a failing request does not affect
/// the others.
pub fn interpret_batch(
    requests: &[AnalysisRequest],
    thresholds: &ConditioningThresholds,
) -> Vec<Result<InterpretedAnalysis, InterpretError>> {
    tracing::debug!(requests = requests.len(), "interpreting batch");
    requests
        .par_iter()
        .map(|request| interpret_request(request, thresholds))
        .collect()
}
