//! Conditioning band classification
//!
//! Global invariants enforced:
//! - Deterministic classification
//! - Bands are exhaustive and mutually exclusive over κ ≥ 0
//! - Boundaries are half-open, lower-inclusive

use crate::error::InterpretError;
use serde::{Deserialize, Serialize};

/// Conditioning band of the base linear system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditioningBand {
    Stable,   // < 1e2
    Moderate, // 1e2 - 1e4
    Fragile,  // >= 1e4
}

impl ConditioningBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditioningBand::Stable => "stable",
            ConditioningBand::Moderate => "moderate",
            ConditioningBand::Fragile => "fragile",
        }
    }

    /// Qualitative phrase used wherever the band is described in prose
    pub fn label(&self) -> &'static str {
        match self {
            ConditioningBand::Stable => "well-conditioned and stable",
            ConditioningBand::Moderate => "moderately conditioned with moderate sensitivity",
            ConditioningBand::Fragile => "ill-conditioned with high sensitivity to perturbations",
        }
    }
}

impl std::fmt::Display for ConditioningBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configurable band thresholds on κ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditioningThresholds {
    pub moderate: f64,
    pub fragile: f64,
}

impl Default for ConditioningThresholds {
    fn default() -> Self {
        ConditioningThresholds {
            moderate: 1e2,
            fragile: 1e4,
        }
    }
}

/// Classify a condition number with default thresholds
pub fn classify(kappa: f64) -> Result<ConditioningBand, InterpretError> {
    classify_with_thresholds(kappa, &ConditioningThresholds::default())
}

/// Classify a condition number with custom thresholds
///
/// Negative or non-finite κ is a caller error.
pub fn classify_with_thresholds(
    kappa: f64,
    thresholds: &ConditioningThresholds,
) -> Result<ConditioningBand, InterpretError> {
    if !kappa.is_finite() {
        return Err(InterpretError::non_finite("kappa", kappa));
    }
    if kappa < 0.0 {
        return Err(InterpretError::negative("kappa", kappa));
    }

    let band = if kappa < thresholds.moderate {
        ConditioningBand::Stable
    } else if kappa < thresholds.fragile {
        ConditioningBand::Moderate
    } else {
        ConditioningBand::Fragile
    };
    Ok(band)
}
