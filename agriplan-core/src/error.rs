//! Interpretation error types

use thiserror::Error;

/// Errors that can occur while interpreting a single analysis
///
/// Every variant is raised before any narrative is composed, so a failed call
/// never yields a partial interpretation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    #[error("invalid metric `{field}`: {reason} (got {value})")]
    InvalidMetric {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("crop list is empty")]
    EmptyCrops,
}

impl InterpretError {
    pub(crate) fn negative(field: &'static str, value: f64) -> Self {
        InterpretError::InvalidMetric {
            field,
            value,
            reason: "must be non-negative",
        }
    }

    pub(crate) fn non_finite(field: &'static str, value: f64) -> Self {
        InterpretError::InvalidMetric {
            field,
            value,
            reason: "must be finite",
        }
    }

    /// Name of the offending field, if the error concerns a metric
    pub fn field(&self) -> Option<&'static str> {
        match self {
            InterpretError::InvalidMetric { field, .. } => Some(*field),
            InterpretError::EmptyCrops => None,
        }
    }
}
