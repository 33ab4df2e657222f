//! agriplan core library - interpretation of crop-planning sensitivity analyses
//!
//! Turns the numeric output of a crop-allocation sensitivity run (condition
//! number, relative solution change, profits under perturbed resources) into
//! a conditioning band, narrative explanations, recommendations and risk flags.

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Interpretation is a pure function of its inputs
// - No global mutable state
// - No randomness, clocks, I/O or async in the interpretation path
// - The conditioning band is classified once and shared by every output field
// - Risk flags are emitted in fixed rule order; sorting happens only in `report`
// - Identical input yields byte-for-byte identical output

pub mod analysis;
pub mod conditioning;
pub mod config;
pub mod error;
pub mod flags;
pub mod metrics;
pub mod narrative;
pub mod report;

pub use analysis::{
    interpret, interpret_batch, interpret_request, interpret_with_thresholds, InterpretedAnalysis,
};
pub use conditioning::{classify, classify_with_thresholds, ConditioningBand, ConditioningThresholds};
pub use config::ResolvedConfig;
pub use error::InterpretError;
pub use flags::{FlagId, RiskFlag, RiskLevel};
pub use metrics::{AnalysisMetrics, AnalysisRequest, Diagnostics};
pub use report::{render_json, render_text, sort_flags_by_severity};
