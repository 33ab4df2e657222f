//! Risk flag evaluation
//!
//! Evaluates built-in rules on normalized metrics and emits tagged flags.
//!
//! Global invariants enforced:
//! - Rules are deterministic (same input = same output)
//! - Rules are independent; no rule suppresses another
//! - Output order is the fixed rule order, never severity
//! - Ratios over a non-positive base profit skip the rule instead of failing

use serde::{Deserialize, Serialize};

/// Condition number above which a system is flagged as extremely sensitive
const EXTREME_KAPPA: f64 = 1e4;

/// Pessimistic/base profit ratio below which the plan counts as collapsing
const PROFIT_COLLAPSE_RATIO: f64 = 0.5;

/// Solution elasticity above which the response is disproportionate
const HIGH_ELASTICITY: f64 = 1.0;

/// Rule identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagId {
    ExtremeSensitivity,
    ProfitCollapse,
    HighElasticity,
    NegativeProfit,
}

impl FlagId {
    /// Get rule name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagId::ExtremeSensitivity => "extreme-sensitivity",
            FlagId::ProfitCollapse => "profit-collapse",
            FlagId::HighElasticity => "high-elasticity",
            FlagId::NegativeProfit => "negative-profit",
        }
    }
}

/// Flag severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Critical,
    Warning,
    Info,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "critical",
            RiskLevel::Warning => "warning",
            RiskLevel::Info => "info",
        }
    }
}

/// A single fired rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskFlag {
    pub id: FlagId,
    pub level: RiskLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_crops: Option<Vec<String>>,
}

impl RiskFlag {
    fn new(id: FlagId, level: RiskLevel, message: &str) -> Self {
        RiskFlag {
            id,
            level,
            message: message.to_string(),
            affected_crops: None,
        }
    }
}

/// Evaluate all rules
///
/// Evaluation order:
/// 1. extreme sensitivity (κ)
/// 2. profit collapse (pessimistic profit below half of base)
/// 3. high elasticity (solution response)
/// 4. negative profit
pub fn evaluate(
    kappa: f64,
    rel_dx: f64,
    profit_base: f64,
    profit_pessimistic: f64,
) -> Vec<RiskFlag> {
    let mut flags = Vec::new();

    evaluate_extreme_sensitivity(kappa, &mut flags);
    evaluate_profit_collapse(profit_base, profit_pessimistic, &mut flags);
    evaluate_high_elasticity(rel_dx, &mut flags);
    evaluate_negative_profit(profit_pessimistic, &mut flags);

    flags
}

/// Triggers when `kappa > 1e4` (strict, unlike the lower-inclusive band)
fn evaluate_extreme_sensitivity(kappa: f64, flags: &mut Vec<RiskFlag>) {
    if kappa > EXTREME_KAPPA {
        flags.push(RiskFlag::new(
            FlagId::ExtremeSensitivity,
            RiskLevel::Critical,
            "Extremely sensitive system. Numerical errors may compromise the solution.",
        ));
    }
}

/// Triggers when `base > 0 && pess / base < 0.5 && pess > 0`
fn evaluate_profit_collapse(profit_base: f64, profit_pessimistic: f64, flags: &mut Vec<RiskFlag>) {
    if profit_base <= 0.0 {
        return;
    }
    if profit_pessimistic / profit_base < PROFIT_COLLAPSE_RATIO && profit_pessimistic > 0.0 {
        flags.push(RiskFlag::new(
            FlagId::ProfitCollapse,
            RiskLevel::Warning,
            "Resource perturbation reduces profit by more than 50%. The plan is vulnerable.",
        ));
    }
}

/// Triggers when `rel_dx > 1.0`
fn evaluate_high_elasticity(rel_dx: f64, flags: &mut Vec<RiskFlag>) {
    if rel_dx > HIGH_ELASTICITY {
        flags.push(RiskFlag::new(
            FlagId::HighElasticity,
            RiskLevel::Warning,
            "High elasticity (>1.0): small resource changes cause proportionally larger changes in areas.",
        ));
    }
}

/// Triggers when the pessimistic profit is negative
fn evaluate_negative_profit(profit_pessimistic: f64, flags: &mut Vec<RiskFlag>) {
    if profit_pessimistic < 0.0 {
        flags.push(RiskFlag::new(
            FlagId::NegativeProfit,
            RiskLevel::Critical,
            "Negative profit under perturbation. The plan is not viable with this resource variation.",
        ));
    }
}
