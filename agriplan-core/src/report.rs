//! Reporting and output generation
//!
//! Presentation-boundary helpers. The interpretation itself never sorts or
//! formats; everything here operates on a finished `InterpretedAnalysis`.
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Byte-for-byte identical output across runs

use crate::analysis::InterpretedAnalysis;
use crate::flags::RiskFlag;

/// Sort flags by severity (critical first)
///
/// The sort is stable: flags of equal level keep rule evaluation order.
pub fn sort_flags_by_severity(mut flags: Vec<RiskFlag>) -> Vec<RiskFlag> {
    flags.sort_by_key(|f| f.level);
    flags
}

/// Return a copy of the interpretation with severity-sorted flags
pub fn with_sorted_flags(analysis: &InterpretedAnalysis) -> InterpretedAnalysis {
    InterpretedAnalysis {
        risk_flags: sort_flags_by_severity(analysis.risk_flags.clone()),
        ..analysis.clone()
    }
}

/// Render an interpretation as text output
pub fn render_text(analysis: &InterpretedAnalysis) -> String {
    let mut output = String::new();

    output.push_str(&format!("Conditioning: {}\n\n", analysis.band.as_str().to_uppercase()));

    push_section(&mut output, "Summary", &analysis.summary);
    push_section(&mut output, "Data science insight", &analysis.data_science_insight);
    push_section(&mut output, "Agricultural context", &analysis.agricultural_context);
    push_section(&mut output, "Predictive diagnosis", &analysis.predictive_diagnosis);

    output.push_str("== Recommendations ==\n");
    for (i, rec) in analysis.recommendations.iter().enumerate() {
        output.push_str(&format!("{:>2}. {}\n", i + 1, rec));
    }
    output.push('\n');

    output.push_str("== Risk flags ==\n");
    if analysis.risk_flags.is_empty() {
        output.push_str("No risk flags.\n");
    }
    for flag in &analysis.risk_flags {
        output.push_str(&format!(
            "[{:<8}] {:<20} {}\n",
            flag.level.as_str().to_uppercase(),
            flag.id.as_str(),
            flag.message
        ));
        if let Some(ref crops) = flag.affected_crops {
            output.push_str(&format!("           affected crops: {}\n", crops.join(", ")));
        }
    }

    output
}

/// Render several interpretations as text, separated by a rule line
pub fn render_text_batch(analyses: &[InterpretedAnalysis]) -> String {
    analyses
        .iter()
        .map(render_text)
        .collect::<Vec<_>>()
        .join(&format!("{}\n", "-".repeat(72)))
}

/// Render an interpretation as JSON output
pub fn render_json(analysis: &InterpretedAnalysis) -> String {
    serde_json::to_string_pretty(analysis).unwrap_or_else(|_| "{}".to_string())
}

/// Render several interpretations as a JSON array
pub fn render_json_batch(analyses: &[InterpretedAnalysis]) -> String {
    serde_json::to_string_pretty(analyses).unwrap_or_else(|_| "[]".to_string())
}

fn push_section(output: &mut String, title: &str, body: &str) {
    output.push_str(&format!("== {} ==\n{}\n\n", title, body));
}
