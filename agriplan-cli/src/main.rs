//! agriplan CLI - interpretation of crop-planning sensitivity analyses

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output
// - Diagnostics go to stderr; stdout carries only the report

use agriplan_core::config::{self, ResolvedConfig};
use agriplan_core::report::{render_json, render_json_batch, render_text_batch, with_sorted_flags};
use agriplan_core::{
    classify_with_thresholds, interpret_batch, AnalysisRequest, InterpretedAnalysis,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "agriplan")]
#[command(about = "Interpret crop-planning sensitivity analyses into plain-language reports")]
#[command(version = env!("AGRIPLAN_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret one analysis record, or an array of records, from a JSON file
    Interpret {
        /// Path to the solver output JSON
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Crop names, comma separated (overrides input file and config)
        #[arg(long, value_delimiter = ',')]
        crops: Option<Vec<String>>,

        /// Resource names, comma separated (overrides input file and config)
        #[arg(long, value_delimiter = ',')]
        resources: Option<Vec<String>>,

        /// Present risk flags by severity instead of rule order
        #[arg(long)]
        sort_flags: bool,

        /// Exit with status 1 when any critical risk flag fires
        #[arg(long)]
        fail_on_critical: bool,
    },
    /// Print the conditioning band for a condition number
    Classify {
        /// Condition number κ
        #[arg(allow_negative_numbers = true)]
        kappa: f64,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without interpreting anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Interpret {
            path,
            format,
            config: config_path,
            crops,
            resources,
            sort_flags,
            fail_on_critical,
        } => {
            let resolved = load_config(config_path.as_deref())?;

            let (mut requests, is_batch) = read_requests(&path)?;
            if requests.is_empty() {
                tracing::warn!(path = %path.display(), "input contains no analysis records");
            }
            for request in &mut requests {
                apply_context(request, crops.as_deref(), resources.as_deref(), &resolved);
            }

            let mut analyses = interpret_all(&requests, &resolved)?;
            if sort_flags || resolved.sort_flags {
                analyses = analyses.iter().map(with_sorted_flags).collect();
            }

            match format {
                OutputFormat::Text => print!("{}", render_text_batch(&analyses)),
                OutputFormat::Json if is_batch => println!("{}", render_json_batch(&analyses)),
                OutputFormat::Json => {
                    for analysis in &analyses {
                        println!("{}", render_json(analysis));
                    }
                }
            }

            if fail_on_critical && analyses.iter().any(|a| a.has_critical_flags()) {
                std::process::exit(1);
            }
        }
        Commands::Classify {
            kappa,
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref())?;
            let band = classify_with_thresholds(kappa, &resolved.thresholds)
                .context("failed to classify condition number")?;
            println!("{} ({})", band, band.label());
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = load_config(path.as_deref())?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Load configuration from an explicit path or the current directory
fn load_config(config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let project_root = std::env::current_dir()?;
    let resolved = config::load_and_resolve(&project_root, config_path)
        .context("failed to load configuration")?;

    if let Some(ref p) = resolved.config_path {
        tracing::info!(config = %p.display(), "using config");
    }
    Ok(resolved)
}

/// Read a single request object or an array of them
///
/// The flag reports whether the file held an array, so JSON output keeps the
/// same shape as the input.
fn read_requests(path: &Path) -> anyhow::Result<(Vec<AnalysisRequest>, bool)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))?;

    if value.is_array() {
        let requests = serde_json::from_value(value)
            .with_context(|| format!("invalid analysis records in: {}", path.display()))?;
        Ok((requests, true))
    } else {
        let request: AnalysisRequest = serde_json::from_value(value)
            .with_context(|| format!("invalid analysis record in: {}", path.display()))?;
        Ok((vec![request], false))
    }
}

/// Fill crops and resources: CLI flag > input file > config
fn apply_context(
    request: &mut AnalysisRequest,
    crops: Option<&[String]>,
    resources: Option<&[String]>,
    resolved: &ResolvedConfig,
) {
    if let Some(crops) = crops {
        request.crops = crops.to_vec();
    } else if request.crops.is_empty() {
        request.crops = resolved.crops.clone();
    }

    if let Some(resources) = resources {
        request.resources = resources.to_vec();
    } else if request.resources.is_empty() {
        request.resources = resolved.resources.clone();
    }
}

/// Interpret every request, failing on the first invalid one
fn interpret_all(
    requests: &[AnalysisRequest],
    resolved: &ResolvedConfig,
) -> anyhow::Result<Vec<InterpretedAnalysis>> {
    interpret_batch(requests, &resolved.thresholds)
        .into_iter()
        .enumerate()
        .map(|(i, result)| result.with_context(|| format!("failed to interpret record {}", i)))
        .collect()
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Thresholds:");
    println!("  moderate: {}", resolved.thresholds.moderate);
    println!("  fragile: {}", resolved.thresholds.fragile);
    println!();
    println!("Presentation:");
    println!("  sort_flags: {}", resolved.sort_flags);
    println!();
    println!("Context:");
    println!(
        "  crops: {}",
        if resolved.crops.is_empty() {
            "none".to_string()
        } else {
            resolved.crops.join(", ")
        }
    );
    println!("  resources: {}", resolved.resources.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriplan_core::AnalysisMetrics;

    fn request(crops: &[&str]) -> AnalysisRequest {
        AnalysisRequest {
            metrics: AnalysisMetrics {
                kappa: 50.0,
                rel_dx: 0.02,
                rel_db: None,
                profit_base: 10000.0,
                profit_pert_pessimistic: 9500.0,
                profit_pert_optimistic: 10500.0,
                diagnostics: None,
            },
            crops: crops.iter().map(|c| c.to_string()).collect(),
            resources: vec![],
        }
    }

    fn resolved_with_crops(crops: &[&str]) -> ResolvedConfig {
        let mut resolved = ResolvedConfig::defaults().unwrap();
        resolved.crops = crops.iter().map(|c| c.to_string()).collect();
        resolved
    }

    #[test]
    fn test_cli_crops_override_everything() {
        let mut req = request(&["corn"]);
        let cli_crops = vec!["rice".to_string()];
        apply_context(&mut req, Some(&cli_crops), None, &resolved_with_crops(&["soy"]));
        assert_eq!(req.crops, vec!["rice"]);
    }

    #[test]
    fn test_file_crops_beat_config() {
        let mut req = request(&["corn"]);
        apply_context(&mut req, None, None, &resolved_with_crops(&["soy"]));
        assert_eq!(req.crops, vec!["corn"]);
    }

    #[test]
    fn test_config_fills_missing_context() {
        let mut req = request(&[]);
        apply_context(&mut req, None, None, &resolved_with_crops(&["soy"]));
        assert_eq!(req.crops, vec!["soy"]);
        assert_eq!(req.resources, vec!["land", "labor", "water", "fertilizer"]);
    }

    #[test]
    fn test_interpret_all_names_failing_record() {
        let mut bad = request(&["corn"]);
        bad.metrics.kappa = -1.0;
        let err = interpret_all(&[request(&["corn"]), bad], &resolved_with_crops(&[])).unwrap_err();
        assert!(format!("{:#}", err).contains("record 1"));
    }

    #[test]
    fn test_read_requests_accepts_object_and_array() {
        let dir = tempfile::tempdir().unwrap();
        let single = dir.path().join("single.json");
        std::fs::write(
            &single,
            r#"{"kappa": 50, "rel_dx": 0.02, "profit_base": 1, "profit_pert_pessimistic": 1, "profit_pert_optimistic": 1, "x_base": [1, 2]}"#,
        )
        .unwrap();
        let (requests, is_batch) = read_requests(&single).unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!is_batch);

        let many = dir.path().join("many.json");
        std::fs::write(
            &many,
            r#"[{"kappa": 50, "rel_dx": 0.02, "profit_base": 1, "profit_pert_pessimistic": 1, "profit_pert_optimistic": 1},
                {"kappa": 500, "rel_dx": 0.2, "profit_base": 1, "profit_pert_pessimistic": 1, "profit_pert_optimistic": 1, "crops": ["corn"]}]"#,
        )
        .unwrap();
        let (requests, is_batch) = read_requests(&many).unwrap();
        assert!(is_batch);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].crops, vec!["corn"]);
    }
}
