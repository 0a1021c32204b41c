//! `license-display` — render BOM license trees into license expressions and enforce policy.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load policy config ([`config::load_config`]).
//! 3. Read the BOM report ([`models::BomReport`]) from a file or stdin.
//! 4. For each component, render the license display ([`license::render`]),
//!    classify its risk ([`license::classifier`]) and apply policy
//!    ([`config::evaluate_policy`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0` (clean) or `1` (at least one [`models::PolicyVerdict::Error`]).

mod cli;
mod config;
mod license;
mod models;
mod report;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, ReportFormat};
use config::{apply_policy, evaluate_policy, load_config, Config, UNKNOWN_KEY};
use license::classifier::classify_tree;
use license::render::UNKNOWN;
use models::{BomReport, ComponentLicense, LicenseRisk, PolicyVerdict};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    match run(&cli) {
        Ok(has_errors) => {
            if has_errors {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            std::process::exit(1);
        }
    }
}

/// Returns whether any component got an error verdict.
fn run(cli: &Cli) -> Result<bool> {
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    let (source, bom) = if cli.reads_stdin() {
        let content = std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?;
        ("<stdin>".to_string(), parse_report(&content, "<stdin>")?)
    } else {
        (cli.input.display().to_string(), read_report(&cli.input)?)
    };

    if !cli.quiet {
        eprintln!(
            "  {} {} components",
            "→".cyan(),
            bom.components.len()
        );
    }

    let rows = evaluate_components(&config, &bom);

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&rows, &source, cli.verbose, cli.quiet)?,
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    Ok(rows.iter().any(|r| r.verdict == PolicyVerdict::Error))
}

fn read_report(path: &Path) -> Result<BomReport> {
    info!(path = %path.display(), "reading BOM report");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read BOM report {}", path.display()))?;
    parse_report(&content, &path.display().to_string())
}

fn parse_report(content: &str, source: &str) -> Result<BomReport> {
    serde_json::from_str(content).with_context(|| format!("Invalid BOM report {}", source))
}

/// Render, classify and apply policy to every component, in report order.
fn evaluate_components(config: &Config, report: &BomReport) -> Vec<ComponentLicense> {
    report
        .components
        .iter()
        .map(|component| {
            let (license_display, risk, verdict) = match &component.license {
                Some(tree) => (
                    tree.display(),
                    classify_tree(tree),
                    evaluate_policy(config, tree),
                ),
                None => (
                    UNKNOWN.to_string(),
                    LicenseRisk::Unknown,
                    apply_policy(config, UNKNOWN_KEY),
                ),
            };

            ComponentLicense {
                name: component.component_name.clone(),
                version: component.component_version_name.clone(),
                license_id: component.license.as_ref().and_then(|tree| tree.license_id()),
                license_display,
                risk,
                verdict,
            }
        })
        .collect()
}

fn setup_logging(verbosity: u8) {
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    tracing_subscriber::registry()
        .with(log_filter(verbosity))
        .with(fmt_layer)
        .init();
}

/// `-d` flags take precedence; without them `RUST_LOG` applies, else `warn`.
fn log_filter(verbosity: u8) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "components": [
            {
                "componentName": "dual-licensed",
                "componentVersionName": "1.2.0",
                "license": {
                    "licenseId": "7f1d0c52-0c0e-4c43-9d51-b2d5b1a4e0a9",
                    "name": "MIT OR Apache-2.0",
                    "licenseType": "DISJUNCTIVE",
                    "licenses": [
                        {"name": "MIT License", "spdxId": "MIT"},
                        {"name": "Apache License 2.0", "spdxId": "Apache-2.0"}
                    ]
                }
            },
            {
                "componentName": "half-mapped",
                "componentVersionName": "0.3",
                "license": {
                    "name": "x",
                    "licenseType": "CONJUNCTIVE",
                    "licenses": [
                        {"name": "MIT License", "spdxId": "MIT"},
                        {"name": "Mapping Pending"}
                    ]
                }
            },
            {
                "componentName": "copyleft",
                "componentVersionName": "2.0",
                "license": {
                    "name": "x",
                    "licenseType": "CONJUNCTIVE",
                    "licenses": [
                        {"name": "MIT License", "spdxId": "MIT"},
                        {"name": "GNU General Public License v3.0 only", "spdxId": "GPL-3.0"}
                    ]
                }
            },
            { "componentName": "no-data", "componentVersionName": "9" }
        ]
    }"#;

    #[test]
    fn test_evaluate_components() {
        let report = parse_report(REPORT, "test").unwrap();
        let rows = evaluate_components(&Config::default(), &report);

        let summary: Vec<(&str, &str, LicenseRisk, PolicyVerdict)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.license_display.as_str(), r.risk, r.verdict))
            .collect();

        assert_eq!(
            summary,
            vec![
                (
                    "dual-licensed",
                    "(MIT License OR Apache License 2.0)",
                    LicenseRisk::Permissive,
                    PolicyVerdict::Pass
                ),
                ("half-mapped", "UNKNOWN", LicenseRisk::Unknown, PolicyVerdict::Warn),
                (
                    "copyleft",
                    "(MIT License AND GNU General Public License v3.0 only)",
                    LicenseRisk::StrongCopyleft,
                    PolicyVerdict::Error
                ),
                ("no-data", "UNKNOWN", LicenseRisk::Unknown, PolicyVerdict::Warn),
            ]
        );
    }

    #[test]
    fn test_rows_carry_top_level_license_id() {
        let report = parse_report(REPORT, "test").unwrap();
        let rows = evaluate_components(&Config::default(), &report);
        assert_eq!(
            rows[0].license_id.map(|id| id.to_string()).as_deref(),
            Some("7f1d0c52-0c0e-4c43-9d51-b2d5b1a4e0a9")
        );
        assert!(rows[1].license_id.is_none());
        assert!(rows[3].license_id.is_none());
    }

    #[test]
    fn test_debug_flags_set_log_level() {
        assert_eq!(log_filter(1).to_string(), "info");
        assert_eq!(log_filter(2).to_string(), "debug");
        assert_eq!(log_filter(5).to_string(), "trace");
    }

    #[test]
    fn test_parse_report_error_names_source() {
        let err = parse_report("{ not json", "bom.json").unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid BOM report bom.json"));
    }
}
