use std::collections::HashMap;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{ComponentLicense, LicenseRisk, PolicyVerdict};

/// Render a colored terminal report.
pub fn render(rows: &[ComponentLicense], source: &str, verbose: bool, quiet: bool) -> Result<()> {
    let total = rows.len();
    let pass_count = count(rows, PolicyVerdict::Pass);
    let warn_count = count(rows, PolicyVerdict::Warn);
    let error_count = count(rows, PolicyVerdict::Error);

    if quiet {
        println!(
            "Total: {}  Pass: {}  Warn: {}  Error: {}",
            total,
            pass_count.to_string().green(),
            warn_count.to_string().yellow(),
            error_count.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-display".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Report: {}\n", source);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total components : {}", total));
    println!(
        " │  {:<48} │",
        format!(
            "{}  Pass          : {:>4}  {}",
            "✓".green(),
            pass_count,
            summarize_licenses(rows, PolicyVerdict::Pass)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Warn          : {:>4}  {}",
            "⚠".yellow(),
            warn_count,
            summarize_licenses(rows, PolicyVerdict::Warn)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Error         : {:>4}  {}",
            "✗".red(),
            error_count,
            summarize_licenses(rows, PolicyVerdict::Error)
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if error_count > 0 {
        println!(" {} Components requiring attention:\n", "[ERROR]".red().bold());
        println!("{}", build_table(rows, PolicyVerdict::Error));
        println!();
    }

    if warn_count > 0 {
        println!(" {} Components with warnings:\n", "[WARN]".yellow().bold());
        println!("{}", build_table(rows, PolicyVerdict::Warn));
        println!();
    }

    if verbose && pass_count > 0 {
        println!(" {} All passing components:\n", "[PASS]".green().bold());
        println!("{}", build_table(rows, PolicyVerdict::Pass));
        println!();
    }

    Ok(())
}

fn count(rows: &[ComponentLicense], verdict: PolicyVerdict) -> usize {
    rows.iter().filter(|r| r.verdict == verdict).count()
}

fn build_table(rows: &[ComponentLicense], verdict_filter: PolicyVerdict) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Component").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
        ]);

    for row in rows.iter().filter(|r| r.verdict == verdict_filter) {
        let (verdict_str, verdict_color) = match row.verdict {
            PolicyVerdict::Pass => ("✓ pass", Color::Green),
            PolicyVerdict::Warn => ("⚠ warn", Color::Yellow),
            PolicyVerdict::Error => ("✗ error", Color::Red),
        };

        let risk_color = match row.risk {
            LicenseRisk::Permissive => Color::Green,
            LicenseRisk::WeakCopyleft => Color::Yellow,
            LicenseRisk::StrongCopyleft => Color::Red,
            LicenseRisk::Proprietary => Color::Magenta,
            LicenseRisk::Unknown => Color::DarkGrey,
        };

        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(&row.version),
            Cell::new(&row.license_display),
            Cell::new(row.risk.to_string()).fg(risk_color),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    table
}

/// Top three license displays for a verdict, most frequent first.
fn summarize_licenses(rows: &[ComponentLicense], verdict: PolicyVerdict) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows.iter().filter(|r| r.verdict == verdict) {
        *counts.entry(row.license_display.as_str()).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(lic, cnt)| format!("{} ({})", lic, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, display: &str, verdict: PolicyVerdict) -> ComponentLicense {
        ComponentLicense {
            name: name.to_string(),
            version: "1.0".to_string(),
            license_id: None,
            license_display: display.to_string(),
            risk: LicenseRisk::Unknown,
            verdict,
        }
    }

    #[test]
    fn test_summarize_licenses_orders_by_count() {
        let rows = vec![
            row("a", "MIT", PolicyVerdict::Pass),
            row("b", "(MIT OR Apache-2.0)", PolicyVerdict::Pass),
            row("c", "MIT", PolicyVerdict::Pass),
            row("d", "UNKNOWN", PolicyVerdict::Warn),
        ];
        assert_eq!(
            summarize_licenses(&rows, PolicyVerdict::Pass),
            "[MIT (2), (MIT OR Apache-2.0) (1)]"
        );
        assert_eq!(summarize_licenses(&rows, PolicyVerdict::Error), "");
    }

    #[test]
    fn test_table_only_lists_matching_verdict() {
        let rows = vec![
            row("left-pad", "MIT", PolicyVerdict::Pass),
            row("gpl-thing", "GPL-3.0", PolicyVerdict::Error),
        ];
        let rendered = build_table(&rows, PolicyVerdict::Error).to_string();
        assert!(rendered.contains("gpl-thing"));
        assert!(!rendered.contains("left-pad"));
    }
}
