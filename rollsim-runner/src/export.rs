//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! - **JSON**: full `ComparisonResult` with schema versioning
//! - **CSV**: step series, add-on tables, growth and lot projections
//! - **Markdown**: side-by-side strategy comparison
//!
//! Unknown schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rollsim_core::{AddOnEvent, LotRecord, RoundRecord, StepRecord, StrategyMode};

use crate::compare::{ComparisonResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(result: &ComparisonResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize ComparisonResult to JSON")
}

/// Deserialize a `ComparisonResult`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ComparisonResult> {
    let result: ComparisonResult =
        serde_json::from_str(json).context("failed to deserialize ComparisonResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: step, price, capital, position, reserve_total, leverage, liquidation_price
pub fn export_steps_csv(steps: &[StepRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "step",
        "price",
        "capital",
        "position",
        "reserve_total",
        "leverage",
        "liquidation_price",
    ])?;
    for s in steps {
        wtr.write_record([
            &s.step.to_string(),
            &format!("{:.6}", s.price),
            &format!("{:.2}", s.capital),
            &format!("{:.6}", s.position),
            &format!("{:.2}", s.reserve_total),
            &s.leverage.to_string(),
            &format!("{:.6}", s.liquidation_price),
        ])?;
    }
    finish(wtr)
}

/// Columns: step, price, capital, position
pub fn export_add_ons_csv(add_ons: &[AddOnEvent]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["step", "price", "capital", "position"])?;
    for a in add_ons {
        wtr.write_record([
            &a.step.to_string(),
            &format!("{:.6}", a.price),
            &format!("{:.2}", a.capital),
            &format!("{:.6}", a.position),
        ])?;
    }
    finish(wtr)
}

/// Columns: round, capital, round_profit
pub fn export_rounds_csv(rounds: &[RoundRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["round", "capital", "round_profit"])?;
    for r in rounds {
        wtr.write_record([
            &r.round.to_string(),
            &format!("{:.2}", r.capital),
            &format!("{:.2}", r.round_profit),
        ])?;
    }
    finish(wtr)
}

/// Columns: round, lot_added, position, push_ratio_pct
pub fn export_lots_csv(lots: &[LotRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["round", "lot_added", "position", "push_ratio_pct"])?;
    for l in lots {
        wtr.write_record([
            &l.round.to_string(),
            &format!("{:.4}", l.lot_added),
            &format!("{:.4}", l.position),
            &format!("{:.2}", l.push_ratio_pct),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a strategy comparison.
///
/// Creates `{fingerprint}_{timestamp}/` under `output_dir` containing
/// `comparison.json`, `report.md`, and per-mode `*_steps.csv` and
/// `*_addons.csv`. Returns the created directory.
pub fn save_artifacts(result: &ComparisonResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        result.params.fingerprint().short(),
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    write(&run_dir.join("comparison.json"), &export_json(result)?)?;
    write(&run_dir.join("report.md"), &generate_comparison(result))?;
    for mode in StrategyMode::ALL {
        let outcome = result.outcome(mode);
        let prefix = match mode {
            StrategyMode::FloatingProfit => "floating",
            StrategyMode::RollingReset => "rolling",
        };
        write(
            &run_dir.join(format!("{prefix}_steps.csv")),
            &export_steps_csv(&outcome.steps)?,
        )?;
        write(
            &run_dir.join(format!("{prefix}_addons.csv")),
            &export_add_ons_csv(&outcome.add_ons)?,
        )?;
    }

    Ok(run_dir)
}

/// Load a `ComparisonResult` from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<ComparisonResult> {
    let path = dir.join("comparison.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

// ─── Markdown report ────────────────────────────────────────────────

/// Side-by-side report of both strategy modes.
pub fn generate_comparison(result: &ComparisonResult) -> String {
    let mut md = String::with_capacity(1024);
    let [a, b] = result.summaries();

    md.push_str("# Strategy Comparison\n\n");
    md.push_str(&format!(
        "Parameters: `{}`\n\n",
        result.params.fingerprint().short()
    ));

    md.push_str("| Metric | Floating Profit | Rolling Reset | Delta |\n");
    md.push_str("| --- | ---: | ---: | ---: |\n");

    fn f2(v: f64) -> String {
        format!("{:.2}", v)
    }
    fn delta(a: f64, b: f64) -> String {
        let d = b - a;
        if d >= 0.0 {
            format!("+{:.2}", d)
        } else {
            format!("{:.2}", d)
        }
    }

    md.push_str(&format!(
        "| Termination | {:?} | {:?} | |\n",
        a.termination, b.termination
    ));
    md.push_str(&format!(
        "| Final Profit | {} | {} | {} |\n",
        f2(a.final_profit),
        f2(b.final_profit),
        delta(a.final_profit, b.final_profit)
    ));
    md.push_str(&format!(
        "| Return on Margin | {:.2}% | {:.2}% | {} |\n",
        a.return_on_margin * 100.0,
        b.return_on_margin * 100.0,
        delta(a.return_on_margin * 100.0, b.return_on_margin * 100.0)
    ));
    md.push_str(&format!(
        "| Final Capital | {} | {} | {} |\n",
        f2(a.final_capital),
        f2(b.final_capital),
        delta(a.final_capital, b.final_capital)
    ));
    md.push_str(&format!(
        "| Reserve | {} | {} | {} |\n",
        f2(a.reserve_total),
        f2(b.reserve_total),
        delta(a.reserve_total, b.reserve_total)
    ));
    md.push_str(&format!(
        "| Add-ons | {} | {} | {} |\n",
        a.add_on_count,
        b.add_on_count,
        b.add_on_count as i64 - a.add_on_count as i64
    ));
    md.push_str(&format!(
        "| Final Leverage | {}x | {}x | |\n",
        a.final_leverage, b.final_leverage
    ));
    md.push_str(&format!(
        "| Liquidation Price | {} | {} | {} |\n",
        f2(a.final_liquidation_price),
        f2(b.final_liquidation_price),
        delta(a.final_liquidation_price, b.final_liquidation_price)
    ));
    md.push('\n');

    let warnings: Vec<String> = StrategyMode::ALL
        .iter()
        .flat_map(|&mode| {
            result
                .outcome(mode)
                .warnings
                .iter()
                .map(move |w| format!("- {mode}: {w:?}"))
        })
        .collect();
    if !warnings.is_empty() {
        md.push_str("## Warnings\n\n");
        md.push_str(&warnings.join("\n"));
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_strategies;
    use rollsim_core::{run_growth_projection, SimulationParameters};

    fn sample_result() -> ComparisonResult {
        compare_strategies(&SimulationParameters::default()).unwrap()
    }

    #[test]
    fn json_rejects_unknown_version() {
        let mut result = sample_result();
        result.schema_version = SCHEMA_VERSION + 1;
        let json = serde_json::to_string(&result).unwrap();
        assert!(import_json(&json).is_err());
    }

    #[test]
    fn json_accepts_current_version() {
        let result = sample_result();
        let loaded = import_json(&export_json(&result).unwrap()).unwrap();
        assert_eq!(loaded.schema_version, SCHEMA_VERSION);
        assert_eq!(loaded.floating.steps.len(), result.floating.steps.len());
    }

    #[test]
    fn csv_steps_header_and_rows() {
        let result = sample_result();
        let csv = export_steps_csv(&result.floating.steps).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "step,price,capital,position,reserve_total,leverage,liquidation_price"
        );
        assert_eq!(lines.count(), result.floating.steps.len());
        assert!(csv.contains("\n1,102.000000,112.00,"));
    }

    #[test]
    fn csv_empty_add_ons() {
        let csv = export_add_ons_csv(&[]).unwrap();
        assert_eq!(csv.trim(), "step,price,capital,position");
    }

    #[test]
    fn csv_rounds() {
        let projection = run_growth_projection(100.0, 200.0, 0.5, 10).unwrap();
        let csv = export_rounds_csv(&projection.rounds).unwrap();
        assert!(csv.contains("1,150.00,50.00"));
        assert!(csv.contains("2,225.00,75.00"));
    }

    #[test]
    fn csv_lots() {
        let lots = rollsim_core::project_position_advance(0.5, 1).unwrap();
        let csv = export_lots_csv(&lots).unwrap();
        assert!(csv.contains("1,0.5000,1.5000,33.33"));
    }

    #[test]
    fn markdown_report_has_rows() {
        let md = generate_comparison(&sample_result());
        assert!(md.contains("# Strategy Comparison"));
        assert!(md.contains("| Final Profit |"));
        assert!(md.contains("| Add-ons |"));
    }

    #[test]
    fn save_load_artifacts_roundtrip() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&result, dir.path()).unwrap();

        for file in [
            "comparison.json",
            "report.md",
            "floating_steps.csv",
            "floating_addons.csv",
            "rolling_steps.csv",
            "rolling_addons.csv",
        ] {
            assert!(run_dir.join(file).exists(), "missing {file}");
        }

        let loaded = load_artifacts(&run_dir).unwrap();
        assert_eq!(loaded.params, result.params);
        assert_eq!(loaded.rolling.add_ons.len(), result.rolling.add_ons.len());
    }
}
