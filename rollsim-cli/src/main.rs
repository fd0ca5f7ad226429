//! RollSim CLI — rolling add-on simulations, comparisons and projections.
//!
//! Commands:
//! - `simulate` — one rolling simulation from a TOML config
//! - `compare` — floating-profit vs rolling-reset side by side
//! - `project` — compounding growth and lot projection
//! - `sweep` — growth projection (and simulation) per leverage candidate
//! - `record init|show` — write or inspect a persisted strategy record

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rollsim_core::projector::{project_position_advance, DEFAULT_MAX_ROUNDS};
use rollsim_core::{
    run_growth_projection, run_rolling_simulation, GrowthProjection, SimulationOutcome,
    SimulationParameters, StrategyMode,
};
use rollsim_runner::export::{export_lots_csv, export_rounds_csv, export_steps_csv, generate_comparison};
use rollsim_runner::{
    compare_strategies, save_artifacts, sweep_leverage, CandidateResult, LiquidationGrid,
    SimulationConfig, StrategyRecord, SweepConfig,
};

#[derive(Parser)]
#[command(
    name = "rollsim",
    about = "RollSim CLI — leveraged rolling add-on strategy simulator"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Floating,
    Rolling,
}

impl From<ModeArg> for StrategyMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Floating => StrategyMode::FloatingProfit,
            ModeArg::Rolling => StrategyMode::RollingReset,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one rolling simulation.
    Simulate {
        /// Path to a TOML config file. Defaults to built-in parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strategy mode. Defaults to the config's strategy_mode.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Write the step series as CSV.
        #[arg(long)]
        steps_csv: Option<PathBuf>,
    },
    /// Run both strategy modes and compare them.
    Compare {
        /// Path to a TOML config file. Defaults to built-in parameters.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save comparison.json, report.md and CSV series under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Project compounding growth toward a capital target.
    Project {
        #[arg(long, default_value_t = 100.0)]
        capital: f64,

        #[arg(long, default_value_t = 100_000.0)]
        target: f64,

        /// Growth per round, in percent.
        #[arg(long, default_value_t = 30.0)]
        growth_pct: f64,

        /// Lot added per round relative to the current lot, in percent.
        #[arg(long, default_value_t = 50.0)]
        add_ratio_pct: f64,

        #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
        max_rounds: usize,

        /// Write the capital rounds as CSV.
        #[arg(long)]
        rounds_csv: Option<PathBuf>,

        /// Write the lot rounds as CSV.
        #[arg(long)]
        lots_csv: Option<PathBuf>,
    },
    /// Compare leverage candidates.
    Sweep {
        /// Comma-separated leverage candidates, e.g. 10,20,50.
        #[arg(long, value_delimiter = ',', required = true)]
        leverage: Vec<u32>,

        #[arg(long, default_value_t = 100.0)]
        capital: f64,

        #[arg(long, default_value_t = 100_000.0)]
        target: f64,

        /// Average favourable price move per round, in percent.
        #[arg(long, default_value_t = 30.0)]
        average_gain_pct: f64,

        /// Also run a rolling simulation per candidate from this TOML config.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Strategy record commands.
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },
}

#[derive(Subcommand)]
enum RecordAction {
    /// Write the default strategy record.
    Init {
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Load a strategy record and print its projection and liquidation grid.
    Show { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate {
            config,
            mode,
            steps_csv,
        } => run_simulate(config.as_deref(), mode, steps_csv.as_deref()),
        Commands::Compare { config, output_dir } => {
            run_compare(config.as_deref(), output_dir.as_deref())
        }
        Commands::Project {
            capital,
            target,
            growth_pct,
            add_ratio_pct,
            max_rounds,
            rounds_csv,
            lots_csv,
        } => run_project(
            capital,
            target,
            growth_pct / 100.0,
            add_ratio_pct / 100.0,
            max_rounds,
            rounds_csv.as_deref(),
            lots_csv.as_deref(),
        ),
        Commands::Sweep {
            leverage,
            capital,
            target,
            average_gain_pct,
            config,
        } => {
            let simulation = config.as_deref().map(load_parameters).transpose()?;
            let sweep = SweepConfig {
                leverage_options: leverage,
                starting_capital: capital,
                growth_target: target,
                average_gain: average_gain_pct / 100.0,
                max_rounds: DEFAULT_MAX_ROUNDS,
                simulation,
            };
            run_sweep(&sweep)
        }
        Commands::Record { action } => match action {
            RecordAction::Init { path, force } => run_record_init(&path, force),
            RecordAction::Show { path } => run_record_show(&path),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_parameters(path: &Path) -> Result<SimulationParameters> {
    let config = SimulationConfig::from_file(path)?;
    Ok(config.to_parameters()?)
}

fn parameters_or_default(path: Option<&Path>) -> Result<SimulationParameters> {
    match path {
        Some(path) => load_parameters(path),
        None => Ok(SimulationParameters::default()),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote file");
    Ok(())
}

// ─── Commands ───────────────────────────────────────────────────────

fn run_simulate(
    config: Option<&Path>,
    mode: Option<ModeArg>,
    steps_csv: Option<&Path>,
) -> Result<()> {
    let params = parameters_or_default(config)?;
    let mode = mode.map(StrategyMode::from).unwrap_or(params.strategy_mode);
    let outcome = run_rolling_simulation(&params, mode)?;

    print_outcome(&outcome);
    if let Some(path) = steps_csv {
        write_file(path, &export_steps_csv(&outcome.steps)?)?;
    }
    Ok(())
}

fn run_compare(config: Option<&Path>, output_dir: Option<&Path>) -> Result<()> {
    let params = parameters_or_default(config)?;
    let result = compare_strategies(&params)?;

    println!("{}", generate_comparison(&result));
    println!("Better mode: {}", result.better_mode());

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&result, dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_project(
    capital: f64,
    target: f64,
    growth_rate: f64,
    add_ratio: f64,
    max_rounds: usize,
    rounds_csv: Option<&Path>,
    lots_csv: Option<&Path>,
) -> Result<()> {
    let projection = run_growth_projection(capital, target, growth_rate, max_rounds)?;
    let lots = project_position_advance(add_ratio, projection.round_count())?;

    println!("{:>6} {:>16} {:>14} {:>10} {:>10}", "round", "capital", "profit", "lot", "push %");
    for (round, lot) in projection.rounds.iter().zip(&lots) {
        println!(
            "{:>6} {:>16.2} {:>14.2} {:>10.4} {:>10.2}",
            round.round, round.capital, round.round_profit, lot.position, lot.push_ratio_pct
        );
    }
    println!();
    print_projection_verdict(&projection);

    if let Some(path) = rounds_csv {
        write_file(path, &export_rounds_csv(&projection.rounds)?)?;
    }
    if let Some(path) = lots_csv {
        write_file(path, &export_lots_csv(&lots)?)?;
    }
    Ok(())
}

fn run_sweep(sweep: &SweepConfig) -> Result<()> {
    let results = sweep_leverage(sweep)?;
    print_sweep(&results);
    Ok(())
}

fn run_record_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    StrategyRecord::default().save(path)?;
    println!("Strategy record written to: {}", path.display());
    Ok(())
}

fn run_record_show(path: &Path) -> Result<()> {
    let record = StrategyRecord::load(path)?;
    record.validate()?;

    println!("=== {} ({}) ===", record.strategy_name, record.coin);
    if !record.note.is_empty() {
        println!("{}", record.note);
    }
    println!("Total margin:   {:.2}", record.total_margin());
    println!("Leverage:       {:?}", record.leverage_options);
    println!(
        "Add-on:         +{}% at {}% floating profit",
        record.add_ratio_pct, record.add_trigger_pct
    );
    println!();

    let projection = record.projection()?;
    print_projection_verdict(&projection);
    println!();
    print_grid(&record.liquidation_grid()?);
    println!();
    print_sweep(&sweep_leverage(&record.sweep_config())?);
    Ok(())
}

// ─── Output ─────────────────────────────────────────────────────────

fn print_outcome(outcome: &SimulationOutcome) {
    let s = &outcome.summary;
    println!();
    println!("=== Rolling Simulation ({}) ===", outcome.mode);
    println!("Termination:    {:?}", outcome.termination);
    println!("Steps:          {}", s.step_count);
    println!("Add-ons:        {}", s.add_on_count);
    println!();
    println!("--- Final State ---");
    println!("Price:          {:.4} (peak {:.4})", s.final_price, s.peak_price);
    println!("Capital:        {:.2}", s.final_capital);
    println!("Position:       {:.6}", s.final_position);
    println!("Leverage:       {}x", s.final_leverage);
    println!("Liquidation:    {:.4}", s.final_liquidation_price);
    println!("Reserve:        {:.2}", s.reserve_total);
    println!();
    println!("--- Profit ---");
    println!("Floating:       {:.2}", s.floating_profit);
    println!("Final:          {:.2}", s.final_profit);
    println!("On margin:      {:.2}%", s.return_on_margin * 100.0);
    for warning in &outcome.warnings {
        println!("WARNING: {warning:?}");
    }
}

fn print_projection_verdict(projection: &GrowthProjection) {
    if projection.reached_target {
        println!(
            "Estimated {} rounds to reach {:.2}.",
            projection.round_count(),
            projection.target
        );
    } else {
        println!(
            "Target {:.2} not reached within {} rounds (final {:.2}).",
            projection.target,
            projection.round_count(),
            projection.final_capital()
        );
    }
}

fn print_sweep(results: &[CandidateResult]) {
    println!(
        "{:>8} {:>13} {:>10} {:>8} {:>16} {:>14}",
        "leverage", "tier", "growth %", "rounds", "final capital", "sim profit"
    );
    for r in results {
        let rounds = r
            .rounds_to_target()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".into());
        let sim_profit = r
            .simulation
            .as_ref()
            .map(|s| format!("{:.2}", s.summary.final_profit))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:>7}x {:>13} {:>10.1} {:>8} {:>16.2} {:>14}",
            r.leverage,
            r.tier.label(),
            r.growth_rate * 100.0,
            rounds,
            r.projection.final_capital(),
            sim_profit
        );
    }
}

fn print_grid(grid: &LiquidationGrid) {
    print!("{:>12}", "price");
    for row in &grid.rows {
        print!(" {:>12}", format!("{}x", row.leverage));
    }
    println!();
    for (i, price) in grid.prices.iter().enumerate() {
        print!("{price:>12.2}");
        for row in &grid.rows {
            print!(" {:>12.2}", row.liquidation_prices[i]);
        }
        println!();
    }
}
