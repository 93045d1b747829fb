//! BCH simulation CLI.
//!
//! - `bchsim sweep` - success rate for every strength of one field order
//! - `bchsim check` - failure count for a single (t, m) code
//! - `bchsim plan`  - run a TOML campaign plan, or the built-in one

use anyhow::Context;
use bchsim::sim::{
    export, run_check, write_rates, CampaignPlan, CheckConfig, ErrorModel, SweepConfig,
    SweepExecutor,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bchsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep t = 1..=max over one field order and export the success rates.
    ///
    /// Rates are written as `strength,rate` lines to --output, or to stdout
    /// when no output is given.
    Sweep(SweepArgs),

    /// Run many trials of one code and report how many failed.
    Check(CheckArgs),

    /// Run a campaign plan.
    ///
    /// Without a path the built-in plan runs: scattered and burst sweeps over
    /// GF(2^9) plus the t=2/m=9 and t=15/m=8 checks.
    Plan {
        /// TOML plan file
        path: Option<PathBuf>,
    },
}

#[derive(Args)]
struct TrialArgs {
    /// Error model applied to every packet
    #[arg(long, value_enum, default_value_t = ErrorModel::Scattered)]
    model: ErrorModel,

    /// Extra errors injected beyond the strength
    #[arg(long, default_value_t = 0)]
    delta: usize,

    /// Base seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Run trials on a rayon pool
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct SweepArgs {
    /// Field order m
    #[arg(short = 'm', long = "field-order", default_value_t = 9)]
    m: usize,

    /// Trials per strength
    #[arg(short = 'n', long, default_value_t = 1000)]
    trials: usize,

    /// Highest strength to sweep; largest constructible when omitted
    #[arg(long)]
    max_strength: Option<usize>,

    /// Destination file, overwritten
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    trial: TrialArgs,
}

#[derive(Args)]
struct CheckArgs {
    /// Correction strength t
    #[arg(short = 't', long = "strength")]
    t: usize,

    /// Field order m
    #[arg(short = 'm', long = "field-order")]
    m: usize,

    #[arg(short = 'n', long, default_value_t = 1000)]
    trials: usize,

    #[command(flatten)]
    trial: TrialArgs,
}

fn sweep(args: SweepArgs) -> anyhow::Result<()> {
    let config = SweepConfig {
        field_order: args.m,
        trials: args.trials,
        model: args.trial.model,
        delta: args.trial.delta,
        max_strength: args.max_strength,
        seed: args.trial.seed,
        parallel: args.trial.parallel,
    };
    let result = SweepExecutor::new(config)?.run()?;

    match args.output {
        Some(path) => export(&path, &result)
            .with_context(|| format!("failed to export to {}", path.display()))?,
        None => write_rates(&mut std::io::stdout().lock(), &result)?,
    }
    Ok(())
}

fn check(args: CheckArgs) -> anyhow::Result<()> {
    let config = CheckConfig {
        strength: args.t,
        field_order: args.m,
        trials: args.trials,
        model: args.trial.model,
        delta: args.trial.delta,
        seed: args.trial.seed,
        parallel: args.trial.parallel,
    };
    let report = run_check(&config)?;
    println!("{}", report);
    Ok(())
}

fn plan(path: Option<PathBuf>) -> anyhow::Result<()> {
    let plan = match path {
        Some(path) => CampaignPlan::load(&path)?,
        None => CampaignPlan::standard(),
    };
    let report = plan.run()?;

    for (output, result) in &report.sweeps {
        println!("{}: {} strengths, seed {}", output.display(), result.len(), result.seed);
    }
    for check in &report.checks {
        println!("{}", check);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep(args) => sweep(args),
        Commands::Check(args) => check(args),
        Commands::Plan { path } => plan(path),
    }
}
