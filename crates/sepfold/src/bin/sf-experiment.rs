use std::path::PathBuf;
use std::time::Duration;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;

use anyhow::Result;

use sepfold::experiment::{
    run_from_separable, run_from_stacking, run_stacking_vs_bp, summarize_from_separable,
    summarize_from_stacking, summarize_stacking_vs_bp, ExperimentConfig,
};
use sepfold::init_logging;
use sepfold::oracle::{FoldOracle, RnaSubopt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Experiment {
    /// Random-compatible designs checked against the stacking criterion
    FromStacking,
    /// Designs produced by the modulo-separable engine
    FromSeparable,
    /// Stacking criterion vs plain base-pair criterion head-to-head
    StackingVsBp,
}

/// Run a design experiment and summarize its report.
#[derive(Debug, Parser)]
#[command(name = "sf-experiment")]
#[command(author, version, about)]
struct Cli {
    /// The experiment to launch
    #[arg(short, long, value_enum, default_value_t = Experiment::FromStacking)]
    experiment: Experiment,

    /// Length of the sampled target structures
    #[arg(short = 'n', long, default_value_t = 50)]
    length: usize,

    /// Number of recorded iterations
    #[arg(short, long, default_value_t = 2000)]
    iterations: usize,

    /// Minimum number of unpaired positions enclosed by a pair
    #[arg(short, long, default_value_t = 3)]
    theta: usize,

    /// Minimum helix length
    #[arg(short = 'm', long, default_value_t = 3)]
    min_helix: usize,

    /// Report file path; derived from the experiment name when omitted
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Append to an existing report instead of restarting it
    #[arg(short, long)]
    append: bool,

    /// External oracle program (e.g. RNAsubopt); omit to skip oracle checks
    #[arg(short, long)]
    oracle: Option<String>,

    /// Oracle timeout in seconds
    #[arg(long, default_value_t = 30)]
    oracle_timeout: u64,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report = cli.report.clone().unwrap_or_else(|| {
        PathBuf::from(match cli.experiment {
            Experiment::FromStacking => "ResultsFromStacking.csv",
            Experiment::FromSeparable => "ResultsFromSeparable.csv",
            Experiment::StackingVsBp => "ResultsStackingVsBP.csv",
        })
    });

    let cfg = ExperimentConfig {
        length: cli.length,
        iterations: cli.iterations,
        theta: cli.theta,
        min_helix: cli.min_helix,
        restart: !cli.append,
        report,
    };

    let oracle = cli
        .oracle
        .as_deref()
        .map(|program| RnaSubopt::new(program, Duration::from_secs(cli.oracle_timeout)));
    let oracle: Option<&dyn FoldOracle> = oracle.as_ref().map(|o| o as &dyn FoldOracle);

    let mut rng = rand::rng();
    match cli.experiment {
        Experiment::FromStacking => {
            run_from_stacking(&cfg, oracle, &mut rng)?;
            summarize_from_stacking(&cfg.report)?;
        }
        Experiment::FromSeparable => {
            run_from_separable(&cfg, oracle, &mut rng)?;
            summarize_from_separable(&cfg.report)?;
        }
        Experiment::StackingVsBp => {
            run_stacking_vs_bp(&cfg, oracle, &mut rng)?;
            summarize_stacking_vs_bp(&cfg.report)?;
        }
    }

    Ok(())
}
