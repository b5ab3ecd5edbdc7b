use clap::ArgAction;
use clap::Parser;
use colored::*;
use log::info;

use anyhow::Result;

use sf_folding::{EnergyModel, NucleotideVec, PairingRules, StackingFold, UnitaryFold};
use sf_structure::DotBracketVec;

use sepfold::init_logging;

/// Fold a sequence under the internal base-pair or stacking model.
#[derive(Debug, Parser)]
#[command(name = "sf-fold")]
#[command(author, version, about)]
struct Cli {
    /// Sequence over A, C, G, U (uppercase)
    #[arg(value_name = "SEQUENCE")]
    sequence: String,

    /// Energy model identifier
    #[arg(short, long, default_value = "Unitary")]
    model: String,

    /// Pairing rules identifier (Nussinov or Watson)
    #[arg(short, long, default_value = "Nussinov")]
    pairing: String,

    /// Use the stacking recursion instead of the plain base-pair one
    #[arg(short, long)]
    stacking: bool,

    /// Enumerate all structures within this energy distance of the optimum
    #[arg(short, long)]
    delta: Option<i32>,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let seq = NucleotideVec::try_from(cli.sequence.as_str())?;
    let model: EnergyModel = cli.model.parse()?;
    let rules: PairingRules = cli.pairing.parse()?;

    println!("{}", seq);
    if cli.stacking {
        let fold = StackingFold::new(&seq, rules);
        report(fold.optimum(), cli.delta, |delta| {
            fold.backtrack_within(delta)
                .iter()
                .map(|pt| DotBracketVec::from(pt).to_string())
                .collect()
        }, || DotBracketVec::from(&fold.backtrack_optimal()).to_string());
    } else {
        let fold = UnitaryFold::new(&seq, model, rules);
        info!("{} structures attain the optimum", fold.optima_count());
        report(fold.optimum(), cli.delta, |delta| {
            fold.backtrack_within(delta)
                .iter()
                .map(|pt| DotBracketVec::from(pt).to_string())
                .collect()
        }, || DotBracketVec::from(&fold.backtrack_optimal()).to_string());
    }

    Ok(())
}

fn report<E, O>(optimum: i32, delta: Option<i32>, enumerate: E, optimal: O)
where
    E: Fn(i32) -> Vec<String>,
    O: Fn() -> String,
{
    match delta {
        Some(delta) => {
            let structures = enumerate(delta);
            for s in &structures {
                println!("{}", s);
            }
            println!(
                "{} structures within {} of optimum {}",
                structures.len().to_string().green(),
                delta,
                optimum
            );
        }
        None => {
            println!("{} {}", optimal(), format!("{:>4}", optimum).green());
        }
    }
}
