use clap::ArgAction;
use clap::Parser;
use colored::*;
use log::info;

use anyhow::{bail, Result};

use sf_design::{first_modulo_separable, is_fully_separable};
use sf_structure::{PairTable, StructureTree};

use sepfold::init_logging;

/// Design a modulo-separable sequence for a target structure.
#[derive(Debug, Parser)]
#[command(name = "sf-design")]
#[command(author, version, about)]
struct Cli {
    /// Target structure in dot-bracket notation
    #[arg(value_name = "STRUCTURE")]
    structure: String,

    /// Largest modulus to try
    #[arg(short, long, default_value_t = 4)]
    modulus_limit: usize,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let pt = PairTable::try_from(cli.structure.as_str())?;
    let tree = StructureTree::from(&pt);
    if !tree.has_bounded_branching() {
        info!("{} the target does not pass the branching filter", "NOTE:".yellow());
    }

    let mut rng = rand::rng();
    let Some(design) = first_modulo_separable(&tree, cli.modulus_limit, &mut rng) else {
        bail!("no separable design up to modulus {}", cli.modulus_limit);
    };

    println!("{}", cli.structure);
    println!("{}", design.sequence);
    println!(
        "modulus {}, target levels {:?}, fully separable: {}",
        design.modulus.to_string().green(),
        design.target_levels,
        is_fully_separable(&design.sequence, &pt)?
    );

    Ok(())
}
