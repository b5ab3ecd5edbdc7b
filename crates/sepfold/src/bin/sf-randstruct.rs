use clap::ArgAction;
use clap::Parser;
use log::info;

use anyhow::Result;

use sf_structure::{PairTable, StructureSampler, StructureTree};

use sepfold::init_logging;

/// Sample random secondary structures under loop and helix constraints.
#[derive(Debug, Parser)]
#[command(name = "sf-randstruct")]
#[command(author, version, about)]
struct Cli {
    /// Length of each structure
    #[arg(short = 'n', long, default_value_t = 50)]
    length: usize,

    /// Minimum number of unpaired positions enclosed by a pair
    #[arg(short, long, default_value_t = 3)]
    theta: usize,

    /// Minimum helix length
    #[arg(short = 'm', long, default_value_t = 3)]
    min_helix: usize,

    /// Number of structures to sample
    #[arg(long, default_value_t = 1)]
    num: usize,

    /// Only emit structures that pass the branching filter
    #[arg(short, long)]
    filtered: bool,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let sampler = StructureSampler::new(cli.length, cli.theta, cli.min_helix);
    info!(
        "{} structures of length {} (theta {}, min helix {})",
        sampler.count(cli.length),
        cli.length,
        cli.theta,
        cli.min_helix
    );

    let mut rng = rand::rng();
    let mut emitted = 0;
    while emitted < cli.num {
        let dbv = sampler.sample(&mut rng);
        if cli.filtered {
            let pt = PairTable::try_from(&dbv)?;
            if !StructureTree::from(&pt).has_bounded_branching() {
                continue;
            }
        }
        println!("{}", dbv);
        emitted += 1;
    }

    Ok(())
}
