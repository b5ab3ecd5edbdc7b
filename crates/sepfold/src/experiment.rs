//! Experiment drivers: how often do designed sequences fold uniquely into
//! their target structure, under the internal engines and under the
//! external oracle?

use std::path::PathBuf;

use anyhow::{bail, Result};
use log::{info, warn};
use rand::Rng;

use sf_design::{first_modulo_separable, is_fully_separable, random_compatible_sequence};
use sf_folding::{EnergyModel, NucleotideVec, PairingRules, StackingFold, UnitaryFold};
use sf_structure::{DotBracketVec, PairTable, StructureSampler, StructureTree};

use crate::oracle::FoldOracle;
use crate::report::{read_rows, DesignAgreement, ReportWriter};

/// Sequence retries on one target before the target itself is resampled.
const RESAMPLE_AFTER: usize = 1000;
/// Same bound for the head-to-head driver, which waits for two criteria.
const VS_RESAMPLE_AFTER: usize = 10_000;
/// Hard cap on target resampling, so a driver never spins forever.
const MAX_TARGETS: usize = 10_000;

const FROM_STACKING_HEADER: [&str; 7] =
    ["ss", "seq", "Separable(Aonly)", "BPDesign", "BPfold", "TurnerDesign", "Turnerfold"];
const FROM_SEPARABLE_HEADER: [&str; 6] =
    ["ss", "seq", "StackingDesign", "StackingFold", "TurnerDesign", "Turnerfold"];
const VS_HEADER: [&str; 8] = [
    "ss",
    "Stacking_seq",
    "Stacking_TurnerFold",
    "Stacking_TurnerDesign",
    "BP_seq",
    "BP_TurnerFold",
    "BP_TurnerDesign",
    "nb_it_more_for_finding_BP",
];

#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub length: usize,
    pub iterations: usize,
    pub theta: usize,
    pub min_helix: usize,
    pub restart: bool,
    pub report: PathBuf,
}

fn tf(b: bool) -> String {
    if b { "True".to_string() } else { "False".to_string() }
}

/// Samples targets until one passes the branching filter.
fn sample_filtered<R: Rng + ?Sized>(
    sampler: &StructureSampler,
    rng: &mut R,
) -> Result<(PairTable, StructureTree)> {
    for _ in 0..MAX_TARGETS {
        let dbv = sampler.sample(rng);
        let pt = PairTable::try_from(&dbv)?;
        let tree = StructureTree::from(&pt);
        if tree.has_bounded_branching() {
            return Ok((pt, tree));
        }
    }
    bail!("no structure passed the branching filter in {} draws", MAX_TARGETS);
}

/// Is `target` the unique delta-0 structure of `seq` in the stacking model?
fn stacking_design(seq: &NucleotideVec, target: &PairTable) -> (bool, PairTable) {
    let fold = StackingFold::new(seq, PairingRules::Nussinov);
    let mut within = fold.backtrack_within(0);
    let ok = within.len() == 1 && within[0] == *target;
    (ok, within.swap_remove(0))
}

/// Is `target` the unique optimum of `seq` in the unitary model?
fn unitary_design(seq: &NucleotideVec, target: &PairTable) -> (bool, PairTable) {
    let fold = UnitaryFold::new(seq, EnergyModel::Unitary, PairingRules::Nussinov);
    let pt = fold.backtrack_optimal();
    let ok = fold.optima_count() == 1.0 && pt == *target;
    (ok, pt)
}

/// Oracle columns for one sequence; a failing oracle degrades to NA.
fn oracle_design(
    oracle: Option<&dyn FoldOracle>,
    seq: &NucleotideVec,
    target: &str,
) -> (String, String) {
    match oracle {
        None => ("NA".to_string(), "NA".to_string()),
        Some(oracle) => match oracle.fold(seq) {
            Ok(fold) => {
                let structure = fold.structure.to_string();
                (tf(fold.optima == 1 && structure == target), structure)
            }
            Err(e) => {
                warn!("oracle failed on {}: {}", seq, e);
                ("NA".to_string(), "NA".to_string())
            }
        },
    }
}

/// Random-compatible design loop: targets from the filtered sampler, A-only
/// sequences retried until the stacking criterion holds.
pub fn run_from_stacking<R: Rng + ?Sized>(
    cfg: &ExperimentConfig,
    oracle: Option<&dyn FoldOracle>,
    rng: &mut R,
) -> Result<()> {
    let sampler = StructureSampler::new(cfg.length, cfg.theta, cfg.min_helix);
    let mut writer = ReportWriter::open(&cfg.report, &FROM_STACKING_HEADER, cfg.restart)?;

    for iteration in 0..cfg.iterations {
        let (mut pt, mut tree) = sample_filtered(&sampler, rng)?;
        let mut tries = 0;
        let mut targets_tried = 0;
        let seq = loop {
            let seq = random_compatible_sequence(&tree, rng, true);
            if stacking_design(&seq, &pt).0 {
                break seq;
            }
            tries += 1;
            if tries >= RESAMPLE_AFTER {
                targets_tried += 1;
                if targets_tried >= MAX_TARGETS {
                    bail!("no stacking design found in {} targets", MAX_TARGETS);
                }
                (pt, tree) = sample_filtered(&sampler, rng)?;
                tries = 0;
                info!("iteration {}: target resampled", iteration);
            }
        };

        let target = DotBracketVec::from(&pt).to_string();
        let separable = is_fully_separable(&seq, &pt)?;
        let (bp_ok, bp_pt) = unitary_design(&seq, &pt);
        let (oracle_ok, oracle_fold) = oracle_design(oracle, &seq, &target);

        info!("iteration {}: {} {}", iteration, target, seq);
        writer.write_row(&[
            target,
            seq.to_string(),
            tf(separable),
            tf(bp_ok),
            DotBracketVec::from(&bp_pt).to_string(),
            oracle_ok,
            oracle_fold,
        ])?;
    }
    Ok(())
}

pub fn summarize_from_stacking(report: &PathBuf) -> Result<()> {
    let rows = read_rows(report)?;
    let turner_vs_bp = DesignAgreement::tally(&rows, 5, 3);
    let turner_vs_separable = DesignAgreement::tally(&rows, 5, 2);
    info!(
        "Turner/BP agreement over {} rows: both {}, Turner only {}, BP only {}, neither {}",
        turner_vs_bp.total(),
        turner_vs_bp.both,
        turner_vs_bp.first_only,
        turner_vs_bp.second_only,
        turner_vs_bp.neither
    );
    info!(
        "Turner/separable agreement: both {}, Turner only {}, separable only {}, neither {}",
        turner_vs_separable.both,
        turner_vs_separable.first_only,
        turner_vs_separable.second_only,
        turner_vs_separable.neither
    );
    Ok(())
}

/// Separable-design loop: targets from the filtered sampler, sequences from
/// the modulo-separable design engine (modulus limit 2).
pub fn run_from_separable<R: Rng + ?Sized>(
    cfg: &ExperimentConfig,
    oracle: Option<&dyn FoldOracle>,
    rng: &mut R,
) -> Result<()> {
    let sampler = StructureSampler::new(cfg.length, cfg.theta, cfg.min_helix);
    let mut writer = ReportWriter::open(&cfg.report, &FROM_SEPARABLE_HEADER, cfg.restart)?;

    for iteration in 0..cfg.iterations {
        let mut targets_tried = 0;
        let (pt, design) = loop {
            let (pt, tree) = sample_filtered(&sampler, rng)?;
            if let Some(design) = first_modulo_separable(&tree, 2, rng) {
                break (pt, design);
            }
            targets_tried += 1;
            if targets_tried >= MAX_TARGETS {
                bail!("no separable design found in {} targets", MAX_TARGETS);
            }
        };

        let target = DotBracketVec::from(&pt).to_string();
        let (stack_ok, stack_pt) = stacking_design(&design.sequence, &pt);
        let (oracle_ok, oracle_fold) = oracle_design(oracle, &design.sequence, &target);

        info!("iteration {}: {} {}", iteration, target, design.sequence);
        writer.write_row(&[
            target,
            design.sequence.to_string(),
            tf(stack_ok),
            DotBracketVec::from(&stack_pt).to_string(),
            oracle_ok,
            oracle_fold,
        ])?;
    }
    Ok(())
}

pub fn summarize_from_separable(report: &PathBuf) -> Result<()> {
    let rows = read_rows(report)?;
    let agg = DesignAgreement::tally(&rows, 4, 2);
    info!(
        "Turner/stacking agreement over {} rows: both {}, Turner only {}, stacking only {}, neither {}",
        agg.total(),
        agg.both,
        agg.first_only,
        agg.second_only,
        agg.neither
    );
    Ok(())
}

/// Head-to-head driver: on one target, how many extra random-compatible
/// draws does the unitary criterion need over the stacking criterion?
pub fn run_stacking_vs_bp<R: Rng + ?Sized>(
    cfg: &ExperimentConfig,
    oracle: Option<&dyn FoldOracle>,
    rng: &mut R,
) -> Result<()> {
    let sampler = StructureSampler::new(cfg.length, cfg.theta, cfg.min_helix);
    let mut writer = ReportWriter::open(&cfg.report, &VS_HEADER, cfg.restart)?;

    for iteration in 0..cfg.iterations {
        let (mut pt, mut tree) = sample_filtered(&sampler, rng)?;
        let mut tries = 0;
        let mut targets_tried = 0;
        let mut stacking_hit: Option<(NucleotideVec, usize)> = None;
        let mut unitary_hit: Option<(NucleotideVec, usize)> = None;

        loop {
            let seq = random_compatible_sequence(&tree, rng, true);
            if stacking_hit.is_none() && stacking_design(&seq, &pt).0 {
                stacking_hit = Some((seq.clone(), tries));
            }
            if unitary_hit.is_none() && unitary_design(&seq, &pt).0 {
                unitary_hit = Some((seq, tries));
            }
            if stacking_hit.is_some() && unitary_hit.is_some() {
                break;
            }
            tries += 1;
            if tries >= VS_RESAMPLE_AFTER {
                targets_tried += 1;
                if targets_tried >= MAX_TARGETS {
                    bail!("no joint design found in {} targets", MAX_TARGETS);
                }
                // start over on a fresh target; partial hits refer to the
                // old one and must not carry over
                (pt, tree) = sample_filtered(&sampler, rng)?;
                stacking_hit = None;
                unitary_hit = None;
                tries = 0;
                info!("iteration {}: target resampled", iteration);
            }
        }

        let target = DotBracketVec::from(&pt).to_string();
        let (stacking_seq, stacking_tries) = stacking_hit.expect("loop only exits on hits");
        let (unitary_seq, unitary_tries) = unitary_hit.expect("loop only exits on hits");
        let (stack_oracle_ok, stack_oracle_fold) = oracle_design(oracle, &stacking_seq, &target);
        let (bp_oracle_ok, bp_oracle_fold) = oracle_design(oracle, &unitary_seq, &target);
        let extra = unitary_tries as i64 - stacking_tries as i64;

        info!("iteration {}: {} (extra BP draws: {})", iteration, target, extra);
        writer.write_row(&[
            target,
            stacking_seq.to_string(),
            stack_oracle_fold,
            stack_oracle_ok,
            unitary_seq.to_string(),
            bp_oracle_fold,
            bp_oracle_ok,
            extra.to_string(),
        ])?;
    }
    Ok(())
}

pub fn summarize_stacking_vs_bp(report: &PathBuf) -> Result<()> {
    let rows = read_rows(report)?;
    let agg = DesignAgreement::tally(&rows, 3, 6);
    let extra: i64 = rows
        .iter()
        .filter_map(|row| row[7].parse::<i64>().ok())
        .sum();
    info!(
        "Turner agreement (stacking seq vs BP seq) over {} rows: both {}, stacking only {}, BP only {}, neither {}",
        agg.total(),
        agg.both,
        agg.first_only,
        agg.second_only,
        agg.neither
    );
    if !rows.is_empty() {
        info!("mean extra draws for the BP criterion: {:.2}", extra as f64 / rows.len() as f64);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn tmp_report(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("sepfold-experiment-test-{}-{}", std::process::id(), name));
        p
    }

    #[test]
    fn test_from_stacking_rows_are_real_designs() {
        let report = tmp_report("from-stacking");
        let cfg = ExperimentConfig {
            length: 12,
            iterations: 3,
            theta: 3,
            min_helix: 3,
            restart: true,
            report: report.clone(),
        };
        let mut rng = StdRng::seed_from_u64(2024);
        run_from_stacking(&cfg, None, &mut rng).unwrap();

        let rows = read_rows(&report).unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            let pt = PairTable::try_from(row[0].as_str()).unwrap();
            let seq = NucleotideVec::try_from(row[1].as_str()).unwrap();
            let (ok, _) = stacking_design(&seq, &pt);
            assert!(ok, "reported design must satisfy the stacking criterion");
            assert_eq!(row[5], "NA"); // no oracle attached
        }
        std::fs::remove_file(&report).unwrap();
    }

    #[test]
    fn test_from_separable_rows_verify() {
        let report = tmp_report("from-separable");
        let cfg = ExperimentConfig {
            length: 14,
            iterations: 3,
            theta: 3,
            min_helix: 3,
            restart: true,
            report: report.clone(),
        };
        let mut rng = StdRng::seed_from_u64(77);
        run_from_separable(&cfg, None, &mut rng).unwrap();

        let rows = read_rows(&report).unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            let pt = PairTable::try_from(row[0].as_str()).unwrap();
            let seq = NucleotideVec::try_from(row[1].as_str()).unwrap();
            // designs from the separable engine are separable by construction
            assert_eq!(is_fully_separable(&seq, &pt), Ok(true));
        }
        std::fs::remove_file(&report).unwrap();
    }
}
