//! Interval dynamic programming in the stacking model: a pair only scores
//! -1 when it sits directly inside another admitted pair, so every helix of
//! length L contributes -(L - 1) and isolated pairs are worthless.

use ahash::AHashSet;
use log::debug;
use ndarray::Array2;

use sf_structure::PairTable;

use crate::nucleotides::NucleotideVec;
use crate::pairing::PairingRules;

/// Which score table an interval obligation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// No adjacent enclosing pair; a pair placed here opens a helix for free.
    Exterior,
    /// Directly enclosed by an admitted pair; a pair placed here stacks.
    Enclosed,
}

/// Minimum-energy folding of one sequence under the stacking model.
///
/// Two tables are filled per fold: `exterior[(i, j)]` scores the interval on
/// its own, `enclosed[(i, j)]` scores it under the assumption that
/// `(i - 1, j + 1)` is an admitted pair. Both are owned by this value.
#[derive(Debug)]
pub struct StackingFold {
    seq: NucleotideVec,
    rules: PairingRules,
    exterior: Array2<i32>,
    enclosed: Array2<i32>,
}

impl StackingFold {
    pub fn new(seq: &NucleotideVec, rules: PairingRules) -> Self {
        let n = seq.len();
        let mut exterior = Array2::<i32>::zeros((n, n));
        let mut enclosed = Array2::<i32>::zeros((n, n));

        for i in (0..n).rev() {
            for j in (i + 1)..n {
                // leading position unpaired, shared by both tables
                let unpaired = exterior[(i + 1, j)];

                let mut best_e = unpaired;
                let mut best_s = unpaired;
                if rules.admits(seq[i], seq[j]) {
                    // pair (i, j) over its own enclosed interval; the -1 is
                    // only earned when (i, j) itself stacks
                    best_e = best_e.min(enclosed[(i + 1, j - 1)]);
                    best_s = best_s.min(enclosed[(i + 1, j - 1)] - 1);
                }
                for k in (i + 1)..j {
                    if rules.admits(seq[i], seq[k]) {
                        let split = enclosed[(i + 1, k - 1)] + exterior[(k + 1, j)];
                        best_e = best_e.min(split);
                        best_s = best_s.min(split);
                    }
                }
                exterior[(i, j)] = best_e;
                enclosed[(i, j)] = best_s;
            }
        }

        if n > 1 {
            debug!("stacking fill: n={} optimum={}", n, exterior[(0, n - 1)]);
        }
        StackingFold { seq: seq.clone(), rules, exterior, enclosed }
    }

    fn admits(&self, i: usize, j: usize) -> bool {
        self.rules.admits(self.seq[i], self.seq[j])
    }

    fn score(&self, ctx: Context, i: usize, j: usize) -> i32 {
        match ctx {
            Context::Exterior => self.exterior[(i, j)],
            Context::Enclosed => self.enclosed[(i, j)],
        }
    }

    /// Minimum energy over the full sequence.
    pub fn optimum(&self) -> i32 {
        let n = self.seq.len();
        if n < 2 { 0 } else { self.exterior[(0, n - 1)] }
    }

    /// Total energy a structure scores in this fold's model: -1 for every
    /// admitted pair directly enclosed by another pair of the structure.
    pub fn structure_energy(&self, pt: &PairTable) -> i32 {
        pt.pairs()
            .iter()
            .map(|&(i, j)| {
                let stacked = i > 0 && pt[i - 1] == Some(j + 1);
                if stacked && self.admits(i, j) { -1 } else { 0 }
            })
            .sum()
    }

    /// One optimal structure, derived deterministically: per interval the
    /// first matching case in the order unpaired, own pair, split wins.
    pub fn backtrack_optimal(&self) -> PairTable {
        let n = self.seq.len();
        let mut pairs = Vec::new();
        let mut work = Vec::new();
        if n > 1 {
            work.push((0, n - 1, Context::Exterior));
        }

        'work: while let Some((i, j, ctx)) = work.pop() {
            if j <= i {
                continue;
            }
            let here = self.score(ctx, i, j);
            if here == self.exterior[(i + 1, j)] {
                work.push((i + 1, j, Context::Exterior));
                continue;
            }
            let own = match ctx {
                Context::Exterior => self.enclosed[(i + 1, j - 1)],
                Context::Enclosed => self.enclosed[(i + 1, j - 1)] - 1,
            };
            if self.admits(i, j) && here == own {
                pairs.push((i, j));
                work.push((i + 1, j - 1, Context::Enclosed));
                continue;
            }
            for k in (i + 1)..j {
                if self.admits(i, k)
                    && here == self.enclosed[(i + 1, k - 1)] + self.exterior[(k + 1, j)]
                {
                    pairs.push((i, k));
                    work.push((i + 1, k - 1, Context::Enclosed));
                    work.push((k + 1, j, Context::Exterior));
                    continue 'work;
                }
            }
            unreachable!("table cell matches none of its candidates");
        }

        PairTable::from_pairs(n, &pairs)
    }

    /// Every distinct structure within `delta` of the optimum, sorted.
    ///
    /// Obligations are (interval, context) pairs on an explicit work list;
    /// a state forks into every case whose local excess fits its remaining
    /// slack. `backtrack_within(0).len() == 1` is the unique-optimum signal
    /// design searches rely on.
    pub fn backtrack_within(&self, delta: i32) -> Vec<PairTable> {
        let n = self.seq.len();
        if n < 2 {
            return vec![PairTable::from_pairs(n, &[])];
        }

        let mut found: AHashSet<Vec<(usize, usize)>> = AHashSet::default();
        let mut states = vec![(vec![(0, n - 1, Context::Exterior)], Vec::new(), delta)];

        while let Some((mut sigma, pairs, slack)) = states.pop() {
            let Some((i, j, ctx)) = sigma.pop() else {
                let mut done = pairs;
                done.sort_unstable();
                found.insert(done);
                continue;
            };
            if j <= i {
                states.push((sigma, pairs, slack));
                continue;
            }

            let here = self.score(ctx, i, j);

            if self.admits(i, j) {
                let own = match ctx {
                    Context::Exterior => self.enclosed[(i + 1, j - 1)],
                    Context::Enclosed => self.enclosed[(i + 1, j - 1)] - 1,
                };
                let excess = own - here;
                if slack - excess >= 0 {
                    let mut sub = sigma.clone();
                    sub.push((i + 1, j - 1, Context::Enclosed));
                    let mut chosen = pairs.clone();
                    chosen.push((i, j));
                    states.push((sub, chosen, slack - excess));
                }
            }

            let excess = self.exterior[(i + 1, j)] - here;
            if slack - excess >= 0 {
                let mut sub = sigma.clone();
                sub.push((i + 1, j, Context::Exterior));
                states.push((sub, pairs.clone(), slack - excess));
            }

            for k in (i + 1)..j {
                if self.admits(i, k) {
                    let excess =
                        self.enclosed[(i + 1, k - 1)] + self.exterior[(k + 1, j)] - here;
                    if slack - excess >= 0 {
                        let mut sub = sigma.clone();
                        sub.push((k + 1, j, Context::Exterior));
                        sub.push((i + 1, k - 1, Context::Enclosed));
                        let mut chosen = pairs.clone();
                        chosen.push((i, k));
                        states.push((sub, chosen, slack - excess));
                    }
                }
            }
        }

        let mut results: Vec<Vec<(usize, usize)>> = found.into_iter().collect();
        results.sort_unstable();
        results
            .into_iter()
            .map(|pairs| PairTable::from_pairs(n, &pairs))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use sf_structure::DotBracketVec;

    fn fold(seq: &str) -> StackingFold {
        let seq = NucleotideVec::try_from(seq).unwrap();
        StackingFold::new(&seq, PairingRules::Nussinov)
    }

    fn strings(pts: &[PairTable]) -> Vec<String> {
        pts.iter().map(|pt| DotBracketVec::from(pt).to_string()).collect()
    }

    #[test]
    fn test_fixture_optimum() {
        assert_eq!(fold("AAAUUUUUUAAGCAAUUU").optimum(), -6);
    }

    #[test]
    fn test_small_optima() {
        for (seq, opt) in [("GCGC", -1), ("AUAU", -1), ("GGGAAACCC", -2), ("ACGU", -1)] {
            assert_eq!(fold(seq).optimum(), opt, "{}", seq);
        }
    }

    #[test]
    fn test_fixture_delta_zero_set() {
        // the two co-optimal structures of the pinned design sequence
        let within = fold("AAAUUUUUUAAGCAAUUU").backtrack_within(0);
        assert_eq!(
            strings(&within),
            vec!["((((((((.))).)))))", "(((((.((())).)))))"]
        );
    }

    #[test]
    fn test_fixture_optimal_structure() {
        let pt = fold("AAAUUUUUUAAGCAAUUU").backtrack_optimal();
        assert_eq!(DotBracketVec::from(&pt).to_string(), "(((((.((())).)))))");
    }

    #[test]
    fn test_optimal_backtrack_attains_the_optimum() {
        for seq in ["AAAUUUUUUAAGCAAUUU", "GCGC", "GGGAAACCC", "GAGCUCCCCGGGGUGCAC", "A", ""] {
            let f = fold(seq);
            let pt = f.backtrack_optimal();
            assert_eq!(f.structure_energy(&pt), f.optimum(), "{}", seq);
        }
    }

    #[test]
    fn test_delta_zero_contains_the_optimum() {
        for seq in ["AAAUUUUUUAAGCAAUUU", "GGGAAACCC", "GCAUGCAUGC"] {
            let f = fold(seq);
            let within = f.backtrack_within(0);
            assert!(within.contains(&f.backtrack_optimal()), "{}", seq);
            for pt in &within {
                assert_eq!(f.structure_energy(pt), f.optimum(), "{}", seq);
            }
        }
    }

    #[test]
    fn test_delta_monotonicity() {
        let f = fold("GCAUGCAUGC");
        let mut last = 0;
        for delta in 0..3 {
            let n = f.backtrack_within(delta).len();
            assert!(n >= last, "delta={}", delta);
            last = n;
        }
    }

    #[test]
    fn test_isolated_pairs_score_nothing() {
        // the only admitted pair is isolated, so the open chain co-opts
        let f = fold("GAAAC");
        assert_eq!(f.optimum(), 0);
        let within = f.backtrack_within(0);
        assert!(strings(&within).contains(&".....".to_string()));
    }

    #[test]
    fn test_empty_and_single_residue() {
        for seq in ["", "U"] {
            let f = fold(seq);
            assert_eq!(f.optimum(), 0);
            assert_eq!(f.backtrack_within(0).len(), 1);
        }
    }

    #[test]
    fn test_wobble_helices_under_watson_rules() {
        let seq = NucleotideVec::try_from("GGGGUUUU").unwrap();
        let nussinov = StackingFold::new(&seq, PairingRules::Nussinov);
        let watson = StackingFold::new(&seq, PairingRules::Watson);
        assert!(nussinov.optimum() < 0);
        assert_eq!(watson.optimum(), 0);
    }
}
