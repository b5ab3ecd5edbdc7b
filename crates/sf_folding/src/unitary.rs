//! Interval dynamic programming in the unitary energy model: every admitted
//! base pair contributes -1, independent of its neighbors.

use ahash::AHashSet;
use log::debug;
use ndarray::Array2;

use sf_structure::PairTable;

use crate::nucleotides::NucleotideVec;
use crate::pairing::{EnergyModel, PairingRules};

/// Minimum-energy folding of one sequence under the unitary model.
///
/// The score table and the optimum-count table are filled at construction
/// and owned by this value; nothing is shared between folds.
#[derive(Debug)]
pub struct UnitaryFold {
    seq: NucleotideVec,
    model: EnergyModel,
    rules: PairingRules,
    table: Array2<i32>,
    counts: Array2<f64>,
}

impl UnitaryFold {
    pub fn new(seq: &NucleotideVec, model: EnergyModel, rules: PairingRules) -> Self {
        let n = seq.len();
        let mut table = Array2::<i32>::zeros((n, n));
        // Empty and single-position intervals hold exactly one structure.
        let mut counts = Array2::from_elem((n, n), 1.0);
        let energy = |i: usize, j: usize| model.pair_energy(rules, seq[i], seq[j]);

        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let unpaired = table[(i + 1, j)];
                let embrace = table[(i + 1, j - 1)] + energy(i, j);
                let mut best = unpaired.min(embrace);
                for k in (i + 1)..j {
                    best = best.min(table[(i + 1, k - 1)] + table[(k + 1, j)] + energy(i, k));
                }
                table[(i, j)] = best;

                let mut c = 0.0;
                if best == unpaired {
                    c += counts[(i + 1, j)];
                }
                if best == embrace {
                    c += counts[(i + 1, j - 1)];
                }
                for k in (i + 1)..j {
                    if best == table[(i + 1, k - 1)] + table[(k + 1, j)] + energy(i, k) {
                        c += counts[(i + 1, k - 1)] + counts[(k + 1, j)];
                    }
                }
                counts[(i, j)] = c;
            }
        }

        if n > 1 {
            debug!("unitary fill: n={} optimum={} count={}", n, table[(0, n - 1)], counts[(0, n - 1)]);
        }
        UnitaryFold { seq: seq.clone(), model, rules, table, counts }
    }

    fn energy(&self, i: usize, j: usize) -> i32 {
        self.model.pair_energy(self.rules, self.seq[i], self.seq[j])
    }

    fn admits(&self, i: usize, j: usize) -> bool {
        self.rules.admits(self.seq[i], self.seq[j])
    }

    /// Minimum energy over the full sequence.
    pub fn optimum(&self) -> i32 {
        let n = self.seq.len();
        if n < 2 { 0 } else { self.table[(0, n - 1)] }
    }

    /// Number of structures attaining the optimum, as accumulated alongside
    /// the fill. The split case adds the counts of both halves, so this is
    /// an upper bound on the distinct optima; callers only rely on the
    /// value 1 signalling uniqueness.
    pub fn optima_count(&self) -> f64 {
        let n = self.seq.len();
        if n < 2 { 1.0 } else { self.counts[(0, n - 1)] }
    }

    /// Total energy a structure scores in this fold's model: -1 per
    /// admitted pair.
    pub fn structure_energy(&self, pt: &PairTable) -> i32 {
        pt.pairs()
            .iter()
            .map(|&(i, j)| self.energy(i, j))
            .sum()
    }

    /// One optimal structure, derived deterministically: at every interval
    /// the first matching case in the order unpaired, own pair, split wins.
    pub fn backtrack_optimal(&self) -> PairTable {
        let n = self.seq.len();
        let mut pairs = Vec::new();
        let mut work = Vec::new();
        if n > 1 {
            work.push((0, n - 1));
        }

        'work: while let Some((i, j)) = work.pop() {
            if j <= i {
                continue;
            }
            let here = self.table[(i, j)];
            if here == self.table[(i + 1, j)] {
                work.push((i + 1, j));
                continue;
            }
            if here == self.table[(i + 1, j - 1)] + self.energy(i, j) {
                if self.admits(i, j) {
                    pairs.push((i, j));
                }
                work.push((i + 1, j - 1));
                continue;
            }
            for k in (i + 1)..j {
                if here == self.table[(i + 1, k - 1)] + self.table[(k + 1, j)] + self.energy(i, k) {
                    if self.admits(i, k) {
                        pairs.push((i, k));
                    }
                    work.push((i + 1, k - 1));
                    work.push((k + 1, j));
                    continue 'work;
                }
            }
            unreachable!("table cell matches none of its candidates");
        }

        PairTable::from_pairs(n, &pairs)
    }

    /// Every distinct structure within `delta` of the optimum, sorted.
    ///
    /// States carry their pending intervals and the remaining slack on an
    /// explicit work list, so long sequences cannot overflow the stack.
    pub fn backtrack_within(&self, delta: i32) -> Vec<PairTable> {
        let n = self.seq.len();
        if n < 2 {
            return vec![PairTable::from_pairs(n, &[])];
        }

        let mut found: AHashSet<Vec<(usize, usize)>> = AHashSet::default();
        let mut states = vec![(vec![(0, n - 1)], Vec::new(), delta)];

        while let Some((mut sigma, pairs, slack)) = states.pop() {
            let Some((i, j)) = sigma.pop() else {
                let mut done = pairs;
                done.sort_unstable();
                found.insert(done);
                continue;
            };
            if j <= i {
                states.push((sigma, pairs, slack));
                continue;
            }

            let here = self.table[(i, j)];

            let excess = self.table[(i + 1, j)] - here;
            if slack - excess >= 0 {
                let mut sub = sigma.clone();
                sub.push((i + 1, j));
                states.push((sub, pairs.clone(), slack - excess));
            }

            let excess = self.table[(i + 1, j - 1)] + self.energy(i, j) - here;
            if slack - excess >= 0 && self.admits(i, j) {
                let mut sub = sigma.clone();
                sub.push((i + 1, j - 1));
                let mut chosen = pairs.clone();
                chosen.push((i, j));
                states.push((sub, chosen, slack - excess));
            }

            for k in (i + 1)..j {
                let excess =
                    self.table[(i + 1, k - 1)] + self.table[(k + 1, j)] + self.energy(i, k) - here;
                if slack - excess >= 0 && self.admits(i, k) {
                    let mut sub = sigma.clone();
                    sub.push((k + 1, j));
                    sub.push((i + 1, k - 1));
                    let mut chosen = pairs.clone();
                    chosen.push((i, k));
                    states.push((sub, chosen, slack - excess));
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
