use rand::Rng;
use rand::prelude::IndexedRandom;

use sf_folding::{Base, NucleotideVec};
use sf_structure::{Interval, StructureTree};

use crate::color::PairColor;

/// A random sequence compatible with the tree: every pair gets a uniform
/// random color, unpaired positions are A (or uniform random bases when
/// `leaves_to_a` is off).
pub fn random_compatible_sequence<R: Rng + ?Sized>(
    tree: &StructureTree,
    rng: &mut R,
    leaves_to_a: bool,
) -> NucleotideVec {
    let mut bases = vec![Base::A; tree.len()];
    for id in 0..tree.node_count() {
        match tree.interval(id) {
            Interval::Root => {}
            Interval::Leaf(i) => {
                if !leaves_to_a {
                    bases[i] = *[Base::A, Base::C, Base::G, Base::U].choose(rng).unwrap();
                }
            }
            Interval::Pair(i, j) => {
                let color = *PairColor::ALL.choose(rng).unwrap();
                bases[i] = color.five_prime();
                bases[j] = color.three_prime();
            }
        }
    }
    NucleotideVec(bases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sf_structure::PairTable;

    #[test]
    fn test_compatible_sequences_pair_up() {
        let pt = PairTable::try_from("((((((....))))))").unwrap();
        let tree = StructureTree::from(&pt);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let seq = random_compatible_sequence(&tree, &mut rng, true);
            assert_eq!(seq.len(), 16);
            for (i, j) in pt.pairs() {
                assert!(PairColor::from_bases(seq[i], seq[j]).is_some());
            }
            for i in 6..=9 {
                assert_eq!(seq[i], Base::A);
            }
        }
    }

    #[test]
    fn test_free_leaves_eventually_vary() {
        let pt = PairTable::try_from("(....)").unwrap();
        let tree = StructureTree::from(&pt);
        let mut rng = StdRng::seed_from_u64(12);
        let mut saw_non_a = false;
        for _ in 0..50 {
            let seq = random_compatible_sequence(&tree, &mut rng, false);
            saw_non_a |= seq[1..5].iter().any(|&b| b != Base::A);
        }
        assert!(saw_non_a);
    }
}
