//! Independent re-checks of properness and separability on a finished
//! sequence. The design engine guarantees these by construction; the
//! predicates here rederive them from the raw sequence and tree.

use sf_folding::{Base, NucleotideVec};
use sf_structure::{Interval, PairTable, StructureTree};

use crate::color::{PairColor, ParentColor};
use crate::error::DesignError;

fn node_color(tree: &StructureTree, seq: &NucleotideVec, id: usize) -> Option<PairColor> {
    match tree.interval(id) {
        Interval::Pair(i, j) => PairColor::from_bases(seq[i], seq[j]),
        _ => None,
    }
}

/// A sequence colors the tree properly when every leaf is A, every pair
/// reads as one of the four colors, and each node's paired children carry
/// pairwise distinct colors from the parent's palette.
pub fn is_proper(tree: &StructureTree, seq: &NucleotideVec) -> bool {
    for id in 0..tree.node_count() {
        let parent = match tree.interval(id) {
            Interval::Leaf(i) => {
                if seq[i] != Base::A {
                    return false;
                }
                continue;
            }
            Interval::Root => ParentColor::Root,
            Interval::Pair(..) => match node_color(tree, seq, id) {
                Some(c) => ParentColor::Paired(c),
                None => return false,
            },
        };

        let palette = parent.palette();
        let mut used: Vec<PairColor> = Vec::new();
        for &child in tree.children(id) {
            if tree.is_leaf(child) {
                continue;
            }
            let Some(color) = node_color(tree, seq, child) else {
                return false;
            };
            if used.contains(&color) || !palette.contains(&color) {
                return false;
            }
            used.push(color);
        }
    }
    true
}

/// Exact grey and leaf levels of a colored tree, accumulated along root
/// paths. `None` when some leaf is not A or some pair is not a color.
fn level_profile(tree: &StructureTree, seq: &NucleotideVec) -> Option<(Vec<i64>, Vec<i64>)> {
    let mut grey = Vec::new();
    let mut leaves = Vec::new();
    let mut stack = vec![(tree.root(), 0i64)];

    while let Some((id, level)) = stack.pop() {
        let mut next = level;
        match tree.interval(id) {
            Interval::Leaf(i) => {
                if seq[i] != Base::A {
                    return None;
                }
                leaves.push(level);
                continue;
            }
            Interval::Root => {}
            Interval::Pair(..) => match node_color(tree, seq, id)? {
                c if c.is_grey() => grey.push(level),
                c => next = level + c.level_shift(),
            },
        }
        for &child in tree.children(id) {
            stack.push((child, next));
        }
    }
    Some((grey, leaves))
}

/// Separable: all leaves are A, and no grey pair shares its exact level
/// with any leaf.
pub fn is_separable(tree: &StructureTree, seq: &NucleotideVec) -> bool {
    match level_profile(tree, seq) {
        Some((grey, leaves)) => leaves.iter().all(|l| !grey.contains(l)),
        None => false,
    }
}

/// Smallest modulus in `2..=limit` under which the grey and leaf level
/// sets are disjoint, if any.
pub fn first_separable_modulus(
    tree: &StructureTree,
    seq: &NucleotideVec,
    limit: usize,
) -> Option<usize> {
    let (grey, leaves) = level_profile(tree, seq)?;
    (2..=limit).find(|&m| {
        let m = m as i64;
        leaves
            .iter()
            .all(|l| !grey.iter().any(|g| l.rem_euclid(m) == g.rem_euclid(m)))
    })
}

/// The full experiment criterion: the structure passes the branching
/// filter and the sequence colors it properly and separably.
pub fn is_fully_separable(seq: &NucleotideVec, pt: &PairTable) -> Result<bool, DesignError> {
    if seq.len() != pt.len() {
        return Err(DesignError::LengthMismatch { sequence: seq.len(), structure: pt.len() });
    }
    let tree = StructureTree::from(pt);
    Ok(tree.has_bounded_branching() && is_proper(&tree, seq) && is_separable(&tree, seq))
}
