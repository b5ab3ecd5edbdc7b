//! Joint colorings of one node's children.

use crate::color::{PairColor, ParentColor};

/// What kind of child sits at a sibling position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Leaf,
    Paired,
}

/// The color a child receives: leaves carry the fixed leaf marker, paired
/// children a concrete pair color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildColor {
    Leaf,
    Paired(PairColor),
}

impl ChildColor {
    pub fn is_grey(&self) -> bool {
        matches!(self, ChildColor::Paired(c) if c.is_grey())
    }

    pub fn level_shift(&self) -> i64 {
        match self {
            ChildColor::Leaf => 0,
            ChildColor::Paired(c) => c.level_shift(),
        }
    }
}

/// Every admissible joint coloring of a sibling list, in deterministic
/// order (palette order outermost).
///
/// The rules are kept literally as the reference design engine states them,
/// including its documented corner cases:
/// - a paired child's color comes from the parent's palette;
/// - no two paired children share a color;
/// - a leaf never coexists with a grey-colored sibling;
/// - a leaf under a grey parent admits no assignment at all.
pub fn enumerate_child_colorings(
    kinds: &[ChildKind],
    parent: ParentColor,
) -> Vec<Vec<ChildColor>> {
    let Some(kind) = kinds.first() else {
        return vec![Vec::new()];
    };
    let tails = enumerate_child_colorings(&kinds[1..], parent);

    match kind {
        ChildKind::Leaf => {
            if parent.is_grey() {
                return Vec::new();
            }
            tails
                .into_iter()
                .filter(|tail| !tail.iter().any(ChildColor::is_grey))
                .map(|tail| {
                    let mut assignment = Vec::with_capacity(tail.len() + 1);
                    assignment.push(ChildColor::Leaf);
                    assignment.extend(tail);
                    assignment
                })
                .collect()
        }
        ChildKind::Paired => {
            let mut out = Vec::new();
            for &cv in parent.palette() {
                for tail in &tails {
                    if tail.contains(&ChildColor::Paired(cv)) {
                        continue;
                    }
                    if cv.is_grey() && tail.contains(&ChildColor::Leaf) {
                        continue;
                    }
                    let mut assignment = Vec::with_capacity(tail.len() + 1);
                    assignment.push(ChildColor::Paired(cv));
                    assignment.extend(tail.iter().copied());
                    out.push(assignment);
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ChildKind::{Leaf, Paired};

    fn count(kinds: &[ChildKind], parent: ParentColor) -> usize {
        enumerate_child_colorings(kinds, parent).len()
    }

    #[test]
    fn test_no_children_has_the_empty_assignment() {
        assert_eq!(enumerate_child_colorings(&[], ParentColor::Root), vec![Vec::new()]);
    }

    #[test]
    fn test_paired_children_take_distinct_palette_colors() {
        assert_eq!(count(&[Paired, Paired], ParentColor::Root), 12);
        assert_eq!(count(&[Paired, Paired, Paired], ParentColor::Root), 24);
        assert_eq!(count(&[Paired, Paired], ParentColor::Paired(PairColor::GC)), 6);
    }

    #[test]
    fn test_single_paired_child_under_grey_parent() {
        use PairColor::*;
        let got = enumerate_child_colorings(&[Paired], ParentColor::Paired(AU));
        assert_eq!(
            got,
            vec![
                vec![ChildColor::Paired(AU)],
                vec![ChildColor::Paired(GC)],
                vec![ChildColor::Paired(CG)],
            ]
        );
    }

    #[test]
    fn test_leaf_excludes_grey_siblings() {
        // root palette minus both greys leaves GC and CG for the pair
        use PairColor::*;
        let got = enumerate_child_colorings(&[Leaf, Paired], ParentColor::Root);
        assert_eq!(
            got,
            vec![
                vec![ChildColor::Leaf, ChildColor::Paired(GC)],
                vec![ChildColor::Leaf, ChildColor::Paired(CG)],
            ]
        );
        assert_eq!(count(&[Paired, Leaf, Paired], ParentColor::Root), 2);
    }

    #[test]
    fn test_leaf_beside_pair_under_gc_parent() {
        use PairColor::*;
        let got = enumerate_child_colorings(&[Leaf, Paired], ParentColor::Paired(GC));
        assert_eq!(got, vec![vec![ChildColor::Leaf, ChildColor::Paired(GC)]]);
    }

    // Documented rule carried over from the reference engine, not derived
    // from the separability definition: a grey parent rejects leaf children
    // outright.
    #[test]
    fn test_leaf_under_grey_parent_admits_nothing() {
        assert_eq!(count(&[Leaf], ParentColor::Paired(PairColor::AU)), 0);
        assert_eq!(count(&[Leaf, Paired], ParentColor::Paired(PairColor::UA)), 0);
    }
}
