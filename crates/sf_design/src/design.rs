//! Counting and uniform sampling of separable colorings.
//!
//! A coloring assigns a [`PairColor`] to every base pair of a target tree;
//! leaves always carry the residue A. A coloring is admissible when every
//! node's children satisfy the compatibility rules and every leaf's
//! accumulated level (mod `modulus`) lies in the target level set, while no
//! grey pair's level does.

use ahash::AHashMap;
use log::debug;
use rand::Rng;

use sf_folding::{Base, NucleotideVec};
use sf_structure::{Interval, NodeId, StructureTree};

use crate::assignments::{enumerate_child_colorings, ChildColor, ChildKind};
use crate::color::{PairColor, ParentColor};

/// The color a node itself carries in one coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeColor {
    Root,
    Leaf,
    Paired(PairColor),
}

impl NodeColor {
    fn as_parent(&self) -> ParentColor {
        match self {
            NodeColor::Root => ParentColor::Root,
            NodeColor::Paired(c) => ParentColor::Paired(*c),
            NodeColor::Leaf => unreachable!("leaves have no children"),
        }
    }

    fn is_grey(&self) -> bool {
        matches!(self, NodeColor::Paired(c) if c.is_grey())
    }

    fn level_shift(&self) -> i64 {
        match self {
            NodeColor::Paired(c) => c.level_shift(),
            NodeColor::Root | NodeColor::Leaf => 0,
        }
    }
}

impl From<ChildColor> for NodeColor {
    fn from(c: ChildColor) -> Self {
        match c {
            ChildColor::Leaf => NodeColor::Leaf,
            ChildColor::Paired(p) => NodeColor::Paired(p),
        }
    }
}

/// A design found by [`first_modulo_separable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparableDesign {
    pub sequence: NucleotideVec,
    pub modulus: usize,
    pub target_levels: Vec<usize>,
}

/// The design space of one tree under one (modulus, target levels, weight)
/// choice. Owns its count cache; a new computation gets a new instance.
#[derive(Debug)]
pub struct DesignSpace<'t> {
    tree: &'t StructureTree,
    modulus: usize,
    targets: Vec<bool>,
    gc_weight: Option<f64>,
    counts: AHashMap<(NodeId, NodeColor, usize), f64>,
}

impl<'t> DesignSpace<'t> {
    /// `modulus >= 2`; `target_levels` are residues mod `modulus`.
    pub fn new(
        tree: &'t StructureTree,
        modulus: usize,
        target_levels: &[usize],
        gc_weight: Option<f64>,
    ) -> Self {
        assert!(modulus >= 2, "separability needs a modulus of at least 2");
        let mut targets = vec![false; modulus];
        for &level in target_levels {
            targets[level % modulus] = true;
        }
        DesignSpace { tree, modulus, targets, gc_weight, counts: AHashMap::default() }
    }

    /// Number of admissible colorings (a weighted mass when a GC preference
    /// weight is set).
    pub fn count(&mut self) -> f64 {
        self.fill();
        self.counts[&(self.tree.root(), NodeColor::Root, 0)]
    }

    fn child_kinds(&self, id: NodeId) -> Vec<ChildKind> {
        self.tree
            .children(id)
            .iter()
            .map(|&c| if self.tree.is_leaf(c) { ChildKind::Leaf } else { ChildKind::Paired })
            .collect()
    }

    fn gc_factor(&self, color: NodeColor) -> f64 {
        match (self.gc_weight, color) {
            (Some(w), NodeColor::Paired(PairColor::GC | PairColor::CG)) => w.exp(),
            _ => 1.0,
        }
    }

    fn assignment_weight(
        &self,
        id: NodeId,
        color: NodeColor,
        next_level: usize,
        assignment: &[ChildColor],
    ) -> f64 {
        let mut weight = self.gc_factor(color);
        for (&child, &assigned) in self.tree.children(id).iter().zip(assignment) {
            weight *= self.counts[&(child, NodeColor::from(assigned), next_level)];
        }
        weight
    }

    fn next_level(&self, level: usize, color: NodeColor) -> usize {
        (level as i64 + color.level_shift()).rem_euclid(self.modulus as i64) as usize
    }

    /// Fills the cache bottom-up. Children always carry larger ids than
    /// their parent, so a reverse id sweep visits them first; no recursion,
    /// whatever the tree depth.
    fn fill(&mut self) {
        if !self.counts.is_empty() {
            return;
        }
        for id in (0..self.tree.node_count()).rev() {
            let colors: &[NodeColor] = match self.tree.interval(id) {
                Interval::Leaf(_) => &[NodeColor::Leaf],
                Interval::Root => &[NodeColor::Root],
                Interval::Pair(..) => &[
                    NodeColor::Paired(PairColor::AU),
                    NodeColor::Paired(PairColor::UA),
                    NodeColor::Paired(PairColor::GC),
                    NodeColor::Paired(PairColor::CG),
                ],
            };
            for &color in colors {
                let assignments = if self.tree.is_leaf(id) {
                    Vec::new()
                } else {
                    enumerate_child_colorings(&self.child_kinds(id), color.as_parent())
                };
                for level in 0..self.modulus {
                    let value = if self.tree.is_leaf(id) {
                        if self.targets[level] { 1.0 } else { 0.0 }
                    } else if color.is_grey() && self.targets[level] {
                        // a grey pair sharing a level with the leaves breaks
                        // separability outright
                        0.0
                    } else {
                        let next = self.next_level(level, color);
                        assignments
                            .iter()
                            .map(|a| self.assignment_weight(id, color, next, a))
                            .sum()
                    };
                    self.counts.insert((id, color, level), value);
                }
            }
        }
        debug!(
            "design space: {} nodes, modulus {}, mass {}",
            self.tree.node_count(),
            self.modulus,
            self.counts[&(self.tree.root(), NodeColor::Root, 0)]
        );
    }

    /// Draws one admissible coloring and returns its sequence, uniformly
    /// over the space when no weight is set.
    ///
    /// Sampling an empty space is a caller bug: check [`Self::count`] first.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> NucleotideVec {
        let total = self.count();
        assert!(total > 0.0, "sampling from an empty design space");

        let mut bases = vec![Base::A; self.tree.len()];
        let mut stack = vec![(self.tree.root(), NodeColor::Root, 0usize)];

        while let Some((id, color, level)) = stack.pop() {
            if let (NodeColor::Paired(c), Interval::Pair(i, j)) = (color, self.tree.interval(id)) {
                bases[i] = c.five_prime();
                bases[j] = c.three_prime();
            }
            if self.tree.is_leaf(id) || self.tree.children(id).is_empty() {
                continue;
            }

            let next = self.next_level(level, color);
            let assignments =
                enumerate_child_colorings(&self.child_kinds(id), color.as_parent());

            let mut r = rng.random::<f64>() * self.counts[&(id, color, level)];
            let mut chosen: Option<&Vec<ChildColor>> = None;
            for assignment in &assignments {
                let weight = self.assignment_weight(id, color, next, assignment);
                if weight > 0.0 {
                    chosen = Some(assignment);
                }
                r -= weight;
                if r < 0.0 {
                    break;
                }
            }
            let assignment = chosen.expect("positive count but no viable assignment");

            for (&child, &assigned) in self.tree.children(id).iter().zip(assignment) {
                stack.push((child, NodeColor::from(assigned), next));
            }
        }

        NucleotideVec(bases)
    }
}

/// Searches moduli 2..=`modulus_limit` and, per modulus, every nonempty
/// target level subset in binary-counting order; returns the first design
/// whose space is nonempty.
pub fn first_modulo_separable<R: Rng + ?Sized>(
    tree: &StructureTree,
    modulus_limit: usize,
    rng: &mut R,
) -> Option<SeparableDesign> {
    for modulus in 2..=modulus_limit {
        for mask in 1u64..(1u64 << modulus) {
            let target_levels: Vec<usize> =
                (0..modulus).filter(|&l| mask & (1u64 << l) != 0).collect();
            let mut space = DesignSpace::new(tree, modulus, &target_levels, None);
            if space.count() > 0.0 {
                let sequence = space.sample(rng);
                return Some(SeparableDesign { sequence, modulus, target_levels });
            }
        }
    }
    None
}
