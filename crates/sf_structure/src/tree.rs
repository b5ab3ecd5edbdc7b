use crate::pair_table::PairTable;

pub type NodeId = usize;

/// The positions a tree node covers: the whole strand for the synthetic
/// root, an enclosing base pair for an interior node, a single unpaired
/// position for a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Root,
    Pair(usize, usize),
    Leaf(usize),
}

#[derive(Debug, Clone)]
struct TreeNode {
    interval: Interval,
    children: Vec<NodeId>,
}

/// A secondary structure as a rooted ordered tree.
///
/// Nodes live in an arena; node 0 is the synthetic root. The children of a
/// node cover its open interval contiguously, left to right.
#[derive(Debug, Clone)]
pub struct StructureTree {
    nodes: Vec<TreeNode>,
    length: usize,
}

impl From<&PairTable> for StructureTree {
    fn from(pt: &PairTable) -> Self {
        let mut nodes = vec![TreeNode { interval: Interval::Root, children: Vec::new() }];

        // Scans intervals with an explicit stack; nested pairs only defer
        // their inner interval, so children stay in left-to-right order.
        let mut stack: Vec<(NodeId, usize, usize)> = Vec::new();
        if pt.len() > 0 {
            stack.push((0, 0, pt.len() - 1));
        }
        while let Some((parent, lo, hi)) = stack.pop() {
            let mut i = lo;
            while i <= hi {
                let id = nodes.len();
                match pt[i] {
                    None => {
                        nodes.push(TreeNode { interval: Interval::Leaf(i), children: Vec::new() });
                        nodes[parent].children.push(id);
                        i += 1;
                    }
                    Some(j) => {
                        nodes.push(TreeNode { interval: Interval::Pair(i, j), children: Vec::new() });
                        nodes[parent].children.push(id);
                        if i + 1 <= j - 1 {
                            stack.push((parent, j + 1, hi));
                            stack.push((id, i + 1, j - 1));
                            // inner interval first keeps sibling order; the
                            // deferred tail re-enters with the same parent
                            i = hi + 1;
                            continue;
                        }
                        i = j + 1;
                    }
                }
            }
        }

        StructureTree { nodes, length: pt.len() }
    }
}

impl From<&StructureTree> for PairTable {
    fn from(tree: &StructureTree) -> Self {
        let pairs: Vec<(usize, usize)> = tree
            .nodes
            .iter()
            .filter_map(|node| match node.interval {
                Interval::Pair(i, j) => Some((i, j)),
                _ => None,
            })
            .collect();
        PairTable::from_pairs(tree.length, &pairs)
    }
}

impl StructureTree {
    pub fn root(&self) -> NodeId {
        0
    }

    /// Number of strand positions the tree covers.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn interval(&self, id: NodeId) -> Interval {
        self.nodes[id].interval
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].interval, Interval::Leaf(_))
    }

    /// Structural filter for design experiments: an interior node may host
    /// at most 3 paired children (root: 4), and at most 1 paired child when
    /// unpaired children are present (root: 2).
    pub fn has_bounded_branching(&self) -> bool {
        self.nodes.iter().all(|node| {
            let (max_paired, max_paired_with_leaves) = match node.interval {
                Interval::Root => (4, 2),
                _ => (3, 1),
            };
            let paired = node
                .children
                .iter()
                .filter(|&&c| !self.is_leaf(c))
                .count();
            let leaves = node.children.len() - paired;
            paired <= max_paired && (leaves == 0 || paired <= max_paired_with_leaves)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use crate::dotbracket::DotBracketVec;

    fn tree(s: &str) -> StructureTree {
        StructureTree::from(&PairTable::try_from(s).unwrap())
    }

    #[test]
    fn test_tree_shape_simple_hairpin() {
        let t = tree("((...))");
        let root_children = t.children(t.root());
        assert_eq!(root_children.len(), 1);
        let outer = root_children[0];
        assert_eq!(t.interval(outer), Interval::Pair(0, 6));
        let inner = t.children(outer);
        assert_eq!(inner.len(), 1);
        assert_eq!(t.interval(inner[0]), Interval::Pair(1, 5));
        let leaves = t.children(inner[0]);
        assert_eq!(leaves.len(), 3);
        assert_eq!(t.interval(leaves[0]), Interval::Leaf(2));
        assert!(t.is_leaf(leaves[2]));
    }

    #[test]
    fn test_tree_sibling_order() {
        let t = tree(".(..)(...).");
        let kinds: Vec<Interval> = t
            .children(t.root())
            .iter()
            .map(|&c| t.interval(c))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Interval::Leaf(0),
                Interval::Pair(1, 4),
                Interval::Pair(5, 9),
                Interval::Leaf(10),
            ]
        );
    }

    #[test]
    fn test_tree_round_trip() {
        for s in ["", "....", "((((((....))))))", "(..)(..)(..)", "(.(...).)"] {
            let t = tree(s);
            assert_eq!(DotBracketVec::from(&PairTable::from(&t)).to_string(), s);
        }
    }

    #[test]
    fn test_empty_tree_is_root_only() {
        let t = tree("");
        assert_eq!(t.node_count(), 1);
        assert!(t.children(t.root()).is_empty());
    }

    #[test]
    fn test_branching_filter_accepts() {
        for s in ["(..)(..)(..)(..)", ".(..)(..)", ".(..)", "((..)(..)(..))", "(.(..))"] {
            assert!(tree(s).has_bounded_branching(), "{} should pass", s);
        }
    }

    #[test]
    fn test_branching_filter_rejects() {
        for s in [
            "(..)(..)(..)(..)(..)",
            ".(..)(..)(..)",
            "((..)(..)(..)(..))",
            "(.(..)(..))",
        ] {
            assert!(!tree(s).has_bounded_branching(), "{} should fail", s);
        }
    }
}
