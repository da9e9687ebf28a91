//! B+Tree implementation.

use super::iter::LeafIter;
use super::node::{InternalNode, LeafNode, Node, NodeId};
use crate::comparator::RangeOp;
use crate::error::TreeError;
use crate::stats::TreeStats;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

/// An in-memory B+Tree index.
///
/// Keys are kept in ascending order and duplicates are preserved, which
/// distinguishes this from a unique-key map. All leaves sit at the same
/// depth and form a doubly-linked chain in key order, so range searches
/// descend once and then walk sideways.
#[derive(Debug)]
pub struct BPTree<K, V> {
    /// Arena of all nodes.
    arena: Vec<Node<K, V>>,
    /// Root node ID. Reassigned when the root splits; never aliased.
    root: NodeId,
    /// Maximum number of children per internal node; leaves hold at most
    /// `branching_factor - 1` values. Fixed at construction.
    branching_factor: usize,
    /// Statistics for this tree.
    stats: TreeStats,
}

impl<K: Clone + Ord, V: Clone> BPTree<K, V> {
    /// Creates an empty tree with the given branching factor.
    ///
    /// Fails for factors of 2 and below: such a node could not hold a
    /// separator with two children.
    pub fn new(branching_factor: usize) -> Result<Self, TreeError> {
        if branching_factor <= 2 {
            return Err(TreeError::InvalidBranchingFactor(branching_factor));
        }

        let mut arena = Vec::new();
        let root = Self::alloc_node(&mut arena, Node::Leaf(LeafNode::new()));

        Ok(Self {
            arena,
            root,
            branching_factor,
            stats: TreeStats::new(),
        })
    }

    /// Returns the branching factor this tree was built with.
    pub fn branching_factor(&self) -> usize {
        self.branching_factor
    }

    /// Returns the statistics for this tree.
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.stats.total_entries()
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of levels from the root down to the leaves.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let Node::Internal(node) = &self.arena[current] {
            height += 1;
            current = node.children[0];
        }
        height
    }

    /// Returns the minimum key and its value.
    pub fn min(&self) -> Option<(&K, &V)> {
        let leaf = self.leaf(self.leftmost_leaf());
        let key = leaf.keys.first()?;
        Some((key, &leaf.values[0]))
    }

    /// Returns the maximum key and its value.
    pub fn max(&self) -> Option<(&K, &V)> {
        let leaf = self.leaf(self.rightmost_leaf());
        let key = leaf.keys.last()?;
        Some((key, leaf.values.last()?))
    }

    /// Iterates over all entries in ascending key order.
    pub fn iter(&self) -> LeafIter<'_, K, V> {
        LeafIter::new(&self.arena, self.leftmost_leaf(), false)
    }

    /// Iterates over all entries in descending key order.
    pub fn iter_rev(&self) -> LeafIter<'_, K, V> {
        LeafIter::new(&self.arena, self.rightmost_leaf(), true)
    }

    /// Inserts a key/value pair. Duplicate keys are always accepted.
    ///
    /// Splits bubble up as explicit (separator, sibling) signals; when the
    /// root itself reports one, a new root is built here with the old root
    /// and its sibling as the only two children.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some((separator, sibling)) = self.insert_into(self.root, key, value) {
            let old_root = self.root;
            self.root = Self::alloc_node(
                &mut self.arena,
                Node::Internal(InternalNode::new(vec![separator], vec![old_root, sibling])),
            );
        }
        self.stats.add_entries(1);
    }

    /// Searches for all values whose keys relate to `key` under the given
    /// comparator token (one of `">="`, `"=="`, `"<="`).
    ///
    /// Returns the matching values in ascending key order. An unrecognized
    /// token or an absent key deterministically yields an empty result;
    /// neither is an error.
    pub fn range_search(&self, key: Option<&K>, comparator: &str) -> Vec<V> {
        let op = match RangeOp::parse(comparator) {
            Some(op) => op,
            None => return Vec::new(),
        };
        let key = match key {
            Some(key) => key,
            None => return Vec::new(),
        };

        let anchor = self.find_leaf(key);
        match op {
            RangeOp::GreaterOrEqual => self.collect_ge(anchor, key),
            RangeOp::Equal => self.collect_eq(anchor, key),
            RangeOp::LessOrEqual => self.collect_le(anchor, key),
        }
    }

    /// Allocates a new node in the arena and returns its ID.
    fn alloc_node(arena: &mut Vec<Node<K, V>>, node: Node<K, V>) -> NodeId {
        let id = arena.len();
        arena.push(node);
        id
    }

    /// Recursive insert.
    ///
    /// Returns `None` when the subtree absorbed the entry, or the separator
    /// key and new right-sibling ID when the subtree root split. The
    /// separator is always the sibling's first leaf key.
    fn insert_into(&mut self, node_id: NodeId, key: K, value: V) -> Option<(K, NodeId)> {
        match &mut self.arena[node_id] {
            Node::Leaf(leaf) => {
                leaf.insert(key, value);
            }
            Node::Internal(node) => {
                let child = node.child_for(&key);
                if let Some((separator, sibling)) = self.insert_into(child, key, value) {
                    match &mut self.arena[node_id] {
                        Node::Internal(node) => node.insert_separator(separator, sibling),
                        Node::Leaf(_) => unreachable!("routing target cannot turn into a leaf"),
                    }
                }
            }
        }

        if self.node_overflows(node_id) {
            let sibling = self.split(node_id);
            let separator = self.first_leaf_key(sibling).clone();
            return Some((separator, sibling));
        }
        None
    }

    /// Returns true if the node exceeds its capacity threshold.
    fn node_overflows(&self, node_id: NodeId) -> bool {
        match &self.arena[node_id] {
            Node::Leaf(leaf) => leaf.is_overflow(self.branching_factor),
            Node::Internal(node) => node.is_overflow(self.branching_factor),
        }
    }

    /// Splits an overflowing node, returning the new right sibling's ID.
    fn split(&mut self, node_id: NodeId) -> NodeId {
        if self.arena[node_id].is_leaf() {
            self.split_leaf(node_id)
        } else {
            self.split_internal(node_id)
        }
    }

    /// Splits a leaf and threads the sibling into the leaf chain.
    ///
    /// On return no leaf points at a stale neighbor: the sibling sits
    /// between the old leaf and its former right neighbor.
    fn split_leaf(&mut self, leaf_id: NodeId) -> NodeId {
        let (sibling, old_next) = {
            let leaf = self.leaf_mut(leaf_id);
            let sibling = leaf.split();
            (sibling, leaf.next)
        };
        let sibling_id = Self::alloc_node(&mut self.arena, Node::Leaf(sibling));

        if let Some(next_id) = old_next {
            self.leaf_mut(next_id).prev = Some(sibling_id);
        }
        self.leaf_mut(leaf_id).next = Some(sibling_id);
        self.leaf_mut(sibling_id).prev = Some(leaf_id);

        self.stats.record_leaf_split();
        sibling_id
    }

    /// Splits an internal node.
    fn split_internal(&mut self, node_id: NodeId) -> NodeId {
        let sibling = match &mut self.arena[node_id] {
            Node::Internal(node) => node.split(),
            Node::Leaf(_) => unreachable!("leaf splits go through split_leaf"),
        };
        self.stats.record_internal_split();
        Self::alloc_node(&mut self.arena, Node::Internal(sibling))
    }

    /// Descends to the leaf the given key routes to (the anchor leaf).
    fn find_leaf(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match &self.arena[current] {
                Node::Leaf(_) => return current,
                Node::Internal(node) => current = node.child_for(key),
            }
        }
    }

    /// Leftmost key reachable under the given subtree.
    fn first_leaf_key(&self, node_id: NodeId) -> &K {
        let mut current = node_id;
        loop {
            match &self.arena[current] {
                Node::Leaf(leaf) => return &leaf.keys[0],
                Node::Internal(node) => current = node.children[0],
            }
        }
    }

    /// Returns the leftmost leaf of the tree.
    fn leftmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        while let Node::Internal(node) = &self.arena[current] {
            current = node.children[0];
        }
        current
    }

    /// Returns the rightmost leaf of the tree.
    fn rightmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        while let Node::Internal(node) = &self.arena[current] {
            current = node.children[node.children.len() - 1];
        }
        current
    }

    fn leaf(&self, node_id: NodeId) -> &LeafNode<K, V> {
        match &self.arena[node_id] {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!("leaf chain id points at an internal node"),
        }
    }

    fn leaf_mut(&mut self, node_id: NodeId) -> &mut LeafNode<K, V> {
        match &mut self.arena[node_id] {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => unreachable!("leaf chain id points at an internal node"),
        }
    }

    /// `>=` walk.
    ///
    /// Leftward of the anchor, qualifying keys sit at each leaf's tail;
    /// they are prepended right-to-left so the accumulator stays ascending,
    /// and the walk stops at the first key below the bound. Rightward the
    /// scan starts at the anchor itself: exact matches are prepended (they
    /// belong with the other duplicates at the front), strictly greater
    /// keys are appended in scan order.
    fn collect_ge(&self, anchor: NodeId, key: &K) -> Vec<V> {
        let mut result: Vec<V> = Vec::new();

        let mut current = self.leaf(anchor).prev;
        'left: while let Some(leaf_id) = current {
            let leaf = self.leaf(leaf_id);
            for i in (0..leaf.keys.len()).rev() {
                if leaf.keys[i] >= *key {
                    result.insert(0, leaf.values[i].clone());
                } else {
                    break 'left;
                }
            }
            current = leaf.prev;
        }

        let mut current = Some(anchor);
        while let Some(leaf_id) = current {
            let leaf = self.leaf(leaf_id);
            for i in 0..leaf.keys.len() {
                match leaf.keys[i].cmp(key) {
                    Ordering::Equal => result.insert(0, leaf.values[i].clone()),
                    Ordering::Greater => result.push(leaf.values[i].clone()),
                    Ordering::Less => {}
                }
            }
            current = leaf.next;
        }

        result
    }

    /// `==` walk.
    ///
    /// Duplicates are adjacent across the chain, so the matches form a
    /// contiguous run around the anchor position: scan outward from it and
    /// stop at the first non-equal key on each side.
    fn collect_eq(&self, anchor: NodeId, key: &K) -> Vec<V> {
        let mut result = Vec::new();
        let run_start = self.leaf(anchor).keys.partition_point(|k| k < key);

        let mut current = Some(anchor);
        let mut start = run_start;
        'right: while let Some(leaf_id) = current {
            let leaf = self.leaf(leaf_id);
            for i in start..leaf.keys.len() {
                if leaf.keys[i] == *key {
                    result.push(leaf.values[i].clone());
                } else {
                    break 'right;
                }
            }
            current = leaf.next;
            start = 0;
        }

        let mut current = Some(anchor);
        let mut first_bound = Some(run_start);
        'left: while let Some(leaf_id) = current {
            let leaf = self.leaf(leaf_id);
            let upto = first_bound.take().unwrap_or(leaf.keys.len());
            for i in (0..upto).rev() {
                if leaf.keys[i] == *key {
                    result.insert(0, leaf.values[i].clone());
                } else {
                    break 'left;
                }
            }
            current = leaf.prev;
        }

        result
    }

    /// `<=` walk.
    ///
    /// Accumulates in descending key order and reverses at the end.
    /// Everything strictly left of the anchor qualifies unconditionally
    /// (the anchor is the first leaf that could contain the key), so those
    /// leaves are taken whole, back-to-front. Rightward from the anchor,
    /// qualifying values are prepended and the first larger key ends the
    /// scan for that leaf.
    fn collect_le(&self, anchor: NodeId, key: &K) -> Vec<V> {
        let mut result: Vec<V> = Vec::new();

        let mut current = self.leaf(anchor).prev;
        while let Some(leaf_id) = current {
            let leaf = self.leaf(leaf_id);
            for value in leaf.values.iter().rev() {
                result.push(value.clone());
            }
            current = leaf.prev;
        }

        let mut current = Some(anchor);
        while let Some(leaf_id) = current {
            let leaf = self.leaf(leaf_id);
            for i in 0..leaf.keys.len() {
                if leaf.keys[i] <= *key {
                    result.insert(0, leaf.values[i].clone());
                } else {
                    break;
                }
            }
            current = leaf.next;
        }

        result.reverse();
        result
    }

    /// Breadth-first, level-by-level rendering of the tree structure.
    ///
    /// For inspection and tests only; the format is not a data contract.
    pub fn dump(&self) -> String
    where
        K: fmt::Debug,
    {
        self.to_string()
    }
}

/// Renders one line per level; sibling groups are wrapped in `{...}` and
/// each node shows its key list, e.g. `{[3, 5], [8]}`.
impl<K: fmt::Debug, V> fmt::Display for BPTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut level: Vec<Vec<NodeId>> = vec![vec![self.root]];
        while !level.is_empty() {
            let mut next_level: Vec<Vec<NodeId>> = Vec::new();
            for (group_index, group) in level.iter().enumerate() {
                write!(f, "{{")?;
                for (node_index, &node_id) in group.iter().enumerate() {
                    if node_index > 0 {
                        write!(f, ", ")?;
                    }
                    match &self.arena[node_id] {
                        Node::Internal(node) => {
                            next_level.push(node.children.clone());
                            write!(f, "{:?}", node.keys)?;
                        }
                        Node::Leaf(leaf) => write!(f, "{:?}", leaf.keys)?,
                    }
                }
                write!(f, "}}")?;
                if group_index + 1 < level.len() {
                    write!(f, ", ")?;
                } else {
                    writeln!(f)?;
                }
            }
            level = next_level;
        }
        Ok(())
    }
}

#[cfg(test)]
impl<K: Clone + Ord + fmt::Debug, V: Clone> BPTree<K, V> {
    /// Structural well-formedness check used by the tests: uniform leaf
    /// depth, arity and capacity bounds, sorted keys, separator bounds, and
    /// a complete, consistent leaf chain.
    fn assert_well_formed(&self) {
        let mut leaves: Vec<(NodeId, usize)> = Vec::new();
        self.check_node(self.root, 1, &mut leaves);

        let depth = leaves[0].1;
        for &(leaf_id, leaf_depth) in &leaves {
            assert_eq!(leaf_depth, depth, "leaf {leaf_id} at uneven depth");
        }

        // The chain must visit exactly the DFS leaf order, with consistent
        // back links.
        let mut chain: Vec<NodeId> = Vec::new();
        let mut prev: Option<NodeId> = None;
        let mut current = Some(self.leftmost_leaf());
        while let Some(leaf_id) = current {
            assert_eq!(self.leaf(leaf_id).prev, prev, "broken prev link at {leaf_id}");
            chain.push(leaf_id);
            prev = Some(leaf_id);
            current = self.leaf(leaf_id).next;
        }
        let dfs: Vec<NodeId> = leaves.iter().map(|&(id, _)| id).collect();
        assert_eq!(chain, dfs, "leaf chain does not cover the leaves in order");

        let keys: Vec<&K> = self.iter().map(|(key, _)| key).collect();
        assert!(
            keys.windows(2).all(|pair| pair[0] <= pair[1]),
            "leaf chain keys out of order"
        );
    }

    fn check_node(&self, node_id: NodeId, depth: usize, leaves: &mut Vec<(NodeId, usize)>) {
        match &self.arena[node_id] {
            Node::Leaf(leaf) => {
                assert_eq!(leaf.keys.len(), leaf.values.len());
                assert!(leaf.keys.len() <= self.branching_factor - 1, "leaf over capacity");
                assert!(leaf.keys.windows(2).all(|pair| pair[0] <= pair[1]));
                leaves.push((node_id, depth));
            }
            Node::Internal(node) => {
                assert_eq!(node.children.len(), node.keys.len() + 1);
                assert!(
                    node.children.len() <= self.branching_factor,
                    "internal node over capacity"
                );
                assert!(node.keys.windows(2).all(|pair| pair[0] <= pair[1]));
                for (i, key) in node.keys.iter().enumerate() {
                    assert!(
                        self.subtree_max(node.children[i]) <= key,
                        "left subtree exceeds separator"
                    );
                    assert!(
                        self.first_leaf_key(node.children[i + 1]) >= key,
                        "right subtree below separator"
                    );
                }
                for &child in &node.children {
                    self.check_node(child, depth + 1, leaves);
                }
            }
        }
    }

    fn subtree_max(&self, node_id: NodeId) -> &K {
        let mut current = node_id;
        loop {
            match &self.arena[current] {
                Node::Leaf(leaf) => return leaf.keys.last().expect("non-root leaf is never empty"),
                Node::Internal(node) => current = node.children[node.children.len() - 1],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(branching_factor: usize, keys: &[i32]) -> BPTree<i32, i32> {
        let mut tree = BPTree::new(branching_factor).unwrap();
        for &key in keys {
            tree.insert(key, key);
        }
        tree
    }

    #[test]
    fn test_new_rejects_small_branching_factor() {
        assert_eq!(
            BPTree::<i32, i32>::new(1).unwrap_err(),
            TreeError::InvalidBranchingFactor(1)
        );
        assert_eq!(
            BPTree::<i32, i32>::new(2).unwrap_err(),
            TreeError::InvalidBranchingFactor(2)
        );
        assert!(BPTree::<i32, i32>::new(3).is_ok());
    }

    #[test]
    fn test_empty_tree() {
        let tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert!(tree.min().is_none());
        assert!(tree.max().is_none());
        assert_eq!(tree.iter().count(), 0);
        assert!(tree.range_search(Some(&1), ">=").is_empty());
        assert!(tree.range_search(Some(&1), "==").is_empty());
        assert!(tree.range_search(Some(&1), "<=").is_empty());
    }

    #[test]
    fn test_invalid_comparator_yields_empty() {
        let tree = tree_of(3, &[1, 2, 3]);
        assert!(tree.range_search(Some(&2), "!=").is_empty());
        assert!(tree.range_search(Some(&2), ">").is_empty());
        assert!(tree.range_search(Some(&2), "").is_empty());
    }

    #[test]
    fn test_absent_key_yields_empty() {
        let tree = tree_of(3, &[1, 2, 3]);
        assert!(tree.range_search(None, ">=").is_empty());
        assert!(tree.range_search(None, "==").is_empty());
        assert!(tree.range_search(None, "<=").is_empty());
    }

    #[test]
    fn test_round_trip_scenario() {
        let tree = tree_of(3, &[5, 3, 8, 1, 4, 7, 9, 2, 6]);
        assert_eq!(tree.range_search(Some(&5), ">="), vec![5, 6, 7, 8, 9]);
        assert_eq!(tree.range_search(Some(&5), "<="), vec![1, 2, 3, 4, 5]);
        assert_eq!(tree.range_search(Some(&5), "=="), vec![5]);
        tree.assert_well_formed();
    }

    #[test]
    fn test_range_search_absent_search_key() {
        let tree = tree_of(4, &[2, 4, 6, 8]);
        assert_eq!(tree.range_search(Some(&5), ">="), vec![6, 8]);
        assert_eq!(tree.range_search(Some(&5), "<="), vec![2, 4]);
        assert!(tree.range_search(Some(&5), "==").is_empty());
    }

    #[test]
    fn test_range_search_beyond_extremes() {
        let tree = tree_of(3, &[10, 20, 30, 40, 50]);
        assert_eq!(tree.range_search(Some(&0), ">="), vec![10, 20, 30, 40, 50]);
        assert!(tree.range_search(Some(&0), "<=").is_empty());
        assert_eq!(tree.range_search(Some(&99), "<="), vec![10, 20, 30, 40, 50]);
        assert!(tree.range_search(Some(&99), ">=").is_empty());
    }

    #[test]
    fn test_range_search_at_extremes() {
        let tree = tree_of(3, &[10, 20, 30, 40, 50]);
        assert_eq!(tree.range_search(Some(&10), ">="), vec![10, 20, 30, 40, 50]);
        assert_eq!(tree.range_search(Some(&10), "<="), vec![10]);
        assert_eq!(tree.range_search(Some(&50), "<="), vec![10, 20, 30, 40, 50]);
        assert_eq!(tree.range_search(Some(&50), ">="), vec![50]);
    }

    #[test]
    fn test_duplicate_keys_eq_returns_all() {
        let mut tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
        tree.insert(2, 100);
        tree.insert(2, 200);
        tree.insert(2, 300);

        let mut result = tree.range_search(Some(&2), "==");
        result.sort();
        // Order among exact duplicates is unspecified; assert the set.
        assert_eq!(result, vec![100, 200, 300]);
        tree.assert_well_formed();
    }

    #[test]
    fn test_duplicate_keys_across_leaves() {
        // Forces the run of 2s to straddle a split so the anchor leaf
        // starts the run while its left sibling continues it.
        let mut tree: BPTree<i32, i32> = BPTree::new(4).unwrap();
        tree.insert(2, 100);
        tree.insert(2, 200);
        tree.insert(2, 300);
        tree.insert(9, 900);

        let mut result = tree.range_search(Some(&2), "==");
        result.sort();
        assert_eq!(result, vec![100, 200, 300]);
        tree.assert_well_formed();
    }

    #[test]
    fn test_duplicate_keys_in_ge_and_le() {
        let tree = tree_of(3, &[1, 2, 2, 3]);

        let ge = tree.range_search(Some(&2), ">=");
        assert_eq!(ge.len(), 3);
        assert_eq!(ge[2], 3, "strictly greater keys come last");
        assert_eq!(&ge[0..2], &[2, 2]);

        let le = tree.range_search(Some(&2), "<=");
        assert_eq!(le.len(), 3);
        assert_eq!(le[0], 1, "strictly smaller keys come first");
        assert_eq!(&le[1..3], &[2, 2]);
    }

    #[test]
    fn test_duplicates_of_every_key() {
        let mut tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
        for i in 1..=5 {
            tree.insert(i, i * 10);
            tree.insert(i, i * 100);
        }
        assert_eq!(tree.len(), 10);

        for i in 1..=5 {
            let mut result = tree.range_search(Some(&i), "==");
            result.sort();
            assert_eq!(result, vec![i * 10, i * 100]);
        }
        tree.assert_well_formed();
    }

    #[test]
    fn test_split_sequence() {
        let sequence = [13, 9, 21, 17, 5, 11, 3, 25, 27];
        let tree = tree_of(5, &sequence);

        for &key in &sequence {
            assert_eq!(tree.range_search(Some(&key), "=="), vec![key]);
        }
        let keys: Vec<i32> = tree.iter().map(|(&key, _)| key).collect();
        assert_eq!(keys, vec![3, 5, 9, 11, 13, 17, 21, 25, 27]);
        tree.assert_well_formed();
    }

    #[test]
    fn test_split_inducing_new_levels() {
        let sequence = [
            13, 9, 21, 17, 5, 11, 3, 25, 27, 14, 15, 31, 29, 22, 23, 38, 45, 47, 49, 1, 10, 12, 16,
        ];
        let tree = tree_of(3, &sequence);

        assert_eq!(tree.len(), sequence.len());
        assert!(tree.height() >= 3);
        let keys: Vec<i32> = tree.iter().map(|(&key, _)| key).collect();
        let mut expected = sequence.to_vec();
        expected.sort();
        assert_eq!(keys, expected);
        tree.assert_well_formed();
    }

    #[test]
    fn test_values_follow_their_keys() {
        let mut tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
        for &key in &[13, 9, 21, 17, 5, 11, 3, 25, 27] {
            tree.insert(key, key * 10);
        }
        for &key in &[13, 9, 21, 17, 5, 11, 3, 25, 27] {
            assert_eq!(tree.range_search(Some(&key), "=="), vec![key * 10]);
        }
    }

    #[test]
    fn test_large_sequential() {
        let mut tree: BPTree<i32, i32> = BPTree::new(64).unwrap();
        for i in 0..1000 {
            tree.insert(i, i);
        }

        assert_eq!(tree.len(), 1000);
        assert!(tree.height() >= 2);
        assert_eq!(tree.range_search(Some(&990), ">="), (990..1000).collect::<Vec<_>>());
        assert_eq!(tree.range_search(Some(&9), "<="), (0..=9).collect::<Vec<_>>());
        assert_eq!(*tree.min().unwrap().0, 0);
        assert_eq!(*tree.max().unwrap().0, 999);
        tree.assert_well_formed();
    }

    #[test]
    fn test_large_reverse_inserts() {
        let mut tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
        for i in (0..200).rev() {
            tree.insert(i, i);
        }

        let keys: Vec<i32> = tree.iter().map(|(&key, _)| key).collect();
        assert_eq!(keys, (0..200).collect::<Vec<_>>());
        tree.assert_well_formed();
    }

    #[test]
    fn test_interleaved_inserts_stay_well_formed() {
        let mut tree: BPTree<i32, i32> = BPTree::new(4).unwrap();
        // Alternate low and high keys to hit both edges of the tree.
        for i in 0..50 {
            tree.insert(i, i);
            tree.insert(1000 - i, 1000 - i);
            tree.assert_well_formed();
        }
        assert_eq!(tree.len(), 100);
    }

    #[test]
    fn test_iter_rev_matches_forward() {
        let tree = tree_of(3, &[5, 3, 8, 1, 4, 7, 9, 2, 6]);
        let forward: Vec<i32> = tree.iter().map(|(&key, _)| key).collect();
        let mut backward: Vec<i32> = tree.iter_rev().map(|(&key, _)| key).collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_string_keys() {
        let mut tree: BPTree<&str, u32> = BPTree::new(3).unwrap();
        tree.insert("cherry", 3);
        tree.insert("apple", 1);
        tree.insert("date", 4);
        tree.insert("banana", 2);
        tree.insert("elderberry", 5);

        assert_eq!(tree.range_search(Some(&"banana"), ">="), vec![2, 3, 4, 5]);
        assert_eq!(tree.range_search(Some(&"banana"), "<="), vec![1, 2]);
        assert_eq!(tree.range_search(Some(&"date"), "=="), vec![4]);
    }

    #[test]
    fn test_min_max() {
        let tree = tree_of(3, &[13, 9, 21, 17, 5]);
        let (min_key, min_value) = tree.min().unwrap();
        let (max_key, max_value) = tree.max().unwrap();
        assert_eq!((*min_key, *min_value), (5, 5));
        assert_eq!((*max_key, *max_value), (21, 21));
    }

    #[test]
    fn test_height_growth() {
        let mut tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
        tree.insert(5, 5);
        tree.insert(3, 3);
        assert_eq!(tree.height(), 1);
        tree.insert(8, 8);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_stats_counters() {
        let mut tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
        for i in 0..20 {
            tree.insert(i, i);
        }
        assert_eq!(tree.stats().total_entries(), 20);
        assert!(tree.stats().leaf_splits() > 0);
        assert!(tree.stats().internal_splits() > 0);
    }

    #[test]
    fn test_branching_factor_accessor() {
        let tree: BPTree<i32, i32> = BPTree::new(7).unwrap();
        assert_eq!(tree.branching_factor(), 7);
    }

    #[test]
    fn test_dump_format() {
        let tree = tree_of(3, &[5, 3, 8]);
        assert_eq!(tree.dump(), "{[8]}\n{[3, 5], [8]}\n");
    }

    #[test]
    fn test_dump_empty_tree() {
        let tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
        assert_eq!(tree.dump(), "{[]}\n");
    }

    #[test]
    fn test_dump_levels_count_matches_height() {
        let tree = tree_of(3, &[5, 3, 8, 1, 4, 7, 9, 2, 6]);
        let dump = tree.dump();
        assert_eq!(dump.lines().count(), tree.height());
    }

    #[test]
    fn test_strict_routing_with_distinct_keys() {
        let tree = tree_of(3, &(0..60).collect::<Vec<_>>());
        fn check(tree: &BPTree<i32, i32>, node_id: NodeId) {
            if let Node::Internal(node) = &tree.arena[node_id] {
                for (i, key) in node.keys.iter().enumerate() {
                    assert!(tree.subtree_max(node.children[i]) < key);
                    assert!(tree.first_leaf_key(node.children[i + 1]) >= key);
                }
                for &child in &node.children {
                    check(tree, child);
                }
            }
        }
        check(&tree, tree.root);
    }
}
