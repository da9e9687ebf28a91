//! Leaf-chain iterator.

use super::node::{Node, NodeId};

/// Iterator over the key/value pairs of a B+Tree, walking the leaf chain.
///
/// Forward iteration follows `next` links from the leftmost leaf; reverse
/// iteration follows `prev` links from the rightmost leaf. Neither descends
/// the tree again after the starting leaf is known.
pub struct LeafIter<'a, K, V> {
    /// The arena of all nodes.
    arena: &'a [Node<K, V>],
    /// Current leaf ID, `None` once the chain is exhausted.
    current: Option<NodeId>,
    /// Current position within the leaf.
    pos: usize,
    /// Whether to iterate in reverse.
    reverse: bool,
}

impl<'a, K, V> LeafIter<'a, K, V> {
    /// Creates a new iterator starting at the given leaf.
    pub(super) fn new(arena: &'a [Node<K, V>], start: NodeId, reverse: bool) -> Self {
        let pos = if reverse {
            match &arena[start] {
                Node::Leaf(leaf) => leaf.keys.len().saturating_sub(1),
                Node::Internal(_) => 0,
            }
        } else {
            0
        };

        Self {
            arena,
            current: Some(start),
            pos,
            reverse,
        }
    }
}

impl<'a, K, V> Iterator for LeafIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node_id = self.current?;
        let leaf = match &self.arena[node_id] {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => return None,
        };

        // Only a root leaf can be empty, and it has no neighbors.
        if leaf.keys.is_empty() {
            self.current = None;
            return None;
        }

        let item = (&leaf.keys[self.pos], &leaf.values[self.pos]);

        if self.reverse {
            if self.pos > 0 {
                self.pos -= 1;
            } else {
                self.current = leaf.prev;
                if let Some(prev_id) = self.current {
                    if let Node::Leaf(prev) = &self.arena[prev_id] {
                        self.pos = prev.keys.len().saturating_sub(1);
                    }
                }
            }
        } else {
            self.pos += 1;
            if self.pos >= leaf.keys.len() {
                self.current = leaf.next;
                self.pos = 0;
            }
        }

        Some(item)
    }
}
