//! B+Tree node definitions.

use alloc::vec::Vec;

/// Node identifier in the B+Tree arena.
pub type NodeId = usize;

/// A node in the B+Tree.
///
/// Internal nodes only route; leaves hold the actual key/value pairs and
/// participate in the leaf chain.
#[derive(Clone, Debug)]
pub enum Node<K, V> {
    /// A routing node.
    Internal(InternalNode<K>),
    /// A data-bearing node.
    Leaf(LeafNode<K, V>),
}

impl<K, V> Node<K, V> {
    /// Returns true if this is a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

/// An internal node: separator keys plus one more child than keys.
#[derive(Clone, Debug)]
pub struct InternalNode<K> {
    /// Separator keys, ascending. Duplicates are possible when equal keys
    /// have been promoted from more than one split.
    pub keys: Vec<K>,
    /// Child node IDs; `children.len() == keys.len() + 1`.
    pub children: Vec<NodeId>,
}

impl<K: Ord> InternalNode<K> {
    /// Creates an internal node with the given keys and children.
    pub fn new(keys: Vec<K>, children: Vec<NodeId>) -> Self {
        Self { keys, children }
    }

    /// Index of the child a key routes to.
    ///
    /// An exact match routes to the child *right* of the matched separator,
    /// which is what keeps duplicate keys together: new duplicates always
    /// land right of the separator that equals them.
    pub fn child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Child node ID the given key routes to.
    pub fn child_for(&self, key: &K) -> NodeId {
        self.children[self.child_index(key)]
    }

    /// Inserts a separator key and the child sitting right of it, at the
    /// position derived from the same binary search used for routing.
    pub fn insert_separator(&mut self, key: K, child: NodeId) {
        let index = self.child_index(&key);
        self.keys.insert(index, key);
        self.children.insert(index + 1, child);
    }

    /// Returns true once this node holds more children than the branching
    /// factor allows.
    pub fn is_overflow(&self, branching_factor: usize) -> bool {
        self.children.len() > branching_factor
    }

    /// Splits off a right sibling, leaving this node as the left half.
    ///
    /// With `n` keys the sibling receives `keys[from..n]` and
    /// `children[from..=n]` where `from = (n + 1) / 2`; the key at
    /// `from - 1` is promoted out entirely. Its value is not carried on the
    /// separator path — parents recompute it from the sibling's first leaf
    /// key. The one-off asymmetry between the key and child boundaries is
    /// load-bearing; changing it corrupts routing for even branching
    /// factors.
    pub fn split(&mut self) -> InternalNode<K> {
        let from = (self.keys.len() + 1) / 2;
        let sibling_keys = self.keys.split_off(from);
        let sibling_children = self.children.split_off(from);
        self.keys.pop();
        InternalNode {
            keys: sibling_keys,
            children: sibling_children,
        }
    }
}

/// A leaf node: parallel key/value vectors plus chain links to the
/// neighboring leaves. The links are plain arena indices, not ownership —
/// structural ownership flows through parent/child edges only.
#[derive(Clone, Debug)]
pub struct LeafNode<K, V> {
    /// Keys, ascending, duplicates allowed.
    pub keys: Vec<K>,
    /// Values; `values[i]` belongs to `keys[i]`.
    pub values: Vec<V>,
    /// Right neighbor in the leaf chain.
    pub next: Option<NodeId>,
    /// Left neighbor in the leaf chain.
    pub prev: Option<NodeId>,
}

impl<K: Ord, V> LeafNode<K, V> {
    /// Creates an empty, unlinked leaf.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
            prev: None,
        }
    }

    /// Inserts a key/value pair at its sorted position.
    ///
    /// An exact match inserts *after* the matched entry, so repeated inserts
    /// of an equal key are accepted and stay adjacent. Which duplicate the
    /// binary search lands on is unspecified, so the relative order among
    /// equal keys is not a contract.
    pub fn insert(&mut self, key: K, value: V) {
        let index = match self.keys.binary_search(&key) {
            Ok(index) => index + 1,
            Err(index) => index,
        };
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    /// Returns true once this leaf holds more values than its capacity of
    /// `branching_factor - 1`.
    pub fn is_overflow(&self, branching_factor: usize) -> bool {
        self.values.len() > branching_factor - 1
    }

    /// Splits off a right sibling carrying `keys[from..]`/`values[from..]`
    /// with `from = (n + 1) / 2`.
    ///
    /// The sibling inherits this leaf's `next` link; the remaining chain
    /// pointers need arena access and are patched by the tree.
    pub fn split(&mut self) -> LeafNode<K, V> {
        let from = (self.keys.len() + 1) / 2;
        LeafNode {
            keys: self.keys.split_off(from),
            values: self.values.split_off(from),
            next: self.next,
            prev: None,
        }
    }
}

impl<K: Ord, V> Default for LeafNode<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
