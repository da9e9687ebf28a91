//! B+Tree index implementation.
//!
//! This module provides an in-memory B+Tree that preserves duplicate keys
//! and links its leaves for sideways range scans.

mod iter;
mod node;
mod tree;

pub use iter::LeafIter;
pub use node::{InternalNode, LeafNode, Node, NodeId};
pub use tree::BPTree;
