//! bptree - an in-memory B+Tree index.
//!
//! The tree keeps keys in sorted order, preserves duplicate keys, and links
//! all leaves into a doubly-linked chain so range scans walk sideways
//! instead of re-descending the tree.
//!
//! # Example
//!
//! ```rust
//! use bptree::BPTree;
//!
//! let mut tree: BPTree<i32, i32> = BPTree::new(3).unwrap();
//! for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
//!     tree.insert(k, k);
//! }
//!
//! assert_eq!(tree.range_search(Some(&5), ">="), vec![5, 6, 7, 8, 9]);
//! assert_eq!(tree.range_search(Some(&5), "<="), vec![1, 2, 3, 4, 5]);
//! assert_eq!(tree.range_search(Some(&5), "=="), vec![5]);
//!
//! // Unknown comparator tokens and absent keys yield an empty result.
//! assert!(tree.range_search(Some(&5), "!=").is_empty());
//! assert!(tree.range_search(None, ">=").is_empty());
//! ```

#![no_std]

extern crate alloc;

pub mod btree;
pub mod comparator;
pub mod error;
pub mod stats;

pub use btree::{BPTree, LeafIter, Node, NodeId};
pub use comparator::RangeOp;
pub use error::TreeError;
pub use stats::TreeStats;
