//! Error type for tree construction.

/// Error type for B+Tree operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The requested branching factor cannot form a valid multiway node.
    /// A B+Tree needs room for at least two children plus one separator,
    /// so factors of 2 and below are rejected at construction.
    InvalidBranchingFactor(usize),
}

impl core::fmt::Display for TreeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TreeError::InvalidBranchingFactor(factor) => {
                write!(f, "illegal branching factor: {factor}")
            }
        }
    }
}
