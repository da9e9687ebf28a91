//! Range comparison operators for tree searches.
//!
//! Search requests carry their comparison mode as a literal token; this
//! module parses the token into a typed operator.

/// Comparison mode for a range search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeOp {
    /// All values whose keys are greater than or equal to the search key (`>=`).
    GreaterOrEqual,
    /// All values whose keys are equal to the search key (`==`).
    Equal,
    /// All values whose keys are less than or equal to the search key (`<=`).
    LessOrEqual,
}

impl RangeOp {
    /// Parses a comparator token. Returns `None` for anything other than
    /// the three recognized tokens.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            ">=" => Some(RangeOp::GreaterOrEqual),
            "==" => Some(RangeOp::Equal),
            "<=" => Some(RangeOp::LessOrEqual),
            _ => None,
        }
    }

    /// Returns the literal token for this operator.
    pub fn token(&self) -> &'static str {
        match self {
            RangeOp::GreaterOrEqual => ">=",
            RangeOp::Equal => "==",
            RangeOp::LessOrEqual => "<=",
        }
    }
}
