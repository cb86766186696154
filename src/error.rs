//! Error types for treecut

use thiserror::Error;

/// Result type alias for treecut operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for treecut
#[derive(Error, Debug)]
pub enum Error {
    /// The input adjacency is not a valid tree, or the (n, k, eps) parameters are invalid
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The coarse multiset could not be reduced to zero within the exact packing DP
    #[error("no perfect packing exists for this candidate signature")]
    InfeasiblePerfectPack,

    /// No root signature admitted a feasible packing into k bins
    #[error("tree has no feasible {k}-way partition with imbalance bound {bound} nodes per part")]
    Infeasible {
        /// Requested part count
        k: u64,
        /// Upper bound on nodes per part implied by epsilon
        bound: u64,
    },

    /// A cut cost or frontier count exceeded the integer range used for accumulation
    #[error("integer overflow while accumulating {0}")]
    Overflow(String),

    /// I/O failure from a text-format reader or writer
    #[error("I/O error: {0}")]
    Io(String),

    /// A line or token failed to parse in one of the external text formats
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Description of what failed to parse
        message: String,
    },
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::Parse {
            line: 0,
            message: err.to_string(),
        }
    }
}
