//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.

mod compare;
mod node;
mod set;
mod tree;

pub use self::compare::{Compare, Natural, PartialOrder, TotalOrder};
pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter};

use std::error;
use std::fmt;
use std::result;

/// Errors reported by `AvlSet<T, C>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The value cannot be ordered by the set's ordering function, so it can never be an element.
    InvalidArgument,
    /// The operation requires at least one element, but the set is empty.
    EmptyCollection,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "value cannot be ordered by the set's comparator"),
            Error::EmptyCollection => write!(f, "set is empty"),
        }
    }
}

/// Convenience `Result` type for set operations.
pub type Result<T> = result::Result<T, Error>;
