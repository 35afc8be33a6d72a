use thiserror::Error;

/// Errors reported by [`OrderedMap`](crate::OrderedMap) queries and mutators.
///
/// Every failure is detected before the tree is touched, so a call that
/// returns an error has left the map exactly as it was.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The map is empty, or no key satisfies the query.
    #[error("no key satisfies the query")]
    NotFound,

    /// A rank outside `0..len` was passed to a select operation.
    #[error("rank {rank} is out of bounds for a map of length {len}")]
    RankOutOfBounds {
        /// The rank that was requested.
        rank: usize,
        /// The number of entries in the map at the time of the call.
        len: usize,
    },
}

/// A specialized [`Result`](core::result::Result) for map operations.
pub type Result<T> = core::result::Result<T, Error>;
