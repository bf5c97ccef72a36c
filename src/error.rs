use derive_more::Display;

/// The crate error type.
///
/// Only programmer/input errors live here; the search-abort channel is
/// [`Flow`](crate::types::Flow), not an `Error`.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// A graph violated the `GraphView` contract (out-of-range index,
    /// asymmetric adjacency).
    #[display(fmt = "invalid graph: {}", _0)]
    InvalidGraph(String),
    /// Order-check derivation was requested for a pattern carrying match
    /// constraints, which is unsupported.
    #[display(fmt = "constrained pattern: {}", _0)]
    ConstrainedPattern(String),
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
