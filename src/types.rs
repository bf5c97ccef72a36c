//! Various types related to graph matching.

/// The node index type.
///
/// A graph view addresses its nodes by dense indices in `[0, node_count())`.
pub type NodeIndex = usize;

/// The interned label code type.
///
/// Node and edge labels are interned into dense codes per matcher
/// invocation.
pub type LabelCode = i16;

/// Search-control signal threaded back through reporters and the
/// rewrite-search recursion.
///
/// `Abort` unwinds the entire pending search in O(depth); it is control
/// flow, not an error, and is kept separate from [`Error`](crate::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

impl Flow {
    pub fn is_abort(self) -> bool {
        self == Flow::Abort
    }
}
