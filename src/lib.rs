//! Subgraph pattern matching and rule-driven graph rewriting search.

pub mod error;
pub mod graph;
pub mod matcher;
pub mod pattern;
pub mod search;
pub mod types;

pub use error::{Error, Result};
