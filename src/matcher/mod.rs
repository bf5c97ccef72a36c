//! Match enumeration: result encoding, reporters and the matching engine.

pub use automorphism::{derive_order_checks, OrderCheck, SymmetryFilter};
pub use engine::BacktrackMatcher;

mod automorphism;
mod engine;

use crate::{
    graph::GraphView,
    pattern::Pattern,
    types::{Flow, NodeIndex},
};
use std::ops::Index;

/// One occurrence of a pattern inside a target: the target node index per
/// pattern node, in pattern-node order. Immutable once reported.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Match {
    positions: Vec<NodeIndex>,
}

impl Match {
    pub fn new(positions: Vec<NodeIndex>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn as_slice(&self) -> &[NodeIndex] {
        &self.positions
    }
}

impl Index<NodeIndex> for Match {
    type Output = NodeIndex;

    fn index(&self, i: NodeIndex) -> &NodeIndex {
        &self.positions[i]
    }
}

/// The streaming result callback: one call per accepted match, in
/// enumeration order, never batched.
///
/// Returning [`Flow::Abort`] stops the enumeration that produced the hit;
/// the abort propagates out of the matcher untouched.
pub trait MatchReporter {
    fn report_hit(&mut self, pattern: &Pattern<'_>, target: &dyn GraphView, m: &Match) -> Flow;
}

/// Collects owned copies of every reported match.
#[derive(Debug, Default)]
pub struct MatchCollector {
    matches: Vec<Match>,
}

impl MatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }
}

impl MatchReporter for MatchCollector {
    fn report_hit(&mut self, _pattern: &Pattern<'_>, _target: &dyn GraphView, m: &Match) -> Flow {
        self.matches.push(m.clone());
        Flow::Continue
    }
}

/// Counts reported matches without keeping them.
#[derive(Debug, Default)]
pub struct MatchCounter {
    hits: usize,
}

impl MatchCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

impl MatchReporter for MatchCounter {
    fn report_hit(&mut self, _pattern: &Pattern<'_>, _target: &dyn GraphView, _m: &Match) -> Flow {
        self.hits += 1;
        Flow::Continue
    }
}

/// One `(pattern, reporter)` pair of a prioritized enumeration.
pub struct MatchJob<'a, 'g> {
    pub pattern: &'a Pattern<'g>,
    pub reporter: &'a mut dyn MatchReporter,
}

/// The isomorphism/monomorphism engine boundary.
pub trait Matcher {
    /// Enumerates matches of `pattern` inside `target`, delivering each
    /// accepted match to `reporter` exactly once, until the search space
    /// is exhausted, `max_hits` hits have been reported, or the reporter
    /// aborts.
    ///
    /// Returns the number of hits reported and whether the reporter
    /// aborted the enumeration.
    fn find_matches(
        &self,
        pattern: &Pattern<'_>,
        target: &dyn GraphView,
        reporter: &mut dyn MatchReporter,
        max_hits: usize,
    ) -> (usize, Flow);

    /// Enumerates several patterns in caller-given priority order: all
    /// matches of job 0 are reported before job 1 is attempted, with
    /// `max_hits` shared across all jobs.
    fn find_matches_ordered(
        &self,
        jobs: &mut [MatchJob<'_, '_>],
        target: &dyn GraphView,
        max_hits: usize,
    ) -> (usize, Flow) {
        let mut total = 0;
        for job in jobs {
            if total >= max_hits {
                break;
            }
            let (hits, flow) =
                self.find_matches(job.pattern, target, job.reporter, max_hits - total);
            total += hits;
            if flow.is_abort() {
                return (total, Flow::Abort);
            }
        }
        (total, Flow::Continue)
    }
}
