use crate::{
    error::{Error, Result},
    graph::GraphView,
    matcher::{Match, MatchCollector, MatchReporter, Matcher},
    pattern::Pattern,
    types::{Flow, NodeIndex},
};
use itertools::Itertools;
use log::debug;

/// One ordering check on match positions: a match is redundant unless
/// `m[smaller] < m[larger]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderCheck {
    pub smaller: NodeIndex,
    pub larger: NodeIndex,
}

/// Derives the order checks that keep exactly one representative of each
/// automorphism-equivalence class of matches of `pattern`.
///
/// Only patterns without match constraints are supported; a constrained
/// pattern is not guaranteed symmetry-safe and is rejected with
/// [`Error::ConstrainedPattern`].
///
/// The pattern is matched against its own graph to enumerate its full
/// automorphism group; each non-identity automorphism contributes the
/// check `(i, pi(i))` at its first moved index `i` (which `pi` always
/// moves upward, since everything below `i` is fixed). Matches are
/// injective, so the first moved index is the first position where a match
/// and its image under `pi` differ, and the deduplicated check set keeps
/// exactly the lexicographically smallest match of each orbit.
pub fn derive_order_checks(
    pattern: &Pattern<'_>,
    matcher: &dyn Matcher,
) -> Result<Vec<OrderCheck>> {
    if !pattern.constraints().is_empty() {
        return Err(Error::ConstrainedPattern(
            "order checks cannot be derived for a pattern with match constraints".to_string(),
        ));
    }
    let mut bare = Pattern::new(pattern.graph())?;
    if let Some(wildcard) = pattern.wildcard() {
        bare = bare.with_wildcard(wildcard);
    }
    let mut automorphisms = MatchCollector::new();
    matcher.find_matches(&bare, pattern.graph(), &mut automorphisms, usize::MAX);
    debug!(
        "pattern of {} nodes has {} automorphisms",
        pattern.node_count(),
        automorphisms.matches().len()
    );
    let checks = automorphisms
        .matches()
        .iter()
        .filter_map(|pi| {
            (0..pi.len())
                .find(|&i| pi[i] != i)
                .map(|i| OrderCheck {
                    smaller: i,
                    larger: pi[i],
                })
        })
        .sorted()
        .dedup()
        .collect();
    Ok(checks)
}

/// A reporter decorator that forwards only matches passing every order
/// check; symmetric duplicates are silently dropped.
pub struct SymmetryFilter<'a> {
    checks: &'a [OrderCheck],
    inner: &'a mut dyn MatchReporter,
}

impl<'a> SymmetryFilter<'a> {
    pub fn new(checks: &'a [OrderCheck], inner: &'a mut dyn MatchReporter) -> Self {
        Self { checks, inner }
    }
}

impl MatchReporter for SymmetryFilter<'_> {
    fn report_hit(&mut self, pattern: &Pattern<'_>, target: &dyn GraphView, m: &Match) -> Flow {
        if self.checks.iter().all(|c| m[c.smaller] < m[c.larger]) {
            self.inner.report_hit(pattern, target, m)
        } else {
            Flow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::AdjGraph,
        matcher::{BacktrackMatcher, MatchCollector},
        pattern::NoEdgeConstraint,
    };
    use std::collections::BTreeSet;

    fn filtered_and_unfiltered(
        pattern: &Pattern<'_>,
        target: &dyn GraphView,
    ) -> (Vec<Match>, Vec<Match>) {
        let matcher = BacktrackMatcher::new();
        let checks = derive_order_checks(pattern, &matcher).unwrap();
        let mut unfiltered = MatchCollector::new();
        matcher.find_matches(pattern, target, &mut unfiltered, usize::MAX);
        let mut kept = MatchCollector::new();
        let mut filter = SymmetryFilter::new(&checks, &mut kept);
        matcher.find_matches(pattern, target, &mut filter, usize::MAX);
        (kept.into_matches(), unfiltered.into_matches())
    }

    #[test]
    fn test_wildcard_path_in_triangle_six_to_three() {
        let target = AdjGraph::from_parts(
            &["X", "Y", "Z"],
            &[(0, 1, "-"), (1, 2, "-"), (2, 0, "-")],
        )
        .unwrap();
        let wild = AdjGraph::from_parts(&["*", "*"], &[(0, 1, "-")]).unwrap();
        let pattern = Pattern::new(&wild).unwrap().with_wildcard("*");
        let (kept, unfiltered) = filtered_and_unfiltered(&pattern, &target);
        assert_eq!(unfiltered.len(), 6);
        assert_eq!(kept.len(), 3);
        // One representative per unordered adjacent pair.
        let pairs: BTreeSet<_> = kept
            .iter()
            .map(|m| {
                let (a, b) = (m[0], m[1]);
                (a.min(b), a.max(b))
            })
            .collect();
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_asymmetric_pattern_has_no_checks() {
        let path = AdjGraph::from_parts(&["A", "B"], &[(0, 1, "-")]).unwrap();
        let pattern = Pattern::new(&path).unwrap();
        let checks = derive_order_checks(&pattern, &BacktrackMatcher::new()).unwrap();
        assert!(checks.is_empty());
    }

    #[test]
    fn test_triangle_pattern_checks() {
        let triangle = AdjGraph::from_parts(
            &["X", "X", "X"],
            &[(0, 1, "-"), (1, 2, "-"), (2, 0, "-")],
        )
        .unwrap();
        let pattern = Pattern::new(&triangle).unwrap();
        let checks = derive_order_checks(&pattern, &BacktrackMatcher::new()).unwrap();
        // The 6 automorphisms of a uniform triangle collapse into two
        // checks anchored at position 0 and one at position 1.
        assert_eq!(
            checks,
            vec![
                OrderCheck {
                    smaller: 0,
                    larger: 1
                },
                OrderCheck {
                    smaller: 0,
                    larger: 2
                },
                OrderCheck {
                    smaller: 1,
                    larger: 2
                },
            ]
        );
    }

    #[test]
    fn test_one_representative_per_class() {
        // Uniform 4-cycle target, uniform 2-path pattern: 8 automorphic
        // match pairs collapse to 4 representatives.
        let cycle = AdjGraph::from_parts(
            &["X", "X", "X", "X"],
            &[(0, 1, "-"), (1, 2, "-"), (2, 3, "-"), (3, 0, "-")],
        )
        .unwrap();
        let path = AdjGraph::from_parts(&["X", "X"], &[(0, 1, "-")]).unwrap();
        let pattern = Pattern::new(&path).unwrap();
        let (kept, unfiltered) = filtered_and_unfiltered(&pattern, &cycle);
        assert_eq!(unfiltered.len(), 8);
        assert_eq!(kept.len(), 4);
        for m in &kept {
            assert!(unfiltered.contains(m));
            assert!(m[0] < m[1]);
        }
    }

    #[test]
    fn test_constrained_pattern_rejected() {
        let path = AdjGraph::from_parts(&["X", "X"], &[(0, 1, "-")]).unwrap();
        let mut pattern = Pattern::new(&path).unwrap();
        pattern.add_constraint(Box::new(NoEdgeConstraint::new(0, 1)));
        assert!(matches!(
            derive_order_checks(&pattern, &BacktrackMatcher::new()),
            Err(Error::ConstrainedPattern(_))
        ));
    }
}
