//! Patterns: what to search for.

pub use constraints::{NoEdgeConstraint, NodeLabelConstraint};

mod constraints;

use crate::{
    error::Result,
    graph::{validate, GraphView},
    matcher::Match,
    types::NodeIndex,
};
use std::{collections::HashMap, fmt};

/// A pluggable per-match check attached to a [`Pattern`].
///
/// Every constraint must independently validate a candidate match; the
/// order of a pattern's constraint list only matters for reproducible
/// remapping.
pub trait MatchConstraint {
    /// Does `m` satisfy this constraint?
    fn is_valid_match(&self, pattern: &Pattern<'_>, target: &dyn GraphView, m: &Match) -> bool;

    /// Is `label` part of this constraint?
    fn is_constrained_label(&self, label: &str) -> bool;

    /// Does this constraint cover pattern node `node`?
    fn is_constraining(&self, node: NodeIndex) -> bool;

    /// Deep clone.
    fn clone_box(&self) -> Box<dyn MatchConstraint>;

    /// Remaps the covered pattern nodes through `map` (old index -> new
    /// index), or returns `None` if a covered node is absent from `map`
    /// and the constraint therefore no longer applies.
    fn remap(&self, map: &HashMap<NodeIndex, NodeIndex>) -> Option<Box<dyn MatchConstraint>>;

    fn eq_box(&self, other: &dyn MatchConstraint) -> bool;

    fn as_any(&self) -> &dyn std::any::Any;
}

/// A graph to search for: a borrowed graph view, an owned list of match
/// constraints and an optional wildcard label.
pub struct Pattern<'g> {
    graph: &'g dyn GraphView,
    constraints: Vec<Box<dyn MatchConstraint>>,
    wildcard: Option<String>,
}

impl<'g> Pattern<'g> {
    /// Wraps `graph`, failing fast on a malformed graph.
    pub fn new(graph: &'g dyn GraphView) -> Result<Self> {
        validate(graph)?;
        Ok(Self {
            graph,
            constraints: Vec::new(),
            wildcard: None,
        })
    }

    /// Declares `label` compatible with any node or edge label.
    pub fn with_wildcard(mut self, label: &str) -> Self {
        self.wildcard = Some(label.to_string());
        self
    }

    pub fn add_constraint(&mut self, constraint: Box<dyn MatchConstraint>) {
        self.constraints.push(constraint);
    }

    pub fn graph(&self) -> &'g dyn GraphView {
        self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn constraints(&self) -> &[Box<dyn MatchConstraint>] {
        &self.constraints
    }

    pub fn wildcard(&self) -> Option<&str> {
        self.wildcard.as_deref()
    }

    /// Validates `m` against every constraint, short-circuiting on the
    /// first failure.
    pub fn is_valid_match(&self, target: &dyn GraphView, m: &Match) -> bool {
        self.constraints
            .iter()
            .all(|c| c.is_valid_match(self, target, m))
    }

    /// Remaps every constraint through `map` (old index -> new index),
    /// dropping constraints that cover an unmapped node.
    ///
    /// Used together with [`Subgraph::index_map`](crate::graph::Subgraph)
    /// to carry constraints onto a node-induced restriction of the
    /// pattern graph.
    pub fn remapped_constraints(
        &self,
        map: &HashMap<NodeIndex, NodeIndex>,
    ) -> Vec<Box<dyn MatchConstraint>> {
        self.constraints
            .iter()
            .filter_map(|c| c.remap(map))
            .collect()
    }
}

impl Clone for Pattern<'_> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            constraints: self.constraints.iter().map(|c| c.clone_box()).collect(),
            wildcard: self.wildcard.clone(),
        }
    }
}

impl PartialEq for Pattern<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.graph.iface_eq(other.graph)
            && self.wildcard == other.wildcard
            && self.constraints.len() == other.constraints.len()
            && self
                .constraints
                .iter()
                .zip(&other.constraints)
                .all(|(a, b)| a.eq_box(b.as_ref()))
    }
}

impl fmt::Debug for Pattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("nodes", &self.graph.node_count())
            .field("constraints", &self.constraints.len())
            .field("wildcard", &self.wildcard)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AdjGraph, Subgraph};

    fn path() -> AdjGraph {
        AdjGraph::from_parts(&["a", "b", "c"], &[(0, 1, "-"), (1, 2, "-")]).unwrap()
    }

    #[test]
    fn test_pattern_eq() {
        let g1 = path();
        let g2 = path();
        let p1 = Pattern::new(&g1).unwrap();
        let p2 = Pattern::new(&g2).unwrap();
        assert_eq!(p1, p2);
        let p3 = Pattern::new(&g2).unwrap().with_wildcard("*");
        assert_ne!(p1, p3);
    }

    #[test]
    fn test_pattern_eq_constraints() {
        let g = path();
        let mut p1 = Pattern::new(&g).unwrap();
        let mut p2 = Pattern::new(&g).unwrap();
        p1.add_constraint(Box::new(NoEdgeConstraint::new(0, 2)));
        assert_ne!(p1, p2);
        p2.add_constraint(Box::new(NoEdgeConstraint::new(0, 2)));
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_clone_is_deep() {
        let g = path();
        let mut p = Pattern::new(&g).unwrap();
        p.add_constraint(Box::new(NodeLabelConstraint::forbidden(1, &["b"])));
        let clone = p.clone();
        assert_eq!(p, clone);
        assert_eq!(clone.constraints().len(), 1);
    }

    #[test]
    fn test_constraint_validation() {
        let g = path();
        let target = path();
        let mut p = Pattern::new(&g).unwrap();
        p.add_constraint(Box::new(NodeLabelConstraint::forbidden(0, &["a"])));
        let identity = Match::new(vec![0, 1, 2]);
        assert!(!p.is_valid_match(&target, &identity));
        let reversed = Match::new(vec![2, 1, 0]);
        assert!(p.is_valid_match(&target, &reversed));
    }

    #[test]
    fn test_remap_through_subgraph() {
        let g = path();
        let mut p = Pattern::new(&g).unwrap();
        p.add_constraint(Box::new(NodeLabelConstraint::allowed(2, &["c"])));
        p.add_constraint(Box::new(NoEdgeConstraint::new(0, 2)));
        let sub = Subgraph::induced(&g, vec![1, 2]).unwrap();
        let remapped = p.remapped_constraints(&sub.index_map());
        // The node-label constraint follows node 2 to local index 1; the
        // no-edge constraint loses node 0 and disappears.
        assert_eq!(remapped.len(), 1);
        assert!(remapped[0].is_constraining(1));
        assert!(!remapped[0].is_constraining(0));
    }
}
