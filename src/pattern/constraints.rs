//! Concrete match constraints.

use crate::{
    graph::GraphView,
    matcher::Match,
    pattern::{MatchConstraint, Pattern},
    types::NodeIndex,
};
use std::collections::{BTreeSet, HashMap};

/// Requires (or forbids) the image of a pattern node to carry one of a set
/// of labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLabelConstraint {
    node: NodeIndex,
    labels: BTreeSet<String>,
    forbidden: bool,
}

impl NodeLabelConstraint {
    /// The image of `node` must carry one of `labels`.
    pub fn allowed(node: NodeIndex, labels: &[&str]) -> Self {
        Self {
            node,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            forbidden: false,
        }
    }

    /// The image of `node` must not carry any of `labels`.
    pub fn forbidden(node: NodeIndex, labels: &[&str]) -> Self {
        Self {
            node,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            forbidden: true,
        }
    }
}

impl MatchConstraint for NodeLabelConstraint {
    fn is_valid_match(&self, _pattern: &Pattern<'_>, target: &dyn GraphView, m: &Match) -> bool {
        let hit = self.labels.contains(target.node_label(m[self.node]));
        hit != self.forbidden
    }

    fn is_constrained_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    fn is_constraining(&self, node: NodeIndex) -> bool {
        node == self.node
    }

    fn clone_box(&self) -> Box<dyn MatchConstraint> {
        Box::new(self.clone())
    }

    fn remap(&self, map: &HashMap<NodeIndex, NodeIndex>) -> Option<Box<dyn MatchConstraint>> {
        map.get(&self.node).map(|&node| {
            Box::new(Self {
                node,
                labels: self.labels.clone(),
                forbidden: self.forbidden,
            }) as Box<dyn MatchConstraint>
        })
    }

    fn eq_box(&self, other: &dyn MatchConstraint) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .map_or(false, |o| self == o)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Forbids any target edge between the images of two pattern nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoEdgeConstraint {
    a: NodeIndex,
    b: NodeIndex,
}

impl NoEdgeConstraint {
    pub fn new(a: NodeIndex, b: NodeIndex) -> Self {
        Self { a, b }
    }
}

impl MatchConstraint for NoEdgeConstraint {
    fn is_valid_match(&self, _pattern: &Pattern<'_>, target: &dyn GraphView, m: &Match) -> bool {
        target.edge_labels(m[self.a], m[self.b]).is_empty()
    }

    fn is_constrained_label(&self, _label: &str) -> bool {
        false
    }

    fn is_constraining(&self, node: NodeIndex) -> bool {
        node == self.a || node == self.b
    }

    fn clone_box(&self) -> Box<dyn MatchConstraint> {
        Box::new(*self)
    }

    fn remap(&self, map: &HashMap<NodeIndex, NodeIndex>) -> Option<Box<dyn MatchConstraint>> {
        match (map.get(&self.a), map.get(&self.b)) {
            (Some(&a), Some(&b)) => Some(Box::new(Self { a, b }) as Box<dyn MatchConstraint>),
            _ => None,
        }
    }

    fn eq_box(&self, other: &dyn MatchConstraint) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .map_or(false, |o| self == o)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
