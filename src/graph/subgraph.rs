use crate::{
    error::{Error, Result},
    graph::{EdgeRef, GraphView},
    types::NodeIndex,
};
use std::collections::HashMap;

/// A node-induced restriction of a parent graph view.
///
/// Local indices are dense in `[0, nodes.len())`; adjacency iteration
/// lazily filters the parent's adjacency down to retained endpoints and
/// remaps both endpoints to local indices.
pub struct Subgraph<'g> {
    parent: &'g dyn GraphView,
    nodes: Vec<NodeIndex>,
    local: Vec<Option<NodeIndex>>,
}

impl<'g> Subgraph<'g> {
    /// Restricts `parent` to an explicit ordered list of retained nodes.
    pub fn induced(parent: &'g dyn GraphView, nodes: Vec<NodeIndex>) -> Result<Self> {
        let n = parent.node_count();
        let mut local = vec![None; n];
        for (j, &i) in nodes.iter().enumerate() {
            if i >= n {
                return Err(Error::InvalidGraph(format!(
                    "retained node {} outside the parent graph of {} nodes",
                    i, n
                )));
            }
            if local[i].is_some() {
                return Err(Error::InvalidGraph(format!("retained node {} twice", i)));
            }
            local[i] = Some(j);
        }
        Ok(Self {
            parent,
            nodes,
            local,
        })
    }

    /// Restricts `parent` to the nodes whose partition label equals `keep`,
    /// in ascending parent order.
    ///
    /// `partition` is typically the output of
    /// [`connected_components`](crate::graph::connected_components).
    pub fn component(parent: &'g dyn GraphView, partition: &[usize], keep: usize) -> Result<Self> {
        if partition.len() != parent.node_count() {
            return Err(Error::InvalidGraph(format!(
                "partition of {} labels over a graph of {} nodes",
                partition.len(),
                parent.node_count()
            )));
        }
        let nodes = partition
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == keep)
            .map(|(i, _)| i)
            .collect();
        Self::induced(parent, nodes)
    }

    pub fn parent(&self) -> &'g dyn GraphView {
        self.parent
    }

    /// The parent index of local node `j`.
    pub fn parent_index(&self, j: NodeIndex) -> NodeIndex {
        self.nodes[j]
    }

    /// The local index of parent node `i`, if retained.
    pub fn local_index(&self, i: NodeIndex) -> Option<NodeIndex> {
        self.local.get(i).copied().flatten()
    }

    /// The parent-index -> local-index map, for constraint remapping.
    pub fn index_map(&self) -> HashMap<NodeIndex, NodeIndex> {
        self.nodes.iter().enumerate().map(|(j, &i)| (i, j)).collect()
    }
}

impl GraphView for Subgraph<'_> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_label(&self, i: NodeIndex) -> &str {
        self.parent.node_label(self.nodes[i])
    }

    fn adjacency(&self, i: NodeIndex) -> Box<dyn Iterator<Item = EdgeRef<'_>> + '_> {
        let local = &self.local;
        Box::new(
            self.parent
                .adjacency(self.nodes[i])
                .filter_map(move |e| {
                    local[e.to].map(|to| EdgeRef {
                        from: i,
                        to,
                        label: e.label,
                    })
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{connected_components, validate, AdjGraph};

    fn parent() -> AdjGraph {
        AdjGraph::from_parts(
            &["a", "b", "c", "d"],
            &[(0, 1, "x"), (1, 2, "y"), (2, 3, "z"), (0, 3, "w")],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let g = parent();
        let s = Subgraph::induced(&g, vec![3, 1, 2]).unwrap();
        assert_eq!(s.node_count(), 3);
        for j in 0..s.node_count() {
            assert_eq!(s.node_label(j), g.node_label(s.parent_index(j)));
            for e in s.adjacency(j) {
                let labels = g.edge_labels(s.parent_index(e.from), s.parent_index(e.to));
                assert!(labels.contains(&e.label));
            }
        }
        // d--c and c--b survive, d--a and b--a are filtered out.
        assert_eq!(s.edge_labels(0, 2), vec!["z"]);
        assert_eq!(s.edge_labels(1, 2), vec!["y"]);
        assert!(s.edge_labels(0, 1).is_empty());
        assert!(validate(&s).is_ok());
    }

    #[test]
    fn test_index_maps() {
        let g = parent();
        let s = Subgraph::induced(&g, vec![2, 0]).unwrap();
        assert_eq!(s.parent_index(0), 2);
        assert_eq!(s.local_index(0), Some(1));
        assert_eq!(s.local_index(1), None);
        assert_eq!(s.index_map().get(&2), Some(&0));
    }

    #[test]
    fn test_induced_rejects_bad_nodes() {
        let g = parent();
        assert!(Subgraph::induced(&g, vec![0, 4]).is_err());
        assert!(Subgraph::induced(&g, vec![0, 0]).is_err());
    }

    #[test]
    fn test_component() {
        let g = AdjGraph::from_parts(&["a", "b", "c"], &[(0, 2, "-")]).unwrap();
        let partition = connected_components(&g);
        let s = Subgraph::component(&g, &partition, 0).unwrap();
        assert_eq!(s.node_count(), 2);
        assert_eq!(s.node_label(0), "a");
        assert_eq!(s.node_label(1), "c");
        assert_eq!(s.edge_labels(0, 1), vec!["-"]);
    }
}
