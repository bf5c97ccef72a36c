//! The read-only graph view abstraction and its concrete adapters.

pub use subgraph::Subgraph;

mod subgraph;

use crate::{
    error::{Error, Result},
    types::NodeIndex,
};
use std::collections::VecDeque;

/// One adjacency entry of an undirected labeled graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeRef<'a> {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub label: &'a str,
}

/// A labeled, undirected, index-addressed graph.
///
/// Implementations are read-only for the duration they are used by the
/// matching and search components; those components never mutate a view,
/// they only produce new graphs or subgraph views over existing ones.
pub trait GraphView {
    fn node_count(&self) -> usize;

    /// The label of node `i`.
    ///
    /// `i` must be in `[0, node_count())`.
    fn node_label(&self, i: NodeIndex) -> &str;

    /// Iterates the adjacency of node `i` in stored order.
    ///
    /// Adjacency is symmetric: an entry `i -> j` implies an entry `j -> i`
    /// with the same label (checked by [`validate`]).
    fn adjacency(&self, i: NodeIndex) -> Box<dyn Iterator<Item = EdgeRef<'_>> + '_>;

    /// Labels of all edges between `i` and `j`, one entry per parallel edge.
    fn edge_labels(&self, i: NodeIndex, j: NodeIndex) -> Vec<&str> {
        self.adjacency(i)
            .filter(|e| e.to == j)
            .map(|e| e.label)
            .collect()
    }

    /// The number of adjacency entries of node `i` (parallel edges counted).
    fn degree(&self, i: NodeIndex) -> usize {
        self.adjacency(i).count()
    }

    /// Interface-level equality: equal node count, equal labels per index
    /// and equal adjacency per index up to entry order, regardless of the
    /// concrete representation behind either view.
    fn iface_eq(&self, other: &dyn GraphView) -> bool {
        if self.node_count() != other.node_count() {
            return false;
        }
        for i in 0..self.node_count() {
            if self.node_label(i) != other.node_label(i) {
                return false;
            }
            let mut lhs: Vec<_> = self.adjacency(i).map(|e| (e.to, e.label)).collect();
            let mut rhs: Vec<_> = other.adjacency(i).map(|e| (e.to, e.label)).collect();
            lhs.sort_unstable();
            rhs.sort_unstable();
            if lhs != rhs {
                return false;
            }
        }
        true
    }
}

/// Checks the `GraphView` contract: every adjacency entry must start at its
/// owning node, point inside the graph and have a symmetric reverse entry.
pub fn validate(graph: &dyn GraphView) -> Result<()> {
    let n = graph.node_count();
    for i in 0..n {
        for e in graph.adjacency(i) {
            if e.from != i {
                return Err(Error::InvalidGraph(format!(
                    "adjacency of node {} starts at node {}",
                    i, e.from
                )));
            }
            if e.to >= n {
                return Err(Error::InvalidGraph(format!(
                    "edge ({}, {}) points outside the graph of {} nodes",
                    e.from, e.to, n
                )));
            }
        }
        for j in 0..n {
            let mut forward = graph.edge_labels(i, j);
            let mut reverse = graph.edge_labels(j, i);
            forward.sort_unstable();
            reverse.sort_unstable();
            if forward != reverse {
                return Err(Error::InvalidGraph(format!(
                    "asymmetric adjacency between nodes {} and {}",
                    i, j
                )));
            }
        }
    }
    Ok(())
}

/// Labels every node with the smallest node index of its connected
/// component.
///
/// The returned vector is a partition-label vector suitable for
/// [`Subgraph::component`].
pub fn connected_components(graph: &dyn GraphView) -> Vec<usize> {
    let n = graph.node_count();
    let mut component = vec![usize::MAX; n];
    let mut queue = VecDeque::new();
    for root in 0..n {
        if component[root] != usize::MAX {
            continue;
        }
        component[root] = root;
        queue.push_back(root);
        while let Some(v) = queue.pop_front() {
            for e in graph.adjacency(v) {
                if component[e.to] == usize::MAX {
                    component[e.to] = root;
                    queue.push_back(e.to);
                }
            }
        }
    }
    component
}

/// A concrete adjacency-list multigraph.
///
/// The fixture and collaborator representation: rewrite collaborators build
/// successor graphs with it, tests build pattern and target graphs with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjGraph {
    labels: Vec<String>,
    adjacency: Vec<Vec<(NodeIndex, String)>>,
}

impl AdjGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from node labels and `(a, b, label)` edges.
    pub fn from_parts(nodes: &[&str], edges: &[(NodeIndex, NodeIndex, &str)]) -> Result<Self> {
        let mut graph = Self::new();
        for &label in nodes {
            graph.add_node(label);
        }
        for &(a, b, label) in edges {
            graph.add_edge(a, b, label)?;
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, label: &str) -> NodeIndex {
        self.labels.push(label.to_string());
        self.adjacency.push(Vec::new());
        self.labels.len() - 1
    }

    /// Inserts an undirected edge; parallel edges are allowed.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, label: &str) -> Result<()> {
        let n = self.labels.len();
        if a >= n || b >= n {
            return Err(Error::InvalidGraph(format!(
                "edge ({}, {}) points outside the graph of {} nodes",
                a, b, n
            )));
        }
        self.adjacency[a].push((b, label.to_string()));
        self.adjacency[b].push((a, label.to_string()));
        Ok(())
    }

    pub fn set_node_label(&mut self, i: NodeIndex, label: &str) {
        self.labels[i] = label.to_string();
    }
}

impl GraphView for AdjGraph {
    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn node_label(&self, i: NodeIndex) -> &str {
        &self.labels[i]
    }

    fn adjacency(&self, i: NodeIndex) -> Box<dyn Iterator<Item = EdgeRef<'_>> + '_> {
        Box::new(self.adjacency[i].iter().map(move |(to, label)| EdgeRef {
            from: i,
            to: *to,
            label,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Asymmetric;

    impl GraphView for Asymmetric {
        fn node_count(&self) -> usize {
            2
        }

        fn node_label(&self, _i: NodeIndex) -> &str {
            "a"
        }

        fn adjacency(&self, i: NodeIndex) -> Box<dyn Iterator<Item = EdgeRef<'_>> + '_> {
            if i == 0 {
                Box::new(std::iter::once(EdgeRef {
                    from: 0,
                    to: 1,
                    label: "-",
                }))
            } else {
                Box::new(std::iter::empty())
            }
        }
    }

    #[test]
    fn test_adj_graph() {
        let g = AdjGraph::from_parts(&["a", "b"], &[(0, 1, "x")]).unwrap();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node_label(1), "b");
        assert_eq!(g.edge_labels(0, 1), vec!["x"]);
        assert_eq!(g.edge_labels(1, 0), vec!["x"]);
        assert_eq!(g.degree(0), 1);
        assert!(validate(&g).is_ok());
    }

    #[test]
    fn test_parallel_edges() {
        let g = AdjGraph::from_parts(&["a", "b"], &[(0, 1, "x"), (0, 1, "y")]).unwrap();
        assert_eq!(g.degree(0), 2);
        let mut labels = g.edge_labels(0, 1);
        labels.sort_unstable();
        assert_eq!(labels, vec!["x", "y"]);
        assert!(validate(&g).is_ok());
    }

    #[test]
    fn test_add_edge_out_of_range() {
        let mut g = AdjGraph::new();
        g.add_node("a");
        assert!(g.add_edge(0, 1, "x").is_err());
    }

    #[test]
    fn test_validate_asymmetric() {
        assert!(validate(&Asymmetric).is_err());
    }

    #[test]
    fn test_iface_eq_ignores_entry_order() {
        let g1 = AdjGraph::from_parts(&["a", "b", "c"], &[(0, 1, "x"), (0, 2, "y")]).unwrap();
        let g2 = AdjGraph::from_parts(&["a", "b", "c"], &[(0, 2, "y"), (0, 1, "x")]).unwrap();
        assert!(g1.iface_eq(&g2));
        let g3 = AdjGraph::from_parts(&["a", "b", "c"], &[(0, 1, "y"), (0, 2, "y")]).unwrap();
        assert!(!g1.iface_eq(&g3));
    }

    #[test]
    fn test_connected_components() {
        let g = AdjGraph::from_parts(
            &["a", "b", "c", "d", "e"],
            &[(0, 2, "-"), (1, 3, "-"), (3, 4, "-")],
        )
        .unwrap();
        assert_eq!(connected_components(&g), vec![0, 1, 0, 1, 1]);
    }
}
