//! Minimal payload for the reserved `graph` tag.
//!
//! The tag occupies a slot in every dispatch matrix but no binary operator
//! defines semantics for it; the payload exists so the tag has a real
//! inhabitant with construction, identity and display.

use std::fmt;

/// Labeled nodes plus directed edges between node indexes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Graph {
    nodes: Vec<String>,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its index.
    pub fn add_node(&mut self, label: impl Into<String>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(label.into());
        index
    }

    /// Add a directed edge. Returns false if either endpoint is out of
    /// range.
    pub fn add_edge(&mut self, from: usize, to: usize) -> bool {
        if from >= self.nodes.len() || to >= self.nodes.len() {
            return false;
        }
        self.edges.push((from, to));
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// A graph with no nodes is falsy.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<graph {} nodes, {} edges>",
            self.nodes.len(),
            self.edges.len()
        )
    }
}
