//! Graph data model: nodes, edges and edge scan filters.

use serde::{Deserialize, Serialize};

use hetio_pattern::{Metaedge, NodeId, NodeKind};

/// A node of the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Globally unique identifier.
    pub id: NodeId,
    /// Stored node kind.
    pub kind: NodeKind,
    /// Display name.
    pub name: String,
}

impl Node {
    /// Creates a node.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
        }
    }

    /// Returns the (id, name) reference for result lists.
    pub fn to_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// A directed, typed edge. Identity is the (source, target, metaedge) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Relationship type.
    pub metaedge: Metaedge,
}

impl Edge {
    /// Creates an edge.
    pub fn new(source: impl Into<NodeId>, metaedge: Metaedge, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            metaedge,
        }
    }
}

/// An (id, name) pair as reported in query results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    /// Node id.
    pub id: NodeId,
    /// Display name.
    pub name: String,
}

/// Filter for flat edge scans. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeFilter {
    /// Required source id.
    pub source: Option<NodeId>,
    /// Required target id.
    pub target: Option<NodeId>,
    /// Accepted metaedges (None = any).
    pub metaedge_in: Option<Vec<Metaedge>>,
}

impl EdgeFilter {
    /// Creates a filter matching every edge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches edges of the given types.
    pub fn metaedges(metaedges: &[Metaedge]) -> Self {
        Self::new().with_metaedges(metaedges)
    }

    /// Requires the edge source.
    pub fn with_source(mut self, source: impl Into<NodeId>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Requires the edge target.
    pub fn with_target(mut self, target: impl Into<NodeId>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Restricts the accepted metaedges.
    pub fn with_metaedges(mut self, metaedges: &[Metaedge]) -> Self {
        self.metaedge_in = Some(metaedges.to_vec());
        self
    }

    /// Checks an edge against the filter.
    pub fn matches(&self, edge: &Edge) -> bool {
        self.source.as_ref().map_or(true, |s| *s == edge.source)
            && self.target.as_ref().map_or(true, |t| *t == edge.target)
            && self
                .metaedge_in
                .as_ref()
                .map_or(true, |types| types.contains(&edge.metaedge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_filter_matches() {
        let edge = Edge::new("Compound::DB01", Metaedge::CtD, "Disease::DOID:1");

        assert!(EdgeFilter::new().matches(&edge));
        assert!(EdgeFilter::metaedges(&Metaedge::TREATMENT).matches(&edge));
        assert!(!EdgeFilter::metaedges(&[Metaedge::DlA]).matches(&edge));
        assert!(EdgeFilter::new()
            .with_target("Disease::DOID:1")
            .with_metaedges(&[Metaedge::CtD])
            .matches(&edge));
        assert!(!EdgeFilter::new().with_source("Disease::DOID:1").matches(&edge));
    }

    #[test]
    fn test_empty_metaedge_list_matches_nothing() {
        let edge = Edge::new("a", Metaedge::GiG, "b");
        assert!(!EdgeFilter::metaedges(&[]).matches(&edge));
    }

    #[test]
    fn test_node_to_ref() {
        let node = Node::new("Gene::1", NodeKind::Gene, "A1BG");
        assert_eq!(
            node.to_ref(),
            NodeRef {
                id: "Gene::1".to_string(),
                name: "A1BG".to_string()
            }
        );
    }
}
