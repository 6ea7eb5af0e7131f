//! In-memory document backend.
//!
//! Mirrors a document database holding HetioNet as two collections: nodes
//! keyed by `_id` and an unindexed edge collection. Only flat filtered scans
//! are offered; multi-hop joins are the caller's job.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use hetio_pattern::{Metaedge, NodeId, NodeKind};

use crate::error::StoreResult;
use crate::model::{Edge, EdgeFilter, Node};
use crate::traits::GraphStore;

/// A node document: `{"_id": ..., "name": ..., "kind": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDocument {
    /// Node id, stored as the document key.
    #[serde(rename = "_id")]
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
}

/// An edge document: `{"source": ..., "metaedge": ..., "target": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDocument {
    /// Source node id.
    pub source: NodeId,
    /// Relationship type code.
    pub metaedge: Metaedge,
    /// Target node id.
    pub target: NodeId,
}

impl From<NodeDocument> for Node {
    fn from(doc: NodeDocument) -> Self {
        Node::new(doc.id, doc.kind, doc.name)
    }
}

impl From<Node> for NodeDocument {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            name: node.name,
            kind: node.kind,
        }
    }
}

impl From<EdgeDocument> for Edge {
    fn from(doc: EdgeDocument) -> Self {
        Edge::new(doc.source, doc.metaedge, doc.target)
    }
}

/// Document store with a node collection and an edge collection.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    nodes: HashMap<NodeId, NodeDocument>,
    edges: Vec<EdgeDocument>,
}

impl MemoryDocumentStore {
    /// Builds the collections from graph nodes and edges.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        Self::from_documents(
            nodes.into_iter().map(NodeDocument::from),
            edges.into_iter().map(|e| EdgeDocument {
                source: e.source,
                metaedge: e.metaedge,
                target: e.target,
            }),
        )
    }

    /// Builds the collections from raw documents. Duplicate edge documents
    /// collapse into one; a repeated `_id` keeps the last document.
    pub fn from_documents(
        nodes: impl IntoIterator<Item = NodeDocument>,
        edges: impl IntoIterator<Item = EdgeDocument>,
    ) -> Self {
        let nodes: HashMap<NodeId, NodeDocument> =
            nodes.into_iter().map(|doc| (doc.id.clone(), doc)).collect();
        let unique: BTreeSet<Edge> = edges.into_iter().map(Edge::from).collect();
        let edges: Vec<EdgeDocument> = unique
            .into_iter()
            .map(|e| EdgeDocument {
                source: e.source,
                metaedge: e.metaedge,
                target: e.target,
            })
            .collect();

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "document collections loaded"
        );
        Self { nodes, edges }
    }

    /// Number of node documents.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edge documents.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl GraphStore for MemoryDocumentStore {
    fn backend_name(&self) -> &str {
        "document"
    }

    fn find_nodes_by_kind(&self, kind: NodeKind) -> StoreResult<Vec<NodeId>> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|doc| doc.kind == kind)
            .map(|doc| doc.id.clone())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn get_node(&self, id: &str) -> StoreResult<Option<Node>> {
        Ok(self.nodes.get(id).cloned().map(Node::from))
    }

    fn find_edges(&self, filter: &EdgeFilter) -> StoreResult<Vec<Edge>> {
        let edges: Vec<Edge> = self
            .edges
            .iter()
            .map(|doc| Edge::from(doc.clone()))
            .filter(|edge| filter.matches(edge))
            .collect();
        debug!(scanned = self.edges.len(), matched = edges.len(), "edge scan");
        Ok(edges)
    }
}
