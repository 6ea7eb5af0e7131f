//! Store traits at the engine's backend seam.
//!
//! [`GraphStore`] is the read-only adapter contract every backend fulfils:
//! kind scans, node lookups and flat edge scans. [`GraphEngine`] extends it
//! for native graph backends that evaluate [`HopPattern`]s and
//! [`PathPattern`]s directly.
//!
//! Implementations for remote databases live in the consuming application;
//! this crate ships the in-memory [`IndexedGraph`](crate::IndexedGraph) and
//! [`MemoryDocumentStore`](crate::MemoryDocumentStore).
//!
//! # Example: a remote graph engine
//!
//! ```ignore
//! use hetio_engine::{GraphEngine, GraphStore, HopMatch, PathMatch, StoreResult};
//! use hetio_pattern::{HopPattern, PathPattern};
//!
//! impl GraphEngine for BoltClient {
//!     fn match_hop(&self, hop: &HopPattern) -> StoreResult<Vec<HopMatch>> {
//!         let cypher = format!("MATCH {} RETURN *", hop);
//!         self.run(&cypher).map_err(to_store_error)
//!     }
//!
//!     fn match_path(&self, path: &PathPattern) -> StoreResult<Vec<PathMatch>> {
//!         let cypher = format!("MATCH {} RETURN *", path);
//!         self.run(&cypher).map_err(to_store_error)
//!     }
//! }
//! ```

use hetio_pattern::{HopPattern, Metaedge, NodeId, NodeKind, PathPattern};

use crate::error::StoreResult;
use crate::model::{Edge, EdgeFilter, Node};

/// Read-only access to nodes and typed relationships.
///
/// Missing nodes are reported as `None` or skipped, never as errors; store
/// errors mean the backend itself failed.
pub trait GraphStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend_name(&self) -> &str;

    /// Ids of all nodes of a kind.
    fn find_nodes_by_kind(&self, kind: NodeKind) -> StoreResult<Vec<NodeId>>;

    /// Looks up a single node.
    fn get_node(&self, id: &str) -> StoreResult<Option<Node>>;

    /// Flat scan of edges matching the filter.
    fn find_edges(&self, filter: &EdgeFilter) -> StoreResult<Vec<Edge>>;

    /// Resolves many ids at once. Missing ids are skipped.
    fn get_nodes(&self, ids: &[NodeId]) -> StoreResult<Vec<Node>> {
        let mut nodes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(node) = self.get_node(id)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }
}

/// One edge matched by a hop pattern, with both endpoints resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HopMatch {
    /// Edge source node.
    pub source: Node,
    /// Edge type.
    pub metaedge: Metaedge,
    /// Edge target node.
    pub target: Node,
}

/// One binding of a path pattern.
///
/// `nodes[i]` is bound to the path's `nodes[i]` pattern and `metaedges[i]`
/// is the type of the edge walked for `rels[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathMatch {
    /// Bound nodes in pattern order.
    pub nodes: Vec<Node>,
    /// Edge types walked, one per hop.
    pub metaedges: Vec<Metaedge>,
}

/// A native graph backend that evaluates relationship patterns itself.
pub trait GraphEngine: GraphStore {
    /// Returns every edge satisfying the hop's metaedge, kind and id
    /// constraints.
    ///
    /// Patterns with unbound parameters are rejected with
    /// [`StoreError::InvalidQuery`](crate::StoreError::InvalidQuery).
    fn match_hop(&self, hop: &HopPattern) -> StoreResult<Vec<HopMatch>>;

    /// Returns every binding of the path whose `WHERE` conditions hold.
    ///
    /// A condition holds when its hop has at least one match (none for
    /// `NOT`) with the path's variables fixed to their bound nodes.
    /// Unbound parameters are rejected like in [`match_hop`](Self::match_hop).
    fn match_path(&self, path: &PathPattern) -> StoreResult<Vec<PathMatch>>;
}
