//! Query backends: the evaluation strategy chosen at facade construction.
//!
//! A [`QueryBackend`] owns its store and answers both query kinds.
//! [`TraversalBackend`] wraps a [`GraphEngine`] and evaluates hop patterns;
//! [`JoinBackend`] wraps any [`GraphStore`] and joins flat scans in memory.
//! Both return the same normalized results for the same graph.

use std::fmt;

use hetio_pattern::NodeId;

use crate::error::{QueryResult, StoreResult};
use crate::lookup::{self, DiseasePatterns, LookupOutput};
use crate::repurpose::{self, InferenceOutput, RepurposingPatterns};
use crate::traits::{GraphEngine, GraphStore};

/// Which formulation a backend runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Native pattern evaluation on a graph engine.
    Traversal,
    /// Flat scans joined in memory.
    Join,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Traversal => write!(f, "traversal"),
            BackendKind::Join => write!(f, "join"),
        }
    }
}

/// A store plus the formulation used to query it.
pub trait QueryBackend: Send + Sync {
    /// The formulation this backend runs.
    fn kind(&self) -> BackendKind;

    /// Name of the underlying store.
    fn store_name(&self) -> &str;

    /// Sorted ids of every Disease node.
    fn disease_ids(&self) -> StoreResult<Vec<NodeId>>;

    /// Disease lookup for an already trimmed, non-empty id.
    fn disease_info(&self, disease_id: &str) -> StoreResult<LookupOutput>;

    /// Repurposing inference. `parallel` is a hint that only the join
    /// formulation uses.
    fn new_treatments(&self, parallel: bool) -> StoreResult<InferenceOutput>;
}

/// Backend evaluating hop patterns on a native graph engine.
pub struct TraversalBackend<E> {
    engine: E,
    disease: DiseasePatterns,
    repurposing: RepurposingPatterns,
}

impl<E: GraphEngine> TraversalBackend<E> {
    /// Wraps an engine and compiles the query patterns.
    pub fn new(engine: E) -> QueryResult<Self> {
        Ok(Self {
            engine,
            disease: DiseasePatterns::compile()?,
            repurposing: RepurposingPatterns::compile()?,
        })
    }
}

impl<E: GraphEngine> QueryBackend for TraversalBackend<E> {
    fn kind(&self) -> BackendKind {
        BackendKind::Traversal
    }

    fn store_name(&self) -> &str {
        self.engine.backend_name()
    }

    fn disease_ids(&self) -> StoreResult<Vec<NodeId>> {
        lookup::disease_ids(&self.engine)
    }

    fn disease_info(&self, disease_id: &str) -> StoreResult<LookupOutput> {
        lookup::lookup_by_traversal(&self.engine, &self.disease, disease_id)
    }

    fn new_treatments(&self, _parallel: bool) -> StoreResult<InferenceOutput> {
        repurpose::infer_by_traversal(&self.engine, &self.repurposing)
    }
}

/// Backend joining flat scans of any store in memory.
pub struct JoinBackend<S> {
    store: S,
}

impl<S: GraphStore> JoinBackend<S> {
    /// Wraps a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: GraphStore> QueryBackend for JoinBackend<S> {
    fn kind(&self) -> BackendKind {
        BackendKind::Join
    }

    fn store_name(&self) -> &str {
        self.store.backend_name()
    }

    fn disease_ids(&self) -> StoreResult<Vec<NodeId>> {
        lookup::disease_ids(&self.store)
    }

    fn disease_info(&self, disease_id: &str) -> StoreResult<LookupOutput> {
        lookup::lookup_by_join(&self.store, disease_id)
    }

    fn new_treatments(&self, parallel: bool) -> StoreResult<InferenceOutput> {
        repurpose::infer_by_join(&self.store, parallel)
    }
}
