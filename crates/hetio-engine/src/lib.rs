//! # hetio-engine
//!
//! Disease lookup and drug-repurposing inference over the HetioNet
//! biomedical knowledge graph.
//!
//! The engine answers two queries:
//!
//! - **disease_info**: the compounds treating or palliating a disease, the
//!   genes it regulates or is associated with, and the anatomy it localizes to.
//! - **new_treatments**: compounds with no existing treatment edge whose
//!   regulation of some gene opposes an anatomy's regulation of that gene,
//!   where the gene is also regulated by a disease.
//!
//! Each query has two formulations that return byte-identical normalized
//! results:
//!
//! - **traversal**, for native graph engines ([`GraphEngine`]): hop and path
//!   patterns from [`hetio_pattern`] are evaluated by following adjacency.
//! - **join**, for any store ([`GraphStore`]), including document databases
//!   without joins: flat scans plus in-memory indexes.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use hetio_engine::{
//!     Edge, JoinBackend, MemoryAuditLog, MemoryDocumentStore, Node, QueryFacade,
//! };
//! use hetio_pattern::{Metaedge, NodeKind};
//!
//! let store = MemoryDocumentStore::from_parts(
//!     vec![
//!         Node::new("C2", NodeKind::Compound, "Caffeine"),
//!         Node::new("G2", NodeKind::Gene, "ADORA2A"),
//!         Node::new("A2", NodeKind::Anatomy, "brain"),
//!         Node::new("D2", NodeKind::Disease, "migraine"),
//!     ],
//!     vec![
//!         Edge::new("C2", Metaedge::CuG, "G2"),
//!         Edge::new("A2", Metaedge::AdG, "G2"),
//!         Edge::new("D2", Metaedge::DuG, "G2"),
//!     ],
//! );
//!
//! let facade = QueryFacade::new(JoinBackend::new(store), Arc::new(MemoryAuditLog::new()));
//! let outcome = facade.new_treatments().unwrap();
//! assert!(outcome.result.contains("C2"));
//! ```
//!
//! ## With Configuration
//!
//! ```ignore
//! use hetio_engine::{EngineConfig, QueryFacade};
//!
//! let config = EngineConfig::builder()
//!     .with_parallel(true)
//!     .with_audit(false)
//!     .build();
//!
//! let facade = QueryFacade::with_config(backend, audit, config);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Runs the join formulation's per-compound check on rayon
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        hetio-engine                          │
//! │                                                              │
//! │  QueryFacade                                                 │
//! │  ├── validate input                                          │
//! │  ├── dispatch to Box<dyn QueryBackend>                       │
//! │  │   ├── TraversalBackend<E: GraphEngine>  (path patterns)   │
//! │  │   └── JoinBackend<S: GraphStore>        (flat scans)      │
//! │  ├── append to Arc<dyn AuditLogSink>                         │
//! │  └── return QueryOutcome with stats and warnings             │
//! │                                                              │
//! │  Stores:                                                     │
//! │  ├── IndexedGraph        - adjacency-indexed graph engine    │
//! │  └── MemoryDocumentStore - node/edge document collections    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod audit;
mod backend;
mod config;
mod document;
mod error;
mod facade;
mod graph;
mod lookup;
mod model;
mod repurpose;
mod result;
mod traits;

// Public re-exports
pub use audit::{
    export_entry, AuditLogSink, ExportFormat, LogEntry, MemoryAuditLog, QueryKind,
};
pub use backend::{BackendKind, JoinBackend, QueryBackend, TraversalBackend};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use document::{EdgeDocument, MemoryDocumentStore, NodeDocument};
pub use error::{LogSinkError, QueryError, QueryResult, StoreError, StoreResult};
pub use facade::QueryFacade;
pub use graph::IndexedGraph;
pub use lookup::{
    disease_ids, lookup_by_join, lookup_by_traversal, DiseasePatterns, LookupOutput,
};
pub use model::{Edge, EdgeFilter, Node, NodeRef};
pub use repurpose::{
    infer_by_join, infer_by_traversal, opposes, DirectionSet, InferenceOutput, RegulationIndex,
    RepurposingPatterns,
};
pub use result::{
    DiseaseInfo, DiseaseReport, ExecutionStats, QueryOutcome, QueryRequest, QueryResponse,
    Treatments,
};
pub use traits::{GraphEngine, GraphStore, HopMatch, PathMatch};
