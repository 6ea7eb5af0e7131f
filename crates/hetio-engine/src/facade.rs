//! The query facade: one entry point for both query kinds over one backend.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use hetio_pattern::NodeId;

use crate::audit::{export_entry, AuditLogSink, ExportFormat, LogEntry, QueryKind};
use crate::backend::{BackendKind, QueryBackend};
use crate::config::EngineConfig;
use crate::error::{LogSinkError, QueryError, QueryResult, StoreResult};
use crate::result::{
    DiseaseReport, ExecutionStats, QueryOutcome, QueryRequest, QueryResponse, Treatments,
};

/// A normalized result the facade can log.
trait Answer {
    /// Audit payload, or `None` if the outcome is not logged.
    fn audit_payload(&self) -> Option<Value>;
}

impl Answer for DiseaseReport {
    fn audit_payload(&self) -> Option<Value> {
        self.info().map(|info| info.log_payload())
    }
}

impl Answer for Treatments {
    fn audit_payload(&self) -> Option<Value> {
        Some(self.log_payload())
    }
}

/// Executes disease lookups and repurposing queries against one backend.
///
/// The store and the audit sink are injected at construction. Successful
/// queries are appended to the sink; a failed append is returned as a
/// warning next to the still-valid result. Store failures abort the query
/// and nothing is logged. Every query reads the backend afresh; the facade
/// keeps no state between queries besides the injected sink.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use hetio_engine::{
///     Edge, IndexedGraph, MemoryAuditLog, Node, QueryFacade, TraversalBackend,
/// };
/// use hetio_pattern::{Metaedge, NodeKind};
///
/// let graph = IndexedGraph::from_parts(
///     vec![
///         Node::new("D1", NodeKind::Disease, "Asthma"),
///         Node::new("C1", NodeKind::Compound, "Aspirin"),
///     ],
///     vec![Edge::new("C1", Metaedge::CtD, "D1")],
/// );
/// let log = Arc::new(MemoryAuditLog::new());
/// let facade = QueryFacade::new(TraversalBackend::new(graph).unwrap(), log.clone());
///
/// let outcome = facade.disease_info("D1").unwrap();
/// assert_eq!(outcome.result.info().unwrap().drug_names(), vec!["Aspirin"]);
/// assert_eq!(log.len(), 1);
/// ```
pub struct QueryFacade {
    backend: Box<dyn QueryBackend>,
    audit: Arc<dyn AuditLogSink>,
    config: EngineConfig,
}

impl QueryFacade {
    /// Creates a facade with the default configuration.
    pub fn new(backend: impl QueryBackend + 'static, audit: Arc<dyn AuditLogSink>) -> Self {
        Self::with_config(backend, audit, EngineConfig::default())
    }

    /// Creates a facade with custom configuration.
    pub fn with_config(
        backend: impl QueryBackend + 'static,
        audit: Arc<dyn AuditLogSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            backend: Box::new(backend),
            audit,
            config,
        }
    }

    /// The formulation of the wrapped backend.
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sorted ids of every Disease node.
    pub fn disease_ids(&self) -> QueryResult<Vec<NodeId>> {
        Ok(self.backend.disease_ids()?)
    }

    /// Disease ids containing `term`, ignoring case. An empty term matches all.
    pub fn search_disease_ids(&self, term: &str) -> QueryResult<Vec<NodeId>> {
        let term = term.to_lowercase();
        Ok(self
            .disease_ids()?
            .into_iter()
            .filter(|id| id.to_lowercase().contains(&term))
            .collect())
    }

    /// Drugs, genes and anatomy related to a disease.
    ///
    /// The id is trimmed; a blank id fails with
    /// [`QueryError::InvalidInput`] before the store is touched. An unknown id
    /// yields [`DiseaseReport::NotFound`] and is not logged.
    pub fn disease_info(&self, disease_id: &str) -> QueryResult<QueryOutcome<DiseaseReport>> {
        let disease_id = disease_id.trim();
        if disease_id.is_empty() {
            return Err(QueryError::InvalidInput("disease id is required".to_string()));
        }
        self.run(QueryKind::DiseaseInfo, |backend| {
            backend.disease_info(disease_id)
        })
    }

    /// Repurposing candidates over the whole graph.
    pub fn new_treatments(&self) -> QueryResult<QueryOutcome<Treatments>> {
        let parallel = self.config.parallel;
        self.run(QueryKind::NewTreatments, |backend| {
            backend.new_treatments(parallel)
        })
    }

    /// Executes a request of either kind.
    pub fn execute(&self, request: &QueryRequest) -> QueryResult<QueryOutcome<QueryResponse>> {
        match request {
            QueryRequest::DiseaseInfo { disease_id } => Ok(self
                .disease_info(disease_id)?
                .map(QueryResponse::DiseaseInfo)),
            QueryRequest::NewTreatments => {
                Ok(self.new_treatments()?.map(QueryResponse::NewTreatments))
            }
        }
    }

    /// The newest audit record, if any.
    pub fn most_recent_log(&self) -> Result<Option<LogEntry>, LogSinkError> {
        self.audit.most_recent()
    }

    /// Writes the newest audit record to `path`. Returns the exported record,
    /// or `None` (writing nothing) when the log is empty.
    pub fn export_latest(
        &self,
        path: impl AsRef<Path>,
        format: ExportFormat,
    ) -> Result<Option<LogEntry>, LogSinkError> {
        let Some(entry) = self.audit.most_recent()? else {
            return Ok(None);
        };
        export_entry(&entry, path, format)?;
        Ok(Some(entry))
    }

    fn run<T: Answer>(
        &self,
        kind: QueryKind,
        compute: impl FnOnce(&dyn QueryBackend) -> StoreResult<(T, usize)>,
    ) -> QueryResult<QueryOutcome<T>> {
        let start = Instant::now();
        let (result, edges_examined) = compute(self.backend.as_ref()).map_err(|err| {
            warn!(query = %kind, backend = %self.backend.kind(), error = %err, "query failed");
            QueryError::from(err)
        })?;

        let warnings = self.record(kind, &result);
        let stats = ExecutionStats::new(start.elapsed(), edges_examined);
        info!(
            query = %kind,
            backend = %self.backend.kind(),
            store = self.backend.store_name(),
            edges_examined,
            duration_us = stats.duration.as_micros() as u64,
            "query finished"
        );

        Ok(QueryOutcome {
            result,
            stats,
            warnings,
        })
    }

    fn record<T: Answer>(&self, kind: QueryKind, result: &T) -> Vec<LogSinkError> {
        if !self.config.audit {
            return Vec::new();
        }
        let Some(payload) = result.audit_payload() else {
            return Vec::new();
        };
        match self.audit.append(kind, payload, Utc::now()) {
            Ok(()) => Vec::new(),
            Err(err) => {
                warn!(query = %kind, error = %err, "audit log append failed");
                vec![err]
            }
        }
    }
}

impl std::fmt::Debug for QueryFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryFacade")
            .field("backend", &self.backend.kind())
            .field("config", &self.config)
            .finish()
    }
}
