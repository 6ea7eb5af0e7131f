//! Normalized query result types shared by every backend.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use hetio_pattern::NodeId;

use crate::error::LogSinkError;
use crate::model::{Node, NodeRef};

/// Drugs, genes and anatomy related to one disease.
///
/// Each list is deduplicated by node id and ordered by (name, id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    /// Queried disease id.
    pub disease_id: NodeId,
    /// Disease display name.
    pub name: String,
    /// Compounds treating or palliating the disease.
    pub drugs: Vec<NodeRef>,
    /// Genes the disease regulates or is associated with.
    pub genes: Vec<NodeRef>,
    /// Anatomy the disease localizes to.
    pub anatomy: Vec<NodeRef>,
}

impl DiseaseInfo {
    /// Names of the related drugs.
    pub fn drug_names(&self) -> Vec<&str> {
        names(&self.drugs)
    }

    /// Names of the related genes.
    pub fn gene_names(&self) -> Vec<&str> {
        names(&self.genes)
    }

    /// Names of the related anatomy.
    pub fn anatomy_names(&self) -> Vec<&str> {
        names(&self.anatomy)
    }

    /// Audit log payload: the disease name and the three name lists.
    pub fn log_payload(&self) -> Value {
        json!({
            "disease": self.name,
            "drugs": self.drug_names(),
            "genes": self.gene_names(),
            "anatomies": self.anatomy_names(),
        })
    }
}

fn names(refs: &[NodeRef]) -> Vec<&str> {
    refs.iter().map(|r| r.name.as_str()).collect()
}

impl fmt::Display for DiseaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Disease Name: {}", self.name)?;
        writeln!(f)?;
        for (label, refs) in [
            ("Drugs", &self.drugs),
            ("Genes", &self.genes),
            ("Anatomy Locations", &self.anatomy),
        ] {
            writeln!(f, "{}:", label)?;
            if refs.is_empty() {
                writeln!(f, "   - None")?;
            }
            for r in refs {
                writeln!(f, "   - {}", r.name)?;
            }
        }
        Ok(())
    }
}

/// Outcome of a disease lookup. An unknown id is a result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiseaseReport {
    /// The disease exists.
    Found(DiseaseInfo),
    /// No Disease node has this id.
    NotFound {
        /// Queried disease id.
        disease_id: NodeId,
    },
}

impl DiseaseReport {
    /// Returns the info if the disease was found.
    pub fn info(&self) -> Option<&DiseaseInfo> {
        match self {
            DiseaseReport::Found(info) => Some(info),
            DiseaseReport::NotFound { .. } => None,
        }
    }

    /// Returns true if no disease matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiseaseReport::NotFound { .. })
    }
}

/// Repurposing candidates, ordered by (name, id) without duplicate ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatments {
    /// Candidate compounds.
    pub candidates: Vec<NodeRef>,
}

impl Treatments {
    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if no compound qualified.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Checks whether a compound id is among the candidates.
    pub fn contains(&self, compound_id: &str) -> bool {
        self.candidates.iter().any(|c| c.id == compound_id)
    }

    /// Audit log payload: the list of `{"id", "name"}` pairs.
    pub fn log_payload(&self) -> Value {
        Value::Array(
            self.candidates
                .iter()
                .map(|c| json!({ "id": c.id, "name": c.name }))
                .collect(),
        )
    }
}

impl fmt::Display for Treatments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No new treatments found.");
        }
        writeln!(f, "Potential New Treatments:")?;
        writeln!(f, "{}", "-".repeat(50))?;
        for c in &self.candidates {
            writeln!(f, "{} ({})", c.name, c.id)?;
        }
        Ok(())
    }
}

/// A logical query, independent of backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRequest {
    /// Related drugs, genes and anatomy of one disease.
    DiseaseInfo {
        /// Disease id as entered by the caller.
        disease_id: String,
    },
    /// Repurposing candidates over the whole graph.
    NewTreatments,
}

/// The normalized response to a [`QueryRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryResponse {
    /// Response to a disease lookup.
    DiseaseInfo(DiseaseReport),
    /// Response to a repurposing query.
    NewTreatments(Treatments),
}

/// Statistics from one query execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Total execution duration.
    pub duration: Duration,
    /// Number of edges read from the store.
    pub edges_examined: usize,
}

impl ExecutionStats {
    /// Creates new execution stats.
    pub fn new(duration: Duration, edges_examined: usize) -> Self {
        Self {
            duration,
            edges_examined,
        }
    }
}

/// A successful query result with its stats and non-fatal log warnings.
#[derive(Debug, Clone)]
pub struct QueryOutcome<T> {
    /// The normalized result.
    pub result: T,
    /// Execution statistics.
    pub stats: ExecutionStats,
    /// Audit log failures. The result is valid regardless.
    pub warnings: Vec<LogSinkError>,
}

impl<T> QueryOutcome<T> {
    /// Transforms the result, keeping stats and warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        QueryOutcome {
            result: f(self.result),
            stats: self.stats,
            warnings: self.warnings,
        }
    }
}

/// Deduplicates nodes by id and orders them by (name, id).
pub(crate) fn normalize_refs(nodes: impl IntoIterator<Item = Node>) -> Vec<NodeRef> {
    let unique: BTreeMap<NodeId, String> = nodes.into_iter().map(|n| (n.id, n.name)).collect();
    let mut refs: Vec<NodeRef> = unique
        .into_iter()
        .map(|(id, name)| NodeRef { id, name })
        .collect();
    refs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    refs
}
