//! Repurposing inference: untreated compounds that counteract a
//! disease-relevant, anatomy-relevant gene perturbation.
//!
//! A compound qualifies when it is not the source of any `CtD`/`CpD` edge
//! and regulates at least one gene such that
//!
//! - some Disease node up- or down-regulates the gene (`DuG`/`DdG`; `DaG`
//!   association does not count), and
//! - some Anatomy node regulates the gene in the direction opposite to the
//!   compound (`CuG` needs `AdG`, `CdG` needs `AuG`).
//!
//! Gene signals are aggregated over the whole graph, not per disease.
//! Results are deduplicated and ordered by (name, id).
//!
//! # Formulations
//!
//! - [`infer_by_traversal`] hands the engine one path pattern per direction
//!   pairing. The exclusion is a `WHERE NOT` condition on the compound and
//!   the disease signal a `WHERE` condition on the gene, so the engine walks
//!   its adjacency and returns bound compounds only.
//! - [`infer_by_join`] builds a [`RegulationIndex`] from flat scans (one
//!   O(edges) pass per concern) and probes it per compound.

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use tracing::debug;

use hetio_pattern::{parse_path, Metaedge, NodeId, NodeKind, PathPattern, PatternResult, Regulation};

use crate::error::StoreResult;
use crate::model::{EdgeFilter, Node};
use crate::result::{normalize_refs, Treatments};
use crate::traits::{GraphEngine, GraphStore};

/// Set of regulation directions recorded on one gene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionSet {
    up: bool,
    down: bool,
}

impl DirectionSet {
    /// Records a direction.
    pub fn insert(&mut self, direction: Regulation) {
        match direction {
            Regulation::Up => self.up = true,
            Regulation::Down => self.down = true,
        }
    }

    /// Checks for a direction.
    pub fn contains(&self, direction: Regulation) -> bool {
        match direction {
            Regulation::Up => self.up,
            Regulation::Down => self.down,
        }
    }

    /// Returns true if no direction was recorded.
    pub fn is_empty(&self) -> bool {
        !self.up && !self.down
    }
}

impl FromIterator<Regulation> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Regulation>>(iter: I) -> Self {
        let mut set = DirectionSet::default();
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

/// The candidate condition for one (compound effect, gene) pair.
pub fn opposes(compound_effect: Regulation, anatomy: DirectionSet, disease: DirectionSet) -> bool {
    !disease.is_empty() && anatomy.contains(compound_effect.opposite())
}

/// A repurposing result plus the number of edges read to produce it.
pub type InferenceOutput = (Treatments, usize);

// =============================================================================
// Join formulation
// =============================================================================

/// Indexed lookups for the join formulation, built once per query.
#[derive(Debug, Default)]
pub struct RegulationIndex {
    treated: HashSet<NodeId>,
    compound_genes: BTreeMap<NodeId, Vec<(NodeId, Regulation)>>,
    anatomy: HashMap<NodeId, DirectionSet>,
    disease: HashMap<NodeId, DirectionSet>,
    edges_examined: usize,
}

impl RegulationIndex {
    /// Builds the index from flat scans of the store.
    ///
    /// Edge endpoints are checked against the stored node kinds, so an edge
    /// whose endpoints do not exist or have the wrong kind is ignored.
    pub fn build(store: &dyn GraphStore) -> StoreResult<Self> {
        let compounds = kind_set(store, NodeKind::Compound)?;
        let genes = kind_set(store, NodeKind::Gene)?;
        let anatomy = kind_set(store, NodeKind::Anatomy)?;
        let diseases = kind_set(store, NodeKind::Disease)?;

        let mut index = RegulationIndex::default();

        let treatment_edges = store.find_edges(&EdgeFilter::metaedges(&Metaedge::TREATMENT))?;
        index.edges_examined += treatment_edges.len();
        for edge in treatment_edges {
            if compounds.contains(&edge.source) && diseases.contains(&edge.target) {
                index.treated.insert(edge.source);
            }
        }

        let regulatory: Vec<Metaedge> = Metaedge::COMPOUND_REGULATION
            .into_iter()
            .chain(Metaedge::ANATOMY_REGULATION)
            .chain(Metaedge::DISEASE_REGULATION)
            .collect();
        let regulation_edges = store.find_edges(&EdgeFilter::metaedges(&regulatory))?;
        index.edges_examined += regulation_edges.len();

        for edge in regulation_edges {
            let Some(direction) = edge.metaedge.regulation() else {
                continue;
            };
            if !genes.contains(&edge.target) {
                continue;
            }
            match edge.metaedge.source_kind() {
                NodeKind::Compound if compounds.contains(&edge.source) => {
                    index
                        .compound_genes
                        .entry(edge.source)
                        .or_default()
                        .push((edge.target, direction));
                }
                NodeKind::Anatomy if anatomy.contains(&edge.source) => {
                    index.anatomy.entry(edge.target).or_default().insert(direction);
                }
                NodeKind::Disease if diseases.contains(&edge.source) => {
                    index.disease.entry(edge.target).or_default().insert(direction);
                }
                _ => {}
            }
        }

        debug!(
            treated = index.treated.len(),
            compounds = index.compound_genes.len(),
            anatomy_genes = index.anatomy.len(),
            disease_genes = index.disease.len(),
            "regulation index built"
        );
        Ok(index)
    }

    /// Returns true if the compound already treats or palliates a disease.
    pub fn is_treated(&self, compound_id: &str) -> bool {
        self.treated.contains(compound_id)
    }

    /// Directions Anatomy nodes exert on the gene.
    pub fn anatomy_directions(&self, gene_id: &str) -> DirectionSet {
        self.anatomy.get(gene_id).copied().unwrap_or_default()
    }

    /// Directions Disease nodes exert on the gene.
    pub fn disease_directions(&self, gene_id: &str) -> DirectionSet {
        self.disease.get(gene_id).copied().unwrap_or_default()
    }

    /// Checks one compound against the candidate condition.
    pub fn qualifies(&self, compound_id: &str) -> bool {
        if self.is_treated(compound_id) {
            return false;
        }
        self.compound_genes.get(compound_id).is_some_and(|genes| {
            genes.iter().any(|(gene, effect)| {
                opposes(
                    *effect,
                    self.anatomy_directions(gene),
                    self.disease_directions(gene),
                )
            })
        })
    }

    /// Ids of every qualifying compound, in id order.
    pub fn candidate_ids(&self, parallel: bool) -> Vec<NodeId> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            if parallel {
                let compounds: Vec<&NodeId> = self.compound_genes.keys().collect();
                return compounds
                    .into_par_iter()
                    .filter(|id| self.qualifies(id))
                    .cloned()
                    .collect();
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        self.compound_genes
            .keys()
            .filter(|id| self.qualifies(id))
            .cloned()
            .collect()
    }

    /// Number of edges read while building the index.
    pub fn edges_examined(&self) -> usize {
        self.edges_examined
    }
}

fn kind_set(store: &dyn GraphStore, kind: NodeKind) -> StoreResult<HashSet<NodeId>> {
    Ok(store.find_nodes_by_kind(kind)?.into_iter().collect())
}

/// Repurposing inference by flat scans and in-memory joins.
pub fn infer_by_join(store: &dyn GraphStore, parallel: bool) -> StoreResult<InferenceOutput> {
    let index = RegulationIndex::build(store)?;
    let ids = index.candidate_ids(parallel);
    let nodes: Vec<Node> = store
        .get_nodes(&ids)?
        .into_iter()
        .filter(|node| node.kind == NodeKind::Compound)
        .collect();

    let treatments = Treatments {
        candidates: normalize_refs(nodes),
    };
    Ok((treatments, index.edges_examined()))
}

// =============================================================================
// Traversal formulation
// =============================================================================

/// One path per direction pairing: `CuG` needs `AdG`, `CdG` needs `AuG`.
const CANDIDATE_PATTERNS: [&str; 2] = [
    "(c:Compound)-[:CuG]->(g:Gene)<-[:AdG]-(:Anatomy) \
     WHERE NOT (c)-[:CtD|CpD]->(:Disease) AND (g)<-[:DuG|DdG]-(:Disease)",
    "(c:Compound)-[:CdG]->(g:Gene)<-[:AuG]-(:Anatomy) \
     WHERE NOT (c)-[:CtD|CpD]->(:Disease) AND (g)<-[:DuG|DdG]-(:Disease)",
];

/// The path patterns of the traversal formulation.
#[derive(Debug, Clone)]
pub struct RepurposingPatterns {
    paths: Vec<PathPattern>,
}

impl RepurposingPatterns {
    /// Parses the inference patterns.
    pub fn compile() -> PatternResult<Self> {
        let paths = CANDIDATE_PATTERNS
            .iter()
            .map(|text| parse_path(text))
            .collect::<PatternResult<Vec<_>>>()?;
        Ok(Self { paths })
    }

    /// The compiled paths; the compound is bound at position 0.
    pub fn paths(&self) -> &[PathPattern] {
        &self.paths
    }
}

/// Repurposing inference on a native graph engine.
///
/// The engine evaluates the whole candidate condition, so no edge list
/// crosses the seam; only the bound compounds come back.
pub fn infer_by_traversal(
    engine: &dyn GraphEngine,
    patterns: &RepurposingPatterns,
) -> StoreResult<InferenceOutput> {
    let mut examined = 0;
    let mut candidates: HashMap<NodeId, Node> = HashMap::new();

    for path in patterns.paths() {
        let matches = engine.match_path(path)?;
        examined += matches.iter().map(|m| m.metaedges.len()).sum::<usize>();
        for matched in matches {
            if let Some(compound) = matched.nodes.into_iter().next() {
                candidates.entry(compound.id.clone()).or_insert(compound);
            }
        }
    }

    debug!(
        paths = patterns.paths().len(),
        candidates = candidates.len(),
        "traversal inference finished"
    );
    let treatments = Treatments {
        candidates: normalize_refs(candidates.into_values().collect::<Vec<_>>()),
    };
    Ok((treatments, examined))
}
