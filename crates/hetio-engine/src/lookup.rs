//! Disease lookup: one disease expanded to its drugs, genes and anatomy.
//!
//! Two formulations with identical results:
//!
//! - [`lookup_by_traversal`] binds the disease id into three hop patterns and
//!   lets the graph engine follow adjacency from the disease node.
//! - [`lookup_by_join`] issues three flat edge scans and resolves the far
//!   endpoints with one batched node lookup each.
//!
//! Either way, far endpoints whose stored kind does not fit the category are
//! dropped, and each category is normalized by [`normalize_refs`].

use tracing::debug;

use hetio_pattern::{parse_hop, HopPattern, Metaedge, NodeId, NodeKind, PatternResult};

use crate::error::StoreResult;
use crate::model::{EdgeFilter, Node};
use crate::result::{normalize_refs, DiseaseInfo, DiseaseReport};
use crate::traits::{GraphEngine, GraphStore};

const DISEASE_PARAM: &str = "disease_id";
const DRUGS_PATTERN: &str = "(c:Compound)-[:CtD|CpD]->(d:Disease {id: $disease_id})";
const GENES_PATTERN: &str = "(g:Gene)<-[:DdG|DuG|DaG]-(d:Disease {id: $disease_id})";
const ANATOMY_PATTERN: &str = "(a:Anatomy)<-[:DlA]-(d:Disease {id: $disease_id})";

/// The parameterized hop patterns of a disease lookup.
#[derive(Debug, Clone)]
pub struct DiseasePatterns {
    drugs: HopPattern,
    genes: HopPattern,
    anatomy: HopPattern,
}

impl DiseasePatterns {
    /// Parses the lookup patterns.
    pub fn compile() -> PatternResult<Self> {
        Ok(Self {
            drugs: parse_hop(DRUGS_PATTERN)?,
            genes: parse_hop(GENES_PATTERN)?,
            anatomy: parse_hop(ANATOMY_PATTERN)?,
        })
    }
}

/// A lookup result plus the number of edges read to produce it.
pub type LookupOutput = (DiseaseReport, usize);

fn resolve_disease<S: GraphStore + ?Sized>(
    store: &S,
    disease_id: &str,
) -> StoreResult<Option<Node>> {
    Ok(store
        .get_node(disease_id)?
        .filter(|node| node.kind == NodeKind::Disease))
}

fn not_found(disease_id: &str) -> LookupOutput {
    debug!(disease_id, "disease not found");
    (
        DiseaseReport::NotFound {
            disease_id: disease_id.to_string(),
        },
        0,
    )
}

/// Disease lookup on a native graph engine.
pub fn lookup_by_traversal(
    engine: &dyn GraphEngine,
    patterns: &DiseasePatterns,
    disease_id: &str,
) -> StoreResult<LookupOutput> {
    let Some(disease) = resolve_disease(engine, disease_id)? else {
        return Ok(not_found(disease_id));
    };

    let drugs = engine.match_hop(&patterns.drugs.bind(DISEASE_PARAM, disease_id))?;
    let genes = engine.match_hop(&patterns.genes.bind(DISEASE_PARAM, disease_id))?;
    let anatomy = engine.match_hop(&patterns.anatomy.bind(DISEASE_PARAM, disease_id))?;
    let examined = drugs.len() + genes.len() + anatomy.len();

    let info = DiseaseInfo {
        disease_id: disease.id,
        name: disease.name,
        drugs: normalize_refs(drugs.into_iter().map(|m| m.source)),
        genes: normalize_refs(genes.into_iter().map(|m| m.target)),
        anatomy: normalize_refs(anatomy.into_iter().map(|m| m.target)),
    };
    Ok((DiseaseReport::Found(info), examined))
}

/// Disease lookup by flat scans and in-memory joins.
pub fn lookup_by_join(store: &dyn GraphStore, disease_id: &str) -> StoreResult<LookupOutput> {
    let Some(disease) = resolve_disease(store, disease_id)? else {
        return Ok(not_found(disease_id));
    };

    let drug_edges = store.find_edges(
        &EdgeFilter::metaedges(&Metaedge::TREATMENT).with_target(disease_id),
    )?;
    let gene_edges = store.find_edges(
        &EdgeFilter::metaedges(&Metaedge::DISEASE_GENE).with_source(disease_id),
    )?;
    let anatomy_edges =
        store.find_edges(&EdgeFilter::metaedges(&[Metaedge::DlA]).with_source(disease_id))?;
    let examined = drug_edges.len() + gene_edges.len() + anatomy_edges.len();

    let drug_ids: Vec<NodeId> = drug_edges.into_iter().map(|e| e.source).collect();
    let gene_ids: Vec<NodeId> = gene_edges.into_iter().map(|e| e.target).collect();
    let anatomy_ids: Vec<NodeId> = anatomy_edges.into_iter().map(|e| e.target).collect();

    let info = DiseaseInfo {
        disease_id: disease.id,
        name: disease.name,
        drugs: normalize_refs(resolve_of_kind(store, drug_ids, NodeKind::Compound)?),
        genes: normalize_refs(resolve_of_kind(store, gene_ids, NodeKind::Gene)?),
        anatomy: normalize_refs(resolve_of_kind(store, anatomy_ids, NodeKind::Anatomy)?),
    };
    Ok((DiseaseReport::Found(info), examined))
}

fn resolve_of_kind(
    store: &dyn GraphStore,
    mut ids: Vec<NodeId>,
    kind: NodeKind,
) -> StoreResult<Vec<Node>> {
    ids.sort_unstable();
    ids.dedup();
    Ok(store
        .get_nodes(&ids)?
        .into_iter()
        .filter(|node| node.kind == kind)
        .collect())
}

/// Sorted ids of every Disease node.
pub fn disease_ids(store: &dyn GraphStore) -> StoreResult<Vec<NodeId>> {
    let mut ids = store.find_nodes_by_kind(NodeKind::Disease)?;
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}
