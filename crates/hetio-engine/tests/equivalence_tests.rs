//! Cross-backend equivalence and repurposing properties.
//!
//! The fixture is a small HetioNet slice with the awkward cases mixed in:
//! duplicate edges, shared display names, association-only genes, edges whose
//! endpoints have the wrong kind and dangling endpoints.

use std::collections::HashSet;
use std::sync::Arc;

use hetio_engine::{
    infer_by_join, infer_by_traversal, lookup_by_join, lookup_by_traversal, DiseasePatterns,
    Edge, EngineConfig, IndexedGraph, JoinBackend, MemoryAuditLog, MemoryDocumentStore, Node,
    QueryFacade, RepurposingPatterns, TraversalBackend,
};
use hetio_pattern::{Metaedge, NodeKind};

fn fixture() -> (Vec<Node>, Vec<Edge>) {
    let nodes = vec![
        Node::new("Disease::DOID:2841", NodeKind::Disease, "asthma"),
        Node::new("Disease::DOID:1324", NodeKind::Disease, "lung cancer"),
        Node::new("Disease::DOID:9352", NodeKind::Disease, "type 2 diabetes mellitus"),
        Node::new("Compound::DB00001", NodeKind::Compound, "Lepirudin"),
        Node::new("Compound::DB00002", NodeKind::Compound, "Cetuximab"),
        Node::new("Compound::DB00003", NodeKind::Compound, "Dornase alfa"),
        Node::new("Compound::DB00004", NodeKind::Compound, "Denileukin diftitox"),
        // Same display name, different ids
        Node::new("Compound::DB00005", NodeKind::Compound, "Etanercept"),
        Node::new("Compound::DB00006", NodeKind::Compound, "Etanercept"),
        Node::new("Compound::DB00007", NodeKind::Compound, "Leuprolide"),
        Node::new("Gene::1", NodeKind::Gene, "A1BG"),
        Node::new("Gene::2", NodeKind::Gene, "A2M"),
        Node::new("Gene::3", NodeKind::Gene, "A2MP1"),
        Node::new("Gene::9", NodeKind::Gene, "NAT1"),
        Node::new("Anatomy::UBERON:0002048", NodeKind::Anatomy, "lung"),
        Node::new("Anatomy::UBERON:0000955", NodeKind::Anatomy, "brain"),
        Node::new("Symptom::D003371", NodeKind::Symptom, "Cough"),
        Node::new("Pathway::WP1", NodeKind::Pathway, "Glycolysis"),
    ];

    let edges = vec![
        // Treatments
        Edge::new("Compound::DB00001", Metaedge::CtD, "Disease::DOID:2841"),
        Edge::new("Compound::DB00002", Metaedge::CtD, "Disease::DOID:1324"),
        Edge::new("Compound::DB00002", Metaedge::CpD, "Disease::DOID:1324"),
        Edge::new("Compound::DB00003", Metaedge::CpD, "Disease::DOID:2841"),
        Edge::new("Compound::DB00003", Metaedge::CpD, "Disease::DOID:2841"),
        // Disease-gene
        Edge::new("Disease::DOID:2841", Metaedge::DuG, "Gene::1"),
        Edge::new("Disease::DOID:2841", Metaedge::DaG, "Gene::1"),
        Edge::new("Disease::DOID:2841", Metaedge::DaG, "Gene::3"),
        Edge::new("Disease::DOID:1324", Metaedge::DdG, "Gene::2"),
        Edge::new("Disease::DOID:9352", Metaedge::DaG, "Gene::9"),
        // Localization, including a wrong-kind and a dangling target
        Edge::new("Disease::DOID:2841", Metaedge::DlA, "Anatomy::UBERON:0002048"),
        Edge::new("Disease::DOID:2841", Metaedge::DlA, "Symptom::D003371"),
        Edge::new("Disease::DOID:1324", Metaedge::DlA, "Anatomy::UBERON:0002048"),
        Edge::new("Disease::DOID:1324", Metaedge::DlA, "Anatomy::UBERON:9999999"),
        Edge::new("Disease::DOID:2841", Metaedge::DpS, "Symptom::D003371"),
        // Anatomy regulation
        Edge::new("Anatomy::UBERON:0002048", Metaedge::AdG, "Gene::1"),
        Edge::new("Anatomy::UBERON:0000955", Metaedge::AuG, "Gene::2"),
        Edge::new("Anatomy::UBERON:0000955", Metaedge::AdG, "Gene::3"),
        Edge::new("Anatomy::UBERON:0000955", Metaedge::AuG, "Gene::9"),
        Edge::new("Anatomy::UBERON:0002048", Metaedge::AeG, "Gene::2"),
        // Compound regulation
        // Treated compound that would otherwise qualify via Gene::1
        Edge::new("Compound::DB00001", Metaedge::CuG, "Gene::1"),
        // Qualifies via Gene::1 (CuG vs AdG, DuG) and via Gene::2 (CdG vs AuG, DdG)
        Edge::new("Compound::DB00004", Metaedge::CuG, "Gene::1"),
        Edge::new("Compound::DB00004", Metaedge::CdG, "Gene::2"),
        // Qualifies via Gene::2
        Edge::new("Compound::DB00005", Metaedge::CdG, "Gene::2"),
        Edge::new("Compound::DB00006", Metaedge::CdG, "Gene::2"),
        Edge::new("Compound::DB00006", Metaedge::CdG, "Gene::2"),
        // Same direction as anatomy: does not qualify
        Edge::new("Compound::DB00007", Metaedge::CdG, "Gene::1"),
        // Gene::3 has only association and AdG: does not qualify
        Edge::new("Compound::DB00007", Metaedge::CuG, "Gene::3"),
        // Gene::9 has only association: does not qualify
        Edge::new("Compound::DB00007", Metaedge::CdG, "Gene::9"),
        // Dangling gene
        Edge::new("Compound::DB00007", Metaedge::CuG, "Gene::404"),
        // Wrong-kind source on a regulation edge
        Edge::new("Pathway::WP1", Metaedge::CuG, "Gene::1"),
    ];

    (nodes, edges)
}

#[test]
fn disease_lookup_identical_across_backends() {
    let (nodes, edges) = fixture();
    let graph = IndexedGraph::from_parts(nodes.clone(), edges.clone());
    let documents = MemoryDocumentStore::from_parts(nodes.clone(), edges);
    let patterns = DiseasePatterns::compile().unwrap();

    let mut ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
    ids.push("Disease::DOID:0".to_string());

    for id in &ids {
        let (traversal, _) = lookup_by_traversal(&graph, &patterns, id).unwrap();
        let (join_graph, _) = lookup_by_join(&graph, id).unwrap();
        let (join_documents, _) = lookup_by_join(&documents, id).unwrap();

        assert_eq!(traversal, join_graph, "graph backends differ for {}", id);
        assert_eq!(traversal, join_documents, "document backend differs for {}", id);
    }
}

#[test]
fn disease_lookup_details() {
    let (nodes, edges) = fixture();
    let graph = IndexedGraph::from_parts(nodes, edges);
    let patterns = DiseasePatterns::compile().unwrap();

    let (report, _) = lookup_by_traversal(&graph, &patterns, "Disease::DOID:2841").unwrap();
    let info = report.info().unwrap();
    assert_eq!(info.drug_names(), vec!["Dornase alfa", "Lepirudin"]);
    // DuG and DaG on the same gene collapse into one entry
    assert_eq!(info.gene_names(), vec!["A1BG", "A2MP1"]);
    // Symptom target is ignored
    assert_eq!(info.anatomy_names(), vec!["lung"]);

    let (report, _) = lookup_by_traversal(&graph, &patterns, "Disease::DOID:1324").unwrap();
    let info = report.info().unwrap();
    assert_eq!(info.drug_names(), vec!["Cetuximab"]);
    assert_eq!(info.anatomy_names(), vec!["lung"]);
}

#[test]
fn repurposing_identical_across_backends() {
    let (nodes, edges) = fixture();
    let graph = IndexedGraph::from_parts(nodes.clone(), edges.clone());
    let documents = MemoryDocumentStore::from_parts(nodes, edges);
    let patterns = RepurposingPatterns::compile().unwrap();

    let (traversal, _) = infer_by_traversal(&graph, &patterns).unwrap();
    let (join_graph, _) = infer_by_join(&graph, false).unwrap();
    let (join_documents, _) = infer_by_join(&documents, false).unwrap();

    assert_eq!(traversal, join_graph);
    assert_eq!(traversal, join_documents);
}

#[test]
fn repurposing_candidates() {
    let (nodes, edges) = fixture();
    let documents = MemoryDocumentStore::from_parts(nodes, edges);
    let (treatments, _) = infer_by_join(&documents, false).unwrap();

    let ids: Vec<&str> = treatments.candidates.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "Compound::DB00004",
            "Compound::DB00005",
            "Compound::DB00006",
        ]
    );
    assert_eq!(
        treatments.to_string(),
        format!(
            "Potential New Treatments:\n{}\nDenileukin diftitox (Compound::DB00004)\nEtanercept (Compound::DB00005)\nEtanercept (Compound::DB00006)\n",
            "-".repeat(50)
        )
    );
}

#[test]
fn repurposing_never_returns_treated_compounds() {
    let (nodes, edges) = fixture();
    let treated: HashSet<String> = edges
        .iter()
        .filter(|e| Metaedge::TREATMENT.contains(&e.metaedge))
        .map(|e| e.source.clone())
        .collect();
    let graph = IndexedGraph::from_parts(nodes, edges);
    let patterns = RepurposingPatterns::compile().unwrap();

    let (treatments, _) = infer_by_traversal(&graph, &patterns).unwrap();
    assert!(!treatments.is_empty());
    for candidate in &treatments.candidates {
        assert!(!treated.contains(&candidate.id), "{} is treated", candidate.id);
    }
}

#[test]
fn repurposing_sorted_without_duplicates() {
    let (nodes, edges) = fixture();
    let graph = IndexedGraph::from_parts(nodes, edges);
    let (treatments, _) = infer_by_join(&graph, false).unwrap();

    let keys: Vec<(&str, &str)> = treatments
        .candidates
        .iter()
        .map(|c| (c.name.as_str(), c.id.as_str()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    sorted.dedup_by_key(|(_, id)| *id);
    assert_eq!(keys, sorted);
}

#[test]
fn association_alone_never_qualifies() {
    let nodes = vec![
        Node::new("C1", NodeKind::Compound, "Metformin"),
        Node::new("G1", NodeKind::Gene, "PRKAA1"),
        Node::new("A1", NodeKind::Anatomy, "liver"),
        Node::new("D1", NodeKind::Disease, "type 2 diabetes mellitus"),
    ];
    let edges = vec![
        Edge::new("C1", Metaedge::CuG, "G1"),
        Edge::new("A1", Metaedge::AdG, "G1"),
        Edge::new("D1", Metaedge::DaG, "G1"),
    ];
    let graph = IndexedGraph::from_parts(nodes, edges);
    let patterns = RepurposingPatterns::compile().unwrap();

    assert!(infer_by_join(&graph, false).unwrap().0.is_empty());
    assert!(infer_by_traversal(&graph, &patterns).unwrap().0.is_empty());
}

#[test]
fn repeated_queries_are_idempotent() {
    let (nodes, edges) = fixture();
    let facades = vec![
        QueryFacade::new(
            TraversalBackend::new(IndexedGraph::from_parts(nodes.clone(), edges.clone())).unwrap(),
            Arc::new(MemoryAuditLog::new()),
        ),
        QueryFacade::new(
            JoinBackend::new(MemoryDocumentStore::from_parts(nodes, edges)),
            Arc::new(MemoryAuditLog::new()),
        ),
    ];

    for facade in &facades {
        let first = facade.new_treatments().unwrap().result;
        let second = facade.new_treatments().unwrap().result;
        assert_eq!(first, second);

        let first = facade.disease_info("Disease::DOID:2841").unwrap().result;
        let second = facade.disease_info("Disease::DOID:2841").unwrap().result;
        assert_eq!(first, second);
    }

    assert_eq!(
        facades[0].new_treatments().unwrap().result,
        facades[1].new_treatments().unwrap().result
    );
}

#[test]
fn disease_ids_identical_across_backends() {
    let (nodes, edges) = fixture();
    let traversal = QueryFacade::new(
        TraversalBackend::new(IndexedGraph::from_parts(nodes.clone(), edges.clone())).unwrap(),
        Arc::new(MemoryAuditLog::new()),
    );
    let join = QueryFacade::new(
        JoinBackend::new(MemoryDocumentStore::from_parts(nodes, edges)),
        Arc::new(MemoryAuditLog::new()),
    );

    let ids = traversal.disease_ids().unwrap();
    assert_eq!(ids, join.disease_ids().unwrap());
    assert_eq!(
        ids,
        vec![
            "Disease::DOID:1324".to_string(),
            "Disease::DOID:2841".to_string(),
            "Disease::DOID:9352".to_string(),
        ]
    );
    assert_eq!(
        join.search_disease_ids("DOID:28").unwrap(),
        vec!["Disease::DOID:2841".to_string()]
    );
}

#[test]
fn parallel_flag_keeps_results() {
    let (nodes, edges) = fixture();
    let documents = MemoryDocumentStore::from_parts(nodes.clone(), edges.clone());
    let sequential = infer_by_join(&documents, false).unwrap().0;
    let parallel = infer_by_join(&documents, true).unwrap().0;
    assert_eq!(sequential, parallel);

    let facade = QueryFacade::with_config(
        JoinBackend::new(MemoryDocumentStore::from_parts(nodes, edges)),
        Arc::new(MemoryAuditLog::new()),
        EngineConfig::builder().with_parallel(true).build(),
    );
    assert_eq!(facade.new_treatments().unwrap().result, sequential);
}
