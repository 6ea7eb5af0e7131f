//! In-memory native graph backend.
//!
//! [`IndexedGraph`] keeps adjacency indexes the way a native graph database
//! does, so anchored hop patterns are answered by following edges from the
//! bound node instead of scanning, and path patterns walk the same adjacency
//! one hop at a time.

use hashbrown::HashMap;
use std::collections::BTreeSet;
use tracing::debug;

use hetio_pattern::{
    Condition, Direction, HopPattern, Metaedge, NodeId, NodeKind, NodePattern, PathPattern,
};

use crate::error::{StoreError, StoreResult};
use crate::model::{Edge, EdgeFilter, Node};
use crate::traits::{GraphEngine, GraphStore, HopMatch, PathMatch};

type Adjacency = HashMap<NodeId, HashMap<Metaedge, Vec<usize>>>;

fn distinct(metaedges: &[Metaedge]) -> Vec<Metaedge> {
    let mut types = metaedges.to_vec();
    types.sort_unstable();
    types.dedup();
    types
}

/// A path binding under construction.
struct Partial<'g> {
    nodes: Vec<&'g Node>,
    metaedges: Vec<Metaedge>,
}

/// Native graph engine over an immutable in-memory snapshot.
///
/// Indexes:
/// - nodes: NodeId -> Node
/// - kind_index: NodeKind -> sorted node ids
/// - metaedge_index: Metaedge -> edge positions
/// - outgoing / incoming: NodeId -> Metaedge -> edge positions
///
/// # Example
///
/// ```
/// use hetio_engine::{Edge, GraphEngine, IndexedGraph, Node};
/// use hetio_pattern::{parse_hop, Metaedge, NodeKind};
///
/// let graph = IndexedGraph::from_parts(
///     vec![
///         Node::new("Compound::DB00001", NodeKind::Compound, "Lepirudin"),
///         Node::new("Disease::DOID:2841", NodeKind::Disease, "asthma"),
///     ],
///     vec![Edge::new("Compound::DB00001", Metaedge::CtD, "Disease::DOID:2841")],
/// );
///
/// let hop = parse_hop("(c:Compound)-[:CtD|CpD]->(d:Disease {id: $disease_id})")
///     .unwrap()
///     .bind("disease_id", "Disease::DOID:2841");
/// let matches = graph.match_hop(&hop).unwrap();
/// assert_eq!(matches[0].source.name, "Lepirudin");
/// ```
#[derive(Debug, Default)]
pub struct IndexedGraph {
    nodes: HashMap<NodeId, Node>,
    kind_index: HashMap<NodeKind, Vec<NodeId>>,
    edges: Vec<Edge>,
    metaedge_index: HashMap<Metaedge, Vec<usize>>,
    outgoing: Adjacency,
    incoming: Adjacency,
}

impl IndexedGraph {
    /// Builds the graph and its indexes. Duplicate edges collapse into one;
    /// a repeated node id keeps the last node.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        let mut graph = IndexedGraph::default();

        for node in nodes {
            graph.nodes.insert(node.id.clone(), node);
        }
        for node in graph.nodes.values() {
            graph
                .kind_index
                .entry(node.kind)
                .or_default()
                .push(node.id.clone());
        }
        for ids in graph.kind_index.values_mut() {
            ids.sort_unstable();
        }

        let unique: BTreeSet<Edge> = edges.into_iter().collect();
        graph.edges = unique.into_iter().collect();
        for (pos, edge) in graph.edges.iter().enumerate() {
            graph
                .metaedge_index
                .entry(edge.metaedge)
                .or_default()
                .push(pos);
            graph
                .outgoing
                .entry(edge.source.clone())
                .or_default()
                .entry(edge.metaedge)
                .or_default()
                .push(pos);
            graph
                .incoming
                .entry(edge.target.clone())
                .or_default()
                .entry(edge.metaedge)
                .or_default()
                .push(pos);
        }

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "indexed graph built"
        );
        graph
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn adjacent(&self, index: &Adjacency, id: &str, metaedges: &[Metaedge]) -> Vec<usize> {
        let Some(by_type) = index.get(id) else {
            return Vec::new();
        };
        metaedges
            .iter()
            .filter_map(|m| by_type.get(m))
            .flatten()
            .copied()
            .collect()
    }

    fn of_types(&self, metaedges: &[Metaedge]) -> Vec<usize> {
        metaedges
            .iter()
            .filter_map(|m| self.metaedge_index.get(m))
            .flatten()
            .copied()
            .collect()
    }

    /// Candidate nodes for the first position of a path.
    fn seeds(&self, pattern: &NodePattern) -> Vec<&Node> {
        if let Some(id) = pattern.literal_id() {
            return self.nodes.get(id).into_iter().collect();
        }
        match pattern.kind {
            Some(kind) => self
                .kind_index
                .get(&kind)
                .into_iter()
                .flatten()
                .filter_map(|id| self.nodes.get(id))
                .collect(),
            None => self.nodes.values().collect(),
        }
    }

    /// Extends a partial binding by one hop from its last node.
    fn extend<'g>(
        &'g self,
        path: &PathPattern,
        partial: &Partial<'g>,
        metaedges: &[Metaedge],
    ) -> Vec<Partial<'g>> {
        let step = partial.metaedges.len();
        let rel = &path.rels[step];
        let pattern = &path.nodes[step + 1];
        let from = partial.nodes[step];

        let index = match rel.direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        };
        // A variable seen earlier in the chain must bind the same node again
        let earlier = pattern
            .variable
            .as_deref()
            .and_then(|v| path.position(v))
            .filter(|&pos| pos <= step)
            .map(|pos| partial.nodes[pos].id.as_str());

        let mut extended = Vec::new();
        for pos in self.adjacent(index, &from.id, metaedges) {
            let edge = &self.edges[pos];
            let next_id = match rel.direction {
                Direction::Outgoing => &edge.target,
                Direction::Incoming => &edge.source,
            };
            let Some(next) = self.nodes.get(next_id) else {
                continue;
            };
            if !pattern.accepts(next.kind, &next.id) || earlier.is_some_and(|id| id != next.id) {
                continue;
            }
            let mut nodes = partial.nodes.clone();
            nodes.push(next);
            let mut walked = partial.metaedges.clone();
            walked.push(edge.metaedge);
            extended.push(Partial {
                nodes,
                metaedges: walked,
            });
        }
        extended
    }

    /// Checks a condition with the path's variables fixed to `bound`.
    fn holds(&self, path: &PathPattern, condition: &Condition, bound: &[&Node]) -> bool {
        let hop = &condition.hop;
        let resolve = |node: &NodePattern| {
            node.variable
                .as_deref()
                .and_then(|v| path.position(v))
                .and_then(|pos| bound.get(pos).copied())
        };
        let (source, target) = (hop.source(), hop.target());
        let (bound_source, bound_target) = (resolve(source), resolve(target));
        // (x)-[...]->(x) with a free x asks for a self-loop
        let self_loop = bound_source.is_none()
            && source.variable.is_some()
            && source.variable == target.variable;

        let metaedges = distinct(&hop.rel.metaedges);
        let positions = if let Some(node) = bound_source {
            self.adjacent(&self.outgoing, &node.id, &metaedges)
        } else if let Some(node) = bound_target {
            self.adjacent(&self.incoming, &node.id, &metaedges)
        } else {
            self.of_types(&metaedges)
        };

        let found = positions.into_iter().any(|pos| {
            let edge = &self.edges[pos];
            let (Some(from), Some(to)) = (self.nodes.get(&edge.source), self.nodes.get(&edge.target))
            else {
                return false;
            };
            source.accepts(from.kind, &from.id)
                && target.accepts(to.kind, &to.id)
                && bound_source.map_or(true, |node| node.id == from.id)
                && bound_target.map_or(true, |node| node.id == to.id)
                && (!self_loop || from.id == to.id)
        });
        found != condition.negated
    }
}

/// Chain position after which every path variable a condition mentions is
/// bound. Conditions sharing no variable run on the first node.
fn ready_at(path: &PathPattern, condition: &Condition) -> usize {
    [&condition.hop.left, &condition.hop.right]
        .into_iter()
        .filter_map(|node| node.variable.as_deref())
        .filter_map(|v| path.position(v))
        .max()
        .unwrap_or(0)
}

impl GraphStore for IndexedGraph {
    fn backend_name(&self) -> &str {
        "graph"
    }

    fn find_nodes_by_kind(&self, kind: NodeKind) -> StoreResult<Vec<NodeId>> {
        Ok(self.kind_index.get(&kind).cloned().unwrap_or_default())
    }

    fn get_node(&self, id: &str) -> StoreResult<Option<Node>> {
        Ok(self.nodes.get(id).cloned())
    }

    fn find_edges(&self, filter: &EdgeFilter) -> StoreResult<Vec<Edge>> {
        let types = match &filter.metaedge_in {
            Some(types) => distinct(types),
            None => Metaedge::ALL.to_vec(),
        };

        let positions: Vec<usize> = if let Some(source) = &filter.source {
            self.adjacent(&self.outgoing, source, &types)
        } else if let Some(target) = &filter.target {
            self.adjacent(&self.incoming, target, &types)
        } else if filter.metaedge_in.is_some() {
            self.of_types(&types)
        } else {
            (0..self.edges.len()).collect()
        };

        Ok(positions
            .into_iter()
            .map(|pos| &self.edges[pos])
            .filter(|edge| filter.matches(edge))
            .cloned()
            .collect())
    }
}

impl GraphEngine for IndexedGraph {
    fn match_hop(&self, hop: &HopPattern) -> StoreResult<Vec<HopMatch>> {
        if let Some(name) = hop.unbound_parameters().first() {
            return Err(StoreError::InvalidQuery(format!(
                "unbound parameter ${} in {}",
                name, hop
            )));
        }

        let metaedges = distinct(&hop.rel.metaedges);

        let source = hop.source();
        let target = hop.target();
        let positions = if let Some(id) = source.literal_id() {
            self.adjacent(&self.outgoing, id, &metaedges)
        } else if let Some(id) = target.literal_id() {
            self.adjacent(&self.incoming, id, &metaedges)
        } else {
            self.of_types(&metaedges)
        };

        let mut matches = Vec::with_capacity(positions.len());
        for pos in positions {
            let edge = &self.edges[pos];
            let (Some(from), Some(to)) = (self.nodes.get(&edge.source), self.nodes.get(&edge.target))
            else {
                continue;
            };
            if source.accepts(from.kind, &from.id) && target.accepts(to.kind, &to.id) {
                matches.push(HopMatch {
                    source: from.clone(),
                    metaedge: edge.metaedge,
                    target: to.clone(),
                });
            }
        }

        debug!(pattern = %hop, matched = matches.len(), "hop matched");
        Ok(matches)
    }

    fn match_path(&self, path: &PathPattern) -> StoreResult<Vec<PathMatch>> {
        if let Some(name) = path.unbound_parameters().first() {
            return Err(StoreError::InvalidQuery(format!(
                "unbound parameter ${} in {}",
                name, path
            )));
        }
        if path.is_empty() || path.nodes.len() != path.rels.len() + 1 {
            return Err(StoreError::InvalidQuery(format!(
                "path needs one more node than relationships: {}",
                path
            )));
        }

        let ready: Vec<usize> = path
            .conditions
            .iter()
            .map(|condition| ready_at(path, condition))
            .collect();
        let passes = |partial: &Partial<'_>| {
            let at = partial.nodes.len() - 1;
            path.conditions
                .iter()
                .zip(&ready)
                .filter(|(_, &pos)| pos == at)
                .all(|(condition, _)| self.holds(path, condition, &partial.nodes))
        };

        let first = &path.nodes[0];
        let mut partials: Vec<Partial<'_>> = self
            .seeds(first)
            .into_iter()
            .filter(|node| first.accepts(node.kind, &node.id))
            .map(|node| Partial {
                nodes: vec![node],
                metaedges: Vec::new(),
            })
            .filter(|partial| passes(partial))
            .collect();

        for rel in &path.rels {
            let metaedges = distinct(&rel.metaedges);
            partials = partials
                .iter()
                .flat_map(|partial| self.extend(path, partial, &metaedges))
                .filter(|partial| passes(partial))
                .collect();
            if partials.is_empty() {
                break;
            }
        }

        let matches: Vec<PathMatch> = partials
            .into_iter()
            .map(|partial| PathMatch {
                nodes: partial.nodes.into_iter().cloned().collect(),
                metaedges: partial.metaedges,
            })
            .collect();
        debug!(pattern = %path, matched = matches.len(), "path matched");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocumentStore;
    use hetio_pattern::{parse_hop, parse_path};

    fn sample_graph() -> IndexedGraph {
        IndexedGraph::from_parts(
            vec![
                Node::new("C1", NodeKind::Compound, "Aspirin"),
                Node::new("C2", NodeKind::Compound, "Ibuprofen"),
                Node::new("D1", NodeKind::Disease, "Asthma"),
                Node::new("G1", NodeKind::Gene, "IL4"),
                Node::new("A1", NodeKind::Anatomy, "lung"),
            ],
            vec![
                Edge::new("C1", Metaedge::CtD, "D1"),
                Edge::new("C1", Metaedge::CtD, "D1"),
                Edge::new("C2", Metaedge::CpD, "D1"),
                Edge::new("D1", Metaedge::DuG, "G1"),
                Edge::new("D1", Metaedge::DlA, "A1"),
                Edge::new("A1", Metaedge::AdG, "G1"),
                // Dangling target
                Edge::new("C2", Metaedge::CuG, "G404"),
            ],
        )
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = sample_graph();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn test_find_nodes_by_kind_sorted() {
        let graph = sample_graph();
        assert_eq!(
            graph.find_nodes_by_kind(NodeKind::Compound).unwrap(),
            vec!["C1".to_string(), "C2".to_string()]
        );
        assert!(graph.find_nodes_by_kind(NodeKind::Pathway).unwrap().is_empty());
    }

    #[test]
    fn test_find_edges_uses_filter() {
        let graph = sample_graph();
        let into_disease = graph
            .find_edges(&EdgeFilter::metaedges(&Metaedge::TREATMENT).with_target("D1"))
            .unwrap();
        assert_eq!(into_disease.len(), 2);

        let from_disease = graph
            .find_edges(&EdgeFilter::new().with_source("D1"))
            .unwrap();
        assert_eq!(from_disease.len(), 2);

        assert_eq!(graph.find_edges(&EdgeFilter::new()).unwrap().len(), 6);
    }

    #[test]
    fn test_find_edges_repeated_type_counts_once() {
        let edges = vec![Edge::new("C1", Metaedge::CtD, "D1")];
        let graph = IndexedGraph::from_parts(Vec::new(), edges.clone());
        let documents = MemoryDocumentStore::from_parts(Vec::new(), edges);

        for filter in [
            EdgeFilter::metaedges(&[Metaedge::CtD, Metaedge::CtD]),
            EdgeFilter::metaedges(&[Metaedge::CtD, Metaedge::CtD]).with_source("C1"),
            EdgeFilter::metaedges(&[Metaedge::CtD, Metaedge::CtD]).with_target("D1"),
        ] {
            assert_eq!(graph.find_edges(&filter).unwrap().len(), 1);
            assert_eq!(documents.find_edges(&filter).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_match_hop_anchored_incoming() {
        let graph = sample_graph();
        let hop = parse_hop("(c:Compound)-[:CtD|CpD]->(d:Disease {id: \"D1\"})").unwrap();
        let mut names: Vec<String> = graph
            .match_hop(&hop)
            .unwrap()
            .into_iter()
            .map(|m| m.source.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Aspirin", "Ibuprofen"]);
    }

    #[test]
    fn test_match_hop_anchored_source() {
        let graph = sample_graph();
        let hop = parse_hop("(a:Anatomy)<-[:DlA]-(d:Disease {id: 'D1'})").unwrap();
        let matches = graph.match_hop(&hop).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].target.name, "lung");
    }

    #[test]
    fn test_match_hop_enforces_kinds_and_skips_dangling() {
        let graph = sample_graph();
        let wrong_kind = parse_hop("(g:Gene)-[:CtD]->(d:Disease)").unwrap();
        assert!(graph.match_hop(&wrong_kind).unwrap().is_empty());

        let dangling = parse_hop("(c:Compound)-[:CuG]->(g:Gene)").unwrap();
        assert!(graph.match_hop(&dangling).unwrap().is_empty());
    }

    #[test]
    fn test_match_hop_rejects_unbound_parameter() {
        let graph = sample_graph();
        let hop = parse_hop("(a:Anatomy)-[:AdG]->(g:Gene {id: $gene_id})").unwrap();
        let err = graph.match_hop(&hop).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));

        let bound = hop.bind("gene_id", "G1");
        assert_eq!(graph.match_hop(&bound).unwrap().len(), 1);
    }

    fn regulation_graph() -> IndexedGraph {
        IndexedGraph::from_parts(
            vec![
                Node::new("C1", NodeKind::Compound, "Caffeine"),
                Node::new("C2", NodeKind::Compound, "Aspirin"),
                Node::new("C3", NodeKind::Compound, "Menthol"),
                Node::new("G1", NodeKind::Gene, "ADORA2A"),
                Node::new("G2", NodeKind::Gene, "PTGS2"),
                Node::new("A1", NodeKind::Anatomy, "brain"),
                Node::new("D1", NodeKind::Disease, "migraine"),
                Node::new("D2", NodeKind::Disease, "arthritis"),
            ],
            vec![
                Edge::new("C1", Metaedge::CuG, "G1"),
                Edge::new("C2", Metaedge::CuG, "G2"),
                Edge::new("C2", Metaedge::CtD, "D2"),
                Edge::new("C3", Metaedge::CuG, "G2"),
                Edge::new("A1", Metaedge::AdG, "G1"),
                Edge::new("A1", Metaedge::AdG, "G2"),
                Edge::new("D1", Metaedge::DuG, "G1"),
            ],
        )
    }

    fn compounds(matches: &[PathMatch]) -> Vec<&str> {
        let mut ids: Vec<&str> = matches.iter().map(|m| m.nodes[0].id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    #[test]
    fn test_match_path_chains_through_shared_node() {
        let graph = regulation_graph();
        let path = parse_path("(c:Compound)-[:CuG]->(g:Gene)<-[:AdG]-(a:Anatomy)").unwrap();
        let matches = graph.match_path(&path).unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(compounds(&matches), vec!["C1", "C2", "C3"]);
        let first = matches.iter().find(|m| m.nodes[0].id == "C1").unwrap();
        assert_eq!(first.nodes[1].name, "ADORA2A");
        assert_eq!(first.nodes[2].name, "brain");
        assert_eq!(first.metaedges, vec![Metaedge::CuG, Metaedge::AdG]);
    }

    #[test]
    fn test_match_path_conditions() {
        let graph = regulation_graph();

        let untreated = parse_path(
            "(c:Compound)-[:CuG]->(g:Gene)<-[:AdG]-(:Anatomy) WHERE NOT (c)-[:CtD|CpD]->(:Disease)",
        )
        .unwrap();
        assert_eq!(compounds(&graph.match_path(&untreated).unwrap()), vec!["C1", "C3"]);

        let with_disease = parse_path(
            "(c:Compound)-[:CuG]->(g:Gene)<-[:AdG]-(:Anatomy) \
             WHERE NOT (c)-[:CtD|CpD]->(:Disease) AND (g)<-[:DuG|DdG]-(:Disease)",
        )
        .unwrap();
        assert_eq!(compounds(&graph.match_path(&with_disease).unwrap()), vec!["C1"]);

        // A condition on a node kind that is absent never holds
        let wrong_kind = parse_path("(c:Compound)-[:CuG]->(g:Gene) WHERE (c)-[:CtD]->(:Symptom)")
            .unwrap();
        assert!(graph.match_path(&wrong_kind).unwrap().is_empty());
    }

    #[test]
    fn test_match_path_anchored_and_repeated_variable() {
        let graph = regulation_graph();
        let anchored = parse_path("(a:Anatomy {id: \"A1\"})-[:AdG]->(g:Gene)<-[:CuG]-(c:Compound)")
            .unwrap();
        assert_eq!(graph.match_path(&anchored).unwrap().len(), 3);

        // Walking back to `a` only yields bindings that return to the same node
        let round_trip = parse_path("(a:Anatomy)-[:AdG]->(g:Gene)<-[:AdG]-(a)").unwrap();
        let matches = graph.match_path(&round_trip).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.nodes[0] == m.nodes[2]));
    }

    #[test]
    fn test_match_path_rejects_unbound_parameter() {
        let graph = regulation_graph();
        let path = parse_path(
            "(c:Compound)-[:CuG]->(g:Gene) WHERE (g)<-[:DuG]-(:Disease {id: $disease_id})",
        )
        .unwrap();
        assert!(matches!(
            graph.match_path(&path).unwrap_err(),
            StoreError::InvalidQuery(_)
        ));

        let bound = path.bind("disease_id", "D1");
        assert_eq!(compounds(&graph.match_path(&bound).unwrap()), vec!["C1"]);
    }
}
