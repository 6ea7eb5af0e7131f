//! AST types for relationship patterns.
//!
//! A [`HopPattern`] is one relationship between two node patterns, written
//! in a Cypher-like notation:
//!
//! ```text
//! (c:Compound)-[:CtD|CpD]->(d:Disease {id: $disease_id})
//! (g:Gene)<-[:DdG|DuG|DaG]-(d:Disease {id: "Disease::DOID:2841"})
//! ```
//!
//! A [`PathPattern`] chains hops through shared nodes and may carry
//! existence conditions on the bound variables:
//!
//! ```text
//! (c:Compound)-[:CuG]->(g:Gene)<-[:AdG]-(:Anatomy)
//!     WHERE NOT (c)-[:CtD|CpD]->(:Disease) AND (g)<-[:DuG|DdG]-(:Disease)
//! ```

use std::fmt;

use crate::schema::{Metaedge, NodeKind};

/// Value of an `{id: ...}` constraint on a node pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdValue {
    /// A concrete node identifier.
    Literal(String),
    /// A named parameter (`$name`) to be bound before execution.
    Parameter(String),
}

/// Pattern for one end of a hop: `(var:Kind {id: ...})`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePattern {
    /// Binding name, if any.
    pub variable: Option<String>,
    /// Required node kind (None = any kind).
    pub kind: Option<NodeKind>,
    /// Required node id (None = any id).
    pub id: Option<IdValue>,
}

impl NodePattern {
    /// Creates a pattern matching any node.
    pub fn any() -> Self {
        Self::default()
    }

    /// Creates a pattern matching nodes of one kind.
    pub fn of_kind(kind: NodeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Sets the binding name.
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    /// Requires a concrete node id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(IdValue::Literal(id.into()));
        self
    }

    /// Returns the literal id constraint, if bound.
    pub fn literal_id(&self) -> Option<&str> {
        match &self.id {
            Some(IdValue::Literal(id)) => Some(id),
            _ => None,
        }
    }

    /// Returns the parameter name if the id is still unbound.
    pub fn parameter(&self) -> Option<&str> {
        match &self.id {
            Some(IdValue::Parameter(name)) => Some(name),
            _ => None,
        }
    }

    /// Checks a node's kind and id against this pattern.
    ///
    /// An unbound parameter never accepts.
    pub fn accepts(&self, kind: NodeKind, id: &str) -> bool {
        if self.kind.is_some_and(|k| k != kind) {
            return false;
        }
        match &self.id {
            None => true,
            Some(IdValue::Literal(expected)) => expected == id,
            Some(IdValue::Parameter(_)) => false,
        }
    }
}

/// Direction of the arrow as written in the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// `(a)-[...]->(b)`: edges run from the left node to the right node.
    Outgoing,
    /// `(a)<-[...]-(b)`: edges run from the right node to the left node.
    Incoming,
}

/// The relationship part of a hop: `-[:CtD|CpD]->`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelPattern {
    /// Accepted metaedge types (never empty).
    pub metaedges: Vec<Metaedge>,
    /// Arrow direction.
    pub direction: Direction,
}

/// One relationship pattern between two node patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HopPattern {
    /// Node pattern written on the left.
    pub left: NodePattern,
    /// Relationship pattern.
    pub rel: RelPattern,
    /// Node pattern written on the right.
    pub right: NodePattern,
}

impl HopPattern {
    /// Creates an outgoing hop `source -[metaedges]-> target`.
    pub fn outgoing(source: NodePattern, metaedges: &[Metaedge], target: NodePattern) -> Self {
        Self {
            left: source,
            rel: RelPattern {
                metaedges: metaedges.to_vec(),
                direction: Direction::Outgoing,
            },
            right: target,
        }
    }

    /// Node pattern at the edge source, whichever side it was written on.
    pub fn source(&self) -> &NodePattern {
        match self.rel.direction {
            Direction::Outgoing => &self.left,
            Direction::Incoming => &self.right,
        }
    }

    /// Node pattern at the edge target, whichever side it was written on.
    pub fn target(&self) -> &NodePattern {
        match self.rel.direction {
            Direction::Outgoing => &self.right,
            Direction::Incoming => &self.left,
        }
    }

    /// Returns a copy with every `$name` parameter replaced by `value`.
    pub fn bind(&self, name: &str, value: &str) -> HopPattern {
        let mut bound = self.clone();
        for node in [&mut bound.left, &mut bound.right] {
            if node.parameter() == Some(name) {
                node.id = Some(IdValue::Literal(value.to_string()));
            }
        }
        bound
    }

    /// Names of parameters that are still unbound.
    pub fn unbound_parameters(&self) -> Vec<&str> {
        [&self.left, &self.right]
            .into_iter()
            .filter_map(|node| node.parameter())
            .collect()
    }
}

/// An existence condition attached to a path: `[NOT] (c)-[:CtD]->(:Disease)`.
///
/// Variables shared with the path refer to the nodes the path bound; any
/// other node in the hop is existential.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    /// True for `NOT`: the hop must have no match.
    pub negated: bool,
    /// Hop that must (or must not) match.
    pub hop: HopPattern,
}

/// A chain of hops through shared nodes, with optional `WHERE` conditions.
///
/// `nodes` always holds one more element than `rels`; `rels[i]` connects
/// `nodes[i]` and `nodes[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPattern {
    /// Node patterns in written order.
    pub nodes: Vec<NodePattern>,
    /// Relationship patterns between consecutive nodes.
    pub rels: Vec<RelPattern>,
    /// Conditions joined with `AND`.
    pub conditions: Vec<Condition>,
}

impl PathPattern {
    /// Number of hops in the chain.
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Returns true if the chain has no hops.
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// The `index`-th hop of the chain, or `None` past the end.
    pub fn hop(&self, index: usize) -> Option<HopPattern> {
        let rel = self.rels.get(index)?;
        Some(HopPattern {
            left: self.nodes.get(index)?.clone(),
            rel: rel.clone(),
            right: self.nodes.get(index + 1)?.clone(),
        })
    }

    /// Position of the first node bound to `variable`.
    pub fn position(&self, variable: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node.variable.as_deref() == Some(variable))
    }

    /// Returns a copy with every `$name` parameter replaced by `value`,
    /// conditions included.
    pub fn bind(&self, name: &str, value: &str) -> PathPattern {
        let mut bound = self.clone();
        for node in bound.nodes.iter_mut() {
            if node.parameter() == Some(name) {
                node.id = Some(IdValue::Literal(value.to_string()));
            }
        }
        for condition in bound.conditions.iter_mut() {
            condition.hop = condition.hop.bind(name, value);
        }
        bound
    }

    /// Names of parameters that are still unbound, conditions included.
    pub fn unbound_parameters(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| node.parameter())
            .chain(
                self.conditions
                    .iter()
                    .flat_map(|condition| condition.hop.unbound_parameters()),
            )
            .collect()
    }
}

impl From<HopPattern> for PathPattern {
    fn from(hop: HopPattern) -> Self {
        PathPattern {
            nodes: vec![hop.left, hop.right],
            rels: vec![hop.rel],
            conditions: Vec::new(),
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdValue::Parameter(name) => write!(f, "${}", name),
            IdValue::Literal(id) => {
                f.write_str("\"")?;
                for c in id.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("\"")
            }
        }
    }
}

impl fmt::Display for NodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        if let Some(variable) = &self.variable {
            f.write_str(variable)?;
        }
        if let Some(kind) = self.kind {
            write!(f, ":{}", kind)?;
        }
        if let Some(id) = &self.id {
            if self.variable.is_some() || self.kind.is_some() {
                f.write_str(" ")?;
            }
            write!(f, "{{id: {}}}", id)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for RelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.metaedges.iter().map(|m| m.code()).collect();
        match self.direction {
            Direction::Outgoing => write!(f, "-[:{}]->", codes.join("|")),
            Direction::Incoming => write!(f, "<-[:{}]-", codes.join("|")),
        }
    }
}

impl fmt::Display for HopPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, self.rel, self.right)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("NOT ")?;
        }
        write!(f, "{}", self.hop)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            write!(f, "{}", node)?;
            if let Some(rel) = self.rels.get(i) {
                write!(f, "{}", rel)?;
            }
        }
        for (i, condition) in self.conditions.iter().enumerate() {
            let keyword = if i == 0 { " WHERE " } else { " AND " };
            write!(f, "{}{}", keyword, condition)?;
        }
        Ok(())
    }
}
