//! # hetio-pattern
//!
//! The HetioNet schema vocabulary and a parser for Cypher-like relationship
//! patterns.
//!
//! This crate provides:
//! - **Schema**: [`NodeKind`], [`Metaedge`] and [`Regulation`], the fixed
//!   node kinds and relationship codes of HetioNet
//! - **Pattern Parser**: [`parse_hop`] turns a single hop into a
//!   [`HopPattern`], and [`parse_path`] turns a chain of hops with `WHERE`
//!   existence conditions into a [`PathPattern`]. Native graph backends
//!   evaluate both ASTs directly
//!
//! ## Usage
//!
//! ```rust
//! use hetio_pattern::{parse_hop, Direction, NodeKind};
//!
//! let hop = parse_hop("(a:Anatomy)<-[:DlA]-(d:Disease {id: $disease_id})").unwrap();
//! assert_eq!(hop.rel.direction, Direction::Incoming);
//! assert_eq!(hop.source().kind, Some(NodeKind::Disease));
//!
//! let bound = hop.bind("disease_id", "Disease::DOID:2841");
//! assert_eq!(
//!     bound.to_string(),
//!     "(a:Anatomy)<-[:DlA]-(d:Disease {id: \"Disease::DOID:2841\"})"
//! );
//! ```
//!
//! ## Syntax Quick Reference
//!
//! | Element | Meaning | Example |
//! |---------|---------|---------|
//! | `(v:Kind)` | Node of a kind, bound to `v` | `(c:Compound)` |
//! | `(:Kind)` | Anonymous node of a kind | `(:Disease)` |
//! | `{id: "..."}` | Literal node id | `(g:Gene {id: "Gene::1"})` |
//! | `{id: $p}` | Parameter, bound before execution | `(d:Disease {id: $disease_id})` |
//! | `-[:T]->` | Outgoing edge of type `T` | `-[:CtD]->` |
//! | `<-[:T]-` | Incoming edge of type `T` | `<-[:DlA]-` |
//! | `T1\|T2` | Either type | `-[:CuG\|CdG]->` |
//! | `(a)-[..]->(b)<-[..]-(c)` | Chain of hops through shared nodes | `(c)-[:CuG]->(g)<-[:AdG]-(a)` |
//! | `WHERE h1 AND h2` | Every hop must match from the bound nodes | `WHERE (g)<-[:DuG]-(:Disease)` |
//! | `NOT h` | Hop must have no match | `WHERE NOT (c)-[:CtD]->(:Disease)` |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod ast;
mod error;
mod parser;
mod schema;

pub use ast::{Condition, Direction, HopPattern, IdValue, NodePattern, PathPattern, RelPattern};
pub use error::{PatternError, PatternResult};
pub use parser::{parse_hop, parse_path};
pub use schema::{Metaedge, NodeKind, Regulation};

/// HetioNet node identifier, e.g. `"Disease::DOID:2841"`.
pub type NodeId = String;
