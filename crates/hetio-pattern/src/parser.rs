//! Hop and path pattern parser implementation using nom.
//!
//! Accepts the subset of Cypher relationship patterns that the query engine
//! issues against native graph backends: single hops, chains of hops and
//! `WHERE [NOT] hop AND ...` existence conditions.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case, take_while, take_while1},
    character::complete::{char, multispace0, one_of},
    combinator::{all_consuming, cut, map, map_res, opt},
    multi::{fold_many0, many1, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::ast::{Condition, Direction, HopPattern, IdValue, NodePattern, PathPattern, RelPattern};
use crate::error::{PatternError, PatternResult};
use crate::schema::{Metaedge, NodeKind};

/// Parse a single-hop relationship pattern.
///
/// # Examples
///
/// ```rust
/// use hetio_pattern::{parse_hop, Metaedge, NodeKind};
///
/// let hop = parse_hop("(c:Compound)-[:CtD|CpD]->(d:Disease {id: $disease_id})").unwrap();
/// assert_eq!(hop.source().kind, Some(NodeKind::Compound));
/// assert_eq!(hop.rel.metaedges, vec![Metaedge::CtD, Metaedge::CpD]);
/// assert_eq!(hop.unbound_parameters(), vec!["disease_id"]);
/// ```
pub fn parse_hop(input: &str) -> PatternResult<HopPattern> {
    parse_with(input, hop_pattern)
}

/// Parse a path pattern: one or more chained hops, optionally followed by
/// `WHERE` conditions joined with `AND`.
///
/// # Examples
///
/// ```rust
/// use hetio_pattern::{parse_path, NodeKind};
///
/// let path = parse_path(
///     "(c:Compound)-[:CuG]->(g:Gene)<-[:AdG]-(a:Anatomy) WHERE NOT (c)-[:CtD|CpD]->(:Disease)",
/// )
/// .unwrap();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.nodes[2].kind, Some(NodeKind::Anatomy));
/// assert!(path.conditions[0].negated);
/// ```
pub fn parse_path(input: &str) -> PatternResult<PathPattern> {
    parse_with(input, path_pattern)
}

fn parse_with<'a, T>(
    input: &'a str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
) -> PatternResult<T> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PatternError::EmptyPattern);
    }

    match all_consuming(parser)(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = input.len() - e.input.len();
            Err(PatternError::ParseError {
                position,
                message: format!("unexpected input at: '{}'", truncate(e.input, 20)),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(PatternError::Incomplete("pattern".to_string())),
    }
}

fn truncate(s: &str, max_len: usize) -> &str {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

// ============================================================================
// Hop
// ============================================================================

fn hop_pattern(input: &str) -> IResult<&str, HopPattern> {
    map(
        tuple((
            delimited(ws, node_pattern, ws),
            relationship,
            delimited(ws, node_pattern, ws),
        )),
        |(left, rel, right)| HopPattern { left, rel, right },
    )(input)
}

// ============================================================================
// Path
// ============================================================================

fn path_pattern(input: &str) -> IResult<&str, PathPattern> {
    let (input, first) = delimited(ws, node_pattern, ws)(input)?;
    let (input, steps) = many1(pair(relationship, delimited(ws, node_pattern, ws)))(input)?;
    let (input, conditions) = opt(preceded(
        pair(tag_no_case("WHERE"), ws),
        cut(separated_list1(tuple((ws, tag_no_case("AND"), ws)), condition)),
    ))(input)?;

    let mut nodes = vec![first];
    let mut rels = Vec::with_capacity(steps.len());
    for (rel, node) in steps {
        rels.push(rel);
        nodes.push(node);
    }
    Ok((
        input,
        PathPattern {
            nodes,
            rels,
            conditions: conditions.unwrap_or_default(),
        },
    ))
}

fn condition(input: &str) -> IResult<&str, Condition> {
    map(
        pair(opt(pair(tag_no_case("NOT"), ws)), hop_pattern),
        |(not, hop)| Condition {
            negated: not.is_some(),
            hop,
        },
    )(input)
}

// ============================================================================
// Node patterns
// ============================================================================

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn node_kind(input: &str) -> IResult<&str, NodeKind> {
    map_res(identifier, |s: &str| s.parse::<NodeKind>())(input)
}

fn node_pattern(input: &str) -> IResult<&str, NodePattern> {
    let (input, _) = pair(char('('), ws)(input)?;
    let (input, variable) = opt(identifier)(input)?;
    let (input, kind) = opt(preceded(tuple((ws, char(':'), ws)), cut(node_kind)))(input)?;
    let (input, id) = opt(preceded(ws, id_property))(input)?;
    let (input, _) = pair(ws, char(')'))(input)?;

    Ok((
        input,
        NodePattern {
            variable: variable.map(|v| v.to_string()),
            kind,
            id,
        },
    ))
}

fn id_property(input: &str) -> IResult<&str, IdValue> {
    delimited(
        pair(char('{'), ws),
        preceded(tuple((tag("id"), ws, char(':'), ws)), cut(id_value)),
        pair(ws, char('}')),
    )(input)
}

fn id_value(input: &str) -> IResult<&str, IdValue> {
    alt((
        map(preceded(char('$'), identifier), |name: &str| {
            IdValue::Parameter(name.to_string())
        }),
        map(quoted, IdValue::Literal),
    ))(input)
}

/// Double quotes take `\"` and `\\` escapes; single quotes are verbatim.
fn quoted(input: &str) -> IResult<&str, String> {
    alt((
        delimited(
            char('"'),
            fold_many0(
                alt((
                    map(is_not("\\\""), str::to_string),
                    map(preceded(char('\\'), one_of("\\\"")), String::from),
                )),
                String::new,
                |mut acc, piece| {
                    acc.push_str(&piece);
                    acc
                },
            ),
            char('"'),
        ),
        map(
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            str::to_string,
        ),
    ))(input)
}

// ============================================================================
// Relationship patterns
// ============================================================================

fn metaedge(input: &str) -> IResult<&str, Metaedge> {
    map_res(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '>'),
        |s: &str| s.parse::<Metaedge>(),
    )(input)
}

fn metaedge_list(input: &str) -> IResult<&str, Vec<Metaedge>> {
    preceded(
        pair(char(':'), ws),
        separated_list1(
            tuple((ws, char('|'), ws, opt(char(':')), ws)),
            cut(metaedge),
        ),
    )(input)
}

fn rel_body(input: &str) -> IResult<&str, Vec<Metaedge>> {
    delimited(pair(char('['), ws), metaedge_list, pair(ws, char(']')))(input)
}

fn relationship(input: &str) -> IResult<&str, RelPattern> {
    alt((
        map(delimited(tag("<-"), rel_body, char('-')), |metaedges| {
            RelPattern {
                metaedges,
                direction: Direction::Incoming,
            }
        }),
        map(delimited(char('-'), rel_body, tag("->")), |metaedges| {
            RelPattern {
                metaedges,
                direction: Direction::Outgoing,
            }
        }),
    ))(input)
}
