use tracing::{debug, trace};
use winnow::ascii::space0;
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::model::{Graph, NodeShape};

/// Parses flowchart text into a graph.
///
/// Total by design: every line that is neither an arrow line nor a standalone
/// node definition is dropped, so any input yields a (possibly empty) graph.
pub fn parse(text: &str) -> Graph {
    let mut graph = Graph::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || is_header(line) {
            continue;
        }
        let mut rest = line;
        if let Ok((from, label, to)) = arrow_line(&mut rest) {
            // Arrow endpoints never overwrite an earlier definition.
            graph.ensure_node(&from.id, &from.label, from.shape);
            graph.ensure_node(&to.id, &to.label, to.shape);
            graph.push_edge(&from.id, &to.id, &label);
        } else if let Ok(decl) = node_line.parse(line) {
            graph.define_node(&decl.id, &decl.label, decl.shape);
        } else {
            trace!("dropped unparsed line: {line:?}");
        }
    }
    debug!(
        "parsed {} nodes and {} edges",
        graph.nodes().len(),
        graph.edges().len()
    );
    graph
}

fn is_header(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    lower.starts_with("flowchart") || lower.starts_with("graph")
}

#[derive(Debug, PartialEq)]
struct NodeRef {
    id: String,
    label: String,
    shape: NodeShape,
}

/// `ID [shape] -->[|label|] ID [shape]`; trailing residue is left unconsumed.
fn arrow_line(input: &mut &str) -> winnow::Result<(NodeRef, String, NodeRef)> {
    let from = node_ref.parse_next(input)?;
    space0.parse_next(input)?;
    take_while(2.., |c: char| c == '-').parse_next(input)?;
    ">".parse_next(input)?;
    let label = opt(edge_label).parse_next(input)?;
    space0.parse_next(input)?;
    let to = node_ref.parse_next(input)?;
    Ok((from, label.unwrap_or_default(), to))
}

fn node_line(input: &mut &str) -> winnow::Result<NodeRef> {
    let id = identifier.parse_next(input)?;
    space0.parse_next(input)?;
    let (shape, raw) = shape_text.parse_next(input)?;
    // Standalone definitions trim first and then fall back, so a blank
    // label becomes the id.
    let trimmed = raw.trim();
    let label = if trimmed.is_empty() { id } else { trimmed };
    Ok(NodeRef {
        id: id.to_string(),
        label: label.to_string(),
        shape,
    })
}

fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

fn node_ref(input: &mut &str) -> winnow::Result<NodeRef> {
    let id = identifier.parse_next(input)?;
    let shape = opt(shape_text).parse_next(input)?;
    // Arrow endpoints fall back to the id before trimming, so absent or
    // empty label text becomes the id while whitespace-only text trims to
    // an empty label.
    let (shape, label) = match shape {
        Some((shape, raw)) if !raw.is_empty() => (shape, raw.trim().to_string()),
        Some((shape, _)) => (shape, id.to_string()),
        None => (NodeShape::Rect, id.to_string()),
    };
    Ok(NodeRef {
        id: id.to_string(),
        label,
        shape,
    })
}

fn shape_text(input: &mut &str) -> winnow::Result<(NodeShape, String)> {
    let shape = alt((
        "((".value(NodeShape::Stadium),
        "([".value(NodeShape::Stadium),
        "[[".value(NodeShape::Subroutine),
        "[".value(NodeShape::Rect),
        "(".value(NodeShape::Round),
        "{".value(NodeShape::Diamond),
        ">".value(NodeShape::Flag),
    ))
    .parse_next(input)?;
    let label = shape_label.parse_next(input)?;
    Ok((shape, label))
}

// Two-char closers listed first so they win ties at the same position.
const CLOSE_TOKENS: [&str; 7] = ["))", "])", "]]", "]", ")", "}", "<"];

/// Raw label text up to the earliest closing delimiter; callers trim. Any
/// closer is accepted regardless of which opener introduced the shape
/// (lenient).
fn shape_label(input: &mut &str) -> winnow::Result<String> {
    let s = *input;
    let mut best: Option<(usize, usize)> = None;
    for close in CLOSE_TOKENS {
        if let Some(at) = s.find(close) {
            match best {
                Some((seen, _)) if seen <= at => {}
                _ => best = Some((at, close.len())),
            }
        }
    }
    let Some((end, token_len)) = best else {
        return Err(winnow::error::ParserError::from_input(input));
    };
    let label = s[..end].to_string();
    *input = &s[end + token_len..];
    Ok(label)
}

fn edge_label(input: &mut &str) -> winnow::Result<String> {
    "|".parse_next(input)?;
    let text = take_while(0.., |c: char| c != '|').parse_next(input)?;
    "|".parse_next(input)?;
    Ok(text.trim().to_string())
}
