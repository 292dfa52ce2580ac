//! Elasticsearch rendering of query trees and terminal output

use crate::error::QueryError;
use crate::query::{BoolQuery, QueryNode, RangeDirection};
use serde_json::{json, Map, Value};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Convert a query tree into the Elasticsearch query DSL
pub fn to_elastic(node: &QueryNode) -> Value {
    match node {
        QueryNode::Match {
            field,
            value,
            phrase: false,
        } => json!({ "match": { field: { "query": value } } }),
        QueryNode::Match {
            field,
            value,
            phrase: true,
        } => json!({ "match_phrase": { field: { "query": value } } }),
        QueryNode::Keyword { field, value } => json!({ "term": { field: value } }),
        QueryNode::Range {
            field,
            bound,
            direction,
        } => {
            let op = match direction {
                RangeDirection::Gt => "gt",
                RangeDirection::Lt => "lt",
            };
            json!({ "range": { field: { op: bound } } })
        }
        QueryNode::Regex { field, pattern } => json!({ "regexp": { field: { "value": pattern } } }),
        QueryNode::SimpleQuery { query, fields } => {
            json!({ "simple_query_string": { "query": query, "fields": fields } })
        }
        QueryNode::Nested { path, inner } => {
            json!({ "nested": { "path": path, "query": to_elastic(inner) } })
        }
        QueryNode::Bool(b) => bool_to_elastic(b),
    }
}

fn bool_to_elastic(b: &BoolQuery) -> Value {
    let mut clauses = Map::new();
    for (name, nodes) in [("must", &b.must), ("must_not", &b.must_not), ("should", &b.should)] {
        if !nodes.is_empty() {
            clauses.insert(
                name.to_string(),
                Value::Array(nodes.iter().map(to_elastic).collect()),
            );
        }
    }
    json!({ "bool": clauses })
}

/// Serialize a query tree to a JSON document
pub fn render(node: &QueryNode, pretty: bool) -> String {
    let doc = to_elastic(node);
    if pretty {
        serde_json::to_string_pretty(&doc).unwrap_or_default()
    } else {
        doc.to_string()
    }
}

/// Print a rendered document to stdout
pub fn print_document(document: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", document)
}

/// Print a parse error to stderr, highlighting the offending field
pub fn print_error(err: &QueryError, choice: ColorChoice) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(choice);

    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(stderr, "error")?;
    stderr.reset()?;
    write!(stderr, ": ")?;

    match err {
        QueryError::FieldValidation {
            field,
            value,
            reason,
        } => {
            write!(stderr, "field error ")?;
            stderr.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(stderr, "{}", field)?;
            stderr.reset()?;
            write!(stderr, " : ")?;
            stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(stderr, "{}", value)?;
            stderr.reset()?;
            writeln!(stderr, " ({})", reason)?;
        }
        other => writeln!(stderr, "{}", other)?,
    }

    Ok(())
}
