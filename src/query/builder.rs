//! Turns a scanned term into a query node
//!
//! The raw span is unquoted when it is a well-formed quoted literal and used
//! verbatim otherwise. Fieldless terms fan out over the default fields;
//! fielded terms go through the field mapping and their match type.

use super::ast::{BoolQuery, Condition, MatchType, QueryNode, RangeDirection};
use super::config::ParserConfig;
use super::fields::{resolve_field, wrap_nested};
use crate::error::QueryError;
use crate::utils::unquote;
use tracing::warn;

/// A committed term and the first validation error it produced, if any
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltTerm {
    pub node: QueryNode,
    pub error: Option<QueryError>,
}

/// Build the node for a term, fielded or not
pub fn build_term(
    config: &ParserConfig,
    field: Option<&str>,
    match_type: MatchType,
    raw: &str,
) -> BuiltTerm {
    match field {
        Some(field) => build_fielded(config, field, match_type, raw),
        None => build_fieldless(config, raw),
    }
}

/// Unquoted value and whether it was quoted
fn literal_value(raw: &str) -> (String, bool) {
    match unquote(raw) {
        Some(value) => (value, true),
        None => (raw.to_string(), false),
    }
}

/// Text of a `field:(...)` literal without its enclosing parentheses.
///
/// The pair is stripped only when the `)` matching the leading `(` ends the
/// span; text after the match keeps the span raw. An unclosed literal loses
/// just its opening `(`.
fn simple_query_text(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('(') else {
        return raw.to_string();
    };
    let mut depth = 1usize;
    let mut chars = inner.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return if i + 1 == inner.len() {
                        inner[..i].trim().to_string()
                    } else {
                        raw.to_string()
                    };
                }
            }
            _ => {}
        }
    }
    inner.trim().to_string()
}

/// Run the callback registered for `field`.
///
/// A rejected value is kept as-is and reported as a validation error.
fn apply_callback(
    config: &ParserConfig,
    field: &str,
    value: String,
) -> (String, Option<QueryError>) {
    let Some(callback) = config.field_callbacks.get(field) else {
        return (value, None);
    };
    match callback(&value) {
        Ok(transformed) => (transformed, None),
        Err(err) => {
            warn!(field, value = %value, error = %err, "field callback rejected value");
            let error = QueryError::FieldValidation {
                field: field.to_string(),
                value: value.clone(),
                reason: err.to_string(),
            };
            (value, Some(error))
        }
    }
}

fn build_fieldless(config: &ParserConfig, raw: &str) -> BuiltTerm {
    let (value, quoted) = literal_value(raw);
    let mut group = BoolQuery::new();
    let mut error = None;

    for field in &config.default_fields {
        let (field_value, field_error) = apply_callback(config, field, value.clone());
        if error.is_none() {
            error = field_error;
        }
        let clause = QueryNode::Match {
            field: field.clone(),
            value: field_value,
            phrase: quoted,
        };
        group.add(Condition::Should, wrap_nested(config, field, clause));
    }

    BuiltTerm {
        node: group.into(),
        error,
    }
}

fn build_fielded(
    config: &ParserConfig,
    field: &str,
    match_type: MatchType,
    raw: &str,
) -> BuiltTerm {
    let field = resolve_field(config, field);
    let (value, quoted) = match match_type {
        MatchType::SimpleQuery => (simple_query_text(raw), false),
        _ => literal_value(raw),
    };
    let (value, error) = apply_callback(config, &field, value);

    let node = match match_type {
        MatchType::Auto | MatchType::Phrase => QueryNode::Match {
            field: field.clone(),
            value,
            phrase: quoted || match_type == MatchType::Phrase,
        },
        MatchType::Keyword => QueryNode::Keyword {
            field: format!("{}.keyword", field),
            value,
        },
        MatchType::Regex => QueryNode::Regex {
            field: field.clone(),
            pattern: value,
        },
        MatchType::UpperBound => QueryNode::Range {
            field: field.clone(),
            bound: value,
            direction: RangeDirection::Gt,
        },
        MatchType::LowerBound => QueryNode::Range {
            field: field.clone(),
            bound: value,
            direction: RangeDirection::Lt,
        },
        MatchType::SimpleQuery => QueryNode::SimpleQuery {
            query: value,
            fields: vec![field.clone()],
        },
    };

    BuiltTerm {
        node: wrap_nested(config, &field, node),
        error,
    }
}
