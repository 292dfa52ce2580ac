//! Field name remapping and nested-path detection

use super::ast::QueryNode;
use super::config::ParserConfig;

/// Apply the configured field mapping to a field name.
///
/// An exact source match replaces the whole name. Otherwise the longest
/// source that is a dotted prefix (`source.`) is replaced and the remainder
/// kept, so with `host -> events.host`, `host.ip` becomes `events.host.ip`.
pub fn resolve_field(config: &ParserConfig, field: &str) -> String {
    if let Some(target) = config.field_mapping.get(field) {
        return target.clone();
    }

    config
        .field_mapping
        .iter()
        .filter(|(source, _)| {
            field.len() > source.len()
                && field.starts_with(source.as_str())
                && field.as_bytes()[source.len()] == b'.'
        })
        .max_by_key(|(source, _)| source.len())
        .map(|(source, target)| format!("{}{}", target, &field[source.len()..]))
        .unwrap_or_else(|| field.to_string())
}

/// Whether `field` lives under the nested `path`
pub fn in_nested_path(field: &str, path: &str) -> bool {
    field == path
        || (field.len() > path.len()
            && field.starts_with(path)
            && field.as_bytes()[path.len()] == b'.')
}

/// Wrap `node` once for every nested path containing `field`.
///
/// Longer paths wrap first so the shortest path ends up outermost.
pub fn wrap_nested(config: &ParserConfig, field: &str, node: QueryNode) -> QueryNode {
    let mut paths: Vec<&String> = config
        .nested_paths
        .iter()
        .filter(|path| in_nested_path(field, path))
        .collect();
    paths.sort_by(|a, b| b.len().cmp(&a.len()));

    paths
        .into_iter()
        .fold(node, |inner, path| QueryNode::nested(path.as_str(), inner))
}
