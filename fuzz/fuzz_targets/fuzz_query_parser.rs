#![no_main]

use libfuzzer_sys::fuzz_target;
use yql::query::{parse_query, ParserConfig};

fuzz_target!(|data: &str| {
    // Arbitrary input must never panic, including unbalanced groups and quotes
    let config = ParserConfig::new()
        .with_default_fields(["events.hostname", "summary"])
        .with_nested_paths(["events"])
        .with_field_mapping([("host", "events.host")])
        .with_max_depth(16);
    if let Ok(node) = parse_query(data, &config).into_result() {
        let _ = yql::output::render(&node, false);
    }
});
