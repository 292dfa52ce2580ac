//! # YQL - compact search query language
//!
//! YQL compiles a human-typed search string such as
//! `+host:10.0.0.1 -port:>1024 "exposed database"` into a boolean query
//! tree, and renders that tree as an Elasticsearch query.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`query`] - Scanner, state machine parser and query tree
//! - [`output`] - Elasticsearch rendering and terminal output
//! - [`error`] - Parse errors
//! - [`utils`] - Quoted literal unescaping
//!
//! ## Quick Start
//!
//! ```
//! use yql::query::{parse_query, ParserConfig};
//!
//! let config = ParserConfig::new()
//!     .with_default_fields(["events.hostname", "events.summary"])
//!     .with_nested_paths(["events"])
//!     .with_field_mapping([("host", "events.host")]);
//!
//! let query = parse_query("+host:1.2.3.4 nginx", &config).into_result().unwrap();
//! let json = yql::output::render(&query, false);
//! assert!(json.contains("events.host"));
//! ```
//!
//! ## Syntax
//!
//! | Input              | Meaning                                        |
//! |--------------------|------------------------------------------------|
//! | `word`             | match on every default field                   |
//! | `"two words"`      | phrase match                                   |
//! | `+term` / `-term`  | required / excluded                            |
//! | `field:value`      | match (phrase when quoted)                     |
//! | `field:=value`     | exact match on `field.keyword`                 |
//! | `field:~regex`     | regular expression                             |
//! | `field:>n`         | greater than (exclusive)                       |
//! | `field:<n`         | less than (exclusive)                          |
//! | `field:(a b)`      | free-text query scoped to the field            |
//! | `(a b)`            | group, parsed as its own boolean query         |
//! | `\x`               | escapes `x`                                    |
//!
//! There are no inclusive range operators: in `port:>=80` the `=` is part of
//! the bound, giving `port > "=80"`.

pub mod error;
pub mod output;
pub mod query;
pub mod utils;

pub use error::{QueryError, Result};
pub use query::{parse_query, ParsedQuery, ParserConfig, QueryNode};
