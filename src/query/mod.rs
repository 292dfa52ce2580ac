pub mod ast;
pub mod builder;
pub mod config;
pub mod fields;
pub mod parser;
pub mod scanner;

pub use ast::{BoolQuery, Condition, MatchType, QueryNode, RangeDirection};
pub use config::{FieldCallback, ParserConfig};
pub use parser::{parse_query, ParsedQuery};
