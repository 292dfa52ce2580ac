use thiserror::Error;

/// Errors surfaced by a query parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A `(` was opened and never closed
    #[error("unclosed ( opened at byte {offset}")]
    UnterminatedGroup { offset: usize },

    /// Parenthesized groups nest deeper than the configured limit
    #[error("groups nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// A registered field callback rejected a value
    #[error("field error {field} : {value} ({reason})")]
    FieldValidation {
        field: String,
        value: String,
        reason: String,
    },
}

/// Result type alias for query parsing
pub type Result<T> = std::result::Result<T, QueryError>;

impl QueryError {
    /// Fatal errors stop the scan immediately; validation errors are only recorded
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QueryError::UnterminatedGroup { .. } | QueryError::NestingTooDeep { .. }
        )
    }
}
