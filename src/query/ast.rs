//! Query tree produced by the parser
//!
//! The tree is independent of any search-engine wire format; see
//! [`crate::output`] for the Elasticsearch mapping.

/// Interpretation of a fielded term, chosen by the sigil after the colon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchType {
    /// No sigil: phrase when quoted, plain match otherwise
    #[default]
    Auto,
    Phrase,
    /// `=`: exact match on the non-analyzed `<field>.keyword`
    Keyword,
    /// `~`
    Regex,
    /// `<`
    LowerBound,
    /// `>`
    UpperBound,
    /// `(`: field-scoped free-text query
    SimpleQuery,
}

impl MatchType {
    /// Match type selected by a sigil character, if it is one
    pub fn from_sigil(ch: char) -> Option<Self> {
        match ch {
            '=' => Some(MatchType::Keyword),
            '~' => Some(MatchType::Regex),
            '>' => Some(MatchType::UpperBound),
            '<' => Some(MatchType::LowerBound),
            '(' => Some(MatchType::SimpleQuery),
            _ => None,
        }
    }
}

/// Boolean role of the next attached node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Condition {
    #[default]
    Should,
    Must,
    MustNot,
}

/// Direction of an exclusive range bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDirection {
    /// Greater than the bound
    Gt,
    /// Less than the bound
    Lt,
}

/// Query AST node
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// Analyzed match, or phrase match when `phrase` is set
    Match {
        field: String,
        value: String,
        phrase: bool,
    },
    /// Exact term match
    Keyword { field: String, value: String },
    /// Exclusive range
    Range {
        field: String,
        bound: String,
        direction: RangeDirection,
    },
    /// Regular expression match
    Regex { field: String, pattern: String },
    /// Free-text query scoped to some fields
    SimpleQuery { query: String, fields: Vec<String> },
    /// Scope `inner` to the nested documents under `path`
    Nested { path: String, inner: Box<QueryNode> },
    /// Boolean aggregate
    Bool(BoolQuery),
}

impl QueryNode {
    pub fn nested(path: impl Into<String>, inner: QueryNode) -> Self {
        QueryNode::Nested {
            path: path.into(),
            inner: Box::new(inner),
        }
    }

    /// Field the leaf targets, `None` for composite nodes
    pub fn field(&self) -> Option<&str> {
        match self {
            QueryNode::Match { field, .. }
            | QueryNode::Keyword { field, .. }
            | QueryNode::Range { field, .. }
            | QueryNode::Regex { field, .. } => Some(field),
            QueryNode::SimpleQuery { fields, .. } => fields.first().map(String::as_str),
            QueryNode::Nested { .. } | QueryNode::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            QueryNode::Bool(b) => Some(b),
            _ => None,
        }
    }
}

/// Boolean aggregate with independent must / must-not / should lists
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    pub must: Vec<QueryNode>,
    pub must_not: Vec<QueryNode>,
    pub should: Vec<QueryNode>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node under the given condition
    pub fn add(&mut self, condition: Condition, node: QueryNode) {
        match condition {
            Condition::Must => self.must.push(node),
            Condition::MustNot => self.must_not.push(node),
            Condition::Should => self.should.push(node),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty() && self.should.is_empty()
    }

    /// Total number of clauses across all three lists
    pub fn len(&self) -> usize {
        self.must.len() + self.must_not.len() + self.should.len()
    }
}

impl From<BoolQuery> for QueryNode {
    fn from(b: BoolQuery) -> Self {
        QueryNode::Bool(b)
    }
}
