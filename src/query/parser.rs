//! State machine driving the scanner
//!
//! Three states consume the input:
//!
//! - **Text** skips spaces, reads `+`/`-` modifiers and dispatches to a
//!   term or a group.
//! - **Term** accumulates one term, detecting the `field:` prefix, the
//!   match-type sigil and quoted spans, then commits it to the root.
//! - **Group** finds the matching `)` and parses the enclosed text with a
//!   fresh parser sharing the same configuration.

use super::ast::{BoolQuery, Condition, MatchType, QueryNode};
use super::builder::build_term;
use super::config::ParserConfig;
use super::scanner::{ItemKind, Scanner};
use crate::error::{QueryError, Result};
use tracing::debug;

const ESCAPE: char = '\\';

/// Root of a parse and the error recorded while building it.
///
/// When `error` is set the tree must not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub root: BoolQuery,
    pub error: Option<QueryError>,
}

impl ParsedQuery {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The query tree, or the recorded error
    pub fn into_result(self) -> Result<QueryNode> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.root.into()),
        }
    }
}

/// Parse a query string into a boolean query tree
pub fn parse_query(input: &str, config: &ParserConfig) -> ParsedQuery {
    parse_at_depth(input, config, 0, 0)
}

/// Parse `input`, which starts at byte `base` of the top-level query
fn parse_at_depth(input: &str, config: &ParserConfig, depth: usize, base: usize) -> ParsedQuery {
    let mut parser = QueryParser::new(input, config, depth, base);
    parser.run();
    ParsedQuery {
        root: parser.root,
        error: parser.error,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Term,
    /// Inside a group opened while the condition was pending
    Group(Condition),
    Done,
}

/// Closing delimiter the current term is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Char(char),
    /// `field:(...)` literal, with its parenthesis depth
    SubQuery(usize),
}

struct QueryParser<'a> {
    scanner: Scanner<'a>,
    config: &'a ParserConfig,
    depth: usize,
    /// Byte offset of `input` within the top-level query
    base: usize,
    root: BoolQuery,
    condition: Condition,
    field: Option<String>,
    match_type: MatchType,
    in_quote: Option<Quote>,
    error: Option<QueryError>,
}

impl<'a> QueryParser<'a> {
    fn new(input: &'a str, config: &'a ParserConfig, depth: usize, base: usize) -> Self {
        Self {
            scanner: Scanner::new(input),
            config,
            depth,
            base,
            root: BoolQuery::new(),
            condition: Condition::Should,
            field: None,
            match_type: MatchType::Auto,
            in_quote: None,
            error: None,
        }
    }

    fn run(&mut self) {
        let mut state = State::Text;
        loop {
            state = match state {
                State::Text => self.lex_text(),
                State::Term => self.lex_term(),
                State::Group(condition) => self.lex_group(condition),
                State::Done => break,
            };
        }
    }

    fn lex_text(&mut self) -> State {
        loop {
            self.skip_whitespace();
            match self.scanner.next() {
                None => return State::Done,
                Some(ESCAPE) => {
                    self.scanner.next();
                }
                Some('(') => return State::Group(self.condition),
                Some('+') => {
                    self.condition = Condition::Must;
                    self.scanner.commit(ItemKind::Must);
                }
                Some('-') => {
                    self.condition = Condition::MustNot;
                    self.scanner.commit(ItemKind::MustNot);
                }
                Some(_) => {
                    self.scanner.backup();
                    return State::Term;
                }
            }
        }
    }

    fn lex_term(&mut self) -> State {
        loop {
            let at_span_start = self.scanner.at_span_start();
            let Some(ch) = self.scanner.next() else {
                self.commit_term();
                return State::Text;
            };

            match ch {
                ESCAPE => {
                    self.scanner.next();
                }
                '"' | '\'' => match self.in_quote {
                    Some(Quote::Char(open)) if open == ch => self.in_quote = None,
                    None if at_span_start => self.in_quote = Some(Quote::Char(ch)),
                    _ => {}
                },
                '(' => {
                    if let Some(Quote::SubQuery(depth)) = &mut self.in_quote {
                        *depth += 1;
                    }
                }
                ')' => {
                    if let Some(Quote::SubQuery(depth)) = self.in_quote {
                        self.in_quote = match depth.saturating_sub(1) {
                            0 => None,
                            depth => Some(Quote::SubQuery(depth)),
                        };
                    }
                }
                ':' | '=' | '~' | '<' | '>' if self.starts_field() => {
                    self.scanner.backup();
                    self.field = Some(self.scanner.value().to_string());
                    if ch == ':' {
                        self.scanner.next();
                    }
                    self.scanner.commit(ItemKind::Field);
                    self.lex_field_type();
                }
                ' ' if self.in_quote.is_none() => {
                    self.commit_term();
                    return State::Text;
                }
                _ => {}
            }
        }
    }

    /// Whether the delimiter just read ends a field name.
    ///
    /// Only the first unquoted delimiter of a term after a non-empty name
    /// counts; later ones belong to the value.
    fn starts_field(&mut self) -> bool {
        if self.in_quote.is_some() || self.field.is_some() {
            return false;
        }
        self.scanner.backup();
        let has_name = !self.scanner.value().is_empty();
        self.scanner.next();
        has_name
    }

    /// Read the optional match-type sigil right after `field:`
    fn lex_field_type(&mut self) {
        let Some(match_type) = self.scanner.peek().and_then(MatchType::from_sigil) else {
            return;
        };
        self.match_type = match_type;

        let kind = match match_type {
            MatchType::Keyword => ItemKind::Keyword,
            MatchType::Regex => ItemKind::Regex,
            MatchType::UpperBound => ItemKind::UpperBound,
            MatchType::LowerBound => ItemKind::LowerBound,
            MatchType::SimpleQuery => {
                // the parenthesis stays part of the literal
                self.in_quote = Some(Quote::SubQuery(0));
                self.scanner.commit(ItemKind::SimpleQuery);
                return;
            }
            MatchType::Auto | MatchType::Phrase => return,
        };
        self.scanner.next();
        self.scanner.commit(kind);
    }

    fn commit_term(&mut self) {
        let built = build_term(
            self.config,
            self.field.as_deref(),
            self.match_type,
            self.scanner.value(),
        );
        let kind = if self.field.is_some() {
            ItemKind::FieldValue
        } else {
            ItemKind::Term
        };
        self.scanner.commit(kind);

        if let Some(err) = built.error {
            self.record_error(err);
        }
        self.attach(self.condition, built.node);
    }

    fn lex_group(&mut self, condition: Condition) -> State {
        let offset = self.base + self.scanner.pos() - 1;
        self.scanner.commit(ItemKind::GroupOpen);
        debug!(offset, depth = self.depth + 1, "group opened");

        let mut open = 1usize;
        let mut in_quote: Option<char> = None;
        loop {
            let previous = self.scanner.previous();
            let Some(ch) = self.scanner.next() else {
                self.fail(QueryError::UnterminatedGroup { offset });
                return State::Done;
            };

            match ch {
                ESCAPE => {
                    self.scanner.next();
                }
                '"' | '\'' => match in_quote {
                    Some(q) if q == ch => in_quote = None,
                    None if !previous.is_some_and(char::is_alphanumeric) => in_quote = Some(ch),
                    _ => {}
                },
                '(' if in_quote.is_none() => open += 1,
                ')' if in_quote.is_none() => {
                    open -= 1;
                    if open > 0 {
                        continue;
                    }
                    self.scanner.backup();
                    let start = self.scanner.start();
                    let body = self.scanner.slice(start, self.scanner.pos());
                    if !self.close_group(condition, body, self.base + start) {
                        return State::Done;
                    }
                    self.scanner.next();
                    self.scanner.commit(ItemKind::GroupClose);
                    return State::Text;
                }
                _ => {}
            }
        }
    }

    /// Parse a group body found at byte `base` and attach it.
    /// Returns false when the parse must stop.
    fn close_group(&mut self, condition: Condition, body: &str, base: usize) -> bool {
        if self.depth + 1 > self.config.max_depth {
            self.fail(QueryError::NestingTooDeep {
                limit: self.config.max_depth,
            });
            return false;
        }

        debug!(body, depth = self.depth + 1, "parsing group");
        let group = parse_at_depth(body, self.config, self.depth + 1, base);
        match group.error {
            Some(err) if err.is_fatal() => {
                self.fail(err);
                false
            }
            Some(err) => {
                self.record_error(err);
                self.attach(condition, group.root.into());
                true
            }
            None => {
                self.attach(condition, group.root.into());
                true
            }
        }
    }

    /// Attach a node to the root and reset the per-term state
    fn attach(&mut self, condition: Condition, node: QueryNode) {
        self.root.add(condition, node);
        self.condition = Condition::Should;
        self.field = None;
        self.match_type = MatchType::Auto;
        self.in_quote = None;
    }

    /// Keep the first validation error
    fn record_error(&mut self, err: QueryError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Fatal errors replace anything recorded before
    fn fail(&mut self, err: QueryError) {
        debug!(error = %err, "parse aborted");
        self.error = Some(err);
    }

    fn skip_whitespace(&mut self) {
        while self.scanner.peek() == Some(' ') {
            self.scanner.next();
            self.scanner.commit(ItemKind::Whitespace);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::RangeDirection;

    fn config() -> ParserConfig {
        ParserConfig::new().with_default_fields(["summary"])
    }

    fn parse(input: &str) -> BoolQuery {
        let parsed = parse_query(input, &config());
        assert!(parsed.error.is_none(), "unexpected error: {:?}", parsed.error);
        parsed.root
    }

    fn summary(value: &str, phrase: bool) -> QueryNode {
        let mut group = BoolQuery::new();
        group.add(
            Condition::Should,
            QueryNode::Match {
                field: "summary".into(),
                value: value.into(),
                phrase,
            },
        );
        QueryNode::Bool(group)
    }

    #[test]
    fn test_empty_query() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
    }

    #[test]
    fn test_simple_terms() {
        let root = parse("foo  bar baz");
        assert_eq!(
            root.should,
            vec![summary("foo", false), summary("bar", false), summary("baz", false)]
        );
        assert!(root.must.is_empty());
        assert!(root.must_not.is_empty());
    }

    #[test]
    fn test_modifiers() {
        let root = parse("+a -b c");
        assert_eq!(root.must, vec![summary("a", false)]);
        assert_eq!(root.must_not, vec![summary("b", false)]);
        assert_eq!(root.should, vec![summary("c", false)]);
    }

    #[test]
    fn test_modifier_resets_after_term() {
        let root = parse("-a b");
        assert_eq!(root.must_not.len(), 1);
        assert_eq!(root.should.len(), 1);
    }

    #[test]
    fn test_dash_inside_term_is_content() {
        let root = parse("foo-bar");
        assert_eq!(root.should, vec![summary("foo-bar", false)]);
    }

    #[test]
    fn test_quoted_phrase() {
        let root = parse("\"hello world\" next");
        assert_eq!(root.should, vec![summary("hello world", true), summary("next", false)]);
    }

    #[test]
    fn test_fielded_phrase() {
        let root = parse("summary:\"hello world\"");
        assert_eq!(
            root.should,
            vec![QueryNode::Match {
                field: "summary".into(),
                value: "hello world".into(),
                phrase: true,
            }]
        );
    }

    #[test]
    fn test_quote_inside_word_does_not_open() {
        let root = parse("don't stop");
        assert_eq!(root.should, vec![summary("don't", false), summary("stop", false)]);
    }

    #[test]
    fn test_unterminated_quote_falls_back() {
        let root = parse("\"open ended");
        assert_eq!(root.should, vec![summary("\"open ended", false)]);
    }

    #[test]
    fn test_sigils() {
        let root = parse("port:=8080 host:~^10\\. p:>80 q:<9");
        assert_eq!(
            root.should,
            vec![
                QueryNode::Keyword {
                    field: "port.keyword".into(),
                    value: "8080".into(),
                },
                QueryNode::Regex {
                    field: "host".into(),
                    pattern: "^10\\.".into(),
                },
                QueryNode::Range {
                    field: "p".into(),
                    bound: "80".into(),
                    direction: RangeDirection::Gt,
                },
                QueryNode::Range {
                    field: "q".into(),
                    bound: "9".into(),
                    direction: RangeDirection::Lt,
                },
            ]
        );
    }

    #[test]
    fn test_shorthand_operators() {
        let root = parse("port=8080 port>80");
        assert_eq!(
            root.should,
            vec![
                QueryNode::Keyword {
                    field: "port.keyword".into(),
                    value: "8080".into(),
                },
                QueryNode::Range {
                    field: "port".into(),
                    bound: "80".into(),
                    direction: RangeDirection::Gt,
                },
            ]
        );
    }

    #[test]
    fn test_later_colons_are_value() {
        let root = parse("time:12:30");
        assert_eq!(
            root.should,
            vec![QueryNode::Match {
                field: "time".into(),
                value: "12:30".into(),
                phrase: false,
            }]
        );
    }

    #[test]
    fn test_simple_query_sigil() {
        let root = parse("name:(foo (bar) baz) after");
        assert_eq!(
            root.should,
            vec![
                QueryNode::SimpleQuery {
                    query: "foo (bar) baz".into(),
                    fields: vec!["name".into()],
                },
                summary("after", false),
            ]
        );
    }

    #[test]
    fn test_group() {
        let root = parse("(a b) c");
        assert_eq!(root.should.len(), 2);
        let group = root.should[0].as_bool().unwrap();
        assert_eq!(group.should, vec![summary("a", false), summary("b", false)]);
        assert_eq!(root.should[1], summary("c", false));
    }

    #[test]
    fn test_group_condition() {
        let root = parse("-(a b) +(c) d");
        assert_eq!(root.must_not.len(), 1);
        assert_eq!(root.must.len(), 1);
        assert_eq!(root.should, vec![summary("d", false)]);
        assert_eq!(root.must_not[0].as_bool().unwrap().should.len(), 2);
    }

    #[test]
    fn test_nested_groups() {
        let root = parse("(a (b \"c )\"))");
        let outer = root.should[0].as_bool().unwrap();
        assert_eq!(outer.should[0], summary("a", false));
        let inner = outer.should[1].as_bool().unwrap();
        assert_eq!(inner.should, vec![summary("b", false), summary("c )", true)]);
    }

    #[test]
    fn test_unterminated_group() {
        let parsed = parse_query("a (b c", &config());
        assert_eq!(parsed.error, Some(QueryError::UnterminatedGroup { offset: 2 }));
        assert_eq!(parsed.root.should.len(), 1);
        assert!(parsed.into_result().is_err());
    }

    #[test]
    fn test_unterminated_inner_group_offset() {
        // the quote hides the inner `(` from the outer scan; the offset is
        // still reported against the whole query
        let parsed = parse_query("(a.'b (c d' e)", &config());
        assert_eq!(parsed.error, Some(QueryError::UnterminatedGroup { offset: 6 }));
        assert!(parsed.into_result().is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let config = config().with_max_depth(2);
        assert!(parse_query("((a))", &config).is_ok());
        let parsed = parse_query("(((a)))", &config);
        assert_eq!(parsed.error, Some(QueryError::NestingTooDeep { limit: 2 }));
    }

    #[test]
    fn test_escaped_paren_is_content() {
        let root = parse("a\\(b");
        assert_eq!(root.should, vec![summary("a\\(b", false)]);
    }

    #[test]
    fn test_escaped_paren_at_term_start() {
        let root = parse("\\(b");
        assert_eq!(root.should, vec![summary("\\(b", false)]);
    }

    #[test]
    fn test_multibyte_terms() {
        let root = parse("héllo 日本:語");
        assert_eq!(
            root.should,
            vec![
                summary("héllo", false),
                QueryNode::Match {
                    field: "日本".into(),
                    value: "語".into(),
                    phrase: false,
                },
            ]
        );
    }

    #[test]
    fn test_group_validation_error_propagates() {
        let config = config().with_field_callback("plugin", |_| anyhow::bail!("denied"));
        let parsed = parse_query("(plugin:x) y", &config);
        assert!(matches!(
            &parsed.error,
            Some(QueryError::FieldValidation { field, value, .. })
                if field == "plugin" && value == "x"
        ));
        assert_eq!(parsed.root.should.len(), 2);
    }

    #[test]
    fn test_into_result() {
        let node = parse_query("a", &config()).into_result().unwrap();
        assert_eq!(node.as_bool().unwrap().should, vec![summary("a", false)]);
    }
}
