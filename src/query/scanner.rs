//! Rune-level cursor over the query string
//!
//! The scanner never copies the input. `start..pos` is the span accumulated
//! since the last [`Scanner::commit`], and `width` is the byte length of the
//! last character returned by [`Scanner::next`] so it can be undone once.

use tracing::trace;

/// What a committed span was consumed as (only used for tracing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Term,
    Field,
    FieldValue,
    Must,
    MustNot,
    Whitespace,
    GroupOpen,
    GroupClose,
    Keyword,
    Regex,
    LowerBound,
    UpperBound,
    SimpleQuery,
}

/// Cursor owned by a single parse invocation
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    start: usize,
    pos: usize,
    width: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            start: 0,
            pos: 0,
            width: 0,
        }
    }

    /// Consume and return the next character, `None` at end of input
    pub fn next(&mut self) -> Option<char> {
        match self.input[self.pos..].chars().next() {
            Some(ch) => {
                self.width = ch.len_utf8();
                self.pos += self.width;
                Some(ch)
            }
            None => {
                self.width = 0;
                None
            }
        }
    }

    /// Return the next character without consuming it
    pub fn peek(&mut self) -> Option<char> {
        let ch = self.next();
        self.backup();
        ch
    }

    /// Step back over the character returned by the last `next`.
    /// A second call without an intervening `next` is a no-op.
    pub fn backup(&mut self) {
        self.pos -= self.width;
        self.width = 0;
    }

    /// Mark everything up to the current position as consumed
    pub fn commit(&mut self, kind: ItemKind) {
        trace!(?kind, span = &self.input[self.start..self.pos], "commit");
        self.start = self.pos;
    }

    /// Trimmed text accumulated since the last commit
    pub fn value(&self) -> &'a str {
        self.input[self.start..self.pos].trim()
    }

    /// True when nothing has been scanned since the last commit
    pub fn at_span_start(&self) -> bool {
        self.start == self.pos
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Raw input between two byte offsets
    pub fn slice(&self, from: usize, to: usize) -> &'a str {
        &self.input[from..to]
    }

    /// Character immediately before the current position
    pub fn previous(&self) -> Option<char> {
        self.input[..self.pos].chars().next_back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_until_eof() {
        let mut s = Scanner::new("ab");
        assert_eq!(s.next(), Some('a'));
        assert_eq!(s.next(), Some('b'));
        assert_eq!(s.next(), None);
        assert_eq!(s.next(), None);
        assert_eq!(s.pos(), 2);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut s = Scanner::new("xy");
        assert_eq!(s.peek(), Some('x'));
        assert_eq!(s.peek(), Some('x'));
        assert_eq!(s.next(), Some('x'));
        assert_eq!(s.peek(), Some('y'));
    }

    #[test]
    fn test_backup_multibyte() {
        let mut s = Scanner::new("é日x");
        assert_eq!(s.next(), Some('é'));
        assert_eq!(s.pos(), 2);
        assert_eq!(s.next(), Some('日'));
        assert_eq!(s.pos(), 5);
        s.backup();
        assert_eq!(s.pos(), 2);
        // only one step back is allowed
        s.backup();
        assert_eq!(s.pos(), 2);
        assert_eq!(s.next(), Some('日'));
        assert_eq!(s.next(), Some('x'));
    }

    #[test]
    fn test_backup_at_eof_is_noop() {
        let mut s = Scanner::new("a");
        s.next();
        assert_eq!(s.next(), None);
        s.backup();
        assert_eq!(s.pos(), 1);
    }

    #[test]
    fn test_commit_and_value() {
        let mut s = Scanner::new("  foo bar");
        s.next();
        s.next();
        s.commit(ItemKind::Whitespace);
        assert!(s.at_span_start());
        for _ in 0..4 {
            s.next();
        }
        assert_eq!(s.value(), "foo");
        assert_eq!(s.start(), 2);
        assert_eq!(s.previous(), Some(' '));
    }
}
