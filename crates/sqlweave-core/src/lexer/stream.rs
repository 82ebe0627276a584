//! Filtered token stream with unbounded put-back.

use tracing::trace;

use super::{Lexer, Location, Token, TokenKind};
use crate::parser::ParseError;

/// A saved stream position, see [`TokenStream::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// The token interface the parser reads from.
///
/// Whitespace and comments are dropped. Every significant token is kept in
/// a buffer, so tokens can be put back one at a time in LIFO order or a
/// whole speculative branch can be abandoned with [`TokenStream::reset`].
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    buffer: Vec<Token>,
    position: usize,
    last_location: Location,
}

impl<'a> TokenStream<'a> {
    /// Creates a stream over a lexer.
    #[must_use]
    pub const fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            buffer: Vec::new(),
            position: 0,
            last_location: Location::new(1, 1),
        }
    }

    /// Makes sure `buffer[position]` exists.
    fn fill(&mut self) {
        while self.position >= self.buffer.len() {
            let token = match self.lexer.next() {
                Some(token) if token.kind.is_trivia() => {
                    self.last_location = token.location;
                    continue;
                }
                Some(token) => token,
                // The lexer already produced its end token, which is still
                // in the buffer; only reachable after a synthetic insert.
                None => Token::end_of_input(self.last_location),
            };
            self.last_location = token.location;
            self.buffer.push(token);
        }
    }

    /// Consumes and returns the next significant token.
    ///
    /// Returns the end-of-input token forever once the input is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token {
        self.fill();
        let token = self.buffer[self.position].clone();
        if !token.is_end() {
            self.position += 1;
        }
        token
    }

    /// Returns the next significant token without consuming it.
    pub fn peek(&mut self) -> Token {
        let token = self.next();
        self.put_back(token.clone());
        token
    }

    /// Returns the kind of the next token without cloning its value.
    pub fn peek_kind(&mut self) -> TokenKind {
        self.fill();
        self.buffer[self.position].kind
    }

    /// Puts a token back onto the stream.
    ///
    /// Tokens must be put back in the reverse order they were read. A token
    /// that was never read from this stream is inserted in front of the
    /// remaining input.
    pub fn put_back(&mut self, token: Token) {
        if token.is_end() {
            return;
        }
        if self.position > 0 && Self::same_place(&self.buffer[self.position - 1], &token) {
            self.position -= 1;
        } else {
            self.buffer.insert(self.position, token);
        }
    }

    /// Token equality ignores locations, so a put-back token is matched
    /// against the one last read by where it was read as well.
    fn same_place(read: &Token, token: &Token) -> bool {
        read.location.position() == token.location.position() && read == token
    }

    /// Saves the current position.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark(self.position)
    }

    /// Returns to a position saved with [`TokenStream::mark`], putting back
    /// every token read since.
    pub fn reset(&mut self, mark: Mark) {
        if mark.0 < self.position {
            trace!(tokens = self.position - mark.0, "backtracking token stream");
        }
        self.position = mark.0;
    }

    /// Consumes the next token if it has the given kind and value, failing
    /// with a parse error otherwise.
    pub fn expect(&mut self, kind: TokenKind, value: Option<&str>) -> Result<Token, ParseError> {
        let token = self.next();
        if token.matches(kind, value) {
            return Ok(token);
        }
        let expected = value.map_or_else(|| kind.to_string(), |v| format!("{kind} '{v}'"));
        self.put_back(token.clone());
        Err(ParseError::unexpected(expected, token))
    }

    /// Returns true if the next token has the given kind and value,
    /// consuming it when `consume` is set and it matched.
    pub fn next_is(&mut self, kind: TokenKind, value: Option<&str>, consume: bool) -> bool {
        let token = self.next();
        let matched = token.matches(kind, value);
        if !(matched && consume) {
            self.put_back(token);
        }
        matched
    }

    /// Consumes a run of tokens of the given kind and value, returning how
    /// many were skipped.
    pub fn skip(&mut self, kind: TokenKind, value: Option<&str>) -> usize {
        let mut skipped = 0;
        while self.next_is(kind, value, true) {
            skipped += 1;
        }
        skipped
    }

    /// Returns the location of the next token.
    pub fn location(&mut self) -> Location {
        self.fill();
        self.buffer[self.position].location
    }
}
