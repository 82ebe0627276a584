//! SQL Tokenizer implementation.

use std::collections::HashSet;

use tracing::debug;

use super::cursor::{Cursor, END_OF_INPUT};
use super::{Location, OperatorTrie, Token, TokenKind};

/// The dialect-specific tables the lexer classifies words and symbols with.
#[derive(Debug, Clone)]
pub struct LexerConfig {
    keywords: HashSet<&'static str>,
    operators: OperatorTrie,
    double_quoted_identifiers: bool,
}

impl LexerConfig {
    /// Creates a configuration from uppercase keywords and multi-character
    /// operators.
    #[must_use]
    pub fn new<K, O>(keywords: K, operators: O) -> Self
    where
        K: IntoIterator<Item = &'static str>,
        O: IntoIterator<Item = &'static str>,
    {
        Self {
            keywords: keywords.into_iter().collect(),
            operators: operators.into_iter().collect(),
            double_quoted_identifiers: true,
        }
    }

    /// Sets whether `"name"` lexes as a quoted identifier.
    #[must_use]
    pub const fn with_double_quoted_identifiers(mut self, enabled: bool) -> Self {
        self.double_quoted_identifiers = enabled;
        self
    }

    /// Returns true if `word` is a keyword (case-insensitive).
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word.to_ascii_uppercase().as_str())
    }

    /// Returns true if `operator` is a registered multi-character operator.
    #[must_use]
    pub fn is_operator(&self, operator: &str) -> bool {
        self.operators.contains(operator)
    }
}

/// A lexer that tokenizes SQL input.
///
/// The lexer is a lazy, single-pass iterator: it yields every token
/// including whitespace and comments, ends with exactly one
/// [`TokenKind::EndOfInput`] token and then returns `None`.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    config: &'a LexerConfig,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str, config: &'a LexerConfig) -> Self {
        Self::from_cursor(Cursor::new(input), config)
    }

    /// Creates a lexer reading from an existing cursor.
    #[must_use]
    pub const fn from_cursor(cursor: Cursor<'a>, config: &'a LexerConfig) -> Self {
        Self {
            cursor,
            config,
            finished: false,
        }
    }

    /// Scans the next token.
    fn scan(&mut self) -> Token {
        let location = self.cursor.location();
        let c = self.cursor.next();

        match c {
            END_OF_INPUT if self.cursor.is_at_end() => Token::end_of_input(location),
            c if c.is_whitespace() => self.scan_whitespace(c, location),
            c if c.is_ascii_digit() => self.scan_number(c, location),
            '@' => self.scan_variable(location),
            '\'' => self.scan_string(location),
            '[' => self.scan_delimited_identifier(']', location),
            '"' if self.config.double_quoted_identifiers => {
                self.scan_delimited_identifier('"', location)
            }
            '-' if self.cursor.peek() == '-' => self.scan_line_comment(location),
            '/' if self.cursor.peek() == '*' => self.scan_block_comment(location),
            c if is_word_start(c) => self.scan_word(c, location),
            c if c.is_ascii_punctuation() => self.scan_operator(c, location),
            c => Token::new(TokenKind::Unknown, c.to_string(), location),
        }
    }

    fn scan_whitespace(&mut self, first: char, location: Location) -> Token {
        let mut text = String::from(first);
        while self.cursor.peek().is_whitespace() && !self.cursor.is_at_end() {
            text.push(self.cursor.next());
        }
        Token::new(TokenKind::Whitespace, text, location)
    }

    /// Scans digits with an optional decimal fraction. There is no exponent
    /// form: `1e5` lexes as `1` followed by the word `e5`.
    fn scan_number(&mut self, first: char, location: Location) -> Token {
        let mut text = String::from(first);
        self.take_digits(&mut text);

        if self.cursor.peek() == '.' {
            let dot = self.cursor.next();
            if self.cursor.peek().is_ascii_digit() {
                text.push(dot);
                self.take_digits(&mut text);
            } else {
                self.cursor.put_back(dot);
            }
        }

        Token::new(TokenKind::Number, text, location)
    }

    fn take_digits(&mut self, text: &mut String) {
        while self.cursor.peek().is_ascii_digit() {
            text.push(self.cursor.next());
        }
    }

    fn scan_variable(&mut self, location: Location) -> Token {
        let mut text = String::from('@');
        while is_variable_part(self.cursor.peek()) {
            text.push(self.cursor.next());
        }
        if text.len() == 1 {
            return Token::new(TokenKind::Symbol, text, location);
        }
        Token::new(TokenKind::Variable, text, location)
    }

    fn scan_word(&mut self, first: char, location: Location) -> Token {
        let mut text = String::from(first);
        while is_word_part(self.cursor.peek()) {
            text.push(self.cursor.next());
        }

        if self.config.is_keyword(&text) {
            Token::new(TokenKind::Keyword, text.to_ascii_uppercase(), location)
        } else {
            Token::new(TokenKind::Identifier, text, location)
        }
    }

    /// Scans a string literal; `''` is an escaped quote.
    fn scan_string(&mut self, location: Location) -> Token {
        let mut value = String::new();
        loop {
            match self.cursor.next() {
                END_OF_INPUT if self.cursor.is_at_end() => {
                    debug!(%location, "unterminated string literal runs to end of input");
                    break;
                }
                '\'' if self.cursor.peek() == '\'' => {
                    self.cursor.next();
                    value.push('\'');
                }
                '\'' => break,
                c => value.push(c),
            }
        }
        Token::new(TokenKind::QuotedString, value, location)
    }

    /// Scans `[name]` or `"name"`; a doubled closing delimiter is an
    /// escaped one.
    fn scan_delimited_identifier(&mut self, close: char, location: Location) -> Token {
        let mut value = String::new();
        loop {
            match self.cursor.next() {
                END_OF_INPUT if self.cursor.is_at_end() => {
                    debug!(%location, "unterminated quoted identifier runs to end of input");
                    break;
                }
                c if c == close && self.cursor.peek() == close => {
                    self.cursor.next();
                    value.push(close);
                }
                c if c == close => break,
                c => value.push(c),
            }
        }
        Token::quoted_identifier(value, location)
    }

    fn scan_line_comment(&mut self, location: Location) -> Token {
        let mut text = String::from('-');
        while self.cursor.peek() != '\n' && !self.cursor.is_at_end() {
            text.push(self.cursor.next());
        }
        Token::new(TokenKind::Comment, text, location)
    }

    fn scan_block_comment(&mut self, location: Location) -> Token {
        let mut text = String::from('/');
        text.push(self.cursor.next());
        loop {
            match self.cursor.next() {
                END_OF_INPUT if self.cursor.is_at_end() => {
                    debug!(%location, "unterminated block comment runs to end of input");
                    break;
                }
                '*' if self.cursor.peek() == '/' => {
                    text.push('*');
                    text.push(self.cursor.next());
                    break;
                }
                c => text.push(c),
            }
        }
        Token::new(TokenKind::Comment, text, location)
    }

    /// Extends `first` along the operator trie for as long as a registered
    /// operator continues, then emits the longest registered operator read.
    fn scan_operator(&mut self, first: char, location: Location) -> Token {
        let mut text = String::from(first);
        let mut longest = (text.len(), self.cursor.mark());
        while self.config.operators.extends(&text, self.cursor.peek()) {
            text.push(self.cursor.next());
            if self.config.operators.contains(&text) {
                longest = (text.len(), self.cursor.mark());
            }
        }
        let (len, mark) = longest;
        if text.len() > len {
            text.truncate(len);
            self.cursor.reset(mark);
        }
        Token::new(TokenKind::Symbol, text, location)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.scan();
        self.finished = token.is_end();
        Some(token)
    }
}

/// Tokenizes the entire input, including trivia and the final
/// end-of-input token.
#[must_use]
pub fn tokenize(input: &str, config: &LexerConfig) -> Vec<Token> {
    Lexer::new(input, config).collect()
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '$' | '#')
}

fn is_word_part(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '#')
}

fn is_variable_part(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '$' | '#' | '_')
}
