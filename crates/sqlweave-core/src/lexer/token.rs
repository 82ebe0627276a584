//! Token types for the SQL lexer.

use core::fmt;

use super::Location;

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Returned forever once the input is exhausted.
    EndOfInput,
    /// Numeric literal (e.g., `42`, `3.14`).
    Number,
    /// Reserved word of the active dialect, normalized to uppercase.
    Keyword,
    /// Punctuation or operator (e.g., `(`, `<=`).
    Symbol,
    /// A run of whitespace.
    Whitespace,
    /// Single-quoted string literal.
    QuotedString,
    /// Identifier, including `[bracketed]` and `"quoted"` forms.
    Identifier,
    /// `@`-prefixed variable.
    Variable,
    /// Line or block comment.
    Comment,
    /// A character the lexer does not recognize.
    Unknown,
}

impl TokenKind {
    /// Returns a human-readable name for diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfInput => "end of input",
            Self::Number => "number",
            Self::Keyword => "keyword",
            Self::Symbol => "symbol",
            Self::Whitespace => "whitespace",
            Self::QuotedString => "string",
            Self::Identifier => "identifier",
            Self::Variable => "variable",
            Self::Comment => "comment",
            Self::Unknown => "unknown character",
        }
    }

    /// Returns true for tokens the token stream filters out.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token with its location in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The token value.
    ///
    /// Keywords are uppercase, identifiers keep their source casing without
    /// delimiters, and strings hold their unescaped contents.
    pub value: String,
    /// Where the token starts.
    pub location: Location,
    /// Whether an identifier was written with delimiters (`[x]` or `"x"`).
    pub quoted: bool,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
            quoted: false,
        }
    }

    /// Creates a delimited identifier token.
    #[must_use]
    pub fn quoted_identifier(value: impl Into<String>, location: Location) -> Self {
        Self {
            quoted: true,
            ..Self::new(TokenKind::Identifier, value, location)
        }
    }

    /// Creates an end-of-input token.
    #[must_use]
    pub fn end_of_input(location: Location) -> Self {
        Self::new(TokenKind::EndOfInput, "", location)
    }

    /// Returns true if this is the end-of-input token.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfInput)
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value.eq_ignore_ascii_case(keyword)
    }

    /// Returns true if this token is the given symbol.
    #[must_use]
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.value == symbol
    }

    /// Returns true if the token has the given kind and, when provided,
    /// value. Keyword values compare case-insensitively.
    #[must_use]
    pub fn matches(&self, kind: TokenKind, value: Option<&str>) -> bool {
        if self.kind != kind {
            return false;
        }
        match value {
            None => true,
            Some(value) if kind == TokenKind::Keyword => self.value.eq_ignore_ascii_case(value),
            Some(value) => self.value == value,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => f.write_str("end of input"),
            kind => write!(f, "{kind} '{}'", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_end() {
        let end = Token::end_of_input(Location::default());
        let select = Token::new(TokenKind::Keyword, "SELECT", Location::default());
        assert!(end.is_end());
        assert!(!select.is_end());
    }

    #[test]
    fn test_token_matches() {
        let select = Token::new(TokenKind::Keyword, "SELECT", Location::default());
        assert!(select.matches(TokenKind::Keyword, None));
        assert!(select.matches(TokenKind::Keyword, Some("select")));
        assert!(!select.matches(TokenKind::Identifier, Some("SELECT")));

        let ident = Token::new(TokenKind::Identifier, "Users", Location::default());
        assert!(ident.matches(TokenKind::Identifier, Some("Users")));
        assert!(!ident.matches(TokenKind::Identifier, Some("users")));
    }

    #[test]
    fn test_token_display() {
        let plus = Token::new(TokenKind::Symbol, "+", Location::default());
        assert_eq!(plus.to_string(), "symbol '+'");
        assert_eq!(
            Token::end_of_input(Location::default()).to_string(),
            "end of input"
        );
    }

    #[test]
    fn test_quoted_identifier_flag() {
        let token = Token::quoted_identifier("My Table", Location::default());
        assert_eq!(token.kind, TokenKind::Identifier);
        assert!(token.quoted);
    }
}
