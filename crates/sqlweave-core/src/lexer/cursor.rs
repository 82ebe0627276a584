//! Character cursor over the raw SQL text.

use super::Location;
use crate::parser::ParseError;

/// Character returned once the input is exhausted.
pub const END_OF_INPUT: char = '\0';

/// A saved cursor position, see [`Cursor::mark`].
#[derive(Debug, Clone, Copy)]
pub struct CursorMark {
    offset: usize,
    location: Location,
}

/// A character-level cursor with line/column tracking.
///
/// The cursor supports one character of lookahead through [`Cursor::peek`]
/// and can undo the most recent [`Cursor::next`] with [`Cursor::put_back`].
/// Longer backtracking goes through [`Cursor::mark`] and [`Cursor::reset`].
/// Once the input is exhausted every read returns [`END_OF_INPUT`].
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    /// Byte offset of the next unread character.
    offset: usize,
    /// Location of the next unread character.
    location: Location,
    /// Offset and location before the latest `next`, for `put_back`.
    last: Option<(usize, Location)>,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            location: Location::new(1, 1),
            last: None,
        }
    }

    /// Returns the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> char {
        self.input[self.offset..]
            .chars()
            .next()
            .unwrap_or(END_OF_INPUT)
    }

    /// Consumes and returns the next character.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> char {
        let Some(c) = self.input[self.offset..].chars().next() else {
            self.last = None;
            return END_OF_INPUT;
        };
        self.last = Some((self.offset, self.location));
        self.offset += c.len_utf8();
        if c == '\n' {
            self.location = Location::new(self.location.line + 1, 1);
        } else {
            self.location = Location::new(self.location.line, self.location.column + 1);
        }
        c
    }

    /// Undoes the most recent [`Cursor::next`].
    ///
    /// `c` must be the character that call returned. Putting back the
    /// end-of-input sentinel is a no-op since exhaustion is sticky.
    pub fn put_back(&mut self, c: char) {
        if c == END_OF_INPUT {
            return;
        }
        if let Some((offset, location)) = self.last.take() {
            debug_assert_eq!(self.input[offset..].chars().next(), Some(c));
            self.offset = offset;
            self.location = location;
        }
    }

    /// Saves the current position.
    #[must_use]
    pub const fn mark(&self) -> CursorMark {
        CursorMark {
            offset: self.offset,
            location: self.location,
        }
    }

    /// Returns to a position saved by [`Cursor::mark`].
    pub fn reset(&mut self, mark: CursorMark) {
        self.offset = mark.offset;
        self.location = mark.location;
        self.last = None;
    }

    /// Consumes the next character, failing if it is not `expected`.
    pub fn expect(&mut self, expected: char) -> Result<char, ParseError> {
        let location = self.location;
        let found = self.next();
        if found == expected {
            Ok(found)
        } else {
            self.put_back(found);
            Err(ParseError::unexpected_char(expected, found, location))
        }
    }

    /// Returns the location of the next unread character.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Returns true once every character has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), 'a');
        assert_eq!(cursor.peek(), 'a');
    }

    #[test]
    fn test_next_tracks_lines_and_columns() {
        let mut cursor = Cursor::new("a\nbc");
        assert_eq!(cursor.location().position(), (1, 1));
        cursor.next();
        assert_eq!(cursor.location().position(), (1, 2));
        cursor.next();
        assert_eq!(cursor.location().position(), (2, 1));
        cursor.next();
        assert_eq!(cursor.location().position(), (2, 2));
    }

    #[test]
    fn test_exhaustion_is_idempotent() {
        let mut cursor = Cursor::new("x");
        assert_eq!(cursor.next(), 'x');
        assert_eq!(cursor.next(), END_OF_INPUT);
        assert_eq!(cursor.next(), END_OF_INPUT);
        assert_eq!(cursor.peek(), END_OF_INPUT);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_put_back_restores_location() {
        let mut cursor = Cursor::new("a\nb");
        cursor.next();
        let newline = cursor.next();
        assert_eq!(cursor.location().position(), (2, 1));
        cursor.put_back(newline);
        assert_eq!(cursor.location().position(), (1, 2));
        assert_eq!(cursor.peek(), '\n');
    }

    #[test]
    fn test_put_back_repeated_with_reconsume() {
        let mut cursor = Cursor::new("-x");
        let c = cursor.next();
        cursor.put_back(c);
        assert_eq!(cursor.peek(), '-');
        let c = cursor.next();
        cursor.put_back(c);
        assert_eq!(cursor.next(), '-');
        assert_eq!(cursor.next(), 'x');
    }

    #[test]
    fn test_reset_rewinds_several_characters() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.next();
        let mark = cursor.mark();
        cursor.next();
        cursor.next();
        cursor.next();
        assert_eq!(cursor.location().position(), (2, 2));
        cursor.reset(mark);
        assert_eq!(cursor.location().position(), (1, 2));
        assert_eq!(cursor.next(), 'b');
    }

    #[test]
    fn test_expect() {
        let mut cursor = Cursor::new("[a");
        assert!(cursor.expect('[').is_ok());
        let err = cursor.expect(']').unwrap_err();
        assert_eq!(err.location.position(), (1, 2));
        assert_eq!(cursor.peek(), 'a');
    }

    #[test]
    fn test_multibyte_characters() {
        let mut cursor = Cursor::new("é1");
        assert_eq!(cursor.next(), 'é');
        assert_eq!(cursor.next(), '1');
        assert_eq!(cursor.location().position(), (1, 3));
    }
}
