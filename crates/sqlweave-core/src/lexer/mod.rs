//! SQL Lexer/Tokenizer
//!
//! A hand-written lexer that turns SQL text into a lazy stream of tokens,
//! and the filtered [`TokenStream`] the parser reads from.

mod cursor;
mod location;
mod stream;
mod token;
mod tokenizer;
mod trie;

pub use cursor::{Cursor, CursorMark, END_OF_INPUT};
pub use location::Location;
pub use stream::{Mark, TokenStream};
pub use token::{Token, TokenKind};
pub use tokenizer::{tokenize, Lexer, LexerConfig};
pub use trie::OperatorTrie;
