//! Hand-written lexer for the Vela compiler.
//!
//! One [`Lexer`] makes a single forward pass over one file's bytes and
//! produces [`vela_ir::Token`]s lazily. It consults the shared
//! [`vela_ir::SymbolTable`] to tell identifiers from keywords, reports
//! line boundaries to the file's position index as it crosses them, and
//! decodes literal payloads into the per-unit [`vela_arena::Arena`].
//!
//! Lexical errors never abort the scan: anything matching no rule becomes
//! an `Invalid` token with its span, plus a [`LexError`] record, and
//! scanning continues.

mod cursor;
mod lex_error;
mod scanner;
mod source_buffer;

pub use cursor::Cursor;
pub use lex_error::{LexError, LexErrorKind};
pub use scanner::{tokenize, Lexer};
pub use source_buffer::SourceBuffer;
