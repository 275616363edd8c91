//! Lexical error records.
//!
//! Lexical errors are data, not control flow: the scanner emits an
//! `Invalid` token into the stream and records a [`LexError`] alongside,
//! then keeps scanning. Downstream stages decide whether to continue.

use thiserror::Error;
use vela_ir::Span;

/// One recoverable lexical error, located by its span.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LexError {
    /// WHERE the error occurred, in global offsets.
    pub span: Span,
    /// WHAT went wrong.
    pub kind: LexErrorKind,
}

/// What kind of lexical error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("empty character literal")]
    EmptyCharLiteral,
    #[error("character literal holds more than one character")]
    MultiCharLiteral,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("unterminated documentation comment")]
    UnterminatedDocComment,
    #[error("unrecognized escape sequence '\\{escape}'")]
    InvalidEscape { escape: char },
    #[error("'\\x' escape needs two hex digits for a byte below 0x80")]
    InvalidHexEscape,
    #[error("integer literal too large")]
    IntOverflow,
    #[error("malformed numeric literal")]
    MalformedNumber,
    #[error("invalid byte 0x{byte:02X} in source")]
    InvalidByte { byte: u8 },
    #[error("character '{ch}' is not valid here")]
    InvalidChar { ch: char },
    #[error("null byte in source")]
    InteriorNull,
}
