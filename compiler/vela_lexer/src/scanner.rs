//! The Vela scanner: one forward, non-rewindable pass per file.
//!
//! Main dispatch is on the current byte. Each arm calls a focused method
//! that takes the token's start offset, advances the cursor, and returns
//! the finished token. Lookahead is bounded (two bytes, or a `Copy`
//! cursor snapshot for `*` runs in doc comments); there is no
//! backtracking.
//!
//! Three modes, per the documentation-comment sub-grammar: `Normal`
//! code, `DocsParse` for the line structure inside `/** … */`, and
//! `DocsParseDirective` for the token stream after an `@directive`.

use vela_arena::Arena;
use vela_ir::{fnv1a, SourceFile, Span, SymbolTable, Token, TokenKind, TokenValue};

use crate::{Cursor, LexError, LexErrorKind, SourceBuffer};

/// Scanner mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum LexerState {
    Normal,
    DocsParse,
    DocsParseDirective,
}

/// Casing shape of an identifier run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Shape {
    /// Lowercase-looking: the only shape eligible for keyword lookup.
    Plain,
    /// Only uppercase letters, digits, underscores: `FOO_BAR`.
    Constant,
    /// First alphabetic char uppercase with lowercase present: `FooBar`.
    Type,
}

/// The lexer. Drives one file's bytes to a token stream.
///
/// Context objects are explicit: the shared per-compilation
/// [`SymbolTable`], the file's [`SourceFile`] position index (fed one
/// line boundary per `\n` crossed), and the per-unit [`Arena`] that
/// receives decoded literal payloads.
pub struct Lexer<'a, 'ctx> {
    cursor: Cursor<'a>,
    arena: &'a Arena,
    symbols: &'ctx mut SymbolTable,
    file: &'ctx mut SourceFile,
    state: LexerState,
    errors: Vec<LexError>,
    /// File-local offset of the `/**` that opened the current docs
    /// comment, for unterminated-docs spans.
    docs_open: u32,
    /// Set once the `Eof` token has been produced.
    done: bool,
}

impl<'a, 'ctx> Lexer<'a, 'ctx> {
    pub fn new(
        buffer: &'a SourceBuffer,
        arena: &'a Arena,
        symbols: &'ctx mut SymbolTable,
        file: &'ctx mut SourceFile,
    ) -> Lexer<'a, 'ctx> {
        debug_assert_eq!(buffer.len(), file.len(), "buffer and file must agree");
        Lexer {
            cursor: buffer.cursor(),
            arena,
            symbols,
            file,
            state: LexerState::Normal,
            errors: Vec::new(),
            docs_open: 0,
            done: false,
        }
    }

    /// Produce the next token.
    ///
    /// Exhausted input yields `Eof`; calls after that keep yielding `Eof`
    /// (the iterator adapter stops at the first one).
    pub fn next_token(&mut self) -> Token<'a> {
        match self.state {
            LexerState::Normal => self.scan_normal(),
            LexerState::DocsParse => self.scan_docs_line(),
            LexerState::DocsParseDirective => self.scan_docs_directive(),
        }
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    // ─── Modes ──────────────────────────────────────────────────────

    fn scan_normal(&mut self) -> Token<'a> {
        loop {
            let start = self.cursor.pos();
            match self.cursor.current() {
                0 => {
                    if self.cursor.is_eof() {
                        return self.eof_token();
                    }
                    self.cursor.advance();
                    return self.error_token(start, LexErrorKind::InteriorNull);
                }
                b' ' | b'\t' | b'\r' => self.cursor.eat_whitespace(),
                b'\n' => self.consume_newline(),
                b'/' => match self.cursor.peek() {
                    b'/' => self.cursor.eat_until_newline_or_eof(),
                    b'*' => {
                        if let Some(token) = self.block_comment(start) {
                            return token;
                        }
                    }
                    _ => return self.operator(start),
                },
                _ => return self.scan_content(start),
            }
        }
    }

    /// Line structure inside `/** … */`: directive lines, text lines,
    /// line terminators, and the closing marker.
    fn scan_docs_line(&mut self) -> Token<'a> {
        loop {
            self.cursor.eat_whitespace();
            let start = self.cursor.pos();
            match self.cursor.current() {
                0 => {
                    if self.cursor.is_eof() {
                        return self.unterminated_docs();
                    }
                    self.cursor.advance();
                    return self.error_token(start, LexErrorKind::InteriorNull);
                }
                b'\n' => {
                    self.consume_newline();
                    return self.token(TokenKind::DocsEol, start);
                }
                b'*' => {
                    if let Some(token) = self.try_docs_end(start) {
                        return token;
                    }
                    // Decorative leading stars; skip and look again.
                    self.cursor.eat_while(|b| b == b'*');
                }
                b'@' if is_ident_start(self.cursor.peek()) => {
                    let token = self.sigil(start);
                    self.state = LexerState::DocsParseDirective;
                    return token;
                }
                _ => return self.docs_text_line(start),
            }
        }
    }

    /// Ordinary token scanning after an `@directive`, until the line
    /// terminator returns control to the line grammar.
    fn scan_docs_directive(&mut self) -> Token<'a> {
        loop {
            let start = self.cursor.pos();
            match self.cursor.current() {
                0 => {
                    if self.cursor.is_eof() {
                        return self.unterminated_docs();
                    }
                    self.cursor.advance();
                    return self.error_token(start, LexErrorKind::InteriorNull);
                }
                b' ' | b'\t' | b'\r' => self.cursor.eat_whitespace(),
                b'\n' => {
                    self.consume_newline();
                    self.state = LexerState::DocsParse;
                    return self.token(TokenKind::DocsEol, start);
                }
                b'*' => {
                    if let Some(token) = self.try_docs_end(start) {
                        return token;
                    }
                    return self.operator(start);
                }
                b'/' => match self.cursor.peek() {
                    b'/' => self.cursor.eat_until_newline_or_eof(),
                    b'*' => {
                        if let Some(token) = self.block_comment(start) {
                            return token;
                        }
                    }
                    _ => return self.operator(start),
                },
                _ => return self.scan_content(start),
            }
        }
    }

    /// Dispatch for a non-trivia byte, shared by `Normal` and directive
    /// modes.
    fn scan_content(&mut self, start: u32) -> Token<'a> {
        match self.cursor.current() {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
            b'0'..=b'9' => self.number(start),
            b'"' => self.string(start),
            b'\'' => self.char_literal(start),
            b'@' | b'#' | b'$' => self.sigil(start),
            _ => self.operator(start),
        }
    }

    // ─── Identifiers & sigils ───────────────────────────────────────

    fn identifier(&mut self, start: u32) -> Token<'a> {
        self.cursor.eat_while(is_ident_char);
        let text = self.cursor.slice_from(start);
        let symbol = self.symbols.intern_hashed(text, fnv1a(text.as_bytes()));
        let kind = match identifier_shape(text) {
            // All reserved words are lowercase, so only the plain shape
            // can be overridden by a pre-seeded keyword kind.
            Shape::Plain if symbol.kind() != TokenKind::Ident => {
                return self.token(symbol.kind(), start);
            }
            Shape::Plain => TokenKind::Ident,
            Shape::Constant => TokenKind::ConstIdent,
            Shape::Type => TokenKind::TypeIdent,
        };
        Token::with_value(kind, self.span(start), TokenValue::Sym(symbol))
    }

    /// `@name` / `#name` / `$name` as one token, so `@ name` can never
    /// pass for a directive. The sigil-included text is interned; a
    /// pre-seeded directive spelling (`@param`, `$if`, …) wins over the
    /// generic sigil kind.
    fn sigil(&mut self, start: u32) -> Token<'a> {
        let sigil = self.cursor.current();
        self.cursor.advance();
        if !is_ident_start(self.cursor.current()) {
            let kind = match sigil {
                b'@' => TokenKind::At,
                b'#' => TokenKind::Hash,
                _ => TokenKind::Dollar,
            };
            return self.token(kind, start);
        }
        self.cursor.eat_while(is_ident_char);
        let text = self.cursor.slice_from(start);
        let symbol = self.symbols.intern_hashed(text, fnv1a(text.as_bytes()));
        if symbol.kind() != TokenKind::Ident {
            return self.token(symbol.kind(), start);
        }
        let kind = match sigil {
            b'@' => TokenKind::AtIdent,
            b'#' => TokenKind::HashIdent,
            _ => TokenKind::CtIdent,
        };
        Token::with_value(kind, self.span(start), TokenValue::Sym(symbol))
    }

    // ─── Numbers ────────────────────────────────────────────────────

    fn number(&mut self, start: u32) -> Token<'a> {
        let first = self.cursor.current();
        self.cursor.advance();

        if first == b'0' {
            // The second digit byte must fit the radix, otherwise `0` is
            // a decimal literal and the letter starts a malformed tail.
            match self.cursor.current() {
                b'x' | b'X' if matches!(self.cursor.peek(), b'_') || self.cursor.peek().is_ascii_hexdigit() => {
                    return self.radix_number(start, 16);
                }
                b'o' | b'O' if matches!(self.cursor.peek(), b'0'..=b'7' | b'_') => {
                    return self.radix_number(start, 8);
                }
                b'b' | b'B' if matches!(self.cursor.peek(), b'0' | b'1' | b'_') => {
                    return self.radix_number(start, 2);
                }
                _ => {}
            }
        }

        self.cursor.eat_while(is_decimal_digit);
        let mut is_real = false;
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_while(is_decimal_digit);
            is_real = true;
        }
        if matches!(self.cursor.current(), b'e' | b'E')
            && exponent_follows(self.cursor.peek(), self.cursor.peek2())
        {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            self.cursor.eat_while(is_decimal_digit);
            is_real = true;
        }
        self.finish_number(start, start, 10, is_real)
    }

    /// Hex/octal/binary literal; cursor sits on the radix letter.
    /// A fraction or a `p` exponent forces classification as real.
    fn radix_number(&mut self, start: u32, radix: u32) -> Token<'a> {
        self.cursor.advance();
        let digits_start = self.cursor.pos();
        self.cursor.eat_while(radix_digit(radix));
        let mut is_real = false;
        if self.cursor.current() == b'.' && digit_value(self.cursor.peek(), radix).is_some() {
            self.cursor.advance();
            self.cursor.eat_while(radix_digit(radix));
            is_real = true;
        }
        if matches!(self.cursor.current(), b'p' | b'P')
            && exponent_follows(self.cursor.peek(), self.cursor.peek2())
        {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            self.cursor.eat_while(is_decimal_digit);
            is_real = true;
        }
        self.finish_number(start, digits_start, radix, is_real)
    }

    fn finish_number(
        &mut self,
        start: u32,
        digits_start: u32,
        radix: u32,
        is_real: bool,
    ) -> Token<'a> {
        // An identifier run glued to the literal is malformed as a whole:
        // 123abc, 0xFFG, 1.5e3x.
        if is_ident_char(self.cursor.current()) {
            self.cursor.eat_while(is_ident_char);
            return self.error_token(start, LexErrorKind::MalformedNumber);
        }
        let text = self.cursor.slice_from(digits_start);
        if is_real {
            match decode_real(text, radix) {
                Some(value) => {
                    Token::with_value(TokenKind::Real, self.span(start), TokenValue::Real(value))
                }
                None => self.error_token(start, LexErrorKind::MalformedNumber),
            }
        } else {
            match decode_int(text, radix) {
                Some(value) => {
                    Token::with_value(TokenKind::Integer, self.span(start), TokenValue::Int(value))
                }
                None => self.error_token(start, LexErrorKind::IntOverflow),
            }
        }
    }

    // ─── Strings & characters ───────────────────────────────────────

    fn string(&mut self, start: u32) -> Token<'a> {
        self.cursor.advance(); // opening quote
        let mut buf = String::new();
        let mut seg_start = self.cursor.pos();
        let mut bad_escape = false;
        loop {
            let delim = self.cursor.skip_to_string_delim();
            buf.push_str(self.cursor.slice(seg_start, self.cursor.pos()));
            match delim {
                b'"' => {
                    self.cursor.advance();
                    if bad_escape {
                        // The offending escapes were already recorded.
                        return self.invalid_token(start);
                    }
                    let text = self.arena.alloc_str(&buf);
                    return Token::with_value(
                        TokenKind::String,
                        self.span(start),
                        TokenValue::Str(text),
                    );
                }
                b'\\' => {
                    let escape_start = self.cursor.pos();
                    self.cursor.advance();
                    if self.cursor.is_eof() || self.cursor.current() == b'\n' {
                        return self.error_token(start, LexErrorKind::UnterminatedString);
                    }
                    match self.scan_escape() {
                        Ok(c) => buf.push(c),
                        Err(kind) => {
                            self.errors.push(LexError {
                                span: Span::new(
                                    self.global(escape_start),
                                    self.global(self.cursor.pos()),
                                ),
                                kind,
                            });
                            bad_escape = true;
                        }
                    }
                    seg_start = self.cursor.pos();
                }
                // Newline, carriage return, or EOF: the string never
                // closed. The terminator is left for the caller so line
                // accounting stays in one place.
                _ => return self.error_token(start, LexErrorKind::UnterminatedString),
            }
        }
    }

    /// `'x'` has no token kind of its own: it lexes as an `Integer`
    /// carrying the character value.
    fn char_literal(&mut self, start: u32) -> Token<'a> {
        self.cursor.advance(); // opening quote
        let value = match self.cursor.current() {
            0 if self.cursor.is_eof() => {
                return self.error_token(start, LexErrorKind::UnterminatedChar)
            }
            b'\n' => return self.error_token(start, LexErrorKind::UnterminatedChar),
            b'\'' => {
                self.cursor.advance();
                return self.error_token(start, LexErrorKind::EmptyCharLiteral);
            }
            b'\\' => {
                self.cursor.advance();
                if self.cursor.is_eof() || self.cursor.current() == b'\n' {
                    return self.error_token(start, LexErrorKind::UnterminatedChar);
                }
                match self.scan_escape() {
                    Ok(c) => u64::from(u32::from(c)),
                    Err(kind) => {
                        self.skip_to_char_close();
                        return self.error_token(start, kind);
                    }
                }
            }
            _ => {
                let width = Cursor::utf8_char_width(self.cursor.current());
                let end = self.cursor.pos() + width;
                let ch = self
                    .cursor
                    .slice(self.cursor.pos(), end)
                    .chars()
                    .next()
                    .expect("width covers one character");
                self.cursor.advance_n(width);
                u64::from(u32::from(ch))
            }
        };
        if self.cursor.current() == b'\'' {
            self.cursor.advance();
            return Token::with_value(TokenKind::Integer, self.span(start), TokenValue::Int(value));
        }
        let closed = self.skip_to_char_close();
        let kind = if closed {
            LexErrorKind::MultiCharLiteral
        } else {
            LexErrorKind::UnterminatedChar
        };
        self.error_token(start, kind)
    }

    /// Consume to the closing `'` on this line, for error recovery.
    /// Returns whether a closing quote was found.
    fn skip_to_char_close(&mut self) -> bool {
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => return false,
                b'\n' => return false,
                b'\'' => {
                    self.cursor.advance();
                    return true;
                }
                b'\\' if self.cursor.peek() != b'\n' && self.cursor.peek() != 0 => {
                    self.cursor.advance_n(2);
                }
                _ => self.cursor.advance(),
            }
        }
    }

    /// Decode one escape; the backslash is already consumed and the
    /// current byte is neither newline nor EOF.
    fn scan_escape(&mut self) -> Result<char, LexErrorKind> {
        let b = self.cursor.current();
        let simple = match b {
            b'\\' => Some('\\'),
            b'"' => Some('"'),
            b'\'' => Some('\''),
            b'n' => Some('\n'),
            b'r' => Some('\r'),
            b't' => Some('\t'),
            b'0' => Some('\0'),
            b'v' => Some('\x0B'),
            b'f' => Some('\x0C'),
            b'a' => Some('\x07'),
            b'b' => Some('\x08'),
            b'e' => Some('\x1B'),
            _ => None,
        };
        if let Some(c) = simple {
            self.cursor.advance();
            return Ok(c);
        }
        if b == b'x' {
            self.cursor.advance();
            let hi = digit_value(self.cursor.current(), 16);
            let lo = digit_value(self.cursor.peek(), 16);
            return match (hi, lo) {
                // Escaped bytes stay in the ASCII range so string
                // payloads remain valid UTF-8.
                (Some(h), Some(l)) if h < 8 => {
                    self.cursor.advance_n(2);
                    Ok(char::from((h * 16 + l) as u8))
                }
                _ => {
                    if hi.is_some() {
                        self.cursor.advance();
                        if lo.is_some() {
                            self.cursor.advance();
                        }
                    }
                    Err(LexErrorKind::InvalidHexEscape)
                }
            };
        }
        // Unknown escape: consume one full character for the record.
        let width = Cursor::utf8_char_width(b);
        let ch = self
            .cursor
            .slice(self.cursor.pos(), self.cursor.pos() + width)
            .chars()
            .next()
            .expect("width covers one character");
        self.cursor.advance_n(width);
        Err(LexErrorKind::InvalidEscape { escape: ch })
    }

    // ─── Comments ───────────────────────────────────────────────────

    /// Cursor sits on `/` with `*` next. Skips a (nested) block comment,
    /// or enters the docs sub-grammar on `/**`. Returns a token only for
    /// `DocsStart` and the unterminated case.
    fn block_comment(&mut self, start: u32) -> Option<Token<'a>> {
        self.cursor.advance_n(2); // "/*"

        if self.cursor.current() == b'*' {
            if self.cursor.peek() == b'/' {
                // "/**/" is an empty plain comment, not a docs open.
                self.cursor.advance_n(2);
                return None;
            }
            self.cursor.advance();
            self.docs_open = start;
            self.state = LexerState::DocsParse;
            return Some(self.token(TokenKind::DocsStart, start));
        }

        let mut depth = 1u32;
        loop {
            match self.cursor.current() {
                0 => {
                    if self.cursor.is_eof() {
                        return Some(
                            self.error_token(start, LexErrorKind::UnterminatedBlockComment),
                        );
                    }
                    self.cursor.advance();
                }
                b'\n' => self.consume_newline(),
                b'*' if self.cursor.peek() == b'/' => {
                    self.cursor.advance_n(2);
                    depth -= 1;
                    if depth == 0 {
                        return None;
                    }
                }
                b'/' if self.cursor.peek() == b'*' => {
                    self.cursor.advance_n(2);
                    depth += 1;
                }
                _ => self.cursor.advance(),
            }
        }
    }

    /// Probe a `*` run for the closing `*…*/` marker. Any number of
    /// stars may close the comment; control returns to `Normal` either
    /// way the marker is spelled.
    fn try_docs_end(&mut self, start: u32) -> Option<Token<'a>> {
        let mut probe = self.cursor;
        probe.eat_while(|b| b == b'*');
        if probe.current() != b'/' {
            return None;
        }
        probe.advance();
        self.cursor = probe;
        self.state = LexerState::Normal;
        Some(self.token(TokenKind::DocsEnd, start))
    }

    /// A plain text line inside a docs comment: everything up to the
    /// line terminator or the closing marker.
    fn docs_text_line(&mut self, start: u32) -> Token<'a> {
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => break,
                b'\n' => break,
                b'*' => {
                    let mut probe = self.cursor;
                    probe.eat_while(|b| b == b'*');
                    if probe.current() == b'/' {
                        break;
                    }
                    self.cursor = probe;
                }
                _ => self.cursor.advance(),
            }
        }
        self.token(TokenKind::DocsLine, start)
    }

    fn unterminated_docs(&mut self) -> Token<'a> {
        self.state = LexerState::Normal;
        let span = Span::new(self.global(self.docs_open), self.global(self.cursor.pos()));
        self.errors.push(LexError {
            span,
            kind: LexErrorKind::UnterminatedDocComment,
        });
        Token::new(TokenKind::Invalid, span)
    }

    // ─── Operators ──────────────────────────────────────────────────

    /// Maximal munch: each arm tries its longest spelling first and
    /// falls back towards a single character.
    fn operator(&mut self, start: u32) -> Token<'a> {
        use TokenKind::*;
        let b = self.cursor.current();
        let kind = match b {
            b'&' => match (self.cursor.peek(), self.cursor.peek2()) {
                (b'&', b'=') => self.eat(3, AndAssign),
                (b'&', _) => self.eat(2, And),
                (b'=', _) => self.eat(2, BitAndAssign),
                _ => self.eat(1, Amp),
            },
            b'|' => match (self.cursor.peek(), self.cursor.peek2()) {
                (b'|', b'=') => self.eat(3, OrAssign),
                (b'|', _) => self.eat(2, Or),
                (b'=', _) => self.eat(2, BitOrAssign),
                _ => self.eat(1, BitOr),
            },
            b'<' => match (self.cursor.peek(), self.cursor.peek2()) {
                (b'<', b'=') => self.eat(3, ShlAssign),
                (b'<', _) => self.eat(2, Shl),
                (b'=', _) => self.eat(2, LessEq),
                _ => self.eat(1, Less),
            },
            b'>' => match (self.cursor.peek(), self.cursor.peek2()) {
                (b'>', b'=') => self.eat(3, ShrAssign),
                (b'>', _) => self.eat(2, Shr),
                (b'=', _) => self.eat(2, GreaterEq),
                _ => self.eat(1, Greater),
            },
            b'.' => match (self.cursor.peek(), self.cursor.peek2()) {
                (b'.', b'.') => self.eat(3, Ellipsis),
                (b'.', _) => self.eat(2, DotDot),
                _ => self.eat(1, Dot),
            },
            b'=' => match self.cursor.peek() {
                b'=' => self.eat(2, EqEq),
                _ => self.eat(1, Eq),
            },
            b'!' => match self.cursor.peek() {
                b'=' => self.eat(2, NotEqual),
                _ => self.eat(1, Not),
            },
            b'+' => match self.cursor.peek() {
                b'+' => self.eat(2, PlusPlus),
                b'=' => self.eat(2, PlusAssign),
                _ => self.eat(1, Plus),
            },
            b'-' => match self.cursor.peek() {
                b'-' => self.eat(2, MinusMinus),
                b'=' => self.eat(2, MinusAssign),
                b'>' => self.eat(2, Arrow),
                _ => self.eat(1, Minus),
            },
            b'*' => match self.cursor.peek() {
                b'=' => self.eat(2, MultAssign),
                _ => self.eat(1, Star),
            },
            b'/' => match self.cursor.peek() {
                b'=' => self.eat(2, DivAssign),
                _ => self.eat(1, Div),
            },
            b'%' => match self.cursor.peek() {
                b'=' => self.eat(2, ModAssign),
                _ => self.eat(1, Mod),
            },
            b'^' => match self.cursor.peek() {
                b'=' => self.eat(2, BitXorAssign),
                _ => self.eat(1, BitXor),
            },
            b'?' => match self.cursor.peek() {
                b':' => self.eat(2, Elvis),
                _ => self.eat(1, Question),
            },
            b':' => match self.cursor.peek() {
                b':' => self.eat(2, Scope),
                _ => self.eat(1, Colon),
            },
            b'(' => match self.cursor.peek() {
                b'{' => self.eat(2, LParBra),
                _ => self.eat(1, LParen),
            },
            b'}' => match self.cursor.peek() {
                b')' => self.eat(2, RParBra),
                _ => self.eat(1, RBrace),
            },
            b')' => self.eat(1, RParen),
            b'[' => self.eat(1, LBracket),
            b']' => self.eat(1, RBracket),
            b'{' => self.eat(1, LBrace),
            b',' => self.eat(1, Comma),
            b';' => self.eat(1, Eos),
            b'~' => self.eat(1, BitNot),
            _ => return self.invalid_char(start, b),
        };
        self.token(kind, start)
    }

    /// Advance `n` bytes and pass the kind through.
    #[inline]
    fn eat(&mut self, n: u32, kind: TokenKind) -> TokenKind {
        self.cursor.advance_n(n);
        kind
    }

    fn invalid_char(&mut self, start: u32, byte: u8) -> Token<'a> {
        if byte.is_ascii() {
            self.cursor.advance();
            return self.error_token(start, LexErrorKind::InvalidByte { byte });
        }
        let width = Cursor::utf8_char_width(byte);
        let ch = self
            .cursor
            .slice(self.cursor.pos(), self.cursor.pos() + width)
            .chars()
            .next()
            .expect("width covers one character");
        self.cursor.advance_n(width);
        self.error_token(start, LexErrorKind::InvalidChar { ch })
    }

    // ─── Plumbing ───────────────────────────────────────────────────

    /// Translate a file-local offset into the global address space.
    #[inline]
    fn global(&self, local: u32) -> u32 {
        self.file.start_id() + local
    }

    #[inline]
    fn span(&self, start: u32) -> Span {
        Span::new(self.global(start), self.global(self.cursor.pos()))
    }

    #[inline]
    fn token(&self, kind: TokenKind, start: u32) -> Token<'a> {
        Token::new(kind, self.span(start))
    }

    fn eof_token(&self) -> Token<'a> {
        Token::new(TokenKind::Eof, Span::point(self.global(self.cursor.pos())))
    }

    fn invalid_token(&self, start: u32) -> Token<'a> {
        Token::new(TokenKind::Invalid, self.span(start))
    }

    fn error_token(&mut self, start: u32, kind: LexErrorKind) -> Token<'a> {
        let token = self.invalid_token(start);
        self.errors.push(LexError {
            span: token.span,
            kind,
        });
        token
    }

    /// The single place a `\n` is consumed: advances past it and reports
    /// the following offset to the file's position index.
    fn consume_newline(&mut self) {
        debug_assert_eq!(self.cursor.current(), b'\n');
        self.cursor.advance();
        let line_start = self.global(self.cursor.pos());
        self.file.append_line_start(line_start);
        tracing::trace!(line_start, "line boundary");
    }
}

/// Tokens until (and including) the first `Eof`; nothing follows it.
impl<'a> Iterator for Lexer<'a, '_> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(token)
    }
}

/// Drive one file to `Eof` and collect the stream.
///
/// Returns the tokens (terminated by exactly one `Eof`) and the errors
/// recorded along the way.
pub fn tokenize<'a>(
    buffer: &'a SourceBuffer,
    arena: &'a Arena,
    symbols: &mut SymbolTable,
    file: &mut SourceFile,
) -> (Vec<Token<'a>>, Vec<LexError>) {
    let mut lexer = Lexer::new(buffer, arena, symbols, file);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    let errors = lexer.into_errors();
    tracing::debug!(
        file = %file.name(),
        tokens = tokens.len(),
        errors = errors.len(),
        lines = file.line_count(),
        "lexed file"
    );
    (tokens, errors)
}

// ─── Byte classes & decoding ────────────────────────────────────────

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
fn is_decimal_digit(b: u8) -> bool {
    b.is_ascii_digit() || b == b'_'
}

/// Digit-or-separator predicate for a radix.
fn radix_digit(radix: u32) -> impl Fn(u8) -> bool {
    move |b| b == b'_' || digit_value(b, radix).is_some()
}

/// Value of `b` as a digit in `radix`, if it is one.
fn digit_value(b: u8, radix: u32) -> Option<u32> {
    char::from(b).to_digit(radix)
}

/// Whether an exponent part actually follows: a digit, or a sign with a
/// digit behind it. Anything else leaves the `e`/`p` to the next token.
#[inline]
fn exponent_follows(next: u8, after: u8) -> bool {
    next.is_ascii_digit() || (matches!(next, b'+' | b'-') && after.is_ascii_digit())
}

/// Casing pre-filter for identifier runs. Leading underscores don't
/// count; `__FooBar` is still type-shaped.
fn identifier_shape(text: &str) -> Shape {
    let mut has_lower = false;
    let mut has_upper = false;
    let mut first_alpha_upper = None;
    for b in text.bytes() {
        if b.is_ascii_lowercase() {
            has_lower = true;
            first_alpha_upper.get_or_insert(false);
        } else if b.is_ascii_uppercase() {
            has_upper = true;
            first_alpha_upper.get_or_insert(true);
        }
    }
    if !has_lower {
        if has_upper {
            return Shape::Constant;
        }
        return Shape::Plain;
    }
    if first_alpha_upper == Some(true) {
        return Shape::Type;
    }
    Shape::Plain
}

/// Decode an integer literal (separators allowed), `None` on overflow.
fn decode_int(text: &str, radix: u32) -> Option<u64> {
    let mut value: u64 = 0;
    for b in text.bytes() {
        if b == b'_' {
            continue;
        }
        let digit = digit_value(b, radix).expect("scanner admitted only radix digits");
        value = value
            .checked_mul(u64::from(radix))?
            .checked_add(u64::from(digit))?;
    }
    Some(value)
}

/// Decode a real literal: integer part, fraction, and a base-10 `e`
/// exponent (decimal) or base-2 `p` exponent (other radixes).
fn decode_real(text: &str, radix: u32) -> Option<f64> {
    let (exp_marker, exp_base) = if radix == 10 { ('e', 10.0_f64) } else { ('p', 2.0_f64) };
    let (mantissa, exponent) = match text.find([exp_marker, exp_marker.to_ascii_uppercase()]) {
        Some(idx) => {
            let exp: i32 = text[idx + 1..].replace('_', "").parse().ok()?;
            (&text[..idx], exp)
        }
        None => (text, 0),
    };

    let (int_part, frac_part) = match mantissa.find('.') {
        Some(idx) => (&mantissa[..idx], &mantissa[idx + 1..]),
        None => (mantissa, ""),
    };

    let mut value = 0.0f64;
    for b in int_part.bytes().filter(|&b| b != b'_') {
        value = value * f64::from(radix) + f64::from(digit_value(b, radix)?);
    }
    let mut scale = 1.0 / f64::from(radix);
    for b in frac_part.bytes().filter(|&b| b != b'_') {
        value += f64::from(digit_value(b, radix)?) * scale;
        scale /= f64::from(radix);
    }
    Some(value * exp_base.powi(exponent))
}

#[cfg(test)]
mod tests;
