use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vela_ir::SourceMap;

/// Lex `source` as a fresh single-file compilation and hand the stream
/// (terminated by `Eof`) plus recorded errors to `f`.
fn with_tokens<R>(source: &str, f: impl FnOnce(&[Token<'_>], &[LexError]) -> R) -> R {
    with_file(source, |tokens, errors, _| f(tokens, errors))
}

/// As [`with_tokens`], also exposing the frozen `SourceFile`.
fn with_file<R>(
    source: &str,
    f: impl FnOnce(&[Token<'_>], &[LexError], &SourceFile) -> R,
) -> R {
    let mut symbols = SymbolTable::new();
    let mut map = SourceMap::new();
    let len = u32::try_from(source.len()).expect("test source fits in u32");
    let id = map.add_file("test.vela", len);
    let arena = Arena::new();
    let buffer = SourceBuffer::new(source);
    let (tokens, errors) = tokenize(&buffer, &arena, &mut symbols, map.file_mut(id));
    f(&tokens, &errors, map.file(id))
}

/// Kinds of the whole stream, `Eof` included.
fn kinds(source: &str) -> Vec<TokenKind> {
    with_tokens(source, |tokens, _| tokens.iter().map(|t| t.kind).collect())
}

/// The decoded integer payload of the single non-`Eof` token.
fn int_value(source: &str) -> u64 {
    with_tokens(source, |tokens, errors| {
        assert!(errors.is_empty(), "unexpected errors for {source:?}");
        assert_eq!(tokens.len(), 2, "expected one token for {source:?}");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        match tokens[0].value {
            TokenValue::Int(v) => v,
            ref other => panic!("expected Int payload, got {other:?}"),
        }
    })
}

/// The decoded float payload of the single non-`Eof` token.
fn real_value(source: &str) -> f64 {
    with_tokens(source, |tokens, errors| {
        assert!(errors.is_empty(), "unexpected errors for {source:?}");
        assert_eq!(tokens[0].kind, TokenKind::Real);
        match tokens[0].value {
            TokenValue::Real(v) => v,
            ref other => panic!("expected Real payload, got {other:?}"),
        }
    })
}

/// The decoded string payload of the single non-`Eof` token.
fn str_value(source: &str) -> String {
    with_tokens(source, |tokens, errors| {
        assert!(errors.is_empty(), "unexpected errors for {source:?}");
        assert_eq!(tokens[0].kind, TokenKind::String);
        match tokens[0].value {
            TokenValue::Str(s) => s.to_owned(),
            ref other => panic!("expected Str payload, got {other:?}"),
        }
    })
}

// ─── End of stream ──────────────────────────────────────────────────

#[test]
fn empty_input_yields_exactly_eof() {
    with_tokens("", |tokens, errors| {
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].span, Span::point(0));
    });
}

#[test]
fn whitespace_only_yields_eof() {
    assert_eq!(kinds("  \t \r\n  \n"), vec![TokenKind::Eof]);
}

#[test]
fn next_token_after_eof_stays_eof() {
    let mut symbols = SymbolTable::new();
    let mut map = SourceMap::new();
    let id = map.add_file("test.vela", 1);
    let arena = Arena::new();
    let buffer = SourceBuffer::new("x");
    let mut lexer = Lexer::new(&buffer, &arena, &mut symbols, map.file_mut(id));
    assert_eq!(lexer.next_token().kind, TokenKind::Ident);
    for _ in 0..4 {
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}

#[test]
fn iterator_ends_after_single_eof() {
    let mut symbols = SymbolTable::new();
    let mut map = SourceMap::new();
    let id = map.add_file("test.vela", 3);
    let arena = Arena::new();
    let buffer = SourceBuffer::new("a b");
    let lexer = Lexer::new(&buffer, &arena, &mut symbols, map.file_mut(id));
    let stream: Vec<TokenKind> = lexer.map(|t| t.kind).collect();
    assert_eq!(
        stream,
        vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
    );
}

// ─── Keywords & identifiers ─────────────────────────────────────────

/// Every fixed spelling lexes, in isolation, to exactly its registered
/// kind followed by `Eof`. This covers keywords, type names, directives,
/// and the whole operator/punctuation set (maximal munch included).
#[test]
fn keyword_round_trip_for_every_spelling() {
    for kind in TokenKind::all_kinds() {
        let Some(spelling) = kind.spelling() else {
            continue;
        };
        let stream = kinds(spelling);
        assert_eq!(stream, vec![kind, TokenKind::Eof], "spelling {spelling:?}");
    }
}

#[test]
fn plain_identifier_is_not_a_keyword() {
    with_tokens("foo", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].symbol().expect("has symbol").text(), "foo");
    });
}

#[test]
fn keyword_inside_code_is_overridden() {
    assert_eq!(
        kinds("while foo until"),
        vec![
            TokenKind::While,
            TokenKind::Ident,
            TokenKind::Until,
            TokenKind::Eof
        ]
    );
}

#[test]
fn constant_shape_classifies_and_skips_keyword_lookup() {
    with_tokens("FOO", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::ConstIdent);
    });
    // Same letters as a keyword, but constant-shaped: never a keyword.
    with_tokens("WHILE", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::ConstIdent);
    });
    with_tokens("FOO_BAR2", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::ConstIdent);
    });
}

#[test]
fn type_shape_classifies_and_skips_keyword_lookup() {
    with_tokens("FooBar", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::TypeIdent);
    });
    with_tokens("__FooBar", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::TypeIdent);
    });
    with_tokens("While", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::TypeIdent);
    });
}

#[test]
fn mixed_case_starting_lowercase_is_plain() {
    with_tokens("fooBar", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::Ident);
    });
    with_tokens("_private", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::Ident);
    });
    with_tokens("___", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::Ident);
    });
}

#[test]
fn repeated_identifier_shares_its_canonical_symbol() {
    with_tokens("foo bar foo", |tokens, _| {
        let first = tokens[0].symbol().expect("has symbol");
        let third = tokens[2].symbol().expect("has symbol");
        assert_eq!(first, third);
        assert!(std::ptr::eq(first.text(), third.text()));
        assert_ne!(first, tokens[1].symbol().expect("has symbol"));
    });
}

// ─── Sigils ─────────────────────────────────────────────────────────

#[test]
fn sigil_runs_lex_as_one_token() {
    with_tokens("@foo", |tokens, _| {
        assert_eq!(tokens[0].kind, TokenKind::AtIdent);
        assert_eq!(tokens[0].symbol().expect("has symbol").text(), "@foo");
    });
    assert_eq!(kinds("#foo"), vec![TokenKind::HashIdent, TokenKind::Eof]);
    assert_eq!(kinds("$foo"), vec![TokenKind::CtIdent, TokenKind::Eof]);
}

#[test]
fn seeded_sigil_spellings_win_over_generic_kinds() {
    assert_eq!(kinds("@param"), vec![TokenKind::AtParam, TokenKind::Eof]);
    assert_eq!(kinds("@deprecated"), vec![TokenKind::AtDeprecated, TokenKind::Eof]);
    assert_eq!(kinds("$if"), vec![TokenKind::CtIf, TokenKind::Eof]);
    assert_eq!(kinds("$switch"), vec![TokenKind::CtSwitch, TokenKind::Eof]);
    // Near-misses stay generic.
    assert_eq!(kinds("@params"), vec![TokenKind::AtIdent, TokenKind::Eof]);
    assert_eq!(kinds("$iffy"), vec![TokenKind::CtIdent, TokenKind::Eof]);
}

#[test]
fn bare_sigil_is_punctuation() {
    assert_eq!(
        kinds("@ foo"),
        vec![TokenKind::At, TokenKind::Ident, TokenKind::Eof]
    );
    assert_eq!(kinds("$ #"), vec![TokenKind::Dollar, TokenKind::Hash, TokenKind::Eof]);
    assert_eq!(
        kinds("@1"),
        vec![TokenKind::At, TokenKind::Integer, TokenKind::Eof]
    );
}

// ─── Operators & maximal munch ──────────────────────────────────────

#[test]
fn shift_assign_is_one_token() {
    assert_eq!(kinds(">>="), vec![TokenKind::ShrAssign, TokenKind::Eof]);
    assert_eq!(kinds(">>"), vec![TokenKind::Shr, TokenKind::Eof]);
    assert_eq!(kinds("<<="), vec![TokenKind::ShlAssign, TokenKind::Eof]);
}

#[test]
fn munch_prefers_longest_then_falls_back() {
    assert_eq!(
        kinds(">> ="),
        vec![TokenKind::Shr, TokenKind::Eq, TokenKind::Eof]
    );
    assert_eq!(
        kinds(">>>"),
        vec![TokenKind::Shr, TokenKind::Greater, TokenKind::Eof]
    );
    assert_eq!(
        kinds("...."),
        vec![TokenKind::Ellipsis, TokenKind::Dot, TokenKind::Eof]
    );
    assert_eq!(
        kinds("&&&"),
        vec![TokenKind::And, TokenKind::Amp, TokenKind::Eof]
    );
    assert_eq!(
        kinds("a+++b"),
        vec![
            TokenKind::Ident,
            TokenKind::PlusPlus,
            TokenKind::Plus,
            TokenKind::Ident,
            TokenKind::Eof
        ]
    );
}

#[test]
fn compound_brackets_and_elvis() {
    assert_eq!(
        kinds("({ })"),
        vec![TokenKind::LParBra, TokenKind::RParBra, TokenKind::Eof]
    );
    assert_eq!(
        kinds("a ?: b"),
        vec![TokenKind::Ident, TokenKind::Elvis, TokenKind::Ident, TokenKind::Eof]
    );
    assert_eq!(
        kinds("a::b"),
        vec![TokenKind::Ident, TokenKind::Scope, TokenKind::Ident, TokenKind::Eof]
    );
}

// ─── Numeric literals ───────────────────────────────────────────────

#[test]
fn integer_literals_in_every_radix() {
    assert_eq!(int_value("123"), 123);
    assert_eq!(int_value("0"), 0);
    assert_eq!(int_value("0x2A"), 42);
    assert_eq!(int_value("0XFF"), 255);
    assert_eq!(int_value("0b1011"), 11);
    assert_eq!(int_value("0o177"), 127);
    assert_eq!(int_value("1_000_000"), 1_000_000);
    assert_eq!(int_value("0xFFFF_FFFF_FFFF_FFFF"), u64::MAX);
}

#[test]
fn real_literals_with_fraction_and_exponent() {
    assert_eq!(real_value("4.25"), 4.25);
    assert_eq!(real_value("0.5"), 0.5);
    assert_eq!(real_value("1e3"), 1000.0);
    assert_eq!(real_value("2.5e-3"), 0.0025);
    assert_eq!(real_value("43.23e2"), 4323.0);
    assert_eq!(real_value("1_0.2_5"), 10.25);
}

#[test]
fn hex_reals_use_binary_exponents() {
    assert_eq!(real_value("0x1.8p1"), 3.0);
    assert_eq!(real_value("0x23.2p-2"), 8.78125);
    assert_eq!(real_value("0xAp0"), 10.0);
    // Fraction alone forces real classification, in any radix.
    assert_eq!(real_value("0x1.8"), 1.5);
    assert_eq!(real_value("0b1.1"), 1.5);
    assert_eq!(real_value("0o1.4"), 1.5);
}

#[test]
fn dot_without_digit_is_not_a_fraction() {
    assert_eq!(
        kinds("1..2"),
        vec![
            TokenKind::Integer,
            TokenKind::DotDot,
            TokenKind::Integer,
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("x.5"),
        vec![TokenKind::Ident, TokenKind::Dot, TokenKind::Integer, TokenKind::Eof]
    );
}

#[test]
fn exponent_needs_digits_to_bind() {
    // `e` with no digits after stays identifier-glued and malformed…
    with_tokens("1e", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::MalformedNumber);
    });
    // …while a bare trailing sign leaves `e` to the glue check too.
    with_tokens("2e+", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::MalformedNumber);
        assert_eq!(tokens[1].kind, TokenKind::Plus);
    });
}

#[test]
fn integer_overflow_is_recoverable() {
    with_tokens("99999999999999999999999999 next", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::IntOverflow);
        // The scan continued.
        assert_eq!(tokens[1].kind, TokenKind::Next);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    });
}

#[test]
fn glued_identifier_tail_is_malformed() {
    with_tokens("123abc rest", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::MalformedNumber);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    });
    // `0xG…` never opens a hex literal; the zero absorbs the tail.
    with_tokens("0xG", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::MalformedNumber);
    });
}

#[test]
fn char_literals_are_integers() {
    assert_eq!(int_value("'a'"), 97);
    assert_eq!(int_value("'0'"), 48);
    assert_eq!(int_value("'\\n'"), 10);
    assert_eq!(int_value("'\\''"), 39);
    assert_eq!(int_value("'\\x41'"), 65);
    assert_eq!(int_value("'é'"), 233);
}

#[test]
fn bad_char_literals_recover() {
    with_tokens("'' x", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::EmptyCharLiteral);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    });
    with_tokens("'ab' x", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::MultiCharLiteral);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    });
    with_tokens("'a", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedChar);
    });
}

// ─── String literals ────────────────────────────────────────────────

#[test]
fn string_payload_is_decoded_into_the_arena() {
    assert_eq!(str_value("\"hello\""), "hello");
    assert_eq!(str_value("\"\""), "");
    assert_eq!(str_value("\"a\\tb\\n\""), "a\tb\n");
    assert_eq!(str_value("\"quote \\\" done\""), "quote \" done");
    assert_eq!(str_value("\"\\x41\\x20ok\""), "A ok");
    assert_eq!(str_value("\"héllo\""), "héllo");
}

#[test]
fn unknown_escape_marks_string_invalid_but_scan_continues() {
    with_tokens("\"a\\qb\" next", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidEscape { escape: 'q' });
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    });
}

#[test]
fn unterminated_string_at_newline_recovers_on_next_line() {
    with_tokens("\"abc\nfoo", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    });
}

#[test]
fn unterminated_string_at_eof() {
    with_tokens("\"abc", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    });
}

// ─── Comments ───────────────────────────────────────────────────────

#[test]
fn line_comments_are_trivia() {
    assert_eq!(
        kinds("a // comment\nb"),
        vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn block_comments_nest() {
    assert_eq!(
        kinds("a /* x /* y */ z */ b"),
        vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
    );
    assert_eq!(kinds("/**/"), vec![TokenKind::Eof]);
}

#[test]
fn unterminated_block_comment_is_invalid() {
    with_tokens("a /* x", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedBlockComment);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    });
}

// ─── Documentation comments ─────────────────────────────────────────

#[test]
fn docs_comment_line_structure() {
    assert_eq!(
        kinds("/** hello\n * world\n */"),
        vec![
            TokenKind::DocsStart,
            TokenKind::DocsLine,
            TokenKind::DocsEol,
            TokenKind::DocsLine,
            TokenKind::DocsEol,
            TokenKind::DocsEnd,
            TokenKind::Eof
        ]
    );
}

#[test]
fn docs_line_spans_cover_the_text() {
    with_tokens("/** hello */", |tokens, _| {
        assert_eq!(tokens[1].kind, TokenKind::DocsLine);
        // Global offsets 4..10 cover "hello " up to the closing marker.
        assert_eq!(tokens[1].span, Span::new(4, 10));
    });
}

#[test]
fn docs_directive_switches_to_token_scanning() {
    assert_eq!(
        kinds("/** @param foo the value\n */"),
        vec![
            TokenKind::DocsStart,
            TokenKind::AtParam,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::DocsEol,
            TokenKind::DocsEnd,
            TokenKind::Eof
        ]
    );
}

#[test]
fn docs_directive_lexes_real_tokens() {
    assert_eq!(
        kinds("/**\n * @require x > 1\n */"),
        vec![
            TokenKind::DocsStart,
            TokenKind::DocsEol,
            TokenKind::AtRequire,
            TokenKind::Ident,
            TokenKind::Greater,
            TokenKind::Integer,
            TokenKind::DocsEol,
            TokenKind::DocsEnd,
            TokenKind::Eof
        ]
    );
}

#[test]
fn unknown_directive_is_generic_at_ident() {
    assert_eq!(
        kinds("/** @custom note\n*/"),
        vec![
            TokenKind::DocsStart,
            TokenKind::AtIdent,
            TokenKind::Ident,
            TokenKind::DocsEol,
            TokenKind::DocsEnd,
            TokenKind::Eof
        ]
    );
}

#[test]
fn docs_close_accepts_any_star_run() {
    for source in ["/** x */", "/** x **/", "/** x ****/"] {
        let stream = kinds(source);
        assert_eq!(
            stream,
            vec![
                TokenKind::DocsStart,
                TokenKind::DocsLine,
                TokenKind::DocsEnd,
                TokenKind::Eof
            ],
            "{source:?}"
        );
    }
    // Control returns to NORMAL afterwards regardless of the star count.
    assert_eq!(
        kinds("/** x ***/ if"),
        vec![
            TokenKind::DocsStart,
            TokenKind::DocsLine,
            TokenKind::DocsEnd,
            TokenKind::If,
            TokenKind::Eof
        ]
    );
}

#[test]
fn docs_directive_line_closed_by_marker() {
    assert_eq!(
        kinds("/** @pure */"),
        vec![
            TokenKind::DocsStart,
            TokenKind::AtPure,
            TokenKind::DocsEnd,
            TokenKind::Eof
        ]
    );
}

#[test]
fn unterminated_docs_comment_is_invalid() {
    with_tokens("/** dangling", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::DocsStart);
        assert_eq!(tokens[1].kind, TokenKind::DocsLine);
        assert_eq!(tokens[2].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedDocComment);
        // The span reaches back to the opening marker.
        assert_eq!(errors[0].span.start, 0);
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    });
}

// ─── Position index feeding ─────────────────────────────────────────

#[test]
fn lexer_records_line_boundaries() {
    with_file("a\nbb\nccc\n", |tokens, _, file| {
        assert_eq!(file.line_count(), 4);
        assert_eq!(file.find_position(0).line, 1);
        assert_eq!(file.find_position(2).line, 2); // 'b'
        assert_eq!(file.find_position(5).line, 3); // 'c'
        assert_eq!(file.find_position(8).line, 3); // the trailing '\n'
        // Token spans line up with the source.
        assert_eq!(tokens[1].span, Span::new(2, 4));
    });
}

#[test]
fn newlines_inside_comments_and_docs_still_count() {
    with_file("/* 1\n2 */ x\n/** a\nb */\n", |_, _, file| {
        assert_eq!(file.line_count(), 5);
    });
}

#[test]
fn global_offsets_start_at_the_files_start_id() {
    let mut symbols = SymbolTable::new();
    let mut map = SourceMap::new();
    let first = map.add_file("first.vela", 3);
    let second = map.add_file("second.vela", 5);

    let arena = Arena::new();
    let buffer = SourceBuffer::new("x+y=z");
    let (tokens, errors) = tokenize(&buffer, &arena, &mut symbols, map.file_mut(second));
    assert!(errors.is_empty());

    let start = map.file(second).start_id();
    assert_eq!(start, 4);
    assert_eq!(tokens[0].span, Span::new(start, start + 1));
    assert_eq!(tokens[4].span, Span::new(start + 4, start + 5));
    assert_eq!(tokens[5].span, Span::point(start + 5));

    // The first file's range is untouched.
    assert_eq!(map.file(first).start_id(), 0);
}

#[test]
fn shared_symbol_table_across_files() {
    let mut symbols = SymbolTable::new();
    let mut map = SourceMap::new();
    let a = map.add_file("a.vela", 3);
    let b = map.add_file("b.vela", 3);
    let arena = Arena::new();

    let buf_a = SourceBuffer::new("foo");
    let (tokens_a, _) = tokenize(&buf_a, &arena, &mut symbols, map.file_mut(a));
    let buf_b = SourceBuffer::new("foo");
    let (tokens_b, _) = tokenize(&buf_b, &arena, &mut symbols, map.file_mut(b));

    let sym_a = tokens_a[0].symbol().expect("has symbol");
    let sym_b = tokens_b[0].symbol().expect("has symbol");
    assert_eq!(sym_a, sym_b);
    assert!(std::ptr::eq(sym_a.text(), sym_b.text()));
}

// ─── Error recovery ─────────────────────────────────────────────────

#[test]
fn control_bytes_are_invalid_tokens() {
    with_tokens("a \u{1} b", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidByte { byte: 1 });
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    });
}

#[test]
fn stray_unicode_is_one_invalid_token() {
    with_tokens("a € b", |tokens, errors| {
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::InvalidChar { ch: '€' });
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    });
}

#[test]
fn interior_null_is_reported_and_skipped() {
    with_tokens("a\0b", |tokens, errors| {
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(errors[0].kind, LexErrorKind::InteriorNull);
        assert_eq!(tokens[2].kind, TokenKind::Ident);
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    });
}

#[test]
fn a_small_program_lexes_cleanly() {
    let source = "\
module demo;

/**
 * Entry point.
 * @param argc number of arguments
 */
func int main(int argc)
{
    int x = 0x2A;
    while (x >>= 1) { x += argc; }
    return x != 0 ?: -1;
}
";
    with_tokens(source, |tokens, errors| {
        assert!(errors.is_empty());
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Invalid));
        assert_eq!(tokens.last().expect("nonempty").kind, TokenKind::Eof);
        // Spot checks deep in the stream.
        assert!(tokens.iter().any(|t| t.kind == TokenKind::AtParam));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::ShrAssign));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Elvis));
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::Integer && t.value == TokenValue::Int(42)));
    });
}

// ─── Shape classification (unit level) ──────────────────────────────

#[test]
fn identifier_shape_rules() {
    assert_eq!(identifier_shape("foo"), Shape::Plain);
    assert_eq!(identifier_shape("fooBar"), Shape::Plain);
    assert_eq!(identifier_shape("_x1"), Shape::Plain);
    assert_eq!(identifier_shape("___"), Shape::Plain);
    assert_eq!(identifier_shape("_1"), Shape::Plain);
    assert_eq!(identifier_shape("FOO"), Shape::Constant);
    assert_eq!(identifier_shape("FOO_BAR2"), Shape::Constant);
    assert_eq!(identifier_shape("F"), Shape::Constant);
    assert_eq!(identifier_shape("FooBar"), Shape::Type);
    assert_eq!(identifier_shape("__FooBar"), Shape::Type);
    assert_eq!(identifier_shape("Fx"), Shape::Type);
}

// ─── Whole-stream properties ────────────────────────────────────────

proptest! {
    /// For arbitrary printable input the scan terminates with exactly
    /// one `Eof`, spans are monotone and in-bounds, and every recorded
    /// error span lies within the file.
    #[test]
    fn stream_is_well_formed(source in "[ -~\\n\\t]{0,200}") {
        let len = source.len() as u32;
        with_tokens(&source, |tokens, errors| {
            prop_assert!(!tokens.is_empty());
            let eof_count = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
            prop_assert_eq!(eof_count, 1);
            prop_assert_eq!(tokens.last().expect("nonempty").kind, TokenKind::Eof);

            let mut prev_end = 0u32;
            for token in tokens {
                prop_assert!(token.span.end <= len);
                // Invalid tokens may reach back over already-emitted
                // tokens (an unterminated docs comment spans from its
                // opening marker); everything else is monotone.
                if token.kind != TokenKind::Invalid {
                    prop_assert!(token.span.start >= prev_end, "overlapping spans");
                }
                prev_end = prev_end.max(token.span.end);
            }
            for error in errors {
                prop_assert!(error.span.end <= len);
            }
            Ok(())
        })?;
    }
}
