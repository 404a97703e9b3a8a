use super::stream::Stream;
use super::token::{Encoding, Punct, TokenKind};
use super::*;
use crate::diagnostics::DiagnosticFlags;
use indoc::indoc;
use itertools::Itertools;

fn lexer_for(source: &str) -> Lexer {
    let flags = DiagnosticFlags {
        print_without_collecting: false,
        ..DiagnosticFlags::default()
    };
    let mut lexer = Lexer::new(Diagnostics::new(flags));
    lexer.stream_push(Stream::from_string(source));
    lexer
}

/// Lexes everything up to and including EOF, returning only the kinds.
fn kinds_of(source: &str) -> Vec<TokenKind> {
    let mut lexer = lexer_for(source);
    let mut kinds = Vec::new();
    loop {
        let token = lexer.lex().expect("token");
        let done = token.kind.is_eof();
        kinds.push(token.kind);
        if done {
            return kinds;
        }
    }
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_string())
}

fn number(text: &str) -> TokenKind {
    TokenKind::Number(text.to_string())
}

fn keyword(punct: Punct) -> TokenKind {
    TokenKind::Punct(punct)
}

#[test]
fn line_splicing_is_invisible_to_tokens() {
    let mut lexer = lexer_for("a\\\nb\n");
    let token = lexer.lex().unwrap();
    assert_eq!(token.kind, ident("ab"));
    assert_eq!(token.location, Location::new(1, 1));
    assert!(token.bol);
    assert!(lexer.lex().unwrap().kind.is_newline());
    assert!(lexer.lex().unwrap().kind.is_eof());
}

#[test]
fn crlf_and_lone_cr_canonicalize_to_newline() {
    assert_eq!(
        kinds_of("x\r\ny\r"),
        vec![
            ident("x"),
            TokenKind::Newline,
            ident("y"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn digraphs_lex_as_their_primary_spellings() {
    assert_eq!(
        kinds_of("<:%>"),
        vec![
            keyword(Punct::OpenBracket),
            keyword(Punct::CloseCurly),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds_of("<% :> %: %:%:"),
        vec![
            keyword(Punct::OpenCurly),
            keyword(Punct::CloseBracket),
            keyword(Punct::Hash),
            keyword(Punct::HashConcat),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn pp_numbers_are_read_loosely() {
    assert_eq!(
        kinds_of("1.5e+10f"),
        vec![number("1.5e+10f"), TokenKind::Newline, TokenKind::Eof]
    );
    // ".32e." is not a valid constant, but it is a valid pp-number;
    // rejecting it is the preprocessor's job.
    assert_eq!(
        kinds_of(".32e."),
        vec![number(".32e."), TokenKind::Newline, TokenKind::Eof]
    );
    assert_eq!(
        kinds_of("0x1p-3 1e9 08"),
        vec![
            number("0x1p-3"),
            number("1e9"),
            number("08"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
    // The sign only belongs to the number after an exponent marker.
    assert_eq!(
        kinds_of("1+2"),
        vec![
            number("1"),
            keyword(Punct::Add),
            number("2"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_with_universal_character_encodes_utf8() {
    let kinds = kinds_of("\"\\u00e9\"");
    assert_eq!(
        kinds[0],
        TokenKind::Str {
            bytes: vec![0xC3, 0xA9, 0x00],
            encoding: Encoding::Default,
        }
    );
    if let TokenKind::Str { bytes, .. } = &kinds[0] {
        // Two payload bytes plus the terminating NUL.
        assert_eq!(bytes.len() - 1, 2);
    }
}

#[test]
fn string_and_char_encoding_prefixes() {
    let kinds = kinds_of("L\"w\" u\"s\" U\"t\" u8\"v\" L'x' u'y' U'z'");
    let encodings = kinds
        .iter()
        .filter_map(|kind| match kind {
            TokenKind::Str { encoding, .. } => Some(*encoding),
            TokenKind::Char { encoding, .. } => Some(*encoding),
            _ => None,
        })
        .collect_vec();
    assert_eq!(
        encodings,
        vec![
            Encoding::Wide,
            Encoding::Utf16,
            Encoding::Utf32,
            Encoding::Utf8,
            Encoding::Wide,
            Encoding::Utf16,
            Encoding::Utf32,
        ]
    );
    // The same prefixes fall back to plain identifiers elsewhere.
    assert_eq!(
        kinds_of("L u U u8"),
        vec![
            ident("L"),
            ident("u"),
            ident("U"),
            ident("u8"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn char_constants_narrow_to_char() {
    let kinds = kinds_of("'a' '\\xff' L'\\xff'");
    assert_eq!(
        kinds[0],
        TokenKind::Char {
            value: i32::from(b'a'),
            encoding: Encoding::Default,
        }
    );
    // (char)0xff is -1 on the usual targets.
    assert_eq!(
        kinds[1],
        TokenKind::Char {
            value: -1,
            encoding: Encoding::Default,
        }
    );
    assert_eq!(
        kinds[2],
        TokenKind::Char {
            value: 0xFF,
            encoding: Encoding::Wide,
        }
    );
}

#[test]
fn escape_sequences_decode() {
    let kinds = kinds_of(r#""\a\b\f\n\r\t\v\e\'\"\?\\\0\012\x41""#);
    assert_eq!(
        kinds[0],
        TokenKind::Str {
            bytes: vec![
                0x07, 0x08, 0x0C, b'\n', b'\r', b'\t', 0x0B, 0x1B, b'\'', b'"', b'?', b'\\', 0,
                0x0A, b'A', 0x00,
            ],
            encoding: Encoding::Default,
        }
    );
}

#[test]
fn octal_escape_stops_after_three_digits() {
    let kinds = kinds_of(r#""\1234""#);
    assert_eq!(
        kinds[0],
        TokenKind::Str {
            bytes: vec![0o123, b'4', 0x00],
            encoding: Encoding::Default,
        }
    );
}

#[test]
fn unknown_escape_warns_and_passes_through() {
    let mut lexer = lexer_for(r#""\q""#);
    let token = lexer.lex().unwrap();
    assert_eq!(
        token.kind,
        TokenKind::Str {
            bytes: vec![b'q', 0x00],
            encoding: Encoding::Default,
        }
    );
    assert_eq!(lexer.diagnostics().warning_count(), 1);
}

#[test]
fn unknown_escape_is_fatal_under_werror() {
    let flags = DiagnosticFlags {
        print_without_collecting: false,
        warnings_are_errors: true,
        ..DiagnosticFlags::default()
    };
    let mut lexer = Lexer::new(Diagnostics::new(flags));
    lexer.stream_push(Stream::from_string(r#""\q""#));
    let error = lexer.lex().unwrap_err();
    assert_eq!(error.kind, LexErrorKind::UnknownEscapeCharacter(b'q'));
}

#[test]
fn invalid_universal_characters_are_rejected() {
    let mut lexer = lexer_for(r#""\ud800""#);
    assert!(matches!(
        lexer.lex().unwrap_err().kind,
        LexErrorKind::InvalidUniversalCharacterValue { value: 0xD800, .. }
    ));

    let mut lexer = lexer_for(r#""\u004""#);
    assert!(matches!(
        lexer.lex().unwrap_err().kind,
        LexErrorKind::InvalidUniversalCharacter(b'"')
    ));
}

#[test]
fn identifiers_may_contain_universal_characters() {
    assert_eq!(
        kinds_of("caf\\u00e9 \\u00e9tat"),
        vec![
            ident("café"),
            ident("état"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn dollar_and_high_bytes_are_identifier_characters() {
    assert_eq!(
        kinds_of("$name a$b"),
        vec![
            ident("$name"),
            ident("a$b"),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn two_dots_make_a_strange_identifier() {
    // ".." is neither an ellipsis nor two member accesses.
    assert_eq!(
        kinds_of(".. ... ."),
        vec![
            ident(".."),
            keyword(Punct::Ellipsis),
            keyword(Punct::Dot),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn operators_lex_greedily() {
    assert_eq!(
        kinds_of("a+++b <<= >>= ->"),
        vec![
            ident("a"),
            keyword(Punct::Increment),
            keyword(Punct::Add),
            ident("b"),
            keyword(Punct::LeftShiftAssign),
            keyword(Punct::RightShiftAssign),
            keyword(Punct::Arrow),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_count_as_spaces() {
    let mut lexer = lexer_for("a/* comment */b // trailing\nc");
    let a = lexer.lex().unwrap();
    assert!(!a.space);
    let b = lexer.lex().unwrap();
    assert_eq!(b.kind, ident("b"));
    assert!(b.space);
    let newline = lexer.lex().unwrap();
    assert!(newline.kind.is_newline());
    let c = lexer.lex().unwrap();
    assert_eq!(c.kind, ident("c"));
    assert!(c.bol);
}

#[test]
fn unterminated_block_comment_is_fatal() {
    let mut lexer = lexer_for("a /* no end");
    lexer.lex().unwrap();
    assert_eq!(
        lexer.lex().unwrap_err().kind,
        LexErrorKind::UnterminatedBlockComment
    );
}

#[test]
fn bol_and_space_flags() {
    let mut lexer = lexer_for(indoc! {"
        a b
          c
    "});
    let a = lexer.lex().unwrap();
    assert!(a.bol && !a.space);
    let b = lexer.lex().unwrap();
    assert!(!b.bol && b.space);
    lexer.lex().unwrap(); // newline
    let c = lexer.lex().unwrap();
    assert!(c.bol && c.space);
}

#[test]
fn counts_increase_within_a_file() {
    let mut lexer = lexer_for("a b c d");
    let mut last = None;
    loop {
        let token = lexer.lex().unwrap();
        if token.kind.is_eof() {
            break;
        }
        if let Some(last) = last {
            assert!(token.count > last);
        }
        last = Some(token.count);
    }
}

#[test]
fn invalid_bytes_become_invalid_tokens() {
    assert_eq!(
        kinds_of("@"),
        vec![
            TokenKind::Invalid(b'@'),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unget_token_is_lifo() {
    let mut lexer = lexer_for("x y");
    let x = lexer.lex().unwrap();
    let y = lexer.lex().unwrap();
    lexer.unget_token(y.clone());
    lexer.unget_token(x.clone());
    assert_eq!(lexer.lex().unwrap().kind, x.kind);
    assert_eq!(lexer.lex().unwrap().kind, y.kind);
}

#[test]
fn ungetting_eof_is_a_no_op() {
    let mut lexer = lexer_for("");
    lexer.lex().unwrap(); // newline
    let eof = lexer.lex().unwrap();
    assert!(eof.kind.is_eof());
    lexer.unget_token(eof);
    assert!(lexer.lex().unwrap().kind.is_eof());
}

#[test]
fn stashed_token_buffer_drains_then_synthesizes_eof() {
    let mut lexer = lexer_for("rest");
    let mut list = Sequence::new();
    let one = lexer.lex_string("one").unwrap();
    list.push(one);
    lexer.token_buffer_stash(list);

    assert_eq!(lexer.lex().unwrap().kind, ident("one"));
    // The underlying stream must not leak through the stash boundary.
    assert!(lexer.lex().unwrap().kind.is_eof());
    assert!(lexer.lex().unwrap().kind.is_eof());

    lexer.token_buffer_unstash();
    assert_eq!(lexer.lex().unwrap().kind, ident("rest"));
}

#[test]
fn lex_string_reads_exactly_one_token() {
    let mut lexer = lexer_for("main");
    let token = lexer.lex_string("value").unwrap();
    assert_eq!(token.kind, ident("value"));
    // The main pipeline is untouched.
    assert_eq!(lexer.lex().unwrap().kind, ident("main"));
}

#[test]
fn lex_string_rejects_trailing_input() {
    let mut lexer = lexer_for("");
    let error = lexer.lex_string("two tokens").unwrap_err();
    assert_eq!(
        error.kind,
        LexErrorKind::UnconsumedInput("two tokens".to_string())
    );
}

#[test]
fn included_stream_tokens_carry_their_own_file() {
    let mut lexer = lexer_for("after\n");
    lexer.stream_push(Stream::from_string("inner\n"));
    let inner = lexer.lex().unwrap();
    assert_eq!(inner.kind, ident("inner"));
    assert_eq!(inner.count, 0);
    lexer.lex().unwrap(); // newline
    let after = lexer.lex().unwrap();
    assert_eq!(after.kind, ident("after"));
    // Counts restart in the outer file: its own counter was never used.
    assert_eq!(after.count, 0);
    assert_eq!(lexer.stream_depth(), 1);
    // The base file is the one the compilation started from.
    assert_eq!(lexer.base_file(), Some("(string)"));
}

#[test]
fn skip_cond_incl_skips_nested_regions() {
    let mut lexer = lexer_for(indoc! {"
        #if 0
        foo
        #if 1
        bar
        #endif
        #endif
        tail
    "});
    // The preprocessor has read `#if 0` and decided to skip.
    assert!(lexer.lex().unwrap().is_keyword(Punct::Hash));
    assert_eq!(lexer.lex().unwrap().kind, ident("if"));
    assert_eq!(lexer.lex().unwrap().kind, number("0"));
    assert!(lexer.lex().unwrap().kind.is_newline());

    lexer.skip_cond_incl().unwrap();

    // The matching outer #endif comes back as pushback, hash first.
    let hash = lexer.lex().unwrap();
    assert!(hash.is_keyword(Punct::Hash));
    assert!(hash.bol);
    assert_eq!(lexer.lex().unwrap().kind, ident("endif"));
    assert!(lexer.lex().unwrap().kind.is_newline());

    // `foo` and `bar` never became tokens.
    assert_eq!(lexer.lex().unwrap().kind, ident("tail"));
}

#[test]
fn skip_cond_incl_ignores_directives_inside_literals() {
    let mut lexer = lexer_for(indoc! {r##"
        "#endif"
        '#'
        #endif
        tail
    "##});
    lexer.skip_cond_incl().unwrap();
    assert!(lexer.lex().unwrap().is_keyword(Punct::Hash));
    assert_eq!(lexer.lex().unwrap().kind, ident("endif"));
}

#[test]
fn skip_cond_incl_returns_on_else_at_level_zero() {
    let mut lexer = lexer_for(indoc! {"
        skipped
        #else
        kept
    "});
    lexer.skip_cond_incl().unwrap();
    assert!(lexer.lex().unwrap().is_keyword(Punct::Hash));
    assert_eq!(lexer.lex().unwrap().kind, ident("else"));
}

#[test]
fn header_names_lex_verbatim() {
    let mut lexer = lexer_for("<std\\io.h>");
    let header = lexer.read_header_file_name().unwrap().unwrap();
    // Backslash is not an escape in a header name.
    assert_eq!(
        header,
        HeaderName {
            name: "std\\io.h".to_string(),
            is_system: true,
        }
    );

    let mut lexer = lexer_for("  \"local.h\"");
    let header = lexer.read_header_file_name().unwrap().unwrap();
    assert_eq!(header.name, "local.h");
    assert!(!header.is_system);
}

#[test]
fn header_name_requires_a_quote() {
    let mut lexer = lexer_for("foo.h");
    assert_eq!(lexer.read_header_file_name().unwrap(), None);
    // The characters remain for ordinary lexing.
    assert_eq!(lexer.lex().unwrap().kind, ident("foo"));
}

#[test]
fn header_name_with_pushback_pending_is_refused() {
    let mut lexer = lexer_for("<real.h>");
    let token = lexer.lex_string("x").unwrap();
    lexer.unget_token(token);
    assert_eq!(lexer.read_header_file_name().unwrap(), None);
}

#[test]
fn empty_or_unterminated_header_names_are_fatal() {
    let mut lexer = lexer_for("<>");
    assert_eq!(
        lexer.read_header_file_name().unwrap_err().kind,
        LexErrorKind::EmptyHeaderName
    );

    let mut lexer = lexer_for("<never closed\n");
    assert_eq!(
        lexer.read_header_file_name().unwrap_err().kind,
        LexErrorKind::PrematureEndOfHeaderName
    );
}

#[test]
fn unterminated_literals_are_fatal() {
    let mut lexer = lexer_for("\"no end");
    assert_eq!(
        lexer.lex().unwrap_err().kind,
        LexErrorKind::UnterminatedString
    );

    let mut lexer = lexer_for("'a");
    assert_eq!(lexer.lex().unwrap_err().kind, LexErrorKind::UnterminatedChar);
}

#[test]
fn hex_escape_requires_a_digit() {
    let mut lexer = lexer_for(r#""\xg""#);
    assert_eq!(
        lexer.lex().unwrap_err().kind,
        LexErrorKind::HexEscapeWithoutDigit(b'g')
    );
}

#[test]
fn a_small_program_lexes_to_the_expected_stream() {
    let kinds = kinds_of(indoc! {r#"
        int main(void) {
            return x->y == 0 ? a[1] : b;
        }
    "#});
    let expected = vec![
        ident("int"),
        ident("main"),
        keyword(Punct::OpenParen),
        ident("void"),
        keyword(Punct::CloseParen),
        keyword(Punct::OpenCurly),
        TokenKind::Newline,
        ident("return"),
        ident("x"),
        keyword(Punct::Arrow),
        ident("y"),
        keyword(Punct::DoubleEquals),
        number("0"),
        keyword(Punct::Ternary),
        ident("a"),
        keyword(Punct::OpenBracket),
        number("1"),
        keyword(Punct::CloseBracket),
        keyword(Punct::Colon),
        ident("b"),
        keyword(Punct::Semicolon),
        TokenKind::Newline,
        keyword(Punct::CloseCurly),
        TokenKind::Newline,
        TokenKind::Eof,
    ];
    assert_eq!(kinds, expected);
}
