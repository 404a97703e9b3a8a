pub mod error;
pub mod stream;
pub mod token;

#[cfg(test)]
mod tests;

use self::error::{LexError, LexErrorKind};
use self::stream::{Position, Stream, StreamStack};
use self::token::{Encoding, Punct, Token, TokenKind};
use crate::buffer::{write_utf8, Buffer};
use crate::diagnostics::{Diagnostics, WarningDiagnostic};
use crate::line_column::Location;
use crate::sequence::Sequence;
use std::fs;
use std::io;

/*
 * Tokenizer
 *
 * This is the translation phase after canonicalization and line
 * splicing in stream.rs. Source characters are decomposed into
 * preprocessing tokens.
 *
 * Each comment is treated as if it were a space character. Space
 * characters are removed, but their presence is recorded on the token
 * that immediately follows them as a boolean flag. Newlines become
 * newline tokens; the preprocessor needs them to find directive ends.
 */

/// A header name read after `#include`, with its quoting style.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderName {
    pub name: String,
    /// True for `<...>`, false for `"..."`.
    pub is_system: bool,
}

/// The pp-token lexer: the stream stack it reads characters from, the
/// token buffer stack serving pushback and stashed token lists, and
/// the mark where the token in progress began.
pub struct Lexer {
    streams: StreamStack,
    buffers: Sequence<Sequence<Token>>,
    pos: Location,
    diagnostics: Diagnostics,
}

fn is_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\t' || c == 0x0C || c == 0x0B
}

fn hex_digit_value(c: u8) -> Option<u32> {
    (c as char).to_digit(16)
}

fn is_valid_ucn(c: u32) -> bool {
    // C11 6.4.3p2: U+D800 through U+DFFF are reserved for surrogate
    // pairs. ASCII characters may not be written as universal
    // characters either, with a few exceptions outside the basic
    // character set (C11 5.2.1p3).
    if (0xD800..=0xDFFF).contains(&c) {
        return false;
    }
    c >= 0xA0 || matches!(c, 0x24 | 0x40 | 0x60)
}

impl Lexer {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self {
            streams: StreamStack::new(),
            buffers: Sequence::new_with(Sequence::new()),
            pos: Location::start(),
            diagnostics,
        }
    }

    /// Opens the initial input and pushes it onto the stream stack.
    /// `"-"` names standard input.
    pub fn lex_init(&mut self, filename: &str) -> Result<(), LexError> {
        if filename == "-" {
            self.streams
                .stream_push(Stream::from_reader(Box::new(io::stdin()), "-"));
            return Ok(());
        }
        let file = fs::File::open(filename).map_err(|error| {
            LexErrorKind::CannotOpenFile {
                filename: filename.to_string(),
                reason: error.to_string(),
            }
            .without_position()
        })?;
        let stream = Stream::from_file(file, filename).map_err(|error| {
            LexErrorKind::StatFailed {
                reason: error.to_string(),
            }
            .without_position()
        })?;
        self.streams.stream_push(stream);
        Ok(())
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    // Stream stack surface, used by the preprocessor for #include and
    // for position reporting.

    pub fn stream_push(&mut self, f: Stream) {
        self.streams.stream_push(f);
    }

    pub fn stream_stash(&mut self, f: Stream) {
        self.streams.stream_stash(f);
    }

    pub fn stream_unstash(&mut self) {
        self.streams.stream_unstash();
    }

    pub fn stream_depth(&self) -> usize {
        self.streams.stream_depth()
    }

    pub fn current_file(&self) -> &Stream {
        self.streams.current_file()
    }

    pub fn input_position(&self) -> String {
        self.streams.input_position()
    }

    pub fn base_file(&self) -> Option<&str> {
        self.streams.base_file()
    }

    // Character-level helpers.

    fn peek(&mut self) -> Option<u8> {
        let c = self.streams.readc();
        self.streams.unreadc(c);
        c
    }

    /// Consumes the next character when it matches, otherwise puts it
    /// back.
    fn next(&mut self, expect: u8) -> bool {
        let c = self.streams.readc();
        if c == Some(expect) {
            return true;
        }
        self.streams.unreadc(c);
        false
    }

    /// Records the start of the token in progress.
    fn mark(&mut self) {
        self.pos = self.streams.current_file().location();
    }

    fn get_pos(&self, delta: isize) -> Location {
        self.streams.current_file().location().shift_column(delta)
    }

    fn position_at(&self, location: Location) -> Position {
        self.streams.position_at(location)
    }

    fn warn(&self, kind: LexErrorKind, location: Location) -> Result<(), LexError> {
        let position = self.position_at(location);
        if self.diagnostics.flags().warnings_are_errors {
            return Err(kind.at(position));
        }
        if !self.diagnostics.flags().suppress_warnings {
            self.diagnostics.push(WarningDiagnostic::new(kind, position));
        }
        Ok(())
    }

    // Token construction. Every token, including the internal space
    // and newline markers, carries the mark and claims the next
    // intra-file index.

    fn make_token(&mut self, kind: TokenKind) -> Token {
        let location = self.pos;
        let f = self.streams.current_file_mut();
        let file = f.info();
        let count = f.next_count();
        Token {
            kind,
            file,
            location,
            count,
            bol: false,
            space: false,
            hideset: None,
        }
    }

    fn make_keyword(&mut self, punct: Punct) -> Token {
        self.make_token(TokenKind::Punct(punct))
    }

    fn make_ident(&mut self, name: impl Into<String>) -> Token {
        self.make_token(TokenKind::Ident(name.into()))
    }

    // Whitespace and comments.

    fn skip_line(&mut self) {
        loop {
            match self.streams.readc() {
                None => return,
                Some(b'\n') => {
                    self.streams.unreadc(Some(b'\n'));
                    return;
                }
                Some(_) => (),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let p = self.get_pos(-2);
        let mut maybe_end = false;
        loop {
            match self.streams.readc() {
                None => return Err(LexErrorKind::UnterminatedBlockComment.at(self.position_at(p))),
                Some(b'/') if maybe_end => return Ok(()),
                c => maybe_end = c == Some(b'*'),
            }
        }
    }

    fn do_skip_space(&mut self) -> Result<bool, LexError> {
        let c = self.streams.readc();
        let Some(c) = c else { return Ok(false) };
        if is_whitespace(c) {
            return Ok(true);
        }
        if c == b'/' {
            if self.next(b'*') {
                self.skip_block_comment()?;
                return Ok(true);
            }
            if self.next(b'/') {
                self.skip_line();
                return Ok(true);
            }
        }
        self.streams.unreadc(Some(c));
        Ok(false)
    }

    /// Skips spaces and comments. True if at least one was skipped.
    fn skip_space(&mut self) -> Result<bool, LexError> {
        if !self.do_skip_space()? {
            return Ok(false);
        }
        while self.do_skip_space()? {}
        Ok(true)
    }

    // Escape sequences.

    fn nextoct(&mut self) -> bool {
        matches!(self.peek(), Some(b'0'..=b'7'))
    }

    fn read_octal_char(&mut self, c: u8) -> i32 {
        let mut r = i32::from(c - b'0');
        if !self.nextoct() {
            return r;
        }
        r = (r << 3) | i32::from(self.streams.readc().expect("octal digit") - b'0');
        if !self.nextoct() {
            return r;
        }
        (r << 3) | i32::from(self.streams.readc().expect("octal digit") - b'0')
    }

    fn read_hex_char(&mut self) -> Result<i32, LexError> {
        let p = self.get_pos(-2);
        let c = self.streams.readc();
        let Some(digit) = c.and_then(hex_digit_value) else {
            return Err(LexErrorKind::HexEscapeWithoutDigit(c.unwrap_or(0)).at(self.position_at(p)));
        };
        let mut r = digit as i32;
        loop {
            let c = self.streams.readc();
            match c.and_then(hex_digit_value) {
                Some(digit) => r = r.wrapping_shl(4) | digit as i32,
                None => {
                    self.streams.unreadc(c);
                    return Ok(r);
                }
            }
        }
    }

    /// Reads a `\u` or `\U` escape; `digits` is 4 or 8 respectively.
    fn read_universal_char(&mut self, digits: u32) -> Result<u32, LexError> {
        let p = self.get_pos(-2);
        let mut r: u32 = 0;
        for _ in 0..digits {
            let c = self.streams.readc();
            match c.and_then(hex_digit_value) {
                Some(digit) => r = (r << 4) | digit,
                None => {
                    return Err(LexErrorKind::InvalidUniversalCharacter(c.unwrap_or(0))
                        .at(self.position_at(p)))
                }
            }
        }
        // Values outside the Unicode scalar range cannot be encoded as
        // UTF-8 and are rejected along with the values 6.4.3 disallows.
        if !is_valid_ucn(r) || char::from_u32(r).is_none() {
            return Err(
                LexErrorKind::InvalidUniversalCharacterValue { value: r, digits }
                    .at(self.position_at(p)),
            );
        }
        Ok(r)
    }

    fn read_escaped_char(&mut self) -> Result<i32, LexError> {
        let p = self.get_pos(-1);
        let c = self.streams.readc();
        match c {
            Some(c @ (b'\'' | b'"' | b'?' | b'\\')) => Ok(i32::from(c)),
            Some(b'a') => Ok(0x07),
            Some(b'b') => Ok(0x08),
            Some(b'f') => Ok(0x0C),
            Some(b'n') => Ok(i32::from(b'\n')),
            Some(b'r') => Ok(i32::from(b'\r')),
            Some(b't') => Ok(i32::from(b'\t')),
            Some(b'v') => Ok(0x0B),
            // '\e' is a GNU extension.
            Some(b'e') => Ok(0x1B),
            Some(b'x') => self.read_hex_char(),
            Some(b'u') => Ok(self.read_universal_char(4)? as i32),
            Some(b'U') => Ok(self.read_universal_char(8)? as i32),
            Some(c @ b'0'..=b'7') => Ok(self.read_octal_char(c)),
            _ => {
                let c = c.unwrap_or(0);
                self.warn(LexErrorKind::UnknownEscapeCharacter(c), p)?;
                Ok(i32::from(c))
            }
        }
    }

    // Literals.

    fn read_char(&mut self, encoding: Encoding) -> Result<Token, LexError> {
        let c = self.streams.readc();
        let value = match c {
            Some(b'\\') => self.read_escaped_char()?,
            Some(c) => i32::from(c),
            None => -1,
        };
        match self.streams.readc() {
            Some(b'\'') => (),
            _ => return Err(LexErrorKind::UnterminatedChar.at(self.position_at(self.pos))),
        }
        // A plain character constant has type char; narrow through a
        // signed byte the way (char)c does on the usual targets.
        let value = if encoding == Encoding::Default {
            i32::from(value as u8 as i8)
        } else {
            value
        };
        Ok(self.make_token(TokenKind::Char { value, encoding }))
    }

    fn read_string(&mut self, encoding: Encoding) -> Result<Token, LexError> {
        let mut b = Buffer::new();
        loop {
            let c = self.streams.readc();
            let Some(c) = c else {
                return Err(LexErrorKind::UnterminatedString.at(self.position_at(self.pos)));
            };
            if c == b'"' {
                break;
            }
            if c != b'\\' {
                b.write(c);
                continue;
            }
            // A universal character becomes UTF-8; any other escape
            // yields a raw byte.
            let is_ucn = matches!(self.peek(), Some(b'u') | Some(b'U'));
            let value = self.read_escaped_char()?;
            if is_ucn {
                write_utf8(&mut b, value as u32);
            } else {
                b.write(value as u8);
            }
        }
        b.write(0);
        Ok(self.make_token(TokenKind::Str {
            bytes: b.into_bytes(),
            encoding,
        }))
    }

    // Identifiers and numbers.

    fn read_ident(&mut self, mut b: Buffer) -> Result<Token, LexError> {
        loop {
            let c = self.streams.readc();
            match c {
                Some(c) if c.is_ascii_alphanumeric() || c >= 0x80 || c == b'_' || c == b'$' => {
                    b.write(c);
                }
                // C11 6.4.2.1: universal character names are allowed
                // in identifiers.
                Some(b'\\') if matches!(self.peek(), Some(b'u') | Some(b'U')) => {
                    let value = self.read_escaped_char()?;
                    write_utf8(&mut b, value as u32);
                }
                c => {
                    self.streams.unreadc(c);
                    let name = String::from_utf8_lossy(b.body()).into_owned();
                    return Ok(self.make_ident(name));
                }
            }
        }
    }

    fn read_ident_from(&mut self, first: u8) -> Result<Token, LexError> {
        let mut b = Buffer::new();
        b.write(first);
        self.read_ident(b)
    }

    /// Reads a pp-number (C11 6.4.8). The grammar is loose: bases,
    /// integers, and floats are not distinguished here, and invalid
    /// forms such as ".32e." are accepted and rejected downstream.
    fn read_number(&mut self, first: u8) -> Token {
        let mut b = String::new();
        b.push(first as char);
        let mut last = first;
        loop {
            let c = self.streams.readc();
            // A sign is part of the number only right after an
            // exponent marker.
            let flonum =
                matches!(last, b'e' | b'E' | b'p' | b'P') && matches!(c, Some(b'+') | Some(b'-'));
            match c {
                Some(c) if c.is_ascii_digit() || c.is_ascii_alphabetic() || c == b'.' || flonum => {
                    b.push(c as char);
                    last = c;
                }
                c => {
                    self.streams.unreadc(c);
                    return self.make_token(TokenKind::Number(b));
                }
            }
        }
    }

    // Operators and digraphs.

    fn read_rep(&mut self, expect: u8, then: Punct, otherwise: Punct) -> Token {
        let punct = if self.next(expect) { then } else { otherwise };
        self.make_keyword(punct)
    }

    fn read_rep2(
        &mut self,
        expect1: u8,
        then1: Punct,
        expect2: u8,
        then2: Punct,
        otherwise: Punct,
    ) -> Token {
        if self.next(expect1) {
            return self.make_keyword(then1);
        }
        self.read_rep(expect2, then2, otherwise)
    }

    /// Digraphs starting with `%`: `%>` is `}`, `%:` is `#`, and
    /// `%:%:` is `##` (C11 6.4.6p3). Returns None when the `%` turns
    /// out to be an ordinary operator.
    fn read_hash_digraph(&mut self) -> Option<Token> {
        if self.next(b'>') {
            return Some(self.make_keyword(Punct::CloseCurly));
        }
        if self.next(b':') {
            if self.next(b'%') {
                if self.next(b':') {
                    return Some(self.make_keyword(Punct::HashConcat));
                }
                self.streams.unreadc(Some(b'%'));
            }
            return Some(self.make_keyword(Punct::Hash));
        }
        None
    }

    // The dispatcher.

    fn do_read_token(&mut self) -> Result<Token, LexError> {
        if self.skip_space()? {
            self.mark();
            return Ok(self.make_token(TokenKind::Space));
        }
        self.mark();
        let c = self.streams.readc();
        let Some(c) = c else {
            return Ok(self.make_token(TokenKind::Eof));
        };
        Ok(match c {
            b'\n' => self.make_token(TokenKind::Newline),
            b':' => self.read_rep(b'>', Punct::CloseBracket, Punct::Colon),
            b'#' => self.read_rep(b'#', Punct::HashConcat, Punct::Hash),
            b'+' => self.read_rep2(b'+', Punct::Increment, b'=', Punct::AddAssign, Punct::Add),
            b'*' => self.read_rep(b'=', Punct::MultiplyAssign, Punct::Multiply),
            b'=' => self.read_rep(b'=', Punct::DoubleEquals, Punct::Assign),
            b'!' => self.read_rep(b'=', Punct::NotEquals, Punct::Not),
            b'&' => self.read_rep2(
                b'&',
                Punct::LogicalAnd,
                b'=',
                Punct::BitAndAssign,
                Punct::Ampersand,
            ),
            b'|' => self.read_rep2(
                b'|',
                Punct::LogicalOr,
                b'=',
                Punct::BitOrAssign,
                Punct::BitOr,
            ),
            b'^' => self.read_rep(b'=', Punct::BitXorAssign, Punct::BitXor),
            b'"' => self.read_string(Encoding::Default)?,
            b'\'' => self.read_char(Encoding::Default)?,
            b'/' => self.read_rep(b'=', Punct::DivideAssign, Punct::Divide),
            b'a'..=b't' | b'v'..=b'z' | b'A'..=b'K' | b'M'..=b'T' | b'V'..=b'Z' | b'_' | b'$'
            | 0x80..=0xFD => self.read_ident_from(c)?,
            b'0'..=b'9' => self.read_number(c),
            b'L' | b'U' => {
                // Wide or char32_t literal, or just an identifier.
                let encoding = if c == b'L' {
                    Encoding::Wide
                } else {
                    Encoding::Utf32
                };
                if self.next(b'"') {
                    self.read_string(encoding)?
                } else if self.next(b'\'') {
                    self.read_char(encoding)?
                } else {
                    self.read_ident_from(c)?
                }
            }
            b'u' => {
                if self.next(b'"') {
                    self.read_string(Encoding::Utf16)?
                } else if self.next(b'\'') {
                    self.read_char(Encoding::Utf16)?
                } else if self.next(b'8') {
                    // C11 6.4.5: UTF-8 string literal.
                    if self.next(b'"') {
                        self.read_string(Encoding::Utf8)?
                    } else {
                        self.streams.unreadc(Some(b'8'));
                        self.read_ident_from(c)?
                    }
                } else {
                    self.read_ident_from(c)?
                }
            }
            b'.' => {
                if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.read_number(b'.')
                } else if self.next(b'.') {
                    if self.next(b'.') {
                        self.make_keyword(Punct::Ellipsis)
                    } else {
                        self.make_ident("..")
                    }
                } else {
                    self.make_keyword(Punct::Dot)
                }
            }
            b'(' => self.make_keyword(Punct::OpenParen),
            b')' => self.make_keyword(Punct::CloseParen),
            b',' => self.make_keyword(Punct::Comma),
            b';' => self.make_keyword(Punct::Semicolon),
            b'[' => self.make_keyword(Punct::OpenBracket),
            b']' => self.make_keyword(Punct::CloseBracket),
            b'{' => self.make_keyword(Punct::OpenCurly),
            b'}' => self.make_keyword(Punct::CloseCurly),
            b'?' => self.make_keyword(Punct::Ternary),
            b'~' => self.make_keyword(Punct::BitComplement),
            b'-' => {
                if self.next(b'-') {
                    self.make_keyword(Punct::Decrement)
                } else if self.next(b'>') {
                    self.make_keyword(Punct::Arrow)
                } else if self.next(b'=') {
                    self.make_keyword(Punct::SubtractAssign)
                } else {
                    self.make_keyword(Punct::Subtract)
                }
            }
            b'<' => {
                if self.next(b'<') {
                    self.read_rep(b'=', Punct::LeftShiftAssign, Punct::LeftShift)
                } else if self.next(b'=') {
                    self.make_keyword(Punct::LessThanEq)
                } else if self.next(b':') {
                    // Digraph for '['.
                    self.make_keyword(Punct::OpenBracket)
                } else if self.next(b'%') {
                    // Digraph for '{'.
                    self.make_keyword(Punct::OpenCurly)
                } else {
                    self.make_keyword(Punct::LessThan)
                }
            }
            b'>' => {
                if self.next(b'=') {
                    self.make_keyword(Punct::GreaterThanEq)
                } else if self.next(b'>') {
                    self.read_rep(b'=', Punct::RightShiftAssign, Punct::RightShift)
                } else {
                    self.make_keyword(Punct::GreaterThan)
                }
            }
            b'%' => match self.read_hash_digraph() {
                Some(token) => token,
                None => self.read_rep(b'=', Punct::ModulusAssign, Punct::Modulus),
            },
            b'\\' => {
                // A universal character may start an identifier.
                if matches!(self.peek(), Some(b'u') | Some(b'U')) {
                    let mut b = Buffer::new();
                    let value = self.read_escaped_char()?;
                    write_utf8(&mut b, value as u32);
                    self.read_ident(b)?
                } else {
                    self.make_token(TokenKind::Invalid(c))
                }
            }
            _ => self.make_token(TokenKind::Invalid(c)),
        })
    }

    // The token buffer stack.

    fn buffer_empty(&self) -> bool {
        self.buffers.len() == 1 && self.buffers.head().is_empty()
    }

    /// Pushes a token back; the next `lex` returns it. Ungetting EOF
    /// is a no-op so include boundaries stay synthesizable.
    pub fn unget_token(&mut self, token: Token) {
        if token.kind.is_eof() {
            return;
        }
        self.buffers.tail_mut().push(token);
    }

    /// Temporarily switches the input to the given token list, so its
    /// tokens come back from `lex` again. Once they are exhausted,
    /// `lex` returns EOF rather than touching the character stream,
    /// until the matching `token_buffer_unstash`.
    pub fn token_buffer_stash(&mut self, buf: Sequence<Token>) {
        self.buffers.push(buf);
    }

    pub fn token_buffer_unstash(&mut self) -> Sequence<Token> {
        self.buffers.pop()
    }

    // Entry points.

    /// The main lexer function: one preprocessing token, with spaces
    /// and comments folded into the `space` flag of the token that
    /// follows them.
    pub fn lex(&mut self) -> Result<Token, LexError> {
        let buf = self.buffers.tail_mut();
        if !buf.is_empty() {
            return Ok(buf.pop());
        }
        if self.buffers.len() > 1 {
            return Ok(self.make_token(TokenKind::Eof));
        }
        let bol = self.streams.current_file().column() == 1;
        let mut token = self.do_read_token()?;
        while token.kind.is_space() {
            token = self.do_read_token()?;
            token.space = true;
        }
        token.bol = bol;
        Ok(token)
    }

    /// Lexes exactly one token from a string, stashing the stream
    /// stack around it so the main pipeline is undisturbed. Trailing
    /// input beyond one token and an optional newline is an error.
    pub fn lex_string(&mut self, s: &str) -> Result<Token, LexError> {
        self.streams.stream_stash(Stream::from_string(s));
        let result = self.do_lex_string(s);
        self.streams.stream_unstash();
        result
    }

    fn do_lex_string(&mut self, s: &str) -> Result<Token, LexError> {
        let token = self.do_read_token()?;
        self.next(b'\n');
        let p = self.get_pos(0);
        if self.peek().is_some() {
            return Err(LexErrorKind::UnconsumedInput(s.to_string()).at(self.position_at(p)));
        }
        Ok(token)
    }

    // Conditional-inclusion support.

    fn skip_char_literal(&mut self) {
        if self.streams.readc() == Some(b'\\') {
            self.streams.readc();
        }
        let mut c = self.streams.readc();
        while c.is_some() && c != Some(b'\'') {
            c = self.streams.readc();
        }
    }

    fn skip_string_literal(&mut self) {
        loop {
            match self.streams.readc() {
                None | Some(b'"') => return,
                Some(b'\\') => {
                    self.streams.readc();
                }
                Some(_) => (),
            }
        }
    }

    /// Skips a region excluded by #if, #ifdef and the like, as fast as
    /// possible. C11 6.10 says skipped groups still consist of valid
    /// preprocessing tokens, but like most compilers we neither
    /// tokenize nor validate them; only quoting and nested
    /// conditionals are tracked. On reaching an #else, #elif, or
    /// #endif belonging to the starting level, its tokens (with a
    /// synthesized `#`) are pushed back for the preprocessor to
    /// resume on.
    pub fn skip_cond_incl(&mut self) -> Result<(), LexError> {
        let mut nest = 0;
        loop {
            let bol = self.streams.current_file().column() == 1;
            self.skip_space()?;
            let c = self.streams.readc();
            let Some(c) = c else { return Ok(()) };
            match c {
                b'\'' => {
                    self.skip_char_literal();
                    continue;
                }
                b'"' => {
                    self.skip_string_literal();
                    continue;
                }
                b'#' if bol => (),
                _ => continue,
            }
            let column = self.streams.current_file().column() - 1;
            let token = self.lex()?;
            if !token.kind.is_ident() {
                continue;
            }
            if nest == 0
                && (token.is_ident("else") || token.is_ident("elif") || token.is_ident("endif"))
            {
                self.unget_token(token);
                let mut hash = self.make_keyword(Punct::Hash);
                hash.bol = true;
                hash.location.column = column;
                self.unget_token(hash);
                return Ok(());
            }
            if token.is_ident("if") || token.is_ident("ifdef") || token.is_ident("ifndef") {
                nest += 1;
            } else if nest > 0 && token.is_ident("endif") {
                nest -= 1;
            }
            self.skip_line();
        }
    }

    /// Reads a header file name after `#include`.
    ///
    /// Filenames there need special tokenization: they may be quoted
    /// by `<` and `>`, and even within `"` the usual escape rules do
    /// not apply, so `lex` cannot be reused. Returns None when
    /// pushback is pending or no quote follows, letting the
    /// preprocessor fall back to macro-expanded include forms.
    pub fn read_header_file_name(&mut self) -> Result<Option<HeaderName>, LexError> {
        if !self.buffer_empty() {
            return Ok(None);
        }
        self.skip_space()?;
        let p = self.get_pos(0);
        let (close, is_system) = if self.next(b'"') {
            (b'"', false)
        } else if self.next(b'<') {
            (b'>', true)
        } else {
            return Ok(None);
        };
        let mut b = Buffer::new();
        while !self.next(close) {
            match self.streams.readc() {
                None | Some(b'\n') => {
                    return Err(LexErrorKind::PrematureEndOfHeaderName.at(self.position_at(p)))
                }
                Some(c) => b.write(c),
            }
        }
        if b.is_empty() {
            return Err(LexErrorKind::EmptyHeaderName.at(self.position_at(p)));
        }
        Ok(Some(HeaderName {
            name: String::from_utf8_lossy(b.body()).into_owned(),
            is_system,
        }))
    }
}
