use super::stream::Position;
use crate::buffer::quote_char;
use std::fmt::Display;

/// A fatal lexical or input error. The lexer never recovers: the
/// driver renders the error and terminates the compilation.
#[derive(Clone, Debug)]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Absent only for failures before any stream exists, e.g. an
    /// unopenable input file.
    pub position: Option<Position>,
}

impl LexError {
    pub fn new(kind: LexErrorKind, position: Option<Position>) -> Self {
        Self { kind, position }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{}: error: {}", position, self.kind),
            None => write!(f, "error: {}", self.kind),
        }
    }
}

impl std::error::Error for LexError {}

#[derive(Clone, Debug, PartialEq)]
pub enum LexErrorKind {
    UnterminatedChar,
    UnterminatedString,
    UnterminatedBlockComment,
    HexEscapeWithoutDigit(u8),
    InvalidUniversalCharacter(u8),
    InvalidUniversalCharacterValue { value: u32, digits: u32 },
    PrematureEndOfHeaderName,
    EmptyHeaderName,
    /// Warning unless promoted by `-Werror`.
    UnknownEscapeCharacter(u8),
    UnconsumedInput(String),
    CannotOpenFile { filename: String, reason: String },
    StatFailed { reason: String },
}

impl LexErrorKind {
    pub fn at(self, position: Position) -> LexError {
        LexError::new(self, Some(position))
    }

    pub fn without_position(self) -> LexError {
        LexError::new(self, None)
    }
}

impl Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErrorKind::UnterminatedChar => write!(f, "unterminated char"),
            LexErrorKind::UnterminatedString => write!(f, "unterminated string"),
            LexErrorKind::UnterminatedBlockComment => {
                write!(f, "premature end of block comment")
            }
            LexErrorKind::HexEscapeWithoutDigit(byte) => write!(
                f,
                "\\x is not followed by a hexadecimal character: {}",
                quote_char(*byte)
            ),
            LexErrorKind::InvalidUniversalCharacter(byte) => {
                write!(f, "invalid universal character: {}", quote_char(*byte))
            }
            LexErrorKind::InvalidUniversalCharacterValue { value, digits } => {
                let prefix = if *digits == 4 { 'u' } else { 'U' };
                write!(
                    f,
                    "invalid universal character: \\{}{:0width$x}",
                    prefix,
                    value,
                    width = *digits as usize
                )
            }
            LexErrorKind::PrematureEndOfHeaderName => {
                write!(f, "premature end of header name")
            }
            LexErrorKind::EmptyHeaderName => write!(f, "header name should not be empty"),
            LexErrorKind::UnknownEscapeCharacter(byte) => {
                write!(f, "unknown escape character: \\{}", quote_char(*byte))
            }
            LexErrorKind::UnconsumedInput(text) => write!(f, "unconsumed input: {text}"),
            LexErrorKind::CannotOpenFile { filename, reason } => {
                write!(f, "cannot open {filename}: {reason}")
            }
            LexErrorKind::StatFailed { reason } => write!(f, "fstat failed: {reason}"),
        }
    }
}
