use super::stream::FileInfo;
use crate::buffer::{quote_char, quote_cstring_len};
use crate::line_column::Location;
use derive_more::{Deref, IsVariant};
use std::collections::HashSet;
use std::fmt::Display;
use std::rc::Rc;

/// Set of macro names excluded from re-expansion around a token. The
/// preprocessor owns this; the lexer only leaves the slot empty.
pub type Hideset = HashSet<String>;

/// A C11 preprocessing token. Keywords do not exist at this stage: the
/// definition of a pp-token is more relaxed than that of a regular
/// token (".32e." is a valid pp-number, "if" is just an identifier),
/// and the preprocessor converts and validates later.
#[derive(Clone, Debug, Deref)]
pub struct Token {
    #[deref]
    pub kind: TokenKind,

    pub file: Rc<FileInfo>,
    pub location: Location,
    /// Index of the token within its file; strictly increasing.
    pub count: usize,
    /// True on the first token of a logical line.
    pub bol: bool,
    /// True when whitespace or a comment immediately precedes.
    pub space: bool,
    pub hideset: Option<Box<Hideset>>,
}

impl Token {
    pub fn is_keyword(&self, punct: Punct) -> bool {
        matches!(&self.kind, TokenKind::Punct(p) if *p == punct)
    }

    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(ident) if ident == name)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, IsVariant)]
pub enum TokenKind {
    Ident(String),
    /// A punctuator or multi-character operator.
    Punct(Punct),
    /// An unparsed pp-number; validated by later stages.
    Number(String),
    Char {
        value: i32,
        encoding: Encoding,
    },
    /// NUL-terminated string literal payload.
    Str {
        bytes: Vec<u8>,
        encoding: Encoding,
    },
    Space,
    Newline,
    Eof,
    /// A single byte no rule recognized; rejected by the parser, not here.
    Invalid(u8),
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident(name) => f.write_str(name),
            TokenKind::Punct(punct) => punct.fmt(f),
            TokenKind::Number(number) => f.write_str(number),
            TokenKind::Char { value, encoding } => {
                let quoted = quote_char((*value & 0xFF) as u8);
                write!(f, "{}'{}'", encoding.prefix(), quoted)
            }
            TokenKind::Str { bytes, encoding } => {
                let len = bytes.len().saturating_sub(1);
                write!(
                    f,
                    "{}\"{}\"",
                    encoding.prefix(),
                    quote_cstring_len(bytes, len)
                )
            }
            TokenKind::Space => f.write_str(" "),
            TokenKind::Newline => f.write_str("\n"),
            TokenKind::Eof => f.write_str("(eof)"),
            TokenKind::Invalid(byte) => write!(f, "{}", *byte as char),
        }
    }
}

/// String and character literal encodings, keyed by prefix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    Default,
    Utf8,  // u8""
    Utf16, // u"" and u''
    Utf32, // U"" and U''
    Wide,  // L"" and L''
}

impl Encoding {
    pub fn prefix(&self) -> &'static str {
        match self {
            Encoding::Default => "",
            Encoding::Utf8 => "u8",
            Encoding::Utf16 => "u",
            Encoding::Utf32 => "U",
            Encoding::Wide => "L",
        }
    }
}

/// Punctuators and multi-character operators. Digraphs lex to the same
/// variants as their primary spellings (C11 6.4.6p3).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Punct {
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    Dot,
    Arrow,
    Increment,
    Decrement,
    Ampersand,
    Multiply,
    Add,
    Subtract,
    BitComplement,
    Not,
    Divide,
    Modulus,
    LeftShift,
    RightShift,
    LessThan,
    GreaterThan,
    LessThanEq,
    GreaterThanEq,
    DoubleEquals,
    NotEquals,
    BitXor,
    BitOr,
    LogicalAnd,
    LogicalOr,
    Ternary,
    Colon,
    Semicolon,
    Ellipsis,
    Assign,
    MultiplyAssign,
    DivideAssign,
    ModulusAssign,
    AddAssign,
    SubtractAssign,
    LeftShiftAssign,
    RightShiftAssign,
    BitAndAssign,
    BitXorAssign,
    BitOrAssign,
    Comma,
    Hash,
    HashConcat,
}

impl Display for Punct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Punct::OpenBracket => "[",
            Punct::CloseBracket => "]",
            Punct::OpenParen => "(",
            Punct::CloseParen => ")",
            Punct::OpenCurly => "{",
            Punct::CloseCurly => "}",
            Punct::Dot => ".",
            Punct::Arrow => "->",
            Punct::Increment => "++",
            Punct::Decrement => "--",
            Punct::Ampersand => "&",
            Punct::Multiply => "*",
            Punct::Add => "+",
            Punct::Subtract => "-",
            Punct::BitComplement => "~",
            Punct::Not => "!",
            Punct::Divide => "/",
            Punct::Modulus => "%",
            Punct::LeftShift => "<<",
            Punct::RightShift => ">>",
            Punct::LessThan => "<",
            Punct::GreaterThan => ">",
            Punct::LessThanEq => "<=",
            Punct::GreaterThanEq => ">=",
            Punct::DoubleEquals => "==",
            Punct::NotEquals => "!=",
            Punct::BitXor => "^",
            Punct::BitOr => "|",
            Punct::LogicalAnd => "&&",
            Punct::LogicalOr => "||",
            Punct::Ternary => "?",
            Punct::Colon => ":",
            Punct::Semicolon => ";",
            Punct::Ellipsis => "...",
            Punct::Assign => "=",
            Punct::MultiplyAssign => "*=",
            Punct::DivideAssign => "/=",
            Punct::ModulusAssign => "%=",
            Punct::AddAssign => "+=",
            Punct::SubtractAssign => "-=",
            Punct::LeftShiftAssign => "<<=",
            Punct::RightShiftAssign => ">>=",
            Punct::BitAndAssign => "&=",
            Punct::BitXorAssign => "^=",
            Punct::BitOrAssign => "|=",
            Punct::Comma => ",",
            Punct::Hash => "#",
            Punct::HashConcat => "##",
        })
    }
}
