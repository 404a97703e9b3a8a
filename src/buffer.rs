use itertools::Itertools;
use std::fmt;

/// Append-only byte container used to accumulate token spellings and
/// string-literal payloads. Doubles on growth from a floor of eight.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    body: Vec<u8>,
}

const INIT_SIZE: usize = 8;

impl Buffer {
    pub fn new() -> Self {
        Self {
            body: Vec::with_capacity(INIT_SIZE),
        }
    }

    fn extend_for(&mut self, delta: usize) {
        let needed = self.body.len() + delta;
        let mut capacity = self.body.capacity().max(INIT_SIZE);
        while capacity < needed {
            capacity *= 2;
        }
        if capacity > self.body.capacity() {
            self.body.reserve_exact(capacity - self.body.len());
        }
    }

    pub fn write(&mut self, byte: u8) {
        self.extend_for(1);
        self.body.push(byte);
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.extend_for(bytes.len());
        self.body.extend_from_slice(bytes);
    }

    /// Formats into the buffer. Rust's formatting machinery sizes its
    /// own output, so unlike a C sprintf loop no retry is needed.
    pub fn printf(&mut self, args: fmt::Arguments<'_>) {
        fmt::Write::write_fmt(self, args).expect("formatting into a buffer cannot fail");
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    pub fn capacity(&self) -> usize {
        self.body.capacity()
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes());
        Ok(())
    }
}

/// Encodes a code point as UTF-8 and appends it to the buffer. Code
/// points outside the Unicode scalar range are rejected during escape
/// decoding, so the replacement fallback is unreachable in practice.
pub fn write_utf8(buffer: &mut Buffer, codepoint: u32) {
    let c = char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER);
    let mut utf8 = [0u8; 4];
    buffer.append(c.encode_utf8(&mut utf8).as_bytes());
}

fn quote(byte: u8) -> Option<&'static str> {
    Some(match byte {
        b'"' => "\\\"",
        b'\\' => "\\\\",
        0x08 => "\\b",
        0x0C => "\\f",
        b'\n' => "\\n",
        b'\r' => "\\r",
        b'\t' => "\\t",
        _ => return None,
    })
}

fn quote_byte(byte: u8) -> String {
    if let Some(quoted) = quote(byte) {
        quoted.to_string()
    } else if (0x20..0x7F).contains(&byte) {
        (byte as char).to_string()
    } else {
        format!("\\x{:02x}", byte)
    }
}

/// Escapes a single byte for display inside a C character constant.
pub fn quote_char(byte: u8) -> String {
    match byte {
        b'\\' => "\\\\".to_string(),
        b'\'' => "\\'".to_string(),
        _ => quote_byte(byte),
    }
}

/// Escapes the bytes of a NUL-terminated C string for display; reads up
/// to the first NUL.
pub fn quote_cstring(bytes: &[u8]) -> String {
    let terminated = bytes.split(|&b| b == 0).next().unwrap_or(bytes);
    quote_cstring_len(terminated, terminated.len())
}

/// Escapes exactly `len` bytes for display, including any interior NULs.
pub fn quote_cstring_len(bytes: &[u8], len: usize) -> String {
    bytes[..len].iter().copied().map(quote_byte).join("")
}
