use crate::line_column::Location;
use crate::sequence::Sequence;
use std::fmt::Display;
use std::fs;
use std::io::{self, Read};
use std::mem;
use std::rc::Rc;
use std::time::SystemTime;

/*
 * Character input streams for C source code.
 *
 * The following input processing happens at this layer:
 *
 * - C11 5.1.1.2p1: "\r\n" and "\r" are canonicalized to "\n".
 * - C11 5.1.1.2p2: a backslash immediately followed by a newline is
 *   removed (line splicing).
 * - A file that does not end in a newline appears to end in exactly
 *   one newline followed by end-of-file, as 5.1.1.2p2 requires of
 *   conforming source files.
 *
 * Trigraphs are not supported.
 */

/// Identity of an input file. Shared by every token read from the
/// file, so tokens stay meaningful after the stream itself is popped.
#[derive(Debug)]
pub struct FileInfo {
    pub name: String,
    pub mtime: Option<SystemTime>,
}

/// A file/line/column triple, used for token positions and error
/// rendering.
#[derive(Clone, Debug)]
pub struct Position {
    pub file: Rc<FileInfo>,
    pub location: Location,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.name, self.location)
    }
}

/// `read_hash_digraph` peeks two bytes beyond the `%`, so three slots
/// of pushback must always be accepted.
const PUSHBACK_CAPACITY: usize = 4;
const _: () = assert!(PUSHBACK_CAPACITY >= 3);

enum StreamSource {
    /// Backed by an OS handle (a file, or standard input).
    Handle {
        reader: io::BufReader<Box<dyn Read>>,
        lookahead: Option<u8>,
    },
    /// Backed by an in-memory string.
    Text { bytes: Vec<u8>, cursor: usize },
}

impl StreamSource {
    fn next_byte(&mut self) -> Option<u8> {
        match self {
            StreamSource::Handle { reader, lookahead } => {
                if let Some(byte) = lookahead.take() {
                    return Some(byte);
                }
                let mut byte = [0u8; 1];
                loop {
                    match reader.read(&mut byte) {
                        Ok(0) => return None,
                        Ok(_) => return Some(byte[0]),
                        Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                        // Read failures surface as end-of-file, the
                        // same as stdio's getc.
                        Err(_) => return None,
                    }
                }
            }
            StreamSource::Text { bytes, cursor } => {
                let byte = bytes.get(*cursor).copied();
                if byte.is_some() {
                    *cursor += 1;
                }
                byte
            }
        }
    }

    /// Returns the byte most recently taken by `next_byte`. Only used
    /// for the one-byte lookahead of "\r\n" canonicalization.
    fn unread_byte(&mut self, byte: u8) {
        match self {
            StreamSource::Handle { lookahead, .. } => {
                assert!(lookahead.is_none(), "stream lookahead already occupied");
                *lookahead = Some(byte);
            }
            StreamSource::Text { cursor, .. } => *cursor -= 1,
        }
    }
}

/// What the last delivered character was, for end-of-file newline
/// synthesis. A fresh stream counts as "not a newline" so that even an
/// empty file delivers one newline before end-of-file.
enum LastChar {
    Begin,
    Byte(u8),
    Eof,
}

/// One stacked input source with its read position, pushback buffer,
/// and per-file token counter.
pub struct Stream {
    info: Rc<FileInfo>,
    source: StreamSource,
    line: usize,
    column: usize,
    last: LastChar,
    pushback: [u8; PUSHBACK_CAPACITY],
    pushback_len: usize,
    ntok: usize,
}

impl Stream {
    fn new(info: FileInfo, source: StreamSource) -> Self {
        Self {
            info: Rc::new(info),
            source,
            line: 1,
            column: 1,
            last: LastChar::Begin,
            pushback: [0; PUSHBACK_CAPACITY],
            pushback_len: 0,
            ntok: 0,
        }
    }

    /// Wraps an open file. Failure to read its metadata is fatal, like
    /// the `fstat` it stands in for.
    pub fn from_file(file: fs::File, name: impl Into<String>) -> io::Result<Self> {
        let mtime = file.metadata()?.modified().ok();
        Ok(Self::new(
            FileInfo {
                name: name.into(),
                mtime,
            },
            StreamSource::Handle {
                reader: io::BufReader::new(Box::new(file)),
                lookahead: None,
            },
        ))
    }

    /// Wraps an arbitrary byte reader, e.g. standard input.
    pub fn from_reader(reader: Box<dyn Read>, name: impl Into<String>) -> Self {
        Self::new(
            FileInfo {
                name: name.into(),
                mtime: None,
            },
            StreamSource::Handle {
                reader: io::BufReader::new(reader),
                lookahead: None,
            },
        )
    }

    /// Wraps an in-memory string, e.g. a `-D` definition.
    pub fn from_string(text: impl Into<Vec<u8>>) -> Self {
        Self::new(
            FileInfo {
                name: "(string)".to_string(),
                mtime: None,
            },
            StreamSource::Text {
                bytes: text.into(),
                cursor: 0,
            },
        )
    }

    /// One canonicalized character from the underlying source:
    /// carriage returns fold into newlines, and the first end-of-file
    /// not preceded by a newline is delivered as a newline.
    fn getc(&mut self) -> Option<u8> {
        let c = match self.source.next_byte() {
            None => match self.last {
                LastChar::Byte(b'\n') | LastChar::Eof => None,
                _ => Some(b'\n'),
            },
            Some(b'\r') => {
                match self.source.next_byte() {
                    Some(b'\n') | None => (),
                    Some(other) => self.source.unread_byte(other),
                }
                Some(b'\n')
            }
            Some(byte) => Some(byte),
        };
        self.last = match c {
            None => LastChar::Eof,
            Some(byte) => LastChar::Byte(byte),
        };
        c
    }

    pub fn info(&self) -> Rc<FileInfo> {
        Rc::clone(&self.info)
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Claims the next intra-file token index.
    pub fn next_count(&mut self) -> usize {
        let count = self.ntok;
        self.ntok += 1;
        count
    }
}

/// The stack of active input streams plus the side stack used to lex
/// standalone strings without disturbing the main pipeline. The top
/// stream is the one being read; `#include` pushes and end-of-file
/// pops.
pub struct StreamStack {
    files: Sequence<Stream>,
    stashed: Sequence<Sequence<Stream>>,
}

impl StreamStack {
    pub fn new() -> Self {
        Self {
            files: Sequence::new(),
            stashed: Sequence::new(),
        }
    }

    /// One character from the pushback buffer or the top stream, with
    /// the position advanced past it.
    fn get(&mut self) -> Option<u8> {
        let f = self.files.tail_mut();
        let c = if f.pushback_len > 0 {
            f.pushback_len -= 1;
            Some(f.pushback[f.pushback_len])
        } else {
            f.getc()
        };
        match c {
            Some(b'\n') => {
                f.line += 1;
                f.column = 1;
            }
            Some(_) => f.column += 1,
            None => (),
        }
        c
    }

    /// The public read operation. Callers never see a carriage return,
    /// a spliced backslash-newline, or the boundary between an
    /// included file and the file that included it.
    pub fn readc(&mut self) -> Option<u8> {
        loop {
            let c = self.get();
            match c {
                None => {
                    if self.files.len() == 1 {
                        return None;
                    }
                    // Dropping the stream closes its handle; reading
                    // resumes in the including file.
                    self.files.pop();
                }
                Some(b'\\') => {
                    // Splice a backslash-newline pair. `get` has
                    // already advanced the line counter past it.
                    let c2 = self.get();
                    if c2 != Some(b'\n') {
                        self.unreadc(c2);
                        return Some(b'\\');
                    }
                }
                Some(c) => return Some(c),
            }
        }
    }

    /// Puts a character back so the next `readc` yields it again, with
    /// the position moved back accordingly. Unreading end-of-file is a
    /// no-op. At most three characters may be pending at once.
    pub fn unreadc(&mut self, c: Option<u8>) {
        let Some(c) = c else { return };
        let f = self.files.tail_mut();
        assert!(
            f.pushback_len < PUSHBACK_CAPACITY,
            "pushback buffer overflow"
        );
        f.pushback[f.pushback_len] = c;
        f.pushback_len += 1;
        if c == b'\n' {
            f.column = 1;
            f.line -= 1;
        } else {
            f.column -= 1;
        }
    }

    pub fn stream_push(&mut self, f: Stream) {
        self.files.push(f);
    }

    pub fn stream_depth(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn current_file(&self) -> &Stream {
        self.files.tail()
    }

    pub fn current_file_mut(&mut self) -> &mut Stream {
        self.files.tail_mut()
    }

    /// Name of the file at the bottom of the stack, i.e. the one the
    /// compilation started from.
    pub fn base_file(&self) -> Option<&str> {
        if self.files.is_empty() {
            return None;
        }
        Some(self.files.head().name())
    }

    /// The current read position as `name:line:column`.
    pub fn input_position(&self) -> String {
        if self.files.is_empty() {
            return "(unknown)".to_string();
        }
        let f = self.files.tail();
        format!("{}:{}", f.name(), f.location())
    }

    pub fn position(&self) -> Position {
        let f = self.files.tail();
        Position {
            file: f.info(),
            location: f.location(),
        }
    }

    pub fn position_at(&self, location: Location) -> Position {
        Position {
            file: self.files.tail().info(),
            location,
        }
    }

    /// Saves the whole stream stack and replaces it with `f` alone, so
    /// a standalone string can be lexed mid-compilation.
    pub fn stream_stash(&mut self, f: Stream) {
        let current = mem::replace(&mut self.files, Sequence::new_with(f));
        self.stashed.push(current);
    }

    /// Restores the stream stack saved by the matching `stream_stash`.
    pub fn stream_unstash(&mut self) {
        self.files = self.stashed.pop();
    }
}

impl Default for StreamStack {
    fn default() -> Self {
        Self::new()
    }
}
