use std::fmt::Display;

/// A line/column pair within a source file. Both are 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position of the first character of a fresh stream.
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Shifts the column by a (possibly negative) amount, e.g. to point
    /// back at the start of an escape sequence already consumed.
    pub fn shift_column(&self, amount: isize) -> Self {
        Self {
            line: self.line,
            column: self.column.saturating_add_signed(amount),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
