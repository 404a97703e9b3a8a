use crate::lexer::stream::Position;
use append_only_vec::AppendOnlyVec;
use std::fmt::Display;

#[derive(Clone, Debug)]
pub struct DiagnosticFlags {
    /// Print each warning to stderr as it arrives instead of collecting it.
    pub print_without_collecting: bool,
    /// `-Werror`: promote warnings to fatal lexical errors.
    pub warnings_are_errors: bool,
    /// `-w`: drop warnings entirely.
    pub suppress_warnings: bool,
}

impl Default for DiagnosticFlags {
    fn default() -> Self {
        Self {
            print_without_collecting: true,
            warnings_are_errors: false,
            suppress_warnings: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WarningDiagnostic {
    message: String,
    position: Position,
}

impl WarningDiagnostic {
    pub fn new(message: impl ToString, position: Position) -> Self {
        Self {
            message: message.to_string(),
            position,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for WarningDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: warning: {}", self.position, self.message)
    }
}

/// Sink for non-fatal diagnostics. Warning promotion (`-Werror`) and
/// suppression (`-w`) are decided by the issuer from `flags()`; the
/// sink itself only prints or collects.
pub struct Diagnostics {
    warnings: AppendOnlyVec<WarningDiagnostic>,
    flags: DiagnosticFlags,
}

impl Diagnostics {
    pub fn new(flags: DiagnosticFlags) -> Self {
        Self {
            warnings: AppendOnlyVec::new(),
            flags,
        }
    }

    pub fn flags(&self) -> &DiagnosticFlags {
        &self.flags
    }

    pub fn push(&self, warning: WarningDiagnostic) {
        if self.flags.print_without_collecting {
            eprintln!("{warning}");
        } else {
            self.warnings.push(warning);
        }
    }

    pub fn print_all(&self) {
        for warning in self.warnings.iter() {
            eprintln!("{warning}");
        }
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DiagnosticFlags::default())
    }
}
