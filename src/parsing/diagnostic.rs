//! Recoverable problems found while compiling a document. None of these
//! stop compilation; most are also written into the output where they
//! occurred so an author sees them in the page.

use std::fmt;

use crate::rendering::escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    MissingArguments {
        command: String,
        usage: &'static str,
    },
    UndefinedCommand(String),
    UnbalancedBraces(String),
    UnterminatedCodeBlock,
    UnknownBlock(String),
    UnmatchedEnd(String),
    InvalidCooldown(String),
    InvalidVisibility(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A problem and the (zero origin) line it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind) -> Diagnostic {
        Diagnostic { line, kind }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::MissingArguments { command, usage } => {
                format!("{} error: missing arguments ({})", command, usage)
            }
            DiagnosticKind::UndefinedCommand(line) => format!("Undefined command: {}", line),
            DiagnosticKind::UnbalancedBraces(command) => {
                format!("Unbalanced braces in arguments to {}", command)
            }
            DiagnosticKind::UnterminatedCodeBlock => {
                "Code block not closed by #ed{code}".to_string()
            }
            DiagnosticKind::UnknownBlock(kind) => format!("Unknown block kind '{}'", kind),
            DiagnosticKind::UnmatchedEnd(kind) => {
                format!("#ed{{{}}} without a matching #bg", kind)
            }
            DiagnosticKind::InvalidCooldown(value) => {
                format!("Invalid cooldown '{}', expected milliseconds", value)
            }
            DiagnosticKind::InvalidVisibility(value) => {
                format!("Invalid visibility setting '{}'", value)
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match &self.kind {
            DiagnosticKind::MissingArguments { .. }
            | DiagnosticKind::InvalidCooldown(_)
            | DiagnosticKind::InvalidVisibility(_) => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// The visible form written into the document, if this kind of problem
    /// has one. Unbalanced braces and an unterminated code block are only
    /// reported, never shown.
    pub fn html(&self) -> Option<String> {
        match &self.kind {
            DiagnosticKind::UnbalancedBraces(_) | DiagnosticKind::UnterminatedCodeBlock => None,
            _ => {
                let message = escape(&self.message());
                Some(match self.severity() {
                    Severity::Error => format!(
                        r#"<p class="directive-error" style="color:red;">{}</p>"#,
                        message
                    ),
                    Severity::Warning => format!(
                        r#"<p class="directive-warning" style="color:orange;">{}</p>"#,
                        message
                    ),
                })
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line + 1, self.message())
    }
}
