//! Compiler for the gatemark language

use std::path::Path;
use tracing::debug;

use crate::config::Config;
use crate::language::{Document, LoadingError};

mod commands;
mod compiler;
mod diagnostic;
mod directive;
mod groups;
mod inline;
mod list;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use inline::parse_inline;

/// Read a file and return an owned String. We pass that ownership back to the
/// main function so that the Document compiled from it can outlive the
/// borrow of the filename.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Compile source text into a Document. Compilation always succeeds; any
/// problems encountered are in the Document's diagnostics.
pub fn compile(content: &str, config: &Config) -> Document {
    let document = compiler::Compiler::new(config).compile(content);

    debug!(
        "Found {} gate{}, {} diagnostic{}",
        document
            .gates
            .len(),
        if document
            .gates
            .len()
            == 1
        {
            ""
        } else {
            "s"
        },
        document
            .diagnostics
            .len(),
        if document
            .diagnostics
            .len()
            == 1
        {
            ""
        } else {
            "s"
        }
    );

    document
}
