use gatemark::config::ConfigError;
use gatemark::language::LoadingError;
use gatemark::parsing::{Diagnostic, Severity};
use owo_colors::OwoColorize;
use std::path::Path;

fn label(severity: Severity) -> String {
    match severity {
        Severity::Error => "error"
            .bright_red()
            .to_string(),
        Severity::Warning => "warning"
            .bright_yellow()
            .to_string(),
    }
}

/// Format a diagnostic with the offending line of source for context
pub fn full_diagnostic(diagnostic: &Diagnostic, filename: &Path, source: &str) -> String {
    let i = diagnostic.line;

    let code = source
        .lines()
        .nth(i)
        .unwrap_or("?");
    let j = leading_width(code);

    let line = i + 1;
    let column = j + 1;
    let width = 3.max(
        line.to_string()
            .len(),
    );

    format!(
        r#"
{}: {}:{}:{} {}

{:width$} {}
{:width$} {} {}
{:width$} {} {:>column$}
        "#,
        label(diagnostic.severity()),
        filename.to_string_lossy(),
        line,
        column,
        diagnostic
            .message()
            .bold(),
        ' ',
        '|'.bright_blue(),
        line.bright_blue(),
        '|'.bright_blue(),
        code,
        ' ',
        '|'.bright_blue(),
        '^'.bright_red(),
    )
    .trim_ascii()
    .to_string()
}

/// Format a diagnostic as a single line
pub fn concise_diagnostic(diagnostic: &Diagnostic, filename: &Path, source: &str) -> String {
    let code = source
        .lines()
        .nth(diagnostic.line)
        .unwrap_or("");

    format!(
        "{}: {}:{}:{} {}",
        label(diagnostic.severity()),
        filename.to_string_lossy(),
        diagnostic.line + 1,
        leading_width(code) + 1,
        diagnostic
            .message()
            .bold(),
    )
}

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error(error: &LoadingError<'_>) -> String {
    if error
        .details
        .is_empty()
    {
        format!(
            "{}: {}: {}",
            "error".bright_red(),
            error
                .filename
                .display(),
            error
                .problem
                .bold()
        )
    } else {
        format!(
            "{}: {}: {} ({})",
            "error".bright_red(),
            error
                .filename
                .display(),
            error
                .problem
                .bold(),
            error.details
        )
    }
}

pub fn concise_config_error(error: &ConfigError) -> String {
    format!("{}: {}", "error".bright_red(), error)
}

// Column of the first non-blank character, zero-origin, counted in
// characters rather than bytes.
fn leading_width(code: &str) -> usize {
    code.chars()
        .take_while(|c| c.is_whitespace())
        .count()
}
