//! Regular expressions compiled once on first use.

/// Compile a pattern the first time this expression is evaluated and hand
/// back the same `&'static Regex` thereafter. Patterns are literals, so a
/// failure to compile is a programming error.
#[macro_export]
macro_rules! pattern {
    ($pattern:expr) => {{
        static CELL: std::sync::OnceLock<::regex::Regex> = std::sync::OnceLock::new();
        CELL.get_or_init(|| match ::regex::Regex::new($pattern) {
            Ok(regex) => regex,
            Err(error) => panic!("Invalid pattern {}: {}", $pattern, error),
        })
    }};
}
