//! Recognition of block level directive lines, `#name{arg}{arg}...`

use crate::parsing::groups::{take_all_groups, Groups};

/// A directive line split into its command and arguments. The command
/// includes the leading hashes, so `##pb{...}` has command `"##pb"` and a
/// bare heading `###{...}` has command `"###"`.
#[derive(Debug, PartialEq, Eq)]
pub struct Directive<'i> {
    pub command: &'i str,
    pub args: Vec<&'i str>,
    pub trailing: &'i str,
}

impl<'i> Directive<'i> {
    /// The argument at the given position, or empty if there were fewer
    /// groups than that.
    pub fn arg(&self, index: usize) -> &'i str {
        self.args
            .get(index)
            .copied()
            .unwrap_or("")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Line<'i> {
    Directive(Directive<'i>),
    /// Looked like a directive but an argument group was never closed.
    Unbalanced(&'i str),
    Text,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Classify a (trimmed) line. Between one and six hashes are followed by
/// a name; a name may only be empty when an argument group follows
/// directly, otherwise `# text` would be taken as a directive.
pub fn scan(line: &str) -> Line<'_> {
    let hashes = line
        .chars()
        .take_while(|c| *c == '#')
        .count();

    if hashes == 0 || hashes > 6 {
        return Line::Text;
    }

    let rest = &line[hashes..];
    let name = rest
        .find(|c: char| !is_name_char(c))
        .unwrap_or(rest.len());

    if name == 0 && !rest.starts_with('{') {
        return Line::Text;
    }

    let command = &line[..hashes + name];
    let rest = rest[name..].trim_start();

    match take_all_groups(rest) {
        Groups::Matched { args, width } => Line::Directive(Directive {
            command,
            args,
            trailing: rest[width..].trim(),
        }),
        Groups::Unbalanced => Line::Unbalanced(command),
        Groups::Absent => Line::Text,
    }
}
