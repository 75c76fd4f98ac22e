//! Extraction of brace delimited argument groups, as in `{one}{two}`.
//!
//! Braces nest; a group ends when the depth, which starts at 1 after the
//! opening brace, returns to 0. Successive groups must be immediately
//! adjacent.

#[derive(Debug, PartialEq, Eq)]
pub enum Group<'i> {
    /// The content between the braces and the width consumed, including
    /// both braces.
    Found(&'i str, usize),
    /// The input did not start with an opening brace.
    Absent,
    /// An opening brace was never closed.
    Unbalanced,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Groups<'i> {
    Matched { args: Vec<&'i str>, width: usize },
    Absent,
    Unbalanced,
}

/// Read one group from the start of the input.
pub fn take_group(source: &str) -> Group<'_> {
    if !source.starts_with('{') {
        return Group::Absent;
    }

    let mut depth = 1;

    for (i, c) in source
        .char_indices()
        .skip(1)
    {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Group::Found(&source[1..i], i + 1);
                }
            }
            _ => {}
        }
    }

    Group::Unbalanced
}

/// Read exactly `count` adjacent groups.
pub fn take_groups(source: &str, count: usize) -> Groups<'_> {
    let mut args = Vec::with_capacity(count);
    let mut width = 0;

    for _ in 0..count {
        match take_group(&source[width..]) {
            Group::Found(arg, consumed) => {
                args.push(arg);
                width += consumed;
            }
            Group::Absent => return Groups::Absent,
            Group::Unbalanced => return Groups::Unbalanced,
        }
    }

    Groups::Matched { args, width }
}

/// Read as many adjacent groups as are present. Reading stops at the first
/// character that doesn't open a group; an unclosed group spoils the whole
/// read.
pub fn take_all_groups(source: &str) -> Groups<'_> {
    let mut args = Vec::new();
    let mut width = 0;

    loop {
        match take_group(&source[width..]) {
            Group::Found(arg, consumed) => {
                args.push(arg);
                width += consumed;
            }
            Group::Absent => break,
            Group::Unbalanced => return Groups::Unbalanced,
        }
    }

    Groups::Matched { args, width }
}
