//! Recursive descent parser for inline directives (`@bf{...}` and friends)
//! and math spans.
//!
//! Parsing never fails. Anything that doesn't form a complete directive is
//! kept as literal text, one character at a time at the point where the
//! attempt was made.

use crate::language::Inline;
use crate::parsing::groups::{take_groups, Groups};

/// Parse text into a sequence of inline nodes.
pub fn parse_inline(content: &str) -> Vec<Inline<'_>> {
    let mut parser = Parser::new(content);
    parser.read_inlines()
}

type Build = for<'i> fn(&[&'i str]) -> Inline<'i>;

struct Directive {
    prefix: &'static str,
    arity: usize,
    build: Build,
}

// Tried in this order at every '@'.
static DIRECTIVES: &[Directive] = &[
    Directive {
        prefix: "@br",
        arity: 0,
        build: build_break,
    },
    Directive {
        prefix: "@bf",
        arity: 1,
        build: build_bold,
    },
    Directive {
        prefix: "@ul",
        arity: 1,
        build: build_underline,
    },
    Directive {
        prefix: "@cl",
        arity: 2,
        build: build_colored,
    },
    Directive {
        prefix: "@rb",
        arity: 2,
        build: build_ruby,
    },
    Directive {
        prefix: "@rf",
        arity: 2,
        build: build_link,
    },
    Directive {
        prefix: "@cd",
        arity: 2,
        build: build_code,
    },
    Directive {
        prefix: "@im",
        arity: 4,
        build: build_image,
    },
    Directive {
        prefix: "@eq",
        arity: 1,
        build: build_equation,
    },
];

fn build_break<'i>(_: &[&'i str]) -> Inline<'i> {
    Inline::LineBreak
}

fn build_bold<'i>(args: &[&'i str]) -> Inline<'i> {
    Inline::Bold(parse_inline(args[0]))
}

fn build_underline<'i>(args: &[&'i str]) -> Inline<'i> {
    Inline::Underline(parse_inline(args[0]))
}

fn build_colored<'i>(args: &[&'i str]) -> Inline<'i> {
    Inline::Colored {
        color: args[0],
        content: parse_inline(args[1]),
    }
}

fn build_ruby<'i>(args: &[&'i str]) -> Inline<'i> {
    Inline::Ruby {
        base: parse_inline(args[0]),
        annotation: parse_inline(args[1]),
    }
}

fn build_link<'i>(args: &[&'i str]) -> Inline<'i> {
    Inline::Link {
        content: parse_inline(args[0]),
        url: args[1],
    }
}

fn build_code<'i>(args: &[&'i str]) -> Inline<'i> {
    Inline::Code {
        language: args[0],
        code: args[1],
    }
}

fn build_image<'i>(args: &[&'i str]) -> Inline<'i> {
    Inline::Image {
        source: args[0],
        alt: args[1],
        width: args[2],
        height: args[3],
    }
}

// same as `$...$`; the argument is LaTeX, not parsed further
fn build_equation<'i>(args: &[&'i str]) -> Inline<'i> {
    Inline::Math {
        display: false,
        latex: args[0],
    }
}

/// Result of trying to read a construct at the current position.
#[derive(Debug, PartialEq, Eq)]
enum Attempt<'i> {
    Parsed(Inline<'i>, usize),
    Literal,
}

#[derive(Debug)]
struct Parser<'i> {
    source: &'i str,
    offset: usize,
}

impl<'i> Parser<'i> {
    fn new(content: &'i str) -> Parser<'i> {
        Parser {
            source: content,
            offset: 0,
        }
    }

    fn advance(&mut self, width: usize) {
        self.source = &self.source[width..];
        self.offset += width;
    }

    fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    fn peek_next_char(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    fn read_inlines(&mut self) -> Vec<Inline<'i>> {
        let mut nodes = Vec::new();

        while !self.is_finished() {
            let attempt = match self.peek_next_char() {
                Some('@') => self.read_directive(),
                Some('$') => self.read_math(),
                _ => {
                    nodes.push(self.take_text());
                    continue;
                }
            };

            match attempt {
                Attempt::Parsed(node, width) => {
                    nodes.push(node);
                    self.advance(width);
                }
                Attempt::Literal => {
                    // the trigger characters are ASCII, so one byte
                    nodes.push(Inline::Text(&self.source[..1]));
                    self.advance(1);
                }
            }
        }

        nodes
    }

    /// Consume up to but not including the next '@' or '$' (or the end).
    fn take_text(&mut self) -> Inline<'i> {
        let content = self.source;
        let end = content
            .find(['@', '$'])
            .unwrap_or(content.len());

        let text = &content[..end];
        self.advance(end);
        Inline::Text(text)
    }

    fn read_directive(&self) -> Attempt<'i> {
        let content = self.source;

        for directive in DIRECTIVES {
            let rest = match content.strip_prefix(directive.prefix) {
                Some(rest) => rest,
                None => continue,
            };

            if directive.arity == 0 {
                return Attempt::Parsed((directive.build)(&[]), directive.prefix.len());
            }

            match take_groups(rest, directive.arity) {
                Groups::Matched { args, width } => {
                    let node = (directive.build)(&args);
                    return Attempt::Parsed(node, directive.prefix.len() + width);
                }
                Groups::Absent | Groups::Unbalanced => return Attempt::Literal,
            }
        }

        Attempt::Literal
    }

    /// Display math is `$$...$$`, inline math is `$...$` with at least one
    /// character between the dollar signs.
    fn read_math(&self) -> Attempt<'i> {
        let content = self.source;

        if let Some(rest) = content.strip_prefix("$$") {
            if let Some(end) = rest.find("$$") {
                let latex = &rest[..end];
                return Attempt::Parsed(
                    Inline::Math {
                        display: true,
                        latex,
                    },
                    end + 4,
                );
            }
        }

        let rest = &content[1..];
        match rest.find('$') {
            Some(end) if end > 0 => Attempt::Parsed(
                Inline::Math {
                    display: false,
                    latex: &rest[..end],
                },
                end + 2,
            ),
            _ => Attempt::Literal,
        }
    }
}
