//! Line by line compilation of a gatemark document.
//!
//! Each line is classified in a fixed order of precedence: an open code
//! block swallows everything up to its closing marker; then list block
//! markers; blank lines; the start of a code block; directives; list
//! items; and finally ordinary paragraph text.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Config;
use crate::language::{
    Block, Document, Gate, GateKind, GateRef, ListStyle, VisibilityMode, VisibilityModes,
};
use crate::parsing::commands;
use crate::parsing::diagnostic::{Diagnostic, DiagnosticKind};
use crate::parsing::directive::{scan, Directive, Line};
use crate::parsing::inline::parse_inline;
use crate::parsing::list::ListStack;
use crate::rendering::{escape, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Counter {
    Explain,
    Example,
    Practice,
    Assign,
}

impl Counter {
    pub(crate) fn class(&self) -> &'static str {
        match self {
            Counter::Explain => "explain",
            Counter::Example => "example",
            Counter::Practice => "practice",
            Counter::Assign => "assign",
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    explain: u32,
    example: u32,
    practice: u32,
    assign: u32,
}

struct Capture<'i> {
    language: String,
    lines: Vec<&'i str>,
    start: usize,
}

/// Everything carried from one line to the next during a single compile.
pub(crate) struct Compiler<'c, 'i> {
    config: &'c Config,
    blocks: Vec<Block>,
    reveal: Option<(GateRef, Vec<Block>)>,
    paragraph: Vec<&'i str>,
    lists: ListStack,
    explicit_list: bool,
    code: Option<Capture<'i>>,
    counters: Counters,
    problems: u32,
    waits: u32,
    gates: Vec<Gate>,
    prefix: String,
    image_base: String,
    visibility: VisibilityModes,
    cooldown: Duration,
    diagnostics: Vec<Diagnostic>,
    line: usize,
}

impl<'c, 'i> Compiler<'c, 'i> {
    pub(crate) fn new(config: &'c Config) -> Compiler<'c, 'i> {
        Compiler {
            config,
            blocks: Vec::new(),
            reveal: None,
            paragraph: Vec::new(),
            lists: ListStack::new(),
            explicit_list: false,
            code: None,
            counters: Counters::default(),
            problems: 0,
            waits: 0,
            gates: Vec::new(),
            prefix: config
                .defaults
                .answer_prefix
                .clone(),
            image_base: String::new(),
            visibility: VisibilityModes::default(),
            cooldown: Duration::from_millis(
                config
                    .defaults
                    .cooldown_ms,
            ),
            diagnostics: Vec::new(),
            line: 0,
        }
    }

    pub(crate) fn compile(mut self, content: &'i str) -> Document {
        for (number, line) in content
            .lines()
            .enumerate()
        {
            self.line = number;
            self.process(line);
        }
        self.finish()
    }

    fn process(&mut self, line: &'i str) {
        if let Some(capture) = &mut self.code {
            if line.trim_end() == "#ed{code}" {
                self.close_code();
            } else {
                capture
                    .lines
                    .push(line);
            }
            return;
        }

        let trimmed = line.trim();

        if trimmed.is_empty() {
            self.flush_paragraph();
            if !self.explicit_list {
                self.close_lists();
            }
            return;
        }

        match scan(trimmed) {
            Line::Directive(directive) => self.directive(directive, trimmed),
            Line::Unbalanced(command) => {
                self.report(DiagnosticKind::UnbalancedBraces(command.to_string()));
            }
            Line::Text => self.text(trimmed),
        }
    }

    fn directive(&mut self, directive: Directive, trimmed: &str) {
        let kind = directive
            .arg(0)
            .trim();

        match (directive.command, kind) {
            ("#bg", "list") => {
                self.flush_paragraph();
                self.close_lists();
                self.explicit_list = true;
                return;
            }
            ("#ed", "list") if self.explicit_list => {
                self.flush_paragraph();
                self.close_lists();
                self.explicit_list = false;
                return;
            }
            ("#bg", "code") => {
                self.flush_paragraph();
                self.close_lists();
                let language = match directive
                    .arg(1)
                    .trim()
                {
                    "" => "plaintext".to_string(),
                    language => language.to_lowercase(),
                };
                self.code = Some(Capture {
                    language,
                    lines: Vec::new(),
                    start: self.line,
                });
                return;
            }
            _ => {}
        }

        self.flush_paragraph();
        if !self.explicit_list {
            self.close_lists();
        }

        if !directive
            .trailing
            .is_empty()
        {
            debug!("Ignoring text after arguments to {}", directive.command);
        }

        match commands::lookup(directive.command) {
            Some(command) => {
                if directive
                    .args
                    .len()
                    < command.arguments
                {
                    self.report(DiagnosticKind::MissingArguments {
                        command: directive
                            .command
                            .to_string(),
                        usage: command.usage,
                    });
                } else {
                    (command.handler)(self, &directive);
                }
            }
            None => self.report(DiagnosticKind::UndefinedCommand(trimmed.to_string())),
        }
    }

    fn text(&mut self, trimmed: &'i str) {
        let list = crate::pattern!(
            r"^@(\*{1,5}|1{1,5}|i{1,5}|I{1,5}|a{1,5}|A{1,5}|あ{1,5}|ア{1,5}|一{1,5}|壱{1,5})\.\s+(.*)$"
        );

        if let Some(captures) = list.captures(trimmed) {
            let marker = &captures[1];
            let content = &captures[2];

            let style = marker
                .chars()
                .next()
                .and_then(ListStyle::from_glyph);

            if let Some(style) = style {
                let level = marker
                    .chars()
                    .count();
                let html = self.inline(content.trim());

                self.flush_paragraph();
                self.lists
                    .item(style, level, &html);
                return;
            }
        }

        if self.explicit_list && self.lists.is_open() {
            let html = self.inline(trimmed);
            self.lists
                .continue_item(&html);
            return;
        }

        self.close_lists();
        self.paragraph
            .push(trimmed);
    }

    fn flush_paragraph(&mut self) {
        if self
            .paragraph
            .is_empty()
        {
            return;
        }

        let text = self
            .paragraph
            .join("\n");
        self.paragraph
            .clear();

        let html = format!("<p>{}</p>", self.inline(&text));
        self.push(Block::Html(html));
    }

    fn close_lists(&mut self) {
        if let Some(html) = self
            .lists
            .drain()
        {
            self.push(Block::Html(html));
        }
    }

    fn close_code(&mut self) {
        if let Some(capture) = self
            .code
            .take()
        {
            let mut lines = capture
                .lines
                .as_slice();
            while let Some((first, rest)) = lines.split_first() {
                if !first
                    .trim()
                    .is_empty()
                {
                    break;
                }
                lines = rest;
            }
            let code = lines.join("\n");

            self.push(Block::Html(format!(
                r#"<div class="code-block-wrapper"><pre class="line-numbers"><code class="language-{}">{}</code></pre></div>"#,
                escape(&capture.language),
                escape(code.trim_end())
            )));
        }
    }

    fn close_reveal(&mut self) {
        if let Some((gate, blocks)) = self
            .reveal
            .take()
        {
            self.blocks
                .push(Block::Reveal { gate, blocks });
        }
    }

    fn push(&mut self, block: Block) {
        match &mut self.reveal {
            Some((_, blocks)) => blocks.push(block),
            None => self
                .blocks
                .push(block),
        }
    }

    fn finish(mut self) -> Document {
        if let Some(start) = self
            .code
            .as_ref()
            .map(|capture| capture.start)
        {
            let line = self.line;
            self.line = start;
            self.report(DiagnosticKind::UnterminatedCodeBlock);
            self.line = line;
            self.close_code();
        }

        self.flush_paragraph();
        self.close_lists();
        self.close_reveal();

        debug!(
            "Compiled {} problem{} and {} wait gate{}",
            self.problems,
            if self.problems == 1 { "" } else { "s" },
            self.waits,
            if self.waits == 1 { "" } else { "s" }
        );

        Document {
            blocks: self.blocks,
            gates: self.gates,
            total_problems: self.problems,
            visibility: self.visibility,
            answer_prefix: self.prefix,
            labels: self
                .config
                .labels
                .clone(),
            diagnostics: self.diagnostics,
        }
    }

    // operations used by the command handlers

    /// Parse and render inline content with the current image directory.
    pub(crate) fn inline(&self, text: &str) -> String {
        Renderer::new(&self.image_base).render(&parse_inline(text))
    }

    /// Write a fragment of HTML. Inside an explicit list block with an item
    /// open, the fragment becomes part of that item.
    pub(crate) fn emit(&mut self, html: String) {
        if self
            .lists
            .is_open()
        {
            self.lists
                .append(&html);
        } else {
            self.push(Block::Html(html));
        }
    }

    pub(crate) fn report(&mut self, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(self.line, kind);
        warn!("{}", diagnostic);

        if let Some(html) = diagnostic.html() {
            self.emit(html);
        }
        self.diagnostics
            .push(diagnostic);
    }

    pub(crate) fn next_counter(&mut self, counter: Counter) -> u32 {
        let slot = match counter {
            Counter::Explain => &mut self
                .counters
                .explain,
            Counter::Example => &mut self
                .counters
                .example,
            Counter::Practice => &mut self
                .counters
                .practice,
            Counter::Assign => &mut self
                .counters
                .assign,
        };
        *slot += 1;
        *slot
    }

    pub(crate) fn counter_label(&self, counter: Counter) -> String {
        let labels = &self
            .config
            .labels;
        let label = match counter {
            Counter::Explain => &labels.explain,
            Counter::Example => &labels.example,
            Counter::Practice => &labels.practice,
            Counter::Assign => &labels.assign,
        };
        escape(label)
    }

    /// Allocate the next id for a gate of the given kind. Problems and sub
    /// problems share one sequence.
    pub(crate) fn next_gate(&mut self, kind: GateKind) -> u32 {
        match kind {
            GateKind::Problem => {
                self.problems += 1;
                self.problems
            }
            GateKind::Wait => {
                self.waits += 1;
                self.waits
            }
        }
    }

    /// Place a gate. The content that follows, up to the next gate or
    /// visibility marker, becomes the section it reveals.
    pub(crate) fn open_gate(&mut self, gate: Gate) {
        self.close_lists();
        self.close_reveal();

        let reference = gate.reference;
        self.blocks
            .push(Block::Gate(reference));
        self.gates
            .push(gate);
        self.reveal = Some((reference, Vec::new()));
    }

    pub(crate) fn marker(&mut self, mode: VisibilityMode) {
        self.close_lists();
        self.close_reveal();
        self.blocks
            .push(Block::Marker(mode));
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    /// An empty prefix restores the configured default.
    pub(crate) fn set_prefix(&mut self, prefix: &str) {
        self.prefix = if prefix.is_empty() {
            self.config
                .defaults
                .answer_prefix
                .clone()
        } else {
            prefix.to_string()
        };
    }

    pub(crate) fn set_image_base(&mut self, path: &str) {
        self.image_base = path.to_string();
    }

    pub(crate) fn set_visibility(&mut self, kind: GateKind, mode: VisibilityMode) {
        self.visibility
            .set(kind, mode);
    }

    pub(crate) fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub(crate) fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn compile(content: &str) -> Document {
        Compiler::new(&Config::default()).compile(content)
    }

    fn html(content: &str) -> String {
        compile(content).html()
    }

    #[test]
    fn paragraphs_join_lines_with_breaks() {
        assert_eq!(html("one\ntwo\n\nthree"), "<p>one<br>two</p>\n<p>three</p>");
    }

    #[test]
    fn inline_directives_span_lines_of_a_paragraph() {
        assert_eq!(html("@bf{one\ntwo}"), "<p><strong>one<br>two</strong></p>");
    }

    #[test]
    fn headings() {
        assert_eq!(
            html("#{Top}\n##{Second}\n######{Sixth}"),
            "<h1>Top</h1>\n<h2 class=\"generic-h2\">Second</h2>\n<h6 class=\"generic-h6\">Sixth</h6>"
        );
    }

    #[test]
    fn counters_number_per_kind() {
        assert_eq!(
            html("#ex{A}\n#eg{B}\n#ex{C}"),
            "<h2 class=\"explain\">Explanation 1: A</h2>\n<h2 class=\"example\">Example 1: B</h2>\n<h2 class=\"explain\">Explanation 2: C</h2>"
        );
    }

    #[test]
    fn equation_directive_renders_as_math() {
        assert_eq!(
            html("area @eq{\\pi r^2} here"),
            "<p>area \\(\\pi r^2\\) here</p>"
        );
    }

    #[test]
    fn comments_produce_nothing() {
        assert_eq!(html("#cm{hidden}"), "");
    }

    #[test]
    fn list_then_paragraph() {
        assert_eq!(
            html("@*. A\n@**. B\n@*. C\nafter"),
            "<ul><li>A<ul><li>B</li></ul></li><li>C</li></ul>\n<p>after</p>"
        );
    }

    #[test]
    fn ordered_glyphs() {
        assert_eq!(
            html("@1. one\n@11. nested\n@ii. roman"),
            r#"<ol><li>one<ol><li>nested</li></ol><ol style="list-style-type: lower-roman;"><li>roman</li></ol></li></ol>"#
        );
    }

    #[test]
    fn list_block_continues_items() {
        assert_eq!(
            html("#bg{list}\n@*. first\ncontinued\n\n@*. second\n#ed{list}"),
            "<ul><li>first<br>continued</li><li>second</li></ul>"
        );
    }

    #[test]
    fn code_block_is_verbatim() {
        assert_eq!(
            html("#bg{code}{Rust}\n\nfn main() {\n    @bf{x} < 1;\n}\n#ed{code}"),
            "<div class=\"code-block-wrapper\"><pre class=\"line-numbers\"><code class=\"language-rust\">fn main() {\n    @bf{x} &lt; 1;\n}</code></pre></div>"
        );
    }

    #[test]
    fn unterminated_code_block_is_flushed() {
        let document = compile("#bg{code}{c}\nint x;");

        assert_eq!(
            document.diagnostics,
            vec![Diagnostic::new(0, DiagnosticKind::UnterminatedCodeBlock)]
        );
        assert!(document
            .html()
            .contains("int x;"));
    }

    #[test]
    fn gates_are_numbered_in_order() {
        let document = compile(
            "#pb{A}{a?}{1}\n##pb{B}{b?}{2}\n#wt{W}{wait}\n#pb{C}{c?}{3}\n#wt{V}{v}{pw}",
        );

        let ids: Vec<GateRef> = document
            .gates
            .iter()
            .map(|gate| gate.reference)
            .collect();
        assert_eq!(
            ids,
            vec![
                GateRef::problem(1),
                GateRef::problem(2),
                GateRef::wait(1),
                GateRef::problem(3),
                GateRef::wait(2)
            ]
        );
        assert_eq!(document.total_problems, 3);
        assert!(document.gates[1].nested);
        assert!(document.gates[2].is_open());
        assert!(!document.gates[4].is_open());
    }

    #[test]
    fn content_after_a_gate_is_its_reveal_section() {
        let document = compile("intro\n#pb{T}{S}{a}\nafter\n#wt{W}{B}\nend");

        assert_eq!(
            document.blocks,
            vec![
                Block::Html("<p>intro</p>".to_string()),
                Block::Gate(GateRef::problem(1)),
                Block::Reveal {
                    gate: GateRef::problem(1),
                    blocks: vec![Block::Html("<p>after</p>".to_string())]
                },
                Block::Gate(GateRef::wait(1)),
                Block::Reveal {
                    gate: GateRef::wait(1),
                    blocks: vec![Block::Html("<p>end</p>".to_string())]
                },
            ]
        );
    }

    #[test]
    fn marker_ends_the_reveal_section() {
        let document = compile("#pb{T}{S}{a}\n#ST{show}\nfree");

        assert_eq!(
            document.blocks,
            vec![
                Block::Gate(GateRef::problem(1)),
                Block::Reveal {
                    gate: GateRef::problem(1),
                    blocks: vec![]
                },
                Block::Marker(VisibilityMode::Show),
                Block::Html("<p>free</p>".to_string()),
            ]
        );
    }

    #[test]
    fn answers_are_encoded_with_the_prefix_in_effect() {
        use crate::encoding::{Codec, Prefixed};

        let document = compile("#pb{A}{?}{ x , y }\n#MP{other::}\n#pb{B}{?}{z}\n#MP{}\n#pb{C}{?}{w}");

        let first = &document.gates[0];
        assert_eq!(first.accepted.len(), 2);
        assert_eq!(
            Prefixed::new("rny_answer::").decode(&first.accepted[1]),
            Some("y".to_string())
        );
        assert_eq!(first.accepted[0], Prefixed::new("rny_answer::").encode("x"));

        let second = &document.gates[1];
        assert_eq!(second.prefix, "other::");
        assert_eq!(second.accepted[0], Prefixed::new("other::").encode("z"));

        assert_eq!(document.gates[2].prefix, "rny_answer::");
        assert_eq!(document.answer_prefix, "rny_answer::");
    }

    #[test]
    fn visibility_and_cooldown_settings() {
        let document = compile("#ST{wait}{show}\n#CT{2500}\n#pb{A}{?}{a}\n#CT{soon}");

        assert_eq!(document.visibility.wait, VisibilityMode::Show);
        assert_eq!(document.visibility.problem, VisibilityMode::Hide);
        assert_eq!(document.gates[0].cooldown, Duration::from_millis(2500));
        assert_eq!(
            document.diagnostics,
            vec![Diagnostic::new(3, DiagnosticKind::InvalidCooldown("soon".to_string()))]
        );
    }

    #[test]
    fn missing_arguments_are_reported_in_place() {
        let document = compile("#pb{only title}");

        assert_eq!(document.total_problems, 0);
        assert_eq!(
            document.html(),
            r#"<p class="directive-error" style="color:red;">#pb error: missing arguments (title, statement, answers)</p>"#
        );
    }

    #[test]
    fn undefined_and_unbalanced() {
        let document = compile("#zz{x}\n#ex{broken\nfine");

        assert_eq!(
            document.html(),
            "<p class=\"directive-warning\" style=\"color:orange;\">Undefined command: #zz{x}</p>\n<p>fine</p>"
        );
        assert_eq!(
            document.diagnostics,
            vec![
                Diagnostic::new(0, DiagnosticKind::UndefinedCommand("#zz{x}".to_string())),
                Diagnostic::new(1, DiagnosticKind::UnbalancedBraces("#ex".to_string())),
            ]
        );
    }

    #[test]
    fn image_directory_applies_to_later_images() {
        assert_eq!(
            html("@im{a.png}{a}{1}{1}\n\n#SC{img}\n@im{b.png}{b}{1}{1}"),
            "<p><img src=\"a.png\" alt=\"a\" width=\"1\" height=\"1\"></p>\n<p><img src=\"img/b.png\" alt=\"b\" width=\"1\" height=\"1\"></p>"
        );
    }
}
