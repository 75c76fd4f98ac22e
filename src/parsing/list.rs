//! Nesting of list items across lines.
//!
//! Each open frame is a `<ul>` or `<ol>` at some level with exactly one
//! `<li>` open inside it. The item stays open so that a deeper list can be
//! nested within it; it is closed by the next sibling, by its frame being
//! popped, or when the whole stack is drained.

use crate::language::ListStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    style: ListStyle,
    level: usize,
}

#[derive(Debug, Default)]
pub(crate) struct ListStack {
    frames: Vec<Frame>,
    output: String,
}

fn open_tag(style: ListStyle) -> String {
    match style {
        ListStyle::Disc => "<ul>".to_string(),
        ListStyle::Decimal => "<ol>".to_string(),
        _ => format!(r#"<ol style="list-style-type: {};">"#, style.css()),
    }
}

impl ListStack {
    pub(crate) fn new() -> ListStack {
        ListStack::default()
    }

    pub(crate) fn is_open(&self) -> bool {
        !self
            .frames
            .is_empty()
    }

    fn top(&self) -> Option<&Frame> {
        self.frames
            .last()
    }

    fn pop(&mut self) {
        if let Some(frame) = self
            .frames
            .pop()
        {
            self.output
                .push_str("</li>");
            self.output
                .push_str(&format!(
                    "</{}>",
                    frame
                        .style
                        .kind()
                        .tag()
                ));
        }
    }

    fn close_deeper_than(&mut self, level: usize) {
        while let Some(frame) = self.top() {
            if frame.level <= level {
                break;
            }
            self.pop();
        }
    }

    /// Add an item, already rendered to HTML, at the given level (1 being
    /// the outermost).
    pub(crate) fn item(&mut self, style: ListStyle, level: usize, html: &str) {
        self.close_deeper_than(level);

        if let Some(frame) = self.top() {
            if frame.level == level {
                if frame.style == style {
                    self.output
                        .push_str("</li><li>");
                    self.output
                        .push_str(html);
                    return;
                }
                self.pop();
            }
        }

        let base = self
            .top()
            .map(|frame| frame.level)
            .unwrap_or(0);

        for depth in (base + 1)..=level {
            self.output
                .push_str(&open_tag(style));
            self.frames
                .push(Frame {
                    style,
                    level: depth,
                });
            if depth < level {
                self.output
                    .push_str(r#"<li style="list-style-type: none;">"#);
            } else {
                self.output
                    .push_str("<li>");
                self.output
                    .push_str(html);
            }
        }
    }

    /// Append further content to the currently open item.
    pub(crate) fn continue_item(&mut self, html: &str) {
        if self.is_open() {
            self.output
                .push_str("<br>");
            self.output
                .push_str(html);
        }
    }

    /// Place markup inside the currently open item as it is.
    pub(crate) fn append(&mut self, html: &str) {
        if self.is_open() {
            self.output
                .push_str(html);
        }
    }

    /// Close every open frame and hand back the accumulated markup, if any
    /// list was written.
    pub(crate) fn drain(&mut self) -> Option<String> {
        while self.is_open() {
            self.pop();
        }

        if self
            .output
            .is_empty()
        {
            None
        } else {
            Some(std::mem::take(&mut self.output))
        }
    }
}
