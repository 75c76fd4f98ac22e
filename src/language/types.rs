//! Types representing inline syntax trees and compiled gatemark documents

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::config::Labels;
use crate::parsing::Diagnostic;

// inline content

/// A node in the tree produced by the inline parser. Slices borrow from the
/// text that was parsed; the tree is built once and consumed by the
/// renderer.
#[derive(Eq, Debug, PartialEq)]
pub enum Inline<'i> {
    Text(&'i str),
    Bold(Vec<Inline<'i>>),
    Underline(Vec<Inline<'i>>),
    Colored {
        color: &'i str,
        content: Vec<Inline<'i>>,
    },
    Ruby {
        base: Vec<Inline<'i>>,
        annotation: Vec<Inline<'i>>,
    },
    Link {
        content: Vec<Inline<'i>>,
        url: &'i str,
    },
    Code {
        language: &'i str,
        code: &'i str,
    },
    Image {
        source: &'i str,
        alt: &'i str,
        width: &'i str,
        height: &'i str,
    },
    Math {
        display: bool,
        latex: &'i str,
    },
    LineBreak,
}

// lists

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

/// The marker families a list item can be written with. Each maps to a CSS
/// `list-style-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Disc,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
    Hiragana,
    Katakana,
    CjkIdeographic,
    JapaneseFormal,
}

impl ListStyle {
    /// Look up the style for a marker glyph, as in `@ii. item`.
    pub fn from_glyph(glyph: char) -> Option<ListStyle> {
        match glyph {
            '*' => Some(ListStyle::Disc),
            '1' => Some(ListStyle::Decimal),
            'i' => Some(ListStyle::LowerRoman),
            'I' => Some(ListStyle::UpperRoman),
            'a' => Some(ListStyle::LowerAlpha),
            'A' => Some(ListStyle::UpperAlpha),
            'あ' => Some(ListStyle::Hiragana),
            'ア' => Some(ListStyle::Katakana),
            '一' => Some(ListStyle::CjkIdeographic),
            '壱' => Some(ListStyle::JapaneseFormal),
            _ => None,
        }
    }

    pub fn kind(&self) -> ListKind {
        match self {
            ListStyle::Disc => ListKind::Unordered,
            _ => ListKind::Ordered,
        }
    }

    pub fn css(&self) -> &'static str {
        match self {
            ListStyle::Disc => "disc",
            ListStyle::Decimal => "decimal",
            ListStyle::LowerRoman => "lower-roman",
            ListStyle::UpperRoman => "upper-roman",
            ListStyle::LowerAlpha => "lower-alpha",
            ListStyle::UpperAlpha => "upper-alpha",
            ListStyle::Hiragana => "hiragana",
            ListStyle::Katakana => "katakana",
            ListStyle::CjkIdeographic => "cjk-ideographic",
            ListStyle::JapaneseFormal => "japanese-formal",
        }
    }
}

// gates

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    Problem,
    Wait,
}

impl GateKind {
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Problem => "problem",
            GateKind::Wait => "wait",
        }
    }

    pub fn parse(text: &str) -> Option<GateKind> {
        match text.trim() {
            "problem" | "pb" => Some(GateKind::Problem),
            "wait" | "wt" => Some(GateKind::Wait),
            _ => None,
        }
    }
}

/// Identifies a gate. Problems and waits are numbered independently,
/// starting at 1, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateRef {
    pub kind: GateKind,
    pub id: u32,
}

impl GateRef {
    pub fn problem(id: u32) -> GateRef {
        GateRef {
            kind: GateKind::Problem,
            id,
        }
    }

    pub fn wait(id: u32) -> GateRef {
        GateRef {
            kind: GateKind::Wait,
            id,
        }
    }

    /// The element id of the section revealed once this gate is solved.
    pub fn reveal_id(&self) -> String {
        format!("reveal-after-{}-{}", self.kind.name(), self.id)
    }

    pub fn input_id(&self) -> String {
        format!("{}-input-{}", self.kind.name(), self.id)
    }

    pub fn result_id(&self) -> String {
        format!("{}-result-{}", self.kind.name(), self.id)
    }
}

impl fmt::Display for GateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.name(), self.id)
    }
}

/// A problem or wait gate as compiled. The title and body are already
/// rendered to HTML; the accepted answers are held only in encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub reference: GateRef,
    pub title: String,
    pub body: String,
    pub accepted: Vec<String>,
    pub prefix: String,
    pub cooldown: Duration,
    pub nested: bool,
}

impl Gate {
    /// A wait gate with nothing to type in.
    pub fn is_open(&self) -> bool {
        self.accepted
            .is_empty()
    }
}

// visibility

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityMode {
    #[default]
    Hide,
    Show,
}

impl VisibilityMode {
    pub fn parse(text: &str) -> Option<VisibilityMode> {
        match text.trim() {
            "hide" => Some(VisibilityMode::Hide),
            "show" => Some(VisibilityMode::Show),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VisibilityMode::Hide => "hide",
            VisibilityMode::Show => "show",
        }
    }
}

/// Per-kind gating mode. A kind set to `Show` never blocks the content
/// after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VisibilityModes {
    pub problem: VisibilityMode,
    pub wait: VisibilityMode,
}

impl VisibilityModes {
    pub fn get(&self, kind: GateKind) -> VisibilityMode {
        match kind {
            GateKind::Problem => self.problem,
            GateKind::Wait => self.wait,
        }
    }

    pub fn set(&mut self, kind: GateKind, mode: VisibilityMode) {
        match kind {
            GateKind::Problem => self.problem = mode,
            GateKind::Wait => self.wait = mode,
        }
    }
}

// compiled documents

/// A top-level element of the compiled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Headings, paragraphs, lists, code, and inline diagnostics.
    Html(String),
    /// A gate's header and interactive container.
    Gate(GateRef),
    /// The content following a gate, up to the next gate or marker.
    Reveal {
        gate: GateRef,
        blocks: Vec<Block>,
    },
    Marker(VisibilityMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub gates: Vec<Gate>,
    pub total_problems: u32,
    pub visibility: VisibilityModes,
    pub answer_prefix: String,
    pub labels: Labels,
    pub diagnostics: Vec<Diagnostic>,
}

impl Document {
    pub fn gate(&self, reference: GateRef) -> Option<&Gate> {
        self.gates
            .iter()
            .find(|gate| gate.reference == reference)
    }

    pub fn problems(&self) -> impl Iterator<Item = &Gate> {
        self.gates
            .iter()
            .filter(|gate| gate.reference.kind == GateKind::Problem)
    }

    pub fn waits(&self) -> impl Iterator<Item = &Gate> {
        self.gates
            .iter()
            .filter(|gate| gate.reference.kind == GateKind::Wait)
    }

    /// Render the document as compiled, with every gate unsolved.
    pub fn html(&self) -> String {
        crate::rendering::render_document(self)
    }
}
