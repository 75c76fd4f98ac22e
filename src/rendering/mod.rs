//! Output of compiled documents as HTML

mod gates;
mod html;

pub use gates::{render_gate, GateState};
pub use html::{escape, render, Renderer};

use crate::language::{Block, Document, GateRef};

/// Supplies the interactive state a document is drawn in. The compiled
/// document on its own has every gate unsolved and every block present;
/// a learner's saved progress disables solved gates and leaves out
/// whatever isn't visible yet.
pub trait Presenter {
    fn state(&self, gate: GateRef) -> GateState;

    fn revealed(&self, gate: GateRef) -> bool;

    fn skip_locked(&self) -> bool {
        false
    }

    /// Whether the top-level block at this position is written out.
    fn visible(&self, _index: usize) -> bool {
        true
    }
}

/// Every gate as compiled, nothing solved.
pub struct Compiled;

impl Presenter for Compiled {
    fn state(&self, _: GateRef) -> GateState {
        GateState::default()
    }

    fn revealed(&self, _: GateRef) -> bool {
        false
    }
}

/// Render the document as compiled.
pub fn render_document(document: &Document) -> String {
    render_blocks(document, &Compiled)
}

pub fn render_blocks(document: &Document, presenter: &impl Presenter) -> String {
    let mut output = Vec::new();

    for (index, block) in document
        .blocks
        .iter()
        .enumerate()
    {
        if !presenter.visible(index) {
            continue;
        }
        output.push(render_block(document, presenter, block));
    }

    output.join("\n")
}

fn render_block(document: &Document, presenter: &impl Presenter, block: &Block) -> String {
    match block {
        Block::Html(html) => html.clone(),
        Block::Gate(reference) => match document.gate(*reference) {
            Some(gate) => render_gate(
                gate,
                &document.labels,
                &presenter.state(*reference),
                presenter.skip_locked(),
            ),
            None => String::new(),
        },
        Block::Reveal { gate, blocks } => {
            let class = if presenter.revealed(*gate) {
                "revealable-section revealed"
            } else {
                "revealable-section"
            };
            let inner: Vec<String> = blocks
                .iter()
                .map(|block| render_block(document, presenter, block))
                .collect();

            if inner.is_empty() {
                format!(r#"<div id="{}" class="{}"></div>"#, gate.reveal_id(), class)
            } else {
                format!(
                    "<div id=\"{}\" class=\"{}\">\n{}\n</div>",
                    gate.reveal_id(),
                    class,
                    inner.join("\n")
                )
            }
        }
        Block::Marker(mode) => format!(
            r#"<div class="visibility-marker" data-mode="{}" hidden></div>"#,
            mode.name()
        ),
    }
}
