//! Markup for problem and wait gates: a heading followed by a container
//! holding the statement and the controls.

use crate::config::Labels;
use crate::language::{Gate, GateKind};
use crate::rendering::escape;

/// The interactive state a gate is drawn in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateState {
    pub solved: bool,
    pub input: String,
    pub result_text: String,
    pub result_class: String,
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}

fn value(input: &str) -> String {
    if input.is_empty() {
        String::new()
    } else {
        format!(r#" value="{}""#, escape(input))
    }
}

fn result_class(base: &str, state: &GateState) -> String {
    if state
        .result_class
        .is_empty()
    {
        base.to_string()
    } else {
        format!("{} {}", base, escape(&state.result_class))
    }
}

pub fn render_gate(gate: &Gate, labels: &Labels, state: &GateState, skip_locked: bool) -> String {
    match gate
        .reference
        .kind
    {
        GateKind::Problem => problem(gate, labels, state, skip_locked),
        GateKind::Wait => wait(gate, labels, state),
    }
}

fn problem(gate: &Gate, labels: &Labels, state: &GateState, skip_locked: bool) -> String {
    let id = gate
        .reference
        .id;
    let input = gate
        .reference
        .input_id();

    let header = if gate.nested {
        format!(
            r#"<h3 class="problem sub-problem" data-problem-id="{}"><span class="sub-problem-marker">└</span>{} {}: {}</h3>"#,
            id,
            escape(&labels.problem),
            id,
            gate.title
        )
    } else {
        format!(
            r#"<h2 class="problem" data-problem-id="{}">{} {}: {}</h2>"#,
            id,
            escape(&labels.problem),
            id,
            gate.title
        )
    };

    let mut container = String::new();
    container.push_str(&format!(
        r#"<div class="problem-container" data-problem-block-id="{}">"#,
        id
    ));
    container.push_str(&format!(
        r#"<div class="problem-statement">{}</div>"#,
        gate.body
    ));
    container.push_str(r#"<div class="problem-interactive">"#);
    container.push_str(&format!(
        r#"<label for="{}">{}: </label>"#,
        input,
        escape(&labels.answer)
    ));
    container.push_str(&format!(
        r#"<input type="text" id="{}" name="{}"{}{}>"#,
        input,
        input,
        value(&state.input),
        disabled(state.solved)
    ));
    container.push_str(&format!(
        r#"<button class="check-button" data-problem-id="{}" data-answers="{}"{}>{}</button>"#,
        id,
        escape(
            &gate
                .accepted
                .join(",")
        ),
        disabled(state.solved),
        escape(&labels.check)
    ));
    container.push_str(&format!(
        r#"<button class="skip-button" data-problem-id="{}" data-cooldown="{}"{}>{}</button>"#,
        id,
        gate.cooldown
            .as_millis(),
        disabled(state.solved || skip_locked),
        escape(&labels.skip)
    ));
    container.push_str(&format!(
        r#"<span id="{}" class="{}">{}</span>"#,
        gate.reference
            .result_id(),
        result_class("problem-result", state),
        escape(&state.result_text)
    ));
    container.push_str("</div></div>");

    format!("{}\n{}", header, container)
}

fn wait(gate: &Gate, labels: &Labels, state: &GateState) -> String {
    let id = gate
        .reference
        .id;
    let input = gate
        .reference
        .input_id();

    let header = format!(
        r#"<h2 class="wait-gate-title" data-wait-id="{}">{}</h2>"#,
        id, gate.title
    );

    let mut container = String::new();
    container.push_str(&format!(
        r#"<div class="wait-gate-container" data-wait-block-id="{}">"#,
        id
    ));
    container.push_str(&format!(
        r#"<div class="wait-gate-body">{}</div>"#,
        gate.body
    ));
    container.push_str(r#"<div class="wait-gate-interactive">"#);

    if gate.is_open() {
        container.push_str(&format!(
            r#"<button class="unlock-button" data-wait-id="{}" data-password=""{}>{}</button>"#,
            id,
            disabled(state.solved),
            escape(&labels.proceed)
        ));
    } else {
        container.push_str(&format!(
            r#"<label for="{}">{}: </label>"#,
            input,
            escape(&labels.password)
        ));
        container.push_str(&format!(
            r#"<input type="text" id="{}" name="{}"{}{}>"#,
            input,
            input,
            value(&state.input),
            disabled(state.solved)
        ));
        container.push_str(&format!(
            r#"<button class="unlock-button" data-wait-id="{}" data-password="{}"{}>{}</button>"#,
            id,
            escape(
                &gate
                    .accepted
                    .join(",")
            ),
            disabled(state.solved),
            escape(&labels.unlock)
        ));
    }

    container.push_str(&format!(
        r#"<span id="{}" class="{}">{}</span>"#,
        gate.reference
            .result_id(),
        result_class("wait-gate-result", state),
        escape(&state.result_text)
    ));
    container.push_str("</div></div>");

    format!("{}\n{}", header, container)
}
