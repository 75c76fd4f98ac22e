//! The table of block level directives and the handlers that implement
//! them.

use std::time::Duration;

use tracing::debug;

use crate::encoding::{encode_list, Prefixed};
use crate::language::{Gate, GateKind, GateRef, VisibilityMode};
use crate::parsing::compiler::{Compiler, Counter};
use crate::parsing::diagnostic::DiagnosticKind;
use crate::parsing::directive::Directive;

pub(crate) struct Command {
    pub name: &'static str,
    /// Minimum number of argument groups.
    pub arguments: usize,
    pub usage: &'static str,
    pub handler: fn(&mut Compiler, &Directive),
}

static COMMANDS: &[Command] = &[
    Command {
        name: "#",
        arguments: 0,
        usage: "title",
        handler: heading,
    },
    Command {
        name: "##",
        arguments: 0,
        usage: "title",
        handler: heading,
    },
    Command {
        name: "###",
        arguments: 0,
        usage: "title",
        handler: heading,
    },
    Command {
        name: "####",
        arguments: 0,
        usage: "title",
        handler: heading,
    },
    Command {
        name: "#####",
        arguments: 0,
        usage: "title",
        handler: heading,
    },
    Command {
        name: "######",
        arguments: 0,
        usage: "title",
        handler: heading,
    },
    Command {
        name: "#cm",
        arguments: 0,
        usage: "comment",
        handler: comment,
    },
    Command {
        name: "#ex",
        arguments: 0,
        usage: "title",
        handler: explain,
    },
    Command {
        name: "#eg",
        arguments: 0,
        usage: "title",
        handler: example,
    },
    Command {
        name: "#pr",
        arguments: 0,
        usage: "title",
        handler: practice,
    },
    Command {
        name: "#as",
        arguments: 0,
        usage: "title",
        handler: assign,
    },
    Command {
        name: "#pb",
        arguments: 3,
        usage: "title, statement, answers",
        handler: problem,
    },
    Command {
        name: "##pb",
        arguments: 3,
        usage: "title, statement, answers",
        handler: sub_problem,
    },
    Command {
        name: "#wt",
        arguments: 2,
        usage: "title, body[, passwords]",
        handler: wait,
    },
    Command {
        name: "#MP",
        arguments: 1,
        usage: "prefix",
        handler: answer_prefix,
    },
    Command {
        name: "#SC",
        arguments: 1,
        usage: "path",
        handler: image_base,
    },
    Command {
        name: "#ST",
        arguments: 1,
        usage: "[kind, ]mode",
        handler: visibility,
    },
    Command {
        name: "#CT",
        arguments: 1,
        usage: "milliseconds",
        handler: cooldown,
    },
    Command {
        name: "#bg",
        arguments: 1,
        usage: "kind",
        handler: begin,
    },
    Command {
        name: "#ed",
        arguments: 1,
        usage: "kind",
        handler: end,
    },
];

pub(crate) fn lookup(name: &str) -> Option<&'static Command> {
    COMMANDS
        .iter()
        .find(|command| command.name == name)
}

fn heading(compiler: &mut Compiler, directive: &Directive) {
    let level = directive
        .command
        .len();
    let title = compiler.inline(directive.arg(0));

    let html = if level == 1 {
        format!("<h1>{}</h1>", title)
    } else {
        format!(r#"<h{0} class="generic-h{0}">{1}</h{0}>"#, level, title)
    };
    compiler.emit(html);
}

fn comment(_: &mut Compiler, directive: &Directive) {
    debug!("Comment: {}", directive.arg(0));
}

fn counter(compiler: &mut Compiler, directive: &Directive, counter: Counter) {
    let number = compiler.next_counter(counter);
    let label = compiler.counter_label(counter);
    let title = compiler.inline(directive.arg(0));

    compiler.emit(format!(
        r#"<h2 class="{}">{} {}: {}</h2>"#,
        counter.class(),
        label,
        number,
        title
    ));
}

fn explain(compiler: &mut Compiler, directive: &Directive) {
    counter(compiler, directive, Counter::Explain);
}

fn example(compiler: &mut Compiler, directive: &Directive) {
    counter(compiler, directive, Counter::Example);
}

fn practice(compiler: &mut Compiler, directive: &Directive) {
    counter(compiler, directive, Counter::Practice);
}

fn assign(compiler: &mut Compiler, directive: &Directive) {
    counter(compiler, directive, Counter::Assign);
}

fn add_problem(compiler: &mut Compiler, directive: &Directive, nested: bool) {
    let reference = GateRef::problem(compiler.next_gate(GateKind::Problem));

    let title = compiler.inline(directive.arg(0));
    let body = compiler.inline(directive.arg(1));
    let prefix = compiler
        .prefix()
        .to_string();
    let accepted = encode_list(&Prefixed::new(&prefix), directive.arg(2));

    let cooldown = compiler.cooldown();

    if accepted.is_empty() {
        debug!("Problem {} has no accepted answers", reference.id);
    }

    compiler.open_gate(Gate {
        reference,
        title,
        body,
        accepted,
        prefix,
        cooldown,
        nested,
    });
}

fn problem(compiler: &mut Compiler, directive: &Directive) {
    add_problem(compiler, directive, false);
}

fn sub_problem(compiler: &mut Compiler, directive: &Directive) {
    add_problem(compiler, directive, true);
}

fn wait(compiler: &mut Compiler, directive: &Directive) {
    let reference = GateRef::wait(compiler.next_gate(GateKind::Wait));

    let title = compiler.inline(directive.arg(0));
    let body = compiler.inline(directive.arg(1));
    let prefix = compiler
        .prefix()
        .to_string();
    let accepted = encode_list(&Prefixed::new(&prefix), directive.arg(2));

    compiler.open_gate(Gate {
        reference,
        title,
        body,
        accepted,
        prefix,
        cooldown: Duration::ZERO,
        nested: false,
    });
}

fn answer_prefix(compiler: &mut Compiler, directive: &Directive) {
    compiler.set_prefix(directive.arg(0));
}

fn image_base(compiler: &mut Compiler, directive: &Directive) {
    compiler.set_image_base(
        directive
            .arg(0)
            .trim(),
    );
}

fn visibility(compiler: &mut Compiler, directive: &Directive) {
    if directive
        .args
        .len()
        >= 2
    {
        let kind = GateKind::parse(directive.arg(0));
        let mode = VisibilityMode::parse(directive.arg(1));

        match (kind, mode) {
            (Some(kind), Some(mode)) => compiler.set_visibility(kind, mode),
            _ => compiler.report(DiagnosticKind::InvalidVisibility(format!(
                "{}, {}",
                directive.arg(0),
                directive.arg(1)
            ))),
        }
    } else {
        match VisibilityMode::parse(directive.arg(0)) {
            Some(mode) => compiler.marker(mode),
            None => compiler.report(DiagnosticKind::InvalidVisibility(
                directive
                    .arg(0)
                    .to_string(),
            )),
        }
    }
}

fn cooldown(compiler: &mut Compiler, directive: &Directive) {
    let value = directive
        .arg(0)
        .trim();

    match value.parse::<u64>() {
        Ok(millis) => compiler.set_cooldown(Duration::from_millis(millis)),
        Err(_) => compiler.report(DiagnosticKind::InvalidCooldown(value.to_string())),
    }
}

// list and code blocks are recognized by the compiler before the table is
// consulted, so anything reaching here is an unknown or unmatched block.

fn begin(compiler: &mut Compiler, directive: &Directive) {
    compiler.report(DiagnosticKind::UnknownBlock(
        directive
            .arg(0)
            .trim()
            .to_string(),
    ));
}

fn end(compiler: &mut Compiler, directive: &Directive) {
    compiler.report(DiagnosticKind::UnmatchedEnd(
        directive
            .arg(0)
            .trim()
            .to_string(),
    ));
}
