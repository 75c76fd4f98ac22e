//! Standalone HTML page around a rendered document.

use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::debug;

use crate::language::Document;

use super::Template;

static TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{language}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{{ if stylesheet }}<link rel="stylesheet" href="{stylesheet}">
{{ endif }}<script>window.MathJax = {mathjax | unescaped};</script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-chtml.js"></script>
</head>
<body>
<aside id="sidebar" class="{{ if sidebar }}sidebar-visible{{ else }}sidebar-hidden{{ endif }}">
<div id="score-area">{score_label}: <span id="correct-answers-count">{correct}</span> / <span id="total-problems-count">{total}</span></div>
</aside>
<main id="output">
{body | unescaped}
</main>
</body>
</html>
"#;

#[derive(Serialize)]
struct Context<'a> {
    title: &'a str,
    language: &'a str,
    stylesheet: Option<&'a str>,
    mathjax: String,
    score_label: &'a str,
    correct: u32,
    total: u32,
    sidebar: bool,
    body: &'a str,
}

/// A complete page, with the math typesetting configuration and the score
/// counters.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub title: &'a str,
    pub language: &'a str,
    pub stylesheet: Option<&'a str>,
    pub correct: u32,
    pub sidebar: bool,
}

impl<'a> Page<'a> {
    pub fn new(title: &'a str) -> Page<'a> {
        Page {
            title,
            language: "en",
            stylesheet: None,
            correct: 0,
            sidebar: true,
        }
    }
}

/// Delimiters the typesetting engine looks for: what the inline renderer
/// writes for math, and the equation forms written directly in a document.
fn mathjax() -> String {
    let config = serde_json::json!({
        "tex": {
            "inlineMath": [["\\(", "\\)"], ["@eq{", "}"]],
            "displayMath": [["\\[", "\\]"], ["\\begin{equation}", "\\end{equation}"]],
            "processEscapes": true
        },
        "options": {
            "skipHtmlTags": ["script", "noscript", "style", "textarea", "pre", "code"]
        }
    });
    config.to_string()
}

impl Template for Page<'_> {
    fn fill(&self, document: &Document, body: &str) -> Result<String, tinytemplate::error::Error> {
        let mut tt = TinyTemplate::new();
        tt.add_template("page", TEMPLATE)?;

        let context = Context {
            title: self.title,
            language: self.language,
            stylesheet: self.stylesheet,
            mathjax: mathjax(),
            score_label: "Score",
            correct: self.correct,
            total: document.total_problems,
            sidebar: self.sidebar,
            body,
        };

        debug!(title = self.title, "Filling page template");
        tt.render("page", &context)
    }
}
