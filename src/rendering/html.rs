//! Conversion of inline syntax trees to HTML fragments

use crate::language::Inline;

/// Escape text for use in element content or a quoted attribute value.
pub fn escape(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Render inline nodes to HTML.
pub fn render(nodes: &[Inline]) -> String {
    Renderer::default().render(nodes)
}

/// Carries the document-scoped settings that affect how inline content is
/// written out.
#[derive(Debug, Default, Clone, Copy)]
pub struct Renderer<'a> {
    pub image_base: &'a str,
}

fn is_relative(path: &str) -> bool {
    !(path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("data:")
        || path.starts_with('/'))
}

impl<'a> Renderer<'a> {
    pub fn new(image_base: &'a str) -> Renderer<'a> {
        Renderer { image_base }
    }

    pub fn render(&self, nodes: &[Inline]) -> String {
        let mut output = String::new();
        for node in nodes {
            self.render_node(&mut output, node);
        }
        output
    }

    fn render_node(&self, output: &mut String, node: &Inline) {
        match node {
            Inline::Text(text) => {
                output.push_str(&escape(text).replace('\n', "<br>"));
            }
            Inline::Bold(content) => {
                output.push_str("<strong>");
                output.push_str(&self.render(content));
                output.push_str("</strong>");
            }
            Inline::Underline(content) => {
                output.push_str(r#"<span style="text-decoration:underline;">"#);
                output.push_str(&self.render(content));
                output.push_str("</span>");
            }
            Inline::Colored { color, content } => {
                let color: String = color
                    .trim()
                    .chars()
                    .filter(|c| !matches!(c, '\'' | '"' | ';' | '(' | ')'))
                    .collect();
                let color = if color.is_empty() {
                    "inherit".to_string()
                } else {
                    escape(&color)
                };

                output.push_str(&format!(r#"<span style="color:{};">"#, color));
                output.push_str(&self.render(content));
                output.push_str("</span>");
            }
            Inline::Ruby { base, annotation } => {
                output.push_str("<ruby>");
                output.push_str(&self.render(base));
                output.push_str("<rt>");
                output.push_str(&self.render(annotation));
                output.push_str("</rt></ruby>");
            }
            Inline::Link { content, url } => {
                output.push_str(&format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                    escape(url.trim())
                ));
                output.push_str(&self.render(content));
                output.push_str("</a>");
            }
            Inline::Code { language, code } => {
                output.push_str(&format!(
                    r#"<code class="language-{}">{}</code>"#,
                    escape(
                        &language
                            .trim()
                            .to_lowercase()
                    ),
                    escape(code)
                ));
            }
            Inline::Image {
                source,
                alt,
                width,
                height,
            } => {
                output.push_str(&format!(
                    r#"<img src="{}" alt="{}" width="{}" height="{}">"#,
                    escape(&self.image_path(source.trim())),
                    escape(alt),
                    escape(width.trim()),
                    escape(height.trim())
                ));
            }
            Inline::Math { display, latex } => {
                let (open, close) = if *display {
                    ("\\[", "\\]")
                } else {
                    ("\\(", "\\)")
                };
                output.push_str(open);
                output.push_str(&escape(latex));
                output.push_str(close);
            }
            Inline::LineBreak => output.push_str("<br>"),
        }
    }

    fn image_path(&self, source: &str) -> String {
        if self
            .image_base
            .is_empty()
            || !is_relative(source)
        {
            return source.to_string();
        }

        let base = self
            .image_base
            .trim_end_matches('/');
        format!("{}/{}", base, source.trim_start_matches("./"))
    }
}
