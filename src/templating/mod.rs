//! Templates for writing rendered documents out as HTML

mod page;
mod template;

pub use page::Page;
pub use template::{Fragment, Template};

use crate::language::Document;

/// Wrap a rendered document body using the specified template
pub fn fill(
    template: &impl Template,
    document: &Document,
    body: &str,
) -> Result<String, tinytemplate::error::Error> {
    template.fill(document, body)
}
