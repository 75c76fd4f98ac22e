//! Template trait for wrapping rendered documents

use crate::language::Document;

/// Trait for templates that place a rendered document body into its final
/// output form.
pub trait Template {
    fn fill(&self, document: &Document, body: &str) -> Result<String, tinytemplate::error::Error>;
}

/// The body on its own, for embedding into a page made elsewhere.
pub struct Fragment;

impl Template for Fragment {
    fn fill(&self, _: &Document, body: &str) -> Result<String, tinytemplate::error::Error> {
        let mut output = body.to_string();
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }
}
