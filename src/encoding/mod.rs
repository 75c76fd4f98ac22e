//! Obfuscation of accepted answers.
//!
//! Answers and passwords are never written into the page as they are; each
//! is prefixed and then Base64 encoded over its UTF-8 bytes. This is not
//! security, it only keeps the answers from being read off the page source
//! at a glance.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

/// Reversible transform between answer text and the token stored in the
/// rendered page.
pub trait Codec {
    fn encode(&self, text: &str) -> String;
    fn decode(&self, token: &str) -> Option<String>;
}

/// Prefix, then Base64. Decoding strips the prefix when present so that
/// tokens written without one still decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixed<'p> {
    prefix: &'p str,
}

impl<'p> Prefixed<'p> {
    pub fn new(prefix: &'p str) -> Prefixed<'p> {
        Prefixed { prefix }
    }
}

impl Codec for Prefixed<'_> {
    fn encode(&self, text: &str) -> String {
        let mut buffer = String::with_capacity(self.prefix.len() + text.len());
        buffer.push_str(self.prefix);
        buffer.push_str(text);
        STANDARD.encode(buffer.as_bytes())
    }

    fn decode(&self, token: &str) -> Option<String> {
        let bytes = match STANDARD.decode(token.trim()) {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(?error, "Token is not Base64");
                return None;
            }
        };
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(error) => {
                debug!(?error, "Token does not decode to UTF-8");
                return None;
            }
        };

        match text.strip_prefix(self.prefix) {
            Some(rest) => Some(rest.to_string()),
            None => Some(text),
        }
    }
}

/// Split a comma separated list of answers, trimming each, and encode them.
/// Empty entries are dropped.
pub fn encode_list(codec: &impl Codec, list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|answer| !answer.is_empty())
        .map(|answer| codec.encode(answer))
        .collect()
}
