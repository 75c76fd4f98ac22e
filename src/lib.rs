pub mod config;
pub mod encoding;
pub mod language;
pub mod parsing;
pub mod progress;
pub mod rendering;
pub mod templating;

mod regex;
