//! Configuration: the words gatemark puts on the page, and the defaults for
//! the document-scoped directives.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fmt, fs};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub labels: Labels,
    pub messages: Messages,
    pub defaults: Defaults,
}

/// Text used when rendering headings and gate controls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub explain: String,
    pub example: String,
    pub practice: String,
    pub assign: String,
    pub problem: String,
    pub answer: String,
    pub check: String,
    pub skip: String,
    pub password: String,
    pub unlock: String,
    pub proceed: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            explain: "Explanation".to_string(),
            example: "Example".to_string(),
            practice: "Practice".to_string(),
            assign: "Assignment".to_string(),
            problem: "Problem".to_string(),
            answer: "Answer".to_string(),
            check: "Check".to_string(),
            skip: "Give up and skip".to_string(),
            password: "Password".to_string(),
            unlock: "Unlock".to_string(),
            proceed: "Proceed".to_string(),
        }
    }
}

/// Text written into a gate's result slot after an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub correct: String,
    pub incorrect: String,
    pub empty: String,
    pub skipped: String,
    pub unlocked: String,
    pub wrong_password: String,
    pub empty_password: String,
    pub confirm_skip: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            correct: "Correct!".to_string(),
            incorrect: "Incorrect.".to_string(),
            empty: "Please enter an answer.".to_string(),
            skipped: "This problem was skipped.".to_string(),
            unlocked: "Unlocked.".to_string(),
            wrong_password: "Wrong password.".to_string(),
            empty_password: "Please enter the password.".to_string(),
            confirm_skip: "Really skip this problem?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Prefix mixed into every encoded answer unless a document sets its
    /// own with `#MP`.
    pub answer_prefix: String,
    /// Skip cooldown in milliseconds unless a document sets `#CT`.
    pub cooldown_ms: u64,
    /// Prepended to the page name to form the progress storage key.
    pub storage_prefix: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            answer_prefix: "rny_answer::".to_string(),
            cooldown_ms: 1000,
            storage_prefix: "ProgramRnyKey_".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Unreadable(PathBuf, std::io::Error),
    Invalid(PathBuf, toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable(path, error) => {
                write!(f, "Failed reading {}: {}", path.display(), error)
            }
            ConfigError::Invalid(path, error) => {
                write!(f, "Invalid configuration in {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load config from a TOML file. A file that doesn't exist gives the
    /// defaults; one that exists but can't be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content)
                .map_err(|error| ConfigError::Invalid(path.to_path_buf(), error)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(error) => Err(ConfigError::Unreadable(path.to_path_buf(), error)),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
