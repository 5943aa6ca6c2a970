//! Optional project configuration at `.kst/config.toml`.
//!
//! ```toml
//! [files]
//! structure = "curriculum.states"
//!
//! [assess]
//! slip = 0.05
//! guess = 0.05
//! settle = 0.95
//! ```
//!
//! A missing file means defaults; a malformed file is a hard error so a
//! typo never silently changes behavior.

use serde::Deserialize;
use std::path::Path;

pub const CONFIG_PATH: &str = ".kst/config.toml";

pub const DEFAULT_SLIP: f64 = 0.0;
pub const DEFAULT_GUESS: f64 = 0.0;
pub const DEFAULT_SETTLE: f64 = 0.95;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub assess: AssessConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// Default structure file when a command omits its file argument.
    pub structure: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessConfig {
    pub slip: Option<f64>,
    pub guess: Option<f64>,
    pub settle: Option<f64>,
}

impl Config {
    /// Load the config from the working directory, if present.
    pub fn load() -> Result<Self, String> {
        Self::load_from(CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        toml::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn slip(&self) -> f64 {
        self.assess.slip.unwrap_or(DEFAULT_SLIP)
    }

    pub fn guess(&self) -> f64 {
        self.assess.guess.unwrap_or(DEFAULT_GUESS)
    }

    pub fn settle(&self) -> f64 {
        self.assess.settle.unwrap_or(DEFAULT_SETTLE)
    }
}
