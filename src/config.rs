//! Level files: a theme (built-in name or inline definition) plus a layout.
//!
//! ```json
//! { "theme": "panel", "level": "@....\n.#..F" }
//! { "theme": { "name": "custom", ... }, "matrix": [[8, 0], [4, 6]] }
//! ```

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::console_interface::{parse_level, LevelParseError};
use crate::core::{GridError, Theme, ThemeError};
use crate::driver::Session;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeSource {
    Builtin(String),
    Inline(Theme),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub theme: ThemeSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<u8>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read level file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid level file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Parse(#[from] LevelParseError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("level file needs exactly one of 'matrix' or 'level'")]
    MissingLayout,
}

pub fn resolve_theme(name: &str) -> Result<Theme, ConfigError> {
    Theme::builtin(name).ok_or_else(|| ConfigError::UnknownTheme(name.to_string()))
}

impl LevelConfig {
    pub fn from_json(text: &str) -> Result<LevelConfig, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<LevelConfig, ConfigError> {
        debug!("[config] loading {}", path.display());
        let text = std::fs::read_to_string(path)?;
        LevelConfig::from_json(&text)
    }

    pub fn theme(&self) -> Result<Theme, ConfigError> {
        let theme = match &self.theme {
            ThemeSource::Builtin(name) => resolve_theme(name)?,
            ThemeSource::Inline(theme) => theme.clone(),
        };
        theme.validate()?;
        Ok(theme)
    }

    pub fn matrix(&self, theme: &Theme) -> Result<Vec<Vec<u8>>, ConfigError> {
        match (&self.matrix, &self.level) {
            (Some(matrix), None) => Ok(matrix.clone()),
            (None, Some(level)) => Ok(parse_level(theme, level)?),
            _ => Err(ConfigError::MissingLayout),
        }
    }

    pub fn into_session(self) -> Result<Session, ConfigError> {
        let theme = self.theme()?;
        let matrix = self.matrix(&theme)?;
        Ok(Session::new(theme, matrix)?)
    }
}
