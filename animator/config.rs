use crate::error::AnimatorError;
use crate::player::{FrameSequence, PlayerConfig};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Written on first launch when no configuration exists yet.
pub const SAMPLE_CONFIG: &str = r#"[player]
frame_rate = 0.1
loop = true

[display]
# target = "terminal"   # or "log"; picked automatically when unset

[log]
level = "info"

[[sheets]]
name = "spinner"
frames = ["|", "/", "-", "\\"]

[[sheets]]
name = "dots"
frames = [".", "..", "...", "....", "...", ".."]
"#;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayTarget {
    Terminal,
    Log,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Left unset, the host picks a display for itself.
    pub target: Option<DisplayTarget>,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub frames: Vec<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
    pub sheets: Vec<Sheet>,
}

impl Config {
    pub async fn load_from_file(file_path: impl AsRef<Path>) -> Result<Self, AnimatorError> {
        let content = tokio::fs::read_to_string(file_path).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, AnimatorError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AnimatorError> {
        let mut seen = HashSet::new();
        for sheet in &self.sheets {
            if sheet.frames.is_empty() {
                return Err(AnimatorError::EmptySheet(sheet.name.clone()));
            }
            if !seen.insert(sheet.name.as_str()) {
                return Err(AnimatorError::DuplicateSheet(sheet.name.clone()));
            }
        }
        Ok(())
    }

    pub fn sheet_library(&self) -> SheetLibrary {
        SheetLibrary {
            sheets: self
                .sheets
                .iter()
                .map(|sheet| {
                    (
                        sheet.name.clone(),
                        FrameSequence::from(sheet.frames.clone()),
                    )
                })
                .collect(),
        }
    }
}

/// Named frame sequences available to the player.
#[derive(Clone, Debug, Default)]
pub struct SheetLibrary {
    sheets: HashMap<String, FrameSequence<String>>,
}

impl SheetLibrary {
    pub fn get(&self, name: &str) -> Result<&FrameSequence<String>, AnimatorError> {
        self.sheets
            .get(name)
            .ok_or_else(|| AnimatorError::UnknownSheet(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sheets.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
