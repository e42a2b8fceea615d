use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimatorError {
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    #[error("Sheet has no frames: {0}")]
    EmptySheet(String),

    #[error("Duplicate sheet name: {0}")]
    DuplicateSheet(String),
}
