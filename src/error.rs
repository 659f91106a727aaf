use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    Config {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config {path}: {reason}")]
    ConfigValue { path: PathBuf, reason: String },

    #[error("couldn't create MIDI input: {0}")]
    MidiInit(#[from] midir::InitError),

    #[error("no MIDI input ports found")]
    NoDevices,

    #[error("failed to connect to {device}: {reason}")]
    Connect { device: String, reason: String },

    #[error("failed to load font {path}: {source}")]
    Font {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
