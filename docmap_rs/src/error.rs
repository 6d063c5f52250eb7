//! Error taxonomy.
//!
//! Configuration, root-path and render errors are fatal for the call that
//! raised them. Entry-level and enrichment problems never become `Err`; they
//! are recorded as [`ScanWarning`]s and the run continues.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration field `{0}`")]
    MissingField(&'static str),

    #[error("`{field}` = {value} is out of range (expected {range})")]
    OutOfRange {
        field: &'static str,
        value: String,
        range: &'static str,
    },

    #[error("project root {0} does not exist")]
    RootNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("root path {0} does not exist")]
    RootMissing(PathBuf),

    #[error("root path {path} is unreadable: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("indexing runtime failure: {0}")]
    Runtime(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown output format `{0}` (expected mindmap, mermaid, dot, markdown, api-spec, json or pdf)")]
    UnknownFormat(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

#[derive(Debug, Error)]
pub enum TextGenError {
    #[error("text generation is disabled")]
    Disabled,

    #[error("text generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text generation endpoint returned HTTP {0}")]
    Status(u16),

    #[error("text generation returned no text")]
    EmptyResponse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    Unreadable,
    TooLarge,
    Symlink,
    ContentRead,
    TextGeneration,
}

/// A non-fatal problem with a single entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanWarning {
    pub path: String,
    pub kind: WarningKind,
    pub message: String,
}

impl ScanWarning {
    pub fn new(path: impl Into<String>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}: {}", self.kind, self.path, self.message)
    }
}
