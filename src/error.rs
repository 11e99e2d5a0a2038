use std::path::PathBuf;

use thiserror::Error;

/// Settings-file errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// A YAML document that could not be parsed at all.
///
/// Keeps the file content so the CLI can point at the offending span.
#[derive(Error, Debug)]
#[error("failed to parse {} (document {document}): {source}", path.display())]
pub struct SyntaxError {
    pub path: PathBuf,
    pub document: usize,
    pub content: String,
    #[source]
    pub source: serde_yaml::Error,
}

impl SyntaxError {
    /// Byte offset of the parser error within `content`, if the parser knows it.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        self.source
            .location()
            .map(|location| location.index().min(self.content.len()))
    }
}

/// Manifest loading and rendering errors.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Syntax(Box<SyntaxError>),

    #[error("{source_ref} is not a valid Deployment: {reason}")]
    Schema { source_ref: String, reason: String },

    #[error("Deployments not found: {}", names.join(", "))]
    NotFound { names: Vec<String> },

    #[error("no Deployment documents found in {}", paths.join(", "))]
    Empty { paths: Vec<String> },

    #[error("{source_ref} does not survive a round trip: {}", differences.join(", "))]
    RoundTrip {
        source_ref: String,
        differences: Vec<String>,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("validation failed: {errors} error(s), {warnings} warning(s)")]
    ValidationFailed { errors: usize, warnings: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt error: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<SyntaxError> for ManifestError {
    fn from(err: SyntaxError) -> Self {
        ManifestError::Syntax(Box::new(err))
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}
