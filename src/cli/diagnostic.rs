//! Miette-based error diagnostics for CLI error presentation.
//!
//! Library errors are converted here into diagnostics with source context
//! and help lines. YAML syntax errors point at the offending span.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::error::{ConfigError, Error, ManifestError, SyntaxError};

/// A manifest that is not valid YAML.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(kubetools::manifest::syntax))]
pub struct ManifestSyntaxError {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: Option<String>,
}

impl ManifestSyntaxError {
    #[must_use]
    pub fn new(err: &SyntaxError) -> Self {
        let name = if err.path.as_os_str() == crate::manifest::STDIN_PATH {
            "<stdin>".to_string()
        } else {
            err.path.display().to_string()
        };
        Self {
            message: format!("invalid YAML in {name} (document {})", err.document),
            span: err.offset().map(|offset| (offset, 0).into()),
            src: NamedSource::new(name, err.content.clone()),
            help: Some(err.source.to_string()),
        }
    }
}

/// Any other failure of a command.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(kubetools::command))]
pub struct CommandError {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

impl CommandError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }

    /// Add a help suggestion to the error.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Turn a crate error into a renderable report.
pub fn report(err: Error) -> miette::Report {
    match err {
        Error::Manifest(ManifestError::Syntax(syntax)) => {
            miette::Report::new(ManifestSyntaxError::new(&syntax))
        }
        other => {
            let help = help_for(&other);
            let mut diagnostic = CommandError::new(other.to_string());
            if let Some(help) = help {
                diagnostic = diagnostic.with_help(help);
            }
            miette::Report::new(diagnostic)
        }
    }
}

fn help_for(err: &Error) -> Option<&'static str> {
    match err {
        Error::Manifest(ManifestError::NotFound { .. }) => {
            Some("run `kubetools show` to list the deployments that were loaded")
        }
        Error::Manifest(ManifestError::Empty { .. }) => {
            Some("pass files or directories that contain Deployment manifests")
        }
        Error::Manifest(ManifestError::Schema { .. }) => {
            Some("run `kubetools validate` for a full report")
        }
        Error::Config(ConfigError::Parse(_)) => {
            Some("check the settings file with `kubetools config validate`")
        }
        Error::Config(ConfigError::InvalidValue { .. } | ConfigError::MissingField { .. }) => {
            Some("run `kubetools config init --force` to start from the documented template")
        }
        Error::ValidationFailed { .. } => {
            Some("fix the findings above or rerun without --strict")
        }
        _ => None,
    }
}
