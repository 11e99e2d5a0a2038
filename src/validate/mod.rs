//! Consistency checks over a manifest set.
//!
//! [`Validator::run`] walks every document and the set as a whole and
//! returns a [`Report`] of [`Finding`]s. Which optional checks run is decided
//! by [`ValidationPolicy`].

mod document;
mod set;

use std::fmt;

use tracing::debug;

use crate::config::ValidationPolicy;
use crate::domain::deployment::DEFAULT_NAMESPACE;
use crate::manifest::{DocumentSource, ManifestSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every check kubetools knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Schema,
    ApiVersion,
    MissingField,
    NegativeCount,
    EmptyField,
    InvalidName,
    InvalidLabel,
    IdentityLabels,
    SelectorEmpty,
    SelectorMismatch,
    NoContainers,
    DuplicateContainer,
    DuplicateEnv,
    InvalidEnvName,
    InvalidImage,
    ImageTag,
    DuplicateName,
    RoundTrip,
    EmptySet,
}

impl Rule {
    /// Stable kebab-case code shown to users and in JSON output.
    pub fn code(self) -> &'static str {
        match self {
            Rule::Schema => "schema",
            Rule::ApiVersion => "api-version",
            Rule::MissingField => "missing-field",
            Rule::NegativeCount => "negative-count",
            Rule::EmptyField => "empty-field",
            Rule::InvalidName => "invalid-name",
            Rule::InvalidLabel => "invalid-label",
            Rule::IdentityLabels => "identity-labels",
            Rule::SelectorEmpty => "selector-empty",
            Rule::SelectorMismatch => "selector-mismatch",
            Rule::NoContainers => "no-containers",
            Rule::DuplicateContainer => "duplicate-container",
            Rule::DuplicateEnv => "duplicate-env",
            Rule::InvalidEnvName => "invalid-env-name",
            Rule::InvalidImage => "invalid-image",
            Rule::ImageTag => "image-tag",
            Rule::DuplicateName => "duplicate-name",
            Rule::RoundTrip => "roundtrip",
            Rule::EmptySet => "empty-set",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub rule: Rule,
    /// Document the finding is about; `None` for set-wide findings.
    pub source: Option<DocumentSource>,
    /// Deployment name, when the document got far enough to have one.
    pub deployment: Option<String>,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{source}")?;
            if let Some(name) = &self.deployment {
                write!(f, " ({name})")?;
            }
            write!(f, ": ")?;
        }
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    findings: Vec<Finding>,
    documents: usize,
}

impl Report {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of Deployment documents that were checked.
    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    /// Whether the run passes; with `strict` any warning fails it too.
    pub fn passes(&self, strict: bool) -> bool {
        !self.has_errors() && !(strict && self.warnings() > 0)
    }

    pub fn by_rule(&self, rule: Rule) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |finding| finding.rule == rule)
    }
}

/// Runs every rule over a [`ManifestSet`].
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    policy: &'a ValidationPolicy,
    default_namespace: &'a str,
}

impl<'a> Validator<'a> {
    pub fn new(policy: &'a ValidationPolicy) -> Self {
        Self {
            policy,
            default_namespace: DEFAULT_NAMESPACE,
        }
    }

    /// Namespace assumed for documents without `metadata.namespace`.
    #[must_use]
    pub fn with_default_namespace(mut self, namespace: &'a str) -> Self {
        self.default_namespace = namespace;
        self
    }

    pub fn run(&self, set: &ManifestSet) -> Report {
        let mut findings = Vec::new();

        set::check_rejected(set, &mut findings);
        for document in set.documents() {
            document::check(document, self.policy, &mut findings);
        }
        set::check_unique_names(set, self.default_namespace, &mut findings);
        set::check_not_empty(set, &mut findings);

        // Stable: findings for one document keep their rule order.
        findings.sort_by(|a, b| match (&a.source, &b.source) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        debug!(
            documents = set.len(),
            findings = findings.len(),
            "validation finished"
        );

        Report {
            findings,
            documents: set.len(),
        }
    }
}
