//! Manifest sets: every Deployment found in a list of files and directories.

pub mod loader;
pub mod roundtrip;

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, info};

use crate::domain::deployment::DEPLOYMENT_KIND;
use crate::domain::Deployment;
use crate::error::ManifestError;

pub use loader::{DocumentSource, RawDocument, STDIN_PATH};
pub use roundtrip::RenderFormat;

/// A Deployment document together with the raw value it was read from.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: DocumentSource,
    pub raw: Value,
    pub deployment: Deployment,
}

/// A document of some other kind, ignored by kubetools.
#[derive(Debug, Clone)]
pub struct Skipped {
    pub source: DocumentSource,
    pub kind: String,
}

/// Reason recorded when a rejected document carries a custom YAML tag.
pub const TAGGED_REASON: &str = "YAML tags are not supported";

/// A Deployment document that does not fit the Deployment schema.
#[derive(Debug, Clone)]
pub struct Rejected {
    pub source: DocumentSource,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ManifestSet {
    inputs: Vec<String>,
    documents: Vec<Document>,
    skipped: Vec<Skipped>,
    rejected: Vec<Rejected>,
}

impl ManifestSet {
    /// Load every document reachable from `paths`.
    ///
    /// YAML syntax errors abort the load. Schema errors are collected in
    /// [`ManifestSet::rejected`] so validation can report all of them.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ManifestError> {
        let mut set = Self::default();

        for path in paths {
            let path = path.as_ref();
            set.inputs.push(path.display().to_string());

            for file in loader::collect_files(path)? {
                let content = loader::read_source(&file)?;
                set.extend_from_str(&file, &content)?;
            }
        }

        info!(
            inputs = set.inputs.len(),
            deployments = set.documents.len(),
            skipped = set.skipped.len(),
            rejected = set.rejected.len(),
            "loaded manifests"
        );
        Ok(set)
    }

    /// Build a set from in-memory content attributed to `path`.
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let mut set = Self {
            inputs: vec![path.display().to_string()],
            ..Self::default()
        };
        set.extend_from_str(&path, content)?;
        Ok(set)
    }

    fn extend_from_str(&mut self, path: &Path, content: &str) -> Result<(), ManifestError> {
        for raw in loader::parse_documents(path, content)? {
            self.push(raw);
        }
        Ok(())
    }

    fn push(&mut self, raw: RawDocument) {
        let RawDocument { source, value } = raw;

        let kind = value.get("kind").and_then(Value::as_str);
        match kind {
            Some(DEPLOYMENT_KIND) => {}
            Some(other) => {
                debug!(source = %source, kind = other, "skipping non-Deployment document");
                self.skipped.push(Skipped {
                    kind: other.to_string(),
                    source,
                });
                return;
            }
            None => {
                self.rejected.push(Rejected {
                    source,
                    reason: "missing field `kind`".to_string(),
                });
                return;
            }
        }

        match serde_yaml::from_value::<Deployment>(value.clone()) {
            Ok(deployment) => self.documents.push(Document {
                source,
                raw: value,
                deployment,
            }),
            Err(err) => {
                debug!(source = %source, error = %err, "rejecting Deployment document");
                // Flattened extras cannot hold tagged values.
                let reason = if has_tag(&value) {
                    TAGGED_REASON.to_string()
                } else {
                    err.to_string()
                };
                self.rejected.push(Rejected { source, reason });
            }
        }
    }

    /// The paths this set was loaded from, as given.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn deployments(&self) -> impl Iterator<Item = &Deployment> {
        self.documents.iter().map(|document| &document.deployment)
    }

    /// Fail on the first rejected document.
    pub fn ensure_complete(&self) -> Result<(), ManifestError> {
        match self.rejected.first() {
            Some(rejected) => Err(ManifestError::Schema {
                source_ref: rejected.source.to_string(),
                reason: rejected.reason.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Fail when no Deployment documents were found.
    pub fn ensure_not_empty(&self) -> Result<(), ManifestError> {
        if self.is_empty() {
            Err(ManifestError::Empty {
                paths: self.inputs.clone(),
            })
        } else {
            Ok(())
        }
    }

    /// Documents whose app name (`kubetools/name`) or metadata name is in `names`.
    ///
    /// Every requested name must match at least one document.
    pub fn select(&self, names: &[String]) -> Result<Vec<&Document>, ManifestError> {
        let is_match = |document: &Document, name: &str| {
            document.deployment.app_name() == name || document.deployment.name() == name
        };

        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.documents.iter().any(|d| is_match(d, name.as_str())))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ManifestError::NotFound { names: missing });
        }

        Ok(self
            .documents
            .iter()
            .filter(|document| names.iter().any(|name| is_match(document, name.as_str())))
            .collect())
    }

    /// First document with this `metadata.name`, else the first with this app name.
    pub fn find(&self, name: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|document| document.deployment.name() == name)
            .or_else(|| {
                self.documents
                    .iter()
                    .find(|document| document.deployment.app_name() == name)
            })
    }
}

fn has_tag(value: &Value) -> bool {
    match value {
        Value::Tagged(_) => true,
        Value::Sequence(items) => items.iter().any(has_tag),
        Value::Mapping(map) => map.iter().any(|(key, value)| has_tag(key) || has_tag(value)),
        _ => false,
    }
}
