//! Validation policy knobs.

use serde::{Deserialize, Serialize};

/// Which optional checks run, and how strictly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// `apiVersion` values accepted for Deployments.
    pub allowed_api_versions: Vec<String>,

    /// Selector must equal the template labels, not merely be a subset.
    pub strict_selector: bool,

    /// `metadata.annotations` must be present.
    pub require_annotations: bool,

    /// Warn when the kubetools project/role/name labels are missing.
    pub require_identity_labels: bool,

    /// Warn on untagged or `latest` images.
    pub require_image_tag: bool,

    /// Treat warnings as failures.
    pub warnings_as_errors: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            allowed_api_versions: vec!["apps/v1".to_string()],
            strict_selector: true,
            require_annotations: true,
            require_identity_labels: true,
            require_image_tag: true,
            warnings_as_errors: false,
        }
    }
}
