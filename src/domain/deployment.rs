//! Typed Deployment record.
//!
//! Mirrors the `apps/v1` Deployment shape for the fields kubetools reasons
//! about. Every level keeps the keys it does not name in a flattened `extra`
//! map, so a record reserializes to the document it was read from.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::image::{ImageError, ImageReference};
use super::labels::{
    GIT_BRANCH_ANNOTATION_KEY, GIT_COMMIT_ANNOTATION_KEY, GIT_TAG_ANNOTATION_KEY,
    MANAGED_BY_ANNOTATION_KEY, MANAGED_BY_VALUE, NAME_LABEL_KEY, PROJECT_NAME_LABEL_KEY,
    ROLE_LABEL_KEY,
};

pub const DEPLOYMENT_KIND: &str = "Deployment";
pub const DEFAULT_NAMESPACE: &str = "default";

/// Label or annotation map, ordered by key.
pub type Labels = BTreeMap<String, String>;

/// Keys a struct does not model, preserved verbatim.
pub type Extra = BTreeMap<String, serde_yaml::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: DeploymentSpec,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Labels>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_history_limit: Option<i32>,
    pub selector: LabelSelector,
    pub template: PodTemplateSpec,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_labels: Option<Labels>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodTemplateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TemplateMeta>,
    pub spec: PodSpec,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Pod template metadata. Unlike [`ObjectMeta`] the name is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Labels>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodSpec {
    pub containers: Vec<Container>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<EnvVar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<PullPolicy>,
    /// Operator grouping hint; not a Kubernetes field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_context: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PullPolicy {
    Always,
    IfNotPresent,
    Never,
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PullPolicy::Always => "Always",
            PullPolicy::IfNotPresent => "IfNotPresent",
            PullPolicy::Never => "Never",
        };
        f.write_str(name)
    }
}

/// Who a Deployment is, as far as kubetools labelling goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity<'a> {
    pub name: &'a str,
    pub project: Option<&'a str>,
    pub role: Option<&'a str>,
    pub instance: Option<&'a str>,
}

impl Deployment {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Namespace the Deployment targets, falling back to `default`.
    pub fn namespace_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.metadata.namespace.as_deref().unwrap_or(default)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.metadata.labels.as_ref()?.get(key).map(String::as_str)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata.annotations.as_ref()?.get(key).map(String::as_str)
    }

    pub fn identity(&self) -> Identity<'_> {
        Identity {
            name: self.name(),
            project: self.label(PROJECT_NAME_LABEL_KEY),
            role: self.label(ROLE_LABEL_KEY),
            instance: self.label(NAME_LABEL_KEY),
        }
    }

    /// Name used to address the app on the command line.
    pub fn app_name(&self) -> &str {
        self.label(NAME_LABEL_KEY).unwrap_or_else(|| self.name())
    }

    pub fn is_managed(&self) -> bool {
        self.annotation(MANAGED_BY_ANNOTATION_KEY) == Some(MANAGED_BY_VALUE)
    }

    /// `branch=…, tag=…, commit=…` from the git annotations, skipping empty ones.
    pub fn version_info(&self) -> String {
        [
            ("branch", GIT_BRANCH_ANNOTATION_KEY),
            ("tag", GIT_TAG_ANNOTATION_KEY),
            ("commit", GIT_COMMIT_ANNOTATION_KEY),
        ]
        .into_iter()
        .filter_map(|(name, key)| {
            self.annotation(key)
                .filter(|value| !value.is_empty())
                .map(|value| format!("{name}={value}"))
        })
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn selector_labels(&self) -> Option<&Labels> {
        self.spec.selector.match_labels.as_ref()
    }

    pub fn template_labels(&self) -> Option<&Labels> {
        self.spec.template.metadata.as_ref()?.labels.as_ref()
    }

    pub fn containers(&self) -> &[Container] {
        &self.spec.template.spec.containers
    }
}

impl Container {
    pub fn image_reference(&self) -> Result<ImageReference, ImageError> {
        self.image.parse()
    }

    /// Pull policy in effect, and whether it was implied rather than set.
    pub fn effective_pull_policy(&self) -> Option<(PullPolicy, bool)> {
        match self.image_pull_policy {
            Some(policy) => Some((policy, false)),
            None => self
                .image_reference()
                .ok()
                .map(|image| (image.default_pull_policy(), true)),
        }
    }

    pub fn env_vars(&self) -> &[EnvVar] {
        self.env.as_deref().unwrap_or_default()
    }
}
