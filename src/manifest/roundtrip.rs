//! Semantic comparison and canonical rendering of documents.
//!
//! Two documents are equivalent when they hold the same key/value set.
//! Mapping order is ignored, sequence order is not, numbers compare by
//! value, and a mapping entry whose value is `null` counts as absent.

use serde_yaml::{Mapping, Value};

use super::Document;
use crate::domain::Deployment;
use crate::error::{ManifestError, Result};

/// Output encoding for rendered deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    /// `---` separated YAML stream.
    #[default]
    Yaml,
    /// Pretty-printed JSON: an object for one deployment, an array otherwise.
    Json,
}

fn numbers_equal(a: &serde_yaml::Number, b: &serde_yaml::Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => false,
    }
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| "?".to_string()),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn present(mapping: &Mapping) -> impl Iterator<Item = (&Value, &Value)> {
    mapping.iter().filter(|(_, value)| !value.is_null())
}

fn diff_into(path: &str, a: &Value, b: &Value, out: &mut Vec<String>) {
    match (a, b) {
        (Value::Mapping(left), Value::Mapping(right)) => {
            for (key, value) in present(left) {
                let child = join(path, &key_label(key));
                match right.get(key).filter(|v| !v.is_null()) {
                    Some(other) => diff_into(&child, value, other, out),
                    None => out.push(child),
                }
            }
            for (key, _) in present(right) {
                if left.get(key).filter(|v| !v.is_null()).is_none() {
                    out.push(join(path, &key_label(key)));
                }
            }
        }
        (Value::Sequence(left), Value::Sequence(right)) => {
            if left.len() != right.len() {
                out.push(format!("{}[len]", display_path(path)));
                return;
            }
            for (i, (x, y)) in left.iter().zip(right).enumerate() {
                diff_into(&format!("{path}[{i}]"), x, y, out);
            }
        }
        (Value::Number(x), Value::Number(y)) => {
            if !numbers_equal(x, y) {
                out.push(display_path(path));
            }
        }
        (Value::Tagged(x), Value::Tagged(y)) => {
            if x.tag != y.tag {
                out.push(display_path(path));
            } else {
                diff_into(path, &x.value, &y.value, out);
            }
        }
        (x, y) => {
            if x != y {
                out.push(display_path(path));
            }
        }
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

/// Paths at which `a` and `b` differ; empty when they are equivalent.
pub fn differences(a: &Value, b: &Value) -> Vec<String> {
    let mut out = Vec::new();
    diff_into("", a, b, &mut out);
    out
}

pub fn semantically_equal(a: &Value, b: &Value) -> bool {
    differences(a, b).is_empty()
}

/// Reserialize a document's typed record and compare it with what was read.
pub fn check(document: &Document) -> std::result::Result<Vec<String>, ManifestError> {
    let reserialized = serde_yaml::to_value(&document.deployment).map_err(ManifestError::Serialize)?;
    Ok(differences(&document.raw, &reserialized))
}

/// Fail with [`ManifestError::RoundTrip`] when a document loses information.
pub fn ensure_lossless(document: &Document) -> std::result::Result<(), ManifestError> {
    let differences = check(document)?;
    if differences.is_empty() {
        Ok(())
    } else {
        Err(ManifestError::RoundTrip {
            source_ref: document.source.to_string(),
            differences,
        })
    }
}

/// Render deployments in order.
pub fn render<'a, I>(deployments: I, format: RenderFormat) -> Result<String>
where
    I: IntoIterator<Item = &'a Deployment>,
{
    let deployments: Vec<&Deployment> = deployments.into_iter().collect();
    match format {
        RenderFormat::Yaml => {
            let mut out = String::new();
            for (i, deployment) in deployments.iter().enumerate() {
                if i > 0 {
                    out.push_str("---\n");
                }
                out.push_str(&serde_yaml::to_string(deployment).map_err(ManifestError::Serialize)?);
            }
            Ok(out)
        }
        RenderFormat::Json => {
            let mut out = if deployments.len() == 1 {
                serde_json::to_string_pretty(deployments[0])?
            } else {
                serde_json::to_string_pretty(&deployments)?
            };
            out.push('\n');
            Ok(out)
        }
    }
}
