//! Rules that look across the whole manifest set.

use std::collections::HashMap;

use super::{Finding, Rule, Severity};
use crate::manifest::{DocumentSource, ManifestSet};

pub(super) fn check_rejected(set: &ManifestSet, out: &mut Vec<Finding>) {
    for rejected in set.rejected() {
        out.push(Finding {
            severity: Severity::Error,
            rule: Rule::Schema,
            source: Some(rejected.source.clone()),
            deployment: None,
            message: rejected.reason.clone(),
        });
    }
}

/// `metadata.name` must be unique per namespace; later duplicates are flagged.
pub(super) fn check_unique_names(set: &ManifestSet, default_namespace: &str, out: &mut Vec<Finding>) {
    let mut first_seen: HashMap<(&str, &str), &DocumentSource> = HashMap::new();

    for document in set.documents() {
        let deployment = &document.deployment;
        let key = (deployment.namespace_or(default_namespace), deployment.name());

        match first_seen.get(&key) {
            Some(first) => out.push(Finding {
                severity: Severity::Error,
                rule: Rule::DuplicateName,
                source: Some(document.source.clone()),
                deployment: Some(deployment.name().to_string()),
                message: format!(
                    "Deployment '{}' in namespace '{}' is already defined at {first}",
                    key.1, key.0
                ),
            }),
            None => {
                first_seen.insert(key, &document.source);
            }
        }
    }
}

pub(super) fn check_not_empty(set: &ManifestSet, out: &mut Vec<Finding>) {
    if set.is_empty() {
        out.push(Finding {
            severity: Severity::Warning,
            rule: Rule::EmptySet,
            source: None,
            deployment: None,
            message: format!(
                "no Deployment documents found in {}",
                set.inputs().join(", ")
            ),
        });
    }
}
