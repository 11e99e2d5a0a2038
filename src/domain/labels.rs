//! kubetools label and annotation keys, and the label-selector predicate.

use super::deployment::Labels;

/// Project a Deployment belongs to.
pub const PROJECT_NAME_LABEL_KEY: &str = "kubetools/project_name";

/// Role within the project, e.g. `app` or `dependency`.
pub const ROLE_LABEL_KEY: &str = "kubetools/role";

/// Instance name, used to select deployments by app name.
pub const NAME_LABEL_KEY: &str = "kubetools/name";

pub const IDENTITY_LABEL_KEYS: [&str; 3] = [PROJECT_NAME_LABEL_KEY, ROLE_LABEL_KEY, NAME_LABEL_KEY];

pub const MANAGED_BY_ANNOTATION_KEY: &str = "app.kubernetes.io/managed-by";
pub const MANAGED_BY_VALUE: &str = "kubetools";

pub const ENV_ANNOTATION_KEY: &str = "kubetools/env";
pub const GIT_BRANCH_ANNOTATION_KEY: &str = "kubetools/git_branch";
pub const GIT_TAG_ANNOTATION_KEY: &str = "kubetools/git_tag";
pub const GIT_COMMIT_ANNOTATION_KEY: &str = "kubetools/git_commit";

/// How a selector relates to the labels it is meant to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorMatch {
    /// Selector and labels are identical.
    Equal,
    /// Every selector pair is present in the labels, which carry extra pairs.
    Subset { extra: Vec<String> },
    /// Some selector pairs are absent from (or differ in) the labels.
    Mismatch { missing: Vec<String> },
}

/// Compare `selector` (matchLabels) against a pod template's `labels`.
pub fn compare(selector: &Labels, labels: &Labels) -> SelectorMatch {
    let missing: Vec<String> = selector
        .iter()
        .filter(|(key, value)| labels.get(*key) != Some(*value))
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    if !missing.is_empty() {
        return SelectorMatch::Mismatch { missing };
    }

    let extra: Vec<String> = labels
        .iter()
        .filter(|(key, _)| !selector.contains_key(*key))
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    if extra.is_empty() {
        SelectorMatch::Equal
    } else {
        SelectorMatch::Subset { extra }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn identical_maps_are_equal() {
        let a = labels(&[(NAME_LABEL_KEY, "memcache-1"), (ROLE_LABEL_KEY, "dependency")]);
        assert_eq!(compare(&a, &a.clone()), SelectorMatch::Equal);
    }

    #[test]
    fn extra_template_labels_make_a_subset() {
        let selector = labels(&[(NAME_LABEL_KEY, "webserver")]);
        let template = labels(&[(NAME_LABEL_KEY, "webserver"), (ROLE_LABEL_KEY, "app")]);
        assert_eq!(
            compare(&selector, &template),
            SelectorMatch::Subset {
                extra: vec!["kubetools/role=app".to_string()]
            }
        );
    }

    #[test]
    fn differing_value_is_a_mismatch() {
        let selector = labels(&[(NAME_LABEL_KEY, "memcache-1")]);
        let template = labels(&[(NAME_LABEL_KEY, "memcache-2")]);
        assert_eq!(
            compare(&selector, &template),
            SelectorMatch::Mismatch {
                missing: vec!["kubetools/name=memcache-1".to_string()]
            }
        );
    }
}
