//! Rules that look at one Deployment at a time.

use std::collections::HashSet;

use super::{Finding, Rule, Severity};
use crate::config::ValidationPolicy;
use crate::domain::labels::{self, SelectorMatch, IDENTITY_LABEL_KEYS};
use crate::domain::{naming, Container, Deployment, Labels};
use crate::manifest::{roundtrip, Document, DocumentSource};

/// Findings for one document, tagged with where they came from.
struct Sink<'a> {
    source: &'a DocumentSource,
    name: &'a str,
    out: &'a mut Vec<Finding>,
}

impl Sink<'_> {
    fn push(&mut self, severity: Severity, rule: Rule, message: impl Into<String>) {
        self.out.push(Finding {
            severity,
            rule,
            source: Some(self.source.clone()),
            deployment: (!self.name.is_empty()).then(|| self.name.to_string()),
            message: message.into(),
        });
    }

    fn error(&mut self, rule: Rule, message: impl Into<String>) {
        self.push(Severity::Error, rule, message);
    }

    fn warning(&mut self, rule: Rule, message: impl Into<String>) {
        self.push(Severity::Warning, rule, message);
    }
}

pub(super) fn check(document: &Document, policy: &ValidationPolicy, out: &mut Vec<Finding>) {
    let deployment = &document.deployment;
    let mut sink = Sink {
        source: &document.source,
        name: deployment.name(),
        out,
    };

    check_api_version(deployment, policy, &mut sink);
    check_metadata(deployment, policy, &mut sink);
    check_counts(deployment, &mut sink);
    check_selector(deployment, policy, &mut sink);
    check_containers(deployment, policy, &mut sink);
    check_roundtrip(document, &mut sink);
}

fn check_api_version(deployment: &Deployment, policy: &ValidationPolicy, sink: &mut Sink<'_>) {
    if !policy
        .allowed_api_versions
        .iter()
        .any(|allowed| *allowed == deployment.api_version)
    {
        sink.error(
            Rule::ApiVersion,
            format!(
                "apiVersion '{}' is not one of: {}",
                deployment.api_version,
                policy.allowed_api_versions.join(", ")
            ),
        );
    }
}

fn check_label_map(labels: &Labels, what: &str, sink: &mut Sink<'_>) {
    for (key, value) in labels {
        if let Err(reason) = naming::check_label_key(key) {
            sink.error(Rule::InvalidLabel, format!("{what} key '{key}': {reason}"));
        }
        if let Err(reason) = naming::check_label_value(value) {
            sink.error(
                Rule::InvalidLabel,
                format!("{what} '{key}' value '{value}': {reason}"),
            );
        }
    }
}

fn check_metadata(deployment: &Deployment, policy: &ValidationPolicy, sink: &mut Sink<'_>) {
    let metadata = &deployment.metadata;

    if metadata.name.is_empty() {
        sink.error(Rule::EmptyField, "metadata.name is empty");
    } else if let Err(reason) = naming::check_dns1123_subdomain(&metadata.name) {
        sink.error(
            Rule::InvalidName,
            format!("metadata.name '{}': {reason}", metadata.name),
        );
    }

    match &metadata.labels {
        Some(labels) => {
            check_label_map(labels, "metadata.labels", sink);
            if policy.require_identity_labels {
                let missing: Vec<&str> = IDENTITY_LABEL_KEYS
                    .into_iter()
                    .filter(|key| !labels.contains_key(*key))
                    .collect();
                if !missing.is_empty() {
                    sink.warning(
                        Rule::IdentityLabels,
                        format!("missing identity labels: {}", missing.join(", ")),
                    );
                }
            }
        }
        None => sink.error(Rule::MissingField, "metadata.labels is missing"),
    }

    match &metadata.annotations {
        Some(annotations) => {
            for key in annotations.keys() {
                if let Err(reason) = naming::check_label_key(key) {
                    sink.error(
                        Rule::InvalidLabel,
                        format!("metadata.annotations key '{key}': {reason}"),
                    );
                }
            }
        }
        None if policy.require_annotations => {
            sink.error(Rule::MissingField, "metadata.annotations is missing");
        }
        None => {}
    }
}

fn check_counts(deployment: &Deployment, sink: &mut Sink<'_>) {
    for (field, value) in [
        ("spec.replicas", deployment.spec.replicas),
        ("spec.revisionHistoryLimit", deployment.spec.revision_history_limit),
    ] {
        match value {
            None => sink.error(Rule::MissingField, format!("{field} is missing")),
            Some(count) if count < 0 => sink.error(
                Rule::NegativeCount,
                format!("{field} is {count}; must be 0 or greater"),
            ),
            Some(_) => {}
        }
    }
}

fn check_selector(deployment: &Deployment, policy: &ValidationPolicy, sink: &mut Sink<'_>) {
    let empty = Labels::new();
    let template = deployment.template_labels().unwrap_or(&empty);
    check_label_map(template, "spec.template.metadata.labels", sink);

    let selector = match deployment.selector_labels() {
        Some(selector) if !selector.is_empty() => selector,
        _ => {
            sink.error(
                Rule::SelectorEmpty,
                "spec.selector.matchLabels is missing or empty",
            );
            return;
        }
    };
    check_label_map(selector, "spec.selector.matchLabels", sink);

    match labels::compare(selector, template) {
        SelectorMatch::Equal => {}
        SelectorMatch::Subset { extra } => {
            let message = format!(
                "template labels not in the selector: {}",
                extra.join(", ")
            );
            if policy.strict_selector {
                sink.error(Rule::SelectorMismatch, message);
            } else {
                sink.warning(Rule::SelectorMismatch, message);
            }
        }
        SelectorMatch::Mismatch { missing } => sink.error(
            Rule::SelectorMismatch,
            format!(
                "selector does not match the pod template; missing from template labels: {}",
                missing.join(", ")
            ),
        ),
    }
}

fn check_containers(deployment: &Deployment, policy: &ValidationPolicy, sink: &mut Sink<'_>) {
    let containers = deployment.containers();
    if containers.is_empty() {
        sink.error(Rule::NoContainers, "pod template has no containers");
        return;
    }

    let mut seen = HashSet::new();
    for (index, container) in containers.iter().enumerate() {
        let label = if container.name.is_empty() {
            format!("containers[{index}]")
        } else {
            format!("container '{}'", container.name)
        };

        if container.name.is_empty() {
            sink.error(Rule::EmptyField, format!("{label} has an empty name"));
        } else {
            if let Err(reason) = naming::check_dns1123_label(&container.name) {
                sink.error(Rule::InvalidName, format!("{label}: {reason}"));
            }
            if !seen.insert(container.name.as_str()) {
                sink.error(
                    Rule::DuplicateContainer,
                    format!("{label} is defined more than once"),
                );
            }
        }

        check_image(container, &label, policy, sink);
        check_env(container, &label, sink);
    }
}

fn check_image(container: &Container, label: &str, policy: &ValidationPolicy, sink: &mut Sink<'_>) {
    if container.image.is_empty() {
        sink.error(Rule::EmptyField, format!("{label} has an empty image"));
        return;
    }

    match container.image_reference() {
        Ok(image) => {
            if policy.require_image_tag && image.is_floating() {
                sink.warning(
                    Rule::ImageTag,
                    format!(
                        "{label} image '{}' is not pinned to a tag or digest",
                        container.image
                    ),
                );
            }
        }
        Err(err) => sink.error(Rule::InvalidImage, format!("{label}: {err}")),
    }
}

fn check_env(container: &Container, label: &str, sink: &mut Sink<'_>) {
    let mut seen = HashSet::new();
    for env in container.env_vars() {
        if let Err(reason) = naming::check_env_name(&env.name) {
            sink.error(
                Rule::InvalidEnvName,
                format!("{label} env '{}': {reason}", env.name),
            );
        }
        if !seen.insert(env.name.as_str()) {
            sink.error(
                Rule::DuplicateEnv,
                format!("{label} sets env '{}' more than once", env.name),
            );
        }
    }
}

fn check_roundtrip(document: &Document, sink: &mut Sink<'_>) {
    match roundtrip::check(document) {
        Ok(differences) if differences.is_empty() => {}
        Ok(differences) => sink.error(
            Rule::RoundTrip,
            format!(
                "reserialized document differs at: {}",
                differences.join(", ")
            ),
        ),
        Err(err) => sink.error(Rule::RoundTrip, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestSet;

    const VALID: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: webserver
  labels:
    kubetools/project_name: generic-app
    kubetools/role: app
    kubetools/name: webserver
  annotations:
    app.kubernetes.io/managed-by: kubetools
spec:
  replicas: 2
  revisionHistoryLimit: 5
  selector:
    matchLabels:
      kubetools/name: webserver
      kubetools/role: app
  template:
    metadata:
      labels:
        kubetools/name: webserver
        kubetools/role: app
    spec:
      containers:
        - name: webserver
          image: generic-app/webserver:abc1234
          command: [uwsgi, --ini, /etc/uwsgi.ini]
          containerContext: generic-app
          env:
            - name: KUBE
              value: "true"
        - name: worker
          image: generic-app/webserver:abc1234
          command: [celery, worker]
          imagePullPolicy: IfNotPresent
          containerContext: generic-app
"#;

    fn findings_for(yaml: &str, policy: &ValidationPolicy) -> Vec<Finding> {
        let set = ManifestSet::from_content("app.yaml", yaml).unwrap();
        assert_eq!(set.len(), 1, "fixture must parse: {:?}", set.rejected());
        let mut out = Vec::new();
        check(&set.documents()[0], policy, &mut out);
        out
    }

    fn rules(findings: &[Finding]) -> Vec<Rule> {
        findings.iter().map(|finding| finding.rule).collect()
    }

    #[test]
    fn valid_document_has_no_findings() {
        let findings = findings_for(VALID, &ValidationPolicy::default());
        assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    }

    #[test]
    fn selector_subset_is_an_error_only_when_strict() {
        let yaml = VALID.replacen("      kubetools/role: app\n", "", 1);
        let strict = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(rules(&strict), vec![Rule::SelectorMismatch]);
        assert_eq!(strict[0].severity, Severity::Error);

        let lenient = ValidationPolicy {
            strict_selector: false,
            ..ValidationPolicy::default()
        };
        let findings = findings_for(&yaml, &lenient);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn selector_pointing_elsewhere_is_an_error() {
        let yaml = VALID.replacen(
            "      kubetools/name: webserver\n      kubetools/role: app\n  template:",
            "      kubetools/name: memcache-1\n      kubetools/role: app\n  template:",
            1,
        );
        let findings = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(rules(&findings), vec![Rule::SelectorMismatch]);
        assert!(findings[0].message.contains("kubetools/name=memcache-1"));
    }

    #[test]
    fn duplicate_env_and_container_names() {
        let yaml = VALID
            .replace(
                "            - name: KUBE\n              value: \"true\"\n",
                "            - name: KUBE\n              value: \"true\"\n            - name: KUBE\n              value: \"false\"\n",
            )
            .replace("        - name: worker\n", "        - name: webserver\n");
        let findings = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(
            rules(&findings),
            vec![Rule::DuplicateEnv, Rule::DuplicateContainer]
        );
    }

    #[test]
    fn missing_counts_and_annotations() {
        let yaml = VALID
            .replace("  replicas: 2\n", "")
            .replace("  revisionHistoryLimit: 5\n", "  revisionHistoryLimit: -1\n")
            .replace("  annotations:\n    app.kubernetes.io/managed-by: kubetools\n", "");
        let findings = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(
            rules(&findings),
            vec![Rule::MissingField, Rule::MissingField, Rule::NegativeCount]
        );

        let relaxed = ValidationPolicy {
            require_annotations: false,
            ..ValidationPolicy::default()
        };
        let findings = findings_for(&yaml, &relaxed);
        assert_eq!(rules(&findings), vec![Rule::MissingField, Rule::NegativeCount]);
    }

    #[test]
    fn empty_name_and_image() {
        let yaml = VALID
            .replace("        - name: worker\n", "        - name: \"\"\n")
            .replacen("image: generic-app/webserver:abc1234", "image: \"\"", 1);
        let findings = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(rules(&findings), vec![Rule::EmptyField, Rule::EmptyField]);
        assert!(findings[0].message.contains("empty image"));
        assert!(findings[1].message.contains("containers[1] has an empty name"));
    }

    #[test]
    fn floating_images_warn() {
        let yaml = VALID.replacen("generic-app/webserver:abc1234", "generic-app/webserver", 1);
        let findings = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(rules(&findings), vec![Rule::ImageTag]);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn identity_labels_and_api_version() {
        let yaml = VALID
            .replace("apiVersion: apps/v1", "apiVersion: extensions/v1beta1")
            .replace("    kubetools/project_name: generic-app\n", "");
        let findings = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(rules(&findings), vec![Rule::ApiVersion, Rule::IdentityLabels]);
        assert!(findings[1].message.contains("kubetools/project_name"));
    }

    #[test]
    fn invalid_names_and_labels() {
        let yaml = VALID
            .replace("  name: webserver\n  labels:", "  name: Web_Server\n  labels:")
            .replace("    kubetools/role: app\n    kubetools/name", "    kubetools/role: has space\n    kubetools/name")
            .replace("            - name: KUBE\n", "            - name: 1KUBE\n");
        let findings = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(
            rules(&findings),
            vec![Rule::InvalidName, Rule::InvalidLabel, Rule::InvalidEnvName]
        );
    }

    #[test]
    fn no_containers() {
        let start = VALID.find("      containers:").unwrap();
        let yaml = format!("{}      containers: []\n", &VALID[..start]);
        let findings = findings_for(&yaml, &ValidationPolicy::default());
        assert_eq!(rules(&findings), vec![Rule::NoContainers]);
    }
}
