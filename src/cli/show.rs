//! Handler for `kubetools show`.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::ShowArgs;
use super::output;
use crate::config::Settings;
use crate::domain::labels::ENV_ANNOTATION_KEY;
use crate::domain::{Container, Deployment};
use crate::error::Result;
use crate::manifest::{Document, ManifestSet};

/// Shown in the Project column for Deployments without the managed-by annotation.
pub const NOT_MANAGED: &str = "NOT MANAGED BY KUBETOOLS";

#[derive(Tabled)]
struct DeploymentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Replicas")]
    replicas: String,
    #[tabled(rename = "Containers")]
    containers: usize,
    #[tabled(rename = "Version")]
    version: String,
}

#[derive(Tabled)]
struct ContainerRow {
    #[tabled(rename = "Deployment")]
    deployment: String,
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "Context")]
    context: String,
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Pull policy")]
    pull_policy: String,
    #[tabled(rename = "Env")]
    env: usize,
}

pub fn execute(args: &ShowArgs, settings: &Settings) -> Result<()> {
    let set = ManifestSet::load(&args.input.paths)?;
    set.ensure_complete()?;
    set.ensure_not_empty()?;

    let documents: Vec<&Document> = if args.apps.is_empty() {
        set.documents().iter().collect()
    } else {
        set.select(&args.apps)?
    };
    let namespace = settings.show.default_namespace.as_str();

    if args.containers {
        show_containers(&documents);
    } else {
        show_deployments(&documents, namespace);
    }
    Ok(())
}

/// Project column: the project label, or a marker when kubetools does not manage it.
fn project_cell(deployment: &Deployment) -> String {
    if !deployment.is_managed() {
        return NOT_MANAGED.to_string();
    }
    deployment.identity().project.unwrap_or("-").to_string()
}

fn deployment_row(deployment: &Deployment, namespace: &str) -> DeploymentRow {
    let version = deployment.version_info();
    DeploymentRow {
        name: deployment.app_name().to_string(),
        namespace: deployment.namespace_or(namespace).to_string(),
        role: deployment.identity().role.unwrap_or("-").to_string(),
        project: project_cell(deployment),
        replicas: deployment
            .spec
            .replicas
            .map_or_else(|| "-".to_string(), |n| n.to_string()),
        containers: deployment.containers().len(),
        version: if version.is_empty() { "-".to_string() } else { version },
    }
}

/// Effective pull policy, marked `(default)` when implied by the image tag.
fn pull_policy_cell(container: &Container) -> String {
    match container.effective_pull_policy() {
        Some((policy, true)) => format!("{policy} (default)"),
        Some((policy, false)) => policy.to_string(),
        None => "-".to_string(),
    }
}

fn container_row(deployment: &Deployment, container: &Container) -> ContainerRow {
    ContainerRow {
        deployment: deployment.app_name().to_string(),
        container: container.name.clone(),
        context: container
            .container_context
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        image: container.image.clone(),
        pull_policy: pull_policy_cell(container),
        env: container.env_vars().len(),
    }
}

fn show_deployments(documents: &[&Document], namespace: &str) {
    if output::is_json() {
        let items: Vec<_> = documents
            .iter()
            .map(|document| {
                let deployment = &document.deployment;
                let identity = deployment.identity();
                json!({
                    "name": deployment.app_name(),
                    "metadata_name": deployment.name(),
                    "namespace": deployment.namespace_or(namespace),
                    "role": identity.role,
                    "project": identity.project,
                    "managed": deployment.is_managed(),
                    "env": deployment.annotation(ENV_ANNOTATION_KEY),
                    "replicas": deployment.spec.replicas,
                    "containers": deployment.containers().len(),
                    "version": deployment.version_info(),
                    "source": document.source.to_string(),
                })
            })
            .collect();
        output::json_output(json!({ "command": "show", "deployments": items }));
        return;
    }

    let rows: Vec<DeploymentRow> = documents
        .iter()
        .map(|document| deployment_row(&document.deployment, namespace))
        .collect();

    output::section("Deployments");
    output::lines(&Table::new(rows).to_string());
}

fn show_containers(documents: &[&Document]) {
    if output::is_json() {
        let items: Vec<_> = documents
            .iter()
            .flat_map(|document| {
                let deployment = &document.deployment;
                deployment.containers().iter().map(move |container| {
                    let policy = container.effective_pull_policy();
                    json!({
                        "deployment": deployment.app_name(),
                        "container": container.name,
                        "context": container.container_context,
                        "image": container.image,
                        "pull_policy": policy.map(|(policy, _)| policy.to_string()),
                        "pull_policy_implied": policy.is_some_and(|(_, implied)| implied),
                        "env": container.env_vars().len(),
                    })
                })
            })
            .collect();
        output::json_output(json!({ "command": "show", "containers": items }));
        return;
    }

    let rows: Vec<ContainerRow> = documents
        .iter()
        .flat_map(|document| {
            let deployment = &document.deployment;
            deployment
                .containers()
                .iter()
                .map(move |container| container_row(deployment, container))
        })
        .collect();

    output::section("Containers");
    output::lines(&Table::new(rows).to_string());
}
