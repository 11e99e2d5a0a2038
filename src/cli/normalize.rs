//! Handler for `kubetools normalize`.

use std::fs;

use serde_json::json;
use tracing::info;

use super::command::NormalizeArgs;
use super::output;
use crate::error::Result;
use crate::manifest::{roundtrip, ManifestSet, RenderFormat};

pub fn execute(args: &NormalizeArgs) -> Result<()> {
    let set = ManifestSet::load(&args.input.paths)?;
    set.ensure_complete()?;
    set.ensure_not_empty()?;

    for document in set.documents() {
        roundtrip::ensure_lossless(document)?;
    }

    let rendered = roundtrip::render(set.deployments(), RenderFormat::Yaml)?;

    let Some(path) = &args.output else {
        if output::is_json() {
            output::json_output(json!({
                "command": "normalize",
                "deployments": set.len(),
                "content": rendered,
            }));
        } else {
            output::raw(&rendered);
        }
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &rendered)?;
    info!(path = %path.display(), deployments = set.len(), "wrote normalized manifests");

    if output::is_json() {
        output::json_output(json!({
            "command": "normalize",
            "path": path.display().to_string(),
            "deployments": set.len(),
        }));
    } else {
        output::success(&format!(
            "Wrote {} deployment(s) to {}",
            set.len(),
            path.display()
        ));
    }
    Ok(())
}
