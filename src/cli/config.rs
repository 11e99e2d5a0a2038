//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use super::output;
use crate::config::Settings;
use crate::error::{ConfigError, Result};

/// Default settings template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../kubetools.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            ),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.init",
            "path": path.display().to_string(),
        }));
        return Ok(());
    }

    output::section("Settings Initialized");
    output::success("Created settings file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} to suit your manifests", path.display()));
    output::note(&format!(
        "2. Run: kubetools --config {} config validate",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(settings: &Settings, path: &Path, found: bool) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "found": found,
            "settings": serde_json::to_value(settings)?,
        }));
        return Ok(());
    }

    output::section("Effective Settings");
    output::field("Path", path.display());
    if !found {
        output::note("(file not found, showing defaults)");
    }

    output::section("Logging");
    output::field("Level", &settings.logging.level);
    output::field("Format", &settings.logging.format);

    let policy = &settings.validation;
    output::section("Validation");
    output::field("API versions", policy.allowed_api_versions.join(", "));
    output::field("Selector", if policy.strict_selector { "strict" } else { "subset" });
    output::field("Annotations", required(policy.require_annotations));
    output::field("Identity", required(policy.require_identity_labels));
    output::field("Image tag", required(policy.require_image_tag));
    output::field(
        "Warnings",
        if policy.warnings_as_errors {
            "fail"
        } else {
            "report"
        },
    );

    output::section("Show");
    output::field("Namespace", &settings.show.default_namespace);

    output::section("As TOML");
    output::lines(&settings.to_toml()?);
    Ok(())
}

fn required(flag: bool) -> &'static str {
    if flag {
        "required"
    } else {
        "optional"
    }
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let settings = Settings::load(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
        }));
        return Ok(());
    }

    output::section("Settings Validation");
    output::field("Path", path.display());
    output::success("Settings file is valid");
    if settings.validation.warnings_as_errors {
        output::note("Warnings will fail validation runs");
    }
    Ok(())
}
