//! Handler for `kubetools validate`.

use serde_json::json;
use tracing::info;

use super::command::ValidateArgs;
use super::output;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::manifest::ManifestSet;
use crate::validate::{Finding, Report, Severity, Validator};

pub fn execute(args: &ValidateArgs, settings: &Settings) -> Result<()> {
    let set = ManifestSet::load(&args.input.paths)?;
    let report = Validator::new(&settings.validation)
        .with_default_namespace(&settings.show.default_namespace)
        .run(&set);

    let strict = args.strict || settings.validation.warnings_as_errors;
    let passed = report.passes(strict);
    info!(
        errors = report.errors(),
        warnings = report.warnings(),
        strict,
        passed,
        "validation complete"
    );

    if output::is_json() {
        output::json_output(json!({
            "command": "validate",
            "inputs": set.inputs(),
            "documents": report.documents(),
            "skipped": set.skipped().len(),
            "errors": report.errors(),
            "warnings": report.warnings(),
            "strict": strict,
            "passed": passed,
            "findings": report.findings().iter().map(finding_json).collect::<Vec<_>>(),
        }));
    } else {
        print_report(&set, &report, passed);
    }

    if passed {
        Ok(())
    } else {
        Err(Error::ValidationFailed {
            errors: report.errors(),
            warnings: report.warnings(),
        })
    }
}

fn finding_json(finding: &Finding) -> serde_json::Value {
    json!({
        "severity": finding.severity.as_str(),
        "rule": finding.rule.code(),
        "source": finding.source.as_ref().map(ToString::to_string),
        "deployment": finding.deployment,
        "message": finding.message,
    })
}

fn print_report(set: &ManifestSet, report: &Report, passed: bool) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Validating");
    output::field("Inputs", set.inputs().join(", "));
    output::field("Deployments", report.documents());
    if !set.skipped().is_empty() {
        output::field("Skipped", format!("{} (not Deployments)", set.skipped().len()));
        if output::verbosity() > 0 {
            for skipped in set.skipped() {
                output::note(&format!("{} ({})", skipped.source, skipped.kind));
            }
        }
    }

    if !report.findings().is_empty() {
        output::section("Findings");
        for finding in report.findings() {
            let line = finding.to_string();
            match finding.severity {
                Severity::Error => output::problem(&line),
                Severity::Warning => output::warning(&line),
            }
        }
    }

    output::section("Summary");
    let counts = format!(
        "{} error(s), {} warning(s) in {} deployment(s)",
        report.errors(),
        report.warnings(),
        report.documents()
    );
    if passed {
        output::success(&counts);
    } else {
        output::problem(&counts);
        if report.errors() == 0 {
            output::hint("warnings fail this run because of --strict or validation.warnings_as_errors");
        }
    }
}
