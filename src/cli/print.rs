//! Handler for `kubetools print`.

use std::io::IsTerminal;

use dialoguer::Select;
use tracing::debug;

use super::command::PrintArgs;
use super::output;
use crate::error::{ManifestError, Result};
use crate::manifest::{roundtrip, Document, ManifestSet, RenderFormat, STDIN_PATH};

const EXIT_ITEM: &str = "exit";

pub fn execute(args: &PrintArgs) -> Result<()> {
    let set = ManifestSet::load(&args.input.paths)?;
    set.ensure_complete()?;
    set.ensure_not_empty()?;

    let format = if output::is_json() {
        RenderFormat::Json
    } else {
        RenderFormat::from(args.format)
    };

    if let Some(name) = &args.name {
        let document = set.find(name).ok_or_else(|| ManifestError::NotFound {
            names: vec![name.clone()],
        })?;
        return print_documents(&[document], format);
    }

    if is_interactive(args) && set.len() > 1 {
        return prompt_loop(&set, format);
    }

    let documents: Vec<&Document> = set.documents().iter().collect();
    print_documents(&documents, format)
}

/// A prompt needs a person on both ends and no scripting flags.
fn is_interactive(args: &PrintArgs) -> bool {
    let reads_stdin = args
        .input
        .paths
        .iter()
        .any(|path| path.as_os_str() == STDIN_PATH);

    !output::is_json()
        && !reads_stdin
        && std::io::stdin().is_terminal()
        && std::io::stdout().is_terminal()
}

fn prompt_loop(set: &ManifestSet, format: RenderFormat) -> Result<()> {
    let mut items: Vec<&str> = set.deployments().map(|d| d.app_name()).collect();
    items.push(EXIT_ITEM);
    let exit = items.len() - 1;

    loop {
        let choice = Select::new()
            .with_prompt("Deployment to print")
            .items(&items)
            .default(exit)
            .interact_opt()?;

        match choice {
            Some(index) if index < exit => {
                debug!(deployment = items[index], "printing selected deployment");
                print_documents(&[&set.documents()[index]], format)?;
            }
            _ => return Ok(()),
        }
    }
}

fn print_documents(documents: &[&Document], format: RenderFormat) -> Result<()> {
    let rendered = roundtrip::render(
        documents.iter().map(|document| &document.deployment),
        format,
    )?;
    output::raw(&rendered);
    Ok(())
}
