//! CLI module graph and command dispatch.

pub mod command;
pub mod config;
pub mod diagnostic;
pub mod normalize;
pub mod output;
pub mod paths;
pub mod print;
pub mod show;
pub mod validate;

use tracing::info;

use self::command::{Cli, ColorChoice, Commands, ConfigCommand};
use crate::config::{LoggingConfig, Settings};
use crate::error::Result;

/// Apply global output flags before any command runs.
pub fn configure(cli: &Cli) {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
}

/// Run the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Config(command) = &cli.command {
        // Settings commands must work while the settings file is broken.
        LoggingConfig::default().init(cli.verbose, cli.quiet);
        return match command {
            ConfigCommand::Init(args) => {
                config::execute_init(args.path.as_deref().unwrap_or(&cli.config), args.force)
            }
            ConfigCommand::Show => {
                let (settings, found) = Settings::load_or_default(&cli.config)?;
                config::execute_show(&settings, &cli.config, found)
            }
            ConfigCommand::Validate => config::execute_validate(&cli.config),
        };
    }

    let (settings, found) = Settings::load_or_default(&cli.config)?;
    settings.logging.init(cli.verbose, cli.quiet);
    if found {
        info!(path = %cli.config.display(), "loaded settings");
    } else {
        info!(path = %cli.config.display(), "no settings file, using defaults");
    }

    match &cli.command {
        Commands::Validate(args) => validate::execute(args, &settings),
        Commands::Show(args) => show::execute(args, &settings),
        Commands::Print(args) => print::execute(args),
        Commands::Normalize(args) => normalize::execute(args),
        Commands::Config(_) => Ok(()),
    }
}
