//! Command-line interface definitions.
//!
//! Defines the CLI structure for kubetools using `clap`. Every manifest
//! command takes a list of files or directories (`-` reads standard input)
//! and defaults to the current directory.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::paths;
use crate::manifest::RenderFormat;

/// Load, validate and inspect Kubernetes Deployment manifests
#[derive(Parser, Debug)]
#[command(name = "kubetools")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the settings file
    #[arg(
        long,
        global = true,
        env = "KUBETOOLS_CONFIG",
        default_value_os_t = paths::default_config()
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the kubetools CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check manifests for schema, label and selector problems
    Validate(ValidateArgs),

    /// List deployments and their kubetools identity
    Show(ShowArgs),

    /// Print deployments as YAML or JSON
    Print(PrintArgs),

    /// Rewrite manifests in canonical form after a round-trip check
    Normalize(NormalizeArgs),

    /// Manage settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `kubetools config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a documented settings file.
    Init(ConfigInitArgs),
    /// Display the effective settings with defaults applied.
    Show,
    /// Validate the settings file.
    Validate,
}

/// Manifest inputs shared by every manifest command.
#[derive(Args, Debug, Clone)]
pub struct ManifestPaths {
    /// Manifest files or directories ("-" reads stdin)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: ManifestPaths,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub input: ManifestPaths,

    /// Only show these apps (by kubetools/name or metadata.name)
    #[arg(long = "app", value_name = "NAME")]
    pub apps: Vec<String>,

    /// List containers instead of deployments
    #[arg(long)]
    pub containers: bool,
}

#[derive(Args, Debug)]
pub struct PrintArgs {
    #[command(flatten)]
    pub input: ManifestPaths,

    /// Deployment to print; prompts on a terminal when omitted
    #[arg(long)]
    pub name: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub input: ManifestPaths,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to --config)
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum FormatArg {
    #[default]
    Yaml,
    Json,
}

impl From<FormatArg> for RenderFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Yaml => RenderFormat::Yaml,
            FormatArg::Json => RenderFormat::Json,
        }
    }
}
