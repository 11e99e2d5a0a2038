use std::process::ExitCode;

use clap::Parser;
use kubetools::cli::command::Cli;
use kubetools::cli::{self, diagnostic, output};
use kubetools::error::Error;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cli::configure(&cli);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(err);
            ExitCode::FAILURE
        }
    }
}

fn report(err: Error) {
    if output::is_json() {
        output::error(&err.to_string());
        return;
    }
    eprintln!("{:?}", diagnostic::report(err));
}
