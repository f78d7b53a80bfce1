//! Cascade compiler CLI entry point.

mod cli;

use std::process::ExitCode;

use cascade::{CascadeDatabaseImpl, CompileOptions, SILENT, compile_path};
use clap::Parser;
use cli::{Cli, Command, CompileArgs};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compile(args) => compile(args),
    }
}

/// Operational logs go to standard error, filtered by `CASCADE_LOG`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "cascade=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CASCADE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn compile(args: CompileArgs) -> ExitCode {
    let db = CascadeDatabaseImpl::default();
    let options = CompileOptions {
        logger: args.quiet.then_some(&*SILENT),
        include_context: args.context,
        ..Default::default()
    };
    match compile_path(&db, &args.file, &options) {
        Ok(css) => {
            print!("{css}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
