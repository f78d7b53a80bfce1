//! Command-line interface for the stylesheet compiler.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Stylesheet compiler with pluggable diagnostics", long_about = None)]
pub struct Cli {
    /// Show the compiler's own operational logs (same as CASCADE_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile a stylesheet and print the CSS to standard output
    Compile(CompileArgs),
}

#[derive(Args)]
pub struct CompileArgs {
    pub file: PathBuf,

    /// Suppress all warnings and debug messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Include the surrounding source lines in spans
    #[arg(long)]
    pub context: bool,
}
