use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `anylink` binary.
#[derive(Debug, Parser)]
#[command(
    name = "anylink",
    version,
    about = "anylink - reference graph of a running Anytype"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Connect to this port instead of discovering one
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Credential file (defaults to store.env_file, usually .env)
    #[arg(short, long, global = true)]
    pub env_file: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            port: self.port,
            env_file: self.env_file.clone(),
        }
    }
}
