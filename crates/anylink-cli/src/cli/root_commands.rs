use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, TypesCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List the application's listening ports.
    Ports,
    /// Pair with the application and inspect stored credentials.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// List the spaces visible to this session.
    Spaces,
    /// Object types.
    Types {
        #[command(subcommand)]
        action: TypesCommands,
    },
    /// Extract the reference graph.
    Links(LinksArgs),
}

#[derive(Clone, Debug, Args)]
pub struct LinksArgs {
    /// Also write the JSON report to this file.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}
