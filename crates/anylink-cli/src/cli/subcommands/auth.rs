use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Pair with the application (prompts for the code it displays).
    Login(AuthLoginArgs),
    /// Show stored credentials and whether they open a session.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Code shown by the application. Repeat to supply fallbacks; when
    /// omitted the code is read from stdin.
    #[arg(long)]
    pub code: Vec<String>,
}
