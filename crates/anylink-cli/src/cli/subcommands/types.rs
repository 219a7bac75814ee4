use clap::{Args, Subcommand};

/// Object type commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TypesCommands {
    /// List object types with their unique keys.
    List,
    /// Choose the default object type and store it as TYPE_ID.
    Pick(TypesPickArgs),
}

#[derive(Clone, Debug, Args)]
pub struct TypesPickArgs {
    /// Type number or (fuzzy) name. Prompts when omitted.
    pub query: Option<String>,
}
