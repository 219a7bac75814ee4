pub mod auth;
pub mod types;

pub use auth::{AuthCommands, AuthLoginArgs};
pub use types::{TypesCommands, TypesPickArgs};
