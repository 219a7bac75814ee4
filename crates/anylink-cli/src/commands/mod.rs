pub mod auth;
pub mod dispatch;
pub mod links;
pub mod ports;
pub mod spaces;
pub mod types;
