//! # anylink-rpc
//!
//! Everything between this process and the note-graph application:
//! - Endpoint discovery over the host socket table
//! - The [`ClientCommands`] capability and its gRPC implementation
//! - The authenticated [`Session`] passed to every component
//! - Bounded retry for idempotent calls

pub mod client;
pub mod discovery;
pub mod error;
pub mod grpc;
pub mod proto;
pub mod retry;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::{ClientCommands, Operation};
pub use error::{DiscoveryError, RpcError};
pub use grpc::GrpcClient;
pub use retry::RetryConfig;
pub use session::Session;
