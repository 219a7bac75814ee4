//! Transport and discovery error types.

use std::time::Duration;

use thiserror::Error;

use crate::client::Operation;

/// Failure talking to the remote service.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Channel could not be established or broke mid-call.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call completed with a non-OK gRPC status.
    #[error("{operation} failed with status {code:?}: {message}")]
    Status {
        operation: Operation,
        code: tonic::Code,
        message: String,
    },

    /// The call reached the application, which answered with an error code.
    #[error("{operation} rejected by remote (code {code}): {description}")]
    Rejected {
        operation: Operation,
        code: i32,
        description: String,
    },

    /// No answer within the per-call timeout.
    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: Operation, after: Duration },

    /// The session token cannot be carried as call metadata.
    #[error("invalid call metadata: {0}")]
    InvalidMetadata(String),
}

impl RpcError {
    pub(crate) fn from_status(operation: Operation, status: &tonic::Status) -> Self {
        Self::Status {
            operation,
            code: status.code(),
            message: status.message().to_string(),
        }
    }

    /// Whether a retry of an idempotent call could succeed.
    ///
    /// Application-level rejections and malformed metadata never are.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => true,
            Self::Status { code, .. } => matches!(
                code,
                tonic::Code::Unavailable
                    | tonic::Code::DeadlineExceeded
                    | tonic::Code::ResourceExhausted
                    | tonic::Code::Aborted
            ),
            Self::Rejected { .. } | Self::InvalidMetadata(_) => false,
        }
    }

    /// Whether the remote application itself refused the request.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. }
                | Self::Status {
                    code: tonic::Code::Unauthenticated | tonic::Code::PermissionDenied,
                    ..
                }
        )
    }
}

/// Failure locating the service on the local host.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The host does not expose a socket table to this process.
    #[error("cannot list host sockets: {0}")]
    SocketTableUnavailable(String),

    /// A socket's owning process could not be inspected.
    #[error("cannot inspect process {pid}: {reason}")]
    ProcessInspection { pid: u32, reason: String },

    /// No listening process matched the filter.
    #[error("no process matching '{filter}' is listening; start the application and retry")]
    NotRunning { filter: String },
}
