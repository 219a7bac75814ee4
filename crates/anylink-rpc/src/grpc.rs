//! `ClientCommands` over a plaintext gRPC channel to the local application.

use std::time::Duration;

use anylink_core::entities::{SearchQuery, SearchResult, SessionToken};
use async_trait::async_trait;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint};

use crate::client::{ClientCommands, Operation};
use crate::error::RpcError;
use crate::proto;

/// Metadata key the application reads the session token from.
pub const TOKEN_METADATA_KEY: &str = "token";

/// gRPC client for the application's `ClientCommands` service.
///
/// Cloning is cheap; clones share the underlying HTTP/2 connection, which
/// multiplexes concurrent calls.
#[derive(Debug, Clone)]
pub struct GrpcClient {
    channel: Channel,
    timeout: Duration,
}

impl GrpcClient {
    /// Dial `http://{host}:{port}`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Transport`] if the address is invalid or the
    /// connection cannot be established within `timeout`.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, RpcError> {
        let uri = format!("http://{host}:{port}");
        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| RpcError::Transport(format!("invalid endpoint {uri}: {e}")))?
            .connect_timeout(timeout)
            .tcp_nodelay(true);

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| RpcError::Transport(format!("connect {uri}: {e}")))?;

        tracing::debug!(%uri, "connected to application endpoint");
        Ok(Self { channel, timeout })
    }

    async fn unary<Req, Resp>(
        &self,
        operation: Operation,
        request: tonic::Request<Req>,
    ) -> Result<Resp, RpcError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| RpcError::Transport(format!("{operation} channel not ready: {e}")))?;

        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let path = PathAndQuery::from_static(operation.path());

        let response = tokio::time::timeout(self.timeout, grpc.unary(request, path, codec))
            .await
            .map_err(|_| RpcError::Timeout {
                operation,
                after: self.timeout,
            })?
            .map_err(|status| RpcError::from_status(operation, &status))?;

        Ok(response.into_inner())
    }
}

/// Turn a non-zero application error code into [`RpcError::Rejected`].
fn check(operation: Operation, error: Option<&proto::ResponseError>) -> Result<(), RpcError> {
    match error {
        Some(error) if error.code != 0 => Err(RpcError::Rejected {
            operation,
            code: error.code,
            description: error.description.clone(),
        }),
        _ => Ok(()),
    }
}

fn authenticated<T>(message: T, token: &SessionToken) -> Result<tonic::Request<T>, RpcError> {
    let value: MetadataValue<Ascii> = token
        .as_str()
        .parse()
        .map_err(|_| RpcError::InvalidMetadata("session token is not valid ASCII metadata".into()))?;
    let mut request = tonic::Request::new(message);
    request.metadata_mut().insert(TOKEN_METADATA_KEY, value);
    Ok(request)
}

#[async_trait]
impl ClientCommands for GrpcClient {
    async fn new_challenge(&self, app_name: &str) -> Result<String, RpcError> {
        let request = tonic::Request::new(proto::NewChallengeRequest {
            app_name: app_name.to_string(),
        });
        let response: proto::NewChallengeResponse =
            self.unary(Operation::NewChallenge, request).await?;
        check(Operation::NewChallenge, response.error.as_ref())?;
        Ok(response.challenge_id)
    }

    async fn solve_challenge(&self, challenge_id: &str, answer: &str) -> Result<String, RpcError> {
        let request = tonic::Request::new(proto::SolveChallengeRequest {
            challenge_id: challenge_id.to_string(),
            answer: answer.to_string(),
        });
        let response: proto::SolveChallengeResponse =
            self.unary(Operation::SolveChallenge, request).await?;
        check(Operation::SolveChallenge, response.error.as_ref())?;
        Ok(response.app_key)
    }

    async fn create_session(&self, app_key: &str) -> Result<SessionToken, RpcError> {
        let request = tonic::Request::new(proto::CreateSessionRequest {
            app_key: app_key.to_string(),
        });
        let response: proto::CreateSessionResponse =
            self.unary(Operation::CreateSession, request).await?;
        check(Operation::CreateSession, response.error.as_ref())?;
        Ok(SessionToken::new(response.token))
    }

    async fn search_with_meta(
        &self,
        token: &SessionToken,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, RpcError> {
        let request = authenticated(
            proto::SearchWithMetaRequest {
                full_text: query.full_text.clone(),
                offset: 0,
                limit: 0,
                return_meta: query.with_highlights,
            },
            token,
        )?;
        let response: proto::SearchWithMetaResponse =
            self.unary(Operation::SearchWithMeta, request).await?;
        check(Operation::SearchWithMeta, response.error.as_ref())?;

        let results = response
            .results
            .into_iter()
            .map(|record| {
                let fields = record.details.map(proto::struct_to_map).unwrap_or_default();
                let highlights = record
                    .meta
                    .into_iter()
                    .map(|meta| meta.highlight)
                    .filter(|highlight| !highlight.is_empty())
                    .collect();
                SearchResult::from_details(record.object_id, fields, highlights)
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            full_text = %query.full_text,
            results = results.len(),
            "search completed"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_error_code_is_success() {
        let ok = proto::ResponseError {
            code: 0,
            description: String::new(),
        };
        assert!(check(Operation::CreateSession, Some(&ok)).is_ok());
        assert!(check(Operation::CreateSession, None).is_ok());
    }

    #[test]
    fn non_zero_error_code_is_rejection() {
        let bad = proto::ResponseError {
            code: 102,
            description: "invalid app key".into(),
        };
        let err = check(Operation::CreateSession, Some(&bad)).unwrap_err();
        assert!(matches!(err, RpcError::Rejected { code: 102, .. }));
        assert!(err.to_string().contains("invalid app key"));
    }

    #[test]
    fn token_is_attached_as_metadata() {
        let request = authenticated((), &SessionToken::new("t1")).unwrap();
        let value = request.metadata().get(TOKEN_METADATA_KEY).unwrap();
        assert_eq!(value.to_str().unwrap(), "t1");
    }

    #[test]
    fn non_ascii_token_is_rejected() {
        let err = authenticated((), &SessionToken::new("t\u{7f}\n")).unwrap_err();
        assert!(matches!(err, RpcError::InvalidMetadata(_)));
    }
}
