//! Scripted in-memory [`ClientCommands`] for tests in this and downstream
//! crates. Enabled by the `test-support` feature.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use anylink_core::entities::{SearchQuery, SearchResult, SessionToken};
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::client::{ClientCommands, Operation};
use crate::error::RpcError;

/// One call observed by [`FakeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    NewChallenge { app_name: String },
    SolveChallenge { challenge_id: String, answer: String },
    CreateSession { app_key: String },
    Search { token: String, full_text: String, with_highlights: bool },
}

#[derive(Default)]
struct FakeState {
    challenge: Option<(String, String, String)>,
    sessions: HashMap<String, String>,
    objects: Vec<SearchResult>,
    scripted: HashMap<String, Vec<SearchResult>>,
    transient_failures: u32,
    calls: Vec<RecordedCall>,
}

/// In-memory stand-in for the application.
///
/// Searches return the scripted response for the exact full text when one is
/// registered, otherwise every object whose name contains the full text
/// case-insensitively.
#[derive(Default)]
pub struct FakeClient {
    state: Mutex<FakeState>,
}

impl FakeClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `code` for challenge `challenge_id`, yielding `app_key`.
    #[must_use]
    pub fn with_challenge(self, challenge_id: &str, code: &str, app_key: &str) -> Self {
        self.lock().challenge = Some((challenge_id.into(), code.into(), app_key.into()));
        self
    }

    /// Accept `app_key` for session creation, yielding `token`.
    #[must_use]
    pub fn with_session(self, app_key: &str, token: &str) -> Self {
        self.lock().sessions.insert(app_key.into(), token.into());
        self
    }

    #[must_use]
    pub fn with_object(self, object: SearchResult) -> Self {
        self.lock().objects.push(object);
        self
    }

    /// Answer searches for exactly `full_text` with `results`.
    #[must_use]
    pub fn with_search_response(self, full_text: &str, results: Vec<SearchResult>) -> Self {
        self.lock().scripted.insert(full_text.into(), results);
        self
    }

    /// Fail the next `count` searches with a transient transport error.
    #[must_use]
    pub fn with_transient_search_failures(self, count: u32) -> Self {
        self.lock().transient_failures = count;
        self
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Build a search result the way the transport does.
#[must_use]
pub fn object(object_id: &str, name: &str, space_id: &str, highlights: &[&str]) -> SearchResult {
    let fields: BTreeMap<String, Value> = BTreeMap::from([
        ("name".to_string(), json!(name)),
        ("spaceId".to_string(), json!(space_id)),
        ("layout".to_string(), json!(0.0)),
    ]);
    SearchResult::from_details(
        object_id,
        fields,
        highlights.iter().map(|h| (*h).to_string()).collect(),
    )
}

/// Build an object-type record with a `uniqueKey`.
#[must_use]
pub fn object_type(object_id: &str, name: &str, unique_key: &str) -> SearchResult {
    let fields: BTreeMap<String, Value> = BTreeMap::from([
        ("name".to_string(), json!(name)),
        ("spaceId".to_string(), json!("space-types")),
        ("layout".to_string(), json!(4.0)),
        ("uniqueKey".to_string(), json!(unique_key)),
    ]);
    SearchResult::from_details(object_id, fields, Vec::new())
}

fn rejected(operation: Operation, description: &str) -> RpcError {
    RpcError::Rejected {
        operation,
        code: 1,
        description: description.to_string(),
    }
}

#[async_trait]
impl ClientCommands for FakeClient {
    async fn new_challenge(&self, app_name: &str) -> Result<String, RpcError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::NewChallenge {
            app_name: app_name.to_string(),
        });
        state
            .challenge
            .as_ref()
            .map(|(id, _, _)| id.clone())
            .ok_or_else(|| rejected(Operation::NewChallenge, "challenges disabled"))
    }

    async fn solve_challenge(&self, challenge_id: &str, answer: &str) -> Result<String, RpcError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::SolveChallenge {
            challenge_id: challenge_id.to_string(),
            answer: answer.to_string(),
        });
        match &state.challenge {
            Some((id, code, key)) if id == challenge_id && code == answer => Ok(key.clone()),
            _ => Err(rejected(Operation::SolveChallenge, "wrong answer")),
        }
    }

    async fn create_session(&self, app_key: &str) -> Result<SessionToken, RpcError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::CreateSession {
            app_key: app_key.to_string(),
        });
        state
            .sessions
            .get(app_key)
            .map(SessionToken::new)
            .ok_or_else(|| rejected(Operation::CreateSession, "invalid app key"))
    }

    async fn search_with_meta(
        &self,
        token: &SessionToken,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, RpcError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Search {
            token: token.as_str().to_string(),
            full_text: query.full_text.clone(),
            with_highlights: query.with_highlights,
        });

        if state.transient_failures > 0 {
            state.transient_failures -= 1;
            return Err(RpcError::Transport("connection reset by peer".into()));
        }
        if !state.sessions.values().any(|t| t == token.as_str()) {
            return Err(RpcError::Status {
                operation: Operation::SearchWithMeta,
                code: tonic::Code::Unauthenticated,
                message: "unknown session token".into(),
            });
        }

        if let Some(results) = state.scripted.get(&query.full_text) {
            return Ok(results.clone());
        }
        let needle = query.full_text.to_lowercase();
        Ok(state
            .objects
            .iter()
            .filter(|object| object.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
