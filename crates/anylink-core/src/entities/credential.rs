use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted credential state.
///
/// Fields missing from the credential file stay `None`; they are never
/// defaulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    /// Long-lived application key obtained from the challenge handshake.
    pub app_key: Option<String>,
    /// Unique key of the object type chosen through the type picker.
    pub default_type_key: Option<String>,
}

impl Credential {
    #[must_use]
    pub const fn has_app_key(&self) -> bool {
        self.app_key.is_some()
    }
}

/// Short-lived session token returned by session creation.
///
/// Lives for one run and is attached to every authenticated call. Never
/// persisted; `Debug` does not print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("t1");
        assert_eq!(token.as_str(), "t1");
        assert!(!format!("{token:?}").contains("t1"));
    }

    #[test]
    fn empty_credential_has_no_key() {
        let credential = Credential::default();
        assert!(!credential.has_app_key());
        assert!(credential.default_type_key.is_none());
    }
}
