//! Append-only `KEY=value` credential file.
//!
//! The file is read with `dotenvy`; when a key occurs more than once the
//! last line wins. Values are never edited in place: a new value is appended
//! and shadows the old one on the next load.
//!
//! Single-process, single-run usage only. There is no locking; two
//! concurrent writers can lose an append.

use std::collections::HashMap;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anylink_core::entities::Credential;

use crate::error::AuthError;

/// Key holding the application key from the challenge handshake.
pub const APP_KEY: &str = "APP_KEY";
/// Key holding the default object-type unique key.
pub const TYPE_ID: &str = "TYPE_ID";

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the credential. A missing file is an empty credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the file exists but cannot be parsed.
    pub fn load(&self) -> Result<Credential, AuthError> {
        let mut entries = self.entries()?;
        Ok(Credential {
            app_key: entries.remove(APP_KEY).filter(|v| !v.is_empty()),
            default_type_key: entries.remove(TYPE_ID).filter(|v| !v.is_empty()),
        })
    }

    /// Every key in the file, last occurrence winning.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the file exists but cannot be parsed.
    pub fn entries(&self) -> Result<HashMap<String, String>, AuthError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let iter = dotenvy::from_path_iter(&self.path)
            .map_err(|e| AuthError::Store(format!("open {}: {e}", self.path.display())))?;

        let mut entries = HashMap::new();
        for item in iter {
            let (key, value) =
                item.map_err(|e| AuthError::Store(format!("parse {}: {e}", self.path.display())))?;
            entries.insert(key, value);
        }
        Ok(entries)
    }

    /// Durably append `key=value`.
    ///
    /// The current content plus the new line is written to a temporary file
    /// beside the target, synced, and renamed over it, so readers see either
    /// the old file or the complete new one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the pair is not representable in the
    /// file format or any filesystem step fails.
    pub fn append(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let line = format_line(key, value)?;

        let mut content = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(AuthError::Store(format!("read {}: {e}", self.path.display())));
            }
        };
        if !content.is_empty() && !content.ends_with(b"\n") {
            content.push(b'\n');
        }
        content.extend_from_slice(line.as_bytes());

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .map_err(|e| AuthError::Store(format!("mkdir {}: {e}", dir.display())))?;

        // NamedTempFile is created 0600 on unix.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| AuthError::Store(format!("temp file in {}: {e}", dir.display())))?;
        tmp.write_all(&content)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| AuthError::Store(format!("write {}: {e}", tmp.path().display())))?;
        tmp.persist(&self.path)
            .map_err(|e| AuthError::Store(format!("replace {}: {}", self.path.display(), e.error)))?;

        tracing::debug!(key, path = %self.path.display(), "appended credential entry");
        Ok(())
    }
}

/// Render one line, single-quoting values `dotenvy` would otherwise
/// interpret (whitespace, `#`, `$`, quotes, backslashes).
fn format_line(key: &str, value: &str) -> Result<String, AuthError> {
    let key_ok = !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !key_ok {
        return Err(AuthError::Store(format!("invalid credential key '{key}'")));
    }
    if value.contains(['\n', '\r']) {
        return Err(AuthError::Store(format!("value for {key} spans multiple lines")));
    }

    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '$' | '"' | '\\' | '\''));
    if !needs_quotes {
        return Ok(format!("{key}={value}\n"));
    }
    if value.contains('\'') {
        return Err(AuthError::Store(format!(
            "value for {key} mixes quotes and special characters"
        )));
    }
    Ok(format!("{key}='{value}'\n"))
}
