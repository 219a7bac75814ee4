use serde::{Deserialize, Serialize};

/// A TCP socket in listening state owned by a host process.
///
/// Snapshot taken while enumerating the host socket table; discarded once
/// the primary port is selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ListeningEndpoint {
    pub pid: u32,
    pub process_name: String,
    pub port: u16,
    /// OS socket ordinal (inode on Linux), when the platform exposes one.
    pub ordinal: Option<u64>,
}
