//! Endpoint locator: find the application's listening port on this host.
//!
//! The host socket table is read through [`SocketTable`] so selection logic
//! can be exercised without touching the OS. [`SystemSocketTable`] reads
//! TCP sockets with `netstat2` and process names with `sysinfo`.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use anylink_core::entities::ListeningEndpoint;
use anylink_core::enums::SelectionPolicy;

use crate::error::DiscoveryError;

/// One TCP socket as seen in the host socket table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEntry {
    pub pid: u32,
    pub port: u16,
    pub listening: bool,
    pub ordinal: Option<u64>,
}

/// Read-only view of host sockets and their owning processes.
pub trait SocketTable {
    /// All TCP sockets with at least one owning process.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::SocketTableUnavailable`] when the host does
    /// not expose a socket listing to this process.
    fn sockets(&self) -> Result<Vec<SocketEntry>, DiscoveryError>;

    /// Executable name of `pid`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ProcessInspection`] if the process cannot be
    /// inspected (gone, or not visible to this user).
    fn process_name(&self, pid: u32) -> Result<String, DiscoveryError>;
}

/// Every listening endpoint whose owning process name contains `filter`,
/// compared case-insensitively. Sorted by port, then pid.
///
/// An empty result means the application is not running; that is not an
/// error.
///
/// # Errors
///
/// Returns [`DiscoveryError`] if the socket table cannot be read or a
/// listening socket's process cannot be inspected.
pub fn locate<T: SocketTable + ?Sized>(
    table: &T,
    filter: &str,
) -> Result<Vec<ListeningEndpoint>, DiscoveryError> {
    let needle = filter.to_lowercase();
    let mut names: HashMap<u32, String> = HashMap::new();
    let mut seen: BTreeSet<(u16, u32)> = BTreeSet::new();
    let mut endpoints = Vec::new();

    for entry in table.sockets()? {
        if !entry.listening {
            continue;
        }
        let name = match names.get(&entry.pid) {
            Some(name) => name.clone(),
            None => {
                let name = table.process_name(entry.pid)?;
                names.insert(entry.pid, name.clone());
                name
            }
        };
        if !name.to_lowercase().contains(&needle) {
            continue;
        }
        // IPv4 and IPv6 listeners on the same port collapse into one.
        if !seen.insert((entry.port, entry.pid)) {
            continue;
        }
        endpoints.push(ListeningEndpoint {
            pid: entry.pid,
            process_name: name,
            port: entry.port,
            ordinal: entry.ordinal,
        });
    }

    endpoints.sort_by_key(|endpoint| (endpoint.port, endpoint.pid));
    tracing::debug!(filter, candidates = endpoints.len(), "located listening endpoints");
    Ok(endpoints)
}

/// Pick the primary endpoint according to `policy`.
///
/// `MostRecent` takes the highest ordinal; endpoints without an ordinal
/// rank below all others, and ties fall back to the lowest port.
#[must_use]
pub fn select(endpoints: &[ListeningEndpoint], policy: SelectionPolicy) -> Option<&ListeningEndpoint> {
    match policy {
        SelectionPolicy::LowestPort => endpoints.iter().min_by_key(|endpoint| endpoint.port),
        SelectionPolicy::MostRecent => endpoints.iter().max_by(|a, b| {
            a.ordinal
                .cmp(&b.ordinal)
                .then_with(|| b.port.cmp(&a.port))
        }),
    }
}

/// Locate and select in one step.
///
/// # Errors
///
/// Returns [`DiscoveryError::NotRunning`] when nothing matches, in addition
/// to the errors of [`locate`].
pub fn discover<T: SocketTable + ?Sized>(
    table: &T,
    filter: &str,
    policy: SelectionPolicy,
) -> Result<ListeningEndpoint, DiscoveryError> {
    let endpoints = locate(table, filter)?;
    let selected = select(&endpoints, policy).cloned().ok_or_else(|| DiscoveryError::NotRunning {
        filter: filter.to_string(),
    })?;
    tracing::info!(
        port = selected.port,
        pid = selected.pid,
        %policy,
        "selected application endpoint"
    );
    Ok(selected)
}

/// Socket table backed by the running host.
///
/// The process list is refreshed each time the socket table is read, and a
/// pid missing from that snapshot is looked up once more before it counts as
/// uninspectable, so a listener whose process started in between still
/// resolves.
pub struct SystemSocketTable {
    system: RefCell<sysinfo::System>,
}

impl SystemSocketTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: RefCell::new(sysinfo::System::new()),
        }
    }
}

impl Default for SystemSocketTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketTable for SystemSocketTable {
    fn sockets(&self) -> Result<Vec<SocketEntry>, DiscoveryError> {
        use netstat2::{AddressFamilyFlags, ProtocolFlags, ProtocolSocketInfo, TcpState};

        let families = AddressFamilyFlags::IPV4 | AddressFamilyFlags::IPV6;
        let sockets = netstat2::get_sockets_info(families, ProtocolFlags::TCP)
            .map_err(|e| DiscoveryError::SocketTableUnavailable(e.to_string()))?;

        let mut entries = Vec::new();
        for socket in sockets {
            let ProtocolSocketInfo::Tcp(tcp) = &socket.protocol_socket_info else {
                continue;
            };
            let ordinal = socket_ordinal(&socket);
            for pid in &socket.associated_pids {
                entries.push(SocketEntry {
                    pid: *pid,
                    port: tcp.local_port,
                    listening: tcp.state == TcpState::Listen,
                    ordinal,
                });
            }
        }

        self.system.borrow_mut().refresh_processes();
        Ok(entries)
    }

    fn process_name(&self, pid: u32) -> Result<String, DiscoveryError> {
        let key = sysinfo::Pid::from_u32(pid);
        let mut system = self.system.borrow_mut();
        if system.process(key).is_none() {
            system.refresh_process(key);
        }
        system
            .process(key)
            .map(|process| process.name().to_string())
            .ok_or_else(|| DiscoveryError::ProcessInspection {
                pid,
                reason: "process not visible (exited or access denied)".into(),
            })
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn socket_ordinal(socket: &netstat2::SocketInfo) -> Option<u64> {
    Some(u64::from(socket.inode))
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn socket_ordinal(_socket: &netstat2::SocketInfo) -> Option<u64> {
    None
}
