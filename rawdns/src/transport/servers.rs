//! # Resolver list
//!
//! The process-wide list of DNS servers the transport helpers send to. It
//! starts out as a fixed set of public resolvers and can be replaced at
//! runtime with [`set_servers`], then restored with [`reset_servers`].
//!
//! Reads hand out an `Arc` clone of the active list, so many workers can
//! read at once while a replacement only holds the write lock for the swap.
//!
//! ```rust
//! use rawdns::transport::servers::{get_servers, set_servers, reset_servers, has_custom_servers};
//!
//! set_servers(&["127.0.0.1:5353"]).expect("valid server list");
//! assert!(has_custom_servers());
//! assert_eq!(get_servers()[0].port(), 5353);
//!
//! reset_servers();
//! assert!(!has_custom_servers());
//! ```
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::Arc;
use std::{error::Error, fmt::Display};
use tracing::debug;

/// Public resolvers used when no custom list is set.
static DEFAULT_SERVERS: &[&str] = &[
    "8.8.8.8:53",
    "8.8.4.4:53",
    "1.1.1.1:53",
    "1.0.0.1:53",
    "9.9.9.9:53",
    "149.112.112.112:53",
];

static CUSTOM_SERVERS: RwLock<Option<Arc<Vec<SocketAddr>>>> = RwLock::new(None);

/// Returns the active server list, custom if one is set.
pub fn get_servers() -> Arc<Vec<SocketAddr>> {
    if let Some(list) = &*CUSTOM_SERVERS.read() {
        return Arc::clone(list);
    }
    Arc::new(
        DEFAULT_SERVERS
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect(),
    )
}

/// Replaces the active list. Every entry must parse as a [`SocketAddr`].
pub fn set_servers(list: &[&str]) -> Result<(), ServerListErrors> {
    if list.is_empty() {
        return Err(ServerListErrors::Empty);
    }

    let parsed = list
        .iter()
        .map(|s| {
            s.parse::<SocketAddr>()
                .map_err(|_| ServerListErrors::InvalidServer(s.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(servers = ?parsed, "Custom DNS server list set");
    *CUSTOM_SERVERS.write() = Some(Arc::new(parsed));
    Ok(())
}

/// Drops any custom list and goes back to the defaults.
pub fn reset_servers() {
    *CUSTOM_SERVERS.write() = None;
}

pub fn has_custom_servers() -> bool {
    CUSTOM_SERVERS.read().is_some()
}

/// Errors that can occur when setting the server list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerListErrors {
    Empty,
    /// Entry that could not be parsed into a [`SocketAddr`].
    InvalidServer(String),
}

impl Display for ServerListErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerListErrors::Empty => write!(f, "The server list is empty"),
            ServerListErrors::InvalidServer(s) => write!(f, "The server {} is invalid", s),
        }
    }
}

impl Error for ServerListErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let defaults: Vec<SocketAddr> = DEFAULT_SERVERS.iter().map(|s| s.parse().unwrap()).collect();
        assert_eq!(defaults.len(), DEFAULT_SERVERS.len());
        assert!(defaults.iter().all(|s| s.port() == 53));
    }

    #[test]
    fn test_invalid_lists_rejected() {
        assert_eq!(set_servers(&[]), Err(ServerListErrors::Empty));
        assert_eq!(
            set_servers(&["1.1.1.1:53", "not-an-address"]),
            Err(ServerListErrors::InvalidServer("not-an-address".to_string()))
        );
    }
}
