//! `serve:` section configuration.
//!
//! Contains development server settings.
//!
//! # Example
//!
//! ```yaml
//! serve:
//!   interface: 127.0.0.1   # Network interface (127.0.0.1 = localhost only)
//!   port: 8081             # HTTP port number
//!   watch: true            # Rebuild and reload browsers on file changes
//! ```
//!
//! Use `interface: 0.0.0.0` to make the server accessible from LAN.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};

/// Development server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Enable file watcher for live reload.
    pub watch: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8081,
            watch: true,
        }
    }
}
