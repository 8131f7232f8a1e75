//! Server configuration.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Default safe-prime group size, matching the reference deployment.
pub const DEFAULT_GROUP_BITS: u64 = 1024;

/// Default commitment round count, matching the reference deployment.
pub const DEFAULT_ROUNDS: usize = 10;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Hostname or IP address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
    /// Group size in bits for Data requests that do not carry one.
    pub group_bits: u64,
    /// Round count for Data requests that do not carry one.
    pub rounds: usize,
}

impl ServerConfig {
    /// Converts host and port into a socket address.
    ///
    /// # Panics
    /// Panics if the host and port cannot be parsed into a valid socket
    /// address, which only happens for malformed configuration.
    pub fn addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|e| {
                panic!(
                    "invalid server address (host: {}, port: {}): {}",
                    self.host, self.port, e
                )
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5555,
            group_bits: DEFAULT_GROUP_BITS,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr_parses() {
        let config = ServerConfig::default();
        assert_eq!(config.addr().port(), 5555);
    }
}
