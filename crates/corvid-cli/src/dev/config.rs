//! Development server configuration.

use crate::cli::DevArgs;
use crate::error::{CliError, Result};
use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

/// Default development server port.
pub const DEFAULT_PORT: u16 = 8000;

/// How many consecutive ports to try when the requested one is taken.
const PORT_SCAN_RANGE: u16 = 10;

/// Settings for a dev session.
#[derive(Debug, Clone)]
pub struct DevConfig {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,
    /// Open the browser once the server is up
    pub open: bool,
    /// Run a build before entering the watch loop
    pub initial_build: bool,
    /// Minimum gap between accepted change events
    pub debounce: Duration,
}

impl DevConfig {
    /// Resolve a dev configuration, scanning for a free port near the
    /// requested one.
    pub fn resolve(port: u16, open: bool, initial_build: bool) -> Result<Self> {
        let port = find_available_port(port)?;
        Ok(Self {
            addr: SocketAddr::from(([127, 0, 0, 1], port)),
            open,
            initial_build,
            debounce: Duration::from_secs(1),
        })
    }

    /// Build a dev configuration from CLI arguments.
    pub fn from_args(args: &DevArgs) -> Result<Self> {
        Self::resolve(args.port, !args.no_browser, !args.no_initial_build)
    }

    /// The URL the server is reachable at.
    pub fn server_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Find an available port starting from the preferred one.
fn find_available_port(preferred: u16) -> Result<u16> {
    for offset in 0..PORT_SCAN_RANGE {
        let candidate = preferred.saturating_add(offset);
        if TcpListener::bind(("127.0.0.1", candidate)).is_ok() {
            if candidate != preferred {
                crate::ui::warning(&format!(
                    "Port {} in use, using {} instead",
                    preferred, candidate
                ));
            }
            return Ok(candidate);
        }
    }

    Err(CliError::Server(format!(
        "No available port in range {}-{}",
        preferred,
        preferred.saturating_add(PORT_SCAN_RANGE - 1)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sets_loopback_addr() {
        let config = DevConfig::resolve(0, false, true).unwrap();
        assert!(config.addr.ip().is_loopback());
        assert!(config.initial_build);
        assert!(!config.open);
    }

    #[test]
    fn test_default_debounce_is_one_second() {
        let config = DevConfig::resolve(0, false, false).unwrap();
        assert_eq!(config.debounce, Duration::from_secs(1));
    }

    #[test]
    fn test_server_url() {
        let config = DevConfig {
            addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            open: false,
            initial_build: true,
            debounce: Duration::from_secs(1),
        };
        assert_eq!(config.server_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_find_available_port_skips_taken_port() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let taken = listener.local_addr().unwrap().port();

        let found = find_available_port(taken).unwrap();
        assert_ne!(found, taken);
        assert!(found > taken && found < taken + PORT_SCAN_RANGE);
    }
}
