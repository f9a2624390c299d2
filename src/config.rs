//! Process configuration from the environment
//!
//! Values may come from a `.env` file in the working directory; real
//! environment variables take precedence.

use crate::llm::LlmConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RELAY_URL: &str = "http://localhost:5000";
const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(150);

/// Load `.env` if present, returning the file that was read.
///
/// Called before logging is set up so `RUST_LOG` can come from the file;
/// callers log the outcome once a subscriber exists.
///
/// # Errors
///
/// Returns the parse or I/O error for a `.env` file that exists but cannot be
/// read. A missing file is `Ok(None)`.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Relay server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub llm: LlmConfig,
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), LlmConfig::from_env())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>, llm: LlmConfig) -> Self {
        let host: IpAddr = lookup("MOODCHAT_HOST")
            .and_then(|h| h.parse().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let port: u16 = lookup("MOODCHAT_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            addr: SocketAddr::new(host, port),
            llm,
        }
    }
}

/// Terminal client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub relay_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            relay_url: lookup("MOODCHAT_URL")
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            timeout: lookup("MOODCHAT_CLIENT_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map_or(DEFAULT_CLIENT_TIMEOUT, Duration::from_secs),
        }
    }
}
