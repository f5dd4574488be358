use std::net::SocketAddr;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Store connection URL, resolved once at startup. Only `memory:` is
    /// recognized; anything else fails the boot.
    pub store_url: String,
    pub table_name: String,
    /// Gate mutating endpoints on an `x-session-ticket` header. Off by
    /// default; the source deployments were inconsistent about this, so it
    /// is an explicit deployment choice here.
    pub require_session_ticket: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_string("PR_BIND_ADDR", "127.0.0.1:18090")
            .parse::<SocketAddr>()
            .context("PR_BIND_ADDR must be a valid host:port")?;

        let store_url = env_string("PR_STORE_URL", "memory:");
        let table_name = env_string("PR_TABLE_NAME", "Players");

        let require_session_ticket = env_string("PR_REQUIRE_SESSION_TICKET", "false")
            .parse::<bool>()
            .context("PR_REQUIRE_SESSION_TICKET must be true or false")?;

        Ok(Self {
            bind_addr,
            store_url,
            table_name,
            require_session_ticket,
        })
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
