use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHANNEL_PATH: &str = "/ws";

/// How item events that reach the client before the initial snapshot are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EventOrdering {
    /// Queue them and replay them, in arrival order, on top of the snapshot.
    #[default]
    BufferUntilSnapshot,
    /// Discard them; there is no list to apply them to yet.
    DropUntilSnapshot,
    /// Apply them immediately. The snapshot may later overwrite them.
    Passthrough,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// `host[:port]` of the authority.
    pub server_addr: String,
    /// Plaintext `ws`/`http` instead of `wss`/`https`.
    pub insecure: bool,
    pub channel_path: String,
    pub state_dir: PathBuf,
    pub ordering: EventOrdering,
    /// A `new-item` for an id already listed replaces that entry instead of appending.
    pub dedupe_created: bool,
}

impl ClientConfig {
    pub fn new(server_addr: impl Into<String>, state_dir: PathBuf) -> Self {
        Self {
            server_addr: server_addr.into(),
            insecure: false,
            channel_path: DEFAULT_CHANNEL_PATH.to_string(),
            state_dir,
            ordering: EventOrdering::default(),
            dedupe_created: true,
        }
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(&self.server_addr, self.insecure, &self.channel_path)
    }
}

/// Default state directory: `<config dir>/shoplist`.
pub fn default_state_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("no config directory for this platform")?;
    Ok(base.join("shoplist"))
}

/// Concrete URLs derived from the server address and the insecure toggle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub http_base: String,
    pub channel_url: String,
}

impl Endpoints {
    pub fn new(server_addr: &str, insecure: bool, channel_path: &str) -> Result<Self> {
        let addr = server_addr.trim().trim_end_matches('/');
        if addr.is_empty() {
            anyhow::bail!("server address is required (set --server or SHOPLIST_SERVER)");
        }
        if addr.contains("://") {
            anyhow::bail!(
                "server address must not include a scheme (got {}); use --insecure for plaintext",
                addr
            );
        }
        let (http, ws) = if insecure {
            ("http", "ws")
        } else {
            ("https", "wss")
        };
        let path = if channel_path.starts_with('/') {
            channel_path.to_string()
        } else {
            format!("/{}", channel_path)
        };
        Ok(Self {
            http_base: format!("{}://{}", http, addr),
            channel_url: format!("{}://{}{}", ws, addr, path),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.http_base, path)
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
