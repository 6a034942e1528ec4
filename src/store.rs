use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::Theme;

const STATE_FILE: &str = "state.json";

/// Client-side state that survives restarts: the theme and one session cookie per server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    pub version: u32,

    #[serde(default)]
    pub theme: Theme,

    /// Keyed by server address. The value is a `name=value` cookie pair as the server set it.
    #[serde(default)]
    pub session_cookies: HashMap<String, String>,
}

impl ClientState {
    fn fresh() -> Self {
        Self {
            version: 1,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Opens (creating if needed) the state directory.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("create state dir {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn read_state(&self) -> Result<ClientState> {
        let path = self.root.join(STATE_FILE);
        if !path.exists() {
            return Ok(ClientState::fresh());
        }
        let bytes = fs::read(&path).context("read state.json")?;
        let st: ClientState = serde_json::from_slice(&bytes).context("parse state.json")?;
        if st.version != 1 {
            anyhow::bail!("unsupported client state version {}", st.version);
        }
        Ok(st)
    }

    pub fn write_state(&self, st: &ClientState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic(&self.root.join(STATE_FILE), &bytes).context("write state.json")?;
        Ok(())
    }

    /// Current state for a read-modify-write. An unreadable file is replaced rather than
    /// blocking the write.
    fn state_for_update(&self) -> ClientState {
        match self.read_state() {
            Ok(st) => st,
            Err(err) => {
                tracing::warn!("discarding unreadable client state: {:#}", err);
                ClientState::fresh()
            }
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let mut st = self.state_for_update();
        st.theme = theme;
        self.write_state(&st)
    }

    pub fn session_cookie(&self, server: &str) -> Result<Option<String>> {
        let st = self.read_state()?;
        Ok(st.session_cookies.get(server).cloned())
    }

    pub fn set_session_cookie(&self, server: &str, cookie: &str) -> Result<()> {
        let mut st = self.state_for_update();
        st.session_cookies
            .insert(server.to_string(), cookie.to_string());
        self.write_state(&st)
    }

    pub fn clear_session_cookie(&self, server: &str) -> Result<()> {
        let mut st = self.state_for_update();
        if st.session_cookies.remove(server).is_none() {
            return Ok(());
        }
        self.write_state(&st)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
