//! Authentication gate and locally persisted display preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::LocalStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    Unauthenticated,
    /// Channel is up, waiting for the authority's `authorized` acknowledgment.
    Pending,
    Authorized,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("unknown theme {:?} (expected light or dark)", other),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SessionGate {
    auth: AuthState,
    theme: Theme,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the persisted theme. Independent of server state; a missing or unreadable
    /// state file leaves the default in place.
    pub fn restore_preferences(&mut self, store: &LocalStore) -> Theme {
        match store.read_state() {
            Ok(st) => self.theme = st.theme,
            Err(err) => tracing::debug!("no stored preferences: {:#}", err),
        }
        self.theme
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth
    }

    pub fn is_authorized(&self) -> bool {
        self.auth == AuthState::Authorized
    }

    /// Whether a channel may be opened at all.
    pub fn allows_connect(&self) -> bool {
        self.auth != AuthState::Unauthenticated
    }

    /// `unauthenticated | pending -> authorized`. Returns true when the state changed, which
    /// is the caller's cue to open the channel.
    pub fn mark_authorized(&mut self) -> bool {
        let changed = self.auth != AuthState::Authorized;
        self.auth = AuthState::Authorized;
        changed
    }

    /// Transport is up; the authority has not acknowledged the session yet.
    pub fn mark_pending(&mut self) {
        if self.auth != AuthState::Unauthenticated {
            self.auth = AuthState::Pending;
        }
    }

    /// Login failure, logoff or channel error. The caller tears the channel down.
    pub fn mark_unauthorized(&mut self) {
        self.auth = AuthState::Unauthenticated;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
