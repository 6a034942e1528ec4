//! Request/response payloads for the HTTP endpoints, and the user-facing auth error.

use serde::{Deserialize, Serialize};

pub const LOGIN_FALLBACK: &str = "Unknown internal error";
pub const REGISTER_FALLBACK: &str = "Unknown error occurred";
pub const REGISTER_SUCCESS: &str = "Account created successfuly";

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account creation form as the user filled it in.
#[derive(Clone, Debug, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub accepted_terms: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Rejected before anything was sent.
    #[error("{0}")]
    Validation(String),
    /// The authority refused the request; the message is meant for the user.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl AuthError {
    /// Text for an inline form message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Validation(msg) | AuthError::Rejected(msg) => msg.clone(),
            AuthError::Transport(_) => fallback.to_string(),
        }
    }
}
