use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};

use crate::config::Endpoints;

mod http_client;
pub use self::http_client::extract_error_message;

mod types;
pub use self::types::*;
mod auth_session;
mod items;

/// HTTP side of the authority: credentialed, cookie-based session.
#[derive(Clone)]
pub struct RemoteClient {
    endpoints: Endpoints,
    base: reqwest::Url,
    jar: Arc<Jar>,
    client: reqwest::Client,
}

impl RemoteClient {
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let base = reqwest::Url::parse(&endpoints.http_base)
            .with_context(|| format!("parse server url {}", endpoints.http_base))?;
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .user_agent("shoplist")
            .cookie_provider(jar.clone())
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            endpoints,
            base,
            jar,
            client,
        })
    }

    /// Same server, empty cookie jar.
    pub fn without_session(&self) -> Result<Self> {
        Self::new(self.endpoints.clone())
    }

    /// Seeds the jar with a previously captured session cookie (`a=b; c=d` form).
    pub fn restore_session_cookie(&self, cookie: &str) {
        for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base);
        }
    }

    /// Current cookies for the server, in `Cookie` header form.
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base)
            .and_then(|v| v.to_str().ok().map(str::to_string))
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
