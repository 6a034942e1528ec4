use anyhow::Context;

use super::*;
use crate::remote::{AuthError, Registration};

impl Engine {
    fn remote(&self) -> std::result::Result<&RemoteClient, AuthError> {
        self.remote
            .as_ref()
            .ok_or_else(|| AuthError::Transport(anyhow::anyhow!("no HTTP client configured")))
    }

    /// Reconnects with a session cookie saved by an earlier login. Returns false when there
    /// is nothing to resume, including when the state file cannot be read.
    pub fn resume(&mut self) -> Result<bool> {
        let (Some(remote), Some(store)) = (&self.remote, &self.store) else {
            return Ok(false);
        };
        let saved = store
            .session_cookie(&self.config.server_addr)
            .unwrap_or_else(|err| {
                tracing::warn!("no saved session: {:#}", err);
                None
            });
        let Some(cookie) = saved else {
            return Ok(false);
        };
        remote.restore_session_cookie(&cookie);
        self.mark_authorized();
        Ok(true)
    }

    /// `POST /v1/auth`, then opens the channel. A failure leaves the session
    /// unauthenticated and is returned for display.
    pub async fn login(&mut self, email: &str, password: &str) -> std::result::Result<(), AuthError> {
        let remote = self.remote()?.clone();
        if let Err(err) = remote.login(email, password).await {
            self.mark_unauthorized();
            return Err(err);
        }
        if let (Some(cookie), Some(store)) = (remote.session_cookie(), &self.store) {
            store
                .set_session_cookie(&self.config.server_addr, &cookie)
                .context("save session cookie")?;
        }
        self.mark_authorized();
        Ok(())
    }

    /// `POST /v1/auth/create`. Does not log in.
    pub async fn register(&self, form: &Registration) -> std::result::Result<String, AuthError> {
        self.remote()?.create_account(form).await
    }

    /// `POST /v1/auth/logoff`, then drops the channel and the list. The local session is
    /// cleared even if the request fails.
    pub async fn logoff(&mut self) -> Result<()> {
        let outcome = match &self.remote {
            Some(remote) => remote.logoff().await,
            None => Ok(()),
        };
        self.mark_unauthorized();
        self.items = ItemStore::new();
        self.load = LoadState::NotStarted;
        self.revision += 1;
        if let Some(store) = &self.store {
            store.clear_session_cookie(&self.config.server_addr)?;
        }
        // The jar may still hold the old session if the server did not expire it.
        if let Some(fresh) = self
            .remote
            .as_ref()
            .map(RemoteClient::without_session)
            .transpose()?
        {
            self.remote = Some(fresh);
        }
        outcome
    }
}
