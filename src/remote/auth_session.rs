use super::*;

impl RemoteClient {
    /// `POST /v1/auth`. On success the session cookie lands in the jar.
    pub async fn login(&self, email: &str, password: &str) -> std::result::Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Please input credentials".to_string(),
            ));
        }
        let creds = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self.client.post(self.url("/v1/auth")).json(&creds);
        let resp = self.send(req, "login").await?;
        self.ensure_ok(resp, "login", LOGIN_FALLBACK).await?;
        tracing::info!("logged in as {}", creds.email);
        Ok(())
    }

    /// `POST /v1/auth/create`. Returns the server's confirmation text.
    pub async fn create_account(
        &self,
        form: &Registration,
    ) -> std::result::Result<String, AuthError> {
        if form.email.is_empty() || form.password.is_empty() || form.password_confirm.is_empty()
        {
            return Err(AuthError::Validation(
                "Ensure all inputs are filled in".to_string(),
            ));
        }
        if form.password != form.password_confirm {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }
        if !form.accepted_terms {
            return Err(AuthError::Validation(
                "Please accept the terms and conditions before proceeding".to_string(),
            ));
        }

        let creds = Credentials {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        let req = self.client.post(self.url("/v1/auth/create")).json(&creds);
        let resp = self.send(req, "create account").await?;
        let resp = self
            .ensure_ok(resp, "create account", REGISTER_FALLBACK)
            .await?;
        let body: MessageResponse = resp.json().await.unwrap_or_default();
        Ok(body
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| REGISTER_SUCCESS.to_string()))
    }

    /// `POST /v1/auth/logoff`. The server clears the session cookie.
    pub async fn logoff(&self) -> Result<()> {
        let resp = self
            .client
            .post(self.url("/v1/auth/logoff"))
            .send()
            .await
            .context("logoff")?;
        resp.error_for_status().context("logoff status")?;
        Ok(())
    }
}
