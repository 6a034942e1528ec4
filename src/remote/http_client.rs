use anyhow::Context;

use super::*;

impl RemoteClient {
    pub(super) fn url(&self, path: &str) -> String {
        self.endpoints.url(path)
    }

    /// Turns a non-2xx response into a rejection carrying the most specific message the body
    /// offers: `error[0]`, then `message`, then the status reason, then `fallback`.
    pub(super) async fn ensure_ok(
        &self,
        resp: reqwest::Response,
        label: &str,
        fallback: &str,
    ) -> std::result::Result<reqwest::Response, AuthError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .unwrap_or(serde_json::Value::Null);
        let msg = extract_error_message(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| fallback.to_string());
        tracing::debug!(%status, "{} rejected: {}", label, msg);
        Err(AuthError::Rejected(msg))
    }

    pub(super) async fn send(
        &self,
        req: reqwest::RequestBuilder,
        label: &str,
    ) -> std::result::Result<reqwest::Response, AuthError> {
        let resp = req.send().await.with_context(|| label.to_string())?;
        Ok(resp)
    }
}

/// Pulls a user-facing message out of a structured error body.
pub fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    let from_error = match body.get("error") {
        Some(serde_json::Value::Array(list)) => list
            .first()
            .and_then(|v| v.as_str())
            .map(str::to_string),
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        _ => None,
    };
    from_error
        .or_else(|| {
            body.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../tests/remote/http_client_tests.rs"]
mod tests;
