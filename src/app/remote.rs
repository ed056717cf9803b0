use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::media::ExtractResult;

use super::{
    backend::{ExtractBackend, ServerStatus},
    errors::{AppError, ExtractError, GENERIC_FAILURE},
};

pub struct ExtractRemote {
    remote_addr: String,
    client: reqwest::Client,
    basic_auth: Option<(String, Option<String>)>,
    bearer_token: Option<String>,
}

impl ExtractRemote {
    pub fn new(
        addr: &str,
        timeout: Option<Duration>,
        basic_auth: Option<(String, Option<String>)>,
        bearer_token: Option<String>,
    ) -> Result<ExtractRemote, AppError> {
        let remote_addr = addr.strip_suffix('/').unwrap_or(addr).to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ExtractRemote {
            remote_addr,
            client: builder.build()?,
            basic_auth,
            bearer_token,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.remote_addr, path);
        log::info!("{method} {url}");

        let builder = self.client.request(method, &url);
        let builder = match &self.basic_auth {
            Some((username, password)) => builder.basic_auth(username, password.as_ref()),
            None => builder,
        };
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_extract(&self, url: &str) -> Result<ExtractResult, ExtractError> {
        let response = self
            .request(reqwest::Method::POST, "/api/extract")
            .json(&json!({ "url": url }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ExtractError::Request {
                status: status.as_u16(),
                message: error_message_from_body(&text),
            });
        }

        serde_json::from_str::<ExtractResult>(&text).map_err(|err| {
            log::error!("{err}. tried to parse: {text:?}");
            ExtractError::Transport(err.to_string())
        })
    }
}

/// Pick the user-facing message out of a failed response body: a `detail` or
/// `message` string from a JSON body, else the raw text, else a generic one.
pub fn error_message_from_body(text: &str) -> String {
    if let Ok(serde_json::Value::Object(body)) = serde_json::from_str::<serde_json::Value>(text) {
        let field = ["detail", "message"]
            .iter()
            .filter_map(|key| body.get(*key))
            .find_map(|value| match value {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                serde_json::Value::Null => None,
                serde_json::Value::String(_) => None,
                other => Some(other.to_string()),
            });
        if let Some(message) = field {
            return message;
        }
    }

    let text = text.trim();
    if text.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        text.to_string()
    }
}

#[async_trait]
impl ExtractBackend for ExtractRemote {
    async fn extract(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ExtractResult, ExtractError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExtractError::Cancelled),
            result = self.send_extract(url) => result,
        }
    }

    async fn status(&self) -> Result<ServerStatus, AppError> {
        let healthy = match self.request(reqwest::Method::GET, "/api/health").send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                log::warn!("health probe failed: {err}");
                false
            }
        };

        let cookies = match self
            .request(reqwest::Method::GET, "/api/cookies/status")
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => resp.json::<serde_json::Value>().await.ok(),
            Ok(resp) => {
                log::debug!("cookie status unavailable: {}", resp.status());
                None
            }
            Err(err) => {
                log::debug!("cookie status probe failed: {err}");
                None
            }
        };

        Ok(ServerStatus { healthy, cookies })
    }
}
