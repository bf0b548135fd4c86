//! Client for the notebook server's sessions API
//! (`GET /api/sessions`, see the Jupyter Notebook Server API).

use reqwest::Client;
use std::time::Duration;

use crate::config::JupyterSettings;
use crate::error::{AutostopError, Result};
use crate::models::Session;

#[derive(Debug, Clone)]
pub struct JupyterClient {
    client: Client,
    base_url: String,
}

impl JupyterClient {
    pub fn new(port: u16, settings: &JupyterSettings) -> Result<Self> {
        let base_url = format!("{}://{}:{}", settings.scheme, settings.host, port);
        Self::with_base_url(settings, base_url)
    }

    /// Create a client with a custom base URL (for testing / integration)
    pub fn with_base_url(settings: &JupyterSettings, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        let url = format!("{}/api/sessions", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(code = status.as_u16(), url = %url, "Sessions API error");
            return Err(AutostopError::SessionsApi {
                status: status.as_u16(),
                body,
            });
        }

        let sessions: Vec<Session> = response.json().await?;
        tracing::debug!(count = sessions.len(), "Fetched notebook sessions");
        Ok(sessions)
    }
}
