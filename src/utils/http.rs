//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;

use crate::config::HttpConfig;
use crate::sources::FetchError;

/// Shared HTTP client configured from [`HttpConfig`]
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(&HttpConfig::default())
    }

    /// Create a new HTTP client with explicit timeouts and user agent
    pub fn with_config(config: &HttpConfig) -> Result<Self, FetchError> {
        let user_agent = config.user_agent.clone().unwrap_or_else(|| {
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
        });

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// GET `url` and return the body, failing on any non-2xx status
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| {
            FetchError::Transport(format!("Failed to read response from {}: {}", url, e))
        })
    }
}
