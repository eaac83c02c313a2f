//! DashScope API client.

use std::sync::Arc;

use crate::{
    error::{Error, Result},
    http::HttpClient,
    realtime::TtsRealtimeService,
    types::Region,
    voice::VoiceService,
};

/// Default WebSocket endpoint for realtime TTS (Beijing).
pub const DEFAULT_REALTIME_URL: &str = "wss://dashscope.aliyuncs.com/api-ws/v1/realtime";

/// Default HTTP endpoint (Beijing).
pub const DEFAULT_HTTP_BASE_URL: &str = "https://dashscope.aliyuncs.com";

/// DashScope API client.
///
/// A client owns its credentials; nothing is stored in process-wide state,
/// so clients for different keys or regions can coexist.
///
/// # Example
///
/// ```rust,no_run
/// use yotts_dashscope::{Client, Region};
///
/// # async fn run() -> yotts_dashscope::Result<()> {
/// let client = Client::builder("your-api-key").region(Region::Intl).build()?;
/// let voices = client.voice().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http: Arc<HttpClient>,
}

/// Client configuration.
#[derive(Clone)]
pub(crate) struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) workspace_id: Option<String>,
    pub(crate) region: Region,
    pub(crate) base_url: String,
    pub(crate) http_base_url: String,
}

impl Client {
    /// Creates a new DashScope API client for the default region.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Returns the configured API key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Returns the configured region.
    pub fn region(&self) -> Region {
        self.config.region
    }

    /// Returns the configured realtime URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the configured HTTP base URL.
    pub fn http_base_url(&self) -> &str {
        &self.config.http_base_url
    }

    /// Returns the voice-enrollment service.
    pub fn voice(&self) -> VoiceService {
        VoiceService::new(self.http.clone())
    }

    /// Returns the realtime TTS service.
    pub fn tts_realtime(&self) -> TtsRealtimeService {
        TtsRealtimeService::new(self.config.clone())
    }
}

/// Builder for creating a DashScope API client.
pub struct ClientBuilder {
    api_key: String,
    workspace_id: Option<String>,
    region: Region,
    base_url: Option<String>,
    http_base_url: Option<String>,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            workspace_id: None,
            region: Region::default(),
            base_url: None,
            http_base_url: None,
        }
    }

    /// Sets the workspace ID for resource isolation.
    pub fn workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Selects the service region. Explicit URLs take precedence.
    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Sets a custom WebSocket base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a custom HTTP base URL.
    pub fn http_base_url(mut self, url: impl Into<String>) -> Self {
        self.http_base_url = Some(url.into());
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("api_key must be non-empty".to_string()));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| self.region.realtime_url().to_string());
        let http_base_url = self
            .http_base_url
            .unwrap_or_else(|| self.region.http_base_url().to_string());

        let http = HttpClient::new(
            http_base_url.trim_end_matches('/').to_string(),
            self.api_key.clone(),
            self.workspace_id.clone(),
        )?;

        Ok(Client {
            config: Arc::new(ClientConfig {
                api_key: self.api_key,
                workspace_id: self.workspace_id,
                region: self.region,
                base_url,
                http_base_url,
            }),
            http: Arc::new(http),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(Client::new(""), Err(Error::Config(_))));
        assert!(matches!(Client::new("   "), Err(Error::Config(_))));
    }

    #[test]
    fn test_region_selects_urls() {
        let client = Client::builder("sk-test").region(Region::Intl).build().unwrap();
        assert_eq!(client.region(), Region::Intl);
        assert_eq!(client.http_base_url(), "https://dashscope-intl.aliyuncs.com");
        assert_eq!(
            client.base_url(),
            "wss://dashscope-intl.aliyuncs.com/api-ws/v1/realtime"
        );
    }

    #[test]
    fn test_explicit_urls_override_region() {
        let client = Client::builder("sk-test")
            .region(Region::Intl)
            .http_base_url("http://127.0.0.1:9000")
            .base_url("ws://127.0.0.1:9001/realtime")
            .build()
            .unwrap();
        assert_eq!(client.http_base_url(), "http://127.0.0.1:9000");
        assert_eq!(client.base_url(), "ws://127.0.0.1:9001/realtime");
    }

    #[test]
    fn test_defaults() {
        let client = Client::new("sk-test").unwrap();
        assert_eq!(client.api_key(), "sk-test");
        assert_eq!(client.base_url(), DEFAULT_REALTIME_URL);
        assert_eq!(client.http_base_url(), DEFAULT_HTTP_BASE_URL);
    }

    #[test]
    fn test_clone_shares_config() {
        let client = Client::builder("sk-test").region(Region::Intl).build().unwrap();
        let cloned = client.clone();
        drop(client);
        assert_eq!(cloned.api_key(), "sk-test");
        assert_eq!(cloned.region(), Region::Intl);
        assert_eq!(cloned.base_url(), Region::Intl.realtime_url());
    }
}
