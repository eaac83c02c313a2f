//! HTTP client implementation for DashScope REST endpoints.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Client as ReqwestClient, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Per-request timeout for REST calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(20);

const USER_AGENT_VALUE: &str = "yotts-dashscope-rust/1.0";

/// HTTP client for DashScope REST API.
///
/// Requests are issued exactly once: a non-2xx response is returned to the
/// caller as [`Error::Api`] without retry.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    api_key: String,
    workspace_id: Option<String>,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(base_url: String, api_key: String, workspace_id: Option<String>) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
            workspace_id,
        })
    }

    /// POSTs a JSON body to `path` and decodes the JSON response.
    pub async fn post<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers()?)
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Returns default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| Error::Config(format!("invalid api key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Some(ref workspace) = self.workspace_id {
            headers.insert(
                "X-DashScope-WorkSpace",
                HeaderValue::from_str(workspace)
                    .map_err(|e| Error::Config(format!("invalid workspace: {}", e)))?,
            );
        }
        Ok(headers)
    }

    /// Handles the API response.
    async fn handle_response<R>(&self, response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(parse_error(&body, status.as_u16()));
        }

        serde_json::from_slice(&body).map_err(Error::from)
    }
}

/// Error body returned by DashScope on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_id: String,
}

/// Parses an error response body.
pub(crate) fn parse_error(body: &[u8], http_status: u16) -> Error {
    if let Ok(err) = serde_json::from_slice::<ErrorBody>(body) {
        if !err.code.is_empty() || !err.message.is_empty() {
            return Error::api_with_request_id(err.code, err.message, err.request_id, http_status);
        }
    }

    Error::api(
        http_status.to_string(),
        String::from_utf8_lossy(body).to_string(),
        http_status,
    )
}
