use std::time::Duration;

use opsdeck_domain::constants::DEFAULT_RETRY_COUNT;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::upload::Upload;
use crate::api::errors::ApiError;

/// Body of a prepared request. Kept in rebuildable form so every retry
/// attempt sends a fresh copy.
#[derive(Debug, Clone, Default)]
pub enum PreparedBody {
    #[default]
    Empty,
    Json(Vec<u8>),
    Multipart(Upload),
}

/// Fully resolved request: absolute URL, final headers, encoded body.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: PreparedBody,
}

/// Per-call overrides of the client-wide timeout and retry count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub timeout: Option<Duration>,
    pub retries: Option<u32>,
}

/// A received response with its body already decoded.
///
/// JSON bodies are parsed, other content types are kept as a string, and an
/// empty body is `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// HTTP client with built-in retry and timeout support.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Execute the request with retry semantics.
    ///
    /// Timeouts and 5xx responses are retried while fewer than `retries`
    /// retries have happened, sleeping `retry_delay × attempt` between
    /// attempts. Everything else fails immediately. A 2xx response is
    /// returned as-is; any other status becomes [`ApiError::Http`].
    pub async fn send(
        &self,
        request: &PreparedRequest,
        options: SendOptions,
    ) -> Result<HttpResponse, ApiError> {
        let timeout = options.timeout.unwrap_or(self.timeout);
        let retries = options.retries.unwrap_or(self.retries);
        let method = &request.method;
        let url = &request.url;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(attempt, %method, %url, "sending HTTP request");

            let error = match self.attempt(request, timeout).await {
                Ok(response) if response.is_success() => {
                    debug!(attempt, %method, %url, status = %response.status, "received HTTP response");
                    return Ok(response);
                }
                Ok(response) => ApiError::from_response(response.status.as_u16(), response.body),
                Err(err) => err,
            };

            let retries_so_far = attempt - 1;
            if error.should_retry() && retries_so_far < retries {
                let delay = self.retry_delay.saturating_mul(attempt);
                debug!(
                    attempt,
                    %method,
                    %url,
                    status = error.status(),
                    delay_ms = delay.as_millis() as u64,
                    "retrying HTTP request"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                continue;
            }

            warn!(attempt, %method, %url, status = error.status(), error = %error, "HTTP request failed");
            return Err(error);
        }
    }

    /// One attempt: build, send, read the body, all bounded by `timeout`.
    async fn attempt(
        &self,
        request: &PreparedRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, ApiError> {
        let builder = self.build_request(request)?;

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_ascii_lowercase);
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, content_type, bytes))
        };

        let (status, content_type, bytes) = match tokio::time::timeout(timeout, exchange).await {
            Err(_) => return Err(ApiError::Timeout(timeout)),
            Ok(Err(err)) if err.is_timeout() => return Err(ApiError::Timeout(timeout)),
            Ok(Err(err)) => return Err(err.into()),
            Ok(Ok(parts)) => parts,
        };

        let body = decode_body(status, content_type.as_deref(), &bytes)?;
        Ok(HttpResponse { status, body })
    }

    fn build_request(&self, request: &PreparedRequest) -> Result<RequestBuilder, ApiError> {
        let builder =
            self.client.request(request.method.clone(), &request.url).headers(request.headers.clone());

        let builder = match &request.body {
            PreparedBody::Empty => builder,
            PreparedBody::Json(bytes) => builder.body(bytes.clone()),
            PreparedBody::Multipart(upload) => builder.multipart(upload.to_form()?),
        };

        Ok(builder)
    }
}

/// Decode a response body by its content type.
///
/// Malformed JSON is a decode error on success responses; on error responses
/// the raw text is kept so the failure can still be reported.
fn decode_body(
    status: StatusCode,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<Value, ApiError> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
    if is_json {
        match serde_json::from_slice(bytes) {
            Ok(value) => return Ok(value),
            Err(err) if status.is_success() => {
                return Err(ApiError::Decode { status: status.as_u16(), message: err.to_string() })
            }
            Err(_) => {}
        }
    }

    Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: DEFAULT_RETRY_COUNT,
            retry_delay: Duration::from_secs(1),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of retries after the initial attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Base delay; the n-th retry waits `retry_delay × n`.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut builder = ReqwestClient::builder().no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(ApiError::from)?;

        Ok(HttpClient {
            client,
            timeout: self.timeout,
            retries: self.retries,
            retry_delay: self.retry_delay,
        })
    }
}
