//! API client bound to one backend
//!
//! Resolves URLs against the backend base URL, assembles headers (defaults,
//! JSON content type, bearer token, per-call overrides) and hands the prepared
//! request to [`HttpClient`] for retry and timeout handling.

use std::sync::Arc;

use opsdeck_core::{CredentialProvider, NoCredentials};
use opsdeck_domain::constants::JSON_CONTENT_TYPE;
use opsdeck_domain::{Backend, BackendConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::errors::ApiError;
use super::request::{ApiRequest, RequestBody};
use super::response::ApiResponse;
use crate::http::{HttpClient, PreparedBody, PreparedRequest, SendOptions, Upload};

/// Join base URL and path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}

/// HTTP client for a single backend
pub struct ApiClient {
    backend: Backend,
    config: BackendConfig,
    http: HttpClient,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("backend", &self.backend)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is empty or the
    /// underlying HTTP client cannot be built.
    pub fn new(
        backend: Backend,
        config: BackendConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::Config(format!("{backend} API base URL is empty")));
        }

        let mut builder = HttpClient::builder()
            .timeout(config.timeout())
            .retries(config.retry_count)
            .retry_delay(config.retry_delay());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        let http = builder.build()?;

        Ok(Self { backend, config, http, credentials })
    }

    /// Client that never sends an `Authorization` header.
    pub fn anonymous(backend: Backend, config: BackendConfig) -> Result<Self, ApiError> {
        Self::new(backend, config, Arc::new(NoCredentials))
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    /// Execute a request and decode the body into `T`.
    #[instrument(skip(self, request), fields(backend = %self.backend, method = %request.method, path = %request.path))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        let prepared = self.prepare(&request).await?;
        debug!(url = %prepared.url, "dispatching API request");

        let options =
            SendOptions { timeout: request.options.timeout, retries: request.options.retries };
        let response = self.http.send(&prepared, options).await?;

        ApiResponse::from_http(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.request(ApiRequest::get(path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(ApiRequest::delete(path)).await
    }

    /// POST a multipart form with the file under `file`.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        upload: Upload,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(ApiRequest::post(path).multipart(upload)).await
    }

    /// Resolve URL, headers and body. Credentials are read once here, so
    /// every retry of this call carries the same `Authorization` header.
    async fn prepare(&self, request: &ApiRequest) -> Result<PreparedRequest, ApiError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.config.default_headers {
            insert_header(&mut headers, name, value)?;
        }

        let is_multipart = matches!(request.body, RequestBody::Multipart(_));
        if !is_multipart {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        if let Some(tokens) = self.credentials.tokens().await {
            let mut value = HeaderValue::from_str(&tokens.authorization_header())
                .map_err(|_| ApiError::Config("access token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &request.headers {
            insert_header(&mut headers, name, value)?;
        }

        // The transport supplies the multipart boundary.
        if is_multipart {
            headers.remove(CONTENT_TYPE);
        }

        let body = match &request.body {
            RequestBody::Empty => PreparedBody::Empty,
            RequestBody::Json(value) => PreparedBody::Json(serde_json::to_vec(value)?),
            RequestBody::Multipart(upload) => PreparedBody::Multipart(upload.clone()),
        };

        Ok(PreparedRequest {
            method: request.method.clone(),
            url: self.url_for(&request.path),
            headers,
            body,
        })
    }
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), ApiError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ApiError::Config(format!("invalid header name: {name}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|_| ApiError::Config(format!("invalid value for header {name}")))?;
    headers.insert(name, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use opsdeck_domain::AuthTokens;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct StaticTokens(AuthTokens);

    #[async_trait]
    impl CredentialProvider for StaticTokens {
        async fn tokens(&self) -> Option<AuthTokens> {
            Some(self.0.clone())
        }
    }

    fn config(base_url: String) -> BackendConfig {
        BackendConfig { retry_delay_ms: 10, ..BackendConfig::new(base_url, 2_000) }
    }

    fn anonymous(server: &MockServer) -> ApiClient {
        ApiClient::anonymous(Backend::Main, config(server.uri())).expect("client")
    }

    #[test]
    fn join_url_uses_exactly_one_slash() {
        for base in ["http://h/api", "http://h/api/"] {
            for path in ["users", "/users"] {
                assert_eq!(join_url(base, path), "http://h/api/users", "{base} + {path}");
            }
        }
        assert_eq!(join_url("http://h/api//", "//users"), "http://h/api/users");
        assert_eq!(join_url("http://h/api", ""), "http://h/api");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = ApiClient::anonymous(Backend::Auth, BackendConfig::new("", 1_000)).unwrap_err();
        assert!(matches!(err, ApiError::Config(msg) if msg.contains("auth")));
    }

    #[tokio::test]
    async fn sends_json_headers_and_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/u1"))
            .and(header("authorization", "Bearer abc"))
            .and(header("content-type", "application/json"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = AuthTokens::bearer("abc");
        let client =
            ApiClient::new(Backend::Main, config(server.uri()), Arc::new(StaticTokens(tokens)))
                .unwrap();

        let response: ApiResponse<Value> = client.get("users/u1").await.unwrap();
        assert_eq!(response.data, json!({"id": "u1"}));
    }

    #[tokio::test]
    async fn anonymous_client_sends_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let _: ApiResponse<Value> = anonymous(&server).get("/health").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn per_call_headers_override_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("accept", "text/plain"))
            .and(header("x-request-id", "r-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let request =
            ApiRequest::get("/ping").header("Accept", "text/plain").header("X-Request-Id", "r-1");
        let response: ApiResponse<Value> = anonymous(&server).request(request).await.unwrap();
        assert_eq!(response.data, Value::Null);
    }

    #[tokio::test]
    async fn create_returns_envelope_for_201() {
        let server = MockServer::start().await;
        let created = json!({"id": "u9", "name": "Ada"});
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(body_json(json!({"name": "Ada"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(created.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let response: ApiResponse<Value> =
            anonymous(&server).post("/users", &json!({"name": "Ada"})).await.unwrap();

        assert!(response.success);
        assert_eq!(response.status, 201);
        assert_eq!(response.data, created);
    }

    #[tokio::test]
    async fn unavailable_service_is_retried_then_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(4)
            .mount(&server)
            .await;

        let started = Instant::now();
        let err = anonymous(&server).get::<Value>("/servers").await.unwrap_err();

        assert_eq!(err.status(), 503);
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn not_found_is_attempted_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "User not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = anonymous(&server).get::<Value>("/users/missing").await.unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "User not found");
    }

    #[tokio::test]
    async fn per_call_timeout_surfaces_408() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(400)))
            .mount(&server)
            .await;

        let request = ApiRequest::get("/slow").timeout(Duration::from_millis(50)).retries(0);
        let err = anonymous(&server).request::<Value>(request).await.unwrap_err();

        assert_eq!(err.status(), 408);
        assert_eq!(err.code(), Some("TIMEOUT"));
    }

    #[tokio::test]
    async fn multipart_upload_omits_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/u1/avatar"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"avatarUrl": "/a.png"})))
            .expect(1)
            .mount(&server)
            .await;

        let upload = Upload::new("a.png", "image/png", vec![1, 2, 3]).with_field("crop", true);
        let _: ApiResponse<Value> =
            anonymous(&server).upload("/users/u1/avatar", upload).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("name=\"crop\""));
    }
}
