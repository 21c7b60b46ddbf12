//! Shared transport for every service client: authentication, URL building,
//! HTTP status mapping, and request execution under the call policy.

use crate::api::{RetryConfig, ServiceConfig, ServiceKind};
use crate::credentials::{Credentials, ServiceCredentials, resolve_from_options};
use crate::error::{Result, ServiceError};
use crate::reliability::{CallPolicy, CircuitBreaker};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Part;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("watson-sdk-rust/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// How a service expects its credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Basic ...` header.
    BasicHeader,
    /// API key in the named query parameter.
    QueryParam(&'static str),
}

/// An image (or archive) to upload, either from disk or from memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    File(PathBuf),
    Bytes { filename: String, data: Vec<u8> },
}

impl ImageInput {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn bytes(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Read the content once; retried requests reuse the returned bytes.
    pub(crate) async fn load(&self) -> Result<(String, Vec<u8>)> {
        match self {
            Self::File(path) => read_file(path).await,
            Self::Bytes { filename, data } => Ok((filename.clone(), data.clone())),
        }
    }
}

/// Read an upload from disk. A missing file is an argument error.
pub(crate) async fn read_file(path: &Path) -> Result<(String, Vec<u8>)> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ServiceError::InvalidArgument(format!("The file: {} does not exist.", path.display()))
        } else {
            ServiceError::Io(e)
        }
    })?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    Ok((filename, data))
}

/// Content type for an upload, by file extension.
pub(crate) fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "zip" => "application/zip",
        "tmx" | "xml" => "application/xml",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Multipart file part with a content type derived from `filename`.
pub(crate) fn file_part(filename: &str, data: &[u8]) -> Result<Part> {
    Part::bytes(data.to_vec())
        .file_name(filename.to_string())
        .mime_str(content_type_for(filename))
        .map_err(|e| ServiceError::InvalidArgument(format!("Invalid upload '{}': {}", filename, e)))
}

/// Multipart part carrying a JSON document.
pub(crate) fn json_part(value: &Value) -> Result<Part> {
    Part::text(value.to_string())
        .mime_str("application/json")
        .map_err(|e| ServiceError::InvalidArgument(e.to_string()))
}

/// Percent-encode one path segment (ids, model names).
pub(crate) fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Reject empty identifiers before any request is sent.
pub(crate) fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidArgument(format!("{} cannot be empty", what)));
    }
    Ok(())
}

/// Map a send failure onto the error taxonomy. The URL is dropped from the
/// message since it may carry an API key.
pub(crate) fn transport_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Transport(e.without_url().to_string())
    }
}

/// Map a non-2xx response to a `ServiceError`, logging URL, status and
/// message. Returns `Ok(response)` when the status is 2xx.
pub(crate) async fn check_http_status(service: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut url = response.url().clone();
    url.set_query(None);
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::error!(
        service,
        url = %url,
        status = status.as_u16(),
        message = message.as_deref().unwrap_or_default(),
        "Service call failed"
    );
    Err(ServiceError::from_status(status.as_u16(), message))
}

/// Error text from a failing body: `error`, `error_message`, or `message`
/// when the body is a JSON object, otherwise the raw body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "error_message", "message"] {
            match map.get(key) {
                Some(Value::String(s)) => return Some(s.clone()),
                Some(Value::Null) | None => {}
                Some(other) => return Some(other.to_string()),
            }
        }
    }
    Some(body.to_string())
}

/// Deserialize a response body, naming the operation on failure.
pub(crate) fn parse_body<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| ServiceError::Parse(format!("Invalid {} response: {}", operation, e)))
}

fn headers_from_options(options: &Value) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let Some(map) = options.get("headers").and_then(Value::as_object) else {
        return Ok(headers);
    };
    for (name, value) in map {
        let Some(value) = value.as_str() else {
            continue;
        };
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ServiceError::Config(format!("Invalid header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ServiceError::Config(format!("Invalid value for header '{}': {}", name, e)))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// `<scheme>://<host>/authorization/<rest of path>/v1/token`, replacing the
/// first path segment of the service endpoint.
fn token_url(endpoint: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| ServiceError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
    let mut segments: Vec<String> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();
    match segments.first_mut() {
        Some(first) => *first = "authorization".to_string(),
        None => segments.push("authorization".to_string()),
    }
    segments.push("v1".to_string());
    segments.push("token".to_string());
    url.set_path(&segments.join("/"));
    url.set_query(None);
    Ok(url)
}

fn build_client() -> Client {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .cookie_store(true)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client settings");
            Client::new()
        })
}

/// Transport state shared by the methods of one service client.
pub struct ServiceBase {
    kind: ServiceKind,
    client: Client,
    endpoint: String,
    credentials: Option<Credentials>,
    auth: AuthScheme,
    default_headers: HeaderMap,
    policy: CallPolicy,
}

impl std::fmt::Debug for ServiceBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBase")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .field("auth", &self.auth)
            .finish()
    }
}

impl ServiceBase {
    /// A client for `kind` at its default endpoint with no credentials.
    pub fn new(kind: ServiceKind, auth: AuthScheme) -> Self {
        Self {
            kind,
            client: build_client(),
            endpoint: kind.default_endpoint().to_string(),
            credentials: None,
            auth,
            default_headers: HeaderMap::new(),
            policy: CallPolicy::default(),
        }
    }

    /// A client whose credentials and endpoint come from `VCAP_SERVICES` or
    /// the service's environment variables.
    pub fn from_env(kind: ServiceKind, auth: AuthScheme) -> Result<Self> {
        let discovered = ServiceCredentials::from_env(kind.credentials_name())?;
        let mut base = Self::new(kind, auth);
        base.credentials = discovered.credentials;
        if let Some(url) = discovered.url {
            base.set_endpoint(&url);
        }
        Ok(base)
    }

    /// A client built from a validated [`ServiceConfig`].
    ///
    /// Credentials named by the config options win over the environment,
    /// and a broken environment is only an error when the options name no
    /// credentials. The endpoint is the config's, else the discovered URL, else the
    /// service default.
    pub fn from_config(kind: ServiceKind, auth: AuthScheme, config: &ServiceConfig) -> Result<Self> {
        if config.service != kind {
            return Err(ServiceError::Config(format!(
                "Cannot build a '{}' client from a '{}' config",
                kind, config.service
            )));
        }
        config.validate()?;

        let configured = resolve_from_options(&config.options)?;
        let discovered = match ServiceCredentials::from_env(kind.credentials_name()) {
            Ok(discovered) => discovered,
            Err(e) if configured.is_some() => {
                tracing::warn!(
                    service = kind.as_str(),
                    error = %e,
                    "Ignoring environment credentials; using the ones named in the config"
                );
                ServiceCredentials::default()
            }
            Err(e) => return Err(e),
        };
        let mut base = Self::new(kind, auth);
        base.credentials = configured.or(discovered.credentials);
        if let Some(endpoint) = config.endpoint.as_deref().or(discovered.url.as_deref()) {
            base.set_endpoint(endpoint);
        }
        base.default_headers = headers_from_options(&config.options)?;
        base.policy = CallPolicy {
            timeout: config.timeout.map(Duration::from_secs),
            retry: config.retry.clone(),
            breaker: CircuitBreaker::default(),
        };

        tracing::info!(
            service = kind.as_str(),
            endpoint = %base.endpoint,
            has_credentials = base.credentials.is_some(),
            "Service client configured"
        );
        Ok(base)
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn set_credentials(&mut self, credentials: Option<Credentials>) {
        self.credentials = credentials;
    }

    pub fn set_default_headers(&mut self, headers: HeaderMap) {
        self.default_headers = headers;
    }

    /// Per-attempt timeout; `None` disables it.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.policy.timeout = timeout;
    }

    /// Retry policy for transient failures; `None` disables retries.
    pub fn set_retry(&mut self, retry: Option<RetryConfig>) {
        self.policy.retry = retry;
    }

    /// Absolute URL for a path such as `/v1/classifiers`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn authenticate(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let Some(credentials) = &self.credentials else {
            return Err(ServiceError::Config(
                "apiKey or username and password were not specified".to_string(),
            ));
        };
        match (self.auth, credentials) {
            (AuthScheme::BasicHeader, credentials) => {
                Ok(builder.header(AUTHORIZATION, credentials.authorization_header()))
            }
            (AuthScheme::QueryParam(param), Credentials::ApiKey(key)) => {
                Ok(builder.query(&[(param, key.as_str())]))
            }
            (AuthScheme::QueryParam(param), Credentials::Basic { .. }) => {
                Err(ServiceError::Config(format!(
                    "Service '{}' requires an API key (sent as '{}'), not username and password",
                    self.kind, param
                )))
            }
        }
    }

    /// Request builder for `path` carrying default headers and credentials.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let builder = self
            .client
            .request(method, self.url(path))
            .headers(self.default_headers.clone());
        self.authenticate(builder)
    }

    /// Send the request produced by `build` under the call policy and
    /// deserialize the body into `T`. `build` runs once per attempt.
    pub(crate) async fn execute_json<T, F>(&self, operation: &str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> Result<RequestBuilder>,
    {
        let body = self.execute_text(operation, build).await?;
        parse_body(operation, &body)
    }

    /// Send under the call policy and return the raw body.
    pub(crate) async fn execute_text<F>(&self, operation: &str, build: F) -> Result<String>
    where
        F: Fn() -> Result<RequestBuilder>,
    {
        self.execute_text_with(operation, build, |_, _| Ok(())).await
    }

    /// Like [`execute_text`](Self::execute_text), but `inspect` may turn a
    /// 2xx response into an error inside the attempt, so in-band failures
    /// are retried and counted by the breaker like HTTP ones.
    pub(crate) async fn execute_text_with<F>(
        &self,
        operation: &str,
        build: F,
        inspect: fn(&HeaderMap, &str) -> Result<()>,
    ) -> Result<String>
    where
        F: Fn() -> Result<RequestBuilder>,
    {
        let build = &build;
        let service = self.kind.as_str();
        tracing::debug!(service, operation, "Sending request");
        self.policy
            .run(service, operation, || async move {
                let response = build()?.send().await.map_err(transport_error)?;
                let response = check_http_status(service, response).await?;
                let headers = response.headers().clone();
                let body = response.text().await.map_err(transport_error)?;
                inspect(&headers, &body)?;
                Ok(body)
            })
            .await
    }

    /// Send under the call policy and discard the body.
    pub(crate) async fn execute_empty<F>(&self, operation: &str, build: F) -> Result<()>
    where
        F: Fn() -> Result<RequestBuilder>,
    {
        self.execute_text(operation, build).await.map(|_| ())
    }

    /// Fetch an authorization token for this service's endpoint. The
    /// token service answers in plain text.
    pub async fn get_token(&self) -> Result<String> {
        let token_url = token_url(&self.endpoint)?;
        let body = self
            .execute_text("get_token", || {
                let builder = self
                    .client
                    .get(token_url.clone())
                    .query(&[("url", self.endpoint.as_str())])
                    .headers(self.default_headers.clone())
                    .header(ACCEPT, "text/plain");
                self.authenticate(builder)
            })
            .await?;
        Ok(body.trim().to_string())
    }
}
