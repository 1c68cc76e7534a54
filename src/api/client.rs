//
//  codeship-rs
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Codeship API
//!
//! This module provides the core HTTP client for the Codeship v2 API. It
//! owns the credentials, exchanges them for a bearer token, keeps that token
//! fresh and maps HTTP responses onto [`ApiError`] values.
//!
//! ## Features
//!
//! - Lazy `/auth` exchange before the first request and whenever the token expires
//! - Organization scoping with case-insensitive name matching
//! - JSON serialization/deserialization
//! - Status code to error mapping with messages taken from the response body
//! - Optional verbose request/response logging through `tracing`
//! - Injectable [`HttpTransport`] for proxies and tests

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Request, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::common::{ApiError, Response, Result, INSUFFICIENT_PERMISSIONS, INVALID_CREDENTIALS};
use super::organization::Organization;
use crate::auth::{AuthCredential, Authentication};

/// Default Codeship API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.codeship.com/v2";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Target used for verbose request/response dumps.
const HTTP_LOG_TARGET: &str = "codeship::http";

/// Sends fully built requests on behalf of [`CodeshipClient`].
///
/// The default implementation is [`reqwest::Client`]. A transport returns
/// `Ok(None)` when it completed without producing a response; the client
/// surfaces that as [`ApiError::NilResponse`].
#[async_trait]
pub trait HttpTransport: fmt::Debug + Send + Sync {
    /// Sends `request` and returns the raw response, if any.
    async fn send(&self, request: Request) -> std::result::Result<Option<reqwest::Response>, reqwest::Error>;
}

#[async_trait]
impl HttpTransport for Client {
    async fn send(&self, request: Request) -> std::result::Result<Option<reqwest::Response>, reqwest::Error> {
        self.execute(request).await.map(Some)
    }
}

/// Maps a non-success response onto an [`ApiError`].
///
/// | Status | Error |
/// |--------|-------|
/// | 400 | [`ApiError::BadRequest`] with the body message |
/// | 401 | [`ApiError::Unauthorized`] (`invalid credentials`) |
/// | 403 | [`ApiError::Unauthorized`] (`insufficient permissions`) |
/// | 404 | [`ApiError::NotFound`] with the body message |
/// | 429 | [`ApiError::RateLimited`] |
/// | 5xx | [`ApiError::ServerError`] |
/// | other | [`ApiError::Http`] with the body message |
pub fn format_api_error(status: StatusCode, body: &[u8]) -> ApiError {
    match status.as_u16() {
        400 => ApiError::BadRequest(error_message(status, body)),
        401 => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
        403 => ApiError::Unauthorized(INSUFFICIENT_PERMISSIONS.to_string()),
        404 => ApiError::NotFound(error_message(status, body)),
        429 => ApiError::RateLimited,
        code if status.is_server_error() => ApiError::ServerError { status: code },
        code => ApiError::Http {
            status: code,
            message: error_message(status, body),
        },
    }
}

/// Extracts a readable message from an error body.
///
/// Codeship returns errors in the format:
/// ```json
/// {"errors": ["project not found"]}
/// ```
///
/// `{"error": "..."}` and `{"message": "..."}` are also recognised. If no
/// message can be found the status and raw body are returned instead.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
        if let Some(errors) = json.get("errors").and_then(|e| e.as_array()) {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.as_str().or_else(|| e.get("message").and_then(|m| m.as_str())))
                .collect();
            if !messages.is_empty() {
                return messages.join(", ");
            }
        }

        if let Some(message) = json.get("error").and_then(|m| m.as_str()) {
            return message.to_string();
        }

        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    if text.trim().is_empty() {
        format!("HTTP status: {}", status.as_u16())
    } else {
        format!("HTTP status: {}; content {:?}", status.as_u16(), text)
    }
}

/// Decodes a JSON body, naming the target type on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8], target: &'static str) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| ApiError::Decode { target, source })
}

/// Builder for [`CodeshipClient`].
///
/// Every option is a no-op unless set.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use codeship::{AuthCredential, CodeshipClient};
///
/// let client = CodeshipClient::builder(AuthCredential::basic("me@example.com", "secret"))
///     .base_url("https://codeship-proxy.internal/v2")
///     .timeout(Duration::from_secs(10))
///     .verbose(true)
///     .build()?;
/// # Ok::<(), codeship::ApiError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    credential: AuthCredential,
    base_url: String,
    http: Option<Client>,
    transport: Option<Arc<dyn HttpTransport>>,
    headers: HeaderMap,
    timeout: Duration,
    user_agent: String,
    verbose: bool,
}

impl ClientBuilder {
    /// Creates a builder using `credential` for the `/auth` exchange.
    pub fn new(credential: AuthCredential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: None,
            transport: None,
            headers: HeaderMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("codeship-rs/{}", crate::VERSION),
            verbose: false,
        }
    }

    /// Overrides the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Uses a preconfigured [`reqwest::Client`] to build and send requests.
    ///
    /// The builder's timeout and user agent are not applied to it.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Sends requests through a custom transport.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Replaces the custom headers sent with every API request.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds one custom header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Logs every request and response at `debug` level when enabled.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the credential is incomplete or the
    /// base URL does not parse, and [`ApiError::Network`] if the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<CodeshipClient> {
        match &self.credential {
            AuthCredential::Basic { .. } if !self.credential.is_complete() => {
                return Err(ApiError::Config("missing username or password".to_string()));
            }
            AuthCredential::Bearer { .. } if !self.credential.is_complete() => {
                return Err(ApiError::Config("missing access token".to_string()));
            }
            _ => {}
        }

        let base_url = self.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| {
            ApiError::Config(format!("options parsing failed: invalid base URL '{}': {}", base_url, e))
        })?;

        let http = match self.http {
            Some(client) => client,
            None => Client::builder()
                .user_agent(self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(http.clone()) as Arc<dyn HttpTransport>,
        };

        Ok(CodeshipClient {
            http,
            transport,
            base_url,
            credential: self.credential,
            headers: self.headers,
            verbose: self.verbose,
            authentication: Mutex::new(Authentication::default()),
        })
    }
}

/// The main HTTP client for the Codeship API.
///
/// The client caches the [`Authentication`] returned by `/auth` and renews
/// it transparently: every request first checks whether the token is
/// missing or expired and, if so, performs exactly one `/auth` exchange
/// before sending. The cache sits behind an async mutex, so a shared
/// `&CodeshipClient` may be used from several tasks; concurrent callers
/// wait for a single renewal.
///
/// Resource operations live on the [`Organization`] handle returned by
/// [`scope`](Self::scope).
///
/// # Example
///
/// ```rust,no_run
/// use codeship::CodeshipClient;
///
/// # async fn example() -> codeship::Result<()> {
/// let client = CodeshipClient::new("me@example.com", "secret")?;
/// let org = client.scope("my-org").await?;
/// let projects = org.list_projects().await?;
/// println!("{} projects", projects.data.projects.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CodeshipClient {
    /// Builds outgoing requests
    http: Client,
    /// Sends outgoing requests
    transport: Arc<dyn HttpTransport>,
    /// API root without a trailing slash
    base_url: String,
    /// Credential for the `/auth` exchange
    credential: AuthCredential,
    /// Custom headers applied to every API request
    headers: HeaderMap,
    verbose: bool,
    authentication: Mutex<Authentication>,
}

impl CodeshipClient {
    /// Creates a client with Basic credentials and default options.
    ///
    /// Empty arguments fall back to `CODESHIP_USERNAME` and
    /// `CODESHIP_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] (`missing username or password`) if
    /// either value is still empty. No network call is made.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        ClientBuilder::new(AuthCredential::basic_with_env_fallback(username, password)?).build()
    }

    /// Starts a [`ClientBuilder`] for the given credential.
    pub fn builder(credential: AuthCredential) -> ClientBuilder {
        ClientBuilder::new(credential)
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `true` if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the custom headers sent with every API request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a snapshot of the cached authentication.
    pub async fn authentication(&self) -> Authentication {
        self.authentication.lock().await.clone()
    }

    /// Returns `true` if the cached token is missing or expired.
    pub async fn authentication_required(&self) -> bool {
        self.authentication.lock().await.is_expired()
    }

    /// Exchanges the credential for a fresh access token.
    ///
    /// Issues `POST {base_url}/auth`. On success the cached authentication
    /// is replaced wholesale; on failure the previous cache is left as it
    /// was.
    ///
    /// # Errors
    ///
    /// Errors are prefixed with `authentication failed`, e.g.
    /// `authentication failed: invalid credentials` for a 401.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn authenticate(&self) -> Result<Response> {
        let mut cache = self.authentication.lock().await;
        self.authenticate_locked(&mut cache).await
    }

    async fn authenticate_locked(&self, cache: &mut Authentication) -> Result<Response> {
        let url = format!("{}/auth", self.base_url);
        let request = self
            .credential
            .apply_to_request(self.http.post(&url))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        let (body, response) = self
            .execute(request)
            .await
            .map_err(|e| e.context("authentication failed"))?;

        let authentication: Authentication =
            decode(&body, "Authentication").map_err(|e| e.context("authentication failed"))?;

        debug!(
            organizations = authentication.organizations.len(),
            expires_at = authentication.expires_at,
            "Authenticated with Codeship"
        );

        *cache = authentication;
        Ok(response)
    }

    /// Returns a valid access token, authenticating first if required.
    async fn access_token(&self) -> Result<String> {
        let mut cache = self.authentication.lock().await;
        if cache.is_expired() {
            debug!("Access token missing or expired, re-authenticating");
            self.authenticate_locked(&mut cache).await?;
        }
        Ok(cache.access_token.clone())
    }

    /// Scopes the client to one organization.
    ///
    /// Authenticates first if required, then matches `name` against the
    /// authenticated organizations ignoring case.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingOrganizationName`] for an empty name (no network call)
    /// - Any authentication error
    /// - [`ApiError::OrganizationNotAuthorized`] listing the organizations the
    ///   account can access
    #[instrument(skip(self))]
    pub async fn scope(&self, name: &str) -> Result<Organization<'_>> {
        if name.is_empty() {
            return Err(ApiError::MissingOrganizationName);
        }

        let mut cache = self.authentication.lock().await;
        if cache.is_expired() {
            self.authenticate_locked(&mut cache).await?;
        }

        match cache.find_organization(name) {
            Some(org) => Ok(Organization::new(
                org.uuid.clone(),
                org.name.clone(),
                org.scopes.clone(),
                self,
            )),
            None => Err(ApiError::OrganizationNotAuthorized {
                name: name.to_string(),
                authorized: cache.describe_organizations(),
            }),
        }
    }

    /// Alias for [`scope`](Self::scope).
    pub async fn organization(&self, name: &str) -> Result<Organization<'_>> {
        self.scope(name).await
    }

    /// Sends a bodiless API request.
    pub(crate) async fn request(&self, method: Method, path: &str) -> Result<(Vec<u8>, Response)> {
        self.send_api(method, path, None).await
    }

    /// Sends an API request with a JSON body.
    pub(crate) async fn request_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: &B,
    ) -> Result<(Vec<u8>, Response)> {
        let body = serde_json::to_vec(params).map_err(ApiError::Encode)?;
        self.send_api(method, path, Some(body)).await
    }

    async fn send_api(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<(Vec<u8>, Response)> {
        let token = self.access_token().await?;

        // Custom headers first; the client owns these three.
        let mut headers = self.headers.clone();
        headers.remove(AUTHORIZATION);
        headers.remove(CONTENT_TYPE);
        headers.remove(ACCEPT);

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method, &url)
            .headers(headers)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.body(body);
        }

        self.execute(request).await
    }

    /// Sends a request and reads the full body before checking the status.
    async fn execute(&self, request: RequestBuilder) -> Result<(Vec<u8>, Response)> {
        let request = request.build()?;

        if self.verbose {
            dump_request(&request);
        }

        let response = self.transport.send(request).await?.ok_or(ApiError::NilResponse)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        if self.verbose {
            dump_response(status, &headers, &body);
        }

        match status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => {
                Ok((body, Response::new(status, headers)))
            }
            _ => Err(format_api_error(status, &body)),
        }
    }
}

fn redacted_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            if *name == AUTHORIZATION {
                format!("{}: <redacted>", name)
            } else {
                format!("{}: {}", name, value.to_str().unwrap_or("<binary>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn dump_request(request: &Request) {
    let body = request
        .body()
        .and_then(|b| b.as_bytes())
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default();

    debug!(
        target: HTTP_LOG_TARGET,
        "{} {}\n{}\n\n{}",
        request.method(),
        request.url(),
        redacted_headers(request.headers()),
        body
    );
}

/// Renders a response body for logging with any `access_token` hidden.
fn redacted_body(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(mut map)) if map.contains_key("access_token") => {
            map.insert("access_token".to_string(), serde_json::Value::from("<redacted>"));
            serde_json::Value::Object(map).to_string()
        }
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}

fn dump_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) {
    debug!(
        target: HTTP_LOG_TARGET,
        "{}\n{}\n\n{}",
        status,
        redacted_headers(headers),
        redacted_body(body)
    );
}
