//
//  codeship-rs
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Codeship Client
//!
//! This module provides the shared types used by every Codeship resource
//! module: error handling, the response wrapper returned by every call, and
//! pagination helpers.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ErrorKind`] - Flat category of an error, independent of context layers
//! - [`ApiResponse`] - Decoded payload plus response metadata
//! - [`Response`] - Status, headers and pagination links of an HTTP response
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use codeship::api::common::{ApiError, ErrorKind};
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     match err.kind() {
//!         ErrorKind::Unauthorized => "check your credentials",
//!         ErrorKind::RateLimited => "slow down and retry",
//!         _ if err.is_retryable() => "retry later",
//!         _ => "giving up",
//!     }
//! }
//!
//! let err = ApiError::RateLimited.context("unable to list builds");
//! assert_eq!(err.to_string(), "unable to list builds: rate limit exceeded");
//! assert_eq!(describe(&err), "slow down and retry");
//! ```

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Deserializes an explicit JSON `null` as the field's default value.
///
/// `#[serde(default)]` alone only covers a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unified error type for all Codeship API operations.
///
/// Errors raised deep in the transport are wrapped by each layer above with
/// [`ApiError::Context`], so the rendered message reads like
/// `unable to create build: project not found` while [`ApiError::root`] and
/// [`ApiError::kind`] still expose the original failure.
///
/// # Variants
///
/// | Variant | Condition |
/// |---------|-----------|
/// | `Config` | Missing credential or invalid client option |
/// | `Unauthorized` | HTTP 401 (invalid credentials) or 403 (insufficient permissions) |
/// | `RateLimited` | HTTP 429 |
/// | `NotFound` | HTTP 404 |
/// | `BadRequest` | HTTP 400 |
/// | `ServerError` | HTTP 5xx |
/// | `Http` | Any other non-success status |
/// | `Decode` | Response body does not match the expected type |
/// | `Network` | Connection, DNS, TLS or timeout failure |
/// | `NilResponse` | The transport returned neither a response nor an error |
#[derive(Error, Debug)]
pub enum ApiError {
    /// The client was misconfigured at construction time.
    #[error("{0}")]
    Config(String),

    /// The server rejected the credentials or their permissions.
    ///
    /// Carries `invalid credentials` for 401 and `insufficient permissions`
    /// for 403.
    #[error("{0}")]
    Unauthorized(String),

    /// API rate limit has been exceeded; retry after backing off.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// The request was rejected as malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The service failed to handle the request (HTTP 5xx).
    #[error("HTTP status {status}: service failure")]
    ServerError {
        /// The 5xx status code returned by the server
        status: u16,
    },

    /// Any other non-success HTTP status.
    #[error("{message}")]
    Http {
        /// The HTTP status code
        status: u16,
        /// Message extracted from the body, or a status/content summary
        message: String,
    },

    /// The response body could not be decoded into the expected type.
    #[error("unable to decode response into {target}: {source}")]
    Decode {
        /// Name of the type that was being decoded
        target: &'static str,
        /// The underlying parse error
        source: serde_json::Error,
    },

    /// The request body could not be encoded as JSON.
    #[error("unable to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The requested organization is not among the authenticated organizations.
    #[error("organization '{name}' not authorized. Authorized organizations: {authorized}")]
    OrganizationNotAuthorized {
        /// The organization name that was requested
        name: String,
        /// Rendered list of the organizations the account can access
        authorized: String,
    },

    /// An empty organization name was passed to `scope`.
    #[error("no organization name provided")]
    MissingOrganizationName,

    /// A network-level failure occurred before a response was received.
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The transport completed without an error but produced no response.
    #[error("HTTP request failed: nil response")]
    NilResponse,

    /// A URL or path could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A pagination link did not carry a usable `page` parameter.
    #[error("invalid pagination link: {0}")]
    InvalidPage(String),

    /// An error wrapped with the operation that was being attempted.
    #[error("{context}: {source}")]
    Context {
        /// Short description of the failed operation
        context: String,
        /// The wrapped error
        source: Box<ApiError>,
    },
}

/// Flat classification of an [`ApiError`], ignoring context wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential or invalid client option.
    Config,
    /// HTTP 401 or 403.
    Unauthorized,
    /// HTTP 429.
    RateLimited,
    /// HTTP 404.
    NotFound,
    /// HTTP 400.
    BadRequest,
    /// HTTP 5xx.
    Server,
    /// Any other non-success status.
    Http,
    /// A response body did not match the expected shape.
    Decode,
    /// A request body could not be serialized.
    Encode,
    /// The account cannot access the requested organization.
    OrganizationNotAuthorized,
    /// An empty organization name was passed to `scope`.
    MissingOrganizationName,
    /// The request failed before a response arrived.
    Transport,
    /// The transport returned no response.
    NilResponse,
    /// A URL or path did not parse.
    InvalidUrl,
    /// A pagination link had no usable `page` parameter.
    InvalidPage,
}

impl ApiError {
    /// Wraps this error with a short description of the failed operation.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error beneath any context layers.
    pub fn root(&self) -> &ApiError {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns the category of the root error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::RateLimited => ErrorKind::RateLimited,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::ServerError { .. } => ErrorKind::Server,
            Self::Http { .. } => ErrorKind::Http,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Encode(_) => ErrorKind::Encode,
            Self::OrganizationNotAuthorized { .. } => ErrorKind::OrganizationNotAuthorized,
            Self::MissingOrganizationName => ErrorKind::MissingOrganizationName,
            Self::Network(_) => ErrorKind::Transport,
            Self::NilResponse => ErrorKind::NilResponse,
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::InvalidPage(_) => ErrorKind::InvalidPage,
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// HTTP status code carried by the root error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Unauthorized(message) if message == INSUFFICIENT_PERMISSIONS => Some(403),
            Self::Unauthorized(_) => Some(401),
            Self::RateLimited => Some(429),
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::ServerError { status } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when retrying after a delay may succeed.
    ///
    /// Rate limiting, server failures and network errors are retryable;
    /// rejected credentials and malformed requests are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimited | ErrorKind::Server | ErrorKind::Transport | ErrorKind::NilResponse
        )
    }
}

/// Message used for 401 responses.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Message used for 403 responses.
pub const INSUFFICIENT_PERMISSIONS: &str = "insufficient permissions";

/// Metadata of a completed HTTP response.
///
/// The body has already been consumed and decoded by the time callers see
/// this; what remains is the status, the headers and the parsed `Link`
/// header, which lets list callers walk to neighbouring pages.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// All response headers
    pub headers: HeaderMap,
    /// Pagination links parsed from the `Link` header
    pub links: Links,
}

impl Response {
    /// Builds the metadata from a status and header map.
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        let links = Links::from_headers(&headers);
        Self {
            status,
            headers,
            links,
        }
    }

    /// See [`Links::current_page`].
    pub fn current_page(&self) -> Result<u32> {
        self.links.current_page()
    }

    /// See [`Links::last_page`].
    pub fn last_page(&self) -> Result<u32> {
        self.links.last_page()
    }

    /// See [`Links::next_page`].
    pub fn next_page(&self) -> Result<Option<u32>> {
        self.links.next_page()
    }

    /// See [`Links::previous_page`].
    pub fn previous_page(&self) -> Result<Option<u32>> {
        self.links.previous_page()
    }

    /// See [`Links::is_last_page`].
    pub fn is_last_page(&self) -> bool {
        self.links.is_last_page()
    }
}

/// Decoded payload of a successful call together with its response metadata.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example(org: &codeship::Organization<'_>) -> codeship::Result<()> {
/// let projects = org.list_projects().await?;
/// for project in &projects.data.projects {
///     println!("{} ({})", project.name, project.uuid);
/// }
/// if !projects.response.is_last_page() {
///     println!("more on page {:?}", projects.response.next_page()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// The decoded response payload.
    pub data: T,
    /// Status, headers and pagination links of the response.
    pub response: Response,
}

impl<T> ApiResponse<T> {
    /// Consumes the wrapper, returning only the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}
