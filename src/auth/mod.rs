//
//  codeship-rs
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Codeship issues short-lived bearer tokens from `POST /auth`. The request
//! to that endpoint is authenticated with a long-lived credential, and every
//! other call then carries the bearer token it returned.
//!
//! ## Supported Credentials
//!
//! - **Basic**: username and password, the scheme Codeship documents.
//! - **Bearer**: a pre-issued token, for proxies that front the API.
//! - **Custom**: any caller-supplied [`RequestAuthenticator`].
//!
//! ## Module Structure
//!
//! - [`token`]: the [`Authentication`] result returned by `/auth`
//!
//! ## Example
//!
//! ```rust
//! use codeship::auth::AuthCredential;
//!
//! let credential = AuthCredential::basic("ci-bot@example.com", "hunter2");
//! assert!(credential.is_complete());
//! ```

mod token;

pub use token::*;

use std::env;
use std::fmt;
use std::sync::Arc;

use reqwest::RequestBuilder;

use crate::api::common::{ApiError, Result};

/// Environment variable consulted when no username is supplied.
pub const USERNAME_ENV: &str = "CODESHIP_USERNAME";

/// Environment variable consulted when no password is supplied.
pub const PASSWORD_ENV: &str = "CODESHIP_PASSWORD";

/// A caller-supplied scheme for authenticating the `/auth` exchange.
///
/// Implementations receive the outgoing request and return it with whatever
/// headers prove the caller's identity.
///
/// # Example
///
/// ```rust
/// use codeship::auth::{AuthCredential, RequestAuthenticator};
/// use reqwest::RequestBuilder;
///
/// #[derive(Debug)]
/// struct GatewayKey(String);
///
/// impl RequestAuthenticator for GatewayKey {
///     fn apply(&self, request: RequestBuilder) -> RequestBuilder {
///         request.header("X-Gateway-Key", &self.0)
///     }
/// }
///
/// let credential = AuthCredential::custom(GatewayKey("k-123".to_string()));
/// ```
pub trait RequestAuthenticator: fmt::Debug + Send + Sync {
    /// Adds authentication to the outgoing request.
    fn apply(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Credentials used to obtain a Codeship access token.
///
/// # Variants
///
/// - `Basic`: HTTP Basic authentication with username and password.
/// - `Bearer`: a static bearer token.
/// - `Custom`: a caller-supplied [`RequestAuthenticator`].
///
/// # Notes
///
/// - `Debug` output never includes passwords or tokens.
#[derive(Clone)]
pub enum AuthCredential {
    /// Basic HTTP authentication with username and password.
    Basic {
        /// The Codeship account username (usually an email address).
        username: String,
        /// The account password.
        password: String,
    },
    /// A static bearer token.
    Bearer {
        /// The token string.
        token: String,
    },
    /// A caller-supplied authentication scheme.
    Custom(Arc<dyn RequestAuthenticator>),
}

impl AuthCredential {
    /// Creates Basic credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates bearer-token credentials.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Wraps a custom authenticator.
    pub fn custom(authenticator: impl RequestAuthenticator + 'static) -> Self {
        Self::Custom(Arc::new(authenticator))
    }

    /// Builds Basic credentials, falling back to the environment.
    ///
    /// Empty `username` or `password` arguments are replaced by
    /// `CODESHIP_USERNAME` / `CODESHIP_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if either value is still empty after the
    /// fallback.
    pub fn basic_with_env_fallback(username: &str, password: &str) -> Result<Self> {
        let username = non_empty_or_env(username, USERNAME_ENV);
        let password = non_empty_or_env(password, PASSWORD_ENV);

        if username.is_empty() || password.is_empty() {
            return Err(ApiError::Config("missing username or password".to_string()));
        }

        Ok(Self::basic(username, password))
    }

    /// Builds Basic credentials purely from the environment.
    pub fn from_env() -> Result<Self> {
        Self::basic_with_env_fallback("", "")
    }

    /// Returns `false` when a Basic or Bearer credential has empty fields.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Basic { username, password } => !username.is_empty() && !password.is_empty(),
            Self::Bearer { token } => !token.is_empty(),
            Self::Custom(_) => true,
        }
    }

    /// Applies the credential to an HTTP request.
    ///
    /// # Parameters
    ///
    /// - `request`: The [`RequestBuilder`] to add authentication headers to.
    ///
    /// # Returns
    ///
    /// Returns the modified [`RequestBuilder`] with authentication applied.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
            Self::Bearer { token } => request.bearer_auth(token),
            Self::Custom(authenticator) => authenticator.apply(request),
        }
    }
}

impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"<redacted>").finish(),
            Self::Custom(authenticator) => f.debug_tuple("Custom").field(authenticator).finish(),
        }
    }
}

fn non_empty_or_env(value: &str, var: &str) -> String {
    if value.is_empty() {
        env::var(var).unwrap_or_default()
    } else {
        value.to_string()
    }
}
