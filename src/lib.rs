//
//  codeship-rs
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Codeship API Client
//!
//! A typed async client for the Codeship v2 continuous-integration API.
//!
//! ## Overview
//!
//! The client exchanges account credentials for a short-lived access token,
//! scopes itself to an organization and then lists, reads, creates and
//! controls projects and builds in that organization.
//!
//! ## Features
//!
//! - **Transparent token renewal**: the `/auth` exchange runs lazily before
//!   the first request and again whenever the token expires
//! - **Organization scoping**: case-insensitive lookup with diagnostics
//!   listing the organizations the account can access
//! - **Typed resources**: projects, builds, build pipelines, services and steps
//! - **Pagination**: `page`/`per_page` options and parsed `Link` headers
//! - **Structured errors**: [`ApiError`] with [`ErrorKind`] for branching
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client, organization handle and resource operations
//! - [`auth`]: Credentials and the cached authentication result
//! - [`config`]: Optional configuration file
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use codeship::CodeshipClient;
//!
//! # async fn example() -> codeship::Result<()> {
//! // Empty arguments fall back to CODESHIP_USERNAME / CODESHIP_PASSWORD
//! let client = CodeshipClient::new("", "")?;
//! let org = client.scope("my-org").await?;
//!
//! let build = org
//!     .get_build("project-uuid", "build-uuid")
//!     .await?
//!     .into_data();
//! println!("{} is {}", build.uuid, build.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber.
//! Enable [`ClientBuilder::verbose`] to dump every request and response at
//! `debug` level under the `codeship::http` target.

/// HTTP client, organization handle and resource operations.
pub mod api;

/// Credentials and access tokens.
pub mod auth;

/// Configuration file management.
pub mod config;

pub use api::builds::{Build, BuildList, BuildPipelines, BuildServices, BuildSteps};
pub use api::client::{ClientBuilder, CodeshipClient, HttpTransport, DEFAULT_BASE_URL};
pub use api::common::{ApiError, ApiResponse, ErrorKind, Links, ListOptions, Response, Result};
pub use api::organization::Organization;
pub use api::projects::{Project, ProjectCreateRequest, ProjectList, ProjectType, ProjectUpdateRequest};
pub use auth::{AuthCredential, Authentication, RequestAuthenticator};
pub use config::Config;

/// Crate version, sent in the default `User-Agent`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
