//
//  codeship-rs
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for the Codeship v2 API at
//! `api.codeship.com/v2` and the typed operations built on it.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`client`]: Core HTTP client with token exchange and request handling
//! - [`organization`]: Organization-scoped handle that receives resource operations
//! - [`builds`]: Build entities and build operations
//! - [`projects`]: Project entities and project operations
//! - [`common`]: Shared types (errors, response wrapper, pagination)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use codeship::api::CodeshipClient;
//! use codeship::api::common::ListOptions;
//!
//! # async fn example() -> codeship::Result<()> {
//! let client = CodeshipClient::new("me@example.com", "secret")?;
//! let org = client.scope("my-org").await?;
//!
//! let page = org.list_projects_with_pagination(ListOptions::new(1, 10)).await?;
//! for project in &page.data.projects {
//!     let builds = org.list_builds(&project.uuid).await?;
//!     println!("{}: {} builds", project.name, builds.data.pagination.total);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! API errors are returned as [`ApiError`] values wrapped with the failed
//! operation, for example `unable to list builds: invalid credentials`:
//!
//! - `Unauthorized`: 401 Unauthorized, 403 Forbidden
//! - `NotFound`: 404 Not Found
//! - `RateLimited`: 429 Too Many Requests
//! - `ServerError`: 5xx Server Errors

/// Core HTTP client wrapper for the Codeship API.
///
/// Provides the [`CodeshipClient`] struct which handles:
/// - The `/auth` token exchange and transparent renewal
/// - Organization scoping
/// - Request/response serialization
/// - Error handling and status code mapping
pub mod client;

/// Organization-scoped client handle.
pub mod organization;

/// Build resources.
pub mod builds;

/// Project resources.
pub mod projects;

/// Common types shared by every resource.
///
/// Includes:
/// - [`ApiError`]: Standardized error types
/// - [`ApiResponse`]: Generic response wrapper
/// - [`ListOptions`](common::ListOptions) and [`Links`](common::Links): pagination
pub mod common;

#[cfg(test)]
mod test_support;

pub use client::{ClientBuilder, CodeshipClient, HttpTransport};

pub use common::{ApiError, ApiResponse};

pub use organization::Organization;
