//
//  codeship-rs
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Access tokens issued by the Codeship `/auth` endpoint.
//!
//! A successful exchange returns a bearer token, its expiry as Unix seconds
//! and the organizations the account belongs to:
//!
//! ```json
//! {
//!   "access_token": "eyJhbGciOi...",
//!   "expires_at": 1717171717,
//!   "organizations": [
//!     {"name": "codeship", "uuid": "1c150f00-...", "scopes": ["project.read", "build.write"]}
//!   ]
//! }
//! ```

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An organization the authenticated account may act on, with its granted scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedOrganization {
    /// Organization name as Codeship reports it (lowercase).
    #[serde(default)]
    pub name: String,

    /// Organization UUID.
    #[serde(default)]
    pub uuid: String,

    /// Permission scopes granted within this organization.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl fmt::Display for AuthorizedOrganization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.name, self.uuid, self.scopes.join(", "))
    }
}

/// Result of a successful `/auth` exchange.
///
/// Replaced wholesale on every successful authentication and read-only
/// afterwards. The default value represents "not authenticated".
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    /// Bearer token for subsequent requests.
    #[serde(default)]
    pub access_token: String,

    /// Organizations the account belongs to.
    #[serde(default)]
    pub organizations: Vec<AuthorizedOrganization>,

    /// Token expiry as Unix epoch seconds.
    #[serde(default)]
    pub expires_at: i64,
}

impl Authentication {
    /// Returns `true` when the token is missing or expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_empty() || self.expires_at <= now.timestamp()
    }

    /// Returns `true` when a new `/auth` exchange is needed before the next request.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Token expiry as a timestamp, if it is representable.
    pub fn expires_at_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expires_at, 0).single()
    }

    /// Finds an authorized organization by name, ignoring ASCII case.
    pub fn find_organization(&self, name: &str) -> Option<&AuthorizedOrganization> {
        self.organizations
            .iter()
            .find(|org| org.name.eq_ignore_ascii_case(name))
    }

    /// Renders the authorized organizations for diagnostics.
    pub fn describe_organizations(&self) -> String {
        let rendered: Vec<String> = self.organizations.iter().map(ToString::to_string).collect();
        format!("[{}]", rendered.join("; "))
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authentication")
            .field("access_token", &if self.access_token.is_empty() { "" } else { "<redacted>" })
            .field("organizations", &self.organizations)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
