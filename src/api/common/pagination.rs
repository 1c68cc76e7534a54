//
//  codeship-rs
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Codeship API Responses
//!
//! Codeship paginates list endpoints with `page` and `per_page` query
//! parameters. Each list payload embeds a small envelope (`total`,
//! `per_page`, `page`) and the HTTP response carries an RFC 8288 `Link`
//! header pointing at the neighbouring pages.
//!
//! # Overview
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`ListOptions`] | Page selection passed by the caller |
//! | [`Pagination`] | Envelope embedded in list payloads |
//! | [`Links`] | `next`/`previous`/`last`/`first` URLs from the `Link` header |
//!
//! # Example
//!
//! ```rust
//! use codeship::api::common::{paginate, Links, ListOptions};
//!
//! let path = paginate("/organizations/123/projects", ListOptions::new(2, 30)).unwrap();
//! assert_eq!(path, "/organizations/123/projects?page=2&per_page=30");
//!
//! let links = Links::from_header(
//!     r#"<https://api.codeship.com/v2/x?page=3>; rel="next", <https://api.codeship.com/v2/x?page=1>; rel="prev""#,
//! );
//! assert_eq!(links.current_page().unwrap(), 2);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use serde::{Deserialize, Serialize};
use url::{Position, Url};

use super::{null_as_default, ApiError, Result};

/// Base used to resolve relative API paths so they can be manipulated as URLs.
const RELATIVE_BASE: &str = "http://codeship.invalid";

/// Regex pattern for a single `Link` header entry.
///
/// Matches `<https://...>; rel="next"` and captures:
/// 1. The target URL
/// 2. The relation name (quotes optional)
static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([^>]*)>\s*;\s*rel="?([A-Za-z]+)"?"#).unwrap()
});

/// Page selection for list requests.
///
/// Only positive values are applied; zero or negative values are silently
/// ignored, so `ListOptions::default()` requests the server's default page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-indexed page number
    pub page: i64,
    /// Number of items per page
    pub per_page: i64,
}

impl ListOptions {
    /// Creates options for the given page and page size.
    pub fn new(page: i64, per_page: i64) -> Self {
        Self { page, per_page }
    }

    /// Sets the page number.
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size.
    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = per_page;
        self
    }
}

/// Appends `page` and `per_page` query parameters to an API path.
///
/// Parameters are appended in the order `page`, then `per_page`, after any
/// query already present on `path`. Relative paths stay relative. When
/// neither option is positive the path is returned unchanged.
///
/// # Errors
///
/// Returns [`ApiError::InvalidUrl`] if `path` cannot be parsed as a URL or
/// URL path.
pub fn paginate(path: &str, opts: ListOptions) -> Result<String> {
    if opts.page <= 0 && opts.per_page <= 0 {
        return Ok(path.to_string());
    }

    let (mut url, relative) = match Url::parse(path) {
        Ok(url) => (url, false),
        Err(url::ParseError::RelativeUrlWithoutBase) => (Url::parse(RELATIVE_BASE)?.join(path)?, true),
        Err(e) => return Err(ApiError::InvalidUrl(e)),
    };

    {
        let mut pairs = url.query_pairs_mut();
        if opts.page > 0 {
            pairs.append_pair("page", &opts.page.to_string());
        }
        if opts.per_page > 0 {
            pairs.append_pair("per_page", &opts.per_page.to_string());
        }
    }

    if relative {
        Ok(url[Position::BeforePath..].to_string())
    } else {
        Ok(url.to_string())
    }
}

/// Pagination envelope embedded in Codeship list payloads.
///
/// Every field defaults to zero when the server omits it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of items across all pages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,

    /// Number of items per page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub per_page: u32,

    /// Current page number (1-indexed).
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: u32,
}

/// Navigation links parsed from a response's `Link` header.
///
/// Each field holds the absolute URL the server advertised for that
/// relation, or `None` when the relation was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    /// URL of the next page.
    pub next: Option<String>,
    /// URL of the previous page (`rel="prev"` or `rel="previous"`).
    pub previous: Option<String>,
    /// URL of the last page.
    pub last: Option<String>,
    /// URL of the first page.
    pub first: Option<String>,
}

impl Links {
    /// Parses a single `Link` header value.
    ///
    /// Unknown relations are ignored. When a relation appears more than
    /// once, the last occurrence wins.
    ///
    /// # Example
    ///
    /// ```rust
    /// use codeship::api::common::Links;
    ///
    /// let links = Links::from_header(r#"<https://api.codeship.com/v2/p?page=4>; rel="last""#);
    /// assert_eq!(links.last.as_deref(), Some("https://api.codeship.com/v2/p?page=4"));
    /// assert!(links.next.is_none());
    /// ```
    pub fn from_header(value: &str) -> Self {
        let mut links = Self::default();
        links.merge_header(value);
        links
    }

    /// Collects links from every `Link` header in a header map.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut links = Self::default();
        for value in headers.get_all(LINK) {
            if let Ok(text) = value.to_str() {
                links.merge_header(text);
            }
        }
        links
    }

    fn merge_header(&mut self, value: &str) {
        for caps in LINK_PATTERN.captures_iter(value) {
            let target = caps[1].to_string();
            match caps[2].to_ascii_lowercase().as_str() {
                "next" => self.next = Some(target),
                "prev" | "previous" => self.previous = Some(target),
                "last" => self.last = Some(target),
                "first" => self.first = Some(target),
                _ => {}
            }
        }
    }

    /// Returns `true` if the server did not advertise a `last` link.
    pub fn is_last_page(&self) -> bool {
        self.last.is_none()
    }

    /// Page number of the `next` link, if present.
    pub fn next_page(&self) -> Result<Option<u32>> {
        self.next.as_deref().map(page_for_url).transpose()
    }

    /// Page number of the `previous` link, if present.
    pub fn previous_page(&self) -> Result<Option<u32>> {
        self.previous.as_deref().map(page_for_url).transpose()
    }

    /// Page number of the `first` link, if present.
    pub fn first_page(&self) -> Result<Option<u32>> {
        self.first.as_deref().map(page_for_url).transpose()
    }

    /// Derives the current page number from the neighbouring links.
    ///
    /// - `previous + 1` when a previous link exists
    /// - `1` when only a next link exists
    /// - `0` when the response carries no pagination context at all
    ///
    /// # Errors
    ///
    /// Returns an error if the previous link has no valid `page` parameter
    /// or its page is the largest representable one.
    pub fn current_page(&self) -> Result<u32> {
        match (&self.previous, &self.next) {
            (Some(previous), _) => page_for_url(previous)?
                .checked_add(1)
                .ok_or_else(|| ApiError::InvalidPage(format!("page after '{}' is out of range", previous))),
            (None, Some(_)) => Ok(1),
            (None, None) => Ok(0),
        }
    }

    /// Page number of the `last` link, falling back to [`current_page`](Self::current_page).
    pub fn last_page(&self) -> Result<u32> {
        match &self.last {
            Some(last) => page_for_url(last),
            None => self.current_page(),
        }
    }
}

/// Extracts the `page` query parameter from an absolute or relative URL.
fn page_for_url(text: &str) -> Result<u32> {
    let url = match Url::parse(text) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)?.join(text)?,
        Err(e) => return Err(ApiError::InvalidUrl(e)),
    };

    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ApiError::InvalidPage(format!("no page parameter in '{}'", text)))?;

    page.parse::<u32>()
        .map_err(|e| ApiError::InvalidPage(format!("invalid page '{}' in '{}': {}", page, text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const PATH: &str = "/organizations/123/projects";

    fn url(page: u32) -> Option<String> {
        Some(format!("https://api.codeship.com/v2{}?page={}&per_page=10", PATH, page))
    }

    #[test]
    fn test_paginate_page_only() {
        assert_eq!(
            paginate(PATH, ListOptions::default().with_page(1)).unwrap(),
            "/organizations/123/projects?page=1"
        );
    }

    #[test]
    fn test_paginate_per_page_only() {
        assert_eq!(
            paginate(PATH, ListOptions::default().with_per_page(10)).unwrap(),
            "/organizations/123/projects?per_page=10"
        );
    }

    #[test]
    fn test_paginate_orders_page_before_per_page() {
        assert_eq!(
            paginate(PATH, ListOptions::new(5, 15)).unwrap(),
            "/organizations/123/projects?page=5&per_page=15"
        );
    }

    #[test]
    fn test_paginate_ignores_non_positive_values() {
        assert_eq!(paginate(PATH, ListOptions::default()).unwrap(), PATH);
        assert_eq!(paginate(PATH, ListOptions::new(-1, 0)).unwrap(), PATH);
        assert_eq!(paginate(PATH, ListOptions::new(0, -3)).unwrap(), PATH);
        assert_eq!(
            paginate(PATH, ListOptions::new(-1, 20)).unwrap(),
            "/organizations/123/projects?per_page=20"
        );
    }

    #[test]
    fn test_paginate_keeps_absolute_urls_absolute() {
        assert_eq!(
            paginate("https://api.codeship.com/v2/organizations/1/projects", ListOptions::new(2, 0)).unwrap(),
            "https://api.codeship.com/v2/organizations/1/projects?page=2"
        );
    }

    #[test]
    fn test_paginate_rejects_malformed_url() {
        let err = paginate("http://[::1", ListOptions::new(1, 1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_links_from_header() {
        let header = r#"<https://api.codeship.com/v2/p?page=3>; rel="next", <https://api.codeship.com/v2/p?page=1>; rel="prev", <https://api.codeship.com/v2/p?page=9>; rel="last", <https://api.codeship.com/v2/p?page=1>; rel="first""#;
        let links = Links::from_header(header);

        assert_eq!(links.next.as_deref(), Some("https://api.codeship.com/v2/p?page=3"));
        assert_eq!(links.previous.as_deref(), Some("https://api.codeship.com/v2/p?page=1"));
        assert_eq!(links.last.as_deref(), Some("https://api.codeship.com/v2/p?page=9"));
        assert_eq!(links.first.as_deref(), Some("https://api.codeship.com/v2/p?page=1"));
        assert_eq!(links.next_page().unwrap(), Some(3));
        assert_eq!(links.first_page().unwrap(), Some(1));
    }

    #[test]
    fn test_links_from_headers_merges_values() {
        let mut headers = HeaderMap::new();
        headers.append(LINK, HeaderValue::from_static("</p?page=2>; rel=\"next\""));
        headers.append(LINK, HeaderValue::from_static("</p?page=5>; rel=\"last\""));

        let links = Links::from_headers(&headers);
        assert_eq!(links.next_page().unwrap(), Some(2));
        assert_eq!(links.last_page().unwrap(), 5);
    }

    #[test]
    fn test_current_page() {
        let only_next = Links { next: url(2), ..Default::default() };
        assert_eq!(only_next.current_page().unwrap(), 1);

        let middle = Links { next: url(4), previous: url(2), ..Default::default() };
        assert_eq!(middle.current_page().unwrap(), 3);

        let only_previous = Links { previous: url(6), ..Default::default() };
        assert_eq!(only_previous.current_page().unwrap(), 7);

        assert_eq!(Links::default().current_page().unwrap(), 0);
    }

    #[test]
    fn test_last_page_falls_back_to_current() {
        let with_last = Links { next: url(2), last: url(8), ..Default::default() };
        assert_eq!(with_last.last_page().unwrap(), 8);

        let without_last = Links { previous: url(3), ..Default::default() };
        assert_eq!(without_last.last_page().unwrap(), 4);
    }

    #[test]
    fn test_is_last_page() {
        assert!(Links::default().is_last_page());
        assert!(Links { previous: url(1), ..Default::default() }.is_last_page());
        assert!(!Links { last: url(3), ..Default::default() }.is_last_page());
    }

    #[test]
    fn test_page_for_url_requires_page_parameter() {
        let links = Links { previous: Some("https://api.codeship.com/v2/p".to_string()), ..Default::default() };
        assert!(matches!(links.current_page(), Err(ApiError::InvalidPage(_))));

        let links = Links { next: Some("/p?page=abc".to_string()), ..Default::default() };
        assert!(matches!(links.next_page(), Err(ApiError::InvalidPage(_))));
    }

    #[test]
    fn test_current_page_after_max_previous_is_error() {
        let links = Links { previous: Some("/p?page=4294967295".to_string()), ..Default::default() };
        assert!(matches!(links.current_page(), Err(ApiError::InvalidPage(_))));
        assert!(matches!(links.last_page(), Err(ApiError::InvalidPage(_))));
        assert_eq!(links.previous_page().unwrap(), Some(u32::MAX));
    }

    #[test]
    fn test_pagination_envelope_defaults() {
        let envelope: Pagination = serde_json::from_str(r#"{"total": 42}"#).unwrap();
        assert_eq!(envelope, Pagination { total: 42, per_page: 0, page: 0 });

        let envelope: Pagination = serde_json::from_str(r#"{"total": 3, "per_page": null, "page": null}"#).unwrap();
        assert_eq!(envelope, Pagination { total: 3, per_page: 0, page: 0 });
    }
}
