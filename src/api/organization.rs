//
//  codeship-rs
//  api/organization.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Organization-scoped handle.
//!
//! Every Codeship resource lives under `/organizations/{uuid}`. An
//! [`Organization`] is obtained from [`CodeshipClient::scope`] and is the
//! receiver for all project and build operations (see [`builds`](super::builds)
//! and [`projects`](super::projects)).
//!
//! The handle is a snapshot: the UUID, name and scopes are copied from the
//! authentication result at scoping time. If the account's permissions
//! change remotely, scope again to see them.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::client::{decode, CodeshipClient};
use super::common::{paginate, ApiResponse, ListOptions, Result};

/// A client scoped to one Codeship organization.
#[derive(Debug, Clone)]
pub struct Organization<'a> {
    /// Organization UUID
    pub uuid: String,
    /// Organization name
    pub name: String,
    /// Permission scopes granted to the account in this organization
    pub scopes: Vec<String>,
    client: &'a CodeshipClient,
}

impl<'a> Organization<'a> {
    pub(crate) fn new(uuid: String, name: String, scopes: Vec<String>, client: &'a CodeshipClient) -> Self {
        Self {
            uuid,
            name,
            scopes,
            client,
        }
    }

    /// Returns the client this handle was scoped from.
    pub fn client(&self) -> &'a CodeshipClient {
        self.client
    }

    /// Returns `true` if the account was granted `scope` in this organization.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Path of a project collection or resource under this organization.
    pub(crate) fn projects_path(&self) -> String {
        format!("/organizations/{}/projects", self.uuid)
    }

    pub(crate) fn builds_path(&self, project_uuid: &str) -> String {
        format!("{}/{}/builds", self.projects_path(), project_uuid)
    }

    /// GETs `path` (optionally paginated) and decodes the body into `T`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: Option<ListOptions>,
        target: &'static str,
        context: &'static str,
    ) -> Result<ApiResponse<T>> {
        let path = match opts {
            Some(opts) => paginate(path, opts).map_err(|e| e.context(context))?,
            None => path.to_string(),
        };

        let (body, response) = self
            .client
            .request(Method::GET, &path)
            .await
            .map_err(|e| e.context(context))?;

        Ok(ApiResponse {
            data: decode(&body, target)?,
            response,
        })
    }

    /// Sends `params` with `method` and decodes the body into `T`.
    pub(crate) async fn submit<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: &B,
        target: &'static str,
        context: &'static str,
    ) -> Result<ApiResponse<T>> {
        let (body, response) = self
            .client
            .request_json(method, path, params)
            .await
            .map_err(|e| e.context(context))?;

        Ok(ApiResponse {
            data: decode(&body, target)?,
            response,
        })
    }

    /// POSTs to an action endpoint whose response body is ignored.
    pub(crate) async fn trigger<B: Serialize + ?Sized>(
        &self,
        path: &str,
        params: Option<&B>,
        context: &'static str,
    ) -> Result<ApiResponse<bool>> {
        let result = match params {
            Some(params) => self.client.request_json(Method::POST, path, params).await,
            None => self.client.request(Method::POST, path).await,
        };

        let (_, response) = result.map_err(|e| e.context(context))?;
        Ok(ApiResponse { data: true, response })
    }
}
