//
//  codeship-rs
//  api/builds.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build API types and operations.
//!
//! Builds belong to a project and are addressed as
//! `/organizations/{org}/projects/{project}/builds/{build}`. Basic projects
//! report their work as pipelines; Pro (Docker) projects report services
//! and steps.
//!
//! # Build Lifecycle
//!
//! ```text
//! initiated -> waiting -> testing -> success
//!                                \-> error / stopped / infrastructure_failure
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example(client: &codeship::CodeshipClient) -> codeship::Result<()> {
//! let org = client.scope("my-org").await?;
//! let project = "c38f3280-792b-0135-21bb-4e0cf8ff365b";
//!
//! org.create_build(project, "heads/master", "185ab4c7dc4eda2a027c284f7a669cac0f2b0b6f").await?;
//!
//! let builds = org.list_builds(project).await?;
//! for build in &builds.data.builds {
//!     println!("{} {} {}", build.uuid, build.git_ref, build.status);
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::common::{null_as_default, ApiResponse, ListOptions, Pagination, Result};
use super::organization::Organization;

/// Links to a build's sub-resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildLinks {
    /// Pipelines of a Basic build.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub pipelines: String,

    /// Services of a Pro build.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub services: String,

    /// Steps of a Pro build.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub steps: String,
}

/// A single build of a project.
///
/// # Fields
///
/// * `uuid` - Build identifier
/// * `git_ref` - Git reference that was built, e.g. `heads/master` (`ref` on the wire)
/// * `commit_sha` - Commit that was built
/// * `status` - Current status such as `testing`, `success` or `error`
/// * `queued_at` / `allocated_at` / `finished_at` - Lifecycle timestamps, absent until reached
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub project_id: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub project_uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub organization_uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub branch: String,

    #[serde(rename = "ref", default, deserialize_with = "null_as_default")]
    pub git_ref: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub commit_sha: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub commit_message: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    /// Account that triggered the build.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,

    #[serde(default)]
    pub queued_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub allocated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub links: BuildLinks,
}

impl Build {
    /// Returns `true` once the build has reached a final state.
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// A page of builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub builds: Vec<Build>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct BuildResponse {
    build: Build,
}

/// Resource metrics collected for a Basic build pipeline.
///
/// Codeship reports every metric as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildPipelineMetrics {
    #[serde(deserialize_with = "null_as_default")]
    pub ami_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub queries: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cpu_user: String,
    #[serde(deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cpu_system: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instance_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub architecture: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instance_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cpu_per_second: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disk_free_bytes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disk_used_bytes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network_rx_bytes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network_tx_bytes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub max_used_connections: String,
    #[serde(deserialize_with = "null_as_default")]
    pub memory_max_usage_in_bytes: String,
}

/// One pipeline of a Basic build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPipeline {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub build_uuid: String,

    /// Pipeline kind (`build` or `deploy`).
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub pipeline_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: BuildPipelineMetrics,
}

/// A page of Basic build pipelines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPipelines {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pipelines: Vec<BuildPipeline>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

/// One step of a Pro build. Parallel and serial steps nest their children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub build_uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub service_uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub command: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub image_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub registry: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tag: String,

    /// Step kind, e.g. `run`, `parallel` or `serial`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub step_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(default)]
    pub building_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<BuildStep>,
}

/// A page of Pro build steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSteps {
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<BuildStep>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

/// One service container of a Pro build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildService {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub build_uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub pulling_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub building_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// A page of Pro build services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildServices {
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<BuildService>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct BuildRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    commit_sha: String,
    #[serde(rename = "ref", skip_serializing_if = "String::is_empty")]
    git_ref: String,
}

impl Organization<'_> {
    fn build_path(&self, project_uuid: &str, build_uuid: &str) -> String {
        format!("{}/{}", self.builds_path(project_uuid), build_uuid)
    }

    /// Starts a new build of `git_ref` at `commit_sha`.
    ///
    /// `git_ref` is a Git reference such as `heads/master`.
    #[instrument(skip(self), fields(org = %self.name))]
    pub async fn create_build(
        &self,
        project_uuid: &str,
        git_ref: &str,
        commit_sha: &str,
    ) -> Result<ApiResponse<bool>> {
        let params = BuildRequest {
            commit_sha: commit_sha.to_string(),
            git_ref: git_ref.to_string(),
        };
        self.trigger(&self.builds_path(project_uuid), Some(&params), "unable to create build")
            .await
    }

    /// Fetches one build.
    #[instrument(skip(self), fields(org = %self.name))]
    pub async fn get_build(&self, project_uuid: &str, build_uuid: &str) -> Result<ApiResponse<Build>> {
        let response: ApiResponse<BuildResponse> = self
            .fetch(&self.build_path(project_uuid, build_uuid), None, "Build", "unable to get build")
            .await?;

        Ok(ApiResponse {
            data: response.data.build,
            response: response.response,
        })
    }

    /// Lists the builds of a project (first page, server defaults).
    pub async fn list_builds(&self, project_uuid: &str) -> Result<ApiResponse<BuildList>> {
        self.list_builds_page(project_uuid, None).await
    }

    /// Lists the builds of a project with explicit paging.
    pub async fn list_builds_with_pagination(
        &self,
        project_uuid: &str,
        opts: ListOptions,
    ) -> Result<ApiResponse<BuildList>> {
        self.list_builds_page(project_uuid, Some(opts)).await
    }

    #[instrument(skip(self), fields(org = %self.name))]
    async fn list_builds_page(&self, project_uuid: &str, opts: Option<ListOptions>) -> Result<ApiResponse<BuildList>> {
        self.fetch(&self.builds_path(project_uuid), opts, "BuildList", "unable to list builds")
            .await
    }

    /// Stops a running build.
    #[instrument(skip(self), fields(org = %self.name))]
    pub async fn stop_build(&self, project_uuid: &str, build_uuid: &str) -> Result<ApiResponse<bool>> {
        let path = format!("{}/stop", self.build_path(project_uuid, build_uuid));
        self.trigger::<()>(&path, None, "unable to stop build").await
    }

    /// Restarts a previous build.
    #[instrument(skip(self), fields(org = %self.name))]
    pub async fn restart_build(&self, project_uuid: &str, build_uuid: &str) -> Result<ApiResponse<bool>> {
        let path = format!("{}/restart", self.build_path(project_uuid, build_uuid));
        self.trigger::<()>(&path, None, "unable to restart build").await
    }

    /// Lists the pipelines of a Basic build.
    pub async fn list_build_pipelines(
        &self,
        project_uuid: &str,
        build_uuid: &str,
    ) -> Result<ApiResponse<BuildPipelines>> {
        self.list_build_pipelines_page(project_uuid, build_uuid, None).await
    }

    /// Lists the pipelines of a Basic build with explicit paging.
    pub async fn list_build_pipelines_with_pagination(
        &self,
        project_uuid: &str,
        build_uuid: &str,
        opts: ListOptions,
    ) -> Result<ApiResponse<BuildPipelines>> {
        self.list_build_pipelines_page(project_uuid, build_uuid, Some(opts)).await
    }

    #[instrument(skip(self), fields(org = %self.name))]
    async fn list_build_pipelines_page(
        &self,
        project_uuid: &str,
        build_uuid: &str,
        opts: Option<ListOptions>,
    ) -> Result<ApiResponse<BuildPipelines>> {
        let path = format!("{}/pipelines", self.build_path(project_uuid, build_uuid));
        self.fetch(&path, opts, "BuildPipelines", "unable to get build pipelines")
            .await
    }

    /// Lists the services of a Pro build.
    pub async fn list_build_services(
        &self,
        project_uuid: &str,
        build_uuid: &str,
    ) -> Result<ApiResponse<BuildServices>> {
        self.list_build_services_page(project_uuid, build_uuid, None).await
    }

    /// Lists the services of a Pro build with explicit paging.
    pub async fn list_build_services_with_pagination(
        &self,
        project_uuid: &str,
        build_uuid: &str,
        opts: ListOptions,
    ) -> Result<ApiResponse<BuildServices>> {
        self.list_build_services_page(project_uuid, build_uuid, Some(opts)).await
    }

    #[instrument(skip(self), fields(org = %self.name))]
    async fn list_build_services_page(
        &self,
        project_uuid: &str,
        build_uuid: &str,
        opts: Option<ListOptions>,
    ) -> Result<ApiResponse<BuildServices>> {
        let path = format!("{}/services", self.build_path(project_uuid, build_uuid));
        self.fetch(&path, opts, "BuildServices", "unable to get build services")
            .await
    }

    /// Lists the steps of a Pro build.
    pub async fn list_build_steps(&self, project_uuid: &str, build_uuid: &str) -> Result<ApiResponse<BuildSteps>> {
        self.list_build_steps_page(project_uuid, build_uuid, None).await
    }

    /// Lists the steps of a Pro build with explicit paging.
    pub async fn list_build_steps_with_pagination(
        &self,
        project_uuid: &str,
        build_uuid: &str,
        opts: ListOptions,
    ) -> Result<ApiResponse<BuildSteps>> {
        self.list_build_steps_page(project_uuid, build_uuid, Some(opts)).await
    }

    #[instrument(skip(self), fields(org = %self.name))]
    async fn list_build_steps_page(
        &self,
        project_uuid: &str,
        build_uuid: &str,
        opts: Option<ListOptions>,
    ) -> Result<ApiResponse<BuildSteps>> {
        let path = format!("{}/steps", self.build_path(project_uuid, build_uuid));
        self.fetch(&path, opts, "BuildSteps", "unable to get build steps").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ErrorKind;
    use crate::api::test_support::{
        client_for, mock_auth, BUILD, BUILDS, BUILD_PIPELINES, BUILD_SERVICES, BUILD_STEPS, BUILD_UUID,
        BUILD_WITH_NULLS, NOT_FOUND, ORG_UUID, PROJECT_UUID,
    };
    use chrono::TimeZone;
    use mockito::Matcher;

    fn builds_path() -> String {
        format!("/organizations/{}/projects/{}/builds", ORG_UUID, PROJECT_UUID)
    }

    fn build_path(suffix: &str) -> String {
        format!("{}/{}{}", builds_path(), BUILD_UUID, suffix)
    }

    fn ts(value: &str) -> Option<DateTime<Utc>> {
        Some(DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc))
    }

    #[tokio::test]
    async fn test_create_build() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let mock = server
            .mock("POST", builds_path().as_str())
            .match_header("authorization", "Bearer 1234567890abcdef")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "commit_sha": "185ab4c7dc4eda2a027c284f7a669cac0f2b0b6f",
                "ref": "heads/master"
            })))
            .with_status(202)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let result = org
            .create_build(PROJECT_UUID, "heads/master", "185ab4c7dc4eda2a027c284f7a669cac0f2b0b6f")
            .await
            .unwrap();

        assert!(result.data);
        assert_eq!(result.response.status, 202);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_build_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("POST", builds_path().as_str())
            .with_status(404)
            .with_body(NOT_FOUND)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let err = org
            .create_build(PROJECT_UUID, "heads/master", "185ab4c7dc4eda2a027c284f7a669cac0f2b0b6f")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "unable to create build: project not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_build() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", build_path("").as_str())
            .with_status(200)
            .with_body(BUILD)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let build = org.get_build(PROJECT_UUID, BUILD_UUID).await.unwrap().into_data();

        let links_base = format!(
            "https://api.codeship.com/v2/organizations/{}/projects/{}/builds/{}",
            ORG_UUID, PROJECT_UUID, BUILD_UUID
        );
        let expected = Build {
            id: None,
            uuid: BUILD_UUID.to_string(),
            project_id: 1234,
            project_uuid: PROJECT_UUID.to_string(),
            organization_uuid: ORG_UUID.to_string(),
            branch: "master".to_string(),
            git_ref: "heads/master".to_string(),
            commit_sha: "185ab4c7dc4eda2a027c284f7a669cac0f2b0b6f".to_string(),
            commit_message: "Merge pull request #34 from codeship/feature/pagination".to_string(),
            status: "success".to_string(),
            username: "fillup".to_string(),
            queued_at: ts("2017-09-13T17:13:39.000Z"),
            allocated_at: ts("2017-09-13T17:13:36.000Z"),
            finished_at: ts("2017-09-13T17:16:17.279Z"),
            links: BuildLinks {
                pipelines: format!("{}/pipelines", links_base),
                services: format!("{}/services", links_base),
                steps: format!("{}/steps", links_base),
            },
        };

        assert_eq!(build, expected);
        assert!(build.is_finished());
        assert_eq!(
            build.finished_at.unwrap(),
            Utc.with_ymd_and_hms(2017, 9, 13, 17, 16, 17).unwrap() + chrono::Duration::milliseconds(279)
        );
    }

    #[tokio::test]
    async fn test_get_build_null_fields_decode_as_defaults() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", build_path("").as_str())
            .with_status(200)
            .with_body(BUILD_WITH_NULLS)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let build = org.get_build(PROJECT_UUID, BUILD_UUID).await.unwrap().into_data();

        assert_eq!(build.uuid, BUILD_UUID);
        assert_eq!(build.commit_message, "");
        assert_eq!(build.username, "");
        assert_eq!(build.project_id, 0);
        assert_eq!(build.links, BuildLinks::default());
        assert_eq!(build.status, "initiated");
        assert!(build.allocated_at.is_none());
        assert!(!build.is_finished());
    }

    #[test]
    fn test_pipeline_metrics_accept_null() {
        let pipeline: BuildPipeline =
            serde_json::from_str(r#"{"uuid": "p1", "metrics": {"ami_id": null, "queries": "12"}}"#).unwrap();
        assert_eq!(pipeline.metrics.ami_id, "");
        assert_eq!(pipeline.metrics.queries, "12");
    }

    #[tokio::test]
    async fn test_get_build_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", build_path("").as_str())
            .with_status(200)
            .with_body("{\"build\": \"oops\"}")
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let err = org.get_build(PROJECT_UUID, BUILD_UUID).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("unable to decode response into Build"));
    }

    #[tokio::test]
    async fn test_list_builds() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", builds_path().as_str())
            .with_status(200)
            .with_body(BUILDS)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let list = org.list_builds(PROJECT_UUID).await.unwrap().into_data();

        assert_eq!(list.builds.len(), 2);
        assert_eq!(list.pagination.total, 2);
        assert_eq!(list.pagination.per_page, 30);
        assert_eq!(list.pagination.page, 1);
        assert_eq!(list.builds[1].status, "testing");
        assert!(list.builds[1].allocated_at.is_none());
        assert!(!list.builds[1].is_finished());
        assert_eq!(list.builds[1].links, BuildLinks::default());
    }

    #[tokio::test]
    async fn test_list_builds_with_pagination() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let link = format!(
            "<{url}{path}?page=1&per_page=1>; rel=\"prev\", <{url}{path}?page=3&per_page=1>; rel=\"next\", <{url}{path}?page=4&per_page=1>; rel=\"last\"",
            url = server.url(),
            path = builds_path()
        );
        let _mock = server
            .mock("GET", format!("{}?page=2&per_page=1", builds_path()).as_str())
            .with_status(200)
            .with_header("link", &link)
            .with_body(BUILDS)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let result = org
            .list_builds_with_pagination(PROJECT_UUID, ListOptions::new(2, 1))
            .await
            .unwrap();

        assert_eq!(result.response.current_page().unwrap(), 2);
        assert_eq!(result.response.next_page().unwrap(), Some(3));
        assert_eq!(result.response.previous_page().unwrap(), Some(1));
        assert_eq!(result.response.last_page().unwrap(), 4);
        assert!(!result.response.is_last_page());
    }

    #[tokio::test]
    async fn test_list_builds_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", builds_path().as_str())
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let err = org.list_builds(PROJECT_UUID).await.unwrap_err();

        assert_eq!(err.to_string(), "unable to list builds: invalid credentials");
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_stop_and_restart_build() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let stop = server
            .mock("POST", build_path("/stop").as_str())
            .with_status(202)
            .create_async()
            .await;
        let restart = server
            .mock("POST", build_path("/restart").as_str())
            .with_status(202)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();

        assert!(org.stop_build(PROJECT_UUID, BUILD_UUID).await.unwrap().data);
        assert!(org.restart_build(PROJECT_UUID, BUILD_UUID).await.unwrap().data);
        stop.assert_async().await;
        restart.assert_async().await;
    }

    #[tokio::test]
    async fn test_stop_build_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("POST", build_path("/stop").as_str())
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let err = org.stop_build(PROJECT_UUID, BUILD_UUID).await.unwrap_err();

        assert_eq!(err.to_string(), "unable to stop build: HTTP status 503: service failure");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_list_build_pipelines() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", build_path("/pipelines").as_str())
            .with_status(200)
            .with_body(BUILD_PIPELINES)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let pipelines = org
            .list_build_pipelines(PROJECT_UUID, BUILD_UUID)
            .await
            .unwrap()
            .into_data();

        assert_eq!(pipelines.pipelines.len(), 1);
        let pipeline = &pipelines.pipelines[0];
        assert_eq!(pipeline.pipeline_type, "build");
        assert_eq!(pipeline.build_uuid, BUILD_UUID);
        assert_eq!(pipeline.metrics.instance_type, "c5.large");
        assert_eq!(pipeline.metrics.memory_max_usage_in_bytes, "1073741824");
    }

    #[tokio::test]
    async fn test_list_build_services_with_pagination() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", format!("{}?per_page=10", build_path("/services")).as_str())
            .with_status(200)
            .with_body(BUILD_SERVICES)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let services = org
            .list_build_services_with_pagination(PROJECT_UUID, BUILD_UUID, ListOptions::default().with_per_page(10))
            .await
            .unwrap()
            .into_data();

        assert_eq!(services.services.len(), 1);
        assert_eq!(services.services[0].name, "app");
        assert_eq!(services.services[0].status, "finished");
        assert_eq!(services.services[0].pulling_at, ts("2017-09-13T17:13:38.000Z"));
    }

    #[tokio::test]
    async fn test_list_build_steps_nested() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", build_path("/steps").as_str())
            .with_status(200)
            .with_body(BUILD_STEPS)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let steps = org.list_build_steps(PROJECT_UUID, BUILD_UUID).await.unwrap().into_data();

        assert_eq!(steps.steps.len(), 1);
        let parent = &steps.steps[0];
        assert_eq!(parent.step_type, "parallel");
        assert_eq!(parent.steps.len(), 1);
        assert_eq!(parent.steps[0].command, "go test ./...");
        assert!(parent.steps[0].steps.is_empty());
    }

    #[tokio::test]
    async fn test_list_build_steps_error_context() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _mock = server
            .mock("GET", build_path("/steps").as_str())
            .with_status(403)
            .create_async()
            .await;

        let client = client_for(&server);
        let org = client.scope("codeship").await.unwrap();
        let err = org.list_build_steps(PROJECT_UUID, BUILD_UUID).await.unwrap_err();

        assert_eq!(err.to_string(), "unable to get build steps: insufficient permissions");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_build_request_body() {
        let body = serde_json::to_value(BuildRequest {
            commit_sha: "abc".to_string(),
            git_ref: "heads/master".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"commit_sha": "abc", "ref": "heads/master"}));

        let body = serde_json::to_value(BuildRequest {
            commit_sha: String::new(),
            git_ref: "heads/master".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"ref": "heads/master"}));
    }
}
