//
//  codeship-rs
//  api/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project API types and operations.
//!
//! A project ties a repository to an organization and carries its test,
//! deployment and notification configuration.
//!
//! # Project Types
//!
//! * `basic` - Builds run on hosted VMs and report [`BuildPipelines`](super::builds::BuildPipelines)
//! * `pro` - Builds run Docker services and report services and steps
//!
//! # Example
//!
//! ```rust,no_run
//! use codeship::api::projects::{ProjectCreateRequest, ProjectType, TestPipeline};
//!
//! # async fn example(org: &codeship::Organization<'_>) -> codeship::Result<()> {
//! let request = ProjectCreateRequest {
//!     repository_url: "git@github.com:org/repo.git".to_string(),
//!     project_type: ProjectType::Basic,
//!     test_pipelines: vec![TestPipeline {
//!         name: "Tests".to_string(),
//!         commands: vec!["make test".to_string()],
//!     }],
//!     ..Default::default()
//! };
//!
//! let project = org.create_project(&request).await?.into_data();
//! println!("created {}", project.uuid);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::common::{null_as_default, ApiResponse, ListOptions, Pagination, Result};
use super::organization::Organization;

/// Kind of project, which decides how builds run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Basic,
    Pro,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

/// Branch selector of a deployment pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentBranch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch_name: String,

    /// How `branch_name` is matched: `exact` or `wildcard`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_node: String,
}

/// A deployment pipeline of a Basic project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPipeline {
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch: DeploymentBranch,

    /// Deployment configuration. Its shape depends on the deployment
    /// provider, so it is kept as raw JSON.
    #[serde(default)]
    pub config: serde_json::Value,

    #[serde(default, deserialize_with = "null_as_default")]
    pub position: i64,
}

/// An environment variable exposed to builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

/// Notifier-specific settings of a [`NotificationRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOptions {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub key: String,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub room: String,
}

/// When and where build notifications are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub branch_match: String,

    /// Build statuses that trigger the notification, e.g. `failed`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub build_statuses: Vec<String>,

    /// Notifier name, e.g. `email`, `slack` or `webhook`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub notifier: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub options: NotificationOptions,

    /// Recipients of email notifications (`all` or `committer`).
    #[serde(default, deserialize_with = "null_as_default", alias = "target", skip_serializing_if = "String::is_empty")]
    pub email_target: String,
}

/// A named set of test commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPipeline {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: Vec<String>,
}

/// A Codeship project.
///
/// # Fields
///
/// * `uuid` - Project identifier used in API paths
/// * `name` - Repository name, e.g. `codeship/codeship-go`
/// * `project_type` - [`ProjectType::Basic`] or [`ProjectType::Pro`] (`type` on the wire)
/// * `ssh_key` - Public key Codeship uses to clone the repository
/// * `aes_key` - Encryption key for Pro project secrets, Pro only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub project_type: ProjectType,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub aes_key: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub authentication_user: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub organization_uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub repository_provider: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub repository_url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub ssh_key: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub team_ids: Vec<u64>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub setup_commands: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub test_pipelines: Vec<TestPipeline>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub deployment_pipelines: Vec<DeploymentPipeline>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_rules: Vec<NotificationRule>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A page of projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    project: Project,
}

/// Body of `POST /organizations/{org}/projects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectCreateRequest {
    pub repository_url: String,

    #[serde(rename = "type")]
    pub project_type: ProjectType,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<u64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub setup_commands: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_pipelines: Vec<TestPipeline>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deployment_pipelines: Vec<DeploymentPipeline>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notification_rules: Vec<NotificationRule>,
}

/// Body of `PUT /organizations/{org}/projects/{project}`.
///
/// The repository cannot be changed once a project exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectUpdateRequest {
    #[serde(rename = "type")]
    pub project_type: ProjectType,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<u64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub setup_commands: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_pipelines: Vec<TestPipeline>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deployment_pipelines: Vec<DeploymentPipeline>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notification_rules: Vec<NotificationRule>,
}

impl From<&Project> for ProjectUpdateRequest {
    fn from(project: &Project) -> Self {
        Self {
            project_type: project.project_type,
            team_ids: project.team_ids.clone(),
            setup_commands: project.setup_commands.clone(),
            test_pipelines: project.test_pipelines.clone(),
            deployment_pipelines: project.deployment_pipelines.clone(),
            environment_variables: project.environment_variables.clone(),
            notification_rules: project.notification_rules.clone(),
        }
    }
}

fn unwrap_project(response: ApiResponse<ProjectResponse>) -> ApiResponse<Project> {
    ApiResponse {
        data: response.data.project,
        response: response.response,
    }
}

impl Organization<'_> {
    /// Lists the organization's projects (first page, server defaults).
    pub async fn list_projects(&self) -> Result<ApiResponse<ProjectList>> {
        self.list_projects_page(None).await
    }

    /// Lists the organization's projects with explicit paging.
    pub async fn list_projects_with_pagination(&self, opts: ListOptions) -> Result<ApiResponse<ProjectList>> {
        self.list_projects_page(Some(opts)).await
    }

    #[instrument(skip(self), fields(org = %self.name))]
    async fn list_projects_page(&self, opts: Option<ListOptions>) -> Result<ApiResponse<ProjectList>> {
        self.fetch(&self.projects_path(), opts, "ProjectList", "unable to list projects")
            .await
    }

    /// Fetches one project by UUID.
    #[instrument(skip(self), fields(org = %self.name))]
    pub async fn get_project(&self, project_uuid: &str) -> Result<ApiResponse<Project>> {
        let path = format!("{}/{}", self.projects_path(), project_uuid);
        let response: ApiResponse<ProjectResponse> =
            self.fetch(&path, None, "Project", "unable to get project").await?;
        Ok(unwrap_project(response))
    }

    /// Creates a project and returns it as stored by Codeship.
    #[instrument(skip(self, request), fields(org = %self.name, repository = %request.repository_url))]
    pub async fn create_project(&self, request: &ProjectCreateRequest) -> Result<ApiResponse<Project>> {
        let response: ApiResponse<ProjectResponse> = self
            .submit(
                Method::POST,
                &self.projects_path(),
                request,
                "Project",
                "unable to create project",
            )
            .await?;
        Ok(unwrap_project(response))
    }

    /// Replaces the configuration of an existing project.
    #[instrument(skip(self, request), fields(org = %self.name))]
    pub async fn update_project(
        &self,
        project_uuid: &str,
        request: &ProjectUpdateRequest,
    ) -> Result<ApiResponse<Project>> {
        let path = format!("{}/{}", self.projects_path(), project_uuid);
        let response: ApiResponse<ProjectResponse> = self
            .submit(Method::PUT, &path, request, "Project", "unable to update project")
            .await?;
        Ok(unwrap_project(response))
    }
}
