//
//  codeship-rs
//  api/test_support.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Per-test helpers: fixtures and a client pointed at a `mockito` server.

use mockito::{Mock, Server, ServerGuard};

use crate::{AuthCredential, CodeshipClient};

pub const ORG_UUID: &str = "28123f10-e33d-5533-b53f-111ef8d7b14f";
pub const PROJECT_UUID: &str = "c38f3280-792b-0135-21bb-4e0cf8ff365b";
pub const BUILD_UUID: &str = "25a9b7e0-5a5a-0136-0e7e-1e7e1d8d7b0f";

pub const AUTH_SUCCESS: &str = include_str!("../../testdata/auth/success.json");
pub const BUILD: &str = include_str!("../../testdata/builds/build.json");
pub const BUILD_WITH_NULLS: &str = include_str!("../../testdata/builds/build_nulls.json");
pub const BUILDS: &str = include_str!("../../testdata/builds/list.json");
pub const BUILD_PIPELINES: &str = include_str!("../../testdata/builds/pipelines.json");
pub const BUILD_SERVICES: &str = include_str!("../../testdata/builds/services.json");
pub const BUILD_STEPS: &str = include_str!("../../testdata/builds/steps.json");
pub const PROJECT: &str = include_str!("../../testdata/projects/project.json");
pub const PROJECT_WITH_NULLS: &str = include_str!("../../testdata/projects/project_nulls.json");
pub const PROJECTS: &str = include_str!("../../testdata/projects/list.json");
pub const NOT_FOUND: &str = include_str!("../../testdata/errors/not_found.json");

/// Authentication body for the fixture organization expiring at `expires_at`.
pub fn auth_body(expires_at: i64) -> String {
    AUTH_SUCCESS.replace("4102444800", &expires_at.to_string())
}

/// A client with fixed credentials talking to `server`.
pub fn client_for(server: &ServerGuard) -> CodeshipClient {
    CodeshipClient::builder(AuthCredential::basic("username", "password"))
        .base_url(server.url())
        .build()
        .unwrap()
}

/// Mounts a successful `/auth` exchange.
pub async fn mock_auth(server: &mut Server) -> Mock {
    server
        .mock("POST", "/auth")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(AUTH_SUCCESS)
        .create_async()
        .await
}
