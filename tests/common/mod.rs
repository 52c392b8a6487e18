// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mlcontent_client::{ApiClient, Config, CredentialStore};
use serde_json::{json, Value};
use wiremock::MockServer;

/// Path prefix the backend mounts its API under.
#[allow(dead_code)]
pub const PREFIX: &str = "/api/v1";

/// Full mock-server path for an API path.
#[allow(dead_code)]
pub fn api(path: &str) -> String {
    format!("{}{}", PREFIX, path)
}

/// Create a client against the mock server with the given credential store.
#[allow(dead_code)]
pub fn client_with_store(server: &MockServer, store: CredentialStore) -> ApiClient {
    let config = Config::with_base(&format!("{}{}", server.uri(), PREFIX))
        .expect("mock server uri is a valid base");
    ApiClient::new(&config, store).expect("Failed to build client")
}

/// Start a mock server and a client with empty in-memory credentials.
#[allow(dead_code)]
pub async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = client_with_store(&server, CredentialStore::in_memory());
    (server, client)
}

/// Start a mock server and a client already holding a credential pair.
#[allow(dead_code)]
pub async fn setup_logged_in(access: &str, refresh: &str) -> (MockServer, ApiClient) {
    let (server, client) = setup().await;
    client.credentials().set_access(access);
    client.credentials().set_refresh(refresh);
    (server, client)
}

#[allow(dead_code)]
pub fn content_json(id: i64, module: &str, title: &str) -> Value {
    json!({
        "id": id,
        "module": module,
        "subcategory": "basics",
        "title": title,
        "content_body": format!("# {}", title),
        "python_code": "import numpy as np",
        "formulas": null,
        "charts_data": null,
        "tags": ["intro"],
        "created_at": "2025-03-01T08:00:00",
        "updated_at": "2025-03-01T08:00:00"
    })
}

#[allow(dead_code)]
pub fn token_json(access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer"
    })
}

#[allow(dead_code)]
pub fn user_json() -> Value {
    json!({
        "id": 1,
        "username": "alice",
        "email": "alice@example.com",
        "nickname": null,
        "avatar_url": null,
        "bio": null,
        "email_verified": false
    })
}

/// FastAPI-style error body for a rejected access token.
#[allow(dead_code)]
pub fn expired_json() -> Value {
    json!({ "detail": "无效或过期的令牌" })
}
