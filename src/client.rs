// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content service client: the operations the UI layer calls.
//!
//! Content and search endpoints are public and go through the plain
//! [`Transport`]. Account and favorites endpoints go through the
//! [`AuthenticatedTransport`], which owns credential recovery.

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ContentItem, Deleted, Favorite, FavoriteCreate, FavoriteWithContent, ProfileUpdate,
    Registration, SearchResults, StatusAck, TokenPair, User,
};
use crate::storage::{CredentialStore, FileStorage};
use crate::transport::{ApiRequest, AuthenticatedTransport, Transport};

/// Filters for `GET /content/`. Unset filters are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentQuery {
    pub module: Option<String>,
    pub subcategory: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ContentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query string including the leading `?`, or `""` with no filters.
    pub fn to_query_string(&self) -> String {
        let mut params = QueryParams::default();
        params.text("module", self.module.as_deref());
        params.text("subcategory", self.subcategory.as_deref());
        params.number("skip", self.skip);
        params.number("limit", self.limit);
        params.finish()
    }
}

/// Parameters for `GET /search/`. `query` is always sent, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub module: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_query_string(&self) -> String {
        let mut params = QueryParams::default();
        params.always("query", &self.query);
        params.text("module", self.module.as_deref());
        params.number("skip", self.skip);
        params.number("limit", self.limit);
        params.finish()
    }
}

/// Ordered `key=value` pairs with URL-encoded values.
#[derive(Default)]
struct QueryParams(Vec<String>);

impl QueryParams {
    fn always(&mut self, key: &str, value: &str) {
        self.0.push(format!("{}={}", key, urlencoding::encode(value)));
    }

    /// Empty strings count as unset.
    fn text(&mut self, key: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.always(key, v);
        }
    }

    fn number(&mut self, key: &str, value: Option<u32>) {
        if let Some(v) = value {
            self.0.push(format!("{}={}", key, v));
        }
    }

    fn finish(self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            format!("?{}", self.0.join("&"))
        }
    }
}

/// Client for the learning-content service.
///
/// Cheap to clone; clones share the HTTP connection pool, the credential
/// store and the refresh guard.
#[derive(Clone)]
pub struct ApiClient {
    transport: Transport,
    auth: AuthenticatedTransport,
    store: CredentialStore,
}

impl ApiClient {
    /// Create a client with an explicit credential store.
    pub fn new(config: &Config, store: CredentialStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let transport = Transport::new(http, &config.api_base);
        let auth = AuthenticatedTransport::new(transport.clone(), store.clone());

        Ok(Self {
            transport,
            auth,
            store,
        })
    }

    /// Create a client whose credentials persist in `config.credentials_path`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = FileStorage::new(config.credentials_path.clone());
        Self::new(config, CredentialStore::new(Arc::new(storage)))
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// The credential store backing this client.
    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    /// True if an access credential is stored.
    pub fn is_logged_in(&self) -> bool {
        !self.store.access().is_empty()
    }

    // ─── Content ─────────────────────────────────────────────────────────────

    /// List content items, optionally filtered and paginated.
    pub async fn list_contents(&self, query: &ContentQuery) -> Result<Vec<ContentItem>> {
        let path = format!("/content/{}", query.to_query_string());
        self.transport.call(&ApiRequest::get(path)).await
    }

    /// Get one content item by ID.
    pub async fn get_content(&self, id: i64) -> Result<ContentItem> {
        self.transport
            .call(&ApiRequest::get(format!("/content/{}", id)))
            .await
    }

    /// Full-text search over titles, bodies and code.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        let path = format!("/search/{}", query.to_query_string());
        self.transport.call(&ApiRequest::get(path)).await
    }

    /// Service health, served at the root of the API host.
    pub async fn health(&self) -> Result<serde_json::Value> {
        let url = format!("{}/health", self.transport.origin());
        self.transport
            .call_url(&url, &ApiRequest::get("/health"))
            .await
    }

    // ─── Account ─────────────────────────────────────────────────────────────

    /// Create an account. Does not log in.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let body = Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.transport
            .call(&ApiRequest::post("/auth/register").json(&body)?)
            .await
    }

    /// Log in with a password grant and store the returned credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let request = ApiRequest::post("/auth/login")
            .form(&[("username", username), ("password", password)]);
        let pair: TokenPair = self.transport.call(&request).await?;

        self.store.store_pair(&pair);
        tracing::info!(username, "Logged in");
        Ok(pair)
    }

    /// Exchange the stored refresh credential for a new pair and store it.
    pub async fn refresh(&self) -> Result<TokenPair> {
        self.auth.refresh().await
    }

    /// Forget stored credentials. Local only.
    pub fn logout(&self) {
        self.store.clear();
        tracing::info!("Logged out");
    }

    pub async fn me(&self) -> Result<User> {
        self.auth.call(&ApiRequest::get("/auth/me")).await
    }

    pub async fn get_profile(&self) -> Result<User> {
        self.auth.call(&ApiRequest::get("/auth/profile")).await
    }

    /// Update the given profile fields; unset fields are left unchanged.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.auth
            .call(&ApiRequest::put("/auth/profile").json(update)?)
            .await
    }

    /// Ask the server to email a password-reset link.
    pub async fn request_password_reset(&self, email: &str) -> Result<StatusAck> {
        let body = serde_json::json!({ "email": email });
        self.transport
            .call(&ApiRequest::post("/auth/password/reset/request").json(&body)?)
            .await
    }

    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<StatusAck> {
        let body = serde_json::json!({ "token": token, "new_password": new_password });
        self.transport
            .call(&ApiRequest::post("/auth/password/reset/confirm").json(&body)?)
            .await
    }

    /// Ask the server to email an address-verification link.
    pub async fn request_email_verification(&self, email: &str) -> Result<StatusAck> {
        let body = serde_json::json!({ "email": email });
        self.transport
            .call(&ApiRequest::post("/auth/email/verify/request").json(&body)?)
            .await
    }

    pub async fn confirm_email_verification(&self, token: &str) -> Result<StatusAck> {
        let body = serde_json::json!({ "token": token });
        self.transport
            .call(&ApiRequest::post("/auth/email/verify/confirm").json(&body)?)
            .await
    }

    // ─── Favorites ───────────────────────────────────────────────────────────

    /// Bookmark a content item, with an optional note.
    pub async fn add_favorite(&self, content_id: i64, note: Option<&str>) -> Result<Favorite> {
        let body = FavoriteCreate {
            content_id,
            note: note.map(str::to_string),
        };
        self.auth
            .call(&ApiRequest::post("/auth/favorites").json(&body)?)
            .await
    }

    pub async fn list_favorites(&self) -> Result<Vec<Favorite>> {
        self.auth.call(&ApiRequest::get("/auth/favorites")).await
    }

    /// Favorites with a summary of each bookmarked item.
    pub async fn list_favorites_with_content(&self) -> Result<Vec<FavoriteWithContent>> {
        self.auth
            .call(&ApiRequest::get("/auth/favorites/with-content"))
            .await
    }

    /// Remove the bookmark on `content_id`. The server answers 404 if there
    /// was none.
    pub async fn remove_favorite(&self, content_id: i64) -> Result<Deleted> {
        self.auth
            .call(&ApiRequest::delete(format!("/auth/favorites/{}", content_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_query_empty() {
        assert_eq!(ContentQuery::new().to_query_string(), "");
    }

    #[test]
    fn test_content_query_module_and_limit() {
        let query = ContentQuery::new().module("ml").limit(1);
        assert_eq!(query.to_query_string(), "?module=ml&limit=1");
    }

    #[test]
    fn test_content_query_all_filters_in_order() {
        let query = ContentQuery::new()
            .limit(20)
            .skip(0)
            .subcategory("linear algebra")
            .module("math");
        assert_eq!(
            query.to_query_string(),
            "?module=math&subcategory=linear%20algebra&skip=0&limit=20"
        );
    }

    #[test]
    fn test_content_query_empty_string_is_omitted() {
        let query = ContentQuery::new().module("").skip(5);
        assert_eq!(query.to_query_string(), "?skip=5");
    }

    #[test]
    fn test_search_query_always_has_query() {
        assert_eq!(SearchQuery::new("").to_query_string(), "?query=");
        assert_eq!(
            SearchQuery::new("gradient descent").to_query_string(),
            "?query=gradient%20descent"
        );
    }

    #[test]
    fn test_search_query_encodes_and_orders_filters() {
        let query = SearchQuery::new("a&b=c").limit(3).module("dl").skip(6);
        assert_eq!(
            query.to_query_string(),
            "?query=a%26b%3Dc&module=dl&skip=6&limit=3"
        );
    }

    #[test]
    fn test_search_query_encodes_non_ascii() {
        let query = SearchQuery::new("梯度");
        assert_eq!(query.to_query_string(), "?query=%E6%A2%AF%E5%BA%A6");
    }
}
