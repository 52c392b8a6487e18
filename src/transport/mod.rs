// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP transport for the content service.
//!
//! Handles:
//! - Building one request against the API base from an [`ApiRequest`]
//! - Default `Content-Type: application/json`, overridable per request
//! - Classifying non-success responses into [`ApiError::Request`]
//! - Decoding success bodies into the caller's type

pub mod authenticated;

pub use authenticated::AuthenticatedTransport;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Result};

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    /// Serialized JSON document
    Json(Vec<u8>),
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
}

/// Description of one API call, independent of credentials.
///
/// Kept separate from `reqwest::RequestBuilder` so the authenticated
/// transport can replay the same call after a refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, including any query string
    pub path: String,
    /// Caller headers; these win over the transport defaults
    pub headers: HeaderMap,
    pub body: Body,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Body::Json(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Attach a form-encoded body. No JSON content type is sent with it.
    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        self.body = Body::Form(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Unauthenticated transport: one round-trip per call, no recovery.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
}

impl Transport {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scheme, host and port of the base URL, without its path prefix.
    pub fn origin(&self) -> String {
        match reqwest::Url::parse(&self.base_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.base_url.clone(),
        }
    }

    /// Perform `request` against the API base and decode the response.
    pub async fn call<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let url = format!("{}{}", self.base_url, request.path);
        self.call_url(&url, request).await
    }

    /// Perform `request` against an absolute URL (ignores `request.path`).
    pub async fn call_url<T: DeserializeOwned>(
        &self,
        url: &str,
        request: &ApiRequest,
    ) -> Result<T> {
        tracing::debug!(method = %request.method, path = %request.path, "API request");

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(merged_headers(request));

        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(bytes) => builder.body(bytes.clone()),
            Body::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                "API request failed"
            );
            return Err(ApiError::from_status(status, body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Default headers overlaid with the request's own.
fn merged_headers(request: &ApiRequest) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if !matches!(request.body, Body::Form(_)) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    for (name, value) in request.headers.iter() {
        headers.insert(name.clone(), value.clone());
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_headers_override_defaults() {
        let request =
            ApiRequest::get("/x").header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let headers = merged_headers(&request);
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_form_body_has_no_json_content_type() {
        let request = ApiRequest::post("/auth/login").form(&[("username", "u")]);
        assert!(merged_headers(&request).get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_origin_strips_path_prefix() {
        let transport = Transport::new(reqwest::Client::new(), "http://localhost:8000/api/v1/");
        assert_eq!(transport.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(transport.origin(), "http://localhost:8000");
    }
}
