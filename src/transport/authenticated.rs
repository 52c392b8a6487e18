// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated transport with one-shot credential recovery.
//!
//! Every call attaches the stored access credential. If the server rejects it
//! as invalid or expired and a refresh credential is stored, the transport:
//! 1. Acquires the refresh guard (one refresh in flight per client)
//! 2. Re-checks the store: if another call already refreshed, uses that
//! 3. Otherwise exchanges the refresh credential for a new pair and stores it
//! 4. Retries the original call exactly once with the new access credential
//!
//! If the refresh itself fails, both credentials are cleared and the caller
//! sees the original error. A retried call that fails again is returned as-is.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::{ApiRequest, Transport};
use crate::error::{ApiError, Result};
use crate::models::{RefreshRequest, TokenPair};
use crate::storage::CredentialStore;

/// Path of the refresh endpoint, relative to the API base.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Transport that attaches the access credential and recovers from expiry.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    transport: Transport,
    store: CredentialStore,
    /// Serializes refresh attempts across concurrent calls.
    refresh_lock: Arc<Mutex<()>>,
}

impl AuthenticatedTransport {
    pub fn new(transport: Transport, store: CredentialStore) -> Self {
        Self {
            transport,
            store,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Perform `request` with the stored access credential, refreshing and
    /// retrying at most once if it has expired.
    pub async fn call<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let access = self.store.access();

        let err = match self.transport.call(&with_bearer(request, &access)?).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !err.is_auth_expired() {
            return Err(err);
        }

        if self.store.refresh().is_empty() {
            tracing::debug!(
                path = %request.path,
                "Access rejected and no refresh credential stored"
            );
            return Err(err);
        }

        let Some(new_access) = self.recover(&access).await else {
            return Err(err);
        };

        tracing::debug!(path = %request.path, "Retrying request with refreshed credential");
        self.transport
            .call(&with_bearer(request, &new_access)?)
            .await
    }

    /// Exchange the stored refresh credential for a new pair.
    ///
    /// Fails with [`ApiError::NoRefreshToken`] without touching the network
    /// if no refresh credential is stored. A failed exchange leaves the
    /// stored credentials untouched.
    pub async fn refresh(&self) -> Result<TokenPair> {
        let _guard = self.refresh_lock.lock().await;

        let refresh_token = self.store.refresh();
        if refresh_token.is_empty() {
            return Err(ApiError::NoRefreshToken);
        }

        self.exchange(&refresh_token).await
    }

    /// Obtain a usable access credential after `stale` was rejected.
    ///
    /// Returns `None` if recovery failed; the store has been cleared by then
    /// (here or by a concurrent caller).
    async fn recover(&self, stale: &str) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;

        // Another call may have refreshed while we waited for the guard.
        let current = self.store.access();
        if !current.is_empty() && current != stale {
            tracing::debug!("Credential already refreshed by a concurrent call");
            return Some(current);
        }

        let refresh_token = self.store.refresh();
        if refresh_token.is_empty() {
            return None;
        }

        match self.exchange(&refresh_token).await {
            Ok(pair) => Some(pair.access_token),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Credential refresh failed, clearing stored credentials"
                );
                self.store.clear();
                None
            }
        }
    }

    /// POST the refresh credential and store the returned pair.
    /// Caller must hold the refresh guard.
    async fn exchange(&self, refresh_token: &str) -> Result<TokenPair> {
        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest { refresh_token })?;
        let pair: TokenPair = self.transport.call(&request).await?;
        self.store.store_pair(&pair);
        tracing::info!("Credentials refreshed");
        Ok(pair)
    }
}

/// Copy of `request` carrying `Authorization: Bearer <access>`, or without an
/// `Authorization` header if `access` is empty.
fn with_bearer(request: &ApiRequest, access: &str) -> Result<ApiRequest> {
    let mut request = request.clone();
    if access.is_empty() {
        request.headers.remove(AUTHORIZATION);
    } else {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", access))?;
        value.set_sensitive(true);
        request.headers.insert(AUTHORIZATION, value);
    }
    Ok(request)
}
