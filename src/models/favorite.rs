// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite (bookmark) models for the `/auth/favorites` endpoints.

use serde::{Deserialize, Serialize};

use crate::models::ContentSummary;

/// A user's bookmark of a content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    /// Bookmarked content item
    pub content_id: i64,
    #[serde(default)]
    pub note: Option<String>,
    /// When the bookmark was created (ISO 8601)
    pub created_at: String,
}

/// A favorite together with a summary of the content it points at.
///
/// `content` is `None` if the content item no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteWithContent {
    pub id: i64,
    pub content_id: i64,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub content: Option<ContentSummary>,
}

/// Body of `POST /auth/favorites`.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteCreate {
    pub content_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Response of `DELETE /auth/favorites/{content_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Deleted {
    pub deleted: u64,
}
