// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models exchanged with the content service.

pub mod content;
pub mod favorite;
pub mod user;

pub use content::{ContentItem, ContentSummary, Formula, SearchResults, Tags};
pub use favorite::{Deleted, Favorite, FavoriteCreate, FavoriteWithContent};
pub use user::{ProfileUpdate, RefreshRequest, Registration, StatusAck, TokenPair, User};
