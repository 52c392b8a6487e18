// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! mlcontent-client: API client for the learning-content service
//!
//! This crate centralizes all network access to the content/auth backend:
//! public content listing and search, account login with an access/refresh
//! credential pair, and the authenticated profile and favorites endpoints.
//! Expired access credentials are recovered transparently with exactly one
//! refresh-and-retry per call.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod transport;

pub use client::{ApiClient, ContentQuery, SearchQuery};
pub use config::Config;
pub use error::{ApiError, Result};
pub use storage::{CredentialStorage, CredentialStore, FileStorage, MemoryStorage};
