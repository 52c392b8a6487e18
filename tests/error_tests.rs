// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mlcontent_client::error::ApiError;
use reqwest::StatusCode;

#[test]
fn test_unauthorized_status_is_auth_expired() {
    let err = ApiError::from_status(StatusCode::UNAUTHORIZED, String::new());
    assert!(err.is_auth_expired());
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "HTTP 401");
}

#[test]
fn test_expiry_phrase_is_auth_expired() {
    let err = ApiError::from_status(
        StatusCode::FORBIDDEN,
        r#"{"detail":"无效或过期的令牌"}"#.to_string(),
    );
    assert!(err.is_auth_expired());
}

#[test]
fn test_other_errors_are_not_auth_expired() {
    // A body that merely mentions 401 does not count; only the status does.
    let err = ApiError::from_status(
        StatusCode::BAD_REQUEST,
        "expected 401 digits".to_string(),
    );
    assert!(!err.is_auth_expired());

    let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, String::new());
    assert!(!err.is_auth_expired());
    assert_eq!(err.to_string(), "HTTP 500");

    assert!(!ApiError::NoRefreshToken.is_auth_expired());
    assert_eq!(ApiError::NoRefreshToken.status(), None);
}

#[test]
fn test_not_found() {
    let err = ApiError::from_status(StatusCode::NOT_FOUND, "missing".to_string());
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "missing");
}
