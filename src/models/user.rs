//! Account, credential and profile models.

use serde::{Deserialize, Serialize};

/// Access/refresh credential pair from `/auth/login` and `/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token
    pub access_token: String,
    /// Longer-lived token exchanged for a new pair
    pub refresh_token: String,
    /// Token kind, "bearer" in practice
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Body of `POST /auth/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User account as returned by `/auth/register`, `/auth/me` and `/auth/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

/// Partial profile update for `PUT /auth/profile`. Unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.avatar_url.is_none() && self.bio.is_none()
    }
}

/// `{"status": "ok"}` acknowledgement from the password-reset and
/// email-verification endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusAck {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            nickname: Some("ada".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "nickname": "ada" }));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_token_pair_defaults_token_type() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap();
        assert_eq!(pair.token_type, "bearer");
    }
}
