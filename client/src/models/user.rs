//! User identity and login types

use serde::{Deserialize, Serialize};

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Response from the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
}

/// Profile endpoint response
///
/// The two original app variants returned slightly different shapes
/// (`userId` vs `id`, with or without name fields); this covers both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
}

/// Identity projection derived from the profile endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl AuthenticatedUser {
    /// Normalize a profile response into the client's user projection
    pub fn from_profile(profile: ProfileResponse) -> Self {
        AuthenticatedUser {
            id: profile.id.or(profile.user_id).unwrap_or_default(),
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            authorities: profile.authorities,
        }
    }

    /// Whether the user carries the admin authority
    pub fn is_admin(&self) -> bool {
        self.authorities.iter().any(|a| a == "ROLE_ADMIN")
    }
}
