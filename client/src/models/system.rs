//! Admin/system-status types
//!
//! The diagnostics endpoints return loosely shaped JSON; only the fields
//! the status view actually reads are typed, the rest stays as raw values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/system/health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// One page of `/system/users`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemUsersPage {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub users: Vec<Value>,
}
