//! System repository for the admin diagnostics endpoints

use common::error::ApiResult;
use serde_json::Value;

use crate::api::ApiClient;
use crate::models::{HealthResponse, SystemUsersPage};

/// Remote repository for system-status views
#[derive(Clone)]
pub struct SystemRepository {
    api: ApiClient,
}

impl SystemRepository {
    /// Create a new system repository
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Backend health probe
    pub async fn health(&self) -> ApiResult<HealthResponse> {
        self.api.get("/system/health").await
    }

    /// Database version and connection details
    pub async fn db_info(&self) -> ApiResult<Value> {
        self.api.get("/system/dbinfo").await
    }

    /// One page of registered users
    pub async fn users(&self, offset: u64, limit: u64) -> ApiResult<SystemUsersPage> {
        self.api
            .get(&format!("/system/users?offset={offset}&limit={limit}"))
            .await
    }

    /// Aggregated profile for a single user
    pub async fn user_profile(&self, user_id: i64) -> ApiResult<Value> {
        self.api.get(&format!("/system/user-profile/{user_id}")).await
    }
}
