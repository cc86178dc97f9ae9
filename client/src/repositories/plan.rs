//! Plan repository for the `/plan/me` endpoint

use common::error::ApiResult;
use reqwest::Method;

use crate::api::{ApiClient, RequestOptions};
use crate::models::{PlanUpsertRequest, UserPlan};

/// Remote repository for the user's personal plan
#[derive(Clone)]
pub struct PlanRepository {
    api: ApiClient,
}

impl PlanRepository {
    /// Create a new plan repository
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the authenticated user's plan
    pub async fn my_plan(&self) -> ApiResult<UserPlan> {
        self.api.get("/plan/me").await
    }

    /// Upsert the plan; the backend merges per phase
    pub async fn upsert_my_plan(&self, request: &PlanUpsertRequest) -> ApiResult<()> {
        self.api
            .send(Method::PUT, "/plan/me", RequestOptions::json(request))
            .await?;
        Ok(())
    }
}
