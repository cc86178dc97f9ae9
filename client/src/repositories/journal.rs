//! Journal repository for the `/journal` endpoints

use common::error::ApiResult;
use reqwest::Method;

use crate::api::{ApiClient, RequestOptions};
use crate::models::{JournalEntry, NewJournalEntry};

/// Remote repository for the user's journal
#[derive(Clone)]
pub struct JournalRepository {
    api: ApiClient,
}

impl JournalRepository {
    /// Create a new journal repository
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Add a journal entry under a phase
    pub async fn add_entry(&self, entry: &NewJournalEntry) -> ApiResult<()> {
        self.api
            .send(Method::POST, "/journal", RequestOptions::json(entry))
            .await?;
        Ok(())
    }

    /// List every journal entry for the authenticated user
    pub async fn all_entries(&self) -> ApiResult<Vec<JournalEntry>> {
        self.api.get("/journal/all").await
    }
}
