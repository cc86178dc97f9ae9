//! Persisted draft store
//!
//! Typed accessors over the key/value storage layer. Each draft kind has
//! its own storage key and its own pending-sync flag, so plan and insurance
//! drafts sync independently and a failure in one never blocks the other.
//! Storage being unavailable degrades to "no draft", never to an error.

use std::sync::Arc;

use common::storage::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{InsuranceDraft, PlanDiaries, PlanDraft};

/// Storage keys, identical to the browser build so state survives migration
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const PLAN: &str = "myPlan";
    pub const PLAN_DIARIES: &str = "myPlanDiaries";
    pub const PLAN_PENDING: &str = "myPlanPendingSync";
    pub const INSURANCE: &str = "insuranceSnapshotDraft";
    pub const INSURANCE_PENDING: &str = "insuranceSnapshotPending";
}

/// Draft store shared by the session manager and synchronizer
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    /// Create a draft store over any storage backend
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        DraftStore { storage }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        serde_json::from_str(&raw).ok()
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(raw) = serde_json::to_string(value) {
            self.storage.set(key, &raw);
        }
    }

    // --- session token ---

    /// Stored session token, if any
    pub fn token(&self) -> Option<String> {
        self.storage.get(keys::TOKEN)
    }

    /// Persist the session token for reuse across restarts
    pub fn store_token(&self, token: &str) {
        self.storage.set(keys::TOKEN, token);
    }

    /// Remove the persisted session token
    pub fn remove_token(&self) {
        self.storage.remove(keys::TOKEN);
    }

    // --- plan draft ---

    pub fn read_plan_draft(&self) -> Option<PlanDraft> {
        self.read_json(keys::PLAN)
    }

    pub fn write_plan_draft(&self, draft: &PlanDraft) {
        self.write_json(keys::PLAN, draft);
    }

    pub fn read_plan_diaries(&self) -> PlanDiaries {
        self.read_json(keys::PLAN_DIARIES).unwrap_or_default()
    }

    pub fn write_plan_diaries(&self, diaries: &PlanDiaries) {
        self.write_json(keys::PLAN_DIARIES, diaries);
    }

    /// Mark the plan draft as written while unauthenticated
    pub fn mark_plan_pending(&self) {
        self.storage.set(keys::PLAN_PENDING, "1");
    }

    pub fn plan_pending(&self) -> bool {
        self.storage.get(keys::PLAN_PENDING).is_some()
    }

    pub fn clear_plan_pending(&self) {
        self.storage.remove(keys::PLAN_PENDING);
    }

    /// Delete the plan draft and its diaries after a confirmed sync
    pub fn clear_plan_draft(&self) {
        self.storage.remove(keys::PLAN);
        self.storage.remove(keys::PLAN_DIARIES);
    }

    // --- insurance draft ---

    pub fn read_insurance_draft(&self) -> Option<InsuranceDraft> {
        self.read_json(keys::INSURANCE)
    }

    pub fn write_insurance_draft(&self, draft: &InsuranceDraft) {
        self.write_json(keys::INSURANCE, draft);
    }

    pub fn mark_insurance_pending(&self) {
        self.storage.set(keys::INSURANCE_PENDING, "1");
    }

    pub fn insurance_pending(&self) -> bool {
        self.storage.get(keys::INSURANCE_PENDING).is_some()
    }

    pub fn clear_insurance_pending(&self) {
        self.storage.remove(keys::INSURANCE_PENDING);
    }

    pub fn clear_insurance_draft(&self) {
        self.storage.remove(keys::INSURANCE);
    }

    // --- logout ---

    /// Wipe everything written while browsing as a guest, token included
    pub fn clear_guest_state(&self) {
        for key in [
            keys::TOKEN,
            keys::PLAN,
            keys::PLAN_DIARIES,
            keys::PLAN_PENDING,
            keys::INSURANCE,
            keys::INSURANCE_PENDING,
        ] {
            self.storage.remove(key);
        }
    }
}
