//! Anonymous-draft synchronization
//!
//! Drafts written before login are pushed to the backend once a user
//! authenticates. The plan and insurance syncs run concurrently and
//! independently; neither ever propagates an error, because sync must not
//! block the login flow. On failure the local draft and its pending flag
//! stay put, so the next login retries.

use common::error::ApiResult;
use serde_json::json;

use crate::drafts::DraftStore;
use crate::logging::StructuredLogger;
use crate::models::plan::{DEFAULT_PERSONA, normalize_phase};
use crate::models::{InsuranceSnapshotRequest, PlanDiaries, PlanUpsertRequest};
use crate::repositories::{InsuranceRepository, PlanRepository};

/// Pushes pending local drafts to the backend after login
#[derive(Clone)]
pub struct DraftSynchronizer {
    plans: PlanRepository,
    insurance: InsuranceRepository,
    drafts: DraftStore,
    logger: StructuredLogger,
}

impl DraftSynchronizer {
    /// Create a new synchronizer
    pub fn new(
        plans: PlanRepository,
        insurance: InsuranceRepository,
        drafts: DraftStore,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            plans,
            insurance,
            drafts,
            logger,
        }
    }

    /// Sync both draft kinds; idempotent when no pending flags are set
    pub async fn sync_anonymous_drafts(&self) {
        tokio::join!(self.sync_plan_draft(), self.sync_insurance_draft());
    }

    async fn sync_plan_draft(&self) {
        if !self.drafts.plan_pending() {
            return;
        }

        // A flag without a draft means an earlier run was interrupted after
        // the draft was cleared; treat it as already synced.
        let Some(draft) = self.drafts.read_plan_draft() else {
            self.drafts.clear_plan_pending();
            return;
        };

        // Diary keys are phases too and can carry the legacy spelling, so
        // normalize them the same way as the draft's phase; empty notes are
        // dropped here once instead of being re-checked below.
        let mut diaries = PlanDiaries::new();
        for (diary_phase, diary) in self.drafts.read_plan_diaries() {
            if !diary.is_empty() {
                diaries.insert(normalize_phase(Some(diary_phase.as_str())), diary);
            }
        }

        let persona = draft
            .persona
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());
        let phase = normalize_phase(draft.phase.as_deref());
        let needs = draft.needs;

        let result: ApiResult<()> = async {
            // The primary phase always gets one upsert, carrying its diary
            // when one exists.
            self.plans
                .upsert_my_plan(&PlanUpsertRequest {
                    persona: persona.clone(),
                    phase: phase.clone(),
                    needs: needs.clone(),
                    diary: diaries.get(&phase).cloned(),
                })
                .await?;

            // One upsert per remaining phase with a non-empty diary; the
            // endpoint merges per phase, so re-runs cannot duplicate.
            for (diary_phase, diary) in &diaries {
                if *diary_phase == phase {
                    continue;
                }
                self.plans
                    .upsert_my_plan(&PlanUpsertRequest {
                        persona: persona.clone(),
                        phase: diary_phase.clone(),
                        needs: needs.clone(),
                        diary: Some(diary.clone()),
                    })
                    .await?;
            }

            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                self.drafts.clear_plan_pending();
                self.drafts.clear_plan_draft();
                self.logger
                    .info("sync", "plan_synced", "Lokal plan synkronisert.", None);
            }
            Err(err) => {
                self.logger.warn(
                    "sync",
                    "plan_sync_failed",
                    "Kunne ikke synkronisere lokalt lagret plan.",
                    Some(json!({ "status": err.status() })),
                );
            }
        }
    }

    async fn sync_insurance_draft(&self) {
        if !self.drafts.insurance_pending() {
            return;
        }

        let Some(draft) = self.drafts.read_insurance_draft() else {
            self.drafts.clear_insurance_pending();
            return;
        };

        let snapshot = InsuranceSnapshotRequest::from(draft);
        match self.insurance.save_snapshot(&snapshot).await {
            Ok(()) => {
                self.drafts.clear_insurance_pending();
                self.drafts.clear_insurance_draft();
                self.logger.info(
                    "sync",
                    "insurance_synced",
                    "Lokalt forsikringsvalg synkronisert.",
                    None,
                );
            }
            Err(err) => {
                self.logger.warn(
                    "sync",
                    "insurance_sync_failed",
                    "Kunne ikke synkronisere lokalt lagret forsikringsvalg.",
                    Some(json!({ "status": err.status() })),
                );
            }
        }
    }
}
