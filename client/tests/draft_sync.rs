//! Anonymous-draft synchronization against a mock backend

use std::sync::Arc;

use common::storage::MemoryStore;
use mockito::{Matcher, Server, ServerGuard};
use restructuring_client::api::ApiClient;
use restructuring_client::drafts::DraftStore;
use restructuring_client::logging::StructuredLogger;
use restructuring_client::models::{InsuranceDraft, InsuranceSource, InsuranceType, PlanDraft};
use restructuring_client::repositories::{InsuranceRepository, PlanRepository};
use restructuring_client::sync::DraftSynchronizer;
use serde_json::json;

fn build_synchronizer(server: &ServerGuard) -> (DraftSynchronizer, DraftStore) {
    let drafts = DraftStore::new(Arc::new(MemoryStore::new()));
    let api = ApiClient::new(server.url());
    let synchronizer = DraftSynchronizer::new(
        PlanRepository::new(api.clone()),
        InsuranceRepository::new(api),
        drafts.clone(),
        StructuredLogger::new("", "test", "client"),
    );
    (synchronizer, drafts)
}

fn wizard_draft() -> PlanDraft {
    PlanDraft {
        persona: Some("IT".to_string()),
        phase: Some("Før omstilling".to_string()),
        needs: vec!["Få oversikt".to_string()],
    }
}

#[tokio::test]
async fn pending_plan_draft_is_pushed_once_and_cleared() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/plan/me")
        .match_body(Matcher::Json(json!({
            "persona": "IT",
            "phase": "Før omstilling",
            "needs": ["Få oversikt"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    drafts.write_plan_draft(&wizard_draft());
    drafts.mark_plan_pending();

    synchronizer.sync_anonymous_drafts().await;

    assert!(!drafts.plan_pending());
    assert_eq!(drafts.read_plan_draft(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn each_phase_with_a_diary_gets_its_own_upsert() {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("PUT", "/plan/me")
        .match_body(Matcher::Json(json!({
            "persona": "IT",
            "phase": "Før omstilling",
            "needs": ["Få oversikt"],
            "diary": "tanker før"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let secondary = server
        .mock("PUT", "/plan/me")
        .match_body(Matcher::Json(json!({
            "persona": "IT",
            "phase": "Under omstilling",
            "needs": ["Få oversikt"],
            "diary": "tanker under"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    drafts.write_plan_draft(&wizard_draft());
    drafts.write_plan_diaries(
        &[
            ("Før omstilling".to_string(), "tanker før".to_string()),
            ("Under omstilling".to_string(), "tanker under".to_string()),
            ("Etter omstilling".to_string(), String::new()),
        ]
        .into_iter()
        .collect(),
    );
    drafts.mark_plan_pending();

    synchronizer.sync_anonymous_drafts().await;

    assert!(!drafts.plan_pending());
    primary.assert_async().await;
    secondary.assert_async().await;
}

#[tokio::test]
async fn legacy_phase_spelling_is_normalized_before_upload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/plan/me")
        .match_body(Matcher::Json(json!({
            "persona": "Annet",
            "phase": "Før omstilling",
            "needs": []
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    drafts.write_plan_draft(&PlanDraft {
        persona: None,
        phase: Some("For omstilling".to_string()),
        needs: vec![],
    });
    drafts.mark_plan_pending();

    synchronizer.sync_anonymous_drafts().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn legacy_diary_key_lands_on_the_normalized_phase() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/plan/me")
        .match_body(Matcher::Json(json!({
            "persona": "Annet",
            "phase": "Før omstilling",
            "needs": [],
            "diary": "gamle tanker"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    drafts.write_plan_draft(&PlanDraft {
        persona: None,
        phase: Some("For omstilling".to_string()),
        needs: vec![],
    });
    drafts.write_plan_diaries(
        &[("For omstilling".to_string(), "gamle tanker".to_string())]
            .into_iter()
            .collect(),
    );
    drafts.mark_plan_pending();

    synchronizer.sync_anonymous_drafts().await;

    // One upsert under the normalized spelling, not a second one under the
    // stored key.
    assert!(!drafts.plan_pending());
    mock.assert_async().await;
}

#[tokio::test]
async fn sync_without_pending_flags_makes_no_requests() {
    let mut server = Server::new_async().await;
    let plan_mock = server
        .mock("PUT", "/plan/me")
        .expect(0)
        .create_async()
        .await;
    let insurance_mock = server
        .mock("POST", "/insurance/snapshot")
        .expect(0)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    // Drafts exist but were never flagged as written while anonymous.
    drafts.write_plan_draft(&wizard_draft());

    synchronizer.sync_anonymous_drafts().await;

    assert_eq!(drafts.read_plan_draft(), Some(wizard_draft()));
    plan_mock.assert_async().await;
    insurance_mock.assert_async().await;
}

#[tokio::test]
async fn orphan_pending_flag_is_cleared_without_a_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/plan/me")
        .expect(0)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    drafts.mark_plan_pending();

    synchronizer.sync_anonymous_drafts().await;

    assert!(!drafts.plan_pending());
    mock.assert_async().await;
}

#[tokio::test]
async fn failed_sync_keeps_the_draft_for_the_next_login() {
    let mut server = Server::new_async().await;
    server
        .mock("PUT", "/plan/me")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Databasen er nede"}"#)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    drafts.write_plan_draft(&wizard_draft());
    drafts.mark_plan_pending();

    synchronizer.sync_anonymous_drafts().await;

    assert!(drafts.plan_pending());
    assert_eq!(drafts.read_plan_draft(), Some(wizard_draft()));
}

#[tokio::test]
async fn insurance_failure_never_blocks_the_plan_sync() {
    let mut server = Server::new_async().await;
    let plan_mock = server
        .mock("PUT", "/plan/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/insurance/snapshot")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Databasen er nede"}"#)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    drafts.write_plan_draft(&wizard_draft());
    drafts.mark_plan_pending();
    let insurance_draft = InsuranceDraft {
        source: Some(InsuranceSource::Employer),
        types: vec![InsuranceType::Income],
        uncertain: false,
    };
    drafts.write_insurance_draft(&insurance_draft);
    drafts.mark_insurance_pending();

    synchronizer.sync_anonymous_drafts().await;

    assert!(!drafts.plan_pending());
    assert_eq!(drafts.read_plan_draft(), None);
    assert!(drafts.insurance_pending());
    assert_eq!(drafts.read_insurance_draft(), Some(insurance_draft));
    plan_mock.assert_async().await;
}

#[tokio::test]
async fn pending_insurance_snapshot_is_pushed_and_cleared() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/insurance/snapshot")
        .match_body(Matcher::Json(json!({
            "source": "PRIVATE",
            "types": ["LIFE", "PENSION"],
            "uncertain": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let (synchronizer, drafts) = build_synchronizer(&server);
    drafts.write_insurance_draft(&InsuranceDraft {
        source: Some(InsuranceSource::Private),
        types: vec![InsuranceType::Life, InsuranceType::Pension],
        uncertain: true,
    });
    drafts.mark_insurance_pending();

    synchronizer.sync_anonymous_drafts().await;

    assert!(!drafts.insurance_pending());
    assert_eq!(drafts.read_insurance_draft(), None);
    mock.assert_async().await;
}
