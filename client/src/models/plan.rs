//! Personal plan types
//!
//! The plan is keyed by phase: one of a small fixed set of journey stages,
//! each with its own free-text diary note.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default persona used when a draft never picked one
pub const DEFAULT_PERSONA: &str = "Annet";

/// Default phase used when a draft never picked one
pub const DEFAULT_PHASE: &str = "Før omstilling";

/// The fixed journey phases, in order
pub const PHASES: [&str; 3] = ["Før omstilling", "Under omstilling", "Etter omstilling"];

/// Locally captured plan answers, possibly incomplete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDraft {
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub needs: Vec<String>,
}

/// Per-phase diary notes; ordered so sync requests are deterministic
pub type PlanDiaries = BTreeMap<String, String>;

/// Upsert payload for the plan endpoint, keyed by phase server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanUpsertRequest {
    pub persona: String,
    pub phase: String,
    pub needs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diary: Option<String>,
}

/// Server copy of the plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPlan {
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    pub diary: Option<String>,
    #[serde(default)]
    pub diaries: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Map a stored phase onto a known one
///
/// An early app build stored the first phase without the "ø"; normalize it
/// so old drafts still land on the right diary partition.
pub fn normalize_phase(phase: Option<&str>) -> String {
    match phase {
        Some("For omstilling") => DEFAULT_PHASE.to_string(),
        Some(other) if !other.is_empty() => other.to_string(),
        _ => DEFAULT_PHASE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_legacy_spelling() {
        assert_eq!(normalize_phase(Some("For omstilling")), "Før omstilling");
        assert_eq!(normalize_phase(Some("Under omstilling")), "Under omstilling");
        assert_eq!(normalize_phase(None), "Før omstilling");
        assert_eq!(normalize_phase(Some("")), "Før omstilling");
    }

    #[test]
    fn draft_tolerates_missing_fields() {
        let draft: PlanDraft = serde_json::from_str(r#"{"persona":"IT"}"#).expect("parse");
        assert_eq!(draft.persona.as_deref(), Some("IT"));
        assert_eq!(draft.phase, None);
        assert!(draft.needs.is_empty());
    }

    #[test]
    fn upsert_omits_absent_diary() {
        let request = PlanUpsertRequest {
            persona: "IT".to_string(),
            phase: DEFAULT_PHASE.to_string(),
            needs: vec![],
            diary: None,
        };
        let raw = serde_json::to_string(&request).expect("serialize");
        assert!(!raw.contains("diary"));
    }
}
