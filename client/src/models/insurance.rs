//! Insurance self-assessment and registration types

use serde::{Deserialize, Serialize};

/// Where the user's current coverage comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsuranceSource {
    Employer,
    Private,
    Other,
    Unknown,
}

/// Coverage categories the user can tick off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsuranceType {
    Treatment,
    Income,
    Disability,
    Life,
    Pension,
    Unknown,
}

/// Locally captured insurance self-assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsuranceDraft {
    #[serde(default)]
    pub source: Option<InsuranceSource>,
    #[serde(default)]
    pub types: Vec<InsuranceType>,
    #[serde(default)]
    pub uncertain: bool,
}

/// Snapshot submission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceSnapshotRequest {
    pub source: Option<InsuranceSource>,
    pub types: Vec<InsuranceType>,
    pub uncertain: bool,
}

impl From<InsuranceDraft> for InsuranceSnapshotRequest {
    fn from(draft: InsuranceDraft) -> Self {
        InsuranceSnapshotRequest {
            source: draft.source,
            types: draft.types,
            uncertain: draft.uncertain,
        }
    }
}

/// Registration payload for a concrete policy the user already holds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserInsuranceRequest {
    pub source: InsuranceSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A registered policy as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInsurance {
    pub id: i64,
    pub source: InsuranceSource,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub valid_to: Option<String>,
}

/// Generated insurance request attachment, ready to save to disk
#[derive(Debug, Clone)]
pub struct InsuranceAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_and_types_use_upper_snake_wire_names() {
        let draft = InsuranceDraft {
            source: Some(InsuranceSource::Employer),
            types: vec![InsuranceType::Income, InsuranceType::Unknown],
            uncertain: true,
        };

        let raw = serde_json::to_string(&draft).expect("serialize");
        assert!(raw.contains("\"EMPLOYER\""));
        assert!(raw.contains("\"INCOME\""));
        assert!(raw.contains("\"UNKNOWN\""));
    }

    #[test]
    fn draft_round_trips() {
        let draft = InsuranceDraft {
            source: Some(InsuranceSource::Private),
            types: vec![InsuranceType::Life],
            uncertain: false,
        };

        let raw = serde_json::to_string(&draft).expect("serialize");
        let back: InsuranceDraft = serde_json::from_str(&raw).expect("parse");
        assert_eq!(back, draft);
    }
}
