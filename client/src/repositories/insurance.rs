//! Insurance repository
//!
//! Covers the snapshot self-assessment, registered policies, and the
//! generated insurance-request attachment.

use std::sync::OnceLock;

use common::error::ApiResult;
use regex::Regex;
use reqwest::Method;

use crate::api::{ApiClient, RequestOptions};
use crate::models::{
    InsuranceAttachment, InsuranceSnapshotRequest, RegisterUserInsuranceRequest, UserInsurance,
};

const FALLBACK_FILENAME: &str = "insurance_request.xml";

/// Remote repository for insurance endpoints
#[derive(Clone)]
pub struct InsuranceRepository {
    api: ApiClient,
}

impl InsuranceRepository {
    /// Create a new insurance repository
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Submit the insurance self-assessment snapshot
    pub async fn save_snapshot(&self, snapshot: &InsuranceSnapshotRequest) -> ApiResult<()> {
        self.api
            .send(
                Method::POST,
                "/insurance/snapshot",
                RequestOptions::json(snapshot),
            )
            .await?;
        Ok(())
    }

    /// Register a policy the user already holds
    pub async fn register_my_insurance(
        &self,
        request: &RegisterUserInsuranceRequest,
    ) -> ApiResult<()> {
        self.api
            .send(Method::POST, "/insurance/my", RequestOptions::json(request))
            .await?;
        Ok(())
    }

    /// List the user's registered policies
    pub async fn my_insurances(&self) -> ApiResult<Vec<UserInsurance>> {
        self.api.get("/insurance/my").await
    }

    /// Generate and download the insurance request attachment
    pub async fn send_insurance_request(&self) -> ApiResult<InsuranceAttachment> {
        let response = self
            .api
            .send_raw(Method::POST, "/insurance/send", RequestOptions::default())
            .await?;

        let filename = response
            .content_disposition
            .as_deref()
            .map(extract_filename)
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());

        Ok(InsuranceAttachment {
            filename,
            content: response.bytes,
        })
    }
}

/// Pull the attachment filename out of a `Content-Disposition` header
///
/// Prefers the literal `filename="..."` form; the RFC 5987 `filename*=`
/// form is percent-decoded, keeping the encoded text when decoding fails.
fn extract_filename(disposition: &str) -> String {
    static FILENAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = FILENAME_REGEX.get_or_init(|| {
        Regex::new(r#"filename\*=UTF-8''([^;]+)|filename="?([^";]+)"?"#)
            .expect("Failed to compile filename regex")
    });

    let Some(captures) = regex.captures(disposition) else {
        return FALLBACK_FILENAME.to_string();
    };

    if let Some(quoted) = captures.get(2) {
        return quoted.as_str().to_string();
    }

    if let Some(encoded) = captures.get(1) {
        return percent_decode(encoded.as_str());
    }

    FALLBACK_FILENAME.to_string()
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = [bytes[i + 1], bytes[i + 2]];
            if let Ok(value) = u8::from_str_radix(std::str::from_utf8(&hex).unwrap_or(""), 16) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}
