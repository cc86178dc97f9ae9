//! Structured remote logging
//!
//! Diagnostic events (navigation, fetch outcomes, sync warnings) are posted
//! as JSON records to the backend's log sink. Delivery is best effort: the
//! record is handed to a detached task and any failure is dropped, so
//! logging can never block or break a user flow. Every record is mirrored
//! into local `tracing` as well.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

/// Severity of a structured log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Error details attached to a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Structured log record as accepted by the backend sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLogRecord {
    pub context: String,
    pub event: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LogErrorDetails>,
    pub timestamp: String,
    pub env: String,
    pub app: String,
}

/// Best-effort transport for structured log records
#[derive(Clone)]
pub struct StructuredLogger {
    http: reqwest::Client,
    endpoint: Option<String>,
    env: String,
    app: String,
}

impl StructuredLogger {
    /// Create a logger posting to `{base_url}/log`
    ///
    /// An empty base URL disables remote delivery; records still reach
    /// local tracing.
    pub fn new(base_url: &str, env: impl Into<String>, app: impl Into<String>) -> Self {
        let trimmed = base_url.trim_end_matches('/');
        let endpoint = if trimmed.is_empty() {
            None
        } else {
            Some(format!("{trimmed}/log"))
        };

        StructuredLogger {
            http: reqwest::Client::new(),
            endpoint,
            env: env.into(),
            app: app.into(),
        }
    }

    /// Endpoint records are delivered to, when remote delivery is enabled
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn dispatch(
        &self,
        level: LogLevel,
        context: &str,
        event: &str,
        message: &str,
        meta: Option<Value>,
        error_details: Option<LogErrorDetails>,
    ) {
        match level {
            LogLevel::Info => info!(context, event, "{message}"),
            LogLevel::Warn => warn!(context, event, "{message}"),
            LogLevel::Error => error!(context, event, "{message}"),
        }

        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };

        let record = StructuredLogRecord {
            context: context.to_string(),
            event: event.to_string(),
            level,
            message: message.to_string(),
            meta,
            error: error_details,
            timestamp: Utc::now().to_rfc3339(),
            env: self.env.clone(),
            app: self.app.clone(),
        };

        let http = self.http.clone();
        tokio::spawn(async move {
            let _ = http.post(&endpoint).json(&record).send().await;
        });
    }

    /// Emit an INFO record
    pub fn info(&self, context: &str, event: &str, message: &str, meta: Option<Value>) {
        self.dispatch(LogLevel::Info, context, event, message, meta, None);
    }

    /// Emit a WARN record
    pub fn warn(&self, context: &str, event: &str, message: &str, meta: Option<Value>) {
        self.dispatch(LogLevel::Warn, context, event, message, meta, None);
    }

    /// Emit an ERROR record carrying error details
    pub fn log_error(
        &self,
        context: &str,
        event: &str,
        message: &str,
        source: Option<&dyn std::error::Error>,
        meta: Option<Value>,
    ) {
        let details = source.map(|err| LogErrorDetails {
            name: None,
            message: Some(err.to_string()),
        });
        self.dispatch(LogLevel::Error, context, event, message, meta, details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_derived_from_base_url() {
        let logger = StructuredLogger::new("http://localhost:8080/api/", "test", "client");
        assert_eq!(logger.endpoint(), Some("http://localhost:8080/api/log"));
    }

    #[test]
    fn empty_base_url_disables_remote_delivery() {
        let logger = StructuredLogger::new("", "test", "client");
        assert_eq!(logger.endpoint(), None);
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let record = StructuredLogRecord {
            context: "auth".to_string(),
            event: "login".to_string(),
            level: LogLevel::Warn,
            message: "m".to_string(),
            meta: None,
            error: None,
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            env: "test".to_string(),
            app: "client".to_string(),
        };

        let raw = serde_json::to_string(&record).expect("serialize");
        assert!(raw.contains("\"level\":\"WARN\""));
        assert!(!raw.contains("\"meta\""));
        assert!(!raw.contains("\"error\""));
    }
}
