//! Environment configuration for the client
//!
//! The two original app variants diverged on a few values (profile endpoint
//! path, default landing route); those differences are configuration here,
//! not separate code paths.

use std::path::PathBuf;

/// Default backend URL for local development
const DEFAULT_LOCAL_API_BASE_URL: &str = "http://localhost:8080/api";

/// Default backend URL outside development/test
const DEFAULT_REMOTE_API_BASE_URL: &str = "https://restructuring-backend.onrender.com/api";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Environment name (development / test / production)
    pub app_env: String,
    /// Application name, reported in structured log records
    pub app_name: String,
    /// Base URL every API path is resolved against
    pub api_base_url: String,
    /// Whether config/logging debug output is enabled
    pub debug_logger: bool,
    /// Location of the local draft/session storage file
    pub storage_path: PathBuf,
    /// Route the session bounces to on unauthorized
    pub login_route: String,
    /// Route a fresh login lands on when nothing else was requested
    pub landing_route: String,
    /// Path of the authenticated profile endpoint
    pub profile_path: String,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `APP_ENV`: environment name (default: "development")
    /// - `APP_NAME`: application name (default: "Restructuring Client")
    /// - `API_BASE_URL`: backend base URL; when unset, a local default is
    ///   used in development/test and a remote default otherwise
    /// - `DEBUG_LOGGER`: debug output flag (default: on outside production)
    /// - `STORAGE_PATH`: draft storage file (default: ".restructuring/state.json")
    /// - `LOGIN_ROUTE`: login route (default: "/login")
    /// - `LANDING_ROUTE`: post-login landing route (default: "/insurance")
    /// - `PROFILE_PATH`: profile endpoint path (default: "/user/me")
    pub fn from_env() -> Self {
        let app_env = read_env("APP_ENV").unwrap_or_else(|| "development".to_string());
        let app_name = read_env("APP_NAME").unwrap_or_else(|| "Restructuring Client".to_string());

        let api_base_url = read_env("API_BASE_URL").unwrap_or_else(|| {
            if app_env == "development" || app_env == "test" {
                DEFAULT_LOCAL_API_BASE_URL.to_string()
            } else {
                DEFAULT_REMOTE_API_BASE_URL.to_string()
            }
        });

        let debug_logger = read_bool_env("DEBUG_LOGGER", app_env != "production");

        let storage_path = read_env("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".restructuring/state.json"));

        AppConfig {
            app_env,
            app_name,
            api_base_url,
            debug_logger,
            storage_path,
            login_route: read_env("LOGIN_ROUTE").unwrap_or_else(|| "/login".to_string()),
            landing_route: read_env("LANDING_ROUTE").unwrap_or_else(|| "/insurance".to_string()),
            profile_path: read_env("PROFILE_PATH").unwrap_or_else(|| "/user/me".to_string()),
        }
    }
}

/// Read an environment variable, returning a trimmed non-empty value or None
fn read_env(name: &str) -> Option<String> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read a boolean environment variable
///
/// Accepts 1/true/yes/on and 0/false/no/off, case-insensitive; anything
/// else falls back to the provided default.
fn read_bool_env(name: &str, fallback: bool) -> bool {
    let Some(raw) = read_env(name) else {
        return fallback;
    };

    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => fallback,
    }
}
