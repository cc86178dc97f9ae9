//! Auth session manager
//!
//! Owns the bearer token and the identity derived from it. The session is
//! a small state machine (anonymous, loading, authenticated, expired) over
//! one shared object; it installs itself as the API client's session hooks,
//! schedules the token-expiry watchdog, and triggers draft synchronization
//! after a successful login.
//!
//! Token expiry is decoded without signature verification and used only for
//! UX (auto-logout, stale-token cleanup); the server stays the authority on
//! authorization.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use common::error::{ApiError, ApiResult};
use reqwest::Method;
use serde_json::json;
use tokio::task::JoinHandle;

use crate::api::{ApiClient, RequestOptions, SessionHooks};
use crate::config::AppConfig;
use crate::drafts::DraftStore;
use crate::logging::StructuredLogger;
use crate::models::{AuthenticatedUser, LoginCredentials, LoginResponse, ProfileResponse};
use crate::sync::DraftSynchronizer;
use crate::token;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token held
    Anonymous,
    /// A token is held and the profile fetch is in flight
    Loading,
    /// Token and profile are both in place
    Authenticated,
    /// The token's expiry instant passed while the session was open
    Expired,
}

/// Routes and endpoint paths the session navigates between
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub login_route: String,
    pub landing_route: String,
    pub profile_path: String,
}

impl From<&AppConfig> for SessionConfig {
    fn from(config: &AppConfig) -> Self {
        SessionConfig {
            login_route: config.login_route.clone(),
            landing_route: config.landing_route.clone(),
            profile_path: config.profile_path.clone(),
        }
    }
}

/// Result of a completed login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub response: LoginResponse,
    pub user: AuthenticatedUser,
    /// Route the caller should land on
    pub redirect_to: String,
}

struct SessionState {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    user: Option<AuthenticatedUser>,
    status: SessionStatus,
    /// Current route including query, mirroring the UI router
    current_route: String,
    /// Route recorded when an unauthorized bounce happened, restored after
    /// the next login
    recorded_from: Option<String>,
}

struct SessionInner {
    api: ApiClient,
    drafts: DraftStore,
    sync: DraftSynchronizer,
    logger: StructuredLogger,
    config: SessionConfig,
    state: Mutex<SessionState>,
    watchdog: Mutex<Option<JoinHandle<()>>>,
}

/// Shared auth session handle
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<SessionInner>,
}

impl AuthSession {
    /// Create the session, adopting a stored token when it is still valid
    ///
    /// A stored token whose expiry lies in the past is discarded and the
    /// session starts anonymous; otherwise it starts loading and the caller
    /// should follow up with [`AuthSession::restore`] to fetch the profile.
    /// The session installs itself as the API client's hooks.
    pub fn new(
        api: ApiClient,
        drafts: DraftStore,
        sync: DraftSynchronizer,
        logger: StructuredLogger,
        config: SessionConfig,
    ) -> Self {
        let stored = drafts.token();
        let (token_value, expires_at, status) = match stored {
            Some(stored_token) if token::is_expired(&stored_token, Utc::now()) => {
                drafts.remove_token();
                (None, None, SessionStatus::Anonymous)
            }
            Some(stored_token) => {
                let expires_at = token::decode_expiry(&stored_token);
                (Some(stored_token), expires_at, SessionStatus::Loading)
            }
            None => (None, None, SessionStatus::Anonymous),
        };

        let session = AuthSession {
            inner: Arc::new(SessionInner {
                api: api.clone(),
                drafts,
                sync,
                logger,
                config,
                state: Mutex::new(SessionState {
                    token: token_value,
                    expires_at,
                    user: None,
                    status,
                    current_route: "/".to_string(),
                    recorded_from: None,
                }),
                watchdog: Mutex::new(None),
            }),
        };

        api.configure(Arc::new(session.clone()));
        session.reschedule_watchdog();
        session
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current session status
    pub fn status(&self) -> SessionStatus {
        self.state().status
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    /// Decoded token expiry, advisory only
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state().expires_at
    }

    /// Identity loaded from the profile endpoint
    pub fn user(&self) -> Option<AuthenticatedUser> {
        self.state().user.clone()
    }

    /// Whether a token is currently held
    pub fn is_authenticated(&self) -> bool {
        self.state().token.is_some()
    }

    /// Route the session believes the UI is on
    pub fn current_route(&self) -> String {
        self.state().current_route.clone()
    }

    /// Record a route change coming from the UI
    pub fn navigate(&self, route: &str) {
        self.state().current_route = route.to_string();
    }

    /// Route recorded by an unauthorized bounce, if one is waiting
    pub fn recorded_from(&self) -> Option<String> {
        self.state().recorded_from.clone()
    }

    fn cancel_watchdog(&self) {
        let mut guard = self
            .inner
            .watchdog
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }

    /// (Re)schedule the auto-logout timer for the current token
    ///
    /// Cancels any previous timer first, so a token change never leaves a
    /// stale timer behind.
    fn reschedule_watchdog(&self) {
        self.cancel_watchdog();

        let expires_at = {
            let state = self.state();
            match (&state.token, state.expires_at) {
                (Some(_), Some(expires_at)) => expires_at,
                _ => return,
            }
        };

        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let delay = (expires_at - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                AuthSession { inner }.expire();
            }
        });

        let mut guard = self
            .inner
            .watchdog
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *guard = Some(handle);
    }

    /// Discard token, expiry and user, leaving drafts alone
    fn clear_auth(&self) {
        self.cancel_watchdog();
        {
            let mut state = self.state();
            state.token = None;
            state.expires_at = None;
            state.user = None;
            state.status = SessionStatus::Anonymous;
        }
        self.inner.drafts.remove_token();
    }

    fn persist_token(&self, token_value: &str) {
        let expires_at = token::decode_expiry(token_value);
        {
            let mut state = self.state();
            state.token = Some(token_value.to_string());
            state.expires_at = expires_at;
        }
        self.inner.drafts.store_token(token_value);
        self.reschedule_watchdog();
    }

    /// Tear the session down after a 401 and bounce to the login route
    ///
    /// The route the user was on (path + query) is recorded so the next
    /// login can restore it; when already on the login route nothing is
    /// recorded and no navigation happens, so a 401 on the login page can
    /// never loop.
    pub fn handle_unauthorized(&self) {
        self.clear_auth();

        let mut state = self.state();
        if state.current_route != self.inner.config.login_route {
            state.recorded_from = Some(state.current_route.clone());
            state.current_route = self.inner.config.login_route.clone();
            drop(state);
            self.inner.logger.info(
                "auth",
                "unauthorized_redirect",
                "Sesjonen er ugyldig, sender til innlogging.",
                None,
            );
        }
    }

    /// Watchdog path: same teardown as unauthorized, but the session is
    /// marked expired so the UI can explain why the user was bounced
    fn expire(&self) {
        self.handle_unauthorized();
        self.state().status = SessionStatus::Expired;
        self.inner
            .logger
            .info("auth", "token_expired", "Sesjonen utløp.", None);
    }

    /// Fetch the profile for the stored token, if one is held
    ///
    /// Meant to be called once right after construction. A 401 tears the
    /// session down and yields `Ok(None)`; any other failure clears the
    /// session and is re-thrown so the caller can show a technical error
    /// instead of bouncing to login.
    pub async fn restore(&self) -> ApiResult<Option<AuthenticatedUser>> {
        if self.token().is_none() {
            return Ok(None);
        }
        self.load_user(None).await
    }

    async fn load_user(&self, token_override: Option<&str>) -> ApiResult<Option<AuthenticatedUser>> {
        let active = token_override
            .map(str::to_string)
            .or_else(|| self.token());
        if active.is_none() {
            let mut state = self.state();
            state.user = None;
            state.status = SessionStatus::Anonymous;
            return Ok(None);
        }

        self.state().status = SessionStatus::Loading;

        let mut options = RequestOptions::default();
        if let Some(token_value) = token_override {
            options = options.with_bearer(token_value);
        }

        let result = self
            .inner
            .api
            .request_json::<ProfileResponse>(Method::GET, &self.inner.config.profile_path, options)
            .await;

        match result {
            Ok(profile) => {
                let user = AuthenticatedUser::from_profile(profile);
                let mut state = self.state();
                state.user = Some(user.clone());
                state.status = SessionStatus::Authenticated;
                Ok(Some(user))
            }
            Err(err) if err.is_unauthorized() => {
                // The API client already ran the unauthorized hook; the
                // session is torn down at this point.
                Ok(None)
            }
            Err(err) => {
                self.clear_auth();
                Err(err)
            }
        }
    }

    /// Log in with credentials
    ///
    /// On success the token is persisted, the profile is fetched with the
    /// new token, pending anonymous drafts are synced, and the redirect
    /// target is resolved: explicit override, else the route recorded by an
    /// earlier unauthorized bounce, else the configured landing route. Any
    /// failure along the way clears the session entirely and is re-thrown.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        redirect_override: Option<&str>,
    ) -> ApiResult<LoginOutcome> {
        self.state().status = SessionStatus::Loading;

        let result = self.perform_login(credentials, redirect_override).await;
        if result.is_err() {
            self.clear_auth();
        }
        result
    }

    async fn perform_login(
        &self,
        credentials: &LoginCredentials,
        redirect_override: Option<&str>,
    ) -> ApiResult<LoginOutcome> {
        let response: LoginResponse = self
            .inner
            .api
            .request_json(
                Method::POST,
                "/auth/login",
                RequestOptions::json(credentials).skip_auth(),
            )
            .await?;

        self.persist_token(&response.token);

        let user = match self.load_user(Some(&response.token)).await? {
            Some(user) => user,
            // A 401 on a token we were just issued: surface it as a login
            // failure rather than silently half-logging-in.
            None => return Err(ApiError::from_status(401, None)),
        };

        self.inner.sync.sync_anonymous_drafts().await;

        let redirect_to = redirect_override
            .map(str::to_string)
            .or_else(|| {
                let mut state = self.state();
                state
                    .recorded_from
                    .take()
                    .filter(|from| *from != self.inner.config.login_route)
            })
            .unwrap_or_else(|| self.inner.config.landing_route.clone());

        self.navigate(&redirect_to);
        self.inner.logger.info(
            "auth",
            "login",
            "Innlogging fullført.",
            Some(json!({ "userId": response.user_id })),
        );

        Ok(LoginOutcome {
            response,
            user,
            redirect_to,
        })
    }

    /// Log out immediately
    ///
    /// Clears the token, the derived user and every locally stored draft
    /// and flag, then navigates to the override or the login route.
    pub fn logout(&self, redirect_override: Option<&str>) {
        self.clear_auth();
        self.inner.drafts.clear_guest_state();

        let target = redirect_override
            .map(str::to_string)
            .unwrap_or_else(|| self.inner.config.login_route.clone());
        self.navigate(&target);

        self.inner
            .logger
            .info("auth", "logout", "Bruker logget ut.", None);
    }
}

impl SessionHooks for AuthSession {
    fn token(&self) -> Option<String> {
        AuthSession::token(self)
    }

    fn on_unauthorized(&self) {
        self.handle_unauthorized();
    }
}
