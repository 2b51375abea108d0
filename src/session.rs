use crate::config::SessionConfig;
use crate::error::app_error::AppError;
use crate::models::session::{LoginSurface, Session};
use crate::models::user::UserProfile;
use crate::storage::{SessionStore, keys};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info, warn};

#[derive(Debug, Default)]
struct ManagerState {
    session: Option<Session>,
    ready: bool,
}

/// Owns the single process-wide authentication session and its rolling
/// expiry window.
///
/// The expiry deadline is the persisted `login_time` plus the configured
/// duration, checked lazily on every read access. A periodic sweep
/// ([`SessionManager::spawn_expiry_sweep`]) backs the lazy check up so an
/// idle process still drops an elapsed session; a sweep firing after a newer
/// login is harmless because it re-reads the stored timestamp.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    duration: Duration,
    state: RwLock<ManagerState>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            duration: config.duration(),
            state: RwLock::new(ManagerState::default()),
        }
    }

    fn state(&self) -> RwLockReadGuard<'_, ManagerState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, ManagerState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Restores a persisted session, if any. Runs once at process start;
    /// malformed or partial persisted state is never fatal and always
    /// resolves to "logged out" with the store cleared. Marks the manager
    /// ready regardless of outcome.
    pub fn initialize(&self) {
        let restored = self.restore_persisted();
        let mut state = self.state_mut();
        state.session = restored;
        state.ready = true;
    }

    fn restore_persisted(&self) -> Option<Session> {
        let user_raw = self.read_key(keys::USER);
        let access_token = self.read_key(keys::ACCESS_TOKEN);

        match (user_raw, access_token) {
            (Some(user_raw), Some(access_token)) => {
                let user: UserProfile = match serde_json::from_str(&user_raw) {
                    Ok(user) => user,
                    Err(err) => {
                        warn!(error = %err, "persisted user record is corrupt, clearing session state");
                        self.clear_store();
                        return None;
                    }
                };

                // A missing timestamp counts as "just now", i.e. zero elapsed.
                let logged_in_at = self.read_login_time().unwrap_or_else(Utc::now);
                if Utc::now() - logged_in_at >= self.duration {
                    info!("persisted session window has elapsed, clearing session state");
                    self.clear_store();
                    return None;
                }

                Some(Session {
                    user,
                    access_token,
                    logged_in_at,
                    is_admin_login: self.read_admin_login_flag(),
                })
            }
            (Some(_), None) => {
                warn!("user record present without access token, clearing session state");
                self.clear_store();
                None
            }
            _ => None,
        }
    }

    /// Persists the session fields in one write and installs the in-memory
    /// session. Propagates store failures; the caller must not assume the
    /// login took effect when this errors.
    pub fn login(&self, user: UserProfile, access_token: Option<String>, is_admin_login: bool) -> Result<(), AppError> {
        let now = Utc::now();
        let user_raw = serde_json::to_string(&user)?;

        // A session is only ever fully present; without a credential from
        // the caller or the store there is nothing to install.
        let access_token = match access_token {
            Some(token) => token,
            None => self
                .read_key(keys::ACCESS_TOKEN)
                .ok_or_else(|| AppError::BadRequest("Cannot log in without an access token".to_string()))?,
        };

        self.store.set_many(&[
            (keys::USER, user_raw),
            (keys::ACCESS_TOKEN, access_token.clone()),
            (keys::LOGIN_TIME, now.timestamp_millis().to_string()),
            (keys::IS_ADMIN_LOGIN, is_admin_login.to_string()),
        ])?;

        self.state_mut().session = Some(Session {
            user,
            access_token,
            logged_in_at: now,
            is_admin_login,
        });
        Ok(())
    }

    /// Clears persisted and in-memory state unconditionally. Idempotent and
    /// never fails visibly: the in-memory state must end up clean even when
    /// the store write does not.
    pub fn logout(&self) {
        if let Err(err) = self.store.clear() {
            error!(error = ?err, "failed to clear persisted session state");
        }
        self.state_mut().session = None;
    }

    /// Replaces the profile only; the expiry window keeps running.
    pub fn update_user(&self, user: UserProfile) -> Result<(), AppError> {
        let user_raw = serde_json::to_string(&user)?;
        self.store.set(keys::USER, &user_raw)?;
        if let Some(session) = self.state_mut().session.as_mut() {
            session.user = user;
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.state().ready
    }

    pub fn is_authenticated(&self) -> bool {
        let expired = match &self.state().session {
            Some(session) => session.is_expired(self.duration, Utc::now()),
            None => return false,
        };
        if expired {
            info!("session window elapsed, logging out");
            self.logout();
            return false;
        }
        true
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state().session.as_ref().map(|session| session.user.clone())
    }

    pub fn access_token(&self) -> Option<String> {
        self.state().session.as_ref().map(|session| session.access_token.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.state()
            .session
            .as_ref()
            .map(|session| session.user.is_admin_user())
            .unwrap_or(false)
    }

    /// Provenance of the current session: staff-credential login or not.
    /// Falls back to the persisted flag so the answer is available even
    /// before `initialize` has installed the in-memory session.
    pub fn is_admin_login(&self) -> bool {
        if let Some(session) = &self.state().session {
            return session.is_admin_login;
        }
        self.read_key(keys::IS_ADMIN_LOGIN).as_deref() == Some("true")
    }

    /// Remaining lifetime of the current session, for arming a one-shot
    /// expiry action.
    pub fn expires_in(&self) -> Option<std::time::Duration> {
        let state = self.state();
        let session = state.session.as_ref()?;
        (session.expires_at(self.duration) - Utc::now()).to_std().ok()
    }

    /// Periodic re-check against the persisted timestamp. Covers the window
    /// where the process restarted and no one-shot action is armed, and
    /// catches a token that disappeared from the store underneath us.
    pub fn liveness_check(&self) {
        if self.state().session.is_none() {
            return;
        }
        if self.read_key(keys::ACCESS_TOKEN).is_none() {
            warn!("access token missing from store, logging out");
            self.logout();
            return;
        }
        let logged_in_at = self.read_login_time().unwrap_or_else(Utc::now);
        if Utc::now() - logged_in_at >= self.duration {
            info!("session window elapsed, logging out");
            self.logout();
        }
    }

    /// Forced logout after an unauthorized API response. The provenance flag
    /// is the decision input for the redirect target, so it is read before
    /// anything is cleared.
    pub fn handle_unauthorized(&self) -> LoginSurface {
        let surface = if self.is_admin_login() {
            LoginSurface::Admin
        } else {
            LoginSurface::General
        };
        self.logout();
        surface
    }

    pub fn spawn_expiry_sweep(self: &Arc<Self>, interval: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // interval fires immediately; skip the initial tick
            ticker.tick().await;
            loop {
                ticker.tick().await;
                manager.liveness_check();
            }
        })
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = ?err, "failed to read session store");
                None
            }
        }
    }

    fn read_login_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.read_key(keys::LOGIN_TIME)?;
        let millis = raw.parse::<i64>().ok()?;
        DateTime::from_timestamp_millis(millis)
    }

    fn read_admin_login_flag(&self) -> bool {
        self.read_key(keys::IS_ADMIN_LOGIN).as_deref() == Some("true")
    }

    fn clear_store(&self) {
        if let Err(err) = self.store.clear() {
            error!(error = ?err, "failed to clear persisted session state");
        }
    }
}
