use crate::models::user::UserProfile;
use chrono::{DateTime, Duration, Utc};

/// In-memory authenticated session. Either fully present or fully absent;
/// the manager never exposes a partial one.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: UserProfile,
    pub access_token: String,
    pub logged_in_at: DateTime<Utc>,
    /// True when this session was created through the staff-credential
    /// login path rather than OTP verification.
    pub is_admin_login: bool,
}

impl Session {
    pub fn expires_at(&self, duration: Duration) -> DateTime<Utc> {
        self.logged_in_at + duration
    }

    pub fn is_expired(&self, duration: Duration, now: DateTime<Utc>) -> bool {
        now - self.logged_in_at >= duration
    }
}

/// Which login page an unauthenticated visitor should be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSurface {
    General,
    Admin,
}
