pub mod file;
pub mod memory;

use crate::error::app_error::AppError;

/// Logical keys of the persisted session fields.
pub mod keys {
    pub const USER: &str = "user";
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const LOGIN_TIME: &str = "login_time";
    pub const IS_ADMIN_LOGIN: &str = "is_admin_login";

    pub const ALL: [&str; 4] = [USER, ACCESS_TOKEN, LOGIN_TIME, IS_ADMIN_LOGIN];
}

/// Key-value port backing the persisted session state.
///
/// Injected into the session manager so tests can substitute an in-memory
/// fake. `set_many` must be all-or-nothing with respect to subsequent reads.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), AppError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        for key in keys::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}
