use crate::api::{AuthResponse, ListingApi, OtpRequest, OtpVerifyRequest, RegistrationRequest, StaffLoginRequest};
use crate::error::app_error::AppError;
use crate::session::SessionManager;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::info;
use validator::Validate;

const OTP_PURPOSE_LOGIN: &str = "login";

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{10}$").unwrap())
}

/// Outcome of OTP verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpLogin {
    LoggedIn,
    /// The mobile number verified but has no profile yet; the caller must
    /// collect registration details and call `complete_registration`.
    NeedsRegistration,
}

/// Login flows: OTP for visitors, username/password for staff. Every
/// successful path ends in [`SessionManager::login`] with the provenance
/// flag matching the surface the credentials came from.
pub struct AuthService {
    api: Arc<dyn ListingApi>,
    session: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(api: Arc<dyn ListingApi>, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    /// Requests a login OTP. The mobile number is checked locally first so
    /// an obviously bad number never reaches the network.
    pub async fn send_otp(&self, mobile: &str) -> Result<(), AppError> {
        ensure_valid_mobile(mobile)?;
        self.api
            .send_otp(&OtpRequest {
                mobile: mobile.to_string(),
                purpose: OTP_PURPOSE_LOGIN.to_string(),
            })
            .await
    }

    pub async fn verify_otp(&self, mobile: &str, otp_code: &str) -> Result<OtpLogin, AppError> {
        ensure_valid_mobile(mobile)?;
        let response = self
            .api
            .verify_otp(&OtpVerifyRequest {
                mobile: mobile.to_string(),
                otp_code: otp_code.to_string(),
            })
            .await?;

        if response.needs_registration {
            info!(mobile, "otp verified, registration required");
            return Ok(OtpLogin::NeedsRegistration);
        }

        let user = response
            .user
            .ok_or_else(|| AppError::api(502, "Login response was missing the user profile"))?;
        let token = response
            .access_token
            .ok_or_else(|| AppError::api(502, "Login response was missing the access token"))?;

        // OTP logins are never staff logins; a stale flag must not survive
        self.session.login(user, Some(token), false)?;
        Ok(OtpLogin::LoggedIn)
    }

    pub async fn complete_registration(
        &self,
        mobile: &str,
        first_name: &str,
        last_name: &str,
        email: Option<String>,
    ) -> Result<(), AppError> {
        ensure_valid_mobile(mobile)?;
        let request = RegistrationRequest {
            mobile: mobile.to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
        };
        request.validate()?;

        let AuthResponse { user, access_token } = self.api.complete_registration(&request).await?;
        self.session.login(user, Some(access_token), false)
    }

    /// Staff credential login for the back office.
    pub async fn staff_login(&self, username: &str, password: &str) -> Result<(), AppError> {
        let request = StaffLoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let AuthResponse { user, access_token } = self.api.staff_login(&request).await?;
        info!(username = %request.username, "staff login succeeded");
        self.session.login(user, Some(access_token), true)
    }
}

fn ensure_valid_mobile(mobile: &str) -> Result<(), AppError> {
    if mobile_pattern().is_match(mobile) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Please enter a valid 10-digit mobile number".to_string()))
    }
}
