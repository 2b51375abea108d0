pub mod http;

use crate::error::app_error::AppError;
use crate::models::lead::{Lead, LeadPeriod, LeadStats};
use crate::models::project::{ImageCategory, ImageFile, ProjectRecord};
use crate::models::tower::{Availability, BookingStatus};
use crate::models::user::UserProfile;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identifier handed back by the backend on create.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct CreatedId {
    pub id: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OtpRequest {
    pub mobile: String,
    pub purpose: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OtpVerifyRequest {
    pub mobile: String,
    pub otp_code: String,
}

/// Verification outcome: either a logged-in user or a signal that the
/// mobile number still needs a profile.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct OtpVerifyResponse {
    #[serde(default)]
    pub needs_registration: bool,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Serialize, Debug, Clone, Validate)]
pub struct RegistrationRequest {
    pub mobile: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub email: Option<String>,
}

#[derive(Serialize, Debug, Clone, Validate)]
pub struct StaffLoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
}

/// Project create/update payload already flattened to wire form: text
/// fields in submission order plus the optional cover image file part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPayload {
    pub fields: Vec<(String, String)>,
    pub cover_image: Option<ImageFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectImagePayload {
    pub project: i64,
    pub image: ImageFile,
    pub title: String,
    pub category: ImageCategory,
    pub order: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProjectAmenityPayload {
    pub project: i64,
    pub name: String,
    pub icon: String,
    pub order: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TowerPayload {
    pub project: i64,
    pub name: String,
    pub tower_number: String,
    pub total_floors: String,
    pub parking_floors: i64,
    pub residential_floors: i64,
    pub refugee_floors: i64,
    pub per_floor_flats: i64,
    pub total_lifts: i64,
    pub total_stairs: i64,
    pub booking_status: BookingStatus,
    pub is_active: bool,
    pub order: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FlatPayload {
    pub tower: i64,
    pub flat_number: String,
    pub floor: String,
    pub flat_type: String,
    pub area: String,
    pub price: String,
    pub availability: Availability,
    pub order: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TowerAmenityPayload {
    pub tower: i64,
    pub name: String,
    pub icon: String,
    pub order: i64,
}

/// The opaque HTTP/JSON boundary consumed by this client. Every call yields
/// an opaque success payload or an [`AppError`]; a 401 surfaces as
/// [`AppError::Unauthorized`] and is the only status treated specially.
#[async_trait::async_trait]
pub trait ListingApi: Send + Sync {
    async fn send_otp(&self, request: &OtpRequest) -> Result<(), AppError>;
    async fn verify_otp(&self, request: &OtpVerifyRequest) -> Result<OtpVerifyResponse, AppError>;
    async fn complete_registration(&self, request: &RegistrationRequest) -> Result<AuthResponse, AppError>;
    async fn staff_login(&self, request: &StaffLoginRequest) -> Result<AuthResponse, AppError>;

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, AppError>;
    async fn get_project(&self, id: i64) -> Result<ProjectRecord, AppError>;
    async fn create_project(&self, payload: &ProjectPayload) -> Result<CreatedId, AppError>;
    async fn update_project(&self, id: i64, payload: &ProjectPayload) -> Result<(), AppError>;
    async fn delete_project(&self, id: i64) -> Result<(), AppError>;

    async fn create_project_image(&self, payload: &ProjectImagePayload) -> Result<CreatedId, AppError>;
    async fn create_project_amenity(&self, payload: &ProjectAmenityPayload) -> Result<CreatedId, AppError>;
    async fn create_tower(&self, payload: &TowerPayload) -> Result<CreatedId, AppError>;
    async fn create_flat(&self, payload: &FlatPayload) -> Result<CreatedId, AppError>;
    async fn create_tower_amenity(&self, payload: &TowerAmenityPayload) -> Result<CreatedId, AppError>;

    async fn lead_stats(&self) -> Result<LeadStats, AppError>;
    async fn list_leads(&self, period: LeadPeriod) -> Result<Vec<Lead>, AppError>;
    async fn mark_lead_read(&self, lead_id: i64) -> Result<(), AppError>;
}
