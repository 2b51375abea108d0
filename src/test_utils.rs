use crate::api::{
    AuthResponse, CreatedId, FlatPayload, ListingApi, OtpRequest, OtpVerifyRequest, OtpVerifyResponse,
    ProjectAmenityPayload, ProjectImagePayload, ProjectPayload, RegistrationRequest, StaffLoginRequest,
    TowerAmenityPayload, TowerPayload,
};
use crate::error::app_error::AppError;
use crate::models::lead::{Lead, LeadPeriod, LeadStats};
use crate::models::project::{ImageFile, ProjectDraft, ProjectRecord, ProjectStatus};
use crate::models::user::{AdminFlag, UserProfile};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

pub fn sample_user() -> UserProfile {
    UserProfile {
        id: Some(1),
        first_name: "Asha".to_string(),
        last_name: "Kulkarni".to_string(),
        email: Some("asha@example.com".to_string()),
        mobile: Some("9876543210".to_string()),
        ..UserProfile::default()
    }
}

pub fn sample_admin_user() -> UserProfile {
    UserProfile {
        id: Some(2),
        first_name: "Ravi".to_string(),
        last_name: "Deshmukh".to_string(),
        is_staff: AdminFlag(true),
        ..sample_user()
    }
}

/// A draft that passes validation: one image with a payload, one named
/// amenity, one named tower with a flat and a tower amenity.
pub fn sample_draft() -> ProjectDraft {
    let mut draft = ProjectDraft::default();
    draft.title = "Skyline Heights".to_string();
    draft.project_status = Some(ProjectStatus::NewLaunch);
    draft.description = "Premium towers near the lake".to_string();
    draft.location = "Baner".to_string();
    draft.city_name = "Pune".to_string();
    draft.map_location = "https://maps.example.com/skyline".to_string();
    draft.rera_number = "P52100012345".to_string();
    draft.land_area = "5 acres".to_string();
    draft.amenities_area = "1 acre".to_string();
    draft.total_units = "480".to_string();
    draft.total_towers = "4".to_string();
    draft.developer_name = "Skyline Developers".to_string();
    draft.price = "85 L onwards".to_string();
    draft.cover_image = Some(ImageFile {
        file_name: "cover.jpg".to_string(),
        bytes: vec![0xff, 0xd8],
    });
    draft.images[0].image = Some(ImageFile {
        file_name: "exterior.jpg".to_string(),
        bytes: vec![0xff, 0xd8, 0xff],
    });
    draft.images[0].title = "Front elevation".to_string();
    draft.amenities[0].name = "Swimming Pool".to_string();
    draft.towers[0].name = "Tower A".to_string();
    draft.towers[0].total_floors = "22".to_string();
    draft.towers[0].flats[0].flat_number = "101".to_string();
    draft.towers[0].flats[0].flat_type = "2BHK".to_string();
    draft.towers[0].amenities[0].name = "Club House".to_string();
    draft
}

#[derive(Debug, Clone)]
pub enum ApiCall {
    SendOtp(OtpRequest),
    VerifyOtp(OtpVerifyRequest),
    CompleteRegistration(RegistrationRequest),
    StaffLogin(StaffLoginRequest),
    ListProjects,
    GetProject(i64),
    CreateProject(ProjectPayload),
    UpdateProject(i64, ProjectPayload),
    DeleteProject(i64),
    CreateImage(ProjectImagePayload),
    CreateAmenity(ProjectAmenityPayload),
    CreateTower(TowerPayload),
    CreateFlat(FlatPayload),
    CreateTowerAmenity(TowerAmenityPayload),
    LeadStats,
    ListLeads(LeadPeriod),
    MarkLeadRead(i64),
}

/// In-memory [`ListingApi`] double that records every call in order. Ids are
/// handed out from a counter; failures are injected per method name, or
/// globally as 401s.
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    next_id: AtomicI64,
    fail_on: Mutex<Option<String>>,
    unauthorized: AtomicBool,
    otp_response: Mutex<Option<OtpVerifyResponse>>,
    auth_response: Mutex<Option<AuthResponse>>,
    projects: Mutex<Vec<ProjectRecord>>,
    leads: Mutex<Vec<Lead>>,
    stats: Mutex<LeadStats>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_on: Mutex::new(None),
            unauthorized: AtomicBool::new(false),
            otp_response: Mutex::new(None),
            auth_response: Mutex::new(None),
            projects: Mutex::new(Vec::new()),
            leads: Mutex::new(Vec::new()),
            stats: Mutex::new(LeadStats::default()),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Makes the named method fail with a 400 on every call.
    pub fn fail_on(&self, method: &str) {
        *self.fail_on.lock().unwrap() = Some(method.to_string());
    }

    /// Makes every call fail with [`AppError::Unauthorized`].
    pub fn set_unauthorized(&self, on: bool) {
        self.unauthorized.store(on, Ordering::SeqCst);
    }

    pub fn set_otp_response(&self, response: OtpVerifyResponse) {
        *self.otp_response.lock().unwrap() = Some(response);
    }

    pub fn set_auth_response(&self, response: AuthResponse) {
        *self.auth_response.lock().unwrap() = Some(response);
    }

    pub fn set_projects(&self, projects: Vec<ProjectRecord>) {
        *self.projects.lock().unwrap() = projects;
    }

    pub fn set_leads(&self, leads: Vec<Lead>) {
        *self.leads.lock().unwrap() = leads;
    }

    pub fn set_stats(&self, stats: LeadStats) {
        *self.stats.lock().unwrap() = stats;
    }

    fn gate(&self, method: &str, call: ApiCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(AppError::Unauthorized);
        }
        if self.fail_on.lock().unwrap().as_deref() == Some(method) {
            return Err(AppError::api(400, "injected failure"));
        }
        Ok(())
    }

    fn created(&self) -> CreatedId {
        CreatedId {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
        }
    }

    fn auth_response(&self) -> AuthResponse {
        self.auth_response.lock().unwrap().clone().unwrap_or(AuthResponse {
            user: sample_user(),
            access_token: "token-1".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ListingApi for RecordingApi {
    async fn send_otp(&self, request: &OtpRequest) -> Result<(), AppError> {
        self.gate("send_otp", ApiCall::SendOtp(request.clone()))
    }

    async fn verify_otp(&self, request: &OtpVerifyRequest) -> Result<OtpVerifyResponse, AppError> {
        self.gate("verify_otp", ApiCall::VerifyOtp(request.clone()))?;
        Ok(self.otp_response.lock().unwrap().clone().unwrap_or(OtpVerifyResponse {
            needs_registration: false,
            user: Some(sample_user()),
            access_token: Some("token-1".to_string()),
        }))
    }

    async fn complete_registration(&self, request: &RegistrationRequest) -> Result<AuthResponse, AppError> {
        self.gate("complete_registration", ApiCall::CompleteRegistration(request.clone()))?;
        Ok(self.auth_response())
    }

    async fn staff_login(&self, request: &StaffLoginRequest) -> Result<AuthResponse, AppError> {
        self.gate("staff_login", ApiCall::StaffLogin(request.clone()))?;
        Ok(self.auth_response())
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, AppError> {
        self.gate("list_projects", ApiCall::ListProjects)?;
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn get_project(&self, id: i64) -> Result<ProjectRecord, AppError> {
        self.gate("get_project", ApiCall::GetProject(id))?;
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|project| project.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
    }

    async fn create_project(&self, payload: &ProjectPayload) -> Result<CreatedId, AppError> {
        self.gate("create_project", ApiCall::CreateProject(payload.clone()))?;
        Ok(self.created())
    }

    async fn update_project(&self, id: i64, payload: &ProjectPayload) -> Result<(), AppError> {
        self.gate("update_project", ApiCall::UpdateProject(id, payload.clone()))
    }

    async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        self.gate("delete_project", ApiCall::DeleteProject(id))?;
        self.projects.lock().unwrap().retain(|project| project.id != id);
        Ok(())
    }

    async fn create_project_image(&self, payload: &ProjectImagePayload) -> Result<CreatedId, AppError> {
        self.gate("create_project_image", ApiCall::CreateImage(payload.clone()))?;
        Ok(self.created())
    }

    async fn create_project_amenity(&self, payload: &ProjectAmenityPayload) -> Result<CreatedId, AppError> {
        self.gate("create_project_amenity", ApiCall::CreateAmenity(payload.clone()))?;
        Ok(self.created())
    }

    async fn create_tower(&self, payload: &TowerPayload) -> Result<CreatedId, AppError> {
        self.gate("create_tower", ApiCall::CreateTower(payload.clone()))?;
        Ok(self.created())
    }

    async fn create_flat(&self, payload: &FlatPayload) -> Result<CreatedId, AppError> {
        self.gate("create_flat", ApiCall::CreateFlat(payload.clone()))?;
        Ok(self.created())
    }

    async fn create_tower_amenity(&self, payload: &TowerAmenityPayload) -> Result<CreatedId, AppError> {
        self.gate("create_tower_amenity", ApiCall::CreateTowerAmenity(payload.clone()))?;
        Ok(self.created())
    }

    async fn lead_stats(&self) -> Result<LeadStats, AppError> {
        self.gate("lead_stats", ApiCall::LeadStats)?;
        Ok(*self.stats.lock().unwrap())
    }

    async fn list_leads(&self, period: LeadPeriod) -> Result<Vec<Lead>, AppError> {
        self.gate("list_leads", ApiCall::ListLeads(period))?;
        Ok(self.leads.lock().unwrap().clone())
    }

    async fn mark_lead_read(&self, lead_id: i64) -> Result<(), AppError> {
        self.gate("mark_lead_read", ApiCall::MarkLeadRead(lead_id))?;
        for lead in self.leads.lock().unwrap().iter_mut() {
            if lead.id == lead_id {
                lead.read = true;
            }
        }
        Ok(())
    }
}
