use crate::api::{
    AuthResponse, CreatedId, FlatPayload, ListingApi, OtpRequest, OtpVerifyRequest, OtpVerifyResponse, ProjectAmenityPayload,
    ProjectImagePayload, ProjectPayload, RegistrationRequest, StaffLoginRequest, TowerAmenityPayload, TowerPayload,
};
use crate::config::ApiConfig;
use crate::error::app_error::AppError;
use crate::models::lead::{Lead, LeadPeriod, LeadStats};
use crate::models::project::ProjectRecord;
use crate::storage::{SessionStore, keys};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// reqwest-backed implementation of the listing API boundary.
///
/// The bearer credential is read from the injected session store on every
/// request, mirroring how the session manager owns it; this type holds no
/// credential state of its own.
pub struct HttpListingApi {
    base_url: String,
    client: reqwest::Client,
    store: Arc<dyn SessionStore>,
}

impl HttpListingApi {
    pub fn new(config: &ApiConfig, store: Arc<dyn SessionStore>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.store.get(keys::ACCESS_TOKEN) {
            Ok(Some(token)) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, AppError> {
        let response = self.authorize(self.client.get(self.url(path)).query(query)).send().await?;
        read_json(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, AppError> {
        let response = self.authorize(self.client.post(self.url(path)).json(body)).send().await?;
        read_json(response).await
    }

    async fn post_json_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<(), AppError> {
        let response = self.authorize(self.client.post(self.url(path)).json(body)).send().await?;
        read_empty(response).await
    }

    fn project_form(payload: &ProjectPayload) -> Form {
        let mut form = Form::new();
        for (name, value) in &payload.fields {
            form = form.text(name.clone(), value.clone());
        }
        if let Some(cover) = &payload.cover_image {
            form = form.part("cover_image", Part::bytes(cover.bytes.clone()).file_name(cover.file_name.clone()));
        }
        form
    }

    fn image_form(payload: &ProjectImagePayload) -> Form {
        Form::new()
            .text("project", payload.project.to_string())
            .part(
                "image",
                Part::bytes(payload.image.bytes.clone()).file_name(payload.image.file_name.clone()),
            )
            .text("title", payload.title.clone())
            .text("category", payload.category.as_str())
            .text("order", payload.order.to_string())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let response = check_status(response).await?;
    Ok(response.json::<T>().await?)
}

async fn read_empty(response: Response) -> Result<(), AppError> {
    check_status(response).await?;
    Ok(())
}

async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(AppError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = %status, body = %body, "API request failed");
    Err(AppError::api(status.as_u16(), extract_error_message(status.as_u16(), &body)))
}

/// Best-effort extraction of a human-readable message: the server's `error`
/// field, else a dump of the failure payload, else a generic message.
pub(crate) fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("error").and_then(|error| error.as_str()) {
            return message.to_string();
        }
        if !value.is_null() {
            return value.to_string();
        }
    }
    format!("Request failed with status {status}")
}

/// Project list endpoints answer either a bare array or a paginated
/// `{ "results": [...] }` envelope.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ProjectListResponse {
    Paginated { results: Vec<ProjectRecord> },
    Plain(Vec<ProjectRecord>),
}

#[async_trait::async_trait]
impl ListingApi for HttpListingApi {
    async fn send_otp(&self, request: &OtpRequest) -> Result<(), AppError> {
        self.post_json_empty("auth/send-otp/", request).await
    }

    async fn verify_otp(&self, request: &OtpVerifyRequest) -> Result<OtpVerifyResponse, AppError> {
        self.post_json("auth/verify-otp/", request).await
    }

    async fn complete_registration(&self, request: &RegistrationRequest) -> Result<AuthResponse, AppError> {
        self.post_json("auth/complete-registration/", request).await
    }

    async fn staff_login(&self, request: &StaffLoginRequest) -> Result<AuthResponse, AppError> {
        self.post_json("admin/login/", request).await
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, AppError> {
        let response: ProjectListResponse = self.get_json("projects/", &[]).await?;
        Ok(match response {
            ProjectListResponse::Paginated { results } => results,
            ProjectListResponse::Plain(records) => records,
        })
    }

    async fn get_project(&self, id: i64) -> Result<ProjectRecord, AppError> {
        self.get_json(&format!("projects/{id}/"), &[]).await
    }

    async fn create_project(&self, payload: &ProjectPayload) -> Result<CreatedId, AppError> {
        let form = Self::project_form(payload);
        let response = self.authorize(self.client.post(self.url("projects/")).multipart(form)).send().await?;
        read_json(response).await
    }

    async fn update_project(&self, id: i64, payload: &ProjectPayload) -> Result<(), AppError> {
        let form = Self::project_form(payload);
        let response = self
            .authorize(self.client.patch(self.url(&format!("projects/{id}/"))).multipart(form))
            .send()
            .await?;
        read_empty(response).await
    }

    async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let response = self.authorize(self.client.delete(self.url(&format!("projects/{id}/")))).send().await?;
        read_empty(response).await
    }

    async fn create_project_image(&self, payload: &ProjectImagePayload) -> Result<CreatedId, AppError> {
        let form = Self::image_form(payload);
        let response = self
            .authorize(self.client.post(self.url("project-images/")).multipart(form))
            .send()
            .await?;
        read_json(response).await
    }

    async fn create_project_amenity(&self, payload: &ProjectAmenityPayload) -> Result<CreatedId, AppError> {
        self.post_json("project-amenities/", payload).await
    }

    async fn create_tower(&self, payload: &TowerPayload) -> Result<CreatedId, AppError> {
        self.post_json("towers/", payload).await
    }

    async fn create_flat(&self, payload: &FlatPayload) -> Result<CreatedId, AppError> {
        self.post_json("flats/", payload).await
    }

    async fn create_tower_amenity(&self, payload: &TowerAmenityPayload) -> Result<CreatedId, AppError> {
        self.post_json("tower-amenities/", payload).await
    }

    async fn lead_stats(&self) -> Result<LeadStats, AppError> {
        self.get_json("admin/leads/stats/", &[]).await
    }

    async fn list_leads(&self, period: LeadPeriod) -> Result<Vec<Lead>, AppError> {
        self.get_json("admin/leads/", &[("period", period.as_query_value())]).await
    }

    async fn mark_lead_read(&self, lead_id: i64) -> Result<(), AppError> {
        self.post_json_empty(&format!("admin/leads/{lead_id}/read/"), &serde_json::json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer, store: Arc<MemoryStore>) -> HttpListingApi {
        let config = ApiConfig {
            base_url: format!("{}/api", server.uri()),
            timeout_seconds: 5,
        };
        HttpListingApi::new(&config, store).unwrap()
    }

    #[tokio::test]
    async fn staff_login_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": { "first_name": "Asha", "is_staff": true },
                "access_token": "staff-token"
            })))
            .mount(&server)
            .await;

        let api = api_for(&server, Arc::new(MemoryStore::new()));
        let response = api
            .staff_login(&StaffLoginRequest {
                username: "asha".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.access_token, "staff-token");
        assert!(response.user.is_admin_user());
    }

    #[tokio::test]
    async fn bearer_token_is_read_from_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects/"))
            .and(header("authorization", "Bearer token-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        store.set(keys::ACCESS_TOKEN, "token-9").unwrap();
        let api = api_for(&server, store);

        assert!(api.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_dedicated_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/leads/stats/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = api_for(&server, Arc::new(MemoryStore::new()));
        let err = api.lead_stats().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn server_error_field_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/towers/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({ "error": "tower_number taken" })))
            .mount(&server)
            .await;

        let api = api_for(&server, Arc::new(MemoryStore::new()));
        let err = api
            .create_tower(&TowerPayload {
                project: 1,
                name: "A".to_string(),
                tower_number: "A1".to_string(),
                total_floors: "12".to_string(),
                parking_floors: 0,
                residential_floors: 0,
                refugee_floors: 0,
                per_floor_flats: 0,
                total_lifts: 0,
                total_stairs: 0,
                booking_status: Default::default(),
                is_active: true,
                order: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Api { status: 400, ref message } if message == "tower_number taken"));
    }

    #[tokio::test]
    async fn paginated_and_plain_project_lists_both_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "id": 3, "title": "Lake View" }]
            })))
            .mount(&server)
            .await;

        let api = api_for(&server, Arc::new(MemoryStore::new()));
        let projects = api.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, 3);
    }

    #[tokio::test]
    async fn lead_list_passes_period_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/leads/"))
            .and(query_param("period", "week"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": 1, "name": "Lead" }])))
            .mount(&server)
            .await;

        let api = api_for(&server, Arc::new(MemoryStore::new()));
        let leads = api.list_leads(LeadPeriod::Week).await.unwrap();
        assert_eq!(leads.len(), 1);
    }

    #[test]
    fn error_extraction_prefers_error_field() {
        assert_eq!(extract_error_message(400, r#"{"error": "bad"}"#), "bad");
        assert_eq!(extract_error_message(400, r#"{"title": ["required"]}"#), r#"{"title":["required"]}"#);
        assert_eq!(extract_error_message(502, "<html>"), "Request failed with status 502");
    }
}
