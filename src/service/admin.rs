use crate::api::ListingApi;
use crate::config::NoticeConfig;
use crate::error::app_error::AppError;
use crate::models::lead::{Lead, LeadPeriod, LeadStats};
use crate::models::project::{ProjectDraft, ProjectRecord};
use crate::models::session::LoginSurface;
use crate::service::draft::{OrderErrors, OrderList, recheck_orders};
use crate::service::submit::submit_project;
use crate::session::SessionManager;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Operator feedback. Transient notices carry a kind-specific time to
/// live; blocking validation errors carry none and stay until the operator
/// edits and resubmits.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    expires_at: Option<DateTime<Utc>>,
}

impl Notice {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// State and orchestration behind the back-office screen: the project list,
/// the lead inbox, and the in-progress project draft.
///
/// Every API-touching method returns `Option<LoginSurface>`: `Some` means
/// the call came back unauthorized, the session is already cleared, and the
/// caller must redirect to that login surface. Any other failure becomes an
/// error notice and the method returns `None`.
pub struct AdminDashboard {
    api: Arc<dyn ListingApi>,
    session: Arc<SessionManager>,
    notice_config: NoticeConfig,
    pub projects: Vec<ProjectRecord>,
    pub leads: Vec<Lead>,
    pub stats: Option<LeadStats>,
    pub draft: ProjectDraft,
    pub editing: Option<i64>,
    pub order_errors: OrderErrors,
    loading: bool,
    notice: Option<Notice>,
}

impl AdminDashboard {
    pub fn new(api: Arc<dyn ListingApi>, session: Arc<SessionManager>, notice_config: NoticeConfig) -> Self {
        Self {
            api,
            session,
            notice_config,
            projects: Vec::new(),
            leads: Vec::new(),
            stats: None,
            draft: ProjectDraft::default(),
            editing: None,
            order_errors: OrderErrors::default(),
            loading: false,
            notice: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current notice, if it has not expired yet. Expired notices are
    /// dropped on read.
    pub fn notice(&mut self) -> Option<&Notice> {
        if self.notice.as_ref().is_some_and(|notice| notice.is_expired(Utc::now())) {
            self.notice = None;
        }
        self.notice.as_ref()
    }

    fn set_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        let ttl_seconds = match kind {
            NoticeKind::Success => self.notice_config.success_seconds,
            NoticeKind::Error => self.notice_config.error_seconds,
        };
        self.notice = Some(Notice {
            text: text.into(),
            kind,
            expires_at: Some(Utc::now() + Duration::seconds(ttl_seconds)),
        });
    }

    fn set_blocking_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            kind: NoticeKind::Error,
            expires_at: None,
        });
    }

    fn fail(&mut self, error: AppError) -> Option<LoginSurface> {
        if error.is_unauthorized() {
            warn!("api returned unauthorized, clearing session");
            return Some(self.session.handle_unauthorized());
        }
        self.set_notice(NoticeKind::Error, error.to_string());
        None
    }

    pub async fn refresh_projects(&mut self) -> Option<LoginSurface> {
        self.loading = true;
        let result = self.api.list_projects().await;
        self.loading = false;
        match result {
            Ok(projects) => {
                self.projects = projects;
                None
            }
            Err(error) => self.fail(error),
        }
    }

    pub async fn refresh_stats(&mut self) -> Option<LoginSurface> {
        match self.api.lead_stats().await {
            Ok(stats) => {
                self.stats = Some(stats);
                None
            }
            Err(error) => self.fail(error),
        }
    }

    pub async fn refresh_leads(&mut self, period: LeadPeriod) -> Option<LoginSurface> {
        match self.api.list_leads(period).await {
            Ok(leads) => {
                self.leads = leads;
                None
            }
            Err(error) => self.fail(error),
        }
    }

    /// Marks one lead read on the server and mirrors the change in place,
    /// without refetching the whole list.
    pub async fn mark_lead_read(&mut self, lead_id: i64) -> Option<LoginSurface> {
        match self.api.mark_lead_read(lead_id).await {
            Ok(()) => {
                if let Some(lead) = self.leads.iter_mut().find(|lead| lead.id == lead_id) {
                    lead.read = true;
                }
                None
            }
            Err(error) => self.fail(error),
        }
    }

    pub async fn delete_project(&mut self, id: i64) -> Option<LoginSurface> {
        match self.api.delete_project(id).await {
            Ok(()) => {
                self.set_notice(NoticeKind::Success, "Project deleted successfully");
                self.refresh_projects().await
            }
            Err(error) => self.fail(error),
        }
    }

    /// Resets the form to the blank template for a new project.
    pub fn open_new_project(&mut self) {
        self.draft = ProjectDraft::default();
        self.editing = None;
        self.order_errors.clear();
    }

    /// Fetches a project and pre-populates the form for editing.
    pub async fn open_edit_project(&mut self, id: i64) -> Option<LoginSurface> {
        match self.api.get_project(id).await {
            Ok(record) => {
                self.draft = ProjectDraft::from_record(&record);
                self.editing = Some(record.id);
                self.order_errors.clear();
                None
            }
            Err(error) => self.fail(error),
        }
    }

    pub fn set_image_order(&mut self, index: usize, value: &str) {
        if let Some(row) = self.draft.images.get_mut(index) {
            row.order = value.to_string();
        }
        let orders: Vec<&str> = self.draft.images.iter().map(|row| row.order.as_str()).collect();
        recheck_orders(&mut self.order_errors, OrderList::Images, &orders);
    }

    pub fn set_amenity_order(&mut self, index: usize, value: &str) {
        if let Some(row) = self.draft.amenities.get_mut(index) {
            row.order = value.to_string();
        }
        let orders: Vec<&str> = self.draft.amenities.iter().map(|row| row.order.as_str()).collect();
        recheck_orders(&mut self.order_errors, OrderList::Amenities, &orders);
    }

    pub fn set_tower_order(&mut self, index: usize, value: &str) {
        if let Some(tower) = self.draft.towers.get_mut(index) {
            tower.order = value.to_string();
        }
        let orders: Vec<&str> = self.draft.towers.iter().map(|tower| tower.order.as_str()).collect();
        recheck_orders(&mut self.order_errors, OrderList::Towers, &orders);
    }

    /// Validates and submits the current draft. On success the form resets
    /// and the project list is refetched; on failure the draft stays as-is
    /// so the operator can correct and resubmit. The loading flag is clear
    /// again on every exit path.
    pub async fn save_project(&mut self) -> Option<LoginSurface> {
        self.loading = true;
        self.notice = None;
        let was_editing = self.editing.is_some();

        let result = submit_project(self.api.as_ref(), &self.draft, self.editing, &mut self.order_errors).await;
        let redirect = match result {
            Ok(report) => {
                info!(steps = report.completed.len(), updated = was_editing, "project submission completed");
                self.set_notice(
                    NoticeKind::Success,
                    if was_editing {
                        "Project updated successfully!"
                    } else {
                        "Project created successfully!"
                    },
                );
                self.draft = ProjectDraft::default();
                self.editing = None;
                self.order_errors.clear();
                self.refresh_projects().await
            }
            Err(failure) => {
                if failure.error.is_unauthorized() {
                    self.loading = false;
                    return Some(self.session.handle_unauthorized());
                }
                warn!(
                    completed = failure.report.completed.len(),
                    error = %failure.error,
                    "project submission stopped partway"
                );
                // validation errors block until corrected; only API and
                // network failures auto-clear
                if matches!(failure.error, AppError::Form(_)) {
                    self.set_blocking_error(failure.error.to_string());
                } else {
                    self.set_notice(NoticeKind::Error, failure.error.to_string());
                }
                None
            }
        };

        self.loading = false;
        redirect
    }
}
