use estate_desk::api::http::HttpListingApi;
use estate_desk::api::ListingApi;
use estate_desk::error::app_error::AppError;
use estate_desk::guard::{RouteDecision, admin_route};
use estate_desk::models::lead::LeadPeriod;
use estate_desk::models::project::{
    AmenityRowDraft, ImageCategory, ImageFile, ImageRowDraft, ProjectDraft, ProjectStatus, PropertyType,
};
use estate_desk::models::tower::{Availability, BookingStatus, FlatDraft, TowerAmenityRowDraft, TowerDraft};
use estate_desk::service::auth::AuthService;
use estate_desk::service::draft::OrderErrors;
use estate_desk::service::submit::{SubmissionStep, submit_project};
use estate_desk::session::SessionManager;
use estate_desk::storage::file::FileStore;
use estate_desk::{Config, init_tracing};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn print_usage(bin_name: &str) {
    eprintln!("Usage: {bin_name} <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login <username> <password>    Staff login");
    eprintln!("  logout                         Clear the stored session");
    eprintln!("  whoami                         Show the current session");
    eprintln!("  projects                       List projects");
    eprintln!("  leads [all|today|week|month]   Show lead stats and list");
    eprintln!("  submit <draft.json>            Validate and submit a project draft");
    eprintln!("  update <id> <draft.json>       Submit a draft as an update to an existing project");
}

struct App {
    api: Arc<HttpListingApi>,
    session: Arc<SessionManager>,
}

fn build_app(config: &Config) -> Result<App, AppError> {
    let store = Arc::new(FileStore::open(PathBuf::from(&config.session.store_path)));
    let session = Arc::new(SessionManager::new(store.clone(), &config.session));
    session.initialize();
    let api = Arc::new(HttpListingApi::new(&config.api, store)?);
    Ok(App { api, session })
}

/// Admin commands refuse to run without an authenticated staff session.
fn ensure_admin(session: &SessionManager) -> Result<(), AppError> {
    match admin_route(session) {
        RouteDecision::Render => Ok(()),
        RouteDecision::ToHome => Err(AppError::BadRequest("This account has no back-office access".to_string())),
        _ => Err(AppError::Unauthorized),
    }
}

async fn run(command: &str, args: &[String]) -> Result<(), AppError> {
    let config = Config::load()?;
    init_tracing(&config.logging.level, config.logging.json_format);
    let app = build_app(&config)?;

    match (command, args) {
        ("login", [username, password]) => {
            let auth = AuthService::new(app.api.clone(), app.session.clone());
            auth.staff_login(username, password).await?;
            let name = app.session.current_user().map(|user| user.display_name()).unwrap_or_default();
            println!("Logged in as {name}");
            Ok(())
        }
        ("logout", []) => {
            app.session.logout();
            println!("Logged out");
            Ok(())
        }
        ("whoami", []) => {
            if !app.session.is_authenticated() {
                println!("Not logged in");
                return Ok(());
            }
            let user = app.session.current_user().unwrap_or_default();
            println!("{}", user.display_name());
            println!("  admin: {}", user.is_admin_user());
            println!("  staff login: {}", app.session.is_admin_login());
            if let Some(remaining) = app.session.expires_in() {
                println!("  session expires in: {}m", remaining.as_secs() / 60);
            }
            Ok(())
        }
        ("projects", []) => {
            ensure_admin(&app.session)?;
            let projects = app.api.list_projects().await?;
            for project in &projects {
                println!("{:>6}  {}  [{}]", project.id, project.title, project.property_type.as_str());
            }
            println!("{} project(s)", projects.len());
            Ok(())
        }
        ("leads", rest) if rest.len() <= 1 => {
            ensure_admin(&app.session)?;
            let period = match rest.first().map(String::as_str) {
                None | Some("all") => LeadPeriod::All,
                Some("today") => LeadPeriod::Today,
                Some("week") => LeadPeriod::Week,
                Some("month") => LeadPeriod::Month,
                Some(other) => return Err(AppError::BadRequest(format!("Unknown period: {other}"))),
            };
            let stats = app.api.lead_stats().await?;
            println!(
                "total={} unread={} today={} week={} month={}",
                stats.total, stats.unread, stats.today, stats.this_week, stats.this_month
            );
            for lead in app.api.list_leads(period).await? {
                let marker = if lead.read { ' ' } else { '*' };
                println!("{marker} {:>6}  {}  {}", lead.id, lead.name, lead.mobile.unwrap_or_default());
            }
            Ok(())
        }
        ("submit", [draft_path]) => submit_from_file(&app, draft_path, None).await,
        ("update", [id, draft_path]) => {
            let id = id
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("Invalid project id: {id}")))?;
            submit_from_file(&app, draft_path, Some(id)).await
        }
        _ => Err(AppError::BadRequest(format!("Unknown command: {command}"))),
    }
}

async fn submit_from_file(app: &App, draft_path: &str, editing: Option<i64>) -> Result<(), AppError> {
    ensure_admin(&app.session)?;

    let raw = std::fs::read_to_string(draft_path)?;
    let file: DraftFile = serde_json::from_str(&raw)?;
    let draft = file.into_draft(Path::new(draft_path).parent().unwrap_or(Path::new(".")))?;

    let mut order_errors = OrderErrors::default();
    match submit_project(app.api.as_ref(), &draft, editing, &mut order_errors).await {
        Ok(report) => {
            let id = report.project_id().unwrap_or_default();
            println!("Submitted project {id} ({} step(s))", report.completed.len());
            Ok(())
        }
        Err(failure) => {
            if !failure.report.completed.is_empty() {
                eprintln!("Submission stopped partway; already persisted:");
                for step in &failure.report.completed {
                    eprintln!("  {}", describe_step(step));
                }
            }
            Err(failure.error)
        }
    }
}

fn describe_step(step: &SubmissionStep) -> String {
    match step {
        SubmissionStep::Project { id, updated: true } => format!("project {id} (updated)"),
        SubmissionStep::Project { id, updated: false } => format!("project {id} (created)"),
        SubmissionStep::Image { index, id } => format!("image row {index} -> {id}"),
        SubmissionStep::Amenity { index, id } => format!("amenity row {index} -> {id}"),
        SubmissionStep::Tower { index, id } => format!("tower row {index} -> {id}"),
        SubmissionStep::Flat { tower_index, index, id } => format!("tower {tower_index} flat row {index} -> {id}"),
        SubmissionStep::TowerAmenity { tower_index, index, id } => {
            format!("tower {tower_index} amenity row {index} -> {id}")
        }
    }
}

/// On-disk draft format accepted by `submit`/`update`. Image entries point
/// at files relative to the draft; they are read into memory here.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct DraftFile {
    title: String,
    property_type: PropertyType,
    project_status: Option<ProjectStatus>,
    location: String,
    city: Option<i64>,
    city_name: String,
    state: Option<String>,
    map_location: String,
    description: String,
    about_listing: String,
    price: String,
    available_flat_types: Vec<String>,
    rera_number: String,
    land_area: String,
    amenities_area: String,
    total_units: String,
    total_towers: String,
    developer_name: String,
    is_hot: bool,
    featured: bool,
    cover_image: Option<PathBuf>,
    images: Vec<ImageEntry>,
    amenities: Vec<AmenityEntry>,
    towers: Vec<TowerEntry>,
}

#[derive(Deserialize)]
struct ImageEntry {
    path: PathBuf,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: ImageCategory,
    #[serde(default)]
    order: Option<i64>,
}

#[derive(Deserialize)]
struct AmenityEntry {
    name: String,
    #[serde(default)]
    order: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TowerEntry {
    name: String,
    tower_number: String,
    total_floors: String,
    parking_floors: String,
    residential_floors: String,
    refugee_floors: String,
    per_floor_flats: String,
    total_lifts: String,
    total_stairs: String,
    booking_status: BookingStatus,
    is_active: Option<bool>,
    order: Option<i64>,
    flats: Vec<FlatEntry>,
    amenities: Vec<TowerAmenityEntry>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct FlatEntry {
    flat_number: String,
    floor: String,
    flat_type: String,
    area: String,
    price: String,
    availability: Availability,
    order: Option<i64>,
}

#[derive(Deserialize)]
struct TowerAmenityEntry {
    name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    order: Option<i64>,
}

fn order_text(order: Option<i64>, index: usize) -> String {
    order.map(|value| value.to_string()).unwrap_or_else(|| index.to_string())
}

fn read_image(base: &Path, path: &Path) -> Result<ImageFile, AppError> {
    let resolved = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };
    let bytes = std::fs::read(&resolved)?;
    let file_name = resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageFile { file_name, bytes })
}

impl DraftFile {
    fn into_draft(self, base: &Path) -> Result<ProjectDraft, AppError> {
        let mut draft = ProjectDraft::default();
        draft.title = self.title;
        draft.property_type = self.property_type;
        draft.project_status = self.project_status;
        draft.location = self.location;
        draft.city = self.city;
        draft.city_name = self.city_name;
        if let Some(state) = self.state {
            draft.state = state;
        }
        draft.map_location = self.map_location;
        draft.description = self.description;
        draft.about_listing = self.about_listing;
        draft.price = self.price;
        draft.available_flat_types = self.available_flat_types;
        draft.rera_number = self.rera_number;
        draft.land_area = self.land_area;
        draft.amenities_area = self.amenities_area;
        draft.total_units = self.total_units;
        draft.total_towers = self.total_towers;
        draft.developer_name = self.developer_name;
        draft.is_hot = self.is_hot;
        draft.featured = self.featured;
        draft.cover_image = match self.cover_image {
            Some(path) => Some(read_image(base, &path)?),
            None => None,
        };

        draft.images = self
            .images
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                Ok(ImageRowDraft {
                    image: Some(read_image(base, &entry.path)?),
                    title: entry.title,
                    category: entry.category,
                    order: order_text(entry.order, index),
                })
            })
            .collect::<Result<_, AppError>>()?;

        draft.amenities = self
            .amenities
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let mut row = AmenityRowDraft::blank(index);
                row.name = entry.name;
                row.order = order_text(entry.order, index);
                row
            })
            .collect();

        draft.towers = self
            .towers
            .into_iter()
            .enumerate()
            .map(|(index, entry)| TowerDraft {
                name: entry.name,
                tower_number: entry.tower_number,
                total_floors: entry.total_floors,
                parking_floors: entry.parking_floors,
                residential_floors: entry.residential_floors,
                refugee_floors: entry.refugee_floors,
                per_floor_flats: entry.per_floor_flats,
                total_lifts: entry.total_lifts,
                total_stairs: entry.total_stairs,
                booking_status: entry.booking_status,
                is_active: entry.is_active.unwrap_or(true),
                order: order_text(entry.order, index),
                flats: entry
                    .flats
                    .into_iter()
                    .enumerate()
                    .map(|(flat_index, flat)| FlatDraft {
                        flat_number: flat.flat_number,
                        floor: flat.floor,
                        flat_type: flat.flat_type,
                        area: flat.area,
                        price: flat.price,
                        availability: flat.availability,
                        order: order_text(flat.order, flat_index),
                    })
                    .collect(),
                amenities: entry
                    .amenities
                    .into_iter()
                    .enumerate()
                    .map(|(amenity_index, amenity)| TowerAmenityRowDraft {
                        name: amenity.name,
                        icon: amenity.icon,
                        order: order_text(amenity.order, amenity_index),
                    })
                    .collect(),
            })
            .collect();

        Ok(draft)
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let mut args = std::env::args();
    let bin_name = args.next().unwrap_or_else(|| "estate-desk".to_string());
    let command = match args.next() {
        Some(command) => command,
        None => {
            print_usage(&bin_name);
            std::process::exit(2);
        }
    };
    let rest: Vec<String> = args.collect();

    if let Err(err) = run(&command, &rest).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
