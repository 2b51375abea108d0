use crate::api::{FlatPayload, ListingApi, ProjectAmenityPayload, ProjectImagePayload, ProjectPayload, TowerAmenityPayload, TowerPayload};
use crate::error::app_error::AppError;
use crate::models::project::{ImageFile, ImageRowDraft, ProjectDraft};
use crate::models::tower::{FlatDraft, TowerAmenityRowDraft, TowerDraft};
use crate::service::draft::{OrderErrors, validate_draft};

/// One completed step of the submission sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStep {
    Project { id: i64, updated: bool },
    Image { index: usize, id: i64 },
    Amenity { index: usize, id: i64 },
    Tower { index: usize, id: i64 },
    Flat { tower_index: usize, index: usize, id: i64 },
    TowerAmenity { tower_index: usize, index: usize, id: i64 },
}

/// Record of everything persisted so far. There is no rollback: when the
/// sequence stops partway, the report tells the operator exactly which
/// child rows already exist on the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionReport {
    pub completed: Vec<SubmissionStep>,
}

impl SubmissionReport {
    fn record(&mut self, step: SubmissionStep) {
        self.completed.push(step);
    }

    pub fn project_id(&self) -> Option<i64> {
        self.completed.iter().find_map(|step| match step {
            SubmissionStep::Project { id, .. } => Some(*id),
            _ => None,
        })
    }
}

/// A submission that stopped partway, with what had completed by then.
#[derive(Debug)]
pub struct SubmissionError {
    pub error: AppError,
    pub report: SubmissionReport,
}

/// Validates and submits a draft graph as a strictly sequential chain of
/// dependent creates: project, then its images, then its amenities, then
/// each tower followed by that tower's flats and amenities. Rows are sent
/// one at a time in list order; a validation failure returns before any
/// network call.
pub async fn submit_project(
    api: &dyn ListingApi,
    draft: &ProjectDraft,
    editing: Option<i64>,
    order_errors: &mut OrderErrors,
) -> Result<SubmissionReport, SubmissionError> {
    if let Err(error) = validate_draft(draft, editing.is_some(), order_errors) {
        return Err(SubmissionError {
            error,
            report: SubmissionReport::default(),
        });
    }

    let mut report = SubmissionReport::default();
    match run_sequence(api, draft, editing, &mut report).await {
        Ok(()) => Ok(report),
        Err(error) => Err(SubmissionError { error, report }),
    }
}

async fn run_sequence(
    api: &dyn ListingApi,
    draft: &ProjectDraft,
    editing: Option<i64>,
    report: &mut SubmissionReport,
) -> Result<(), AppError> {
    let payload = project_payload(draft);
    let project_id = match editing {
        Some(id) => {
            api.update_project(id, &payload).await?;
            report.record(SubmissionStep::Project { id, updated: true });
            id
        }
        None => {
            let created = api.create_project(&payload).await?;
            report.record(SubmissionStep::Project {
                id: created.id,
                updated: false,
            });
            created.id
        }
    };

    for (index, row) in draft.images.iter().enumerate() {
        let Some(image) = &row.image else { continue };
        let created = api.create_project_image(&image_payload(project_id, row, image)).await?;
        report.record(SubmissionStep::Image { index, id: created.id });
    }

    for (index, row) in draft.amenities.iter().enumerate() {
        if row.name.is_empty() {
            continue;
        }
        let created = api
            .create_project_amenity(&ProjectAmenityPayload {
                project: project_id,
                name: row.name.clone(),
                icon: String::new(),
                order: parse_or_zero(&row.order),
            })
            .await?;
        report.record(SubmissionStep::Amenity { index, id: created.id });
    }

    for (tower_index, tower) in draft.towers.iter().enumerate() {
        if tower.name.is_empty() {
            continue;
        }
        let created = api.create_tower(&tower_payload(project_id, tower)).await?;
        let tower_id = created.id;
        report.record(SubmissionStep::Tower {
            index: tower_index,
            id: tower_id,
        });

        for (index, flat) in tower.flats.iter().enumerate() {
            if flat.flat_number.is_empty() {
                continue;
            }
            let created = api.create_flat(&flat_payload(tower_id, flat)).await?;
            report.record(SubmissionStep::Flat {
                tower_index,
                index,
                id: created.id,
            });
        }

        for (index, amenity) in tower.amenities.iter().enumerate() {
            if amenity.name.is_empty() {
                continue;
            }
            let created = api.create_tower_amenity(&tower_amenity_payload(tower_id, amenity)).await?;
            report.record(SubmissionStep::TowerAmenity {
                tower_index,
                index,
                id: created.id,
            });
        }
    }

    Ok(())
}

fn push_field(fields: &mut Vec<(String, String)>, name: &str, value: String) {
    // null/empty scalars are omitted from the wire payload
    if !value.is_empty() {
        fields.push((name.to_string(), value));
    }
}

/// Flattens the draft scalars to multipart wire form in submission order.
/// `available_flat_types` is always present, comma-joined; booleans are
/// always present as text.
pub fn project_payload(draft: &ProjectDraft) -> ProjectPayload {
    let mut fields = Vec::new();

    push_field(&mut fields, "title", draft.title.clone());
    push_field(&mut fields, "property_type", draft.property_type.as_str().to_string());
    if let Some(status) = draft.project_status {
        push_field(&mut fields, "project_status", status.as_str().to_string());
    }
    push_field(&mut fields, "location", draft.location.clone());
    if let Some(city) = draft.city {
        push_field(&mut fields, "city", city.to_string());
    }
    push_field(&mut fields, "city_name", draft.city_name.clone());
    push_field(&mut fields, "state", draft.state.clone());
    push_field(&mut fields, "map_location", draft.map_location.clone());
    push_field(&mut fields, "description", draft.description.clone());
    push_field(&mut fields, "about_listing", draft.about_listing.clone());
    push_field(&mut fields, "price", draft.price.clone());
    fields.push(("available_flat_types".to_string(), draft.available_flat_types.join(",")));
    push_field(&mut fields, "rera_number", draft.rera_number.clone());
    push_field(&mut fields, "land_area", draft.land_area.clone());
    push_field(&mut fields, "amenities_area", draft.amenities_area.clone());
    push_field(&mut fields, "total_units", draft.total_units.clone());
    push_field(&mut fields, "total_towers", draft.total_towers.clone());
    push_field(&mut fields, "developer_name", draft.developer_name.clone());
    fields.push(("is_hot".to_string(), draft.is_hot.to_string()));
    fields.push(("featured".to_string(), draft.featured.to_string()));

    ProjectPayload {
        fields,
        cover_image: draft.cover_image.clone(),
    }
}

fn image_payload(project_id: i64, row: &ImageRowDraft, image: &ImageFile) -> ProjectImagePayload {
    ProjectImagePayload {
        project: project_id,
        image: image.clone(),
        title: row.title.clone(),
        category: row.category,
        order: parse_or_zero(&row.order),
    }
}

/// Tower scalars: name and floor counts pass through as text, missing
/// numeric fields default to 0.
fn tower_payload(project_id: i64, tower: &TowerDraft) -> TowerPayload {
    TowerPayload {
        project: project_id,
        name: tower.name.clone(),
        tower_number: tower.tower_number.clone(),
        total_floors: tower.total_floors.clone(),
        parking_floors: parse_or_zero(&tower.parking_floors),
        residential_floors: parse_or_zero(&tower.residential_floors),
        refugee_floors: parse_or_zero(&tower.refugee_floors),
        per_floor_flats: parse_or_zero(&tower.per_floor_flats),
        total_lifts: parse_or_zero(&tower.total_lifts),
        total_stairs: parse_or_zero(&tower.total_stairs),
        booking_status: tower.booking_status,
        is_active: tower.is_active,
        order: parse_or_zero(&tower.order),
    }
}

fn flat_payload(tower_id: i64, flat: &FlatDraft) -> FlatPayload {
    FlatPayload {
        tower: tower_id,
        flat_number: flat.flat_number.clone(),
        floor: flat.floor.clone(),
        flat_type: flat.flat_type.clone(),
        area: flat.area.clone(),
        price: flat.price.clone(),
        availability: flat.availability,
        order: parse_or_zero(&flat.order),
    }
}

fn tower_amenity_payload(tower_id: i64, amenity: &TowerAmenityRowDraft) -> TowerAmenityPayload {
    TowerAmenityPayload {
        tower: tower_id,
        name: amenity.name.clone(),
        icon: amenity.icon.clone(),
        order: parse_or_zero(&amenity.order),
    }
}

fn parse_or_zero(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::PropertyType;
    use crate::test_utils::{ApiCall, RecordingApi, sample_draft};

    fn call_name(call: &ApiCall) -> &'static str {
        match call {
            ApiCall::CreateProject(_) => "project",
            ApiCall::UpdateProject(_, _) => "project-update",
            ApiCall::CreateImage(_) => "image",
            ApiCall::CreateAmenity(_) => "amenity",
            ApiCall::CreateTower(_) => "tower",
            ApiCall::CreateFlat(_) => "flat",
            ApiCall::CreateTowerAmenity(_) => "tower-amenity",
            _ => "other",
        }
    }

    #[tokio::test]
    async fn full_graph_submits_in_dependency_order() {
        // 2 images, 2 amenities, 2 towers x (2 flats + 1 amenity)
        let mut draft = sample_draft();
        draft.add_image_row();
        draft.images[1].image = draft.images[0].image.clone();
        draft.add_amenity_row();
        draft.amenities[1].name = "Gym".to_string();
        draft.amenities[1].order = "1".to_string();
        draft.add_tower();
        draft.towers[1].name = "Tower B".to_string();
        draft.towers[1].total_floors = "18".to_string();
        draft.towers[1].flats[0].flat_number = "201".to_string();
        draft.towers[1].amenities[0].name = "Lobby".to_string();
        for tower in &mut draft.towers {
            tower.add_flat();
        }
        draft.towers[0].flats[1].flat_number = "102".to_string();
        draft.towers[1].flats[1].flat_number = "202".to_string();

        let api = RecordingApi::new();
        let mut errors = OrderErrors::default();
        let report = submit_project(&api, &draft, None, &mut errors).await.unwrap();

        let names: Vec<&str> = api.calls().iter().map(call_name).collect();
        assert_eq!(
            names,
            vec![
                "project",
                "image",
                "image",
                "amenity",
                "amenity",
                "tower",
                "flat",
                "flat",
                "tower-amenity",
                "tower",
                "flat",
                "flat",
                "tower-amenity",
            ]
        );
        // 1 + N + M + T + T*F + T*A = 1 + 2 + 2 + 2 + 4 + 2
        assert_eq!(report.completed.len(), 13);
        assert!(report.project_id().is_some());
    }

    #[tokio::test]
    async fn validation_failure_makes_no_network_calls() {
        let mut draft = sample_draft();
        draft.title = String::new();

        let api = RecordingApi::new();
        let mut errors = OrderErrors::default();
        let failure = submit_project(&api, &draft, None, &mut errors).await.unwrap_err();

        assert_eq!(failure.error.to_string(), "Project Title is mandatory");
        assert!(failure.report.completed.is_empty());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn residential_without_towers_is_blocked_before_network() {
        let mut draft = sample_draft();
        assert_eq!(draft.property_type, PropertyType::Residential);
        draft.towers.clear();

        let api = RecordingApi::new();
        let mut errors = OrderErrors::default();
        let failure = submit_project(&api, &draft, None, &mut errors).await.unwrap_err();

        assert_eq!(failure.error.to_string(), "At least one tower is mandatory for residential projects");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn editing_updates_and_reuses_the_existing_id() {
        let draft = sample_draft();
        let api = RecordingApi::new();
        let mut errors = OrderErrors::default();

        let report = submit_project(&api, &draft, Some(42), &mut errors).await.unwrap();

        assert_eq!(report.project_id(), Some(42));
        let calls = api.calls();
        assert!(matches!(calls[0], ApiCall::UpdateProject(42, _)));
        match &calls[1] {
            ApiCall::CreateImage(payload) => assert_eq!(payload.project, 42),
            other => panic!("expected image create, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rows_without_payload_or_name_are_skipped() {
        let mut draft = sample_draft();
        draft.add_image_row(); // no binary
        draft.add_amenity_row(); // no name
        draft.towers[0].add_amenity(); // no name

        let api = RecordingApi::new();
        let mut errors = OrderErrors::default();
        submit_project(&api, &draft, None, &mut errors).await.unwrap();

        let names: Vec<&str> = api.calls().iter().map(call_name).collect();
        assert_eq!(names, vec!["project", "image", "amenity", "tower", "flat", "tower-amenity"]);
    }

    #[tokio::test]
    async fn mid_sequence_failure_reports_completed_steps() {
        let draft = sample_draft();
        let api = RecordingApi::new();
        api.fail_on("create_tower");
        let mut errors = OrderErrors::default();

        let failure = submit_project(&api, &draft, None, &mut errors).await.unwrap_err();

        assert!(matches!(failure.error, AppError::Api { status: 400, .. }));
        // project, image and amenity made it; nothing after the tower failure
        assert_eq!(failure.report.completed.len(), 3);
        assert!(matches!(failure.report.completed[0], SubmissionStep::Project { updated: false, .. }));
        let names: Vec<&str> = api.calls().iter().map(call_name).collect();
        assert_eq!(names, vec!["project", "image", "amenity", "tower"]);
    }

    #[test]
    fn payload_omits_empty_scalars_and_joins_flat_types() {
        let mut draft = sample_draft();
        draft.about_listing = String::new();
        draft.available_flat_types = vec!["1BHK".to_string(), "2BHK".to_string()];
        draft.city = None;

        let payload = project_payload(&draft);
        let names: Vec<&str> = payload.fields.iter().map(|(name, _)| name.as_str()).collect();

        assert!(!names.contains(&"about_listing"));
        assert!(!names.contains(&"city"));
        let flat_types = payload.fields.iter().find(|(name, _)| name == "available_flat_types").unwrap();
        assert_eq!(flat_types.1, "1BHK,2BHK");
        let is_hot = payload.fields.iter().find(|(name, _)| name == "is_hot").unwrap();
        assert_eq!(is_hot.1, "false");
        assert!(payload.cover_image.is_some());
    }

    #[test]
    fn tower_numeric_fields_default_to_zero() {
        let mut draft = sample_draft();
        draft.towers[0].parking_floors = String::new();
        draft.towers[0].total_lifts = "not-a-number".to_string();

        let payload = tower_payload(9, &draft.towers[0]);
        assert_eq!(payload.project, 9);
        assert_eq!(payload.parking_floors, 0);
        assert_eq!(payload.total_lifts, 0);
        assert_eq!(payload.total_floors, draft.towers[0].total_floors);
    }
}
