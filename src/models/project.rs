use crate::models::tower::TowerDraft;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Residential,
    Commercial,
    Resale,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Residential => "residential",
            PropertyType::Commercial => "commercial",
            PropertyType::Resale => "resale",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    PreLaunch,
    NewLaunch,
    NewTowerLaunch,
    ReadyToMove,
    NearingPossession,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::PreLaunch => "pre_launch",
            ProjectStatus::NewLaunch => "new_launch",
            ProjectStatus::NewTowerLaunch => "new_tower_launch",
            ProjectStatus::ReadyToMove => "ready_to_move",
            ProjectStatus::NearingPossession => "nearing_possession",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    Exterior,
    Interior,
    Amenities,
    FloorPlan,
    LocationMap,
    #[default]
    Other,
}

impl ImageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageCategory::Exterior => "exterior",
            ImageCategory::Interior => "interior",
            ImageCategory::Amenities => "amenities",
            ImageCategory::FloorPlan => "floor_plan",
            ImageCategory::LocationMap => "location_map",
            ImageCategory::Other => "other",
        }
    }
}

/// A file selected by the operator, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One row of the project image list.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRowDraft {
    pub image: Option<ImageFile>,
    pub title: String,
    pub category: ImageCategory,
    /// Free-text form input; only numeric values take part in the
    /// uniqueness check.
    pub order: String,
}

impl ImageRowDraft {
    pub fn blank(order: usize) -> Self {
        Self {
            image: None,
            title: String::new(),
            category: ImageCategory::Other,
            order: order.to_string(),
        }
    }
}

/// One row of the project amenity list.
#[derive(Debug, Clone, PartialEq)]
pub struct AmenityRowDraft {
    pub name: String,
    pub order: String,
}

impl AmenityRowDraft {
    pub fn blank(order: usize) -> Self {
        Self {
            name: String::new(),
            order: order.to_string(),
        }
    }
}

/// The in-progress object graph built by the admin project form. Never
/// persisted until submission; ownership is strictly tree-shaped.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub title: String,
    pub property_type: PropertyType,
    pub project_status: Option<ProjectStatus>,
    pub location: String,
    pub city: Option<i64>,
    pub city_name: String,
    pub state: String,
    pub map_location: String,
    pub description: String,
    pub about_listing: String,
    pub price: String,
    pub available_flat_types: Vec<String>,
    pub rera_number: String,
    pub land_area: String,
    pub amenities_area: String,
    pub total_units: String,
    pub total_towers: String,
    pub developer_name: String,
    pub is_hot: bool,
    pub featured: bool,
    pub cover_image: Option<ImageFile>,
    pub images: Vec<ImageRowDraft>,
    pub amenities: Vec<AmenityRowDraft>,
    pub towers: Vec<TowerDraft>,
}

impl Default for ProjectDraft {
    /// The blank template shown when the operator opens "Add New Project":
    /// one empty row per sibling list.
    fn default() -> Self {
        Self {
            title: String::new(),
            property_type: PropertyType::Residential,
            project_status: None,
            location: String::new(),
            city: None,
            city_name: String::new(),
            state: "Maharashtra".to_string(),
            map_location: String::new(),
            description: String::new(),
            about_listing: String::new(),
            price: String::new(),
            available_flat_types: Vec::new(),
            rera_number: String::new(),
            land_area: String::new(),
            amenities_area: String::new(),
            total_units: String::new(),
            total_towers: String::new(),
            developer_name: String::new(),
            is_hot: false,
            featured: false,
            cover_image: None,
            images: vec![ImageRowDraft::blank(0)],
            amenities: vec![AmenityRowDraft::blank(0)],
            towers: vec![TowerDraft::blank(0)],
        }
    }
}

impl ProjectDraft {
    /// Pre-populates a draft from a fetched record for editing. Binary
    /// fields stay empty: existing files are not re-fetched into the draft.
    pub fn from_record(record: &ProjectRecord) -> Self {
        let mut draft = ProjectDraft {
            title: record.title.clone(),
            property_type: record.property_type,
            project_status: record.project_status,
            location: record.location.clone(),
            city: record.city,
            city_name: record.city_name.clone(),
            map_location: record.map_location.clone(),
            description: record.description.clone(),
            about_listing: record.about_listing.clone(),
            price: record.price.clone(),
            available_flat_types: record.flat_types(),
            rera_number: record.rera_number.clone(),
            land_area: record.land_area.clone(),
            amenities_area: record.amenities_area.clone(),
            total_units: record.total_units.clone(),
            total_towers: record.total_towers.clone(),
            developer_name: record.developer_name.clone(),
            is_hot: record.is_hot,
            featured: record.featured,
            ..ProjectDraft::default()
        };
        if !record.state.is_empty() {
            draft.state = record.state.clone();
        }
        draft
    }

    pub fn add_image_row(&mut self) {
        self.images.push(ImageRowDraft::blank(self.images.len()));
    }

    pub fn remove_image_row(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    pub fn add_amenity_row(&mut self) {
        self.amenities.push(AmenityRowDraft::blank(self.amenities.len()));
    }

    pub fn remove_amenity_row(&mut self, index: usize) {
        if index < self.amenities.len() {
            self.amenities.remove(index);
        }
    }

    pub fn add_tower(&mut self) {
        self.towers.push(TowerDraft::blank(self.towers.len()));
    }

    pub fn remove_tower(&mut self, index: usize) {
        if index < self.towers.len() {
            self.towers.remove(index);
        }
    }
}

/// Persisted project as returned by the backend. Identity and scalar fields
/// only; child collections are owned by their own endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ProjectRecord {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub project_status: Option<ProjectStatus>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub city: Option<i64>,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub map_location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub about_listing: String,
    #[serde(default)]
    pub price: String,
    /// Comma-joined on the wire.
    #[serde(default)]
    pub available_flat_types: Option<String>,
    #[serde(default)]
    pub rera_number: String,
    #[serde(default)]
    pub land_area: String,
    #[serde(default)]
    pub amenities_area: String,
    #[serde(default)]
    pub total_units: String,
    #[serde(default)]
    pub total_towers: String,
    #[serde(default)]
    pub developer_name: String,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl ProjectRecord {
    pub fn flat_types(&self) -> Vec<String> {
        self.available_flat_types
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}
