use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Available,
    SoldOut,
    BookingOpen,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Available => "available",
            BookingStatus::SoldOut => "sold_out",
            BookingStatus::BookingOpen => "booking_open",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Available,
    Sold,
    Reserved,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Sold => "sold",
            Availability::Reserved => "reserved",
        }
    }
}

/// One tower row of the draft graph; owns its flats and amenities.
#[derive(Debug, Clone, PartialEq)]
pub struct TowerDraft {
    pub name: String,
    pub tower_number: String,
    pub total_floors: String,
    pub parking_floors: String,
    pub residential_floors: String,
    pub refugee_floors: String,
    pub per_floor_flats: String,
    pub total_lifts: String,
    pub total_stairs: String,
    pub booking_status: BookingStatus,
    pub is_active: bool,
    pub order: String,
    pub flats: Vec<FlatDraft>,
    pub amenities: Vec<TowerAmenityRowDraft>,
}

impl TowerDraft {
    pub fn blank(order: usize) -> Self {
        Self {
            name: String::new(),
            tower_number: String::new(),
            total_floors: String::new(),
            parking_floors: String::new(),
            residential_floors: String::new(),
            refugee_floors: String::new(),
            per_floor_flats: String::new(),
            total_lifts: String::new(),
            total_stairs: String::new(),
            booking_status: BookingStatus::Available,
            is_active: true,
            order: order.to_string(),
            flats: vec![FlatDraft::blank(0)],
            amenities: vec![TowerAmenityRowDraft::blank(0)],
        }
    }

    pub fn add_flat(&mut self) {
        self.flats.push(FlatDraft::blank(self.flats.len()));
    }

    pub fn remove_flat(&mut self, index: usize) {
        if index < self.flats.len() {
            self.flats.remove(index);
        }
    }

    pub fn add_amenity(&mut self) {
        self.amenities.push(TowerAmenityRowDraft::blank(self.amenities.len()));
    }

    pub fn remove_amenity(&mut self, index: usize) {
        if index < self.amenities.len() {
            self.amenities.remove(index);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatDraft {
    pub flat_number: String,
    pub floor: String,
    pub flat_type: String,
    pub area: String,
    pub price: String,
    pub availability: Availability,
    pub order: String,
}

impl FlatDraft {
    pub fn blank(order: usize) -> Self {
        Self {
            flat_number: String::new(),
            floor: String::new(),
            flat_type: String::new(),
            area: String::new(),
            price: String::new(),
            availability: Availability::Available,
            order: order.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TowerAmenityRowDraft {
    pub name: String,
    pub icon: String,
    pub order: String,
}

impl TowerAmenityRowDraft {
    pub fn blank(order: usize) -> Self {
        Self {
            name: String::new(),
            icon: String::new(),
            order: order.to_string(),
        }
    }
}
