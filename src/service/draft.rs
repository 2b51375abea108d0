use crate::error::app_error::AppError;
use crate::models::project::{ProjectDraft, PropertyType};
use std::collections::{HashMap, HashSet};

pub const DUPLICATE_IMAGE_ORDERS: &str = "Duplicate order numbers found in project images. Please use unique order numbers.";
pub const DUPLICATE_AMENITY_ORDERS: &str = "Duplicate order numbers found in project amenities. Please use unique order numbers.";
pub const DUPLICATE_TOWER_ORDERS: &str = "Duplicate order numbers found in towers. Please use unique order numbers.";

/// Which ordered sibling list a duplicate-order error belongs to. Flats and
/// tower amenities are exempt from the uniqueness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderList {
    Images,
    Amenities,
    Towers,
}

impl OrderList {
    fn row_message(&self) -> &'static str {
        match self {
            OrderList::Images => "This order number is already used by another image",
            OrderList::Amenities => "This order number is already used by another amenity",
            OrderList::Towers => "This order number is already used by another tower",
        }
    }

    fn list_message(&self) -> &'static str {
        match self {
            OrderList::Images => DUPLICATE_IMAGE_ORDERS,
            OrderList::Amenities => DUPLICATE_AMENITY_ORDERS,
            OrderList::Towers => DUPLICATE_TOWER_ORDERS,
        }
    }
}

/// Per-row duplicate-order errors, keyed by row index, one map per list.
/// Every row participating in a duplicate value is flagged, not just the
/// later one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderErrors {
    pub images: HashMap<usize, String>,
    pub amenities: HashMap<usize, String>,
    pub towers: HashMap<usize, String>,
}

impl OrderErrors {
    pub fn is_clean(&self) -> bool {
        self.images.is_empty() && self.amenities.is_empty() && self.towers.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.amenities.clear();
        self.towers.clear();
    }

    fn map_mut(&mut self, list: OrderList) -> &mut HashMap<usize, String> {
        match list {
            OrderList::Images => &mut self.images,
            OrderList::Amenities => &mut self.amenities,
            OrderList::Towers => &mut self.towers,
        }
    }
}

/// Indices of all rows whose parsed `order` collides with another row's.
/// Non-numeric entries are ignored.
pub fn duplicate_order_indices(orders: &[&str]) -> HashSet<usize> {
    let mut by_value: HashMap<i64, Vec<usize>> = HashMap::new();
    for (index, raw) in orders.iter().enumerate() {
        if let Ok(value) = raw.trim().parse::<i64>() {
            by_value.entry(value).or_default().push(index);
        }
    }

    by_value
        .into_values()
        .filter(|indices| indices.len() > 1)
        .flatten()
        .collect()
}

/// Re-scans one sibling list after an `order` edit. Flags every row in a
/// duplicate group and clears rows whose sole counterpart was just resolved.
pub fn recheck_orders(errors: &mut OrderErrors, list: OrderList, orders: &[&str]) {
    let duplicates = duplicate_order_indices(orders);
    let map = errors.map_mut(list);
    map.clear();
    for index in duplicates {
        map.insert(index, list.row_message().to_string());
    }
}

fn check_list(errors: &mut OrderErrors, list: OrderList, orders: &[&str]) -> Result<(), AppError> {
    recheck_orders(errors, list, orders);
    if errors.map_mut(list).is_empty() {
        Ok(())
    } else {
        Err(AppError::form(list.list_message()))
    }
}

fn image_orders(draft: &ProjectDraft) -> Vec<&str> {
    draft.images.iter().map(|row| row.order.as_str()).collect()
}

fn amenity_orders(draft: &ProjectDraft) -> Vec<&str> {
    draft.amenities.iter().map(|row| row.order.as_str()).collect()
}

fn tower_orders(draft: &ProjectDraft) -> Vec<&str> {
    draft.towers.iter().map(|row| row.order.as_str()).collect()
}

fn require(condition: bool, message: &str) -> Result<(), AppError> {
    if condition { Ok(()) } else { Err(AppError::form(message)) }
}

/// Fail-fast draft validation; the first violation wins and nothing ever
/// reaches the network from here. Checks run in a fixed order: order
/// uniqueness, required scalars, image payload, amenity name, and the
/// residential tower rule.
pub fn validate_draft(draft: &ProjectDraft, editing: bool, errors: &mut OrderErrors) -> Result<(), AppError> {
    check_list(errors, OrderList::Images, &image_orders(draft))?;
    check_list(errors, OrderList::Amenities, &amenity_orders(draft))?;
    check_list(errors, OrderList::Towers, &tower_orders(draft))?;

    require(!draft.title.trim().is_empty(), "Project Title is mandatory")?;
    require(draft.project_status.is_some(), "Project Status is mandatory")?;
    require(!draft.description.trim().is_empty(), "Description is mandatory")?;
    require(!draft.location.trim().is_empty(), "Location is mandatory")?;
    require(!draft.city_name.trim().is_empty() || draft.city.is_some(), "City is mandatory")?;
    require(!draft.state.trim().is_empty(), "State is mandatory")?;
    require(!draft.map_location.trim().is_empty(), "Map Location is mandatory")?;
    require(!draft.rera_number.trim().is_empty(), "RERA Number is mandatory")?;
    require(!draft.land_area.trim().is_empty(), "Land Area is mandatory")?;
    require(!draft.amenities_area.trim().is_empty(), "Amenities Area is mandatory")?;
    require(!draft.total_units.trim().is_empty(), "Total Units is mandatory")?;
    require(!draft.total_towers.trim().is_empty(), "Total Towers is mandatory")?;
    require(!draft.developer_name.trim().is_empty(), "Developer Name is mandatory")?;
    require(draft.cover_image.is_some() || editing, "Cover Image is mandatory")?;
    require(!draft.price.trim().is_empty(), "Price is mandatory")?;

    require(
        draft.images.iter().any(|row| row.image.is_some()),
        "At least one project image is mandatory",
    )?;
    require(
        draft.amenities.iter().any(|row| !row.name.trim().is_empty()),
        "At least one project amenity is mandatory",
    )?;

    if draft.property_type == PropertyType::Residential {
        require(!draft.towers.is_empty(), "At least one tower is mandatory for residential projects")?;
        for tower in &draft.towers {
            require(
                !tower.name.trim().is_empty(),
                "All towers must have a name for residential projects",
            )?;
            require(
                !tower.total_floors.trim().is_empty(),
                "All towers must have total floors for residential projects",
            )?;
        }
    }

    Ok(())
}
