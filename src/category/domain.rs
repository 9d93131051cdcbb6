//! Core category domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{database_id::DatabaseId, name::Name};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// The colour given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#0d6efd";
/// The icon class given to categories created without one.
pub const DEFAULT_CATEGORY_ICON: &str = "fa-tag";

/// A category for grouping expenses (e.g., 'Food', 'Travel').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: Name,
    pub description: String,
    /// A hex colour, e.g. "#fd7e14".
    pub color: String,
    /// A Font Awesome icon class, e.g. "fa-utensils".
    pub icon: String,
    /// Default categories are seeded on start up and cannot be deleted.
    pub is_default: bool,
    pub created_at: OffsetDateTime,
}

/// The fields needed to create a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: Name,
    pub description: String,
    pub color: String,
    pub icon: String,
    pub is_default: bool,
}

impl NewCategory {
    /// A user created category with the default colour and icon.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            description: String::new(),
            color: DEFAULT_CATEGORY_COLOR.to_owned(),
            icon: DEFAULT_CATEGORY_ICON.to_owned(),
            is_default: false,
        }
    }
}

/// Form data for category creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

/// The categories seeded into an empty database as (name, icon, colour).
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 10] = [
    ("Moving", "fa-truck", "#0d6efd"),
    ("Travel", "fa-plane", "#28a745"),
    ("Housing", "fa-home", "#dc3545"),
    ("Storage", "fa-warehouse", "#ffc107"),
    ("Transportation", "fa-car", "#17a2b8"),
    ("Lodging", "fa-bed", "#6f42c1"),
    ("Food", "fa-utensils", "#fd7e14"),
    ("Supplies", "fa-box", "#20c997"),
    ("Services", "fa-concierge-bell", "#e83e8c"),
    ("Other", "fa-ellipsis-h", "#6c757d"),
];
