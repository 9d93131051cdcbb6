//! Categories for grouping expenses.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_category, create_category_table, get_all_categories, get_category,
    seed_default_categories,
};
pub use domain::{Category, CategoryForm, CategoryId, NewCategory};
pub use endpoints::{create_category_endpoint, delete_category_endpoint};
