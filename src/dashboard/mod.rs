//! Dashboard module
//!
//! Provides an overview page with summary cards and charts for a selected
//! period, and a JSON API serving the same aggregated data.

mod cards;
pub(crate) mod charts;
mod handlers;
mod tables;

pub use handlers::{get_dashboard_page, get_expense_data};
