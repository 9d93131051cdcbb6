//! User settings: colour scheme and the default view.

mod db;
mod domain;
mod endpoint;
mod page;

pub use db::{create_settings_table, get_settings, save_settings};
pub use domain::{ColorScheme, DefaultView, Settings};
pub use endpoint::save_settings_endpoint;
pub use page::{get_settings_page, saved_accent_style};
