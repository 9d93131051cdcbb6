//! Importing expenses from CSV files.

mod import_expenses;
mod import_page;
mod parse;

pub use import_expenses::import_expenses;
pub use import_page::get_import_page;
pub use parse::{NameLookup, parse_expenses_csv, parse_import_date};
