//! Expense management.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and `ExpenseBuilder` for creating expenses
//! - `ExpenseRecord`, the joined view used for filtering and aggregation
//! - Database functions for storing, querying, and managing expenses
//! - View handlers and endpoints for expense related web pages

mod core;
mod create_page;
mod edit_page;
mod endpoints;
mod expenses_page;
mod form;
mod multipart;
mod receipt;
mod record;

pub use core::{
    DEFAULT_TITLE, Expense, ExpenseBuilder, Receipt, ReimbursementStatus, create_expense,
    create_expense_table, get_expense,
};
pub use create_page::get_create_expense_page;
pub use edit_page::get_edit_expense_page;
pub use endpoints::{create_expense_endpoint, delete_expense_endpoint, update_expense_endpoint};
pub use expenses_page::get_expenses_page;
pub use multipart::parse_cost;
pub use receipt::get_receipt_page;
pub use record::{ExpenseRecord, get_expense_records};

#[cfg(test)]
pub(crate) use record::test_records;
