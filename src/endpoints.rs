//! The URIs of the pages and API endpoints.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}', use [format_endpoint].

/// The root route which redirects to the configured default view.
pub const ROOT: &str = "/";
/// The page with summary cards and charts for a recent period.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for creating a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The receipt attached to an expense.
pub const RECEIPT: &str = "/expenses/{expense_id}/receipt";
/// The page for changing settings and managing categories and payment methods.
pub const SETTINGS_VIEW: &str = "/settings";
/// The page for importing expenses from a CSV file.
pub const IMPORT_VIEW: &str = "/import";
/// The page for configuring and downloading a report.
pub const REPORT_VIEW: &str = "/report";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The aggregated expense data for the dashboard charts as JSON.
pub const EXPENSE_DATA_API: &str = "/api/expense_data";
/// The route to create expenses.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to create categories.
pub const CATEGORIES_API: &str = "/api/categories";
/// The route to delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create payment methods.
pub const PAYMENT_METHODS_API: &str = "/api/payment_methods";
/// The route to delete a payment method.
pub const PAYMENT_METHOD: &str = "/api/payment_methods/{payment_method_id}";
/// The route to save the settings.
pub const SETTINGS_API: &str = "/api/settings";
/// The route to download all expenses as a CSV file.
pub const EXPORT: &str = "/api/export";
/// The route to download an example CSV file for importing.
pub const IMPORT_TEMPLATE: &str = "/api/import/template";
/// The route to upload a CSV file for importing expenses.
pub const IMPORT: &str = "/api/import";
/// The route to download a generated report.
pub const REPORT_API: &str = "/api/report";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// Returns `endpoint_path` unchanged if it has no parameter.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map(|offset| start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!("{}{}{}", &endpoint_path[..start], id, &endpoint_path[end..])
}
