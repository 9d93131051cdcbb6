//! Application router configuration.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef, State},
    response::Redirect,
    routing::{delete, get, post},
};
use rusqlite::Connection;
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{create_category_endpoint, delete_category_endpoint},
    csv_export::{export_expenses, get_import_template},
    csv_import::{get_import_page, import_expenses},
    dashboard::{get_dashboard_page, get_expense_data},
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_create_expense_page,
        get_edit_expense_page, get_expenses_page, get_receipt_page, update_expense_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    payment_method::{create_payment_method_endpoint, delete_payment_method_endpoint},
    report::{get_report, get_report_page},
    settings::{DefaultView, get_settings, get_settings_page, save_settings_endpoint},
};

/// The largest request body accepted, sized for receipt and CSV uploads.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let views = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .route(endpoints::NEW_EXPENSE_VIEW, get(get_create_expense_page))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::RECEIPT, get(get_receipt_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(endpoints::IMPORT_VIEW, get(get_import_page))
        .route(endpoints::REPORT_VIEW, get(get_report_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api = Router::new()
        .route(endpoints::EXPENSE_DATA_API, get(get_expense_data))
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSE,
            delete(delete_expense_endpoint).put(update_expense_endpoint),
        )
        .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
        .route(endpoints::CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::PAYMENT_METHODS_API,
            post(create_payment_method_endpoint),
        )
        .route(
            endpoints::PAYMENT_METHOD,
            delete(delete_payment_method_endpoint),
        )
        .route(endpoints::SETTINGS_API, post(save_settings_endpoint))
        .route(endpoints::EXPORT, get(export_expenses))
        .route(endpoints::IMPORT_TEMPLATE, get(get_import_template))
        .route(endpoints::IMPORT, post(import_expenses))
        .route(endpoints::REPORT_API, get(get_report));

    views
        .merge(api)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// The state needed to pick the page the root path redirects to.
#[derive(Debug, Clone)]
struct IndexState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IndexState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The root path '/' redirects to the default view chosen in the settings.
async fn get_index_page(State(state): State<IndexState>) -> Redirect {
    let default_view = match state.db_connection.lock() {
        Ok(connection) => get_settings(&connection)
            .inspect_err(|error| tracing::error!("Could not read settings: {error}"))
            .map(|settings| settings.default_view)
            .unwrap_or_default(),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            DefaultView::default()
        }
    };

    Redirect::to(&default_view_url(default_view))
}

fn default_view_url(view: DefaultView) -> String {
    match view {
        DefaultView::List => endpoints::EXPENSES_VIEW.to_owned(),
        DefaultView::Grid => format!("{}?view=grid", endpoints::EXPENSES_VIEW),
        DefaultView::Dashboard => endpoints::DASHBOARD_VIEW.to_owned(),
    }
}
