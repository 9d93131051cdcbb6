//! Category creation and deletion endpoints used by the settings page.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    app_state::SharedResultCache,
    cache::invalidate,
    category::{CategoryForm, CategoryId, NewCategory, create_category, db::delete_category},
    endpoints,
    name::Name,
};

/// The state needed for creating and deleting categories.
#[derive(Debug, Clone)]
pub struct CategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub result_cache: SharedResultCache,
}

impl FromRef<AppState> for CategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            result_cache: state.result_cache.clone(),
        }
    }
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let name = match Name::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_category = NewCategory {
        description: form.description.trim().to_owned(),
        color: form.color,
        icon: form.icon,
        ..NewCategory::new(name)
    };

    match create_category(new_category, &connection) {
        Ok(category) => {
            tracing::info!("Created category {} ({})", category.name, category.id);
            (
                HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create category: {error}");
            error.into_alert_response()
        }
    }
}

/// Handle category deletion. Returns a success alert or an error alert.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_category(category_id, &connection) {
        Ok(()) => {
            invalidate(&state.result_cache);
            Alert::SuccessSimple {
                message: "Category deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not delete category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}
