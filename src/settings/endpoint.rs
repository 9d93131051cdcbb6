use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    settings::{ColorScheme, DefaultView, Settings, save_settings},
};

/// The state needed to save settings.
#[derive(Debug, Clone)]
pub struct SettingsEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for saving settings.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub default_view: DefaultView,
}

/// Save the settings and reload the settings page.
pub async fn save_settings_endpoint(
    State(state): State<SettingsEndpointState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let settings = Settings {
        color_scheme: form.color_scheme,
        default_view: form.default_view,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = save_settings(settings, &connection) {
        tracing::error!("Could not save settings: {error}");
        return error.into_alert_response();
    }

    tracing::info!(
        "Saved settings: color scheme {}, default view {}",
        settings.color_scheme.as_str(),
        settings.default_view.as_str()
    );

    (
        HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
