//! Payment method creation and deletion endpoints used by the settings page.

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
    endpoints,
    name::Name,
    payment_method::{
        PaymentMethodForm, PaymentMethodId, create_payment_method, db::delete_payment_method,
    },
};

/// The state needed for creating and deleting payment methods.
#[derive(Debug, Clone)]
pub struct PaymentMethodEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub result_cache: SharedResultCache,
}

impl FromRef<AppState> for PaymentMethodEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            result_cache: state.result_cache.clone(),
        }
    }
}

/// Handle payment method creation form submission.
pub async fn create_payment_method_endpoint(
    State(state): State<PaymentMethodEndpointState>,
    Form(form): Form<PaymentMethodForm>,
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

    match create_payment_method(name, &form.icon, false, &connection) {
        Ok(payment_method) => {
            tracing::info!(
                "Created payment method {} ({})",
                payment_method.name,
                payment_method.id
            );
            (
                HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create payment method: {error}");
            error.into_alert_response()
        }
    }
}

/// Handle payment method deletion. Returns a success alert or an error alert.
pub async fn delete_payment_method_endpoint(
    Path(payment_method_id): Path<PaymentMethodId>,
    State(state): State<PaymentMethodEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_payment_method(payment_method_id, &connection) {
        Ok(()) => {
            invalidate(&state.result_cache);
            Alert::SuccessSimple {
                message: "Payment method deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not delete payment method {payment_method_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        cache::ResultCache,
        endpoints,
        payment_method::{PaymentMethodForm, get_all_payment_methods},
        test_utils::{assert_alert, assert_hx_redirect, must_open_db, parse_html_fragment},
    };

    use super::{
        PaymentMethodEndpointState, create_payment_method_endpoint, delete_payment_method_endpoint,
    };

    fn get_state() -> PaymentMethodEndpointState {
        let connection = must_open_db();

        PaymentMethodEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            result_cache: Arc::new(Mutex::new(ResultCache::new(Duration::from_secs(300)))),
        }
    }

    #[tokio::test]
    async fn can_create_payment_method() {
        let state = get_state();
        let form = PaymentMethodForm {
            name: "Gift Card".to_owned(),
            icon: "fa-gift".to_owned(),
        };

        let response = create_payment_method_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SETTINGS_VIEW);
        let methods = get_all_payment_methods(&state.db_connection.lock().unwrap()).unwrap();
        assert!(methods.iter().any(|method| method.name.as_ref() == "Gift Card"
            && method.icon == "fa-gift"
            && !method.is_default));
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let state = get_state();
        let form = PaymentMethodForm {
            name: "Cash".to_owned(),
            icon: String::new(),
        };

        let response = create_payment_method_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_alert(
            &html,
            "Duplicate name",
            Some("That name is already in use. Choose a different name."),
        );
    }

    #[tokio::test]
    async fn deleting_missing_payment_method_is_not_found() {
        let state = get_state();

        let response = delete_payment_method_endpoint(Path(999), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
