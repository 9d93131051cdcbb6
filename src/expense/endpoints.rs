//! The API endpoints for creating, updating and deleting expenses.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    app_state::SharedResultCache,
    cache::invalidate,
    database_id::ExpenseId,
    endpoints,
    expense::{
        core::{create_expense, delete_expense, update_expense},
        multipart::parse_expense_form,
    },
    timezone::local_today,
};

/// The state needed to create, update or delete an expense.
#[derive(Debug, Clone)]
pub struct ExpenseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// Cleared whenever an expense changes.
    pub result_cache: SharedResultCache,
}

impl FromRef<AppState> for ExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            result_cache: state.result_cache.clone(),
        }
    }
}

/// A route handler for creating a new expense, redirects to the expenses view on success.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    multipart: Multipart,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let builder = match parse_expense_form(multipart, today).await {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("Could not parse expense form: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_expense(builder, &connection) {
        Ok(expense) => {
            invalidate(&state.result_cache);
            tracing::info!("Created expense {} \"{}\"", expense.id, expense.title);

            (
                HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for updating an expense, redirects to the expenses view on success.
///
/// The stored receipt is kept unless a new one is uploaded.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Path(expense_id): Path<ExpenseId>,
    multipart: Multipart,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let builder = match parse_expense_form(multipart, today).await {
        Ok(builder) => builder,
        Err(error) => {
            tracing::warn!("Could not parse expense form: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_expense(expense_id, builder, &connection) {
        Ok(()) => {
            invalidate(&state.result_cache);
            tracing::info!("Updated expense {expense_id}");

            (
                HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting an expense, redirects to the expenses view on success.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseEndpointState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        Ok(()) => {
            invalidate(&state.result_cache);
            tracing::info!("Deleted expense {expense_id}");

            (
                HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not delete expense {expense_id}: {error}");
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
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error,
        aggregate::AggregateResult,
        cache::ResultCache,
        endpoints,
        expense::{
            Expense, create_expense, get_expense,
            multipart::test_multipart::must_make_multipart,
        },
        test_utils::{assert_hx_redirect, must_open_db},
    };

    use super::{
        ExpenseEndpointState, create_expense_endpoint, delete_expense_endpoint,
        update_expense_endpoint,
    };

    fn get_state() -> ExpenseEndpointState {
        let connection = must_open_db();

        ExpenseEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
            result_cache: Arc::new(Mutex::new(ResultCache::new(Duration::from_secs(300)))),
        }
    }

    fn fill_cache(state: &ExpenseEndpointState) {
        state
            .result_cache
            .lock()
            .unwrap()
            .put("expense_data?".to_owned(), AggregateResult::default());
    }

    #[tokio::test]
    async fn create_expense_redirects_and_clears_cache() {
        let state = get_state();
        fill_cache(&state);
        let multipart = must_make_multipart(
            endpoints::EXPENSES_API,
            &[
                ("title", "Moving Truck Rental"),
                ("cost", "299.99"),
                ("date", "2024-01-15"),
                ("category_id", "1"),
            ],
            &[],
        )
        .await;

        let response = create_expense_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);
        assert!(state.result_cache.lock().unwrap().is_empty());
        let expense = get_expense(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(expense.title, "Moving Truck Rental");
        assert_eq!(expense.cost, 299.99);
        assert_eq!(expense.date, date!(2024 - 01 - 15));
        assert_eq!(expense.category_id, Some(1));
    }

    #[tokio::test]
    async fn create_expense_rejects_non_numeric_cost() {
        let state = get_state();
        let multipart =
            must_make_multipart(endpoints::EXPENSES_API, &[("cost", "lots")], &[]).await;

        let response = create_expense_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_expense(1, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn update_expense_changes_fields() {
        let state = get_state();
        let expense = create_expense(
            Expense::build(10.0, date!(2024 - 01 - 01), "Lunch"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        fill_cache(&state);
        let multipart = must_make_multipart(
            &endpoints::format_endpoint(endpoints::EXPENSE, expense.id),
            &[("title", "Dinner"), ("cost", "20"), ("date", "2024-01-02")],
            &[],
        )
        .await;

        let response =
            update_expense_endpoint(State(state.clone()), Path(expense.id), multipart).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.result_cache.lock().unwrap().is_empty());
        let updated = get_expense(expense.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.title, "Dinner");
        assert_eq!(updated.cost, 20.0);
    }

    #[tokio::test]
    async fn update_missing_expense_is_not_found() {
        let state = get_state();
        let multipart = must_make_multipart(endpoints::EXPENSES_API, &[], &[]).await;

        let response = update_expense_endpoint(State(state), Path(42), multipart).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_expense_clears_cache() {
        let state = get_state();
        let expense = create_expense(
            Expense::build(10.0, date!(2024 - 01 - 01), "Lunch"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        fill_cache(&state);

        let response = delete_expense_endpoint(State(state.clone()), Path(expense.id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.result_cache.lock().unwrap().is_empty());
        assert_eq!(
            get_expense(expense.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_missing_expense_is_not_found() {
        let state = get_state();

        let response = delete_expense_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
