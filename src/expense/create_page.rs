//! Defines the route handler for the page for creating a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    expense::form::expense_form_fields,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, HeadElement, base, loading_spinner},
    navigation::NavBar,
    payment_method::{PaymentMethod, get_all_payment_methods},
    settings::saved_accent_style,
    timezone::local_today,
};

/// The state needed for the create and edit expense pages.
#[derive(Debug, Clone)]
pub struct ExpensePageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

fn create_expense_view(
    today: Date,
    categories: &[Category],
    payment_methods: &[PaymentMethod],
    accent: HeadElement,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::EXPENSES_API)
                hx-encoding="multipart/form-data"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                class="w-full max-w-2xl space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Expense" }

                (expense_form_fields(None, today, categories, payment_methods))

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Add Expense"
                }
            }
        }
    };

    base("Add Expense", &[accent], &content)
}

/// Renders the page for creating an expense.
pub async fn get_create_expense_page(
    State(state): State<ExpensePageState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve categories for new expense page: {error}")
    })?;
    let payment_methods = get_all_payment_methods(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve payment methods for new expense page: {error}")
    })?;
    let accent = saved_accent_style(&connection);

    Ok(create_expense_view(today, &categories, &payment_methods, accent).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_hx_endpoint, assert_required_input, assert_status_ok,
            assert_submit_button, assert_valid_html, must_get_form, must_open_db,
            parse_html_document,
        },
    };

    use super::{ExpensePageState, get_create_expense_page};

    #[tokio::test]
    async fn new_expense_page_returns_form() {
        let connection = must_open_db();
        let state = ExpensePageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_create_expense_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::EXPENSES_API, "hx-post");
        assert_eq!(form.value().attr("hx-encoding"), Some("multipart/form-data"));
        assert_required_input(&form, "title", "text");
        assert_required_input(&form, "cost", "number");
        assert_required_input(&form, "date", "date");
        assert_submit_button(&form);
        let category_options = Selector::parse("select[name=category_id] option").unwrap();
        assert_eq!(form.select(&category_options).count(), 11);
    }
}
