use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    csv_export::CSV_HEADERS,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        HeadElement, LINK_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    settings::saved_accent_style,
};

/// The state needed for the import page.
#[derive(Debug, Clone)]
pub struct ImportPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn import_form_view() -> Markup {
    let import_route = endpoints::IMPORT;
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(import_route)
            enctype="multipart/form-data"
            hx-disabled-elt="#files, #submit-button"
            hx-indicator="#indicator"
            hx-swap="none"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="files" class=(FORM_LABEL_STYLE)
                {
                    "Choose CSV file(s) to upload"
                }

                input
                    id="files"
                    type="file"
                    name="files"
                    accept="text/csv,.csv"
                    multiple
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button
                type="submit"
                id="submit-button"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (spinner) }
                " Import Expenses"
            }
        }
    }
}

fn import_view(accent: HeadElement) -> Markup {
    let nav_bar = NavBar::new(endpoints::IMPORT_VIEW).into_html();
    let form = import_form_view();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl space-y-6"
            {
                h1 class="text-2xl font-bold" { "Import Expenses" }

                (form)

                section class="space-y-2 text-sm"
                {
                    h2 class="text-lg font-semibold" { "File format" }

                    p
                    {
                        "The first row must name the columns. Recognised columns are: "
                        code { (CSV_HEADERS.join(", ")) }
                        ". Other columns are ignored."
                    }

                    p
                    {
                        "Categories and payment methods are matched by name. "
                        "Unknown names leave the expense uncategorised. "
                        "Dates such as 2024-01-15, 01/15/2024 or January 15, 2024 are understood."
                    }

                    p
                    {
                        a href=(endpoints::IMPORT_TEMPLATE) class=(LINK_STYLE) download
                        {
                            "Download the template"
                        }
                        " to get started."
                    }
                }
            }
        }
    };

    base("Import Expenses", &[accent], &content)
}

/// Route handler for the import CSV page.
pub async fn get_import_page(State(state): State<ImportPageState>) -> Result<Response, Error> {
    let accent = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        saved_accent_style(&connection)
    };

    Ok(import_view(accent).into_response())
}
