use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    app_state::SharedResultCache,
    cache::invalidate,
    category::get_all_categories,
    csv_import::parse::{NameLookup, parse_expenses_csv},
    expense::{ExpenseBuilder, create_expense},
    payment_method::get_all_payment_methods,
    timezone::local_today,
};

/// The state needed for importing expenses.
#[derive(Debug, Clone)]
pub struct ImportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// Cleared after a successful import.
    pub result_cache: SharedResultCache,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            result_cache: state.result_cache.clone(),
        }
    }
}

/// Route handler for importing expenses from CSV files.
///
/// Every file is parsed before anything is written, and all rows are stored
/// in one database transaction, so a bad row rejects the whole upload.
pub async fn import_expenses(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Result<Response, Response> {
    let start_time = std::time::Instant::now();
    let today = local_today(&state.local_timezone).map_err(Error::into_alert_response)?;

    let mut files = Vec::new();

    loop {
        let field = multipart.next_field().await.map_err(|error| {
            tracing::error!("Could not read multipart form field: {error}");
            Error::MultipartError(error.to_string()).into_alert_response()
        })?;

        let Some(field) = field else {
            break;
        };

        let csv_data = parse_multipart_field(field).await.map_err(|error| {
            tracing::debug!("Rejected import file: {error}");
            error.into_alert_response()
        })?;

        files.push(csv_data);
    }

    if files.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Alert::ErrorSimple {
                message: "No file selected".to_owned(),
            },
        )
            .into_response());
    }

    let imported_count = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError.into_alert_response()
        })?;

        let builders = parse_files(&files, today, &connection).map_err(|error| {
            tracing::debug!("Failed to parse CSV: {error}");
            error.into_alert_response()
        })?;

        import_expense_list(builders, &connection).map_err(|error| {
            tracing::error!("Failed to import expenses: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Import failed".to_owned(),
                    details: "An unexpected error occurred, please try again later".to_owned(),
                },
            )
                .into_response()
        })?
    };

    invalidate(&state.result_cache);

    tracing::info!(
        "Imported {imported_count} expenses from {} file(s) in {}ms",
        files.len(),
        start_time.elapsed().as_millis()
    );

    Ok((
        StatusCode::CREATED,
        Alert::Success {
            message: "Import completed successfully!".to_owned(),
            details: format!("Imported {imported_count} expenses"),
        },
    )
        .into_response())
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let is_csv = field.content_type() == Some("text/csv")
        || file_name.to_lowercase().ends_with(".csv");

    if !is_csv {
        return Err(Error::NotCSV);
    }

    let data = field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}

fn parse_files(
    files: &[String],
    today: time::Date,
    connection: &Connection,
) -> Result<Vec<ExpenseBuilder>, Error> {
    let lookup = NameLookup::new(
        &get_all_categories(connection)?,
        &get_all_payment_methods(connection)?,
    );

    let mut builders = Vec::new();
    for text in files {
        builders.extend(parse_expenses_csv(text, &lookup, today)?);
    }

    Ok(builders)
}

/// Create every expense in `builders`, or none of them if any insert fails.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
fn import_expense_list(
    builders: Vec<ExpenseBuilder>,
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection
        .unchecked_transaction()
        .inspect_err(|error| tracing::error!("could not start transaction: {error}"))?;

    let count = builders.len();
    for builder in builders {
        create_expense(builder, &tx)?;
    }

    tx.commit()
        .inspect_err(|error| tracing::error!("could not commit transaction: {error}"))?;

    Ok(count)
}

#[cfg(test)]
mod import_expenses_tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::{
        extract::{FromRequest, Multipart, State},
        http::{Request, StatusCode},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        aggregate::AggregateResult,
        cache::ResultCache,
        csv_import::import_expenses::{ImportState, import_expenses},
        endpoints,
        expense::get_expense_records,
        test_utils::{assert_alert, assert_content_type, must_open_db, parse_html_fragment},
    };

    const EXPENSES_CSV: &str = "Date,Title,Description,Category,Cost,Payment Method,Location,Vendor,Notes,Tags\n\
        2024-01-15,Moving Truck Rental,U-Haul 26ft truck,Moving,299.99,Credit Card,U-Haul Downtown,U-Haul,Included insurance,\"moving,transport\"\n\
        01/16/2024,Hotel Stay,Overnight during move,Lodging,125.00,Company Card,Holiday Inn Express,Holiday Inn,1 night stay,\"lodging,travel\"";

    const SECOND_CSV: &str = "Title,Cost\nStorage Unit,89.50";

    fn get_state() -> ImportState {
        ImportState {
            db_connection: Arc::new(Mutex::new(must_open_db())),
            local_timezone: "Etc/UTC".to_owned(),
            result_cache: Arc::new(Mutex::new(ResultCache::new(Duration::from_secs(300)))),
        }
    }

    fn count_expenses(state: &ImportState) -> usize {
        let connection = state.db_connection.lock().unwrap();
        get_expense_records(&connection)
            .expect("Could not get expenses")
            .len()
    }

    #[tokio::test]
    async fn imports_multiple_files_and_clears_cache() {
        let state = get_state();
        state
            .result_cache
            .lock()
            .unwrap()
            .put("expense_data?".to_owned(), AggregateResult::default());

        let response = import_expenses(
            State(state.clone()),
            must_make_multipart_csv(&[EXPENSES_CSV, SECOND_CSV]).await,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(count_expenses(&state), 3);
        assert!(state.result_cache.lock().unwrap().is_empty());
        let html = parse_html_fragment(response).await;
        assert_alert(
            &html,
            "Import completed successfully!",
            Some("Imported 3 expenses"),
        );
    }

    #[tokio::test]
    async fn imported_fields_are_stored() {
        let state = get_state();

        import_expenses(
            State(state.clone()),
            must_make_multipart_csv(&[EXPENSES_CSV]).await,
        )
        .await
        .unwrap();

        let records = get_expense_records(&state.db_connection.lock().unwrap()).unwrap();
        let hotel = records
            .iter()
            .find(|record| record.title == "Hotel Stay")
            .expect("hotel stay was not imported");
        assert_eq!(hotel.date, date!(2024 - 01 - 16));
        assert_eq!(hotel.cost, 125.0);
        assert_eq!(hotel.category_name.as_deref(), Some("Lodging"));
        assert_eq!(hotel.payment_method_name.as_deref(), Some("Company Card"));
        assert_eq!(hotel.vendor, "Holiday Inn");
        assert_eq!(hotel.tags, "lodging,travel");
    }

    #[tokio::test]
    async fn invalid_cost_rejects_whole_upload() {
        let state = get_state();

        let response = import_expenses(
            State(state.clone()),
            must_make_multipart_csv(&[EXPENSES_CSV, "Title,Cost\nBroken,lots"]).await,
        )
        .await
        .unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_content_type(&response, "text/html; charset=utf-8");
        assert_eq!(count_expenses(&state), 0, "want no expenses created");
        let html = parse_html_fragment(response).await;
        assert_alert(&html, "Failed to parse CSV", None);
    }

    #[tokio::test]
    async fn empty_file_renders_error_message() {
        let state = get_state();

        let response = import_expenses(State(state.clone()), must_make_multipart_csv(&[""]).await)
            .await
            .unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_expenses(&state), 0);
        let html = parse_html_fragment(response).await;
        assert_alert(&html, "Failed to parse CSV", None);
    }

    #[tokio::test]
    async fn invalid_file_type_renders_error_message() {
        let state = get_state();

        let response = import_expenses(
            State(state.clone()),
            must_make_multipart(&[("text/plain", "notes.txt")]).await,
        )
        .await
        .unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_content_type(&response, "text/html; charset=utf-8");
        assert_eq!(count_expenses(&state), 0);
        let html = parse_html_fragment(response).await;
        assert_alert(&html, "File type must be CSV.", None);
    }

    #[tokio::test]
    async fn accepts_csv_extension_with_other_content_type() {
        let state = get_state();

        let response = import_expenses(
            State(state.clone()),
            must_make_multipart(&[("application/vnd.ms-excel", "expenses.csv")]).await,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(count_expenses(&state), 1);
    }

    #[tokio::test]
    async fn sql_error_renders_error_message() {
        // Without tables the category lookup fails.
        let conn =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
        let state = ImportState {
            db_connection: Arc::new(Mutex::new(conn)),
            ..get_state()
        };

        let response = import_expenses(
            State(state.clone()),
            must_make_multipart_csv(&[EXPENSES_CSV]).await,
        )
        .await
        .unwrap_err();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_content_type(&response, "text/html; charset=utf-8");
    }

    async fn must_make_multipart_csv(csv_strings: &[&str]) -> Multipart {
        let parts: Vec<(&str, &str, &str)> = csv_strings
            .iter()
            .map(|csv| ("text/csv", "expenses.CSV", *csv))
            .collect();

        make_multipart(&parts).await
    }

    async fn must_make_multipart(files: &[(&str, &str)]) -> Multipart {
        let parts: Vec<(&str, &str, &str)> = files
            .iter()
            .map(|(content_type, file_name)| (*content_type, *file_name, "Title,Cost\nFoo,1.00"))
            .collect();

        make_multipart(&parts).await
    }

    async fn make_multipart(parts: &[(&str, &str, &str)]) -> Multipart {
        let boundary = "MY_BOUNDARY123456789";

        let mut lines: Vec<String> = Vec::new();

        for (content_type, file_name, data) in parts {
            lines.push(format!("--{boundary}"));
            lines.push(format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{file_name}\""
            ));
            lines.push(format!("Content-Type: {content_type}"));
            lines.push(String::new());
            lines.push((*data).to_owned());
        }

        lines.push(format!("--{boundary}--"));

        let data = lines.join("\r\n").into_bytes();

        let request = Request::builder()
            .method("POST")
            .uri(endpoints::IMPORT)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(data.into())
            .unwrap();

        Multipart::from_request(request, &{}).await.unwrap()
    }
}
