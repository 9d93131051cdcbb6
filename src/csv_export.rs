//! CSV downloads: every expense, and a template for importing expenses.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{ExpenseRecord, get_expense_records},
    timezone::{dated_file_name, local_today},
};

/// The CSV columns shared by exports, imports and the import template.
pub const CSV_HEADERS: [&str; 10] = [
    "Date",
    "Title",
    "Description",
    "Category",
    "Cost",
    "Payment Method",
    "Location",
    "Vendor",
    "Notes",
    "Tags",
];

/// The extra column that exports add after [CSV_HEADERS].
pub const HAS_RECEIPT_HEADER: &str = "Has Receipt";

const TEMPLATE_FILE_NAME: &str = "import_template.csv";

const TEMPLATE_ROWS: [[&str; 10]; 2] = [
    [
        "2024-01-15",
        "Moving Truck Rental",
        "U-Haul 26ft truck",
        "Moving",
        "299.99",
        "Credit Card",
        "U-Haul Downtown",
        "U-Haul",
        "Included insurance",
        "moving,transport",
    ],
    [
        "2024-01-16",
        "Hotel Stay",
        "Overnight during move",
        "Lodging",
        "125.00",
        "Company Card",
        "Holiday Inn Express",
        "Holiday Inn",
        "1 night stay",
        "lodging,travel",
    ],
];

/// The state needed for exporting expenses.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Download every expense as CSV, newest first.
pub async fn export_expenses(State(state): State<ExportState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let records = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_expense_records(&connection)
            .inspect_err(|error| tracing::error!("Could not get expenses for export: {error}"))?
    };

    let csv = write_expenses_csv(&records)?;
    tracing::debug!("exported {} expenses", records.len());

    Ok(csv_attachment(&dated_file_name("expenses", today, "csv"), csv))
}

/// Download a CSV file showing the columns that imports expect.
pub async fn get_import_template() -> Result<Response, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(CSV_HEADERS).map_err(csv_write_error)?;
    for row in TEMPLATE_ROWS {
        writer.write_record(row).map_err(csv_write_error)?;
    }

    let csv = writer
        .into_inner()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?;

    Ok(csv_attachment(TEMPLATE_FILE_NAME, csv))
}

/// Write `records` as CSV with the [CSV_HEADERS] and [HAS_RECEIPT_HEADER] columns.
pub fn write_expenses_csv(records: &[ExpenseRecord]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut headers = CSV_HEADERS.to_vec();
    headers.push(HAS_RECEIPT_HEADER);
    writer.write_record(&headers).map_err(csv_write_error)?;

    for record in records {
        let date = record.date.to_string();
        let cost = format!("{:.2}", record.cost);

        writer
            .write_record([
                date.as_str(),
                &record.title,
                &record.description,
                record.category_name.as_deref().unwrap_or_default(),
                &cost,
                record.payment_method_name.as_deref().unwrap_or_default(),
                &record.location,
                &record.vendor,
                &record.notes,
                &record.tags,
                if record.has_receipt { "Yes" } else { "No" },
            ])
            .map_err(csv_write_error)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::InvalidCSV(error.to_string()))
}

fn csv_write_error(error: csv::Error) -> Error {
    tracing::error!("Could not write CSV: {error}");
    Error::InvalidCSV(error.to_string())
}

fn csv_attachment(file_name: &str, data: Vec<u8>) -> Response {
    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        data,
    )
        .into_response()
}
