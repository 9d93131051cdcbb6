//! Serves the receipt stored with an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    expense::{
        core::get_receipt,
        multipart::{content_type_for_extension, receipt_extension},
    },
};

const DEFAULT_RECEIPT_CONTENT_TYPE: &str = "image/jpeg";

/// The state needed to serve receipts.
#[derive(Debug, Clone)]
pub struct ReceiptState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReceiptState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the receipt for an expense inline.
///
/// The content type follows the receipt's file extension, never a type sent by
/// the uploader.
///
/// Responds with the 404 page if the expense does not exist or has no receipt.
pub async fn get_receipt_page(
    State(state): State<ReceiptState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let receipt = get_receipt(expense_id, &connection)?.ok_or(Error::NotFound)?;
    let disposition = format!(
        "inline; filename=\"{}\"",
        receipt.file_name.replace('"', "")
    );

    let content_type = receipt_extension(&receipt.file_name)
        .map(|extension| content_type_for_extension(&extension))
        .unwrap_or(DEFAULT_RECEIPT_CONTENT_TYPE);

    Ok((
        [
            (CONTENT_TYPE, content_type.to_owned()),
            (X_CONTENT_TYPE_OPTIONS, "nosniff".to_owned()),
            (CONTENT_DISPOSITION, disposition),
        ],
        receipt.data,
    )
        .into_response())
}
