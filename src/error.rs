//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, category::CategoryId, internal_server_error::InternalServerError,
    not_found::NotFoundError, payment_method::PaymentMethodId,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The category ID used to create an expense did not match a valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<CategoryId>),

    /// The payment method ID used to create an expense did not match a valid
    /// payment method.
    #[error("the payment method ID does not refer to a valid payment method")]
    InvalidPaymentMethod(Option<PaymentMethodId>),

    /// An empty string was used to name a category or payment method.
    #[error("name cannot be empty")]
    EmptyName,

    /// A category or payment method with the same name already exists.
    #[error("the name \"{0}\" is already in use")]
    DuplicateName(String),

    /// An expense was given a negative cost.
    #[error("{0} is a negative cost, which is not allowed")]
    NegativeCost(f64),

    /// The cost could not be parsed as a number.
    #[error("\"{0}\" is not a valid cost")]
    InvalidCost(String),

    /// The uploaded receipt does not have one of the accepted file extensions.
    #[error("the file \"{0}\" is not a supported receipt type")]
    UnsupportedReceiptType(String),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("File is not a CSV")]
    NotCSV,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing a CSV or report document.
    #[error("could not render document: {0}")]
    RenderError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to delete one of the default categories
    #[error("default categories cannot be deleted")]
    DeleteProtectedCategory,

    /// Tried to delete a payment method that does not exist
    #[error("tried to delete a payment method that is not in the database")]
    DeleteMissingPaymentMethod,

    /// Tried to delete one of the default payment methods
    #[error("default payment methods cannot be deleted")]
    DeleteProtectedPaymentMethod,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with(".name") =>
            {
                Error::DuplicateName(desc.to_owned())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: format!("Could not find a category with the ID {category_id:?}"),
                },
            ),
            Error::InvalidPaymentMethod(payment_method_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid payment method".to_owned(),
                    details: format!(
                        "Could not find a payment method with the ID {payment_method_id:?}"
                    ),
                },
            ),
            Error::EmptyName => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Name cannot be empty".to_owned(),
                },
            ),
            Error::DuplicateName(_) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate name".to_owned(),
                    details: "That name is already in use. Choose a different name.".to_owned(),
                },
            ),
            Error::NegativeCost(cost) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid cost".to_owned(),
                    details: format!("{cost} is negative. Enter a cost of zero or more."),
                },
            ),
            Error::InvalidCost(cost) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid cost".to_owned(),
                    details: format!("\"{cost}\" is not a number."),
                },
            ),
            Error::UnsupportedReceiptType(file_name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unsupported receipt file".to_owned(),
                    details: format!(
                        "\"{file_name}\" is not an image or PDF. \
                        Upload a png, jpg, jpeg, gif, pdf or webp file."
                    ),
                },
            ),
            Error::NotCSV => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "File type must be CSV.".to_owned(),
                },
            ),
            Error::InvalidCSV(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Failed to parse CSV".to_owned(),
                    details: reason,
                },
            ),
            Error::MultipartError(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the submitted form".to_owned(),
                    details: reason,
                },
            ),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update expense".to_owned(),
                    details: "The expense could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete expense".to_owned(),
                    details: "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. \
                    Try refreshing the page to see if the category has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteProtectedCategory => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Cannot delete default categories".to_owned(),
                },
            ),
            Error::DeleteMissingPaymentMethod => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete payment method".to_owned(),
                    details: "The payment method could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteProtectedPaymentMethod => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Cannot delete default payment methods".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
