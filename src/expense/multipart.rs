//! Parses the multipart form used to create and edit expenses.

use axum::extract::{Multipart, multipart::Field};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    expense::{DEFAULT_TITLE, ExpenseBuilder, Receipt, ReimbursementStatus},
};

/// The file extensions accepted for receipt uploads.
pub const ALLOWED_RECEIPT_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "pdf", "webp"];

const FORM_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Read an expense form from `multipart`.
///
/// Missing values get defaults: the title becomes "Untitled Expense", the cost
/// becomes zero and the date becomes `today`.
///
/// # Errors
/// Returns a:
/// - [Error::MultipartError] if the form cannot be read,
/// - [Error::InvalidCost] if the cost is not a number,
/// - [Error::NegativeCost] if the cost is below zero,
/// - [Error::UnsupportedReceiptType] if the receipt has an unsupported extension.
pub async fn parse_expense_form(
    mut multipart: Multipart,
    today: Date,
) -> Result<ExpenseBuilder, Error> {
    let mut builder = ExpenseBuilder {
        date: today,
        ..ExpenseBuilder::default()
    };

    while let Some(field) = multipart.next_field().await.map_err(|error| {
        tracing::error!("Could not read multipart form field: {error}");
        Error::MultipartError(error.to_string())
    })? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "receipt" {
            builder.receipt = parse_receipt(field).await?;
            continue;
        }

        let value = field.text().await.map_err(|error| {
            tracing::error!("Could not read text from multipart form field {name}: {error}");
            Error::MultipartError(error.to_string())
        })?;
        let value = value.trim();

        match name.as_str() {
            "title" => builder.title = value.to_owned(),
            "description" => builder.description = value.to_owned(),
            "cost" => builder.cost = parse_cost(value)?,
            "date" => builder.date = parse_form_date(value).unwrap_or(today),
            "category_id" => builder.category_id = parse_optional_id(value),
            "payment_method_id" => builder.payment_method_id = parse_optional_id(value),
            "location" => builder.location = value.to_owned(),
            "vendor" => builder.vendor = value.to_owned(),
            "notes" => builder.notes = value.to_owned(),
            "tags" => builder.tags = value.to_owned(),
            "is_reimbursable" => builder.is_reimbursable = matches!(value, "on" | "true" | "1"),
            "reimbursement_status" => {
                builder.reimbursement_status = ReimbursementStatus::parse(value).unwrap_or_default()
            }
            "reimbursement_notes" => builder.reimbursement_notes = value.to_owned(),
            other => tracing::debug!("Ignoring unknown expense form field {other}"),
        }
    }

    if builder.title.is_empty() {
        builder.title = DEFAULT_TITLE.to_owned();
    }

    if !builder.is_reimbursable {
        builder.reimbursement_status = ReimbursementStatus::NotApplicable;
    }

    Ok(builder)
}

/// Parse a cost, treating empty text as zero.
pub fn parse_cost(text: &str) -> Result<f64, Error> {
    let text = text.trim().trim_start_matches('$').replace(',', "");

    if text.is_empty() {
        return Ok(0.0);
    }

    let cost: f64 = text
        .parse()
        .map_err(|_| Error::InvalidCost(text.to_owned()))?;

    if !cost.is_finite() {
        return Err(Error::InvalidCost(text));
    }

    if cost < 0.0 {
        return Err(Error::NegativeCost(cost));
    }

    Ok(cost)
}

fn parse_form_date(text: &str) -> Option<Date> {
    Date::parse(text, FORM_DATE_FORMAT).ok()
}

fn parse_optional_id(text: &str) -> Option<i64> {
    text.parse().ok()
}

async fn parse_receipt(field: Field<'_>) -> Result<Option<Receipt>, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let declared_type = field.content_type().map(str::to_owned);

    let data = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read receipt from multipart form: {error}");
        Error::MultipartError(error.to_string())
    })?;

    if file_name.is_empty() || data.is_empty() {
        return Ok(None);
    }

    let Some(extension) = receipt_extension(&file_name) else {
        tracing::warn!("Rejected receipt with unsupported file type: {file_name}");
        return Err(Error::UnsupportedReceiptType(file_name));
    };

    let content_type = content_type_for_extension(&extension);

    if let Some(declared_type) = declared_type.filter(|declared| declared != content_type) {
        tracing::debug!(
            "Receipt '{file_name}' was sent as {declared_type}, storing it as {content_type}"
        );
    }

    tracing::debug!("Received receipt '{}' that is {} bytes", file_name, data.len());

    Ok(Some(Receipt {
        data: data.to_vec(),
        content_type: content_type.to_owned(),
        file_name,
    }))
}

/// Get the lowercase extension of `file_name` if it is an allowed receipt type.
pub(crate) fn receipt_extension(file_name: &str) -> Option<String> {
    let (_, extension) = file_name.rsplit_once('.')?;
    let extension = extension.to_lowercase();

    ALLOWED_RECEIPT_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// The content type a receipt is stored and served with, decided by its extension alone.
pub(crate) fn content_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
pub(crate) mod test_multipart {
    use axum::{
        extract::{FromRequest, Multipart},
        http::Request,
    };

    const BOUNDARY: &str = "MY_BOUNDARY123456789";

    /// A file part for [must_make_multipart] as (field name, file name, content type, data).
    pub(crate) type FilePart<'a> = (&'a str, &'a str, &'a str, &'a str);

    /// Build a multipart form from text fields and file parts.
    pub(crate) async fn must_make_multipart(
        uri: &str,
        fields: &[(&str, &str)],
        files: &[FilePart<'_>],
    ) -> Multipart {
        let boundary_start = format!("--{BOUNDARY}");
        let mut lines: Vec<String> = Vec::new();

        for (name, value) in fields {
            lines.push(boundary_start.clone());
            lines.push(format!("Content-Disposition: form-data; name=\"{name}\""));
            lines.push(String::new());
            lines.push((*value).to_owned());
        }

        for (name, file_name, content_type, data) in files {
            lines.push(boundary_start.clone());
            lines.push(format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\""
            ));
            lines.push(format!("Content-Type: {content_type}"));
            lines.push(String::new());
            lines.push((*data).to_owned());
        }

        lines.push(format!("--{BOUNDARY}--"));

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(lines.join("\r\n").into_bytes().into())
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }
}
