//! Reads expenses from CSV files in the export format.
//!
//! Columns are matched by header name, so files may omit columns or contain
//! extra ones (e.g. "Has Receipt" from an export).

use std::collections::HashMap;

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    category::{Category, CategoryId},
    expense::{ExpenseBuilder, parse_cost},
    payment_method::{PaymentMethod, PaymentMethodId},
};

/// The title given to imported rows without one.
pub const IMPORTED_TITLE: &str = "Imported Expense";

const DATE_FORMATS: [&[BorrowedFormatItem]; 10] = [
    format_description!("[year]-[month]-[day]"),
    format_description!("[year]/[month]/[day]"),
    format_description!("[month]/[day]/[year]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
    format_description!("[month]-[day]-[year]"),
    format_description!("[day].[month].[year]"),
    format_description!("[month repr:long] [day padding:none], [year]"),
    format_description!("[month repr:short] [day padding:none], [year]"),
    format_description!("[day padding:none] [month repr:long] [year]"),
    format_description!("[day padding:none] [month repr:short] [year]"),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImportRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Cost")]
    cost: String,
    #[serde(rename = "Payment Method")]
    payment_method: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Vendor")]
    vendor: String,
    #[serde(rename = "Notes")]
    notes: String,
    #[serde(rename = "Tags")]
    tags: String,
}

/// Maps category and payment method names to their IDs.
///
/// Names are compared case-insensitively.
#[derive(Debug, Default)]
pub struct NameLookup {
    categories: HashMap<String, CategoryId>,
    payment_methods: HashMap<String, PaymentMethodId>,
}

impl NameLookup {
    pub fn new(categories: &[Category], payment_methods: &[PaymentMethod]) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|category| (normalize(category.name.as_ref()), category.id))
                .collect(),
            payment_methods: payment_methods
                .iter()
                .map(|payment_method| (normalize(payment_method.name.as_ref()), payment_method.id))
                .collect(),
        }
    }

    fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.categories.get(&normalize(name)).copied()
    }

    fn payment_method_id(&self, name: &str) -> Option<PaymentMethodId> {
        self.payment_methods.get(&normalize(name)).copied()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse every row of `text` into an expense ready to be created.
///
/// Unknown category or payment method names leave the expense unlinked and
/// dates that cannot be read become `today`.
///
/// # Errors
/// Returns an [Error::InvalidCSV] if the file has no header row, a row is
/// malformed, or a cost is not a non-negative number. No rows are returned
/// when any row is invalid.
pub fn parse_expenses_csv(
    text: &str,
    lookup: &NameLookup,
    today: Date,
) -> Result<Vec<ExpenseBuilder>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let has_headers = reader
        .headers()
        .map(|headers| headers.iter().any(|header| !header.is_empty()))
        .map_err(|error| Error::InvalidCSV(error.to_string()))?;

    if !has_headers {
        return Err(Error::InvalidCSV("The file has no header row.".to_owned()));
    }

    let mut builders = Vec::new();

    for (index, row) in reader.deserialize::<ImportRow>().enumerate() {
        // Row 1 is the header.
        let line = index + 2;
        let row = row.map_err(|error| Error::InvalidCSV(format!("Row {line}: {error}")))?;

        let cost = parse_cost(&row.cost)
            .map_err(|error| Error::InvalidCSV(format!("Row {line}: {error}")))?;

        let title = if row.title.is_empty() {
            IMPORTED_TITLE.to_owned()
        } else {
            row.title
        };

        builders.push(ExpenseBuilder {
            title,
            description: row.description,
            cost,
            date: parse_import_date(&row.date).unwrap_or(today),
            category_id: lookup.category_id(&row.category),
            payment_method_id: lookup.payment_method_id(&row.payment_method),
            location: row.location,
            vendor: row.vendor,
            notes: row.notes,
            tags: row.tags,
            ..ExpenseBuilder::default()
        });
    }

    Ok(builders)
}

/// Read a date written in one of the common formats, ignoring any time of day.
pub fn parse_import_date(text: &str) -> Option<Date> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let date_part = text
        .split_once(['T', ' '])
        .map(|(date, _)| date)
        .filter(|date| date.contains(['-', '/']));

    [Some(text), date_part]
        .into_iter()
        .flatten()
        .find_map(|candidate| {
            DATE_FORMATS
                .iter()
                .find_map(|format| Date::parse(candidate, *format).ok())
        })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error, category::get_all_categories,
        payment_method::get_all_payment_methods,
        test_utils::must_open_db,
    };

    use super::{IMPORTED_TITLE, NameLookup, parse_expenses_csv, parse_import_date};

    const TODAY: time::Date = date!(2024 - 03 - 01);

    fn lookup() -> NameLookup {
        let connection = must_open_db();

        NameLookup::new(
            &get_all_categories(&connection).unwrap(),
            &get_all_payment_methods(&connection).unwrap(),
        )
    }

    #[test]
    fn reads_columns_by_header_name() {
        let text = "Cost,Title,Date,Category,Payment Method,Vendor,Tags\n\
            299.99,Moving Truck Rental,2024-01-15,Moving,Cash,U-Haul,\"moving,transport\"";

        let builders = parse_expenses_csv(text, &lookup(), TODAY).unwrap();

        assert_eq!(builders.len(), 1);
        let got = &builders[0];
        assert_eq!(got.title, "Moving Truck Rental");
        assert_eq!(got.cost, 299.99);
        assert_eq!(got.date, date!(2024 - 01 - 15));
        assert_eq!(got.category_id, Some(1));
        assert_eq!(got.payment_method_id, Some(1));
        assert_eq!(got.vendor, "U-Haul");
        assert_eq!(got.tags, "moving,transport");
        assert_eq!(got.description, "");
    }

    #[test]
    fn fills_in_missing_values() {
        let text = "Date,Title,Cost,Category,Payment Method\n\
            not a date,,,Space Travel,Barter";

        let builders = parse_expenses_csv(text, &lookup(), TODAY).unwrap();

        let got = &builders[0];
        assert_eq!(got.title, IMPORTED_TITLE);
        assert_eq!(got.cost, 0.0);
        assert_eq!(got.date, TODAY);
        assert_eq!(got.category_id, None);
        assert_eq!(got.payment_method_id, None);
    }

    #[test]
    fn matches_names_ignoring_case() {
        let text = "Title,Category,Payment Method\nLunch, food ,credit card";

        let builders = parse_expenses_csv(text, &lookup(), TODAY).unwrap();

        assert_eq!(builders[0].category_id, Some(7));
        assert_eq!(builders[0].payment_method_id, Some(2));
    }

    #[test]
    fn ignores_extra_columns() {
        let text = "Date,Title,Cost,Has Receipt\n2024-01-15,Hotel Stay,125.00,Yes";

        let builders = parse_expenses_csv(text, &lookup(), TODAY).unwrap();

        assert_eq!(builders.len(), 1);
        assert_eq!(builders[0].title, "Hotel Stay");
    }

    #[test]
    fn rejects_non_numeric_cost() {
        let text = "Title,Cost\nFine,12.00\nBroken,twelve";

        let result = parse_expenses_csv(text, &lookup(), TODAY);

        match result {
            Err(Error::InvalidCSV(reason)) => {
                assert!(reason.starts_with("Row 3:"), "got {reason}")
            }
            other => panic!("want InvalidCSV, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_file() {
        let result = parse_expenses_csv("", &lookup(), TODAY);

        assert!(matches!(result, Err(Error::InvalidCSV(_))));
    }

    #[test]
    fn header_only_file_has_no_expenses() {
        let builders = parse_expenses_csv("Date,Title,Cost\n", &lookup(), TODAY).unwrap();

        assert!(builders.is_empty());
    }

    #[test]
    fn parses_common_date_formats() {
        let want = date!(2024 - 01 - 05);

        for text in [
            "2024-01-05",
            "2024/01/05",
            "01/05/2024",
            "1/5/2024",
            "01-05-2024",
            "05.01.2024",
            "January 5, 2024",
            "Jan 5, 2024",
            "5 January 2024",
            "2024-01-05 13:45:00",
            "2024-01-05T13:45:00",
        ] {
            assert_eq!(parse_import_date(text), Some(want), "could not parse {text:?}");
        }
    }

    #[test]
    fn unreadable_dates_are_none() {
        for text in ["", "yesterday", "2024-13-45"] {
            assert_eq!(parse_import_date(text), None, "parsed {text:?}");
        }
    }
}
