//! Defines the core data models and database queries for expenses.

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::{CategoryId, get_category},
    database_id::ExpenseId,
    payment_method::PaymentMethodId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Where a reimbursable expense is in the reimbursement process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReimbursementStatus {
    /// The expense is not being reimbursed.
    #[default]
    #[serde(rename = "none")]
    NotApplicable,
    /// A claim has been submitted.
    Pending,
    /// The claim has been approved but not paid.
    Approved,
    /// The money has been received.
    Received,
}

impl ReimbursementStatus {
    pub const ALL: [ReimbursementStatus; 4] = [
        ReimbursementStatus::NotApplicable,
        ReimbursementStatus::Pending,
        ReimbursementStatus::Approved,
        ReimbursementStatus::Received,
    ];

    /// The value stored in the database and used in forms and query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            ReimbursementStatus::NotApplicable => "none",
            ReimbursementStatus::Pending => "pending",
            ReimbursementStatus::Approved => "approved",
            ReimbursementStatus::Received => "received",
        }
    }

    /// Parse the stored form of a status, returning `None` for unknown text.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "none" | "" => Some(ReimbursementStatus::NotApplicable),
            "pending" => Some(ReimbursementStatus::Pending),
            "approved" => Some(ReimbursementStatus::Approved),
            "received" => Some(ReimbursementStatus::Received),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReimbursementStatus::NotApplicable => "Not applicable",
            ReimbursementStatus::Pending => "Pending",
            ReimbursementStatus::Approved => "Approved",
            ReimbursementStatus::Received => "Received",
        }
    }
}

impl ToSql for ReimbursementStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ReimbursementStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        ReimbursementStatus::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown reimbursement status {text}").into()))
    }
}

/// An uploaded receipt image or document.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Money spent on something, e.g. a moving truck rental or a hotel stay.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub title: String,
    pub description: String,
    /// The amount of money spent, never negative.
    pub cost: f64,
    /// When the money was spent.
    pub date: Date,
    pub category_id: Option<CategoryId>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub location: String,
    pub vendor: String,
    pub notes: String,
    /// Comma separated free text tags.
    pub tags: String,
    pub is_reimbursable: bool,
    pub reimbursement_status: ReimbursementStatus,
    pub reimbursement_notes: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(cost: f64, date: Date, title: &str) -> ExpenseBuilder {
        ExpenseBuilder {
            title: title.to_owned(),
            cost,
            date,
            ..ExpenseBuilder::default()
        }
    }
}

/// A builder for creating or updating [Expense]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    pub title: String,
    pub description: String,
    pub cost: f64,
    pub date: Date,
    pub category_id: Option<CategoryId>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub location: String,
    pub vendor: String,
    pub notes: String,
    pub tags: String,
    pub is_reimbursable: bool,
    pub reimbursement_status: ReimbursementStatus,
    pub reimbursement_notes: String,
    /// A new receipt to store with the expense. `None` keeps any existing receipt.
    pub receipt: Option<Receipt>,
}

impl Default for ExpenseBuilder {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            description: String::new(),
            cost: 0.0,
            date: OffsetDateTime::now_utc().date(),
            category_id: None,
            payment_method_id: None,
            location: String::new(),
            vendor: String::new(),
            notes: String::new(),
            tags: String::new(),
            is_reimbursable: false,
            reimbursement_status: ReimbursementStatus::NotApplicable,
            reimbursement_notes: String::new(),
            receipt: None,
        }
    }
}

/// The title given to expenses created without one.
pub const DEFAULT_TITLE: &str = "Untitled Expense";

impl ExpenseBuilder {
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn payment_method_id(mut self, payment_method_id: Option<PaymentMethodId>) -> Self {
        self.payment_method_id = payment_method_id;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = location.to_owned();
        self
    }

    pub fn vendor(mut self, vendor: &str) -> Self {
        self.vendor = vendor.to_owned();
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }

    pub fn tags(mut self, tags: &str) -> Self {
        self.tags = tags.to_owned();
        self
    }

    /// Mark the expense as reimbursable with `status`.
    pub fn reimbursable(mut self, status: ReimbursementStatus) -> Self {
        self.is_reimbursable = true;
        self.reimbursement_status = status;
        self
    }

    pub fn receipt(mut self, receipt: Option<Receipt>) -> Self {
        self.receipt = receipt;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const EXPENSE_COLUMNS: &str = "id, title, description, cost, date, category_id, \
    payment_method_id, location, vendor, notes, tags, is_reimbursable, \
    reimbursement_status, reimbursement_notes, created_at, updated_at";

fn map_foreign_key_error(
    builder: &ExpenseBuilder,
    error: rusqlite::Error,
    connection: &Connection,
) -> Error {
    match error {
        // Code 787 occurs when a FOREIGN KEY constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
            let category_exists = match builder.category_id {
                Some(category_id) => get_category(category_id, connection).is_ok(),
                None => true,
            };

            if category_exists {
                Error::InvalidPaymentMethod(builder.payment_method_id)
            } else {
                Error::InvalidCategory(builder.category_id)
            }
        }
        error => error.into(),
    }
}

/// Create a new expense in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeCost] if the cost is below zero,
/// - [Error::InvalidCategory] or [Error::InvalidPaymentMethod] if a referenced ID does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    if builder.cost < 0.0 {
        return Err(Error::NegativeCost(builder.cost));
    }

    let now = OffsetDateTime::now_utc();
    let (receipt_data, receipt_file_name, receipt_content_type) = match &builder.receipt {
        Some(receipt) => (
            Some(receipt.data.as_slice()),
            Some(receipt.file_name.as_str()),
            Some(receipt.content_type.as_str()),
        ),
        None => (None, None, None),
    };

    connection
        .prepare(&format!(
            "INSERT INTO expense (title, description, cost, date, category_id, payment_method_id,
                location, vendor, notes, tags, is_reimbursable, reimbursement_status,
                reimbursement_notes, receipt_data, receipt_file_name, receipt_content_type,
                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                builder.title,
                builder.description,
                builder.cost,
                builder.date,
                builder.category_id,
                builder.payment_method_id,
                builder.location,
                builder.vendor,
                builder.notes,
                builder.tags,
                builder.is_reimbursable,
                builder.reimbursement_status,
                builder.reimbursement_notes,
                receipt_data,
                receipt_file_name,
                receipt_content_type,
                now,
            ],
            map_expense_row,
        )
        .map_err(|error| map_foreign_key_error(&builder, error, connection))
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Replace the fields of the expense `id` with those in `builder`.
///
/// The stored receipt is only replaced when `builder` has a receipt.
///
/// # Errors
/// Returns [Error::UpdateMissingExpense] if there is no expense with `id`.
pub fn update_expense(
    id: ExpenseId,
    builder: ExpenseBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    if builder.cost < 0.0 {
        return Err(Error::NegativeCost(builder.cost));
    }

    let now = OffsetDateTime::now_utc();

    let rows_affected = connection
        .execute(
            "UPDATE expense SET title = ?1, description = ?2, cost = ?3, date = ?4,
                category_id = ?5, payment_method_id = ?6, location = ?7, vendor = ?8,
                notes = ?9, tags = ?10, is_reimbursable = ?11, reimbursement_status = ?12,
                reimbursement_notes = ?13, updated_at = ?14
             WHERE id = ?15",
            rusqlite::params![
                builder.title,
                builder.description,
                builder.cost,
                builder.date,
                builder.category_id,
                builder.payment_method_id,
                builder.location,
                builder.vendor,
                builder.notes,
                builder.tags,
                builder.is_reimbursable,
                builder.reimbursement_status,
                builder.reimbursement_notes,
                now,
                id,
            ],
        )
        .map_err(|error| map_foreign_key_error(&builder, error, connection))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    if let Some(receipt) = &builder.receipt {
        connection.execute(
            "UPDATE expense SET receipt_data = ?1, receipt_file_name = ?2,
                receipt_content_type = ?3 WHERE id = ?4",
            (
                receipt.data.as_slice(),
                &receipt.file_name,
                &receipt.content_type,
                id,
            ),
        )?;
    }

    Ok(())
}

/// Delete the expense `id`.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if there is no expense with `id`.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Get the receipt stored with the expense `id`, if any.
///
/// # Errors
/// Returns [Error::NotFound] if there is no expense with `id`.
pub fn get_receipt(id: ExpenseId, connection: &Connection) -> Result<Option<Receipt>, Error> {
    let (data, file_name, content_type): (Option<Vec<u8>>, Option<String>, Option<String>) =
        connection.query_row(
            "SELECT receipt_data, receipt_file_name, receipt_content_type FROM expense WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

    Ok(data.map(|data| Receipt {
        data,
        file_name: file_name.unwrap_or_else(|| "receipt.jpg".to_owned()),
        content_type: content_type
            .filter(|content_type| !content_type.is_empty())
            .unwrap_or_else(|| "image/jpeg".to_owned()),
    }))
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            cost REAL NOT NULL DEFAULT 0 CHECK (cost >= 0),
            date TEXT NOT NULL,
            category_id INTEGER,
            payment_method_id INTEGER,
            location TEXT NOT NULL DEFAULT '',
            vendor TEXT NOT NULL DEFAULT '',
            notes TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT '',
            is_reimbursable INTEGER NOT NULL DEFAULT 0,
            reimbursement_status TEXT NOT NULL DEFAULT 'none',
            reimbursement_notes TEXT NOT NULL DEFAULT '',
            receipt_data BLOB,
            receipt_file_name TEXT,
            receipt_content_type TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(payment_method_id) REFERENCES payment_method(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
///
/// The row must contain the columns in the order of `EXPENSE_COLUMNS`.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        cost: row.get(3)?,
        date: row.get(4)?,
        category_id: row.get(5)?,
        payment_method_id: row.get(6)?,
        location: row.get(7)?,
        vendor: row.get(8)?,
        notes: row.get(9)?,
        tags: row.get(10)?,
        is_reimbursable: row.get(11)?,
        reimbursement_status: row.get(12)?,
        reimbursement_notes: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

#[cfg(test)]
mod reimbursement_status_tests {
    use super::ReimbursementStatus;

    #[test]
    fn parses_stored_values() {
        for status in ReimbursementStatus::ALL {
            assert_eq!(ReimbursementStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_value_is_none() {
        assert_eq!(ReimbursementStatus::parse("maybe"), None);
    }
}

#[cfg(test)]
mod database_tests {
    use time::macros::date;

    use crate::{Error, test_utils::must_open_db};

    use super::{
        Expense, Receipt, ReimbursementStatus, create_expense, delete_expense, get_expense,
        get_receipt, update_expense,
    };

    #[test]
    fn create_then_get_expense() {
        let connection = must_open_db();
        let builder = Expense::build(299.99, date!(2024 - 01 - 15), "Moving Truck Rental")
            .description("U-Haul 26ft truck")
            .category_id(Some(1))
            .payment_method_id(Some(2))
            .vendor("U-Haul")
            .reimbursable(ReimbursementStatus::Pending);

        let created = create_expense(builder, &connection).expect("Could not create expense");

        assert_eq!(created.title, "Moving Truck Rental");
        assert_eq!(created.cost, 299.99);
        assert_eq!(created.reimbursement_status, ReimbursementStatus::Pending);
        assert!(created.is_reimbursable);
        assert_eq!(get_expense(created.id, &connection), Ok(created));
    }

    #[test]
    fn negative_cost_is_rejected() {
        let connection = must_open_db();

        let result = create_expense(Expense::build(-1.0, date!(2024 - 01 - 15), "Refund"), &connection);

        assert_eq!(result, Err(Error::NegativeCost(-1.0)));
    }

    #[test]
    fn invalid_category_is_rejected() {
        let connection = must_open_db();

        let result = create_expense(
            Expense::build(1.0, date!(2024 - 01 - 15), "Coffee").category_id(Some(999)),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidCategory(Some(999))));
    }

    #[test]
    fn update_keeps_receipt_when_none_given() {
        let connection = must_open_db();
        let receipt = Receipt {
            data: vec![1, 2, 3],
            file_name: "receipt.png".to_owned(),
            content_type: "image/png".to_owned(),
        };
        let created = create_expense(
            Expense::build(10.0, date!(2024 - 03 - 01), "Lunch").receipt(Some(receipt.clone())),
            &connection,
        )
        .unwrap();

        update_expense(
            created.id,
            Expense::build(12.5, date!(2024 - 03 - 02), "Dinner"),
            &connection,
        )
        .expect("Could not update expense");

        let updated = get_expense(created.id, &connection).unwrap();
        assert_eq!(updated.title, "Dinner");
        assert_eq!(updated.cost, 12.5);
        assert_eq!(get_receipt(created.id, &connection), Ok(Some(receipt)));
    }

    #[test]
    fn update_missing_expense_fails() {
        let connection = must_open_db();

        let result = update_expense(42, Expense::build(1.0, date!(2024 - 01 - 01), "x"), &connection);

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn delete_expense_removes_it() {
        let connection = must_open_db();
        let created =
            create_expense(Expense::build(1.0, date!(2024 - 01 - 01), "x"), &connection).unwrap();

        delete_expense(created.id, &connection).unwrap();

        assert_eq!(get_expense(created.id, &connection), Err(Error::NotFound));
        assert_eq!(
            delete_expense(created.id, &connection),
            Err(Error::DeleteMissingExpense)
        );
    }

    #[test]
    fn expense_without_receipt_has_none() {
        let connection = must_open_db();
        let created =
            create_expense(Expense::build(1.0, date!(2024 - 01 - 01), "x"), &connection).unwrap();

        assert_eq!(get_receipt(created.id, &connection), Ok(None));
    }
}
