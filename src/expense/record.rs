//! A read-only view of an expense joined with the names of its category and
//! payment method.

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{
    Error, category::CategoryId, database_id::ExpenseId, expense::ReimbursementStatus,
    payment_method::PaymentMethodId,
};

/// An expense with its linked reference entities resolved to display values.
///
/// This is the unit that filtering, aggregation, reports and exports work on.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub title: String,
    pub description: String,
    pub cost: f64,
    pub date: Date,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub payment_method_name: Option<String>,
    pub location: String,
    pub vendor: String,
    pub notes: String,
    pub tags: String,
    pub is_reimbursable: bool,
    pub reimbursement_status: ReimbursementStatus,
    pub has_receipt: bool,
    pub created_at: OffsetDateTime,
}

const RECORD_QUERY: &str = "SELECT e.id, e.title, e.description, e.cost, e.date,
        e.category_id, c.name, c.color, e.payment_method_id, p.name,
        e.location, e.vendor, e.notes, e.tags, e.is_reimbursable,
        e.reimbursement_status, e.receipt_data IS NOT NULL, e.created_at
    FROM expense e
    LEFT JOIN category c ON e.category_id = c.id
    LEFT JOIN payment_method p ON e.payment_method_id = p.id";

/// Get every expense record, newest first.
///
/// Records are ordered by date and then by creation time, both descending.
pub fn get_expense_records(connection: &Connection) -> Result<Vec<ExpenseRecord>, Error> {
    connection
        .prepare(&format!(
            "{RECORD_QUERY} ORDER BY e.date DESC, e.created_at DESC, e.id DESC"
        ))?
        .query_map([], map_record_row)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Get the record for a single expense.
pub fn get_expense_record(id: ExpenseId, connection: &Connection) -> Result<ExpenseRecord, Error> {
    let record = connection
        .prepare(&format!("{RECORD_QUERY} WHERE e.id = :id"))?
        .query_row(&[(":id", &id)], map_record_row)?;

    Ok(record)
}

fn map_record_row(row: &Row) -> Result<ExpenseRecord, rusqlite::Error> {
    Ok(ExpenseRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        cost: row.get(3)?,
        date: row.get(4)?,
        category_id: row.get(5)?,
        category_name: row.get(6)?,
        category_color: row.get(7)?,
        payment_method_id: row.get(8)?,
        payment_method_name: row.get(9)?,
        location: row.get(10)?,
        vendor: row.get(11)?,
        notes: row.get(12)?,
        tags: row.get(13)?,
        is_reimbursable: row.get(14)?,
        reimbursement_status: row.get(15)?,
        has_receipt: row.get(16)?,
        created_at: row.get(17)?,
    })
}
