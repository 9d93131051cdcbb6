//! Database operations for payment methods.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    name::Name,
    payment_method::{
        PaymentMethod, PaymentMethodId,
        domain::{DEFAULT_PAYMENT_METHOD_ICON, DEFAULT_PAYMENT_METHODS},
    },
};

/// Create a payment method and return it with its generated ID.
///
/// An empty `icon` is replaced with the default icon.
pub fn create_payment_method(
    name: Name,
    icon: &str,
    is_default: bool,
    connection: &Connection,
) -> Result<PaymentMethod, Error> {
    let icon = match icon.trim() {
        "" => DEFAULT_PAYMENT_METHOD_ICON.to_owned(),
        icon => icon.to_owned(),
    };
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO payment_method (name, icon, is_default, created_at) VALUES (?1, ?2, ?3, ?4);",
        (name.as_ref(), &icon, is_default, created_at),
    )?;

    Ok(PaymentMethod {
        id: connection.last_insert_rowid(),
        name,
        icon,
        is_default,
        created_at,
    })
}

/// Retrieve a single payment method by ID.
pub fn get_payment_method(
    payment_method_id: PaymentMethodId,
    connection: &Connection,
) -> Result<PaymentMethod, Error> {
    connection
        .prepare(
            "SELECT id, name, icon, is_default, created_at FROM payment_method WHERE id = :id;",
        )?
        .query_row(&[(":id", &payment_method_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all payment methods ordered alphabetically by name.
pub fn get_all_payment_methods(connection: &Connection) -> Result<Vec<PaymentMethod>, Error> {
    connection
        .prepare("SELECT id, name, icon, is_default, created_at FROM payment_method ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_payment_method| maybe_payment_method.map_err(|error| error.into()))
        .collect()
}

/// Delete a user created payment method, unlinking it from any expenses.
///
/// # Errors
/// Returns [Error::DeleteProtectedPaymentMethod] for default payment methods
/// and [Error::DeleteMissingPaymentMethod] if it does not exist.
pub fn delete_payment_method(
    payment_method_id: PaymentMethodId,
    connection: &Connection,
) -> Result<(), Error> {
    let payment_method = match get_payment_method(payment_method_id, connection) {
        Ok(payment_method) => payment_method,
        Err(Error::NotFound) => return Err(Error::DeleteMissingPaymentMethod),
        Err(error) => return Err(error),
    };

    if payment_method.is_default {
        return Err(Error::DeleteProtectedPaymentMethod);
    }

    let transaction = connection.unchecked_transaction()?;
    transaction.execute(
        "UPDATE expense SET payment_method_id = NULL WHERE payment_method_id = ?1",
        [payment_method_id],
    )?;
    transaction.execute(
        "DELETE FROM payment_method WHERE id = ?1",
        [payment_method_id],
    )?;
    transaction.commit()?;

    Ok(())
}

/// Insert the default payment methods if there are none yet.
pub fn seed_default_payment_methods(connection: &Connection) -> Result<(), Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM payment_method;", [], |row| {
        row.get(0)
    })?;

    if count > 0 {
        return Ok(());
    }

    for (name, icon) in DEFAULT_PAYMENT_METHODS {
        create_payment_method(Name::new_unchecked(name), icon, true, connection)?;
    }

    tracing::info!(
        "Seeded {} default payment methods",
        DEFAULT_PAYMENT_METHODS.len()
    );

    Ok(())
}

/// Initialize the payment method table.
pub fn create_payment_method_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS payment_method (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            icon TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<PaymentMethod, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(PaymentMethod {
        id: row.get(0)?,
        name: Name::new_unchecked(&raw_name),
        icon: row.get(2)?,
        is_default: row.get(3)?,
        created_at: row.get(4)?,
    })
}
