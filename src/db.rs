/*! Creates the application's database schema and seeds the default data. */

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    category::{create_category_table, seed_default_categories},
    expense::create_expense_table,
    payment_method::{create_payment_method_table, seed_default_payment_methods},
    settings::create_settings_table,
};

/// Create all the tables for the application and insert the default
/// categories, payment methods and settings if they are missing.
///
/// Foreign key enforcement is switched on for `connection`.
///
/// # Errors
/// Returns an error if a table cannot be created or there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_payment_method_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_settings_table(&transaction)?;

    seed_default_categories(&transaction)?;
    seed_default_payment_methods(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {

    use crate::{
        category::get_all_categories, payment_method::get_all_payment_methods,
        test_utils::must_open_db,
    };

    use super::initialize;

    #[test]
    fn initialize_is_idempotent() {
        let connection = must_open_db();
        initialize(&connection).unwrap();

        assert_eq!(get_all_categories(&connection).unwrap().len(), 10);
        assert_eq!(get_all_payment_methods(&connection).unwrap().len(), 10);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let connection = must_open_db();

        let enabled: bool = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }
}
