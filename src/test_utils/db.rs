use rusqlite::Connection;

use crate::db::initialize;

/// An in-memory database with the tables created and the default
/// categories, payment methods and settings seeded.
#[track_caller]
pub(crate) fn must_open_db() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}
