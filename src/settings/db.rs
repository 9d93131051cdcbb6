//! Stores the settings in a single row table.

use rusqlite::Connection;

use crate::{Error, settings::Settings};

/// Create the settings table and insert the default settings if it is empty.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            color_scheme TEXT NOT NULL DEFAULT 'default',
            default_view TEXT NOT NULL DEFAULT 'list'
        );

        INSERT OR IGNORE INTO settings (id) VALUES (1);",
    )?;

    Ok(())
}

/// Get the saved settings.
pub fn get_settings(connection: &Connection) -> Result<Settings, Error> {
    let settings = connection.query_row(
        "SELECT color_scheme, default_view FROM settings WHERE id = 1",
        [],
        |row| {
            Ok(Settings {
                color_scheme: row.get(0)?,
                default_view: row.get(1)?,
            })
        },
    )?;

    Ok(settings)
}

/// Replace the saved settings.
pub fn save_settings(settings: Settings, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO settings (id, color_scheme, default_view) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET color_scheme = excluded.color_scheme,
            default_view = excluded.default_view",
        (settings.color_scheme, settings.default_view),
    )?;

    Ok(())
}
