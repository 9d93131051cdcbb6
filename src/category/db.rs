//! Database operations for categories.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{
        Category, CategoryId, NewCategory,
        domain::{DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON},
    },
    name::Name,
};

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, color, icon, is_default, created_at FROM category";

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateName] if a category with the same name exists.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    let created_at = OffsetDateTime::now_utc();
    let color = non_empty_or(&category.color, DEFAULT_CATEGORY_COLOR);
    let icon = non_empty_or(&category.icon, DEFAULT_CATEGORY_ICON);

    connection.execute(
        "INSERT INTO category (name, description, color, icon, is_default, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        (
            category.name.as_ref(),
            &category.description,
            &color,
            &icon,
            category.is_default,
            created_at,
        ),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        name: category.name,
        description: category.description,
        color,
        icon,
        is_default: category.is_default,
        created_at,
    })
}

fn non_empty_or(value: &str, default: &str) -> String {
    let value = value.trim();

    if value.is_empty() {
        default.to_owned()
    } else {
        value.to_owned()
    }
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} WHERE id = :id;"))?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY name ASC;"))?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a user created category.
///
/// Expenses in the category become uncategorized.
///
/// # Errors
/// Returns [Error::DeleteProtectedCategory] for default categories and
/// [Error::DeleteMissingCategory] if the category does not exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let category = match get_category(category_id, connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::DeleteMissingCategory),
        Err(error) => return Err(error),
    };

    if category.is_default {
        return Err(Error::DeleteProtectedCategory);
    }

    let transaction = connection.unchecked_transaction()?;
    transaction.execute(
        "UPDATE expense SET category_id = NULL WHERE category_id = ?1",
        [category_id],
    )?;
    transaction.execute("DELETE FROM category WHERE id = ?1", [category_id])?;
    transaction.commit()?;

    Ok(())
}

/// Insert the default categories if there are no categories yet.
pub fn seed_default_categories(connection: &Connection) -> Result<(), Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM category;", [], |row| {
        row.get(0)
    })?;

    if count > 0 {
        return Ok(());
    }

    for (name, icon, color) in DEFAULT_CATEGORIES {
        create_category(
            NewCategory {
                name: Name::new_unchecked(name),
                description: String::new(),
                color: color.to_owned(),
                icon: icon.to_owned(),
                is_default: true,
            },
            connection,
        )?;
    }

    tracing::info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            color TEXT NOT NULL,
            icon TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: row.get(0)?,
        name: Name::new_unchecked(&raw_name),
        description: row.get(2)?,
        color: row.get(3)?,
        icon: row.get(4)?,
        is_default: row.get(5)?,
        created_at: row.get(6)?,
    })
}
