//! Implements a struct that holds the state of the REST server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{Error, aggregate::AggregateResult, cache::ResultCache, db::initialize};

/// The cache of aggregates shared by every request handler.
pub type SharedResultCache = Arc<Mutex<ResultCache<AggregateResult>>>;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// Aggregates computed for the dashboard, cleared when expenses or
    /// reference data change.
    pub result_cache: SharedResultCache,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the
    /// domain models and the default categories and payment methods.
    /// `local_timezone` should be a valid, canonical timezone name, e.g.
    /// "Pacific/Auckland". Cached results are reused for `cache_ttl`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        cache_ttl: Duration,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            local_timezone: local_timezone.to_owned(),
            result_cache: Arc::new(Mutex::new(ResultCache::new(cache_ttl))),
        })
    }
}
