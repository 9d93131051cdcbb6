//! An expense tracker web app for recording, filtering and reporting on
//! personal or business expenses.
//!
//! This library provides a REST API that directly serves HTML pages, plus
//! JSON, CSV and printable report downloads.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod aggregate;
mod alert;
mod app_state;
mod cache;
mod category;
mod csv_export;
mod csv_import;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error;
mod expense;
mod filter;
mod html;
mod internal_server_error;
mod logging;
mod name;
mod navigation;
mod not_found;
mod payment_method;
mod report;
mod routing;
mod settings;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use cache::DEFAULT_TTL as DEFAULT_CACHE_TTL;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::{MAX_UPLOAD_BYTES, build_router};
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
