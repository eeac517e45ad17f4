//! PostgreSQL driver for tsm-query
//!
//! Implements [`tsm_query::ResourceResolver`] over a store where every tenant
//! schema holds `thing`, `datastream` and `observation` tables.

pub mod config;
pub mod guardian;
pub mod projector;
pub mod resolver;
pub mod validator;

pub use config::PostgresConfig;
pub use guardian::{ConnectionGuardian, PooledClient};
pub use resolver::PostgresResolver;
pub use validator::{ValidatedDatastream, ValidatedSchema, ValidatedThing};

/// Render a driver error with the server-side detail fields when present
pub(crate) fn describe_pg_error(e: &tokio_postgres::Error) -> String {
    if let Some(db_error) = e.as_db_error() {
        let mut msg = db_error.message().to_string();

        if let Some(detail) = db_error.detail() {
            msg.push_str(&format!("\nDetail: {}", detail));
        }

        if let Some(hint) = db_error.hint() {
            msg.push_str(&format!("\nHint: {}", hint));
        }

        if let Some(position) = db_error.position() {
            msg.push_str(&format!("\nPosition: {:?}", position));
        }

        msg
    } else {
        // Non-database error (connection error, etc.)
        e.to_string()
    }
}
