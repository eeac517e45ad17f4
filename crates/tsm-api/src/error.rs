//! Error types for the HTTP surface

use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;
use tsm_query::QueryError;

use crate::problemdetails::{self, Problem};

/// Errors raised while routing a request path
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    /// The segment does not name the expected collection
    #[error("Expected collection '{expected}', got '{segment}'")]
    WrongCollection {
        expected: &'static str,
        segment: String,
    },

    /// The segment names the collection but lacks `(id)`
    #[error("Segment '{0}' is missing its identifier")]
    MissingIdentifier(String),
}

impl From<PathError> for Problem {
    fn from(_: PathError) -> Self {
        resource_not_found()
    }
}

/// 404 for any path that does not address a resource
pub fn resource_not_found() -> Problem {
    problemdetails::new(StatusCode::NOT_FOUND)
        .with_title("Not Found")
        .with_detail("Resource not found")
}

impl From<QueryError> for Problem {
    fn from(error: QueryError) -> Self {
        match error {
            QueryError::DatasourceNotFound(_) => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title("Not Found")
                .with_detail("Datasource not found"),

            QueryError::ThingNotFound(_) => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title("Not Found")
                .with_detail("Thing not found"),

            QueryError::DatastreamNotFound(_) => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title("Not Found")
                .with_detail("Datastream not found"),

            QueryError::MalformedIdentifier(msg) => problemdetails::new(StatusCode::NOT_ACCEPTABLE)
                .with_title("Not Acceptable")
                .with_detail(msg),

            QueryError::NotImplemented(msg) => problemdetails::new(StatusCode::NOT_IMPLEMENTED)
                .with_title("Not Implemented")
                .with_detail(msg),

            // Infrastructure failures: the cause stays in the log
            e @ (QueryError::ConnectionFailed(_)
            | QueryError::QueryFailed(_)
            | QueryError::Projection(_)
            | QueryError::InvalidConfiguration(_)) => {
                error!("Request failed: {}", e);
                problemdetails::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_title("Internal Server Error")
                    .with_detail("Internal server error")
            }
        }
    }
}
