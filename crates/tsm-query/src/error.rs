use thiserror::Error;

/// Unified error type for all resolver operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// The datasource is not an existing schema with a thing table
    #[error("Datasource not found: {0}")]
    DatasourceNotFound(String),

    /// The thing does not exist within the validated datasource
    #[error("Thing not found: {0}")]
    ThingNotFound(String),

    /// The datastream does not exist under the validated thing
    #[error("Datastream not found: {0}")]
    DatastreamNotFound(String),

    /// The caller supplied a syntactically invalid identifier
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// Declared, permanent stub
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Connection could not be opened or repaired
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A row could not be shaped into its resource
    #[error("Projection error: {0}")]
    Projection(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl QueryError {
    /// Whether this error stems from the store rather than from caller input
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            QueryError::ConnectionFailed(_)
                | QueryError::QueryFailed(_)
                | QueryError::Projection(_)
                | QueryError::InvalidConfiguration(_)
        )
    }

    pub fn datasource_not_found(datasource_id: impl Into<String>) -> Self {
        QueryError::DatasourceNotFound(datasource_id.into())
    }

    pub fn thing_not_found(thing_id: impl Into<String>) -> Self {
        QueryError::ThingNotFound(thing_id.into())
    }

    pub fn datastream_not_found(datastream_id: impl Into<String>) -> Self {
        QueryError::DatastreamNotFound(datastream_id.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        QueryError::MalformedIdentifier(msg.into())
    }

    pub fn not_implemented(msg: impl Into<String>) -> Self {
        QueryError::NotImplemented(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
