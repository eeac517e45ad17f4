//! HTTP surface of the TSM mapping API
//!
//! Routes `Datasources(<id>)/Things(<id>)/Datastreams(<id>)/Observations`
//! paths onto a [`tsm_query::ResourceResolver`] and renders failures as
//! RFC 7807 problem details.

pub mod error;
pub mod handlers;
pub mod problemdetails;

pub use error::{resource_not_found, PathError};
pub use handlers::{configure_routes, router, ApiDoc, ApiState};
pub use problemdetails::{Problem, ProblemDetails};
