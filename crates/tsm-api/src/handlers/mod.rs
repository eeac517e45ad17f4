//! HTTP handlers for the mapping hierarchy

mod extract;
mod handler;
mod segment;
mod types;

pub use extract::Segments;
pub use handler::*;
pub use segment::*;
pub use types::*;
