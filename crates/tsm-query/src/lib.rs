//! # tsm-query
//!
//! Core abstractions for the TSM mapping API.
//!
//! The API exposes a read-only hierarchy per tenant:
//!
//! - **Datasource**: one tenant schema in the shared store
//! - **Thing**: a station or measurement configuration, addressed by UUID
//! - **Datastream**: a measurement series of a thing
//! - **Observation**: one timestamped value of a datastream
//!
//! Backends implement [`ResourceResolver`]. This crate ships the in-memory
//! [`FixtureResolver`]; the PostgreSQL implementation lives in
//! `tsm-query-postgres`.
//!
//! ## Example
//!
//! ```rust
//! use tsm_query::{FixtureResolver, ResourceResolver};
//!
//! # async fn example() -> tsm_query::Result<()> {
//! let resolver = FixtureResolver::default();
//! let datasources = resolver.list_datasources().await?;
//! assert!(!datasources.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fixture;
pub mod identifier;
pub mod traits;
pub mod types;

pub use error::{QueryError, Result};
pub use fixture::{FixtureResolver, FixtureStore};
pub use identifier::{ThingId, SENTINEL_TABLE};
pub use traits::ResourceResolver;
pub use types::{Datasource, Datastream, Observation, Properties, Thing};
