use crate::error::Result;
use crate::types::*;
use async_trait::async_trait;

/// Read operations over the datasource → thing → datastream → observation
/// hierarchy.
///
/// Every operation validates its path identifiers left to right and stops at
/// the first one that fails. Implementations differ only in where the data
/// lives.
#[async_trait]
pub trait ResourceResolver: Send + Sync {
    /// Short name of the backend ("postgres", "fixture")
    fn backend_type(&self) -> &'static str;

    /// List every datasource
    async fn list_datasources(&self) -> Result<Vec<Datasource>>;

    /// List the things of a datasource
    async fn list_things(&self, datasource_id: &str) -> Result<Vec<Thing>>;

    /// List the datastreams of a thing in the backend's datastream order
    async fn list_datastreams(&self, datasource_id: &str, thing_id: &str)
        -> Result<Vec<Datastream>>;

    /// List the observations of a datastream
    async fn list_observations(
        &self,
        datasource_id: &str,
        thing_id: &str,
        datastream_id: &str,
    ) -> Result<Vec<Observation>>;

    /// Release backend resources
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
