//! Response types for the mapping handlers

use std::sync::Arc;

use serde::Serialize;
use tsm_query::{Datasource, Datastream, Observation, ResourceResolver, Thing};
use utoipa::ToSchema;

/// Application state shared by the handlers
pub struct ApiState {
    pub resolver: Arc<dyn ResourceResolver>,
}

impl ApiState {
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self { resolver }
    }
}

/// All datasources of the store
#[derive(Debug, Serialize, ToSchema)]
pub struct DatasourceList {
    pub value: Vec<Datasource>,
}

/// Things of one datasource
#[derive(Debug, Serialize, ToSchema)]
pub struct ThingList {
    pub value: Vec<Thing>,
}

/// Datastreams of one thing
#[derive(Debug, Serialize, ToSchema)]
pub struct DatastreamList {
    pub value: Vec<Datastream>,
}

/// Observations of one datastream
#[derive(Debug, Serialize, ToSchema)]
pub struct ObservationList {
    pub value: Vec<Observation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}
