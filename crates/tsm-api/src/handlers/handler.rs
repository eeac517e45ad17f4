//! HTTP handlers for the four listing endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::debug;
use tsm_query::{Datasource, Datastream, Observation, Thing};
use utoipa::OpenApi;

use super::extract::Segments;
use super::segment::{expect_collection, parse_segment, DATASOURCES, DATASTREAMS, OBSERVATIONS, THINGS};
use super::types::*;
use crate::error::resource_not_found;
use crate::problemdetails::{Problem, ProblemDetails};

/// OpenAPI documentation for the mapping endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_datasources,
        list_things,
        list_datastreams,
        list_observations,
        health,
    ),
    components(
        schemas(
            Datasource,
            Thing,
            Datastream,
            Observation,
            DatasourceList,
            ThingList,
            DatastreamList,
            ObservationList,
            HealthResponse,
            ProblemDetails,
        )
    ),
    tags(
        (name = "Mapping", description = "Read-only datasource hierarchy"),
        (name = "Health", description = "Service liveness")
    )
)]
pub struct ApiDoc;

/// Configure mapping routes
///
/// Collection segments carry their id inline (`Things(<id>)`), so every
/// level below the root is captured whole and parsed by the handler.
pub fn configure_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health))
        .route("/Datasources", get(list_datasources))
        .route("/{datasource}/{things}", get(list_things))
        .route("/{datasource}/{thing}/{datastreams}", get(list_datastreams))
        .route(
            "/{datasource}/{thing}/{datastream}/{observations}",
            get(list_observations),
        )
}

/// Complete application router with problem-details fallback
pub fn router(state: Arc<ApiState>) -> Router {
    configure_routes()
        .fallback(fallback)
        .with_state(state)
}

async fn fallback() -> Problem {
    resource_not_found()
}

/// Liveness probe
#[utoipa::path(
    tag = "Health",
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// List all datasources
#[utoipa::path(
    tag = "Mapping",
    get,
    path = "/Datasources",
    responses(
        (status = 200, description = "Datasources of the store", body = DatasourceList),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn list_datasources(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, Problem> {
    let value = state.resolver.list_datasources().await?;

    Ok(Json(DatasourceList { value }))
}

/// List the things of a datasource
#[utoipa::path(
    tag = "Mapping",
    get,
    path = "/Datasources({datasource_id})/Things",
    params(
        ("datasource_id" = String, Path, description = "Datasource (schema) name")
    ),
    responses(
        (status = 200, description = "Things of the datasource", body = ThingList),
        (status = 404, description = "Datasource not found", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn list_things(
    State(state): State<Arc<ApiState>>,
    Segments((datasource, things)): Segments<(String, String)>,
) -> Result<impl IntoResponse, Problem> {
    let datasource_id = parse_segment(&datasource, DATASOURCES)?;
    expect_collection(&things, THINGS)?;

    debug!("Listing things of datasource '{}'", datasource_id);
    let value = state.resolver.list_things(datasource_id).await?;

    Ok(Json(ThingList { value }))
}

/// List the datastreams of a thing
#[utoipa::path(
    tag = "Mapping",
    get,
    path = "/Datasources({datasource_id})/Things({thing_id})/Datastreams",
    params(
        ("datasource_id" = String, Path, description = "Datasource (schema) name"),
        ("thing_id" = String, Path, description = "Thing UUID")
    ),
    responses(
        (status = 200, description = "Datastreams of the thing", body = DatastreamList),
        (status = 404, description = "Datasource or thing not found", body = ProblemDetails),
        (status = 406, description = "Thing id is not a UUID", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn list_datastreams(
    State(state): State<Arc<ApiState>>,
    Segments((datasource, thing, datastreams)): Segments<(String, String, String)>,
) -> Result<impl IntoResponse, Problem> {
    let datasource_id = parse_segment(&datasource, DATASOURCES)?;
    let thing_id = parse_segment(&thing, THINGS)?;
    expect_collection(&datastreams, DATASTREAMS)?;

    debug!(
        "Listing datastreams of thing '{}' in datasource '{}'",
        thing_id, datasource_id
    );
    let value = state
        .resolver
        .list_datastreams(datasource_id, thing_id)
        .await?;

    Ok(Json(DatastreamList { value }))
}

/// List the observations of a datastream
#[utoipa::path(
    tag = "Mapping",
    get,
    path = "/Datasources({datasource_id})/Things({thing_id})/Datastreams({datastream_id})/Observations",
    params(
        ("datasource_id" = String, Path, description = "Datasource (schema) name"),
        ("thing_id" = String, Path, description = "Thing UUID"),
        ("datastream_id" = String, Path, description = "Datastream id")
    ),
    responses(
        (status = 200, description = "Observations of the datastream", body = ObservationList),
        (status = 404, description = "Datasource, thing or datastream not found", body = ProblemDetails),
        (status = 406, description = "Thing id is not a UUID", body = ProblemDetails),
        (status = 501, description = "Backend does not serve observations", body = ProblemDetails),
        (status = 500, description = "Internal server error", body = ProblemDetails)
    )
)]
pub async fn list_observations(
    State(state): State<Arc<ApiState>>,
    Segments((datasource, thing, datastream, observations)): Segments<(String, String, String, String)>,
) -> Result<impl IntoResponse, Problem> {
    let datasource_id = parse_segment(&datasource, DATASOURCES)?;
    let thing_id = parse_segment(&thing, THINGS)?;
    let datastream_id = parse_segment(&datastream, DATASTREAMS)?;
    expect_collection(&observations, OBSERVATIONS)?;

    let value = state
        .resolver
        .list_observations(datasource_id, thing_id, datastream_id)
        .await?;

    Ok(Json(ObservationList { value }))
}
