use async_trait::async_trait;
use tokio_postgres::Client;
use tracing::debug;
use tsm_query::{
    Datasource, Datastream, Observation, QueryError, ResourceResolver, Result, Thing,
    SENTINEL_TABLE,
};

use crate::config::PostgresConfig;
use crate::describe_pg_error;
use crate::guardian::ConnectionGuardian;
use crate::projector::{
    project_datasource, project_datastream, project_thing, row_to_datarow, DataRow,
};
use crate::validator::{
    validate_datasource, validate_datastream, validate_thing, ValidatedSchema, ValidatedThing,
};

const LIST_DATASOURCES: &str = r#"
    SELECT t.schemaname AS id
    FROM pg_tables t
    WHERE t.tablename = $1
    ORDER BY t.schemaname
"#;

/// PostgreSQL resolver: one schema per datasource
pub struct PostgresResolver {
    guardian: ConnectionGuardian,
}

impl PostgresResolver {
    pub fn new(guardian: ConnectionGuardian) -> Self {
        Self { guardian }
    }

    /// Create the pool and verify the store is reachable
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        Ok(Self::new(ConnectionGuardian::connect(config).await?))
    }

    pub fn guardian(&self) -> &ConnectionGuardian {
        &self.guardian
    }

    fn things_query(schema: &ValidatedSchema) -> String {
        format!(
            r#"
            SELECT uuid        AS id,
                   name        AS name,
                   description AS description,
                   properties  AS properties
            FROM {thing}
            "#,
            thing = schema.table(SENTINEL_TABLE)
        )
    }

    fn datastreams_query(thing: &ValidatedThing) -> String {
        let schema = thing.schema();
        format!(
            r#"
            SELECT d.id,
                   d.name,
                   d.description,
                   json_build_object(
                       'column_headers', coalesce(
                           json_agg(DISTINCT o.parameters ->> 'column_header')
                               FILTER (WHERE o.parameters ->> 'column_header' IS NOT NULL),
                           '[]'::json),
                       'position', d.position,
                       'created_at', d.properties ->> 'created_at'
                   ) AS properties
            FROM {thing} t
                     JOIN {datastream} d ON t.id = d.thing_id
                     LEFT JOIN {observation} o ON d.id = o.datastream_id
            WHERE t.uuid = $1
            GROUP BY d.id, d.name, d.description
            ORDER BY d.id
            "#,
            thing = schema.table(SENTINEL_TABLE),
            datastream = schema.table("datastream"),
            observation = schema.table("observation"),
        )
    }

    async fn fetch(
        client: &Client,
        sql: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<DataRow>> {
        let rows = client
            .query(sql, params)
            .await
            .map_err(|e| QueryError::QueryFailed(describe_pg_error(&e)))?;

        Ok(rows.iter().map(row_to_datarow).collect())
    }
}

#[async_trait]
impl ResourceResolver for PostgresResolver {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>> {
        let client = self.guardian.acquire().await?;

        let rows = Self::fetch(&client, LIST_DATASOURCES, &[&SENTINEL_TABLE]).await?;
        let datasources = rows
            .iter()
            .map(project_datasource)
            .collect::<Result<Vec<_>>>()?;

        debug!("Found {} datasources", datasources.len());
        Ok(datasources)
    }

    async fn list_things(&self, datasource_id: &str) -> Result<Vec<Thing>> {
        let client = self.guardian.acquire().await?;
        let schema = validate_datasource(&client, datasource_id).await?;

        let rows = Self::fetch(&client, &Self::things_query(&schema), &[]).await?;
        let things = rows.iter().map(project_thing).collect::<Result<Vec<_>>>()?;

        debug!("Found {} things in datasource '{}'", things.len(), schema);
        Ok(things)
    }

    async fn list_datastreams(
        &self,
        datasource_id: &str,
        thing_id: &str,
    ) -> Result<Vec<Datastream>> {
        let client = self.guardian.acquire().await?;
        let schema = validate_datasource(&client, datasource_id).await?;
        let thing = validate_thing(&client, schema, thing_id).await?;

        let rows = Self::fetch(
            &client,
            &Self::datastreams_query(&thing),
            &[thing.thing_id().as_uuid()],
        )
        .await?;
        let datastreams = rows
            .iter()
            .map(project_datastream)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Found {} datastreams for thing '{}' in datasource '{}'",
            datastreams.len(),
            thing.thing_id(),
            thing.schema()
        );
        Ok(datastreams)
    }

    async fn list_observations(
        &self,
        datasource_id: &str,
        thing_id: &str,
        datastream_id: &str,
    ) -> Result<Vec<Observation>> {
        let client = self.guardian.acquire().await?;
        let schema = validate_datasource(&client, datasource_id).await?;
        let thing = validate_thing(&client, schema, thing_id).await?;
        let datastream = validate_datastream(thing, datastream_id);

        debug!(
            "Observation listing requested for datastream '{}' of thing '{}'",
            datastream.datastream_id(),
            datastream.thing().thing_id()
        );
        Err(QueryError::not_implemented("Not yet implemented"))
    }

    async fn close(&self) -> Result<()> {
        self.guardian.close();
        Ok(())
    }
}
