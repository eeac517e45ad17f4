//! Identifier validation for schema-scoped queries.
//!
//! A datasource id is only ever interpolated into SQL as a quoted identifier,
//! and only after it has been matched against the catalog as a bound
//! parameter. [`ValidatedSchema`] can only be built by
//! [`validate_datasource`], so query text cannot be assembled from an
//! unchecked string.

use std::fmt;

use tokio_postgres::Client;
use tracing::debug;
use tsm_query::{QueryError, Result, ThingId, SENTINEL_TABLE};

use crate::describe_pg_error;

const DATASOURCE_EXISTS: &str = r#"
    SELECT t.schemaname
    FROM pg_tables t
    WHERE t.tablename = $1 AND t.schemaname = $2
"#;

/// A schema name proven to exist and to contain the sentinel table
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ValidatedSchema {
    name: String,
}

impl ValidatedSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema-qualified, quoted table reference, e.g. `"influx_1"."thing"`
    pub fn table(&self, table: &str) -> String {
        format!("{}.{}", quote_identifier(&self.name), quote_identifier(table))
    }
}

impl fmt::Display for ValidatedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A thing proven to exist within its validated schema
#[derive(Debug, Clone)]
pub struct ValidatedThing {
    schema: ValidatedSchema,
    thing_id: ThingId,
}

impl ValidatedThing {
    pub fn schema(&self) -> &ValidatedSchema {
        &self.schema
    }

    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }
}

/// A datastream id accepted under a validated thing
#[derive(Debug, Clone)]
pub struct ValidatedDatastream {
    thing: ValidatedThing,
    datastream_id: String,
}

impl ValidatedDatastream {
    pub fn thing(&self) -> &ValidatedThing {
        &self.thing
    }

    pub fn datastream_id(&self) -> &str {
        &self.datastream_id
    }
}

#[cfg(test)]
impl ValidatedSchema {
    pub(crate) fn trusted(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
impl ValidatedThing {
    pub(crate) fn trusted(schema: ValidatedSchema, thing_id: ThingId) -> Self {
        Self { schema, thing_id }
    }
}

/// Longest identifier PostgreSQL stores (NAMEDATALEN - 1 bytes)
const MAX_IDENTIFIER_BYTES: usize = 63;

/// Whether `raw` is something the catalog could hold as a schema name.
///
/// The server rejects longer or NUL-bearing values bound as `name` with an
/// error, so these are answered locally instead.
fn could_name_schema(raw: &str) -> bool {
    !raw.is_empty() && raw.len() <= MAX_IDENTIFIER_BYTES && !raw.contains('\0')
}

/// Quote an identifier for interpolation, doubling embedded quotes
fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Confirm `datasource_id` names a schema holding the sentinel table
pub async fn validate_datasource(client: &Client, datasource_id: &str) -> Result<ValidatedSchema> {
    if !could_name_schema(datasource_id) {
        debug!("Datasource id cannot name a schema, treating as not found");
        return Err(QueryError::datasource_not_found(datasource_id));
    }

    let rows = client
        .query(DATASOURCE_EXISTS, &[&SENTINEL_TABLE, &datasource_id])
        .await
        .map_err(|e| QueryError::QueryFailed(describe_pg_error(&e)))?;

    if rows.is_empty() {
        debug!("Datasource '{}' not found", datasource_id);
        return Err(QueryError::datasource_not_found(datasource_id));
    }

    Ok(ValidatedSchema {
        name: datasource_id.to_string(),
    })
}

/// Confirm `thing_id` is a UUID present in the schema's thing table
///
/// The UUID syntax check happens before the schema-qualified lookup runs.
pub async fn validate_thing(
    client: &Client,
    schema: ValidatedSchema,
    thing_id: &str,
) -> Result<ValidatedThing> {
    let thing_id = ThingId::parse(thing_id)?;

    let sql = format!(
        "SELECT uuid FROM {} WHERE uuid = $1",
        schema.table(SENTINEL_TABLE)
    );
    let rows = client
        .query(&sql, &[thing_id.as_uuid()])
        .await
        .map_err(|e| QueryError::QueryFailed(describe_pg_error(&e)))?;

    if rows.is_empty() {
        debug!("Thing '{}' not found in datasource '{}'", thing_id, schema);
        return Err(QueryError::thing_not_found(thing_id.to_string()));
    }

    Ok(ValidatedThing { schema, thing_id })
}

/// Datastream ids are not checked against the store; every id is accepted.
pub fn validate_datastream(thing: ValidatedThing, datastream_id: &str) -> ValidatedDatastream {
    ValidatedDatastream {
        thing,
        datastream_id: datastream_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(name: &str) -> ValidatedSchema {
        ValidatedSchema::trusted(name)
    }

    #[test]
    fn test_table_reference_is_quoted() {
        assert_eq!(schema("influx_1").table("thing"), r#""influx_1"."thing""#);
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        assert_eq!(
            schema(r#"odd"name"#).table("datastream"),
            r#""odd""name"."datastream""#
        );
    }

    #[test]
    fn test_mixed_case_schema_is_preserved() {
        assert_eq!(
            schema("timescaleDB__db01").table("observation"),
            r#""timescaleDB__db01"."observation""#
        );
    }

    #[test]
    fn test_catalog_name_limits() {
        assert!(could_name_schema("influx_1"));
        assert!(could_name_schema(&"x".repeat(63)));
        // Multi-byte characters count by bytes
        assert!(could_name_schema(&"ä".repeat(31)));
        assert!(!could_name_schema(&"ä".repeat(32)));

        assert!(!could_name_schema(""));
        assert!(!could_name_schema(&"x".repeat(64)));
        assert!(!could_name_schema("a\0b"));
    }

    #[test]
    fn test_datastream_validation_is_pass_through() {
        let thing = ValidatedThing::trusted(
            schema("influx_1"),
            ThingId::parse("057d8bba-40b3-11ec-a337-125e5a40a845").unwrap(),
        );

        let datastream = validate_datastream(thing, "anything at all");
        assert_eq!(datastream.datastream_id(), "anything at all");
        assert_eq!(datastream.thing().schema().name(), "influx_1");
    }
}
