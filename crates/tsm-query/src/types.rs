use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Free-form properties bag attached to every resource
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A tenant's isolated schema within the shared store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Datasource {
    #[serde(rename = "@iot.id")]
    #[schema(example = "influx_1")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub properties: Properties,
}

impl Datasource {
    /// A datasource is identified and named by its schema
    pub fn from_schema(schema_name: impl Into<String>) -> Self {
        let name = schema_name.into();
        Self {
            id: name.clone(),
            name,
            description: None,
            properties: Properties::new(),
        }
    }
}

/// A physical station or measurement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Thing {
    #[serde(rename = "@iot.id")]
    #[schema(example = "057d8bba-40b3-11ec-a337-125e5a40a845")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub properties: Properties,
}

/// A named measurement series belonging to a thing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Datastream {
    #[serde(rename = "@iot.id")]
    #[schema(example = "5")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Object)]
    pub properties: Properties,
}

/// One timestamped measurement within a datastream
///
/// The id is an ordinal assigned within a single response and is not stable
/// across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Observation {
    #[serde(rename = "@iot.id")]
    #[schema(example = "1")]
    pub id: String,
    #[serde(rename = "resultTime")]
    #[schema(value_type = String, format = DateTime, example = "2022-01-01T00:00:00")]
    pub result_time: NaiveDateTime,
    pub result: f64,
}
