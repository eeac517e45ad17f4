//! In-memory resolver for development and tests.
//!
//! Serves the same hierarchy as the store-backed resolver without a database.
//! Unlike the store-backed path it does return observations, numbering them
//! from 1 within each response.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::error::{QueryError, Result};
use crate::identifier::ThingId;
use crate::traits::ResourceResolver;
use crate::types::{Datasource, Datastream, Observation, Properties, Thing};

#[derive(Debug, Clone)]
struct FixtureDatastream {
    name: String,
    series: Vec<(NaiveDateTime, f64)>,
}

#[derive(Debug, Clone)]
struct FixtureThing {
    id: ThingId,
    name: String,
    datastreams: Vec<FixtureDatastream>,
}

#[derive(Debug, Clone)]
struct FixtureDatasource {
    name: String,
    things: Vec<FixtureThing>,
}

/// Ordered in-memory tree of datasources, things, datastreams and series
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    datasources: Vec<FixtureDatasource>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Development data set with one populated station
    pub fn seeded() -> Self {
        let station = |low: u128, name: &str| FixtureThing {
            id: ThingId::from(Uuid::from_u128(0x6f0a1c4e_9d2b_4b8e_8a51_3c1f2d7e0000 | low)),
            name: name.to_string(),
            datastreams: Vec::new(),
        };
        let empty = |name: &str| FixtureDatasource {
            name: name.to_string(),
            things: Vec::new(),
        };

        let air_temp = FixtureDatastream {
            name: "AirTemp".to_string(),
            series: [(1, 1.0), (2, 2.0)]
                .into_iter()
                .map(|(day, value)| (midnight(2022, 1, day), value))
                .collect(),
        };
        let mut plestlin = station(0x1, "altPlestlin");
        plestlin.datastreams.push(air_temp);
        plestlin.datastreams.extend(
            ["AirHumidity", "LeafWetness", "SoilMosture_0.1m"]
                .into_iter()
                .map(|name| FixtureDatastream {
                    name: name.to_string(),
                    series: Vec::new(),
                }),
        );

        let influxdb_01 = FixtureDatasource {
            name: "influxdb_01".to_string(),
            things: vec![
                plestlin,
                station(0x2, "altTellin"),
                station(0x3, "beestland"),
                station(0x4, "zeitlow-BF1"),
            ],
        };

        Self {
            datasources: vec![
                influxdb_01,
                empty("influxdb_02"),
                empty("influxdb_03"),
                empty("timescaleDB__db01"),
                empty("timescaleDB__db02"),
            ],
        }
    }

    /// Add a datasource; adding an existing one is a no-op
    pub fn add_datasource(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.datasource(&name).is_none() {
            self.datasources.push(FixtureDatasource {
                name,
                things: Vec::new(),
            });
        }
    }

    pub fn add_thing(
        &mut self,
        datasource_id: &str,
        id: ThingId,
        name: impl Into<String>,
    ) -> Result<()> {
        let datasource = self
            .datasource_mut(datasource_id)
            .ok_or_else(|| QueryError::datasource_not_found(datasource_id))?;

        datasource.things.push(FixtureThing {
            id,
            name: name.into(),
            datastreams: Vec::new(),
        });
        Ok(())
    }

    pub fn add_datastream(
        &mut self,
        datasource_id: &str,
        thing_id: &ThingId,
        name: impl Into<String>,
    ) -> Result<()> {
        let thing = self.thing_mut(datasource_id, thing_id)?;
        thing.datastreams.push(FixtureDatastream {
            name: name.into(),
            series: Vec::new(),
        });
        Ok(())
    }

    pub fn add_observation(
        &mut self,
        datasource_id: &str,
        thing_id: &ThingId,
        datastream_id: &str,
        result_time: NaiveDateTime,
        result: f64,
    ) -> Result<()> {
        let thing = self.thing_mut(datasource_id, thing_id)?;
        let datastream = thing
            .datastreams
            .iter_mut()
            .find(|d| d.name == datastream_id)
            .ok_or_else(|| QueryError::datastream_not_found(datastream_id))?;

        datastream.series.push((result_time, result));
        Ok(())
    }

    fn datasource(&self, name: &str) -> Option<&FixtureDatasource> {
        self.datasources.iter().find(|d| d.name == name)
    }

    fn datasource_mut(&mut self, name: &str) -> Option<&mut FixtureDatasource> {
        self.datasources.iter_mut().find(|d| d.name == name)
    }

    fn thing_mut(&mut self, datasource_id: &str, thing_id: &ThingId) -> Result<&mut FixtureThing> {
        self.datasource_mut(datasource_id)
            .ok_or_else(|| QueryError::datasource_not_found(datasource_id))?
            .things
            .iter_mut()
            .find(|t| &t.id == thing_id)
            .ok_or_else(|| QueryError::thing_not_found(thing_id.to_string()))
    }
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Fixture-backed resolver
pub struct FixtureResolver {
    store: FixtureStore,
}

impl FixtureResolver {
    pub fn new(store: FixtureStore) -> Self {
        Self { store }
    }

    fn validate_datasource(&self, datasource_id: &str) -> Result<&FixtureDatasource> {
        self.store
            .datasource(datasource_id)
            .ok_or_else(|| QueryError::datasource_not_found(datasource_id))
    }

    fn validate_thing<'a>(
        &self,
        datasource: &'a FixtureDatasource,
        thing_id: &str,
    ) -> Result<&'a FixtureThing> {
        let thing_id = ThingId::parse(thing_id)?;
        datasource
            .things
            .iter()
            .find(|t| t.id == thing_id)
            .ok_or_else(|| QueryError::thing_not_found(thing_id.to_string()))
    }

    fn validate_datastream<'a>(
        &self,
        thing: &'a FixtureThing,
        datastream_id: &str,
    ) -> Result<&'a FixtureDatastream> {
        thing
            .datastreams
            .iter()
            .find(|d| d.name == datastream_id)
            .ok_or_else(|| QueryError::datastream_not_found(datastream_id))
    }
}

impl Default for FixtureResolver {
    fn default() -> Self {
        Self::new(FixtureStore::seeded())
    }
}

#[async_trait]
impl ResourceResolver for FixtureResolver {
    fn backend_type(&self) -> &'static str {
        "fixture"
    }

    async fn list_datasources(&self) -> Result<Vec<Datasource>> {
        Ok(self
            .store
            .datasources
            .iter()
            .map(|d| Datasource::from_schema(d.name.clone()))
            .collect())
    }

    async fn list_things(&self, datasource_id: &str) -> Result<Vec<Thing>> {
        let datasource = self.validate_datasource(datasource_id)?;

        Ok(datasource
            .things
            .iter()
            .map(|t| Thing {
                id: t.id.to_string(),
                name: t.name.clone(),
                description: None,
                properties: Properties::new(),
            })
            .collect())
    }

    async fn list_datastreams(
        &self,
        datasource_id: &str,
        thing_id: &str,
    ) -> Result<Vec<Datastream>> {
        let datasource = self.validate_datasource(datasource_id)?;
        let thing = self.validate_thing(datasource, thing_id)?;

        Ok(thing
            .datastreams
            .iter()
            .map(|d| Datastream {
                id: d.name.clone(),
                name: d.name.clone(),
                description: None,
                properties: Properties::new(),
            })
            .collect())
    }

    async fn list_observations(
        &self,
        datasource_id: &str,
        thing_id: &str,
        datastream_id: &str,
    ) -> Result<Vec<Observation>> {
        let datasource = self.validate_datasource(datasource_id)?;
        let thing = self.validate_thing(datasource, thing_id)?;
        let datastream = self.validate_datastream(thing, datastream_id)?;

        debug!(
            "Serving {} fixture observations for {}/{}/{}",
            datastream.series.len(),
            datasource_id,
            thing_id,
            datastream_id
        );

        Ok(datastream
            .series
            .iter()
            .enumerate()
            .map(|(idx, (result_time, result))| Observation {
                id: (idx + 1).to_string(),
                result_time: *result_time,
                result: *result,
            })
            .collect())
    }
}
