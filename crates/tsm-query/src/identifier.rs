//! Syntactic checks on caller-supplied identifiers.
//!
//! These run before any store lookup so that a malformed identifier is reported
//! as such rather than as a missing resource.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{QueryError, Result};

/// Name of the table whose presence marks a schema as a datasource
pub const SENTINEL_TABLE: &str = "thing";

/// A thing identifier that is known to be a well-formed UUID
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ThingId(Uuid);

impl ThingId {
    pub fn parse(raw: &str) -> Result<Self> {
        Uuid::parse_str(raw)
            .map(ThingId)
            .map_err(|_| QueryError::malformed("Thing uuid format not valid"))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for ThingId {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Uuid> for ThingId {
    fn from(uuid: Uuid) -> Self {
        ThingId(uuid)
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
