//! `Collection(id)` path segments

use crate::error::PathError;

pub const DATASOURCES: &str = "Datasources";
pub const THINGS: &str = "Things";
pub const DATASTREAMS: &str = "Datastreams";
pub const OBSERVATIONS: &str = "Observations";

/// Extract the identifier of a `Collection(id)` segment.
///
/// The id is returned verbatim; quotes are not stripped.
pub fn parse_segment<'a>(segment: &'a str, collection: &'static str) -> Result<&'a str, PathError> {
    let rest = segment
        .strip_prefix(collection)
        .ok_or_else(|| PathError::WrongCollection {
            expected: collection,
            segment: segment.to_string(),
        })?;

    rest.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .ok_or_else(|| PathError::MissingIdentifier(segment.to_string()))
}

/// Check a trailing, identifier-less collection segment.
pub fn expect_collection(segment: &str, collection: &'static str) -> Result<(), PathError> {
    if segment == collection {
        Ok(())
    } else {
        Err(PathError::WrongCollection {
            expected: collection,
            segment: segment.to_string(),
        })
    }
}
