//! Path extraction that rejects with problem details

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::resource_not_found;
use crate::problemdetails::Problem;

/// Raw path segments of a mapping route.
///
/// Segments that cannot be decoded (invalid UTF-8 after percent-decoding)
/// do not address any resource and are rejected as 404 "Resource not found".
pub struct Segments<T>(pub T);

impl<S, T> FromRequestParts<S> for Segments<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(segments)) => Ok(Segments(segments)),
            Err(rejection) => {
                debug!("Rejected path '{}': {}", parts.uri.path(), rejection.body_text());
                Err(resource_not_found())
            }
        }
    }
}
