//! Ingest-subsystem error type.

use thiserror::Error;

/// Errors produced while resolving, fetching, or normalizing a city
/// dataset. Each variant maps onto one user-facing failure.
#[derive(Debug, Error)]
pub enum OsmError {
    #[error("city query is empty")]
    BadCityQuery,

    #[error("all Overpass endpoints failed; last was {host}: {reason}")]
    OverpassUnreachable { host: String, reason: String },

    #[error("Nominatim returned no usable bounding box for {query:?}")]
    NominatimUnresolved { query: String },

    #[error("no runnable streets inside the city boundary")]
    NoStreetsInBoundary,

    #[error("payload parse error: {0}")]
    Parse(String),

    #[error("HTTP error from {host}: {reason}")]
    Http { host: String, reason: String },
}

pub type OsmResult<T> = Result<T, OsmError>;
