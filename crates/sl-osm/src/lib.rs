//! `sl-osm` — OSM dataset ingest and normalization.
//!
//! Turns a raw Overpass payload into the deduplicated, boundary-contained
//! `StreetSegment` list the planner consumes, and resolves city names to
//! bounds via Nominatim.
//!
//! # Crate layout
//!
//! | Module        | Contents                                               |
//! |---------------|--------------------------------------------------------|
//! | [`model`]     | Overpass payload model, tolerant element parser        |
//! | [`normalize`] | runnability filter, way splitting, dedup, containment  |
//! | [`nominatim`] | place model, candidate ranking, boundary extraction    |
//! | [`queries`]   | Overpass query templates, endpoints, name variants     |
//! | [`fetch`]     | HTTP client with endpoint failover (feature = `fetch`) |
//! | [`error`]     | `OsmError`, `OsmResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `fetch` | Enables the reqwest-based Overpass/Nominatim client. |

pub mod error;
pub mod model;
pub mod nominatim;
pub mod normalize;
pub mod queries;

#[cfg(feature = "fetch")]
pub mod fetch;


pub use error::{OsmError, OsmResult};
pub use model::{parse_payload, OsmElement, OsmNode, OsmWay};
pub use nominatim::{resolve_city, NominatimPlace, ResolvedCity};
pub use normalize::{dedupe_segments, normalize_payload, segments_from_elements};

#[cfg(feature = "fetch")]
pub use fetch::FetchClient;
