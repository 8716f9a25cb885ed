//! `sl-core` — foundational types for the streetlap route planner.
//!
//! This crate is a dependency of every other `sl-*` crate. It intentionally
//! has no `sl-*` dependencies and minimal external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`                                      |
//! | [`geo`]    | `LatLng`, haversine, point-to-path distance             |
//! | [`bounds`] | `CityBounds`, `CityBoundary` polygon containment        |
//! | [`street`] | `StreetSegment`, street-name normalization              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod bounds;
pub mod geo;
pub mod ids;
pub mod street;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bounds::{CityBoundary, CityBounds};
pub use geo::{haversine_km, point_to_path_m, point_to_segment_m, polyline_distance_km, LatLng};
pub use ids::{EdgeId, NodeId};
pub use street::{normalize_street_name, quantize_node_key, SegmentSource, StreetSegment};
