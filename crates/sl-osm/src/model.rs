//! Overpass payload model and tolerant element parser.
//!
//! The payload arrives as loosely-typed JSON:
//! `{"elements": [{"type": "node"|"way", "id", "lat"?, "lon"?, "nodes"?,
//! "tags"?}, ...]}`. Every element is parsed independently; entries that
//! cannot be understood are skipped rather than failing the whole payload.

use std::collections::HashMap;

use serde::Deserialize;

use sl_core::LatLng;

use crate::error::{OsmError, OsmResult};

// ── Parsed elements ───────────────────────────────────────────────────────────

/// An OSM node with a resolved position.
#[derive(Clone, Debug)]
pub struct OsmNode {
    pub id: i64,
    pub point: LatLng,
}

/// An OSM way: ordered node references plus tags.
#[derive(Clone, Debug)]
pub struct OsmWay {
    pub id: i64,
    pub nodes: Vec<i64>,
    pub tags: HashMap<String, String>,
}

impl OsmWay {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// A usable payload element. Relations and unknown kinds never make it out
/// of the parser.
#[derive(Clone, Debug)]
pub enum OsmElement {
    Node(OsmNode),
    Way(OsmWay),
}

// ── Wire shapes ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    elements: Vec<serde_json::Value>,
}

/// Every field optional: the element decides its own validity below.
#[derive(Deserialize)]
struct RawElement {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    nodes: Vec<i64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Parse an Overpass JSON payload into nodes and ways.
///
/// Unparseable or incomplete entries are skipped (a node without
/// coordinates, a way with fewer than two node refs). Only a payload that
/// is not JSON at all is an error.
pub fn parse_payload(text: &str) -> OsmResult<Vec<OsmElement>> {
    let raw: RawPayload =
        serde_json::from_str(text).map_err(|e| OsmError::Parse(e.to_string()))?;

    let mut out = Vec::with_capacity(raw.elements.len());
    let mut skipped = 0usize;

    for value in raw.elements {
        let Ok(el) = serde_json::from_value::<RawElement>(value) else {
            skipped += 1;
            continue;
        };
        match (el.kind.as_str(), el.id) {
            ("node", Some(id)) => match (el.lat, el.lon) {
                (Some(lat), Some(lon)) => out.push(OsmElement::Node(OsmNode {
                    id,
                    point: LatLng::new(lat, lon),
                })),
                _ => skipped += 1,
            },
            ("way", Some(id)) if el.nodes.len() >= 2 => out.push(OsmElement::Way(OsmWay {
                id,
                nodes: el.nodes,
                tags: el.tags,
            })),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("overpass payload: skipped {skipped} unusable elements");
    }
    Ok(out)
}
