//! HTTP client for Overpass and Nominatim, enabled with the `fetch`
//! Cargo feature.
//!
//! # Failure policy
//!
//! Nominatim is queried once per city-name variant (20 s timeout each)
//! until a candidate with a valid bounding box appears. Overpass queries
//! are tried in order (area per variant, bbox, around), each POSTed to the
//! endpoint pool sequentially (55 s timeout each); the first endpoint that
//! returns a usable payload wins. Only after the whole matrix fails does
//! an error surface, naming the last offending host.

use std::time::Duration;

use reqwest::Client;

use sl_core::{LatLng, StreetSegment};

use crate::error::{OsmError, OsmResult};
use crate::model::parse_payload;
use crate::nominatim::{self, NominatimPlace, ResolvedCity};
use crate::normalize::normalize_payload;
use crate::queries::{
    city_name_variants, overpass_area_query, overpass_around_query, overpass_bbox_query,
    NOMINATIM_ENDPOINT, OVERPASS_ENDPOINTS,
};

const NOMINATIM_TIMEOUT: Duration = Duration::from_secs(20);
const OVERPASS_TIMEOUT: Duration = Duration::from_secs(55);

/// Thin wrapper around a configured `reqwest::Client`.
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    pub fn new() -> OsmResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("streetlap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OsmError::Http {
                host: "client".into(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Resolve a city name to bounds (and boundary polygon when available)
    /// through the name-variant list.
    pub async fn resolve_city(&self, city: &str) -> OsmResult<ResolvedCity> {
        if city.trim().is_empty() {
            return Err(OsmError::BadCityQuery);
        }

        for variant in city_name_variants(city) {
            log::info!("nominatim: trying {variant:?}");
            let response = self
                .client
                .get(NOMINATIM_ENDPOINT)
                .query(&[
                    ("format", "jsonv2"),
                    ("limit", "8"),
                    ("polygon_geojson", "1"),
                    ("q", variant.as_str()),
                ])
                .timeout(NOMINATIM_TIMEOUT)
                .send()
                .await;

            let places: Vec<NominatimPlace> = match response {
                Ok(r) if r.status().is_success() => match r.json().await {
                    Ok(p) => p,
                    Err(e) => {
                        log::warn!("nominatim: bad payload for {variant:?}: {e}");
                        continue;
                    }
                },
                Ok(r) => {
                    log::warn!("nominatim: status {} for {variant:?}", r.status());
                    continue;
                }
                Err(e) => {
                    log::warn!("nominatim: request failed for {variant:?}: {e}");
                    continue;
                }
            };

            if let Some(resolved) = nominatim::resolve_city(&variant, &places) {
                log::info!("nominatim: resolved {variant:?} to {}", resolved.display_name);
                return Ok(resolved);
            }
        }

        Err(OsmError::NominatimUnresolved {
            query: city.to_string(),
        })
    }

    /// Fetch the raw Overpass payload for a resolved city, walking the
    /// query/endpoint failover matrix.
    pub async fn fetch_streets(&self, city: &str, resolved: &ResolvedCity) -> OsmResult<String> {
        let center = LatLng::new(
            resolved.bounds.mid_lat(),
            (resolved.bounds.west + resolved.bounds.east) * 0.5,
        );

        let mut queries: Vec<String> = city_name_variants(city)
            .iter()
            .map(|v| overpass_area_query(v))
            .collect();
        queries.push(overpass_bbox_query(&resolved.bounds));
        queries.push(overpass_around_query(center, &resolved.bounds));

        let mut last_host = String::new();
        let mut last_reason = String::new();

        for query in &queries {
            for endpoint in OVERPASS_ENDPOINTS {
                log::info!("overpass: POST {endpoint}");
                let response = self
                    .client
                    .post(endpoint)
                    .header("Content-Type", "text/plain;charset=UTF-8")
                    .body(query.clone())
                    .timeout(OVERPASS_TIMEOUT)
                    .send()
                    .await;

                let text = match response {
                    Ok(r) if r.status().is_success() => match r.text().await {
                        Ok(t) => t,
                        Err(e) => {
                            last_host = endpoint.to_string();
                            last_reason = e.to_string();
                            continue;
                        }
                    },
                    Ok(r) => {
                        last_host = endpoint.to_string();
                        last_reason = format!("status {}", r.status());
                        continue;
                    }
                    Err(e) => {
                        last_host = endpoint.to_string();
                        last_reason = e.to_string();
                        continue;
                    }
                };

                match parse_payload(&text) {
                    Ok(elements) if !elements.is_empty() => return Ok(text),
                    Ok(_) => {
                        last_host = endpoint.to_string();
                        last_reason = "empty payload".to_string();
                    }
                    Err(e) => {
                        last_host = endpoint.to_string();
                        last_reason = e.to_string();
                    }
                }
            }
        }

        Err(OsmError::OverpassUnreachable {
            host: last_host,
            reason: last_reason,
        })
    }

    /// Resolve, fetch, and normalize a city dataset in one call.
    pub async fn fetch_city_dataset(
        &self,
        city: &str,
    ) -> OsmResult<(ResolvedCity, Vec<StreetSegment>)> {
        let resolved = self.resolve_city(city).await?;
        let payload = self.fetch_streets(city, &resolved).await?;
        let segments = normalize_payload(
            &payload,
            resolved.boundary.as_ref(),
            Some(&resolved.bounds),
        )?;
        Ok((resolved, segments))
    }
}
