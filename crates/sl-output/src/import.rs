//! Activity and manual-street import, plus activity completion matching.
//!
//! # Formats
//!
//! Activities arrive as `.gpx` files (track points) or `.csv` files with
//! required `lat`,`lon` columns. Manual streets arrive as `.csv` with
//! required `name`,`lat`,`lon` columns; consecutive rows sharing a name
//! form one segment polyline.
//!
//! Row-level problems are skipped; structural problems (unknown extension,
//! missing columns) and empty results are errors.

use serde::Deserialize;

use sl_core::{point_to_path_m, LatLng, SegmentSource, StreetSegment};

use crate::error::{OutputError, OutputResult};
use crate::gpx::parse_activity_points;

/// An activity polyline marks a street completed when at least this share
/// of its path points sit within [`ACTIVITY_MATCH_RADIUS_M`] of it.
pub const ACTIVITY_MATCH_SHARE: f64 = 0.9;
pub const ACTIVITY_MATCH_RADIUS_M: f64 = 25.0;

// ── Activity import ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivityRow {
    lat: f64,
    lon: f64,
}

/// Parse an activity file into a point list, dispatching on the file
/// extension. Fewer than two valid points is an empty import.
pub fn parse_activity(file_name: &str, content: &str) -> OutputResult<Vec<LatLng>> {
    let ext = file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    let points = match ext.as_str() {
        "gpx" => parse_activity_points(content)?,
        "csv" => parse_activity_csv(content)?,
        other => {
            return Err(OutputError::UnsupportedImport(format!(
                "unrecognized file extension {other:?}"
            )))
        }
    };

    if points.len() < 2 {
        return Err(OutputError::EmptyImport(format!(
            "{} valid points",
            points.len()
        )));
    }
    Ok(points)
}

fn parse_activity_csv(content: &str) -> OutputResult<Vec<LatLng>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    require_columns(&mut reader, &["lat", "lon"])?;

    let mut points = Vec::new();
    for row in reader.deserialize::<ActivityRow>() {
        match row {
            Ok(r) => points.push(LatLng::new(r.lat, r.lon)),
            Err(e) => log::warn!("activity csv: skipping row: {e}"),
        }
    }
    Ok(points)
}

// ── Manual street import ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StreetRow {
    name: String,
    lat: f64,
    lon: f64,
}

/// Import manual street segments from CSV. Consecutive rows with the same
/// (trimmed) name become one segment; names with fewer than two valid
/// points are dropped. No segment at all is an empty import.
pub fn import_streets_csv(content: &str) -> OutputResult<Vec<StreetSegment>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    require_columns(&mut reader, &["name", "lat", "lon"])?;

    let mut groups: Vec<(String, Vec<LatLng>)> = Vec::new();
    for row in reader.deserialize::<StreetRow>() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                log::warn!("street csv: skipping row: {e}");
                continue;
            }
        };
        let name = row.name.trim().to_string();
        if name.is_empty() {
            continue;
        }
        let point = LatLng::new(row.lat, row.lon);
        match groups.last_mut() {
            Some((last_name, path)) if *last_name == name => path.push(point),
            _ => groups.push((name, vec![point])),
        }
    }

    let segments: Vec<StreetSegment> = groups
        .into_iter()
        .filter(|(_, path)| path.len() >= 2)
        .enumerate()
        .map(|(i, (name, path))| StreetSegment {
            id: format!("manual-{}", i + 1),
            name,
            path,
            start_node_id: None,
            end_node_id: None,
            completed: false,
            source: SegmentSource::Manual,
        })
        .collect();

    if segments.is_empty() {
        return Err(OutputError::EmptyImport("0 valid segments".to_string()));
    }
    Ok(segments)
}

fn require_columns<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    required: &[&str],
) -> OutputResult<()> {
    let headers = reader
        .headers()
        .map_err(|e| OutputError::UnsupportedImport(format!("unreadable CSV header: {e}")))?;
    for col in required {
        if !headers.iter().any(|h| h.trim().eq_ignore_ascii_case(col)) {
            return Err(OutputError::UnsupportedImport(format!(
                "missing required column {col:?}"
            )));
        }
    }
    Ok(())
}

// ── Completion matching ───────────────────────────────────────────────────────

/// Mark streets completed by a recorded activity: a street completes when
/// ≥90% of its path points lie within 25 m of the activity polyline.
/// Returns how many streets were newly marked.
pub fn apply_activity(streets: &mut [StreetSegment], activity: &[LatLng]) -> usize {
    if activity.len() < 2 {
        return 0;
    }
    let mut marked = 0;
    for street in streets.iter_mut().filter(|s| !s.completed) {
        let near = street
            .path
            .iter()
            .filter(|&&p| point_to_path_m(p, activity) <= ACTIVITY_MATCH_RADIUS_M)
            .count();
        if near as f64 / street.path.len() as f64 >= ACTIVITY_MATCH_SHARE {
            street.completed = true;
            marked += 1;
        }
    }
    if marked > 0 {
        log::info!("activity completed {marked} streets");
    }
    marked
}
