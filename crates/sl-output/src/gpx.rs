//! GPX 1.1 writer and activity-point parser.
//!
//! Writing is plain string assembly: the byte format is the external
//! contract (6-decimal coordinates, exact escaping), so no XML library sits
//! between the route and the document. Parsing goes through `quick-xml`
//! and accepts any GPX-shaped document with `trkpt` elements.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use sl_core::LatLng;
use sl_plan::SuggestedRoute;

use crate::error::{OutputError, OutputResult};
use crate::xml::xml_escape;

/// Serialize a route as a GPX 1.1 document: one `<trk>` with one
/// `<trkseg>`, coordinates at 6 decimal places.
pub fn write_gpx(route: &SuggestedRoute, created: DateTime<Utc>) -> String {
    let mut doc = String::with_capacity(128 + route.points.len() * 48);
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    doc.push_str(
        "<gpx version=\"1.1\" creator=\"streetlap\" xmlns=\"http://www.topografix.com/GPX/1/1\">\n",
    );
    doc.push_str("  <metadata>\n");
    doc.push_str(&format!("    <name>{}</name>\n", xml_escape(&route.name)));
    doc.push_str(&format!(
        "    <time>{}</time>\n",
        created.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    doc.push_str("  </metadata>\n");
    doc.push_str("  <trk>\n");
    doc.push_str(&format!("    <name>{}</name>\n", xml_escape(&route.name)));
    doc.push_str("    <trkseg>\n");
    for p in &route.points {
        doc.push_str(&format!(
            "      <trkpt lat=\"{:.6}\" lon=\"{:.6}\"/>\n",
            p.lat, p.lon
        ));
    }
    doc.push_str("    </trkseg>\n");
    doc.push_str("  </trk>\n");
    doc.push_str("</gpx>\n");
    doc
}

/// Write the GPX document to a file.
pub fn write_gpx_file(
    path: &Path,
    route: &SuggestedRoute,
    created: DateTime<Utc>,
) -> OutputResult<()> {
    std::fs::write(path, write_gpx(route, created))?;
    Ok(())
}

/// Extract the track points of a GPX document, in order.
///
/// Tolerates unknown elements and skips `trkpt`s with missing or
/// unparseable coordinates; fails only when the document is not XML.
pub fn parse_activity_points(text: &str) -> OutputResult<Vec<LatLng>> {
    let mut reader = Reader::from_str(text);

    let mut points = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() != b"trkpt" {
                    continue;
                }
                let mut lat: Option<f64> = None;
                let mut lon: Option<f64> = None;
                for attr in e.attributes().flatten() {
                    let value = match attr.unescape_value() {
                        Ok(v) => v,
                        Err(_) => continue,
                    };
                    match attr.key.as_ref() {
                        b"lat" => lat = value.parse().ok(),
                        b"lon" => lon = value.parse().ok(),
                        _ => {}
                    }
                }
                match (lat, lon) {
                    (Some(lat), Some(lon)) => points.push(LatLng::new(lat, lon)),
                    _ => log::warn!("gpx: skipping trkpt with missing coordinates"),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(OutputError::Xml(e.to_string())),
        }
    }
    Ok(points)
}
