//! AML writer: the app's own route interchange document.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use sl_plan::SuggestedRoute;

use crate::error::OutputResult;
use crate::xml::xml_escape;

/// Serialize a route as an AML document: metadata (name, creation time,
/// distance to 3 decimals, covered-node count) followed by 1-indexed
/// points.
pub fn write_aml(route: &SuggestedRoute, created: DateTime<Utc>) -> String {
    let mut doc = String::with_capacity(128 + route.points.len() * 56);
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    doc.push_str("<aml version=\"1.0\">\n");
    doc.push_str("  <metadata>\n");
    doc.push_str(&format!("    <name>{}</name>\n", xml_escape(&route.name)));
    doc.push_str(&format!(
        "    <created>{}</created>\n",
        created.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    doc.push_str(&format!(
        "    <distance_km>{:.3}</distance_km>\n",
        route.distance_km
    ));
    doc.push_str(&format!(
        "    <nodes_completed>{}</nodes_completed>\n",
        route.node_ids_covered.len()
    ));
    doc.push_str("  </metadata>\n");
    doc.push_str("  <route>\n");
    for (i, p) in route.points.iter().enumerate() {
        doc.push_str(&format!(
            "    <point idx=\"{}\" lat=\"{:.6}\" lon=\"{:.6}\"/>\n",
            i + 1,
            p.lat,
            p.lon
        ));
    }
    doc.push_str("  </route>\n");
    doc.push_str("</aml>\n");
    doc
}

/// Write the AML document to a file.
pub fn write_aml_file(
    path: &Path,
    route: &SuggestedRoute,
    created: DateTime<Utc>,
) -> OutputResult<()> {
    std::fs::write(path, write_aml(route, created))?;
    Ok(())
}
