//! Launch URLs for handing a planned route to a maps app.

use sl_core::LatLng;

/// Most waypoints Google Maps accepts on a directions URL.
const MAX_WAYPOINTS: usize = 10;

fn fmt(p: LatLng) -> String {
    format!("{:.6},{:.6}", p.lat, p.lon)
}

/// Walking-directions URL with up to 10 waypoints sampled evenly along the
/// route. `None` for routes too short to describe.
pub fn google_maps_url(points: &[LatLng]) -> Option<String> {
    if points.len() < 2 {
        return None;
    }
    let origin = points[0];
    let destination = points[points.len() - 1];

    let interior = &points[1..points.len() - 1];
    let stride = interior.len().div_ceil(MAX_WAYPOINTS).max(1);
    let waypoints: Vec<String> = interior
        .iter()
        .step_by(stride)
        .take(MAX_WAYPOINTS)
        .map(|&p| fmt(p))
        .collect();

    Some(format!(
        "https://www.google.com/maps/dir/?api=1&travelmode=walking&origin={}&destination={}&waypoints={}",
        fmt(origin),
        fmt(destination),
        waypoints.join("%7C")
    ))
}

/// Apple Maps walking directions from the first to the last route point.
pub fn apple_maps_url(points: &[LatLng]) -> Option<String> {
    if points.len() < 2 {
        return None;
    }
    Some(format!(
        "https://maps.apple.com/?saddr={}&daddr={}&dirflg=w",
        fmt(points[0]),
        fmt(points[points.len() - 1])
    ))
}
