//! Unit tests for sl-output.

#[cfg(test)]
mod helpers {
    use sl_core::{polyline_distance_km, LatLng};
    use sl_plan::SuggestedRoute;

    pub fn pt(lat: f64, lon: f64) -> LatLng {
        LatLng::new(lat, lon)
    }

    pub fn route_with_points(points: Vec<LatLng>) -> SuggestedRoute {
        SuggestedRoute {
            id: "route-1".to_string(),
            name: "Coverage run (1.4 km)".to_string(),
            distance_km: polyline_distance_km(&points),
            street_ids: vec!["s-1".to_string()],
            street_names: vec!["Main St".to_string()],
            strategy: "efficient-coverage".to_string(),
            node_ids_covered: vec!["n-1".to_string()],
            node_points: vec![points[0]],
            available_nodes: vec!["n-1".to_string(), "n-2".to_string()],
            points,
        }
    }

    pub fn created() -> chrono::DateTime<chrono::Utc> {
        use chrono::TimeZone;
        chrono::Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }
}

#[cfg(test)]
mod escaping {
    use crate::xml::xml_escape;

    #[test]
    fn escapes_all_five() {
        assert_eq!(
            xml_escape(r#"Fish & Chips <"Main's"> Rd"#),
            "Fish &amp; Chips &lt;&quot;Main&apos;s&quot;&gt; Rd"
        );
    }

    #[test]
    fn plain_text_untouched(){
        assert_eq!(xml_escape("North 45th Street"), "North 45th Street");
    }
}

#[cfg(test)]
mod gpx {
    use super::helpers::*;
    use crate::gpx::{parse_activity_points, write_gpx};
    use sl_core::polyline_distance_km;

    #[test]
    fn three_point_round_trip_to_six_decimals() {
        let points = vec![
            pt(47.606209, -122.332071),
            pt(47.607000, -122.331500),
            pt(47.608123, -122.330987),
        ];
        let route = route_with_points(points.clone());
        let doc = write_gpx(&route, created());

        let parsed = parse_activity_points(&doc).unwrap();
        assert_eq!(parsed.len(), 3);
        for (a, b) in points.iter().zip(&parsed) {
            assert!((a.lat - b.lat).abs() < 1e-9, "{} vs {}", a.lat, b.lat);
            assert!((a.lon - b.lon).abs() < 1e-9);
        }
    }

    #[test]
    fn length_survives_round_trip() {
        // Points with more precision than the 6-decimal wire format.
        let points = vec![
            pt(47.6062091234, -122.3320714321),
            pt(47.6070001111, -122.3315002222),
            pt(47.6081233333, -122.3309874444),
        ];
        let route = route_with_points(points);
        let doc = write_gpx(&route, created());

        let parsed = parse_activity_points(&doc).unwrap();
        let reparsed_km = polyline_distance_km(&parsed);
        assert!(
            (reparsed_km - route.distance_km).abs() <= route.distance_km * 0.001,
            "{reparsed_km} vs {}",
            route.distance_km
        );
    }

    #[test]
    fn document_structure() {
        let route = route_with_points(vec![pt(0.0, 0.0), pt(0.001, 0.0)]);
        let doc = write_gpx(&route, created());
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(doc.contains("<gpx version=\"1.1\""));
        assert!(doc.contains("<time>2026-08-01T12:00:00Z</time>"));
        assert!(doc.contains("<trkpt lat=\"0.000000\" lon=\"0.000000\"/>"));
        assert!(doc.contains("<trkpt lat=\"0.001000\" lon=\"0.000000\"/>"));
        assert_eq!(doc.matches("<trkseg>").count(), 1);
    }

    #[test]
    fn parser_skips_incomplete_trkpts() {
        let doc = r#"<gpx><trk><trkseg>
            <trkpt lat="1.0" lon="2.0"/>
            <trkpt lat="broken" lon="2.0"/>
            <trkpt lon="2.0"/>
            <trkpt lat="3.0" lon="4.0"><ele>12</ele></trkpt>
        </trkseg></trk></gpx>"#;
        let points = parse_activity_points(doc).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].lat, 3.0);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_activity_points("<gpx><trk></gpx>").is_err());
    }
}

#[cfg(test)]
mod aml {
    use super::helpers::*;
    use crate::aml::write_aml;

    #[test]
    fn exact_document() {
        let route = route_with_points(vec![pt(0.0, 0.0), pt(0.001, 0.0)]);
        let doc = write_aml(&route, created());
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
            <aml version=\"1.0\">\n\
            \x20\x20<metadata>\n\
            \x20\x20\x20\x20<name>Coverage run (1.4 km)</name>\n\
            \x20\x20\x20\x20<created>2026-08-01T12:00:00Z</created>\n\
            \x20\x20\x20\x20<distance_km>0.111</distance_km>\n\
            \x20\x20\x20\x20<nodes_completed>1</nodes_completed>\n\
            \x20\x20</metadata>\n\
            \x20\x20<route>\n\
            \x20\x20\x20\x20<point idx=\"1\" lat=\"0.000000\" lon=\"0.000000\"/>\n\
            \x20\x20\x20\x20<point idx=\"2\" lat=\"0.001000\" lon=\"0.000000\"/>\n\
            \x20\x20</route>\n\
            </aml>\n";
        assert_eq!(doc, expected);
    }

    #[test]
    fn escapes_route_name() {
        let mut route = route_with_points(vec![pt(0.0, 0.0), pt(0.001, 0.0)]);
        route.name = "Fish & Chips Loop".to_string();
        let doc = write_aml(&route, created());
        assert!(doc.contains("<name>Fish &amp; Chips Loop</name>"));
    }
}

#[cfg(test)]
mod files {
    use super::helpers::*;
    use crate::aml::write_aml_file;
    use crate::gpx::write_gpx_file;

    #[test]
    fn writers_create_files() {
        let dir = tempfile::tempdir().unwrap();
        let route = route_with_points(vec![pt(0.0, 0.0), pt(0.001, 0.0)]);

        let gpx_path = dir.path().join("route.gpx");
        write_gpx_file(&gpx_path, &route, created()).unwrap();
        assert!(std::fs::read_to_string(&gpx_path).unwrap().contains("<gpx"));

        let aml_path = dir.path().join("route.aml");
        write_aml_file(&aml_path, &route, created()).unwrap();
        assert!(std::fs::read_to_string(&aml_path).unwrap().contains("<aml"));
    }
}

#[cfg(test)]
mod importing {
    use super::helpers::*;
    use crate::error::OutputError;
    use crate::import::{apply_activity, import_streets_csv, parse_activity};

    #[test]
    fn gpx_extension_dispatches() {
        let doc = r#"<gpx><trk><trkseg>
            <trkpt lat="1.0" lon="2.0"/>
            <trkpt lat="1.1" lon="2.1"/>
        </trkseg></trk></gpx>"#;
        let points = parse_activity("morning_run.GPX", doc).unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn csv_activity_needs_lat_lon() {
        let ok = "lat,lon\n1.0,2.0\n1.1,2.1\n";
        assert_eq!(parse_activity("run.csv", ok).unwrap().len(), 2);

        let missing = "latitude,longitude\n1.0,2.0\n";
        assert!(matches!(
            parse_activity("run.csv", missing),
            Err(OutputError::UnsupportedImport(_))
        ));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert!(matches!(
            parse_activity("run.kml", "<kml/>"),
            Err(OutputError::UnsupportedImport(_))
        ));
    }

    #[test]
    fn single_point_is_empty_import() {
        let doc = r#"<gpx><trkpt lat="1.0" lon="2.0"/></gpx>"#;
        assert!(matches!(
            parse_activity("short.gpx", doc),
            Err(OutputError::EmptyImport(_))
        ));
    }

    #[test]
    fn street_csv_groups_consecutive_names() {
        let csv = "name,lat,lon\n\
                   Main St,0.0,0.0\n\
                   Main St,0.0,0.001\n\
                   Main St,0.0,0.002\n\
                   Elm St,0.001,0.0\n\
                   Elm St,0.001,0.001\n\
                   Lonely Ln,0.002,0.0\n";
        let segs = import_streets_csv(csv).unwrap();
        // Lonely Ln has one point and is dropped.
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].name, "Main St");
        assert_eq!(segs[0].path.len(), 3);
        assert_eq!(segs[1].name, "Elm St");
        assert_eq!(segs[0].id, "manual-1");
    }

    #[test]
    fn street_csv_with_no_segments_is_empty_import() {
        let csv = "name,lat,lon\nLonely Ln,0.002,0.0\n";
        assert!(matches!(
            import_streets_csv(csv),
            Err(OutputError::EmptyImport(_))
        ));
    }

    #[test]
    fn activity_marks_matching_street_completed() {
        use sl_core::{SegmentSource, StreetSegment};

        let mut streets = vec![
            StreetSegment {
                id: "s-on".into(),
                name: "On Route St".into(),
                path: vec![pt(0.0, 0.0), pt(0.0, 0.001), pt(0.0, 0.002)],
                start_node_id: None,
                end_node_id: None,
                completed: false,
                source: SegmentSource::Manual,
            },
            StreetSegment {
                id: "s-off".into(),
                name: "Far Away Ave".into(),
                path: vec![pt(0.01, 0.0), pt(0.01, 0.001)],
                start_node_id: None,
                end_node_id: None,
                completed: false,
                source: SegmentSource::Manual,
            },
        ];

        // Activity runs right along On Route St.
        let activity = vec![pt(0.00001, -0.0002), pt(0.00001, 0.001), pt(0.00001, 0.0022)];
        let marked = apply_activity(&mut streets, &activity);
        assert_eq!(marked, 1);
        assert!(streets[0].completed);
        assert!(!streets[1].completed);

        // Re-applying marks nothing new.
        assert_eq!(apply_activity(&mut streets, &activity), 0);
    }
}

#[cfg(test)]
mod launch_urls {
    use super::helpers::*;
    use crate::links::{apple_maps_url, google_maps_url};

    #[test]
    fn google_caps_waypoints_at_ten() {
        let points: Vec<_> = (0..25).map(|i| pt(0.001 * i as f64, 0.0)).collect();
        let url = google_maps_url(&points).unwrap();
        assert!(url.starts_with("https://www.google.com/maps/dir/?api=1&travelmode=walking"));
        assert!(url.contains("origin=0.000000,0.000000"));
        assert!(url.contains("destination=0.024000,0.000000"));

        let waypoints = url.rsplit("waypoints=").next().unwrap();
        let count = waypoints.split("%7C").count();
        assert!(count <= 10, "{count} waypoints");
    }

    #[test]
    fn apple_walking_directions() {
        let url = apple_maps_url(&[pt(1.0, 2.0), pt(3.0, 4.0)]).unwrap();
        assert_eq!(
            url,
            "https://maps.apple.com/?saddr=1.000000,2.000000&daddr=3.000000,4.000000&dirflg=w"
        );
    }

    #[test]
    fn short_routes_have_no_url() {
        assert!(google_maps_url(&[pt(0.0, 0.0)]).is_none());
        assert!(apple_maps_url(&[]).is_none());
    }
}
