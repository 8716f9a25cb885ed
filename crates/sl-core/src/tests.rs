//! Unit tests for sl-core.

#[cfg(test)]
mod geo {
    use crate::geo::*;

    #[test]
    fn haversine_known_distance() {
        // One degree of latitude at the equator is ~111.19 km on a
        // 6371 km sphere.
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(1.0, 0.0);
        let d = haversine_km(a, b);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn haversine_zero() {
        let p = LatLng::new(47.6, -122.3);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn polyline_distance_sums_pairs() {
        let path = [
            LatLng::new(0.0, 0.0),
            LatLng::new(0.001, 0.0),
            LatLng::new(0.002, 0.0),
        ];
        let total = polyline_distance_km(&path);
        let direct = haversine_km(path[0], path[2]);
        assert!((total - direct).abs() < 1e-9);
    }

    #[test]
    fn polyline_distance_short_path_is_zero() {
        assert_eq!(polyline_distance_km(&[]), 0.0);
        assert_eq!(polyline_distance_km(&[LatLng::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn point_to_segment_perpendicular() {
        // Segment running east along the equator; point 0.001 deg north of
        // its midpoint is ~111.3 m away.
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 0.01);
        let p = LatLng::new(0.001, 0.005);
        let d = point_to_segment_m(p, a, b);
        assert!((d - 111.3).abs() < 1.0, "got {d}");
    }

    #[test]
    fn point_to_segment_clamps_to_endpoint() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 0.01);
        // Point beyond the east endpoint projects onto b. The flat frame
        // and the sphere disagree by ~0.1% at this scale.
        let p = LatLng::new(0.0, 0.02);
        let d = point_to_segment_m(p, a, b);
        let expect = haversine_km(p, b) * 1000.0;
        assert!((d - expect).abs() < 2.0, "got {d}, expected {expect}");
    }

    #[test]
    fn point_to_segment_degenerate() {
        let a = LatLng::new(0.0, 0.0);
        let p = LatLng::new(0.001, 0.0);
        let d = point_to_segment_m(p, a, a);
        assert!((d - 111.3).abs() < 1.0, "got {d}");
    }

    #[test]
    fn point_to_path_infinite_for_short_path() {
        let p = LatLng::new(0.0, 0.0);
        assert!(point_to_path_m(p, &[]).is_infinite());
        assert!(point_to_path_m(p, &[LatLng::new(1.0, 1.0)]).is_infinite());
    }

    #[test]
    fn point_to_path_takes_minimum() {
        let path = [
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 0.01),
            LatLng::new(0.01, 0.01),
        ];
        // On the second leg.
        let p = LatLng::new(0.005, 0.01);
        assert!(point_to_path_m(p, &path) < 0.5);
    }
}

#[cfg(test)]
mod bounds {
    use crate::bounds::*;
    use crate::geo::LatLng;

    #[test]
    fn bbox_contains() {
        let b = CityBounds::new(47.0, -123.0, 48.0, -122.0);
        assert!(b.contains(LatLng::new(47.5, -122.5)));
        assert!(!b.contains(LatLng::new(46.9, -122.5)));
        assert!(!b.contains(LatLng::new(47.5, -121.9)));
    }

    #[test]
    fn bbox_padding_is_metric() {
        let b = CityBounds::new(0.0, 0.0, 1.0, 1.0).padded(111_320.0 * 0.001);
        // 111.32 m of padding is 0.001 deg of latitude.
        assert!((b.south + 0.001).abs() < 1e-9);
        assert!((b.north - 1.001).abs() < 1e-9);
        // Longitude padding is slightly wider away from the equator.
        assert!(b.west <= -0.001);
    }

    fn unit_square() -> CityBoundary {
        CityBoundary::new(vec![vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]])
    }

    #[test]
    fn polygon_contains_interior() {
        let poly = unit_square();
        assert!(poly.contains(LatLng::new(0.5, 0.5)));
        assert!(!poly.contains(LatLng::new(1.5, 0.5)));
        assert!(!poly.contains(LatLng::new(-0.1, 0.5)));
    }

    #[test]
    fn polygon_boundary_point_counts_as_inside() {
        let poly = unit_square();
        // On the southern edge, collinear with it.
        assert!(poly.contains(LatLng::new(0.0, 0.5)));
        // A vertex.
        assert!(poly.contains(LatLng::new(1.0, 1.0)));
    }

    #[test]
    fn polygon_hole_excluded_by_even_odd() {
        let mut poly = unit_square();
        poly.rings.push(vec![
            LatLng::new(0.25, 0.25),
            LatLng::new(0.25, 0.75),
            LatLng::new(0.75, 0.75),
            LatLng::new(0.75, 0.25),
        ]);
        assert!(poly.contains(LatLng::new(0.1, 0.1)));
        assert!(!poly.contains(LatLng::new(0.5, 0.5)), "hole interior");
    }

    #[test]
    fn boundary_distance_and_tolerance() {
        let poly = unit_square();
        // ~111.3 m west of the western edge at mid-height.
        let p = LatLng::new(0.5, -0.001);
        assert!(!poly.contains(p));
        let d = poly.boundary_distance_m(p);
        assert!((d - 111.3).abs() < 1.0, "got {d}");
        assert!(poly.within_m(p, 120.0));
        assert!(!poly.within_m(p, 100.0));
    }

    #[test]
    fn closed_ring_check_covers_last_segment() {
        let poly = unit_square();
        // Nearest boundary segment is the closing edge from (1,0) back to
        // (0,0) on the west side... the point sits just west of it.
        let p = LatLng::new(0.5, -0.0005);
        assert!(poly.boundary_distance_m(p) < 60.0);
    }
}

#[cfg(test)]
mod ids {
    use crate::ids::{EdgeId, NodeId};

    #[test]
    fn index_widens() {
        assert_eq!(NodeId(7).index(), 7usize);
        assert_eq!(EdgeId(0).index(), 0usize);
    }

    #[test]
    fn ordering_follows_position() {
        assert!(NodeId(1) < NodeId(2));
        let mut v = vec![EdgeId(3), EdgeId(1), EdgeId(2)];
        v.sort();
        assert_eq!(v, [EdgeId(1), EdgeId(2), EdgeId(3)]);
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(NodeId(42).to_string(), "n42");
        assert_eq!(EdgeId(42).to_string(), "e42");
    }
}

#[cfg(test)]
mod street {
    use crate::geo::LatLng;
    use crate::street::*;

    #[test]
    fn normalize_collapses_and_strips() {
        assert_eq!(normalize_street_name("  N.  Main   St. "), "n main st");
        assert_eq!(normalize_street_name("ELM STREET"), "elm street");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_street_name("  N.  Main   St. ");
        assert_eq!(normalize_street_name(&once), once);
    }

    #[test]
    fn displayable_name_rejects_placeholders() {
        assert!(is_displayable_name("Main St"));
        assert!(!is_displayable_name(""));
        assert!(!is_displayable_name("   "));
        assert!(!is_displayable_name("Unnamed Road"));
        assert!(!is_displayable_name("unnamed street"));
    }

    #[test]
    fn quantized_key_is_5_decimals() {
        let k = quantize_node_key(LatLng::new(47.606209, -122.332071));
        assert_eq!(k, "47.60621,-122.33207");
    }

    #[test]
    fn endpoint_keys_fall_back_to_quantization() {
        let seg = StreetSegment {
            id: "manual-1".into(),
            name: "Main St".into(),
            path: vec![LatLng::new(0.0, 0.0), LatLng::new(0.001, 0.0)],
            start_node_id: None,
            end_node_id: None,
            completed: false,
            source: SegmentSource::Manual,
        };
        assert_eq!(seg.start_key(), "0.00000,0.00000");
        assert_eq!(seg.end_key(), "0.00100,0.00000");

        let osm = StreetSegment {
            start_node_id: Some("osm-node-17".into()),
            end_node_id: Some("osm-node-18".into()),
            source: SegmentSource::Osm,
            ..seg
        };
        assert_eq!(osm.start_key(), "osm-node-17");
        assert_eq!(osm.end_key(), "osm-node-18");
    }
}
