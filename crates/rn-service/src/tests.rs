//! Unit tests for rn-service.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use rn_core::{GeoPoint, NodeId};
    use rn_graph::{GraphStore, GraphStoreBuilder};

    /// Five intersections around central Bengaluru joined in a ring, plus an
    /// island pair with no connection to the ring.
    ///
    /// ```text
    ///   A(1) ── B(2) ── C(3)
    ///   │                │
    ///   E(5) ─────────  D(4)        X(90) ── Y(91)
    /// ```
    pub fn ring_graph() -> (Arc<GraphStore>, [NodeId; 7]) {
        let mut b = GraphStoreBuilder::new();
        let a = b.add_node(1, GeoPoint::new(12.980, 77.580));
        let bb = b.add_node(2, GeoPoint::new(12.980, 77.590));
        let c = b.add_node(3, GeoPoint::new(12.980, 77.600));
        let d = b.add_node(4, GeoPoint::new(12.970, 77.600));
        let e = b.add_node(5, GeoPoint::new(12.970, 77.580));
        let x = b.add_node(90, GeoPoint::new(12.900, 77.700));
        let y = b.add_node(91, GeoPoint::new(12.900, 77.710));

        b.add_road(a, bb, 1.0);
        b.add_road(bb, c, 1.0);
        b.add_road(c, d, 1.0);
        b.add_road(d, e, 1.0);
        b.add_road(e, a, 1.0);
        b.add_road(x, y, 1.0);

        (Arc::new(b.build().unwrap()), [a, bb, c, d, e, x, y])
    }
}

// ── Routing through the facade ────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use rn_core::{GeoPoint, NodeId};
    use rn_routing::Path;

    use crate::{RouteConfig, RouteError, RouteQuery, RouteService};

    fn service() -> RouteService {
        let (graph, _) = super::helpers::ring_graph();
        RouteService::new(graph, RouteConfig::default()).unwrap()
    }

    #[test_log::test]
    fn shortest_route_returns_lat_lon_pairs() {
        let svc = service();
        // Slightly off node A and node C.
        let route = svc
            .shortest_route(GeoPoint::new(12.9801, 77.5799), GeoPoint::new(12.9799, 77.6001))
            .unwrap();
        assert_eq!(route.nodes, vec![1, 2, 3]);
        assert_eq!(route.weight, 2.0);
        assert_eq!(
            route.coordinates,
            vec![[12.980, 77.580], [12.980, 77.590], [12.980, 77.600]]
        );
    }

    #[test]
    fn k_routes_main_then_alternates() {
        let svc = service();
        let routes = svc
            .k_shortest_routes(GeoPoint::new(12.980, 77.580), GeoPoint::new(12.980, 77.600), 3)
            .unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].nodes, vec![1, 2, 3]);
        assert_eq!(routes[1].nodes, vec![1, 5, 4, 3]);
        assert!(routes[0].weight <= routes[1].weight);
    }

    #[test]
    fn routes_uses_default_k() {
        let svc = service();
        let routes = svc
            .routes(GeoPoint::new(12.980, 77.580), GeoPoint::new(12.970, 77.600), None)
            .unwrap();
        // Two loopless ways round the ring.
        assert_eq!(routes.len(), 2);
        let single = svc
            .routes(GeoPoint::new(12.980, 77.580), GeoPoint::new(12.970, 77.600), Some(1))
            .unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0], routes[0]);
    }

    #[test]
    fn same_snap_point_gives_trivial_route() {
        let svc = service();
        let route = svc
            .shortest_route(GeoPoint::new(12.980, 77.580), GeoPoint::new(12.98001, 77.58001))
            .unwrap();
        assert_eq!(route.nodes, vec![1]);
        assert_eq!(route.coordinates.len(), 1);
        assert_eq!(route.weight, 0.0);
    }

    #[test]
    fn disconnected_components_report_no_path() {
        let svc = service();
        let err = svc
            .shortest_route(GeoPoint::new(12.980, 77.580), GeoPoint::new(12.900, 77.710))
            .unwrap_err();
        assert!(matches!(err, RouteError::NoPath { .. }), "got {err:?}");
        assert_eq!(err.kind(), "no_path");
        assert!(!err.is_client_error());

        let err = svc
            .k_shortest_routes(GeoPoint::new(12.980, 77.580), GeoPoint::new(12.900, 77.710), 2)
            .unwrap_err();
        assert!(matches!(err, RouteError::NoPath { .. }));
    }

    #[test]
    fn path_count_limits() {
        let svc = service();
        let o = GeoPoint::new(12.980, 77.580);
        let d = GeoPoint::new(12.980, 77.600);
        for k in [0, svc.config().max_k + 1] {
            let err = svc.k_shortest_routes(o, d, k).unwrap_err();
            assert!(err.is_client_error(), "k={k} gave {err:?}");
        }
        assert!(svc.k_shortest_routes(o, d, svc.config().max_k).is_ok());
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let svc = service();
        let good = GeoPoint::new(12.980, 77.580);
        for bad in [
            GeoPoint::new(f64::NAN, 77.58),
            GeoPoint::new(12.98, f64::INFINITY),
            GeoPoint::new(-91.0, 77.58),
            GeoPoint::new(12.98, 181.0),
        ] {
            let err = svc.shortest_route(good, bad).unwrap_err();
            assert_eq!(err.kind(), "invalid_argument", "{bad:?}");
        }
    }

    #[test]
    fn repeated_queries_are_identical() {
        let svc = service();
        let o = GeoPoint::new(12.9802, 77.5811);
        let d = GeoPoint::new(12.9703, 77.5994);
        let first = svc.routes(o, d, Some(4)).unwrap();
        for _ in 0..5 {
            assert_eq!(svc.routes(o, d, Some(4)).unwrap(), first);
        }
    }

    #[test]
    fn batch_keeps_input_order() {
        let svc = service();
        let queries = [
            RouteQuery {
                origin: GeoPoint::new(12.980, 77.580),
                destination: GeoPoint::new(12.980, 77.600),
                k: Some(1),
            },
            RouteQuery {
                origin: GeoPoint::new(12.980, 77.580),
                destination: GeoPoint::new(12.900, 77.710),
                k: None,
            },
            RouteQuery {
                origin: GeoPoint::new(12.970, 77.600),
                destination: GeoPoint::new(12.970, 77.580),
                k: Some(2),
            },
        ];
        let results = svc.route_many(&queries);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap()[0].nodes, vec![1, 2, 3]);
        assert!(matches!(results[1], Err(RouteError::NoPath { .. })));
        assert_eq!(results[2].as_ref().unwrap()[0].nodes, vec![4, 5]);
    }

    #[test]
    fn geometry_serializes_to_json() {
        let svc = service();
        let route = svc
            .shortest_route(GeoPoint::new(12.980, 77.580), GeoPoint::new(12.980, 77.590))
            .unwrap();
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["nodes"], serde_json::json!([1, 2]));
        assert_eq!(json["coordinates"][1], serde_json::json!([12.98, 77.59]));
        assert_eq!(json["weight"], serde_json::json!(1.0));
    }

    #[test]
    fn path_from_another_graph_is_an_error() {
        let svc = service();
        let (_, [a, ..]) = super::helpers::ring_graph();
        assert_eq!(svc.path_coordinates(&Path::trivial(a)).unwrap(), vec![[12.980, 77.580]]);

        let stray = Path::trivial(NodeId(500));
        let err = svc.path_coordinates(&stray).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
        assert!(svc.geometry(&stray).is_err());
    }

    #[test]
    fn service_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RouteService>();
    }
}

// ── Request validation driven by config ───────────────────────────────────────

#[cfg(test)]
mod limits {
    use rn_core::{BoundingBox, GeoPoint};

    use crate::{RouteConfig, RouteService};

    #[test]
    fn points_outside_bounds_are_rejected() {
        let (graph, _) = super::helpers::ring_graph();
        let config = RouteConfig {
            bounds: Some(BoundingBox::from_corners(
                GeoPoint::new(13.2827, 77.0849),
                GeoPoint::new(12.6933, 78.1602),
            )),
            ..RouteConfig::default()
        };
        let svc = RouteService::new(graph, config).unwrap();

        let inside = GeoPoint::new(12.980, 77.580);
        let delhi = GeoPoint::new(28.61, 77.20);
        assert!(svc.snap(inside).is_ok());
        let err = svc.shortest_route(inside, delhi).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn far_snaps_are_rejected() {
        let (graph, [a, ..]) = super::helpers::ring_graph();
        let config = RouteConfig { max_snap_distance_m: Some(200.0), ..RouteConfig::default() };
        let svc = RouteService::new(graph, config).unwrap();

        // ~110 m north of A.
        assert_eq!(svc.snap(GeoPoint::new(12.981, 77.580)).unwrap(), a);
        // ~1.1 km north of A.
        let err = svc.snap(GeoPoint::new(12.990, 77.580)).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn invalid_config_stops_startup() {
        let (graph, _) = super::helpers::ring_graph();
        let config = RouteConfig { default_k: 0, ..RouteConfig::default() };
        let err = RouteService::new(graph, config).err().unwrap();
        assert_eq!(err.kind(), "config");
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::io::Write;

    use crate::{RouteConfig, RouteError};

    #[test]
    fn empty_object_is_default() {
        assert_eq!(RouteConfig::from_json_str("{}").unwrap(), RouteConfig::default());
    }

    #[test]
    fn parses_every_field() {
        let cfg = RouteConfig::from_json_str(
            r#"{
                "default_k": 2,
                "max_k": 5,
                "bounds": { "south": 12.6933, "west": 77.0849, "north": 13.2827, "east": 78.1602 },
                "max_snap_distance_m": 500.0
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.default_k, 2);
        assert_eq!(cfg.max_k, 5);
        assert_eq!(cfg.bounds.unwrap().north, 13.2827);
        assert_eq!(cfg.max_snap_distance_m, Some(500.0));
    }

    #[test]
    fn inconsistent_values_are_rejected() {
        for bad in [
            r#"{ "default_k": 0 }"#,
            r#"{ "default_k": 4, "max_k": 2 }"#,
            r#"{ "max_snap_distance_m": -1.0 }"#,
            r#"{ "bounds": { "south": 13.0, "west": 77.0, "north": 12.0, "east": 78.0 } }"#,
            r#"{ "default_k": "three" }"#,
        ] {
            assert!(
                matches!(RouteConfig::from_json_str(bad), Err(RouteError::Config(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "max_k": 7 }"#).unwrap();
        let cfg = RouteConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.max_k, 7);
        assert_eq!(cfg.default_k, 3);
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RouteConfig::from_json_file(&dir.path().join("route.json")).unwrap_err();
        assert!(matches!(err, RouteError::Config(_)));
    }
}

// ── Error mapping ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use rn_core::{CoordError, NodeId};
    use rn_graph::GraphLoadError;
    use rn_routing::RoutingError;
    use rn_spatial::SpatialError;

    use crate::RouteError;

    #[test]
    fn lower_errors_keep_their_kind() {
        assert_eq!(RouteError::from(SpatialError::Empty).kind(), "empty_index");
        assert_eq!(
            RouteError::from(SpatialError::InvalidCoordinate(CoordError::LatitudeOutOfRange(91.0)))
                .kind(),
            "invalid_argument"
        );
        assert_eq!(RouteError::from(GraphLoadError::Empty).kind(), "graph_load");
        assert_eq!(
            RouteError::from(RoutingError::NoPath { from: NodeId(0), to: NodeId(1) }).kind(),
            "no_path"
        );
        assert_eq!(RouteError::from(RoutingError::InvalidK(0)).kind(), "invalid_argument");
        assert_eq!(
            RouteError::from(RoutingError::NodeNotFound(NodeId(3))).kind(),
            "invalid_argument"
        );
    }
}
