//! Unit tests for rn-spatial.

#[cfg(test)]
mod helpers {
    use rn_core::GeoPoint;
    use rn_graph::{GraphStore, GraphStoreBuilder};

    /// Nodes (lat, lon):
    ///   0:(0,0)  1:(0,1)  2:(0,2)
    ///   3:(1,0)           4:(1,2)
    pub fn grid_graph() -> GraphStore {
        let mut b = GraphStoreBuilder::new();
        b.add_node(0, GeoPoint::new(0.0, 0.0));
        b.add_node(1, GeoPoint::new(0.0, 1.0));
        b.add_node(2, GeoPoint::new(0.0, 2.0));
        b.add_node(3, GeoPoint::new(1.0, 0.0));
        b.add_node(4, GeoPoint::new(1.0, 2.0));
        b.build().unwrap()
    }
}

#[cfg(test)]
mod snap {
    use rn_core::{GeoPoint, NodeId};
    use crate::{SpatialError, SpatialIndex};

    #[test]
    fn exact_position() {
        let idx = SpatialIndex::build(&super::helpers::grid_graph()).unwrap();
        assert_eq!(idx.len(), 5);
        assert_eq!(idx.nearest_point(GeoPoint::new(0.0, 0.0)), Ok(NodeId(0)));
        let (id, d) = idx.nearest_with_distance(GeoPoint::new(1.0, 2.0)).unwrap();
        assert_eq!(id, NodeId(4));
        assert!(d < 1e-6);
    }

    #[test]
    fn nearest_takes_longitude_first() {
        let idx = SpatialIndex::build(&super::helpers::grid_graph()).unwrap();
        // lon=2, lat=1 → node 4; swapping the arguments would land near node 1.
        assert_eq!(idx.nearest(2.0, 1.0), Ok(NodeId(4)));
        assert_eq!(idx.nearest(1.0, 0.1), Ok(NodeId(1)));
    }

    #[test]
    fn snap_to_closer_neighbour() {
        let idx = SpatialIndex::build(&super::helpers::grid_graph()).unwrap();
        assert_eq!(idx.nearest_point(GeoPoint::new(0.0, 0.4)), Ok(NodeId(0)));
        assert_eq!(idx.nearest_point(GeoPoint::new(0.0, 0.6)), Ok(NodeId(1)));
    }

    #[test]
    fn empty_point_set_is_rejected() {
        let err = SpatialIndex::from_points(std::iter::empty()).unwrap_err();
        assert_eq!(err, SpatialError::Empty);
    }

    #[test]
    fn equidistant_tie_resolves_to_lower_id() {
        let idx = SpatialIndex::from_points([
            (NodeId(5), GeoPoint::new(0.0, 1.0)),
            (NodeId(2), GeoPoint::new(0.0, -1.0)),
            (NodeId(9), GeoPoint::new(3.0, 0.0)),
        ])
        .unwrap();
        assert_eq!(idx.nearest(0.0, 0.0), Ok(NodeId(2)));
        assert_eq!(idx.nearest_linear(GeoPoint::new(0.0, 0.0)).unwrap().0, NodeId(2));
    }

    #[test]
    fn duplicate_coordinates_stay_distinct() {
        let idx = SpatialIndex::from_points([
            (NodeId(3), GeoPoint::new(12.97, 77.59)),
            (NodeId(1), GeoPoint::new(12.97, 77.59)),
            (NodeId(2), GeoPoint::new(12.99, 77.61)),
        ])
        .unwrap();
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.nearest(77.59, 12.97), Ok(NodeId(1)));
        assert_eq!(idx.k_nearest(GeoPoint::new(12.97, 77.59), 2).unwrap(), vec![NodeId(1), NodeId(3)]);
    }

    #[test]
    fn k_nearest_order() {
        let idx = SpatialIndex::build(&super::helpers::grid_graph()).unwrap();
        let nearest = idx.k_nearest(GeoPoint::new(0.0, 0.0), 3).unwrap();
        assert_eq!(nearest[0], NodeId(0));
        // Node 1 (0,1) and node 3 (1,0) are not equidistant once longitude is
        // scaled by cos φ0, so only check membership.
        assert!(nearest[1..].contains(&NodeId(1)));
        assert!(nearest[1..].contains(&NodeId(3)));
        assert!(idx.k_nearest(GeoPoint::new(0.0, 0.0), 0).unwrap().is_empty());
        assert_eq!(idx.k_nearest(GeoPoint::new(0.0, 0.0), 50).unwrap().len(), 5);
    }

    #[test]
    fn nan_and_infinite_queries_return_errors() {
        let idx = SpatialIndex::build(&super::helpers::grid_graph()).unwrap();
        for (lon, lat) in [
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 0.0),
            (0.0, f64::NEG_INFINITY),
        ] {
            assert!(
                matches!(idx.nearest(lon, lat), Err(SpatialError::InvalidCoordinate(_))),
                "lon={lon} lat={lat}"
            );
            let pos = GeoPoint::new(lat, lon);
            assert!(idx.nearest_with_distance(pos).is_err());
            assert!(idx.nearest_linear(pos).is_err());
            assert!(idx.k_nearest(pos, 3).is_err());
        }
        // The index still answers valid queries afterwards.
        assert_eq!(idx.nearest(0.0, 0.0), Ok(NodeId(0)));
    }

    #[test]
    fn out_of_range_queries_return_errors() {
        let idx = SpatialIndex::build(&super::helpers::grid_graph()).unwrap();
        assert!(matches!(idx.nearest(0.0, 91.0), Err(SpatialError::InvalidCoordinate(_))));
        assert!(matches!(idx.nearest(-181.0, 0.0), Err(SpatialError::InvalidCoordinate(_))));
    }

    #[test]
    fn invalid_point_is_rejected_at_build() {
        let err = SpatialIndex::from_points([
            (NodeId(0), GeoPoint::new(0.0, 0.0)),
            (NodeId(1), GeoPoint::new(f64::NAN, 0.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, SpatialError::InvalidNode { node: NodeId(1), .. }), "got {err:?}");
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpatialIndex>();
    }
}

// ── Agreement with the linear scan ───────────────────────────────────────────

#[cfg(test)]
mod oracle {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use rn_core::{GeoPoint, NodeId};
    use crate::SpatialIndex;

    #[test]
    fn rtree_matches_linear_scan_on_random_points() {
        let mut rng = SmallRng::seed_from_u64(7);
        // Bengaluru-sized box.
        let points: Vec<(NodeId, GeoPoint)> = (0..2_000u32)
            .map(|i| {
                let lat = rng.gen_range(12.69..13.28);
                let lon = rng.gen_range(77.08..78.16);
                (NodeId(i), GeoPoint::new(lat, lon))
            })
            .collect();
        let idx = SpatialIndex::from_points(points.iter().copied()).unwrap();

        for _ in 0..500 {
            let q = GeoPoint::new(rng.gen_range(12.6..13.4), rng.gen_range(77.0..78.3));
            let fast = idx.nearest_with_distance(q).unwrap();
            let slow = idx.nearest_linear(q).unwrap();
            assert_eq!(fast, slow, "query {q}");
        }
    }

    #[test]
    fn snapping_grid_with_many_ties() {
        // Lattice with queries at cell centres: four near-equidistant nodes
        // per query, so both paths must apply the same (distance, id) order.
        let mut points = Vec::new();
        let mut id = 0;
        for lat in 0..10 {
            for lon in 0..10 {
                points.push((NodeId(id), GeoPoint::new(lat as f64 * 0.001, lon as f64 * 0.001)));
                id += 1;
            }
        }
        let idx = SpatialIndex::from_points(points).unwrap();
        for lat in 0..9 {
            for lon in 0..9 {
                let q = GeoPoint::new((lat as f64 + 0.5) * 0.001, (lon as f64 + 0.5) * 0.001);
                assert_eq!(idx.nearest_with_distance(q), idx.nearest_linear(q));
            }
        }
    }

    #[test]
    fn repeated_queries_are_identical() {
        let mut rng = SmallRng::seed_from_u64(99);
        let points: Vec<(NodeId, GeoPoint)> = (0..300u32)
            .map(|i| (NodeId(i), GeoPoint::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))))
            .collect();
        let idx = SpatialIndex::from_points(points).unwrap();
        let q = GeoPoint::new(0.123, -0.456);
        let first = idx.nearest_with_distance(q).unwrap();
        for _ in 0..10 {
            assert_eq!(idx.nearest_with_distance(q).unwrap(), first);
        }
    }
}
