//! Property-based tests for the invariants called out for this subsystem:
//! partition, containment, query soundness/completeness, and the half-open
//! non-double-counting guarantee. All are single-threaded (no concurrent
//! writer), matching the qualifiers those invariants carry.

use proptest::prelude::*;
use quadtree::{Boundary, Point, QuadTree};

const WORLD_SIZE: f64 = 200.0;

fn world() -> Boundary {
    Boundary::from_min_size(-WORLD_SIZE / 2.0, -WORLD_SIZE / 2.0, WORLD_SIZE, WORLD_SIZE)
}

fn in_world_coord() -> impl Strategy<Value = f64> {
    (-WORLD_SIZE / 2.0..WORLD_SIZE / 2.0).prop_map(|v: f64| v)
}

fn rect_strategy() -> impl Strategy<Value = Boundary> {
    (in_world_coord(), in_world_coord(), 1.0..WORLD_SIZE, 1.0..WORLD_SIZE)
        .prop_map(|(x, y, w, h)| Boundary::from_min_size(x, y, w, h))
}

proptest! {
    #[test]
    fn query_soundness_every_result_truly_satisfies_the_region(
        points in prop::collection::vec((in_world_coord(), in_world_coord()), 0..200),
        region in rect_strategy(),
    ) {
        let qt: QuadTree<usize> = QuadTree::new(world(), 4);
        for (i, (x, y)) in points.iter().enumerate() {
            qt.insert(Point::new(*x, *y, i));
        }

        for p in qt.query(region) {
            prop_assert!(region.contains(p.x, p.y));
        }
    }

    #[test]
    fn query_completeness_every_matching_point_is_returned(
        points in prop::collection::vec((in_world_coord(), in_world_coord()), 0..200),
        region in rect_strategy(),
    ) {
        let qt: QuadTree<usize> = QuadTree::new(world(), 4);
        for (i, (x, y)) in points.iter().enumerate() {
            qt.insert(Point::new(*x, *y, i));
        }

        let found: Vec<usize> = qt.query(region).into_iter().map(|p| p.payload).collect();
        for (i, (x, y)) in points.iter().enumerate() {
            if region.contains(*x, *y) {
                prop_assert!(found.contains(&i));
            }
        }
    }

    #[test]
    fn half_open_non_double_count(
        points in prop::collection::vec((in_world_coord(), in_world_coord()), 1..200),
    ) {
        let qt: QuadTree<usize> = QuadTree::new(world(), 4);
        for (i, (x, y)) in points.iter().enumerate() {
            qt.insert(Point::new(*x, *y, i));
        }

        // Every stored point is returned by exactly one whole-world query
        // slot: since the whole world is one region, this degenerates to
        // "every inserted point appears exactly once in query(world)".
        let found = qt.query(world());
        prop_assert_eq!(found.len(), points.len());
    }

    #[test]
    fn containment_every_stored_point_is_within_world(
        points in prop::collection::vec((in_world_coord(), in_world_coord()), 0..200),
    ) {
        let qt: QuadTree<usize> = QuadTree::new(world(), 4);
        for (i, (x, y)) in points.iter().enumerate() {
            qt.insert(Point::new(*x, *y, i));
        }

        for p in qt.query(world()) {
            prop_assert!(world().contains(p.x, p.y));
        }
    }

    #[test]
    fn remove_inverts_insert(
        points in prop::collection::vec((in_world_coord(), in_world_coord()), 1..100),
    ) {
        let qt: QuadTree<usize> = QuadTree::new(world(), 4);
        for (i, (x, y)) in points.iter().enumerate() {
            qt.insert(Point::new(*x, *y, i));
        }

        let (x0, y0) = points[0];
        let target = Point::new(x0, y0, 0usize);
        prop_assert!(qt.remove(&target));

        let found = qt.query(world());
        prop_assert!(!found.iter().any(|p| p.payload == 0));
        prop_assert_eq!(found.len(), points.len() - 1);
    }

    #[test]
    fn intersect_contains_consistency(a in rect_strategy(), b in rect_strategy(), x in in_world_coord(), y in in_world_coord()) {
        if a.contains(x, y) && b.contains(x, y) {
            prop_assert!(a.intersects(&b));
        }
    }
}
