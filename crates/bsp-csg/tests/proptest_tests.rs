//! Property-based tests for polygon and tree invariants using the `proptest` crate.

use std::f64::consts::{PI, TAU};

use proptest::prelude::*;

use bsp_csg::{BspTree, Cube, Cuttable, PLANE_EPSILON, Plane3D, Polygon, Split};
use nalgebra::{Point3, Vector3};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

/// Unit vector from spherical angles.
fn arb_direction() -> impl Strategy<Value = Vector3<f64>> {
    (0.0f64..TAU, 0.05f64..(PI - 0.05)).prop_map(|(theta, phi)| {
        Vector3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin())
    })
}

/// Regular polygon with 3 to 8 sides, arbitrary center, size and orientation.
fn arb_polygon() -> impl Strategy<Value = Polygon> {
    (arb_point(), arb_direction(), 0.5f64..5.0, 3usize..9, 0.0f64..TAU).prop_map(
        |(center, normal, radius, sides, phase)| {
            let seed = if normal.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
            let u = normal.cross(&seed).normalize();
            let v = normal.cross(&u);
            let points: Vec<Point3<f64>> = (0..sides)
                .map(|i| {
                    let angle = phase + TAU * i as f64 / sides as f64;
                    center + (u * angle.cos() + v * angle.sin()) * radius
                })
                .collect();
            Polygon::from_points(&points).unwrap()
        },
    )
}

fn arb_cube() -> impl Strategy<Value = (Point3<f64>, Vector3<f64>)> {
    (
        (-3.0f64..3.0, -3.0f64..3.0, -3.0f64..3.0),
        (0.5f64..3.0, 0.5f64..3.0, 0.5f64..3.0),
    )
        .prop_map(|((x, y, z), (w, h, d))| (Point3::new(x, y, z), Vector3::new(w, h, d)))
}

fn make_cube((center, size): (Point3<f64>, Vector3<f64>)) -> bsp_csg::Solid {
    Cube::new().with_center(center).with_size(size).build().unwrap()
}

// ---------------------------------------------------------------------------
// 1. Flipping twice restores a polygon exactly
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn flip_is_an_involution(polygon in arb_polygon()) {
        prop_assert_eq!(polygon.flipped().flipped(), polygon.clone());

        let flipped = polygon.flipped();
        prop_assert!((flipped.plane().normal() + polygon.plane().normal()).norm() < 1e-12);
        prop_assert!((flipped.area() - polygon.area()).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// 2. Splitting loses no area and keeps fragments on their side
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn split_conserves_area(
        polygon in arb_polygon(),
        normal in arb_direction(),
        shift in -6.0f64..6.0,
    ) {
        let offset = normal.dot(&polygon.centroid().coords) + shift;
        let plane = Plane3D::new(normal, offset).unwrap();
        let area = polygon.area();

        let pieces = match polygon.split(&plane, PLANE_EPSILON) {
            Split::Front(p) | Split::Back(p) | Split::CoplanarFront(p) | Split::CoplanarBack(p) => {
                vec![p]
            }
            Split::Spanning { front, back } => {
                if let Some(front) = &front {
                    for vertex in front.vertices() {
                        prop_assert!(plane.signed_distance(vertex.pos) > -PLANE_EPSILON);
                    }
                }
                if let Some(back) = &back {
                    for vertex in back.vertices() {
                        prop_assert!(plane.signed_distance(vertex.pos) < PLANE_EPSILON);
                    }
                }
                front.into_iter().chain(back).collect()
            }
        };

        let total: f64 = pieces.iter().map(Polygon::area).sum();
        prop_assert!(
            (total - area).abs() <= 1e-9 * area.max(1.0),
            "split area {} != original {}", total, area
        );
        for piece in &pieces {
            prop_assert_eq!(piece.plane(), polygon.plane());
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Inverting a tree twice restores its polygons
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn invert_is_an_involution(a in arb_cube(), b in arb_cube()) {
        let polygons: Vec<Polygon> = make_cube(a)
            .into_polygons()
            .into_iter()
            .chain(make_cube(b).into_polygons())
            .collect();
        let mut tree = BspTree::from_polygons(polygons).unwrap();
        let before = tree.all_polygons();

        tree.invert();
        prop_assert_eq!(tree.polygon_count(), before.len());
        tree.invert();

        prop_assert_eq!(tree.all_polygons(), before);
    }
}

// ---------------------------------------------------------------------------
// 4. Boolean results respect the operand centers
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn union_and_subtract_respect_centers(a in arb_cube(), b in arb_cube()) {
        let (center_a, center_b) = (a.0, b.0);
        let (solid_a, solid_b) = (make_cube(a), make_cube(b));

        let union = solid_a.union(&solid_b).unwrap();
        prop_assert!(union.contains_point(center_a).unwrap());
        prop_assert!(union.contains_point(center_b).unwrap());

        let difference = solid_a.subtract(&solid_b).unwrap();
        prop_assert!(!difference.contains_point(center_b).unwrap());
    }
}
