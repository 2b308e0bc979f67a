//! Convex polygon representation for BSP trees.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::{Classification, CsgError, CsgResult, PLANE_EPSILON, Plane3D, Vertex};

/// Tolerance on the total turning angle of a convex loop (one full turn).
const TURNING_TOLERANCE: f64 = 1e-6;

/// A convex polygon in 3D space: an ordered vertex loop plus the plane it lies on.
///
/// Vertices are coplanar and in counter-clockwise winding order when viewed
/// from the front (the direction the plane normal points). The plane is
/// computed once, from the first three vertices, and carried along by every
/// fragment split off this polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    plane: Plane3D,
}

impl Polygon {
    /// Creates a new polygon from a list of vertices, validated with the
    /// default `PLANE_EPSILON`.
    ///
    /// Fails with [`CsgError::MalformedPolygon`] if fewer than 3 vertices are
    /// given, a coordinate is not finite, a vertex lies off the plane of the
    /// first three, or the loop is not convex and simple. Fails with
    /// [`CsgError::DegeneratePlane`] if the first three vertices are collinear.
    pub fn new(vertices: Vec<Vertex>) -> CsgResult<Self> {
        Self::new_with_epsilon(vertices, PLANE_EPSILON)
    }

    /// Creates a new polygon, validating coplanarity and convexity with a
    /// custom epsilon.
    pub fn new_with_epsilon(vertices: Vec<Vertex>, epsilon: f64) -> CsgResult<Self> {
        if vertices.len() < 3 {
            return Err(CsgError::malformed(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(index) = vertices
            .iter()
            .position(|v| !v.pos.iter().all(|c| c.is_finite()))
        {
            return Err(CsgError::malformed(format!(
                "vertex {index} has a non-finite coordinate"
            )));
        }

        let plane = Plane3D::from_three_points(vertices[0].pos, vertices[1].pos, vertices[2].pos)?;

        if let Some(index) = vertices[3..]
            .iter()
            .position(|v| plane.signed_distance(v.pos).abs() > epsilon)
        {
            return Err(CsgError::malformed(format!(
                "vertex {} is not coplanar with the first three",
                index + 3
            )));
        }

        check_convex(&vertices, &plane.normal(), epsilon)?;

        Ok(Self { vertices, plane })
    }

    /// Creates a polygon from positions only, with zero vertex normals.
    pub fn from_points(points: &[Point3<f64>]) -> CsgResult<Self> {
        Self::new(points.iter().copied().map(Vertex::from).collect())
    }

    /// Builds a fragment that reuses a known plane. No validation.
    pub(crate) fn from_parts(vertices: Vec<Vertex>, plane: Plane3D) -> Self {
        Self { vertices, plane }
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the plane that this polygon lies on.
    #[inline]
    pub fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices (always false for valid polygons).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Reverses the polygon's front/back sense.
    ///
    /// Reverses the vertex order, flips every vertex normal and flips the
    /// plane, so winding and plane normal keep agreeing.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    /// Returns a flipped copy of this polygon.
    pub fn flipped(&self) -> Self {
        let mut polygon = self.clone();
        polygon.flip();
        polygon
    }

    /// Computes the centroid (vertex average) of the polygon.
    pub fn centroid(&self) -> Point3<f64> {
        let sum: Vector3<f64> = self.vertices.iter().map(|v| v.pos.coords).sum();
        Point3::from(sum / self.vertices.len() as f64)
    }

    /// Computes the area of the polygon by fan triangulation.
    pub fn area(&self) -> f64 {
        let origin = self.vertices[0].pos;
        let twice: Vector3<f64> = self
            .vertices
            .windows(2)
            .skip(1)
            .map(|pair| (pair[0].pos - origin).cross(&(pair[1].pos - origin)))
            .sum();
        twice.dot(&self.plane.normal()).abs() * 0.5
    }

    /// Classifies this polygon relative to a plane.
    ///
    /// Returns:
    /// - `Front` if no vertex is behind the plane and one is in front
    /// - `Back` if no vertex is in front of the plane and one is behind
    /// - `Coplanar` if all vertices lie on the plane
    /// - `Spanning` if vertices are on both sides
    pub fn classify(&self, plane: &Plane3D, epsilon: f64) -> Classification {
        self.vertices
            .iter()
            .map(|v| Classification::from(plane.classify_point_with_epsilon(v.pos, epsilon)))
            .fold(Classification::Coplanar, |acc, c| acc | c)
    }
}

/// Rejects loops that turn backwards against the normal or wind more than once.
fn check_convex(vertices: &[Vertex], normal: &Vector3<f64>, epsilon: f64) -> CsgResult<()> {
    let n = vertices.len();
    let longest = (0..n)
        .map(|i| (vertices[(i + 1) % n].pos - vertices[i].pos).norm())
        .fold(0.0, f64::max);
    let mut turning = 0.0;

    for i in 0..n {
        let a = vertices[i].pos;
        let b = vertices[(i + 1) % n].pos;
        let c = vertices[(i + 2) % n].pos;
        let incoming = b - a;
        let outgoing = c - b;

        // Zero relative to the polygon's own size; small polygons are fine.
        if incoming.norm() <= f64::EPSILON * longest {
            return Err(CsgError::malformed(format!(
                "edge {i} has zero length"
            )));
        }

        let turn = incoming.cross(&outgoing).dot(normal);
        if turn < -epsilon * incoming.norm() * outgoing.norm() {
            return Err(CsgError::malformed(format!(
                "vertex {} is a reflex corner",
                (i + 1) % n
            )));
        }
        turning += turn.atan2(incoming.dot(&outgoing));
    }

    if (turning - TAU).abs() > TURNING_TOLERANCE {
        return Err(CsgError::malformed("vertex loop is not simple"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_polygon(points: &[[f64; 3]]) -> CsgResult<Polygon> {
        let points: Vec<Point3<f64>> = points
            .iter()
            .map(|p| Point3::new(p[0], p[1], p[2]))
            .collect();
        Polygon::from_points(&points)
    }

    fn unit_square() -> Polygon {
        make_polygon(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn plane_comes_from_first_three_vertices() {
        let square = unit_square();
        assert_relative_eq!(square.plane().normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(square.plane().offset(), 0.0);
        assert_eq!(square.len(), 4);
        assert!(!square.is_empty());
    }

    #[test]
    fn too_few_vertices_is_malformed() {
        let result = make_polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!(matches!(result, Err(CsgError::MalformedPolygon { .. })));
    }

    #[test]
    fn collinear_start_is_degenerate() {
        let result = make_polygon(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        assert_eq!(result, Err(CsgError::DegeneratePlane));
    }

    #[test]
    fn non_coplanar_vertex_is_malformed() {
        let result = make_polygon(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.5],
            [0.0, 1.0, 0.0],
        ]);
        assert!(matches!(result, Err(CsgError::MalformedPolygon { .. })));
    }

    #[test]
    fn reflex_corner_is_malformed() {
        // Arrow head: vertex 2 points inward.
        let result = make_polygon(&[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [1.0, 0.5, 0.0],
            [2.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
        ]);
        assert!(matches!(result, Err(CsgError::MalformedPolygon { .. })));
    }

    #[test]
    fn pentagram_is_malformed() {
        let points: Vec<[f64; 3]> = (0..5)
            .map(|i| {
                let angle = (i * 2) as f64 * TAU / 5.0;
                [angle.cos(), angle.sin(), 0.0]
            })
            .collect();
        assert!(matches!(
            make_polygon(&points),
            Err(CsgError::MalformedPolygon { .. })
        ));
    }

    #[test]
    fn repeated_vertex_is_malformed() {
        let result = make_polygon(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ]);
        assert!(matches!(result, Err(CsgError::MalformedPolygon { .. })));
    }

    #[test]
    fn flip_twice_restores_polygon() {
        let mut square = unit_square();
        let original = square.clone();

        square.flip();
        assert_relative_eq!(square.plane().normal(), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(square.vertices()[0].pos, original.vertices()[3].pos);

        square.flip();
        assert_eq!(square, original);
    }

    #[test]
    fn flipped_winding_matches_flipped_plane() {
        let flipped = unit_square().flipped();
        let recomputed = Plane3D::from_three_points(
            flipped.vertices()[0].pos,
            flipped.vertices()[1].pos,
            flipped.vertices()[2].pos,
        )
        .unwrap();
        assert_relative_eq!(recomputed.normal(), flipped.plane().normal());
    }

    #[test]
    fn centroid_and_area() {
        let square = unit_square();
        assert_relative_eq!(square.centroid(), Point3::new(0.5, 0.5, 0.0));
        assert_relative_eq!(square.area(), 1.0);

        let triangle = make_polygon(&[[0.0, 0.0, 3.0], [4.0, 0.0, 3.0], [0.0, 2.0, 3.0]]).unwrap();
        assert_relative_eq!(triangle.area(), 4.0);
    }

    #[test]
    fn classify_against_planes() {
        let square = unit_square();
        let eps = PLANE_EPSILON;

        let below = Plane3D::new(Vector3::new(0.0, 0.0, 1.0), -1.0).unwrap();
        assert_eq!(square.classify(&below, eps), Classification::Front);

        let above = Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 1.0).unwrap();
        assert_eq!(square.classify(&above, eps), Classification::Back);

        assert_eq!(square.classify(square.plane(), eps), Classification::Coplanar);

        let through = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 0.5).unwrap();
        assert_eq!(square.classify(&through, eps), Classification::Spanning);

        // Touching the plane along an edge still counts as one side.
        let edge = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 1.0).unwrap();
        assert_eq!(square.classify(&edge, eps), Classification::Back);
    }

    #[test]
    fn small_polygons_are_accepted() {
        let tiny = make_polygon(&[
            [0.0, 0.0, 0.0],
            [1e-5, 0.0, 0.0],
            [1e-5, 1e-5, 0.0],
            [0.0, 1e-5, 0.0],
        ])
        .unwrap();
        assert_relative_eq!(tiny.area(), 1e-10, epsilon = 1e-22);

        let points: Vec<Vertex> = tiny.vertices().to_vec();
        assert_eq!(Polygon::new_with_epsilon(points, 1e-9).unwrap(), tiny);
    }

    #[test]
    fn repeated_straight_vertex_is_malformed() {
        // Turning angles alone cannot see a duplicate on a straight edge.
        let result = make_polygon(&[
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.5, 0.0, 0.0],
            [0.5, 0.0, 0.0],
            [1.0, 0.0, 0.0],
        ]);
        assert!(matches!(result, Err(CsgError::MalformedPolygon { .. })));
    }
}
