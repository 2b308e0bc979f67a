//! Polygon splitting against a plane.

use tracing::trace;

use crate::{Classification, Plane3D, PlaneSide, Polygon, Vertex};

/// Where a polygon ends up after being split by a plane.
#[derive(Debug, Clone, PartialEq)]
pub enum Split {
    /// Coplanar and facing the same way as the plane.
    CoplanarFront(Polygon),
    /// Coplanar and facing away from the plane.
    CoplanarBack(Polygon),
    /// Entirely in front of the plane.
    Front(Polygon),
    /// Entirely behind the plane.
    Back(Polygon),
    /// Cut in two. A side is `None` when its fragment had fewer than 3 vertices.
    Spanning {
        /// Part on the front side of the plane.
        front: Option<Polygon>,
        /// Part on the back side of the plane.
        back: Option<Polygon>,
    },
}

/// Trait for geometry that can be cut by a plane.
pub trait Cuttable {
    /// Classifies the geometry against `plane` and cuts it if it spans the plane.
    ///
    /// Vertices closer than `epsilon` to the plane count as on it.
    ///
    /// # Return values by classification
    ///
    /// - **Coplanar**: `CoplanarFront` or `CoplanarBack`, decided by the
    ///   orientation of the polygon's own plane, not its position
    /// - **Front** / **Back**: the whole polygon, unchanged
    /// - **Spanning**: `Spanning { front, back }` with the two fragments
    fn split(&self, plane: &Plane3D, epsilon: f64) -> Split;
}

impl Cuttable for Polygon {
    fn split(&self, plane: &Plane3D, epsilon: f64) -> Split {
        match self.classify(plane, epsilon) {
            Classification::Coplanar => {
                if plane.normal().dot(&self.plane().normal()) > 0.0 {
                    Split::CoplanarFront(self.clone())
                } else {
                    Split::CoplanarBack(self.clone())
                }
            }
            Classification::Front => Split::Front(self.clone()),
            Classification::Back => Split::Back(self.clone()),
            Classification::Spanning => split_polygon(self, plane, epsilon),
        }
    }
}

/// Splits a spanning polygon into front and back parts.
///
/// Uses a variant of the Sutherland-Hodgman algorithm:
/// walks the polygon edges and builds two vertex lists,
/// adding intersection points when edges cross the plane.
fn split_polygon(polygon: &Polygon, plane: &Plane3D, epsilon: f64) -> Split {
    let vertices = polygon.vertices();
    let n = vertices.len();
    let sides: Vec<PlaneSide> = vertices
        .iter()
        .map(|v| plane.classify_point_with_epsilon(v.pos, epsilon))
        .collect();

    let mut front_verts: Vec<Vertex> = Vec::with_capacity(n + 1);
    let mut back_verts: Vec<Vertex> = Vec::with_capacity(n + 1);

    for i in 0..n {
        let j = (i + 1) % n;
        let current = &vertices[i];
        let current_side = sides[i];
        let next_side = sides[j];

        // On-plane vertices go to both sides
        if current_side != PlaneSide::Back {
            front_verts.push(*current);
        }
        if current_side != PlaneSide::Front {
            back_verts.push(*current);
        }

        // Only a strict front/back pair crosses; on-plane endpoints never do
        let crosses = matches!(
            (current_side, next_side),
            (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
        );

        if crosses {
            let next = &vertices[j];
            let t = plane.crossing_parameter(current.pos, next.pos);
            let intersection = current.interpolate(next, t);
            front_verts.push(intersection);
            back_verts.push(intersection);
        }
    }

    Split::Spanning {
        front: into_fragment(front_verts, polygon),
        back: into_fragment(back_verts, polygon),
    }
}

fn into_fragment(vertices: Vec<Vertex>, parent: &Polygon) -> Option<Polygon> {
    if vertices.len() >= 3 {
        Some(Polygon::from_parts(vertices, *parent.plane()))
    } else {
        trace!(vertices = vertices.len(), "dropping degenerate split fragment");
        None
    }
}
