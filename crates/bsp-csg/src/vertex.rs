//! Polygon vertices carrying a position and a shading normal.

use nalgebra::{Point3, Vector3};

/// A polygon vertex.
///
/// The normal is orientation data only: it is negated when the owning
/// polygon flips and blended when an edge is split, but the BSP algorithms
/// never read it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in space.
    pub pos: Point3<f64>,
    /// Shading normal.
    pub normal: Vector3<f64>,
}

impl Vertex {
    /// Creates a vertex from a position and a normal.
    #[inline]
    pub fn new(pos: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { pos, normal }
    }

    /// Negates the normal. The position is unaffected.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Returns a copy with the normal negated.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            pos: self.pos,
            normal: -self.normal,
        }
    }

    /// Linearly blends position and normal towards `other` by `t`.
    ///
    /// Only used at plane crossings, where `t` lies in `[0, 1]`.
    pub fn interpolate(&self, other: &Vertex, t: f64) -> Self {
        Self {
            pos: self.pos + (other.pos - self.pos) * t,
            normal: self.normal.lerp(&other.normal, t),
        }
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(pos: Point3<f64>) -> Self {
        Self {
            pos,
            normal: Vector3::zeros(),
        }
    }
}
