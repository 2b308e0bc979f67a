//! Plane representation and classification for BSP trees.

use std::ops::BitOr;

use nalgebra::{Point3, Vector3};

use crate::{CsgError, CsgResult, PLANE_EPSILON};

/// Position of a single point relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Further than epsilon on the normal's side
    Front,
    /// Further than epsilon on the other side
    Back,
    /// Within epsilon of the plane
    OnPlane,
}

/// Classification of a polygon relative to a plane.
///
/// Classifications combine like bit sets (`Coplanar = 0`, `Front = 1`,
/// `Back = 2`, `Spanning = 3`), so the classification of a polygon is the
/// `|` of its vertex classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All vertices are on the plane
    Coplanar,
    /// No vertex is behind the plane and at least one is in front
    Front,
    /// No vertex is in front of the plane and at least one is behind
    Back,
    /// Vertices are on both sides
    Spanning,
}

impl Classification {
    #[inline]
    fn bits(self) -> u8 {
        match self {
            Self::Coplanar => 0,
            Self::Front => 1,
            Self::Back => 2,
            Self::Spanning => 3,
        }
    }

    #[inline]
    fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Self::Coplanar,
            1 => Self::Front,
            2 => Self::Back,
            _ => Self::Spanning,
        }
    }
}

impl BitOr for Classification {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits(self.bits() | rhs.bits())
    }
}

impl From<PlaneSide> for Classification {
    #[inline]
    fn from(side: PlaneSide) -> Self {
        match side {
            PlaneSide::Front => Self::Front,
            PlaneSide::Back => Self::Back,
            PlaneSide::OnPlane => Self::Coplanar,
        }
    }
}

/// An oriented plane: the points `p` with `normal · p = offset`.
///
/// The normal is always unit length. Its side of the plane is the front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f64>,
    offset: f64,
}

impl Plane3D {
    /// Plane with the given normal and offset, both rescaled so the normal
    /// has unit length.
    ///
    /// Fails with [`CsgError::DegeneratePlane`] if the normal has zero length.
    pub fn new(normal: Vector3<f64>, offset: f64) -> CsgResult<Self> {
        let norm = normal.norm();
        if !norm.is_finite() || norm <= f64::EPSILON || !offset.is_finite() {
            return Err(CsgError::DegeneratePlane);
        }
        Ok(Self {
            normal: normal / norm,
            offset: offset / norm,
        })
    }

    /// Plane through `point` facing along `normal` (need not be unit length).
    pub fn from_point_and_normal(point: Point3<f64>, normal: Vector3<f64>) -> CsgResult<Self> {
        let norm = normal.norm();
        if !norm.is_finite() || norm <= f64::EPSILON {
            return Err(CsgError::DegeneratePlane);
        }
        let unit_normal = normal / norm;
        let offset = unit_normal.dot(&point.coords);
        if !offset.is_finite() {
            return Err(CsgError::DegeneratePlane);
        }
        Ok(Self {
            normal: unit_normal,
            offset,
        })
    }

    /// Plane through `a`, `b` and `c`, front side towards `(b - a) × (c - a)`.
    /// Counter-clockwise points therefore face the viewer.
    ///
    /// Fails with [`CsgError::DegeneratePlane`] when the points are collinear
    /// or coincident relative to the length of the two edges.
    pub fn from_three_points(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> CsgResult<Self> {
        let ab = b - a;
        let ac = c - a;
        let normal = ab.cross(&ac);
        let norm = normal.norm();
        if norm.is_nan() || norm <= f64::EPSILON * ab.norm() * ac.norm() {
            return Err(CsgError::DegeneratePlane);
        }
        Self::from_point_and_normal(a, normal)
    }

    /// Unit normal, pointing to the front side.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Offset `W` in `normal · p = W`.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Distance from the plane, positive in front and negative behind.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// [`classify_point_with_epsilon`](Self::classify_point_with_epsilon) with `PLANE_EPSILON`.
    #[inline]
    pub fn classify_point(&self, point: Point3<f64>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Front or back if the point is further than `epsilon` from the plane,
    /// otherwise on it.
    pub fn classify_point_with_epsilon(&self, point: Point3<f64>, epsilon: f64) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Reverses the half-space sense of the plane.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.offset = -self.offset;
    }

    /// Flipped copy.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Closest point on the plane.
    #[inline]
    pub fn project_point(&self, point: Point3<f64>) -> Point3<f64> {
        point - self.normal * self.signed_distance(point)
    }

    /// Parameter along `start → end` at which the segment meets the plane.
    ///
    /// Unchecked: the caller guarantees the endpoints lie on opposite sides,
    /// so the denominator is non-zero and the result lies in `[0, 1]`.
    #[inline]
    pub(crate) fn crossing_parameter(&self, start: Point3<f64>, end: Point3<f64>) -> f64 {
        (self.offset - self.normal.dot(&start.coords)) / self.normal.dot(&(end - start))
    }

    /// Where the segment `start → end` meets the plane, as the parameter
    /// `t` in `[0, 1]` and the point itself.
    ///
    /// `None` for segments parallel to the plane or ending short of it.
    pub fn intersect_segment(
        &self,
        start: Point3<f64>,
        end: Point3<f64>,
    ) -> Option<(f64, Point3<f64>)> {
        let direction = end - start;
        let denom = self.normal.dot(&direction);

        // Parallel
        if denom.abs() < f64::EPSILON {
            return None;
        }

        let t = (self.offset - self.normal.dot(&start.coords)) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some((t, start + direction * t))
    }
}
