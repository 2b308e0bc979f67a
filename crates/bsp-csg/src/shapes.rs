//! Primitive solids: cubes, spheres and cylinders.
//!
//! Each primitive is a small builder with defaults matching a unit-ish shape
//! around the origin. Setters consume and return the builder:
//!
//! ```ignore
//! use bsp_csg::{Cube, Sphere};
//! use nalgebra::Point3;
//!
//! let cube = Cube::new().with_center(Point3::new(1.0, 0.0, 0.0)).build()?;
//! let ball = Sphere::new().with_radius(1.3).with_slices(24).build()?;
//! let rounded = cube.intersect(&ball)?;
//! ```

use std::f64::consts::{PI, TAU};

use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument};

use crate::{CsgConfig, CsgError, CsgResult, Polygon, Solid, Vertex};

/// An axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    center: Point3<f64>,
    size: Vector3<f64>,
}

impl Default for Cube {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            size: Vector3::new(2.0, 2.0, 2.0),
        }
    }
}

impl Cube {
    /// A 2x2x2 cube centered on the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the center point.
    pub fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Sets the edge lengths along x, y and z.
    pub fn with_size(mut self, size: Vector3<f64>) -> Self {
        self.size = size;
        self
    }

    /// Sets all three edge lengths to `size`.
    pub fn with_uniform_size(self, size: f64) -> Self {
        self.with_size(Vector3::repeat(size))
    }

    /// Generates the six outward-facing quads.
    pub fn build(&self) -> CsgResult<Solid> {
        self.build_with(&CsgConfig::default())
    }

    /// [`build`](Self::build), validating the faces with `config.epsilon`.
    #[instrument(skip_all, fields(center = ?[self.center.x, self.center.y, self.center.z]))]
    pub fn build_with(&self, config: &CsgConfig) -> CsgResult<Solid> {
        config.validate()?;
        check_point("center", &self.center)?;
        for (axis, &length) in ["x", "y", "z"].iter().zip(self.size.iter()) {
            check_positive(&format!("size.{axis}"), length)?;
        }

        // Corner index bits select min (0) or max (1) along x, y, z.
        const FACES: [([usize; 4], [f64; 3]); 6] = [
            ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
            ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
            ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
            ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
            ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
            ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
        ];

        let half = self.size / 2.0;
        let sign = |corner: usize, bit: usize| if corner & bit == 0 { -1.0 } else { 1.0 };

        let polygons = FACES
            .iter()
            .map(|(corners, normal)| {
                let normal = Vector3::from(*normal);
                let vertices = corners
                    .iter()
                    .map(|&corner| {
                        let offset = Vector3::new(
                            half.x * sign(corner, 1),
                            half.y * sign(corner, 2),
                            half.z * sign(corner, 4),
                        );
                        Vertex::new(self.center + offset, normal)
                    })
                    .collect();
                Polygon::new_with_epsilon(vertices, config.epsilon)
            })
            .collect::<CsgResult<Vec<_>>>()?;

        debug!(polygons = polygons.len(), "created cube");
        Ok(Solid::from_polygons(polygons))
    }
}

/// A latitude/longitude tessellated sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3<f64>,
    radius: f64,
    slices: usize,
    stacks: usize,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            radius: 1.0,
            slices: 16,
            stacks: 8,
        }
    }
}

impl Sphere {
    /// A unit sphere on the origin with 16 slices and 8 stacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the center point.
    pub fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Sets the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the number of subdivisions around the polar axis (at least 3).
    pub fn with_slices(mut self, slices: usize) -> Self {
        self.slices = slices;
        self
    }

    /// Sets the number of subdivisions from pole to pole (at least 2).
    pub fn with_stacks(mut self, stacks: usize) -> Self {
        self.stacks = stacks;
        self
    }

    /// Generates `slices * stacks` polygons: triangles touching the poles,
    /// quads in between. Vertex normals point away from the center.
    pub fn build(&self) -> CsgResult<Solid> {
        self.build_with(&CsgConfig::default())
    }

    /// [`build`](Self::build), validating the faces with `config.epsilon`.
    #[instrument(skip_all, fields(radius = self.radius, slices = self.slices, stacks = self.stacks))]
    pub fn build_with(&self, config: &CsgConfig) -> CsgResult<Solid> {
        config.validate()?;
        check_point("center", &self.center)?;
        check_positive("radius", self.radius)?;
        check_min_count("slices", self.slices, 3)?;
        check_min_count("stacks", self.stacks, 2)?;

        let slices = self.slices as f64;
        let stacks = self.stacks as f64;
        let vertex = |theta: f64, phi: f64| {
            let (theta, phi) = (theta * TAU, phi * PI);
            let dir = Vector3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            Vertex::new(self.center + dir * self.radius, dir)
        };

        let mut polygons = Vec::with_capacity(self.slices * self.stacks);
        for i in 0..self.slices {
            let (i0, i1) = (i as f64 / slices, (i + 1) as f64 / slices);
            for j in 0..self.stacks {
                let (j0, j1) = (j as f64 / stacks, (j + 1) as f64 / stacks);

                let mut vertices = Vec::with_capacity(4);
                vertices.push(vertex(i0, j0));
                if j > 0 {
                    vertices.push(vertex(i1, j0));
                }
                if j + 1 < self.stacks {
                    vertices.push(vertex(i1, j1));
                }
                vertices.push(vertex(i0, j1));

                polygons.push(Polygon::new_with_epsilon(vertices, config.epsilon)?);
            }
        }

        debug!(polygons = polygons.len(), "created sphere");
        Ok(Solid::from_polygons(polygons))
    }
}

/// A capped cylinder between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    start: Point3<f64>,
    end: Point3<f64>,
    radius: f64,
    slices: usize,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            start: Point3::new(0.0, -1.0, 0.0),
            end: Point3::new(0.0, 1.0, 0.0),
            radius: 1.0,
            slices: 16,
        }
    }
}

impl Cylinder {
    /// A unit-radius cylinder from `(0, -1, 0)` to `(0, 1, 0)` with 16 slices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the center of the bottom cap.
    pub fn with_start(mut self, start: Point3<f64>) -> Self {
        self.start = start;
        self
    }

    /// Sets the center of the top cap.
    pub fn with_end(mut self, end: Point3<f64>) -> Self {
        self.end = end;
        self
    }

    /// Sets the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the number of subdivisions around the axis (at least 3).
    pub fn with_slices(mut self, slices: usize) -> Self {
        self.slices = slices;
        self
    }

    /// Generates `3 * slices` polygons: per slice a bottom cap triangle, a
    /// side quad and a top cap triangle.
    pub fn build(&self) -> CsgResult<Solid> {
        self.build_with(&CsgConfig::default())
    }

    /// [`build`](Self::build), validating the faces with `config.epsilon`.
    #[instrument(skip_all, fields(radius = self.radius, slices = self.slices))]
    pub fn build_with(&self, config: &CsgConfig) -> CsgResult<Solid> {
        config.validate()?;
        check_point("start", &self.start)?;
        check_point("end", &self.end)?;
        check_positive("radius", self.radius)?;
        check_min_count("slices", self.slices, 3)?;

        let ray = self.end - self.start;
        let length = ray.norm();
        if length <= f64::EPSILON {
            return Err(CsgError::InvalidParameter(
                "cylinder start and end coincide".into(),
            ));
        }

        let axis_z = ray / length;
        let seed = if axis_z.y.abs() > 0.5 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let axis_x = seed.cross(&axis_z).normalize();
        let axis_y = axis_x.cross(&axis_z).normalize();

        let bottom = Vertex::new(self.start, -axis_z);
        let top = Vertex::new(self.end, axis_z);

        // `blend` of -1 or 1 gives the cap normal, 0 the radial side normal.
        let point = |stack: f64, slice: f64, blend: f64| {
            let angle = slice * TAU;
            let out = axis_x * angle.cos() + axis_y * angle.sin();
            let pos = self.start + ray * stack + out * self.radius;
            let normal = out * (1.0 - blend.abs()) + axis_z * blend;
            Vertex::new(pos, normal)
        };

        let slices = self.slices as f64;
        let mut polygons = Vec::with_capacity(3 * self.slices);
        for i in 0..self.slices {
            let (t0, t1) = (i as f64 / slices, (i + 1) as f64 / slices);
            let faces = [
                vec![bottom, point(0.0, t0, -1.0), point(0.0, t1, -1.0)],
                vec![
                    point(0.0, t1, 0.0),
                    point(0.0, t0, 0.0),
                    point(1.0, t0, 0.0),
                    point(1.0, t1, 0.0),
                ],
                vec![top, point(1.0, t1, 1.0), point(1.0, t0, 1.0)],
            ];
            for vertices in faces {
                polygons.push(Polygon::new_with_epsilon(vertices, config.epsilon)?);
            }
        }

        debug!(polygons = polygons.len(), "created cylinder");
        Ok(Solid::from_polygons(polygons))
    }
}

fn check_positive(name: &str, value: f64) -> CsgResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CsgError::InvalidParameter(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

fn check_point(name: &str, point: &Point3<f64>) -> CsgResult<()> {
    if point.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(CsgError::InvalidParameter(format!(
            "{name} has a non-finite coordinate"
        )))
    }
}

fn check_min_count(name: &str, value: usize, min: usize) -> CsgResult<()> {
    if value >= min {
        Ok(())
    } else {
        Err(CsgError::InvalidParameter(format!(
            "{name} must be at least {min}, got {value}"
        )))
    }
}
