//! Constructive Solid Geometry on BSP (Binary Space Partitioning) trees.
//!
//! Solids are plain lists of convex polygons. The boolean operators build a
//! BSP tree for each operand, clip the trees against each other and collect
//! what is left:
//!
//! ```ignore
//! use bsp_csg::{Cube, Sphere};
//!
//! let cube = Cube::new().build()?;
//! let ball = Sphere::new().with_radius(1.35).with_slices(24).with_stacks(12).build()?;
//!
//! let rounded = cube.intersect(&ball)?;
//! let hollow = cube.subtract(&ball)?;
//! let both = cube.union(&ball)?;
//! ```
//!
//! Polygons are validated once, when they are created with [`Polygon::new`].
//! Everything downstream (splitting, tree construction, clipping) trusts its
//! input. Classification tolerance and construction depth come from
//! [`CsgConfig`].

mod config;
mod cuttable;
mod error;
mod plane;
mod polygon;
mod shapes;
mod solid;
mod vertex;

pub mod bsp;

pub use bsp::{BspNode, BspTree};
pub use config::{CsgConfig, DEFAULT_MAX_DEPTH, PLANE_EPSILON};
pub use cuttable::{Cuttable, Split};
pub use error::{CsgError, CsgResult};
pub use plane::{Classification, Plane3D, PlaneSide};
pub use polygon::Polygon;
pub use shapes::{Cube, Cylinder, Sphere};
pub use solid::Solid;
pub use vertex::Vertex;
