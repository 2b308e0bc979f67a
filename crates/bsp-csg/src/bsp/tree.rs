//! BSP tree container and construction.

use std::fmt;

use nalgebra::Point3;

use crate::{CsgConfig, CsgResult, Polygon};

use super::node::BspNode;

/// A Binary Space Partitioning tree for 3D polygons.
///
/// BSP trees recursively partition space using planes, each node keeping
/// the polygons coplanar with its plane. Read as a solid, the tree's
/// polygons bound a region of space: the front of every polygon is outside,
/// the back is inside.
///
/// # Construction
///
/// Trees are built from a collection of polygons. The first polygon of
/// every batch reaching a fresh node becomes that node's splitting plane:
///
/// ```ignore
/// use bsp_csg::{BspTree, CsgConfig, Polygon};
///
/// let polygons: Vec<Polygon> = /* ... */;
/// let tree = BspTree::build(polygons, CsgConfig::default())?;
/// ```
///
/// # Boolean building blocks
///
/// [`invert`](Self::invert), [`clip_to`](Self::clip_to) and
/// [`add_polygons`](Self::add_polygons) are the steps the
/// [`Solid`](crate::Solid) operators are composed of.
#[derive(Debug, Clone, Default)]
pub struct BspTree {
    root: BspNode,
    config: CsgConfig,
}

impl BspTree {
    /// Creates an empty BSP tree with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty BSP tree using `config` for all later operations.
    pub fn with_config(config: CsgConfig) -> Self {
        Self {
            root: BspNode::new(),
            config,
        }
    }

    /// Builds a BSP tree from a collection of polygons.
    ///
    /// Polygons that span a splitting plane are split. Returns an empty tree
    /// if the input is empty.
    pub fn build(polygons: Vec<Polygon>, config: CsgConfig) -> CsgResult<Self> {
        config.validate()?;
        let mut tree = Self::with_config(config);
        tree.add_polygons(polygons)?;
        Ok(tree)
    }

    /// Builds a BSP tree using the default configuration.
    pub fn from_polygons(polygons: Vec<Polygon>) -> CsgResult<Self> {
        Self::build(polygons, CsgConfig::default())
    }

    /// Returns the configuration the tree splits with.
    #[inline]
    pub fn config(&self) -> &CsgConfig {
        &self.config
    }

    /// Returns `true` if no polygon has ever been added, so the root has no plane.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.plane().is_none()
    }

    /// Returns a reference to the root node.
    #[inline]
    pub fn root(&self) -> &BspNode {
        &self.root
    }

    /// Returns the total number of polygons in the tree.
    pub fn polygon_count(&self) -> usize {
        self.root.polygon_count()
    }

    /// Returns the maximum depth of the tree (0 for empty tree).
    pub fn depth(&self) -> usize {
        if self.is_empty() { 0 } else { self.root.depth() }
    }

    /// Adds polygons to the tree.
    ///
    /// On an existing tree the new polygons are filtered down and become new
    /// nodes at the bottom. Fails with
    /// [`CsgError::CapacityExceeded`](crate::CsgError::CapacityExceeded) when
    /// that would nest nodes deeper than `config.max_depth`.
    pub fn add_polygons(&mut self, polygons: Vec<Polygon>) -> CsgResult<()> {
        self.root.add_polygons(polygons, &self.config, 1)
    }

    /// Converts solid space to empty space and empty space to solid space.
    pub fn invert(&mut self) {
        self.root.invert();
    }

    /// Returns the parts of `polygons` that lie outside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        self.root.clip_polygons(polygons, self.config.epsilon)
    }

    /// Removes all polygon parts in this tree that are inside `other`.
    ///
    /// `other` is only read.
    pub fn clip_to(&mut self, other: &BspTree) {
        self.root.clip_to(&other.root, other.config.epsilon);
    }

    /// Collects all polygons in the tree into a vector.
    ///
    /// Each node's own polygons come first, then its front subtree, then its
    /// back subtree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        self.root.all_polygons()
    }

    /// Returns `true` if `point` lies in the solid region of the tree.
    ///
    /// Meaningful for trees built from closed, outward-facing polygon sets.
    /// Points on a boundary may report either answer.
    pub fn contains_point(&self, point: Point3<f64>) -> bool {
        self.root.contains_point(point, self.config.epsilon)
    }
}

impl fmt::Display for BspTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}
