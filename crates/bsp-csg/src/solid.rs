//! Solids and the boolean operators built on BSP trees.

use nalgebra::Point3;
use tracing::{debug, instrument};

use crate::{BspTree, CsgConfig, CsgResult, Polygon};

/// A solid, represented purely by its boundary polygons.
///
/// Two solids can be combined with [`union`](Self::union),
/// [`subtract`](Self::subtract) and [`intersect`](Self::intersect). None of
/// the operators modify their operands: each one clones both polygon lists,
/// builds two private BSP trees and returns a fresh solid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solid {
    polygons: Vec<Polygon>,
}

impl Solid {
    /// Creates a solid with no polygons.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solid from its boundary polygons.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Returns the boundary polygons.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Consumes the solid, returning its polygons.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Returns the number of boundary polygons.
    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Returns `true` if the solid has no polygons.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Space in this solid or in `other`.
    pub fn union(&self, other: &Solid) -> CsgResult<Solid> {
        self.union_with(other, &CsgConfig::default())
    }

    /// Space in this solid but not in `other`.
    pub fn subtract(&self, other: &Solid) -> CsgResult<Solid> {
        self.subtract_with(other, &CsgConfig::default())
    }

    /// Space in both this solid and `other`.
    pub fn intersect(&self, other: &Solid) -> CsgResult<Solid> {
        self.intersect_with(other, &CsgConfig::default())
    }

    /// [`union`](Self::union) with an explicit configuration.
    #[instrument(skip_all, fields(lhs = self.len(), rhs = other.len()))]
    pub fn union_with(&self, other: &Solid, config: &CsgConfig) -> CsgResult<Solid> {
        let (mut a, mut b) = self.build_trees(other, config)?;

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.add_polygons(b.all_polygons())?;

        Ok(finish("union", &a))
    }

    /// [`subtract`](Self::subtract) with an explicit configuration.
    #[instrument(skip_all, fields(lhs = self.len(), rhs = other.len()))]
    pub fn subtract_with(&self, other: &Solid, config: &CsgConfig) -> CsgResult<Solid> {
        let (mut a, mut b) = self.build_trees(other, config)?;

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.add_polygons(b.all_polygons())?;
        a.invert();

        Ok(finish("subtract", &a))
    }

    /// [`intersect`](Self::intersect) with an explicit configuration.
    #[instrument(skip_all, fields(lhs = self.len(), rhs = other.len()))]
    pub fn intersect_with(&self, other: &Solid, config: &CsgConfig) -> CsgResult<Solid> {
        let (mut a, mut b) = self.build_trees(other, config)?;

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.add_polygons(b.all_polygons())?;
        a.invert();

        Ok(finish("intersect", &a))
    }

    /// Swaps solid and empty space by flipping every polygon.
    pub fn inverse(&self) -> Solid {
        self.polygons.iter().map(Polygon::flipped).collect()
    }

    /// Returns `true` if `point` lies inside the solid.
    ///
    /// Builds a BSP tree over a copy of the polygons with the default
    /// configuration. Points on the boundary may report either answer.
    pub fn contains_point(&self, point: Point3<f64>) -> CsgResult<bool> {
        self.contains_point_with(point, &CsgConfig::default())
    }

    /// [`contains_point`](Self::contains_point) with an explicit configuration.
    pub fn contains_point_with(&self, point: Point3<f64>, config: &CsgConfig) -> CsgResult<bool> {
        let tree = BspTree::build(self.polygons.clone(), *config)?;
        Ok(tree.contains_point(point))
    }

    /// Returns the axis-aligned bounds `(min, max)` of all vertices, or
    /// `None` for an empty solid.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        self.polygons
            .iter()
            .flat_map(Polygon::vertices)
            .map(|v| v.pos)
            .fold(None, |bounds, pos| match bounds {
                None => Some((pos, pos)),
                Some((min, max)) => Some((min.inf(&pos), max.sup(&pos))),
            })
    }

    fn build_trees(&self, other: &Solid, config: &CsgConfig) -> CsgResult<(BspTree, BspTree)> {
        let a = BspTree::build(self.polygons.clone(), *config)?;
        let b = BspTree::build(other.polygons.clone(), *config)?;
        Ok((a, b))
    }
}

fn finish(operation: &str, tree: &BspTree) -> Solid {
    let solid = Solid::from_polygons(tree.all_polygons());
    debug!(
        operation,
        polygons = solid.len(),
        depth = tree.depth(),
        "boolean operation complete"
    );
    solid
}

impl From<Vec<Polygon>> for Solid {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self::from_polygons(polygons)
    }
}

impl FromIterator<Polygon> for Solid {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self::from_polygons(iter.into_iter().collect())
    }
}
