//! BSP tree node implementation.

use std::fmt;

use nalgebra::Point3;
use tracing::{trace, warn};

use crate::{CsgConfig, CsgError, CsgResult, Cuttable, Plane3D, PlaneSide, Polygon, Split};

/// A node in the BSP tree.
///
/// Each node partitions space using a splitting plane and stores the polygons
/// that are coplanar with that plane, whichever way they face. Polygons in
/// front of or behind the plane live in the respective child subtrees.
///
/// This is not a leafy tree: there is no distinction between internal and
/// leaf nodes. A missing front child stands for empty space and a missing
/// back child for solid space.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    /// The splitting plane, `None` until the first polygon arrives.
    plane: Option<Plane3D>,

    /// Polygons coplanar with the plane, in insertion order.
    polygons: Vec<Polygon>,

    /// Subtree containing polygons in FRONT of the splitting plane.
    front: Option<Box<BspNode>>,

    /// Subtree containing polygons BEHIND the splitting plane.
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates an uninitialized node: no plane, no polygons, no children.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the splitting plane, if the node has been populated.
    #[inline]
    pub fn plane(&self) -> Option<&Plane3D> {
        self.plane.as_ref()
    }

    /// Returns the polygons stored directly on this node.
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Returns a reference to the front child subtree.
    #[inline]
    pub fn front(&self) -> Option<&BspNode> {
        self.front.as_deref()
    }

    /// Returns a reference to the back child subtree.
    #[inline]
    pub fn back(&self) -> Option<&BspNode> {
        self.back.as_deref()
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Returns the total number of polygons in this subtree (including all descendants).
    pub fn polygon_count(&self) -> usize {
        let mut count = self.polygons.len();

        if let Some(ref front) = self.front {
            count += front.polygon_count();
        }
        if let Some(ref back) = self.back {
            count += back.polygon_count();
        }

        count
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        let front_depth = self.front.as_ref().map_or(0, |n| n.depth());
        let back_depth = self.back.as_ref().map_or(0, |n| n.depth());
        1 + front_depth.max(back_depth)
    }

    /// Filters `polygons` down the subtree, growing new nodes where they land.
    ///
    /// An uninitialized node adopts the plane of the first polygon. Coplanar
    /// polygons stay here, the rest are split and passed to the children.
    /// `level` is this node's depth, starting at 1 for the root.
    pub(crate) fn add_polygons(
        &mut self,
        polygons: Vec<Polygon>,
        config: &CsgConfig,
        level: usize,
    ) -> CsgResult<()> {
        let Some(first) = polygons.first() else {
            return Ok(());
        };
        if level > config.max_depth {
            warn!(max_depth = config.max_depth, "BSP construction hit the depth limit");
            return Err(CsgError::CapacityExceeded {
                depth: config.max_depth,
            });
        }

        let plane = *self.plane.get_or_insert(*first.plane());
        let mut front_list = Vec::new();
        let mut back_list = Vec::new();

        for polygon in &polygons {
            match polygon.split(&plane, config.epsilon) {
                Split::CoplanarFront(p) | Split::CoplanarBack(p) => self.polygons.push(p),
                Split::Front(p) => front_list.push(p),
                Split::Back(p) => back_list.push(p),
                Split::Spanning { front, back } => {
                    front_list.extend(front);
                    back_list.extend(back);
                }
            }
        }

        if !front_list.is_empty() {
            let front = self.front.get_or_insert_with(|| {
                trace!(level = level + 1, "creating front node");
                Box::default()
            });
            front.add_polygons(front_list, config, level + 1)?;
        }
        if !back_list.is_empty() {
            let back = self.back.get_or_insert_with(|| {
                trace!(level = level + 1, "creating back node");
                Box::default()
            });
            back.add_polygons(back_list, config, level + 1)?;
        }

        Ok(())
    }

    /// Converts solid space to empty space and empty space to solid space.
    ///
    /// Every node flips its polygons and plane and swaps its children. Each
    /// node is visited exactly once, so doing this from an explicit stack
    /// gives the same tree as the recursive flip-recurse-swap order.
    pub(crate) fn invert(&mut self) {
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            node.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);

            if let Some(front) = node.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Returns the parts of `polygons` that lie outside the solid this
    /// subtree represents.
    ///
    /// Coplanar pieces are treated as ordinary front/back pieces according to
    /// their orientation. Anything that reaches a missing back child is
    /// inside solid space and is discarded.
    pub(crate) fn clip_polygons(&self, polygons: Vec<Polygon>, epsilon: f64) -> Vec<Polygon> {
        let Some(plane) = self.plane.as_ref() else {
            return polygons;
        };

        let mut front = Vec::with_capacity(polygons.len());
        let mut back = Vec::with_capacity(polygons.len());

        for polygon in &polygons {
            match polygon.split(plane, epsilon) {
                Split::CoplanarFront(p) | Split::Front(p) => front.push(p),
                Split::CoplanarBack(p) | Split::Back(p) => back.push(p),
                Split::Spanning {
                    front: front_part,
                    back: back_part,
                } => {
                    front.extend(front_part);
                    back.extend(back_part);
                }
            }
        }

        if let Some(front_node) = self.front.as_deref() {
            front = front_node.clip_polygons(front, epsilon);
        }
        // Without a back child, `back` is solid space and gets dropped.
        if let Some(back_node) = self.back.as_deref() {
            front.extend(back_node.clip_polygons(back, epsilon));
        }

        front
    }

    /// Removes from every node of this subtree the polygon parts that lie
    /// inside the solid represented by `other`.
    pub(crate) fn clip_to(&mut self, other: &BspNode, epsilon: f64) {
        let polygons = std::mem::take(&mut self.polygons);
        self.polygons = other.clip_polygons(polygons, epsilon);

        if let Some(front) = self.front.as_deref_mut() {
            front.clip_to(other, epsilon);
        }
        if let Some(back) = self.back.as_deref_mut() {
            back.clip_to(other, epsilon);
        }
    }

    /// Collects the polygons of this subtree: own polygons first, then the
    /// front subtree, then the back subtree.
    pub(crate) fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::with_capacity(self.polygon_count());
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);

            // Push back first so the front subtree is popped first.
            if let Some(back) = node.back.as_deref() {
                stack.push(back);
            }
            if let Some(front) = node.front.as_deref() {
                stack.push(front);
            }
        }

        result
    }

    /// Walks down to the cell containing `point` and reports whether it is solid.
    ///
    /// Points on a splitting plane follow the front side.
    pub(crate) fn contains_point(&self, point: Point3<f64>, epsilon: f64) -> bool {
        let mut node = self;

        loop {
            let Some(plane) = node.plane.as_ref() else {
                return false;
            };
            match plane.classify_point_with_epsilon(point, epsilon) {
                PlaneSide::Front | PlaneSide::OnPlane => match node.front.as_deref() {
                    Some(front) => node = front,
                    None => return false,
                },
                PlaneSide::Back => match node.back.as_deref() {
                    Some(back) => node = back,
                    None => return true,
                },
            }
        }
    }
}

/// Indented outline of the subtree, one line per node in pre-order.
///
/// Each line names the branch taken from the parent (`root`, `front` or
/// `back`), the splitting plane and the number of polygons stored on it.
impl fmt::Display for BspNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self, 0usize, "root")];

        while let Some((node, level, branch)) = stack.pop() {
            write!(f, "{:indent$}{branch}: ", "", indent = level * 2)?;
            match node.plane.as_ref() {
                Some(plane) => {
                    let n = plane.normal();
                    writeln!(
                        f,
                        "normal=({:.4}, {:.4}, {:.4}) offset={:.4} polygons={}",
                        n.x,
                        n.y,
                        n.z,
                        plane.offset(),
                        node.polygons.len()
                    )?;
                }
                None => writeln!(f, "empty")?,
            }

            if let Some(back) = node.back.as_deref() {
                stack.push((back, level + 1, "back"));
            }
            if let Some(front) = node.front.as_deref() {
                stack.push((front, level + 1, "front"));
            }
        }

        Ok(())
    }
}
