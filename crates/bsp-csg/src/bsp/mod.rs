//! Binary Space Partitioning trees over convex polygons.
//!
//! A tree recursively partitions space using planes taken from its input
//! polygons. Read as a solid, everything behind the polygons is inside and
//! everything in front is outside. The tree supports the steps the boolean
//! operators are made of:
//!
//! - [`BspTree::invert`]: swap inside and outside
//! - [`BspTree::clip_polygons`] / [`BspTree::clip_to`]: remove whatever lies
//!   inside another tree
//! - [`BspTree::add_polygons`] / [`BspTree::all_polygons`]: grow the tree and
//!   read it back out
//!
//! # Architecture
//!
//! - [`BspTree`]: The main container holding the root node and configuration
//! - [`BspNode`]: Nodes storing a splitting plane and the polygons coplanar with it

mod node;
mod tree;

pub use node::BspNode;
pub use tree::BspTree;
