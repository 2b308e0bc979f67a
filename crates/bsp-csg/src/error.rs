//! Error types for polygon ingestion and BSP construction.

use thiserror::Error;

/// Errors produced while building polygons, trees and solids.
///
/// Validation happens once, when a [`Polygon`](crate::Polygon) is created.
/// The splitting and BSP layers trust their input and only fail when a
/// tree grows past its configured depth.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsgError {
    /// The vertex loop cannot form a convex, coplanar polygon.
    #[error("malformed polygon: {reason}")]
    MalformedPolygon {
        /// What the validation found wrong.
        reason: String,
    },

    /// Three points do not span a plane (collinear, coincident or non-finite).
    #[error("degenerate plane: points do not define a unique normal")]
    DegeneratePlane,

    /// BSP construction recursed past the configured depth limit.
    #[error("BSP tree exceeded the maximum depth of {depth}")]
    CapacityExceeded {
        /// The depth limit that was hit.
        depth: usize,
    },

    /// A configuration value or shape parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl CsgError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPolygon {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type CsgResult<T> = Result<T, CsgError>;
