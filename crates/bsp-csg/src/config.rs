//! Tunable parameters for plane classification and tree construction.

use crate::{CsgError, CsgResult};

/// Default epsilon for plane classification.
/// Points within this distance of a plane are considered "on" the plane.
pub const PLANE_EPSILON: f64 = 1e-5;

/// Default limit on BSP construction depth.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Parameters threaded through polygon splitting and BSP construction.
///
/// The epsilon must suit the coordinate scale of the input: large enough to
/// absorb round-off from earlier splits, small enough not to merge genuinely
/// separate polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CsgConfig {
    /// Distance below which a point is classified as lying on a plane.
    pub epsilon: f64,
    /// Maximum number of nested nodes `add_polygons` may create.
    pub max_depth: usize,
}

impl Default for CsgConfig {
    fn default() -> Self {
        Self {
            epsilon: PLANE_EPSILON,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CsgConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the plane classification epsilon.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the maximum construction depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks that the epsilon is finite and positive and the depth non-zero.
    pub fn validate(&self) -> CsgResult<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(CsgError::InvalidParameter(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if self.max_depth == 0 {
            return Err(CsgError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
