//! Editor configuration.

use crate::camera::Camera;
use serde::{Deserialize, Serialize};

/// Default fraction of the visible view extent used for placed shapes.
pub const DEFAULT_PLACEMENT_FRACTION: f64 = 0.1;

/// How the default size of a freshly placed shape is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlacementSize {
    /// Fixed size in world units.
    Fixed(f64),
    /// Fraction of the visible view extent at placement time, so shapes
    /// come out at a consistent apparent size at any zoom level.
    ViewFraction(f64),
}

impl Default for PlacementSize {
    fn default() -> Self {
        PlacementSize::ViewFraction(DEFAULT_PLACEMENT_FRACTION)
    }
}

impl PlacementSize {
    /// Resolve to a concrete world-unit size for the current view.
    pub fn resolve(&self, camera: &Camera) -> f64 {
        match *self {
            PlacementSize::Fixed(size) => size,
            PlacementSize::ViewFraction(fraction) => fraction * camera.view_extent(),
        }
    }
}

/// Tunable editor behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Sizing rule for placed shapes.
    pub placement_size: PlacementSize,
}
