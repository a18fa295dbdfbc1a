//! Arranging unplaced items in the staging areas either side of the container.

use backpack_common::geometry::Rect;
use nalgebra::Vector2;

use crate::config::{CanvasConfig, StagingConfig};

pub mod shelf;


/// The two free-form regions flanking the container. Recomputed for every layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StagingRegions {
    pub left: Rect,
    pub right: Rect,
}

impl StagingRegions {
    /// Regions filling the canvas left and right of `container`, below the header and inset by the
    /// staging padding on every side. A region with no room left is empty rather than negative.
    pub fn around(container: &Rect, canvas: &CanvasConfig, staging: &StagingConfig) -> Self {
        let pad = staging.padding;
        let top = canvas.header_offset + pad;
        let height = (canvas.height - top - pad).max(0.0);

        Self {
            left: Rect::new(pad, top, (container.x - 2.0 * pad).max(0.0), height),
            right: Rect::new(
                container.right() + pad,
                top,
                (canvas.width - container.right() - 2.0 * pad).max(0.0),
                height,
            ),
        }
    }
}

/// Abstract interface over staging layouts. Takes the bounding box size of every item to stage
/// and returns a top left position for each, in the same order. `obstacles` are staged items that
/// already have a position and must not be covered.
pub trait StagingAllocator {
    fn allocate(
        &self,
        regions: &StagingRegions,
        sizes: &[Vector2<f32>],
        obstacles: &[Rect],
    ) -> Vec<Vector2<f32>>;
}
