//! Validating and committing item placements against the container grid.

use anyhow::Result;
use backpack_common::geometry::{GridGeometry, Rect};
use backpack_common::grid::Grid;
use backpack_common::item::{GridPos, Item};
use backpack_common::shape::Shape;
use backpack_common::ItemId;
use log::debug;
use std::fmt::Display;

#[cfg(test)]
mod tests;

#[derive(Debug, PartialEq, Eq)]
pub enum PlacementError {
    /// The item's solid cells do not fit at the given origin
    Invalid { id: ItemId, x: i32, y: i32 },
    /// The operation needs a placed item
    NotPlaced(ItemId),
    /// The rotated shape collides at the item's current origin
    RotationBlocked(ItemId),
    UnknownItem(ItemId),
}

impl std::error::Error for PlacementError {}

impl Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { id, x, y } => write!(f, "{} cannot be placed at ({}, {})", id, x, y),
            Self::NotPlaced(id) => write!(f, "{} is not placed", id),
            Self::RotationBlocked(id) => write!(f, "{} cannot rotate where it is", id),
            Self::UnknownItem(id) => write!(f, "no item with id {}", id),
        }
    }
}

/// The subset of placement operations the pointer state machine needs.
pub trait PlacementSurface {
    fn geometry(&self) -> &GridGeometry;

    /// Whether `shape` could be committed for `id` with its top left corner at `(x, y)`.
    fn is_valid_placement(&self, id: &ItemId, shape: &Shape, x: i32, y: i32) -> bool;

    fn place(&mut self, item: &mut Item, x: i32, y: i32) -> Result<()>;

    fn retract(&mut self, item: &mut Item) -> Result<()>;

    /// Origin the item would snap to if released now, clamped so its bounding box stays on the
    /// grid.
    fn snap_origin(&self, item: &Item) -> (i32, i32) {
        let geometry = self.geometry();
        let half = geometry.cell_size / 2.0;
        let probe = item.pixel + nalgebra::Vector2::new(half, half);
        let (x, y) = geometry.pixel_to_grid(probe);

        let max_x = geometry.width as i32 - item.width() as i32;
        let max_y = geometry.height as i32 - item.height() as i32;
        (x.min(max_x).max(0), y.min(max_y).max(0))
    }

    /// Whether the item's bounding box covers any part of the container
    fn overlaps_container(&self, item: &Item) -> bool {
        let geometry = self.geometry();
        item.bounds(geometry).intersects(&geometry.bounds())
    }
}

/// The container grid together with its position on the canvas.
pub struct Board {
    grid: Grid,
    geometry: GridGeometry,
}

impl Board {
    pub fn new(grid: Grid, geometry: GridGeometry) -> Self {
        Self { grid, geometry }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Remove every item from the grid. The items themselves are not touched.
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Turn the item a quarter clockwise.
    ///
    /// A placed item is checked at its current origin with the new shape and, if that does not
    /// fit, left alone with a [PlacementError::RotationBlocked]. A staged item always turns and is
    /// then pushed back inside `canvas` if its new bounding box sticks out.
    pub fn rotate_in_place(&mut self, item: &mut Item, canvas: &Rect) -> Result<()> {
        let rotation = item.rotation().next_clockwise();

        match item.placement() {
            Some(pos) => {
                let rotated = item.base_shape().rotated(rotation);
                if !self.is_valid_placement(&item.id, &rotated, pos.x, pos.y) {
                    Err(PlacementError::RotationBlocked(item.id.clone()))?
                }

                self.grid.mark_cells(&item.id, item.shape(), pos.x, pos.y, false);
                item.set_rotation(rotation);
                self.grid.mark_cells(&item.id, item.shape(), pos.x, pos.y, true);
            }
            None => {
                item.set_rotation(rotation);
                item.pixel = canvas.clamp_inside(&item.bounds(&self.geometry));
            }
        }

        debug!("Rotated {} to {}", item.id, rotation);
        Ok(())
    }
}

impl PlacementSurface for Board {
    fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    fn is_valid_placement(&self, id: &ItemId, shape: &Shape, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        if x + shape.width() as i32 > self.grid.width() as i32
            || y + shape.height() as i32 > self.grid.height() as i32
        {
            return false;
        }

        // Empty cells of the shape never matter, which is what lets bounding boxes overlap
        shape.solid_cells().all(|(dx, dy)| {
            let cx = x + dx as i32;
            let cy = y + dy as i32;
            if !self.grid.is_open(cx, cy) {
                return false;
            }
            match self.grid.get_cell(cx, cy) {
                Ok(cell) => cell.owner().map(|owner| owner == id).unwrap_or(true),
                Err(_) => false,
            }
        })
    }

    /// Commit the item at `(x, y)`, moving it if it was already placed elsewhere.
    fn place(&mut self, item: &mut Item, x: i32, y: i32) -> Result<()> {
        if !self.is_valid_placement(&item.id, item.shape(), x, y) {
            Err(PlacementError::Invalid {
                id: item.id.clone(),
                x,
                y,
            })?
        }

        if let Some(old) = item.placement() {
            self.grid
                .mark_cells(&item.id, item.shape(), old.x, old.y, false);
        }
        self.grid.mark_cells(&item.id, item.shape(), x, y, true);
        item.set_placement(Some(GridPos::new(x, y)));
        item.pixel = self.geometry.grid_to_pixel(x, y);

        debug!("Placed {} at ({}, {})", item.id, x, y);
        Ok(())
    }

    fn retract(&mut self, item: &mut Item) -> Result<()> {
        let pos = item
            .placement()
            .ok_or_else(|| PlacementError::NotPlaced(item.id.clone()))?;

        self.grid
            .mark_cells(&item.id, item.shape(), pos.x, pos.y, false);
        item.set_placement(None);

        debug!("Retracted {} from ({}, {})", item.id, pos.x, pos.y);
        Ok(())
    }
}
