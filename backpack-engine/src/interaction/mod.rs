//! Pointer state machine: hover, drag and drop.
//!
//! All positions in here are logical canvas positions; converting from screen pixels is the
//! caller's job (see [crate::viewport]). The grid is only touched when a drag starts (a placed
//! item is lifted off the grid) and when it ends (the item is committed, or put back).

use anyhow::Result;
use backpack_common::item::{GridPos, Item};
use log::{debug, warn};
use nalgebra::Vector2;

use crate::events::Event;
use crate::placement::PlacementSurface;

#[cfg(test)]
mod tests;

#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
    /// Index of the dragged item
    pub item: usize,
    /// Pointer position relative to the item's top left corner when the drag started
    pub offset: Vector2<f32>,
    /// Where the item was when the drag started
    pub start_pixel: Vector2<f32>,
    /// Grid origin the item was lifted from, if it was placed
    pub start_grid: Option<GridPos>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering(usize),
    Dragging(DragState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released away from the container, the item stays where it was dropped
    Staged,
    Placed { x: i32, y: i32 },
    /// Released over the container where it does not fit. The item went back to where the drag
    /// started; `restored` is set if that meant going back onto the grid.
    Rejected { restored: bool },
}

/// Where the dragged item would land if released now
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropPreview {
    pub x: i32,
    pub y: i32,
    pub valid: bool,
}

/// Topmost item under `p`, in the order items are drawn: unplaced items above placed ones, later
/// items above earlier ones.
pub fn hit_test<S: PlacementSurface + ?Sized>(
    surface: &S,
    items: &[Item],
    p: Vector2<f32>,
) -> Option<usize> {
    let geometry = surface.geometry();
    let under = |placed: bool| {
        items
            .iter()
            .enumerate()
            .rev()
            .filter(move |(_, item)| item.is_placed() == placed)
            .find(|(_, item)| item.bounds(geometry).contains(p))
            .map(|(i, _)| i)
    };

    under(false).or_else(|| under(true))
}

#[derive(Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn dragged(&self) -> Option<usize> {
        match self.state {
            InteractionState::Dragging(ref drag) => Some(drag.item),
            _ => None,
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        match self.state {
            InteractionState::Hovering(i) => Some(i),
            _ => None,
        }
    }

    /// The item keyboard actions apply to: the dragged one, else the hovered one
    pub fn active(&self) -> Option<usize> {
        self.dragged().or_else(|| self.hovered())
    }

    /// Drop any hover or drag without touching items or the grid
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Start dragging the item under `p`, lifting it off the grid first if it was placed.
    ///
    /// Returns the index of the picked up item. While a drag is in progress further presses are
    /// ignored.
    pub fn pointer_down<S: PlacementSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        items: &mut [Item],
        p: Vector2<f32>,
        events: &mut Vec<Event>,
    ) -> Result<Option<usize>> {
        if let InteractionState::Dragging(ref drag) = self.state {
            debug!("Ignoring press while {} is dragged", items[drag.item].id);
            return Ok(None);
        }

        let index = match hit_test(surface, items, p) {
            Some(i) => i,
            None => return Ok(None),
        };
        let item = &mut items[index];

        let start_grid = item.placement();
        if start_grid.is_some() {
            surface.retract(item)?;
            events.push(Event::Retract(item.id.clone()));
        }

        self.state = InteractionState::Dragging(DragState {
            item: index,
            offset: p - item.pixel,
            start_pixel: item.pixel,
            start_grid,
        });
        events.push(Event::Pickup(item.id.clone()));

        Ok(Some(index))
    }

    /// Move the dragged item along with the pointer, or update the hovered item when idle.
    pub fn pointer_move<S: PlacementSurface + ?Sized>(
        &mut self,
        surface: &S,
        items: &mut [Item],
        p: Vector2<f32>,
    ) {
        match self.state {
            InteractionState::Dragging(ref drag) => {
                items[drag.item].pixel = p - drag.offset;
            }
            _ => {
                self.state = match hit_test(surface, items, p) {
                    Some(i) => InteractionState::Hovering(i),
                    None => InteractionState::Idle,
                };
            }
        }
    }

    /// Finish the drag at `p`. Returns `None` if nothing was being dragged.
    pub fn pointer_up<S: PlacementSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        items: &mut [Item],
        p: Vector2<f32>,
        events: &mut Vec<Event>,
    ) -> Result<Option<DropOutcome>> {
        let drag = match std::mem::take(&mut self.state) {
            InteractionState::Dragging(drag) => drag,
            other => {
                self.state = other;
                return Ok(None);
            }
        };

        let item = &mut items[drag.item];
        item.pixel = p - drag.offset;

        if !surface.overlaps_container(item) {
            events.push(Event::Drop {
                item: item.id.clone(),
                placed: false,
            });
            return Ok(Some(DropOutcome::Staged));
        }

        let (x, y) = surface.snap_origin(item);
        if surface.is_valid_placement(&item.id, item.shape(), x, y) {
            surface.place(item, x, y)?;
            events.push(Event::Place {
                item: item.id.clone(),
                x,
                y,
            });
            events.push(Event::Drop {
                item: item.id.clone(),
                placed: true,
            });
            return Ok(Some(DropOutcome::Placed { x, y }));
        }

        item.pixel = drag.start_pixel;
        let restored = match drag.start_grid {
            Some(pos) => match surface.place(item, pos.x, pos.y) {
                Ok(()) => true,
                Err(e) => {
                    // Only possible if the item was rotated mid-drag
                    warn!("Could not put {} back on the grid: {}", item.id, e);
                    false
                }
            },
            None => false,
        };

        events.push(Event::Reject(item.id.clone()));
        events.push(Event::Drop {
            item: item.id.clone(),
            placed: restored,
        });
        Ok(Some(DropOutcome::Rejected { restored }))
    }

    /// Ghost of the dragged item on the grid, if it is over the container
    pub fn drop_preview<S: PlacementSurface + ?Sized>(
        &self,
        surface: &S,
        items: &[Item],
    ) -> Option<DropPreview> {
        let item = &items[self.dragged()?];
        if !surface.overlaps_container(item) {
            return None;
        }

        let (x, y) = surface.snap_origin(item);
        Some(DropPreview {
            x,
            y,
            valid: surface.is_valid_placement(&item.id, item.shape(), x, y),
        })
    }
}
