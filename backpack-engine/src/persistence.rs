//! Building and replaying the memory snapshot that lets a later session pick up where this one
//! left off.

use backpack_common::item::Item;
use backpack_common::snapshot::MemorySnapshot;
use log::{debug, warn};
use nalgebra::Vector2;

use crate::placement::{Board, PlacementSurface};

pub fn snapshot(items: &[Item]) -> MemorySnapshot {
    MemorySnapshot::from_items(items)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Items that had a record in the snapshot
    pub restored: usize,
    /// Items put back on the grid
    pub placed: usize,
    /// Indices of items that still need a staging position: those without a record, and those
    /// whose remembered placement no longer fits
    pub unstaged: Vec<usize>,
}

/// Apply `memory` to freshly built items, rebuilding grid occupancy from the placed records.
pub fn restore(items: &mut [Item], memory: &MemorySnapshot, board: &mut Board) -> RestoreReport {
    let _span = tracing::info_span!("restore_memory").entered();
    let mut report = RestoreReport::default();

    for (i, item) in items.iter_mut().enumerate() {
        let record = match memory.get(&item.id) {
            Some(record) => record,
            None => {
                report.unstaged.push(i);
                continue;
            }
        };
        report.restored += 1;

        item.set_rotation(record.rotation);
        item.pixel = Vector2::new(record.pixel_x, record.pixel_y);
        if !record.is_placed {
            continue;
        }

        // Goes through the normal placement path, so the pixel position is re-derived from the
        // grid and a record that collides with the current mask or an earlier item is refused
        match board.place(item, record.grid_x, record.grid_y) {
            Ok(()) => report.placed += 1,
            Err(e) => {
                warn!("Not restoring placement of {}: {}. Staging it instead", item.id, e);
                report.unstaged.push(i);
            }
        }
    }

    for (id, _) in memory.iter() {
        if !items.iter().any(|item| &item.id == id) {
            debug!("Ignoring memory of unknown item {}", id);
        }
    }

    report
}
