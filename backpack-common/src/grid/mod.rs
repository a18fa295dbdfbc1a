//! Authoritative container state: a fixed open/blocked mask and the mutable per-cell occupancy
//! derived from the items currently placed.

use anyhow::Result;
use log::{debug, warn};
use std::fmt::Display;

use crate::shape::Shape;
use crate::ItemId;


#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    /// Open and free
    Empty,
    /// Blocked by the container mask, can never hold an item
    Blocked,
    /// Covered by a solid cell of the given item
    Occupied(ItemId),
}

impl CellState {
    pub fn owner(&self) -> Option<&ItemId> {
        match self {
            CellState::Occupied(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    /// The mask does not have `height` rows of `width` columns
    MalformedMask {
        width: u32,
        height: u32,
        rows: usize,
        /// First row with the wrong number of columns, and its length
        bad_row: Option<(usize, usize)>,
    },
}

impl std::error::Error for GridError {}

impl Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cell ({}, {}) is outside of the {}x{} grid",
                x, y, width, height
            ),
            Self::MalformedMask {
                width,
                height,
                rows,
                bad_row: None,
            } => write!(
                f,
                "mask has {} rows, expected {} rows of {} columns",
                rows, height, width
            ),
            Self::MalformedMask {
                width,
                bad_row: Some((row, len)),
                ..
            } => write!(
                f,
                "mask row {} has {} columns, expected {}",
                row, len, width
            ),
        }
    }
}

pub struct Grid {
    width: u32,
    height: u32,

    /// `true` for open cells. Fixed for the lifetime of the grid.
    ///
    /// Stored in row-major order, `x + y * width`
    mask: Vec<bool>,

    /// Same layout as `mask`
    occupancy: Vec<CellState>,
}

impl Grid {
    /// Create a grid from a mask given as `height` rows of `width` columns, where non-zero cells
    /// are open. Fails if the mask has the wrong dimensions.
    pub fn new(width: u32, height: u32, mask: &[Vec<u8>]) -> Result<Self> {
        if mask.len() != height as usize {
            return Err(GridError::MalformedMask {
                width,
                height,
                rows: mask.len(),
                bad_row: None,
            }
            .into());
        }
        if let Some((row, cols)) = mask
            .iter()
            .enumerate()
            .find(|(_, cols)| cols.len() != width as usize)
        {
            return Err(GridError::MalformedMask {
                width,
                height,
                rows: mask.len(),
                bad_row: Some((row, cols.len())),
            }
            .into());
        }

        let mask: Vec<bool> = mask.iter().flatten().map(|c| *c != 0).collect();
        let occupancy = mask.iter().map(|open| resting_state(*open)).collect();

        Ok(Self {
            width,
            height,
            mask,
            occupancy,
        })
    }

    /// A grid with every cell open
    pub fn open(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            mask: vec![true; size],
            occupancy: vec![CellState::Empty; size],
        }
    }

    /// Create a grid from an optional mask, falling back to an all-open grid if the mask is
    /// missing or malformed.
    pub fn with_mask_or_open(width: u32, height: u32, mask: Option<&[Vec<u8>]>) -> Self {
        match mask {
            None => Self::open(width, height),
            Some(mask) => Self::new(width, height, mask).unwrap_or_else(|e| {
                warn!("Ignoring container mask ({}), using an all-open grid", e);
                Self::open(width, height)
            }),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn pos_to_idx(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })?
        } else {
            Ok(x as usize + y as usize * self.width as usize)
        }
    }

    /// Whether the mask allows items at `(x, y)`. Cells outside of the grid are never open.
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.pos_to_idx(x, y)
            .map(|idx| self.mask[idx])
            .unwrap_or(false)
    }

    #[inline]
    pub fn get_cell(&self, x: i32, y: i32) -> Result<&CellState> {
        // Indexing is ok because pos_to_idx does bounds checking
        Ok(&self.occupancy[self.pos_to_idx(x, y)?])
    }

    /// Write (`mark == true`) or clear the cells covered by the solid cells of `shape` placed with
    /// its top left corner at `(origin_x, origin_y)`.
    ///
    /// This does no placement validation, that is up to the caller. It does however keep the grid
    /// invariants: masked cells never receive an owner, cells outside the grid are skipped, and a
    /// cell is only cleared if it is currently owned by `id`.
    pub fn mark_cells(&mut self, id: &ItemId, shape: &Shape, origin_x: i32, origin_y: i32, mark: bool) {
        for (dx, dy) in shape.solid_cells() {
            let x = origin_x + dx as i32;
            let y = origin_y + dy as i32;
            let idx = match self.pos_to_idx(x, y) {
                Ok(idx) => idx,
                Err(e) => {
                    warn!("Skipping cell of {}: {}", id, e);
                    continue;
                }
            };

            if !self.mask[idx] {
                if mark {
                    warn!("Refusing to mark masked cell ({}, {}) for {}", x, y, id);
                }
                continue;
            }

            let cell = &mut self.occupancy[idx];
            if mark {
                if let Some(other) = cell.owner() {
                    if other != id {
                        warn!("Cell ({}, {}) taken over from {} by {}", x, y, other, id);
                    }
                }
                *cell = CellState::Occupied(id.clone());
            } else if cell.owner() == Some(id) {
                *cell = CellState::Empty;
            } else if let Some(owner) = cell.owner() {
                warn!(
                    "Not clearing cell ({}, {}) for {}, it belongs to {}",
                    x, y, id, owner
                );
            } else {
                debug!("Cell ({}, {}) was already clear while removing {}", x, y, id);
            }
        }
    }

    /// Coordinates of every cell currently owned by `id`
    pub fn cells_owned_by<'a>(&'a self, id: &'a ItemId) -> impl Iterator<Item = (u32, u32)> + 'a {
        self.iter_cells()
            .filter(move |(_, cell)| cell.owner() == Some(id))
            .map(|(pos, _)| pos)
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = ((u32, u32), &CellState)> + '_ {
        let width = self.width;
        self.occupancy
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i as u32 % width, i as u32 / width), cell))
    }

    /// Drop every item from the grid, returning all cells to their resting state
    pub fn clear(&mut self) {
        for (cell, open) in self.occupancy.iter_mut().zip(self.mask.iter()) {
            *cell = resting_state(*open);
        }
    }

    pub fn debug_dump(&self) {
        for row in self.occupancy.chunks(self.width as usize) {
            let mut buf = String::new();
            for cell in row {
                match cell {
                    CellState::Empty => buf.push_str("  .      "),
                    CellState::Blocked => buf.push_str("  #      "),
                    CellState::Occupied(id) => {
                        buf.push_str(&format!("{:>8.8} ", id.as_str()))
                    }
                }
            }
            debug!("{}", buf);
        }
    }
}

#[inline]
fn resting_state(open: bool) -> CellState {
    if open {
        CellState::Empty
    } else {
        CellState::Blocked
    }
}
