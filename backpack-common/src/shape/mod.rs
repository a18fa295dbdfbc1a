//! Polyomino shapes. A [Shape] is the rectangular bounding box of an item with a solid/empty flag
//! per cell; only solid cells ever touch the grid.

use anyhow::{ensure, Result};
use std::fmt::Display;


/// Quarter turn rotation of an item, clockwise from its definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

pub const ALL_ROTATIONS: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

impl Rotation {
    /// Number of clockwise quarter turns from the base orientation
    pub fn quarter_turns(self) -> u32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    pub fn from_quarter_turns(turns: u32) -> Self {
        ALL_ROTATIONS[(turns % 4) as usize]
    }

    pub fn degrees(self) -> u32 {
        self.quarter_turns() * 90
    }

    /// Parse a rotation in degrees. Any multiple of 90 is accepted, including negative ones, and
    /// is normalized into `[0, 360)`.
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        ensure!(
            degrees % 90 == 0,
            "Rotation {} is not a multiple of 90 degrees",
            degrees
        );
        Ok(Self::from_quarter_turns(
            (degrees / 90).rem_euclid(4) as u32,
        ))
    }

    #[inline]
    pub fn next_clockwise(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }
}

impl Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Error generated when building a shape from rows of cells fails
#[derive(Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// No rows, or rows without any columns
    Empty,
    /// A row has a different length than the first one
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl std::error::Error for ShapeError {}

impl Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "shape has no cells"),
            Self::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "shape row {} has {} columns, expected {}",
                row, found, expected
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u32,
    height: u32,
    /// Stored in row-major order, `x + y * width`
    cells: Vec<bool>,
}

impl Shape {
    /// A fully solid `width` x `height` shape. A zero size is taken as 1.
    pub fn rectangular(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![true; (width * height) as usize],
        }
    }

    /// Build a shape from rows of cells, where any non-zero cell is solid. `rows[y][x]`, so the
    /// number of rows is the height.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let expected = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if expected == 0 {
            return Err(ShapeError::Empty.into());
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row, cols) in rows.iter().enumerate() {
            let cols = cols.as_ref();
            if cols.len() != expected {
                return Err(ShapeError::Ragged {
                    row,
                    expected,
                    found: cols.len(),
                }
                .into());
            }
            cells.extend(cols.iter().map(|c| *c != 0));
        }

        Ok(Self {
            width: expected as u32,
            height: rows.len() as u32,
            cells,
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|c| *c as u8).collect())
            .collect()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the cell at `(x, y)` is solid. Cells outside the bounding box are never solid.
    #[inline]
    pub fn is_solid(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[(x + y * self.width) as usize]
    }

    /// Coordinates of every solid cell, relative to the shape origin, in row-major order
    pub fn solid_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, solid)| **solid)
            .map(move |(i, _)| (i as u32 % width, i as u32 / width))
    }

    /// Number of solid cells
    pub fn area(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Rotate a quarter turn clockwise. Cell `(x, y)` moves to `(height - 1 - y, x)` and the
    /// width and height swap.
    pub fn rotate_clockwise(&self) -> Self {
        let new_width = self.height;
        let new_height = self.width;
        let mut cells = vec![false; self.cells.len()];

        for (i, solid) in self.cells.iter().enumerate() {
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            let nx = self.height - 1 - y;
            let ny = x;
            cells[(nx + ny * new_width) as usize] = *solid;
        }

        Self {
            width: new_width,
            height: new_height,
            cells,
        }
    }

    /// This shape turned clockwise by `rotation`
    pub fn rotated(&self, rotation: Rotation) -> Self {
        (0..rotation.quarter_turns()).fold(self.clone(), |s, _| s.rotate_clockwise())
    }
}
