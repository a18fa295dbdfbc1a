//! Logical canvas geometry. Everything in here is expressed in logical canvas units, never in
//! device pixels; see `backpack_engine::viewport` for the conversion.

use nalgebra::Vector2;

/// Axis aligned rectangle in logical canvas units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Vector2<f32>, size: Vector2<f32>) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub fn origin(&self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vector2<f32> {
        Vector2::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Half-open containment: the left/top edges are inside, the right/bottom edges are not.
    pub fn contains(&self, p: Vector2<f32>) -> bool {
        self.x <= p.x && p.x < self.right() && self.y <= p.y && p.y < self.bottom()
    }

    /// True if the two rectangles share any area. Rectangles that only touch along an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True if `other` lies completely inside `self`.
    pub fn encloses(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Translate `other` by the smallest amount that keeps it inside `self`. If `other` is larger
    /// than `self` along an axis it is pinned to the near edge on that axis.
    pub fn clamp_inside(&self, other: &Rect) -> Vector2<f32> {
        let clamp_axis = |pos: f32, len: f32, min: f32, max: f32| {
            if len >= max - min {
                min
            } else {
                pos.max(min).min(max - len)
            }
        };

        Vector2::new(
            clamp_axis(other.x, other.width, self.x, self.right()),
            clamp_axis(other.y, other.height, self.y, self.bottom()),
        )
    }
}

/// Maps between grid cells and logical canvas positions for the container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    /// Logical position of the top left corner of cell (0, 0)
    pub origin: Vector2<f32>,
    /// Edge length of one cell, in logical units
    pub cell_size: f32,
    /// Number of columns
    pub width: u32,
    /// Number of rows
    pub height: u32,
}

impl GridGeometry {
    pub fn new(origin: Vector2<f32>, cell_size: f32, width: u32, height: u32) -> Self {
        Self {
            origin,
            cell_size,
            width,
            height,
        }
    }

    pub fn grid_to_pixel(&self, x: i32, y: i32) -> Vector2<f32> {
        Vector2::new(
            self.origin.x + x as f32 * self.cell_size,
            self.origin.y + y as f32 * self.cell_size,
        )
    }

    /// Cell containing the logical position `p`. May be outside of the grid.
    pub fn pixel_to_grid(&self, p: Vector2<f32>) -> (i32, i32) {
        (
            ((p.x - self.origin.x) / self.cell_size).floor() as i32,
            ((p.y - self.origin.y) / self.cell_size).floor() as i32,
        )
    }

    /// Logical size of a block of `w` x `h` cells
    pub fn cells_to_pixels(&self, w: u32, h: u32) -> Vector2<f32> {
        Vector2::new(w as f32 * self.cell_size, h as f32 * self.cell_size)
    }

    /// The container's bounds in logical units
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.cells_to_pixels(self.width, self.height))
    }
}
