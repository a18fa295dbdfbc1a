use log::warn;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::geometry::{GridGeometry, Rect};
use crate::shape::{Rotation, Shape};
use crate::{ItemId, DEFAULT_ITEM_COLOR};

/// An item as supplied by the host configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub id: String,
    /// Display name, defaults to the id
    #[serde(default)]
    pub name: Option<String>,
    /// Declared width in cells. Ignored in favour of the shape if the two disagree.
    #[serde(default = "one")]
    pub width: u32,
    /// Declared height in cells. Ignored in favour of the shape if the two disagree.
    #[serde(default = "one")]
    pub height: u32,
    /// Solid/empty cells as `shape[y][x]`; a full rectangle when absent
    #[serde(default)]
    pub shape: Option<Vec<Vec<u8>>>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, alias = "sprite")]
    pub sprite_key: Option<String>,
    #[serde(default)]
    pub audio_key: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

fn one() -> u32 {
    1
}

fn default_color() -> String {
    DEFAULT_ITEM_COLOR.to_owned()
}

impl ItemDefinition {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            name: None,
            width,
            height,
            shape: None,
            color: default_color(),
            sprite_key: None,
            audio_key: None,
            description: String::new(),
            required: false,
        }
    }

    pub fn with_shape(mut self, rows: Vec<Vec<u8>>) -> Self {
        self.shape = Some(rows);
        self
    }
}

/// Where a placed item sits on the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub sprite_key: Option<String>,
    pub audio_key: Option<String>,
    pub required: bool,

    /// Size of the definition's bounding box at rotation 0, used for unscaled rendering
    pub original_width: u32,
    pub original_height: u32,

    base_shape: Shape,
    shape: Shape,
    rotation: Rotation,

    /// Grid origin, only present while the item is placed
    placement: Option<GridPos>,

    /// Top left corner on the logical canvas. Meaningful whether placed or staged.
    pub pixel: Vector2<f32>,
}

impl Item {
    /// Build an item from its definition, normalizing the shape: an absent shape becomes a
    /// rectangle of the declared size, and a present shape overrides the declared size.
    pub fn from_definition(def: &ItemDefinition) -> Self {
        let base_shape = normalize_shape(def);

        Self {
            id: ItemId::new(def.id.clone()),
            name: def.name.clone().unwrap_or_else(|| def.id.clone()),
            description: def.description.clone(),
            color: def.color.clone(),
            sprite_key: def.sprite_key.clone(),
            audio_key: def.audio_key.clone(),
            required: def.required,
            original_width: base_shape.width(),
            original_height: base_shape.height(),
            shape: base_shape.clone(),
            base_shape,
            rotation: Rotation::R0,
            placement: None,
            pixel: Vector2::zeros(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.shape.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.shape.height()
    }

    pub fn base_shape(&self) -> &Shape {
        &self.base_shape
    }

    /// The shape at the current rotation
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Set the rotation, re-deriving the current shape from the base shape. Does not touch the
    /// grid; callers holding a placement must retract first.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.shape = self.base_shape.rotated(rotation);
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    pub fn placement(&self) -> Option<GridPos> {
        self.placement
    }

    /// Record a placement. Grid occupancy is the caller's business.
    pub fn set_placement(&mut self, placement: Option<GridPos>) {
        self.placement = placement;
    }

    /// Grid column, or -1 when not placed
    pub fn grid_x(&self) -> i32 {
        self.placement.map(|p| p.x).unwrap_or(-1)
    }

    /// Grid row, or -1 when not placed
    pub fn grid_y(&self) -> i32 {
        self.placement.map(|p| p.y).unwrap_or(-1)
    }

    /// Bounding box on the logical canvas
    pub fn bounds(&self, geometry: &GridGeometry) -> Rect {
        Rect::from_origin_size(self.pixel, geometry.cells_to_pixels(self.width(), self.height()))
    }

    /// Area of the bounding box in cells
    pub fn cell_area(&self) -> u32 {
        self.width() * self.height()
    }
}

fn normalize_shape(def: &ItemDefinition) -> Shape {
    let declared = Shape::rectangular(def.width, def.height);
    let rows = match def.shape {
        Some(ref rows) => rows,
        None => return declared,
    };

    match Shape::from_rows(rows) {
        Ok(shape) => {
            if shape.width() != def.width || shape.height() != def.height {
                warn!(
                    "Item {} declares {}x{} but its shape is {}x{}, using the shape",
                    def.id,
                    def.width,
                    def.height,
                    shape.width(),
                    shape.height()
                );
            }
            shape
        }
        Err(e) => {
            warn!(
                "Item {} has an unusable shape ({}), using a {}x{} rectangle",
                def.id,
                e,
                declared.width(),
                declared.height()
            );
            declared
        }
    }
}
