use backpack_common::geometry::GridGeometry;
use backpack_common::grid::Grid;
use backpack_common::item::{Item, ItemDefinition};
use nalgebra::Vector2;

use crate::config::EngineConfig;
use crate::placement::Board;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// Item definitions as `"id": w x h`, all rectangular
macro_rules! item_defs {
    ($($id:literal : $w:literal x $h:literal),* $(,)?) => {
        vec![$(backpack_common::item::ItemDefinition::new($id, $w, $h)),*]
    };
}

/// 5x5 backpack with column 0 blocked in rows 0-2
pub fn backpack_mask() -> Vec<Vec<u8>> {
    vec![
        vec![0, 1, 1, 1, 1],
        vec![0, 1, 1, 1, 1],
        vec![0, 1, 1, 1, 1],
        vec![1, 1, 1, 1, 1],
        vec![1, 1, 1, 1, 1],
    ]
}

/// 2x4 with the bottom left cell empty
pub fn bong() -> ItemDefinition {
    ItemDefinition::new("bong", 2, 4).with_shape(vec![
        vec![1, 1],
        vec![1, 1],
        vec![1, 1],
        vec![0, 1],
    ])
}

/// Board for the backpack mask with its grid origin at (100, 50) and 50 unit cells
pub fn backpack_board() -> Board {
    let grid = Grid::new(5, 5, &backpack_mask()).expect("Valid test mask");
    Board::new(grid, GridGeometry::new(Vector2::new(100.0, 50.0), 50.0, 5, 5))
}

pub fn make_items(defs: &[ItemDefinition]) -> Vec<Item> {
    defs.iter().map(Item::from_definition).collect()
}

/// A 5x5 masked backpack on the default canvas with a handful of the real items
pub fn backpack_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.container.mask = Some(backpack_mask());

    config.items = item_defs![
        "baseball": 1 x 1,
        "jestervest": 3 x 1,
        "papertowels": 2 x 3,
        "cups": 1 x 3,
        "dice": 1 x 1,
    ];
    config.items.insert(1, bong());
    config.required_items = vec!["bong".into(), "baseball".into()];

    config
}
