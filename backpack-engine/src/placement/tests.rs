use std::collections::BTreeSet;

use backpack_common::grid::CellState;
use backpack_common::item::ItemDefinition;
use backpack_common::shape::{Rotation, ALL_ROTATIONS};
use nalgebra::Vector2;

use super::*;
use crate::test_util::*;

fn occupancy(board: &Board) -> Vec<((u32, u32), CellState)> {
    board
        .grid()
        .iter_cells()
        .map(|(pos, cell)| (pos, cell.clone()))
        .collect()
}

fn check_error(err: anyhow::Error, expected: PlacementError) {
    assert_eq!(err.downcast_ref::<PlacementError>(), Some(&expected));
}

#[test]
fn bong_respects_the_mask() -> Result<()> {
    init_logging();
    let mut board = backpack_board();
    let mut bong = Item::from_definition(&bong());

    assert!(!board.is_valid_placement(&bong.id, bong.shape(), 0, 0));
    let err = board.place(&mut bong, 0, 0).expect_err("Placed over masked cells");
    check_error(
        err,
        PlacementError::Invalid {
            id: bong.id.clone(),
            x: 0,
            y: 0,
        },
    );
    assert!(!bong.is_placed());

    assert!(board.is_valid_placement(&bong.id, bong.shape(), 1, 0));
    board.place(&mut bong, 1, 0)?;
    assert_eq!(bong.placement(), Some(GridPos::new(1, 0)));
    assert_eq!(bong.pixel, Vector2::new(150.0, 50.0));

    Ok(())
}

#[test]
fn masked_cells_are_never_valid() {
    let board = backpack_board();
    let id = ItemId::new("probe");

    for rotation in ALL_ROTATIONS {
        let shape = bong().shape.map(|rows| Shape::from_rows(&rows).unwrap()).unwrap();
        let shape = shape.rotated(rotation);

        for y in -1..6 {
            for x in -1..6 {
                let hits_mask = shape
                    .solid_cells()
                    .any(|(dx, dy)| !board.grid().is_open(x + dx as i32, y + dy as i32));
                if hits_mask {
                    assert!(
                        !board.is_valid_placement(&id, &shape, x, y),
                        "{} at ({}, {}) accepted",
                        rotation,
                        x,
                        y
                    );
                }
            }
        }
    }
}

#[test]
fn occupancy_matches_shape_cells_exactly() -> Result<()> {
    let mut board = backpack_board();
    let mut items = make_items(&[bong(), ItemDefinition::new("papertowels", 2, 3)]);

    board.place(&mut items[0], 1, 0)?;
    board.place(&mut items[1], 3, 2)?;

    for item in items.iter() {
        let pos = item.placement().unwrap();
        let expected: BTreeSet<_> = item
            .shape()
            .solid_cells()
            .map(|(dx, dy)| (pos.x as u32 + dx, pos.y as u32 + dy))
            .collect();
        let owned: BTreeSet<_> = board.grid().cells_owned_by(&item.id).collect();
        assert_eq!(owned, expected, "{}", item.id);
    }

    Ok(())
}

#[test]
fn shapes_interlock_through_empty_cells() -> Result<()> {
    let mut board = backpack_board();
    let mut items = make_items(&[bong(), ItemDefinition::new("dice", 1, 1)]);

    board.place(&mut items[0], 1, 0)?;

    // (1, 3) is inside the bong's bounding box but not one of its cells
    assert!(board.is_valid_placement(&items[1].id, items[1].shape(), 1, 3));
    assert!(!board.is_valid_placement(&items[1].id, items[1].shape(), 2, 3));
    board.place(&mut items[1], 1, 3)?;

    assert_eq!(
        board.grid().get_cell(1, 3)?,
        &CellState::Occupied(ItemId::new("dice"))
    );
    Ok(())
}

#[test]
fn retract_then_place_is_a_no_op() -> Result<()> {
    let mut board = backpack_board();
    let mut items = make_items(&[bong(), ItemDefinition::new("cups", 1, 3)]);

    board.place(&mut items[0], 1, 1)?;
    board.place(&mut items[1], 4, 0)?;
    let before = occupancy(&board);

    board.retract(&mut items[0])?;
    assert!(!items[0].is_placed());
    assert_eq!((items[0].grid_x(), items[0].grid_y()), (-1, -1));
    assert_eq!(board.grid().cells_owned_by(&items[0].id).count(), 0);

    board.place(&mut items[0], 1, 1)?;
    assert_eq!(occupancy(&board), before);

    let err = board.retract(&mut items[1]).and_then(|_| board.retract(&mut items[1]));
    check_error(
        err.expect_err("Retracted twice"),
        PlacementError::NotPlaced(ItemId::new("cups")),
    );

    Ok(())
}

#[test]
fn placing_again_moves_the_item() -> Result<()> {
    let mut board = backpack_board();
    let mut cups = Item::from_definition(&ItemDefinition::new("cups", 1, 3));

    board.place(&mut cups, 4, 0)?;
    // Overlaps its own old cells, which must not count as a collision
    board.place(&mut cups, 4, 1)?;

    let owned: BTreeSet<_> = board.grid().cells_owned_by(&cups.id).collect();
    assert_eq!(owned, [(4, 1), (4, 2), (4, 3)].into_iter().collect());
    Ok(())
}

#[test]
fn blocked_rotation_leaves_item_untouched() -> Result<()> {
    let mut board = backpack_board();
    let canvas = Rect::new(0.0, 0.0, 1600.0, 900.0);
    let mut vest = Item::from_definition(&ItemDefinition::new("jestervest", 3, 1));

    board.place(&mut vest, 2, 4)?;
    let before = occupancy(&board);

    let err = board
        .rotate_in_place(&mut vest, &canvas)
        .expect_err("Rotated off the grid");
    check_error(err, PlacementError::RotationBlocked(vest.id.clone()));

    assert_eq!(vest.rotation(), Rotation::R0);
    assert_eq!((vest.width(), vest.height()), (3, 1));
    assert_eq!(occupancy(&board), before);
    Ok(())
}

#[test]
fn placed_rotation_re_marks_cells() -> Result<()> {
    let mut board = backpack_board();
    let canvas = Rect::new(0.0, 0.0, 1600.0, 900.0);
    let mut vest = Item::from_definition(&ItemDefinition::new("jestervest", 3, 1));

    board.place(&mut vest, 2, 0)?;
    board.rotate_in_place(&mut vest, &canvas)?;

    assert_eq!(vest.rotation(), Rotation::R90);
    assert_eq!(vest.placement(), Some(GridPos::new(2, 0)));
    let owned: BTreeSet<_> = board.grid().cells_owned_by(&vest.id).collect();
    assert_eq!(owned, [(2, 0), (2, 1), (2, 2)].into_iter().collect());
    assert_eq!(board.grid().get_cell(3, 0)?, &CellState::Empty);
    Ok(())
}

#[test]
fn staged_rotation_stays_on_canvas() -> Result<()> {
    let mut board = backpack_board();
    let canvas = Rect::new(0.0, 0.0, 1600.0, 900.0);
    let mut shield = Item::from_definition(&ItemDefinition::new("shield", 3, 5));
    shield.pixel = Vector2::new(1500.0, 700.0);

    board.rotate_in_place(&mut shield, &canvas)?;

    assert_eq!((shield.width(), shield.height()), (5, 3));
    assert_eq!(shield.pixel, Vector2::new(1350.0, 700.0));
    assert!(canvas.encloses(&shield.bounds(board.geometry())));
    assert_eq!(board.grid().iter_cells().filter(|(_, c)| c.owner().is_some()).count(), 0);
    Ok(())
}

#[test]
fn snapping_clamps_to_the_grid() {
    let board = backpack_board();
    let mut vest = Item::from_definition(&ItemDefinition::new("jestervest", 3, 1));

    // Just under half a cell past (1, 2)
    vest.pixel = Vector2::new(150.0 + 24.0, 150.0 + 20.0);
    assert_eq!(board.snap_origin(&vest), (1, 2));

    // Half a cell rounds up
    vest.pixel = Vector2::new(150.0 + 25.0, 150.0);
    assert_eq!(board.snap_origin(&vest), (2, 2));

    // Hanging off the right and bottom edges
    vest.pixel = Vector2::new(320.0, 400.0);
    assert_eq!(board.snap_origin(&vest), (2, 4));

    vest.pixel = Vector2::new(-200.0, 10.0);
    assert_eq!(board.snap_origin(&vest), (0, 0));
    assert!(!board.overlaps_container(&vest));
}
