use backpack_common::grid::CellState;
use backpack_common::item::ItemDefinition;
use backpack_common::ItemId;

use super::*;
use crate::placement::Board;
use crate::test_util::*;

fn init() -> (Board, Vec<Item>, InteractionController) {
    init_logging();
    let mut items = make_items(&[bong(), ItemDefinition::new("dice", 1, 1)]);
    items[0].pixel = Vector2::new(600.0, 100.0);
    items[1].pixel = Vector2::new(500.0, 100.0);
    (backpack_board(), items, InteractionController::new())
}

fn v(x: f32, y: f32) -> Vector2<f32> {
    Vector2::new(x, y)
}

fn occupancy(board: &Board) -> Vec<CellState> {
    board.grid().iter_cells().map(|(_, c)| c.clone()).collect()
}

#[test]
fn hovering_follows_the_pointer() {
    let (board, mut items, mut ctl) = init();

    ctl.pointer_move(&board, &mut items, v(510.0, 110.0));
    assert_eq!(ctl.state(), &InteractionState::Hovering(1));
    assert_eq!(ctl.active(), Some(1));

    ctl.pointer_move(&board, &mut items, v(0.0, 0.0));
    assert_eq!(ctl.state(), &InteractionState::Idle);
    assert_eq!(ctl.active(), None);
}

#[test]
fn drag_onto_open_cells_places() -> Result<()> {
    let (mut board, mut items, mut ctl) = init();
    let mut events = Vec::new();

    let picked = ctl.pointer_down(&mut board, &mut items, v(510.0, 110.0), &mut events)?;
    assert_eq!(picked, Some(1));
    assert_eq!(ctl.dragged(), Some(1));

    // The grid is not touched while dragging
    ctl.pointer_move(&board, &mut items, v(260.0, 160.0));
    assert_eq!(items[1].pixel, v(250.0, 150.0));
    assert!(occupancy(&board).iter().all(|c| c.owner().is_none()));

    let outcome = ctl.pointer_up(&mut board, &mut items, v(260.0, 160.0), &mut events)?;
    assert_eq!(outcome, Some(DropOutcome::Placed { x: 3, y: 2 }));
    assert_eq!(items[1].placement(), Some(GridPos::new(3, 2)));
    assert_eq!(board.grid().get_cell(3, 2)?, &CellState::Occupied(ItemId::new("dice")));
    assert_eq!(ctl.state(), &InteractionState::Idle);

    let dice = ItemId::new("dice");
    assert_eq!(
        events,
        vec![
            Event::Pickup(dice.clone()),
            Event::Place {
                item: dice.clone(),
                x: 3,
                y: 2
            },
            Event::Drop {
                item: dice,
                placed: true
            },
        ]
    );
    Ok(())
}

#[test]
fn drop_outside_the_container_stays_put() -> Result<()> {
    let (mut board, mut items, mut ctl) = init();
    let mut events = Vec::new();

    // Grab the bong by its top left corner so the drop point is its new position
    ctl.pointer_down(&mut board, &mut items, v(600.0, 100.0), &mut events)?;
    let outcome = ctl.pointer_up(&mut board, &mut items, v(900.0, 400.0), &mut events)?;

    assert_eq!(outcome, Some(DropOutcome::Staged));
    assert!(!items[0].is_placed());
    assert_eq!(items[0].pixel, v(900.0, 400.0));
    assert!(occupancy(&board).iter().all(|c| c.owner().is_none()));
    Ok(())
}

#[test]
fn invalid_drop_reverts_to_drag_start() -> Result<()> {
    let (mut board, mut items, mut ctl) = init();
    let mut events = Vec::new();

    ctl.pointer_down(&mut board, &mut items, v(600.0, 100.0), &mut events)?;
    // Over (0, 0), where the mask blocks the bong's left column
    ctl.pointer_move(&board, &mut items, v(100.0, 50.0));
    assert_eq!(
        ctl.drop_preview(&board, &items),
        Some(DropPreview {
            x: 0,
            y: 0,
            valid: false
        })
    );

    let outcome = ctl.pointer_up(&mut board, &mut items, v(100.0, 50.0), &mut events)?;
    assert_eq!(outcome, Some(DropOutcome::Rejected { restored: false }));
    assert!(!items[0].is_placed());
    assert_eq!(items[0].pixel, v(600.0, 100.0));
    assert!(events.contains(&Event::Reject(ItemId::new("bong"))));
    Ok(())
}

#[test]
fn lifted_item_goes_back_on_the_grid() -> Result<()> {
    let (mut board, mut items, mut ctl) = init();
    let mut events = Vec::new();

    board.place(&mut items[0], 1, 0)?;
    let before = occupancy(&board);

    ctl.pointer_down(&mut board, &mut items, v(160.0, 60.0), &mut events)?;
    assert!(!items[0].is_placed());
    assert_eq!(board.grid().cells_owned_by(&items[0].id).count(), 0);
    assert_eq!(
        events,
        vec![
            Event::Retract(ItemId::new("bong")),
            Event::Pickup(ItemId::new("bong"))
        ]
    );

    let outcome = ctl.pointer_up(&mut board, &mut items, v(110.0, 60.0), &mut events)?;
    assert_eq!(outcome, Some(DropOutcome::Rejected { restored: true }));
    assert_eq!(items[0].placement(), Some(GridPos::new(1, 0)));
    assert_eq!(items[0].pixel, v(150.0, 50.0));
    assert_eq!(occupancy(&board), before);
    Ok(())
}

#[test]
fn only_one_drag_at_a_time() -> Result<()> {
    let (mut board, mut items, mut ctl) = init();
    let mut events = Vec::new();

    ctl.pointer_down(&mut board, &mut items, v(510.0, 110.0), &mut events)?;
    let second = ctl.pointer_down(&mut board, &mut items, v(610.0, 110.0), &mut events)?;

    assert_eq!(second, None);
    assert_eq!(ctl.dragged(), Some(1));
    assert_eq!(events.len(), 1);

    // Releasing with nothing dragged is a no-op
    ctl.pointer_up(&mut board, &mut items, v(510.0, 110.0), &mut events)?;
    assert_eq!(
        ctl.pointer_up(&mut board, &mut items, v(510.0, 110.0), &mut events)?,
        None
    );
    Ok(())
}

#[test]
fn preview_is_none_away_from_the_container() -> Result<()> {
    let (mut board, mut items, mut ctl) = init();
    let mut events = Vec::new();

    assert_eq!(ctl.drop_preview(&board, &items), None);

    ctl.pointer_down(&mut board, &mut items, v(510.0, 110.0), &mut events)?;
    assert_eq!(ctl.drop_preview(&board, &items), None);

    ctl.pointer_move(&board, &mut items, v(310.0, 260.0));
    assert_eq!(
        ctl.drop_preview(&board, &items),
        Some(DropPreview {
            x: 4,
            y: 4,
            valid: true
        })
    );
    Ok(())
}

#[test]
fn unplaced_items_are_hit_first() -> Result<()> {
    let (mut board, mut items, _) = init();

    board.place(&mut items[1], 3, 3)?;
    // Staged bong drawn over the placed dice
    items[0].pixel = v(240.0, 190.0);

    assert_eq!(hit_test(&board, &items, v(260.0, 210.0)), Some(0));
    assert_eq!(hit_test(&board, &items, v(290.0, 240.0)), Some(0));
    items[0].pixel = v(600.0, 100.0);
    assert_eq!(hit_test(&board, &items, v(260.0, 210.0)), Some(1));
    Ok(())
}
