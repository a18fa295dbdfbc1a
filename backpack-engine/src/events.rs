//! Observer hooks. Collaborators such as audio subscribe here to hear about pickups, drops and
//! rotations instead of wrapping engine methods.

use backpack_common::shape::Rotation;
use backpack_common::snapshot::MemorySnapshot;
use backpack_common::ItemId;
use std::collections::BTreeSet;

/// Something that happened during play, in the order it happened
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// An item was picked up and is now being dragged
    Pickup(ItemId),
    /// The dragged item was released; `placed` tells whether it ended up on the grid
    Drop { item: ItemId, placed: bool },
    Place { item: ItemId, x: i32, y: i32 },
    /// A drop onto the container did not fit
    Reject(ItemId),
    /// A placed item left the grid
    Retract(ItemId),
    Rotate { item: ItemId, rotation: Rotation },
    RotateBlocked(ItemId),
    Reset,
    Complete {
        placed: BTreeSet<ItemId>,
        memory: MemorySnapshot,
    },
}

/// Receives engine events. Every hook defaults to doing nothing, so implementors only override
/// the ones they care about.
pub trait Observer {
    fn on_pickup(&mut self, _item: &ItemId) {}
    fn on_drop(&mut self, _item: &ItemId, _placed: bool) {}
    fn on_place(&mut self, _item: &ItemId, _x: i32, _y: i32) {}
    fn on_reject(&mut self, _item: &ItemId) {}
    fn on_retract(&mut self, _item: &ItemId) {}
    fn on_rotate(&mut self, _item: &ItemId, _rotation: Rotation) {}
    fn on_rotate_blocked(&mut self, _item: &ItemId) {}
    fn on_reset(&mut self) {}
    fn on_complete(&mut self, _placed: &BTreeSet<ItemId>, _memory: &MemorySnapshot) {}
}

#[derive(Default)]
pub struct Observers {
    list: Vec<Box<dyn Observer>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.list.push(observer);
    }

    /// Hand every event to every observer, in subscription order
    pub fn dispatch<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) {
        for event in events {
            for observer in self.list.iter_mut() {
                match event {
                    Event::Pickup(item) => observer.on_pickup(item),
                    Event::Drop { item, placed } => observer.on_drop(item, *placed),
                    Event::Place { item, x, y } => observer.on_place(item, *x, *y),
                    Event::Reject(item) => observer.on_reject(item),
                    Event::Retract(item) => observer.on_retract(item),
                    Event::Rotate { item, rotation } => observer.on_rotate(item, *rotation),
                    Event::RotateBlocked(item) => observer.on_rotate_blocked(item),
                    Event::Reset => observer.on_reset(),
                    Event::Complete { placed, memory } => observer.on_complete(placed, memory),
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Drops(Rc<RefCell<Vec<(ItemId, bool)>>>);

    impl Observer for Drops {
        fn on_drop(&mut self, item: &ItemId, placed: bool) {
            self.0.borrow_mut().push((item.clone(), placed));
        }
    }

    #[test]
    fn observers_only_hear_what_they_override() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::new();
        observers.subscribe(Box::new(Drops(seen.clone())));

        let dice = ItemId::new("dice");
        observers.dispatch(&[
            Event::Pickup(dice.clone()),
            Event::Place {
                item: dice.clone(),
                x: 1,
                y: 2,
            },
            Event::Drop {
                item: dice.clone(),
                placed: true,
            },
            Event::Reset,
        ]);

        assert_eq!(&*seen.borrow(), &[(dice, true)]);
    }
}
