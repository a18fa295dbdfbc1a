//! Placement and interaction engine for the backpack packing puzzle.
//!
//! An [Engine] owns the container grid, the items and the pointer state machine. Hosts feed it
//! pointer events in screen pixels and read back a render list, transient feedback and, once the
//! player is done, a [CompletionReport](engine::CompletionReport).

#[cfg(test)]
#[macro_use]
mod test_util;

pub mod assets;
pub mod config;
pub mod engine;
pub mod events;
pub mod feedback;
pub mod interaction;
pub mod persistence;
pub mod placement;
pub mod resize;
pub mod staging;
pub mod viewport;

pub use engine::Engine;
