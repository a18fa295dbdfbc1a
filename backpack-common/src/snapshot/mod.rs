//! Session memory: where every item was and whether it was placed. Grid occupancy is never part of
//! the snapshot, it is re-derived from the placed records on restore.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::item::Item;
use crate::shape::Rotation;
use crate::ItemId;

mod serialization;


/// Remembered state of one item
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// Grid column, -1 if not placed
    pub grid_x: i32,
    /// Grid row, -1 if not placed
    pub grid_y: i32,
    pub pixel_x: f32,
    pub pixel_y: f32,
    #[serde(default)]
    pub rotation: Rotation,
    pub is_placed: bool,
}

impl MemoryRecord {
    pub fn from_item(item: &Item) -> Self {
        Self {
            grid_x: item.grid_x(),
            grid_y: item.grid_y(),
            pixel_x: item.pixel.x,
            pixel_y: item.pixel.y,
            rotation: item.rotation(),
            is_placed: item.is_placed(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemorySnapshot {
    records: BTreeMap<ItemId, MemoryRecord>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        Self {
            records: items
                .into_iter()
                .map(|item| (item.id.clone(), MemoryRecord::from_item(item)))
                .collect(),
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<&MemoryRecord> {
        self.records.get(id)
    }

    pub fn insert(&mut self, id: ItemId, record: MemoryRecord) -> Option<MemoryRecord> {
        self.records.insert(id, record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &MemoryRecord)> {
        self.records.iter()
    }

    /// Ids of every record flagged as placed
    pub fn placed_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.records
            .iter()
            .filter(|(_, r)| r.is_placed)
            .map(|(id, _)| id)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Serializing memory snapshot")
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Parsing memory snapshot")
    }
}
