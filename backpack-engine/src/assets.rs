//! Opaque asset handles supplied by the host. Loading them is the host's business; the engine only
//! looks handles up by an item's sprite or audio key.

use backpack_common::item::Item;
use std::collections::HashMap;

/// Handles keyed by `spriteKey`/`audioKey`. `H` is whatever the host renders or plays with.
pub struct AssetHandles<H> {
    handles: HashMap<String, H>,
}

impl<H> Default for AssetHandles<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> AssetHandles<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, handle: H) -> Option<H> {
        self.handles.insert(key.into(), handle)
    }

    pub fn get(&self, key: &str) -> Option<&H> {
        self.handles.get(key)
    }

    /// How to draw `item`: its sprite if the handle exists, else a colored box with its name
    pub fn sprite_for<'a>(&'a self, item: &'a Item) -> Sprite<'a, H> {
        match item.sprite_key.as_deref().and_then(|key| self.get(key)) {
            Some(handle) => Sprite::Image(handle),
            None => Sprite::Fallback {
                color: &item.color,
                label: &item.name,
            },
        }
    }

    pub fn audio_for(&self, item: &Item) -> Option<&H> {
        item.audio_key.as_deref().and_then(|key| self.get(key))
    }
}

impl<H> FromIterator<(String, H)> for AssetHandles<H> {
    fn from_iter<T: IntoIterator<Item = (String, H)>>(iter: T) -> Self {
        Self {
            handles: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Sprite<'a, H> {
    Image(&'a H),
    /// No handle for the item's sprite key
    Fallback { color: &'a str, label: &'a str },
}
