//! Typed engine configuration. Every field has a default so hosts only need to supply what they
//! care about; [EngineConfig::validate] runs before an engine is built from it.

use anyhow::{Context, Result};
use backpack_common::item::ItemDefinition;
use backpack_common::snapshot::MemorySnapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;

/// The container grid and where it sits on the canvas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerConfig {
    /// Number of columns
    pub width: u32,
    /// Number of rows
    pub height: u32,
    /// Edge length of a cell, in logical units
    pub cell_size: f32,
    /// `height` rows of `width` columns, non-zero for open cells. All cells are open when absent
    /// or malformed.
    pub mask: Option<Vec<Vec<u8>>>,
    /// Shift applied to the centered grid, for lining it up with a background image
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            cell_size: 50.0,
            mask: None,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// The fixed logical canvas that all engine coordinates live in
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    /// Space reserved at the top of the canvas for the host's header
    pub header_offset: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            header_offset: 30.0,
        }
    }
}

/// Layout of the staging areas either side of the container
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StagingConfig {
    /// Distance between the staging regions and the container or canvas edges
    pub padding: f32,
    /// Minimum distance between two staged items on the same shelf
    pub item_gap: f32,
    /// Step of the fallback scan when no shelf has room
    pub scan_step: f32,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            item_gap: 10.0,
            scan_step: 20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    /// How long transient feedback stays visible
    pub feedback_ms: u64,
    /// Quiet period before a burst of resize events is applied
    pub resize_debounce_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            feedback_ms: 1500,
            resize_debounce_ms: 150,
        }
    }
}

/// Overall engine configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub container: ContainerConfig,
    pub canvas: CanvasConfig,
    pub staging: StagingConfig,
    pub interaction: InteractionConfig,
    pub items: Vec<ItemDefinition>,
    /// Ids that must be packed for a solution to count
    pub required_items: Vec<String>,
    /// Memory from an earlier session of the same container
    pub memory: Option<MemorySnapshot>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    NotPositive { field: &'static str, value: f32 },
    EmptyContainer { width: u32, height: u32 },
    EmptyItemId { index: usize },
    DuplicateItem(String),
    UnknownRequiredItem(String),
}

impl std::error::Error for ConfigError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            Self::EmptyContainer { width, height } => {
                write!(f, "container must have at least one cell, got {}x{}", width, height)
            }
            Self::EmptyItemId { index } => write!(f, "item {} has an empty id", index),
            Self::DuplicateItem(id) => write!(f, "item id {} is used more than once", id),
            Self::UnknownRequiredItem(id) => {
                write!(f, "required item {} is not in the item list", id)
            }
        }
    }
}

impl EngineConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).context("Parsing engine configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration can produce a working engine. A malformed mask is not an error
    /// here, the grid falls back to all-open when it is built.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("container.cellSize", self.container.cell_size),
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("staging.scanStep", self.staging.scan_step),
        ] {
            // Written so NaN fails too
            if !(value > 0.0) {
                Err(ConfigError::NotPositive { field, value })?
            }
        }

        if self.container.width == 0 || self.container.height == 0 {
            Err(ConfigError::EmptyContainer {
                width: self.container.width,
                height: self.container.height,
            })?
        }

        let mut seen = HashSet::new();
        for (index, def) in self.items.iter().enumerate() {
            if def.id.is_empty() {
                Err(ConfigError::EmptyItemId { index })?
            }
            if !seen.insert(def.id.as_str()) {
                Err(ConfigError::DuplicateItem(def.id.clone()))?
            }
        }

        for id in self.required_items.iter() {
            if !seen.contains(id.as_str()) {
                Err(ConfigError::UnknownRequiredItem(id.clone()))?
            }
        }

        Ok(())
    }
}
