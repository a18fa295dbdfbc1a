//! The engine instance: owns the board, the items and the pointer state machine, and is the only
//! thing hosts talk to.

use anyhow::Result;
use backpack_common::geometry::{GridGeometry, Rect};
use backpack_common::grid::Grid;
use backpack_common::item::Item;
use backpack_common::shape::{Rotation, Shape};
use backpack_common::snapshot::MemorySnapshot;
use backpack_common::ItemId;
use itertools::Itertools;
use log::{debug, info, warn};
use nalgebra::Vector2;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::assets::{AssetHandles, Sprite};
use crate::config::EngineConfig;
use crate::events::{Event, Observer, Observers};
use crate::feedback::{self, Feedback, FeedbackSlot};
use crate::interaction::{DropOutcome, DropPreview, InteractionController, InteractionState};
use crate::persistence;
use crate::placement::{Board, PlacementError, PlacementSurface};
use crate::resize::ResizeDebouncer;
use crate::staging::shelf::ShelfAllocator;
use crate::staging::{StagingAllocator, StagingRegions};
use crate::viewport::Viewport;


pub type CompletionCallback = Box<dyn FnMut(&BTreeSet<ItemId>, &MemorySnapshot)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub placed: usize,
    pub total: usize,
}

/// Outcome of checking the packed items against the required list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionReport {
    /// Every required item is packed
    pub success: bool,
    pub packed_count: usize,
    pub missing_required: Vec<ItemId>,
    /// Ten points per packed item, or nothing if a required item is missing
    pub score: usize,
}

/// What the host gets when the player is done
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    #[serde(rename = "packedItems")]
    pub placed: BTreeSet<ItemId>,
    pub memory: MemorySnapshot,
    pub total_packed: usize,
    pub total_available: usize,
}

/// One entry of the render list
#[derive(Debug)]
pub struct RenderItem<'a, H> {
    pub id: &'a ItemId,
    /// Bounding box on the logical canvas
    pub rect: Rect,
    pub rotation: Rotation,
    pub shape: &'a Shape,
    pub placed: bool,
    pub dragged: bool,
    pub sprite: Sprite<'a, H>,
}

pub struct Engine<H> {
    config: EngineConfig,
    board: Board,
    items: Vec<Item>,
    required: BTreeSet<ItemId>,

    staging: StagingRegions,
    allocator: ShelfAllocator,

    interaction: InteractionController,
    viewport: Viewport,
    resize: ResizeDebouncer,
    feedback: FeedbackSlot,

    assets: AssetHandles<H>,
    observers: Observers,
    on_complete: Option<CompletionCallback>,
}

/// Grid placement on the canvas: centered, pushed down by the header, then shifted by the
/// configured offsets
fn container_geometry(config: &EngineConfig) -> GridGeometry {
    let container = &config.container;
    let canvas = &config.canvas;
    let size = Vector2::new(
        container.width as f32 * container.cell_size,
        container.height as f32 * container.cell_size,
    );

    let origin = Vector2::new(
        (canvas.width - size.x) / 2.0 + container.offset_x,
        (canvas.height - size.y) / 2.0 + canvas.header_offset + container.offset_y,
    );

    GridGeometry::new(origin, container.cell_size, container.width, container.height)
}

impl<H> Engine<H> {
    /// Build an engine from a configuration and the host's already loaded assets. Remembered
    /// state in `config.memory` is applied before anything is laid out in staging.
    pub fn start(config: EngineConfig, assets: AssetHandles<H>) -> Result<Self> {
        let _span = tracing::info_span!("engine_start").entered();
        config.validate()?;

        let container = &config.container;
        let grid = Grid::with_mask_or_open(
            container.width,
            container.height,
            container.mask.as_deref(),
        );
        let geometry = container_geometry(&config);
        let staging = StagingRegions::around(&geometry.bounds(), &config.canvas, &config.staging);

        let items = config.items.iter().map(Item::from_definition).collect_vec();
        for item in items.iter() {
            if let Some(key) = item.sprite_key.as_deref() {
                if assets.get(key).is_none() {
                    warn!("No sprite for {} (key {}), drawing a placeholder", item.id, key);
                }
            }
        }

        let mut engine = Engine {
            board: Board::new(grid, geometry),
            items,
            required: config.required_items.iter().map(ItemId::new).collect(),
            staging,
            allocator: ShelfAllocator::from_config(&config.staging),
            interaction: InteractionController::new(),
            viewport: Viewport::new(config.canvas.width, config.canvas.height),
            resize: ResizeDebouncer::new(Duration::from_millis(
                config.interaction.resize_debounce_ms,
            )),
            feedback: FeedbackSlot::new(Duration::from_millis(config.interaction.feedback_ms)),
            assets,
            observers: Observers::new(),
            on_complete: None,
            config,
        };

        let unstaged = match engine.config.memory {
            Some(ref memory) => {
                persistence::restore(&mut engine.items, memory, &mut engine.board).unstaged
            }
            None => (0..engine.items.len()).collect(),
        };
        engine.layout(&unstaged);

        info!(
            "Started with {} items on a {}x{} grid, {} restored onto the grid",
            engine.items.len(),
            geometry.width,
            geometry.height,
            engine.progress().placed
        );
        engine.board.grid().debug_dump();

        Ok(engine)
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.subscribe(observer);
    }

    /// Register the callback [Engine::complete] hands the placed ids and memory to
    pub fn on_complete(&mut self, callback: impl FnMut(&BTreeSet<ItemId>, &MemorySnapshot) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn grid(&self) -> &Grid {
        self.board.grid()
    }

    pub fn geometry(&self) -> &GridGeometry {
        self.board.geometry()
    }

    pub fn staging_regions(&self) -> &StagingRegions {
        &self.staging
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn interaction_state(&self) -> &InteractionState {
        self.interaction.state()
    }

    pub fn dragged(&self) -> Option<&ItemId> {
        self.interaction.dragged().map(|i| &self.items[i].id)
    }

    pub fn hovered(&self) -> Option<&ItemId> {
        self.interaction.hovered().map(|i| &self.items[i].id)
    }

    fn index_of(&self, id: &ItemId) -> Result<usize> {
        Ok(self
            .items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| PlacementError::UnknownItem(id.clone()))?)
    }

    fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.canvas.width, self.config.canvas.height)
    }

    /// Position the given items in staging, around any staged item that keeps its position
    fn layout(&mut self, indices: &[usize]) {
        let geometry = *self.board.geometry();
        let sizes = indices
            .iter()
            .map(|i| geometry.cells_to_pixels(self.items[*i].width(), self.items[*i].height()))
            .collect_vec();
        let obstacles = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, item)| !item.is_placed() && !indices.contains(i))
            .map(|(_, item)| item.bounds(&geometry))
            .collect_vec();

        let positions = self.allocator.allocate(&self.staging, &sizes, &obstacles);
        for (i, pos) in indices.iter().zip(positions) {
            self.items[*i].pixel = pos;
        }
    }

    fn emit(&mut self, events: &[Event]) {
        self.observers.dispatch(events);
    }

    /// Press at a screen position. Returns the picked up item, if any.
    pub fn pointer_down(&mut self, screen: Vector2<f32>) -> Result<Option<ItemId>> {
        let p = self.viewport.to_logical(screen);
        let mut events = Vec::new();

        let picked =
            self.interaction
                .pointer_down(&mut self.board, &mut self.items, p, &mut events)?;
        self.emit(&events);

        Ok(picked.map(|i| self.items[i].id.clone()))
    }

    pub fn pointer_move(&mut self, screen: Vector2<f32>) {
        let p = self.viewport.to_logical(screen);
        self.interaction.pointer_move(&self.board, &mut self.items, p);
    }

    /// Release at a screen position. Returns `None` if nothing was being dragged.
    pub fn pointer_up(&mut self, screen: Vector2<f32>) -> Result<Option<DropOutcome>> {
        let p = self.viewport.to_logical(screen);
        let mut events = Vec::new();

        let outcome =
            self.interaction
                .pointer_up(&mut self.board, &mut self.items, p, &mut events)?;

        match outcome {
            Some(DropOutcome::Placed { .. }) => self
                .feedback
                .show(Feedback::success(feedback::ITEM_PLACED), Instant::now()),
            Some(DropOutcome::Rejected { .. }) => self
                .feedback
                .show(Feedback::error(feedback::INVALID_PLACEMENT), Instant::now()),
            Some(DropOutcome::Staged) | None => {}
        }
        self.emit(&events);

        Ok(outcome)
    }

    /// Ghost of the dragged item on the grid
    pub fn drop_preview(&self) -> Option<DropPreview> {
        self.interaction.drop_preview(&self.board, &self.items)
    }

    /// Rotate the dragged item, or the hovered one if nothing is dragged. Returns whether
    /// anything turned.
    pub fn rotate(&mut self) -> Result<bool> {
        match self.interaction.active() {
            Some(i) => self.rotate_index(i),
            None => Ok(false),
        }
    }

    /// Rotate a specific item. Returns `false` if a placed item has no room to turn.
    pub fn rotate_item(&mut self, id: &ItemId) -> Result<bool> {
        let i = self.index_of(id)?;
        self.rotate_index(i)
    }

    fn rotate_index(&mut self, i: usize) -> Result<bool> {
        let canvas = self.canvas_rect();

        match self.board.rotate_in_place(&mut self.items[i], &canvas) {
            Ok(()) => {
                let item = &self.items[i];
                let event = Event::Rotate {
                    item: item.id.clone(),
                    rotation: item.rotation(),
                };
                self.emit(&[event]);
                Ok(true)
            }
            Err(e) => match e.downcast_ref::<PlacementError>() {
                Some(PlacementError::RotationBlocked(id)) => {
                    debug!("{}", e);
                    let event = Event::RotateBlocked(id.clone());
                    self.feedback
                        .show(Feedback::error(feedback::ROTATION_BLOCKED), Instant::now());
                    self.emit(&[event]);
                    Ok(false)
                }
                _ => Err(e),
            },
        }
    }

    /// Note a new display size. Nothing changes until [Engine::tick] sees the burst has settled.
    pub fn resize(&mut self, display_width: f32, display_height: f32, now: Instant) {
        self.resize
            .request(Vector2::new(display_width, display_height), now);
    }

    /// Apply a settled resize to the viewport. Returns whether a resize was applied.
    ///
    /// Staging regions live on the logical canvas, so staged items keep their positions.
    pub fn tick(&mut self, now: Instant) -> bool {
        let size = match self.resize.poll(now) {
            Some(size) => size,
            None => return false,
        };

        self.viewport.resize(size.x, size.y);
        debug!(
            "Resized to {}x{}, scale {}",
            size.x,
            size.y,
            self.viewport.scale()
        );
        true
    }

    /// Empty the grid, turn every item back to its base rotation and lay everything out in
    /// staging again.
    pub fn reset(&mut self) {
        self.interaction.reset();
        self.board.clear();
        for item in self.items.iter_mut() {
            item.set_placement(None);
            item.set_rotation(Rotation::R0);
        }

        let all = (0..self.items.len()).collect_vec();
        self.layout(&all);

        self.feedback
            .show(Feedback::success(feedback::GAME_RESET), Instant::now());
        self.emit(&[Event::Reset]);
        info!("Reset {} items", self.items.len());
    }

    pub fn progress(&self) -> Progress {
        Progress {
            placed: self.items.iter().filter(|item| item.is_placed()).count(),
            total: self.items.len(),
        }
    }

    /// The player may finish once anything is packed
    pub fn can_continue(&self) -> bool {
        self.progress().placed > 0
    }

    /// The current transient message, if it has not expired by `now`
    pub fn feedback(&self, now: Instant) -> Option<&Feedback> {
        self.feedback.current(now)
    }

    pub fn placed_ids(&self) -> BTreeSet<ItemId> {
        self.items
            .iter()
            .filter(|item| item.is_placed())
            .map(|item| item.id.clone())
            .collect()
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        persistence::snapshot(&self.items)
    }

    pub fn validate_solution(&self) -> SolutionReport {
        let placed = self.placed_ids();
        let missing_required = self
            .required
            .iter()
            .filter(|id| !placed.contains(*id))
            .cloned()
            .collect_vec();
        let success = missing_required.is_empty();

        SolutionReport {
            success,
            packed_count: placed.len(),
            missing_required,
            score: if success { placed.len() * 10 } else { 0 },
        }
    }

    /// Everything to draw, back to front: placed items, then staged items, then the dragged item
    pub fn render_list(&self) -> Vec<RenderItem<'_, H>> {
        let geometry = self.board.geometry();
        let dragged = self.interaction.dragged();

        let entry = |i: usize| {
            let item = &self.items[i];
            RenderItem {
                id: &item.id,
                rect: item.bounds(geometry),
                rotation: item.rotation(),
                shape: item.shape(),
                placed: item.is_placed(),
                dragged: Some(i) == dragged,
                sprite: self.assets.sprite_for(item),
            }
        };

        let (placed, staged): (Vec<usize>, Vec<usize>) = (0..self.items.len())
            .filter(|i| Some(*i) != dragged)
            .partition(|i| self.items[*i].is_placed());

        placed
            .into_iter()
            .chain(staged)
            .chain(dragged)
            .map(entry)
            .collect()
    }

    /// Finish the session: hand the placed ids and memory to the completion callback and the
    /// observers, and return them.
    pub fn complete(&mut self) -> CompletionReport {
        let placed = self.placed_ids();
        let memory = self.snapshot();

        if let Some(callback) = self.on_complete.as_mut() {
            callback(&placed, &memory);
        }
        self.emit(&[Event::Complete {
            placed: placed.clone(),
            memory: memory.clone(),
        }]);

        info!("Completed with {} of {} items packed", placed.len(), self.items.len());
        CompletionReport {
            total_packed: placed.len(),
            total_available: self.items.len(),
            placed,
            memory,
        }
    }
}
