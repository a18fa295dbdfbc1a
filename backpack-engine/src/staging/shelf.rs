//! Shelf packing: each side keeps a stack of horizontal shelves filled left to right, with a grid
//! scan as the fallback once the shelves run out of room.

use backpack_common::geometry::Rect;
use itertools::Itertools;
use log::{debug, warn};
use nalgebra::Vector2;

use super::{StagingAllocator, StagingRegions};
use crate::config::StagingConfig;

pub struct ShelfAllocator {
    /// Space kept between neighbouring items and shelves
    gap: f32,
    /// Step of the fallback scan
    scan_step: f32,
}

impl ShelfAllocator {
    pub fn new(gap: f32, scan_step: f32) -> Self {
        ShelfAllocator { gap, scan_step }
    }

    pub fn from_config(config: &StagingConfig) -> Self {
        Self::new(config.item_gap.max(0.0), config.scan_step)
    }
}

#[derive(Debug)]
struct Shelf {
    y: f32,
    height: f32,
    /// Left edge of the free space on this shelf
    cursor: f32,
}

struct Side {
    region: Rect,
    /// Total area assigned to this side, used to balance the two sides
    area: f32,
    shelves: Vec<Shelf>,
    placed: Vec<Rect>,
}

impl Side {
    /// Obstacles inside the region are avoided but do not count towards the side's area
    fn new(region: Rect, obstacles: &[Rect]) -> Self {
        Self {
            region,
            area: 0.0,
            shelves: Vec::new(),
            placed: obstacles
                .iter()
                .filter(|r| r.intersects(&region))
                .copied()
                .collect(),
        }
    }

    fn is_free(&self, candidate: &Rect) -> bool {
        self.region.encloses(candidate) && !self.placed.iter().any(|r| r.intersects(candidate))
    }

    fn commit(&mut self, candidate: Rect) -> Vector2<f32> {
        self.area += candidate.area();
        self.placed.push(candidate);
        candidate.origin()
    }

    fn try_shelves(&mut self, size: Vector2<f32>, gap: f32) -> Option<Vector2<f32>> {
        let last = self.shelves.len().saturating_sub(1);
        let mut found = None;

        for (i, shelf) in self.shelves.iter().enumerate() {
            if shelf.cursor + size.x > self.region.right() {
                continue;
            }
            // Only the bottom shelf can grow, anything above it would collide with the next one
            let fits_height = size.y <= shelf.height
                || (i == last && shelf.y + size.y <= self.region.bottom());
            if !fits_height {
                continue;
            }

            let candidate = Rect::new(shelf.cursor, shelf.y, size.x, size.y);
            if self.is_free(&candidate) {
                found = Some((i, candidate));
                break;
            }
        }

        if let Some((i, candidate)) = found {
            let shelf = &mut self.shelves[i];
            shelf.cursor = candidate.right() + gap;
            shelf.height = shelf.height.max(size.y);
            return Some(self.commit(candidate));
        }

        // Open a new shelf under the last one
        let y = self
            .shelves
            .last()
            .map(|s| s.y + s.height + gap)
            .unwrap_or(self.region.y);
        let candidate = Rect::new(self.region.x, y, size.x, size.y);
        if self.is_free(&candidate) {
            self.shelves.push(Shelf {
                y,
                height: size.y,
                cursor: candidate.right() + gap,
            });
            return Some(self.commit(candidate));
        }

        None
    }

    fn scan(&mut self, size: Vector2<f32>, step: f32) -> Option<Vector2<f32>> {
        if !(step > 0.0) {
            return None;
        }
        let steps = |len: f32, item: f32| {
            if item > len {
                0
            } else {
                ((len - item) / step).floor() as usize + 1
            }
        };
        let xs = steps(self.region.width, size.x);
        let ys = steps(self.region.height, size.y);

        let candidate = (0..ys)
            .cartesian_product(0..xs)
            .map(|(j, i)| {
                Rect::new(
                    self.region.x + i as f32 * step,
                    self.region.y + j as f32 * step,
                    size.x,
                    size.y,
                )
            })
            .find(|candidate| self.is_free(candidate))?;

        Some(self.commit(candidate))
    }
}

impl StagingAllocator for ShelfAllocator {
    fn allocate(
        &self,
        regions: &StagingRegions,
        sizes: &[Vector2<f32>],
        obstacles: &[Rect],
    ) -> Vec<Vector2<f32>> {
        let _span = tracing::info_span!("staging_layout").entered();

        // Output has to line up with `sizes`, so we sort an index array instead of the sizes.
        // `sorted_by` is stable, which keeps equal areas in input order and the layout
        // reproducible.
        let order = (0..sizes.len())
            .sorted_by(|a, b| {
                let a = sizes[*a].x * sizes[*a].y;
                let b = sizes[*b].x * sizes[*b].y;
                b.total_cmp(&a)
            })
            .collect_vec();

        let mut sides = [
            Side::new(regions.left, obstacles),
            Side::new(regions.right, obstacles),
        ];
        let mut output = vec![Vector2::zeros(); sizes.len()];

        for i in order {
            let size = sizes[i];
            // Ties go left
            let side = if sides[1].area < sides[0].area { 1 } else { 0 };
            let side = &mut sides[side];

            let pos = match side.try_shelves(size, self.gap) {
                Some(pos) => pos,
                None => match side.scan(size, self.scan_step) {
                    Some(pos) => {
                        debug!("Item {} found a spot by scanning at {:?}", i, pos);
                        pos
                    }
                    None => {
                        warn!(
                            "No room for a {}x{} item in staging region {:?}, stacking it at the region origin",
                            size.x, size.y, side.region
                        );
                        // Still counts towards the side's area so the other side takes the next item
                        side.area += size.x * size.y;
                        side.region.origin()
                    }
                },
            };

            output[i] = pos;
        }

        output
    }
}
