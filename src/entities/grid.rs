//! Grid-level snapshot data captured from the host's grid tracker.

use crate::core::types::{GridId, GridSize, IdentityId, Vec3};
use crate::entities::block::{BlockCategory, BlockSnapshot};

/// Immutable snapshot of one grid and its terminal blocks.
///
/// Ownership lists mirror the host's big-owners/small-owners split: identities
/// holding the most blocks land in `majority_owners`, every other owning
/// identity in `minority_owners`. Both may contain the zero identity when
/// unowned blocks are present.
#[derive(Debug, Clone)]
pub struct GridSnapshot {
    pub id: GridId,
    /// Removed from the world.
    pub closed: bool,
    pub size: GridSize,
    /// Station rather than ship.
    pub is_static: bool,
    pub aabb_min: Vec3,
    pub aabb_max: Vec3,
    /// Linear speed in m/s.
    pub speed: f64,
    pub majority_owners: Vec<IdentityId>,
    pub minority_owners: Vec<IdentityId>,
    pub blocks: Vec<BlockSnapshot>,
}

impl GridSnapshot {
    pub fn new(id: GridId, size: GridSize) -> Self {
        Self {
            id,
            closed: false,
            size,
            is_static: false,
            aabb_min: Vec3::ZERO,
            aabb_max: Vec3::ZERO,
            speed: 0.0,
            majority_owners: Vec::new(),
            minority_owners: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_aabb(mut self, min: Vec3, max: Vec3) -> Self {
        self.aabb_min = min;
        self.aabb_max = max;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_majority_owners(mut self, owners: Vec<IdentityId>) -> Self {
        self.majority_owners = owners;
        self
    }

    pub fn with_minority_owners(mut self, owners: Vec<IdentityId>) -> Self {
        self.minority_owners = owners;
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<BlockSnapshot>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Still present in the world.
    pub fn active(&self) -> bool {
        !self.closed
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks in one functional category.
    pub fn blocks_in(&self, category: BlockCategory) -> impl Iterator<Item = &BlockSnapshot> {
        self.blocks.iter().filter(move |b| b.category == category)
    }

    /// Diagonal length of the world bounding box.
    pub fn bounding_box_size(&self) -> f64 {
        self.aabb_min.distance(&self.aabb_max)
    }
}
