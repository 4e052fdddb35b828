//! Grid-level threat scoring with per-grid result caching.

use ahash::AHashMap;
use serde::Serialize;
use tracing::debug;

use crate::config::threat::ThreatConfig;
use crate::core::types::{GameTime, GridId, GridSize};
use crate::entities::block::BlockCategory;
use crate::entities::grid::GridSnapshot;
use crate::queries::power_output;
use crate::relations::ownership::{classify_owners, OwnershipFlags};
use crate::relations::resolver::FactionOps;
use crate::threat::aggregator::category_threat;

/// How long a cached threat or PCU score stays valid.
pub const THREAT_CACHE_TTL_MS: u64 = 5000;

/// The categories that feed the threat score, with the inventory-scan flag
/// for the ones whose contents matter (cargo, ammo, ore, components).
pub const SCORED_CATEGORIES: [(BlockCategory, bool); 16] = [
    (BlockCategory::Antennas, false),
    (BlockCategory::Beacons, false),
    (BlockCategory::Containers, true),
    (BlockCategory::Controllers, false),
    (BlockCategory::Gravity, true),
    (BlockCategory::Guns, true),
    (BlockCategory::JumpDrives, false),
    (BlockCategory::Mechanical, false),
    (BlockCategory::Medical, false),
    (BlockCategory::NanoBots, false),
    (BlockCategory::Power, true),
    (BlockCategory::Production, true),
    (BlockCategory::Shields, false),
    (BlockCategory::Thrusters, false),
    (BlockCategory::Tools, true),
    (BlockCategory::Turrets, true),
];

/// Cached per-grid results.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRecord {
    pub threat: f32,
    pub threat_at: Option<GameTime>,
    pub pcu: i32,
    pub pcu_at: Option<GameTime>,
    pub ownership: OwnershipFlags,
    pub ownership_stale: bool,
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self {
            threat: 0.0,
            threat_at: None,
            pcu: 0,
            pcu_at: None,
            ownership: OwnershipFlags::empty(),
            ownership_stale: true,
        }
    }
}

/// One scored category inside a [`ThreatBreakdown`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoryThreat {
    pub category: BlockCategory,
    pub threat: f32,
}

/// Step-by-step account of one grid's threat score.
#[derive(Debug, Clone, Serialize)]
pub struct ThreatBreakdown {
    pub categories: Vec<CategoryThreat>,
    pub block_count_bonus: f32,
    pub bounding_box_bonus: f32,
    pub size_factor: f32,
    pub power_bonus: f32,
    pub total: f32,
}

/// Scores one grid without touching any cache.
///
/// The modifier order matters: the block-count and bounding-box bonuses are
/// folded in before the size factor scales the total, while the power bonus
/// lands after it, unscaled.
pub fn threat_breakdown(grid: &GridSnapshot, config: &ThreatConfig) -> ThreatBreakdown {
    let mut categories = Vec::with_capacity(SCORED_CATEGORIES.len());
    let mut total = 0.0_f32;

    for (category, scan_inventory) in SCORED_CATEGORIES {
        let threat = category_threat(grid.blocks_in(category), category, config, scan_inventory);
        total += threat;
        categories.push(CategoryThreat { category, threat });
    }

    let block_count_bonus = if config.use_threat_per_block_multiplier {
        grid.block_count() as f32 * config.threat_per_block_multiplier as f32
    } else {
        0.0
    };
    total += block_count_bonus;

    let bounding_box_bonus = if config.use_bounding_box_multiplier {
        (grid.bounding_box_size() * config.bounding_box_size_multiplier) as f32
    } else {
        0.0
    };
    total += bounding_box_bonus;

    let mut size_factor = 1.0_f32;
    if config.use_size_multipliers {
        size_factor = match grid.size {
            GridSize::Small => config.size_multipliers.small_grid as f32,
            GridSize::Large => config.size_multipliers.large_grid as f32,
        };
        if grid.is_static {
            size_factor *= config.size_multipliers.station as f32;
        }
        total *= size_factor;
    }

    let mut power_bonus = 0.0_f32;
    if config.use_power_multipliers {
        let power = power_output(grid);
        if power.max > 0.0 {
            let size_multiplier = match grid.size {
                GridSize::Small => config.power_multipliers.small_grid,
                GridSize::Large => config.power_multipliers.large_grid,
            };
            power_bonus = power.max * size_multiplier as f32;
            if grid.is_static {
                power_bonus += power.max * config.power_multipliers.station as f32;
            }
            total += power_bonus;
        }
    }

    ThreatBreakdown {
        categories,
        block_count_bonus,
        bounding_box_bonus,
        size_factor,
        power_bonus,
        total,
    }
}

/// Scores grids and remembers the results.
///
/// The evaluator is the only writer of its records; hosts keep one instance
/// per session and feed it the current [`GameTime`] on every call.
#[derive(Debug, Default)]
pub struct GridEvaluator {
    records: AHashMap<GridId, ScoreRecord>,
}

impl GridEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Threat score of one grid, cached for [`THREAT_CACHE_TTL_MS`].
    ///
    /// A removed or near-empty grid scores zero without disturbing whatever
    /// the cache already holds for its id.
    pub fn grid_threat(&mut self, grid: &GridSnapshot, config: &ThreatConfig, now: GameTime) -> f32 {
        if let Some(record) = self.records.get(&grid.id) {
            if let Some(at) = record.threat_at {
                if now.millis_since(at) < THREAT_CACHE_TTL_MS {
                    return record.threat;
                }
            }
        }

        if !grid.active() || grid.block_count() <= 1 {
            return 0.0;
        }

        let breakdown = threat_breakdown(grid, config);
        let record = self.records.entry(grid.id).or_default();
        record.threat = breakdown.total;
        record.threat_at = Some(now);
        debug!(grid = grid.id.0, threat = breakdown.total, "threat score recomputed");
        breakdown.total
    }

    /// Combined threat of a grid group (a ship plus its subgrids).
    pub fn group_threat(
        &mut self,
        grids: &[GridSnapshot],
        config: &ThreatConfig,
        now: GameTime,
    ) -> f32 {
        grids.iter().map(|g| self.grid_threat(g, config, now)).sum()
    }

    /// Total build cost of one grid, cached for [`THREAT_CACHE_TTL_MS`].
    pub fn grid_pcu(&mut self, grid: &GridSnapshot, now: GameTime) -> i32 {
        if let Some(record) = self.records.get(&grid.id) {
            if let Some(at) = record.pcu_at {
                if now.millis_since(at) < THREAT_CACHE_TTL_MS {
                    return record.pcu;
                }
            }
        }

        if !grid.active() {
            return 0;
        }

        let pcu = grid.blocks.iter().map(|b| b.pcu as i32).sum();
        let record = self.records.entry(grid.id).or_default();
        record.pcu = pcu;
        record.pcu_at = Some(now);
        pcu
    }

    pub fn group_pcu(&mut self, grids: &[GridSnapshot], now: GameTime) -> i32 {
        grids.iter().map(|g| self.grid_pcu(g, now)).sum()
    }

    /// Ownership classification, cached until marked stale.
    ///
    /// `force` bypasses the cache; a removed grid reports empty flags and
    /// leaves its record alone.
    pub fn grid_ownership(
        &mut self,
        grid: &GridSnapshot,
        ops: &dyn FactionOps,
        force: bool,
    ) -> OwnershipFlags {
        if !grid.active() {
            return OwnershipFlags::empty();
        }

        if !force {
            if let Some(record) = self.records.get(&grid.id) {
                if !record.ownership_stale {
                    return record.ownership;
                }
            }
        }

        let flags = classify_owners(&grid.majority_owners, &grid.minority_owners, ops);
        let record = self.records.entry(grid.id).or_default();
        record.ownership = flags;
        record.ownership_stale = false;
        flags
    }

    pub fn group_ownership(
        &mut self,
        grids: &[GridSnapshot],
        ops: &dyn FactionOps,
        force: bool,
    ) -> OwnershipFlags {
        grids
            .iter()
            .fold(OwnershipFlags::empty(), |flags, grid| {
                flags | self.grid_ownership(grid, ops, force)
            })
    }

    /// Flags a grid's ownership for recomputation on the next query.
    ///
    /// Hosts call this from their block-ownership-changed hook.
    pub fn mark_ownership_stale(&mut self, id: GridId) {
        if let Some(record) = self.records.get_mut(&id) {
            record.ownership_stale = true;
        }
    }

    /// Drops everything cached for a grid the host stopped tracking.
    pub fn forget(&mut self, id: GridId) {
        self.records.remove(&id);
    }
}
