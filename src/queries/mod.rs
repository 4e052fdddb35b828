//! Stateless attribute queries over grid snapshots.
//!
//! Every function degrades to a zero or empty result on removed grids or
//! missing data; nothing here returns an error.

use crate::core::types::{GridId, PowerOutput};
use crate::entities::block::{BlockCategory, BlockDetail, BlockSnapshot};
use crate::entities::grid::GridSnapshot;
use crate::relations::resolver::FactionOps;

/// Which broadcast sources count and whose signals qualify.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalFilter<'a> {
    /// Skip beacons, antennas only.
    pub antennas_only: bool,
    /// Admit NPC-owned signals. Off by default, and moot once a faction
    /// filter is set: a faction lookup already names whose signals count.
    pub allow_npc_signals: bool,
    /// Only signals owned by a member of the faction with this tag.
    pub faction_tag: Option<&'a str>,
    /// Only blocks carrying exactly this custom name.
    pub block_name: Option<&'a str>,
}

fn signal_passes(block: &BlockSnapshot, ops: &dyn FactionOps, filter: &SignalFilter) -> bool {
    if !filter.allow_npc_signals && filter.faction_tag.is_none() && ops.is_npc(block.owner) {
        return false;
    }
    if let Some(tag) = filter.faction_tag {
        let tag_matches = ops
            .faction_of(block.owner)
            .and_then(|faction| ops.faction_tag(faction))
            .map(|t| t == tag)
            .unwrap_or(false);
        if !tag_matches {
            return false;
        }
    }
    if let Some(name) = filter.block_name {
        if block.custom_name.as_deref() != Some(name) {
            return false;
        }
    }
    true
}

/// Longest qualifying broadcast radius on a grid.
///
/// Antennas must actually be broadcasting; beacons broadcast whenever they
/// run and are skipped entirely under `antennas_only`.
pub fn broadcast_range(grid: &GridSnapshot, ops: &dyn FactionOps, filter: &SignalFilter) -> f64 {
    if !grid.active() {
        return 0.0;
    }

    let mut best = 0.0_f64;
    for block in grid.blocks_in(BlockCategory::Antennas) {
        let BlockDetail::Antenna { radius, broadcasting } = block.detail else {
            continue;
        };
        if !block.active() || !broadcasting || !signal_passes(block, ops, filter) {
            continue;
        }
        best = best.max(radius);
    }

    if filter.antennas_only {
        return best;
    }

    for block in grid.blocks_in(BlockCategory::Beacons) {
        let BlockDetail::Beacon { radius } = block.detail else {
            continue;
        };
        if !block.active() || !signal_passes(block, ops, filter) {
            continue;
        }
        best = best.max(radius);
    }
    best
}

/// Longest qualifying broadcast radius across a grid group.
pub fn group_broadcast_range(
    grids: &[GridSnapshot],
    ops: &dyn FactionOps,
    filter: &SignalFilter,
) -> f64 {
    grids
        .iter()
        .map(|grid| broadcast_range(grid, ops, filter))
        .fold(0.0, f64::max)
}

/// Summed current and maximum output of all running power producers.
pub fn power_output(grid: &GridSnapshot) -> PowerOutput {
    if !grid.active() {
        return PowerOutput::ZERO;
    }

    let mut total = PowerOutput::ZERO;
    for block in grid.blocks_in(BlockCategory::Power) {
        if !block.active() {
            continue;
        }
        let BlockDetail::PowerProducer { output } = block.detail else {
            continue;
        };
        total.current += output.current;
        total.max += output.max;
    }
    total
}

pub fn group_power_output(grids: &[GridSnapshot]) -> PowerOutput {
    let mut total = PowerOutput::ZERO;
    for grid in grids {
        let output = power_output(grid);
        total.current += output.current;
        total.max += output.max;
    }
    total
}

/// True when any running producer is actually delivering power.
pub fn is_powered(grid: &GridSnapshot) -> bool {
    power_output(grid).current > 0.0
}

pub fn group_powered(grids: &[GridSnapshot]) -> bool {
    grids.iter().any(is_powered)
}

/// Shield coverage reported by an external shield mod.
pub trait ShieldApi {
    fn is_shielded(&self, grid: GridId) -> bool;
}

/// Null object for hosts without a shield mod installed.
pub struct NoShieldApi;

impl ShieldApi for NoShieldApi {
    fn is_shielded(&self, _grid: GridId) -> bool {
        false
    }
}

/// True when the external API reports coverage or any shield block runs.
pub fn is_shielded(grid: &GridSnapshot, shields: &dyn ShieldApi) -> bool {
    if !grid.active() {
        return false;
    }
    if shields.is_shielded(grid.id) {
        return true;
    }
    grid.blocks_in(BlockCategory::Shields).any(|b| b.active())
}

pub fn group_shielded(grids: &[GridSnapshot], shields: &dyn ShieldApi) -> bool {
    grids.iter().any(|grid| is_shielded(grid, shields))
}

/// Running fixed guns plus running turrets.
pub fn weapon_count(grid: &GridSnapshot) -> usize {
    grid.blocks_in(BlockCategory::Guns).filter(|b| b.active()).count()
        + grid.blocks_in(BlockCategory::Turrets).filter(|b| b.active()).count()
}

pub fn group_weapon_count(grids: &[GridSnapshot]) -> usize {
    grids.iter().map(weapon_count).sum()
}

/// Sensor-visibility score from size and speed.
///
/// Anything drifting below 1 m/s is treated as stationary.
pub fn visible_movement_score(grid: &GridSnapshot) -> i32 {
    if grid.speed < 1.0 {
        return 0;
    }
    (grid.bounding_box_size() * grid.speed) as i32
}

pub fn group_visible_movement_score(grids: &[GridSnapshot]) -> i32 {
    grids.iter().map(visible_movement_score).max().unwrap_or(0)
}

/// True when a player is sitting in a ship controller that can steer.
pub fn is_player_controlled(grid: &GridSnapshot) -> bool {
    if !grid.active() {
        return false;
    }
    grid.blocks_in(BlockCategory::Controllers).any(|b| {
        b.active()
            && matches!(
                b.detail,
                BlockDetail::ShipController { can_control_ship: true, under_control: true }
            )
    })
}
