//! Threat scoring integration tests
//!
//! End-to-end scenarios running the full pipeline: config tables, block
//! aggregation, grid-level bonuses and multipliers, caching, ownership.

use encounter_core::config::threat::{ThreatConfig, ThreatEntry};
use encounter_core::core::types::{GameTime, GridId, GridSize, IdentityId, PowerOutput, Vec3};
use encounter_core::entities::block::{BlockCategory, BlockDetail, BlockSnapshot};
use encounter_core::entities::grid::GridSnapshot;
use encounter_core::relations::ownership::OwnershipFlags;
use encounter_core::relations::resolver::FactionTable;
use encounter_core::threat::evaluator::{GridEvaluator, THREAT_CACHE_TTL_MS};

fn freighter_config() -> ThreatConfig {
    let mut config = ThreatConfig::default();
    config.category_threats = vec![
        ThreatEntry::new("Turrets", 10.0, 0.8),
        ThreatEntry::new("Containers", 1.0, 1.0).with_potential_volume(2.0),
        ThreatEntry::new("Power", 3.0, 1.0),
    ];
    config.block_threats = vec![ThreatEntry::new("BoosterBattery", 5.0, 1.0)];
    config.rebuild_lookup_tables();
    config
}

fn armed_freighter() -> GridSnapshot {
    let turret =
        BlockSnapshot::new(BlockCategory::Turrets, "MyObjectBuilder_LargeGatlingTurret");
    let booster = BlockSnapshot::new(BlockCategory::Power, "MyObjectBuilder_BatteryBlock")
        .with_subtype("BoosterBattery");
    let reactor = BlockSnapshot::new(BlockCategory::Power, "MyObjectBuilder_Reactor")
        .with_detail(BlockDetail::PowerProducer { output: PowerOutput::new(5.0, 20.0) });
    let cargo = BlockSnapshot::new(BlockCategory::Containers, "MyObjectBuilder_CargoContainer")
        .with_inventory(50.0, 100.0);

    GridSnapshot::new(GridId(500), GridSize::Large)
        .with_static(true)
        .with_aabb(Vec3::ZERO, Vec3::new(30.0, 40.0, 0.0))
        .with_blocks(vec![
            turret.clone(),
            turret.clone(),
            turret,
            booster.clone(),
            booster,
            reactor,
            cargo,
        ])
}

#[test]
fn test_armed_freighter_scores_end_to_end() {
    let config = freighter_config();
    let mut evaluator = GridEvaluator::new();

    let threat = evaluator.grid_threat(&armed_freighter(), &config, GameTime::ZERO);

    // turrets: ((10 + 10) * 0.8 + 10) * 0.8 = 20.8
    // boosters bucket apart from power category: (5 + 5) * 1.0 = 10
    // reactor alone under the power category: 3
    // cargo: 1 + (50/100 + 1) * 2 = 4
    // block count bonus: 7 * 0.5; bounding box bonus: 50 * 0.1
    // station: (37.8 + 3.5 + 5) * 1.0 * 1.25 = 57.875
    // power: 20 * 1.0 + 20 * 1.25 = 45
    assert!((threat - 102.875).abs() < 1e-3);
}

#[test]
fn test_default_config_scores_only_grid_bonuses() {
    let config = ThreatConfig::default();
    let mut evaluator = GridEvaluator::new();

    let grid = GridSnapshot::new(GridId(501), GridSize::Large)
        .with_aabb(Vec3::ZERO, Vec3::new(30.0, 40.0, 0.0))
        .with_blocks(vec![
            BlockSnapshot::new(BlockCategory::Turrets, "Turret"),
            BlockSnapshot::new(BlockCategory::Turrets, "Turret"),
            BlockSnapshot::new(BlockCategory::Turrets, "Turret"),
        ]);

    // empty tables leave only the block count and bounding box bonuses
    let threat = evaluator.grid_threat(&grid, &config, GameTime::ZERO);
    assert!((threat - 6.5).abs() < 1e-4);
}

#[test]
fn test_score_cache_window() {
    let config = freighter_config();
    let mut evaluator = GridEvaluator::new();

    let grid = armed_freighter();
    let first = evaluator.grid_threat(&grid, &config, GameTime::from_millis(10_000));

    // strip the grid down; the cached score must survive inside the window
    let mut gutted = grid.clone();
    gutted.blocks.truncate(2);
    let just_inside = GameTime::from_millis(10_000 + THREAT_CACHE_TTL_MS - 1);
    assert_eq!(evaluator.grid_threat(&gutted, &config, just_inside), first);

    let expired = GameTime::from_millis(10_000 + THREAT_CACHE_TTL_MS);
    let rescored = evaluator.grid_threat(&gutted, &config, expired);
    assert!(rescored < first);
}

#[test]
fn test_config_edit_changes_next_score() {
    use encounter_core::config::storage::MemoryStore;

    let mut config = freighter_config();
    let store = MemoryStore::new();
    let mut evaluator = GridEvaluator::new();

    let before = evaluator.grid_threat(&armed_freighter(), &config, GameTime::ZERO);

    let reply = config.edit_field(
        "cmd.settings.threat.use_threat_per_block_multiplier.false",
        &store,
    );
    assert_eq!(reply, "Settings updated successfully.");

    let after = evaluator.grid_threat(
        &armed_freighter(),
        &config,
        GameTime::from_millis(THREAT_CACHE_TTL_MS),
    );
    // 3.5 block count bonus dropped before the 1.25 station factor
    assert!((before - after - 3.5 * 1.25).abs() < 1e-3);
}

#[test]
fn test_ownership_follows_block_transfer_lifecycle() {
    let mut factions = FactionTable::new();
    factions.set_npc(IdentityId(10));
    let mut evaluator = GridEvaluator::new();

    let grid = armed_freighter().with_majority_owners(vec![IdentityId(10)]);
    assert_eq!(
        evaluator.grid_ownership(&grid, &factions, false),
        OwnershipFlags::NPC_MAJORITY
    );

    // a player grinds down half the grid; the host reports new owner lists
    let contested = armed_freighter()
        .with_majority_owners(vec![IdentityId(10)])
        .with_minority_owners(vec![IdentityId(30)]);

    // nothing marked stale yet, so the old answer stands
    assert_eq!(
        evaluator.grid_ownership(&contested, &factions, false),
        OwnershipFlags::NPC_MAJORITY
    );

    evaluator.mark_ownership_stale(GridId(500));
    assert_eq!(
        evaluator.grid_ownership(&contested, &factions, false),
        OwnershipFlags::NPC_MAJORITY | OwnershipFlags::PLAYER_MINORITY
    );
}

#[test]
fn test_forget_clears_all_cached_state() {
    let config = freighter_config();
    let mut evaluator = GridEvaluator::new();

    let grid = armed_freighter();
    let full_threat = evaluator.grid_threat(&grid, &config, GameTime::ZERO);
    assert_eq!(evaluator.grid_pcu(&grid, GameTime::ZERO), 7);
    evaluator.forget(GridId(500));

    // same timestamp, yet both recompute against the smaller snapshot
    let mut gutted = grid.clone();
    gutted.blocks.truncate(3);
    let threat = evaluator.grid_threat(&gutted, &config, GameTime::ZERO);
    assert!(threat < full_threat);
    assert_eq!(evaluator.grid_pcu(&gutted, GameTime::ZERO), 3);
}

#[test]
fn test_group_threat_sums_subgrids() {
    let config = freighter_config();
    let mut evaluator = GridEvaluator::new();

    let main_grid = armed_freighter();
    let trailer = GridSnapshot::new(GridId(501), GridSize::Large)
        .with_blocks(vec![
            BlockSnapshot::new(BlockCategory::Turrets, "Turret"),
            BlockSnapshot::new(BlockCategory::Turrets, "Turret"),
        ]);

    let solo_main = evaluator.grid_threat(&main_grid, &config, GameTime::ZERO);
    let solo_trailer = evaluator.grid_threat(&trailer, &config, GameTime::ZERO);

    let group = vec![main_grid, trailer];
    let combined = evaluator.group_threat(&group, &config, GameTime::ZERO);
    assert_eq!(combined, solo_main + solo_trailer);
}
