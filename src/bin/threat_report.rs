//! Threat Report
//!
//! Scores a built-in demo fleet and prints the results as JSON or text.
//! Useful for eyeballing the effect of threat.toml changes before shipping
//! them to a live session.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use encounter_core::config::storage::DirectoryStore;
use encounter_core::config::threat::{ThreatConfig, ThreatEntry};
use encounter_core::core::types::{FactionId, GameTime, GridId, GridSize, IdentityId, PowerOutput, Vec3};
use encounter_core::entities::block::{BlockCategory, BlockDetail, BlockSnapshot};
use encounter_core::entities::grid::GridSnapshot;
use encounter_core::queries;
use encounter_core::queries::{NoShieldApi, SignalFilter};
use encounter_core::relations::ownership::OwnershipFlags;
use encounter_core::relations::resolver::FactionTable;
use encounter_core::threat::evaluator::{threat_breakdown, GridEvaluator, ThreatBreakdown};

/// Threat Report - score a demo fleet against the current threat settings
#[derive(Parser, Debug)]
#[command(name = "threat_report")]
#[command(about = "Score a demo fleet and print a per-grid threat report")]
struct Args {
    /// Directory holding threat.toml (created with defaults when missing)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure for one grid
#[derive(Serialize)]
struct GridReport {
    name: String,
    grid_id: u64,
    threat: f32,
    pcu: i32,
    ownership: OwnershipFlags,
    weapons: usize,
    broadcast_range: f64,
    powered: bool,
    shielded: bool,
    movement_score: i32,
    player_controlled: bool,
    breakdown: ThreatBreakdown,
}

#[derive(Serialize)]
struct FleetReport {
    config_loaded_from_file: bool,
    grids: Vec<GridReport>,
    fleet_threat: f32,
    fleet_pcu: i32,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose {
            "encounter_core=debug"
        } else {
            "encounter_core=info"
        })
        .init();

    let config = match &args.config_dir {
        Some(dir) => {
            let store = DirectoryStore::new(dir);
            let mut config = ThreatConfig::load_or_create(&store);
            if !config.is_loaded() {
                // first run wrote defaults; score with the demo tables anyway
                config = demo_config();
            }
            config
        }
        None => demo_config(),
    };

    let factions = demo_factions();
    let fleet = demo_fleet();
    let now = GameTime::ZERO;
    // The survey covers hostile NPC grids, so their signals count too.
    let signals = SignalFilter { allow_npc_signals: true, ..SignalFilter::default() };

    let mut evaluator = GridEvaluator::new();
    let mut grids = Vec::new();
    for (name, grid) in &fleet {
        grids.push(GridReport {
            name: name.to_string(),
            grid_id: grid.id.0,
            threat: evaluator.grid_threat(grid, &config, now),
            pcu: evaluator.grid_pcu(grid, now),
            ownership: evaluator.grid_ownership(grid, &factions, false),
            weapons: queries::weapon_count(grid),
            broadcast_range: queries::broadcast_range(grid, &factions, &signals),
            powered: queries::is_powered(grid),
            shielded: queries::is_shielded(grid, &NoShieldApi),
            movement_score: queries::visible_movement_score(grid),
            player_controlled: queries::is_player_controlled(grid),
            breakdown: threat_breakdown(grid, &config),
        });
    }

    let snapshots: Vec<GridSnapshot> = fleet.into_iter().map(|(_, grid)| grid).collect();
    let report = FleetReport {
        config_loaded_from_file: config.is_loaded(),
        fleet_threat: evaluator.group_threat(&snapshots, &config, now),
        fleet_pcu: evaluator.group_pcu(&snapshots, now),
        grids,
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
        "text" => {
            println!("Threat Report");
            println!("=============");
            for grid in &report.grids {
                println!();
                println!("{} (grid {})", grid.name, grid.grid_id);
                println!("  Threat: {:.1}", grid.threat);
                println!("  PCU: {}", grid.pcu);
                println!("  Ownership: {:?}", grid.ownership);
                println!("  Weapons: {}", grid.weapons);
                println!("  Broadcast range: {:.0} m", grid.broadcast_range);
                println!("  Powered: {}", grid.powered);
                println!("  Shielded: {}", grid.shielded);
                println!("  Movement score: {}", grid.movement_score);
                println!("  Player controlled: {}", grid.player_controlled);
                for entry in &grid.breakdown.categories {
                    if entry.threat > 0.0 {
                        println!("    {:?}: {:.1}", entry.category, entry.threat);
                    }
                }
            }
            println!();
            println!("Fleet threat: {:.1}", report.fleet_threat);
            println!("Fleet PCU: {}", report.fleet_pcu);
        }
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
    }
}

/// Threat tables used when no config directory is given
fn demo_config() -> ThreatConfig {
    let mut config = ThreatConfig::default();
    config.category_threats = vec![
        ThreatEntry::new("Antennas", 4.0, 1.0),
        ThreatEntry::new("Beacons", 3.0, 1.0),
        ThreatEntry::new("Containers", 0.5, 0.9).with_potential_volume(2.0),
        ThreatEntry::new("Controllers", 2.0, 1.0),
        ThreatEntry::new("Guns", 5.0, 0.9).with_potential_volume(1.5),
        ThreatEntry::new("Power", 3.0, 0.85).with_potential_volume(2.0),
        ThreatEntry::new("Production", 6.0, 0.75).with_potential_volume(1.5),
        ThreatEntry::new("Shields", 8.0, 0.8),
        ThreatEntry::new("Thrusters", 2.0, 0.9),
        ThreatEntry::new("Turrets", 10.0, 0.8).with_potential_volume(1.5),
    ];
    config.block_threats = vec![ThreatEntry::new("LargeBlockBatteryOutputBooster", 5.0, 1.0)];
    config.rebuild_lookup_tables();
    config
}

/// A pirate faction, a mining corporation and one lone player
fn demo_factions() -> FactionTable {
    let mut table = FactionTable::new();
    table.insert_faction(FactionId(1), "SPRT");
    table.insert_faction(FactionId(2), "MINE");
    table.insert_member(IdentityId(10), FactionId(1));
    table.insert_member(IdentityId(11), FactionId(1));
    table.insert_member(IdentityId(20), FactionId(2));
    table.set_npc(IdentityId(10));
    table.set_npc(IdentityId(11));
    table.set_reputation(IdentityId(20), FactionId(1), -650);
    table
}

fn turret() -> BlockSnapshot {
    BlockSnapshot::new(BlockCategory::Turrets, "MyObjectBuilder_LargeGatlingTurret")
        .with_inventory(120.0, 240.0)
        .with_pcu(225)
}

fn reactor(current: f32, max: f32) -> BlockSnapshot {
    BlockSnapshot::new(BlockCategory::Power, "MyObjectBuilder_Reactor")
        .with_detail(BlockDetail::PowerProducer { output: PowerOutput::new(current, max) })
        .with_pcu(100)
}

/// Three contrasting grids: a pirate frigate, a mining station, a player scout
fn demo_fleet() -> Vec<(&'static str, GridSnapshot)> {
    let pirate_frigate = GridSnapshot::new(GridId(1001), GridSize::Large)
        .with_aabb(Vec3::ZERO, Vec3::new(60.0, 20.0, 35.0))
        .with_speed(25.0)
        .with_majority_owners(vec![IdentityId(10)])
        .with_blocks(vec![
            turret().with_owner(IdentityId(10)),
            turret().with_owner(IdentityId(10)),
            turret().with_owner(IdentityId(10)),
            BlockSnapshot::new(BlockCategory::Guns, "MyObjectBuilder_SmallGatlingGun")
                .with_owner(IdentityId(10))
                .with_pcu(75),
            reactor(12.0, 30.0).with_owner(IdentityId(10)),
            BlockSnapshot::new(BlockCategory::Antennas, "MyObjectBuilder_RadioAntenna")
                .with_owner(IdentityId(10))
                .with_detail(BlockDetail::Antenna { radius: 5_000.0, broadcasting: true })
                .with_pcu(60),
            BlockSnapshot::new(BlockCategory::Containers, "MyObjectBuilder_CargoContainer")
                .with_owner(IdentityId(10))
                .with_inventory(900.0, 1_000.0)
                .with_pcu(40),
        ]);

    let mining_station = GridSnapshot::new(GridId(1002), GridSize::Large)
        .with_static(true)
        .with_aabb(Vec3::ZERO, Vec3::new(120.0, 80.0, 90.0))
        .with_majority_owners(vec![IdentityId(20)])
        .with_minority_owners(vec![IdentityId(11)])
        .with_blocks(vec![
            reactor(40.0, 120.0).with_owner(IdentityId(20)),
            BlockSnapshot::new(BlockCategory::Production, "MyObjectBuilder_Refinery")
                .with_owner(IdentityId(20))
                .with_inventory(3_000.0, 8_000.0)
                .with_pcu(600),
            BlockSnapshot::new(BlockCategory::Production, "MyObjectBuilder_Assembler")
                .with_owner(IdentityId(20))
                .with_inventory(500.0, 2_000.0)
                .with_pcu(400),
            BlockSnapshot::new(BlockCategory::Beacons, "MyObjectBuilder_Beacon")
                .with_owner(IdentityId(20))
                .with_custom_name("Helios Refinery")
                .with_detail(BlockDetail::Beacon { radius: 20_000.0 })
                .with_pcu(50),
            turret().with_owner(IdentityId(11)),
        ]);

    let player_scout = GridSnapshot::new(GridId(1003), GridSize::Small)
        .with_aabb(Vec3::ZERO, Vec3::new(8.0, 4.0, 12.0))
        .with_speed(95.0)
        .with_majority_owners(vec![IdentityId(30)])
        .with_blocks(vec![
            BlockSnapshot::new(BlockCategory::Controllers, "MyObjectBuilder_Cockpit")
                .with_owner(IdentityId(30))
                .with_detail(BlockDetail::ShipController {
                    can_control_ship: true,
                    under_control: true,
                })
                .with_pcu(120),
            reactor(0.8, 2.0).with_owner(IdentityId(30)),
            BlockSnapshot::new(BlockCategory::Thrusters, "MyObjectBuilder_Thrust")
                .with_owner(IdentityId(30))
                .with_pcu(30),
            BlockSnapshot::new(BlockCategory::Thrusters, "MyObjectBuilder_Thrust")
                .with_owner(IdentityId(30))
                .with_pcu(30),
        ]);

    vec![
        ("Pirate Frigate", pirate_frigate),
        ("Helios Mining Station", mining_station),
        ("Player Scout", player_scout),
    ]
}
