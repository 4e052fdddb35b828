//! Block-level snapshot data captured from the host's grid tracker.

use serde::Serialize;

use crate::core::types::{IdentityId, PowerOutput};

/// Functional grouping of block types.
///
/// The grid tracker sorts every terminal block into one of these groups.
/// Threat scoring consumes sixteen of them (see `threat::evaluator`); the
/// rest still count toward raw block totals and PCU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockCategory {
    Antennas,
    Beacons,
    Buttons,
    Containers,
    Controllers,
    Contract,
    Gravity,
    Guns,
    Gyros,
    Inhibitors,
    JumpDrives,
    Mechanical,
    Medical,
    NanoBots,
    Parachutes,
    Power,
    Production,
    Projectors,
    Seats,
    Shields,
    Stores,
    Thrusters,
    Tools,
    Turrets,
    TurretControllers,
}

impl BlockCategory {
    /// Key used to look up this category in the threat configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockCategory::Antennas => "Antennas",
            BlockCategory::Beacons => "Beacons",
            BlockCategory::Buttons => "Buttons",
            BlockCategory::Containers => "Containers",
            BlockCategory::Controllers => "Controllers",
            BlockCategory::Contract => "Contract",
            BlockCategory::Gravity => "Gravity",
            BlockCategory::Guns => "Guns",
            BlockCategory::Gyros => "Gyros",
            BlockCategory::Inhibitors => "Inhibitors",
            BlockCategory::JumpDrives => "JumpDrives",
            BlockCategory::Mechanical => "Mechanical",
            BlockCategory::Medical => "Medical",
            BlockCategory::NanoBots => "NanoBots",
            BlockCategory::Parachutes => "Parachutes",
            BlockCategory::Power => "Power",
            BlockCategory::Production => "Production",
            BlockCategory::Projectors => "Projectors",
            BlockCategory::Seats => "Seats",
            BlockCategory::Shields => "Shields",
            BlockCategory::Stores => "Stores",
            BlockCategory::Thrusters => "Thrusters",
            BlockCategory::Tools => "Tools",
            BlockCategory::Turrets => "Turrets",
            BlockCategory::TurretControllers => "TurretControllers",
        }
    }
}

/// Inventory volume pair for blocks that carry cargo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inventory {
    pub current_volume: f32,
    pub max_volume: f32,
}

impl Inventory {
    pub fn new(current_volume: f32, max_volume: f32) -> Self {
        Self { current_volume, max_volume }
    }
}

/// Type-specific data a query may need beyond the common block fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BlockDetail {
    Antenna { radius: f64, broadcasting: bool },
    Beacon { radius: f64 },
    PowerProducer { output: PowerOutput },
    ShipController { can_control_ship: bool, under_control: bool },
    #[default]
    Other,
}

/// Immutable snapshot of a single terminal block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSnapshot {
    pub category: BlockCategory,
    /// Main type identifier, e.g. `MyObjectBuilder_LargeGatlingTurret`.
    pub type_id: String,
    /// Subtype identifier; empty for blocks without one.
    pub subtype_id: String,
    /// Built far enough to operate (damage state).
    pub functional: bool,
    /// Powered and enabled.
    pub working: bool,
    /// Removed from the world.
    pub closed: bool,
    pub owner: IdentityId,
    pub custom_name: Option<String>,
    pub inventory: Option<Inventory>,
    /// Design-defined build cost of this block.
    pub pcu: u32,
    pub detail: BlockDetail,
}

impl BlockSnapshot {
    /// A healthy, unowned block with no subtype, no inventory and no
    /// type-specific detail. Callers layer the rest on with `with_*`.
    pub fn new(category: BlockCategory, type_id: impl Into<String>) -> Self {
        Self {
            category,
            type_id: type_id.into(),
            subtype_id: String::new(),
            functional: true,
            working: true,
            closed: false,
            owner: IdentityId::NOBODY,
            custom_name: None,
            inventory: None,
            pcu: 1,
            detail: BlockDetail::Other,
        }
    }

    pub fn with_subtype(mut self, subtype_id: impl Into<String>) -> Self {
        self.subtype_id = subtype_id.into();
        self
    }

    pub fn with_owner(mut self, owner: IdentityId) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    pub fn with_inventory(mut self, current_volume: f32, max_volume: f32) -> Self {
        self.inventory = Some(Inventory::new(current_volume, max_volume));
        self
    }

    pub fn with_pcu(mut self, pcu: u32) -> Self {
        self.pcu = pcu;
        self
    }

    pub fn with_detail(mut self, detail: BlockDetail) -> Self {
        self.detail = detail;
        self
    }

    /// In the world, powered and undamaged.
    pub fn active(&self) -> bool {
        !self.closed && self.working && self.functional
    }

    /// Key used to look this block up in the threat tables: the subtype
    /// identifier when present, the main type identifier otherwise.
    pub fn threat_key(&self) -> &str {
        if self.subtype_id.is_empty() {
            &self.type_id
        } else {
            &self.subtype_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threat_key_prefers_subtype() {
        let plain = BlockSnapshot::new(BlockCategory::Turrets, "MyObjectBuilder_LargeGatlingTurret");
        assert_eq!(plain.threat_key(), "MyObjectBuilder_LargeGatlingTurret");

        let subtyped = plain.clone().with_subtype("LargeGatlingTurret_Mk2");
        assert_eq!(subtyped.threat_key(), "LargeGatlingTurret_Mk2");
    }

    #[test]
    fn test_active_requires_all_three_states() {
        let mut block = BlockSnapshot::new(BlockCategory::Guns, "Gun");
        assert!(block.active());

        block.functional = false;
        assert!(!block.active());

        block.functional = true;
        block.working = false;
        assert!(!block.active());

        block.working = true;
        block.closed = true;
        assert!(!block.active());
    }
}
