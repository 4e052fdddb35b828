//! Live field edits driven by dot-delimited chat commands.

use tracing::info;

use crate::config::storage::ConfigStore;
use crate::config::threat::ThreatConfig;

pub const INVALID_COMMAND_MESSAGE: &str = "Invalid command.";

/// Fields an admin may change at runtime.
///
/// The set is closed on purpose: table entries are data, not settings, and
/// everything here is a plain scalar that needs no lookup rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    UseSizeMultipliers,
    UsePowerMultipliers,
    UseThreatPerBlockMultiplier,
    UseBoundingBoxMultiplier,
    ThreatPerBlockMultiplier,
    BoundingBoxSizeMultiplier,
    SizeMultiplierSmallGrid,
    SizeMultiplierLargeGrid,
    SizeMultiplierStation,
    PowerMultiplierSmallGrid,
    PowerMultiplierLargeGrid,
    PowerMultiplierStation,
}

impl EditableField {
    pub fn from_name(name: &str) -> Option<EditableField> {
        match name {
            "use_size_multipliers" => Some(EditableField::UseSizeMultipliers),
            "use_power_multipliers" => Some(EditableField::UsePowerMultipliers),
            "use_threat_per_block_multiplier" => Some(EditableField::UseThreatPerBlockMultiplier),
            "use_bounding_box_multiplier" => Some(EditableField::UseBoundingBoxMultiplier),
            "threat_per_block_multiplier" => Some(EditableField::ThreatPerBlockMultiplier),
            "bounding_box_size_multiplier" => Some(EditableField::BoundingBoxSizeMultiplier),
            "size_multiplier_small_grid" => Some(EditableField::SizeMultiplierSmallGrid),
            "size_multiplier_large_grid" => Some(EditableField::SizeMultiplierLargeGrid),
            "size_multiplier_station" => Some(EditableField::SizeMultiplierStation),
            "power_multiplier_small_grid" => Some(EditableField::PowerMultiplierSmallGrid),
            "power_multiplier_large_grid" => Some(EditableField::PowerMultiplierLargeGrid),
            "power_multiplier_station" => Some(EditableField::PowerMultiplierStation),
            _ => None,
        }
    }

    /// Parses `raw` and writes it into `config`. Returns false when the
    /// value does not coerce (non-finite numbers included).
    pub fn apply(self, config: &mut ThreatConfig, raw: &str) -> bool {
        match self {
            EditableField::UseSizeMultipliers => {
                Self::apply_bool(raw, &mut config.use_size_multipliers)
            }
            EditableField::UsePowerMultipliers => {
                Self::apply_bool(raw, &mut config.use_power_multipliers)
            }
            EditableField::UseThreatPerBlockMultiplier => {
                Self::apply_bool(raw, &mut config.use_threat_per_block_multiplier)
            }
            EditableField::UseBoundingBoxMultiplier => {
                Self::apply_bool(raw, &mut config.use_bounding_box_multiplier)
            }
            EditableField::ThreatPerBlockMultiplier => {
                Self::apply_f64(raw, &mut config.threat_per_block_multiplier)
            }
            EditableField::BoundingBoxSizeMultiplier => {
                Self::apply_f64(raw, &mut config.bounding_box_size_multiplier)
            }
            EditableField::SizeMultiplierSmallGrid => {
                Self::apply_f64(raw, &mut config.size_multipliers.small_grid)
            }
            EditableField::SizeMultiplierLargeGrid => {
                Self::apply_f64(raw, &mut config.size_multipliers.large_grid)
            }
            EditableField::SizeMultiplierStation => {
                Self::apply_f64(raw, &mut config.size_multipliers.station)
            }
            EditableField::PowerMultiplierSmallGrid => {
                Self::apply_f64(raw, &mut config.power_multipliers.small_grid)
            }
            EditableField::PowerMultiplierLargeGrid => {
                Self::apply_f64(raw, &mut config.power_multipliers.large_grid)
            }
            EditableField::PowerMultiplierStation => {
                Self::apply_f64(raw, &mut config.power_multipliers.station)
            }
        }
    }

    fn apply_bool(raw: &str, target: &mut bool) -> bool {
        match raw.parse::<bool>() {
            Ok(value) => {
                *target = value;
                true
            }
            Err(_) => false,
        }
    }

    fn apply_f64(raw: &str, target: &mut f64) -> bool {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                *target = value;
                true
            }
            _ => false,
        }
    }
}

impl ThreatConfig {
    /// Applies one edit command and persists on success.
    ///
    /// Commands are dot-delimited; the first three tokens are routing prefix
    /// left to the host, the fourth names the field, and everything after it
    /// is the value (re-joined, so decimal points survive the split).
    pub fn edit_field(&mut self, command: &str, store: &dyn ConfigStore) -> String {
        let tokens: Vec<&str> = command.split('.').collect();
        if tokens.len() < 5 {
            return INVALID_COMMAND_MESSAGE.to_string();
        }

        let name = tokens[3];
        let value = tokens[4..].join(".");

        let Some(field) = EditableField::from_name(name) else {
            return format!("Field {name} not found.");
        };
        if !field.apply(self, &value) {
            return format!("Invalid value for {name}.");
        }

        info!(field = name, value = %value, "threat setting edited");
        self.save(store)
    }
}
