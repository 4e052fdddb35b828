//! Threat scoring configuration: load, save, lookup tables.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::storage::ConfigStore;

/// File name the threat settings live under in a [`ConfigStore`].
pub const THREAT_CONFIG_FILE: &str = "threat.toml";

pub const SAVE_SUCCESS_MESSAGE: &str = "Settings updated successfully.";
pub const SAVE_FAILURE_MESSAGE: &str = "Settings changed, but could not be saved.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Resolved threat values for one block type or category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatDefinition {
    pub threat: f64,
    /// Compounding penalty applied when several matching blocks stack.
    pub multiplier: f64,
    /// Weight given to inventory fill on cargo-carrying blocks.
    pub potential_volume: f64,
}

/// One named entry in the persisted threat tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatEntry {
    pub name: String,
    pub threat: f64,
    pub multiplier: f64,
    pub potential_volume: f64,
}

impl Default for ThreatEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            threat: 0.0,
            multiplier: 1.0,
            potential_volume: 1.0,
        }
    }
}

impl ThreatEntry {
    pub fn new(name: impl Into<String>, threat: f64, multiplier: f64) -> Self {
        Self {
            name: name.into(),
            threat,
            multiplier,
            ..Self::default()
        }
    }

    pub fn with_potential_volume(mut self, potential_volume: f64) -> Self {
        self.potential_volume = potential_volume;
        self
    }

    fn definition(&self) -> ThreatDefinition {
        ThreatDefinition {
            threat: self.threat,
            multiplier: self.multiplier,
            potential_volume: self.potential_volume,
        }
    }
}

/// Per-size-class multipliers, used for both the size and the power scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMultipliers {
    pub small_grid: f64,
    pub large_grid: f64,
    pub station: f64,
}

impl Default for GridMultipliers {
    fn default() -> Self {
        Self {
            small_grid: 0.5,
            large_grid: 1.0,
            station: 1.25,
        }
    }
}

/// The complete threat scoring configuration.
///
/// Persisted as TOML through a [`ConfigStore`]. The two lookup maps are
/// derived from the entry lists on load and never serialized; entries with
/// blank names are dropped, and when two entries share a name the later one
/// wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    pub mod_version: String,
    pub use_size_multipliers: bool,
    pub use_power_multipliers: bool,
    pub use_threat_per_block_multiplier: bool,
    pub threat_per_block_multiplier: f64,
    pub use_bounding_box_multiplier: bool,
    pub bounding_box_size_multiplier: f64,
    pub size_multipliers: GridMultipliers,
    pub power_multipliers: GridMultipliers,
    pub block_threats: Vec<ThreatEntry>,
    pub category_threats: Vec<ThreatEntry>,
    #[serde(skip)]
    block_lookup: AHashMap<String, ThreatDefinition>,
    #[serde(skip)]
    category_lookup: AHashMap<String, ThreatDefinition>,
    #[serde(skip)]
    loaded: bool,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            mod_version: env!("CARGO_PKG_VERSION").to_string(),
            use_size_multipliers: true,
            use_power_multipliers: true,
            use_threat_per_block_multiplier: true,
            threat_per_block_multiplier: 0.5,
            use_bounding_box_multiplier: true,
            bounding_box_size_multiplier: 0.1,
            size_multipliers: GridMultipliers::default(),
            power_multipliers: GridMultipliers::default(),
            block_threats: Vec::new(),
            category_threats: Vec::new(),
            block_lookup: AHashMap::new(),
            category_lookup: AHashMap::new(),
            loaded: false,
        }
    }
}

impl ThreatConfig {
    /// Loads settings from the store, falling back to defaults.
    ///
    /// Any failure (missing file, unreadable file, bad TOML) produces a
    /// default configuration which is best-effort written back so the next
    /// session starts from a valid file. Only a real file load sets the
    /// loaded flag.
    pub fn load_or_create(store: &dyn ConfigStore) -> ThreatConfig {
        match store.read(THREAT_CONFIG_FILE) {
            Ok(Some(text)) => match toml::from_str::<ThreatConfig>(&text) {
                Ok(mut config) => {
                    config.rebuild_lookup_tables();
                    config.loaded = true;
                    info!(
                        blocks = config.block_lookup.len(),
                        categories = config.category_lookup.len(),
                        "loaded threat settings"
                    );
                    return config;
                }
                Err(e) => error!("could not parse {THREAT_CONFIG_FILE}: {e}"),
            },
            Ok(None) => warn!("{THREAT_CONFIG_FILE} not found, creating defaults"),
            Err(e) => error!("could not read {THREAT_CONFIG_FILE}: {e}"),
        }

        let config = ThreatConfig::default();
        if let Err(e) = config.persist(store) {
            error!("could not write default {THREAT_CONFIG_FILE}: {e}");
        }
        config
    }

    /// True only when the settings came from an actual file.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Threat values for a specific block type or subtype key.
    pub fn block_definition(&self, key: &str) -> Option<&ThreatDefinition> {
        self.block_lookup.get(key)
    }

    /// Threat values for a block category key.
    pub fn category_definition(&self, key: &str) -> Option<&ThreatDefinition> {
        self.category_lookup.get(key)
    }

    /// Rebuilds both lookup maps from the entry lists.
    pub fn rebuild_lookup_tables(&mut self) {
        self.block_lookup.clear();
        self.category_lookup.clear();
        for entry in &self.block_threats {
            if entry.name.trim().is_empty() {
                continue;
            }
            self.block_lookup.insert(entry.name.clone(), entry.definition());
        }
        for entry in &self.category_threats {
            if entry.name.trim().is_empty() {
                continue;
            }
            self.category_lookup.insert(entry.name.clone(), entry.definition());
        }
    }

    /// Writes the current settings to the store, reporting the outcome as a
    /// chat-ready message.
    pub fn save(&self, store: &dyn ConfigStore) -> String {
        match self.persist(store) {
            Ok(()) => SAVE_SUCCESS_MESSAGE.to_string(),
            Err(e) => {
                error!("could not save {THREAT_CONFIG_FILE}: {e}");
                SAVE_FAILURE_MESSAGE.to_string()
            }
        }
    }

    fn persist(&self, store: &dyn ConfigStore) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        store.write(THREAT_CONFIG_FILE, &text)?;
        Ok(())
    }
}
