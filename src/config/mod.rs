//! Configuration loading, storage and live editing.

pub mod editor;
pub mod storage;
pub mod threat;

pub use editor::EditableField;
pub use storage::{ConfigStore, DirectoryStore, MemoryStore};
pub use threat::{ConfigError, GridMultipliers, ThreatConfig, ThreatEntry, THREAT_CONFIG_FILE};
