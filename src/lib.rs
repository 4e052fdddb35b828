//! Threat scoring and faction relationship core for modular ship encounters.

pub mod config;
pub mod core;
pub mod entities;
pub mod queries;
pub mod relations;
pub mod threat;
