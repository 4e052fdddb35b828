//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for a grid (ship or station construct).
///
/// Matches the host engine's 64-bit entity handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridId(pub u64);

/// Identity handle for a player or NPC owner.
///
/// `IdentityId(0)` is the engine's "unowned" sentinel and never names a real
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub i64);

impl IdentityId {
    /// The unowned sentinel.
    pub const NOBODY: IdentityId = IdentityId(0);

    pub fn is_nobody(self) -> bool {
        self.0 == 0
    }
}

/// Unique identifier for a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub i64);

/// Milliseconds elapsed since session start.
///
/// The host passes this into every cache-gated operation; the crate never
/// reads a wall clock itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameTime(pub u64);

impl GameTime {
    /// Session origin.
    pub const ZERO: GameTime = GameTime(0);

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds from `earlier` to `self`, saturating at zero if the
    /// caller hands in timestamps out of order.
    pub fn millis_since(self, earlier: GameTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// 3D position/extent in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Grid size class as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    Small,
    Large,
}

/// Current and maximum power output of a grid, in MW.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerOutput {
    pub current: f32,
    pub max: f32,
}

impl PowerOutput {
    pub const ZERO: PowerOutput = PowerOutput { current: 0.0, max: 0.0 };

    pub fn new(current: f32, max: f32) -> Self {
        Self { current, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time_saturating_subtraction() {
        let earlier = GameTime::from_millis(1_000);
        let later = GameTime::from_millis(6_500);
        assert_eq!(later.millis_since(earlier), 5_500);
        assert_eq!(earlier.millis_since(later), 0);
    }

    #[test]
    fn test_vec3_distance() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
        assert!((b.length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_identity_sentinel() {
        assert!(IdentityId::NOBODY.is_nobody());
        assert!(!IdentityId(42).is_nobody());
    }
}
