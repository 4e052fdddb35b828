pub mod types;

pub use types::{FactionId, GameTime, GridId, GridSize, IdentityId, PowerOutput, Vec3};
