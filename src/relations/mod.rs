//! Faction relationships and grid ownership classification.

pub mod ownership;
pub mod resolver;

pub use ownership::{classify_owners, OwnershipFlags};
pub use resolver::{
    owner_types, relation_between, relation_from_reputation, relations_with_owners, FactionOps,
    FactionTable, OwnerFlags, RelationFlags, RelationKind, REPUTATION_FRIENDLY_ABOVE,
    REPUTATION_HOSTILE_BELOW,
};
