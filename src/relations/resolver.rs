//! Pairwise relationship resolution between identities.

use ahash::{AHashMap, AHashSet};
use bitflags::bitflags;
use serde::Serialize;

use crate::core::types::{FactionId, IdentityId};

/// Reputation strictly below this is hostile.
pub const REPUTATION_HOSTILE_BELOW: i32 = -500;
/// Reputation strictly above this is friendly.
pub const REPUTATION_FRIENDLY_ABOVE: i32 = 500;

/// Faction and reputation queries the host engine answers.
pub trait FactionOps {
    fn faction_of(&self, identity: IdentityId) -> Option<FactionId>;
    fn is_npc(&self, identity: IdentityId) -> bool;
    fn reputation_with_faction(&self, identity: IdentityId, faction: FactionId) -> i32;
    fn reputation_between_factions(&self, a: FactionId, b: FactionId) -> i32;
    fn faction_tag(&self, faction: FactionId) -> Option<&str>;
}

/// How one identity stands toward another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelationKind {
    Enemy,
    Neutral,
    Friends,
    Faction,
}

impl RelationKind {
    pub fn as_flag(self) -> RelationFlags {
        match self {
            RelationKind::Enemy => RelationFlags::ENEMY,
            RelationKind::Neutral => RelationFlags::NEUTRAL,
            RelationKind::Friends => RelationFlags::FRIENDS,
            RelationKind::Faction => RelationFlags::FACTION,
        }
    }
}

bitflags! {
    /// Union of relation kinds across a set of owners.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RelationFlags: u8 {
        const ENEMY = 1;
        const NEUTRAL = 1 << 1;
        const FRIENDS = 1 << 2;
        const FACTION = 1 << 3;
    }
}

bitflags! {
    /// Kinds of identity present in an owner list.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OwnerFlags: u8 {
        const UNOWNED = 1;
        const PLAYER = 1 << 1;
        const NPC = 1 << 2;
    }
}

/// Maps a raw reputation score onto a relation kind.
///
/// The boundaries themselves are neutral ground.
pub fn relation_from_reputation(reputation: i32) -> RelationKind {
    if reputation < REPUTATION_HOSTILE_BELOW {
        RelationKind::Enemy
    } else if reputation > REPUTATION_FRIENDLY_ABOVE {
        RelationKind::Friends
    } else {
        RelationKind::Neutral
    }
}

/// Resolves the relation between two identities.
///
/// Shared faction wins outright. After that, an NPC side is judged by the
/// other identity's reputation with its faction, then two distinct factions
/// by their inter-faction reputation. Identities with no faction context
/// default to enemies.
pub fn relation_between(a: IdentityId, b: IdentityId, ops: &dyn FactionOps) -> RelationKind {
    let faction_a = ops.faction_of(a);
    let faction_b = ops.faction_of(b);

    if let (Some(fa), Some(fb)) = (faction_a, faction_b) {
        if fa == fb {
            return RelationKind::Faction;
        }
    }

    if ops.is_npc(a) {
        if let Some(fa) = faction_a {
            return relation_from_reputation(ops.reputation_with_faction(b, fa));
        }
    }
    if ops.is_npc(b) {
        if let Some(fb) = faction_b {
            return relation_from_reputation(ops.reputation_with_faction(a, fb));
        }
    }
    if let (Some(fa), Some(fb)) = (faction_a, faction_b) {
        return relation_from_reputation(ops.reputation_between_factions(fa, fb));
    }

    RelationKind::Enemy
}

/// Union of `subject`'s relations to every listed owner.
///
/// An empty owner list reads as hostile: a grid nobody owns is fair game.
pub fn relations_with_owners(
    subject: IdentityId,
    owners: &[IdentityId],
    ops: &dyn FactionOps,
) -> RelationFlags {
    if owners.is_empty() {
        return RelationFlags::ENEMY;
    }
    owners
        .iter()
        .fold(RelationFlags::empty(), |flags, &owner| {
            flags | relation_between(subject, owner, ops).as_flag()
        })
}

/// Classifies an owner list into player/NPC/unowned.
pub fn owner_types(owners: &[IdentityId], ops: &dyn FactionOps) -> OwnerFlags {
    let mut flags = OwnerFlags::UNOWNED;
    for &owner in owners {
        if ops.is_npc(owner) {
            flags |= OwnerFlags::NPC;
        } else {
            flags |= OwnerFlags::PLAYER;
        }
        flags.remove(OwnerFlags::UNOWNED);
    }
    flags
}

/// In-memory faction registry.
///
/// Stands in for the engine's faction system in tests and headless runs.
/// Reputation between factions is stored symmetrically.
#[derive(Debug, Default)]
pub struct FactionTable {
    members: AHashMap<IdentityId, FactionId>,
    tags: AHashMap<FactionId, String>,
    npcs: AHashSet<IdentityId>,
    identity_reputation: AHashMap<(IdentityId, FactionId), i32>,
    faction_reputation: AHashMap<(FactionId, FactionId), i32>,
}

impl FactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_faction(&mut self, faction: FactionId, tag: impl Into<String>) {
        self.tags.insert(faction, tag.into());
    }

    pub fn insert_member(&mut self, identity: IdentityId, faction: FactionId) {
        self.members.insert(identity, faction);
    }

    pub fn set_npc(&mut self, identity: IdentityId) {
        self.npcs.insert(identity);
    }

    pub fn set_reputation(&mut self, identity: IdentityId, faction: FactionId, reputation: i32) {
        self.identity_reputation.insert((identity, faction), reputation);
    }

    pub fn set_faction_reputation(&mut self, a: FactionId, b: FactionId, reputation: i32) {
        self.faction_reputation.insert((a, b), reputation);
        self.faction_reputation.insert((b, a), reputation);
    }
}

impl FactionOps for FactionTable {
    fn faction_of(&self, identity: IdentityId) -> Option<FactionId> {
        self.members.get(&identity).copied()
    }

    fn is_npc(&self, identity: IdentityId) -> bool {
        self.npcs.contains(&identity)
    }

    fn reputation_with_faction(&self, identity: IdentityId, faction: FactionId) -> i32 {
        self.identity_reputation
            .get(&(identity, faction))
            .copied()
            .unwrap_or(0)
    }

    fn reputation_between_factions(&self, a: FactionId, b: FactionId) -> i32 {
        self.faction_reputation.get(&(a, b)).copied().unwrap_or(0)
    }

    fn faction_tag(&self, faction: FactionId) -> Option<&str> {
        self.tags.get(&faction).map(String::as_str)
    }
}
