//! Majority/minority owner classification.

use bitflags::bitflags;

use crate::core::types::IdentityId;
use crate::relations::resolver::FactionOps;

bitflags! {
    /// Who holds a grid, split by majority and minority block ownership.
    ///
    /// Serializes as the flag names joined by `|`, which is what grid
    /// reports embed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
    pub struct OwnershipFlags: u8 {
        const PLAYER_MAJORITY = 1;
        const PLAYER_MINORITY = 1 << 1;
        const NPC_MAJORITY = 1 << 2;
        const NPC_MINORITY = 1 << 3;
    }
}

impl OwnershipFlags {
    pub fn npc_owned(self) -> bool {
        self.intersects(OwnershipFlags::NPC_MAJORITY | OwnershipFlags::NPC_MINORITY)
    }

    pub fn player_owned(self) -> bool {
        self.intersects(OwnershipFlags::PLAYER_MAJORITY | OwnershipFlags::PLAYER_MINORITY)
    }
}

/// Classifies the two owner lists of a grid.
///
/// The zero identity never counts, and an identity already holding majority
/// ownership is not double-reported as a minority holder.
pub fn classify_owners(
    majority: &[IdentityId],
    minority: &[IdentityId],
    ops: &dyn FactionOps,
) -> OwnershipFlags {
    let mut flags = OwnershipFlags::empty();

    for &owner in majority {
        if owner.is_nobody() {
            continue;
        }
        if ops.is_npc(owner) {
            flags |= OwnershipFlags::NPC_MAJORITY;
        } else {
            flags |= OwnershipFlags::PLAYER_MAJORITY;
        }
    }

    for &owner in minority {
        if owner.is_nobody() || majority.contains(&owner) {
            continue;
        }
        if ops.is_npc(owner) {
            flags |= OwnershipFlags::NPC_MINORITY;
        } else {
            flags |= OwnershipFlags::PLAYER_MINORITY;
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FactionId;
    use crate::relations::resolver::FactionTable;

    fn table_with_npc(npc: IdentityId) -> FactionTable {
        let mut table = FactionTable::new();
        table.insert_faction(FactionId(1), "SPRT");
        table.insert_member(npc, FactionId(1));
        table.set_npc(npc);
        table
    }

    #[test]
    fn test_zero_identity_never_counts() {
        let table = FactionTable::new();
        let flags = classify_owners(&[IdentityId::NOBODY], &[IdentityId::NOBODY], &table);
        assert_eq!(flags, OwnershipFlags::empty());
    }

    #[test]
    fn test_majority_and_minority_split() {
        let table = table_with_npc(IdentityId(10));
        let flags = classify_owners(&[IdentityId(10)], &[IdentityId(77)], &table);
        assert_eq!(
            flags,
            OwnershipFlags::NPC_MAJORITY | OwnershipFlags::PLAYER_MINORITY
        );
        assert!(flags.npc_owned());
        assert!(flags.player_owned());
    }

    #[test]
    fn test_majority_holder_not_double_reported() {
        let table = table_with_npc(IdentityId(10));
        let flags = classify_owners(&[IdentityId(10)], &[IdentityId(10)], &table);
        assert_eq!(flags, OwnershipFlags::NPC_MAJORITY);
    }

    #[test]
    fn test_flags_serialize_to_name_list() {
        let flags = OwnershipFlags::PLAYER_MINORITY | OwnershipFlags::NPC_MAJORITY;
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, "\"PLAYER_MINORITY | NPC_MAJORITY\"");

        let empty = serde_json::to_string(&OwnershipFlags::empty()).unwrap();
        assert_eq!(empty, "\"\"");
    }
}
