//! Identifiers for everything the engine tracks.
//!
//! Numeric ids (`CombatantId`, `CardId`, `ItemId`, `SequenceId`) are
//! allocated by the stores that own the corresponding records. String-backed
//! ids (`LocationId`, `Faction`) come from scenario data and are opaque to
//! the engine.
//!
//! ## Usage
//!
//! ```
//! use rust_skirmish::core::{CombatantId, Faction, LocationId};
//!
//! let goblin = CombatantId(3);
//! let cave = LocationId::new("cave");
//! let monsters = Faction::new("monsters");
//!
//! assert_eq!(goblin.to_string(), "Combatant(3)");
//! assert_eq!(cave.as_str(), "cave");
//! assert_eq!(monsters.to_string(), "monsters");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Get the raw id value.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier for a player-controlled or autonomous actor.
    CombatantId,
    "Combatant"
);

numeric_id!(
    /// Identifier for a single card. Cards are never deleted, so ids are
    /// never reused.
    CardId,
    "Card"
);

numeric_id!(
    /// Identifier for a consumable item.
    ItemId,
    "Item"
);

numeric_id!(
    /// Identifier for one encounter (a location-scoped action sequence).
    SequenceId,
    "Sequence"
);

/// Location where combatants meet. Encounters are scoped to one location.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub String);

impl LocationId {
    /// Create a location id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Faction name. Relationships between factions gate targeting.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Faction(pub String);

impl Faction {
    /// Create a faction.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the faction name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_display() {
        assert_eq!(CardId(7).to_string(), "Card(7)");
        assert_eq!(ItemId(1).to_string(), "Item(1)");
        assert_eq!(SequenceId(2).to_string(), "Sequence(2)");
    }

    #[test]
    fn test_numeric_id_ordering() {
        let mut ids = vec![CombatantId(3), CombatantId(1), CombatantId(2)];
        ids.sort();
        assert_eq!(ids, vec![CombatantId(1), CombatantId(2), CombatantId(3)]);
        assert_eq!(CombatantId(5).raw(), 5);
    }

    #[test]
    fn test_string_ids() {
        let faction = Faction::new("players");
        assert_eq!(faction, Faction("players".to_string()));
        assert_eq!(LocationId::new("tavern").to_string(), "tavern");
    }
}
