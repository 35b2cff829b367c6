//! Combatants and the roster that owns them.
//!
//! A combatant is created at encounter setup and never deleted. Its
//! `defeated` flag mirrors its pile state and is kept in sync by `World`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::entity::{CombatantId, Faction, LocationId};

/// Who controls a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantKind {
    /// Controlled by a human player.
    Player,
    /// Autonomous actor.
    Monster,
}

impl std::fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatantKind::Player => f.write_str("player"),
            CombatantKind::Monster => f.write_str("monster"),
        }
    }
}

/// A player-controlled or autonomous actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub kind: CombatantKind,
    pub faction: Faction,
    pub location: LocationId,
    /// True once active + discard reached zero.
    pub defeated: bool,
}

impl Combatant {
    /// Check if this combatant is controlled by a player.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.kind == CombatantKind::Player
    }

    /// Check if this combatant is still in play.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.defeated
    }
}

/// All combatants, keyed by id.
///
/// Iteration helpers always return combatants in ascending id order so
/// that callers drawing randomness from the results stay deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    combatants: FxHashMap<CombatantId, Combatant>,
    next_id: u32,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new combatant and return its id.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        kind: CombatantKind,
        faction: Faction,
        location: LocationId,
    ) -> CombatantId {
        let id = CombatantId(self.next_id);
        self.next_id += 1;

        self.combatants.insert(
            id,
            Combatant {
                id,
                name: name.into(),
                kind,
                faction,
                location,
                defeated: false,
            },
        );
        id
    }

    /// Look up a combatant.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Look up a combatant mutably.
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    /// Look up a combatant that must exist.
    ///
    /// Panics if the id is unknown; ids only come from this roster.
    #[must_use]
    pub fn expect(&self, id: CombatantId) -> &Combatant {
        self.combatants
            .get(&id)
            .unwrap_or_else(|| panic!("{id} is not in the roster"))
    }

    /// Check if a combatant exists and is defeated.
    #[must_use]
    pub fn is_defeated(&self, id: CombatantId) -> bool {
        self.combatants.get(&id).is_some_and(|c| c.defeated)
    }

    /// All combatants in id order.
    #[must_use]
    pub fn all(&self) -> Vec<&Combatant> {
        let mut all: Vec<_> = self.combatants.values().collect();
        all.sort_by_key(|c| c.id);
        all
    }

    /// Living combatants at a location, in id order.
    #[must_use]
    pub fn alive_at(&self, location: &LocationId) -> Vec<&Combatant> {
        self.all()
            .into_iter()
            .filter(|c| c.is_alive() && &c.location == location)
            .collect()
    }

    /// Number of registered combatants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    /// Check if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.add("Bob", CombatantKind::Player, Faction::new("players"), LocationId::new("cave"));
        roster.add("Goblin", CombatantKind::Monster, Faction::new("monsters"), LocationId::new("cave"));
        roster.add("Merchant", CombatantKind::Monster, Faction::new("traders"), LocationId::new("town"));
        roster
    }

    #[test]
    fn test_ids_are_sequential() {
        let roster = roster();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.expect(CombatantId(0)).name, "Bob");
        assert_eq!(roster.expect(CombatantId(2)).name, "Merchant");
        assert!(roster.get(CombatantId(9)).is_none());
    }

    #[test]
    fn test_alive_at_filters_location_and_defeat() {
        let mut roster = roster();
        let cave = LocationId::new("cave");

        assert_eq!(roster.alive_at(&cave).len(), 2);

        roster.get_mut(CombatantId(1)).unwrap().defeated = true;
        let alive: Vec<_> = roster.alive_at(&cave).iter().map(|c| c.id).collect();
        assert_eq!(alive, vec![CombatantId(0)]);
        assert!(roster.is_defeated(CombatantId(1)));
    }

    #[test]
    fn test_kind_helpers() {
        let roster = roster();
        assert!(roster.expect(CombatantId(0)).is_player());
        assert!(!roster.expect(CombatantId(1)).is_player());
        assert_eq!(CombatantKind::Monster.to_string(), "monster");
    }

    #[test]
    #[should_panic(expected = "not in the roster")]
    fn test_expect_unknown_panics() {
        let roster = Roster::new();
        let _ = roster.expect(CombatantId(0));
    }
}
