//! World state: everything an encounter reads and mutates.
//!
//! ## World
//!
//! - Roster of combatants (faction, location, defeated flag)
//! - Card piles
//! - Tags
//! - Faction relationships
//! - Items
//!
//! Pile mutations go through `World` so the defeated flag is re-derived
//! after each one: `defeated == (active + discard == 0)` always holds.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::combatant::{Combatant, CombatantKind, Roster};
use super::config::TagWindows;
use super::entity::{CardId, CombatantId, Faction, ItemId, LocationId};
use super::error::EngineError;
use super::rng::GameRng;
use crate::cards::CardType;
use crate::factions::FactionMatrix;
use crate::items::{self, Item, ItemPayload, ItemStore};
use crate::piles::{CardPileManager, DestroyedCard, PileCounts};
use crate::tags::TagStore;

/// Complete mutable state shared by the engine's components.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct World {
    roster: Roster,
    piles: CardPileManager,
    pub tags: TagStore,
    pub factions: FactionMatrix,
    pub items: ItemStore,
}

impl World {
    /// Create an empty world with standard tag windows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world with custom tag windows.
    #[must_use]
    pub fn with_windows(windows: TagWindows) -> Self {
        Self {
            tags: TagStore::with_windows(windows),
            ..Self::default()
        }
    }

    /// Read access to the roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Read access to the card piles.
    #[must_use]
    pub fn piles(&self) -> &CardPileManager {
        &self.piles
    }

    /// Look up a combatant that must exist.
    #[must_use]
    pub fn combatant(&self, id: CombatantId) -> &Combatant {
        self.roster.expect(id)
    }

    // === Setup ===

    /// Create a combatant with a deck, in the given card order.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        kind: CombatantKind,
        faction: Faction,
        location: LocationId,
        deck: &[CardType],
    ) -> CombatantId {
        let id = self.roster.add(name, kind, faction, location);
        self.piles.create_deck(id, deck);
        self.sync_defeat(id);
        id
    }

    /// Create a combatant from card type names.
    ///
    /// Every name is validated before anything is created.
    pub fn spawn_from_names(
        &mut self,
        name: impl Into<String>,
        kind: CombatantKind,
        faction: Faction,
        location: LocationId,
        deck: &[&str],
    ) -> Result<CombatantId, EngineError> {
        let types = deck
            .iter()
            .map(|name| name.parse::<CardType>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.spawn(name, kind, faction, location, &types))
    }

    /// Move a combatant to another location.
    pub fn relocate(&mut self, id: CombatantId, location: LocationId) {
        if let Some(combatant) = self.roster.get_mut(id) {
            combatant.location = location;
        }
    }

    /// Give a new item to a combatant.
    pub fn give_item(&mut self, owner: CombatantId, name: impl Into<String>, payload: ItemPayload) -> ItemId {
        self.items.give(owner, name, payload)
    }

    // === Piles ===

    /// Health used for targeting: active + discard.
    #[must_use]
    pub fn health(&self, id: CombatantId) -> usize {
        self.piles.health(id)
    }

    /// Per-pile counts.
    #[must_use]
    pub fn pile_counts(&self, id: CombatantId) -> PileCounts {
        self.piles.pile_counts(id)
    }

    /// Shuffle a combatant's active pile.
    pub fn shuffle_deck(&mut self, id: CombatantId, rng: &mut GameRng) {
        self.piles.shuffle_active(id, rng);
    }

    /// Move a card to its owner's discard pile.
    pub fn discard(&mut self, card: CardId) {
        self.piles.discard(card);
        self.sync_card_owner(card);
    }

    /// Move a card to its owner's destroyed pile.
    pub fn destroy(&mut self, card: CardId) {
        self.piles.destroy(card);
        self.sync_card_owner(card);
    }

    /// Restore a random destroyed card to the top of discard.
    pub fn heal_one(&mut self, id: CombatantId, rng: &mut GameRng) -> Option<CardId> {
        let healed = self.piles.heal_one(id, rng);
        self.sync_defeat(id);
        healed
    }

    /// Destroy one random card (active first, then discard), never
    /// touching `excluded`.
    pub fn destroy_one_card(
        &mut self,
        id: CombatantId,
        excluded: &FxHashSet<CardId>,
        rng: &mut GameRng,
    ) -> Option<DestroyedCard> {
        let destroyed = self.piles.destroy_one_card(id, excluded, rng);
        self.sync_defeat(id);
        destroyed
    }

    /// Move discard below active, keeping discard order.
    pub fn refresh_deck(&mut self, id: CombatantId) {
        self.piles.refresh_deck(id);
        self.sync_defeat(id);
    }

    fn sync_card_owner(&mut self, card: CardId) {
        if let Some(owner) = self.piles.get(card).map(|c| c.owner) {
            self.sync_defeat(owner);
        }
    }

    /// Re-derive the defeated flag from pile state.
    ///
    /// Returns true if the combatant became defeated by this call.
    pub fn sync_defeat(&mut self, id: CombatantId) -> bool {
        let defeated = self.piles.is_defeated(id);
        match self.roster.get_mut(id) {
            Some(combatant) if combatant.defeated != defeated => {
                combatant.defeated = defeated;
                if defeated {
                    debug!(%id, name = %combatant.name, "combatant defeated");
                }
                defeated
            }
            _ => false,
        }
    }

    /// Check the defeat invariant for every combatant.
    #[must_use]
    pub fn defeat_flags_consistent(&self) -> bool {
        self.roster
            .all()
            .iter()
            .all(|c| c.defeated == self.piles.is_defeated(c.id))
    }

    // === Items ===

    /// Move the giver's oldest item to `recipient`, consuming it.
    pub fn transfer_first_item(&mut self, giver: CombatantId, recipient: CombatantId) -> Option<Item> {
        items::transfer_first(&mut self.items, &mut self.piles, giver, recipient)
    }

    /// Move every item `victim` holds to `killer`, consuming each.
    pub fn loot_all(&mut self, victim: CombatantId, killer: CombatantId) -> Vec<Item> {
        items::loot_all(&mut self.items, &mut self.piles, victim, killer)
    }
}
