//! Card pile manager.
//!
//! The `CardPileManager` owns every card and tracks which pile it sits in
//! and its position there. It supports:
//! - Deck creation and shuffling of the active pile
//! - Drawing (lowest order first, never an implicit reshuffle)
//! - Discard, destroy, heal and random destruction
//! - The once-per-outer-round refresh of discard into active
//!
//! Cards are never removed, so the sum of all piles for an owner always
//! equals the number of cards ever created for that owner.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cards::{Card, CardType, Pile};
use crate::core::entity::{CardId, CombatantId};
use crate::core::rng::GameRng;

/// Per-pile card counts for one owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PileCounts {
    pub active: usize,
    pub discard: usize,
    pub destroyed: usize,
    pub inactive: usize,
}

impl PileCounts {
    /// Active plus discard: the health used for targeting.
    #[must_use]
    pub fn health(&self) -> usize {
        self.active + self.discard
    }

    /// Every card the owner has, in any pile.
    #[must_use]
    pub fn total(&self) -> usize {
        self.active + self.discard + self.destroyed + self.inactive
    }
}

/// A card removed by damage, and the pile it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestroyedCard {
    pub card: CardId,
    pub card_type: CardType,
    pub from_pile: Pile,
}

/// Manages card locations across piles.
///
/// ## Usage
///
/// ```
/// use rust_skirmish::cards::CardType;
/// use rust_skirmish::core::{CombatantId, GameRng};
/// use rust_skirmish::piles::CardPileManager;
///
/// let mut piles = CardPileManager::new();
/// let owner = CombatantId(0);
/// let mut rng = GameRng::new(42);
///
/// piles.create_deck(owner, &[CardType::Attack, CardType::Defend]);
/// piles.shuffle_active(owner, &mut rng);
///
/// let top = piles.draw_top(owner).unwrap();
/// piles.discard(top);
///
/// let counts = piles.pile_counts(owner);
/// assert_eq!((counts.active, counts.discard), (1, 1));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardPileManager {
    cards: FxHashMap<CardId, Card>,
    /// Card ids per owner, in creation order.
    owned: FxHashMap<CombatantId, Vec<CardId>>,
    next_id: u32,
}

impl CardPileManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the owner's active pile with one card per type, in the given
    /// order. The caller may shuffle afterwards.
    pub fn create_deck(&mut self, owner: CombatantId, types: &[CardType]) -> Vec<CardId> {
        types
            .iter()
            .map(|&card_type| {
                let order = self.next_order(owner, Pile::Active);
                self.insert(owner, card_type, Pile::Active, order)
            })
            .collect()
    }

    /// Add a card to the owner's inactive pile.
    pub fn add_to_inactive(&mut self, owner: CombatantId, card_type: CardType) -> CardId {
        let order = self.next_order(owner, Pile::Inactive);
        self.insert(owner, card_type, Pile::Inactive, order)
    }

    fn insert(&mut self, owner: CombatantId, card_type: CardType, pile: Pile, order: u32) -> CardId {
        let id = CardId(self.next_id);
        self.next_id += 1;

        self.cards.insert(
            id,
            Card {
                id,
                owner,
                card_type,
                pile,
                order,
            },
        );
        self.owned.entry(owner).or_default().push(id);
        id
    }

    /// Look up a card.
    #[must_use]
    pub fn get(&self, card: CardId) -> Option<&Card> {
        self.cards.get(&card)
    }

    /// Cards in one of the owner's piles, lowest order first.
    #[must_use]
    pub fn cards_in_pile(&self, owner: CombatantId, pile: Pile) -> Vec<CardId> {
        let mut cards: Vec<&Card> = self
            .owned
            .get(&owner)
            .into_iter()
            .flatten()
            .filter_map(|id| self.cards.get(id))
            .filter(|card| card.pile == pile)
            .collect();
        cards.sort_by_key(|card| (card.order, card.id));
        cards.into_iter().map(|card| card.id).collect()
    }

    fn next_order(&self, owner: CombatantId, pile: Pile) -> u32 {
        self.owned
            .get(&owner)
            .into_iter()
            .flatten()
            .filter_map(|id| self.cards.get(id))
            .filter(|card| card.pile == pile)
            .map(|card| card.order + 1)
            .max()
            .unwrap_or(0)
    }

    fn relocate(&mut self, card: CardId, pile: Pile) -> Option<Pile> {
        let owner = self.cards.get(&card)?.owner;
        let order = self.next_order(owner, pile);
        let entry = self.cards.get_mut(&card)?;
        let from = entry.pile;
        entry.pile = pile;
        entry.order = order;
        trace!(%card, %from, to = %pile, "card moved");
        Some(from)
    }

    /// Randomly permute the order of the owner's active pile.
    pub fn shuffle_active(&mut self, owner: CombatantId, rng: &mut GameRng) {
        let mut active = self.cards_in_pile(owner, Pile::Active);
        rng.shuffle(&mut active);
        for (order, id) in active.into_iter().enumerate() {
            if let Some(card) = self.cards.get_mut(&id) {
                card.order = order as u32;
            }
        }
    }

    /// The lowest-order active card, or `None` if the active pile is empty.
    ///
    /// The card stays in the active pile until the caller discards it.
    #[must_use]
    pub fn draw_top(&self, owner: CombatantId) -> Option<CardId> {
        self.cards_in_pile(owner, Pile::Active).first().copied()
    }

    /// Move a card to the top of its owner's discard pile.
    ///
    /// Returns the pile it came from.
    pub fn discard(&mut self, card: CardId) -> Option<Pile> {
        self.relocate(card, Pile::Discard)
    }

    /// Move a card to its owner's destroyed pile.
    ///
    /// Returns the pile it came from.
    pub fn destroy(&mut self, card: CardId) -> Option<Pile> {
        self.relocate(card, Pile::Destroyed)
    }

    /// Restore a uniformly random destroyed card to the top of discard.
    pub fn heal_one(&mut self, owner: CombatantId, rng: &mut GameRng) -> Option<CardId> {
        let destroyed = self.cards_in_pile(owner, Pile::Destroyed);
        let card = *rng.choose(&destroyed)?;
        self.relocate(card, Pile::Discard);
        Some(card)
    }

    /// Destroy one uniformly random card, taken from active if possible and
    /// from discard otherwise. Cards in `excluded` are never picked.
    pub fn destroy_one_card(
        &mut self,
        owner: CombatantId,
        excluded: &FxHashSet<CardId>,
        rng: &mut GameRng,
    ) -> Option<DestroyedCard> {
        for pile in [Pile::Active, Pile::Discard] {
            let candidates: Vec<CardId> = self
                .cards_in_pile(owner, pile)
                .into_iter()
                .filter(|id| !excluded.contains(id))
                .collect();

            if let Some(&card) = rng.choose(&candidates) {
                let card_type = self.cards.get(&card)?.card_type;
                self.relocate(card, Pile::Destroyed);
                return Some(DestroyedCard {
                    card,
                    card_type,
                    from_pile: pile,
                });
            }
        }
        None
    }

    /// Move every discard card below the existing active cards, keeping
    /// their relative discard order. No shuffle.
    pub fn refresh_deck(&mut self, owner: CombatantId) {
        let discard = self.cards_in_pile(owner, Pile::Discard);
        let mut order = self.next_order(owner, Pile::Active);
        for id in discard {
            if let Some(card) = self.cards.get_mut(&id) {
                card.pile = Pile::Active;
                card.order = order;
                order += 1;
            }
        }
    }

    /// Counts per pile for one owner.
    #[must_use]
    pub fn pile_counts(&self, owner: CombatantId) -> PileCounts {
        let mut counts = PileCounts::default();
        for card in self.owned.get(&owner).into_iter().flatten().filter_map(|id| self.cards.get(id)) {
            match card.pile {
                Pile::Active => counts.active += 1,
                Pile::Discard => counts.discard += 1,
                Pile::Destroyed => counts.destroyed += 1,
                Pile::Inactive => counts.inactive += 1,
            }
        }
        counts
    }

    /// Active plus discard.
    #[must_use]
    pub fn health(&self, owner: CombatantId) -> usize {
        self.pile_counts(owner).health()
    }

    /// An owner is defeated once active and discard are both empty.
    #[must_use]
    pub fn is_defeated(&self, owner: CombatantId) -> bool {
        self.health(owner) == 0
    }

    /// Check if the owner can still draw.
    #[must_use]
    pub fn has_active_cards(&self, owner: CombatantId) -> bool {
        self.pile_counts(owner).active > 0
    }

    /// Number of cards ever created for an owner.
    #[must_use]
    pub fn total_cards(&self, owner: CombatantId) -> usize {
        self.owned.get(&owner).map_or(0, Vec::len)
    }
}
