//! Round resolution.
//!
//! The `PhaseResolver` runs the three steps of one encounter round over a
//! set of participant records:
//!
//! 1. `draw_and_assign`: every living participant commits its top card and
//!    gets a target, all from the same pre-resolution state
//! 2. `resolve_round`: cards resolve phase by phase in
//!    `CardType::PHASE_ORDER`; each phase sees the effects of the earlier
//!    ones
//! 3. `apply_poison_ticks`: poisoned participants lose one card each
//!
//! No-op situations (no target, target already defeated, missing
//! precondition) are reported as outcomes, never as errors.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;

use super::outcome::{
    Actor, BlockUse, CardOutcome, DefendOutcome, DrawnCard, HealOutcome, ResolutionResult, SneakOutcome,
    StatusOutcome, StealOutcome, StrikeOutcome, TargetRef, TickDamage, TickResult, TradeOutcome,
};
use super::targeting::TargetSelector;
use crate::cards::{CardType, Pile};
use crate::core::{CardId, CombatantId, GameRng, LocationId, RulesConfig, World};
use crate::factions::Relation;
use crate::goals::GoalTracker;
use crate::sequence::SequenceParticipant;
use crate::tags::TagKind;

/// Resolves one round for a set of participants.
///
/// ## Usage
///
/// ```
/// use rust_skirmish::cards::CardType;
/// use rust_skirmish::core::{CombatantKind, Faction, GameRng, LocationId, RulesConfig, World};
/// use rust_skirmish::effects::{EffectTag, PhaseResolver};
/// use rust_skirmish::goals::NoGoals;
/// use rust_skirmish::sequence::SequenceParticipant;
///
/// let mut world = World::new();
/// let camp = LocationId::new("camp");
/// let scout = world.spawn("Scout", CombatantKind::Player, Faction::new("players"), camp, &[CardType::Sneak]);
///
/// let mut rng = GameRng::new(7);
/// let rules = RulesConfig::default();
/// let mut participants = vec![SequenceParticipant::new(scout)];
///
/// let mut resolver = PhaseResolver::new(&mut world, &mut rng, &rules, NoGoals, &mut participants, 1);
/// resolver.draw_and_assign();
/// let results = resolver.resolve_round();
///
/// assert_eq!(results[0].effect(), EffectTag::Hidden);
/// ```
pub struct PhaseResolver<'a, G: GoalTracker> {
    world: &'a mut World,
    rng: &'a mut GameRng,
    rules: &'a RulesConfig,
    goals: G,
    participants: &'a mut [SequenceParticipant],
    round: u32,
    watched: FxHashSet<LocationId>,
    sellers: FxHashSet<CombatantId>,
}

impl<'a, G: GoalTracker> PhaseResolver<'a, G> {
    /// Create a resolver for encounter round `round`.
    ///
    /// Pass `&mut tracker` to keep using a tracker afterwards.
    pub fn new(
        world: &'a mut World,
        rng: &'a mut GameRng,
        rules: &'a RulesConfig,
        goals: G,
        participants: &'a mut [SequenceParticipant],
        round: u32,
    ) -> Self {
        Self {
            world,
            rng,
            rules,
            goals,
            participants,
            round,
            watched: FxHashSet::default(),
            sellers: FxHashSet::default(),
        }
    }

    // === Draw ===

    /// Clear expired tags, reset blocks, and have every living participant
    /// commit its top card with a target.
    ///
    /// Participants with an empty active pile sit the round out.
    pub fn draw_and_assign(&mut self) -> Vec<DrawnCard> {
        for (owner, tag) in self.world.tags.clear_expired(self.round) {
            debug!(%owner, tag = %tag.kind, round = self.round, "tag expired");
        }
        for participant in self.participants.iter_mut() {
            participant.reset();
        }

        let candidates: Vec<CombatantId> = self.participants.iter().map(|p| p.combatant).collect();
        let mut drawn = Vec::new();

        for idx in 0..self.participants.len() {
            let id = self.participants[idx].combatant;
            if self.world.combatant(id).defeated {
                continue;
            }
            let Some(card) = self.world.piles().draw_top(id) else {
                continue;
            };
            let card_type = self.card_type(card);
            let target = TargetSelector::new(self.world, self.round).select(id, card_type, &candidates, self.rng);

            let participant = &mut self.participants[idx];
            participant.drawn = Some(card);
            participant.target = target;

            let combatant = self.world.combatant(id);
            if combatant.is_player() {
                self.goals.track_card_play(combatant, card_type);
            }
            debug!(%id, %card_type, target = ?target, "card drawn");

            drawn.push(DrawnCard {
                combatant: Actor::from(combatant),
                faction: combatant.faction.clone(),
                card,
                card_type,
                target: self.target_ref(target),
            });
        }
        drawn
    }

    // === Resolution ===

    /// Resolve every drawn card in phase order, then discard the drawn
    /// cards that are still in play.
    pub fn resolve_round(&mut self) -> Vec<ResolutionResult> {
        let committed: Vec<(usize, CardId, CardType)> = self
            .participants
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| p.drawn.map(|card| (idx, card, self.card_type(card))))
            .collect();

        let mut results = Vec::with_capacity(committed.len());
        for phase in CardType::PHASE_ORDER {
            let mut batch: Vec<(usize, CardId)> = committed
                .iter()
                .filter(|&&(_, _, card_type)| card_type == phase)
                .map(|&(idx, card, _)| (idx, card))
                .collect();
            if batch.is_empty() {
                continue;
            }
            if phase.randomizes_batch_order() {
                self.rng.shuffle(&mut batch);
            }
            debug!(round = self.round, %phase, cards = batch.len(), "resolving phase");

            for (idx, card) in batch {
                results.push(self.resolve_card(idx, card, phase));
            }
        }

        for &(_, card, _) in &committed {
            if self.world.piles().get(card).is_some_and(|c| c.pile == Pile::Active) {
                self.world.discard(card);
            }
        }
        for participant in self.participants.iter_mut() {
            participant.resolved = true;
        }
        results
    }

    fn resolve_card(&mut self, idx: usize, card: CardId, card_type: CardType) -> ResolutionResult {
        let caster = self.participants[idx].combatant;
        let target = self.participants[idx].target;

        let outcome = match card_type {
            CardType::Watch => self.watch(caster),
            CardType::Sneak => CardOutcome::Sneak(self.sneak(caster)),
            CardType::Poison => CardOutcome::Poison(self.apply_status(target, TagKind::Poisoned)),
            CardType::Mark => CardOutcome::Mark(self.apply_status(target, TagKind::Marked)),
            CardType::Defend => CardOutcome::Defend(self.defend(caster, target)),
            CardType::Backstab => CardOutcome::Backstab(self.backstab(caster, target)),
            CardType::Execute => CardOutcome::Execute(self.execute(caster, target)),
            CardType::Attack => CardOutcome::Attack(self.attack(caster, target)),
            CardType::Heal => CardOutcome::Heal(self.heal(target)),
            CardType::Shuffle => {
                self.world.shuffle_deck(caster, self.rng);
                CardOutcome::Shuffle
            }
            CardType::Sell => {
                self.sellers.insert(caster);
                CardOutcome::Sell
            }
            CardType::Wealth => CardOutcome::Wealth(self.wealth(caster, card, target)),
            CardType::Steal => CardOutcome::Steal(self.steal(caster, target)),
        };

        let shown_target = match card_type {
            CardType::Watch | CardType::Sneak | CardType::Shuffle | CardType::Sell => None,
            _ => self.target_ref(target),
        };

        ResolutionResult {
            caster: Actor::from(self.world.combatant(caster)),
            card,
            card_type,
            target: shown_target,
            outcome,
        }
    }

    fn watch(&mut self, caster: CombatantId) -> CardOutcome {
        let watcher = self.world.combatant(caster);
        let location = watcher.location.clone();
        let faction = watcher.faction.clone();

        let spotted: Vec<TargetRef> = self
            .world
            .roster()
            .alive_at(&location)
            .into_iter()
            .filter(|c| c.id != caster)
            .filter(|c| self.world.factions.is_hostile(&faction, &c.faction))
            .filter(|c| self.world.tags.is_active(c.id, TagKind::Hidden, self.round))
            .map(TargetRef::from)
            .collect();

        for revealed in &spotted {
            self.world.tags.remove(revealed.id, TagKind::Hidden);
        }
        self.watched.insert(location);
        CardOutcome::Watch { revealed: spotted }
    }

    fn sneak(&mut self, caster: CombatantId) -> SneakOutcome {
        if self.watched.contains(&self.world.combatant(caster).location) {
            return SneakOutcome::SneakFailed;
        }
        self.world.tags.set(caster, TagKind::Hidden, 1, self.round);
        SneakOutcome::Hidden {
            duration: TagKind::Hidden.window(self.world.tags.windows()),
        }
    }

    fn apply_status(&mut self, target: Option<CombatantId>, kind: TagKind) -> StatusOutcome {
        let Some(target) = target else {
            return StatusOutcome::NoTarget;
        };
        if self.world.combatant(target).defeated {
            return StatusOutcome::TargetDefeated;
        }
        let duration = kind.window(self.world.tags.windows());
        self.world.tags.set(target, kind, duration, self.round);
        StatusOutcome::Applied { duration }
    }

    fn defend(&mut self, caster: CombatantId, target: Option<CombatantId>) -> DefendOutcome {
        let Some(target) = target else {
            return DefendOutcome::NoTarget;
        };
        if self.world.combatant(target).defeated {
            return DefendOutcome::TargetDefeated;
        }
        let Some(slot) = self.participant_index(target) else {
            return DefendOutcome::NoTarget;
        };

        self.participants[slot].block_count += 1;
        let block_count = self.participants[slot].block_count;

        let defender = self.world.combatant(caster);
        if target != caster && defender.is_player() {
            self.goals.track_block_for_ally(defender);
        }
        DefendOutcome::Block { block_count }
    }

    fn backstab(&mut self, caster: CombatantId, target: Option<CombatantId>) -> StrikeOutcome {
        if !self.world.tags.is_active(caster, TagKind::Hidden, self.round) {
            return StrikeOutcome::NotHidden;
        }
        let Some(target) = target else {
            return StrikeOutcome::NoTarget;
        };
        if self.world.combatant(target).defeated {
            return StrikeOutcome::TargetDefeated;
        }
        self.strike(caster, target, self.rules.backstab_damage)
    }

    fn execute(&mut self, caster: CombatantId, target: Option<CombatantId>) -> StrikeOutcome {
        let Some(target) = target else {
            return StrikeOutcome::NoTarget;
        };
        if self.world.combatant(target).defeated {
            return StrikeOutcome::TargetDefeated;
        }
        if !self.world.tags.is_active(target, TagKind::Poisoned, self.round) {
            return StrikeOutcome::NotPoisoned;
        }
        self.strike(caster, target, self.rules.execute_damage)
    }

    fn attack(&mut self, caster: CombatantId, target: Option<CombatantId>) -> StrikeOutcome {
        let Some(target) = target else {
            return StrikeOutcome::NoTarget;
        };
        if self.world.combatant(target).defeated {
            return StrikeOutcome::TargetDefeated;
        }
        if self.world.tags.is_active(target, TagKind::Hidden, self.round) {
            return StrikeOutcome::TargetHidden;
        }
        self.strike(caster, target, self.rules.attack_damage)
    }

    /// Shared damage step: marked bonus, block absorption, card
    /// destruction, then defeat handling.
    fn strike(&mut self, caster: CombatantId, target: CombatantId, base: u32) -> StrikeOutcome {
        let marked_bonus = self.world.tags.is_active(target, TagKind::Marked, self.round);
        let damage = base + if marked_bonus { self.rules.marked_bonus } else { 0 };

        let slot = self.participant_index(target);
        let block_count = slot.map_or(0, |s| self.participants[s].block_count);
        let used = block_count.min(damage);
        let dealt = damage - used;

        let blocks = if used > 0 {
            if let Some(s) = slot {
                self.participants[s].block_count -= used;
            }
            Some(BlockUse {
                used,
                remaining: block_count - used,
            })
        } else {
            None
        };

        if dealt == 0 {
            return StrikeOutcome::Blocked {
                marked_bonus,
                blocks: blocks.unwrap_or_default(),
            };
        }

        let mut excluded: FxHashSet<CardId> = slot.and_then(|s| self.participants[s].drawn).into_iter().collect();
        let mut destroyed = SmallVec::new();
        for _ in 0..dealt {
            let Some(lost) = self.world.destroy_one_card(target, &excluded, self.rng) else {
                break;
            };
            excluded.insert(lost.card);
            destroyed.push(lost);
        }

        let target_defeated = self.world.combatant(target).defeated;
        let mut looted = Vec::new();
        if target_defeated {
            let victim_faction = self.world.combatant(target).faction.clone();
            let killer = self.world.combatant(caster);
            if killer.is_player() {
                self.goals.track_killing_blow(killer, &victim_faction);
            }
            looted = self.world.loot_all(target, caster);
            debug!(%caster, %target, looted = looted.len(), "killing blow");
        }

        StrikeOutcome::Hit {
            damage: dealt,
            marked_bonus,
            blocks,
            destroyed,
            target_defeated,
            looted,
        }
    }

    fn heal(&mut self, target: Option<CombatantId>) -> HealOutcome {
        let Some(target) = target else {
            return HealOutcome::NoTarget;
        };
        if self.world.combatant(target).defeated {
            return HealOutcome::TargetDefeated;
        }
        match self.world.heal_one(target, self.rng) {
            Some(card) => HealOutcome::Healed {
                card,
                card_type: self.card_type(card),
            },
            None => HealOutcome::NoCardsToHeal,
        }
    }

    fn wealth(&mut self, caster: CombatantId, card: CardId, target: Option<CombatantId>) -> TradeOutcome {
        let Some(target) = target else {
            return TradeOutcome::NoTarget;
        };
        if !self.sellers.contains(&target) {
            return TradeOutcome::NotSelling;
        }
        let Some(item) = self.world.transfer_first_item(target, caster) else {
            return TradeOutcome::NoItems;
        };
        self.world.destroy(card);
        TradeOutcome::Purchased { item }
    }

    fn steal(&mut self, caster: CombatantId, target: Option<CombatantId>) -> StealOutcome {
        let Some(target) = target else {
            return StealOutcome::NoTarget;
        };
        let thief = self.world.combatant(caster);
        if self.watched.contains(&thief.location) {
            let thief_faction = thief.faction.clone();
            let victim_faction = self.world.combatant(target).faction.clone();
            self.world
                .factions
                .set_relationship(&thief_faction, &victim_faction, Relation::Hostile);
            debug!(%caster, %target, "thief caught");
            return StealOutcome::Caught {
                now_hostile: victim_faction,
            };
        }
        match self.world.transfer_first_item(target, caster) {
            Some(item) => StealOutcome::Stolen { item },
            None => StealOutcome::NoItems,
        }
    }

    // === Poison ===

    /// Each living participant with an active poisoned tag loses one random
    /// card, never its drawn card. A tick may defeat its victim; that
    /// defeat loots nothing and credits no one.
    pub fn apply_poison_ticks(&mut self) -> Vec<TickResult> {
        let mut ticks = Vec::new();
        for idx in 0..self.participants.len() {
            let id = self.participants[idx].combatant;
            if self.world.combatant(id).defeated
                || !self.world.tags.is_active(id, TagKind::Poisoned, self.round)
            {
                continue;
            }

            let rounds_remaining = self.world.tags.rounds_remaining(id, TagKind::Poisoned, self.round);
            let excluded: FxHashSet<CardId> = self.participants[idx].drawn.into_iter().collect();
            let damage = match self.world.destroy_one_card(id, &excluded, self.rng) {
                Some(card) => TickDamage::Destroyed {
                    card,
                    defeated: self.world.combatant(id).defeated,
                },
                None => TickDamage::NoCards,
            };
            debug!(%id, rounds_remaining, "poison tick");

            ticks.push(TickResult {
                victim: Actor::from(self.world.combatant(id)),
                rounds_remaining,
                damage,
            });
        }
        ticks
    }

    // === Helpers ===

    fn participant_index(&self, id: CombatantId) -> Option<usize> {
        self.participants.iter().position(|p| p.combatant == id)
    }

    fn card_type(&self, card: CardId) -> CardType {
        self.world
            .piles()
            .get(card)
            .map(|c| c.card_type)
            .unwrap_or_else(|| panic!("{card} is not a known card"))
    }

    fn target_ref(&self, target: Option<CombatantId>) -> Option<TargetRef> {
        target
            .and_then(|id| self.world.roster().get(id))
            .map(TargetRef::from)
    }
}
