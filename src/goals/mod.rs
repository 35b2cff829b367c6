//! Goal tracking hooks.
//!
//! Scoring and achievements live outside the engine. The engine reports
//! the events goals care about through the `GoalTracker` trait, and only
//! for player-controlled combatants, since goals belong to players.
//!
//! ## Implementations
//!
//! - `NoGoals`: Ignores every event
//! - `GoalLog`: Records events in the order they fired

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::{Combatant, CombatantId, Faction};

/// Receiver for goal-relevant gameplay events.
pub trait GoalTracker {
    /// A player drew and committed a card this round.
    fn track_card_play(&mut self, entity: &Combatant, card: CardType);

    /// A player dealt the damage that defeated a combatant of
    /// `victim_faction`.
    fn track_killing_blow(&mut self, killer: &Combatant, victim_faction: &Faction);

    /// A player's Defend landed on someone other than themselves.
    fn track_block_for_ally(&mut self, entity: &Combatant);
}

/// Tracker that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGoals;

impl GoalTracker for NoGoals {
    fn track_card_play(&mut self, _entity: &Combatant, _card: CardType) {}

    fn track_killing_blow(&mut self, _killer: &Combatant, _victim_faction: &Faction) {}

    fn track_block_for_ally(&mut self, _entity: &Combatant) {}
}

/// A recorded goal event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GoalEvent {
    CardPlay { entity: CombatantId, card: CardType },
    KillingBlow { killer: CombatantId, victim_faction: Faction },
    BlockForAlly { entity: CombatantId },
}

/// Tracker that keeps every event in firing order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalLog {
    pub events: Vec<GoalEvent>,
}

impl GoalLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Killing blows recorded for `killer`.
    pub fn killing_blows(&self, killer: CombatantId) -> impl Iterator<Item = &Faction> {
        self.events.iter().filter_map(move |e| match e {
            GoalEvent::KillingBlow { killer: k, victim_faction } if *k == killer => Some(victim_faction),
            _ => None,
        })
    }

    /// Number of times `entity` played `card`.
    #[must_use]
    pub fn card_plays(&self, entity: CombatantId, card: CardType) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GoalEvent::CardPlay { entity: en, card: c } if *en == entity && *c == card))
            .count()
    }
}

impl GoalTracker for GoalLog {
    fn track_card_play(&mut self, entity: &Combatant, card: CardType) {
        self.events.push(GoalEvent::CardPlay { entity: entity.id, card });
    }

    fn track_killing_blow(&mut self, killer: &Combatant, victim_faction: &Faction) {
        self.events.push(GoalEvent::KillingBlow {
            killer: killer.id,
            victim_faction: victim_faction.clone(),
        });
    }

    fn track_block_for_ally(&mut self, entity: &Combatant) {
        self.events.push(GoalEvent::BlockForAlly { entity: entity.id });
    }
}

impl<T: GoalTracker + ?Sized> GoalTracker for &mut T {
    fn track_card_play(&mut self, entity: &Combatant, card: CardType) {
        (**self).track_card_play(entity, card);
    }

    fn track_killing_blow(&mut self, killer: &Combatant, victim_faction: &Faction) {
        (**self).track_killing_blow(killer, victim_faction);
    }

    fn track_block_for_ally(&mut self, entity: &Combatant) {
        (**self).track_block_for_ally(entity);
    }
}
