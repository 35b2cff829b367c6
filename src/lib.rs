//! # rust-skirmish
//!
//! A deterministic simultaneous action-resolution engine for location-scoped
//! encounters.
//!
//! Every participant in an encounter secretly draws one card per round.
//! Targets are assigned from a single snapshot, then all cards resolve in a
//! fixed, card-type-ordered sequence of phases with stealth, poison, marks,
//! blocks, faction stance changes and an item economy layered on top.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: All randomness flows through one seeded `GameRng`.
//!    The same seed and starting state reproduce identical results.
//!
//! 2. **Simultaneous**: Targets are chosen before any card resolves, so a
//!    card drawn this round cannot change who was targeted.
//!
//! 3. **Typed Outcomes**: Every resolved card yields a `ResolutionResult`
//!    whose payload is a closed union per card type. No-ops are outcomes,
//!    not errors.
//!
//! ## Modules
//!
//! - `core`: Ids, combatants, world state, RNG, rules configuration, errors
//! - `cards`: Card types, phase order and piles
//! - `piles`: Card pile manager (draw, discard, destroy, heal, refresh)
//! - `tags`: Timed status effects
//! - `factions`: Symmetric faction relationship matrix
//! - `items`: Items and the consume-on-transfer economy
//! - `effects`: Targeting, phase resolution and outcome records
//! - `goals`: Goal tracking hooks
//! - `sequence`: Encounter lifecycle and persistence snapshot

pub mod cards;
pub mod core;
pub mod effects;
pub mod factions;
pub mod goals;
pub mod items;
pub mod piles;
pub mod sequence;
pub mod tags;

// Re-export commonly used types
pub use crate::core::{
    CardId, Combatant, CombatantId, CombatantKind, EngineError, Faction, GameRng, GameRngState, ItemId,
    LocationId, RulesConfig, SequenceId, TagWindows, World,
};

pub use crate::cards::{Card, CardType, Pile};

pub use crate::piles::{CardPileManager, DestroyedCard, PileCounts};

pub use crate::tags::{Tag, TagKind, TagStore};

pub use crate::factions::{FactionMatrix, Relation};

pub use crate::items::{Item, ItemKind, ItemPayload, ItemStore};

pub use crate::effects::{
    Actor, CardOutcome, DrawnCard, EffectTag, PhaseResolver, ResolutionResult, StrikeOutcome, TargetRef,
    TargetSelector, TickResult,
};

pub use crate::goals::{GoalEvent, GoalLog, GoalTracker, NoGoals};

pub use crate::sequence::{
    EngineSnapshot, RoundLog, SequenceEnd, SequenceEngine, SequenceParticipant, SequenceSummary, StatusSnapshot,
};
