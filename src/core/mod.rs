//! Core engine types: ids, combatants, world state, RNG, configuration,
//! errors.
//!
//! Everything here is shared by the stores and the resolver. Games supply
//! data through `World::spawn` and `RulesConfig` rather than modifying the
//! core.

pub mod combatant;
pub mod config;
pub mod entity;
pub mod error;
pub mod rng;
pub mod state;

pub use combatant::{Combatant, CombatantKind, Roster};
pub use config::{RulesConfig, TagWindows};
pub use entity::{CardId, CombatantId, Faction, ItemId, LocationId, SequenceId};
pub use error::EngineError;
pub use rng::{GameRng, GameRngState};
pub use state::World;
