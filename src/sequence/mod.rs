//! Encounter lifecycle.
//!
//! - `SequenceEngine`: Creates encounters, drives rounds, checks for the
//!   end and reports survivors
//! - `SequenceParticipant`: Per-round record of one combatant
//! - `EngineSnapshot`: Serialized world and RNG state
//!
//! An encounter ends when a participating faction is wiped out
//! (`SequenceEnd::Eliminated`) or when no living participant has a card
//! left to draw (`SequenceEnd::Standoff`).

mod engine;
mod participant;

pub use engine::{
    EngineSnapshot, RoundLog, RoundPhase, Sequence, SequenceEnd, SequenceEngine, SequenceSummary, StatusSnapshot,
};
pub use participant::SequenceParticipant;
