//! Timed status effects.
//!
//! A tag has a value and the encounter round it was applied in. It is
//! authoritative only while `current_round - round_applied` falls inside
//! its kind's window; `TagStore::clear_expired` deletes the rest once per
//! round.

pub mod store;

pub use store::{Tag, TagKind, TagStore};
