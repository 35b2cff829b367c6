//! Card system: the closed set of card types and per-card records.
//!
//! ## Key Types
//!
//! - `CardType`: One of the thirteen action kinds, with the fixed
//!   phase order used during resolution
//! - `Pile`: Active, discard, destroyed or inactive
//! - `Card`: A single card owned by a combatant

pub mod instance;
pub mod kind;

pub use instance::{Card, Pile};
pub use kind::CardType;
