//! Card effects: targeting, round resolution and outcome records.
//!
//! - `TargetSelector`: Picks each drawn card's target from a snapshot
//! - `PhaseResolver`: Resolves a round in fixed phase order
//! - `ResolutionResult`: One record per resolved card
//!
//! ## Phase order
//!
//! Watch, Sneak, Poison, Mark, Defend, Backstab, Execute, Attack, Heal,
//! Shuffle, Sell, Wealth, Steal. Later phases see the effects of earlier
//! ones: a Defend block is visible to Attack, and a Watch counters a Sneak
//! or Steal at the same location. Only the Backstab, Execute and Attack
//! batches are processed in random order.

mod outcome;
mod resolver;
mod targeting;

pub use outcome::{
    Actor, BlockUse, CardOutcome, DefendOutcome, DrawnCard, EffectTag, HealOutcome, ResolutionResult, SneakOutcome,
    StatusOutcome, StealOutcome, StrikeOutcome, TargetRef, TickDamage, TickResult, TradeOutcome,
};
pub use resolver::PhaseResolver;
pub use targeting::{TargetClass, TargetSelector};
