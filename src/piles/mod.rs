//! Card piles for each combatant.
//!
//! Every combatant's cards are split across four piles:
//! active (the draw pile), discard, destroyed and inactive.
//! Health is active + discard; a combatant with no health is defeated.
//!
//! ## Key Types
//!
//! - `CardPileManager`: Card ownership, pile membership and ordering
//! - `PileCounts`: Per-pile counts for one combatant
//! - `DestroyedCard`: A card removed by damage and its originating pile

pub mod manager;

pub use manager::{CardPileManager, DestroyedCard, PileCounts};
