//! Per-encounter participant records.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, CombatantId};

/// One combatant's round state inside a sequence.
///
/// Created when the sequence starts, cleared between rounds, dropped
/// when the sequence ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceParticipant {
    pub combatant: CombatantId,
    /// Card committed this round. Protected from damage until the next
    /// draw.
    pub drawn: Option<CardId>,
    pub target: Option<CombatantId>,
    /// Stacking damage absorption, reset every round.
    pub block_count: u32,
    pub resolved: bool,
}

impl SequenceParticipant {
    /// A participant with nothing drawn.
    #[must_use]
    pub fn new(combatant: CombatantId) -> Self {
        Self {
            combatant,
            drawn: None,
            target: None,
            block_count: 0,
            resolved: false,
        }
    }

    /// Set the drawn card and target.
    #[must_use]
    pub fn with_card(mut self, card: CardId, target: Option<CombatantId>) -> Self {
        self.drawn = Some(card);
        self.target = target;
        self
    }

    /// Set the block counter.
    #[must_use]
    pub fn with_blocks(mut self, blocks: u32) -> Self {
        self.block_count = blocks;
        self
    }

    /// Clear the per-round fields.
    pub fn reset(&mut self) {
        self.drawn = None;
        self.target = None;
        self.block_count = 0;
        self.resolved = false;
    }
}
