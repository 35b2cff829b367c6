//! The closed set of card types and their fixed resolution order.

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// One of the thirteen action kinds a card can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Watch,
    Sneak,
    Poison,
    Mark,
    Defend,
    Backstab,
    Execute,
    Attack,
    Heal,
    Shuffle,
    Sell,
    Wealth,
    Steal,
}

impl CardType {
    /// Resolution order within a round. Each phase resolves every drawn
    /// card of its type before the next phase starts.
    pub const PHASE_ORDER: [CardType; 13] = [
        CardType::Watch,
        CardType::Sneak,
        CardType::Poison,
        CardType::Mark,
        CardType::Defend,
        CardType::Backstab,
        CardType::Execute,
        CardType::Attack,
        CardType::Heal,
        CardType::Shuffle,
        CardType::Sell,
        CardType::Wealth,
        CardType::Steal,
    ];

    /// Lowercase name used on the wire and in scenario files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardType::Watch => "watch",
            CardType::Sneak => "sneak",
            CardType::Poison => "poison",
            CardType::Mark => "mark",
            CardType::Defend => "defend",
            CardType::Backstab => "backstab",
            CardType::Execute => "execute",
            CardType::Attack => "attack",
            CardType::Heal => "heal",
            CardType::Shuffle => "shuffle",
            CardType::Sell => "sell",
            CardType::Wealth => "wealth",
            CardType::Steal => "steal",
        }
    }

    /// Position of this type in `PHASE_ORDER`.
    #[must_use]
    pub fn phase_index(self) -> usize {
        Self::PHASE_ORDER
            .iter()
            .position(|&t| t == self)
            .unwrap_or(Self::PHASE_ORDER.len())
    }

    /// Phases whose batch of simultaneous actors is processed in a
    /// freshly randomized order each round.
    #[must_use]
    pub const fn randomizes_batch_order(self) -> bool {
        matches!(self, CardType::Backstab | CardType::Execute | CardType::Attack)
    }

    /// Cards that deal damage to their target.
    #[must_use]
    pub const fn is_strike(self) -> bool {
        self.randomizes_batch_order()
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CardType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PHASE_ORDER
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| EngineError::UnknownCardType(s.to_string()))
    }
}
