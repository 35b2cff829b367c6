//! Card records and the piles they move between.

use serde::{Deserialize, Serialize};

use super::kind::CardType;
use crate::core::entity::{CardId, CombatantId};

/// Where a card currently sits.
///
/// `Active` is the draw pile. `Inactive` holds cards gained from items
/// that have not entered play yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pile {
    Active,
    Discard,
    Destroyed,
    Inactive,
}

impl Pile {
    /// All piles, for iteration.
    pub const ALL: [Pile; 4] = [Pile::Active, Pile::Discard, Pile::Destroyed, Pile::Inactive];
}

impl std::fmt::Display for Pile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pile::Active => "active",
            Pile::Discard => "discard",
            Pile::Destroyed => "destroyed",
            Pile::Inactive => "inactive",
        };
        f.write_str(name)
    }
}

/// One action card. Cards are never deleted, only relocated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub owner: CombatantId,
    pub card_type: CardType,
    pub pile: Pile,
    /// Position within the pile. Lower is closer to the top of `Active`.
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pile_display() {
        let names: Vec<_> = Pile::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["active", "discard", "destroyed", "inactive"]);
    }

    #[test]
    fn test_pile_serde() {
        assert_eq!(serde_json::to_string(&Pile::Destroyed).unwrap(), "\"destroyed\"");
    }
}
