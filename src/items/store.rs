//! Item ownership.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::entity::{CombatantId, ItemId};
use crate::core::EngineError;

/// The three item kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    NewAction,
    Information,
    Faction,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ItemKind::NewAction => "new_action",
            ItemKind::Information => "information",
            ItemKind::Faction => "faction",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ItemKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_action" => Ok(ItemKind::NewAction),
            "information" => Ok(ItemKind::Information),
            "faction" => Ok(ItemKind::Faction),
            other => Err(EngineError::UnknownItemType(other.to_string())),
        }
    }
}

/// What an item does when it is acquired.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPayload {
    /// Grants a new card, placed in the recipient's inactive pile.
    NewAction { card_type: CardType },
    /// Placeholder; consuming it does nothing.
    Information,
    /// Placeholder; consuming it does nothing.
    Faction,
}

impl ItemPayload {
    /// The kind of this payload.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemPayload::NewAction { .. } => ItemKind::NewAction,
            ItemPayload::Information => ItemKind::Information,
            ItemPayload::Faction => ItemKind::Faction,
        }
    }
}

/// A consumable possession.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub owner: CombatantId,
    pub name: String,
    pub payload: ItemPayload,
}

/// Items keyed by id. Items leave the store when they change hands:
/// the recipient consumes them on the spot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemStore {
    items: FxHashMap<ItemId, Item>,
    next_id: u32,
}

impl ItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give a new item to `owner`.
    pub fn give(&mut self, owner: CombatantId, name: impl Into<String>, payload: ItemPayload) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(
            id,
            Item {
                id,
                owner,
                name: name.into(),
                payload,
            },
        );
        id
    }

    /// Look up an item.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Items held by `owner`, oldest first.
    #[must_use]
    pub fn items_of(&self, owner: CombatantId) -> Vec<&Item> {
        let mut items: Vec<_> = self.items.values().filter(|i| i.owner == owner).collect();
        items.sort_by_key(|i| i.id);
        items
    }

    /// The oldest item held by `owner`.
    #[must_use]
    pub fn first_of(&self, owner: CombatantId) -> Option<ItemId> {
        self.items_of(owner).first().map(|i| i.id)
    }

    /// Number of items held by `owner`.
    #[must_use]
    pub fn count_of(&self, owner: CombatantId) -> usize {
        self.items.values().filter(|i| i.owner == owner).count()
    }

    /// Check if `owner` holds anything.
    #[must_use]
    pub fn has_items(&self, owner: CombatantId) -> bool {
        self.items.values().any(|i| i.owner == owner)
    }

    /// Remove an item from the store.
    pub fn take(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    /// Total items in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: CombatantId = CombatantId(0);
    const B: CombatantId = CombatantId(1);

    #[test]
    fn test_give_and_query() {
        let mut store = ItemStore::new();
        let potion = store.give(A, "Potion", ItemPayload::Information);
        let scroll = store.give(A, "Scroll", ItemPayload::NewAction { card_type: CardType::Heal });

        assert_eq!(store.count_of(A), 2);
        assert!(store.has_items(A));
        assert!(!store.has_items(B));
        assert_eq!(store.first_of(A), Some(potion));
        assert_eq!(store.get(scroll).unwrap().payload.kind(), ItemKind::NewAction);
    }

    #[test]
    fn test_take_removes() {
        let mut store = ItemStore::new();
        let id = store.give(B, "Map", ItemPayload::Information);

        let item = store.take(id).unwrap();
        assert_eq!(item.name, "Map");
        assert!(store.take(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("new_action".parse::<ItemKind>().unwrap(), ItemKind::NewAction);
        assert_eq!(ItemKind::Faction.to_string(), "faction");
        assert!(matches!("gold".parse::<ItemKind>(), Err(EngineError::UnknownItemType(_))));
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = ItemPayload::NewAction { card_type: CardType::Steal };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["new_action"]["card_type"], "steal");
        assert_eq!(serde_json::to_value(ItemPayload::Information).unwrap(), "information");
    }
}
