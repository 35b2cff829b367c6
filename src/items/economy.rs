//! Item transfer and consumption.
//!
//! Items are never stored by their new owner. A transfer removes the item
//! from the giver and immediately applies its effect to the recipient.

use tracing::debug;

use super::store::{Item, ItemPayload, ItemStore};
use crate::core::entity::{CardId, CombatantId, ItemId};
use crate::piles::CardPileManager;

/// Apply an item's effect to `recipient`.
///
/// Returns the card created by a `new_action` item. `information` and
/// `faction` items have no effect.
pub fn consume_item(item: &Item, recipient: CombatantId, piles: &mut CardPileManager) -> Option<CardId> {
    match &item.payload {
        ItemPayload::NewAction { card_type } => {
            let card = piles.add_to_inactive(recipient, *card_type);
            debug!(%recipient, item = %item.name, %card_type, "item consumed: new action");
            Some(card)
        }
        ItemPayload::Information | ItemPayload::Faction => None,
    }
}

/// Move one specific item to `recipient` and consume it.
pub fn transfer_item(
    items: &mut ItemStore,
    piles: &mut CardPileManager,
    item: ItemId,
    recipient: CombatantId,
) -> Option<Item> {
    let item = items.take(item)?;
    consume_item(&item, recipient, piles);
    Some(item)
}

/// Move the giver's oldest item to `recipient` and consume it.
pub fn transfer_first(
    items: &mut ItemStore,
    piles: &mut CardPileManager,
    giver: CombatantId,
    recipient: CombatantId,
) -> Option<Item> {
    let id = items.first_of(giver)?;
    transfer_item(items, piles, id, recipient)
}

/// Move every item held by `victim` to `killer`, consuming each.
pub fn loot_all(
    items: &mut ItemStore,
    piles: &mut CardPileManager,
    victim: CombatantId,
    killer: CombatantId,
) -> Vec<Item> {
    let ids: Vec<ItemId> = items.items_of(victim).iter().map(|i| i.id).collect();
    ids.into_iter()
        .filter_map(|id| transfer_item(items, piles, id, killer))
        .collect()
}
