//! Items and the item economy.
//!
//! ## Key Types
//!
//! - `Item`: A consumable possession with a typed payload
//! - `ItemStore`: Ownership of items that have not changed hands yet
//! - `economy`: Transfer-and-consume operations used by Wealth, Steal
//!   and killing blows

pub mod economy;
pub mod store;

pub use economy::{consume_item, loot_all, transfer_first, transfer_item};
pub use store::{Item, ItemKind, ItemPayload, ItemStore};
