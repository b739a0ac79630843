//! Actor inventories.
//!
//! An [`Inventory`] is the sole owner of the items an actor carries. The
//! item's `held_by` field is a back-reference kept in sync here; the
//! inventory never hands out a second owner.

use std::collections::BTreeMap;

use covert_types::{ActorId, ItemId};
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::item::Item;

/// Items carried by one actor, with at most one equipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<ItemId, Item>,
    equipped: Option<ItemId>,
}

impl Inventory {
    /// Empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `item` on behalf of `owner`.
    pub fn add(&mut self, owner: ActorId, mut item: Item) -> ItemId {
        item.held_by = Some(owner);
        item.position = None;
        let id = item.id;
        self.items.insert(id, item);
        id
    }

    /// Give up an item. Unequips it if it was equipped.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let mut item = self.items.remove(&id)?;
        item.held_by = None;
        if self.equipped == Some(id) {
            self.equipped = None;
        }
        Some(item)
    }

    /// Equip a carried item.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ItemNotHeld`] if the item is not in this
    /// inventory.
    pub fn equip(&mut self, owner: ActorId, id: ItemId) -> Result<(), AgentError> {
        if !self.items.contains_key(&id) {
            return Err(AgentError::ItemNotHeld {
                item: id,
                actor: owner,
            });
        }
        self.equipped = Some(id);
        Ok(())
    }

    /// Put the equipped item away.
    pub const fn unequip(&mut self) {
        self.equipped = None;
    }

    /// The equipped item, if any.
    pub fn equipped(&self) -> Option<&Item> {
        self.equipped.and_then(|id| self.items.get(&id))
    }

    /// Look up a carried item.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Whether the actor openly holds an illegal item.
    pub fn shows_illegal_item(&self) -> bool {
        self.equipped().is_some_and(|item| item.illegal && !item.destroyed)
    }

    /// Carried items.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Number of carried items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is carried.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use covert_types::ItemType;

    use super::*;

    #[test]
    fn add_sets_back_reference() {
        let owner = ActorId::new();
        let mut inv = Inventory::new();
        let id = inv.add(owner, Item::new(ItemType::Coin, "Coin"));
        assert_eq!(inv.get(id).and_then(|i| i.held_by), Some(owner));
        let removed = inv.remove(id);
        assert_eq!(removed.and_then(|i| i.held_by), None);
        assert!(inv.is_empty());
    }

    #[test]
    fn only_equipped_illegal_items_show() {
        let owner = ActorId::new();
        let mut inv = Inventory::new();
        let pistol = inv.add(owner, Item::new(ItemType::Pistol, "Pistol"));
        assert!(!inv.shows_illegal_item());
        assert!(inv.equip(owner, pistol).is_ok());
        assert!(inv.shows_illegal_item());
        inv.unequip();
        assert!(!inv.shows_illegal_item());
    }

    #[test]
    fn equipping_foreign_item_fails() {
        let owner = ActorId::new();
        let mut inv = Inventory::new();
        let result = inv.equip(owner, ItemId::new());
        assert!(matches!(result, Err(AgentError::ItemNotHeld { .. })));
    }

    #[test]
    fn removing_equipped_item_unequips() {
        let owner = ActorId::new();
        let mut inv = Inventory::new();
        let knife = inv.add(owner, Item::new(ItemType::Knife, "Knife"));
        assert!(inv.equip(owner, knife).is_ok());
        assert!(inv.remove(knife).is_some());
        assert!(inv.equipped().is_none());
    }
}
