//! Player inventory and encounter rewards

use serde::{Deserialize, Serialize};

use crate::core::types::AssetHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Heals one HP tier, only usable during an encounter
    Potion,
    /// Currency granted once the potion cap is reached
    Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub kind: ItemKind,
    pub asset: AssetHandle,
}

/// Asset handles the front-end wants attached to reward items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAssets {
    pub potion: AssetHandle,
    pub coin: AssetHandle,
}

impl Default for RewardAssets {
    fn default() -> Self {
        Self {
            potion: AssetHandle::new("potion.png"),
            coin: AssetHandle::new("coin.png"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InventoryItem> {
        self.items.get(index)
    }

    pub fn count(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }

    pub fn push(&mut self, item: InventoryItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> Option<InventoryItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Grant the victory reward: a potion while under `potion_cap`, a coin
    /// afterwards. Returns the item added.
    pub fn grant_reward(&mut self, potion_cap: usize, assets: &RewardAssets) -> InventoryItem {
        let item = if self.count(ItemKind::Potion) < potion_cap {
            InventoryItem {
                kind: ItemKind::Potion,
                asset: assets.potion.clone(),
            }
        } else {
            InventoryItem {
                kind: ItemKind::Coin,
                asset: assets.coin.clone(),
            }
        };
        self.items.push(item.clone());
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewards_overflow_into_coins() {
        let assets = RewardAssets::default();
        let mut inventory = Inventory::new();

        for _ in 0..5 {
            assert_eq!(inventory.grant_reward(5, &assets).kind, ItemKind::Potion);
        }
        let sixth = inventory.grant_reward(5, &assets);
        assert_eq!(sixth.kind, ItemKind::Coin);
        assert_eq!(sixth.asset, assets.coin);
        assert_eq!(inventory.count(ItemKind::Potion), 5);
        assert_eq!(inventory.count(ItemKind::Coin), 1);
    }

    #[test]
    fn test_used_potion_frees_cap() {
        let assets = RewardAssets::default();
        let mut inventory = Inventory::new();
        for _ in 0..5 {
            inventory.grant_reward(5, &assets);
        }
        inventory.remove(0);
        assert_eq!(inventory.grant_reward(5, &assets).kind, ItemKind::Potion);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut inventory = Inventory::new();
        assert!(inventory.remove(0).is_none());
    }
}
