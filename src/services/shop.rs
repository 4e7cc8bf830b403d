use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::store::{Inventory, StoreError, UserRecord, UserStore};

/// Every seed costs the same.
pub const SEED_PRICE: u64 = 5;

pub type Cart = BTreeMap<String, u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedItem {
    pub key: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub growth_days: u32,
}

pub const SEED_CATALOG: &[SeedItem] = &[
    SeedItem {
        key: "grape",
        name: "Grape seed",
        emoji: "🍇",
        growth_days: 4,
    },
    SeedItem {
        key: "strawberry",
        name: "Strawberry seed",
        emoji: "🍓",
        growth_days: 3,
    },
    SeedItem {
        key: "mango",
        name: "Mango seed",
        emoji: "🥭",
        growth_days: 6,
    },
    SeedItem {
        key: "apple",
        name: "Apple seed",
        emoji: "🍎",
        growth_days: 5,
    },
];

pub fn find_seed(key: &str) -> Option<&'static SeedItem> {
    SEED_CATALOG.iter().find(|item| item.key == key)
}

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("not enough coins: need {required}, have {available}")]
    InsufficientFunds { required: u64, available: u64 },
    #[error("inventory slot for {0} is full")]
    InventoryFull(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub total_cost: u64,
    pub coins: u64,
    pub inventory: Inventory,
}

/// Prices the cart, rejecting unknown keys. Zero quantities are ignored, so an
/// empty cart costs nothing.
pub fn cart_total(cart: &Cart) -> Result<u64, ShopError> {
    let mut quantity: u64 = 0;
    for (key, qty) in cart.iter().filter(|(_, qty)| **qty > 0) {
        if find_seed(key).is_none() {
            return Err(ShopError::UnknownItem(key.clone()));
        }
        quantity += u64::from(*qty);
    }
    Ok(quantity.saturating_mul(SEED_PRICE))
}

/// All or nothing: the record is untouched unless every check passes.
pub fn apply_purchase(record: &mut UserRecord, cart: &Cart) -> Result<PurchaseReceipt, ShopError> {
    let total_cost = cart_total(cart)?;
    if record.coins < total_cost {
        return Err(ShopError::InsufficientFunds {
            required: total_cost,
            available: record.coins,
        });
    }

    let mut inventory = record.inventory.clone();
    for (key, qty) in cart.iter().filter(|(_, qty)| **qty > 0) {
        let slot = inventory.entry(key.clone()).or_insert(0);
        *slot = slot
            .checked_add(*qty)
            .ok_or_else(|| ShopError::InventoryFull(key.clone()))?;
    }

    record.coins -= total_cost;
    record.inventory = inventory;

    Ok(PurchaseReceipt {
        total_cost,
        coins: record.coins,
        inventory: record.inventory.clone(),
    })
}

pub async fn purchase(
    users: &UserStore,
    user_id: &str,
    cart: &Cart,
) -> Result<PurchaseReceipt, ShopError> {
    let receipt = users
        .update(user_id, |record| apply_purchase(record, cart))
        .await?;
    tracing::info!(user_id, total_cost = receipt.total_cost, coins = receipt.coins, "purchase completed");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart(entries: &[(&str, u32)]) -> Cart {
        entries
            .iter()
            .map(|(key, qty)| (key.to_string(), *qty))
            .collect()
    }

    fn user_with_coins(coins: u64) -> UserRecord {
        let mut record = UserRecord::new("pw", "Kim");
        record.coins = coins;
        record
    }

    #[test]
    fn test_purchase_two_grapes_and_an_apple() {
        let mut record = user_with_coins(20);
        record.inventory.insert("grape".to_string(), 1);

        let receipt = apply_purchase(&mut record, &cart(&[("grape", 2), ("apple", 1)])).unwrap();
        assert_eq!(receipt.total_cost, 15);
        assert_eq!(receipt.coins, 5);
        assert_eq!(record.inventory["grape"], 3);
        assert_eq!(record.inventory["apple"], 1);
    }

    #[test]
    fn test_exact_funds_are_enough() {
        let mut record = user_with_coins(10);
        let receipt = apply_purchase(&mut record, &cart(&[("strawberry", 2)])).unwrap();
        assert_eq!(receipt.coins, 0);
    }

    #[test]
    fn test_insufficient_funds_leaves_record_unchanged() {
        let mut record = user_with_coins(4);
        let before = record.clone();
        let err = apply_purchase(&mut record, &cart(&[("mango", 1)])).unwrap_err();
        assert!(matches!(
            err,
            ShopError::InsufficientFunds {
                required: 5,
                available: 4
            }
        ));
        assert_eq!(record, before);
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let mut record = user_with_coins(100);
        let err = apply_purchase(&mut record, &cart(&[("apple", 1), ("durian", 1)])).unwrap_err();
        assert!(matches!(err, ShopError::UnknownItem(key) if key == "durian"));
        assert_eq!(record.coins, 100);
        assert!(record.inventory.is_empty());
    }

    #[test]
    fn test_zero_quantities_are_ignored() {
        let mut record = user_with_coins(5);
        apply_purchase(&mut record, &cart(&[("apple", 1), ("grape", 0)])).unwrap();
        assert!(!record.inventory.contains_key("grape"));
    }

    #[test]
    fn test_empty_cart_succeeds_without_changes() {
        assert_eq!(cart_total(&Cart::new()).unwrap(), 0);
        assert_eq!(cart_total(&cart(&[("apple", 0), ("durian", 0)])).unwrap(), 0);

        let mut record = user_with_coins(20);
        record.inventory.insert("mango".to_string(), 2);
        let before = record.clone();

        let receipt =
            apply_purchase(&mut record, &cart(&[("apple", 0), ("grape", 0), ("mango", 0)]))
                .unwrap();
        assert_eq!(receipt.total_cost, 0);
        assert_eq!(receipt.coins, 20);
        assert_eq!(record, before);
    }

    #[test]
    fn test_full_inventory_slot_rejects_purchase() {
        let mut record = user_with_coins(50);
        record.inventory.insert("grape".to_string(), u32::MAX);
        let before = record.clone();

        let err = apply_purchase(&mut record, &cart(&[("apple", 1), ("grape", 1)])).unwrap_err();
        assert!(matches!(err, ShopError::InventoryFull(key) if key == "grape"));
        assert_eq!(record, before);
    }

    #[test]
    fn test_catalog_matches_shop_keys() {
        let keys: Vec<&str> = SEED_CATALOG.iter().map(|item| item.key).collect();
        assert_eq!(keys, ["grape", "strawberry", "mango", "apple"]);
    }

    #[test]
    fn test_catalog_keys_are_unique() {
        for (i, item) in SEED_CATALOG.iter().enumerate() {
            assert!(SEED_CATALOG[i + 1..].iter().all(|other| other.key != item.key));
            assert_eq!(find_seed(item.key), Some(item));
        }
    }

    #[tokio::test]
    async fn test_purchase_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let mut users = crate::store::UserMap::new();
        users.insert("kim".to_string(), user_with_coins(12));
        let store = UserStore::new(&path, users);

        let receipt = purchase(&store, "kim", &cart(&[("mango", 2)])).await.unwrap();
        assert_eq!(receipt.coins, 2);

        let reloaded = UserStore::load(&path).await;
        let kim = reloaded.get("kim").await.unwrap();
        assert_eq!(kim.coins, 2);
        assert_eq!(kim.inventory["mango"], 2);
    }

    #[tokio::test]
    async fn test_purchase_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path().join("users.json"), crate::store::UserMap::new());
        let err = purchase(&store, "ghost", &cart(&[("apple", 1)])).await.unwrap_err();
        assert!(matches!(err, ShopError::Store(StoreError::NotFound(_))));
    }
}
