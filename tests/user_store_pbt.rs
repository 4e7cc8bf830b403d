//! Property-based tests for the user store and the seed shop.
//!
//! - Persistence round-trip: save -> load preserves every record
//! - Purchase conservation: coins spent equal unit price times seeds gained
//! - Any cart whose total fits the balance succeeds, including an empty one
//! - Rejected purchases leave the record untouched

use proptest::prelude::*;

use vocab_garden::services::shop::{self, Cart, ShopError, SEED_CATALOG, SEED_PRICE};
use vocab_garden::store::{Inventory, UserMap, UserRecord, UserStore};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_seed_key() -> impl Strategy<Value = String> {
    prop::sample::select(SEED_CATALOG.iter().map(|item| item.key).collect::<Vec<_>>())
        .prop_map(str::to_string)
}

fn arb_inventory() -> impl Strategy<Value = Inventory> {
    prop::collection::btree_map(arb_seed_key(), 1u32..50, 0..5)
}

fn arb_record() -> impl Strategy<Value = UserRecord> {
    (
        "[a-zA-Z0-9]{1,12}",
        "[a-zA-Z ]{1,16}|[가-힣]{1,6}",
        0u64..10_000,
        0u64..1_000_000,
        arb_inventory(),
    )
        .prop_map(|(password, name, coins, score, inventory)| UserRecord {
            password,
            name,
            coins,
            score,
            inventory,
        })
}

fn arb_users() -> impl Strategy<Value = UserMap> {
    prop::collection::btree_map("[a-z][a-z0-9_.@]{0,15}", arb_record(), 0..8)
}

fn arb_cart() -> impl Strategy<Value = Cart> {
    prop::collection::btree_map(arb_seed_key(), 0u32..6, 0..4)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_users_survive_save_and_load(users in arb_users()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");

        let reloaded = runtime().block_on(async {
            let store = UserStore::new(&path, users.clone());
            store.save().await.unwrap();
            UserStore::load(&path).await.snapshot().await
        });

        prop_assert_eq!(reloaded, users);
    }

    #[test]
    fn prop_purchase_conserves_value(record in arb_record(), cart in arb_cart()) {
        let mut after = record.clone();
        let seeds: u64 = cart.values().map(|qty| u64::from(*qty)).sum();

        match shop::apply_purchase(&mut after, &cart) {
            Ok(receipt) => {
                prop_assert!(seeds * SEED_PRICE <= record.coins);
                prop_assert_eq!(receipt.total_cost, seeds * SEED_PRICE);
                prop_assert_eq!(after.coins + receipt.total_cost, record.coins);
                prop_assert_eq!(&receipt.inventory, &after.inventory);

                let before_total: u64 = record.inventory.values().map(|q| u64::from(*q)).sum();
                let after_total: u64 = after.inventory.values().map(|q| u64::from(*q)).sum();
                prop_assert_eq!(after_total, before_total + seeds);
            }
            Err(ShopError::InsufficientFunds { required, available }) => {
                prop_assert!(available < required);
                prop_assert_eq!(required, seeds * SEED_PRICE);
                prop_assert_eq!(after, record);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
