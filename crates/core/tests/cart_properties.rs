//! Behavior-lock tests for the cart store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;
use shieldsync_core::{
    CartError, CartSnapshot, CartStore, Catalog, NewCartItem, NullNotifier, Price, ProductId,
    RecordingNotifier,
};

const IDS: &[&str] = &["basic-av", "pro-av", "enterprise-av", "cloud-av", ""];

#[derive(Debug, Clone)]
enum Op {
    Add { id: usize, rupees: u32 },
    Remove { id: usize },
    Update { id: usize, quantity: i64 },
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    let id = 0..IDS.len();
    prop_oneof![
        4 => (id.clone(), 0u32..5_000).prop_map(|(id, rupees)| Op::Add { id, rupees }),
        2 => id.clone().prop_map(|id| Op::Remove { id }),
        3 => (id, -3i64..20).prop_map(|(id, quantity)| Op::Update { id, quantity }),
        1 => Just(Op::Clear),
    ]
}

fn apply(store: &CartStore, op: &Op) -> Result<(), CartError> {
    match *op {
        Op::Add { id, rupees } => {
            store.add_item(NewCartItem::new(IDS[id], format!("Plan {id}"), Price::whole(rupees)));
            Ok(())
        }
        Op::Remove { id } => {
            store.remove_item(&ProductId::from(IDS[id]));
            Ok(())
        }
        Op::Update { id, quantity } => store.update_quantity(&ProductId::from(IDS[id]), quantity),
        Op::Clear => {
            store.clear_cart();
            Ok(())
        }
    }
}

fn expected_total(snapshot: &CartSnapshot) -> Price {
    snapshot
        .lines()
        .iter()
        .map(|line| line.unit_price().times(line.quantity()))
        .fold(Price::ZERO, Price::saturating_add)
}

proptest! {
    #[test]
    fn total_matches_lines_after_every_operation(ops in prop::collection::vec(op(), 0..60)) {
        let store = CartStore::new(NullNotifier);

        for op in &ops {
            let before = store.snapshot();
            let result = apply(&store, op);
            let after = store.snapshot();

            prop_assert_eq!(after.total(), expected_total(&after));
            prop_assert_eq!(store.total(), after.total());
            prop_assert!(after.lines().iter().all(|line| line.quantity() >= 1));

            let mut ids: Vec<_> = after.lines().iter().map(|line| line.id().clone()).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), after.len());

            if result.is_err() {
                prop_assert_eq!(&after, &before);
            }
        }
    }

    #[test]
    fn repeated_adds_count_calls_and_keep_first_values(
        first_price in 0u32..10_000,
        later in prop::collection::vec(0u32..10_000, 0..30),
    ) {
        let store = CartStore::new(NullNotifier);
        let id = ProductId::from("basic-av");

        store.add_item(NewCartItem::new(id.clone(), "Basic", Price::whole(first_price)));
        for (n, rupees) in later.iter().enumerate() {
            store.add_item(NewCartItem::new(id.clone(), format!("Basic v{n}"), Price::whole(*rupees)));
        }

        let line = store.line(&id).unwrap();
        prop_assert_eq!(line.quantity() as usize, later.len() + 1);
        prop_assert_eq!(line.name(), "Basic");
        prop_assert_eq!(line.unit_price(), Price::whole(first_price));
    }

    #[test]
    fn zero_quantity_update_matches_remove(ops in prop::collection::vec(op(), 0..30), id in 0..IDS.len()) {
        let updated = CartStore::new(NullNotifier);
        let removed = CartStore::new(NullNotifier);
        for op in &ops {
            let _ = apply(&updated, op);
            let _ = apply(&removed, op);
        }

        let target = ProductId::from(IDS[id]);
        updated.update_quantity(&target, 0).unwrap();
        removed.remove_item(&target);

        let updated = updated.snapshot();
        let removed = removed.snapshot();
        prop_assert_eq!(updated.lines(), removed.lines());
    }

    #[test]
    fn removing_absent_product_keeps_lines(ops in prop::collection::vec(op(), 0..30)) {
        let store = CartStore::new(NullNotifier);
        for op in &ops {
            let _ = apply(&store, op);
        }
        let before = store.snapshot();

        store.remove_item(&ProductId::from("not-in-any-cart"));

        let after = store.snapshot();
        prop_assert_eq!(after.lines(), before.lines());
    }

    #[test]
    fn clear_always_empties(ops in prop::collection::vec(op(), 0..30)) {
        let store = CartStore::new(NullNotifier);
        for op in &ops {
            let _ = apply(&store, op);
        }

        store.clear_cart();

        let snapshot = store.snapshot();
        prop_assert!(snapshot.is_empty());
        prop_assert_eq!(snapshot.total(), Price::ZERO);
        prop_assert_eq!(snapshot.item_count(), 0);
    }
}

#[test]
fn basic_plan_added_twice() {
    let store = CartStore::new(NullNotifier);

    store.add_item(NewCartItem::new("basic-av", "Basic", Price::whole(14)));
    store.add_item(NewCartItem::new("basic-av", "Basic", Price::whole(14)));

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.lines()[0].quantity(), 2);
    assert_eq!(snapshot.total(), Price::whole(28));
}

#[test]
fn pro_plan_quantity_set_to_five() {
    let store = CartStore::new(NullNotifier);

    store.add_item(NewCartItem::new("pro-av", "Pro", Price::whole(9)));
    store.update_quantity(&ProductId::from("pro-av"), 5).unwrap();

    let line = store.line(&ProductId::from("pro-av")).unwrap();
    assert_eq!(line.quantity(), 5);
    assert_eq!(store.total(), Price::whole(45));
}

#[test]
fn update_of_nonexistent_product_changes_nothing() {
    let store = CartStore::new(NullNotifier);

    store
        .update_quantity(&ProductId::from("nonexistent"), 3)
        .unwrap();

    assert!(store.is_empty());
    assert_eq!(store.total(), Price::ZERO);
}

#[test]
fn negative_quantity_is_rejected() {
    let store = CartStore::new(NullNotifier);
    store.add_item(NewCartItem::new("basic-av", "Basic", Price::whole(14)));
    let before = store.snapshot();

    let result = store.update_quantity(&ProductId::from("basic-av"), -1);

    assert_eq!(result, Err(CartError::InvalidQuantity { quantity: -1 }));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn purchase_page_flow_over_builtin_catalog() {
    let recorder = Arc::new(RecordingNotifier::new());
    let store = CartStore::new(Arc::clone(&recorder));
    let catalog = Catalog::shieldsync();

    for id in ["basic-av", "cloud-av", "basic-av"] {
        let product = catalog.get(&ProductId::from(id)).unwrap();
        store.add_item(product.to_cart_item());
    }
    store.remove_item(&ProductId::from("cloud-av"));

    assert_eq!(store.total(), Price::whole(28));
    assert_eq!(
        recorder.messages(),
        vec![
            "SHIELDSYNC Basic Antivirus added to cart",
            "SHIELDSYNC Cloud Secure added to cart",
            "Added another SHIELDSYNC Basic Antivirus to cart",
            "Item removed from cart",
        ]
    );
}
