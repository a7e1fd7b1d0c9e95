//! Property Tests
//!
//! Random operation sequences against a small grid registry. After every
//! step the effective views must partition the items and no container may
//! be promised more than it holds; every commit must succeed and land the
//! effective view exactly.

use crate::common::*;
use proptest::prelude::*;
use relocate::{LocatorConfig, SpatialLocator};

const CONTAINERS: usize = 3;
const CAPACITY: usize = 2;
const ITEMS: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Stage { item: usize, target: usize },
    Batch { items: Vec<usize>, target: usize },
    Cancel { item: usize },
    CancelAll,
    Commit,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..ITEMS, 0..=CONTAINERS).prop_map(|(item, target)| Op::Stage { item, target }),
        2 => (prop::collection::vec(0..ITEMS, 1..4), 0..=CONTAINERS)
            .prop_map(|(items, target)| Op::Batch { items, target }),
        2 => (0..ITEMS).prop_map(|item| Op::Cancel { item }),
        1 => Just(Op::CancelAll),
        2 => Just(Op::Commit),
    ]
}

fn item(i: usize) -> ItemId {
    id(&format!("i{}", i))
}

/// Committed occupancy plus everything pending in
fn promised(ledger: &StagingLedger, container: &Container) -> usize {
    container.occupancy() + ledger.pending_into(&Location::Container(container.id.clone()))
}

fn moves(ledger: &StagingLedger) -> Vec<(ItemId, Location, Location)> {
    ledger
        .iter()
        .map(|m| (m.item_id.clone(), m.from.clone(), m.to.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_sessions_keep_invariants(ops in prop::collection::vec(op(), 1..40)) {
        let mut registry = grid(CONTAINERS, CAPACITY, ITEMS);
        let mut ledger = StagingLedger::new();
        let mut selection = Selection::new();
        let targets = grid_targets(CONTAINERS);

        for op in ops {
            match op {
                Op::Stage { item: i, target } => {
                    let _ = ledger.stage(&registry, &item(i), &targets[target]);
                }
                Op::Batch { items, target } => {
                    let batch: Vec<ItemId> = items.into_iter().map(item).collect();
                    let report = ledger.stage_batch(&registry, &batch, &targets[target]);
                    prop_assert_eq!(report.accepted.len() + report.rejected.len(), batch.len());
                }
                Op::Cancel { item: i } => {
                    ledger.cancel(&item(i));
                }
                Op::CancelAll => ledger.cancel_all(),
                Op::Commit => {
                    let expected: Vec<Vec<String>> = targets
                        .iter()
                        .map(|t| ids(&ledger.effective_view(&registry, t)))
                        .collect();
                    let before = registry.version();
                    let staged = ledger.len();

                    let report = commit(&mut ledger, &mut registry, &mut selection);
                    prop_assert!(report.is_ok(), "commit failed: {:?}", report);

                    let fresh = StagingLedger::new();
                    let actual: Vec<Vec<String>> = targets
                        .iter()
                        .map(|t| ids(&fresh.effective_view(&registry, t)))
                        .collect();
                    prop_assert_eq!(actual, expected);
                    prop_assert!(ledger.is_empty());
                    let bump = if staged == 0 { 0 } else { 1 };
                    prop_assert_eq!(registry.version(), before + bump);
                }
            }

            assert_partition(&registry, &ledger);
            for container in registry.containers() {
                prop_assert!(promised(&ledger, container) <= container.capacity);
            }
            for mv in ledger.iter() {
                prop_assert_ne!(&mv.from, &mv.to);
                prop_assert_eq!(registry.location_of(&mv.item_id), Some(&mv.from));
            }
        }
    }

    #[test]
    fn restaging_is_idempotent(
        setup in prop::collection::vec((0..ITEMS, 0..=CONTAINERS), 0..10),
        i in 0..ITEMS,
        target in 0..=CONTAINERS,
    ) {
        let registry = grid(CONTAINERS, CAPACITY, ITEMS);
        let mut ledger = StagingLedger::new();
        let targets = grid_targets(CONTAINERS);
        for (item_idx, t) in setup {
            let _ = ledger.stage(&registry, &item(item_idx), &targets[t]);
        }

        let first = ledger.stage(&registry, &item(i), &targets[target]);
        let after_first = moves(&ledger);
        let second = ledger.stage(&registry, &item(i), &targets[target]);

        prop_assert_eq!(moves(&ledger), after_first);
        if first.is_ok() {
            prop_assert!(second.is_ok());
        }
    }

    #[test]
    fn return_to_origin_clears_pending(
        i in 0..ITEMS,
        hops in prop::collection::vec(0..=CONTAINERS, 1..5),
    ) {
        let registry = grid(CONTAINERS, CAPACITY, ITEMS);
        let mut ledger = StagingLedger::new();
        let targets = grid_targets(CONTAINERS);

        for hop in hops {
            let _ = ledger.stage(&registry, &item(i), &targets[hop]);
        }
        let origin = registry.location_of(&item(i)).cloned().unwrap();
        ledger.stage(&registry, &item(i), &origin).unwrap();

        prop_assert!(ledger.get(&item(i)).is_none());
        prop_assert!(ledger.is_empty());
    }

    #[test]
    fn subsection_interior_resolves_to_parent(
        dx in 0.001f64..39.999,
        dy in 0.001f64..39.999,
        tolerance in 0.0f64..50.0,
    ) {
        let mut locator = SpatialLocator::new(LocatorConfig { container_tolerance: tolerance });
        locator.register_regions([
            RegionRef::container("rival", "rival", Rect::new(0.0, 0.0, 200.0, 200.0)),
            RegionRef::subsection("sub", "parent", "chairs", Rect::new(50.0, 50.0, 40.0, 40.0)),
        ]);
        let hit = locator.locate(Point::new(50.0 + dx, 50.0 + dy)).unwrap();
        prop_assert_eq!(hit.id.as_str(), "sub");
        prop_assert_eq!(hit.target(), at("parent"));
    }

    #[test]
    fn container_margin_is_honoured(
        gap in 0.0f64..30.0,
        tolerance in 0.0f64..30.0,
    ) {
        let mut locator = SpatialLocator::new(LocatorConfig { container_tolerance: tolerance });
        locator.register_regions([
            RegionRef::container("zone", "zone", Rect::new(0.0, 0.0, 100.0, 100.0)),
        ]);
        let x = 100.0 + gap;
        let hit = locator.resolve(Point::new(x, 50.0));
        if x <= 100.0 + tolerance {
            prop_assert_eq!(hit, Some(at("zone")));
        } else {
            prop_assert_eq!(hit, None);
        }
    }
}
