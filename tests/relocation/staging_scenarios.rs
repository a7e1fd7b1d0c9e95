//! Staging Scenario Tests
//!
//! The Office/Warehouse walk-through plus the staging rules it exercises:
//! - Capacity counts pending moves
//! - Pending-out moves free nothing until commit
//! - Returning to origin cancels
//! - Re-staging is idempotent

use crate::common::*;

// ============================================================================
// Walk-through
// ============================================================================

#[test]
fn office_warehouse_walkthrough() {
    init_tracing();
    let mut registry = office_warehouse();
    let mut ledger = StagingLedger::new();
    let mut selection = Selection::new();

    assert_eq!(ledger.stage(&registry, &id("F"), &at("office")), Ok(StageOutcome::Staged));
    assert_eq!(ledger.stage(&registry, &id("G"), &at("office")), Ok(StageOutcome::Staged));

    let full = ledger.stage(&registry, &id("H"), &at("office")).unwrap_err();
    assert!(full.is_capacity());

    assert_eq!(ids(&ledger.effective_view(&registry, &at("office"))), vec!["F", "G"]);
    assert_eq!(pending_ids(&ledger.effective_view(&registry, &at("office"))), vec!["F", "G"]);
    assert_eq!(ids(&ledger.effective_unassigned(&registry)), vec!["H"]);
    assert_partition(&registry, &ledger);

    // F goes back where it came from
    assert_eq!(
        ledger.stage(&registry, &id("F"), &Location::Unassigned),
        Ok(StageOutcome::Cancelled)
    );
    assert_eq!(ledger.len(), 1);
    assert_eq!(ids(&ledger.effective_unassigned(&registry)), vec!["F", "H"]);

    // The freed slot takes H
    assert_eq!(ledger.stage(&registry, &id("H"), &at("office")), Ok(StageOutcome::Staged));

    let report = commit(&mut ledger, &mut registry, &mut selection).unwrap();
    assert_eq!(report.version, 1);
    assert_eq!(report.moved_ids(), vec![id("G"), id("H")]);
    assert!(ledger.is_empty());

    let office = registry.container(&cid("office")).unwrap();
    assert_eq!(office.items, vec![id("G"), id("H")]);
    assert_eq!(registry.unassigned(), &[id("F")]);
    assert_eq!(registry.location_of(&id("G")), Some(&at("office")));
    assert_within_capacity(&registry);
}

// ============================================================================
// Capacity
// ============================================================================

#[test]
fn pending_out_does_not_free_capacity() {
    let mut registry = EntityRegistry::builder()
        .container(Container::new("small", "Small", "closet", 1))
        .container(Container::new("big", "Big", "hall", 10))
        .item(Item::new("x", "X", "misc").at(at("small")))
        .item(Item::new("y", "Y", "misc"))
        .build()
        .unwrap();
    let mut ledger = StagingLedger::new();

    ledger.stage(&registry, &id("x"), &at("big")).unwrap();
    assert!(ids(&ledger.effective_view(&registry, &at("small"))).is_empty());

    // Still full until x actually leaves
    let err = ledger.stage(&registry, &id("y"), &at("small")).unwrap_err();
    assert_eq!(
        err,
        StageError::CapacityExceeded {
            container: cid("small"),
            capacity: 1,
            occupancy: 1,
        }
    );

    commit(&mut ledger, &mut registry, &mut Selection::new()).unwrap();
    assert_eq!(ledger.stage(&registry, &id("y"), &at("small")), Ok(StageOutcome::Staged));
}

#[test]
fn zero_capacity_container_accepts_nothing() {
    let registry = EntityRegistry::builder()
        .container(Container::new("sealed", "Sealed", "vault", 0))
        .item(Item::new("x", "X", "misc"))
        .build()
        .unwrap();
    let mut ledger = StagingLedger::new();
    assert!(ledger
        .stage(&registry, &id("x"), &at("sealed"))
        .unwrap_err()
        .is_capacity());
}

#[test]
fn unassigned_has_no_capacity_limit() {
    let mut builder = EntityRegistry::builder().container(Container::new("c0", "c0", "room", 50));
    for i in 0..50 {
        let name = format!("i{}", i);
        builder = builder.item(Item::new(name.as_str(), name.as_str(), "misc").at(at("c0")));
    }
    let full = builder.build().unwrap();

    let mut ledger = StagingLedger::new();
    let all: Vec<ItemId> = full.items().map(|i| i.id.clone()).collect();
    let report = ledger.stage_batch(&full, &all, &Location::Unassigned);
    assert!(report.is_complete());
    assert_eq!(ids(&ledger.effective_unassigned(&full)).len(), 50);
}

// ============================================================================
// Idempotence and retargeting
// ============================================================================

#[test]
fn restaging_same_target_is_idempotent() {
    let registry = office_warehouse();
    let mut ledger = StagingLedger::new();

    ledger.stage(&registry, &id("F"), &at("office")).unwrap();
    ledger.stage(&registry, &id("G"), &at("office")).unwrap();

    // Office is effectively full, but F is already headed there
    assert_eq!(
        ledger.stage(&registry, &id("F"), &at("office")),
        Ok(StageOutcome::Refreshed)
    );
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.pending_summary().last_move.unwrap().item_id, id("F"));
}

#[test]
fn retarget_keeps_origin_and_order() {
    let registry = office_warehouse();
    let mut ledger = StagingLedger::new();

    ledger.stage(&registry, &id("A"), &at("office")).unwrap();
    ledger.stage(&registry, &id("F"), &at("office")).unwrap();

    assert_eq!(
        ledger.stage(&registry, &id("F"), &at("warehouse")),
        Err(StageError::CapacityExceeded {
            container: cid("warehouse"),
            capacity: 5,
            occupancy: 5,
        })
    );

    // A leaves the office queue for the pool
    assert_eq!(
        ledger.stage(&registry, &id("A"), &Location::Unassigned),
        Ok(StageOutcome::Retargeted {
            previous: at("office")
        })
    );
    let moves: Vec<_> = ledger.iter().map(|m| m.item_id.to_string()).collect();
    assert_eq!(moves, vec!["A", "F"]);
    assert_eq!(ledger.get(&id("A")).unwrap().from, at("warehouse"));
    assert_partition(&registry, &ledger);
}

#[test]
fn unknown_ids_are_rejected() {
    let registry = office_warehouse();
    let mut ledger = StagingLedger::new();
    assert_eq!(
        ledger.stage(&registry, &id("nope"), &at("office")),
        Err(StageError::UnknownItem(id("nope")))
    );
    assert_eq!(
        ledger.stage(&registry, &id("F"), &at("attic")),
        Err(StageError::UnknownContainer(cid("attic")))
    );
    assert!(ledger.is_empty());
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn batch_mixes_origins_and_reports_partial_success() {
    let registry = office_warehouse();
    let mut ledger = StagingLedger::new();

    let report = ledger.stage_batch(&registry, &[id("A"), id("F"), id("B")], &at("office"));
    assert_eq!(report.accepted_ids(), vec![id("A"), id("F")]);
    assert_eq!(report.rejected_ids(), vec![id("B")]);
    assert!(!report.is_complete());

    assert_eq!(ledger.get(&id("A")).unwrap().from, at("warehouse"));
    assert_eq!(ledger.get(&id("F")).unwrap().from, Location::Unassigned);
    assert_eq!(ids(&ledger.effective_view(&registry, &at("warehouse"))), vec!["B", "C", "D", "E"]);
}

#[test]
fn cancel_all_restores_canonical_views() {
    let registry = office_warehouse();
    let mut ledger = StagingLedger::new();
    ledger.stage_batch(&registry, &[id("A"), id("F")], &at("office"));

    ledger.cancel_all();
    assert!(ledger.is_empty());
    assert!(ids(&ledger.effective_view(&registry, &at("office"))).is_empty());
    assert_eq!(ids(&ledger.effective_unassigned(&registry)), vec!["F", "G", "H"]);
    assert_eq!(ledger.pending_summary().count, 0);
    assert!(ledger.pending_summary().last_move.is_none());
}

#[test]
fn batch_home_reports_cancellations() {
    let registry = office_warehouse();
    let mut ledger = StagingLedger::new();
    ledger.stage_batch(&registry, &[id("F"), id("G")], &at("office"));

    // H was never staged, so sending it home is a no-op
    let report = ledger.stage_batch(&registry, &[id("G"), id("H")], &Location::Unassigned);
    assert_eq!(report.cancelled_ids(), vec![id("G")]);
    assert_eq!(
        report.accepted,
        vec![
            (id("G"), StageOutcome::Cancelled),
            (id("H"), StageOutcome::Unchanged),
        ]
    );
    assert_eq!(ledger.len(), 1);
}
