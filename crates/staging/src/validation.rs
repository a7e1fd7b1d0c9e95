//! Capacity validation for staging and commit
//!
//! Two checks live here:
//! - `check_capacity`: the gate consulted before every staging request.
//!   Occupancy counts committed items plus every pending move into the
//!   target. Pending moves *out* of the target are deliberately not
//!   subtracted: space freed by a staged move only becomes available once
//!   that move is committed.
//! - `validate_ledger`: the pre-commit pass that proves applying the whole
//!   ledger cannot corrupt canonical state.

use crate::ledger::StagingLedger;
use relocate_core::{ContainerId, EntityRegistry, InvariantViolation, Location, StageError};
use std::collections::BTreeMap;

/// Committed items plus pending moves into `container`
///
/// Returns `None` for an unknown container.
pub fn effective_occupancy(
    registry: &EntityRegistry,
    ledger: &StagingLedger,
    container: &ContainerId,
) -> Option<usize> {
    let committed = registry.container(container)?.items.len();
    let target = Location::Container(container.clone());
    Some(committed + ledger.pending_into(&target))
}

/// Decide whether one more item may be staged into `to`
///
/// The unassigned pool always accepts.
///
/// # Errors
/// - `StageError::UnknownContainer` if `to` names a missing container
/// - `StageError::CapacityExceeded` if effective occupancy already equals capacity
pub fn check_capacity(
    registry: &EntityRegistry,
    ledger: &StagingLedger,
    to: &Location,
) -> Result<(), StageError> {
    let cid = match to {
        Location::Unassigned => return Ok(()),
        Location::Container(cid) => cid,
    };
    let container = registry
        .container(cid)
        .ok_or_else(|| StageError::UnknownContainer(cid.clone()))?;
    let occupancy = container.items.len() + ledger.pending_into(to);
    if occupancy < container.capacity {
        Ok(())
    } else {
        Err(StageError::CapacityExceeded {
            container: cid.clone(),
            capacity: container.capacity,
            occupancy,
        })
    }
}

/// Boolean form of `check_capacity`
pub fn can_accept(registry: &EntityRegistry, ledger: &StagingLedger, to: &Location) -> bool {
    check_capacity(registry, ledger, to).is_ok()
}

/// Validate that the whole ledger can be applied to `registry`
///
/// Checks, per pending move:
/// 1. the item exists
/// 2. the item is still at the origin recorded in the move
/// 3. both ends of the move exist
///
/// then checks that no container ends up over capacity once every move is
/// applied.
///
/// # Errors
/// Returns the first `InvariantViolation` found.
pub fn validate_ledger(
    registry: &EntityRegistry,
    ledger: &StagingLedger,
) -> Result<(), InvariantViolation> {
    // Net change per container
    let mut delta: BTreeMap<&ContainerId, (usize, usize)> = BTreeMap::new();

    for mv in ledger.iter() {
        let actual = registry
            .location_of(&mv.item_id)
            .ok_or_else(|| InvariantViolation::UnknownItem(mv.item_id.clone()))?;

        for end in [&mv.from, &mv.to] {
            if let Location::Container(cid) = end {
                if registry.container(cid).is_none() {
                    return Err(InvariantViolation::UnknownContainer {
                        item: mv.item_id.clone(),
                        container: cid.clone(),
                    });
                }
            }
        }

        if *actual != mv.from {
            return Err(InvariantViolation::OriginMismatch {
                item: mv.item_id.clone(),
                expected: mv.from.clone(),
                actual: actual.clone(),
            });
        }

        if let Location::Container(cid) = &mv.from {
            delta.entry(cid).or_default().0 += 1;
        }
        if let Location::Container(cid) = &mv.to {
            delta.entry(cid).or_default().1 += 1;
        }
    }

    for (cid, (outgoing, incoming)) in delta {
        // Existence was checked above
        let Some(container) = registry.container(cid) else {
            continue;
        };
        let listed = container.items.len();
        let Some(resulting) = (listed + incoming).checked_sub(outgoing) else {
            return Err(InvariantViolation::ListingMismatch {
                container: cid.clone(),
                listed,
                leaving: outgoing,
            });
        };
        if resulting > container.capacity {
            return Err(InvariantViolation::CapacityOverflow {
                container: cid.clone(),
                capacity: container.capacity,
                resulting,
            });
        }
    }

    Ok(())
}
