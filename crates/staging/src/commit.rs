//! Atomic commit of the staging ledger
//!
//! Applies every pending move to the registry as one logical step.
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. validate_ledger()  - every move still matches canonical state, no overflow
//! 2. IF violation: log, return error, touch nothing
//! 3. registry.apply_moves()   (COMMIT POINT)
//!      detach all, attach all in ledger order, check capacity,
//!      bump version; on any failure the registry is unchanged
//! 4. clear ledger and selection
//! ```
//!
//! Because all detaches happen before any attach, the end state does not
//! depend on the order moves were staged in.

use crate::ledger::StagingLedger;
use crate::selection::Selection;
use crate::validation::validate_ledger;
use chrono::{DateTime, Utc};
use relocate_core::{CommitError, ContainerId, EntityRegistry, ItemId, Location};
use serde::Serialize;
use std::collections::BTreeMap;

/// One applied move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// Item moved
    pub item_id: ItemId,
    /// Previous location
    pub from: Location,
    /// New location
    pub to: Location,
}

/// Result of a successful commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    /// Registry version after the commit (unchanged for an empty ledger)
    pub version: u64,
    /// Moves applied, in ledger order
    pub moved: Vec<MoveRecord>,
    /// Post-commit item count of every container a move touched
    pub occupancy: BTreeMap<ContainerId, usize>,
    /// When the commit completed
    pub committed_at: DateTime<Utc>,
}

impl CommitReport {
    /// Number of moves applied
    pub fn len(&self) -> usize {
        self.moved.len()
    }

    /// True if the ledger was empty
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }

    /// Ids of moved items
    pub fn moved_ids(&self) -> Vec<ItemId> {
        self.moved.iter().map(|m| m.item_id.clone()).collect()
    }
}

/// Apply the whole ledger to the registry, all-or-nothing
///
/// On success the ledger and the selection are cleared. On failure
/// registry, ledger, and selection are exactly as they were.
///
/// # Errors
/// `CommitError::InvariantViolation` if any pending move no longer matches
/// canonical state. This indicates a bug, not a user error.
pub fn commit(
    ledger: &mut StagingLedger,
    registry: &mut EntityRegistry,
    selection: &mut Selection,
) -> Result<CommitReport, CommitError> {
    if ledger.is_empty() {
        selection.clear();
        return Ok(CommitReport {
            version: registry.version(),
            moved: Vec::new(),
            occupancy: BTreeMap::new(),
            committed_at: Utc::now(),
        });
    }

    if let Err(violation) = validate_ledger(registry, ledger) {
        tracing::warn!(
            pending = ledger.len(),
            error = %violation,
            "commit aborted, registry left untouched"
        );
        return Err(violation.into());
    }

    let moved: Vec<MoveRecord> = ledger
        .iter()
        .map(|mv| MoveRecord {
            item_id: mv.item_id.clone(),
            from: mv.from.clone(),
            to: mv.to.clone(),
        })
        .collect();

    let applied = registry.apply_moves(moved.iter().map(|r| (&r.item_id, &r.from, &r.to)));
    let version = match applied {
        Ok(version) => version,
        Err(violation) => {
            tracing::error!(error = %violation, "commit apply failed after validation");
            return Err(violation.into());
        }
    };

    let occupancy: BTreeMap<ContainerId, usize> = moved
        .iter()
        .flat_map(|record| [record.from.container_id(), record.to.container_id()])
        .flatten()
        .filter_map(|cid| {
            registry
                .container(cid)
                .map(|c| (cid.clone(), c.occupancy()))
        })
        .collect();

    ledger.cancel_all();
    selection.clear();

    tracing::info!(version, moved = moved.len(), "staged moves committed");

    Ok(CommitReport {
        version,
        moved,
        occupancy,
        committed_at: Utc::now(),
    })
}
