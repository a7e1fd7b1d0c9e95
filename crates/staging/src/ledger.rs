//! Staging ledger: tentative moves awaiting commit
//!
//! The ledger buffers *pending moves* (item → new location) without touching
//! the registry. It is to relocation what a write set is to a transaction:
//! reads go through the ledger to see the world as if every staged move had
//! already been applied (the effective view), and `commit` drains it.
//!
//! # Staging rules
//!
//! 1. A move's origin is always the item's canonical location, never the
//!    target of an earlier pending move. Re-targeting keeps the origin.
//! 2. Staging an item back to its origin deletes its pending move
//!    (cancel-by-return).
//! 3. Staging an item to the target it is already pending into only
//!    refreshes the timestamp. No capacity check, so repeats are idempotent.
//! 4. Anything else is gated by the capacity validator; a rejection leaves
//!    the ledger unchanged.
//!
//! At most one pending move exists per item.

use crate::validation::check_capacity;
use chrono::{DateTime, Utc};
use relocate_core::{EntityRegistry, Item, ItemId, Location, StageError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tentative, uncommitted move of one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    /// Item being moved
    pub item_id: ItemId,
    /// Canonical location at staging time
    pub from: Location,
    /// Target location
    pub to: Location,
    /// When the move was last staged, re-targeted, or refreshed
    pub staged_at: DateTime<Utc>,
    /// Ledger-wide counter value at the last touch (higher = more recent)
    pub sequence: u64,
}

/// What a successful `stage` call did to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    /// A new pending move was inserted
    Staged,
    /// An existing pending move now points at a different target
    Retargeted {
        /// Target before this call
        previous: Location,
    },
    /// Same item, same target: only the timestamp changed
    Refreshed,
    /// Target was the item's origin; its pending move was removed
    Cancelled,
    /// Target was the item's origin and nothing was pending
    Unchanged,
}

/// Per-item results of a batch staging call
///
/// Batches allow partial success: accepted items stay staged even when later
/// items are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Items whose request succeeded, with what happened
    pub accepted: Vec<(ItemId, StageOutcome)>,
    /// Items whose request was refused, with the reason
    pub rejected: Vec<(ItemId, StageError)>,
}

impl BatchReport {
    /// Ids of accepted items, in request order
    pub fn accepted_ids(&self) -> Vec<ItemId> {
        self.accepted.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Ids of rejected items, in request order
    pub fn rejected_ids(&self) -> Vec<ItemId> {
        self.rejected.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Ids of items whose pending move was cancelled by returning them home
    pub fn cancelled_ids(&self) -> Vec<ItemId> {
        self.accepted
            .iter()
            .filter(|(_, outcome)| *outcome == StageOutcome::Cancelled)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// True if every item was accepted
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Compact status for displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSummary {
    /// Number of pending moves
    pub count: usize,
    /// Most recently touched pending move
    pub last_move: Option<PendingMove>,
}

/// An item as seen through the ledger
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveItem<'a> {
    /// The canonical item record
    pub item: &'a Item,
    /// True if the item appears here only because of a pending move
    pub is_pending: bool,
}

/// Buffer of pending moves
///
/// Moves are kept in ledger order: the slot a move received when first
/// inserted. Re-targeting keeps the slot, so effective views stay stable.
#[derive(Debug, Clone, Default)]
pub struct StagingLedger {
    /// Pending moves by slot
    moves: BTreeMap<u64, PendingMove>,
    /// Item → slot
    by_item: FxHashMap<ItemId, u64>,
    next_slot: u64,
    next_sequence: u64,
}

impl StagingLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    // === Staging ===

    /// Stage a move of `item` to `to`
    ///
    /// See the module docs for the rules.
    ///
    /// # Errors
    /// - `StageError::UnknownItem` if the item is not in the registry
    /// - `StageError::UnknownContainer` if `to` names a missing container
    /// - `StageError::CapacityExceeded` if `to` has no effective room left
    pub fn stage(
        &mut self,
        registry: &EntityRegistry,
        item: &ItemId,
        to: &Location,
    ) -> Result<StageOutcome, StageError> {
        let origin = registry
            .location_of(item)
            .ok_or_else(|| StageError::UnknownItem(item.clone()))?;
        if let Location::Container(cid) = to {
            if registry.container(cid).is_none() {
                return Err(StageError::UnknownContainer(cid.clone()));
            }
        }

        if to == origin {
            return Ok(match self.remove(item) {
                Some(_) => {
                    tracing::debug!(item = %item, "pending move cancelled by return to origin");
                    StageOutcome::Cancelled
                }
                None => StageOutcome::Unchanged,
            });
        }

        let existing = self.by_item.get(item).copied();
        if let Some(slot) = existing {
            let same_target = self.moves.get(&slot).map(|mv| mv.to == *to).unwrap_or(false);
            if same_target {
                self.touch(slot);
                return Ok(StageOutcome::Refreshed);
            }
        }

        check_capacity(registry, self, to)?;

        let sequence = self.bump_sequence();
        match existing.and_then(|slot| self.moves.get_mut(&slot)) {
            Some(mv) => {
                let previous = std::mem::replace(&mut mv.to, to.clone());
                mv.staged_at = Utc::now();
                mv.sequence = sequence;
                tracing::debug!(
                    item = %item,
                    from = %previous,
                    to = %to,
                    "pending move retargeted"
                );
                Ok(StageOutcome::Retargeted { previous })
            }
            None => {
                let slot = self.next_slot;
                self.next_slot += 1;
                self.moves.insert(
                    slot,
                    PendingMove {
                        item_id: item.clone(),
                        from: origin.clone(),
                        to: to.clone(),
                        staged_at: Utc::now(),
                        sequence,
                    },
                );
                self.by_item.insert(item.clone(), slot);
                tracing::debug!(item = %item, from = %origin, to = %to, "move staged");
                Ok(StageOutcome::Staged)
            }
        }
    }

    /// Stage every item in `items` toward `to`, each from its own origin
    ///
    /// Items are processed in order and checked independently: an item that
    /// fails is skipped and reported, earlier successes stay staged.
    pub fn stage_batch<'a, I>(
        &mut self,
        registry: &EntityRegistry,
        items: I,
        to: &Location,
    ) -> BatchReport
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        let mut report = BatchReport::default();
        for item in items {
            match self.stage(registry, item, to) {
                Ok(outcome) => report.accepted.push((item.clone(), outcome)),
                Err(err) => {
                    if report.rejected.is_empty() {
                        tracing::warn!(
                            target_location = %to,
                            item = %item,
                            error = %err,
                            "batch item rejected, continuing with the rest"
                        );
                    }
                    report.rejected.push((item.clone(), err));
                }
            }
        }
        report
    }

    /// Remove the pending move for one item, if any
    pub fn cancel(&mut self, item: &ItemId) -> Option<PendingMove> {
        self.remove(item)
    }

    /// Discard every pending move
    ///
    /// Canonical state is never touched by the ledger, so this is a full
    /// rollback of the staging session.
    pub fn cancel_all(&mut self) {
        self.moves.clear();
        self.by_item.clear();
    }

    // === Effective views ===

    /// Contents of `location` as if every pending move were committed
    ///
    /// Committed items that are not pending out come first (arrival order),
    /// followed by items pending in (ledger order) tagged `is_pending`.
    /// An unknown container yields an empty view.
    pub fn effective_view<'r>(
        &self,
        registry: &'r EntityRegistry,
        location: &Location,
    ) -> Vec<EffectiveItem<'r>> {
        let committed = registry.committed_at(location).unwrap_or(&[]);
        let mut view = Vec::with_capacity(committed.len());

        for id in committed {
            let pending_out = self
                .get(id)
                .map(|mv| mv.from == *location)
                .unwrap_or(false);
            if pending_out {
                continue;
            }
            if let Some(item) = registry.item(id) {
                view.push(EffectiveItem {
                    item,
                    is_pending: false,
                });
            }
        }

        for mv in self.iter().filter(|mv| mv.to == *location) {
            if let Some(item) = registry.item(&mv.item_id) {
                view.push(EffectiveItem {
                    item,
                    is_pending: true,
                });
            }
        }

        view
    }

    /// The unassigned pool as if every pending move were committed
    pub fn effective_unassigned<'r>(&self, registry: &'r EntityRegistry) -> Vec<EffectiveItem<'r>> {
        self.effective_view(registry, &Location::Unassigned)
    }

    // === Introspection ===

    /// Pending move for an item
    pub fn get(&self, item: &ItemId) -> Option<&PendingMove> {
        self.by_item.get(item).and_then(|slot| self.moves.get(slot))
    }

    /// Pending moves in ledger order
    pub fn iter(&self) -> impl Iterator<Item = &PendingMove> {
        self.moves.values()
    }

    /// Number of pending moves targeting `location`
    pub fn pending_into(&self, location: &Location) -> usize {
        self.moves.values().filter(|mv| mv.to == *location).count()
    }

    /// Number of pending moves leaving `location`
    pub fn pending_out_of(&self, location: &Location) -> usize {
        self.moves.values().filter(|mv| mv.from == *location).count()
    }

    /// Number of pending moves
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Count and most recent move, for status displays
    pub fn pending_summary(&self) -> PendingSummary {
        PendingSummary {
            count: self.moves.len(),
            last_move: self.moves.values().max_by_key(|mv| mv.sequence).cloned(),
        }
    }

    // === Internals ===

    fn remove(&mut self, item: &ItemId) -> Option<PendingMove> {
        let slot = self.by_item.remove(item)?;
        self.moves.remove(&slot)
    }

    fn touch(&mut self, slot: u64) {
        let sequence = self.bump_sequence();
        if let Some(mv) = self.moves.get_mut(&slot) {
            mv.staged_at = Utc::now();
            mv.sequence = sequence;
        }
    }

    fn bump_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }
}
