//! Relocation session: the engine's public face
//!
//! A session owns everything one staging session needs: the canonical
//! registry, the ledger, the selection, the region snapshot, the in-flight
//! drag, the post-commit highlight, and the workflow phase. Nothing is
//! global; collaborators hold the session and call into it.
//!
//! # Lifecycle
//!
//! 1. **OPEN**: `RelocationSession::open(registry, config)`
//! 2. **INTERACT**: register regions, drag/drop or `stage`, read effective views
//! 3. **COMMIT**: `commit()` applies every staged move at once (repeatable)
//! 4. **TEARDOWN**: `teardown()` discards anything still staged and hands the
//!    registry back
//!
//! All operations are synchronous and run to completion; `&mut self`
//! guarantees staging and commit never interleave.

use crate::config::RelocationConfig;
use crate::gesture::{DragGesture, DropOutcome};
use crate::locator::{RegionRef, SpatialLocator};
use crate::workflow::{WorkflowEvent, WorkflowState};
use relocate_core::{
    CommitError, ConfigError, ContainerId, EntityRegistry, ItemId, Location, Point, StageError,
    WorkflowError,
};
use relocate_staging::{
    commit, CommitReport, EffectiveItem, PendingSummary, Selection, StageOutcome, StagingLedger,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Unique identifier for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random SessionId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a staging request was refused, as surfaced to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Target is full (counting pending moves)
    Capacity,
    /// Item is not in the registry
    UnknownItem,
    /// Target container is not in the registry
    UnknownContainer,
}

impl From<&StageError> for RejectReason {
    fn from(err: &StageError) -> Self {
        match err {
            StageError::CapacityExceeded { .. } => RejectReason::Capacity,
            StageError::UnknownItem(_) => RejectReason::UnknownItem,
            StageError::UnknownContainer(_) => RejectReason::UnknownContainer,
        }
    }
}

/// Response to a single staging request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResponse {
    /// True if the ledger accepted the request
    pub accepted: bool,
    /// Why the request was refused
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
    /// What the ledger did, when accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<StageOutcome>,
}

impl From<Result<StageOutcome, StageError>> for StageResponse {
    fn from(result: Result<StageOutcome, StageError>) -> Self {
        match result {
            Ok(outcome) => StageResponse {
                accepted: true,
                reason: None,
                outcome: Some(outcome),
            },
            Err(err) => StageResponse {
                accepted: false,
                reason: Some(RejectReason::from(&err)),
                outcome: None,
            },
        }
    }
}

/// Response to a batch staging request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResponse {
    /// Items staged (or cancelled by return), in request order
    pub accepted_ids: Vec<ItemId>,
    /// Items refused, in request order
    pub rejected_ids: Vec<ItemId>,
}

/// Items moved by the last commit, shown until `until`
#[derive(Debug, Clone)]
struct Highlight {
    items: Vec<ItemId>,
    until: Instant,
}

/// One staging session over a registry
#[derive(Debug)]
pub struct RelocationSession {
    id: SessionId,
    config: RelocationConfig,
    registry: EntityRegistry,
    ledger: StagingLedger,
    selection: Selection,
    locator: SpatialLocator,
    drag: Option<DragGesture>,
    highlight: Option<Highlight>,
    workflow: WorkflowState,
}

impl RelocationSession {
    /// Open a session over `registry`
    ///
    /// # Errors
    /// Returns an error if `config` holds out-of-range values.
    pub fn open(registry: EntityRegistry, config: RelocationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = Self {
            id: SessionId::new(),
            locator: SpatialLocator::new(config.locator),
            config,
            registry,
            ledger: StagingLedger::new(),
            selection: Selection::new(),
            drag: None,
            highlight: None,
            workflow: WorkflowState::Idle,
        };
        tracing::info!(
            session = %session.id,
            items = session.registry.item_count(),
            "relocation session opened"
        );
        Ok(session)
    }

    /// Open a session with the default configuration
    pub fn with_defaults(registry: EntityRegistry) -> Self {
        Self {
            id: SessionId::new(),
            locator: SpatialLocator::new(RelocationConfig::default().locator),
            config: RelocationConfig::default(),
            registry,
            ledger: StagingLedger::new(),
            selection: Selection::new(),
            drag: None,
            highlight: None,
            workflow: WorkflowState::Idle,
        }
    }

    /// End the session, discarding anything still staged
    ///
    /// Returns the canonical registry, including every commit made during
    /// the session.
    pub fn teardown(self) -> EntityRegistry {
        if !self.ledger.is_empty() {
            tracing::info!(
                session = %self.id,
                discarded = self.ledger.len(),
                "session closed with uncommitted moves"
            );
        } else {
            tracing::info!(session = %self.id, "relocation session closed");
        }
        self.registry
    }

    // === Accessors ===

    /// Session identity
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Active configuration
    pub fn config(&self) -> &RelocationConfig {
        &self.config
    }

    /// Canonical (committed) state
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Pending moves
    pub fn ledger(&self) -> &StagingLedger {
        &self.ledger
    }

    /// Current region snapshot
    pub fn locator(&self) -> &SpatialLocator {
        &self.locator
    }

    // === Regions ===

    /// Replace the region snapshot (call on every layout pass)
    pub fn register_regions<I>(&mut self, regions: I)
    where
        I: IntoIterator<Item = RegionRef>,
    {
        self.locator.register_regions(regions);
    }

    // === Staging ===

    /// Stage one item toward `target`
    pub fn stage(&mut self, item: &ItemId, target: &Location) -> StageResponse {
        let result = self.ledger.stage(&self.registry, item, target);
        if let Err(err) = &result {
            tracing::debug!(session = %self.id, item = %item, error = %err, "staging refused");
        }
        result.into()
    }

    /// Stage several items toward `target`, each from its own origin
    ///
    /// Partial success is allowed: refused items are reported, accepted
    /// items stay staged.
    pub fn stage_batch(&mut self, items: &[ItemId], target: &Location) -> BatchResponse {
        let report = self.ledger.stage_batch(&self.registry, items, target);
        BatchResponse {
            accepted_ids: report.accepted_ids(),
            rejected_ids: report.rejected_ids(),
        }
    }

    /// Discard every staged move
    pub fn cancel_all(&mut self) {
        tracing::debug!(session = %self.id, discarded = self.ledger.len(), "staging cancelled");
        self.ledger.cancel_all();
    }

    /// Apply every staged move to the registry at once
    ///
    /// Clears the ledger and the selection on success and highlights the
    /// moved items for the configured duration.
    ///
    /// # Errors
    /// `CommitError::InvariantViolation` if the ledger no longer matches the
    /// registry; nothing is changed in that case.
    pub fn commit(&mut self) -> Result<CommitReport, CommitError> {
        let report = commit(&mut self.ledger, &mut self.registry, &mut self.selection)?;
        if !report.is_empty() {
            self.highlight = Some(Highlight {
                items: report.moved_ids(),
                until: Instant::now() + self.config.highlight_duration(),
            });
        }
        Ok(report)
    }

    // === Effective views ===

    /// Contents of a container as if every staged move were committed
    pub fn effective_view(&self, container: &ContainerId) -> Vec<EffectiveItem<'_>> {
        self.ledger
            .effective_view(&self.registry, &Location::Container(container.clone()))
    }

    /// The unassigned pool as if every staged move were committed
    pub fn effective_unassigned(&self) -> Vec<EffectiveItem<'_>> {
        self.ledger.effective_unassigned(&self.registry)
    }

    /// Count and most recent move, for status displays
    pub fn pending_summary(&self) -> PendingSummary {
        self.ledger.pending_summary()
    }

    // === Selection ===

    /// Flip an item's selection, returning true if it is now selected
    pub fn toggle_selection(&mut self, item: &ItemId) -> bool {
        self.selection.toggle(item)
    }

    /// Add every given item to the selection
    pub fn select_all(&mut self, items: &[ItemId]) {
        self.selection.select_all(items);
    }

    /// Deselect everything
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Membership test
    pub fn is_selected(&self, item: &ItemId) -> bool {
        self.selection.is_selected(item)
    }

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // === Drag and drop ===

    /// Start dragging `item`
    ///
    /// If the item is still selected when dropped, the drop moves the whole
    /// selection. Returns false (and starts nothing) for an unknown item. A drag
    /// already in progress is abandoned.
    pub fn begin_drag(&mut self, item: &ItemId) -> bool {
        if self.registry.item(item).is_none() {
            return false;
        }
        self.drag = Some(DragGesture::new(item.clone()));
        true
    }

    /// Intermediate pointer sample: updates hover feedback only
    pub fn drag_moved(&mut self, point: Point) -> Option<&Location> {
        let target = self.locator.resolve(point);
        let drag = self.drag.as_mut()?;
        drag.record(point, target);
        drag.active_target.as_ref()
    }

    /// Target currently under the dragged item, if any
    pub fn active_target(&self) -> Option<&Location> {
        self.drag.as_ref().and_then(|d| d.active_target.as_ref())
    }

    /// True while a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Terminal pointer sample: resolve the target and stage
    pub fn drop_at(&mut self, point: Point) -> DropOutcome {
        let Some(drag) = self.drag.take() else {
            return DropOutcome::NoDrag;
        };
        let Some(target) = self.locator.resolve(point) else {
            tracing::debug!(session = %self.id, item = %drag.item, "drop outside every region");
            return DropOutcome::NoTarget;
        };

        // Selection may change mid-drag; what counts is the state at drop
        if self.selection.is_selected(&drag.item) {
            let report = self
                .ledger
                .stage_batch(&self.registry, self.selection.iter(), &target);
            DropOutcome::Batch(report)
        } else {
            let result = self.ledger.stage(&self.registry, &drag.item, &target);
            DropOutcome::Single {
                item: drag.item,
                result,
            }
        }
    }

    /// Abandon the drag without staging anything
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    // === Highlight ===

    /// Items moved by the last commit, while the highlight is live
    pub fn highlighted(&self) -> &[ItemId] {
        self.highlighted_at(Instant::now())
    }

    /// Items moved by the last commit, if the highlight is live at `now`
    pub fn highlighted_at(&self, now: Instant) -> &[ItemId] {
        match &self.highlight {
            Some(h) if now < h.until => &h.items,
            _ => &[],
        }
    }

    // === Workflow ===

    /// Current workflow phase
    pub fn workflow(&self) -> WorkflowState {
        self.workflow
    }

    /// Advance the workflow
    ///
    /// # Errors
    /// `WorkflowError::InvalidTransition` if `event` is not legal in the
    /// current phase; the phase is unchanged.
    pub fn dispatch(&mut self, event: WorkflowEvent) -> Result<WorkflowState, WorkflowError> {
        let next = self.workflow.apply(event)?;
        tracing::debug!(
            session = %self.id,
            from = %self.workflow,
            to = %next,
            event = event.name(),
            "workflow transition"
        );
        self.workflow = next;
        Ok(next)
    }
}
