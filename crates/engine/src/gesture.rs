//! Drag gesture state
//!
//! A gesture is a stream of pointer samples ending in a drop. Intermediate
//! samples only move the non-authoritative `active_target` used for hover
//! feedback; the ledger is touched only when the session handles the drop.

use relocate_core::{ItemId, Location, Point, StageError};
use relocate_staging::{BatchReport, StageOutcome};

/// An in-flight drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    /// Item under the pointer when the drag started
    pub item: ItemId,
    /// Last pointer position seen
    pub last_point: Option<Point>,
    /// Target currently under the pointer, for hover feedback only
    pub active_target: Option<Location>,
    /// Pointer samples seen so far
    pub samples: usize,
}

impl DragGesture {
    /// Start a gesture on `item`
    pub fn new(item: ItemId) -> Self {
        Self {
            item,
            last_point: None,
            active_target: None,
            samples: 0,
        }
    }

    /// Record a pointer sample and the target under it
    pub fn record(&mut self, point: Point, target: Option<Location>) {
        self.last_point = Some(point);
        self.active_target = target;
        self.samples += 1;
    }
}

/// Result of the terminal drop sample
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// No drag was in progress
    NoDrag,
    /// The pointer was over no region; nothing staged
    NoTarget,
    /// A single item was staged (or refused)
    Single {
        /// Item dropped
        item: ItemId,
        /// Ledger response
        result: Result<StageOutcome, StageError>,
    },
    /// The whole selection was staged as a batch
    Batch(BatchReport),
}

impl DropOutcome {
    /// True if the drop changed or confirmed at least one pending move
    pub fn is_accepted(&self) -> bool {
        match self {
            DropOutcome::NoDrag | DropOutcome::NoTarget => false,
            DropOutcome::Single { result, .. } => result.is_ok(),
            DropOutcome::Batch(report) => !report.accepted.is_empty(),
        }
    }
}
