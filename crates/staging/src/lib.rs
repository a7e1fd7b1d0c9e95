//! Staging layer for the relocation engine
//!
//! This crate buffers tentative moves and applies them atomically:
//! - StagingLedger: pending moves, cancel-by-return, effective views
//! - Capacity validation: per-request gate and pre-commit validation
//! - Selection: multi-select set that drives batch staging
//! - commit(): all-or-nothing application to the entity registry

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commit;
pub mod ledger;
pub mod selection;
pub mod validation;

pub use commit::{commit, CommitReport, MoveRecord};
pub use ledger::{
    BatchReport, EffectiveItem, PendingMove, PendingSummary, StageOutcome, StagingLedger,
};
pub use selection::Selection;
pub use validation::{can_accept, check_capacity, effective_occupancy, validate_ledger};
