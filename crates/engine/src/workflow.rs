//! Relocation review workflow
//!
//! A small explicit state machine for the suggest → review → order flow
//! that surrounds a relocation session. Collaborators drive it with typed
//! events; nothing here inspects message text.
//!
//! State transitions:
//! - `Idle` → `Analyzing` (AnalysisRequested)
//! - `Analyzing` → `ReviewNeeded` (AnalysisCompleted)
//! - `ReviewNeeded` → `Analyzing` (AnalysisRequested, re-analysis)
//! - `ReviewNeeded` → `Approved` (Approve)
//! - `Approved` → `Ordered` (PlaceOrder)
//! - any → `Idle` (Reset)
//!
//! `Ordered` only accepts `Reset`.

use relocate_core::WorkflowError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkflowState {
    /// Nothing in progress
    #[default]
    Idle,
    /// Suggestions are being computed
    Analyzing,
    /// Suggestions are ready for the user
    ReviewNeeded,
    /// User approved the suggestions
    Approved,
    /// Order placed
    Ordered,
}

impl WorkflowState {
    /// Stable name for logs and errors
    pub fn name(self) -> &'static str {
        match self {
            WorkflowState::Idle => "Idle",
            WorkflowState::Analyzing => "Analyzing",
            WorkflowState::ReviewNeeded => "ReviewNeeded",
            WorkflowState::Approved => "Approved",
            WorkflowState::Ordered => "Ordered",
        }
    }

    /// Compute the next state
    ///
    /// # Errors
    /// `WorkflowError::InvalidTransition` if `event` is not legal here.
    pub fn apply(self, event: WorkflowEvent) -> Result<WorkflowState, WorkflowError> {
        use WorkflowEvent as E;
        use WorkflowState as S;

        match (self, event) {
            (_, E::Reset) => Ok(S::Idle),
            (S::Idle, E::AnalysisRequested) => Ok(S::Analyzing),
            (S::Analyzing, E::AnalysisCompleted) => Ok(S::ReviewNeeded),
            (S::ReviewNeeded, E::AnalysisRequested) => Ok(S::Analyzing),
            (S::ReviewNeeded, E::Approve) => Ok(S::Approved),
            (S::Approved, E::PlaceOrder) => Ok(S::Ordered),
            (state, event) => Err(WorkflowError::InvalidTransition {
                from: state.name(),
                event: event.name(),
            }),
        }
    }

    /// True once the order is placed
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Ordered)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Events that drive the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowEvent {
    /// Start (or restart) computing suggestions
    AnalysisRequested,
    /// Suggestions are ready
    AnalysisCompleted,
    /// User accepted the suggestions
    Approve,
    /// Order submitted
    PlaceOrder,
    /// Abandon the flow
    Reset,
}

impl WorkflowEvent {
    /// Stable name for logs and errors
    pub fn name(self) -> &'static str {
        match self {
            WorkflowEvent::AnalysisRequested => "AnalysisRequested",
            WorkflowEvent::AnalysisCompleted => "AnalysisCompleted",
            WorkflowEvent::Approve => "Approve",
            WorkflowEvent::PlaceOrder => "PlaceOrder",
            WorkflowEvent::Reset => "Reset",
        }
    }
}
