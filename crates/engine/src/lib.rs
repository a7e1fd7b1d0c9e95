//! Relocation engine
//!
//! This crate wires the lower layers into one session object:
//! - RelocationSession: registry, ledger, selection, drag, commit
//! - SpatialLocator: pointer → drop target resolution
//! - DragGesture: hover feedback and drop handling
//! - WorkflowState: the suggest → review → order state machine
//! - RelocationConfig: `relocate.toml` loading
//!
//! The session is the only component that knows about:
//! - Pointer coordinates
//! - Post-commit highlighting
//! - Workflow phase

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod gesture;
pub mod locator;
pub mod session;
pub mod workflow;

pub use config::{
    LocatorConfig, RelocationConfig, CONFIG_FILE_NAME, DEFAULT_CONTAINER_TOLERANCE,
    DEFAULT_HIGHLIGHT_MS,
};
pub use gesture::{DragGesture, DropOutcome};
pub use locator::{RegionId, RegionKind, RegionRef, SpatialLocator};
pub use session::{BatchResponse, RejectReason, RelocationSession, SessionId, StageResponse};
pub use workflow::{WorkflowEvent, WorkflowState};
