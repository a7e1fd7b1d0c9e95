//! Error types for the relocation engine
//!
//! This module defines all error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Taxonomy:
//! - `StageError`: a staging request was refused (recoverable)
//! - `CommitError`: a commit aborted because canonical state would be corrupted
//! - `RegistryError`: the initial registry handed to the engine is inconsistent
//! - `ConfigError`: the configuration file could not be read or parsed
//! - `WorkflowError`: an event is not legal in the current workflow state
//!
//! A pointer that resolves to no region is not an error at all.

use crate::types::{ContainerId, ItemId, Location};
use thiserror::Error;

/// Result type alias for relocation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a staging request is refused
///
/// A refused request leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// Target container's effective occupancy already equals its capacity
    #[error("Container {container} is full: {occupancy}/{capacity} including pending moves")]
    CapacityExceeded {
        /// Target container
        container: ContainerId,
        /// Container capacity
        capacity: usize,
        /// Committed items plus pending moves into the container
        occupancy: usize,
    },

    /// Item is not in the registry
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// Target container is not in the registry
    #[error("Unknown container: {0}")]
    UnknownContainer(ContainerId),
}

impl StageError {
    /// True for the capacity rejection (the only reason surfaced to the UI)
    pub fn is_capacity(&self) -> bool {
        matches!(self, StageError::CapacityExceeded { .. })
    }
}

/// Broken invariants detected while validating a commit
///
/// Any of these indicates a bug in the caller or the engine: the ledger
/// refers to state that no longer exists or no longer matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A pending move references an item missing from the registry
    #[error("pending move references unknown item {0}")]
    UnknownItem(ItemId),

    /// A pending move references a container missing from the registry
    #[error("pending move for {item} references unknown container {container}")]
    UnknownContainer {
        /// Item being moved
        item: ItemId,
        /// Missing container
        container: ContainerId,
    },

    /// The item is no longer at the origin recorded when it was staged
    #[error("item {item} expected at {expected} but found at {actual}")]
    OriginMismatch {
        /// Item being moved
        item: ItemId,
        /// Origin recorded in the pending move
        expected: Location,
        /// Location currently in the registry
        actual: Location,
    },

    /// The item is located at `location` but missing from that location's list
    #[error("item {item} is located at {location} but not listed there")]
    NotListed {
        /// Item being moved
        item: ItemId,
        /// Location the item claims
        location: Location,
    },

    /// More moves leave a container than it lists items
    #[error("{leaving} moves leave container {container} which lists only {listed} items")]
    ListingMismatch {
        /// Container being drained
        container: ContainerId,
        /// Items currently listed
        listed: usize,
        /// Pending moves out of it
        leaving: usize,
    },

    /// Applying every move would overfill a container
    #[error("container {container} would hold {resulting} items (capacity {capacity})")]
    CapacityOverflow {
        /// Overfilled container
        container: ContainerId,
        /// Container capacity
        capacity: usize,
        /// Item count after applying all moves
        resulting: usize,
    },
}

/// Error type for commit failures
///
/// Commit is all-or-nothing: on error, registry, ledger, and selection are
/// left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// Commit aborted before touching canonical state
    #[error("Commit aborted: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}

/// Errors raised while building an entity registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two items share an id
    #[error("Duplicate item id: {0}")]
    DuplicateItem(ItemId),

    /// Two containers share an id
    #[error("Duplicate container id: {0}")]
    DuplicateContainer(ContainerId),

    /// An item is located in a container that does not exist
    #[error("Item {item} is located in unknown container {container}")]
    DanglingLocation {
        /// Item with the bad location
        item: ItemId,
        /// Missing container
        container: ContainerId,
    },

    /// A container's list disagrees with an item's location
    #[error("Container {container} listing disagrees with the location of item {item}")]
    MembershipMismatch {
        /// Container with the bad listing
        container: ContainerId,
        /// Item listed
        item: ItemId,
    },

    /// A container holds more items than its capacity
    #[error("Container {container} holds {count} items but capacity is {capacity}")]
    OverCapacity {
        /// Overfilled container
        container: ContainerId,
        /// Container capacity
        capacity: usize,
        /// Number of items located there
        count: usize,
    },

    /// The unassigned list disagrees with the items located in the pool
    #[error("Unassigned list disagrees with item locations at {0}")]
    UnassignedMismatch(ItemId),
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("I/O error on config file '{path}': {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config content could not be parsed or serialized
    #[error("Invalid config: {0}")]
    Parse(String),

    /// A value parsed but is out of range
    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Errors raised by the workflow state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Event is not legal in the current state
    #[error("Cannot apply {event} while {from}")]
    InvalidTransition {
        /// State name when the event arrived
        from: &'static str,
        /// Event name
        event: &'static str,
    },
}

/// Top-level error type for the relocation engine
#[derive(Debug, Error)]
pub enum Error {
    /// Staging refused
    #[error(transparent)]
    Stage(#[from] StageError),

    /// Commit aborted
    #[error(transparent)]
    Commit(#[from] CommitError),

    /// Registry construction failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration failed to load
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Illegal workflow transition
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}
