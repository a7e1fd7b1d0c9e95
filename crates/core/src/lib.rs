//! Core types for the relocation engine
//!
//! This crate defines the foundational records shared by every layer:
//! - ItemId, ContainerId, Location: identities and placement
//! - Item, Container: the inert records supplied by collaborators
//! - EntityRegistry: canonical (committed) state with lookup
//! - Point, Rect: pointer geometry for hit testing
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geometry;
pub mod registry;
pub mod types;

pub use error::{
    CommitError, ConfigError, Error, InvariantViolation, RegistryError, Result, StageError,
    WorkflowError,
};
pub use geometry::{Point, Rect};
pub use registry::{EntityRegistry, RegistryBuilder};
pub use types::{Container, ContainerId, Item, ItemId, Location};
