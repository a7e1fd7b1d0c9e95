//! Core record types for the relocation engine
//!
//! This module defines the inert data records supplied by collaborators:
//! - ItemId / ContainerId: string-backed identities
//! - Location: where an item currently lives (a container or the unassigned pool)
//! - Item: a movable asset
//! - Container: a capacity-constrained zone

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a movable item (asset)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an item id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identity of a container (zone)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    /// Create a container id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ContainerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Where an item lives: inside a container, or in the unassigned pool
///
/// The unassigned pool is a container-like bucket with unlimited capacity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// The unassigned pool
    Unassigned,
    /// A capacity-constrained container
    Container(ContainerId),
}

impl Location {
    /// Shorthand for `Location::Container(id.into())`
    pub fn container(id: impl Into<ContainerId>) -> Self {
        Location::Container(id.into())
    }

    /// The container id, if this location is a container
    pub fn container_id(&self) -> Option<&ContainerId> {
        match self {
            Location::Container(id) => Some(id),
            Location::Unassigned => None,
        }
    }

    /// True for the unassigned pool
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Location::Unassigned)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unassigned => f.write_str("unassigned"),
            Location::Container(id) => write!(f, "container:{}", id),
        }
    }
}

impl From<ContainerId> for Location {
    fn from(id: ContainerId) -> Self {
        Location::Container(id)
    }
}

/// A movable asset
///
/// Every field except `location` is immutable once the registry is built.
/// Only the committer changes `location`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identity
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Category tag (used by subsection regions)
    pub category: String,
    /// Optional image reference, opaque to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Status tag, opaque to the engine
    pub status: String,
    /// Current canonical location
    pub location: Location,
}

impl Item {
    /// Create an unassigned item with the given id, name, and category
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            image: None,
            status: "active".to_string(),
            location: Location::Unassigned,
        }
    }

    /// Set the initial location
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Set the image reference
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the status tag
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// A capacity-constrained zone
///
/// Invariant (canonical state): `items.len() <= capacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Unique identity
    pub id: ContainerId,
    /// Display name
    pub name: String,
    /// Kind tag (e.g. "office", "warehouse")
    pub kind: String,
    /// Maximum number of items in canonical state
    pub capacity: usize,
    /// Items currently assigned, in arrival order
    pub items: Vec<ItemId>,
}

impl Container {
    /// Create an empty container
    pub fn new(
        id: impl Into<ContainerId>,
        name: impl Into<String>,
        kind: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            capacity,
            items: Vec::new(),
        }
    }

    /// Number of committed items
    pub fn occupancy(&self) -> usize {
        self.items.len()
    }

    /// Remaining committed headroom (ignores pending moves)
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// True if `id` is committed to this container
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.iter().any(|i| i == id)
    }
}
