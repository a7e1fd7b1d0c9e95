//! Entity registry: canonical items and containers
//!
//! The registry is the committed state of the world. It is built once by
//! its owner, validated on construction (deserialization included), and
//! afterwards only changed through `apply_moves`, which the committer in
//! `relocate-staging` calls.
//!
//! # Invariants
//!
//! - every item is in exactly one place: one container's list or the unassigned pool
//! - `item.location` agrees with the list holding the item
//! - `container.items.len() <= container.capacity`

use crate::error::{InvariantViolation, RegistryError};
use crate::types::{Container, ContainerId, Item, ItemId, Location};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Canonical store of items and containers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegistrySnapshot")]
pub struct EntityRegistry {
    items: BTreeMap<ItemId, Item>,
    containers: BTreeMap<ContainerId, Container>,
    /// Unassigned items in arrival order
    unassigned: Vec<ItemId>,
    /// Bumped once per successful non-empty commit
    version: u64,
}

impl EntityRegistry {
    /// Build and validate a registry
    ///
    /// Container membership lists may be supplied pre-filled (their order is
    /// kept) or empty; items located in a container but missing from its list
    /// are appended in the order they appear in `items`.
    ///
    /// # Errors
    /// Returns `RegistryError` for duplicate ids, items located in unknown
    /// containers, containers listing items located elsewhere, or
    /// containers holding more than their capacity.
    pub fn new(items: Vec<Item>, containers: Vec<Container>) -> Result<Self, RegistryError> {
        let mut container_map = BTreeMap::new();
        for container in containers {
            if container_map.contains_key(&container.id) {
                return Err(RegistryError::DuplicateContainer(container.id));
            }
            container_map.insert(container.id.clone(), container);
        }

        let mut item_map: BTreeMap<ItemId, Item> = BTreeMap::new();
        let mut order = Vec::with_capacity(items.len());
        for item in items {
            if item_map.contains_key(&item.id) {
                return Err(RegistryError::DuplicateItem(item.id));
            }
            if let Location::Container(cid) = &item.location {
                if !container_map.contains_key(cid) {
                    return Err(RegistryError::DanglingLocation {
                        item: item.id,
                        container: cid.clone(),
                    });
                }
            }
            order.push(item.id.clone());
            item_map.insert(item.id.clone(), item);
        }

        // Pre-filled lists must agree with item locations
        for container in container_map.values_mut() {
            let mut seen = HashSet::new();
            for id in &container.items {
                let located_here = item_map
                    .get(id)
                    .map(|item| item.location.container_id() == Some(&container.id))
                    .unwrap_or(false);
                if !located_here || !seen.insert(id.clone()) {
                    return Err(RegistryError::MembershipMismatch {
                        container: container.id.clone(),
                        item: id.clone(),
                    });
                }
            }
        }

        let mut unassigned = Vec::new();
        for id in order {
            let Some(item) = item_map.get(&id) else {
                continue;
            };
            match &item.location {
                Location::Unassigned => unassigned.push(id),
                Location::Container(cid) => {
                    if let Some(container) = container_map.get_mut(cid) {
                        if !container.contains(&id) {
                            container.items.push(id);
                        }
                    }
                }
            }
        }

        for container in container_map.values() {
            if container.items.len() > container.capacity {
                return Err(RegistryError::OverCapacity {
                    container: container.id.clone(),
                    capacity: container.capacity,
                    count: container.items.len(),
                });
            }
        }

        Ok(Self {
            items: item_map,
            containers: container_map,
            unassigned,
            version: 0,
        })
    }

    /// Start building a registry incrementally
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    // === Lookup ===

    /// Look up an item
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Look up a container
    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.get(id)
    }

    /// All items, ordered by id
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// All containers, ordered by id
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }

    /// Canonical location of an item
    pub fn location_of(&self, id: &ItemId) -> Option<&Location> {
        self.items.get(id).map(|item| &item.location)
    }

    /// Unassigned items in arrival order
    pub fn unassigned(&self) -> &[ItemId] {
        &self.unassigned
    }

    /// Committed item ids at a location, in arrival order
    ///
    /// Returns `None` for an unknown container.
    pub fn committed_at(&self, location: &Location) -> Option<&[ItemId]> {
        match location {
            Location::Unassigned => Some(&self.unassigned),
            Location::Container(cid) => self.containers.get(cid).map(|c| c.items.as_slice()),
        }
    }

    /// True if the location exists (the unassigned pool always does)
    pub fn has_location(&self, location: &Location) -> bool {
        match location {
            Location::Unassigned => true,
            Location::Container(cid) => self.containers.contains_key(cid),
        }
    }

    /// Number of items in the registry
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Commit version: number of non-empty commits applied so far
    pub fn version(&self) -> u64 {
        self.version
    }

    // === Mutation ===

    /// Apply a set of moves as one step, returning the new version
    ///
    /// Each move is `(item, from, to)`. Every item is detached from `from`
    /// before any is attached to `to` (in the given order), so the result
    /// does not depend on move order. The moves run on a copy: on error the
    /// registry is unchanged. An empty set changes nothing and keeps the
    /// version.
    ///
    /// # Errors
    /// Returns an `InvariantViolation` if an item is unknown or not at `from`,
    /// a container is unknown, or a container would exceed its capacity.
    pub fn apply_moves<'a, I>(&mut self, moves: I) -> Result<u64, InvariantViolation>
    where
        I: IntoIterator<Item = (&'a ItemId, &'a Location, &'a Location)>,
    {
        let moves: Vec<_> = moves.into_iter().collect();
        if moves.is_empty() {
            return Ok(self.version);
        }

        let mut working = self.clone();
        for &(id, from, _) in &moves {
            working.detach(id, from)?;
        }
        for &(id, _, to) in &moves {
            working.attach(id, to)?;
        }
        for container in working.containers.values() {
            if container.items.len() > container.capacity {
                return Err(InvariantViolation::CapacityOverflow {
                    container: container.id.clone(),
                    capacity: container.capacity,
                    resulting: container.items.len(),
                });
            }
        }

        working.version += 1;
        *self = working;
        Ok(self.version)
    }

    /// Remove an item from the list at `from`
    ///
    /// Leaves `item.location` alone; `attach` sets it.
    fn detach(&mut self, id: &ItemId, from: &Location) -> Result<(), InvariantViolation> {
        let actual = self
            .location_of(id)
            .ok_or_else(|| InvariantViolation::UnknownItem(id.clone()))?;
        if actual != from {
            return Err(InvariantViolation::OriginMismatch {
                item: id.clone(),
                expected: from.clone(),
                actual: actual.clone(),
            });
        }

        let list = match from {
            Location::Unassigned => &mut self.unassigned,
            Location::Container(cid) => match self.containers.get_mut(cid) {
                Some(c) => &mut c.items,
                None => {
                    return Err(InvariantViolation::UnknownContainer {
                        item: id.clone(),
                        container: cid.clone(),
                    })
                }
            },
        };
        match list.iter().position(|i| i == id) {
            Some(pos) => {
                list.remove(pos);
                Ok(())
            }
            None => Err(InvariantViolation::NotListed {
                item: id.clone(),
                location: from.clone(),
            }),
        }
    }

    /// Append an item to the list at `to` and record the new location
    fn attach(&mut self, id: &ItemId, to: &Location) -> Result<(), InvariantViolation> {
        let Some(item) = self.items.get_mut(id) else {
            return Err(InvariantViolation::UnknownItem(id.clone()));
        };
        match to {
            Location::Unassigned => self.unassigned.push(id.clone()),
            Location::Container(cid) => match self.containers.get_mut(cid) {
                Some(c) => c.items.push(id.clone()),
                None => {
                    return Err(InvariantViolation::UnknownContainer {
                        item: id.clone(),
                        container: cid.clone(),
                    })
                }
            },
        }
        item.location = to.clone();
        Ok(())
    }
}

/// Serialized form of `EntityRegistry`, validated on the way in
#[derive(Debug, Deserialize)]
struct RegistrySnapshot {
    items: BTreeMap<ItemId, Item>,
    containers: BTreeMap<ContainerId, Container>,
    unassigned: Vec<ItemId>,
    #[serde(default)]
    version: u64,
}

impl TryFrom<RegistrySnapshot> for EntityRegistry {
    type Error = RegistryError;

    fn try_from(snapshot: RegistrySnapshot) -> Result<Self, Self::Error> {
        let listed: BTreeMap<ContainerId, usize> = snapshot
            .containers
            .iter()
            .map(|(id, c)| (id.clone(), c.items.len()))
            .collect();
        let mut registry = EntityRegistry::new(
            snapshot.items.into_values().collect(),
            snapshot.containers.into_values().collect(),
        )?;

        // `new` fills in located-but-unlisted items; a stored list must be complete
        for container in registry.containers.values() {
            let stored = listed.get(&container.id).copied().unwrap_or(0);
            if let Some(missing) = container.items.get(stored) {
                return Err(RegistryError::MembershipMismatch {
                    container: container.id.clone(),
                    item: missing.clone(),
                });
            }
        }

        // Keep the stored pool order, provided it lists exactly the pool
        let mut seen = HashSet::new();
        for id in &snapshot.unassigned {
            let in_pool = registry.location_of(id) == Some(&Location::Unassigned);
            if !in_pool || !seen.insert(id) {
                return Err(RegistryError::UnassignedMismatch(id.clone()));
            }
        }
        if let Some(missing) = registry.unassigned.iter().find(|id| !seen.contains(id)) {
            return Err(RegistryError::UnassignedMismatch(missing.clone()));
        }

        registry.unassigned = snapshot.unassigned;
        registry.version = snapshot.version;
        Ok(registry)
    }
}

/// Incremental builder for `EntityRegistry`
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    items: Vec<Item>,
    containers: Vec<Container>,
}

impl RegistryBuilder {
    /// Add a container
    pub fn container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    /// Add an item
    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Validate and build
    pub fn build(self) -> Result<EntityRegistry, RegistryError> {
        EntityRegistry::new(self.items, self.containers)
    }
}
