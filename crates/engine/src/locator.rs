//! Pointer → drop target resolution
//!
//! The rendering layer registers a rectangle per container, per
//! (container, category) subsection, and optionally one for the unassigned
//! pool. `locate` runs a two-tier search:
//!
//! 1. Subsections, zero tolerance, point strictly inside. A drop aimed at a
//!    category group must not be swallowed by the zone around it.
//! 2. Containers and the pool, each rectangle grown by the configured
//!    tolerance, so a drop just outside a zone's border still lands in it.
//!
//! Within a tier the first region in registration order wins. The locator
//! keeps only the latest snapshot and never computes layout.

use crate::config::LocatorConfig;
use relocate_core::{ContainerId, Location, Point, Rect};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a registered region
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Create a region id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// What a region stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionKind {
    /// A whole container
    Container {
        /// Container covered
        container: ContainerId,
    },
    /// One category group inside a container
    Subsection {
        /// Parent container
        container: ContainerId,
        /// Category the group shows
        category: String,
    },
    /// The unassigned pool
    UnassignedPool,
}

/// A rectangle tagged with what it represents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRef {
    /// Region identity (unique within a snapshot)
    pub id: RegionId,
    /// What the region stands for
    #[serde(flatten)]
    pub kind: RegionKind,
    /// Latest measured bounds
    pub rect: Rect,
}

impl RegionRef {
    /// Region covering a whole container
    pub fn container(
        id: impl Into<RegionId>,
        container: impl Into<ContainerId>,
        rect: Rect,
    ) -> Self {
        Self {
            id: id.into(),
            kind: RegionKind::Container {
                container: container.into(),
            },
            rect,
        }
    }

    /// Region covering one category group of a container
    pub fn subsection(
        id: impl Into<RegionId>,
        container: impl Into<ContainerId>,
        category: impl Into<String>,
        rect: Rect,
    ) -> Self {
        Self {
            id: id.into(),
            kind: RegionKind::Subsection {
                container: container.into(),
                category: category.into(),
            },
            rect,
        }
    }

    /// Region covering the unassigned pool
    pub fn unassigned_pool(id: impl Into<RegionId>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            kind: RegionKind::UnassignedPool,
            rect,
        }
    }

    /// Where a drop on this region sends an item
    ///
    /// A subsection resolves to its parent container.
    pub fn target(&self) -> Location {
        match &self.kind {
            RegionKind::Container { container } | RegionKind::Subsection { container, .. } => {
                Location::Container(container.clone())
            }
            RegionKind::UnassignedPool => Location::Unassigned,
        }
    }

    /// True for subsection regions (tier 1)
    pub fn is_subsection(&self) -> bool {
        matches!(self.kind, RegionKind::Subsection { .. })
    }
}

/// Hit-tests pointer positions against the latest region snapshot
#[derive(Debug, Clone, Default)]
pub struct SpatialLocator {
    /// Regions in registration order
    regions: Vec<RegionRef>,
    /// Region id → index in `regions`
    index: FxHashMap<RegionId, usize>,
    /// Margin for container-tier hits
    tolerance: f64,
}

impl SpatialLocator {
    /// Create an empty locator
    pub fn new(config: LocatorConfig) -> Self {
        Self {
            regions: Vec::new(),
            index: FxHashMap::default(),
            tolerance: config.container_tolerance,
        }
    }

    /// Replace the whole snapshot
    ///
    /// A region whose id repeats replaces the earlier one in place.
    pub fn register_regions<I>(&mut self, regions: I)
    where
        I: IntoIterator<Item = RegionRef>,
    {
        self.regions.clear();
        self.index.clear();
        for region in regions {
            match self.index.get(&region.id) {
                Some(&pos) => self.regions[pos] = region,
                None => {
                    self.index.insert(region.id.clone(), self.regions.len());
                    self.regions.push(region);
                }
            }
        }
        tracing::trace!(regions = self.regions.len(), "region snapshot replaced");
    }

    /// Most specific region under `point`, if any
    pub fn locate(&self, point: Point) -> Option<&RegionRef> {
        self.regions
            .iter()
            .filter(|r| r.is_subsection())
            .find(|r| r.rect.contains_strict(point))
            .or_else(|| {
                self.regions
                    .iter()
                    .filter(|r| !r.is_subsection())
                    .find(|r| r.rect.contains_with_margin(point, self.tolerance))
            })
    }

    /// Drop target under `point`, if any
    pub fn resolve(&self, point: Point) -> Option<Location> {
        self.locate(point).map(RegionRef::target)
    }

    /// Look up a region by id
    pub fn get(&self, id: &RegionId) -> Option<&RegionRef> {
        self.index.get(id).map(|&pos| &self.regions[pos])
    }

    /// Regions in registration order
    pub fn regions(&self) -> &[RegionRef] {
        &self.regions
    }

    /// Margin used for container-tier hits
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of registered regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True if no regions are registered
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Drop the snapshot
    pub fn clear(&mut self) {
        self.regions.clear();
        self.index.clear();
    }
}
