//! Relocate - staged, capacity-checked relocation of items between containers
//!
//! Users drag items between containers (rooms, zones, storage units) and the
//! moves are buffered as pending until an explicit commit applies them all at
//! once. Capacity is enforced against the *effective* state: committed
//! contents plus everything already staged.
//!
//! # Quick Start
//!
//! ```ignore
//! use relocate::{Container, EntityRegistry, Item, Location, RelocationSession};
//!
//! let registry = EntityRegistry::builder()
//!     .container(Container::new("office", "Office", "office", 2))
//!     .item(Item::new("chair-1", "Chair", "furniture"))
//!     .build()?;
//!
//! let mut session = RelocationSession::with_defaults(registry);
//! session.stage(&"chair-1".into(), &Location::container("office"));
//! let report = session.commit()?;
//! ```
//!
//! # Architecture
//!
//! - `relocate-core`: items, containers, the canonical registry, errors
//! - `relocate-staging`: the pending-move ledger, selection, atomic commit
//! - `relocate-engine`: the session, hit testing, drag gestures, workflow

pub use relocate_core::*;
pub use relocate_engine::*;
pub use relocate_staging::*;
