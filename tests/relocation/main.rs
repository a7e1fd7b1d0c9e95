//! Relocation Integration Tests
//!
//! End-to-end coverage through the public `relocate` facade:
//! - Staging rules and the effective view
//! - Atomic commit
//! - Pointer-driven drag and drop through the session
//! - Property tests over random operation sequences

#[path = "../common/mod.rs"]
mod common;

mod drag_drop;
mod properties;
mod staging_scenarios;
