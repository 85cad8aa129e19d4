//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - Process-local adapters for tests and host-less embedding

pub mod memory;

pub use memory::{InMemoryAccountStore, StaticRoleRegistry};
