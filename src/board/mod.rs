//! Board state coordination for the personal task board.
//!
//! This module keeps the active task collection, the dynamic column set,
//! and the archive mutually consistent while reflecting user intents
//! optimistically ahead of confirmation from the remote task service. A
//! non-destructive search/filter overlay is derived on top of the active
//! tasks. The module follows hexagonal architecture:
//!
//! - Domain types and in-memory stores in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Coordination services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
