//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod remote;

pub use remote::{RemoteError, RemoteResult, TaskRemote};
