//! In-memory adapter implementations for tests and demos.
//!
//! These adapters provide simple, thread-safe implementations that need no
//! network access.

mod remote;

pub use remote::{IdField, InMemoryTaskRemote, RemoteCall};
