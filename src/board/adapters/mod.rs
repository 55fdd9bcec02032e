//! Remote collaborator adapters for the board.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryTaskRemote`]: thread-safe in-process collaborator for
//!   tests and the demo session
//! - [`http::HttpTaskRemote`]: REST client for the task service API

pub mod http;
pub mod memory;
