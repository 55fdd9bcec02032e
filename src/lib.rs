//! Taskboard: state coordination for a personal task board.
//!
//! Users organize tasks into named columns, search and filter them, and
//! archive or restore them. This crate keeps the in-memory task collection,
//! the column set and the archive mutually consistent while reflecting user
//! actions ahead of confirmation from a remote task service.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board state with no infrastructure dependencies
//! - **Ports**: Abstract trait interface for the remote task service
//! - **Adapters**: Concrete implementations of the port (HTTP, in-memory)
//! - **Services**: The board coordinator and its remote-call dispatcher
//!
//! # Modules
//!
//! - [`board`]: Tasks, columns, archive, search overlay and coordinator
//! - [`config`]: TOML configuration

pub mod board;
pub mod config;
