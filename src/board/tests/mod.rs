//! Unit tests for the board module.
//!
//! Tests are organised by component, covering happy paths, rejected input,
//! stale references and the documented scenarios.

mod archive_tests;
mod notification_tests;
mod support;
