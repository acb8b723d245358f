//! Shared utilities for dopi integration tests.

pub mod harness;

pub use harness::TestHarness;
