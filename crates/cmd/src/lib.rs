//! Command implementations for the `sluice` binary.
//!
//! Exposed as a library so the integration tests can call command
//! functions directly instead of spawning the binary.

pub mod commands;
pub mod common;
