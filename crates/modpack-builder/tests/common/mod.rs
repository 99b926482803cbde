//! Common test utilities for modpack-builder
//!
//! Provides a module fixture on disk plus mock collaborators for git and
//! archive publishing.

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
