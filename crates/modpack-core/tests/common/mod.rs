//! Common test utilities for modpack-core
//!
//! Provides module-config, manifest and CRD fixtures plus wiremock helpers.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_server;

pub use fixtures::*;
pub use mock_server::*;
