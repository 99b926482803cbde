//! Module packaging pipeline for modpack
//!
//! This crate provides:
//! - Resource and git source assembly for a module
//! - The component descriptor model and the codec/publisher/git contracts
//! - Security-scan configuration handling
//! - ModuleTemplate rendering
//! - [`ModulePackager`], which runs all of it end to end

pub mod descriptor;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod resources;
pub mod security;
pub mod templates;

pub use descriptor::{
    ArchivePublisher, ComponentDescriptor, DescriptorCodec, LocalBlob, YamlDescriptorCodec,
    SCHEMA_V2,
};
pub use error::{Error, Result};
pub use git::{GitCli, GitMetadata};
pub use pipeline::{ModulePackager, PackageOptions, PackagedModule};
pub use resources::{GitSource, ResolvedResource, ResourceAccess, ResourceKind, ResourceSetBuilder};
pub use security::SecurityScanConfig;
pub use templates::{ModuleTemplateRenderer, TemplateInput};
