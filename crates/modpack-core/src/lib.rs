//! # modpack-core
//!
//! Core library for modpack providing:
//! - Module configuration parsing (module-config.yaml) and validation
//! - JSON Schema pre-validation of configuration documents
//! - Hierarchical packager settings (embedded defaults, user file, environment)
//! - Local-or-remote file resolution with temporary-file lifecycle
//! - Raw-manifest document parsing and CRD scope lookups

pub mod config;
pub mod crd;
pub mod error;
pub mod manifest;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod utils;

pub use config::{validate_module_config, ModuleConfigReader, SettingsLoader};
pub use crd::{CrdScope, CrdScopeResolver};
pub use error::{Error, Result};
pub use manifest::ManifestDocument;
pub use resolver::FileResolver;
pub use schema::SchemaValidator;
pub use types::{FileReference, ModuleConfig, PackagerSettings};
