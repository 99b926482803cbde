//! Container image handling for modpack
//!
//! This crate provides functionality for:
//! - Parsing and validating container image references
//! - Deriving deterministic artifact versions and resource names from images
//! - Discovering image references inside raw Kubernetes manifests
//! - Verifying that a module's manager workload runs the declared version
//!
//! # Example
//!
//! ```
//! use modpack_image::ImageReference;
//!
//! let image =
//!     ImageReference::validate_and_parse("europe-docker.pkg.dev/kyma/sample-manager:1.2.3")
//!         .unwrap();
//! let (version, name) = image.version_and_name();
//! assert_eq!(version, "1.2.3");
//! assert_eq!(name, "sample-manager");
//! ```

pub mod error;
pub mod reference;
pub mod scanner;
pub mod verify;

pub use error::{Error, Result};
pub use reference::{generate_version_and_name, ImageReference};
pub use scanner::ManifestImageScanner;
pub use verify::ImageVersionVerifier;

/// Version of the modpack-image crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
