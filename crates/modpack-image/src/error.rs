//! Error types for modpack-image

use thiserror::Error;

/// Result type alias using modpack-image's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Image handling errors
#[derive(Error, Debug)]
pub enum Error {
    /// Empty image reference
    #[error("Image reference must not be empty")]
    EmptyImageUrl,

    /// Reference does not follow the container image grammar
    #[error("Invalid image reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// Reference carries neither a tag nor a digest
    #[error("Image reference '{reference}' has no tag or digest")]
    NoTagOrDigest { reference: String },

    /// Reference has an empty tag and no digest
    #[error("Image reference '{reference}' is missing a tag")]
    MissingImageTag { reference: String },

    /// Floating tags are not accepted for packaged images
    #[error("Image reference '{reference}' uses disallowed tag '{tag}'")]
    DisallowedTag { reference: String, tag: String },

    /// The manager workload does not run the declared module version
    #[error(
        "No image of {kind} '{manager}' matches module version {expected} (found: {})",
        found_display(.found)
    )]
    NoMatchedVersion {
        kind: String,
        manager: String,
        expected: String,
        found: Vec<String>,
    },

    /// A manager image could not be parsed into a tag
    #[error("Invalid image reference '{image}' in manager workload: {reason}")]
    InvalidImageReference { image: String, reason: String },

    /// Core error (manifest reading)
    #[error(transparent)]
    Core(#[from] modpack_core::Error),
}

fn found_display(found: &[String]) -> String {
    if found.is_empty() {
        "none".to_string()
    } else {
        found.join(", ")
    }
}

impl Error {
    /// Create an invalid reference error
    pub fn invalid_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create a no tag or digest error
    pub fn no_tag_or_digest(reference: impl Into<String>) -> Self {
        Self::NoTagOrDigest {
            reference: reference.into(),
        }
    }

    /// Create a missing image tag error
    pub fn missing_image_tag(reference: impl Into<String>) -> Self {
        Self::MissingImageTag {
            reference: reference.into(),
        }
    }

    /// Create a disallowed tag error
    pub fn disallowed_tag(reference: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::DisallowedTag {
            reference: reference.into(),
            tag: tag.into(),
        }
    }

    /// Create an invalid image reference error
    pub fn invalid_image_reference(image: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidImageReference {
            image: image.into(),
            reason: reason.into(),
        }
    }
}
