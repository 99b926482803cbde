//! Error types for modpack-builder

use thiserror::Error;

/// Result type alias using modpack-builder's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Packaging pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// Git operation failed
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    /// Git command not found
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// Security-scan configuration is malformed
    #[error("Invalid security scan config {path}: {message}")]
    InvalidSecurityConfig { path: String, message: String },

    /// Default CR has no usable document
    #[error("Default CR {path} contains no document")]
    EmptyDefaultCr { path: String },

    /// Two resources share the same identity in the descriptor
    #[error("Duplicate resource '{name}' version {version} in component descriptor")]
    DuplicateResource { name: String, version: String },

    /// Component descriptor rejected by the codec
    #[error("Invalid component descriptor: {message}")]
    InvalidDescriptor { message: String },

    /// Codec does not know the requested schema version
    #[error("Unsupported component descriptor schema version: {version}")]
    UnsupportedSchemaVersion { version: String },

    /// Archive construction or upload failed
    #[error("Failed to publish component archive: {message}")]
    PublishFailed { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Template error from Tera
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] modpack_core::Error),

    /// Image handling error
    #[error("Image error: {0}")]
    Image(#[from] modpack_image::Error),
}

impl Error {
    /// Create a git operation error
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    /// Create an invalid security config error
    pub fn invalid_security_config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSecurityConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate resource error
    pub fn duplicate_resource(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::DuplicateResource {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Create an invalid descriptor error
    pub fn invalid_descriptor(message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            message: message.into(),
        }
    }

    /// Create a publish failed error
    pub fn publish_failed(message: impl Into<String>) -> Self {
        Self::PublishFailed {
            message: message.into(),
        }
    }

    /// Whether the error came from module configuration validation
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_validation_error())
    }
}
