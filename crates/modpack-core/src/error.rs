//! Error types for modpack-core

use thiserror::Error;

/// Result type alias using modpack-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for modpack
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// A module configuration field failed validation
    #[error("invalid module config field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Schema validation error
    #[error("Schema validation failed:\n{errors}")]
    SchemaValidation { errors: String },

    /// Schema not found
    #[error("Schema not found: {name}")]
    SchemaNotFound { name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file reference was resolved while holding no value
    #[error("Cannot resolve an empty file reference")]
    EmptyReference,

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Remote file could not be downloaded
    #[error("Failed to download {url}: {source}")]
    DownloadFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Local file does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Existence check itself failed (permissions, broken mount, ...)
    #[error("Failed to check whether {path} exists: {source}")]
    ExistenceCheckFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Raw manifest could not be read or parsed
    #[error("Failed to read manifest {path}: {message}")]
    ManifestReadFailed { path: String, message: String },

    /// Default custom resource could not be read or parsed
    #[error("Failed to read default CR {path}: {message}")]
    DefaultCrReadFailed { path: String, message: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a field-qualified validation error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a schema validation error from a list of errors
    pub fn schema_validation(errors: Vec<String>) -> Self {
        Self::SchemaValidation {
            errors: errors.join("\n"),
        }
    }

    /// Create a schema not found error
    pub fn schema_not_found(name: impl Into<String>) -> Self {
        Self::SchemaNotFound { name: name.into() }
    }

    /// Create a download failed error
    pub fn download_failed(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an existence check failed error
    pub fn existence_check_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ExistenceCheckFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a manifest read error
    pub fn manifest_read_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ManifestReadFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a default CR read error
    pub fn default_cr_read_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DefaultCrReadFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised by configuration validation
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidField { .. } | Self::SchemaValidation { .. } | Self::InvalidConfig { .. }
        )
    }
}
