//! Local-or-remote file references used by the module configuration

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use url::Url;

/// A configuration value pointing either at a local file or at a remote URL.
///
/// The reference keeps the text it was created from so it serializes back
/// unchanged. A value is treated as a URL only when it parses with both a
/// scheme and a host; anything else is a local path (absolute, or relative to
/// the directory of the configuration file).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileReference {
    raw: String,
    url: Option<Url>,
}

impl FileReference {
    /// Parse a reference from its textual form
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let url = Url::parse(&raw)
            .ok()
            .filter(|u| !u.scheme().is_empty() && u.has_host());
        Self { raw, url }
    }

    /// The empty marker
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn is_url(&self) -> bool {
        self.url.is_some()
    }

    /// Parsed URL, when the reference is remote
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Local path, when the reference is neither empty nor a URL
    pub fn local_path(&self) -> Option<&Path> {
        if self.is_empty() || self.is_url() {
            None
        } else {
            Some(Path::new(&self.raw))
        }
    }

    /// Original textual form
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FileReference {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Serialize for FileReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FileReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(Self::parse).unwrap_or_default())
    }
}
