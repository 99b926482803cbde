//! Container image references and artifact versioning

use crate::error::{Error, Result};
use regex::Regex;
use semver::Version;
use std::fmt;
use std::sync::LazyLock;

/// `[domain/]path[:tag][@algorithm:hex]`, following the distribution
/// reference grammar
static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let domain_component = r"(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])";
    let domain = format!(r"{c}(?:\.{c})*(?::[0-9]+)?", c = domain_component);
    let path_component = r"[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*";
    let tag = r"[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}";
    let digest = r"[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9a-fA-F]{32,}";
    let pattern = format!(
        r"^(?P<name>(?:{domain}/)?{p}(?:/{p})*)(?::(?P<tag>{tag}))?(?:@(?P<digest>{digest}))?$",
        domain = domain,
        p = path_component,
        tag = tag,
        digest = digest,
    );
    Regex::new(&pattern).expect("image reference regex is valid")
});

const MAX_NAME_LENGTH: usize = 255;
const SHA256_PREFIX: &str = "sha256:";
const SHA256_HEX_LENGTH: usize = 64;
const SHORT_DIGEST_LENGTH: usize = 12;
const NAME_DIGEST_LENGTH: usize = 8;
const DISALLOWED_TAGS: &[&str] = &["latest", "main"];

/// Parsed container image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Last path segment of the repository (e.g., "sample-manager")
    pub name: String,
    /// Full repository including any registry host
    pub repository: String,
    /// Tag, if present
    pub tag: Option<String>,
    /// Lowercase sha256 hex digest without the algorithm prefix, if present
    pub digest: Option<String>,
    /// The reference exactly as given
    pub full: String,
}

impl ImageReference {
    /// Parse an image reference like "europe-docker.pkg.dev/kyma/manager:1.0.0@sha256:..."
    pub fn parse(image_url: &str) -> Result<Self> {
        if image_url.is_empty() {
            return Err(Error::EmptyImageUrl);
        }

        let captures = REFERENCE_REGEX
            .captures(image_url)
            .ok_or_else(|| {
                Error::invalid_reference(image_url, "does not match image reference format")
            })?;

        let repository = &captures["name"];
        if repository.len() > MAX_NAME_LENGTH {
            return Err(Error::invalid_reference(
                image_url,
                format!("repository name exceeds {} characters", MAX_NAME_LENGTH),
            ));
        }

        let digest = match captures.name("digest") {
            Some(m) => Some(parse_sha256(image_url, m.as_str())?),
            None => None,
        };
        let tag = captures.name("tag").map(|m| m.as_str().to_string());

        if tag.is_none() && digest.is_none() {
            return Err(Error::no_tag_or_digest(image_url));
        }

        let name = repository
            .rsplit('/')
            .next()
            .unwrap_or(repository)
            .to_string();

        Ok(Self {
            name,
            repository: repository.to_string(),
            tag,
            digest,
            full: image_url.to_string(),
        })
    }

    /// Parse and reject references unsuitable for packaging
    ///
    /// Floating tags ("latest", "main" in any case) are refused.
    pub fn validate_and_parse(image_url: &str) -> Result<Self> {
        let image = Self::parse(image_url)?;

        let tag = image.tag.as_deref().unwrap_or("");
        if tag.is_empty() && image.digest.is_none() {
            return Err(Error::missing_image_tag(image_url));
        }

        if DISALLOWED_TAGS.iter().any(|d| tag.eq_ignore_ascii_case(d)) {
            return Err(Error::disallowed_tag(image_url, tag));
        }

        Ok(image)
    }

    /// Deterministic artifact `(version, resource_name)` for this image
    pub fn version_and_name(&self) -> (String, String) {
        generate_version_and_name(self)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full)
    }
}

fn parse_sha256(reference: &str, digest: &str) -> Result<String> {
    let hex = digest
        .strip_prefix(SHA256_PREFIX)
        .ok_or_else(|| Error::invalid_reference(reference, "only sha256 digests are supported"))?;
    if hex.len() != SHA256_HEX_LENGTH {
        return Err(Error::invalid_reference(
            reference,
            format!("sha256 digest must have {} hex characters", SHA256_HEX_LENGTH),
        ));
    }
    Ok(hex.to_ascii_lowercase())
}

/// Derive the artifact version and resource name of an image.
///
/// With a digest the version carries `+sha256.<first 12 hex>` build metadata
/// and the resource name gets a `-<first 8 hex>` suffix. Non-semver tags become
/// a `0.0.0-<normalized tag>` prerelease.
pub fn generate_version_and_name(image: &ImageReference) -> (String, String) {
    let tag = image.tag.as_deref().filter(|t| !t.is_empty());

    match image.digest.as_deref() {
        Some(digest) => {
            let short_digest = &digest[..SHORT_DIGEST_LENGTH.min(digest.len())];
            let version = match tag {
                Some(tag) if is_semver(tag) => format!("{}+sha256.{}", tag, short_digest),
                Some(tag) => format!("0.0.0-{}+sha256.{}", normalize_tag(tag), short_digest),
                None => format!("0.0.0+sha256.{}", short_digest),
            };
            let name_suffix = &digest[..NAME_DIGEST_LENGTH.min(digest.len())];
            (version, format!("{}-{}", image.name, name_suffix))
        }
        None => {
            let version = match tag {
                Some(tag) if is_semver(tag) => tag.to_string(),
                Some(tag) => format!("0.0.0-{}", normalize_tag(tag)),
                None => "0.0.0-unknown".to_string(),
            };
            (version, image.name.clone())
        }
    }
}

/// Whether `tag` is a semantic version, optionally prefixed with `v`
pub fn is_semver(tag: &str) -> bool {
    Version::parse(tag.strip_prefix('v').unwrap_or(tag)).is_ok()
}

/// Make a tag usable as a semver prerelease identifier
pub fn normalize_tag(tag: &str) -> String {
    let replaced: String = tag
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = replaced.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "4fa3b8e2c1d0a9f8e7d6c5b4a3928170e1f2d3c4b5a6978812345678abcdef01";

    #[test]
    fn test_parse_various_formats() {
        let cases = [
            ("nginx:1.25", "nginx", "nginx", Some("1.25"), None),
            (
                "europe-docker.pkg.dev/kyma-project/prod/sample-manager:1.2.3",
                "europe-docker.pkg.dev/kyma-project/prod/sample-manager",
                "sample-manager",
                Some("1.2.3"),
                None,
            ),
            ("localhost:5000/app:v1", "localhost:5000/app", "app", Some("v1"), None),
            ("registry:5000/team/app:dev", "registry:5000/team/app", "app", Some("dev"), None),
        ];

        for (input, repository, name, tag, digest) in cases {
            let image = ImageReference::parse(input).unwrap_or_else(|e| panic!("{}: {}", input, e));
            assert_eq!(image.repository, repository, "repository for {}", input);
            assert_eq!(image.name, name, "name for {}", input);
            assert_eq!(image.tag.as_deref(), tag, "tag for {}", input);
            assert_eq!(image.digest.as_deref(), digest, "digest for {}", input);
            assert_eq!(image.full, input);
        }
    }

    #[test]
    fn test_parse_tag_and_digest() {
        let input = format!("ghcr.io/org/app:v1.0.0@sha256:{}", DIGEST.to_uppercase());
        let image = ImageReference::parse(&input).unwrap();
        assert_eq!(image.tag.as_deref(), Some("v1.0.0"));
        assert_eq!(image.digest.as_deref(), Some(DIGEST));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(ImageReference::parse(""), Err(Error::EmptyImageUrl)));
        assert!(matches!(
            ImageReference::parse("x"),
            Err(Error::NoTagOrDigest { .. })
        ));
        assert!(matches!(
            ImageReference::parse("Upper/Case:1.0"),
            Err(Error::InvalidReference { .. })
        ));
        assert!(matches!(
            ImageReference::parse("app:has space"),
            Err(Error::InvalidReference { .. })
        ));
        assert!(matches!(
            ImageReference::parse(&format!("app@sha512:{}", DIGEST)),
            Err(Error::InvalidReference { .. })
        ));
        assert!(matches!(
            ImageReference::parse("app@sha256:abcdef0123456789abcdef0123456789"),
            Err(Error::InvalidReference { .. })
        ));
        assert!(matches!(
            ImageReference::validate_and_parse("app:über1"),
            Err(Error::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_disallowed_tags_any_case() {
        for input in ["x:latest", "x:LATEST", "x:Latest", "x:main", "x:MAIN", "x:Main"] {
            assert!(
                matches!(
                    ImageReference::validate_and_parse(input),
                    Err(Error::DisallowedTag { .. })
                ),
                "{} should be disallowed",
                input
            );
        }
    }

    #[test]
    fn test_validate_and_parse_requires_tag_or_digest() {
        assert!(matches!(
            ImageReference::validate_and_parse("x"),
            Err(Error::NoTagOrDigest { .. })
        ));
        assert!(ImageReference::validate_and_parse("x:mainline").is_ok());
    }

    #[test]
    fn test_version_semver_tag_with_digest() {
        let image = ImageReference::parse(&format!("repo/app:1.2.3@sha256:{}", DIGEST)).unwrap();
        let (version, name) = generate_version_and_name(&image);
        assert_eq!(version, format!("1.2.3+sha256.{}", &DIGEST[..12]));
        assert_eq!(name, format!("app-{}", &DIGEST[..8]));
        assert_eq!(image.version_and_name(), (version, name));
    }

    #[test]
    fn test_version_non_semver_tag_with_digest() {
        let image = ImageReference::parse(&format!("repo/app:build_42@sha256:{}", DIGEST)).unwrap();
        let (version, _) = generate_version_and_name(&image);
        assert_eq!(version, format!("0.0.0-build-42+sha256.{}", &DIGEST[..12]));
    }

    #[test]
    fn test_version_digest_only() {
        let image = ImageReference::parse(&format!("repo/app@sha256:{}", DIGEST)).unwrap();
        let (version, name) = generate_version_and_name(&image);
        assert_eq!(version, format!("0.0.0+sha256.{}", &DIGEST[..12]));
        assert_eq!(name, "app-4fa3b8e2");
    }

    #[test]
    fn test_version_without_digest() {
        let semver = ImageReference::parse("repo/app:v2.0.0-rc.1").unwrap();
        assert_eq!(
            generate_version_and_name(&semver),
            ("v2.0.0-rc.1".to_string(), "app".to_string())
        );

        let plain = ImageReference::parse("repo/app:stable").unwrap();
        assert_eq!(
            generate_version_and_name(&plain),
            ("0.0.0-stable".to_string(), "app".to_string())
        );
    }

    #[test]
    fn test_is_semver() {
        assert!(is_semver("1.0.0"));
        assert!(is_semver("v1.0.0"));
        assert!(is_semver("1.0.0-alpha.1+build.5"));
        assert!(!is_semver("1.0"));
        assert!(!is_semver("01.0.0"));
        assert!(!is_semver("stable"));
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("feature/new_thing"), "feature-new-thing");
        assert_eq!(normalize_tag("_build_"), "build");
        assert_eq!(normalize_tag(".-v1-."), "v1");
        assert_eq!(normalize_tag("___"), "unknown");
        assert_eq!(normalize_tag("..--"), "unknown");

        let normalized = normalize_tag("-a!b@c#d$-");
        assert!(normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'));
        assert!(!normalized.starts_with(['-', '.']));
        assert!(!normalized.ends_with(['-', '.']));
    }
}
