//! End-to-end module packaging
//!
//! Drives the stages in order: read and validate the module config, resolve
//! the referenced files, scan the manifest for images, determine the default
//! CR scope, assemble resources and sources, encode and publish the
//! descriptor, verify the manager image and render the module template.
//! Temp files created while resolving are cleaned up exactly once, whether
//! the run succeeds or fails.

use crate::descriptor::{ArchivePublisher, ComponentDescriptor, DescriptorCodec, SCHEMA_V2};
use crate::error::{Error, Result};
use crate::git::GitMetadata;
use crate::resources::{ResolvedResource, ResourceSetBuilder};
use crate::security::SecurityScanConfig;
use crate::templates::{ModuleTemplateRenderer, TemplateInput};
use camino::Utf8Path;
use modpack_core::manifest::{parse_documents, read_documents};
use modpack_core::{
    CrdScopeResolver, FileReference, FileResolver, ModuleConfig, ModuleConfigReader,
    PackagerSettings, SchemaValidator,
};
use modpack_image::{ImageVersionVerifier, ManifestImageScanner};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Per-run packaging options
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// Descriptor schema version handed to the codec
    pub schema_version: String,
    /// Skip the manager image version check
    pub skip_verify: bool,
    /// Repository to read git metadata from (defaults to the config's directory)
    pub repository_path: Option<PathBuf>,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_V2.to_string(),
            skip_verify: false,
            repository_path: None,
        }
    }
}

/// Result of a packaging run
#[derive(Debug)]
pub struct PackagedModule {
    pub config: ModuleConfig,
    pub descriptor: ComponentDescriptor,
    /// Descriptor as produced by the codec
    pub encoded_descriptor: Value,
    /// Every container image registered as a resource
    pub images: BTreeSet<String>,
    pub cluster_scoped: bool,
    /// Rendered ModuleTemplate document
    pub template: String,
    /// Temp files that could not be removed
    pub cleanup_errors: Vec<std::io::Error>,
}

/// Files resolved for one run
struct ResolvedFiles {
    manifest: PathBuf,
    default_cr: Option<PathBuf>,
    security: Option<PathBuf>,
}

/// Packages modules using the given collaborators
pub struct ModulePackager {
    settings: PackagerSettings,
    schema_validator: SchemaValidator,
    codec: Box<dyn DescriptorCodec>,
    git: Box<dyn GitMetadata>,
    publisher: Option<Box<dyn ArchivePublisher>>,
}

impl ModulePackager {
    pub fn new(
        settings: PackagerSettings,
        codec: Box<dyn DescriptorCodec>,
        git: Box<dyn GitMetadata>,
    ) -> Result<Self> {
        Ok(Self {
            settings,
            schema_validator: SchemaValidator::new()?,
            codec,
            git,
            publisher: None,
        })
    }

    /// Publish the component archive as part of each run
    pub fn with_publisher(mut self, publisher: Box<dyn ArchivePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Package the module described by the config file at `config_path`
    pub async fn package(
        &self,
        config_path: &Utf8Path,
        options: &PackageOptions,
    ) -> Result<PackagedModule> {
        let reader = ModuleConfigReader::new(&self.schema_validator, &self.settings.naming);
        let config = reader.read_and_validate(config_path)?;
        info!("Packaging module {} version {}", config.name, config.version);

        let base_dir = config_path
            .parent()
            .map(|p| p.as_std_path().to_path_buf())
            .unwrap_or_default();

        self.package_config(config, &base_dir, options).await
    }

    /// Package an already validated module config.
    ///
    /// Relative references are resolved against `base_dir`.
    pub async fn package_config(
        &self,
        config: ModuleConfig,
        base_dir: &Path,
        options: &PackageOptions,
    ) -> Result<PackagedModule> {
        let mut resolver = FileResolver::new(&self.settings)?;
        let result = self.run(&config, base_dir, &mut resolver, options).await;

        let cleanup_errors = resolver.cleanup_temp_files();
        for err in &cleanup_errors {
            warn!("Temp file cleanup failed: {}", err);
        }

        let mut packaged = result?;
        packaged.cleanup_errors = cleanup_errors;
        info!("Packaged module {}", config.template_name());
        Ok(packaged)
    }

    async fn run(
        &self,
        config: &ModuleConfig,
        base_dir: &Path,
        resolver: &mut FileResolver,
        options: &PackageOptions,
    ) -> Result<PackagedModule> {
        let files = Self::resolve_files(config, base_dir, resolver).await?;

        let documents = read_documents(&files.manifest)?;
        let mut images = ManifestImageScanner::new().extract_images(&documents)?;

        let security = match &files.security {
            Some(path) => {
                let security = SecurityScanConfig::from_file(path)?;
                security.merge_images(&mut images)?;
                Some(security)
            }
            None => None,
        };
        info!("Found {} container images", images.len());

        let cluster_scoped = CrdScopeResolver::new()
            .is_cluster_scoped(files.default_cr.as_deref(), &files.manifest)?;

        let builder = ResourceSetBuilder::new(&self.settings);
        let mut resources: Vec<ResolvedResource> =
            builder.build_resources(config, &files.manifest, files.default_cr.as_deref())?;
        resources.extend(builder.build_image_resources(&images)?);

        let mut descriptor = ComponentDescriptor::new(
            &config.name,
            &config.version,
            &self.settings.naming.provider,
        );
        descriptor.resources = resources;

        let repo = options.repository_path.as_deref().unwrap_or(base_dir);
        let repo = if repo.as_os_str().is_empty() { Path::new(".") } else { repo };
        let commit = self.git.latest_commit(repo).await?;
        let security_labels = security
            .as_ref()
            .map(|s| s.labels(&self.settings.labels))
            .unwrap_or_else(BTreeMap::new);
        builder.add_git_source(&mut descriptor, &config.repository, &commit, security_labels);

        self.codec.validate(&descriptor)?;
        let encoded_descriptor = self.codec.convert(&descriptor, &options.schema_version)?;

        if let Some(publisher) = &self.publisher {
            let blobs = descriptor.local_blobs();
            info!("Publishing component archive with {} local blobs", blobs.len());
            publisher
                .publish(&descriptor, &blobs)
                .await
                .map_err(|e| match e {
                    Error::PublishFailed { .. } => e,
                    other => Error::publish_failed(other.to_string()),
                })?;
        }

        if options.skip_verify {
            debug!("Skipping manager image verification");
        } else {
            ImageVersionVerifier::new().verify(config, &files.manifest)?;
        }

        let default_cr = match &files.default_cr {
            Some(path) => Some(Self::read_default_cr(path)?),
            None => None,
        };

        let renderer = ModuleTemplateRenderer::new(&self.settings)?;
        let template = renderer.render(&TemplateInput {
            config,
            descriptor: &encoded_descriptor,
            default_cr: default_cr.as_ref(),
            cluster_scoped,
            manifest_url: config.manifest.url().map(|u| u.as_str()),
        })?;

        Ok(PackagedModule {
            config: config.clone(),
            descriptor,
            encoded_descriptor,
            images,
            cluster_scoped,
            template,
            cleanup_errors: Vec::new(),
        })
    }

    async fn resolve_files(
        config: &ModuleConfig,
        base_dir: &Path,
        resolver: &mut FileResolver,
    ) -> Result<ResolvedFiles> {
        let manifest = resolver.resolve(&config.manifest, base_dir).await?;
        let default_cr = Self::resolve_optional(&config.default_cr, base_dir, resolver).await?;
        let security = Self::resolve_optional(&config.security, base_dir, resolver).await?;

        debug!(
            "Resolved manifest {}, default CR {:?}, security config {:?}",
            manifest.display(),
            default_cr,
            security
        );
        Ok(ResolvedFiles {
            manifest,
            default_cr,
            security,
        })
    }

    async fn resolve_optional(
        reference: &FileReference,
        base_dir: &Path,
        resolver: &mut FileResolver,
    ) -> Result<Option<PathBuf>> {
        if reference.is_empty() {
            return Ok(None);
        }
        Ok(Some(resolver.resolve(reference, base_dir).await?))
    }

    fn read_default_cr(path: &Path) -> Result<Value> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| modpack_core::Error::default_cr_read_failed(&display, e.to_string()))?;
        let document = parse_documents(&content)
            .map_err(|e| modpack_core::Error::default_cr_read_failed(&display, e.to_string()))?
            .into_iter()
            .next()
            .ok_or(Error::EmptyDefaultCr { path: display })?;
        Ok(document.into_value())
    }
}
