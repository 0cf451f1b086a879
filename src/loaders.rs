//! Resource loading utilities
//!
//! This module retrieves schema text from a URL or a local file and
//! optionally saves it to disk. Every local read and write goes through the
//! path gate in [`crate::paths`] first.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;
use crate::paths::{normalize_and_confine, validate_read_path, validate_write_path};
use crate::validators::helpers::BYTE_ORDER_MARK;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Default budget for a remote fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `Accept` header sent with remote fetches
pub const ACCEPT_XML: &str = "application/xml, text/xml, */*";

/// Schema text obtained by [`Loader::retrieve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieved {
    /// Retrieved text
    pub content: String,
    /// Where the text was saved, if a save path was given
    pub saved_to: Option<PathBuf>,
}

impl Retrieved {
    /// Whether the content was written to disk
    pub fn saved_to_file(&self) -> bool {
        self.saved_to.is_some()
    }
}

/// Resource loader for schemas
#[derive(Debug, Clone)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
    /// Whether to allow remote resources
    allow_remote: bool,
    /// Directory all local reads and writes are confined to
    sandbox_root: Option<PathBuf>,
    /// Remote fetch timeout
    timeout: Duration,
    /// Whether to create missing parent directories when saving
    create_dirs: bool,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            allow_remote: true,
            sandbox_root: None,
            timeout: DEFAULT_TIMEOUT,
            create_dirs: false,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set whether to allow remote resources
    pub fn with_allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    /// Confine local reads and writes to a directory
    pub fn with_sandbox_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sandbox_root = Some(root.into());
        self
    }

    /// Set the remote fetch timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set whether saving creates missing parent directories
    pub fn with_create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }

    /// Resource limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Remote fetch timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sandbox root, if any
    pub fn sandbox_root(&self) -> Option<&Path> {
        self.sandbox_root.as_deref()
    }

    /// Retrieve schema text from a URL or path, saving it when asked
    pub fn retrieve(&self, source: &str, save_path: Option<&str>) -> Result<Retrieved> {
        let location: Location = source.parse()?;
        let content = self.load(&location)?;

        if !looks_like_schema(&content) {
            return Err(Error::Resource(
                "retrieved content does not appear to be valid XML/XSD".to_string(),
            ));
        }

        let saved_to = save_path
            .map(|path| self.save(path, &content))
            .transpose()?;

        info!(
            source = %location,
            bytes = content.len(),
            saved = saved_to.is_some(),
            "retrieved schema"
        );
        Ok(Retrieved { content, saved_to })
    }

    /// Load a resource as a string
    pub fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::Path(path) => {
                let path = validate_read_path(path, self.sandbox_root())?;

                // Check size limits before reading
                let size = fs::metadata(&path)?.len();
                self.limits
                    .check_xml_size(usize::try_from(size).unwrap_or(usize::MAX))?;

                fs::read_to_string(&path).map_err(|e| {
                    Error::Resource(format!("failed to read file '{}': {}", path.display(), e))
                })
            }
            Location::Url(url) => {
                if !self.allow_remote {
                    return Err(Error::Resource(
                        "remote resources are not allowed".to_string(),
                    ));
                }

                let content = self.fetch(url)?;
                self.limits.check_xml_size(content.len())?;
                Ok(content)
            }
        }
    }

    /// Write schema text to a gated path, returning the resolved path
    pub fn save(&self, path: &str, content: &str) -> Result<PathBuf> {
        if self.create_dirs {
            let resolved = normalize_and_confine(path, self.sandbox_root())?;
            if let Some(parent) = resolved.parent() {
                fs::create_dir_all(parent)?;
            }
        }

        let target = validate_write_path(path, self.sandbox_root())?;
        fs::write(&target, content)?;

        info!(path = %target.display(), bytes = content.len(), "saved schema");
        Ok(target)
    }

    #[cfg(feature = "remote")]
    fn fetch(&self, url: &Url) -> Result<String> {
        let http = |e: reqwest::Error| Error::Resource(format!("failed to fetch {}: {}", url, e));

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(http)?;

        client
            .get(url.as_str())
            .header(reqwest::header::ACCEPT, ACCEPT_XML)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(http)
    }

    #[cfg(not(feature = "remote"))]
    fn fetch(&self, url: &Url) -> Result<String> {
        Err(Error::Resource(format!(
            "cannot fetch {}: remote retrieval requires the `remote` feature",
            url
        )))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheap check that retrieved text is XML or an XSD worth handing on
pub fn looks_like_schema(content: &str) -> bool {
    content
        .trim_start_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
        .starts_with("<?xml")
        || ["<schema", "<xs:schema", "<xsd:schema"]
            .iter()
            .any(|tag| content.contains(tag))
}
