//! Resource location resolution
//!
//! This module classifies a retrieval source as a remote URL or a local
//! filesystem path.

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Resource location - a URL or a file path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path, not yet checked by the path gate
    Path(PathBuf),
    /// Remote URL (http or https)
    Url(Url),
}

impl Location {
    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }
}

impl FromStr for Location {
    type Err = Error;

    /// `http://` and `https://` sources are URLs, `file://` URLs become
    /// paths, and anything else is taken as a path
    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(Location::Url(Url::parse(s)?));
        }

        if s.starts_with("file://") {
            let url = Url::parse(s)?;
            let path = url
                .to_file_path()
                .map_err(|_| Error::Resource(format!("invalid file URL: {}", s)))?;
            return Ok(Location::Path(path));
        }

        Ok(Location::Path(PathBuf::from(s)))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(p) => write!(f, "{}", p.display()),
            Location::Url(u) => write!(f, "{}", u),
        }
    }
}
