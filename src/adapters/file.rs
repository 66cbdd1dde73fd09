// SPDX-License-Identifier: MIT OR Apache-2.0

//! File and in-memory configuration getters.
//!
//! This module provides the getters used by the tools: one that reads a file,
//! one that serves bytes already in memory, and the default-location search
//! used when no file is named on the command line.

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigGetter;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Directory searched for the default configuration file.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/dbtools";

/// Base name of the default configuration file.
pub const DEFAULT_CONFIG_NAME: &str = "dbtools";

/// Extensions tried, in order, when searching for the default file.
///
/// `conf` comes last and is always decoded as TOML.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "conf"];

/// Getter that reads a configuration file.
///
/// A missing or unreadable file is an error, so the loader moves on to its
/// next getter.
///
/// # Examples
///
/// ```rust,no_run
/// use toolcfg::adapters::FileGetter;
/// use toolcfg::ports::ConfigGetter;
///
/// let getter = FileGetter::new("/etc/dbtools/dbtools.conf");
/// let bytes = getter.get_bytes().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileGetter {
    path: PathBuf,
}

impl FileGetter {
    /// Creates a getter for `path`. The file is read on each `get_bytes` call.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileGetter {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path this getter reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(path: &Path) -> &str {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>")
    }
}

impl ConfigGetter for FileGetter {
    fn name(&self) -> &str {
        "file"
    }

    fn get_bytes(&self) -> Result<Vec<u8>> {
        let metadata = fs::metadata(&self.path).map_err(|e| ConfigError::SourceError {
            source_name: self.name().to_string(),
            message: format!(
                "Invalid or inaccessible path: {}",
                self.path.display()
            ),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: self.name().to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_CONFIG_FILE_SIZE
                ),
                source: None,
            });
        }

        fs::read(&self.path).map_err(|e| ConfigError::SourceError {
            source_name: self.name().to_string(),
            message: format!(
                "Failed to read configuration file: {}",
                Self::file_name(&self.path)
            ),
            source: Some(Box::new(e)),
        })
    }

    fn origin(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Getter that serves a document held in memory.
#[derive(Debug, Clone, Default)]
pub struct BytesGetter {
    data: Vec<u8>,
}

impl BytesGetter {
    /// Creates a getter returning `data`.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        BytesGetter { data: data.into() }
    }
}

impl ConfigGetter for BytesGetter {
    fn name(&self) -> &str {
        "bytes"
    }

    fn get_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

/// Where to look for a configuration file nobody named explicitly.
///
/// Each directory is searched in order for `name` with each of
/// [`DEFAULT_EXTENSIONS`]. The first existing file wins.
///
/// # Examples
///
/// ```rust
/// use toolcfg::adapters::ConfigLocations;
///
/// let locations = ConfigLocations::new(vec!["/nonexistent".into()], "tools");
/// assert!(locations.find().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
    dirs: Vec<PathBuf>,
    name: String,
}

impl ConfigLocations {
    /// Creates a search over `dirs` for files called `name`.
    pub fn new(dirs: Vec<PathBuf>, name: impl Into<String>) -> Self {
        ConfigLocations {
            dirs,
            name: name.into(),
        }
    }

    /// Appends the OS-appropriate per-user configuration directory.
    ///
    /// This method uses the `directories` crate to determine the appropriate
    /// configuration directory for the current operating system. Nothing is added
    /// when no home directory can be determined.
    pub fn with_user_dir(mut self, qualifier: &str, app_name: &str) -> Self {
        if let Some(proj_dirs) = ProjectDirs::from(qualifier, "", app_name) {
            self.dirs.push(proj_dirs.config_dir().to_path_buf());
        }
        self
    }

    /// Returns the directories searched, in order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Returns the base file name searched for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the first existing candidate file.
    pub fn find(&self) -> Option<PathBuf> {
        self.dirs
            .iter()
            .flat_map(|dir| {
                DEFAULT_EXTENSIONS
                    .iter()
                    .map(move |ext| dir.join(format!("{}.{}", self.name, ext)))
            })
            .find(|candidate| {
                tracing::trace!("Looking for configuration file at {}", candidate.display());
                candidate.is_file()
            })
    }
}

impl Default for ConfigLocations {
    fn default() -> Self {
        ConfigLocations::new(vec![PathBuf::from(DEFAULT_CONFIG_DIR)], DEFAULT_CONFIG_NAME)
            .with_user_dir("", DEFAULT_CONFIG_NAME)
    }
}
