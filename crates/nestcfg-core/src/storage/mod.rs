//! Loading and saving config trees.
//!
//! File access goes through the [`ConfigStorage`] trait so the tree logic can
//! be exercised without touching the file system:
//!
//! - [`FileStorage`] reads and writes real files with `std::fs`.
//! - [`mock::MemoryStorage`] keeps "files" in a map, for tests.
//!
//! Reading is all-or-nothing: the whole file is read before the tree is
//! touched, so an I/O failure leaves the tree unchanged.  A parse failure, on
//! the other hand, leaves whatever was parsed before the bad line.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

use crate::domain::tree::ConfigTree;
use crate::format::parser::ParseError;

pub mod mock;

/// Error type for [`ConfigTree::load`] and [`ConfigTree::save`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file could not be read or written.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but its contents are malformed.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// String-level access to config files.
pub trait ConfigStorage {
    /// Reads the whole file at `path`.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    /// Replaces the file at `path` with `contents`, creating it if needed.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`ConfigStorage`] backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

impl ConfigStorage for FileStorage {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        // Ensure directory exists before writing.
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, contents)
    }
}

impl ConfigTree {
    /// Replaces the tree's contents with the config file at `path`.
    ///
    /// # Errors
    ///
    /// [`StorageError::Io`] if the file cannot be read (the tree is left
    /// unchanged), [`StorageError::Parse`] if it is malformed (the tree keeps
    /// the entries parsed before the error).
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.load_from(&FileStorage, path)
    }

    /// Like [`ConfigTree::load`], reading through `storage`.
    ///
    /// # Errors
    ///
    /// See [`ConfigTree::load`].
    pub fn load_from<S>(&mut self, storage: &S, path: impl AsRef<Path>) -> Result<(), StorageError>
    where
        S: ConfigStorage + ?Sized,
    {
        let path = path.as_ref();
        info!("loading config: {}", path.display());

        let text = storage.read_to_string(path).map_err(|source| {
            error!("could not open config file {}: {source}", path.display());
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        self.load_str(&text).map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the tree to `path`.
    ///
    /// When `indent` is given it replaces the stored indentation and is kept
    /// for later saves; otherwise the stored one is used (a tab by default).
    ///
    /// # Errors
    ///
    /// [`StorageError::Io`] if the file cannot be written.
    pub fn save(&mut self, path: impl AsRef<Path>, indent: Option<&str>) -> Result<(), StorageError> {
        self.save_to(&FileStorage, path, indent)
    }

    /// Like [`ConfigTree::save`], writing through `storage`.
    ///
    /// # Errors
    ///
    /// See [`ConfigTree::save`].
    pub fn save_to<S>(
        &mut self,
        storage: &S,
        path: impl AsRef<Path>,
        indent: Option<&str>,
    ) -> Result<(), StorageError>
    where
        S: ConfigStorage + ?Sized,
    {
        if let Some(indent) = indent {
            self.set_indent(indent);
        }

        let path = path.as_ref();
        info!("saving config: {}", path.display());

        let content = self.to_config_string();
        storage.write(path, &content).map_err(|source| {
            error!("could not write config file {}: {source}", path.display());
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
