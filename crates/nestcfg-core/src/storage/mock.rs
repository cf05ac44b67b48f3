//! In-memory config storage for unit testing.
//!
//! Allows tests to load and save trees without touching the file system.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::ConfigStorage;

/// A [`ConfigStorage`] that keeps file contents in a map keyed by path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<PathBuf, String>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `contents` at `path`, replacing any previous file.
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.as_ref().to_path_buf(), contents.into());
    }

    /// Returns the current contents of `path`, if it exists.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .expect("lock poisoned")
            .get(path.as_ref())
            .cloned()
    }

    /// Makes every subsequent write fail with a permission error.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().expect("lock poisoned") = fail;
    }
}

impl ConfigStorage for MemoryStorage {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if *self.fail_writes.lock().expect("lock poisoned") {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "writes disabled",
            ));
        }
        self.insert(path, contents);
        Ok(())
    }
}
