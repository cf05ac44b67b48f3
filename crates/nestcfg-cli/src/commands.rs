//! Subcommand implementations.
//!
//! Each command loads the config file into a [`ConfigTree`], applies one
//! query or mutation, and (for mutations) writes the file back.  Commands
//! return their output as a `String` instead of printing so they can be tested
//! without capturing stdout.

use std::path::Path;

use nestcfg_core::{
    ConfigStorage, ConfigTree, EntryId, EntryValue, FileStorage, StorageError, TreeError,
};
use thiserror::Error;
use tracing::info;

/// Errors produced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Options for [`Commands::set`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOptions {
    /// Store the value as a string even if it looks like a number.
    pub force_string: bool,
    /// Create missing parent headers first.
    pub create_parents: bool,
}

/// Runs commands against one storage backend with a fixed write indentation.
pub struct Commands<'a, S: ConfigStorage + ?Sized = FileStorage> {
    storage: &'a S,
    indent: String,
}

impl<'a, S: ConfigStorage + ?Sized> Commands<'a, S> {
    pub fn new(storage: &'a S, indent: impl Into<String>) -> Self {
        Self {
            storage,
            indent: indent.into(),
        }
    }

    fn load(&self, file: &Path) -> Result<ConfigTree, CommandError> {
        let mut tree = ConfigTree::new();
        tree.load_from(self.storage, file)?;
        Ok(tree)
    }

    fn store(&self, tree: &mut ConfigTree, file: &Path) -> Result<(), CommandError> {
        tree.save_to(self.storage, file, Some(&self.indent))?;
        Ok(())
    }

    /// Prints the value at `entry_path`.
    ///
    /// Numbers and strings print their value; headers list their direct
    /// children, one per line, with a trailing `/` on nested headers.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if nothing exists at `entry_path`.
    pub fn get(&self, file: &Path, entry_path: &str) -> Result<String, CommandError> {
        let tree = self.load(file)?;
        let entry = tree
            .get_entry(entry_path)
            .ok_or_else(|| TreeError::NotFound {
                path: nestcfg_core::path::normalize(entry_path).to_string(),
            })?;

        let output = match entry.value() {
            EntryValue::Number(n) => format!("{n}\n"),
            EntryValue::String(s) => format!("{s}\n"),
            EntryValue::Header | EntryValue::Comment => {
                let mut out = String::new();
                let children = entry.children().iter().filter_map(|&id| tree.entry(id));
                for child in children.filter(|c| !c.is_comment()) {
                    out.push_str(child.name());
                    if child.is_header() {
                        out.push('/');
                    }
                    out.push('\n');
                }
                out
            }
        };
        Ok(output)
    }

    /// Stores `raw_value` at `entry_path` and saves the file.
    ///
    /// The value is stored as a number when it parses as a finite number and
    /// `force_string` is off; otherwise as a string.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if the parent header is missing and
    /// `create_parents` is off, plus any load/save failure.
    pub fn set(
        &self,
        file: &Path,
        entry_path: &str,
        raw_value: &str,
        options: SetOptions,
    ) -> Result<(), CommandError> {
        let mut tree = self.load(file)?;

        if options.create_parents {
            tree.create_header(&nestcfg_core::path::parent(entry_path))?;
        }

        let number = raw_value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && !options.force_string);
        match number {
            Some(n) => tree.set_number(entry_path, n)?,
            None => tree.set_string(entry_path, raw_value)?,
        };

        info!("set '{entry_path}' in {}", file.display());
        self.store(&mut tree, file)
    }

    /// Creates headers along `entry_path` and saves the file.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotAHeader`] if a segment already exists as a value, plus
    /// any load/save failure.
    pub fn create_header(&self, file: &Path, entry_path: &str) -> Result<(), CommandError> {
        let mut tree = self.load(file)?;
        tree.create_header(entry_path)?;
        self.store(&mut tree, file)
    }

    /// Re-writes `file` (or writes to `output`) with regenerated indentation.
    ///
    /// # Errors
    ///
    /// Any load/save failure.
    pub fn fmt(&self, file: &Path, output: Option<&Path>) -> Result<(), CommandError> {
        let mut tree = self.load(file)?;
        self.store(&mut tree, output.unwrap_or(file))
    }

    /// Renders an outline of the tree with each entry's kind.
    ///
    /// Comments are left out.
    ///
    /// # Errors
    ///
    /// Any load failure.
    pub fn outline(&self, file: &Path) -> Result<String, CommandError> {
        let tree = self.load(file)?;
        let mut out = String::new();
        outline_children(&tree, EntryId::ROOT, 0, &mut out);
        Ok(out)
    }
}

fn outline_children(tree: &ConfigTree, parent: EntryId, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    for (id, entry) in tree.children(parent) {
        match entry.value() {
            EntryValue::Header => {
                out.push_str(&format!("{pad}{}/\n", entry.name()));
                outline_children(tree, id, depth + 1, out);
            }
            EntryValue::Number(n) => {
                out.push_str(&format!("{pad}{} = {n} (number)\n", entry.name()));
            }
            EntryValue::String(s) => {
                out.push_str(&format!("{pad}{} = {s:?} (string)\n", entry.name()));
            }
            EntryValue::Comment => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
