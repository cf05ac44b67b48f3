//! The config tree domain entity.
//!
//! [`ConfigTree`] owns every [`Entry`] in an arena whose first slot is the
//! `ROOT` header.  Entries are addressed either by [`EntryId`] or by a
//! slash-delimited path resolved from the root (see [`crate::path`]).

use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::domain::entry::{Entry, EntryId, EntryKind, EntryValue};
use crate::domain::path;
use crate::format::{parser, writer};
use crate::format::parser::ParseError;

/// Name of the implicit top-level header.
pub const ROOT_NAME: &str = "ROOT";

/// Indentation used by [`ConfigTree::to_config_string`] until another one is set.
pub const DEFAULT_INDENT: &str = "\t";

/// Characters that would make a name unparseable once written back to text.
const RESERVED_NAME_CHARS: &[char] = &['=', '[', ']', '#', '/', '"', '\n', '\r'];

/// Errors returned by path lookups and mutations.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    /// Nothing exists at the given path.
    #[error("config entry not found: '{path}'")]
    NotFound { path: String },

    /// The entry exists but holds a different kind of value.
    #[error("config entry '{path}' is a {found}, expected a {expected}")]
    KindMismatch {
        path: String,
        expected: EntryKind,
        found: EntryKind,
    },

    /// A path segment that must contain subentries is not a header.
    #[error("config entry '{path}' is a {found} and cannot hold subentries")]
    NotAHeader { path: String, found: EntryKind },

    /// The name is empty or contains characters reserved by the file format.
    #[error("invalid entry name: '{0}'")]
    InvalidName(String),

    /// The value cannot be written back to a config file.
    #[error("invalid value for '{path}': {reason}")]
    InvalidValue { path: String, reason: &'static str },
}

/// A rooted tree of config entries.
///
/// # Examples
///
/// ```rust
/// use nestcfg_core::ConfigTree;
///
/// let mut tree = ConfigTree::new();
/// tree.create_header("Window").unwrap();
/// tree.set_number("Window/width", 800.0).unwrap();
/// tree.set_string("Window/title", "My App").unwrap();
///
/// assert_eq!(tree.get_number("Window/width").unwrap(), 800.0);
/// assert_eq!(tree.get_string("/ROOT/Window/title/").unwrap(), "My App");
/// ```
#[derive(Debug, Clone)]
pub struct ConfigTree {
    /// Slot 0 is always the root header.
    entries: Vec<Entry>,
    /// Indentation unit used when writing; one copy per nesting level.
    indent: String,
}

impl ConfigTree {
    /// Creates a tree containing only the `ROOT` header.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::new(ROOT_NAME, EntryValue::Header, None)],
            indent: DEFAULT_INDENT.to_string(),
        }
    }

    /// The root header.
    pub fn root(&self) -> &Entry {
        &self.entries[EntryId::ROOT.0]
    }

    /// Looks up an entry by id.
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    /// Number of entries in the tree, including the root and comments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the root has no children.
    pub fn is_empty(&self) -> bool {
        self.root().children.is_empty()
    }

    /// Iterates the direct children of `id` in file order.
    ///
    /// Yields nothing for an unknown id or a leaf.
    pub fn children(&self, id: EntryId) -> impl Iterator<Item = (EntryId, &Entry)> + '_ {
        self.entries
            .get(id.0)
            .into_iter()
            .flat_map(move |e| e.children.iter().map(move |&c| (c, &self.entries[c.0])))
    }

    /// Indentation unit used when writing the tree.
    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn set_indent(&mut self, indent: impl Into<String>) {
        self.indent = indent.into();
    }

    /// Builds the normalized path of an entry, `"ROOT"` for the root itself.
    pub fn path_of(&self, id: EntryId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.entries.get(id.0)?;
        while let Some(parent) = current.parent {
            names.push(current.name.as_str());
            current = &self.entries[parent.0];
        }
        if names.is_empty() {
            return Some(ROOT_NAME.to_string());
        }
        names.reverse();
        Some(names.join("/"))
    }

    // ── Lookup ────────────────────────────────────────────────────────────────

    /// Resolves `path` to an entry id.
    ///
    /// Each segment is matched case-sensitively against the names of the
    /// current header's direct children; the first match wins.  Comment lines
    /// are never matched.  Returns `None` if any segment is missing or an
    /// intermediate segment is not a header.
    pub fn find(&self, path: &str) -> Option<EntryId> {
        let mut current = EntryId::ROOT;
        for name in path::segments(path) {
            if !self.entries[current.0].is_header() {
                return None;
            }
            current = self.child_named(current, name)?;
        }
        Some(current)
    }

    /// Resolves `path` to an entry.  `"ROOT"` and `""` return the root.
    pub fn get_entry(&self, path: &str) -> Option<&Entry> {
        self.find(path).map(|id| &self.entries[id.0])
    }

    /// Returns the value of the `Number` entry at `path`.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if nothing is at `path`, and
    /// [`TreeError::KindMismatch`] if the entry is not a number.
    pub fn get_number(&self, path: &str) -> Result<f64, TreeError> {
        let entry = self.require(path)?;
        entry.as_number().ok_or_else(|| TreeError::KindMismatch {
            path: path::normalize(path).to_string(),
            expected: EntryKind::Number,
            found: entry.kind(),
        })
    }

    /// Returns the value of the `String` entry at `path`.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if nothing is at `path`, and
    /// [`TreeError::KindMismatch`] if the entry is not a string.
    pub fn get_string(&self, path: &str) -> Result<&str, TreeError> {
        let entry = self.require(path)?;
        entry.as_str().ok_or_else(|| TreeError::KindMismatch {
            path: path::normalize(path).to_string(),
            expected: EntryKind::String,
            found: entry.kind(),
        })
    }

    fn require(&self, path: &str) -> Result<&Entry, TreeError> {
        self.get_entry(path).ok_or_else(|| {
            debug!(
                "could not find '{}' at the path '{}'",
                path::leaf(path),
                path::normalize(path)
            );
            TreeError::NotFound {
                path: path::normalize(path).to_string(),
            }
        })
    }

    fn child_named(&self, parent: EntryId, name: &str) -> Option<EntryId> {
        self.entries[parent.0]
            .children
            .iter()
            .copied()
            .find(|c| {
                let child = &self.entries[c.0];
                !child.is_comment() && child.name == name
            })
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    /// Stores a number at `path`, creating the entry if needed.
    ///
    /// An existing string entry is converted to a number.  A missing entry is
    /// appended as the last child of its parent header, which must exist.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if the parent header does not exist,
    /// [`TreeError::KindMismatch`] if `path` names a header, and
    /// [`TreeError::InvalidValue`] for NaN or infinite values.
    pub fn set_number(&mut self, path: &str, value: f64) -> Result<EntryId, TreeError> {
        if !value.is_finite() {
            return Err(TreeError::InvalidValue {
                path: path::normalize(path).to_string(),
                reason: "numbers must be finite",
            });
        }
        self.set_leaf(path, EntryValue::Number(value))
    }

    /// Stores a string at `path`, creating the entry if needed.
    ///
    /// Same creation rules as [`ConfigTree::set_number`].
    ///
    /// # Errors
    ///
    /// As for [`ConfigTree::set_number`]; line breaks in `value` are rejected
    /// with [`TreeError::InvalidValue`].
    pub fn set_string(&mut self, path: &str, value: impl Into<String>) -> Result<EntryId, TreeError> {
        let value = value.into();
        if value.contains(['\n', '\r']) {
            return Err(TreeError::InvalidValue {
                path: path::normalize(path).to_string(),
                reason: "strings cannot span multiple lines",
            });
        }
        self.set_leaf(path, EntryValue::String(value))
    }

    fn set_leaf(&mut self, path: &str, value: EntryValue) -> Result<EntryId, TreeError> {
        let normalized = path::normalize(path);

        if let Some(id) = self.find(normalized) {
            let entry = &mut self.entries[id.0];
            if entry.is_header() {
                return Err(TreeError::KindMismatch {
                    path: normalized.to_string(),
                    expected: value.kind(),
                    found: EntryKind::Header,
                });
            }
            entry.value = value;
            return Ok(id);
        }

        let parent_path = path::parent(normalized);
        let Some(parent) = self.find(&parent_path) else {
            debug!(
                "could not find header '{}' when setting '{}'",
                parent_path,
                path::leaf(normalized)
            );
            return Err(TreeError::NotFound { path: parent_path });
        };
        let parent_kind = self.entries[parent.0].kind();
        if parent_kind != EntryKind::Header {
            return Err(TreeError::NotAHeader {
                path: parent_path,
                found: parent_kind,
            });
        }

        let name = path::leaf(normalized);
        validate_name(name)?;
        Ok(self.push_child(parent, name, value))
    }

    /// Creates every missing header along `path` and returns the last one.
    ///
    /// Existing headers are reused, so calling this twice with the same path
    /// creates nothing the second time.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotAHeader`] if a segment already exists as a value, and
    /// [`TreeError::InvalidName`] for names the file format cannot hold.
    pub fn create_header(&mut self, path: &str) -> Result<EntryId, TreeError> {
        let segments = path::segments(path);
        let mut current = EntryId::ROOT;

        for (depth, name) in segments.iter().enumerate() {
            match self.child_named(current, name) {
                Some(id) if self.entries[id.0].is_header() => current = id,
                Some(id) => {
                    return Err(TreeError::NotAHeader {
                        path: segments[..=depth].join("/"),
                        found: self.entries[id.0].kind(),
                    });
                }
                None => {
                    validate_name(name)?;
                    current = self.push_child(current, *name, EntryValue::Header);
                    debug!("created header '{}'", segments[..=depth].join("/"));
                }
            }
        }
        Ok(current)
    }

    /// Appends a child without any validation; used by the parser.
    pub(crate) fn push_child(
        &mut self,
        parent: EntryId,
        name: impl Into<String>,
        value: EntryValue,
    ) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(Entry::new(name, value, Some(parent)));
        self.entries[parent.0].children.push(id);
        id
    }

    /// Drops everything except the root header.
    pub(crate) fn clear(&mut self) {
        self.entries.truncate(1);
        self.entries[EntryId::ROOT.0].children.clear();
    }

    // ── Text conversion ───────────────────────────────────────────────────────

    /// Replaces the tree's contents with the entries parsed from `text`.
    ///
    /// On error the entries parsed before the failing line are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for structural problems in `text`.
    pub fn load_str(&mut self, text: &str) -> Result<(), ParseError> {
        self.clear();
        parser::parse_into(self, text)
    }

    /// Serializes the tree using the stored indentation.
    pub fn to_config_string(&self) -> String {
        writer::write_tree(self, &self.indent)
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ConfigTree {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tree = ConfigTree::new();
        tree.load_str(s)?;
        Ok(tree)
    }
}

fn validate_name(name: &str) -> Result<(), TreeError> {
    if name.trim().is_empty() || name.trim() != name || name.contains(RESERVED_NAME_CHARS) {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
