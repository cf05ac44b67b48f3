//! Config tree entries.
//!
//! An [`Entry`] is one node of the tree: a header, a numeric value, a string
//! value, or a comment/blank line kept verbatim so it can be written back out.

use std::fmt;

/// Index of an [`Entry`] inside its owning [`crate::ConfigTree`].
///
/// Ids are only meaningful for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) usize);

impl EntryId {
    /// Id of the `ROOT` header; always the first slot of the arena.
    pub const ROOT: EntryId = EntryId(0);

    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The four kinds of entry a config file can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Number,
    String,
    Header,
    Comment,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Header => write!(f, "header"),
            Self::Comment => write!(f, "comment"),
        }
    }
}

/// The typed payload of an entry.
///
/// Only leaves carry data; headers and comments are described entirely by the
/// entry's name (and, for headers, its children).
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    Number(f64),
    String(String),
    Header,
    Comment,
}

impl EntryValue {
    /// Returns the [`EntryKind`] tag for this value.
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Number(_) => EntryKind::Number,
            Self::String(_) => EntryKind::String,
            Self::Header => EntryKind::Header,
            Self::Comment => EntryKind::Comment,
        }
    }
}

/// One node in the config tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Header name or key.  For comments, the raw source line.
    pub(crate) name: String,
    pub(crate) value: EntryValue,
    pub(crate) parent: Option<EntryId>,
    pub(crate) children: Vec<EntryId>,
}

impl Entry {
    pub(crate) fn new(name: impl Into<String>, value: EntryValue, parent: Option<EntryId>) -> Self {
        Self {
            name: name.into(),
            value,
            parent,
            children: Vec::new(),
        }
    }

    /// Header name, key, or (for comments) the verbatim source line.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.value.kind()
    }

    pub fn value(&self) -> &EntryValue {
        &self.value
    }

    /// The enclosing header, or `None` for the root.
    pub fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    /// Child ids in file order.  Always empty for non-header entries.
    pub fn children(&self) -> &[EntryId] {
        &self.children
    }

    pub fn is_header(&self) -> bool {
        matches!(self.value, EntryValue::Header)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.value, EntryValue::Comment)
    }

    /// Returns the numeric value if this is a `Number` entry.
    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            EntryValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the string value if this is a `String` entry.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            EntryValue::String(s) => Some(s),
            _ => None,
        }
    }
}
