//! Domain model for configuration trees.
//!
//! Everything in here is pure in-memory logic: no file access and no text
//! formatting beyond path strings.
//!
//! # Why an arena? (for beginners)
//!
//! A config tree needs links in both directions: a header owns its children,
//! and every child remembers its parent so the parser can "close" a header and
//! step back up.  In Rust, a child holding a reference to its parent while the
//! parent owns the child is a self-referential structure that the borrow
//! checker rejects.
//!
//! Instead, every [`entry::Entry`] lives in a single `Vec` owned by
//! [`tree::ConfigTree`].  Links are plain indices ([`entry::EntryId`]) into that
//! vector.  Indices cannot dangle as long as entries are never removed
//! individually, which matches the lifecycle of a config tree: it only grows
//! until it is rebuilt or dropped as a whole.

/// Tree nodes and their typed values.
pub mod entry;

/// Slash-delimited path normalization and segment helpers.
pub mod path;

/// The config tree: lookup, getters, setters and header creation.
///
/// See [`tree::ConfigTree`] for the main type.
pub mod tree;
