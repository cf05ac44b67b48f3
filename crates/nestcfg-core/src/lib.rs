//! # nestcfg-core
//!
//! Reader, writer and in-memory model for nested-header configuration files.
//!
//! The crate has no dependencies on OS APIs beyond plain file reads and writes,
//! which are isolated behind the [`storage::ConfigStorage`] trait.
//!
//! # File format overview
//!
//! ```text
//! [Window]
//!     width=800
//!     title="My App"
//!     # comments and blank lines are kept verbatim
//!     [Position]
//!         x=10
//!     /Position]
//! /Window]
//! ```
//!
//! Headers open with `[Name]` and close with `/Name]`.  Inside a header every
//! `key=value` line holds either a bare number or a double-quoted string.
//!
//! # Modules
//!
//! - **`domain`** – The tree itself: [`Entry`] nodes stored in an arena owned by
//!   [`ConfigTree`], plus the slash-delimited path helpers used to address them
//!   (`"Window/Position/x"`).
//!
//! - **`format`** – Text conversion.  The parser classifies each source line and
//!   builds entries; the writer walks the tree depth-first and regenerates text.
//!
//! - **`storage`** – Loading and saving through a pluggable string/file I/O
//!   layer, with an in-memory implementation for tests.

pub mod domain;
pub mod format;
pub mod storage;

// Re-export the most-used types at the crate root so callers can write
// `nestcfg_core::ConfigTree` instead of `nestcfg_core::domain::tree::ConfigTree`.
pub use domain::entry::{Entry, EntryId, EntryKind, EntryValue};
pub use domain::path;
pub use domain::tree::{ConfigTree, TreeError, DEFAULT_INDENT, ROOT_NAME};
pub use format::parser::ParseError;
pub use storage::{ConfigStorage, FileStorage, StorageError};
