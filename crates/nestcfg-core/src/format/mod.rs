//! Conversion between config text and [`crate::ConfigTree`].
//!
//! Text format:
//! ```text
//! [Header]            opens a header (nested headers are allowed)
//!     key=12.5        number value
//!     key="text"      string value
//!     # comment       kept verbatim, as are blank lines
//! /Header]            closes the innermost open header
//! ```
//!
//! Indentation is ignored when reading and regenerated when writing.

pub mod parser;
pub mod writer;

pub use parser::{parse_into, ParseError};
pub use writer::write_tree;
