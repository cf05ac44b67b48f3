//! Serializer producing config text from a [`ConfigTree`].
//!
//! The tree is written depth-first in stored order.  Every nesting level adds
//! one copy of the indent string; comments are written verbatim without any
//! added indentation.

use crate::domain::entry::{EntryId, EntryValue};
use crate::domain::tree::ConfigTree;

/// Serializes every entry below the root of `tree`.
///
/// # Examples
///
/// ```rust
/// use nestcfg_core::{format::write_tree, ConfigTree};
///
/// let mut tree = ConfigTree::new();
/// tree.create_header("Window").unwrap();
/// tree.set_number("Window/width", 800.0).unwrap();
///
/// assert_eq!(write_tree(&tree, "  "), "[Window]\n  width=800\n/Window]\n");
/// ```
pub fn write_tree(tree: &ConfigTree, indent: &str) -> String {
    let mut out = String::new();
    write_children(tree, EntryId::ROOT, indent, 0, &mut out);
    out
}

fn write_children(tree: &ConfigTree, parent: EntryId, indent: &str, depth: usize, out: &mut String) {
    let pad = indent.repeat(depth);

    for (id, entry) in tree.children(parent) {
        match entry.value() {
            EntryValue::String(s) => {
                out.push_str(&format!("{pad}{}=\"{s}\"\n", entry.name()));
            }
            EntryValue::Number(n) => {
                out.push_str(&format!("{pad}{}={}\n", entry.name(), format_number(*n)));
            }
            EntryValue::Header => {
                out.push_str(&format!("{pad}[{}]\n", entry.name()));
                if !entry.children().is_empty() {
                    write_children(tree, id, indent, depth + 1, out);
                }
                out.push_str(&format!("{pad}/{}]\n", entry.name()));
            }
            EntryValue::Comment => {
                out.push_str(entry.name());
                out.push('\n');
            }
        }
    }
}

/// Shortest decimal text that parses back to exactly `n`.
fn format_number(n: f64) -> String {
    format!("{n}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
