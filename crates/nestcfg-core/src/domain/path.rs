//! Slash-delimited entry paths.
//!
//! A path such as `"Window/Position/x"` names a chain of headers ending in a
//! leaf or header.  Paths are plain `&str`; the helpers here normalize them and
//! pick them apart by segment index.
//!
//! Segment indices follow the Python convention: `0` is the first segment and
//! `-1` the last.  Out-of-range indices are clamped rather than rejected.
//!
//! ```rust
//! use nestcfg_core::path;
//!
//! assert_eq!(path::normalize("./ROOT/Window/"), "Window");
//! assert_eq!(path::segment("A/B/C", -1), "C");
//! assert_eq!(path::partial("A/B/C", 0, -2), "A/B");
//! ```

/// Name of the root header, also accepted as a path meaning "the root".
pub const ROOT_PATH: &str = "ROOT";

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Strips the decorations a caller may put around a path.
///
/// Removes, in this order: every leading `./`, every leading `/`, every
/// trailing `/`, and every leading `ROOT/`.
pub fn normalize(path: &str) -> &str {
    let mut p = path;
    while let Some(rest) = p.strip_prefix("./") {
        p = rest;
    }
    while let Some(rest) = p.strip_prefix(SEPARATOR) {
        p = rest;
    }
    while let Some(rest) = p.strip_suffix(SEPARATOR) {
        p = rest;
    }
    while let Some(rest) = p.strip_prefix("ROOT/") {
        p = rest;
    }
    p
}

/// Returns `true` if `path` addresses the root header itself.
pub fn is_root(path: &str) -> bool {
    let p = normalize(path);
    p.is_empty() || p == ROOT_PATH
}

/// Splits a normalized copy of `path` into its segments.
///
/// The root path yields an empty vector.
pub fn segments(path: &str) -> Vec<&str> {
    if is_root(path) {
        return Vec::new();
    }
    normalize(path).split(SEPARATOR).collect()
}

/// Resolves a possibly negative segment index against `count` segments.
fn resolve_index(index: isize, count: usize) -> isize {
    if index < 0 {
        count as isize + index
    } else {
        index
    }
}

/// Returns the segment at `index` (negative counts from the end).
///
/// A single-segment path is returned unchanged whatever the index.  Otherwise
/// the index is clamped to the valid range.
pub fn segment(path: &str, index: isize) -> &str {
    let normalized = normalize(path);
    let parts: Vec<&str> = normalized.split(SEPARATOR).collect();
    if parts.len() <= 1 {
        return normalized;
    }

    let last = parts.len() as isize - 1;
    let idx = resolve_index(index, parts.len()).clamp(0, last);
    parts[idx as usize]
}

/// Rebuilds the sub-path from segment `start` to `end`, both inclusive.
///
/// Negative indices count from the end.  When `end` resolves below zero the
/// sub-path would reach above the first segment, so the root path is returned;
/// this is how the parent of a top-level entry is spelled.
pub fn partial(path: &str, start: isize, end: isize) -> String {
    let normalized = normalize(path);
    let parts: Vec<&str> = normalized.split(SEPARATOR).collect();

    let end_idx = resolve_index(end, parts.len());
    if end_idx < 0 {
        return ROOT_PATH.to_string();
    }
    if parts.len() <= 1 {
        return normalized.to_string();
    }

    let start_idx = resolve_index(start, parts.len()).max(0) as usize;
    let end_idx = (end_idx as usize).min(parts.len() - 1);
    if start_idx > end_idx {
        return String::new();
    }

    parts[start_idx..=end_idx].join("/")
}

/// Path of the header that would contain the entry at `path`.
pub fn parent(path: &str) -> String {
    partial(path, 0, -2)
}

/// Final segment of `path`: the name of the entry it addresses.
pub fn leaf(path: &str) -> &str {
    segment(path, -1)
}
