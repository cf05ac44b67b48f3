//! Line-oriented parser for config text.
//!
//! Each source line is classified in this order:
//!
//! 1. Blank, or first non-whitespace character is `#`: kept as a comment entry.
//! 2. A `#` outside the quoted value: warned about, the rest of the line dropped.
//! 3. `[Name]`: opens a header under the current one.
//! 4. `/Name]` where `Name` is the innermost open header: closes it.
//! 5. `key=value`: a number, or a string in double quotes.
//! 6. Anything else is ignored.
//!
//! Brackets and close tags are only recognized before the first `=`, so a
//! string value such as `"[x]"` cannot open a header.

use thiserror::Error;
use tracing::{error, trace, warn};

use crate::domain::entry::{EntryId, EntryValue};
use crate::domain::tree::{ConfigTree, ROOT_NAME};

/// Structural errors found while parsing config text.
///
/// Line numbers are 1-based.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// A value line appeared where the current parent is not a header.
    #[error("line {line}: can't add subentries to non-header entry '{parent}'")]
    NonHeaderParent { line: usize, parent: String },

    /// A `key=value` line with nothing before the `=`.
    #[error("line {line}: missing key before '='")]
    MissingKey { line: usize },

    /// The value is neither a number nor a double-quoted string.
    #[error("line {line}: invalid value given for '{key}': {value:?}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },

    /// A close tag for the root header.
    #[error("line {line}: closing tag '/{name}]' has no matching header")]
    StrayClose { line: usize, name: String },

    /// Headers still open at the end of the input.
    #[error("{count} header(s) missing closing tags")]
    UnclosedHeaders { count: usize },
}

/// What a single (comment-stripped) line means.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Open(&'a str),
    Close,
    Assignment { key: &'a str, value: &'a str },
    Ignored,
}

/// Parses `text` and appends the resulting entries under the tree's root.
///
/// Entries created before a failing line stay in the tree.
///
/// # Errors
///
/// Returns [`ParseError`] for values that are neither numbers nor quoted
/// strings, empty keys, stray close tags and unclosed headers.
///
/// # Examples
///
/// ```rust
/// use nestcfg_core::{format::parse_into, ConfigTree};
///
/// let mut tree = ConfigTree::new();
/// parse_into(&mut tree, "[Window]\nwidth=800\n/Window]\n").unwrap();
/// assert_eq!(tree.get_number("Window/width").unwrap(), 800.0);
/// ```
pub fn parse_into(tree: &mut ConfigTree, text: &str) -> Result<(), ParseError> {
    parse_lines(tree, text).map_err(|e| {
        error!("error loading config: {e}");
        e
    })
}

fn parse_lines(tree: &mut ConfigTree, text: &str) -> Result<(), ParseError> {
    // Innermost open header last.  The root is never popped.
    let mut open: Vec<(EntryId, String)> = vec![(EntryId::ROOT, ROOT_NAME.to_string())];

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let (parent, parent_name) = match open.last() {
            Some((id, name)) => (*id, name.as_str()),
            None => (EntryId::ROOT, ROOT_NAME),
        };

        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            tree.push_child(parent, raw, EntryValue::Comment);
            continue;
        }

        let line = match strip_inline_comment(raw) {
            Some(cut) => {
                warn!(line = line_no, "same line comments not supported, ignoring text after '#'");
                cut
            }
            None => raw,
        };

        match classify(line, parent_name) {
            Line::Open(name) => {
                trace!(line = line_no, "open header '{name}'");
                let id = tree.push_child(parent, name, EntryValue::Header);
                open.push((id, name.to_string()));
            }
            Line::Close => {
                if open.len() == 1 {
                    return Err(ParseError::StrayClose {
                        line: line_no,
                        name: parent_name.to_string(),
                    });
                }
                trace!(line = line_no, "close header '{parent_name}'");
                open.pop();
            }
            Line::Assignment { key, value } => {
                // Only headers are ever pushed onto `open`, so this cannot fail today.
                let parent_is_header = tree.entry(parent).is_some_and(|e| e.is_header());
                if !parent_is_header {
                    return Err(ParseError::NonHeaderParent {
                        line: line_no,
                        parent: parent_name.to_string(),
                    });
                }
                if key.is_empty() {
                    return Err(ParseError::MissingKey { line: line_no });
                }
                let value = parse_value(value).ok_or_else(|| ParseError::InvalidValue {
                    line: line_no,
                    key: key.to_string(),
                    value: value.to_string(),
                })?;
                tree.push_child(parent, key, value);
            }
            Line::Ignored => trace!(line = line_no, "ignoring unrecognized line"),
        }
    }

    let unclosed = open.len() - 1;
    if unclosed > 0 {
        return Err(ParseError::UnclosedHeaders { count: unclosed });
    }
    Ok(())
}

/// Cuts `line` at the first `#` outside the quoted value.
///
/// The quoted value runs from the first `"` after `=` to the last `"` on the
/// line, so quotes inside a string value do not end it.  Returns `None` when
/// the line has no such `#`.
fn strip_inline_comment(line: &str) -> Option<&str> {
    let quoted = line.find('=').and_then(|eq| {
        let open = eq + 1 + line[eq + 1..].find('"')?;
        let close = line.rfind('"')?;
        (close > open).then_some(open..=close)
    });

    line.char_indices()
        .find(|&(i, c)| c == '#' && !quoted.as_ref().is_some_and(|q| q.contains(&i)))
        .map(|(i, _)| &line[..i])
}

fn classify<'a>(line: &'a str, open_header: &str) -> Line<'a> {
    let equal_sign = line.find('=');
    let structural = equal_sign.map_or(line, |eq| &line[..eq]);

    if let (Some(start), Some(end)) = (structural.find('['), structural.rfind(']')) {
        if start < end {
            return Line::Open(&structural[start + 1..end]);
        }
    }

    let close_tag = format!("/{open_header}]");
    if structural.contains(&close_tag) {
        return Line::Close;
    }

    match equal_sign {
        Some(eq) => Line::Assignment {
            key: line[..eq].trim(),
            value: line[eq + 1..].trim_end(),
        },
        None => Line::Ignored,
    }
}

/// Interprets the text after `=`: a finite number, or a quoted string.
fn parse_value(raw: &str) -> Option<EntryValue> {
    let value = raw.trim();
    if let Some(n) = parse_number(value) {
        return Some(EntryValue::Number(n));
    }
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Some(EntryValue::String(value[1..value.len() - 1].to_string()));
    }
    None
}

fn parse_number(value: &str) -> Option<f64> {
    // `f64::from_str` also accepts "inf" and "NaN"; those must be quoted.
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::EntryKind;

    fn parse(text: &str) -> (ConfigTree, Result<(), ParseError>) {
        let mut tree = ConfigTree::new();
        let result = parse_into(&mut tree, text);
        (tree, result)
    }

    // ── Line classification ───────────────────────────────────────────────────

    #[test]
    fn test_classify_header_open() {
        assert_eq!(classify("[Window]", "ROOT"), Line::Open("Window"));
        assert_eq!(classify("   [Inner Name]  ", "ROOT"), Line::Open("Inner Name"));
    }

    #[test]
    fn test_classify_header_open_uses_first_and_last_bracket() {
        assert_eq!(classify("[a]b]", "ROOT"), Line::Open("a]b"));
    }

    #[test]
    fn test_classify_close_matches_open_header_only() {
        assert_eq!(classify("/Window]", "Window"), Line::Close);
        assert_eq!(classify("\t/Window]", "Window"), Line::Close);
        assert_eq!(classify("/Other]", "Window"), Line::Ignored);
    }

    #[test]
    fn test_classify_brackets_inside_value_are_not_headers() {
        assert_eq!(
            classify("pattern=\"[a-z]\"", "ROOT"),
            Line::Assignment {
                key: "pattern",
                value: "\"[a-z]\""
            }
        );
    }

    #[test]
    fn test_classify_assignment_trims_key_and_trailing_space() {
        assert_eq!(
            classify("  width = 800  ", "ROOT"),
            Line::Assignment {
                key: "width",
                value: " 800"
            }
        );
    }

    #[test]
    fn test_classify_unrecognized_line_is_ignored() {
        assert_eq!(classify("just some words", "ROOT"), Line::Ignored);
    }

    // ── Inline comments ───────────────────────────────────────────────────────

    #[test]
    fn test_strip_inline_comment_outside_quotes() {
        assert_eq!(strip_inline_comment("width=800 # px"), Some("width=800 "));
        assert_eq!(strip_inline_comment("width=800"), None);
    }

    #[test]
    fn test_strip_inline_comment_keeps_hash_between_inner_quotes() {
        assert_eq!(strip_inline_comment("title=\"a\"#b\""), None);
        assert_eq!(
            strip_inline_comment("title=\"say \"hi\" #1\" # note"),
            Some("title=\"say \"hi\" #1\" ")
        );
    }

    #[test]
    fn test_strip_inline_comment_before_equals_ignores_quotes() {
        assert_eq!(strip_inline_comment("[A] # \"x\""), Some("[A] "));
    }

    #[test]
    fn test_strip_inline_comment_ignores_hash_in_quotes() {
        assert_eq!(strip_inline_comment("color=\"#ff0000\""), None);
        assert_eq!(
            strip_inline_comment("color=\"#ff0000\" # red"),
            Some("color=\"#ff0000\" ")
        );
    }

    #[test]
    fn test_inline_comment_is_dropped_and_line_parsed() {
        let (tree, result) = parse("[Window]\nwidth=800 # pixels\n/Window] # end\n");

        assert_eq!(result, Ok(()));
        assert_eq!(tree.get_number("Window/width").unwrap(), 800.0);
    }

    // ── Values ────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_value_number_forms() {
        assert_eq!(parse_value("800"), Some(EntryValue::Number(800.0)));
        assert_eq!(parse_value(" -3.25"), Some(EntryValue::Number(-3.25)));
        assert_eq!(parse_value("1e3"), Some(EntryValue::Number(1000.0)));
    }

    #[test]
    fn test_parse_value_quoted_string() {
        assert_eq!(
            parse_value("\"My App\""),
            Some(EntryValue::String("My App".to_string()))
        );
        assert_eq!(parse_value("\"\""), Some(EntryValue::String(String::new())));
        assert_eq!(
            parse_value("\"42\""),
            Some(EntryValue::String("42".to_string()))
        );
    }

    #[test]
    fn test_parse_value_rejects_unquoted_and_unbalanced() {
        assert_eq!(parse_value("unquoted text"), None);
        assert_eq!(parse_value("\"open"), None);
        assert_eq!(parse_value("\""), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn test_parse_value_non_finite_numbers_must_be_quoted() {
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("NaN"), None);
    }

    // ── Whole documents ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_window_example() {
        // Arrange
        let text = "[Window]\nwidth=800\ntitle=\"My App\"\n/Window]\n";

        // Act
        let (tree, result) = parse(text);

        // Assert
        assert_eq!(result, Ok(()));
        assert_eq!(tree.get_number("Window/width").unwrap(), 800.0);
        assert_eq!(tree.get_string("Window/title").unwrap(), "My App");
        let window = tree.find("Window").unwrap();
        let children: Vec<(&str, EntryKind)> = tree
            .children(window)
            .map(|(_, e)| (e.name(), e.kind()))
            .collect();
        assert_eq!(
            children,
            vec![("width", EntryKind::Number), ("title", EntryKind::String)]
        );
    }

    #[test]
    fn test_parse_nested_headers() {
        let text = "[A]\n\t[B]\n\t\tx=1\n\t/B]\n\ty=2\n/A]\n";
        let (tree, result) = parse(text);

        assert_eq!(result, Ok(()));
        assert_eq!(tree.get_number("A/B/x").unwrap(), 1.0);
        assert_eq!(tree.get_number("A/y").unwrap(), 2.0);
    }

    #[test]
    fn test_parse_keeps_comments_and_blank_lines_in_place() {
        let text = "# top\n\n[A]\n    # inside\n  \nx=1\n/A]\n";
        let (tree, result) = parse(text);
        assert_eq!(result, Ok(()));

        let top: Vec<(&str, EntryKind)> = tree
            .children(EntryId::ROOT)
            .map(|(_, e)| (e.name(), e.kind()))
            .collect();
        assert_eq!(
            top,
            vec![
                ("# top", EntryKind::Comment),
                ("", EntryKind::Comment),
                ("A", EntryKind::Header),
            ]
        );

        let a = tree.find("A").unwrap();
        let inner: Vec<&str> = tree.children(a).map(|(_, e)| e.name()).collect();
        assert_eq!(inner, vec!["    # inside", "  ", "x"]);
    }

    #[test]
    fn test_parse_top_level_values() {
        let (tree, result) = parse("volume=0.5\nname=\"root level\"\n");
        assert_eq!(result, Ok(()));
        assert_eq!(tree.get_number("volume").unwrap(), 0.5);
        assert_eq!(tree.get_string("name").unwrap(), "root level");
    }

    #[test]
    fn test_parse_handles_crlf_line_endings() {
        let (tree, result) = parse("[A]\r\nx=\"v\"\r\n/A]\r\n");
        assert_eq!(result, Ok(()));
        assert_eq!(tree.get_string("A/x").unwrap(), "v");
    }

    #[test]
    fn test_parse_invalid_value_fails_with_line_number() {
        let (_, result) = parse("[A]\nkey=unquoted text\n/A]\n");
        assert_eq!(
            result,
            Err(ParseError::InvalidValue {
                line: 2,
                key: "key".to_string(),
                value: "unquoted text".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_failure_keeps_partial_tree() {
        let (tree, result) = parse("[A]\nx=1\ny=oops\nz=3\n/A]\n");

        assert!(result.is_err());
        assert_eq!(tree.get_number("A/x").unwrap(), 1.0);
        assert!(tree.get_entry("A/z").is_none());
    }

    #[test]
    fn test_parse_missing_key_fails() {
        let (_, result) = parse("=5\n");
        assert_eq!(result, Err(ParseError::MissingKey { line: 1 }));
    }

    #[test]
    fn test_parse_unclosed_header_reports_count() {
        let (_, result) = parse("[A]\nx=1\n");
        assert_eq!(result, Err(ParseError::UnclosedHeaders { count: 1 }));
    }

    #[test]
    fn test_parse_two_unclosed_headers() {
        let (_, result) = parse("[A]\n[B]\n");
        assert_eq!(result, Err(ParseError::UnclosedHeaders { count: 2 }));
    }

    #[test]
    fn test_parse_mismatched_close_is_ignored_until_count_check() {
        // "/B]" does not match the open header "A", so it is skipped.
        let (_, result) = parse("[A]\n/B]\n");
        assert_eq!(result, Err(ParseError::UnclosedHeaders { count: 1 }));
    }

    #[test]
    fn test_parse_root_close_is_stray() {
        let (_, result) = parse("x=1\n/ROOT]\n");
        assert_eq!(
            result,
            Err(ParseError::StrayClose {
                line: 2,
                name: "ROOT".to_string()
            })
        );
    }

    #[test]
    fn test_parse_empty_input_is_ok() {
        let (tree, result) = parse("");
        assert_eq!(result, Ok(()));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_assignment_after_nested_close_goes_to_outer_header() {
        let (tree, result) = parse("[A]\n[B]\n/B]\nx=1\n/A]\n");

        assert_eq!(result, Ok(()));
        assert_eq!(tree.get_number("A/x").unwrap(), 1.0);
        assert!(tree.get_entry("A/B").is_some_and(|b| b.children().is_empty()));
    }

    #[test]
    fn test_non_header_parent_message_names_line_and_parent() {
        let err = ParseError::NonHeaderParent {
            line: 4,
            parent: "width".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "line 4: can't add subentries to non-header entry 'width'"
        );
    }
}
