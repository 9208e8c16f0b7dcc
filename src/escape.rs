//! Standalone escape and strip passes over raw markup.
//!
//! Both are pure string-to-string transforms built on the tag scanner;
//! neither builds a tree.

use crate::parser::lexer::{Lexer, remove_escaped_tags};

/// Backslash-escape every tag so the text parses as literal content.
///
/// Quoted argument values are escaped recursively, so tags nested inside a
/// hover value come out inert as well. Scanning the result again finds no
/// tags, which also makes the pass idempotent.
///
/// # Examples
///
/// ```
/// assert_eq!(
///     minimark::escape_tags("<yellow>TEST</yellow>"),
///     r"\<yellow\>TEST\</yellow\>"
/// );
/// ```
pub fn escape_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    let mut last = 0;
    for m in Lexer::new(input) {
        out.push_str(&input[last..m.start]);
        last = m.end;
        out.push_str("\\<");
        let mut copied = 0;
        for &(quote_start, quote_end) in &m.quoted {
            out.push_str(&m.token[copied..quote_start]);
            out.push_str(&escape_tags(&m.token[quote_start..quote_end]));
            copied = quote_end;
        }
        out.push_str(&m.token[copied..]);
        out.push_str("\\>");
    }
    out.push_str(&input[last..]);
    out
}

/// Remove every tag, leaving only the text outside tag boundaries.
///
/// Escaped tags are removed as well, so stripping an escaped text drops
/// exactly the tags the escape protected.
///
/// # Examples
///
/// ```
/// assert_eq!(minimark::strip_tags("<yellow>TEST<green> nested</green>Test"), "TEST nestedTest");
/// ```
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for m in Lexer::including_escaped(input) {
        out.push_str(&input[last..m.start]);
        last = m.end;
    }
    out.push_str(&input[last..]);
    remove_escaped_tags(&out)
}
