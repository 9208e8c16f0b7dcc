//! Error types for the markup API.

use thiserror::Error;

/// Errors reported by the parse entry points.
///
/// Markup *content* never fails: unknown tags, malformed tag arguments and
/// unmatched close tags all degrade to literal text locally. The variants
/// here cover misuse of the API itself, which is reported immediately rather
/// than absorbed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The flat placeholder list must hold key/value pairs.
    #[error(
        "invalid number of placeholders ({0}), usage: parse_format(input, [key, value, key, value, ...])"
    )]
    UnevenPlaceholders(usize),
}
