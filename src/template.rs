//! Caller-supplied substitution values.

use crate::span::Span;

/// A named substitution handed to [`MiniMark::parse_templates`].
///
/// String templates are substituted into the input before tokenizing, so
/// their values are themselves scanned and may introduce further tags.
/// Component templates are spliced in during transformation resolution as a
/// finished subtree and are never re-scanned.
///
/// Keys are matched case-insensitively; when the same key is supplied twice,
/// the last one wins.
///
/// [`MiniMark::parse_templates`]: crate::MiniMark::parse_templates
#[derive(Clone, Debug, PartialEq)]
pub enum Template {
    String { key: String, value: String },
    Component { key: String, value: Span },
}

impl Template {
    /// A plain-text substitution.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Template::String {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A pre-built span substitution.
    pub fn component(key: impl Into<String>, value: Span) -> Self {
        Template::Component {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Template::String { key, .. } => key,
            Template::Component { key, .. } => key,
        }
    }
}
