//! Span type: the styled-text output tree.

use crate::style::Style;

/// Content carried by a single span.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    /// Literal text.
    Text(String),
    /// A keybind reference resolved by the rendering surface (e.g. `key.jump`).
    Keybind(String),
    /// A translation key plus ordered, pre-styled arguments.
    Translatable { key: String, with: Vec<Span> },
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

/// A node of the styled-text tree.
///
/// Styling set on a span applies to its own content and is inherited by
/// descendants unless they override it. Children are self-contained subtrees
/// in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Span {
    pub content: Content,
    pub style: Style,
    pub children: Vec<Span>,
}

impl Span {
    /// An empty, unstyled span.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A plain text span.
    pub fn text(content: impl Into<String>) -> Self {
        Span {
            content: Content::Text(content.into()),
            ..Self::default()
        }
    }

    /// A text span with the given style.
    pub fn styled(content: impl Into<String>, style: Style) -> Self {
        Span {
            content: Content::Text(content.into()),
            style,
            children: Vec::new(),
        }
    }

    /// A keybind span.
    pub fn keybind(key: impl Into<String>) -> Self {
        Span {
            content: Content::Keybind(key.into()),
            ..Self::default()
        }
    }

    /// A translatable span with ordered arguments.
    pub fn translatable(key: impl Into<String>, with: Vec<Span>) -> Self {
        Span {
            content: Content::Translatable { key: key.into(), with },
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_children(mut self, children: Vec<Span>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: Span) {
        self.children.push(child);
    }

    /// The literal text of this span's own content, when it is plain text.
    pub fn content_text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Plain text of the whole subtree, styling and non-text content dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_plain_text(&mut out);
        out
    }

    fn collect_plain_text(&self, out: &mut String) {
        if let Content::Text(text) = &self.content {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_plain_text(out);
        }
    }

    /// Collapse an empty, unstyled wrapper with exactly one child into that
    /// child.
    pub(crate) fn lift(mut self) -> Span {
        let empty_text = matches!(&self.content, Content::Text(t) if t.is_empty());
        if empty_text && self.style.is_empty() && self.children.len() == 1 {
            if let Some(child) = self.children.pop() {
                return child;
            }
        }
        self
    }
}
