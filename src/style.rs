//! Styling attributes carried by spans.
//!
//! A [`Style`] bundles every inheritable attribute a tag can set: color, the
//! five text decorations, hover and click payloads, insertion text and font.
//! Unset attributes inherit from the enclosing span at render time;
//! descendants override.

use crate::color::Color;
use crate::span::Span;

/// The five toggleable text decorations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decoration {
    Bold,
    Italic,
    Underlined,
    Strikethrough,
    Obfuscated,
}

impl Decoration {
    pub const ALL: [Decoration; 5] = [
        Decoration::Bold,
        Decoration::Italic,
        Decoration::Underlined,
        Decoration::Strikethrough,
        Decoration::Obfuscated,
    ];

    /// The tag name for this decoration.
    pub fn name(&self) -> &'static str {
        match self {
            Decoration::Bold => "bold",
            Decoration::Italic => "italic",
            Decoration::Underlined => "underlined",
            Decoration::Strikethrough => "strikethrough",
            Decoration::Obfuscated => "obfuscated",
        }
    }

    /// Look up a decoration by tag name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Decoration> {
        match name.to_ascii_lowercase().as_str() {
            "bold" => Some(Decoration::Bold),
            "italic" => Some(Decoration::Italic),
            "underlined" => Some(Decoration::Underlined),
            "strikethrough" => Some(Decoration::Strikethrough),
            "obfuscated" => Some(Decoration::Obfuscated),
            _ => None,
        }
    }
}

/// Tri-state decoration flags: explicitly on, explicitly off, or unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decorations {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underlined: Option<bool>,
    pub strikethrough: Option<bool>,
    pub obfuscated: Option<bool>,
}

impl Decorations {
    pub fn get(&self, decoration: Decoration) -> Option<bool> {
        match decoration {
            Decoration::Bold => self.bold,
            Decoration::Italic => self.italic,
            Decoration::Underlined => self.underlined,
            Decoration::Strikethrough => self.strikethrough,
            Decoration::Obfuscated => self.obfuscated,
        }
    }

    pub fn set(&mut self, decoration: Decoration, value: bool) {
        let slot = match decoration {
            Decoration::Bold => &mut self.bold,
            Decoration::Italic => &mut self.italic,
            Decoration::Underlined => &mut self.underlined,
            Decoration::Strikethrough => &mut self.strikethrough,
            Decoration::Obfuscated => &mut self.obfuscated,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        Decoration::ALL.iter().all(|d| self.get(*d).is_none())
    }

    /// Layer `other` on top of `self`; set entries of `other` win.
    pub fn apply(&self, other: &Decorations) -> Decorations {
        Decorations {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underlined: other.underlined.or(self.underlined),
            strikethrough: other.strikethrough.or(self.strikethrough),
            obfuscated: other.obfuscated.or(self.obfuscated),
        }
    }
}

/// Hover payload: an action tag plus a styled subtree shown on hover.
///
/// The action and value are opaque to the compiler; they are stored and
/// round-tripped, never interpreted.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverEvent {
    pub action: String,
    pub value: Box<Span>,
}

/// Click payload: an action tag plus a literal value (command, URL, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct ClickEvent {
    pub action: String,
    pub value: String,
}

/// Complete styling of a span.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    pub color: Option<Color>,
    pub decorations: Decorations,
    pub hover: Option<HoverEvent>,
    pub click: Option<ClickEvent>,
    pub insertion: Option<String>,
    pub font: Option<String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.decorations.is_empty()
            && self.hover.is_none()
            && self.click.is_none()
            && self.insertion.is_none()
            && self.font.is_none()
    }

    /// Layer `other` on top of `self`; set attributes of `other` win.
    pub fn apply(&self, other: &Style) -> Style {
        Style {
            color: other.color.or(self.color),
            decorations: self.decorations.apply(&other.decorations),
            hover: other.hover.clone().or_else(|| self.hover.clone()),
            click: other.click.clone().or_else(|| self.click.clone()),
            insertion: other.insertion.clone().or_else(|| self.insertion.clone()),
            font: other.font.clone().or_else(|| self.font.clone()),
        }
    }
}
