//! Minimal-markup serializer for span trees.
//!
//! Walks a span tree depth-first and re-emits markup, tracking which
//! attributes are currently open. An attribute only produces an open tag
//! when it changes and only produces a close tag when it stops applying, so
//! tags stay implicitly open across siblings that share them.
//!
//! The walk reads explicit attributes only; an unset attribute means "not
//! open here", inheritance being the renderer's concern. Round-tripping the
//! output re-parses to an equivalent tree, not necessarily byte-identical
//! markup.

use std::fmt::Write;

use crate::color::Color;
use crate::span::{Content, Span};
use crate::style::{ClickEvent, Decoration, Decorations, HoverEvent};

/// Serialize a span tree back into markup.
///
/// # Examples
///
/// ```
/// let span = minimark::parse("<yellow>TEST<green> nested</green>Test").unwrap();
/// assert_eq!(
///     minimark::serialize(&span),
///     "<color:yellow>TEST<color:green> nested<color:yellow>Test"
/// );
/// ```
pub fn serialize(span: &Span) -> String {
    let mut out = String::new();
    let mut open = OpenState::default();
    write_span(span, &mut open, &mut out);
    out
}

/// Attributes currently open at the write position.
#[derive(Default)]
struct OpenState {
    color: Option<Color>,
    decorations: Decorations,
    hover: Option<HoverEvent>,
    click: Option<ClickEvent>,
    insertion: Option<String>,
    font: Option<String>,
}

fn write_span(span: &Span, open: &mut OpenState, out: &mut String) {
    let style = &span.style;

    // close whatever no longer applies
    if let Some(hover) = &open.hover {
        if style.hover.as_ref() != Some(hover) {
            out.push_str("</hover>");
            open.hover = None;
        }
    }
    if let Some(click) = &open.click {
        if style.click.as_ref() != Some(click) {
            out.push_str("</click>");
            open.click = None;
        }
    }
    if let Some(insertion) = &open.insertion {
        if style.insertion.as_ref() != Some(insertion) {
            out.push_str("</insert>");
            open.insertion = None;
        }
    }
    if let Some(font) = &open.font {
        if style.font.as_ref() != Some(font) {
            out.push_str("</font>");
            open.font = None;
        }
    }
    for decoration in Decoration::ALL {
        if open.decorations.get(decoration) == Some(true)
            && style.decorations.get(decoration) != Some(true)
        {
            let _ = write!(out, "</{}>", decoration.name());
            open.decorations.set(decoration, false);
        }
    }
    if let Some(color) = open.color {
        if style.color.is_none() {
            let _ = write!(out, "</color:{color}>");
            open.color = None;
        }
    }

    // open what this span adds; a changed color simply re-opens
    if let Some(color) = style.color {
        if open.color != Some(color) {
            let _ = write!(out, "<color:{color}>");
            open.color = Some(color);
        }
    }
    for decoration in Decoration::ALL {
        if style.decorations.get(decoration) == Some(true)
            && open.decorations.get(decoration) != Some(true)
        {
            let _ = write!(out, "<{}>", decoration.name());
            open.decorations.set(decoration, true);
        }
    }
    if let Some(insertion) = &style.insertion {
        if open.insertion.as_ref() != Some(insertion) {
            let _ = write!(out, "<insert:{insertion}>");
            open.insertion = Some(insertion.clone());
        }
    }
    if let Some(font) = &style.font {
        if open.font.as_ref() != Some(font) {
            let _ = write!(out, "<font:{font}>");
            open.font = Some(font.clone());
        }
    }
    if let Some(hover) = &style.hover {
        if open.hover.as_ref() != Some(hover) {
            let _ = write!(out, "<hover:{}:\"{}\">", hover.action, serialize(&hover.value));
            open.hover = Some(hover.clone());
        }
    }
    if let Some(click) = &style.click {
        if open.click.as_ref() != Some(click) {
            let _ = write!(out, "<click:{}:\"{}\">", click.action, click.value);
            open.click = Some(click.clone());
        }
    }

    match &span.content {
        Content::Text(text) => out.push_str(text),
        Content::Keybind(key) => {
            let _ = write!(out, "<key:{key}>");
        }
        Content::Translatable { key, with } => {
            let _ = write!(out, "<lang:{key}");
            for arg in with {
                let _ = write!(out, ":\"{}\"", serialize(arg));
            }
            out.push('>');
        }
    }

    for child in &span.children {
        write_span(child, open, out);
    }
}
