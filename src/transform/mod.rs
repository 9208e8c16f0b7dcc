//! Tag-name dispatch: mapping parsed tags onto span behaviors.
//!
//! A [`TransformationRegistry`] is an ordered catalog of name matchers and
//! argument loaders. It is constructed once and never mutated afterwards, so
//! a single registry can serve any number of concurrent parse calls. Every
//! loader owns its own argument validation and resolves to "absent" on
//! invalid input, which makes the caller fall back to rendering the tag's
//! literal source text.

pub mod gradient;

use std::collections::HashMap;

use crate::color::Color;
use crate::markup::assemble_nodes;
use crate::parser::tree::{TagNode, TagPart};
use crate::parser::PRE_TAG;
use crate::span::Span;
use crate::style::{ClickEvent, Decoration, HoverEvent};

/// A resolved tag behavior, ready to be applied to the span under
/// construction.
#[derive(Clone, Debug)]
pub enum Transformation {
    Color(Color),
    Decoration(Decoration, bool),
    Hover(HoverEvent),
    Click(ClickEvent),
    Keybind(String),
    Translatable { key: String, with: Vec<Span> },
    Insertion(String),
    Font(String),
    Reset,
    Pre,
    Gradient {
        stops: Vec<Color>,
        phase: f32,
        negative_phase: bool,
    },
    Rainbow {
        phase: i32,
    },
    /// A finished subtree spliced in whole (component template or resolved
    /// placeholder).
    Subtree(Span),
}

/// Everything a loader may need while resolving a tag: the registry itself
/// (markup-valued arguments parse recursively), the component templates of
/// the current call, and the caller's placeholder resolver.
pub struct ResolveEnv<'a> {
    pub registry: &'a TransformationRegistry,
    pub templates: &'a HashMap<String, Span>,
    pub resolver: Option<&'a (dyn Fn(&str) -> Option<Span> + Send + Sync)>,
}

type Matcher = fn(&str) -> bool;
type Loader = fn(&str, &[TagPart], &ResolveEnv) -> Option<Transformation>;

/// One registry entry: a tag-name predicate plus the loader that validates
/// arguments and produces the behavior.
#[derive(Clone, Copy)]
pub struct TransformationType {
    matcher: Matcher,
    loader: Loader,
}

impl TransformationType {
    pub fn new(matcher: Matcher, loader: Loader) -> Self {
        Self { matcher, loader }
    }
}

/// Ordered, immutable catalog of tag behaviors.
pub struct TransformationRegistry {
    types: Vec<TransformationType>,
}

impl TransformationRegistry {
    /// The standard tag set.
    pub fn standard() -> Self {
        Self {
            types: vec![
                TransformationType::new(match_color, load_color),
                TransformationType::new(match_decoration, load_decoration),
                TransformationType::new(|n| n == "hover", load_hover),
                TransformationType::new(|n| n == "click", load_click),
                TransformationType::new(|n| n == "key", load_keybind),
                TransformationType::new(|n| n == "lang", load_translatable),
                TransformationType::new(|n| n == "insert", load_insertion),
                TransformationType::new(|n| n == "font", load_font),
                TransformationType::new(|n| n == "reset", load_reset),
                TransformationType::new(|n| n == PRE_TAG, load_pre),
                TransformationType::new(|n| n == "gradient", load_gradient),
                TransformationType::new(|n| n == "rainbow", load_rainbow),
            ],
        }
    }

    /// An empty catalog, for fully custom tag sets.
    pub fn empty() -> Self {
        Self { types: Vec::new() }
    }

    /// Append a custom entry. Entries are tried in order; the first matcher
    /// that accepts the lowercased tag name wins.
    pub fn with_type(mut self, transformation_type: TransformationType) -> Self {
        self.types.push(transformation_type);
        self
    }

    /// Resolve a tag node to a behavior, or absent when the tag is unknown
    /// or its arguments are invalid.
    pub fn resolve(&self, node: &TagNode, env: &ResolveEnv) -> Option<Transformation> {
        let name = node.name().to_ascii_lowercase();
        for transformation_type in &self.types {
            if (transformation_type.matcher)(&name) {
                let loaded = (transformation_type.loader)(&name, node.parts(), env);
                if loaded.is_none() {
                    log::debug!(
                        "tag {:?} matched {name:?} but failed argument validation, degrading to literal text",
                        node.token()
                    );
                }
                return loaded;
            }
        }
        if let Some(template) = env.templates.get(&name) {
            return Some(Transformation::Subtree(template.clone()));
        }
        if let Some(resolver) = env.resolver {
            if let Some(span) = resolver(&name) {
                return Some(Transformation::Subtree(span));
            }
        }
        None
    }
}

fn match_color(name: &str) -> bool {
    name == "color" || name.starts_with('#') || Color::by_name(name).is_some()
}

fn load_color(name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    let value = if name == "color" {
        match parts {
            [part] => part.as_literal()?,
            _ => return None,
        }
    } else {
        if !parts.is_empty() {
            return None;
        }
        name
    };
    Color::parse(value).map(Transformation::Color)
}

fn match_decoration(name: &str) -> bool {
    Decoration::from_name(name).is_some()
}

fn load_decoration(name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    let decoration = Decoration::from_name(name)?;
    let flag = match parts {
        [] => true,
        [part] => match part.as_literal()?.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => return None,
        },
        _ => return None,
    };
    Some(Transformation::Decoration(decoration, flag))
}

fn load_hover(_name: &str, parts: &[TagPart], env: &ResolveEnv) -> Option<Transformation> {
    match parts {
        [action, value] => {
            let action = action.as_literal()?.to_string();
            let value = match value {
                TagPart::Markup(nodes) => assemble_nodes(nodes, env),
                TagPart::Literal(text) => Span::text(text.clone()),
            };
            Some(Transformation::Hover(HoverEvent {
                action,
                value: Box::new(value),
            }))
        }
        _ => None,
    }
}

fn load_click(_name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    if parts.len() < 2 {
        return None;
    }
    let literals = literal_parts(parts)?;
    Some(Transformation::Click(ClickEvent {
        action: literals[0].to_string(),
        // everything after the action is the value; URLs and commands keep
        // their own colons
        value: literals[1..].join(":"),
    }))
}

fn load_keybind(_name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    match parts {
        [key] => Some(Transformation::Keybind(key.as_literal()?.to_string())),
        _ => None,
    }
}

fn load_translatable(_name: &str, parts: &[TagPart], env: &ResolveEnv) -> Option<Transformation> {
    let (key, args) = parts.split_first()?;
    let key = key.as_literal()?.to_string();
    let with = args
        .iter()
        .map(|arg| match arg {
            TagPart::Markup(nodes) => assemble_nodes(nodes, env),
            TagPart::Literal(text) => Span::text(text.clone()),
        })
        .collect();
    Some(Transformation::Translatable { key, with })
}

fn load_insertion(_name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    if parts.is_empty() {
        return None;
    }
    Some(Transformation::Insertion(literal_parts(parts)?.join(":")))
}

fn load_font(_name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    if parts.is_empty() {
        return None;
    }
    Some(Transformation::Font(literal_parts(parts)?.join(":")))
}

fn load_reset(_name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    parts.is_empty().then_some(Transformation::Reset)
}

fn load_pre(_name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    parts.is_empty().then_some(Transformation::Pre)
}

fn load_gradient(_name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    if parts.is_empty() {
        return Some(Transformation::Gradient {
            stops: vec![Color::WHITE, Color::BLACK],
            phase: 0.0,
            negative_phase: false,
        });
    }
    let mut literals = literal_parts(parts)?;
    let mut phase = 0i32;
    if let Some(last) = literals.last() {
        if let Ok(parsed) = last.parse::<i32>() {
            phase = parsed;
            literals.pop();
        }
    }
    let stops = literals
        .iter()
        .map(|value| Color::parse(value))
        .collect::<Option<Vec<_>>>()?;
    if stops.len() < 2 {
        return None;
    }
    let (phase, negative_phase) = if phase < 0 {
        ((1 + phase) as f32, true)
    } else {
        (phase as f32, false)
    };
    Some(Transformation::Gradient {
        stops,
        phase,
        negative_phase,
    })
}

fn load_rainbow(_name: &str, parts: &[TagPart], _env: &ResolveEnv) -> Option<Transformation> {
    match parts {
        [] => Some(Transformation::Rainbow { phase: 0 }),
        [phase] => phase
            .as_literal()?
            .parse::<i32>()
            .ok()
            .map(|phase| Transformation::Rainbow { phase }),
        _ => None,
    }
}

fn literal_parts<'a>(parts: &'a [TagPart]) -> Option<Vec<&'a str>> {
    parts.iter().map(TagPart::as_literal).collect()
}
