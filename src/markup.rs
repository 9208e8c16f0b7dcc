//! Parse orchestration: placeholders, templates, and the tree-to-span walk.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::color::Color;
use crate::error::ParseError;
use crate::parser::tree::{ElementNode, TagNode, build_tree};
use crate::span::Span;
use crate::style::Style;
use crate::template::Template;
use crate::transform::gradient::{Gradient, Rainbow, utf16_len};
use crate::transform::{ResolveEnv, Transformation, TransformationRegistry};

static DEFAULT: Lazy<MiniMark> = Lazy::new(MiniMark::new);

/// Parse markup with the default tag set and no placeholder resolver.
///
/// # Examples
///
/// ```
/// let span = minimark::parse("<yellow>TEST<green> nested</green>Test").unwrap();
/// assert_eq!(span.plain_text(), "TEST nestedTest");
/// ```
pub fn parse(input: &str) -> Result<Span, ParseError> {
    DEFAULT.parse(input)
}

/// Per-call diagnostic state recorded while parsing.
///
/// A context belongs to exactly one parse call; it is never shared between
/// calls.
#[derive(Debug, Default)]
pub struct Context {
    replaced_message: Option<String>,
    root: Option<TagNode>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The input after placeholder and string-template substitution.
    pub fn replaced_message(&self) -> Option<&str> {
        self.replaced_message.as_deref()
    }

    /// The raw element tree the output was assembled from.
    pub fn root(&self) -> Option<&TagNode> {
        self.root.as_ref()
    }
}

/// The markup compiler: a transformation registry plus an optional
/// placeholder resolver.
///
/// Construct one and reuse it; a `MiniMark` is immutable after construction
/// and safe to share across threads.
///
/// # Examples
///
/// ```
/// use minimark::MiniMark;
///
/// let mini = MiniMark::new();
/// let span = mini.parse_format("<greeting>!", &["greeting", "Hello"]).unwrap();
/// assert_eq!(span.plain_text(), "Hello!");
/// ```
pub struct MiniMark {
    registry: TransformationRegistry,
    resolver: Option<Box<dyn Fn(&str) -> Option<Span> + Send + Sync>>,
}

impl Default for MiniMark {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniMark {
    /// A compiler with the standard tag set.
    pub fn new() -> Self {
        Self::with_registry(TransformationRegistry::standard())
    }

    /// A compiler with a custom tag catalog.
    pub fn with_registry(registry: TransformationRegistry) -> Self {
        Self {
            registry,
            resolver: None,
        }
    }

    /// Install a placeholder resolver, consulted for tag names nothing else
    /// recognizes. Returning `None` means "not a placeholder".
    pub fn placeholder_resolver(
        mut self,
        resolver: impl Fn(&str) -> Option<Span> + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Parse markup into a styled span tree.
    pub fn parse(&self, input: &str) -> Result<Span, ParseError> {
        self.parse_in(input, &mut Context::new())
    }

    /// Like [`parse`](Self::parse), recording diagnostics into `context`.
    pub fn parse_in(&self, input: &str, context: &mut Context) -> Result<Span, ParseError> {
        Ok(self.assemble(input.to_string(), &HashMap::new(), context))
    }

    /// Parse with positional placeholders: a flat `[key, value, key, value]`
    /// list. Each `<key>` is replaced by its value before tokenizing. An odd
    /// number of entries is a usage error.
    pub fn parse_format(&self, input: &str, placeholders: &[&str]) -> Result<Span, ParseError> {
        self.parse_format_in(input, placeholders, &mut Context::new())
    }

    /// Like [`parse_format`](Self::parse_format), recording diagnostics.
    pub fn parse_format_in(
        &self,
        input: &str,
        placeholders: &[&str],
        context: &mut Context,
    ) -> Result<Span, ParseError> {
        if placeholders.len() % 2 != 0 {
            return Err(ParseError::UnevenPlaceholders(placeholders.len()));
        }
        let mut message = input.to_string();
        for pair in placeholders.chunks_exact(2) {
            message = message.replace(&format!("<{}>", pair[0]), &sanitize_placeholder(pair[1]));
        }
        Ok(self.assemble(message, &HashMap::new(), context))
    }

    /// Parse with map placeholders; every `<key>` is replaced by its value
    /// before tokenizing.
    pub fn parse_map(
        &self,
        input: &str,
        placeholders: &HashMap<String, String>,
    ) -> Result<Span, ParseError> {
        let mut message = input.to_string();
        for (key, value) in placeholders {
            message = message.replace(&format!("<{key}>"), value);
        }
        Ok(self.assemble(message, &HashMap::new(), &mut Context::new()))
    }

    /// Parse with [`Template`] substitutions: string templates rewrite the
    /// input before tokenizing, component templates are spliced in whole
    /// during resolution.
    pub fn parse_templates(&self, input: &str, templates: &[Template]) -> Result<Span, ParseError> {
        self.parse_templates_in(input, templates, &mut Context::new())
    }

    /// Like [`parse_templates`](Self::parse_templates), recording diagnostics.
    pub fn parse_templates_in(
        &self,
        input: &str,
        templates: &[Template],
        context: &mut Context,
    ) -> Result<Span, ParseError> {
        let mut message = input.to_string();
        let mut components = HashMap::new();
        for template in templates {
            match template {
                Template::String { key, value } => {
                    message = message.replace(&format!("<{key}>"), &sanitize_placeholder(value));
                }
                Template::Component { key, value } => {
                    components.insert(key.to_ascii_lowercase(), value.clone());
                }
            }
        }
        Ok(self.assemble(message, &components, context))
    }

    fn assemble(
        &self,
        message: String,
        templates: &HashMap<String, Span>,
        context: &mut Context,
    ) -> Span {
        log::trace!("parsing markup: {message:?}");
        let root = build_tree(&message);
        let env = ResolveEnv {
            registry: &self.registry,
            templates,
            resolver: self.resolver.as_deref(),
        };
        let span = assemble_nodes(root.children(), &env);
        context.replaced_message = Some(message);
        context.root = Some(root);
        span
    }
}

/// A placeholder value must not be able to end a verbatim block it happens
/// to be substituted into.
fn sanitize_placeholder(value: &str) -> String {
    value.replace("</pre>", "\\</pre>")
}

/// Styling state flowing down the element tree during assembly.
#[derive(Clone, Default)]
struct RenderState {
    style: Style,
    colorizer: Option<ColorizerSpec>,
}

/// A pending per-code-point color effect; each text run under it gets its
/// own generator sized to that run.
#[derive(Clone)]
enum ColorizerSpec {
    Gradient {
        stops: Vec<Color>,
        phase: f32,
        negative_phase: bool,
    },
    Rainbow {
        phase: i32,
    },
}

/// Assemble a sequence of element nodes into a single span, lifting a bare
/// single-child wrapper.
pub(crate) fn assemble_nodes(nodes: &[ElementNode], env: &ResolveEnv) -> Span {
    let mut children = Vec::new();
    let state = RenderState::default();
    for node in nodes {
        assemble_node(node, &state, env, &mut children);
    }
    Span::empty().with_children(children).lift()
}

fn assemble_node(
    node: &ElementNode,
    state: &RenderState,
    env: &ResolveEnv,
    out: &mut Vec<Span>,
) {
    match node {
        ElementNode::RawText(text) => emit_text(text, state, out),
        ElementNode::Tag(tag) => match env.registry.resolve(tag, env) {
            Some(transformation) => apply_transformation(transformation, tag, state, env, out),
            None => {
                // unknown or invalid: the tag renders as its own source text
                emit_text(tag.token(), state, out);
                assemble_children(tag, state, env, out);
                if let Some(close) = tag.close_token() {
                    emit_text(close, state, out);
                }
            }
        },
    }
}

fn assemble_children(tag: &TagNode, state: &RenderState, env: &ResolveEnv, out: &mut Vec<Span>) {
    for child in tag.children() {
        assemble_node(child, state, env, out);
    }
}

fn apply_transformation(
    transformation: Transformation,
    tag: &TagNode,
    state: &RenderState,
    env: &ResolveEnv,
    out: &mut Vec<Span>,
) {
    let mut child_state = state.clone();
    match transformation {
        Transformation::Color(color) => child_state.style.color = Some(color),
        Transformation::Decoration(decoration, flag) => {
            child_state.style.decorations.set(decoration, flag);
        }
        Transformation::Hover(event) => child_state.style.hover = Some(event),
        Transformation::Click(event) => child_state.style.click = Some(event),
        Transformation::Insertion(value) => child_state.style.insertion = Some(value),
        Transformation::Font(value) => child_state.style.font = Some(value),
        Transformation::Reset => child_state = RenderState::default(),
        Transformation::Pre => {}
        Transformation::Gradient {
            stops,
            phase,
            negative_phase,
        } => {
            child_state.colorizer = Some(ColorizerSpec::Gradient {
                stops,
                phase,
                negative_phase,
            });
        }
        Transformation::Rainbow { phase } => {
            child_state.colorizer = Some(ColorizerSpec::Rainbow { phase });
        }
        Transformation::Keybind(key) => {
            out.push(Span::keybind(key).with_style(state.style.clone()));
        }
        Transformation::Translatable { key, with } => {
            out.push(Span::translatable(key, with).with_style(state.style.clone()));
        }
        Transformation::Subtree(span) => {
            out.push(merge_ambient(span, &state.style));
        }
    }
    assemble_children(tag, &child_state, env, out);
}

/// Layer a spliced subtree's own styling over the ambient style at the
/// splice point.
fn merge_ambient(span: Span, ambient: &Style) -> Span {
    let style = ambient.apply(&span.style);
    Span { style, ..span }
}

fn emit_text(text: &str, state: &RenderState, out: &mut Vec<Span>) {
    if text.is_empty() {
        return;
    }
    let Some(colorizer) = &state.colorizer else {
        out.push(Span::styled(text, state.style.clone()));
        return;
    };

    let len = utf16_len(text);
    let mut color_for = match colorizer {
        ColorizerSpec::Gradient {
            stops,
            phase,
            negative_phase,
        } => {
            let mut generator = Gradient::new(stops.clone(), *phase, *negative_phase, len);
            Box::new(move || generator.next_color()) as Box<dyn FnMut() -> Color>
        }
        ColorizerSpec::Rainbow { phase } => {
            let mut generator = Rainbow::new(*phase, len);
            Box::new(move || generator.next_color()) as Box<dyn FnMut() -> Color>
        }
    };
    for ch in text.chars() {
        let mut style = state.style.clone();
        style.color = Some(color_for());
        out.push(Span::styled(ch.to_string(), style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn plain_text_round_trips() {
        let span = parse("just some text").expect("parse");
        assert_eq!(span, Span::text("just some text"));
    }

    #[test]
    fn empty_input_gives_an_empty_span() {
        let span = parse("").expect("parse");
        assert_eq!(span, Span::empty());
    }

    #[test]
    fn single_styled_run_is_lifted() {
        let span = parse("<yellow>TEST").expect("parse");
        assert_eq!(span.content_text(), Some("TEST"));
        assert_eq!(span.style.color, Color::parse("yellow"));
        assert!(span.children.is_empty());
    }

    #[test]
    fn context_records_message_and_tree() {
        let mini = MiniMark::new();
        let mut context = Context::new();
        mini.parse_format_in("<key>!", &["key", "value"], &mut context)
            .expect("parse");
        assert_eq!(context.replaced_message(), Some("value!"));
        assert!(context.root().is_some());
    }

    #[test]
    fn odd_placeholder_count_is_an_error() {
        let mini = MiniMark::new();
        assert_eq!(
            mini.parse_format("<a>", &["a", "b", "c"]),
            Err(ParseError::UnevenPlaceholders(3))
        );
    }

    #[test]
    fn placeholder_value_cannot_close_a_pre_block() {
        let mini = MiniMark::new();
        let mut context = Context::new();
        mini.parse_format_in("<pre><v></pre>", &["v", "x</pre>y"], &mut context)
            .expect("parse");
        assert_eq!(context.replaced_message(), Some("<pre>x\\</pre>y</pre>"));
    }

    #[test]
    fn string_templates_substitute_before_tokenizing() {
        let mini = MiniMark::new();
        let span = mini
            .parse_templates("<msg>", &[Template::string("msg", "<red>hi")])
            .expect("parse");
        assert_eq!(span.style.color, Color::parse("red"));
        assert_eq!(span.content_text(), Some("hi"));
    }

    #[test]
    fn component_templates_splice_without_rescanning() {
        let mini = MiniMark::new();
        let span = mini
            .parse_templates("<msg>", &[Template::component("msg", Span::text("<red>hi"))])
            .expect("parse");
        // the template value is not markup; it stays verbatim
        assert_eq!(span.content_text(), Some("<red>hi"));
    }

    #[test]
    fn last_template_for_a_key_wins() {
        let mini = MiniMark::new();
        let span = mini
            .parse_templates(
                "<msg>",
                &[
                    Template::component("msg", Span::text("first")),
                    Template::component("msg", Span::text("second")),
                ],
            )
            .expect("parse");
        assert_eq!(span.content_text(), Some("second"));
    }

    #[test]
    fn placeholder_resolver_fills_unknown_tags() {
        let mini = MiniMark::new()
            .placeholder_resolver(|name| (name == "who").then(|| Span::text("World")));
        let span = mini.parse("Hello <who>").expect("parse");
        assert_eq!(span.plain_text(), "Hello World");
    }
}
