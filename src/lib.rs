//! Inline tag-markup compiler for styled text.
//!
//! This crate compiles a compact tag syntax into a tree of styled [`Span`]s,
//! and can serialize such a tree back into markup.
//!
//! # Overview
//!
//! Tags are written as `<name>` or `<name:arg:arg>`, closed with `</name>`:
//!
//! - `<yellow>`, `<color:yellow>`, `<#ff00ff>` - foreground color
//! - `<bold>`, `<italic>`, `<underlined>`, `<strikethrough>`, `<obfuscated>` - decorations
//! - `<hover:show_text:"<red>hi">` - hover payload, value may itself be markup
//! - `<click:run_command:/help me>` - click payload, value kept verbatim
//! - `<key:key.jump>` - keybind reference
//! - `<lang:some.key:'<red>arg'>` - translation key with styled arguments
//! - `<insert:text>` - shift-click insertion
//! - `<font:minecraft:uniform>` - font
//! - `<gradient:#5e4fa2:#f79459>`, `<rainbow>` - per-character color runs
//! - `<pre>` - verbatim region, no tag interpretation inside
//! - `<reset>` - drop all inherited styling
//! - `\<` and `\>` - escaped delimiters, always literal
//!
//! Nesting is permissive: a close tag closes the nearest open tag of that
//! name, a stray close tag is ignored, and tags left open run to the end of
//! the input.
//!
//! Markup never hard-fails. An unknown tag, or a known tag with invalid
//! arguments, renders as its own literal source text; this is deliberate, as
//! markup is routinely authored by untrusted users. The only hard error the
//! API reports is calling it with an odd placeholder list.
//!
//! # Usage
//!
//! ```
//! use minimark::{MiniMark, serialize};
//!
//! let mini = MiniMark::new();
//! let span = mini.parse("<yellow>TEST<green> nested</green>Test").unwrap();
//! assert_eq!(span.plain_text(), "TEST nestedTest");
//! assert_eq!(span.children.len(), 3);
//!
//! // and back out again
//! assert_eq!(
//!     serialize(&span),
//!     "<color:yellow>TEST<color:green> nested<color:yellow>Test"
//! );
//! ```
//!
//! Placeholders and templates substitute caller values into the input:
//!
//! ```
//! use minimark::{MiniMark, Span, Template};
//!
//! let mini = MiniMark::new();
//! let span = mini.parse_format("<name>!", &["name", "World"]).unwrap();
//! assert_eq!(span.plain_text(), "World!");
//!
//! let span = mini
//!     .parse_templates("<name>!", &[Template::component("name", Span::text("World"))])
//!     .unwrap();
//! assert_eq!(span.plain_text(), "World!");
//! ```

pub mod color;
pub mod error;
pub mod escape;
pub mod markup;
pub mod parser;
pub mod serializer;
pub mod span;
pub mod style;
pub mod template;
pub mod transform;

pub use color::Color;
pub use error::ParseError;
pub use escape::{escape_tags, strip_tags};
pub use markup::{Context, MiniMark, parse};
pub use serializer::serialize;
pub use span::{Content, Span};
pub use style::{ClickEvent, Decoration, Decorations, HoverEvent, Style};
pub use template::Template;
pub use transform::{Transformation, TransformationRegistry, TransformationType};
