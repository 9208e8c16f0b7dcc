//! Element tree builder for tag markup.
//!
//! Consumes scanner matches and produces an ordered tree of raw-text and tag
//! nodes. Nesting is permissive: a close tag closes the nearest open tag
//! with the same name (case-insensitively), implicitly closing everything
//! opened after it; a close tag with no matching open is inert; open tags
//! left at end of input are closed where they stand.

use super::PRE_TAG;
use super::lexer::{self, Lexer};

/// A node of the parse tree.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementNode {
    /// Literal text between tags, escaped-tag pairs already unescaped.
    RawText(String),
    Tag(TagNode),
}

/// One argument of a tag, split on `:` with quoting honored.
#[derive(Clone, Debug, PartialEq)]
pub enum TagPart {
    /// A literal value, surrounding quotes stripped.
    Literal(String),
    /// A value that itself contained markup and was recursively tree-built.
    Markup(Vec<ElementNode>),
}

impl TagPart {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            TagPart::Literal(value) => Some(value),
            TagPart::Markup(_) => None,
        }
    }
}

/// A tag node: name, arguments, children, and the verbatim source of its
/// open (and, when present, close) tag so unresolvable tags can be restored
/// as literal text.
#[derive(Clone, Debug, PartialEq)]
pub struct TagNode {
    name: String,
    parts: Vec<TagPart>,
    token: String,
    close_token: Option<String>,
    children: Vec<ElementNode>,
}

impl TagNode {
    fn root() -> Self {
        TagNode {
            name: String::new(),
            parts: Vec::new(),
            token: String::new(),
            close_token: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parts(&self) -> &[TagPart] {
        &self.parts
    }

    /// Verbatim source of the open tag, delimiters included.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Verbatim source of the explicit close tag, when one was found.
    pub fn close_token(&self) -> Option<&str> {
        self.close_token.as_deref()
    }

    pub fn children(&self) -> &[ElementNode] {
        &self.children
    }

    fn is_root(&self) -> bool {
        self.name.is_empty() && self.token.is_empty()
    }
}

/// Build the element tree for the given markup text. The returned node is a
/// synthetic root holding the top-level nodes as children.
pub fn build_tree(input: &str) -> TagNode {
    let mut stack = vec![TagNode::root()];
    let mut cursor = 0;
    let mut raw_body = false;

    for m in Lexer::with_raw_tag(input, PRE_TAG) {
        if m.start > cursor {
            push_text(&mut stack, &input[cursor..m.start], raw_body);
        }
        cursor = m.end;

        if let Some(close_body) = m.token.strip_prefix('/') {
            raw_body = false;
            close_tag(&mut stack, close_body, &input[m.start..m.end]);
        } else {
            let (name, parts) = split_token(m.token);
            raw_body = name.eq_ignore_ascii_case(PRE_TAG);
            stack.push(TagNode {
                name,
                parts,
                token: input[m.start..m.end].to_string(),
                close_token: None,
                children: Vec::new(),
            });
        }
    }
    if cursor < input.len() {
        push_text(&mut stack, &input[cursor..], raw_body);
    }

    // end of input implicitly closes whatever is still open
    while stack.len() > 1 {
        attach_top(&mut stack);
    }
    stack.pop().unwrap_or_else(TagNode::root)
}

/// Top-level nodes of `input`, for recursively parsed argument values.
pub(crate) fn build_nodes(input: &str) -> Vec<ElementNode> {
    build_tree(input).children
}

fn push_text(stack: &mut Vec<TagNode>, segment: &str, raw: bool) {
    let value = if raw {
        segment.to_string()
    } else {
        lexer::unescape_tags(segment)
    };
    if let Some(top) = stack.last_mut() {
        top.children.push(ElementNode::RawText(value));
    }
}

/// Pop the top node and attach it to its parent.
fn attach_top(stack: &mut Vec<TagNode>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(node) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(ElementNode::Tag(node));
        }
    }
}

fn close_tag(stack: &mut Vec<TagNode>, close_body: &str, source: &str) {
    let (name, _) = split_token(close_body);
    let matched = stack
        .iter()
        .rposition(|node| !node.is_root() && node.name.eq_ignore_ascii_case(&name));
    match matched {
        Some(position) => {
            while stack.len() > position + 1 {
                attach_top(stack);
            }
            if let Some(node) = stack.last_mut() {
                node.close_token = Some(source.to_string());
            }
            attach_top(stack);
        }
        None => {
            log::trace!("ignoring close tag {source:?} with no matching open tag");
        }
    }
}

/// Split a token into its name and arguments on `:`, honoring quoting so a
/// quoted argument containing `:` stays whole.
fn split_token(token: &str) -> (String, Vec<TagPart>) {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = token.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == '\\' && matches!(chars.peek(), Some('\'' | '"')) {
                    current.push(c);
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                    continue;
                }
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    current.push(c);
                }
                ':' => segments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            },
        }
    }
    segments.push(current);

    let name = segments.remove(0);
    let parts = segments.into_iter().map(to_part).collect();
    (name, parts)
}

fn to_part(segment: String) -> TagPart {
    let value = strip_quotes(&segment);
    if value.starts_with('<') {
        TagPart::Markup(build_nodes(value))
    } else {
        TagPart::Literal(value.to_string())
    }
}

fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && matches!(bytes[0], b'\'' | b'"') && bytes[bytes.len() - 1] == bytes[0] {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(nodes: &[ElementNode]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| match n {
                ElementNode::RawText(t) => format!("text:{t}"),
                ElementNode::Tag(t) => format!("tag:{}", t.name()),
            })
            .collect()
    }

    #[test]
    fn plain_text_is_one_node() {
        let root = build_tree("Hello World");
        assert_eq!(root.children(), &[ElementNode::RawText("Hello World".into())]);
    }

    #[test]
    fn unclosed_tags_nest_to_end_of_input() {
        let root = build_tree("<yellow>TEST<green> nested");
        assert_eq!(texts(root.children()), vec!["tag:yellow"]);
        let ElementNode::Tag(yellow) = &root.children()[0] else {
            panic!("expected tag");
        };
        assert_eq!(texts(yellow.children()), vec!["text:TEST", "tag:green"]);
    }

    #[test]
    fn close_pops_down_to_matching_tag() {
        let root = build_tree("<bold><underlined>a</bold>b");
        let ElementNode::Tag(bold) = &root.children()[0] else {
            panic!("expected tag");
        };
        assert_eq!(bold.name(), "bold");
        assert!(bold.close_token().is_some());
        // underlined was implicitly closed inside bold, so "b" is a sibling of bold
        assert_eq!(texts(root.children()), vec!["tag:bold", "text:b"]);
        assert_eq!(texts(bold.children()), vec!["tag:underlined"]);
    }

    #[test]
    fn close_matches_case_insensitively() {
        let root = build_tree("<Yellow>x</YELLOW>y");
        assert_eq!(texts(root.children()), vec!["tag:Yellow", "text:y"]);
    }

    #[test]
    fn orphan_close_is_inert() {
        let root = build_tree("a</bold>b");
        assert_eq!(root.children(), &[
            ElementNode::RawText("a".into()),
            ElementNode::RawText("b".into()),
        ]);
    }

    #[test]
    fn close_records_its_source() {
        let root = build_tree("<oof>x</oof>");
        let ElementNode::Tag(oof) = &root.children()[0] else {
            panic!("expected tag");
        };
        assert_eq!(oof.token(), "<oof>");
        assert_eq!(oof.close_token(), Some("</oof>"));
    }

    #[test]
    fn token_splits_on_colons() {
        let root = build_tree("<click:run_command:test command>x");
        let ElementNode::Tag(click) = &root.children()[0] else {
            panic!("expected tag");
        };
        assert_eq!(click.name(), "click");
        assert_eq!(click.parts(), &[
            TagPart::Literal("run_command".into()),
            TagPart::Literal("test command".into()),
        ]);
    }

    #[test]
    fn quoted_part_keeps_colons_and_loses_quotes() {
        let root = build_tree("<hover:show_text:\"a:b\">x");
        let ElementNode::Tag(hover) = &root.children()[0] else {
            panic!("expected tag");
        };
        assert_eq!(hover.parts()[1], TagPart::Literal("a:b".into()));
    }

    #[test]
    fn markup_argument_is_tree_built() {
        let root = build_tree("<hover:show_text:\"<red>test:TEST\">x");
        let ElementNode::Tag(hover) = &root.children()[0] else {
            panic!("expected tag");
        };
        let TagPart::Markup(nodes) = &hover.parts()[1] else {
            panic!("expected markup part");
        };
        assert_eq!(texts(nodes), vec!["tag:red"]);
    }

    #[test]
    fn escaped_pairs_unescape_in_raw_text() {
        let root = build_tree(r"<yellow>TEST\<green\>\> \< nested\</green\>Test");
        let ElementNode::Tag(yellow) = &root.children()[0] else {
            panic!("expected tag");
        };
        assert_eq!(yellow.children(), &[ElementNode::RawText(
            r"TEST<green>\> \< nested</green>Test".into()
        )]);
    }

    #[test]
    fn pre_body_is_one_verbatim_node() {
        let root = build_tree(r"<pre><insert:test>\<x\>this</pre>after");
        let ElementNode::Tag(pre) = &root.children()[0] else {
            panic!("expected tag");
        };
        assert_eq!(pre.name(), "pre");
        assert_eq!(pre.children(), &[ElementNode::RawText(r"<insert:test>\<x\>this".into())]);
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn interleaved_close_only_closes_the_named_tag() {
        // </underlined> has no open match left after </bold> closed it implicitly
        let root = build_tree("<underlined><bold>a</underlined>b</bold>c");
        let ElementNode::Tag(underlined) = &root.children()[0] else {
            panic!("expected tag");
        };
        assert_eq!(underlined.name(), "underlined");
        assert_eq!(texts(root.children()), vec!["tag:underlined", "text:b", "text:c"]);
    }
}
