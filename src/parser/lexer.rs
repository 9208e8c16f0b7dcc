//! Tag scanner for inline markup.
//!
//! Locates `<...>` tag boundaries in raw text and yields them as a lazy
//! sequence of non-overlapping matches. The scanner is quote-aware: inside a
//! `'` or `"` quoted argument, `<`, `>`, `:` and whitespace are ordinary
//! characters, and a backslash before a quote keeps the quote from closing.
//! A backslash immediately before `<` or `>` hides the delimiter from the
//! scanner entirely, so escaped text never matches.
//!
//! A candidate that runs into a bare `<`, an empty token or end of input is
//! abandoned and scanning resumes, so malformed regions fall through as plain
//! text once no further valid match is found.

/// A single tag match in the input.
#[derive(Clone, Debug, PartialEq)]
pub struct TagMatch<'a> {
    /// Byte offset of the match start (the `<`, or the `\` of an escaped `\<`).
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// Token text between the delimiters.
    pub token: &'a str,
    /// Byte ranges of quoted argument contents within `token`, quotes excluded.
    pub quoted: Vec<(usize, usize)>,
}

/// Lexer for tag markup.
///
/// # Examples
///
/// ```
/// use minimark::parser::Lexer;
///
/// let matches: Vec<_> = Lexer::new("<yellow>TEST</yellow>").collect();
/// assert_eq!(matches.len(), 2);
/// assert_eq!(matches[0].token, "yellow");
/// assert_eq!(matches[1].token, "/yellow");
/// ```
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Also match tags whose delimiters are backslash-escaped.
    match_escaped: bool,
    /// Tag name that switches the scanner into raw passthrough mode.
    raw_tag: Option<&'static str>,
    /// Literal close sequence currently being searched for in raw mode.
    pending_raw_close: Option<String>,
}

impl<'a> Lexer<'a> {
    /// Create a scanner over the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            match_escaped: false,
            raw_tag: None,
            pending_raw_close: None,
        }
    }

    /// Create a scanner that treats the body of `raw_tag` as verbatim text:
    /// after its open tag, no further matching occurs until the literal close
    /// sequence for that same name.
    pub fn with_raw_tag(input: &'a str, raw_tag: &'static str) -> Self {
        Self {
            raw_tag: Some(raw_tag),
            ..Self::new(input)
        }
    }

    /// Create a scanner that also matches tags with backslash-escaped
    /// delimiters, consuming the backslashes as part of the match.
    pub fn including_escaped(input: &'a str) -> Self {
        Self {
            match_escaped: true,
            ..Self::new(input)
        }
    }

    /// Scan one tag candidate starting at `start` (a `<`, or the `\` of an
    /// escaped `\<` when escaped matching is on). On failure returns the
    /// position scanning should resume from.
    fn try_match(&self, start: usize) -> Result<TagMatch<'a>, usize> {
        let bytes = self.input.as_bytes();
        let token_start = if bytes[start] == b'\\' { start + 2 } else { start + 1 };
        let mut i = token_start;
        let mut quote: Option<u8> = None;
        let mut quote_start = 0usize;
        let mut quoted = Vec::new();

        while i < bytes.len() {
            let b = bytes[i];
            if let Some(q) = quote {
                if b == b'\\' && i + 1 < bytes.len() && matches!(bytes[i + 1], b'\'' | b'"') {
                    i += 2;
                    continue;
                }
                if b == q {
                    quoted.push((quote_start - token_start, i - token_start));
                    quote = None;
                }
                i += 1;
                continue;
            }
            match b {
                b'\'' | b'"' => {
                    quote = Some(b);
                    quote_start = i + 1;
                    i += 1;
                }
                b'<' => return Err(i),
                b'>' => {
                    if i == token_start {
                        return Err(i + 1);
                    }
                    return Ok(TagMatch {
                        start,
                        end: i + 1,
                        token: &self.input[token_start..i],
                        quoted,
                    });
                }
                b'\\' if i + 1 < bytes.len() && bytes[i + 1] == b'>' => {
                    if self.match_escaped {
                        if i == token_start {
                            return Err(i);
                        }
                        return Ok(TagMatch {
                            start,
                            end: i + 2,
                            token: &self.input[token_start..i],
                            quoted,
                        });
                    }
                    i += 2;
                }
                b'\\' if i + 1 < bytes.len() && bytes[i + 1] == b'<' => {
                    if self.match_escaped {
                        return Err(i);
                    }
                    i += 2;
                }
                _ => i += 1,
            }
        }
        // no closing delimiter; give the rest of the region another chance
        Err(start + 1)
    }

    fn next_raw_close(&mut self, close: String) -> Option<TagMatch<'a>> {
        let mut from = self.pos;
        loop {
            let found = find_ignore_case(self.input, from, &close);
            // an escaped close sequence does not end the raw region
            if let Some(at) = found {
                if at > 0 && self.input.as_bytes()[at - 1] == b'\\' {
                    from = at + 1;
                    continue;
                }
            }
            return self.finish_raw_close(found, &close);
        }
    }

    fn finish_raw_close(&mut self, found: Option<usize>, close: &str) -> Option<TagMatch<'a>> {
        match found {
            Some(at) => {
                let end = at + close.len();
                self.pos = end;
                Some(TagMatch {
                    start: at,
                    end,
                    token: &self.input[at + 1..end - 1],
                    quoted: Vec::new(),
                })
            }
            None => {
                self.pos = self.input.len();
                None
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = TagMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(close) = self.pending_raw_close.take() {
            return self.next_raw_close(close);
        }

        let bytes = self.input.as_bytes();
        let mut i = self.pos;
        while i < bytes.len() {
            match bytes[i] {
                b'<' => {}
                b'\\' if i + 1 < bytes.len() && matches!(bytes[i + 1], b'<' | b'>') => {
                    if !(self.match_escaped && bytes[i + 1] == b'<') {
                        i += 2;
                        continue;
                    }
                }
                _ => {
                    i += 1;
                    continue;
                }
            }
            match self.try_match(i) {
                Ok(m) => {
                    self.pos = m.end;
                    if let Some(raw_tag) = self.raw_tag {
                        if tag_name(m.token).eq_ignore_ascii_case(raw_tag) {
                            self.pending_raw_close = Some(format!("</{raw_tag}>"));
                        }
                    }
                    return Some(m);
                }
                Err(resume) => i = resume,
            }
        }
        self.pos = bytes.len();
        None
    }
}

/// The name portion of a token: everything before the first `:`.
pub(crate) fn tag_name(token: &str) -> &str {
    token.split(':').next().unwrap_or(token)
}

fn find_ignore_case(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() || from > h.len() - n.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Rewrite complete `\<token\>` shapes in plain text. With `keep` the token
/// is emitted with real delimiters (unescaping); without it the whole shape
/// is dropped. Stray `\<`, `\>` and every other backslash sequence pass
/// through unchanged.
fn rewrite_escaped_tags(text: &str, keep: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(at) = rest.find("\\<") else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        let candidate = &rest[at + 2..];
        match escaped_token_end(candidate) {
            Some(end) => {
                if keep {
                    out.push('<');
                    out.push_str(&candidate[..end]);
                    out.push('>');
                }
                rest = &candidate[end + 2..];
            }
            None => {
                out.push_str("\\<");
                rest = candidate;
            }
        }
    }
}

/// Find the `\>` that completes an escaped tag whose body starts at the
/// beginning of `s`. Bare delimiters or a nested `\<` break the shape.
fn escaped_token_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    for i in 0..bytes.len() {
        match bytes[i] {
            b'<' | b'>' => return None,
            b'\\' => match bytes.get(i + 1) {
                Some(b'>') => return if i == 0 { None } else { Some(i) },
                Some(b'<') => return None,
                _ => {}
            },
            _ => {}
        }
    }
    None
}

/// Turn complete `\<token\>` shapes back into literal `<token>` text.
pub(crate) fn unescape_tags(text: &str) -> String {
    rewrite_escaped_tags(text, true)
}

/// Drop complete `\<token\>` shapes from plain text.
pub(crate) fn remove_escaped_tags(text: &str) -> String {
    rewrite_escaped_tags(text, false)
}
