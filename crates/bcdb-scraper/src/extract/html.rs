//! Minimal tag-level HTML scanning shared by the page extractors.
//!
//! The source pages are server-rendered templates with a stable shape, so
//! the extractors locate elements by tag name and class rather than building
//! a DOM.

use std::sync::LazyLock;

use bcdb_core::clean_text;
use regex::Regex;

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attr regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9A-Fa-f]+|#[0-9]+|[A-Za-z]+);").expect("valid entity regex")
});

const VOID_TAGS: [&str; 5] = ["img", "input", "meta", "link", "br"];

/// One element located in a document.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Element<'a> {
    /// The opening tag, `<` to `>` inclusive.
    pub open_tag: &'a str,
    /// Byte offset of the opening `<`.
    pub start: usize,
    /// Everything between the opening and matching closing tag.
    pub inner: &'a str,
    /// Byte offset just past the closing tag.
    pub end: usize,
}

impl<'a> Element<'a> {
    pub fn attr(&self, name: &str) -> Option<String> {
        attr(self.open_tag, name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Visible text with entities decoded and whitespace collapsed.
    pub fn text(&self) -> String {
        text_of(self.inner)
    }

    /// All descendant `tag` elements.
    pub fn children(&self, tag: &str) -> Vec<Element<'a>> {
        elements(self.inner, tag)
    }

    pub fn first(&self, tag: &str) -> Option<Element<'a>> {
        self.children(tag).into_iter().next()
    }

    pub fn first_with_class(&self, tag: &str, class: &str) -> Option<Element<'a>> {
        self.children(tag).into_iter().find(|e| e.has_class(class))
    }
}

/// Every `tag` element in `html`, in document order, nested ones included.
///
/// Closing tags are matched with nesting depth; an element left unclosed
/// extends to the end of the input.
pub(crate) fn elements<'a>(html: &'a str, tag: &str) -> Vec<Element<'a>> {
    let lower = html.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let is_void = VOID_TAGS.contains(&tag.as_str());
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find_open(&lower, &tag, cursor) {
        let Some(gt) = lower[start..].find('>') else {
            break;
        };
        let open_end = start + gt + 1;
        let (inner, end) = if is_void {
            ("", open_end)
        } else {
            let (inner_end, end) = match_close(&lower, &tag, open_end);
            (&html[open_end..inner_end], end)
        };
        found.push(Element {
            open_tag: &html[start..open_end],
            start,
            inner,
            end,
        });
        cursor = open_end;
    }
    found
}

/// `tag` elements carrying `class`.
pub(crate) fn elements_with_class<'a>(html: &'a str, tag: &str, class: &str) -> Vec<Element<'a>> {
    elements(html, tag)
        .into_iter()
        .filter(|e| e.has_class(class))
        .collect()
}

fn find_open(lower: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("<{tag}");
    let mut pos = from;
    while let Some(rel) = lower.get(pos..)?.find(&needle) {
        let start = pos + rel;
        let after = start + needle.len();
        match lower.as_bytes().get(after) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(start),
            None => return None,
            _ => pos = after,
        }
    }
    None
}

/// Returns `(inner_end, element_end)` for an element whose body starts at
/// `from`.
fn match_close(lower: &str, tag: &str, from: usize) -> (usize, usize) {
    let close = format!("</{tag}");
    let mut depth = 0usize;
    let mut pos = from;
    loop {
        let next_open = find_open(lower, tag, pos);
        let Some(next_close) = lower.get(pos..).and_then(|s| s.find(&close)).map(|r| pos + r)
        else {
            return (lower.len(), lower.len());
        };
        match next_open {
            Some(open) if open < next_close => {
                depth += 1;
                pos = open + 1;
            }
            _ => {
                let end = lower[next_close..]
                    .find('>')
                    .map_or(lower.len(), |gt| next_close + gt + 1);
                if depth == 0 {
                    return (next_close, end);
                }
                depth -= 1;
                pos = end;
            }
        }
    }
}

/// Value of attribute `name` in an opening tag, entity-decoded and trimmed.
pub(crate) fn attr(tag: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(tag).find_map(|caps| {
        let key = caps.get(1)?.as_str();
        if !key.eq_ignore_ascii_case(name) {
            return None;
        }
        let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
        Some(decode_entities(value.as_str()).trim().to_owned())
    })
}

/// Removes tags and comments, decodes entities, and collapses whitespace.
pub(crate) fn text_of(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    clean_text(&decode_entities(&stripped))
}

/// Decodes named entities common in the source templates plus numeric
/// references. Unknown entities are left as written.
pub(crate) fn decode_entities(raw: &str) -> String {
    ENTITY_RE
        .replace_all(raw, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "rsquo" => Some('\u{2019}'),
                    "lsquo" => Some('\u{2018}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}
