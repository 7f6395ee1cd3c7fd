//! Just enough HTML scraping for page titles and a few MediaWiki links.
//!
//! Pages are never parsed into a tree; elements are picked out with regexes, then their
//! attributes are read with a second pass, as pages are often too broken for anything stricter.

use once_cell::sync::Lazy;
use regex::Regex;

// name=value, with the value double-quoted, single-quoted or bare.
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^\s"'>]+))"#)
        .unwrap()
});
static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\b([^>]*)>(.*?)</a\s*>"#).unwrap());
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<title\b[^>]*>(.*?)</title\s*>"#).unwrap());
static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<p\b([^>]*)>(.*?)</p\s*>"#).unwrap());
static TAG_STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<[^>]+>").unwrap());
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// An `<a>` element: its `href` (if any), its classes and its text.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub href: Option<String>,
    pub class: Vec<String>,
    pub text: String,
}

impl Anchor {
    pub fn has_class(&self, class: &str) -> bool {
        self.class.iter().any(|c| c == class)
    }
}

pub fn collect_anchors(html: &str) -> Vec<Anchor> {
    ANCHOR_RE
        .captures_iter(html)
        .map(|c| {
            let attrs = c.get(1).map(|m| m.as_str()).unwrap_or_default();
            Anchor {
                href: attr(attrs, "href").map(|h| decode_entities(&h)),
                class: split_class(attr(attrs, "class")),
                text: inner_text(c.get(2).map(|m| m.as_str()).unwrap_or_default()),
            }
        })
        .collect()
}

/// Text of every `<title>` element in document order.
pub fn collect_titles(html: &str) -> Vec<String> {
    TITLE_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| inner_text(m.as_str())))
        .collect()
}

/// Text of every `<p>` element carrying `class`.
pub fn collect_paragraphs_with_class(html: &str, class: &str) -> Vec<String> {
    PARAGRAPH_RE
        .captures_iter(html)
        .filter(|c| {
            let attrs = c.get(1).map(|m| m.as_str()).unwrap_or_default();
            split_class(attr(attrs, "class")).iter().any(|c| c == class)
        })
        .filter_map(|c| c.get(2).map(|m| inner_text(m.as_str())))
        .collect()
}

/// Value of the first attribute called `name` (any case) in a tag's attribute text.
fn attr(attrs: &str, name: &str) -> Option<String> {
    let cap = ATTR_RE
        .captures_iter(attrs)
        .find(|c| c[1].eq_ignore_ascii_case(name))?;
    ["dq", "sq", "bare"]
        .iter()
        .find_map(|group| cap.name(group))
        .map(|m| m.as_str().to_string())
}

fn split_class(class: Option<String>) -> Vec<String> {
    class
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Strip nested tags, decode entities and collapse whitespace.
pub fn inner_text(fragment: &str) -> String {
    let text = TAG_STRIP_RE.replace_all(fragment, "");
    collapse_whitespace(&decode_entities(&text))
}

/// Runs of whitespace become one space; the ends are trimmed.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode numeric references and the handful of named entities that turn up in titles.
/// Unknown names are left as written.
pub fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |c: &regex::Captures<'_>| {
            let name = &c[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    "ndash" => Some('\u{2013}'),
                    "mdash" => Some('\u{2014}'),
                    "hellip" => Some('\u{2026}'),
                    _ => None,
                }
            };
            decoded.map(String::from).unwrap_or_else(|| c[0].to_string())
        })
        .into_owned()
}
