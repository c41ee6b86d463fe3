//! Outbound text sanitizer.
//!
//! Stored text is kept exactly as submitted; every read path runs it through
//! [`sanitize`] before serialization. Tags on a small allow-list survive with their
//! permitted attributes, any other tag is escaped into inert text, and stray angle
//! brackets are escaped.

use std::sync::LazyLock;

use regex::Regex;
use wesaurus_types::{Definition, User, Word};

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^<>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9A-Fa-f]+)|#([0-9]+)|([A-Za-z][A-Za-z0-9]*));?").unwrap()
});

/// URL schemes an `href` or `src` may carry. Scheme-less (relative) URLs are allowed.
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp"];

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});

/// Tags that may pass through, with the attributes each one keeps.
fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    let attributes: &'static [&'static str] = match tag {
        "a" => &["href", "title", "target"],
        "img" => &["src", "alt", "title", "width", "height"],
        "abbr" => &["title"],
        "b" | "blockquote" | "br" | "code" | "del" | "div" | "em" | "h1" | "h2" | "h3"
        | "h4" | "h5" | "h6" | "hr" | "i" | "li" | "ol" | "p" | "pre" | "s" | "small"
        | "span" | "strong" | "sub" | "sup" | "u" | "ul" => &[],
        _ => return None,
    };
    Some(attributes)
}

fn is_url_attribute(name: &str) -> bool {
    matches!(name, "href" | "src")
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "colon" => ':',
        "sol" => '/',
        "num" => '#',
        "quest" => '?',
        "period" => '.',
        "lpar" => '(',
        "rpar" => ')',
        "Tab" => '\t',
        "NewLine" => '\n',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some(c)
}

/// Resolve character references in an attribute value. References that cannot be
/// resolved stay literal; the value is re-escaped on output, so a browser sees exactly
/// the string that was checked.
fn decode_entities(value: &str) -> String {
    ENTITY
        .replace_all(value, |caps: &regex::Captures| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else if let Some(decimal) = caps.get(2) {
                decimal.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_entity(name.as_str()))
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// `value` must already be decoded.
fn is_safe_url(value: &str) -> bool {
    let value: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    match value.find([':', '/', '?', '#']) {
        Some(end) if value[end..].starts_with(':') => SAFE_SCHEMES
            .iter()
            .any(|scheme| value[..end].eq_ignore_ascii_case(scheme)),
        _ => true,
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn rebuild_tag(closing: bool, name: &str, body: &str, allowed: &[&str], out: &mut String) {
    out.push('<');
    if closing {
        out.push('/');
        out.push_str(name);
        out.push('>');
        return;
    }
    out.push_str(name);

    for attribute in ATTRIBUTE.captures_iter(body) {
        let attribute_name = attribute[1].to_ascii_lowercase();
        if !allowed.contains(&attribute_name.as_str()) {
            continue;
        }
        let value = attribute
            .get(2)
            .or_else(|| attribute.get(3))
            .or_else(|| attribute.get(4))
            .map(|m| decode_entities(m.as_str()));

        match value {
            Some(value) if is_url_attribute(&attribute_name) && !is_safe_url(&value) => {}
            Some(value) => {
                out.push(' ');
                out.push_str(&attribute_name);
                out.push_str("=\"");
                escape_attribute(&value, out);
                out.push('"');
            }
            None => {
                out.push(' ');
                out.push_str(&attribute_name);
            }
        }
    }

    if body.trim_end().ends_with('/') {
        out.push_str(" /");
    }
    out.push('>');
}

/// Neutralize embedded markup in `input`.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for tag in TAG.captures_iter(input) {
        let Some(whole) = tag.get(0) else { continue };
        escape_text(&input[last..whole.start()], &mut out);
        last = whole.end();

        let name = tag[2].to_ascii_lowercase();
        match allowed_attributes(&name) {
            Some(allowed) => rebuild_tag(!tag[1].is_empty(), &name, &tag[3], allowed, &mut out),
            None => escape_text(whole.as_str(), &mut out),
        }
    }
    escape_text(&input[last..], &mut out);

    out
}

/// Outbound records whose free-text fields must be sanitized before they are serialized.
pub trait Sanitize {
    fn sanitized(self) -> Self;
}

impl Sanitize for Word {
    fn sanitized(self) -> Self {
        Self {
            text: sanitize(&self.text),
            ..self
        }
    }
}

impl Sanitize for Definition {
    fn sanitized(self) -> Self {
        Self {
            text: sanitize(&self.text),
            word_text: self.word_text.as_deref().map(sanitize),
            ..self
        }
    }
}

impl Sanitize for User {
    fn sanitized(self) -> Self {
        Self {
            user_name: sanitize(&self.user_name),
            email: sanitize(&self.email),
            ..self
        }
    }
}

impl<T: Sanitize> Sanitize for Vec<T> {
    fn sanitized(self) -> Self {
        self.into_iter().map(Sanitize::sanitized).collect()
    }
}
