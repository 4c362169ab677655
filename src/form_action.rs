use regex::Regex;
use std::sync::OnceLock;

// Compile regex patterns once and reuse them
static COMMENT: OnceLock<Regex> = OnceLock::new();
static FORM_TAG: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();

fn comment() -> &'static Regex {
    COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").unwrap())
}

fn form_tag() -> &'static Regex {
    // Quoted values may contain '>'
    FORM_TAG.get_or_init(|| Regex::new(r#"(?i)<form\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap())
}

fn attribute() -> &'static Regex {
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
    })
}

/// Returns the `action` of the first `<form>` (in document order) that has a
/// non-empty one, with character references decoded. Commented-out markup
/// is ignored.
pub fn extract_form_action(html: &str) -> Option<String> {
    let html = comment().replace_all(html, "");
    form_tag()
        .captures_iter(&html)
        .filter_map(|form| {
            let value = action_value(form.get(1)?.as_str())?;
            let value = decode_entities(value.trim());
            (!value.is_empty()).then_some(value)
        })
        .next()
}

/// First `action` attribute of a tag's attribute list. Repeated attributes
/// after the first are ignored, as HTML parsers do.
fn action_value(attrs: &str) -> Option<&str> {
    let caps = attribute()
        .captures_iter(attrs)
        .find(|caps| caps[1].eq_ignore_ascii_case("action"))?;
    let value = caps.get(2).or(caps.get(3)).or(caps.get(4));
    Some(value.map_or("", |m| m.as_str()))
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match rest.find(';').and_then(|end| Some((decode_entity(&rest[1..end])?, end))) {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
