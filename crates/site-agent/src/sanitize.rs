//! Sanitizing for presentation fields pushed over the webhook.
//!
//! The payload comes from an authenticated controller, but the fields end up
//! in HTML served to anonymous visitors, so everything is filtered on the way
//! into the store: titles become plain text, the logo must be an http(s) URL,
//! and the body text passes through a tag allowlist.

/// Strip tags and control characters; collapse surrounding whitespace.
pub fn plain_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() && c != '\n' && c != '\t' => {}
            c => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Validate an http(s) URL; anything else stores as empty.
pub fn url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match reqwest::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed.to_string(),
        _ => String::new(),
    }
}

/// Tags allowed through in rich body text. Attributes are always dropped.
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "b", "strong", "i", "em", "u", "ul", "ol", "li", "h1", "h2", "h3", "h4",
    "blockquote",
];

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Escape `text` for safe interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, text);
    out
}

/// Filter rich text through the tag allowlist.
///
/// Allowed tags are kept with their attributes stripped; every other tag is
/// removed entirely (its inner text survives). Raw `<`/`>`/`&` outside tags
/// are escaped.
pub fn rich_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        escape_into(&mut out, &rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('>') else {
            // Unterminated tag: escape the remainder literally.
            escape_into(&mut out, &rest[open..]);
            rest = "";
            break;
        };

        let tag_body = &after[..close];
        rest = &after[close + 1..];

        let closing = tag_body.starts_with('/');
        let name_part = tag_body.trim_start_matches('/');
        let name: String = name_part
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if !name.is_empty() && ALLOWED_TAGS.contains(&name.as_str()) {
            if closing {
                out.push_str(&format!("</{name}>"));
            } else {
                out.push_str(&format!("<{name}>"));
            }
        }
        // Disallowed tags (script, img, a, event handlers, ...) vanish.
    }

    escape_into(&mut out, rest);
    out.trim().to_string()
}
