//! Note template rendering.
//!
//! Templates are plain text with `{{ field }}` placeholders. After
//! substitution, lines left without meaningful content are dropped so that a
//! line like `📱 {{mobilePhone}}` disappears for contacts without a mobile
//! number instead of rendering a bare icon.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Field, NormalizedContact};

// Whitespace inside the braces may include newlines.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap());

/// Markup characters ignored when deciding whether a line is blank.
const MARKUP_CHARS: [char; 3] = ['*', '`', '_'];

/// Byte range of one substituted value in the rendered text.
struct Substitution {
    start: usize,
    end: usize,
    filled: bool,
}

/// Render `template` for one contact.
///
/// Unknown placeholders resolve to `""`. A rendered line is dropped when it
/// is empty apart from markup characters, or when every placeholder on it
/// came out empty and what remains is decoration only (icons, separators,
/// punctuation). The result is trimmed and ends with exactly one newline.
pub fn render_template(template: &str, contact: &NormalizedContact) -> String {
    let (rendered, subs) = substitute(template, contact);

    let mut kept: Vec<&str> = Vec::new();
    let mut line_start = 0;
    for line in rendered.split('\n') {
        let line_end = line_start + line.len();
        let mut touching = subs
            .iter()
            .filter(|s| s.start <= line_end && s.end >= line_start)
            .peekable();
        let had_placeholders = touching.peek().is_some();
        let any_filled = touching.any(|s| s.filled);

        let decoration_only = had_placeholders
            && !any_filled
            && !line.chars().any(char::is_alphanumeric);
        if !is_blank(line) && !decoration_only {
            kept.push(line);
        }
        line_start = line_end + 1;
    }

    let mut out = kept.join("\n").trim().to_string();
    out.push('\n');
    out
}

fn substitute(template: &str, contact: &NormalizedContact) -> (String, Vec<Substitution>) {
    let mut out = String::with_capacity(template.len());
    let mut subs = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        let value = Field::from_name(&caps[1])
            .map(|field| contact.get(field))
            .unwrap_or_default();
        let start = out.len();
        out.push_str(value);
        subs.push(Substitution {
            start,
            end: out.len(),
            filled: !value.is_empty(),
        });
        last = whole.end();
    }
    out.push_str(&template[last..]);
    (out, subs)
}

fn is_blank(line: &str) -> bool {
    line.chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .all(char::is_whitespace)
}

/// A placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// `None` when the name is not a known field.
    pub field: Option<Field>,
}

/// List the distinct placeholders of `template` in order of first use.
pub fn template_fields(template: &str) -> Vec<Placeholder> {
    let mut seen: Vec<Placeholder> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let name = &caps[1];
        if seen.iter().any(|p| p.name == name) {
            continue;
        }
        seen.push(Placeholder {
            name: name.to_string(),
            field: Field::from_name(name),
        });
    }
    seen
}
