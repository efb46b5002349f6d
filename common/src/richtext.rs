//! Helpers for turning CMS rich text into plain strings for cards and CLI
//! output.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Extracts readable text from an editor document.
///
/// The editor stores `{ root: { children: [block, ...] } }`; each top-level
/// block becomes one paragraph, separated by a blank line. A plain string is
/// returned as-is.
pub fn plain_text(doc: &Value) -> String {
    if let Value::String(text) = doc {
        return text.clone();
    }

    let root = doc.get("root").unwrap_or(doc);
    let blocks = root.get("children").and_then(Value::as_array);

    let mut paragraphs = Vec::new();
    for block in blocks.into_iter().flatten() {
        let mut buf = String::new();
        collect_text(block, &mut buf);
        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            paragraphs.push(trimmed.to_string());
        }
    }
    paragraphs.join("\n\n")
}

fn collect_text(node: &Value, out: &mut String) {
    match node.get("type").and_then(Value::as_str) {
        Some("linebreak") => {
            out.push('\n');
            return;
        }
        Some("listitem") if !out.is_empty() && !out.ends_with('\n') => out.push('\n'),
        _ => {}
    }

    if let Some(text) = node.get("text").and_then(Value::as_str) {
        out.push_str(text);
    }
    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            collect_text(child, out);
        }
    }
}

/// Collapses whitespace and shortens `text` to at most `max_chars`
/// characters, cutting on a word boundary and appending `…`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    if collapsed.chars().count() <= max_chars {
        return collapsed.into_owned();
    }

    let cut: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    let mut out = cut.trim_end_matches([' ', ',', ';', ':', '.', '-']).to_string();
    out.push('…');
    out
}

fn group_thousands(amount: f64) -> String {
    let digits = (amount.round() as i64).abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Human-readable salary range, `None` when neither bound is set.
pub fn format_salary(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) if (min - max).abs() < f64::EPSILON => {
            Some(format!("${}", group_thousands(min)))
        }
        (Some(min), Some(max)) => Some(format!(
            "${} – ${}",
            group_thousands(min),
            group_thousands(max)
        )),
        (Some(min), None) => Some(format!("From ${}", group_thousands(min))),
        (None, Some(max)) => Some(format!("Up to ${}", group_thousands(max))),
        (None, None) => None,
    }
}
