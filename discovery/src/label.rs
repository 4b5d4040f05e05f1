//! Best-effort display names for oceans.
//!
//! An ocean has no name column; its friendly label is sniffed from the
//! payload of its earliest memory. The result is cosmetic only: callers
//! must treat `None` as the normal case and fall back to the directory
//! identifier.
//!
//! Sniffing order:
//!
//! 1. JSON object payloads: the first non-empty string under one of
//!    [`NAME_KEYS`]; otherwise the text rules below applied to the string
//!    fields in [`TEXT_KEYS`].
//! 2. Text payloads: a `Ocean:` / `Name:` marker line, then a leading
//!    single-level markdown heading (`# Title`, not `## Title`).

use std::sync::LazyLock;

use regex::Regex;

/// JSON keys that name an ocean directly.
pub const NAME_KEYS: &[&str] = &["ocean_name", "display_name", "name", "title"];

/// JSON keys whose string values are searched as free text.
pub const TEXT_KEYS: &[&str] = &["gist", "content", "text", "summary"];

/// Longest label kept; longer ones are cut at a character boundary.
const MAX_LABEL_CHARS: usize = 60;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:ocean|name)\s*:\s*(\S.*?)\s*$").expect("static regex must compile")
});
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]+(\S.*?)[ \t#]*$").expect("static regex must compile"));

/// Infers a display name from a memory payload.
///
/// Returns `None` when nothing recognizable is found.
///
/// # Examples
///
/// ```
/// use ocean_explorer_discovery::infer_display_name;
///
/// assert_eq!(
///     infer_display_name(r#"{"ocean_name": "Harbor"}"#).as_deref(),
///     Some("Harbor")
/// );
/// assert_eq!(
///     infer_display_name("# Tidepool\nfirst entry").as_deref(),
///     Some("Tidepool")
/// );
/// assert_eq!(infer_display_name("## Not a title"), None);
/// ```
pub fn infer_display_name(payload: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(serde_json::Value::Object(map)) => {
            let named = NAME_KEYS
                .iter()
                .filter_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
                .find_map(clean_label);
            named.or_else(|| {
                TEXT_KEYS
                    .iter()
                    .filter_map(|key| map.get(*key).and_then(serde_json::Value::as_str))
                    .find_map(sniff_text)
            })
        }
        Ok(serde_json::Value::String(text)) => sniff_text(&text),
        Ok(_) => None,
        Err(_) => sniff_text(payload),
    }
}

/// Applies the marker and heading rules to free text.
fn sniff_text(text: &str) -> Option<String> {
    if let Some(label) = text
        .lines()
        .filter_map(|line| MARKER_RE.captures(line))
        .find_map(|caps| clean_label(&caps[1]))
    {
        return Some(label);
    }

    let first = text.lines().find(|line| !line.trim().is_empty())?;
    HEADING_RE
        .captures(first.trim_start())
        .and_then(|caps| clean_label(&caps[1]))
}

fn clean_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_LABEL_CHARS).collect())
}
