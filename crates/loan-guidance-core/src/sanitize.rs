//! HTML-to-plain-text conversion for the narrative block, plus display
//! formatting helpers.

use regex::Regex;
use std::sync::OnceLock;

use rust_decimal::Decimal;

use crate::types::Money;

fn header_regex() -> &'static Regex {
    static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADER_REGEX.get_or_init(|| Regex::new(r"<h[1-6][^>]*>(.*?)</h[1-6]>").unwrap())
}

fn paragraph_regex() -> &'static Regex {
    static PARAGRAPH_REGEX: OnceLock<Regex> = OnceLock::new();
    PARAGRAPH_REGEX.get_or_init(|| Regex::new(r"<p[^>]*>(.*?)</p>").unwrap())
}

fn list_item_regex() -> &'static Regex {
    static LIST_ITEM_REGEX: OnceLock<Regex> = OnceLock::new();
    LIST_ITEM_REGEX.get_or_init(|| Regex::new(r"<li[^>]*>(.*?)</li>").unwrap())
}

fn break_regex() -> &'static Regex {
    static BREAK_REGEX: OnceLock<Regex> = OnceLock::new();
    BREAK_REGEX.get_or_init(|| Regex::new(r"<br[^>]*>").unwrap())
}

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn newline_run_regex() -> &'static Regex {
    static NEWLINE_RUN_REGEX: OnceLock<Regex> = OnceLock::new();
    NEWLINE_RUN_REGEX.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Convert HTML content to plain text, preserving basic structure:
/// headers become `** text **`, paragraphs and list items become
/// newline-delimited lines, every remaining tag is stripped, and runs of
/// three or more newlines collapse to exactly two.
///
/// Patterns do not cross newlines; a tag whose content spans lines is
/// dropped by the final strip pass instead of being converted.
pub fn sanitize_html(html_content: &str) -> String {
    if html_content.is_empty() {
        return String::new();
    }

    let decoded = decode_entities(html_content);

    let text = header_regex().replace_all(&decoded, "** $1 **\n");
    let text = paragraph_regex().replace_all(&text, "$1\n\n");
    let text = list_item_regex().replace_all(&text, "- $1\n");
    let text = break_regex().replace_all(&text, "\n");
    let text = tag_regex().replace_all(&text, "");
    let text = newline_run_regex().replace_all(&text, "\n\n");

    text.trim().to_string()
}

/// Decode the named entities the narrative templates can produce.
fn decode_entities(content: &str) -> String {
    content
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Format a monetary value as USD with thousands grouping: `$1,234.56`.
pub fn format_currency(value: Money) -> String {
    let rounded = value.round_dp(2).abs();
    let text = format!("{rounded:.2}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !value.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}

/// Format a ratio as a percentage with two decimals: `12.34%`.
pub fn format_percentage(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
