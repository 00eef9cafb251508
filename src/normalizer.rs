// Name canonicalization: legal / registered names into customer-facing display names
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use regex::Regex;

static DBA_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:d\s*/\s*b\s*/\s*a|d\.b\.a\.?|dba|doing\s+business\s+as)(?:\s*:|\s|$)")
        .expect("valid dba regex")
});

/// A corporate suffix and everything after it ("LLC of Florida", "Inc - Miami").
static CORPORATE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[\s,]+(?:l\.?l\.?c\.?|inc\.?|incorporated|corp\.?|corporation|ltd\.?|limited|company|co\.|holdings|enterprises|partners|group|management|hospitality)(?:\W.*)?$",
    )
    .expect("valid suffix regex")
});

static STORE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:/\s*store\s*#?\s*\d+|\bstore\s*#\s*\d+|#\s*\d+)\s*$")
        .expect("valid store number regex")
});

static TRAILING_PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("valid parenthetical regex"));

/// Kept lowercase unless they open the name.
const LOWERCASE_WORDS: [&str; 10] = ["the", "at", "by", "of", "and", "or", "for", "in", "on", "with"];

/// Canonical display name for a registered business name.
///
/// Cleanup (DBA marker, corporate suffix, store number, trailing parenthetical,
/// whitespace) repeats until the text stops changing, then words are title-cased.
/// The result is a fixed point: canonicalizing it again returns it unchanged.
/// If cleanup leaves nothing, the trimmed input is returned (or the raw input
/// when it is only whitespace).
pub fn canonicalize_name(raw: &str) -> String {
    let input = raw.trim();
    if input.is_empty() {
        return raw.to_string();
    }

    let mut current = input.to_string();
    loop {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    if current.is_empty() {
        return input.to_string();
    }
    title_case(&current)
}

/// Lowercase, punctuation-free key used for table lookups and comparisons.
pub fn name_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\'' | '’' | '`' => {}
            '&' => key.push_str(" and "),
            c if c.is_alphanumeric() => key.extend(c.to_lowercase()),
            _ => key.push(' '),
        }
    }
    collapse_whitespace(&key)
}

fn clean_once(text: &str) -> String {
    let trade_name = strip_dba(text);
    let without_suffix = CORPORATE_SUFFIX.replace(&trade_name, "");
    let without_store = STORE_NUMBER.replace(&without_suffix, "");
    let without_paren = TRAILING_PARENTHETICAL.replace(&without_store, "");
    let trimmed = without_paren
        .trim_end_matches(|c: char| c == ',' || c == '&' || c == '-' || c.is_whitespace());
    collapse_whitespace(trimmed)
}

/// Keeps the last non-empty segment around DBA markers.
fn strip_dba(text: &str) -> String {
    let segments: Vec<&str> = DBA_MARKER.split(text).collect();
    if segments.len() < 2 {
        return text.to_string();
    }
    segments
        .iter()
        .rev()
        .find(|segment| segment.chars().any(char::is_alphanumeric))
        .map(|segment| segment.to_string())
        .unwrap_or_else(|| text.to_string())
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && LOWERCASE_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercases the first letter. An all-caps remainder ("VERSAILLES") is lowered,
/// mixed-case words ("McDonald's") keep their inner capitals.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    let shouting = rest.chars().any(char::is_alphabetic) && !rest.chars().any(char::is_lowercase);

    let mut out = String::with_capacity(word.len());
    let upper = first.to_uppercase();
    if upper.len() == 1 {
        out.extend(upper);
    } else {
        out.push(first);
    }
    if shouting {
        out.extend(rest.chars().flat_map(char::to_lowercase));
    } else {
        out.push_str(rest);
    }
    out
}
