//! Username canonicalization and text repair.
//!
//! Instagram exports are inconsistent about identity: handles appear with
//! leading `@`, mixed case, or embedded in free text, and comment bodies
//! sometimes carry UTF-8 byte sequences that were decoded one byte per
//! character (mojibake). Every loader funnels identifiers and free text
//! through this module before any lookup.

use std::sync::LazyLock;

use regex::Regex;

/// Matches an `@mention` inside free text.
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([a-zA-Z0-9._]+)").expect("mention regex is valid"));

/// Normalizes a handle for use as a map key.
///
/// Lowercases, trims surrounding whitespace, and strips leading `@`.
/// Empty input yields an empty string; callers treat empty as "no identity".
pub fn normalize_username(username: &str) -> String {
    username
        .trim()
        .to_lowercase()
        .trim_start_matches('@')
        .to_string()
}

/// Extracts the first `@mention` from a comment body, normalized.
pub fn extract_mentioned_username(text: &str) -> Option<String> {
    let caps = MENTION_RE.captures(text)?;
    let handle = normalize_username(&caps[1]);
    if handle.is_empty() {
        None
    } else {
        Some(handle)
    }
}

/// Repairs double-encoded Unicode text.
///
/// Export files sometimes store the UTF-8 bytes of a multi-byte character
/// as individual code points (e.g. Cyrillic "п" arrives as U+00D0 U+00BF).
/// This reinterprets each code point as a raw byte and re-decodes the
/// sequence as UTF-8.
///
/// The repair is accepted only when the result contains Cyrillic
/// characters, or when all mojibake-range characters disappeared and more
/// than 20% of the original string was in the suspicious 0x80-0xFF range.
/// Anything else, including invalid UTF-8, returns the input unchanged.
/// Never fails.
pub fn repair_mojibake(text: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }

    let has_pattern = text
        .chars()
        .any(|c| matches!(c as u32, 0x80..=0xBF | 0xD0..=0xDF));
    if !has_pattern {
        return text.to_string();
    }

    let flagged = text
        .chars()
        .filter(|&c| (0x80..=0xFF).contains(&(c as u32)))
        .count();
    if flagged == 0 {
        return text.to_string();
    }

    // Code points <= 0xFF are taken as raw bytes; anything higher is
    // re-encoded so mixed clean/mojibake strings survive.
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code <= 0xFF {
            bytes.push(code as u8);
        } else {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }

    match String::from_utf8(bytes) {
        Ok(fixed) => {
            let has_cyrillic = fixed
                .chars()
                .any(|c| matches!(c as u32, 0x0400..=0x04FF));
            let mojibake_gone = !fixed.chars().any(|c| matches!(c as u32, 0xD0..=0xDF));
            let char_count = text.chars().count();

            // flagged > 20% of length, compared in integers
            if has_cyrillic || (mojibake_gone && flagged * 5 > char_count) {
                fixed
            } else {
                text.to_string()
            }
        }
        Err(_) => text.to_string(),
    }
}

/// Truncates a string to at most `max_chars` characters (not bytes).
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
