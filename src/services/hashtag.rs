//! Hashtag extraction
//!
//! Tags are words prefixed with `#` in article content. A tag runs over
//! letters, digits, `_` and `-`, so `#rust.` yields `rust`. Words longer
//! than [`MAX_TAG_LEN`] characters are not tags.

use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([\p{L}\p{N}_-]+)").expect("hashtag pattern compiles"));

/// Longest tag in characters, matching the `hashtags.tag` column
pub const MAX_TAG_LEN: usize = 100;

/// Distinct hashtags in `content`, in order of first appearance, without `#`
pub fn extract_hashtags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for caps in HASHTAG_RE.captures_iter(content) {
        let tag = &caps[1];
        if tag.chars().count() > MAX_TAG_LEN {
            continue;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Normalize a tag lookup: surrounding whitespace and one leading `#` are dropped
pub fn normalize_tag(query: &str) -> &str {
    let trimmed = query.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed)
}
