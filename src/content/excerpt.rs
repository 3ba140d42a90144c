//! Plain-text excerpts and reading time

use lazy_static::lazy_static;
use regex::Regex;

/// Marker separating the excerpt from the rest of a post
pub const MORE_MARKER: &str = "<!-- more -->";

/// Default excerpt length in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 200;

/// Reading speed used by [`estimate_reading_time`], in characters per minute
pub const READING_SPEED: usize = 300;

lazy_static! {
    static ref FENCED_CODE: Regex = Regex::new(r"```[\s\S]*?```").unwrap();
    static ref IMAGE: Regex = Regex::new(r"!\[[^\]]*\]\([^)]+\)").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
    static ref HEADING: Regex = Regex::new(r"(?m)^#+\s+").unwrap();
    static ref BLOCKQUOTE: Regex = Regex::new(r"(?m)^>\s+").unwrap();
    static ref BULLET: Regex = Regex::new(r"(?m)^[-*+]\s+").unwrap();
    static ref ORDERED: Regex = Regex::new(r"(?m)^\d+\.\s+").unwrap();
    static ref RULE: Regex = Regex::new(r"(?m)^---+$").unwrap();
    static ref STRONG_STAR: Regex = Regex::new(r"\*\*([^*]+)\*\*").unwrap();
    static ref EM_STAR: Regex = Regex::new(r"\*([^*]+)\*").unwrap();
    static ref STRONG_UNDERSCORE: Regex = Regex::new(r"__([^_]+)__").unwrap();
    static ref EM_UNDERSCORE: Regex = Regex::new(r"_([^_]+)_").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`\n]+`").unwrap();
    static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Derive a plain-text excerpt from a Markdown body.
///
/// Text before [`MORE_MARKER`] wins when present. Otherwise the stripped body
/// is cut to `max_length` characters, with `...` appended only when cut.
pub fn extract_excerpt(content: &str, max_length: usize) -> String {
    if let Some(pos) = content.find(MORE_MARKER) {
        return strip_markdown(&content[..pos]).trim().to_string();
    }

    let stripped = strip_markdown(content);
    if stripped.chars().count() <= max_length {
        return stripped;
    }
    let truncated: String = stripped.chars().take(max_length).collect();
    format!("{}...", truncated)
}

/// Remove Markdown syntax, keeping readable text. Code is dropped entirely.
pub fn strip_markdown(content: &str) -> String {
    // Block-level constructs go first so their markers can't pair with
    // emphasis on other lines.
    let text = FENCED_CODE.replace_all(content, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = HEADING.replace_all(&text, "");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = RULE.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "");
    let text = ORDERED.replace_all(&text, "");
    let text = STRONG_STAR.replace_all(&text, "$1");
    let text = EM_STAR.replace_all(&text, "$1");
    let text = STRONG_UNDERSCORE.replace_all(&text, "$1");
    let text = EM_UNDERSCORE.replace_all(&text, "$1");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Estimated reading time in whole minutes, never less than one
pub fn estimate_reading_time(content: &str) -> usize {
    let chars = content.chars().count();
    chars.div_ceil(READING_SPEED).max(1)
}
