//! Guess track metadata from file names.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

// 11-character video ids appended by common download tools: "Song [dQw4w9WgXcQ]".
static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[a-zA-Z0-9_-]{11}\]\s*").unwrap());
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[\s\-_.]+").unwrap());
static BRACKETED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[]\s*(\d+)\s*[)\]]").unwrap());
static WORD_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_.]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Derive a readable title from `path`'s file name.
pub fn guess_title(path: &Path) -> String {
    let name = stem(path);
    let name = VIDEO_ID.replace_all(&name, "");
    let name = LEADING_NUMBER.replace(&name, "");
    let name = WORD_SEPARATORS.replace_all(&name, " ");
    WHITESPACE.replace_all(&name, " ").trim().to_string()
}

/// Track number from a leading "01 - " style prefix, or from "(3)" / "[03]".
pub fn guess_track_number(path: &Path) -> Option<u32> {
    let name = stem(path);
    LEADING_NUMBER
        .captures(&name)
        .or_else(|| BRACKETED_NUMBER.captures(&name))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The "Artist" of "Artist - Title" when every file name shares it.
pub fn common_artist_prefix(paths: &[PathBuf]) -> Option<String> {
    let mut prefixes = paths.iter().map(|p| {
        let name = stem(p);
        name.split_once(" - ").map(|(prefix, _)| prefix.to_string())
    });

    let first = prefixes.next()??;
    for prefix in prefixes {
        if prefix.as_deref() != Some(first.as_str()) {
            return None;
        }
    }
    Some(first)
}
