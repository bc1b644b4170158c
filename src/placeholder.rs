//! Marker-delimited regions in hand-maintained markdown files.
//!
//! Everything outside the markers is kept verbatim. Each marker must occur
//! exactly once, otherwise nothing is replaced.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaceholderError {
    #[error("{0} placeholder not found")]
    Missing(String),

    #[error("{0} placeholder appears {1} times, expected once")]
    Duplicate(String, usize),

    #[error("{end} placeholder comes before {start}")]
    OutOfOrder { start: String, end: String },
}

/// Byte offset of the single occurrence of `marker`
fn find_unique(text: &str, marker: &str) -> Result<usize, PlaceholderError> {
    let count = text.matches(marker).count();
    match count {
        0 => Err(PlaceholderError::Missing(marker.to_string())),
        1 => Ok(text.find(marker).unwrap_or_default()),
        n => Err(PlaceholderError::Duplicate(marker.to_string(), n)),
    }
}

/// Replace everything between `start` and `end`, keeping both markers
pub fn replace_between(
    text: &str,
    start: &str,
    end: &str,
    replacement: &str,
) -> Result<String, PlaceholderError> {
    let start_at = find_unique(text, start)?;
    let end_at = find_unique(text, end)?;

    let region_start = start_at + start.len();
    if end_at < region_start {
        return Err(PlaceholderError::OutOfOrder {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let mut result = String::with_capacity(text.len() + replacement.len());
    result.push_str(&text[..region_start]);
    result.push_str(replacement);
    result.push_str(&text[end_at..]);
    Ok(result)
}

/// Insert `content` right after `marker`
pub fn insert_after(text: &str, marker: &str, content: &str) -> Result<String, PlaceholderError> {
    let at = find_unique(text, marker)? + marker.len();

    let mut result = String::with_capacity(text.len() + content.len());
    result.push_str(&text[..at]);
    result.push_str(content);
    result.push_str(&text[at..]);
    Ok(result)
}
