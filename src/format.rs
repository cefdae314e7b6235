//! Text and date helpers used by the views.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"));

/// Split text into sentences ending in `.`, `!` or `?`.
///
/// The first "U.S." is collapsed to "US" so it doesn't end a sentence. Text after
/// the last terminator is dropped, and input with no terminator yields nothing.
pub fn break_into_sentences(text: &str) -> Vec<String> {
    let text = text.replacen("U.S.", "US", 1);
    SENTENCE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Long-form British date, e.g. "Monday 9 December 2024".
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%A %-d %B %Y").to_string()
}

pub fn format_epoch_millis(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis).single().map(format_date)
}
