//! Answer extraction from free-form model output.
//!
//! Models are asked to wrap their move list in `<ANSWER>` … `</ANSWER>`.
//! Output that lacks either marker is common and is not an error: it yields
//! no actions, which the judge then scores like any other prediction.

/// Opening answer marker.
pub const ANSWER_OPEN: &str = "<ANSWER>";
/// Closing answer marker.
pub const ANSWER_CLOSE: &str = "</ANSWER>";

/// Text after the first `<ANSWER>`, up to the next `<ANSWER>` or
/// `</ANSWER>`, whichever comes first.
///
/// Returns `None` unless both markers occur somewhere in `text`. If no
/// marker follows the first opening one, everything after it is taken.
#[must_use]
pub fn answer_span(text: &str) -> Option<&str> {
    if !text.contains(ANSWER_CLOSE) {
        return None;
    }
    let (_, after_open) = text.split_once(ANSWER_OPEN)?;
    let segment = after_open
        .split_once(ANSWER_OPEN)
        .map_or(after_open, |(segment, _)| segment);
    let body = segment
        .split_once(ANSWER_CLOSE)
        .map_or(segment, |(body, _)| body);
    Some(body.trim())
}

/// Whitespace-separated move tokens inside the answer markers.
///
/// Empty when either marker is missing.
#[must_use]
pub fn extract_actions(text: &str) -> Vec<&str> {
    answer_span(text)
        .map(|body| body.split_whitespace().collect())
        .unwrap_or_default()
}
