//! Answer coercion.
//!
//! Graders compare numeric payload fields rather than strings, so answers
//! that look numeric are submitted as JSON numbers. Coercion is pure and
//! total: anything that does not match the numeric rules stays text.

use serde::Serialize;

/// A coerced answer value, serialized untagged so numbers go over the wire
/// as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Integer(n) => write!(f, "{}", n),
            Answer::Number(n) => write!(f, "{}", n),
            Answer::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Coerce a textual answer into a numeric or string value.
///
/// Rules, evaluated in order on the trimmed text: if it contains a `.` and
/// the remainder (stripped of one leading `-` and the decimal point) is all
/// decimal digits, parse as f64; else if the text stripped of one leading `-`
/// is all decimal digits, parse as i64; else keep as text.
pub fn coerce(text: &str) -> Answer {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);

    if trimmed.contains('.') {
        let digits = unsigned.replacen('.', "", 1);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return Answer::Number(n);
            }
        }
    } else if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Answer::Integer(n);
        }
    }

    Answer::Text(trimmed.to_string())
}
