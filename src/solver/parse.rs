//! Extraction of the proposed answer and submission URL from reasoning
//! output, with a deterministic fallback scan of the raw page text.
//!
//! The reasoning prompt asks the model for two labeled lines (`ANSWER:` and
//! `SUBMIT_URL:`). Models do not always comply, so label parsing is a set of
//! ordered rules over split lines rather than a single pattern, and the
//! submission URL falls back to scanning the task page itself.

use regex::Regex;
use std::sync::LazyLock;

const ANSWER_LABEL: &str = "ANSWER:";
const SUBMIT_URL_LABEL: &str = "SUBMIT_URL:";

/// URL ending in `/submit`, optionally with a path suffix.
static SUBMIT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"'<>]+/submit\b(?:/[^\s"'<>]*)?"#).unwrap()
});

/// URL containing `/api/submit`.
static API_SUBMIT_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"'<>]*/api/submit[^\s"'<>]*"#).unwrap()
});

/// Any URL-shaped substring, as a last resort.
static ANY_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).unwrap());

/// What the reasoning step produced. Absent fields are explicit: `None`
/// means "not found", which is distinct from "found empty".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReasoningOutcome {
    pub answer: Option<String>,
    pub submit_url: Option<String>,
}

/// Extract an answer and submission URL from LLM output, falling back to the
/// raw task page text when the output omits a usable submission URL.
///
/// Absence of either field is not an error here; the engine decides
/// termination.
pub fn parse(llm_output: &str, fallback_page_text: &str) -> ReasoningOutcome {
    let mut answer = None;
    let mut submit_url = None;

    for line in llm_output.lines() {
        let line = line.trim();
        if answer.is_none() {
            if let Some(value) = line.strip_prefix(ANSWER_LABEL) {
                answer = Some(value.trim().to_string());
            }
        }
        if submit_url.is_none() {
            if let Some(value) = line.strip_prefix(SUBMIT_URL_LABEL) {
                let value = value.trim();
                // Only accept values that look like URLs
                if value.starts_with("http") {
                    submit_url = Some(value.to_string());
                }
            }
        }
    }

    // No ANSWER: label; take the last non-empty line that is not a
    // SUBMIT_URL: line.
    if answer.is_none() {
        answer = llm_output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with(SUBMIT_URL_LABEL))
            .last()
            .map(str::to_string);
    }

    if submit_url.is_none() {
        submit_url = find_submit_url(fallback_page_text);
    }

    ReasoningOutcome { answer, submit_url }
}

/// Scan free text for a submission URL.
///
/// Patterns are tried in priority order; the first pattern with at least one
/// match wins, and the first match in document order is used.
pub fn find_submit_url(text: &str) -> Option<String> {
    for re in [&*SUBMIT_URL_RE, &*API_SUBMIT_URL_RE, &*ANY_URL_RE] {
        if let Some(m) = re.find(text) {
            return Some(m.as_str().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_lines() {
        let out = "Some preamble\nANSWER: 42\nSUBMIT_URL: https://x/submit\n";
        let outcome = parse(out, "");
        assert_eq!(outcome.answer.as_deref(), Some("42"));
        assert_eq!(outcome.submit_url.as_deref(), Some("https://x/submit"));
    }

    #[test]
    fn test_first_answer_label_wins() {
        let out = "ANSWER: 1\nANSWER: 2\n";
        let outcome = parse(out, "");
        assert_eq!(outcome.answer.as_deref(), Some("1"));
    }

    #[test]
    fn test_non_url_submit_value_discarded() {
        let out = "ANSWER: 42\nSUBMIT_URL: see the page footer\n";
        let outcome = parse(out, "no urls here");
        assert_eq!(outcome.answer.as_deref(), Some("42"));
        assert_eq!(outcome.submit_url, None);
    }

    #[test]
    fn test_answer_falls_back_to_last_line() {
        let out = "The value of the expression is\n\n1729\nSUBMIT_URL: https://x/submit\n";
        let outcome = parse(out, "");
        assert_eq!(outcome.answer.as_deref(), Some("1729"));
    }

    #[test]
    fn test_no_answer_at_all() {
        let outcome = parse("", "");
        assert_eq!(outcome.answer, None);
        assert_eq!(outcome.submit_url, None);
    }

    #[test]
    fn test_fallback_prefers_submit_suffix() {
        let page = "See https://example.com/docs and post to https://example.com/quiz/submit when done";
        let outcome = parse("ANSWER: 1", page);
        assert_eq!(
            outcome.submit_url.as_deref(),
            Some("https://example.com/quiz/submit")
        );
    }

    #[test]
    fn test_fallback_api_submit_second() {
        let page = "Endpoints: https://example.com/api/submit?task=3 and https://example.com/help";
        assert_eq!(
            find_submit_url(page).as_deref(),
            Some("https://example.com/api/submit?task=3")
        );
    }

    #[test]
    fn test_fallback_any_url_last_resort() {
        let page = "Instructions live at https://example.com/task/7 only";
        assert_eq!(
            find_submit_url(page).as_deref(),
            Some("https://example.com/task/7")
        );
    }

    #[test]
    fn test_fallback_first_match_in_document_order() {
        let page = "https://a.example/submit then https://b.example/submit";
        assert_eq!(find_submit_url(page).as_deref(), Some("https://a.example/submit"));
    }

    #[test]
    fn test_submit_suffix_requires_boundary() {
        let page = "https://example.com/submitfoo is not a submission endpoint";
        // Falls through to the any-URL rule, matching the whole thing.
        assert_eq!(
            find_submit_url(page).as_deref(),
            Some("https://example.com/submitfoo")
        );
    }

    #[test]
    fn test_llm_url_preferred_over_page() {
        let out = "ANSWER: 42\nSUBMIT_URL: https://llm.example/submit\n";
        let page = "https://page.example/submit";
        let outcome = parse(out, page);
        assert_eq!(outcome.submit_url.as_deref(), Some("https://llm.example/submit"));
    }
}
