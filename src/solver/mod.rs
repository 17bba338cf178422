//! The iterative solve-and-submit engine.
//!
//! Submodules, leaf-first: `fetch` retrieves task pages (with a rendered
//! fallback in `render`), `reason` asks the language model for an answer,
//! `parse` extracts the answer and submission URL from its output, `answer`
//! coerces the answer text, `submit` posts it, and `engine` drives the
//! retry/chain/terminate loop over all of them.

pub mod answer;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod reason;
pub mod render;
pub mod submit;

pub use answer::{coerce, Answer};
pub use engine::SolveEngine;
pub use error::{FetchError, SolveError, SubmitError};
pub use fetch::{ContentFetcher, TaskFetcher, TaskPage};
pub use parse::ReasoningOutcome;
pub use reason::{LlmReasoner, Reasoner};
pub use submit::{AnswerSubmitter, HttpSubmitter, SubmissionPayload, SubmissionResult};

/// Truncate to at most `max` bytes without splitting a UTF-8 character.
/// Used for log previews; page bodies are never logged in full.
pub(crate) fn preview(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
