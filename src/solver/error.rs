//! Solver error taxonomy.
//!
//! Transient errors (fetch, submit) are retried in-place by the engine;
//! structural errors (missing answer, missing submit URL) terminate the
//! session immediately, since retrying the same unparseable content cannot
//! help.

use std::time::Duration;
use thiserror::Error;

/// Both the direct fetch and the rendered fallback failed for a task URL.
#[derive(Debug, Error)]
#[error("failed to fetch {url}: direct fetch: {direct}; rendered fallback: {fallback}")]
pub struct FetchError {
    pub url: String,
    pub direct: String,
    pub fallback: String,
}

/// Submission to the grading endpoint failed.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("network error submitting to {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("could not decode submission response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Terminal outcome of a solve session that did not produce a submission
/// result.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("reasoning service call failed: {0}")]
    Reasoning(String),

    #[error("reasoning output contained no answer")]
    MissingAnswer,

    #[error("no submission URL found in reasoning output or task page")]
    MissingSubmitUrl,

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("attempt or time budget exhausted after {attempts} attempts ({elapsed:?})")]
    Budget { attempts: u32, elapsed: Duration },
}

impl SolveError {
    /// Stable machine-readable error kind, reported to API callers.
    pub fn kind(&self) -> &'static str {
        match self {
            SolveError::Fetch(_) => "fetch_error",
            SolveError::Reasoning(_) => "reasoning_failed",
            SolveError::MissingAnswer => "missing_answer",
            SolveError::MissingSubmitUrl => "missing_submit_url",
            SolveError::Submit(SubmitError::Network { .. }) => "submit_network",
            SolveError::Submit(SubmitError::Decode { .. }) => "submit_decode",
            SolveError::Budget { .. } => "budget_exhausted",
        }
    }
}
