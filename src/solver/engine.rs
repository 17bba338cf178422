//! The solve-and-submit orchestration loop.
//!
//! One [`SolveEngine`] drives one session: fetch the task page, ask the
//! reasoner for an answer and submission URL, coerce and submit the answer,
//! then decide whether to retry, chain to a returned next URL, or terminate.
//! The whole session runs under a fixed wall-clock budget and a maximum
//! attempt count, and the fetcher's rendering resource is released exactly
//! once on every exit path.
//!
//! Chained tasks are followed iteratively (mutable `current_url`), so long
//! chains cannot grow the call stack and the deadline is checked at a single
//! loop site.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::Config;
use crate::llm::LlmClient;

use super::error::SolveError;
use super::fetch::{ContentFetcher, TaskFetcher};
use super::parse;
use super::reason::{LlmReasoner, Reasoner};
use super::submit::{AnswerSubmitter, HttpSubmitter, SubmissionPayload, SubmissionResult};

/// Orchestrates one solve session.
pub struct SolveEngine {
    fetcher: Box<dyn TaskFetcher>,
    reasoner: Box<dyn Reasoner>,
    submitter: Box<dyn AnswerSubmitter>,
    email: String,
    secret: String,
    max_retries: u32,
    budget: Duration,
}

impl SolveEngine {
    pub fn new(
        fetcher: Box<dyn TaskFetcher>,
        reasoner: Box<dyn Reasoner>,
        submitter: Box<dyn AnswerSubmitter>,
        email: impl Into<String>,
        secret: impl Into<String>,
        max_retries: u32,
        budget: Duration,
    ) -> Self {
        Self {
            fetcher,
            reasoner,
            submitter,
            email: email.into(),
            secret: secret.into(),
            max_retries,
            budget,
        }
    }

    /// Build a production engine from the service configuration.
    pub fn from_config(config: &Config, llm: Arc<dyn LlmClient>) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            Box::new(ContentFetcher::new(config.cdp_url.clone())?),
            Box::new(LlmReasoner::new(llm, config.model.clone())),
            Box::new(HttpSubmitter::new()?),
            config.email.clone(),
            config.secret.clone(),
            config.max_retries,
            config.budget,
        ))
    }

    /// Solve the chain of tasks starting at `url`.
    ///
    /// Returns the final [`SubmissionResult`] (the first one without a next
    /// URL), or a [`SolveError`] naming why the session terminated. The
    /// fetcher's rendering resource is released before returning, on every
    /// path.
    pub async fn solve(&mut self, url: &str) -> Result<SubmissionResult, SolveError> {
        let result = self.run(url).await;
        self.fetcher.release().await;
        result
    }

    async fn run(&mut self, start_url: &str) -> Result<SubmissionResult, SolveError> {
        let start = Instant::now();
        let mut current_url = start_url.to_string();
        let mut attempt: u32 = 0;

        while attempt < self.max_retries && start.elapsed() < self.budget {
            attempt += 1;
            tracing::info!("Attempt {}: solving {}", attempt, current_url);

            let page = match self.fetcher.fetch(&current_url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Attempt {}: fetch failed: {}", attempt, e);
                    self.backoff_or_fail(attempt, start, e.into()).await?;
                    continue;
                }
            };
            tracing::info!(
                "Fetched {} chars{}: {}...",
                page.raw_content.len(),
                if page.fetched_via_fallback {
                    " (rendered)"
                } else {
                    ""
                },
                super::preview(&page.raw_content, 500)
            );

            let llm_output = self
                .reasoner
                .reason(&page.raw_content)
                .await
                .map_err(|e| SolveError::Reasoning(e.to_string()))?;

            // A missing answer or submission URL after all fallbacks means
            // the task format itself is unparseable; retrying the same
            // content cannot help.
            let outcome = parse::parse(&llm_output, &page.raw_content);
            let answer_text = outcome.answer.ok_or(SolveError::MissingAnswer)?;
            let submit_url = outcome.submit_url.ok_or(SolveError::MissingSubmitUrl)?;

            let payload = SubmissionPayload {
                email: self.email.clone(),
                secret: self.secret.clone(),
                url: current_url.clone(),
                answer: super::answer::coerce(&answer_text),
            };

            let result = match self.submitter.submit(&submit_url, &payload).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Attempt {}: submit failed: {}", attempt, e);
                    self.backoff_or_fail(attempt, start, e.into()).await?;
                    continue;
                }
            };

            // Chaining is driven purely by the presence of a next URL; the
            // server may issue the next task whether or not this answer was
            // marked correct.
            if let Some(next_url) = result.url.clone() {
                tracing::info!(
                    "Result correct={}, moving to next task: {}",
                    result.correct,
                    next_url
                );
                current_url = next_url;
                continue;
            }

            tracing::info!("Session finished, correct={}", result.correct);
            return Ok(result);
        }

        // Only chain-hop exhaustion and a pre-expired deadline land here;
        // transient errors with no retry capacity left are returned as
        // themselves from backoff_or_fail.
        Err(SolveError::Budget {
            attempts: attempt,
            elapsed: start.elapsed(),
        })
    }

    /// Exponential backoff between retried attempts. When the attempt
    /// ceiling is hit, or the delay would not fit in the remaining budget,
    /// the transient error becomes the final reported error instead.
    async fn backoff_or_fail(
        &self,
        attempt: u32,
        start: Instant,
        error: SolveError,
    ) -> Result<(), SolveError> {
        let delay = Duration::from_secs(2u64.saturating_pow(attempt));
        if attempt >= self.max_retries || start.elapsed() + delay >= self.budget {
            return Err(error);
        }
        tracing::debug!("Backing off {:?} before retry", delay);
        tokio::time::sleep(delay).await;
        Ok(())
    }
}
