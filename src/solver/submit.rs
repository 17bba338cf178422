//! Answer submission: POST the structured payload to the grading endpoint
//! and decode the structured result.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::answer::Answer;
use super::error::SubmitError;

/// Timeout for a submission POST.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// Wire payload the grading endpoint expects. Constructed fresh per
/// submission; `url` is the task URL just solved, not the submission URL.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPayload {
    pub email: String,
    pub secret: String,
    pub url: String,
    pub answer: Answer,
}

/// Decoded grading response. `correct` defaults to false when absent; any
/// fields beyond the known ones are passed through opaquely in `raw`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default)]
    pub correct: bool,

    /// Next task URL, when the server chains to another task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub raw: serde_json::Map<String, serde_json::Value>,
}

/// Posts a payload to a submission URL.
#[async_trait]
pub trait AnswerSubmitter: Send + Sync {
    async fn submit(
        &self,
        url: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionResult, SubmitError>;
}

/// Production submitter over reqwest.
pub struct HttpSubmitter {
    client: reqwest::Client,
}

impl HttpSubmitter {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(SUBMIT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AnswerSubmitter for HttpSubmitter {
    async fn submit(
        &self,
        url: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionResult, SubmitError> {
        tracing::info!("Submitting answer to {}", url);

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // Grading endpoints return structured error detail on non-200;
            // still decode the body.
            tracing::warn!("Submission endpoint returned HTTP {}", status);
        }

        let body = response.text().await.map_err(|e| SubmitError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| SubmitError::Decode {
            url: url.to_string(),
            reason: format!("{} (body: {})", e, super::preview(&body, 200)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(url: &str) -> SubmissionPayload {
        SubmissionPayload {
            email: "user@example.com".to_string(),
            secret: "s3cret".to_string(),
            url: url.to_string(),
            answer: Answer::Integer(42),
        }
    }

    #[tokio::test]
    async fn test_submit_decodes_result_and_passthrough() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"correct": true, "score": 10, "note": "nice"}"#)
            .create_async()
            .await;

        let submitter = HttpSubmitter::new().unwrap();
        let result = submitter
            .submit(&format!("{}/submit", server.url()), &payload("https://t/1"))
            .await
            .unwrap();

        assert!(result.correct);
        assert_eq!(result.url, None);
        assert_eq!(result.raw["score"], 10);
        assert_eq!(result.raw["note"], "nice");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_correct_defaults_false_and_next_url_decoded() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/submit")
            .with_status(200)
            .with_body(r#"{"url": "https://t/2"}"#)
            .create_async()
            .await;

        let submitter = HttpSubmitter::new().unwrap();
        let result = submitter
            .submit(&format!("{}/submit", server.url()), &payload("https://t/1"))
            .await
            .unwrap();

        assert!(!result.correct);
        assert_eq!(result.url.as_deref(), Some("https://t/2"));
    }

    #[tokio::test]
    async fn test_non_2xx_body_still_decoded() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/submit")
            .with_status(400)
            .with_body(r#"{"correct": false, "error": "answer must be a number"}"#)
            .create_async()
            .await;

        let submitter = HttpSubmitter::new().unwrap();
        let result = submitter
            .submit(&format!("{}/submit", server.url()), &payload("https://t/1"))
            .await
            .unwrap();

        assert!(!result.correct);
        assert_eq!(result.raw["error"], "answer must be a number");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/submit")
            .with_status(200)
            .with_body("<html>busy</html>")
            .create_async()
            .await;

        let submitter = HttpSubmitter::new().unwrap();
        let err = submitter
            .submit(&format!("{}/submit", server.url()), &payload("https://t/1"))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let submitter = HttpSubmitter::new().unwrap();
        let err = submitter
            .submit("http://127.0.0.1:1/submit", &payload("https://t/1"))
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Network { .. }));
    }
}
