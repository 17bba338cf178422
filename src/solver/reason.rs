//! The reasoning step: turn task text into a proposed answer and submission
//! URL via an external language model.
//!
//! The solver depends only on the text-in/text-out contract of [`Reasoner`];
//! [`LlmReasoner`] is the production implementation backed by an
//! [`LlmClient`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::{ChatMessage, ChatOptions, LlmClient};

/// Fixed prompt template instructing the model to emit the labeled lines the
/// parser expects.
fn build_prompt(task_text: &str) -> String {
    format!(
        "You are a data analysis expert solving quiz tasks.\n\
         Analyze this question and provide the direct answer.\n\n\
         Question:\n{task_text}\n\n\
         IMPORTANT:\n\
         - If the question asks for a number, respond with just the number\n\
         - If it asks for text, provide just the text\n\
         - If it asks for a calculation, calculate and provide the result\n\
         - Be precise and direct\n\n\
         Respond with exactly two lines:\n\
         ANSWER: <your answer>\n\
         SUBMIT_URL: <the URL the answer must be POSTed to, copied from the question>"
    )
}

/// Produces free-form reasoning output for a task page.
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn reason(&self, task_text: &str) -> anyhow::Result<String>;
}

/// [`Reasoner`] backed by a chat-completion model.
pub struct LlmReasoner {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl LlmReasoner {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Reasoner for LlmReasoner {
    async fn reason(&self, task_text: &str) -> anyhow::Result<String> {
        let messages = [ChatMessage::user(build_prompt(task_text))];
        let options = ChatOptions {
            // Low temperature: answers should be reproducible
            temperature: Some(0.1),
            max_tokens: None,
        };

        let response = self
            .client
            .chat_completion_with_options(&self.model, &messages, options)
            .await?;

        tracing::debug!(
            "Reasoning complete: model={}, finish_reason={}",
            response.model.as_deref().unwrap_or("unknown"),
            response.finish_reason.as_deref().unwrap_or("unknown")
        );

        response
            .content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow::anyhow!("model returned an empty completion"))
    }
}
