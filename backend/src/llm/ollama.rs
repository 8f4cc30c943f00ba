//! HTTP client for a local Ollama server.
//!
//! Wire contract: `POST {base_url}/api/chat` with
//! `{model, messages, stream: false}`, answered by `{message: {content}}`.
//! There is no retry; one failed call fails the turn.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::errors::AppError;
use crate::llm::{AiClient, PromptMessage};

#[derive(Clone)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

#[async_trait]
impl AiClient for OllamaClient {
    #[instrument(skip(self, messages), fields(model = model, message_count = messages.len()))]
    async fn exec_chat(
        &self,
        model: &str,
        messages: &[PromptMessage],
    ) -> Result<String, AppError> {
        let request = OllamaChatRequest {
            model,
            messages,
            stream: false,
        };

        let response = self
            .http
            .post(self.chat_endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::LlmClientError(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::LlmClientError(format!(
                "Ollama returned {}",
                response.status()
            )));
        }

        let body: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::LlmClientError(format!("Ollama response parse: {e}")))?;

        Ok(body.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_the_ollama_contract() {
        let messages = vec![
            PromptMessage::system("You are an assistant."),
            PromptMessage::user("hello"),
        ];
        let request = OllamaChatRequest {
            model: "llama3.2",
            messages: &messages,
            stream: false,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3.2");
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hello");
    }

    #[test]
    fn response_body_parses() {
        let body: OllamaChatResponse =
            serde_json::from_str(r#"{"message": {"role": "assistant", "content": "Hi!"}}"#)
                .unwrap();
        assert_eq!(body.message.content, "Hi!");
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let client =
            OllamaClient::new("http://localhost:11434/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.chat_endpoint(), "http://localhost:11434/api/chat");
    }
}
