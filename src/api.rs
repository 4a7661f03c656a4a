use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::Provider;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Token budget for Anthropic extended thinking. The API requires
/// max_tokens to strictly exceed this and temperature to be pinned at 1.0
/// while thinking is enabled.
const THINKING_BUDGET_TOKENS: u32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiResponse {
    pub choices: Vec<OpenAiChoice>,
}

/// Single-turn completion client for the supported provider families.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    provider: Provider,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ApiClient {
    pub fn new(
        provider: Provider,
        endpoint: String,
        api_key: String,
        model: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("ideation-cli/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self { client, provider, endpoint, api_key, model, max_tokens, temperature }
    }

    /// Send the assembled prompt and return the provider's final text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        match self.provider {
            Provider::Anthropic => self.send_anthropic_request(prompt).await,
            Provider::OpenAi => self.send_openai_request(prompt).await,
            Provider::None => Err(anyhow::anyhow!("no provider configured")),
        }
    }

    fn effective_max_tokens(&self) -> u32 {
        // max_tokens must be strictly greater than the thinking budget.
        self.max_tokens.max(THINKING_BUDGET_TOKENS + 1024)
    }

    async fn send_anthropic_request(&self, prompt: &str) -> Result<String> {
        let request = json!({
            "model": self.model,
            "max_tokens": self.effective_max_tokens(),
            "temperature": 1.0,
            "thinking": {
                "type": "enabled",
                "budget_tokens": THINKING_BUDGET_TOKENS
            },
            "messages": [{
                "role": "user",
                "content": prompt
            }]
        });

        let mut request_builder = self
            .client
            .post(format!("{}/v1/messages", self.endpoint))
            .header("content-type", "application/json")
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request);

        if !self.api_key.is_empty() {
            request_builder = request_builder.header("x-api-key", &self.api_key);
        }

        let response = request_builder.send().await?;

        if response.status().is_success() {
            let body: Value = response.json().await?;
            let text = extract_text_blocks(&body);
            if text.is_empty() {
                return Err(anyhow::anyhow!("no text content in Anthropic response"));
            }
            Ok(text)
        } else {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            Err(anyhow::anyhow!("Anthropic API request failed: {}", error_text))
        }
    }

    async fn send_openai_request(&self, prompt: &str) -> Result<String> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request_builder = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .json(&request);

        if !self.api_key.is_empty() {
            request_builder =
                request_builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request_builder.send().await?;

        if response.status().is_success() {
            let openai_response: OpenAiResponse = response.json().await?;
            match openai_response.choices.first() {
                Some(choice) => Ok(choice.message.content.clone()),
                None => Err(anyhow::anyhow!("no choices in OpenAI response")),
            }
        } else {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            Err(anyhow::anyhow!("OpenAI API request failed: {}", error_text))
        }
    }
}

/// Concatenate only the final text content blocks; thinking blocks are
/// discarded before parsing.
fn extract_text_blocks(body: &Value) -> String {
    let mut text = String::new();
    if let Some(content) = body["content"].as_array() {
        for block in content {
            if block["type"].as_str() == Some("text") {
                if let Some(chunk) = block["text"].as_str() {
                    text.push_str(chunk);
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_blocks_skips_thinking() {
        let body = json!({
            "content": [
                {"type": "thinking", "thinking": "internal reasoning"},
                {"type": "text", "text": "### IDEA 1: A"},
                {"type": "text", "text": "\nmore"}
            ]
        });
        assert_eq!(extract_text_blocks(&body), "### IDEA 1: A\nmore");
    }

    #[test]
    fn test_extract_text_blocks_empty_content() {
        assert_eq!(extract_text_blocks(&json!({"content": []})), "");
        assert_eq!(extract_text_blocks(&json!({})), "");
    }

    #[test]
    fn test_effective_max_tokens_exceeds_thinking_budget() {
        let client = ApiClient::new(
            Provider::Anthropic,
            "http://localhost".to_string(),
            String::new(),
            "model".to_string(),
            4_096,
            0.7,
        );
        assert!(client.effective_max_tokens() > THINKING_BUDGET_TOKENS);

        let client = ApiClient::new(
            Provider::Anthropic,
            "http://localhost".to_string(),
            String::new(),
            "model".to_string(),
            20_000,
            0.7,
        );
        assert_eq!(client.effective_max_tokens(), 20_000);
    }
}
