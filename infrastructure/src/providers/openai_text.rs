//! OpenAI-compatible chat completions adapter for the author and critic

use super::http::{endpoint_url, parse_api_error};
use crate::config::FileTextConfig;
use async_trait::async_trait;
use draftloop_application::{GatewayError, TextGenerator};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

pub struct OpenAiTextGenerator {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl OpenAiTextGenerator {
    pub fn new(base_url: &str, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: endpoint_url(base_url, "chat/completions"),
            model: model.into(),
            api_key: None,
            max_tokens: 4096,
            temperature: None,
        }
    }

    /// Build a generator for `model` from the `[text]` section.
    pub fn from_config(config: &FileTextConfig, model: &str) -> Self {
        let mut generator = Self::new(&config.base_url, model);
        generator.api_key = config.api_key();
        generator.max_tokens = config.max_tokens;
        generator.temperature = config.temperature;
        generator
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn request_body(&self, system_prompt: &str, prompt: &str) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": self.max_tokens,
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }
}

/// Map a non-success response to a gateway error.
fn status_error(model: &str, status: u16, body: &str) -> GatewayError {
    let error = parse_api_error(body);
    match status {
        404 => GatewayError::ModelNotAvailable(format!("{}: {}", model, error.message)),
        408 | 504 => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status, error.message)),
    }
}

/// Extract `choices[0].message.content`.
fn extract_content(body: &Value) -> Result<String, GatewayError> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::InvalidResponse("missing choices[0].message.content".into()))?;
    if content.trim().is_empty() {
        return Err(GatewayError::InvalidResponse("empty completion".into()));
    }
    Ok(content.to_string())
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, system_prompt, prompt), fields(model = %self.model))]
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
        debug!("Sending chat completion request ({} prompt bytes)", prompt.len());

        let mut builder = self
            .client
            .post(&self.url)
            .json(&self.request_body(system_prompt, prompt));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::ConnectionError(e.to_string())
            } else {
                GatewayError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(&self.model, status.as_u16(), &error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        extract_content(&body)
    }
}
