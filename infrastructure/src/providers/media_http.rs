//! OpenAI-compatible media generation adapter
//!
//! Posts `{model, prompt, size, n, response_format}` to a generations
//! endpoint and reads the first entry of `data`, either as a URL or as
//! base64-encoded bytes.

use super::http::{endpoint_url, status_failure, transport_failure};
use crate::config::{FileMediaProviderConfig, FileResponseFormat};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use draftloop_application::{MediaProvider, ProviderFailure};
use draftloop_domain::{Artifact, FailureKind, MediaRequest, ProviderSpec, capability};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

/// One media backend reached over HTTP
pub struct HttpMediaProvider {
    client: Client,
    spec: ProviderSpec,
    url: String,
    model: String,
    api_key: Option<String>,
    default_size: Option<String>,
    response_format: FileResponseFormat,
    timeout: Duration,
}

impl HttpMediaProvider {
    pub fn new(spec: ProviderSpec, url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            spec,
            url: url.into(),
            model: model.into(),
            api_key: None,
            default_size: None,
            response_format: FileResponseFormat::default(),
            timeout: draftloop_application::ports::media_provider::DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Build from a `[[media_providers]]` entry.
    pub fn from_config(config: &FileMediaProviderConfig, default_timeout: Duration) -> Self {
        let mut provider = Self::new(
            config.to_spec(),
            endpoint_url(&config.base_url, &config.request_path()),
            &config.model,
        )
        .with_response_format(config.response_format)
        .with_timeout(config.timeout(default_timeout));
        provider.api_key = config.api_key();
        provider.default_size = config.size.clone();
        provider
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_default_size(mut self, size: impl Into<String>) -> Self {
        self.default_size = Some(size.into());
        self
    }

    pub fn with_response_format(mut self, format: FileResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body(&self, request: &MediaRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "prompt": request.prompt,
            "n": 1,
            "response_format": self.response_format.as_str(),
        });
        if let Some(size) = request.size.as_ref().or(self.default_size.as_ref()) {
            body["size"] = json!(size);
        }
        if let Some(negative) = &request.negative_prompt {
            body["negative_prompt"] = json!(negative);
        }
        body
    }

    fn mime_type(&self) -> &'static str {
        if self.spec.capability_tag.eq_ignore_ascii_case(capability::VIDEO) {
            "video/mp4"
        } else {
            "image/png"
        }
    }
}

/// Read the artifact out of a successful generations response.
pub(crate) fn parse_generation_response(
    body: &Value,
    mime_type: &str,
) -> Result<Artifact, ProviderFailure> {
    let entry = body
        .get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
        .ok_or_else(|| {
            ProviderFailure::new("response has no data entries").with_kind(FailureKind::ServerError)
        })?;

    if let Some(url) = entry.get("url").and_then(Value::as_str) {
        return Ok(Artifact::uri(url));
    }
    if let Some(encoded) = entry.get("b64_json").and_then(Value::as_str) {
        let data = BASE64.decode(encoded).map_err(|e| {
            ProviderFailure::new(format!("invalid base64 payload: {}", e))
                .with_kind(FailureKind::ServerError)
        })?;
        return Ok(Artifact::bytes(mime_type, data));
    }

    Err(ProviderFailure::new("response entry has neither url nor b64_json")
        .with_kind(FailureKind::ServerError))
}

#[async_trait]
impl MediaProvider for HttpMediaProvider {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    #[instrument(skip(self, request), fields(provider = %self.spec.id, model = %self.model))]
    async fn attempt(&self, request: &MediaRequest) -> Result<Artifact, ProviderFailure> {
        debug!("Sending generation request to {}", self.url);

        let mut builder = self.client.post(&self.url).json(&self.request_body(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| transport_failure(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_failure(status.as_u16(), &error_text));
        }

        let body: Value = response.json().await.map_err(|e| {
            ProviderFailure::new(format!("invalid response body: {}", e))
                .with_kind(FailureKind::ServerError)
        })?;
        parse_generation_response(&body, self.mime_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftloop_domain::AttemptStatus;
    use draftloop_domain::ErrorClassifier;

    fn provider() -> HttpMediaProvider {
        HttpMediaProvider::new(
            ProviderSpec::image("flux", 1),
            "https://api.example.com/v1/images/generations",
            "flux-dev",
        )
    }

    #[test]
    fn test_request_body() {
        let provider = provider().with_default_size("1024x1024");
        let body = provider.request_body(&MediaRequest::image("a lighthouse at dusk"));
        assert_eq!(body["model"], "flux-dev");
        assert_eq!(body["prompt"], "a lighthouse at dusk");
        assert_eq!(body["size"], "1024x1024");
        assert_eq!(body["response_format"], "url");
        assert!(body.get("negative_prompt").is_none());

        // The request's own size wins over the configured default
        let request = MediaRequest::image("x")
            .with_size("512x512")
            .with_negative_prompt("text");
        let body = provider.request_body(&request);
        assert_eq!(body["size"], "512x512");
        assert_eq!(body["negative_prompt"], "text");
    }

    #[test]
    fn test_parse_url_response() {
        let body = json!({"created": 1, "data": [{"url": "https://cdn.example/a.png"}]});
        let artifact = parse_generation_response(&body, "image/png").unwrap();
        assert_eq!(artifact, Artifact::uri("https://cdn.example/a.png"));
    }

    #[test]
    fn test_parse_b64_response() {
        let body = json!({"data": [{"b64_json": BASE64.encode(b"png-bytes")}]});
        let artifact = parse_generation_response(&body, "image/png").unwrap();
        assert_eq!(artifact, Artifact::bytes("image/png", b"png-bytes".to_vec()));
    }

    #[test]
    fn test_parse_empty_response_is_transient() {
        let failure = parse_generation_response(&json!({"data": []}), "image/png").unwrap_err();
        let status = ErrorClassifier::standard().classify(&failure.into_signal("flux"));
        assert_eq!(status, AttemptStatus::TransientError);
    }

    #[test]
    fn test_from_config() {
        let config = FileMediaProviderConfig {
            id: "clip".to_string(),
            priority: 4,
            capability: "video".to_string(),
            base_url: "https://video.example.com/v1/".to_string(),
            model: "clip-1".to_string(),
            timeout_secs: Some(300),
            ..Default::default()
        };
        let provider = HttpMediaProvider::from_config(&config, Duration::from_secs(120));
        assert_eq!(provider.url(), "https://video.example.com/v1/videos/generations");
        assert_eq!(provider.spec().priority, 4);
        assert_eq!(provider.timeout(), Duration::from_secs(300));
        assert_eq!(provider.mime_type(), "video/mp4");
    }
}
