use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RefinementError, RefinementRequest, Refiner};
use crate::config::RefinementConfig;

const SYSTEM_PROMPT: &str = "You are a concise security analyst. Return JSON only: {\"score\":0..100,\"notes\":[\"...\"]}. Keep notes short (max 6), actionable, and non-repetitive. If localScore looks fair, keep it.";

/// Chat-completions client that asks a model to review the local grade.
#[derive(Debug, Clone)]
pub struct OpenAiRefiner {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiRefiner {
    /// Build from configuration; `Ok(None)` when no API key is configured.
    pub fn from_config(config: &RefinementConfig) -> Result<Option<Self>, RefinementError> {
        match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Self::with_config(
                key,
                config.base_url.clone(),
                config.model.clone(),
                config.timeout,
            )
            .map(Some),
            _ => Ok(None),
        }
    }

    pub fn with_config(
        api_key: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RefinementError> {
        if api_key.trim().is_empty() {
            return Err(RefinementError::MissingCredentials);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| RefinementError::Config("API key is not a valid header value".into()))?;
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| RefinementError::Config(format!("failed to create HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ApiMessage; 2],
}

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn user_prompt(request: &RefinementRequest) -> String {
    format!(
        "Answers: {}\nLocalScore: {}\nLocalNotes: {}\nIf you adjust score, explain via notes (brief) and keep within 0..100.",
        request.answers,
        request.local_score,
        request.local_notes.join(" | ")
    )
}

/// Models occasionally wrap JSON in a markdown fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait]
impl Refiner for OpenAiRefiner {
    async fn refine(&self, request: &RefinementRequest) -> Result<Value, RefinementError> {
        let body = ChatApiRequest {
            model: &self.model,
            temperature: 0.2,
            messages: [
                ApiMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ApiMessage {
                    role: "user",
                    content: user_prompt(request),
                },
            ],
        };

        let response = self
            .client
            .post(self.completions_url())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefinementError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: ChatApiResponse = response
            .json()
            .await
            .map_err(|err| RefinementError::Malformed(format!("completion body: {err}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        serde_json::from_str(strip_code_fence(&content))
            .map_err(|err| RefinementError::Malformed(format!("model content: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fences() {
        assert_eq!(strip_code_fence("```json\n{\"score\": 1}\n```"), "{\"score\": 1}");
        assert_eq!(strip_code_fence("  {\"score\": 1} "), "{\"score\": 1}");
    }

    #[test]
    fn prompt_lists_local_context() {
        let request = RefinementRequest {
            answers: serde_json::json!({}),
            local_score: 64,
            local_notes: vec!["a".to_string(), "b".to_string()],
        };
        let prompt = user_prompt(&request);
        assert!(prompt.contains("LocalScore: 64"));
        assert!(prompt.contains("LocalNotes: a | b"));
    }

    #[test]
    fn missing_key_disables_refiner() {
        let config = RefinementConfig {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(OpenAiRefiner::from_config(&config)
            .expect("config accepted")
            .is_none());
    }
}
