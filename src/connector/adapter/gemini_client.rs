use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{ChatPart, ChatReply, ChatRole, ChatTurn, DomainError, TokenUsage};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 1000;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<ApiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    role: ChatRole,
    parts: &'a [ChatPart],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ChatPart>,
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// Prior turns are sent ahead of the new message so the model answers in
/// context. With no API key configured every call fails immediately, letting
/// the chat service fall back to a synthesised reply without a network trip.
pub struct GeminiChatClient {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
}

impl GeminiChatClient {
    pub fn new(api_key: Option<String>, model: &str, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            base.trim_end_matches('/'),
            model
        );
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            url,
        }
    }

    pub fn with_key(api_key: Option<String>) -> Self {
        Self::new(api_key, DEFAULT_MODEL, DEFAULT_BASE_URL)
    }

    fn build_request<'a>(message: &'a [ChatPart], history: &'a [ChatTurn]) -> ApiRequest<'a> {
        let mut contents: Vec<ApiContent<'a>> = history
            .iter()
            .map(|turn| ApiContent {
                role: turn.role,
                parts: &turn.parts,
            })
            .collect();
        contents.push(ApiContent {
            role: ChatRole::User,
            parts: message,
        });

        ApiRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn send(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply, DomainError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(DomainError::chat("GeminiChatClient: AI key is not configured"));
        };

        let message = [ChatPart {
            text: message.to_string(),
        }];
        let request = Self::build_request(&message, history);

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::chat(format!("GeminiChatClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiChatClient: API returned {status}: {body}");
            return Err(DomainError::chat(format!(
                "GeminiChatClient: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::chat(format!("GeminiChatClient: failed to parse response: {e}"))
        })?;

        let text: String = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(DomainError::chat("GeminiChatClient: empty response"));
        }
        debug!("GeminiChatClient: {} characters returned", text.len());

        let reply = ChatReply::new(text);
        Ok(match api_response.usage_metadata {
            Some(usage) => reply.with_usage(usage),
            None => reply,
        })
    }

    fn name(&self) -> &str {
        "GeminiChatClient"
    }
}
