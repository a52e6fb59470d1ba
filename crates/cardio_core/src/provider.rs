//! Remote analysis client.
//!
//! Sends a persisted reading with the fixed system directive to an
//! Ollama-compatible chat endpoint and parses the structured JSON reply.
//! Any deviation from the response contract is a `ProviderError`; failure
//! is binary, never a partially-filled result.

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::prompts::{describe_reading, SYSTEM_PROMPT};
use crate::types::{AnalysisResult, RiskLevel, VitalsReading};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Analysis boundary injected into the orchestrator. Production uses
/// `OllamaProvider`; tests substitute deterministic fakes.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Classify one persisted reading. Must not write to the record store.
    async fn analyze(&self, reading: &VitalsReading) -> Result<AnalysisResult, ProviderError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    format: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Response contract: all four fields mandatory, riskLevel 0-2.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteAnalysis {
    risk_level: u8,
    summary: String,
    recommendations: Vec<String>,
    anomalies: Vec<String>,
}

/// Remote analysis client over the Ollama chat API.
pub struct OllamaProvider {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    async fn call_model(&self, user_prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            stream: false,
            format: "json".to_string(),
        };

        info!("analysis request to [{}]", self.model);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Request(format!("failed to read response: {}", e)))?;

        debug!(
            "analysis response ({} chars)",
            chat_response.message.content.len()
        );
        Ok(chat_response.message.content)
    }
}

#[async_trait]
impl AnalysisProvider for OllamaProvider {
    async fn analyze(&self, reading: &VitalsReading) -> Result<AnalysisResult, ProviderError> {
        let prompt = describe_reading(reading);
        let content = self.call_model(&prompt).await?;
        parse_analysis(&content)
    }
}

/// Parse model output into an `AnalysisResult`, enforcing the full
/// response contract.
pub(crate) fn parse_analysis(text: &str) -> Result<AnalysisResult, ProviderError> {
    let json_text = extract_json(text);

    let remote: RemoteAnalysis = serde_json::from_str(json_text)
        .map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let risk_level = RiskLevel::try_from(remote.risk_level)
        .map_err(|v| ProviderError::Malformed(format!("riskLevel {} out of range", v)))?;

    if remote.summary.trim().is_empty() {
        return Err(ProviderError::Malformed("empty summary".to_string()));
    }

    Ok(AnalysisResult {
        risk_level,
        summary: remote.summary,
        recommendations: remote.recommendations,
        anomalies: remote.anomalies,
    })
}

/// Slice out the JSON object if the model wrapped it in prose.
fn extract_json(text: &str) -> &str {
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return &text[start..=end];
        }
    }
    text
}
