//! Gemini vision provider.

use async_trait::async_trait;

use crate::classify::MISSING_KEY_MARKER;
use crate::types::{VisionProvider, VisionRequest};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini image classification provider.
pub struct GeminiVisionProvider {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl GeminiVisionProvider {
    /// The key is optional at construction; a missing key surfaces as a
    /// configuration failure on the first call rather than at startup.
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VisionProvider for GeminiVisionProvider {
    fn id(&self) -> &str {
        "gemini-vision"
    }

    async fn classify_image(&self, req: VisionRequest) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("{MISSING_KEY_MARKER} for vision model"))?;

        let base64_data =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &req.data);

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": req.instruction },
                    {
                        "inline_data": {
                            "mime_type": req.mime_type,
                            "data": base64_data
                        }
                    }
                ]
            }]
        });

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let resp = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Vision API error ({status}): {detail}"));
        }

        let json: serde_json::Value = resp.json().await?;
        let text = json
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .unwrap_or("")
            .to_string();

        Ok(text)
    }
}
