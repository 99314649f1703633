//! Speech synthesis providers.

use async_trait::async_trait;

/// Trait for text-to-speech providers.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Provider identifier.
    fn id(&self) -> &str;
    /// Synthesize `text` in `language`, returning MP3 bytes.
    async fn synthesize(&self, text: &str, language: &str) -> anyhow::Result<Vec<u8>>;
}

const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Google Translate text-to-speech provider. Returns MP3 audio.
pub struct GoogleTranslateTts {
    client: reqwest::Client,
}

impl GoogleTranslateTts {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for GoogleTranslateTts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechProvider for GoogleTranslateTts {
    fn id(&self) -> &str {
        "google-translate-tts"
    }

    async fn synthesize(&self, text: &str, language: &str) -> anyhow::Result<Vec<u8>> {
        let resp = self
            .client
            .get(TRANSLATE_TTS_URL)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", text),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TTS API error ({status}): {detail}"));
        }

        let audio = resp.bytes().await?;
        if audio.is_empty() {
            return Err(anyhow::anyhow!("TTS API returned empty audio"));
        }
        Ok(audio.to_vec())
    }
}
