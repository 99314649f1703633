//! Cache-fronted synthesis service.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{fingerprint, SynthesisCache};
use crate::provider::SpeechProvider;

/// Synthesized audio plus whether it came from the cache.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    /// MP3 bytes.
    pub audio: Vec<u8>,
    /// True when served from the cache without an upstream call.
    pub cached: bool,
}

/// Fronts the speech provider with the bounded synthesis cache.
///
/// The cache lock is never held across the provider call: the flow is
/// get → (miss) call provider → put.
pub struct SpeechService {
    provider: Arc<dyn SpeechProvider>,
    cache: SynthesisCache,
}

impl SpeechService {
    pub fn new(provider: Arc<dyn SpeechProvider>, cache_capacity: usize) -> Self {
        Self {
            provider,
            cache: SynthesisCache::new(cache_capacity),
        }
    }

    /// Synthesize speech, serving repeated requests from the cache.
    pub async fn synthesize(&self, text: &str, language: &str) -> anyhow::Result<SynthesisOutput> {
        let key = fingerprint(text, language);

        if let Some(audio) = self.cache.get(&key) {
            debug!(provider = self.provider.id(), language, "synthesis cache hit");
            return Ok(SynthesisOutput {
                audio,
                cached: true,
            });
        }

        let audio = self.provider.synthesize(text, language).await?;
        self.cache.put(&key, audio.clone());
        debug!(
            provider = self.provider.id(),
            language,
            size_bytes = audio.len(),
            "synthesized and cached audio"
        );

        Ok(SynthesisOutput {
            audio,
            cached: false,
        })
    }

    /// Number of cached clips.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
