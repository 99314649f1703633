//! leafscan-speech: text-to-speech synthesis fronted by a bounded,
//! content-addressed result cache.

pub mod cache;
pub mod provider;
pub mod service;

pub use cache::{fingerprint, SynthesisCache, DEFAULT_CACHE_CAPACITY};
pub use provider::{GoogleTranslateTts, SpeechProvider};
pub use service::{SpeechService, SynthesisOutput};
