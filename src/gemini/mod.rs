/// Gemini integration
///
/// One HTTP client shared by two jobs: extracting a shopping intent from an
/// utterance, and generating buy-again suggestions from the history.

pub mod client;
pub mod extractor;
pub mod recommender;

pub use client::GeminiClient;
pub use extractor::GeminiExtractor;
pub use recommender::GeminiRecommender;
