//! Link summarization: best-effort content extraction plus a single
//! prompt-completion call to an OpenAI-compatible text-generation backend.
//!
//! Extraction never fails -- any fetch or markup problem degrades to a fixed
//! placeholder string that is still handed to the model. Only the generation
//! call itself can fail a summarization.

pub mod error;
pub mod extractor;
pub mod generate;
pub mod summarizer;

pub use error::AiError;
pub use extractor::{ContentExtractor, HttpExtractor};
pub use generate::{GenerationConfig, OpenAiGenerator, TextGenerator};
pub use summarizer::{Summarizer, UrlSummarizer};
