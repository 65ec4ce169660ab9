//! URL summarization: extract, prompt, return the synthesized summary.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AiError;
use crate::extractor::{ContentExtractor, HttpExtractor};
use crate::generate::{GenerationConfig, OpenAiGenerator, TextGenerator};

/// The summarization capability the chat session depends on.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a short summary of the page at `url`.
    ///
    /// Fails only if the generation backend call fails; extraction problems
    /// are absorbed upstream and merely lower the summary quality.
    async fn summarize(&self, url: &str) -> Result<String, AiError>;
}

/// Default summarizer: HTTP extraction composed with a completion call
/// under a fixed instruction template.
pub struct UrlSummarizer {
    extractor: Arc<dyn ContentExtractor>,
    generator: Arc<dyn TextGenerator>,
}

impl UrlSummarizer {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            extractor: Arc::new(HttpExtractor::new()),
            generator: Arc::new(OpenAiGenerator::new(config)),
        }
    }

    /// Build a summarizer from explicit parts (tests, alternative backends).
    pub fn with_parts(
        extractor: Arc<dyn ContentExtractor>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            extractor,
            generator,
        }
    }
}

fn build_prompt(url: &str, content: &str) -> String {
    format!(
        "Summarize the content of the following URL in a concise manner:\n\nURL: {url}\n\nContent: {content}"
    )
}

#[async_trait]
impl Summarizer for UrlSummarizer {
    async fn summarize(&self, url: &str) -> Result<String, AiError> {
        let content = self.extractor.extract(url).await;
        let summary = self.generator.generate(&build_prompt(url, &content)).await?;
        debug!(url, chars = summary.len(), "Summary produced");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileshare_shared::constants::EXTRACTION_PLACEHOLDER;
    use std::sync::Mutex;

    struct FixedExtractor(Option<String>);

    #[async_trait]
    impl ContentExtractor for FixedExtractor {
        async fn extract(&self, _url: &str) -> String {
            self.0
                .clone()
                .unwrap_or_else(|| EXTRACTION_PLACEHOLDER.to_string())
        }
    }

    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        reply: Result<String, ()>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|_| AiError::MalformedResponse)
        }
    }

    #[tokio::test]
    async fn test_prompt_embeds_url_and_content() {
        let generator = Arc::new(RecordingGenerator {
            prompts: Mutex::new(Vec::new()),
            reply: Ok("A simple example website.".to_string()),
        });
        let summarizer = UrlSummarizer::with_parts(
            Arc::new(FixedExtractor(Some("Example Domain".to_string()))),
            generator.clone(),
        );

        let summary = summarizer.summarize("https://example.com").await.unwrap();
        assert_eq!(summary, "A simple example website.");

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("URL: https://example.com"));
        assert!(prompts[0].contains("Content: Example Domain"));
    }

    #[tokio::test]
    async fn test_degraded_extraction_still_summarizes() {
        // The placeholder goes to the model like any other content; a
        // low-quality summary is an accepted outcome, not an error.
        let generator = Arc::new(RecordingGenerator {
            prompts: Mutex::new(Vec::new()),
            reply: Ok("Nothing much to say.".to_string()),
        });
        let summarizer =
            UrlSummarizer::with_parts(Arc::new(FixedExtractor(None)), generator.clone());

        let summary = summarizer.summarize("https://broken.example").await.unwrap();
        assert_eq!(summary, "Nothing much to say.");
        assert!(generator.prompts.lock().unwrap()[0].contains(EXTRACTION_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let generator = Arc::new(RecordingGenerator {
            prompts: Mutex::new(Vec::new()),
            reply: Err(()),
        });
        let summarizer = UrlSummarizer::with_parts(
            Arc::new(FixedExtractor(Some("text".to_string()))),
            generator,
        );

        assert!(summarizer.summarize("https://example.com").await.is_err());
    }
}
