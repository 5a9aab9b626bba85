//! LLM integration for the email classifier.
//!
//! The classifier only depends on the [`LlmProvider`] trait. The one
//! concrete backend is Gemini, reached over its REST API with `reqwest`.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::LlmError;

/// Create the LLM provider from configuration.
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = GeminiProvider::new(config.api_key.clone(), &config.model, config.llm_timeout)?;
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_provider_reports_configured_model() {
        let config = AppConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("test-key".to_string()),
            "CLASSIFIER_MODEL" => Some("gemini-2.0-flash".to_string()),
            _ => None,
        })
        .unwrap();
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "gemini-2.0-flash");
    }
}
