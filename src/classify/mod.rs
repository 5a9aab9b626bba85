//! Email classifier — asks the LLM for a structured verdict on one email.
//!
//! Flow:
//! 1. Build a single-turn prompt that embeds the email verbatim
//! 2. LLM call at low temperature with a JSON response hint
//! 3. Strip code fences and parse the reply into a `ClassificationVerdict`
//!
//! Any fault in steps 2–3 becomes `ClassificationOutcome::Failed`. Nothing
//! is retried.

pub mod types;

pub use types::*;

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ClassifyError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};

/// Tuning for the classification call.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Kept low so the reply stays in the requested shape.
    pub temperature: f32,
    /// Upper bound on reply length; rewrites can be a few paragraphs.
    pub max_tokens: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 2048,
        }
    }
}

/// Classifies emails through an [`LlmProvider`].
///
/// Holds no per-request state; one instance is shared by all handlers.
pub struct EmailClassifier {
    llm: Arc<dyn LlmProvider>,
    config: ClassifierConfig,
}

impl EmailClassifier {
    pub fn new(llm: Arc<dyn LlmProvider>, config: ClassifierConfig) -> Self {
        Self { llm, config }
    }

    /// Classify an email. Never errors: faults come back as `Failed`.
    pub async fn classify(&self, text: &str) -> ClassificationOutcome {
        match self.try_classify(text).await {
            Ok(verdict) => {
                info!(
                    model = self.llm.model_name(),
                    main_category = %verdict.main_category,
                    department = %verdict.department,
                    status = %verdict.status,
                    "Email classified"
                );
                ClassificationOutcome::Verdict(verdict)
            }
            Err(e) => {
                warn!(
                    model = self.llm.model_name(),
                    error = %e,
                    "Classification failed, returning error verdict"
                );
                ClassificationOutcome::Failed {
                    cause: e.to_string(),
                }
            }
        }
    }

    async fn try_classify(&self, text: &str) -> Result<ClassificationVerdict, ClassifyError> {
        let request = CompletionRequest::new(vec![ChatMessage::user(build_classification_prompt(
            text,
        ))])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens)
        .with_response_mime_type("application/json");

        let response = self.llm.complete(request).await?;

        parse_verdict(&response.content).inspect_err(|e| {
            warn!(
                raw_response = %response.content,
                error = %e,
                "Failed to parse classification reply"
            );
        })
    }
}

// ── Prompt construction ─────────────────────────────────────────────

/// Build the classification prompt around the email text.
fn build_classification_prompt(email_text: &str) -> String {
    let departments = DEPARTMENTS.join(", ");
    format!(
        "Analise o email abaixo e classifique-o.\n\
         Retorne um objeto JSON com exatamente cinco chaves: \"main_category\", \"department\", \
         \"status\", \"reason\" e \"rewritten_email\".\n\n\
         - \"main_category\": \"Produtivo\" se o email exigir uma ação ou resposta, \
         ou \"Improdutivo\" caso contrário.\n\
         - \"department\": o departamento responsável, exatamente um destes valores: {departments}.\n\
         - \"status\": \"Aprovado\" se o email for claro e profissional, ou \"Reprovado\" caso contrário.\n\
         - \"reason\": uma frase curta explicando o status.\n\
         - \"rewritten_email\": se o status for \"Reprovado\", uma versão completa e profissional \
         do email reescrito; se o status for \"Aprovado\", exatamente \"{ALREADY_WELL_WRITTEN}\".\n\n\
         O JSON deve ser a única coisa na resposta.\n\n\
         Email para análise: --- {email_text} ---\n\n\
         Resposta JSON:"
    )
}

// ── Response parsing ────────────────────────────────────────────────

/// Parse the model reply into a verdict.
///
/// Every key in [`REQUIRED_FIELDS`] must be present as a string.
fn parse_verdict(raw: &str) -> Result<ClassificationVerdict, ClassifyError> {
    let cleaned = strip_code_fence(raw);
    serde_json::from_str(cleaned).map_err(|e| ClassifyError::MalformedReply(e.to_string()))
}

/// Remove surrounding markdown fences (```` ``` ```` / ```` ```json ````) and whitespace.
fn strip_code_fence(text: &str) -> &str {
    let mut inner = text.trim();

    if let Some(rest) = inner.strip_prefix("```") {
        inner = rest;
        if inner
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            inner = &inner[4..];
        }
    }

    if let Some(rest) = inner.trim_end().strip_suffix("```") {
        inner = rest;
    }

    inner.trim()
}
