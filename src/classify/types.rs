//! Shared types for email classification.

use serde::{Deserialize, Serialize};

/// Status value carried by the failure sentinel.
pub const ERROR_STATUS: &str = "Erro";

/// Reason carried by the failure sentinel.
pub const ERROR_REASON: &str = "Falha ao analisar o email com a IA.";

/// Rewrite carried by the failure sentinel.
pub const ERROR_REWRITTEN_EMAIL: &str = "Não foi possível gerar uma sugestão de reescrita.";

/// Rewrite the model is told to use when the email needs no changes.
pub const ALREADY_WELL_WRITTEN: &str = "O email original já está bem escrito.";

/// Departments the model may route an email to.
pub const DEPARTMENTS: &[&str] = &[
    "Comercial",
    "Financeiro",
    "Recursos Humanos",
    "Suporte Técnico",
    "Marketing",
    "Direção",
    "Consulta Geral",
    "Pessoal",
];

/// Keys every model reply must carry.
pub const REQUIRED_FIELDS: &[&str] = &[
    "main_category",
    "department",
    "status",
    "reason",
    "rewritten_email",
];

// ── Verdict ─────────────────────────────────────────────────────────

/// Structured verdict for one email.
///
/// Values are taken as returned by the model; only presence is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    /// `Produtivo` or `Improdutivo`.
    pub main_category: String,
    /// One of [`DEPARTMENTS`].
    pub department: String,
    /// `Aprovado` or `Reprovado`.
    pub status: String,
    /// Short justification for the status.
    pub reason: String,
    /// Professional rewrite, or [`ALREADY_WELL_WRITTEN`].
    pub rewritten_email: String,
}

impl ClassificationVerdict {
    /// The all-"Erro" record used on the wire when classification fails.
    pub fn error_sentinel() -> Self {
        Self {
            main_category: ERROR_STATUS.to_string(),
            department: ERROR_STATUS.to_string(),
            status: ERROR_STATUS.to_string(),
            reason: ERROR_REASON.to_string(),
            rewritten_email: ERROR_REWRITTEN_EMAIL.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == ERROR_STATUS
    }
}

// ── Outcome ─────────────────────────────────────────────────────────

/// Result of a classification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    /// The model produced a complete verdict.
    Verdict(ClassificationVerdict),
    /// The call or the reply parsing failed.
    Failed {
        /// Internal diagnostic, for logs only.
        cause: String,
    },
}

impl ClassificationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ClassificationOutcome::Failed { .. })
    }

    /// Flatten to the wire shape, substituting the sentinel on failure.
    pub fn into_verdict(self) -> ClassificationVerdict {
        match self {
            ClassificationOutcome::Verdict(verdict) => verdict,
            ClassificationOutcome::Failed { .. } => ClassificationVerdict::error_sentinel(),
        }
    }
}
