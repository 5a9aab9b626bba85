//! Email classifier — LLM-backed email triage and rewriting service.

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
