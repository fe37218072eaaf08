//! # folio-providers
//!
//! Generative-text provider implementations for Folio.

pub mod gemini;
pub mod ollama;
pub mod openai;
