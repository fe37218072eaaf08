//! # folio-core
//!
//! Core types, traits, configuration, and error handling for Folio.

pub mod config;
pub mod error;
pub mod language;
pub mod message;
pub mod prompt;
pub mod traits;
