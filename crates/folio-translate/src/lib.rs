//! # folio-translate
//!
//! On-demand translation of displayed UI strings.
//!
//! - `client`: talks to a generative-text [`Provider`](folio_core::traits::Provider)
//!   and never fails: any problem degrades to the original text
//! - `cache`: per-language session cache of translated strings
//! - `translator`: session state: current language, cache, in-flight requests
//! - `projection`: binds one displayed string to the live translation state

pub mod cache;
pub mod client;
pub mod projection;
pub mod translator;

#[cfg(test)]
pub(crate) mod testing;

pub use client::TranslationClient;
pub use projection::{Projection, ProjectionState};
pub use translator::{Epoch, Stats, Translator};
