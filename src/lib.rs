//! # visecode — LLM-backed code review service
//!
//! Submits a code snippet to a language model, validates the returned list
//! of bugs and fix suggestions, and applies a chosen fix back onto the
//! source text.
//!
//! ## Architecture
//!
//! - **[`schema`]** — Analysis contract types and validation of untrusted JSON
//! - **[`triage`]** — Severity verdict and fix selection for a result
//! - **[`generator`]** — Text-generation backends (Gemini REST API, mock)
//! - **[`analysis`]** — Prompt rendering and the degrade-to-empty analysis invoker
//! - **[`fix`]** — Snippet index, built-in archetypes, fix applicator
//! - **[`server`]** — HTTP boundary (`axum`)
//! - **[`config`]** — Configuration loading and validation

pub mod analysis;
pub mod config;
pub mod fix;
pub mod generator;
pub mod schema;
pub mod server;
pub mod triage;
