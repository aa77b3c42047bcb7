//! Applying a chosen fix suggestion to source text.
pub mod applicator;
pub mod archetypes;

pub use applicator::{AppliedFix, FixApplicator, Placement, success_message};
pub use archetypes::{ARCHETYPES, Archetype, ReferenceTable};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixError {
    #[error("Fix suggestion not found: {0}")]
    NotFound(String),
}

/// Lookup from a bug archetype id to the exact snippet that exhibits it.
pub trait SnippetIndex: Send + Sync {
    fn snippet_for(&self, bug_id: &str) -> Option<&str>;
}
